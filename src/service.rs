//! Request layer for the pack optimizer.
//!
//! Validates incoming bodies, reads the catalogue from an injected store, runs the
//! optimizer and produces serializable responses. Transport-agnostic: a web
//! framework maps `OrderError::code` to a status and serializes the bodies as-is.

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{PackLine, Solution, ValidationError, validate_pack_sizes, validate_quantity};
use crate::optimizer::Optimizer;
use crate::store::{PackSizeStore, StoreError};

/// Request body for replacing the pack-size catalogue.
#[derive(Debug, Clone, Deserialize)]
pub struct PackConfigRequest {
    pub pack_sizes: Vec<i64>,
}

/// Response body after the catalogue was replaced.
///
/// # Fields
/// * `success` - Always `true` for a stored catalogue
/// * `pack_sizes` - The stored catalogue (deduplicated, ascending)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackConfigResponse {
    pub success: bool,
    pub pack_sizes: Vec<u64>,
}

/// Response body for reading the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackSizesResponse {
    pub pack_sizes: Vec<u64>,
}

/// Request body for an order.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderRequest {
    pub quantity: i64,
}

/// Response body for an order.
///
/// # Fields
/// * `packs` - Pack lines, largest size first
/// * `total_items` - Items shipped; never below the requested quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderResponse {
    pub packs: Vec<PackLine>,
    pub total_items: u64,
}

impl OrderResponse {
    pub fn from_solution(solution: Solution) -> Self {
        let total_items = solution.total();
        Self {
            packs: solution.into_packs(),
            total_items,
        }
    }
}

#[derive(Debug, Error)]
pub enum OrderError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("quantity {quantity} exceeds the allowed maximum of {max}")]
    QuantityTooLarge { quantity: u64, max: u64 },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl OrderError {
    pub fn code(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "invalid_request",
            OrderError::QuantityTooLarge { .. } => "quantity_too_large",
            OrderError::Store(_) => "store_unavailable",
        }
    }
}

/// Order handling on top of a pack-size store.
pub struct OrderService<S> {
    store: S,
    optimizer: Optimizer,
    max_quantity: u64,
}

impl<S: PackSizeStore> OrderService<S> {
    /// Creates the service.
    ///
    /// # Parameters
    /// * `store` - Catalogue storage handle
    /// * `optimizer` - Configured strategy selector
    /// * `max_quantity` - Largest quantity accepted before solving
    pub fn new(store: S, optimizer: Optimizer, max_quantity: u64) -> Self {
        Self {
            store,
            optimizer,
            max_quantity,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_quantity(&self) -> u64 {
        self.max_quantity
    }

    /// Returns the current catalogue.
    pub fn pack_sizes(&self) -> Result<PackSizesResponse, OrderError> {
        let pack_sizes = self.store.get_sizes()?;
        Ok(PackSizesResponse { pack_sizes })
    }

    /// Validates and stores a new catalogue.
    ///
    /// All sizes must be positive and at least one must be given. Duplicates are
    /// removed and the catalogue is sorted ascending before it is stored.
    pub fn update_pack_sizes(
        &self,
        request: PackConfigRequest,
    ) -> Result<PackConfigResponse, OrderError> {
        let pack_sizes = validate_pack_sizes(&request.pack_sizes)?;
        self.store.set_sizes(&pack_sizes)?;
        info!("📦 Pack sizes updated: {:?}", pack_sizes);
        Ok(PackConfigResponse {
            success: true,
            pack_sizes,
        })
    }

    /// Computes the pack breakdown for an order.
    ///
    /// # Returns
    /// `OrderResponse` with the chosen packs, or `OrderError` if the quantity is not
    /// positive, exceeds the configured maximum, or the catalogue cannot be read
    pub fn create_order(&self, request: OrderRequest) -> Result<OrderResponse, OrderError> {
        let quantity = validate_quantity(request.quantity)?;
        if quantity > self.max_quantity {
            return Err(OrderError::QuantityTooLarge {
                quantity,
                max: self.max_quantity,
            });
        }

        let sizes = self.store.get_sizes()?;
        info!(
            "📥 New order: {} items, {} pack sizes",
            quantity,
            sizes.len()
        );
        let selection = self.optimizer.select(quantity, &sizes);
        info!(
            "📦 Result: {} items in {} packs via {}",
            selection.solution.total(),
            selection.solution.pack_count(),
            selection
                .strategy
                .map_or("no strategy", |strategy| strategy.code())
        );

        Ok(OrderResponse::from_solution(selection.solution))
    }
}
