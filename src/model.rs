//! Data models for the pack-quantity optimizer.
//!
//! This module defines the fundamental data structures shared by all strategies:
//! - `PackLine`: One pack size together with how many packs of it are used
//! - `Solution`: An ordered breakdown of pack lines plus the derived item total
//! - `normalize_sizes` / `validate_pack_sizes`: Catalogue clean-up for the core and the request layer

use std::collections::BTreeMap;

use log::{error, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation error for request data handed to the request layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Invalid pack sizes: {0}")]
    InvalidPackSizes(String),
}

/// One line of a solution: `count` packs of `size` items each.
///
/// # Fields
/// * `size` - Number of items in one pack
/// * `count` - How many packs of this size are used (never zero inside a `Solution`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackLine {
    pub size: u64,
    pub count: u64,
}

impl PackLine {
    /// Number of items this line contributes to the total.
    ///
    /// Saturates at `u64::MAX`; `Solution` never holds a line that does.
    #[inline]
    pub fn items(&self) -> u64 {
        self.size.saturating_mul(self.count)
    }
}

/// Result of one solve call.
///
/// Lines are ordered by pack size, largest first. The total is derived from the
/// lines on construction and is zero exactly when there are no lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Solution {
    packs: Vec<PackLine>,
    total: u64,
}

impl Solution {
    /// The degenerate answer for zero quantities or an empty catalogue.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a solution from `(size, count)` pairs.
    ///
    /// Pairs with a zero count are dropped and repeated sizes are merged into a
    /// single line, so the result always satisfies the `PackLine` invariant.
    ///
    /// # Parameters
    /// * `counts` - Usage counts per pack size, in any order
    ///
    /// # Returns
    /// A `Solution` with lines sorted by size descending and `total = Σ size × count`,
    /// or the empty solution (logged at `error!`) if the total does not fit in `u64`
    pub fn from_counts(counts: impl IntoIterator<Item = (u64, u64)>) -> Self {
        Self::try_from_counts(counts).unwrap_or_else(|| {
            error!("❌ Pack total exceeds {}; discarding breakdown", u64::MAX);
            Self::empty()
        })
    }

    /// Like `from_counts`, but returns `None` when counts or the total overflow `u64`.
    pub fn try_from_counts(counts: impl IntoIterator<Item = (u64, u64)>) -> Option<Self> {
        let mut merged: BTreeMap<u64, u64> = BTreeMap::new();
        for (size, count) in counts {
            if count > 0 {
                let entry = merged.entry(size).or_insert(0);
                *entry = entry.checked_add(count)?;
            }
        }

        let mut total: u64 = 0;
        let mut packs = Vec::with_capacity(merged.len());
        for (size, count) in merged.into_iter().rev() {
            total = total.checked_add(size.checked_mul(count)?)?;
            packs.push(PackLine { size, count });
        }

        Some(Self { packs, total })
    }

    /// Sum of items over all lines.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    /// The pack lines, largest size first.
    #[inline]
    pub fn packs(&self) -> &[PackLine] {
        &self.packs
    }

    /// Consumes the solution and returns its lines.
    pub fn into_packs(self) -> Vec<PackLine> {
        self.packs
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packs.is_empty()
    }

    /// Number of distinct pack sizes used.
    #[inline]
    pub fn line_count(&self) -> usize {
        self.packs.len()
    }

    /// Number of physical packs across all lines.
    pub fn pack_count(&self) -> u64 {
        self.packs
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.count))
    }

    /// Checks whether this solution ships at least `quantity` items.
    ///
    /// The empty solution only covers a zero quantity.
    #[inline]
    pub fn covers(&self, quantity: u64) -> bool {
        self.total >= quantity
    }

    /// Surplus items shipped beyond `quantity` (zero if it undershoots).
    #[inline]
    pub fn overage(&self, quantity: u64) -> u64 {
        self.total.saturating_sub(quantity)
    }

    /// Ranking used to pick between candidates.
    ///
    /// A lower total wins; on equal totals the breakdown with fewer lines wins.
    ///
    /// # Returns
    /// `true` if `self` is strictly better than `other`
    pub fn ranks_before(&self, other: &Self) -> bool {
        (self.total, self.line_count()) < (other.total, other.line_count())
    }
}

/// Turns an arbitrary size list into the catalogue form every strategy expects.
///
/// Sorts ascending and removes duplicates. Zero is a precondition violation that
/// the request layer must reject; it trips a debug assertion and is dropped in
/// release builds.
///
/// # Parameters
/// * `sizes` - Pack sizes as handed to a solver
///
/// # Returns
/// Distinct positive sizes in ascending order
pub fn normalize_sizes(sizes: &[u64]) -> Vec<u64> {
    debug_assert!(
        sizes.iter().all(|&size| size > 0),
        "pack sizes must be positive, got {sizes:?}"
    );

    let mut catalogue: Vec<u64> = sizes.to_vec();
    catalogue.sort_unstable();
    catalogue.dedup();
    if catalogue.first() == Some(&0) {
        warn!("⚠️ Dropping pack size 0 from catalogue {sizes:?}");
        catalogue.remove(0);
    }
    catalogue
}

/// Validates pack sizes coming from outside the core.
///
/// All entries must be positive; the list must not be empty. Duplicates are
/// removed and the result is sorted ascending for consistent storage.
///
/// # Parameters
/// * `raw` - Sizes as received by the request layer
///
/// # Returns
/// `Ok(sizes)` for a usable catalogue, otherwise `Err(ValidationError)`
///
/// # Examples
/// ```
/// use pack_solver::model::validate_pack_sizes;
///
/// assert_eq!(validate_pack_sizes(&[500, 250, 500]).unwrap(), vec![250, 500]);
/// assert!(validate_pack_sizes(&[250, 0]).is_err());
/// assert!(validate_pack_sizes(&[]).is_err());
/// ```
pub fn validate_pack_sizes(raw: &[i64]) -> Result<Vec<u64>, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::InvalidPackSizes(
            "at least one pack size is required".to_string(),
        ));
    }

    let sizes = raw
        .iter()
        .map(|&size| {
            u64::try_from(size)
                .ok()
                .filter(|&size| size > 0)
                .ok_or_else(|| {
                    ValidationError::InvalidPackSizes(format!(
                        "pack sizes must be > 0, got: {}",
                        size
                    ))
                })
        })
        .collect::<Result<Vec<u64>, ValidationError>>()?;

    Ok(normalize_sizes(&sizes))
}

/// Validates a requested quantity coming from outside the core.
///
/// # Returns
/// The quantity as `u64` if it is positive, otherwise `Err(ValidationError)`
pub fn validate_quantity(raw: i64) -> Result<u64, ValidationError> {
    u64::try_from(raw)
        .ok()
        .filter(|&quantity| quantity > 0)
        .ok_or_else(|| {
            ValidationError::InvalidQuantity(format!("quantity must be > 0, got: {}", raw))
        })
}
