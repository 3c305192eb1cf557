//! Pack-quantity optimizer.
//!
//! Given a requested quantity and a catalogue of pack sizes, finds the pack
//! breakdown with the smallest item total that still covers the quantity.
//! `solve` is the entry point; the individual strategies live in `exact`,
//! `greedy` and `exhaustive`, and `service` wraps everything for a request layer.

pub mod config;
pub mod exact;
pub mod exhaustive;
pub mod greedy;
pub mod model;
pub mod optimizer;
pub mod service;
pub mod store;

pub use config::AppConfig;
pub use model::{PackLine, Solution};
pub use optimizer::{Optimizer, OptimizerConfig, Selection, Solver, Strategy, solve};
pub use service::{OrderError, OrderService};
pub use store::{InMemoryStore, PackSizeStore};

/// Installs `env_logger`, honouring `RUST_LOG` and defaulting to `info`.
///
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
