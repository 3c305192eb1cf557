use std::env;
use std::str::FromStr;

use log::{info, warn};

use crate::optimizer::{Optimizer, OptimizerConfig};
use crate::service::OrderService;
use crate::store::{InMemoryStore, StoreError};

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub service: ServiceConfig,
    pub optimizer: OptimizerConfig,
}

impl AppConfig {
    /// Loads an optional `.env` file, then reads the environment.
    pub fn load() -> Self {
        if let Err(err) = dotenvy::dotenv() {
            if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
            {
                warn!("⚠️ Could not load .env: {}", err);
            }
        }
        Self::from_env()
    }

    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(env_string)
    }

    /// Creates a configuration from an arbitrary variable source.
    ///
    /// The lookup returns `None` for unset variables; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };
        Self {
            service: ServiceConfig::from_lookup(&lookup),
            optimizer: optimizer_from_lookup(&lookup),
        }
    }

    /// Wires a store seeded with the default catalogue and an optimizer into a service.
    pub fn build_service(&self) -> Result<OrderService<InMemoryStore>, StoreError> {
        let store = InMemoryStore::with_sizes(&self.service.default_sizes)?;
        info!(
            "🚀 Pack solver ready: sizes {:?}, max quantity {}",
            self.service.default_sizes, self.service.max_quantity
        );
        Ok(OrderService::new(
            store,
            Optimizer::new(self.optimizer),
            self.service.max_quantity,
        ))
    }
}

/// Configuration for the request layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    pub default_sizes: Vec<u64>,
    pub max_quantity: u64,
}

impl ServiceConfig {
    pub const DEFAULT_SIZES: [u64; 5] = [250, 500, 1000, 2000, 5000];
    pub const DEFAULT_MAX_QUANTITY: u64 = 10_000_000;

    const DEFAULT_SIZES_VAR: &'static str = "PACK_SOLVER_DEFAULT_SIZES";
    const MAX_QUANTITY_VAR: &'static str = "PACK_SOLVER_MAX_QUANTITY";

    fn from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let default_sizes = lookup(Self::DEFAULT_SIZES_VAR)
            .and_then(|raw| parse_sizes(&raw, Self::DEFAULT_SIZES_VAR))
            .unwrap_or_else(|| Self::DEFAULT_SIZES.to_vec());

        let max_quantity = load_positive(
            lookup,
            Self::MAX_QUANTITY_VAR,
            Self::DEFAULT_MAX_QUANTITY,
        );

        Self {
            default_sizes,
            max_quantity,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            default_sizes: Self::DEFAULT_SIZES.to_vec(),
            max_quantity: Self::DEFAULT_MAX_QUANTITY,
        }
    }
}

const TABLE_CEILING_VAR: &str = "PACK_SOLVER_TABLE_CEILING";
const VERIFY_VAR: &str = "PACK_SOLVER_VERIFY";
const VERIFY_MAX_QUANTITY_VAR: &str = "PACK_SOLVER_VERIFY_MAX_QUANTITY";
const EXHAUSTIVE_MAX_UNITS_VAR: &str = "PACK_SOLVER_EXHAUSTIVE_MAX_UNITS";
const EXHAUSTIVE_MAX_NODES_VAR: &str = "PACK_SOLVER_EXHAUSTIVE_MAX_NODES";
const PARALLEL_VAR: &str = "PACK_SOLVER_PARALLEL";

fn optimizer_from_lookup(lookup: &impl Fn(&str) -> Option<String>) -> OptimizerConfig {
    let table_ceiling = load_positive(
        lookup,
        TABLE_CEILING_VAR,
        OptimizerConfig::DEFAULT_TABLE_CEILING,
    );
    let verify = load_flag(lookup, VERIFY_VAR, OptimizerConfig::DEFAULT_VERIFY);
    let verify_max_quantity = load_positive(
        lookup,
        VERIFY_MAX_QUANTITY_VAR,
        OptimizerConfig::DEFAULT_VERIFY_MAX_QUANTITY,
    );
    let exhaustive_max_units = load_positive(
        lookup,
        EXHAUSTIVE_MAX_UNITS_VAR,
        OptimizerConfig::DEFAULT_EXHAUSTIVE_MAX_UNITS,
    );
    let exhaustive_max_nodes = load_positive(
        lookup,
        EXHAUSTIVE_MAX_NODES_VAR,
        OptimizerConfig::DEFAULT_EXHAUSTIVE_MAX_NODES,
    );
    let parallel = load_flag(lookup, PARALLEL_VAR, OptimizerConfig::DEFAULT_PARALLEL);

    if verify {
        warn!(
            "⚠️ Verification mode enabled: exhaustive search runs for quantities up to {}",
            verify_max_quantity
        );
    }

    OptimizerConfig::builder()
        .table_ceiling(table_ceiling)
        .verify(verify)
        .verify_max_quantity(verify_max_quantity)
        .exhaustive_max_units(exhaustive_max_units)
        .exhaustive_max_nodes(exhaustive_max_nodes)
        .parallel(parallel)
        .build()
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

const FLAG_ON: [&str; 4] = ["1", "true", "yes", "on"];
const FLAG_OFF: [&str; 4] = ["0", "false", "no", "off"];

/// Reads an on/off switch; anything outside `FLAG_ON`/`FLAG_OFF` keeps `default`.
fn load_flag(lookup: &impl Fn(&str) -> Option<String>, var_name: &str, default: bool) -> bool {
    let Some(raw) = lookup(var_name) else {
        return default;
    };
    let value = raw.to_ascii_lowercase();
    if FLAG_ON.contains(&value.as_str()) {
        true
    } else if FLAG_OFF.contains(&value.as_str()) {
        false
    } else {
        warn!(
            "⚠️ {} ('{}') is not an on/off switch. Using {}.",
            var_name, raw, default
        );
        default
    }
}

/// Parses a comma-separated catalogue such as `250, 500, 1000`.
///
/// Rejects the whole list if any entry is not a positive integer.
fn parse_sizes(raw: &str, var_name: &str) -> Option<Vec<u64>> {
    let parsed = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<u64>().ok().filter(|&size| size > 0))
        .collect::<Option<Vec<u64>>>();

    match parsed {
        Some(mut sizes) if !sizes.is_empty() => {
            sizes.sort_unstable();
            sizes.dedup();
            Some(sizes)
        }
        _ => {
            warn!(
                "⚠️ {} ('{}') must be a comma-separated list of positive integers. Using default value.",
                var_name, raw
            );
            None
        }
    }
}

fn load_positive<T>(lookup: &impl Fn(&str) -> Option<String>, var_name: &str, default: T) -> T
where
    T: FromStr + Default + PartialOrd + Copy + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match lookup(var_name) {
        Some(raw) => match raw.parse::<T>() {
            Ok(value) if value > T::default() => value,
            Ok(_) => {
                warn!(
                    "⚠️ {} must be greater than 0. Using {}.",
                    var_name, default
                );
                default
            }
            Err(err) => {
                warn!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_switches_accept_on_and_off_spellings() {
        for raw in ["1", "TRUE", "yes", "On", " on "] {
            let config =
                config_from(&[("PACK_SOLVER_VERIFY", raw), ("PACK_SOLVER_PARALLEL", raw)]);
            assert!(config.optimizer.verify, "{raw:?}");
            assert!(config.optimizer.parallel, "{raw:?}");
        }
        for raw in ["0", "false", "No", "  off  "] {
            let config = config_from(&[("PACK_SOLVER_VERIFY", raw)]);
            assert!(!config.optimizer.verify, "{raw:?}");
        }
    }

    #[test]
    fn test_unknown_switch_keeps_default() {
        let unclear = |_: &str| Some("maybe".to_string());
        let unset = |_: &str| -> Option<String> { None };
        assert!(load_flag(&unclear, "TEST_VAR", true));
        assert!(!load_flag(&unclear, "TEST_VAR", false));
        assert!(load_flag(&unset, "TEST_VAR", true));
    }

    #[test]
    fn test_parse_sizes() {
        assert_eq!(
            parse_sizes("1000, 250,500,250", "TEST_VAR"),
            Some(vec![250, 500, 1000])
        );
        assert_eq!(parse_sizes("23,31,53,", "TEST_VAR"), Some(vec![23, 31, 53]));
        assert_eq!(parse_sizes("250,0", "TEST_VAR"), None);
        assert_eq!(parse_sizes("250,abc", "TEST_VAR"), None);
        assert_eq!(parse_sizes(",", "TEST_VAR"), None);
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = config_from(&[]);
        assert_eq!(config.service, ServiceConfig::default());
        assert_eq!(config.optimizer, OptimizerConfig::default());
    }

    #[test]
    fn test_variables_override_defaults() {
        let config = config_from(&[
            ("PACK_SOLVER_DEFAULT_SIZES", "23,31,53"),
            ("PACK_SOLVER_MAX_QUANTITY", "600000"),
            ("PACK_SOLVER_TABLE_CEILING", "1000000"),
            ("PACK_SOLVER_VERIFY", "yes"),
            ("PACK_SOLVER_VERIFY_MAX_QUANTITY", "200"),
            ("PACK_SOLVER_EXHAUSTIVE_MAX_UNITS", "12"),
            ("PACK_SOLVER_EXHAUSTIVE_MAX_NODES", "50000"),
            ("PACK_SOLVER_PARALLEL", "1"),
        ]);
        assert_eq!(config.service.default_sizes, vec![23, 31, 53]);
        assert_eq!(config.service.max_quantity, 600_000);
        assert_eq!(config.optimizer.table_ceiling, 1_000_000);
        assert!(config.optimizer.verify);
        assert_eq!(config.optimizer.verify_max_quantity, 200);
        assert_eq!(config.optimizer.exhaustive_max_units, 12);
        assert_eq!(config.optimizer.exhaustive_max_nodes, 50_000);
        assert!(config.optimizer.parallel);
    }

    #[test]
    fn test_invalid_values_fall_back_to_defaults() {
        let config = config_from(&[
            ("PACK_SOLVER_MAX_QUANTITY", "0"),
            ("PACK_SOLVER_TABLE_CEILING", "-3"),
            ("PACK_SOLVER_EXHAUSTIVE_MAX_UNITS", "many"),
            ("PACK_SOLVER_EXHAUSTIVE_MAX_NODES", "0"),
            ("PACK_SOLVER_VERIFY", "perhaps"),
            ("PACK_SOLVER_DEFAULT_SIZES", "   "),
        ]);
        assert_eq!(config, config_from(&[]));
    }

    #[test]
    fn test_build_service_seeds_default_sizes() {
        let config = config_from(&[("PACK_SOLVER_DEFAULT_SIZES", "250,500,1000")]);
        let service = config.build_service().unwrap();
        assert_eq!(service.pack_sizes().unwrap().pack_sizes, vec![250, 500, 1000]);
        assert_eq!(service.max_quantity(), ServiceConfig::DEFAULT_MAX_QUANTITY);
    }
}
