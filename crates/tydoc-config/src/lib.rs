pub mod config;
pub mod discovery;
pub mod error;
pub mod filter;
pub mod settings;
pub mod validation;

pub use config::*;
pub use error::*;
pub use settings::*;

pub use discovery::{CONFIG_FILE, ConfigDiscovery, ENV_PREFIX, PACKAGE_FIELD, discover};
pub use filter::PathFilter;
pub use validation::validate;
