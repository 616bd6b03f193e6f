pub mod cli;
pub mod config;
pub mod executor;
pub mod fetch;
pub mod harvest;
pub mod logging;
pub mod model;
pub mod task;
pub mod traits;

// Re-export common types for convenience
pub use config::{HarvestConfig, Verbosity};
pub use executor::HarvestExecutor;
pub use fetch::HttpFetcher;
pub use harvest::{FetchOutcome, FilenamePolicy, RunReport};
pub use model::*;
pub use traits::*;
