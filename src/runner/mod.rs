pub mod executor;
pub mod reporter;
pub mod types;

pub use executor::CollectionRunner;
pub use reporter::RunReporter;
pub use types::{Exchange, RunResult, RunSummary};
