pub mod collection;
pub mod error;
pub mod http;
pub mod logger;
pub mod runner;
pub mod script;
pub mod variable;

// Re-export commonly used types
pub use collection::{Collection, CollectionLoader, RequestTemplate};
pub use error::{CollrunError, Result};
pub use runner::CollectionRunner;
pub use variable::{Value, VariableStore};
