pub mod config;
pub mod resolver;
pub mod types;

pub use config::{ConfigLoader, PostmanEnvironment};
pub use resolver::TemplateResolver;
pub use types::{Environment, Value, VariableConfig, VariableStore};
