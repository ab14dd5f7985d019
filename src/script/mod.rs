pub mod extractor;
pub mod interpreter;

pub use extractor::{get_by_path, split_path};
pub use interpreter::{ScriptInterpreter, Statement};
