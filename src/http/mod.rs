pub mod builder;
pub mod client;
pub mod request;
pub mod response;
pub mod types;

pub use builder::{BuiltRequest, RequestBuilder};
pub use client::{HttpClient, Transport};
pub use request::Request;
pub use response::Response;
pub use types::{Method, Status};
