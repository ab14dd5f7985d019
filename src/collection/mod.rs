pub mod index;
pub mod loader;
pub mod types;

pub use index::{find_by_name, requests};
pub use loader::CollectionLoader;
pub use types::{Auth, Collection, Event, Header, Item, RequestTemplate};
