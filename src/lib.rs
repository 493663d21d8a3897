pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod key;
pub mod paths;
pub mod query;
pub mod resolver;
pub mod response;
pub mod server;

pub use api::MetadataClient;
pub use catalog::FallbackCatalog;
pub use config::{Credentials, ProviderConfig};
pub use resolver::{KeyResolution, ResolutionOutcome, SongKeyResolver};
