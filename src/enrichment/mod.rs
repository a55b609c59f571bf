pub mod client;
#[cfg(feature = "http-client")]
pub mod http;
pub mod mock;

pub use client::{EchoEnrichmentClient, EnrichmentClient, EnrichmentError, Entity};
#[cfg(feature = "http-client")]
pub use http::HttpEnrichmentClient;
pub use mock::MockEnrichmentClient;
