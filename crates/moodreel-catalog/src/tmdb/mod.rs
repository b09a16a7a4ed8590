pub mod client;
pub mod endpoint;

pub use client::TmdbClient;
pub use endpoint::Endpoint;
