//! Client for the indexer's paginated node listing.

mod client;
mod dto;
mod error;

pub use client::{BackendClient, PageRequest};
pub use dto::{NodeRecord, PageResponse};
pub use error::FetchError;
