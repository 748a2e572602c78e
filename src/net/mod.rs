//! Networking: the backend REST client and its transport seam.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` is the only module pages call. `request` and `error` define the
//! envelopes on either side of a call, `config` resolves where calls go, and
//! `transport` is the seam `browser` (fetch) and tests plug into.

pub mod api;
#[cfg(feature = "csr")]
pub mod browser;
pub mod config;
pub mod error;
pub mod request;
#[cfg(test)]
pub(crate) mod testing;
pub mod transport;
pub mod types;

pub use api::{ApiClient, ApiResult};
pub use error::ApiError;
