// src/core/mod.rs
//! Remote store contract and its HTTP client.

pub mod remote_store;
pub mod service_client;

pub use remote_store::RemoteStore;
pub use service_client::HttpRemoteStore;
