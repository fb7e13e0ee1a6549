//! In-memory remote gateway backend for Steward.
//!
//! This crate provides an in-memory implementation of the `RemoteGateway`
//! trait from `steward-gateway`, using papaya lock-free HashMaps. It behaves
//! like the hosted service where it matters to the reconciliation core:
//! rotating update tokens, cursor pagination, per-call batch limits and
//! per-item failures.
//!
//! # Example
//!
//! ```ignore
//! use steward_gateway_memory::InMemoryGateway;
//! use steward_gateway::{RemoteGateway, ResourceKind};
//!
//! let gateway = InMemoryGateway::new();
//!
//! let created = gateway
//!     .create_parent(ResourceKind::ResourceSet, &serde_json::json!({"name": "web"}))
//!     .await?;
//! ```

mod gateway;
pub mod options;
mod remote_impl;

// Re-export the RemoteGateway trait for convenience
pub use steward_gateway::{RemoteError, RemoteGateway};

pub use gateway::{GatewaySnapshot, InMemoryGateway};
pub use options::GatewayOptions;
