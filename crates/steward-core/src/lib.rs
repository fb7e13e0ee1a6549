//! # steward-core
//!
//! Lifecycle orchestration and set reconciliation for remote managed
//! resources.
//!
//! A [`Lifecycle`] runs create/read/update/delete/list for one resource
//! family, described by a [`ResourceAdapter`]. Parents that own a membership
//! set, and every parent's tags, are converged to the desired state with a
//! read-diff-apply pass: the remote side is the source of truth and is read
//! in full before each change.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use steward_core::{Lifecycle, resources::{ResourceSetAdapter, ResourceSetModel}};
//! use steward_gateway_memory::InMemoryGateway;
//!
//! let lifecycle = Lifecycle::new(Arc::new(InMemoryGateway::new()), ResourceSetAdapter);
//! let desired = ResourceSetModel::new("web").with_resources(["arn:aws:ec2:::instance/i-1"]);
//! let created = lifecycle.create(&desired).await?;
//! ```

mod adapter;
pub mod diff;
mod error;
mod lifecycle;
pub mod membership;
pub mod pagination;
pub mod resources;
mod settings;
pub mod tags;

pub use adapter::{ResourceAdapter, ResourceView};
pub use diff::{ReconciliationPlan, TagPlan, diff, diff_tags, tag_map};
pub use error::{ErrorCode, LifecycleError, Result};
pub use lifecycle::Lifecycle;
pub use membership::{MembershipReconciler, ReconcileSummary};
pub use pagination::{collect_membership, collect_pages};
pub use settings::{ReconcileSettings, SnapshotPolicy};
pub use tags::TagReconciler;
