//! # authproxy-core
//!
//! Shared types for reconciling tenants and roles against the AuthProxy
//! admin API.
//!
//! ## Overview
//!
//! - [`Tenant`], [`Role`] and [`Scopes`]: desired/observed descriptors
//! - [`Diagnostics`]: per-operation error/warning records
//! - [`ReconcileError`]: the failure kinds an operation can report
//! - [`codec`]: request construction and response decoding per entity kind
//!
//! ## Example
//!
//! ```ignore
//! use authproxy_core::{codec, Tenant};
//!
//! let call = codec::tenant::create(&Tenant::new("lidl"))?;
//! assert_eq!(call.to_string(), "POST /tenants");
//! ```

pub mod codec;
mod diagnostics;
mod error;
mod model;

pub use codec::{Method, RemoteCall};
pub use diagnostics::{Applied, Diagnostic, Diagnostics, Severity};
pub use error::{ErrorKind, ReconcileError};
pub use model::{Role, Scopes, Tenant};

/// Type alias for a reconcile result.
pub type ReconcileResult<T> = Result<T, ReconcileError>;
