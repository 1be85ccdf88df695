//! # authproxy-reconciler
//!
//! Lifecycle reconcilers for AuthProxy tenants and roles.
//!
//! Each reconciler is built from one shared, read-only
//! [`SharedConfig`](authproxy_client::SharedConfig) and turns
//! create/read/update/delete/import into single authenticated calls. Nothing
//! is cached, batched or retried: every operation returns the resulting
//! descriptor together with the diagnostics it produced.
//!
//! ```ignore
//! use authproxy_client::CancellationToken;
//! use authproxy_core::Tenant;
//! use authproxy_reconciler::TenantReconciler;
//!
//! let tenants = TenantReconciler::new(shared.clone());
//! let created = tenants.create(&CancellationToken::new(), &Tenant::new("lidl")).await;
//! if created.is_success() {
//!     println!("tenant id {:?}", created.state.id);
//! }
//! ```
//!
//! [`plan_tenant`] and [`plan_role`] expose the `(observed, desired)` diff as
//! pure functions, so what a reconcile would do can be inspected without a
//! network.

mod dispatch;
mod lookup;
pub mod plan;
mod role;
mod tenant;

pub use lookup::TenantLookup;
pub use plan::{Action, Plan, plan_role, plan_tenant};
pub use role::RoleReconciler;
pub use tenant::TenantReconciler;
