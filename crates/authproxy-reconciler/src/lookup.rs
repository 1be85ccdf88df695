//! Read-only tenant lookup by name.
//!
//! Unlike [`TenantReconciler::read`](crate::TenantReconciler::read) this never
//! starts from a descriptor: the caller supplies a name and gets back whatever
//! the remote knows about it.

use std::sync::Arc;

use authproxy_client::{CancellationToken, SharedConfig};
use authproxy_core::codec::tenant as codec;
use authproxy_core::{Applied, Diagnostics, ReconcileError, Tenant};

use crate::dispatch::{Op, Verb, dispatch};

#[derive(Debug, Clone)]
pub struct TenantLookup {
    shared: Arc<SharedConfig>,
}

impl TenantLookup {
    #[must_use]
    pub fn new(shared: Arc<SharedConfig>) -> Self {
        Self { shared }
    }

    /// `GET /tenants/{name}`. `None` when the lookup failed.
    pub async fn lookup(&self, cancel: &CancellationToken, name: &str) -> Applied<Option<Tenant>> {
        let op = Op::new(Verb::Read, "tenant");
        let mut diags = Diagnostics::new();
        let call = if name.is_empty() {
            Err(ReconcileError::invalid_descriptor("tenant name is empty"))
        } else {
            codec::read(&Tenant::new(name))
        };
        let Some(body) = dispatch(self.shared.transport(), cancel, op, call, &mut diags).await
        else {
            return Applied::new(None, diags);
        };
        let found = op
            .decoded(&mut diags, codec::decode_tenant(&body))
            .map(Tenant::from);
        tracing::trace!(name, found = found.is_some(), "read a tenant data source");
        Applied::new(found, diags)
    }
}
