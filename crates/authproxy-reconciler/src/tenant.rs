//! Tenant lifecycle: create, read, update (rename), delete, import.

use std::sync::Arc;

use authproxy_client::{CancellationToken, SharedConfig};
use authproxy_core::codec::tenant as codec;
use authproxy_core::{Applied, Diagnostics, Tenant};

use crate::dispatch::{Op, Verb, dispatch};
use crate::plan::{Action, plan_tenant};

const ENTITY: &str = "tenant";

/// Drives tenants on the admin API toward their desired state.
///
/// Cheap to clone; every clone reads the same [`SharedConfig`].
#[derive(Debug, Clone)]
pub struct TenantReconciler {
    shared: Arc<SharedConfig>,
}

impl TenantReconciler {
    #[must_use]
    pub fn new(shared: Arc<SharedConfig>) -> Self {
        Self { shared }
    }

    /// `POST /tenants`. On success the returned descriptor carries the
    /// remote-assigned id; on failure it is `desired` untouched.
    pub async fn create(&self, cancel: &CancellationToken, desired: &Tenant) -> Applied<Tenant> {
        let op = Op::new(Verb::Create, ENTITY);
        let mut diags = Diagnostics::new();
        let Some(body) = dispatch(
            self.shared.transport(),
            cancel,
            op,
            codec::create(desired),
            &mut diags,
        )
        .await
        else {
            return Applied::new(desired.clone(), diags);
        };
        let Some(id) = op.decoded(&mut diags, codec::decode_id(&body)) else {
            return Applied::new(desired.clone(), diags);
        };

        tracing::debug!(id = %id, name = %desired.name, "created a tenant resource");
        Applied::new(desired.clone().with_id(id), diags)
    }

    /// `GET /tenants/{name}`, or `/tenants/{id}` for an imported descriptor.
    ///
    /// A failed read leaves the descriptor as it was, known id included.
    pub async fn read(&self, cancel: &CancellationToken, current: &Tenant) -> Applied<Tenant> {
        let op = Op::new(Verb::Read, ENTITY);
        let mut diags = Diagnostics::new();
        let Some(body) = dispatch(
            self.shared.transport(),
            cancel,
            op,
            codec::read(current),
            &mut diags,
        )
        .await
        else {
            return Applied::new(current.clone(), diags);
        };
        let Some(remote) = op.decoded(&mut diags, codec::decode_tenant(&body)) else {
            return Applied::new(current.clone(), diags);
        };

        let id = keep_known_id(current.id(), remote.id, &mut diags);
        Applied::new(
            Tenant {
                id: Some(id),
                name: remote.name,
            },
            diags,
        )
    }

    /// `PATCH /tenants` renaming `old.name` to `desired.name`.
    ///
    /// On failure `desired` is returned as given; nothing is rolled back.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        old: &Tenant,
        desired: &Tenant,
    ) -> Applied<Tenant> {
        let op = Op::new(Verb::Update, ENTITY);
        let mut diags = Diagnostics::new();
        let Some(body) = dispatch(
            self.shared.transport(),
            cancel,
            op,
            codec::update(old, desired),
            &mut diags,
        )
        .await
        else {
            return Applied::new(desired.clone(), diags);
        };
        let Some(id) = op.decoded(&mut diags, codec::decode_id(&body)) else {
            return Applied::new(desired.clone(), diags);
        };

        tracing::trace!(from = %old.name, to = %desired.name, "updated a tenant resource");
        Applied::new(desired.clone().with_id(id), diags)
    }

    /// `DELETE /tenants/{name}`. Best effort: never retried.
    ///
    /// On success the state is the removed tenant as confirmed by the remote.
    pub async fn delete(&self, cancel: &CancellationToken, current: &Tenant) -> Applied<Tenant> {
        let op = Op::new(Verb::Delete, ENTITY);
        let mut diags = Diagnostics::new();
        let Some(body) = dispatch(
            self.shared.transport(),
            cancel,
            op,
            codec::delete(current),
            &mut diags,
        )
        .await
        else {
            return Applied::new(current.clone(), diags);
        };
        let Some(removed) = op.decoded(&mut diags, codec::decode_tenant(&body)) else {
            return Applied::new(current.clone(), diags);
        };

        tracing::debug!(id = %removed.id, name = %removed.name, "deleted a tenant resource");
        Applied::new(removed.into(), diags)
    }

    /// Seeds a descriptor with `id` only; a following read fills in the rest.
    #[must_use]
    pub fn import(&self, id: &str) -> Tenant {
        Tenant::imported(id)
    }

    /// Moves the remote tenant from `observed` to `desired`.
    ///
    /// Runs the planned actions in order and stops at the first error. The
    /// returned state is the last one the remote confirmed.
    pub async fn reconcile(
        &self,
        cancel: &CancellationToken,
        observed: Option<&Tenant>,
        desired: Option<&Tenant>,
    ) -> Applied<Option<Tenant>> {
        let mut diags = Diagnostics::new();
        let plan = match plan_tenant(observed, desired) {
            Ok(plan) => plan,
            Err(err) => {
                diags.add_reconcile_error("Unable to plan tenant", &err);
                return Applied::new(observed.cloned(), diags);
            }
        };

        let mut state = observed.cloned();
        for action in plan.actions {
            let applied = match &action {
                Action::Create(desired) => self.create(cancel, desired).await.map(Some),
                Action::Refresh(current) => self.read(cancel, current).await.map(Some),
                Action::Update { from, to } => self.update(cancel, from, to).await.map(Some),
                // Gone from the caller's perspective whatever the outcome.
                Action::Delete(current) => self.delete(cancel, current).await.map(|_| None),
            };
            let failed = !applied.is_success();
            diags.append(applied.diagnostics);
            if failed {
                if matches!(action, Action::Delete(_)) {
                    state = None;
                }
                break;
            }
            state = applied.state;
        }
        Applied::new(state, diags)
    }
}

/// Identity is immutable once known: keep it and warn if the remote disagrees.
pub(crate) fn keep_known_id(known: Option<&str>, remote: String, diags: &mut Diagnostics) -> String {
    match known {
        Some(known) if known != remote => {
            tracing::warn!(known, remote = %remote, "remote reported a different id");
            diags.add_warning(
                "Identity drift",
                format!("remote reported id {remote} for entity known as {known}; keeping {known}"),
            );
            known.to_string()
        }
        Some(known) => known.to_string(),
        None => remote,
    }
}
