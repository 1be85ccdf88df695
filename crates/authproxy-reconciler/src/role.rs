//! Role lifecycle, keyed by `(tenant, name)` and carrying ordered scopes.

use std::sync::Arc;

use authproxy_client::{CancellationToken, SharedConfig};
use authproxy_core::codec::role as codec;
use authproxy_core::{Applied, Diagnostics, Role};

use crate::dispatch::{Op, Verb, dispatch};
use crate::plan::{Action, plan_role};
use crate::tenant::keep_known_id;

const ENTITY: &str = "role";

/// Drives roles on the admin API toward their desired state.
#[derive(Debug, Clone)]
pub struct RoleReconciler {
    shared: Arc<SharedConfig>,
}

impl RoleReconciler {
    #[must_use]
    pub fn new(shared: Arc<SharedConfig>) -> Self {
        Self { shared }
    }

    /// `POST /roles` with `{name, tenant, scopes}`.
    pub async fn create(&self, cancel: &CancellationToken, desired: &Role) -> Applied<Role> {
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

        tracing::debug!(
            id = %id,
            tenant = %desired.tenant,
            name = %desired.name,
            "created a role resource"
        );
        Applied::new(desired.clone().with_id(id), diags)
    }

    /// `GET /tenants/{tenant}/roles/{name}`, or `/roles/{id}` after import.
    ///
    /// Name, tenant and scopes are refreshed from the remote, scopes in the
    /// order the remote returns them.
    pub async fn read(&self, cancel: &CancellationToken, current: &Role) -> Applied<Role> {
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
        let Some(remote) = op.decoded(&mut diags, codec::decode_role(&body)) else {
            return Applied::new(current.clone(), diags);
        };

        let known = current.id().map(ToOwned::to_owned);
        let mut role = Role::from(remote);
        let remote_id = role.id.take().unwrap_or_default();
        role.id = Some(keep_known_id(known.as_deref(), remote_id, &mut diags));
        Applied::new(role, diags)
    }

    /// `PATCH /tenants/{tenant}/roles/{old name}` with `{new_name, scopes}`.
    ///
    /// On failure `desired` is returned as given.
    pub async fn update(
        &self,
        cancel: &CancellationToken,
        old: &Role,
        desired: &Role,
    ) -> Applied<Role> {
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

        tracing::trace!(tenant = %old.tenant, from = %old.name, to = %desired.name, "updated a role resource");
        Applied::new(desired.clone().with_id(id), diags)
    }

    /// `DELETE /tenants/{tenant}/roles/{name}`. Best effort: never retried.
    pub async fn delete(&self, cancel: &CancellationToken, current: &Role) -> Applied<Role> {
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
        let Some(removed) = op.decoded(&mut diags, codec::decode_deleted(&body)) else {
            return Applied::new(current.clone(), diags);
        };

        tracing::debug!(id = %removed.id, name = %removed.name, "deleted a role resource");
        Applied::new(
            Role {
                id: Some(removed.id),
                name: removed.name,
                ..current.clone()
            },
            diags,
        )
    }

    #[must_use]
    pub fn import(&self, id: &str) -> Role {
        Role::imported(id)
    }

    /// Moves the remote role from `observed` to `desired`, stopping at the
    /// first error. A tenant change runs delete then create.
    pub async fn reconcile(
        &self,
        cancel: &CancellationToken,
        observed: Option<&Role>,
        desired: Option<&Role>,
    ) -> Applied<Option<Role>> {
        let mut diags = Diagnostics::new();
        let plan = match plan_role(observed, desired) {
            Ok(plan) => plan,
            Err(err) => {
                diags.add_reconcile_error("Unable to plan role", &err);
                return Applied::new(observed.cloned(), diags);
            }
        };

        let mut state = observed.cloned();
        for action in plan.actions {
            let applied = match &action {
                Action::Create(desired) => self.create(cancel, desired).await.map(Some),
                Action::Refresh(current) => self.read(cancel, current).await.map(Some),
                Action::Update { from, to } => self.update(cancel, from, to).await.map(Some),
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
