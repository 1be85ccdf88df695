//! Pure planning: `(observed, desired) -> (actions, calls, projected state)`.
//!
//! No I/O happens here. A plan lists the actions a reconciler will take, the
//! exact remote calls those actions issue, and the observed state expected
//! once they all succeed.

use authproxy_core::codec::{role as role_codec, tenant as tenant_codec};
use authproxy_core::{ReconcileResult, RemoteCall, Role, Tenant};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action<T> {
    Create(T),
    Refresh(T),
    Update { from: T, to: T },
    Delete(T),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Plan<T> {
    pub actions: Vec<Action<T>>,
    pub calls: Vec<RemoteCall>,
    pub projected: Option<T>,
}

impl<T> Plan<T> {
    fn empty() -> Self {
        Self {
            actions: Vec::new(),
            calls: Vec::new(),
            projected: None,
        }
    }

    /// `true` when the plan changes nothing remotely (empty or refresh only).
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.actions
            .iter()
            .all(|action| matches!(action, Action::Refresh(_)))
    }
}

/// Plans a tenant.
///
/// | observed | desired | actions |
/// |---|---|---|
/// | none | none | - |
/// | none | some | create |
/// | some | none | delete |
/// | some | same name | refresh |
/// | some | other name | update (rename) |
///
/// # Errors
///
/// Fails when a descriptor cannot address the remote entity.
pub fn plan_tenant(
    observed: Option<&Tenant>,
    desired: Option<&Tenant>,
) -> ReconcileResult<Plan<Tenant>> {
    let plan = match (observed, desired) {
        (None, None) => Plan::empty(),
        (None, Some(desired)) => {
            let fresh = Tenant {
                id: None,
                ..desired.clone()
            };
            Plan {
                calls: vec![tenant_codec::create(&fresh)?],
                actions: vec![Action::Create(fresh.clone())],
                projected: Some(fresh),
            }
        }
        (Some(observed), None) => Plan {
            calls: vec![tenant_codec::delete(observed)?],
            actions: vec![Action::Delete(observed.clone())],
            projected: None,
        },
        (Some(observed), Some(desired)) if observed.same_declaration(desired) => Plan {
            calls: vec![tenant_codec::read(observed)?],
            actions: vec![Action::Refresh(observed.clone())],
            projected: Some(observed.clone()),
        },
        (Some(observed), Some(desired)) => {
            let renamed = Tenant {
                id: observed.id.clone(),
                name: desired.name.clone(),
            };
            Plan {
                calls: vec![tenant_codec::update(observed, &renamed)?],
                actions: vec![Action::Update {
                    from: observed.clone(),
                    to: renamed.clone(),
                }],
                projected: Some(renamed),
            }
        }
    };
    Ok(plan)
}

/// Plans a role.
///
/// Same table as [`plan_tenant`], except that a name or scope change is an
/// in-place update while a tenant change replaces the role (delete, then
/// create under the new tenant).
///
/// # Errors
///
/// Fails when a descriptor cannot address the remote entity.
pub fn plan_role(observed: Option<&Role>, desired: Option<&Role>) -> ReconcileResult<Plan<Role>> {
    let plan = match (observed, desired) {
        (None, None) => Plan::empty(),
        (None, Some(desired)) => {
            let fresh = Role {
                id: None,
                ..desired.clone()
            };
            Plan {
                calls: vec![role_codec::create(&fresh)?],
                actions: vec![Action::Create(fresh.clone())],
                projected: Some(fresh),
            }
        }
        (Some(observed), None) => Plan {
            calls: vec![role_codec::delete(observed)?],
            actions: vec![Action::Delete(observed.clone())],
            projected: None,
        },
        (Some(observed), Some(desired)) if observed.same_declaration(desired) => Plan {
            calls: vec![role_codec::read(observed)?],
            actions: vec![Action::Refresh(observed.clone())],
            projected: Some(observed.clone()),
        },
        (Some(observed), Some(desired)) if observed.tenant != desired.tenant => {
            let fresh = Role {
                id: None,
                ..desired.clone()
            };
            Plan {
                calls: vec![role_codec::delete(observed)?, role_codec::create(&fresh)?],
                actions: vec![Action::Delete(observed.clone()), Action::Create(fresh.clone())],
                projected: Some(fresh),
            }
        }
        (Some(observed), Some(desired)) => {
            let changed = Role {
                id: observed.id.clone(),
                ..desired.clone()
            };
            Plan {
                calls: vec![role_codec::update(observed, &changed)?],
                actions: vec![Action::Update {
                    from: observed.clone(),
                    to: changed.clone(),
                }],
                projected: Some(changed),
            }
        }
    };
    Ok(plan)
}
