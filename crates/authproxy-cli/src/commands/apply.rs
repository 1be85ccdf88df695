//! `apply`: drive every declared tenant and role toward its declaration.
//!
//! Steps run in dependency order. Tenants that are declared go first (so the
//! roles below can reference them), then every role, then tenants that are
//! only in the state and must be deleted. Each address is reconciled on its
//! own; a failure on one does not stop the others. A tenant rename is carried
//! over to the roles in the state before they are reconciled.

use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;
use authproxy_client::{CancellationToken, SharedConfig};
use authproxy_core::{Diagnostics, ReconcileResult, Role, Tenant};
use authproxy_reconciler::{Action, Plan, RoleReconciler, TenantReconciler, plan_role, plan_tenant};
use colored::Colorize;
use serde::Serialize;

use crate::cli::{ApplyArgs, OutputFormat};
use crate::output::{print_diagnostics, print_outcomes, print_success, print_warning};
use crate::state::{Declaration, StateFile, load_declaration, load_state, save_state};

/// One address to reconcile. The observed side is looked up when the step
/// runs, so earlier steps (a tenant rename) are visible to later ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Tenant {
        address: String,
        desired: Option<Tenant>,
    },
    Role {
        address: String,
        desired: Option<Role>,
    },
}

impl Step {
    fn kind(&self) -> &'static str {
        match self {
            Self::Tenant { .. } => "tenant",
            Self::Role { .. } => "role",
        }
    }

    fn address(&self) -> &str {
        match self {
            Self::Tenant { address, .. } | Self::Role { address, .. } => address,
        }
    }
}

/// What happened (or would happen) at one address.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub kind: &'static str,
    pub address: String,
    pub actions: Vec<&'static str>,
    pub calls: Vec<String>,
    pub diagnostics: Diagnostics,
}

/// Orders the work: declared tenants, all roles, then removed tenants.
pub fn ordered_steps(declared: &Declaration, state: &StateFile) -> Vec<Step> {
    let mut steps = Vec::new();

    for (address, desired) in &declared.tenants {
        steps.push(Step::Tenant {
            address: address.clone(),
            desired: Some(desired.clone()),
        });
    }

    let role_addresses: BTreeSet<&String> =
        declared.roles.keys().chain(state.roles.keys()).collect();
    for address in role_addresses {
        steps.push(Step::Role {
            address: address.clone(),
            desired: declared.roles.get(address).cloned(),
        });
    }

    for address in state.tenants.keys() {
        if !declared.tenants.contains_key(address) {
            steps.push(Step::Tenant {
                address: address.clone(),
                desired: None,
            });
        }
    }

    steps
}

/// Records a tenant's new state and carries a rename over to its roles.
fn settle_tenant(
    state: &mut StateFile,
    address: &str,
    previous: Option<&Tenant>,
    next: Option<Tenant>,
) {
    match next {
        Some(tenant) => {
            if let Some(previous) = previous {
                state.follow_tenant_rename(&previous.name, &tenant.name);
            }
            state.tenants.insert(address.to_string(), tenant);
        }
        None => {
            state.tenants.remove(address);
        }
    }
}

fn action_name<T>(action: &Action<T>) -> &'static str {
    match action {
        Action::Create(_) => "create",
        Action::Refresh(_) => "refresh",
        Action::Update { .. } => "update",
        Action::Delete(_) => "delete",
    }
}

fn describe<T>(step: &Step, plan: ReconcileResult<Plan<T>>) -> Outcome {
    let mut outcome = Outcome {
        kind: step.kind(),
        address: step.address().to_string(),
        actions: Vec::new(),
        calls: Vec::new(),
        diagnostics: Diagnostics::new(),
    };
    match plan {
        Ok(plan) => {
            outcome.actions = plan.actions.iter().map(action_name).collect();
            outcome.calls = plan.calls.iter().map(ToString::to_string).collect();
        }
        Err(err) => outcome
            .diagnostics
            .add_reconcile_error(format!("Unable to plan {}", step.kind()), &err),
    }
    outcome
}

/// Plans every step without touching the network.
pub fn plan_all(declared: &Declaration, state: &StateFile) -> Vec<Outcome> {
    let mut projected = state.clone();
    let mut outcomes = Vec::new();

    for step in ordered_steps(declared, state) {
        let outcome = match &step {
            Step::Tenant { address, desired } => {
                let observed = projected.tenants.get(address).cloned();
                let plan = plan_tenant(observed.as_ref(), desired.as_ref());
                if let Ok(plan) = &plan {
                    let next = plan.projected.clone();
                    settle_tenant(&mut projected, address, observed.as_ref(), next);
                }
                describe(&step, plan)
            }
            Step::Role { address, desired } => {
                let observed = projected.roles.get(address);
                describe(&step, plan_role(observed, desired.as_ref()))
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

/// Runs every step and returns the new observed state.
pub async fn apply_all(
    shared: Arc<SharedConfig>,
    cancel: &CancellationToken,
    declared: &Declaration,
    mut state: StateFile,
) -> (StateFile, Vec<Outcome>) {
    let tenants = TenantReconciler::new(shared.clone());
    let roles = RoleReconciler::new(shared);
    let mut outcomes = Vec::new();

    for step in ordered_steps(declared, &state) {
        let outcome = match &step {
            Step::Tenant { address, desired } => {
                let observed = state.tenants.get(address).cloned();
                let mut outcome =
                    describe(&step, plan_tenant(observed.as_ref(), desired.as_ref()));
                let applied = tenants
                    .reconcile(cancel, observed.as_ref(), desired.as_ref())
                    .await;
                settle_tenant(&mut state, address, observed.as_ref(), applied.state);
                outcome.diagnostics = applied.diagnostics;
                outcome
            }
            Step::Role { address, desired } => {
                let observed = state.roles.get(address).cloned();
                let mut outcome = describe(&step, plan_role(observed.as_ref(), desired.as_ref()));
                let applied = roles
                    .reconcile(cancel, observed.as_ref(), desired.as_ref())
                    .await;
                match applied.state {
                    Some(role) => state.roles.insert(address.clone(), role),
                    None => state.roles.remove(address),
                };
                outcome.diagnostics = applied.diagnostics;
                outcome
            }
        };
        if outcome.diagnostics.has_error() {
            tracing::warn!(kind = outcome.kind, address = %outcome.address, "reconcile failed");
        }
        outcomes.push(outcome);
    }

    (state, outcomes)
}

/// `apply --dry-run`: needs no settings and issues no calls.
pub fn dry_run(args: &ApplyArgs, format: OutputFormat) -> Result<Diagnostics> {
    let declared = load_declaration(&args.desired)?;
    let state = load_state(&args.state)?;
    let outcomes = plan_all(&declared, &state);
    print_outcomes(&outcomes, format)?;
    Ok(collect(outcomes))
}

pub async fn apply(
    shared: Arc<SharedConfig>,
    cancel: &CancellationToken,
    args: &ApplyArgs,
    format: OutputFormat,
) -> Result<Diagnostics> {
    let declared = load_declaration(&args.desired)?;
    let state = load_state(&args.state)?;
    let (state, outcomes) = apply_all(shared, cancel, &declared, state).await;
    save_state(&args.state, &state)?;
    print_outcomes(&outcomes, format)?;

    let failed = outcomes.iter().filter(|o| o.diagnostics.has_error()).count();
    let diagnostics = collect(outcomes);
    if failed == 0 {
        print_success(&format!("State written to {}", args.state.display().to_string().cyan()));
    } else {
        print_warning(&format!("{failed} address(es) failed; state keeps what was confirmed"));
        print_diagnostics(&diagnostics);
    }
    Ok(diagnostics)
}

fn collect(outcomes: Vec<Outcome>) -> Diagnostics {
    let mut all = Diagnostics::new();
    for outcome in outcomes {
        all.append(outcome.diagnostics);
    }
    all
}
