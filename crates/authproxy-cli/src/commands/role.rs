use std::sync::Arc;

use anyhow::Result;
use authproxy_client::{CancellationToken, SharedConfig};
use authproxy_core::{Applied, Diagnostics, Role};
use authproxy_reconciler::RoleReconciler;
use colored::Colorize;

use crate::cli::{OutputFormat, RoleCommands};
use crate::output::{print_diagnostics, print_roles, print_success};

pub async fn run(
    shared: Arc<SharedConfig>,
    cancel: &CancellationToken,
    command: &RoleCommands,
    format: OutputFormat,
) -> Result<Diagnostics> {
    let roles = RoleReconciler::new(shared);
    let (verb, applied) = match command {
        RoleCommands::Create {
            tenant,
            name,
            scopes,
        } => {
            let desired = Role::new(tenant, name).with_scopes(scopes.iter().cloned());
            ("Created", roles.create(cancel, &desired).await)
        }
        RoleCommands::Read { tenant, name } => {
            ("Read", roles.read(cancel, &Role::new(tenant, name)).await)
        }
        RoleCommands::Update {
            tenant,
            name,
            new_name,
            scopes,
        } => {
            let old = Role::new(tenant, name);
            let desired = Role::new(tenant, new_name.as_deref().unwrap_or(name))
                .with_scopes(scopes.iter().cloned());
            ("Updated", roles.update(cancel, &old, &desired).await)
        }
        RoleCommands::Delete { tenant, name } => {
            ("Deleted", roles.delete(cancel, &Role::new(tenant, name)).await)
        }
        RoleCommands::Import { id } => {
            let imported = roles.import(id);
            ("Imported", roles.read(cancel, &imported).await)
        }
    };
    report(verb, applied, format)
}

fn report(verb: &str, applied: Applied<Role>, format: OutputFormat) -> Result<Diagnostics> {
    print_diagnostics(&applied.diagnostics);
    if applied.is_success() {
        let role = &applied.state;
        print_success(&format!(
            "{verb} role {}/{} (id {})",
            role.tenant.cyan(),
            role.name.cyan(),
            role.id().unwrap_or("-").cyan()
        ));
        print_roles(std::slice::from_ref(role), format)?;
    }
    Ok(applied.diagnostics)
}
