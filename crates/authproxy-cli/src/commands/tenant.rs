use std::sync::Arc;

use anyhow::Result;
use authproxy_client::{CancellationToken, SharedConfig};
use authproxy_core::{Applied, Diagnostics, Tenant};
use authproxy_reconciler::{TenantLookup, TenantReconciler};
use colored::Colorize;

use crate::cli::{OutputFormat, TenantCommands};
use crate::output::{print_diagnostics, print_success, print_tenants};

pub async fn run(
    shared: Arc<SharedConfig>,
    cancel: &CancellationToken,
    command: &TenantCommands,
    format: OutputFormat,
) -> Result<Diagnostics> {
    let tenants = TenantReconciler::new(shared.clone());
    let (verb, applied) = match command {
        TenantCommands::Create { name } => ("Created", tenants.create(cancel, &Tenant::new(name)).await),
        TenantCommands::Read { name } => ("Read", tenants.read(cancel, &Tenant::new(name)).await),
        TenantCommands::Update { name, new_name } => (
            "Renamed",
            tenants
                .update(cancel, &Tenant::new(name), &Tenant::new(new_name))
                .await,
        ),
        TenantCommands::Delete { name } => ("Deleted", tenants.delete(cancel, &Tenant::new(name)).await),
        TenantCommands::Import { id } => {
            let imported = tenants.import(id);
            ("Imported", tenants.read(cancel, &imported).await)
        }
        TenantCommands::Lookup { name } => {
            let found = TenantLookup::new(shared).lookup(cancel, name).await;
            return report(
                "Found",
                found.map(|t| t.into_iter().collect::<Vec<_>>()),
                format,
            );
        }
    };
    report(verb, applied.map(|t| vec![t]), format)
}

fn report(verb: &str, applied: Applied<Vec<Tenant>>, format: OutputFormat) -> Result<Diagnostics> {
    print_diagnostics(&applied.diagnostics);
    if applied.is_success() {
        for tenant in &applied.state {
            print_success(&format!(
                "{verb} tenant {} (id {})",
                tenant.name.cyan(),
                tenant.id().unwrap_or("-").cyan()
            ));
        }
        print_tenants(&applied.state, format)?;
    }
    Ok(applied.diagnostics)
}
