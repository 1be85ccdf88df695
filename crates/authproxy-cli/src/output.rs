use anyhow::Result;
use authproxy_core::{Diagnostics, Role, Severity, Tenant};
use colored::Colorize;
use serde::Serialize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::OutputFormat;
use crate::commands::apply::Outcome;

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

pub fn print_diagnostics(diagnostics: &Diagnostics) {
    for diag in diagnostics {
        let line = format!("{}: {}", diag.summary, diag.detail);
        match diag.severity {
            Severity::Error => print_error(&line),
            Severity::Warning => print_warning(&line),
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_table(header: &[&str], rows: Vec<Vec<String>>) {
    if rows.is_empty() {
        println!("Nothing to show.");
        return;
    }
    let mut builder = Builder::default();
    builder.push_record(header.iter().copied());
    for row in rows {
        builder.push_record(row);
    }
    let table = builder.build().with(Style::rounded()).to_string();
    println!("{table}");
}

fn id_or_dash(id: Option<&str>) -> String {
    id.unwrap_or("-").to_string()
}

pub fn print_tenants(tenants: &[Tenant], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => match tenants {
            [one] => print_json(one),
            many => print_json(many),
        },
        OutputFormat::Table => {
            let rows = tenants
                .iter()
                .map(|t| vec![id_or_dash(t.id()), t.name.clone()])
                .collect();
            print_table(&["ID", "Name"], rows);
            Ok(())
        }
    }
}

pub fn print_roles(roles: &[Role], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => match roles {
            [one] => print_json(one),
            many => print_json(many),
        },
        OutputFormat::Table => {
            let rows = roles
                .iter()
                .map(|r| {
                    let scopes: Vec<&str> = r.scopes.iter().map(String::as_str).collect();
                    vec![
                        id_or_dash(r.id()),
                        r.tenant.clone(),
                        r.name.clone(),
                        scopes.join(", "),
                    ]
                })
                .collect();
            print_table(&["ID", "Tenant", "Name", "Scopes"], rows);
            Ok(())
        }
    }
}

pub fn print_outcomes(outcomes: &[Outcome], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(outcomes),
        OutputFormat::Table => {
            let rows = outcomes
                .iter()
                .map(|o| {
                    let status = if o.diagnostics.has_error() {
                        "failed".red().to_string()
                    } else {
                        "ok".green().to_string()
                    };
                    vec![
                        o.kind.to_string(),
                        o.address.clone(),
                        o.actions.join(", "),
                        o.calls.join("\n"),
                        status,
                    ]
                })
                .collect();
            print_table(&["Kind", "Address", "Actions", "Calls", "Status"], rows);
            Ok(())
        }
    }
}
