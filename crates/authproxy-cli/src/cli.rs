use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "authproxy")]
#[command(about = "AuthProxy CLI: manage tenants and roles on the admin API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (defaults to ./authproxy.toml when present)
    #[arg(short, long, global = true, env = "AUTHPROXY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Admin API base URL (overrides the settings file and AUTHPROXY__ENDPOINT)
    #[arg(short, long, global = true)]
    pub endpoint: Option<String>,

    /// Admin username
    #[arg(short, long, global = true)]
    pub username: Option<String>,

    /// Admin password
    #[arg(long, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(short, long, global = true)]
    pub format: Option<OutputFormat>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage tenants
    Tenant(TenantArgs),
    /// Manage roles
    Role(RoleArgs),
    /// Reconcile a declaration file against a state file
    Apply(ApplyArgs),
}

#[derive(clap::Args)]
pub struct TenantArgs {
    #[command(subcommand)]
    pub command: TenantCommands,
}

#[derive(Subcommand)]
pub enum TenantCommands {
    /// Create a tenant
    Create {
        /// Tenant name
        name: String,
    },
    /// Read a tenant by name
    Read {
        /// Tenant name
        name: String,
    },
    /// Rename a tenant
    Update {
        /// Current tenant name
        name: String,
        /// New tenant name
        new_name: String,
    },
    /// Delete a tenant
    Delete {
        /// Tenant name
        name: String,
    },
    /// Adopt an existing tenant by id and read it
    Import {
        /// Remote tenant id
        id: String,
    },
    /// Look up a tenant by name without tracking it
    Lookup {
        /// Tenant name
        name: String,
    },
}

#[derive(clap::Args)]
pub struct RoleArgs {
    #[command(subcommand)]
    pub command: RoleCommands,
}

#[derive(Subcommand)]
pub enum RoleCommands {
    /// Create a role
    Create {
        /// Owning tenant
        tenant: String,
        /// Role name
        name: String,
        /// Scope to grant (repeatable, order is kept)
        #[arg(short, long = "scope")]
        scopes: Vec<String>,
    },
    /// Read a role
    Read {
        /// Owning tenant
        tenant: String,
        /// Role name
        name: String,
    },
    /// Rename and/or rescope a role
    Update {
        /// Owning tenant
        tenant: String,
        /// Current role name
        name: String,
        /// New role name (keeps the current name if omitted)
        #[arg(long)]
        new_name: Option<String>,
        /// Scopes after the update; replaces the current list
        #[arg(short, long = "scope")]
        scopes: Vec<String>,
    },
    /// Delete a role
    Delete {
        /// Owning tenant
        tenant: String,
        /// Role name
        name: String,
    },
    /// Adopt an existing role by id and read it
    Import {
        /// Remote role id
        id: String,
    },
}

#[derive(clap::Args)]
pub struct ApplyArgs {
    /// Declaration file (TOML) listing the desired tenants and roles
    #[arg(long)]
    pub desired: PathBuf,
    /// Observed state file (JSON); created if missing, rewritten after apply
    #[arg(long)]
    pub state: PathBuf,
    /// Print the planned calls without contacting the admin API
    #[arg(long)]
    pub dry_run: bool,
}
