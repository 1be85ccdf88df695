//! Declaration and state files used by `apply`.
//!
//! Both map a stable address (the table key) to a descriptor, so a rename in
//! the declaration is seen as an update of the same address rather than a
//! delete and create.
//!
//! ```toml
//! [tenants.main]
//! name = "lidl"
//!
//! [roles.cashier]
//! tenant = "lidl"
//! name = "cashier"
//! scopes = ["read", "write"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use authproxy_core::{Role, Tenant};
use serde::{Deserialize, Serialize};

/// Desired tenants and roles, read from TOML.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Declaration {
    #[serde(default)]
    pub tenants: BTreeMap<String, Tenant>,
    #[serde(default)]
    pub roles: BTreeMap<String, Role>,
}

/// Observed tenants and roles as last confirmed by the admin API.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateFile {
    #[serde(default)]
    pub tenants: BTreeMap<String, Tenant>,
    #[serde(default)]
    pub roles: BTreeMap<String, Role>,
}

impl StateFile {
    /// The admin API moves a tenant's roles along when the tenant is renamed.
    pub fn follow_tenant_rename(&mut self, from: &str, to: &str) {
        if from == to {
            return;
        }
        for role in self.roles.values_mut().filter(|r| r.tenant == from) {
            role.tenant = to.to_string();
        }
    }
}

pub fn load_declaration(path: &Path) -> Result<Declaration> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read declaration: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid declaration: {}", path.display()))
}

/// A missing state file is an empty state.
pub fn load_state(path: &Path) -> Result<StateFile> {
    if !path.exists() {
        return Ok(StateFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid state: {}", path.display()))
}

pub fn save_state(path: &Path, state: &StateFile) -> Result<()> {
    let content = serde_json::to_string_pretty(state)?;
    fs::write(path, content + "\n")
        .with_context(|| format!("Failed to write state: {}", path.display()))
}
