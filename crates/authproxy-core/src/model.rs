//! Desired/observed descriptors for the administered entity kinds.

use serde::{Deserialize, Serialize};

/// A tenant on the admin API.
///
/// `name` is the key used to address the tenant remotely. `id` is assigned by
/// the remote on create (or discovered by read/import) and stays unset until
/// then.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
}

impl Tenant {
    /// Desired tenant with no remote identity yet.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Descriptor seeded with an identifier only, as produced by import.
    #[must_use]
    pub fn imported(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: String::new(),
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether the remote key (`name`) is known.
    #[must_use]
    pub fn has_key(&self) -> bool {
        !self.name.is_empty()
    }

    /// Compares the declared fields, ignoring identity.
    #[must_use]
    pub fn same_declaration(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Ordered list of role scopes.
///
/// Order is kept exactly as given or as returned by the remote; this is a
/// sequence, not a set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Scopes(Vec<String>);

impl Scopes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: impl Into<String>) {
        self.0.push(scope.into());
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for Scopes {
    fn from(scopes: Vec<String>) -> Self {
        Self(scopes)
    }
}

impl<S: Into<String>> FromIterator<S> for Scopes {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Scopes {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A role scoped to a tenant.
///
/// Addressed remotely by `(tenant, name)`. The remote is the only enforcer of
/// `tenant` naming an existing tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub tenant: String,
    #[serde(default)]
    pub scopes: Scopes,
}

impl Role {
    #[must_use]
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            tenant: tenant.into(),
            scopes: Scopes::new(),
        }
    }

    #[must_use]
    pub fn imported(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_scopes<S: Into<String>>(mut self, scopes: impl IntoIterator<Item = S>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Whether the compound remote key `(tenant, name)` is known.
    #[must_use]
    pub fn has_key(&self) -> bool {
        !self.tenant.is_empty() && !self.name.is_empty()
    }

    #[must_use]
    pub fn same_declaration(&self, other: &Self) -> bool {
        self.name == other.name && self.tenant == other.tenant && self.scopes == other.scopes
    }
}
