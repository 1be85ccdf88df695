//! Role wire shapes.
//!
//! Roles live under their tenant: read, update and delete are addressed by
//! `(tenant, name)`. Create posts to the flat `/roles` collection with the
//! tenant in the body. A role known only by id (after import) is read from
//! `/roles/{id}`.

use serde::{Deserialize, Serialize};

use super::{IdResponse, Method, RemoteCall, decode, require_key};
use crate::error::ReconcileError;
use crate::model::{Role, Scopes};

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    name: &'a str,
    tenant: &'a str,
    scopes: &'a [String],
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    new_name: &'a str,
    scopes: &'a [String],
}

/// Body returned by read.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleResponse {
    pub id: String,
    pub name: String,
    pub tenant: String,
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl From<RoleResponse> for Role {
    fn from(resp: RoleResponse) -> Self {
        Role {
            id: Some(resp.id),
            name: resp.name,
            tenant: resp.tenant,
            scopes: Scopes::from(resp.scopes),
        }
    }
}

/// Body returned by delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeletedRole {
    pub id: String,
    pub name: String,
}

fn member(tenant: &str, name: &str) -> [String; 4] {
    [
        "tenants".to_owned(),
        tenant.to_owned(),
        "roles".to_owned(),
        name.to_owned(),
    ]
}

fn require_compound_key(role: &Role) -> Result<(), ReconcileError> {
    require_key(&role.tenant, "role tenant")?;
    require_key(&role.name, "role name")
}

/// # Errors
///
/// Fails when tenant or name is empty, or the body cannot be serialized.
pub fn create(desired: &Role) -> Result<RemoteCall, ReconcileError> {
    require_compound_key(desired)?;
    RemoteCall::new(Method::Post, ["roles"]).with_json(&CreateRequest {
        name: &desired.name,
        tenant: &desired.tenant,
        scopes: desired.scopes.as_slice(),
    })
}

/// # Errors
///
/// Fails when the role has neither `(tenant, name)` nor an id.
pub fn read(role: &Role) -> Result<RemoteCall, ReconcileError> {
    if role.has_key() {
        return Ok(RemoteCall::new(Method::Get, member(&role.tenant, &role.name)));
    }
    match role.id() {
        Some(id) => Ok(RemoteCall::new(Method::Get, ["roles", id])),
        None => Err(ReconcileError::invalid_descriptor(
            "role has neither (tenant, name) nor id",
        )),
    }
}

/// Rename and/or rescope `old` in place. The tenant cannot change here.
///
/// # Errors
///
/// Fails when either key is incomplete or the tenants differ.
pub fn update(old: &Role, desired: &Role) -> Result<RemoteCall, ReconcileError> {
    require_compound_key(old)?;
    require_compound_key(desired)?;
    if old.tenant != desired.tenant {
        return Err(ReconcileError::invalid_descriptor(format!(
            "role cannot move from tenant {} to {} in place",
            old.tenant, desired.tenant
        )));
    }
    RemoteCall::new(Method::Patch, member(&old.tenant, &old.name)).with_json(&UpdateRequest {
        new_name: &desired.name,
        scopes: desired.scopes.as_slice(),
    })
}

/// # Errors
///
/// Fails when tenant or name is empty.
pub fn delete(role: &Role) -> Result<RemoteCall, ReconcileError> {
    require_compound_key(role)?;
    Ok(RemoteCall::new(Method::Delete, member(&role.tenant, &role.name)))
}

/// # Errors
///
/// Returns `ReconcileError::Decode` for a body that is not `{id}`.
pub fn decode_id(body: &[u8]) -> Result<String, ReconcileError> {
    decode::<IdResponse>(body).map(|resp| resp.id)
}

/// # Errors
///
/// Returns `ReconcileError::Decode` for a body that is not a full role.
pub fn decode_role(body: &[u8]) -> Result<RoleResponse, ReconcileError> {
    decode(body)
}

/// # Errors
///
/// Returns `ReconcileError::Decode` for a body that is not `{id,name}`.
pub fn decode_deleted(body: &[u8]) -> Result<DeletedRole, ReconcileError> {
    decode(body)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_create_body_keeps_scope_order() {
        let role = Role::new("lidl", "cashier").with_scopes(["write", "read"]);
        let call = create(&role).unwrap();
        assert_eq!(call.path(), "/roles");
        assert_eq!(
            call.body,
            Some(json!({"name": "cashier", "tenant": "lidl", "scopes": ["write", "read"]}))
        );
    }

    #[test]
    fn test_read_paths() {
        let call = read(&Role::new("lidl", "cashier")).unwrap();
        assert_eq!(call.path(), "/tenants/lidl/roles/cashier");

        let call = read(&Role::imported("r-1")).unwrap();
        assert_eq!(call.path(), "/roles/r-1");

        assert!(read(&Role::default()).is_err());
    }

    #[test]
    fn test_update_is_role_scoped() {
        let old = Role::new("lidl", "cashier").with_scopes(["read"]);
        let desired = Role::new("lidl", "clerk").with_scopes(["read", "write"]);
        let call = update(&old, &desired).unwrap();
        assert_eq!(call.method, Method::Patch);
        assert_eq!(call.path(), "/tenants/lidl/roles/cashier");
        assert_eq!(
            call.body,
            Some(json!({"new_name": "clerk", "scopes": ["read", "write"]}))
        );
    }

    #[test]
    fn test_update_rejects_tenant_move() {
        let err = update(&Role::new("lidl", "a"), &Role::new("aldi", "a")).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidDescriptor);
    }

    #[test]
    fn test_delete_path() {
        let call = delete(&Role::new("lidl", "cashier")).unwrap();
        assert_eq!(call.to_string(), "DELETE /tenants/lidl/roles/cashier");
        assert!(delete(&Role::imported("r-1")).is_err());
    }

    #[test]
    fn test_decode_role_preserves_scope_order() {
        let role: Role = decode_role(
            br#"{"id":"r-1","name":"cashier","tenant":"lidl","scopes":["z","a","m"]}"#,
        )
        .unwrap()
        .into();
        assert_eq!(role.scopes.as_slice(), ["z", "a", "m"]);
        assert_eq!(role.id(), Some("r-1"));
    }
}
