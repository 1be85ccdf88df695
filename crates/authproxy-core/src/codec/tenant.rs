//! Tenant wire shapes.
//!
//! | Operation | Call | Body | Success |
//! |---|---|---|---|
//! | create | `POST /tenants` | `{tenant}` | `{id}` |
//! | read | `GET /tenants/{name}` | - | `{id,name}` |
//! | update | `PATCH /tenants` | `{tenant,new_tenant}` | `{id}` |
//! | delete | `DELETE /tenants/{name}` | - | `{id,name}` |

use serde::{Deserialize, Serialize};

use super::{IdResponse, Method, RemoteCall, decode, require_key};
use crate::error::ReconcileError;
use crate::model::Tenant;

const COLLECTION: &str = "tenants";

#[derive(Debug, Serialize)]
struct CreateRequest<'a> {
    tenant: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateRequest<'a> {
    tenant: &'a str,
    new_tenant: &'a str,
}

/// Body returned by read and delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TenantResponse {
    pub id: String,
    pub name: String,
}

impl From<TenantResponse> for Tenant {
    fn from(resp: TenantResponse) -> Self {
        Tenant {
            id: Some(resp.id),
            name: resp.name,
        }
    }
}

/// # Errors
///
/// Fails when the name is empty or the body cannot be serialized.
pub fn create(desired: &Tenant) -> Result<RemoteCall, ReconcileError> {
    require_key(&desired.name, "tenant name")?;
    RemoteCall::new(Method::Post, [COLLECTION]).with_json(&CreateRequest {
        tenant: &desired.name,
    })
}

/// Addresses by name, or by id for a descriptor that only carries an id.
///
/// Both forms share `GET /tenants/{key}`, so the remote resolves the key as a
/// name first. Reading an imported id that equals another tenant's name
/// returns that tenant; the read then records an identity-drift warning.
///
/// # Errors
///
/// Fails when neither name nor id is known.
pub fn read(tenant: &Tenant) -> Result<RemoteCall, ReconcileError> {
    Ok(RemoteCall::new(Method::Get, [COLLECTION, address(tenant)?]))
}

/// Rename request driven by `old.name -> desired.name`.
///
/// # Errors
///
/// Fails when either name is empty.
pub fn update(old: &Tenant, desired: &Tenant) -> Result<RemoteCall, ReconcileError> {
    require_key(&old.name, "previous tenant name")?;
    require_key(&desired.name, "tenant name")?;
    RemoteCall::new(Method::Patch, [COLLECTION]).with_json(&UpdateRequest {
        tenant: &old.name,
        new_tenant: &desired.name,
    })
}

/// # Errors
///
/// Fails when the name is empty.
pub fn delete(tenant: &Tenant) -> Result<RemoteCall, ReconcileError> {
    require_key(&tenant.name, "tenant name")?;
    Ok(RemoteCall::new(Method::Delete, [COLLECTION, tenant.name.as_str()]))
}

/// # Errors
///
/// Returns `ReconcileError::Decode` for a body that is not `{id}`.
pub fn decode_id(body: &[u8]) -> Result<String, ReconcileError> {
    decode::<IdResponse>(body).map(|resp| resp.id)
}

/// # Errors
///
/// Returns `ReconcileError::Decode` for a body that is not `{id,name}`.
pub fn decode_tenant(body: &[u8]) -> Result<TenantResponse, ReconcileError> {
    decode(body)
}

fn address(tenant: &Tenant) -> Result<&str, ReconcileError> {
    if tenant.has_key() {
        return Ok(&tenant.name);
    }
    tenant
        .id()
        .ok_or_else(|| ReconcileError::invalid_descriptor("tenant has neither name nor id"))
}
