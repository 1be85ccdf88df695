//! In-memory admin API used by the reconciler integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use authproxy_client::{CancellationToken, Credentials, Exchange, SharedConfig, Transport};
use authproxy_core::{Method, ReconcileError, RemoteCall};
use serde_json::{Value, json};
use url::Url;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredTenant {
    id: String,
    name: String,
}

#[derive(Debug, Clone)]
struct StoredRole {
    id: String,
    name: String,
    tenant: String,
    scopes: Vec<String>,
}

#[derive(Debug, Default)]
struct Store {
    tenants: Vec<StoredTenant>,
    roles: Vec<StoredRole>,
    calls: Vec<RemoteCall>,
}

/// Fake admin API: uuid ids, 409 on duplicates, 404 on unknown entities.
#[derive(Debug, Default)]
pub struct FakeAdminApi {
    store: Mutex<Store>,
}

fn ok(body: Value) -> Exchange {
    Exchange::new(200, body.to_string())
}

fn status(code: u16, message: &str) -> Exchange {
    Exchange::new(code, json!({ "error": message }).to_string())
}

fn field<'a>(body: Option<&'a Value>, key: &str) -> Option<&'a str> {
    body.and_then(|b| b.get(key)).and_then(Value::as_str)
}

fn scopes(body: Option<&Value>) -> Vec<String> {
    body.and_then(|b| b.get("scopes"))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn role_json(role: &StoredRole) -> Value {
    json!({
        "id": role.id,
        "name": role.name,
        "tenant": role.tenant,
        "scopes": role.scopes,
    })
}

impl FakeAdminApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn shared(self: &Arc<Self>) -> Arc<SharedConfig> {
        SharedConfig::with_transport(
            Url::parse("http://authproxy.test").unwrap(),
            Credentials::basic("admin", "secret"),
            self.clone(),
        )
        .into_shared()
    }

    pub fn calls(&self) -> Vec<RemoteCall> {
        self.store.lock().unwrap().calls.clone()
    }

    pub fn tenant_count(&self) -> usize {
        self.store.lock().unwrap().tenants.len()
    }

    pub fn role_count(&self) -> usize {
        self.store.lock().unwrap().roles.len()
    }

    fn handle(store: &mut Store, call: &RemoteCall) -> Exchange {
        let body = call.body.as_ref();
        let segments: Vec<&str> = call.segments.iter().map(String::as_str).collect();
        match (call.method, segments.as_slice()) {
            (Method::Post, ["tenants"]) => {
                let Some(name) = field(body, "tenant") else {
                    return status(400, "missing tenant");
                };
                if store.tenants.iter().any(|t| t.name == name) {
                    return status(409, "tenant already exists");
                }
                let id = Uuid::new_v4().to_string();
                store.tenants.push(StoredTenant {
                    id: id.clone(),
                    name: name.to_owned(),
                });
                ok(json!({ "id": id }))
            }
            // Names shadow ids: a key is tried as an id only when no tenant has
            // that name.
            (Method::Get, ["tenants", key]) => store
                .tenants
                .iter()
                .find(|t| t.name == *key)
                .or_else(|| store.tenants.iter().find(|t| t.id == *key))
                .map_or_else(
                    || status(404, "tenant not found"),
                    |t| ok(json!({ "id": t.id, "name": t.name })),
                ),
            (Method::Patch, ["tenants"]) => {
                let (Some(old), Some(new)) = (field(body, "tenant"), field(body, "new_tenant"))
                else {
                    return status(400, "missing tenant");
                };
                if old != new && store.tenants.iter().any(|t| t.name == new) {
                    return status(409, "tenant already exists");
                }
                let Some(tenant) = store.tenants.iter_mut().find(|t| t.name == old) else {
                    return status(404, "tenant not found");
                };
                tenant.name = new.to_owned();
                let id = tenant.id.clone();
                for role in store.roles.iter_mut().filter(|r| r.tenant == old) {
                    role.tenant = new.to_owned();
                }
                ok(json!({ "id": id }))
            }
            (Method::Delete, ["tenants", name]) => {
                let Some(pos) = store.tenants.iter().position(|t| t.name == *name) else {
                    return status(404, "tenant not found");
                };
                let removed = store.tenants.remove(pos);
                store.roles.retain(|r| r.tenant != removed.name);
                ok(json!({ "id": removed.id, "name": removed.name }))
            }
            (Method::Post, ["roles"]) => {
                let (Some(name), Some(tenant)) = (field(body, "name"), field(body, "tenant")) else {
                    return status(400, "missing role key");
                };
                if !store.tenants.iter().any(|t| t.name == tenant) {
                    return status(404, "tenant not found");
                }
                if store
                    .roles
                    .iter()
                    .any(|r| r.tenant == tenant && r.name == name)
                {
                    return status(409, "role already exists");
                }
                let id = Uuid::new_v4().to_string();
                store.roles.push(StoredRole {
                    id: id.clone(),
                    name: name.to_owned(),
                    tenant: tenant.to_owned(),
                    scopes: scopes(body),
                });
                ok(json!({ "id": id }))
            }
            (Method::Get, ["roles", id]) => store
                .roles
                .iter()
                .find(|r| r.id == *id)
                .map_or_else(|| status(404, "role not found"), |r| ok(role_json(r))),
            (Method::Get, ["tenants", tenant, "roles", name]) => store
                .roles
                .iter()
                .find(|r| r.tenant == *tenant && r.name == *name)
                .map_or_else(|| status(404, "role not found"), |r| ok(role_json(r))),
            (Method::Patch, ["tenants", tenant, "roles", name]) => {
                let Some(new_name) = field(body, "new_name") else {
                    return status(400, "missing new_name");
                };
                if new_name != *name
                    && store
                        .roles
                        .iter()
                        .any(|r| r.tenant == *tenant && r.name == new_name)
                {
                    return status(409, "role already exists");
                }
                let new_scopes = scopes(body);
                let Some(role) = store
                    .roles
                    .iter_mut()
                    .find(|r| r.tenant == *tenant && r.name == *name)
                else {
                    return status(404, "role not found");
                };
                role.name = new_name.to_owned();
                role.scopes = new_scopes;
                ok(json!({ "id": role.id }))
            }
            (Method::Delete, ["tenants", tenant, "roles", name]) => {
                let Some(pos) = store
                    .roles
                    .iter()
                    .position(|r| r.tenant == *tenant && r.name == *name)
                else {
                    return status(404, "role not found");
                };
                let removed = store.roles.remove(pos);
                ok(json!({ "id": removed.id, "name": removed.name }))
            }
            _ => status(404, "no such route"),
        }
    }
}

#[async_trait]
impl Transport for FakeAdminApi {
    async fn execute(
        &self,
        call: &RemoteCall,
        cancel: &CancellationToken,
    ) -> Result<Exchange, ReconcileError> {
        if cancel.is_cancelled() {
            return Err(ReconcileError::Cancelled);
        }
        // Let concurrent callers interleave.
        tokio::task::yield_now().await;
        let mut store = self.store.lock().unwrap();
        store.calls.push(call.clone());
        Ok(Self::handle(&mut store, call))
    }
}
