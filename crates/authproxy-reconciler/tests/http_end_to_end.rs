//! Reconcilers over the real HTTP transport against a mock admin API.

use authproxy_client::{CancellationToken, ProviderSettings, SharedConfig};
use authproxy_core::{ErrorKind, Role, Tenant};
use authproxy_reconciler::{RoleReconciler, TenantReconciler};
use serde_json::json;
use wiremock::matchers::{basic_auth, body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn shared_for(server: &MockServer) -> std::sync::Arc<SharedConfig> {
    let settings = ProviderSettings {
        endpoint: server.uri(),
        username: "admin".into(),
        password: "secret".into(),
        ..ProviderSettings::default()
    };
    SharedConfig::from_settings(&settings).unwrap().into_shared()
}

#[tokio::test]
async fn test_tenant_and_role_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenants"))
        .and(basic_auth("admin", "secret"))
        .and(body_json(json!({"tenant": "lidl"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "t-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/roles"))
        .and(basic_auth("admin", "secret"))
        .and(body_json(
            json!({"name": "cashier", "tenant": "lidl", "scopes": ["read", "write"]}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "r-1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tenants/lidl/roles/cashier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"id": "r-1", "name": "cashier", "tenant": "lidl", "scopes": ["read", "write"]}),
        ))
        .mount(&server)
        .await;

    let shared = shared_for(&server);
    let cancel = CancellationToken::new();

    let tenant = TenantReconciler::new(shared.clone())
        .create(&cancel, &Tenant::new("lidl"))
        .await;
    assert!(tenant.is_success());
    assert_eq!(tenant.state.id(), Some("t-1"));

    let roles = RoleReconciler::new(shared);
    let desired = Role::new("lidl", "cashier").with_scopes(["read", "write"]);
    let created = roles.create(&cancel, &desired).await;
    assert!(created.is_success());

    let read = roles.read(&cancel, &created.state).await;
    assert!(read.is_success());
    assert_eq!(read.state, desired.with_id("r-1"));
}

#[tokio::test]
async fn test_conflict_surfaces_remote_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/tenants"))
        .respond_with(ResponseTemplate::new(409).set_body_string("tenant already exists"))
        .mount(&server)
        .await;

    let applied = TenantReconciler::new(shared_for(&server))
        .create(&CancellationToken::new(), &Tenant::new("lidl"))
        .await;

    assert_eq!(applied.state.id, None);
    let diag = applied.diagnostics.errors().next().unwrap();
    assert_eq!(diag.kind, Some(ErrorKind::RemoteRejected));
    assert_eq!(diag.summary, "Unable to create tenant");
    assert!(diag.detail.contains("409"));
    assert!(diag.detail.contains("tenant already exists"));
}

#[tokio::test]
async fn test_malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/tenants/lidl"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let current = Tenant::new("lidl").with_id("t-1");
    let applied = TenantReconciler::new(shared_for(&server))
        .read(&CancellationToken::new(), &current)
        .await;

    assert!(applied.diagnostics.contains_kind(ErrorKind::Decode));
    assert_eq!(applied.state, current);
}
