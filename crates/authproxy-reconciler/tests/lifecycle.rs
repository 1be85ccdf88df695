//! Lifecycle properties checked against an in-memory admin API.

mod common;

use authproxy_client::CancellationToken;
use authproxy_core::{ErrorKind, Role, Tenant};
use authproxy_reconciler::{RoleReconciler, TenantLookup, TenantReconciler, plan_tenant};
use common::FakeAdminApi;

fn not_found(diags: &authproxy_core::Diagnostics) -> bool {
    diags
        .errors()
        .any(|d| d.kind == Some(ErrorKind::RemoteRejected) && d.detail.contains("404"))
}

#[tokio::test]
async fn test_create_then_read_round_trips() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();

    let created = tenants.create(&cancel, &Tenant::new("lidl")).await;
    assert!(created.is_success());
    let id = created.state.id().unwrap().to_owned();

    let read = tenants.read(&cancel, &Tenant::new("lidl")).await;
    assert!(read.is_success());
    assert_eq!(read.state.id(), Some(id.as_str()));
    assert_eq!(read.state.name, "lidl");
}

#[tokio::test]
async fn test_duplicate_create_is_rejected_without_id() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();

    assert!(tenants.create(&cancel, &Tenant::new("lidl")).await.is_success());
    let again = tenants.create(&cancel, &Tenant::new("lidl")).await;

    assert!(!again.is_success());
    assert!(again.diagnostics.contains_kind(ErrorKind::RemoteRejected));
    assert_eq!(again.state.id, None);
    assert_eq!(api.tenant_count(), 1);
}

#[tokio::test]
async fn test_rename_keeps_id_and_frees_old_name() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();

    let created = tenants.create(&cancel, &Tenant::new("a")).await.state;
    let renamed = tenants.update(&cancel, &created, &Tenant::new("b")).await;
    assert!(renamed.is_success());

    let read_b = tenants.read(&cancel, &Tenant::new("b")).await;
    assert_eq!(read_b.state.id, created.id);

    let read_a = tenants.read(&cancel, &Tenant::new("a")).await;
    assert!(!read_a.is_success());
    assert!(not_found(&read_a.diagnostics));
}

#[tokio::test]
async fn test_delete_then_read_is_rejected() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();

    let created = tenants.create(&cancel, &Tenant::new("lidl")).await.state;
    let deleted = tenants.delete(&cancel, &created).await;
    assert!(deleted.is_success());
    assert_eq!(deleted.state.id, created.id);

    let read = tenants.read(&cancel, &Tenant::new("lidl")).await;
    assert!(read.diagnostics.contains_kind(ErrorKind::RemoteRejected));
    assert!(not_found(&read.diagnostics));
}

#[tokio::test]
async fn test_role_scopes_keep_their_order() {
    let api = FakeAdminApi::new();
    let shared = api.shared();
    let cancel = CancellationToken::new();
    TenantReconciler::new(shared.clone())
        .create(&cancel, &Tenant::new("lidl"))
        .await;
    let roles = RoleReconciler::new(shared);

    let desired = Role::new("lidl", "cashier").with_scopes(["read", "write"]);
    let created = roles.create(&cancel, &desired).await;
    assert!(created.is_success());

    let read = roles.read(&cancel, &Role::new("lidl", "cashier")).await;
    assert_eq!(read.state.scopes.as_slice(), ["read", "write"]);

    let reordered = Role::new("lidl", "cashier").with_scopes(["write", "read"]);
    let updated = roles.update(&cancel, &read.state, &reordered).await;
    assert!(updated.is_success());
    let read = roles.read(&cancel, &updated.state).await;
    assert_eq!(read.state.scopes.as_slice(), ["write", "read"]);
}

#[tokio::test]
async fn test_import_then_read_populates_fields() {
    let api = FakeAdminApi::new();
    let shared = api.shared();
    let cancel = CancellationToken::new();
    let tenants = TenantReconciler::new(shared.clone());
    let roles = RoleReconciler::new(shared);

    let tenant = tenants.create(&cancel, &Tenant::new("lidl")).await.state;
    let role = roles
        .create(
            &cancel,
            &Role::new("lidl", "cashier").with_scopes(["read", "audit"]),
        )
        .await
        .state;

    let imported = tenants.import(tenant.id().unwrap());
    let read = tenants.read(&cancel, &imported).await;
    assert!(read.is_success());
    assert_eq!(read.state, tenant);

    let imported = roles.import(role.id().unwrap());
    assert!(imported.name.is_empty());
    let read = roles.read(&cancel, &imported).await;
    assert!(read.is_success());
    assert_eq!(read.state, role);
}

#[tokio::test]
async fn test_concurrent_creates_share_config() {
    let api = FakeAdminApi::new();
    let shared = api.shared();
    let cancel = CancellationToken::new();
    let first = TenantReconciler::new(shared.clone());
    let second = TenantReconciler::new(shared);

    let lidl = Tenant::new("lidl");
    let aldi = Tenant::new("aldi");
    let (a, b) = tokio::join!(
        first.create(&cancel, &lidl),
        second.create(&cancel, &aldi),
    );

    assert!(a.is_success());
    assert!(b.is_success());
    assert_ne!(a.state.id, b.state.id);
    assert_eq!(api.tenant_count(), 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_across_tasks() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let tenants = tenants.clone();
            tokio::spawn(async move {
                tenants
                    .create(&CancellationToken::new(), &Tenant::new(format!("t{i}")))
                    .await
            })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let applied = handle.await.unwrap();
        assert!(applied.is_success());
        ids.push(applied.state.id.unwrap());
    }
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 8);
}

#[tokio::test]
async fn test_reconcile_converges_and_plans_noop() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();

    let desired = Tenant::new("lidl");
    let created = tenants.reconcile(&cancel, None, Some(&desired)).await;
    let observed = created.state.unwrap();

    let renamed = tenants
        .reconcile(&cancel, Some(&observed), Some(&Tenant::new("lidl-de")))
        .await;
    let observed = renamed.state.unwrap();
    assert_eq!(observed.name, "lidl-de");

    let plan = plan_tenant(Some(&observed), Some(&Tenant::new("lidl-de"))).unwrap();
    assert!(plan.is_noop());

    let gone = tenants.reconcile(&cancel, Some(&observed), None).await;
    assert!(gone.is_success());
    assert_eq!(gone.state, None);
    assert_eq!(api.tenant_count(), 0);
}

#[tokio::test]
async fn test_role_moves_between_tenants() {
    let api = FakeAdminApi::new();
    let shared = api.shared();
    let cancel = CancellationToken::new();
    let tenants = TenantReconciler::new(shared.clone());
    let roles = RoleReconciler::new(shared);
    tenants.create(&cancel, &Tenant::new("lidl")).await;
    tenants.create(&cancel, &Tenant::new("aldi")).await;

    let observed = roles
        .create(&cancel, &Role::new("lidl", "cashier"))
        .await
        .state;
    let moved = roles
        .reconcile(&cancel, Some(&observed), Some(&Role::new("aldi", "cashier")))
        .await;

    assert!(moved.is_success());
    let moved = moved.state.unwrap();
    assert_eq!(moved.tenant, "aldi");
    assert_ne!(moved.id, observed.id);
    assert_eq!(api.role_count(), 1);
}

#[tokio::test]
async fn test_lookup_reads_existing_tenant() {
    let api = FakeAdminApi::new();
    let shared = api.shared();
    let cancel = CancellationToken::new();
    let created = TenantReconciler::new(shared.clone())
        .create(&cancel, &Tenant::new("lidl"))
        .await
        .state;

    let found = TenantLookup::new(shared).lookup(&cancel, "lidl").await;
    assert_eq!(found.state, Some(created));
}

#[tokio::test]
async fn test_cancelled_operation_issues_no_call() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let applied = tenants.create(&cancel, &Tenant::new("lidl")).await;

    assert!(applied.diagnostics.contains_kind(ErrorKind::Cancelled));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_name_shadows_imported_id() {
    let api = FakeAdminApi::new();
    let tenants = TenantReconciler::new(api.shared());
    let cancel = CancellationToken::new();

    let first = tenants.create(&cancel, &Tenant::new("lidl")).await.state;
    let first_id = first.id().unwrap().to_owned();
    let shadow = tenants.create(&cancel, &Tenant::new(first_id.clone())).await.state;

    let by_name = tenants.read(&cancel, &Tenant::new(first_id.clone())).await;
    assert_eq!(by_name.state, shadow);
    assert!(by_name.diagnostics.is_empty());

    let imported = tenants.read(&cancel, &tenants.import(&first_id)).await;
    assert_eq!(imported.state.name, first_id);
    assert_eq!(imported.state.id(), Some(first_id.as_str()));
    assert!(imported.is_success());
    let drift: Vec<_> = imported.diagnostics.warnings().collect();
    assert_eq!(drift.len(), 1);
    assert_eq!(drift[0].summary, "Identity drift");
}
