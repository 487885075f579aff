use super::*;

/// Tests the rename-over scenario.
///
/// "Foo" is bound to one server, then re-registered pointing at another.
/// Exactly one active mapping must exist afterward, pointing at the most
/// recently registered server, with the superseded row retained as inactive
/// history.
///
/// Expected: Ok, one active row at the new target, history queryable
#[tokio::test]
async fn rename_over_supersedes_previous_binding() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let scope_server = factory::server::create_server(db).await?;
    let first = factory::server::create_server(db).await?;
    let second = factory::server::create_server(db).await?;
    let scope = Scope(scope_server.id);

    let repo = NameIndexRepository::new(db);
    repo.register(scope, "Foo", first.id).await.unwrap();
    repo.register(scope, "Foo", second.id).await.unwrap();

    let active = repo.find_active(scope, "Foo").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].server_id, second.id);

    let history = repo.history(scope, "Foo").await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].server_id, first.id);
    assert!(!history[0].active);
    assert!(history[0].deactivated_at.is_some());

    Ok(())
}

/// Tests that registering the identical binding twice is a no-op.
///
/// Expected: Ok, single row, no inactive history created
#[tokio::test]
async fn identical_registration_is_idempotent() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let scope = Scope(server.id);

    let repo = NameIndexRepository::new(db);
    let first = repo.register(scope, "Foo", server.id).await.unwrap();
    let second = repo.register(scope, "Foo", server.id).await.unwrap();

    assert_eq!(first.id, second.id);

    let history = repo.history(scope, "Foo").await.unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].active);

    Ok(())
}

/// Tests that repeated registrations leave exactly one active mapping.
///
/// For any sequence of register calls with the same (name, scope), exactly
/// one active mapping exists afterward and it points at the most recently
/// registered server.
///
/// Expected: Ok, one active row pointing at the last target
#[tokio::test]
async fn any_sequence_leaves_one_active_mapping() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let scope_server = factory::server::create_server(db).await?;
    let scope = Scope(scope_server.id);
    let mut targets = Vec::new();
    for _ in 0..4 {
        targets.push(factory::server::create_server(db).await?.id);
    }

    let repo = NameIndexRepository::new(db);
    for target in &targets {
        repo.register(scope, "Shared Name", *target).await.unwrap();
    }

    let active = repo.find_active(scope, "Shared Name").await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].server_id, *targets.last().unwrap());

    Ok(())
}

/// Tests that scopes partition the namespace.
///
/// The same name bound in two different scopes yields two independent
/// active mappings.
///
/// Expected: Ok, one active mapping per scope
#[tokio::test]
async fn same_name_in_different_scopes_is_independent() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let scope_a = factory::server::create_server(db).await?;
    let scope_b = factory::server::create_server(db).await?;
    let target_a = factory::server::create_server(db).await?;
    let target_b = factory::server::create_server(db).await?;

    let repo = NameIndexRepository::new(db);
    repo.register(Scope(scope_a.id), "Foo", target_a.id).await.unwrap();
    repo.register(Scope(scope_b.id), "Foo", target_b.id).await.unwrap();

    let in_a = repo.find_active(Scope(scope_a.id), "Foo").await.unwrap();
    let in_b = repo.find_active(Scope(scope_b.id), "Foo").await.unwrap();

    assert_eq!(in_a.len(), 1);
    assert_eq!(in_a[0].server_id, target_a.id);
    assert_eq!(in_b.len(), 1);
    assert_eq!(in_b[0].server_id, target_b.id);

    Ok(())
}
