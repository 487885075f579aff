use super::*;

/// Tests upserting a new server.
///
/// Verifies that the repository creates a new server row with the platform
/// id and display name, active and never synced.
///
/// Expected: Ok with server created
#[tokio::test]
async fn upserts_new_server() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Server)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ServerRepository::new(db);
    let server = repo.upsert("123456789", "Test Server").await.unwrap();

    assert_eq!(server.platform_id, "123456789");
    assert_eq!(server.name, "Test Server");
    assert!(server.active);
    assert!(server.last_sync_at.is_none());

    Ok(())
}

/// Tests upserting an existing server updates the display name.
///
/// Verifies that a second upsert for the same platform id keeps the internal
/// id stable and does not create a duplicate row.
///
/// Expected: Ok with same internal id, new name
#[tokio::test]
async fn rename_keeps_internal_id() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Server)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = ServerRepository::new(db);
    let first = repo.upsert("123456789", "Old Name").await.unwrap();
    let second = repo.upsert("123456789", "New Name").await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "New Name");

    let all = repo.list_active().await.unwrap();
    assert_eq!(all.len(), 1);

    Ok(())
}

/// Tests that a server which left and rejoined is reactivated.
///
/// Expected: Ok with the original row active again
#[tokio::test]
async fn rejoin_reactivates_server() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Server)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let existing = factory::server::ServerFactory::new(db)
        .platform_id("123456789")
        .active(false)
        .build()
        .await?;

    let repo = ServerRepository::new(db);
    let rejoined = repo.upsert("123456789", "Back Again").await.unwrap();

    assert_eq!(rejoined.id, existing.id);
    assert!(rejoined.active);

    Ok(())
}
