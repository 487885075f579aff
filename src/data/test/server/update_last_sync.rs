use super::*;

/// Tests stamping a clean sync.
///
/// Verifies that the nullable last-sync timestamp is populated after the
/// first successful sync.
///
/// Expected: Ok with last_sync_at set
#[tokio::test]
async fn stamps_last_sync() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Server)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    assert!(server.last_sync_at.is_none());

    let before = Utc::now();
    let repo = ServerRepository::new(db);
    repo.update_last_sync(server.id).await.unwrap();

    let stored = repo.get_by_id(server.id).await.unwrap().unwrap();
    let stamped = stored.last_sync_at.expect("last_sync_at should be set");
    assert!(stamped >= before);

    Ok(())
}
