use super::*;

/// Tests listing commands scoped to one server.
///
/// Expected: Ok with only the requested server's commands
#[tokio::test]
async fn lists_only_own_commands() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let first = factory::server::create_server(db).await?;
    let second = factory::server::create_server(db).await?;

    let repo = CommandRepository::new(db);
    repo.upsert(first.id, &CommandDescriptor::new("alias", "Bind a name"))
        .await
        .unwrap();
    repo.upsert(second.id, &CommandDescriptor::new("status", "Show sync status"))
        .await
        .unwrap();

    let commands = repo.list_for_server(first.id).await.unwrap();

    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].name, "alias");

    Ok(())
}

/// Tests that round-tripping through storage preserves the schema hash.
///
/// The hash recomputed from the descriptor read back out of the store must
/// match the one computed before persisting, otherwise reconciliation would
/// see phantom changes.
///
/// Expected: Ok with identical hashes
#[tokio::test]
async fn round_trip_preserves_schema_hash() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let descriptor = CommandDescriptor::new("resolve", "Look up a name")
        .param("name", "The name to look up", ParamType::String, true)
        .param("quiet", "Suppress detail", ParamType::Boolean, false);

    let repo = CommandRepository::new(db);
    repo.upsert(server.id, &descriptor).await.unwrap();

    let restored = repo.list_for_server(server.id).await.unwrap();
    assert_eq!(restored[0].schema_hash(), descriptor.schema_hash());

    Ok(())
}
