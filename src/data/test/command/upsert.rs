use super::*;

/// Tests upserting a new command definition.
///
/// Expected: Ok with row created and hash persisted
#[tokio::test]
async fn upserts_new_command() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let descriptor = CommandDescriptor::new("alias", "Bind a name").param(
        "name",
        "The name to bind",
        ParamType::String,
        true,
    );

    let repo = CommandRepository::new(db);
    let stored = repo.upsert(server.id, &descriptor).await.unwrap();

    assert_eq!(stored.name, "alias");
    assert_eq!(stored.schema_hash, descriptor.schema_hash());

    Ok(())
}

/// Tests that a schema change replaces the stored definition in place.
///
/// Verifies the composite `(server_id, name)` key prevents duplicates and
/// that the stored hash follows the definition.
///
/// Expected: Ok with one row and the new hash
#[tokio::test]
async fn schema_change_replaces_definition() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let repo = CommandRepository::new(db);

    let original = CommandDescriptor::new("status", "Show sync status");
    repo.upsert(server.id, &original).await.unwrap();

    let changed =
        CommandDescriptor::new("status", "Show sync status").param("verbose", "", ParamType::Boolean, false);
    let stored = repo.upsert(server.id, &changed).await.unwrap();

    assert_ne!(original.schema_hash(), stored.schema_hash);
    assert_eq!(stored.schema_hash, changed.schema_hash());

    let all = repo.list_for_server(server.id).await.unwrap();
    assert_eq!(all.len(), 1);

    Ok(())
}
