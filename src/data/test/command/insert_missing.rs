use super::*;

/// Tests seeding defaults into an empty server.
///
/// Expected: Ok(2) with both commands present
#[tokio::test]
async fn seeds_all_into_empty_server() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let defaults = vec![
        CommandDescriptor::new("alias", "Bind a name"),
        CommandDescriptor::new("status", "Show sync status"),
    ];

    let repo = CommandRepository::new(db);
    let inserted = repo.insert_missing(server.id, &defaults).await.unwrap();

    assert_eq!(inserted, 2);
    assert_eq!(repo.list_for_server(server.id).await.unwrap().len(), 2);

    Ok(())
}

/// Tests that seeding never overwrites an existing definition.
///
/// A server admin may have customized a command; re-seeding on every sync
/// must leave it alone and only add what is missing.
///
/// Expected: Ok(1), customized definition untouched
#[tokio::test]
async fn never_overwrites_existing_definitions() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let repo = CommandRepository::new(db);

    let customized = CommandDescriptor::new("alias", "Customized description").param(
        "name",
        "",
        ParamType::String,
        true,
    );
    repo.upsert(server.id, &customized).await.unwrap();

    let defaults = vec![
        CommandDescriptor::new("alias", "Bind a name"),
        CommandDescriptor::new("status", "Show sync status"),
    ];
    let inserted = repo.insert_missing(server.id, &defaults).await.unwrap();

    assert_eq!(inserted, 1);

    let stored = repo.list_for_server(server.id).await.unwrap();
    let alias = stored.iter().find(|c| c.name == "alias").unwrap();
    assert_eq!(alias.description, "Customized description");

    Ok(())
}
