use super::*;

/// Tests retiring every binding that targets a removed server.
///
/// Bindings pointing at the removed server are deactivated in all scopes;
/// bindings pointing elsewhere stay active.
///
/// Expected: Ok(2), unrelated binding untouched
#[tokio::test]
async fn deactivates_bindings_targeting_the_server() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let removed = factory::server::create_server(db).await?;
    let other = factory::server::create_server(db).await?;

    factory::name_index::NameIndexFactory::new(db, removed.id, removed.id)
        .raw_name("Own Name")
        .build()
        .await?;
    factory::name_index::NameIndexFactory::new(db, other.id, removed.id)
        .raw_name("Cross Alias")
        .build()
        .await?;
    factory::name_index::NameIndexFactory::new(db, other.id, other.id)
        .raw_name("Unrelated")
        .build()
        .await?;

    let repo = NameIndexRepository::new(db);
    let retired = repo.deactivate_for_server(removed.id).await.unwrap();

    assert_eq!(retired, 2);

    let unrelated = repo.find_active(Scope(other.id), "Unrelated").await.unwrap();
    assert_eq!(unrelated.len(), 1);

    let cross = repo.find_active(Scope(other.id), "Cross Alias").await.unwrap();
    assert!(cross.is_empty());

    Ok(())
}
