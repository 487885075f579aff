use super::*;

/// Tests tearing down all belief state for a removed server.
///
/// Verifies that every record for the server goes away while other servers'
/// records are untouched.
///
/// Expected: Ok(2), other server unaffected
#[tokio::test]
async fn deletes_only_the_servers_records() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let leaving = factory::server::create_server(db).await?;
    let staying = factory::server::create_server(db).await?;

    factory::registration::create_registration(db, leaving.id, "alias").await?;
    factory::registration::create_registration(db, leaving.id, "status").await?;
    factory::registration::create_registration(db, staying.id, "alias").await?;

    let repo = RegistrationRepository::new(db);
    let deleted = repo.delete_for_server(leaving.id).await.unwrap();

    assert_eq!(deleted, 2);
    assert!(repo.list_for_server(leaving.id).await.unwrap().is_empty());
    assert_eq!(repo.list_for_server(staying.id).await.unwrap().len(), 1);

    Ok(())
}
