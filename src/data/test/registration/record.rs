use super::*;

/// Tests recording a newly confirmed registration.
///
/// Expected: Ok with remote id and hash persisted
#[tokio::test]
async fn records_new_registration() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;

    let repo = RegistrationRepository::new(db);
    let record = repo
        .record(server.id, "alias", "900000001", "hash-a")
        .await
        .unwrap();

    assert_eq!(record.remote_id, "900000001");
    assert_eq!(record.schema_hash, "hash-a");

    Ok(())
}

/// Tests that re-confirming a command updates the belief in place.
///
/// A successful update call carries a new schema hash; the record must be
/// mutated, not duplicated.
///
/// Expected: Ok with one row carrying the new hash
#[tokio::test]
async fn reconfirmation_updates_in_place() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    factory::registration::RegistrationFactory::new(db, server.id, "alias")
        .remote_id("900000001")
        .schema_hash("hash-old")
        .build()
        .await?;

    let repo = RegistrationRepository::new(db);
    repo.record(server.id, "alias", "900000001", "hash-new")
        .await
        .unwrap();

    let all = repo.list_for_server(server.id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].schema_hash, "hash-new");

    Ok(())
}

/// Tests removing a single registration record.
///
/// Expected: Ok with the row gone and siblings untouched
#[tokio::test]
async fn remove_deletes_one_record() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    factory::registration::create_registration(db, server.id, "alias").await?;
    factory::registration::create_registration(db, server.id, "status").await?;

    let repo = RegistrationRepository::new(db);
    repo.remove(server.id, "alias").await.unwrap();

    let remaining = repo.list_for_server(server.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].command_name, "status");

    Ok(())
}
