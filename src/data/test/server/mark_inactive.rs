use super::*;

/// Tests marking a server inactive.
///
/// Verifies that the row is retained with the active flag off rather than
/// deleted, so historical name bindings stay resolvable.
///
/// Expected: Ok, row present and inactive
#[tokio::test]
async fn retains_row_as_inactive() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Server)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;

    let repo = ServerRepository::new(db);
    repo.mark_inactive(server.id).await.unwrap();

    let stored = repo.get_by_id(server.id).await.unwrap().unwrap();
    assert!(!stored.active);

    let active = repo.list_active().await.unwrap();
    assert!(active.is_empty());

    Ok(())
}
