use super::*;

/// Tests the stale-server query behind the resync sweep.
///
/// Verifies that never-synced and long-unsynced active servers are returned
/// while recently synced and inactive servers are not.
///
/// Expected: Ok with exactly the stale active servers
#[tokio::test]
async fn finds_stale_and_never_synced_servers() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::Server)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let never_synced = factory::server::create_server(db).await?;
    let stale = factory::server::ServerFactory::new(db)
        .last_sync_at(Some(Utc::now() - chrono::Duration::hours(2)))
        .build()
        .await?;
    let _fresh = factory::server::ServerFactory::new(db)
        .last_sync_at(Some(Utc::now()))
        .build()
        .await?;
    let _inactive = factory::server::ServerFactory::new(db)
        .active(false)
        .build()
        .await?;

    let cutoff = Utc::now() - chrono::Duration::minutes(30);
    let repo = ServerRepository::new(db);
    let found = repo.list_stale(cutoff).await.unwrap();

    let ids: Vec<i32> = found.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.contains(&never_synced.id));
    assert!(ids.contains(&stale.id));

    Ok(())
}
