use super::*;

/// Tests case-insensitive lookup.
///
/// A binding registered as "Foo Bar" must be found by any casing and with
/// surrounding whitespace, while the stored raw form keeps the original
/// casing for display.
///
/// Expected: Ok with the binding found under every variant
#[tokio::test]
async fn lookup_is_case_insensitive() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    let scope = Scope(server.id);

    let repo = NameIndexRepository::new(db);
    repo.register(scope, "Foo Bar", server.id).await.unwrap();

    for variant in ["foo bar", "FOO BAR", "  Foo Bar  "] {
        let found = repo.find_active(scope, variant).await.unwrap();
        assert_eq!(found.len(), 1, "expected a match for '{}'", variant);
        assert_eq!(found[0].raw_name, "Foo Bar");
    }

    Ok(())
}

/// Tests that inactive rows are excluded from active lookup.
///
/// Expected: Ok with no matches
#[tokio::test]
async fn ignores_inactive_bindings() -> Result<(), DbErr> {
    let test = TestBuilder::new().with_sync_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let server = factory::server::create_server(db).await?;
    factory::name_index::NameIndexFactory::new(db, server.id, server.id)
        .raw_name("Retired")
        .active(false)
        .build()
        .await?;

    let repo = NameIndexRepository::new(db);
    let found = repo.find_active(Scope(server.id), "Retired").await.unwrap();

    assert!(found.is_empty());

    Ok(())
}
