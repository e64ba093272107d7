use storage::repository::ProgressSlot;
use storage::sqlite::SqliteRepository;

#[tokio::test]
async fn sqlite_slot_round_trips_and_overwrites() {
    let url = "sqlite:file:memdb_slot_roundtrip?mode=memory&cache=shared";
    let repo = SqliteRepository::connect(url).await.expect("connect");
    repo.migrate().await.expect("migrate");

    assert_eq!(repo.read().await.unwrap(), None);

    repo.write(r#"{"solved":{},"bookmarks":["q1"],"fcCards":{}}"#)
        .await
        .unwrap();
    repo.write(r#"{"solved":{},"bookmarks":["q2"],"fcCards":{}}"#)
        .await
        .unwrap();

    let stored = repo.read().await.unwrap().expect("value stored");
    assert!(stored.contains("q2"));
    assert!(!stored.contains("q1"));
}

#[tokio::test]
async fn sqlite_slots_are_isolated_by_key() {
    let url = "sqlite:file:memdb_slot_keys?mode=memory&cache=shared";
    let first = SqliteRepository::connect(url).await.expect("connect");
    first.migrate().await.expect("migrate");
    let second = first.clone().with_slot_key("other_profile");

    first.write("a").await.unwrap();
    assert_eq!(second.read().await.unwrap(), None);

    second.write("b").await.unwrap();
    first.clear().await.unwrap();
    assert_eq!(first.read().await.unwrap(), None);
    assert_eq!(second.read().await.unwrap().as_deref(), Some("b"));
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let repo = SqliteRepository::connect("sqlite:file:memdb_slot_migrate?mode=memory&cache=shared")
        .await
        .expect("connect");
    repo.migrate().await.expect("first migrate");
    repo.migrate().await.expect("second migrate");
    repo.write("x").await.unwrap();
    assert_eq!(repo.read().await.unwrap().as_deref(), Some("x"));
}
