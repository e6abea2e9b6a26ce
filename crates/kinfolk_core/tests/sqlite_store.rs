use chrono::NaiveDate;
use kinfolk_core::store::STORAGE_KEY;
use kinfolk_core::{
    FixedClock, Gender, MemberDraft, MemberRepository, Relation, SqliteStore, Store, StoreError,
};

fn today() -> FixedClock {
    FixedClock(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
}

#[test]
fn empty_database_loads_empty_collection() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.load().unwrap().is_empty());
}

#[test]
fn members_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kinfolk.sqlite3");

    let (first_id, second_id) = {
        let mut repo = MemberRepository::open_with_clock(SqliteStore::open(&path).unwrap(), today());
        let first = repo
            .upsert(
                &MemberDraft::new("Ravi", Gender::Male, Relation::Father)
                    .with_date_of_birth(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()),
                None,
            )
            .unwrap();
        let second = repo
            .upsert(
                &MemberDraft::new("Asha", Gender::Female, Relation::Mother)
                    .with_education("MSc"),
                None,
            )
            .unwrap();
        (first.id, second.id)
    };

    let reopened = MemberRepository::open_with_clock(SqliteStore::open(&path).unwrap(), today());
    let ids: Vec<_> = reopened.all().iter().map(|member| member.id).collect();
    assert_eq!(ids, vec![first_id, second_id]);

    let ravi = reopened.find_by_id(first_id).unwrap();
    assert_eq!(ravi.age, Some(34));
    assert_eq!(ravi.date_of_birth, NaiveDate::from_ymd_opt(1990, 1, 1));
    let asha = reopened.find_by_id(second_id).unwrap();
    assert_eq!(asha.education, "MSc");
    assert_eq!(asha.age, None);
}

#[test]
fn save_replaces_the_single_blob_row() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.save(&[]).unwrap();
    store.save(&[]).unwrap();

    let rows: i64 = store
        .connection()
        .query_row(
            "SELECT COUNT(*) FROM kv_store WHERE key = ?1;",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(rows, 1);

    let blob: String = store
        .connection()
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&blob).unwrap();
    assert_eq!(value["version"], 1);
    assert!(value["records"].as_array().unwrap().is_empty());
}

#[test]
fn corrupt_blob_loads_as_empty() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, '{broken');",
            [STORAGE_KEY],
        )
        .unwrap();

    assert!(store.load().unwrap().is_empty());
}

#[test]
fn newer_blob_version_is_reported_not_discarded() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
        .connection()
        .execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, '{\"version\":2,\"records\":[]}');",
            [STORAGE_KEY],
        )
        .unwrap();

    let err = store.load().unwrap_err();
    assert!(matches!(
        err,
        StoreError::UnsupportedFormatVersion { found: 2, .. }
    ));

    let mut repo = MemberRepository::open_with_clock(store, today());
    assert!(repo.is_empty());
    assert!(repo.take_load_error().is_some());
    assert!(repo.take_load_error().is_none());

    assert!(repo
        .upsert(&MemberDraft::new("Asha", Gender::Female, Relation::Mother), None)
        .is_err());
    let stored: String = repo
        .store()
        .connection()
        .query_row(
            "SELECT value FROM kv_store WHERE key = ?1;",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(stored, r#"{"version":2,"records":[]}"#);
    assert!(matches!(
        repo.store().load(),
        Err(StoreError::UnsupportedFormatVersion { found: 2, .. })
    ));
}

#[test]
fn separate_keys_hold_separate_collections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shared.sqlite3");

    let mut household = MemberRepository::open_with_clock(SqliteStore::open(&path).unwrap(), today());
    household
        .upsert(&MemberDraft::new("Ravi", Gender::Male, Relation::Father), None)
        .unwrap();

    let other = SqliteStore::open(&path).unwrap().with_key("other_household");
    assert!(other.load().unwrap().is_empty());
}
