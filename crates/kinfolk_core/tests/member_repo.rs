use chrono::NaiveDate;
use kinfolk_core::{
    FixedClock, Gender, MemberDraft, MemberRepository, MemberValidationError, MemoryStore,
    Relation, RepoError, StoreError,
};
use std::collections::HashSet;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn repo_on(today: NaiveDate) -> MemberRepository<MemoryStore, FixedClock> {
    MemberRepository::open_with_clock(MemoryStore::new(), FixedClock(today))
}

fn ravi() -> MemberDraft {
    MemberDraft::new("Ravi", Gender::Male, Relation::Father).with_date_of_birth(date(1990, 1, 1))
}

#[test]
fn upsert_without_target_appends_with_fresh_unique_ids() {
    let mut repo = repo_on(date(2024, 6, 15));
    let mut ids = HashSet::new();

    for expected_len in 1..=5 {
        let member = repo.upsert(&ravi(), None).unwrap();
        assert!(ids.insert(member.id), "id reused: {}", member.id);
        assert_eq!(repo.len(), expected_len);
    }
    assert_eq!(repo.store().save_count(), 5);
}

#[test]
fn upsert_with_target_replaces_in_place_and_keeps_id() {
    let mut repo = repo_on(date(2024, 6, 15));
    let first = repo.upsert(&ravi(), None).unwrap();
    let second = repo
        .upsert(&MemberDraft::new("Asha", Gender::Female, Relation::Mother), None)
        .unwrap();

    let mut edited = ravi();
    edited.name = "Ravi K".to_string();
    let updated = repo.upsert(&edited, Some(first.id)).unwrap();

    assert_eq!(updated.id, first.id);
    assert_eq!(repo.len(), 2);
    assert_eq!(repo.all()[0].name, "Ravi K");
    assert_eq!(repo.all()[1].id, second.id);
}

#[test]
fn upsert_with_unknown_target_creates_new_member() {
    let mut repo = repo_on(date(2024, 6, 15));
    let missing = uuid::Uuid::new_v4();

    let created = repo.upsert(&ravi(), Some(missing)).unwrap();
    assert_ne!(created.id, missing);
    assert_eq!(repo.len(), 1);
}

#[test]
fn upsert_recomputes_age_ignoring_supplied_value() {
    let mut repo = repo_on(date(2024, 6, 14));
    let mut draft = MemberDraft::new("Kiran", Gender::Other, Relation::Child)
        .with_date_of_birth(date(2000, 6, 15));
    draft.age = Some(99);

    let member = repo.upsert(&draft, None).unwrap();
    assert_eq!(member.age, Some(23));
    assert_eq!(repo.find_by_id(member.id).unwrap().age, Some(23));
}

#[test]
fn upsert_without_birth_date_stores_absent_age() {
    let mut repo = repo_on(date(2024, 6, 14));
    let mut draft = MemberDraft::new("Kiran", Gender::Other, Relation::Child);
    draft.age = Some(7);

    let member = repo.upsert(&draft, None).unwrap();
    assert_eq!(member.age, None);
}

#[test]
fn upsert_trims_name_and_education() {
    let mut repo = repo_on(date(2024, 6, 14));
    let draft =
        MemberDraft::new("  Meera  ", Gender::Female, Relation::Sibling).with_education("  BA ");

    let member = repo.upsert(&draft, None).unwrap();
    assert_eq!(member.name, "Meera");
    assert_eq!(member.education, "BA");
}

#[test]
fn blank_name_is_rejected_without_mutation() {
    let mut repo = repo_on(date(2024, 6, 14));
    let err = repo
        .upsert(&MemberDraft::new(" \t ", Gender::Male, Relation::Other), None)
        .unwrap_err();

    assert!(matches!(
        err,
        RepoError::Validation(MemberValidationError::EmptyName)
    ));
    assert!(repo.is_empty());
    assert_eq!(repo.store().save_count(), 0);
}

#[test]
fn delete_reports_whether_anything_was_removed() {
    let mut repo = repo_on(date(2024, 6, 14));
    let member = repo.upsert(&ravi(), None).unwrap();
    let saves_before = repo.store().save_count();

    assert!(!repo.delete(uuid::Uuid::new_v4()).unwrap());
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.store().save_count(), saves_before);

    assert!(repo.delete(member.id).unwrap());
    assert!(repo.is_empty());
    assert!(repo.find_by_id(member.id).is_none());
    assert_eq!(repo.store().save_count(), saves_before + 1);
}

#[test]
fn failed_save_rolls_back_create_update_and_delete() {
    let mut repo = repo_on(date(2024, 6, 14));
    let member = repo.upsert(&ravi(), None).unwrap();
    let snapshot = repo.all().to_vec();
    let blob_before = repo.store().blob();

    repo.store().set_fail_writes(true);

    let create_err = repo
        .upsert(&MemberDraft::new("Asha", Gender::Female, Relation::Mother), None)
        .unwrap_err();
    assert!(matches!(create_err, RepoError::Persistence(_)));

    let mut edited = ravi();
    edited.name = "Changed".to_string();
    let update_err = repo.upsert(&edited, Some(member.id)).unwrap_err();
    assert!(matches!(update_err, RepoError::Persistence(_)));

    let delete_err = repo.delete(member.id).unwrap_err();
    assert!(matches!(delete_err, RepoError::Persistence(_)));

    assert_eq!(repo.all(), snapshot.as_slice());
    assert_eq!(repo.store().blob(), blob_before);

    repo.store().set_fail_writes(false);
    assert!(repo.delete(member.id).unwrap());
}

#[test]
fn open_reads_legacy_blob_and_drops_duplicate_ids() {
    let blob = r#"[
        {"id":"11111111-2222-4333-8444-555555555555","name":"Asha","dob":"1970-03-09",
         "age":54,"gender":"Female","relation":"Mother","education":""},
        {"id":"11111111-2222-4333-8444-555555555555","name":"Copy","dob":"",
         "age":null,"gender":"Female","relation":"Mother","education":""}
    ]"#;
    let repo =
        MemberRepository::open_with_clock(MemoryStore::with_blob(blob), FixedClock(date(2024, 1, 1)));

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.all()[0].name, "Asha");
}

#[test]
fn reopening_on_a_later_date_recomputes_ages() {
    let mut repo = repo_on(date(2020, 1, 1));
    let member = repo.upsert(&ravi(), None).unwrap();
    assert_eq!(member.age, Some(30));
    let blob = repo.store().blob().unwrap();

    let reopened =
        MemberRepository::open_with_clock(MemoryStore::with_blob(blob), FixedClock(date(2026, 10, 19)));

    assert_eq!(reopened.find_by_id(member.id).unwrap().age, Some(36));
    assert_eq!(reopened.all()[0].age, Some(36));
}

#[test]
fn newer_format_blob_makes_repository_read_only() {
    let blob = r#"{"version":2,"records":[{"name":"Kept"}]}"#;
    let mut repo =
        MemberRepository::open_with_clock(MemoryStore::with_blob(blob), FixedClock(date(2024, 1, 1)));
    assert!(repo.is_read_only());
    assert!(matches!(
        repo.take_load_error(),
        Some(StoreError::UnsupportedFormatVersion { found: 2, .. })
    ));

    let err = repo.upsert(&ravi(), None).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Persistence(StoreError::UnsupportedFormatVersion { found: 2, .. })
    ));
    assert!(repo.is_empty());
    assert_eq!(repo.store().save_count(), 0);
    assert_eq!(repo.store().blob().as_deref(), Some(blob));
}

#[test]
fn add_edit_delete_scenario() {
    let mut repo = repo_on(date(2024, 6, 14));

    let a = repo.upsert(&ravi(), None).unwrap();
    let mut edited = MemberDraft::from(&a);
    edited.name = "Ravi K".to_string();
    repo.upsert(&edited, Some(a.id)).unwrap();

    assert_eq!(repo.find_by_id(a.id).unwrap().name, "Ravi K");
    assert_eq!(repo.len(), 1);

    assert!(repo.delete(a.id).unwrap());
    assert!(repo.is_empty());
    assert!(repo.find_by_id(a.id).is_none());
}
