//! SqliteRepository against a throwaway database file.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use chrono::NaiveDate;
use lostfound_core::{
    CatalogConfig, Category, Item, ItemId, ItemRepository, ItemStatus, LostAndFound, NewItem,
    RepoError, ReportType, SearchEngine, SearchQuery,
};
use lostfound_store::{SqliteRepository, StoreError, latest_version};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn item(id: &str, name: &str, category: Category, day: u32) -> Item {
    Item {
        id: ItemId::from(id),
        name: name.into(),
        description: String::new(),
        category,
        report_type: ReportType::Found,
        location: "Radiology".into(),
        contact: "front desk".into(),
        reported_by: "Anonymous".into(),
        reported_on: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        status: ItemStatus::Active,
    }
}

async fn repository() -> (TempDir, SqliteRepository) {
    let dir = TempDir::new().unwrap();
    let repo = SqliteRepository::open(dir.path().join("lostfound.db"))
        .await
        .unwrap();
    (dir, repo)
}

fn ids(items: &[Item]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

#[tokio::test]
async fn insert_then_get_returns_the_same_report() {
    let (_dir, repo) = repository().await;
    let mut wallet = item("ITEM001", "Wallet", Category::Personal, 3);
    wallet.description = "brown leather, initials J.K.".into();

    let id = repo.insert(&wallet).await.unwrap();
    assert_eq!(id.as_str(), "ITEM001");
    assert_eq!(repo.get(&id).await.unwrap(), Some(wallet));
    assert_eq!(repo.get(&ItemId::from("ITEM404")).await.unwrap(), None);
}

#[tokio::test]
async fn duplicate_identifier_is_a_conflict() {
    let (_dir, repo) = repository().await;
    repo.insert(&item("ITEM001", "Wallet", Category::Personal, 3))
        .await
        .unwrap();

    let err = repo
        .insert(&item("ITEM001", "Keys", Category::Keys, 4))
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::Conflict { id } if id.as_str() == "ITEM001"));
}

#[tokio::test]
async fn list_active_is_newest_first_with_stable_ties() {
    let (_dir, repo) = repository().await;
    for (id, day) in [("ITEM001", 1), ("ITEM002", 9), ("ITEM003", 9), ("ITEM004", 5)] {
        repo.insert(&item(id, "Umbrella", Category::Other, day))
            .await
            .unwrap();
    }
    assert!(
        repo.set_status(&ItemId::from("ITEM004"), ItemStatus::Claimed)
            .await
            .unwrap()
    );

    let active = repo.list_active().await.unwrap();
    assert_eq!(ids(&active), vec!["ITEM002", "ITEM003", "ITEM001"]);

    let claimed = repo.get(&ItemId::from("ITEM004")).await.unwrap().unwrap();
    assert_eq!(claimed.status, ItemStatus::Claimed);
}

#[tokio::test]
async fn search_combines_text_category_and_type() {
    let (_dir, repo) = repository().await;
    let mut phone = item("ITEM001", "Phone", Category::Electronics, 2);
    phone.description = "Black case".into();
    let mut bag = item("ITEM002", "Black backpack", Category::Bags, 2);
    bag.report_type = ReportType::Lost;
    for i in [phone, bag, item("ITEM003", "Charger", Category::Electronics, 2)] {
        repo.insert(&i).await.unwrap();
    }

    let text = repo
        .search(&SearchQuery::new().with_text("black"))
        .await
        .unwrap();
    assert_eq!(ids(&text), vec!["ITEM001", "ITEM002"]);

    let narrowed = repo
        .search(
            &SearchQuery::new()
                .with_text("BLACK")
                .with_category(Category::Electronics)
                .with_report_type(ReportType::Found),
        )
        .await
        .unwrap();
    assert_eq!(ids(&narrowed), vec!["ITEM001"]);

    let everything = repo.search(&SearchQuery::new()).await.unwrap();
    assert_eq!(everything.len(), 3);
}

#[tokio::test]
async fn wildcard_characters_in_search_text_are_literal() {
    let (_dir, repo) = repository().await;
    repo.insert(&item("ITEM001", "100% wool scarf", Category::Clothing, 1))
        .await
        .unwrap();
    repo.insert(&item("ITEM002", "Wool hat", Category::Clothing, 1))
        .await
        .unwrap();

    let hits = repo
        .search(&SearchQuery::new().with_text("0% w"))
        .await
        .unwrap();
    assert_eq!(ids(&hits), vec!["ITEM001"]);

    let none = repo
        .search(&SearchQuery::new().with_text("_ool"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn search_text_folds_non_ascii_case_like_the_catalog() {
    let (_dir, repo) = repository().await;
    let mut scarf = item("ITEM001", "Écharpe", Category::Clothing, 1);
    scarf.description = "laine GRISE, Äußerst weich".into();
    repo.insert(&scarf).await.unwrap();
    repo.insert(&item("ITEM002", "Gloves", Category::Clothing, 1))
        .await
        .unwrap();

    for text in ["écharpe", "ÉCHARPE", "äußerst"] {
        let query = SearchQuery::new().with_text(text);
        let stored = repo.search(&query).await.unwrap();
        let cached = SearchEngine::query(&[Arc::new(scarf.clone())][..], &query);
        assert_eq!(ids(&stored), vec!["ITEM001"], "store search for {text:?}");
        assert_eq!(cached.len(), stored.len(), "catalog search for {text:?}");
    }
}

#[tokio::test]
async fn max_sequence_only_counts_matching_prefix() {
    let (_dir, repo) = repository().await;
    assert_eq!(repo.max_sequence("ITEM").await.unwrap(), 0);

    for id in ["ITEM004", "ITEM117", "DOC900", "ITEMX"] {
        repo.insert(&item(id, "Folder", Category::Documents, 1))
            .await
            .unwrap();
    }
    assert_eq!(repo.max_sequence("ITEM").await.unwrap(), 117);
    assert_eq!(repo.max_sequence("DOC").await.unwrap(), 900);
}

#[tokio::test]
async fn reopening_keeps_data_and_schema_version() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lostfound.db");

    let repo = SqliteRepository::open(&path).await.unwrap();
    repo.insert(&item("ITEM001", "Badge", Category::Documents, 1))
        .await
        .unwrap();
    drop(repo);

    let reopened = SqliteRepository::open(&path).await.unwrap();
    assert_eq!(reopened.list_active().await.unwrap().len(), 1);

    let conn = rusqlite::Connection::open(&path).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}

#[tokio::test]
async fn newer_schema_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("future.db");
    {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = SqliteRepository::open(&path).await.unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedSchemaVersion { .. }));
}

#[tokio::test]
async fn corrupt_enum_column_surfaces_as_invalid_data() {
    let (dir, repo) = repository().await;
    repo.insert(&item("ITEM001", "Ring", Category::Jewelry, 1))
        .await
        .unwrap();
    let conn = rusqlite::Connection::open(dir.path().join("lostfound.db")).unwrap();
    conn.execute(
        "UPDATE lost_found_items SET category = 'Furniture' WHERE item_id = 'ITEM001'",
        [],
    )
    .unwrap();

    let err = repo.list_active().await.unwrap_err();
    assert!(matches!(err, RepoError::InvalidData { .. }));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn facade_over_sqlite_continues_the_stored_sequence() {
    let (dir, repo) = repository().await;
    repo.insert(&item("ITEM041", "Watch", Category::Jewelry, 1))
        .await
        .unwrap();

    let desk = LostAndFound::open(
        CatalogConfig::default(),
        Arc::new(repo) as Arc<dyn ItemRepository>,
    )
    .await
    .unwrap();
    let reported = desk
        .report(NewItem::new(
            "Crutches",
            Category::Medical,
            ReportType::Found,
            "Physio",
        ))
        .await
        .unwrap();
    assert_eq!(reported.id.as_str(), "ITEM042");

    let fresh = SqliteRepository::open(dir.path().join("lostfound.db"))
        .await
        .unwrap();
    assert_eq!(fresh.get(&reported.id).await.unwrap(), Some(reported));
}
