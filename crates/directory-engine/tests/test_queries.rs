use std::sync::Arc;

use vinodex_core::query::DirectoryQuery;
use vinodex_core::record::Winery;
use vinodex_core::store::DirectoryStore;

fn winery(name: &str, city: &str, state: &str, description: &str, featured: bool) -> Winery {
    let mut w = Winery::new(name, "1 Vine St", city, state);
    w.description = description.to_string();
    w.featured = featured;
    w
}

async fn seeded(name: &str, records: Vec<Winery>) -> DirectoryQuery {
    let storage_path = format!("/tmp/vinodex_{name}");
    let _ = std::fs::remove_dir_all(&storage_path); // Cleanup
    let store = Arc::new(DirectoryStore::open(&storage_path).unwrap());
    store.commit_batch(records, "seed.csv").await.unwrap();
    DirectoryQuery::new(store)
}

#[tokio::test]
async fn test_search_matches_city_case_insensitively() {
    let query = seeded(
        "query_city",
        vec![
            winery("First Press", "Napa", "California", "", false),
            winery("Second Press", "Sonoma", "California", "", false),
        ],
    )
    .await;

    let hits = query.search_by_keyword("napa").await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "First Press");
}

#[tokio::test]
async fn test_search_matches_inside_descriptions() {
    let query = seeded(
        "query_description",
        vec![
            winery(
                "Hill Top",
                "Sonoma",
                "California",
                "A short drive from the Napa valley floor",
                false,
            ),
            winery("Flat Land", "Lodi", "California", "Estate reds", false),
        ],
    )
    .await;

    let hits = query.search_by_keyword("NAPA").await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Hill Top");
}

#[tokio::test]
async fn test_search_excludes_non_matching_records() {
    let query = seeded(
        "query_exclude",
        vec![
            winery("First Press", "Napa", "California", "", false),
            winery("Second Press", "Sonoma", "California", "", false),
        ],
    )
    .await;

    let hits = query.search_by_keyword("willamette").await;
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_search_with_an_empty_term_returns_everything() {
    let query = seeded(
        "query_empty_term",
        vec![
            winery("First Press", "Napa", "California", "", false),
            winery("Second Press", "Sonoma", "California", "", true),
        ],
    )
    .await;

    let hits = query.search_by_keyword("").await;
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_list_featured_filters_and_caps() {
    let mut records: Vec<Winery> = (0..7)
        .map(|i| winery(&format!("Featured {i}"), "Napa", "California", "", true))
        .collect();
    records.push(winery("Plain", "Sonoma", "California", "", false));

    let query = seeded("query_featured_cap", records).await;

    let six = query.list_featured(6).await;
    assert_eq!(six.len(), 6);
    assert!(six.iter().all(|w| w.featured));

    let all = query.list_featured(100).await;
    assert_eq!(all.len(), 7, "the unfeatured record must never appear");
}

#[tokio::test]
async fn test_list_featured_on_an_unfeatured_collection_is_empty() {
    let query = seeded(
        "query_featured_none",
        vec![winery("Plain", "Napa", "California", "", false)],
    )
    .await;

    assert!(query.list_featured(6).await.is_empty());
}

#[tokio::test]
async fn test_get_by_id_roundtrip_and_absence() {
    let storage_path = "/tmp/vinodex_query_get";
    let _ = std::fs::remove_dir_all(storage_path); // Cleanup
    let store = Arc::new(DirectoryStore::open(storage_path).unwrap());
    store
        .commit_batch(
            vec![winery("First Press", "Napa", "California", "", false)],
            "seed.csv",
        )
        .await
        .unwrap();
    let id = store.scan().await[0].id.clone().unwrap();

    let query = DirectoryQuery::new(store);
    let found = query.get_by_id(&id).await.unwrap();
    assert_eq!(found.name, "First Press");
    assert!(query.get_by_id("missing-id").await.is_none());
}
