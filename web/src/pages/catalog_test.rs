use super::*;

#[test]
fn sample_sort_is_dataset_only() {
    assert!(!sort_options(ItemKind::Model).contains(&SortKey::Samples));
    assert!(sort_options(ItemKind::Dataset).contains(&SortKey::Samples));
    assert_eq!(sort_options(ItemKind::Model)[0], SortKey::Downloads);
}

#[test]
fn initial_query_carries_home_search() {
    let query = initial_query(Some("bert".to_owned()));
    assert_eq!(query.search, "bert");
    assert_eq!(query.page, 1);
    assert_eq!(query.limit, 12);
    assert_eq!(initial_query(None), CatalogQuery::default());
}

#[test]
fn filter_changes_reset_to_first_page() {
    let on_page_three = CatalogQuery { page: 3, ..CatalogQuery::default() };
    assert_eq!(with_search(on_page_three.clone(), " gpt ").page, 1);
    assert_eq!(with_search(on_page_three.clone(), " gpt ").search, "gpt");
    assert_eq!(with_sort(on_page_three.clone(), SortKey::Stars).page, 1);
    assert_eq!(with_toggled_task(on_page_three.clone(), "translation").page, 1);
    assert_eq!(with_page_size(on_page_three, 24).page, 1);
}

#[test]
fn page_size_only_accepts_offered_sizes() {
    assert_eq!(with_page_size(CatalogQuery::default(), 48).limit, 48);
    assert_eq!(with_page_size(CatalogQuery::default(), 7).limit, 12);
}

#[test]
fn toggling_adds_then_removes() {
    let once = with_toggled_language(CatalogQuery::default(), "en");
    assert_eq!(once.languages, vec!["en".to_owned()]);
    let twice = with_toggled_language(once, "en");
    assert!(twice.languages.is_empty());
}

#[test]
fn cleared_keeps_page_size_only() {
    let busy = CatalogQuery {
        page: 4,
        limit: 48,
        search: "x".to_owned(),
        sort: SortKey::Oldest,
        tasks: vec!["qa".to_owned()],
        languages: vec!["en".to_owned()],
    };
    assert_eq!(cleared(&busy), CatalogQuery { limit: 48, ..CatalogQuery::default() });
}

#[test]
fn with_page_clamps_to_available_pages() {
    let query = CatalogQuery::default();
    assert_eq!(with_page(query.clone(), 0, 30).page, 1);
    assert_eq!(with_page(query.clone(), 2, 30).page, 2);
    assert_eq!(with_page(query.clone(), 9, 30).page, 3);
    assert_eq!(with_page(query, 5, 0).page, 1);
}
