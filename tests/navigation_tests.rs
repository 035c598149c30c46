use cbbpoll_web::{
    chunks::{ChunkState, MockChunkStore},
    error::{ChunkError, NavigationError},
    models::LoadKind,
    navigation::Navigator,
    route_table::RouteTable,
};
use std::sync::Arc;

fn navigator(store: &MockChunkStore) -> Navigator {
    let chunks = Arc::new(store.clone()) as ChunkState;
    Navigator::new(Arc::new(RouteTable::poll_site()), chunks)
}

#[tokio::test]
async fn test_home_resolves_without_fetch() {
    let store = MockChunkStore::new();
    let nav = navigator(&store);

    let navigation = nav.navigate("/").await.unwrap();
    assert_eq!(navigation.route_name, "home");
    assert_eq!(navigation.load, LoadKind::Eager);
    assert!(!navigation.fetched);
    assert_eq!(store.total_fetches(), 0);
}

#[tokio::test]
async fn test_lazy_routes_fetch_their_chunk() {
    let store = MockChunkStore::new();
    let nav = navigator(&store);

    for (path, name, chunk) in [
        ("/about", "about", "about"),
        ("/voters", "voters", "voters"),
        ("/teams", "teams", "teams"),
        ("/results", "reults", "results"),
        ("/overview", "overview", "overview"),
    ] {
        let navigation = nav.navigate(path).await.unwrap();
        assert_eq!(navigation.route_name, name);
        assert_eq!(navigation.load, LoadKind::Lazy);
        assert!(navigation.fetched, "{path} should fetch on first visit");
        assert_eq!(store.fetch_count(chunk), 1);
        assert!(navigation.view.markup.contains(chunk));
    }
    assert_eq!(store.total_fetches(), 5);
}

#[tokio::test]
async fn test_second_visit_reuses_loaded_view() {
    let store = MockChunkStore::new();
    let nav = navigator(&store);

    assert!(nav.navigate("/teams").await.unwrap().fetched);
    let again = nav.navigate("/teams/").await.unwrap();
    assert!(!again.fetched);
    assert_eq!(again.path, "/teams");
    assert_eq!(store.fetch_count("teams"), 1);
}

#[tokio::test]
async fn test_cloned_navigators_share_loaded_views() {
    let store = MockChunkStore::new();
    let nav = navigator(&store);
    let other = nav.clone();

    nav.navigate("/overview").await.unwrap();
    assert!(!other.navigate("/overview").await.unwrap().fetched);
    assert_eq!(store.fetch_count("overview"), 1);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let store = MockChunkStore::new();
    let err = navigator(&store).navigate("/polls/2019/3").await.unwrap_err();
    assert_eq!(err, NavigationError::NotFound("/polls/2019/3".to_string()));
}

#[tokio::test]
async fn test_chunk_failure_surfaces_and_is_retried() {
    let store = MockChunkStore::new_failing();
    let nav = navigator(&store);

    let err = nav.navigate("/results").await.unwrap_err();
    assert_eq!(err.to_string(), "failed to load chunk results for route reults");
    match err {
        NavigationError::ChunkLoad { route, chunk, source } => {
            assert_eq!(route, "reults");
            assert_eq!(chunk, "results");
            assert!(matches!(source, ChunkError::Unavailable(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Eager routes are unaffected by the store outage.
    assert!(nav.navigate("/").await.is_ok());

    store.set_failing(false);
    let navigation = nav.navigate("/results").await.unwrap();
    assert!(navigation.fetched);
    assert_eq!(store.fetch_count("results"), 2);
}
