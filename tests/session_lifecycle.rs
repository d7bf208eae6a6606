//! Integration tests for the session lifecycle: fetch, page, load lazily.
//!
//! Each test starts its own mock Picasa server. Fixture hrefs point at
//! picasaweb.google.com and are rewritten to the mock server's address.

use picasa_feed::{Config, Document, FeedKind, Paginate, Picasa, PicasaError, RequestOptions, Resource};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LIVE_HOST: &str = "http://picasaweb.google.com";

fn fixture(name: &str, server: &MockServer) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("fixture {path}: {e}"))
        .replace(LIVE_HOST, &server.uri())
}

fn atom(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "application/atom+xml")
        .set_body_string(body)
}

fn session(server: &MockServer) -> Picasa {
    Picasa::new(&Config::with_host(server.uri())).unwrap()
}

/// Second page of the user feed: one more album, no further pages.
fn user_page_two(server: &MockServer) -> String {
    fixture("user.atom", server)
        .replace("start-index=2&amp;max-results=1'", "start-index=1&amp;max-results=1'")
        .replace("<link rel='next'", "<link rel='previous'")
        .replace(">Lolcats<", ">Dogs<")
        .replace("<rights type='text'>public</rights>", "<rights type='text'>private</rights>")
}

// ============================================================================
// Fetch
// ============================================================================

#[tokio::test]
async fn test_user_feed_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/liz"))
        .respond_with(atom(fixture("user.atom", &server)))
        .expect(1)
        .mount(&server)
        .await;

    let picasa = session(&server);
    let user = picasa
        .user(Some("liz"), RequestOptions::default())
        .await
        .unwrap()
        .and_then(Document::into_user)
        .unwrap();

    assert_eq!(user.albums().len(), 1);
    assert!(user.albums()[0].public());
    assert!(user.albums()[0].session().is_some_and(|s| s.same_session(&picasa)));
}

#[tokio::test]
async fn test_missing_feed_is_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = session(&server).album("nope", RequestOptions::default()).await.unwrap();
    assert!(result.is_none());
}

#[tokio::test]
async fn test_unknown_feed_type_surfaces() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(atom("<feed><title>no markers</title></feed>".to_string()))
        .mount(&server)
        .await;

    let err = session(&server).user(Some("liz"), RequestOptions::default()).await.unwrap_err();
    assert!(matches!(err, PicasaError::UnknownFeedType { .. }));
}

// ============================================================================
// Pagination
// ============================================================================

#[tokio::test]
async fn test_next_and_previous_follow_links() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/liz"))
        .and(query_param("start-index", "2"))
        .respond_with(atom(user_page_two(&server)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/liz"))
        .respond_with(atom(fixture("user.atom", &server)))
        .mount(&server)
        .await;

    let picasa = session(&server);
    let first = picasa.user(Some("liz"), RequestOptions::default()).await.unwrap().unwrap();

    let second = first.next().await.unwrap().unwrap();
    assert_eq!(second.kind(), FeedKind::User);
    let second = second.into_user().unwrap();
    assert_eq!(second.albums()[0].title(), Some("Dogs"));
    assert!(second.albums()[0].private());

    // Last page: no next link, nothing is fetched
    assert!(second.next().await.unwrap().is_none());

    let back = second.previous().await.unwrap().unwrap().into_user().unwrap();
    assert_eq!(back.albums()[0].title(), Some("Lolcats"));
}

#[tokio::test]
async fn test_search_pages_through_all_users() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/all"))
        .and(query_param("start-index", "2"))
        .respond_with(atom(
            fixture("search.atom", &server).replace("puppy.jpg", "puppy2.jpg"),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/all"))
        .and(query_param("q", "puppy"))
        .respond_with(atom(fixture("search.atom", &server)))
        .mount(&server)
        .await;

    let picasa = session(&server);
    let first = picasa.search("puppy", RequestOptions::default()).await.unwrap().unwrap();
    assert_eq!(first.kind(), FeedKind::Search);

    let second = first.next().await.unwrap().unwrap();
    let photos = second.into_photos().unwrap();
    assert_eq!(photos[0].title(), Some("puppy2.jpg"));
}

#[tokio::test]
async fn test_pagination_after_session_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(atom(fixture("user.atom", &server)))
        .mount(&server)
        .await;

    let picasa = session(&server);
    let user = picasa.user(Some("liz"), RequestOptions::default()).await.unwrap().unwrap();
    drop(picasa);

    assert!(user.session().is_none());
    assert!(matches!(user.next().await, Err(PicasaError::NoSession)));
}

// ============================================================================
// Lazy album photos
// ============================================================================

#[tokio::test]
async fn test_album_photos_are_fetched_once() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/liz"))
        .respond_with(atom(fixture("user.atom", &server)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/entry/api/user/liz/albumid/5193374623958196241"))
        .and(query_param("kind", "photo"))
        .respond_with(atom(fixture("album.atom", &server)))
        .expect(1)
        .mount(&server)
        .await;

    let picasa = session(&server);
    let mut albums = picasa
        .user(Some("liz"), RequestOptions::default())
        .await
        .unwrap()
        .and_then(Document::into_user)
        .unwrap()
        .into_albums();
    let album = &mut albums[0];

    let count = album.photos(RequestOptions::default()).await.unwrap().len();
    assert_eq!(count, 2);

    picasa.clear_cache();
    let again = album.photos(RequestOptions::default()).await.unwrap();
    assert_eq!(again.len(), 2);
    assert_eq!(again[0].title(), Some("invisible_bike.jpg"));
}

#[tokio::test]
async fn test_album_photos_empty_result_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/liz"))
        .respond_with(atom(fixture("user.atom", &server)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/entry/api/user/liz/albumid/5193374623958196241"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let picasa = session(&server);
    let user = picasa
        .user(Some("liz"), RequestOptions::default())
        .await
        .unwrap()
        .and_then(Document::into_user)
        .unwrap();
    let mut album = user.albums()[0].clone();

    assert!(album.photos(RequestOptions::default()).await.unwrap().is_empty());
    picasa.clear_cache();
    assert!(album.photos(RequestOptions::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_load_refetches_own_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/liz"))
        .respond_with(atom(fixture("user.atom", &server)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/entry/api/user/liz/albumid/5193374623958196241"))
        .respond_with(atom(fixture("album.atom", &server)))
        .expect(1)
        .mount(&server)
        .await;

    let picasa = session(&server);
    let user = picasa.user(Some("liz"), RequestOptions::default()).await.unwrap().unwrap();
    let Document::User(user) = user else {
        panic!("expected user feed");
    };

    let loaded = user.albums()[0].load(RequestOptions::default()).await.unwrap().unwrap();
    assert_eq!(loaded.kind(), FeedKind::Album);
    assert_eq!(loaded.into_photos().unwrap().len(), 2);
}

#[tokio::test]
async fn test_album_by_title() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/feed/api/user/default"))
        .respond_with(atom(fixture("user.atom", &server)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/data/entry/api/user/liz/albumid/5193374623958196241"))
        .respond_with(atom(fixture("album.atom", &server)))
        .expect(1)
        .mount(&server)
        .await;

    let picasa = session(&server);
    let found = picasa
        .album_by_title("Lolcats", RequestOptions::default())
        .await
        .unwrap()
        .and_then(Document::into_album)
        .unwrap();
    assert_eq!(found.entries.len(), 2);

    // Served from the cached user feed, no album matches
    assert!(picasa
        .album_by_title("Dogs", RequestOptions::default())
        .await
        .unwrap()
        .is_none());
}
