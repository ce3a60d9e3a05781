//! Tests for the blocking and async pagers

use super::*;
use crate::error::Error;
use crate::http::{HttpResponse, MemoryTransport};
use crate::page::Page;
use crate::pagination::{json_parser, ApiResponse};
use crate::types::{Direction, Link};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::{Arc, Mutex};
use test_case::test_case;

type Response = ApiResponse<u32>;

fn page_url(n: usize) -> String {
    format!("https://api.example.com/items?page={n}")
}

fn page_response(data: Vec<u32>, next: Option<String>, previous: Option<String>) -> Response {
    let mut links = Vec::new();
    if let Some(href) = previous {
        links.push(Link::previous(href));
    }
    if let Some(href) = next {
        links.push(Link::next(href));
    }
    ApiResponse::new(data, links)
}

/// Serve pages `1..=count` with `per_page` items each, linked both ways.
/// Returns the first page's response for wrapping.
fn chain(transport: &MemoryTransport, count: usize, per_page: usize) -> Response {
    let mut first = None;
    for n in 1..=count {
        let data = (0..per_page).map(|i| (n * 100 + i) as u32).collect();
        let next = (n < count).then(|| page_url(n + 1));
        let previous = (n > 1).then(|| page_url(n - 1));
        let response = page_response(data, next, previous);
        transport.respond_json(page_url(n), &response).unwrap();
        if n == 1 {
            first = Some(response);
        }
    }
    first.unwrap_or_default()
}

fn sync_pager(initial: Response, transport: &Arc<MemoryTransport>) -> SyncPager<Response> {
    SyncPager::with_json(initial, transport.clone()).unwrap()
}

fn async_pager(initial: Response, transport: &Arc<MemoryTransport>) -> AsyncPager<Response> {
    AsyncPager::with_json(initial, transport.clone()).unwrap()
}

// ============================================================================
// SyncPager Navigation Tests
// ============================================================================

#[test]
fn test_sync_empty_initial_response() {
    let transport = Arc::new(MemoryTransport::new());
    let pager = sync_pager(ApiResponse::new(vec![], vec![]), &transport);

    assert!(!pager.has_next());
    assert!(!pager.has_previous());
    assert!(pager.items().is_empty());
}

#[test]
fn test_sync_missing_fields_degrade_to_empty() {
    let transport = Arc::new(MemoryTransport::new());
    let pager = sync_pager(ApiResponse::default(), &transport);

    assert!(!pager.has_next());
    assert!(pager.items().is_empty());
}

#[test]
fn test_sync_next_page_round_trip() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/u", &page_response(vec![2], None, None))
        .unwrap();
    let mut pager = sync_pager(page_response(vec![1], Some("/u".into()), None), &transport);

    assert!(pager.has_next());
    assert_eq!(pager.next_page().unwrap().items(), &[2]);
    assert!(!pager.has_next());
    assert_eq!(pager.response().data.as_deref(), Some(&[2][..]));
    assert_eq!(transport.requests(), vec!["/u"]);
}

#[test]
fn test_sync_next_page_without_cursor_is_navigation_error() {
    let transport = Arc::new(MemoryTransport::new());
    let mut pager = sync_pager(page_response(vec![1], None, None), &transport);

    let err = pager.next_page().unwrap_err();
    assert!(matches!(
        err,
        Error::NoSuchPage {
            direction: Direction::Forward
        }
    ));
    let err = pager.previous_page().unwrap_err();
    assert!(err.is_navigation());

    assert_eq!(transport.request_count(), 0);
    assert_eq!(pager.items(), &[1]);
}

#[test]
fn test_sync_forward_then_backward() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 2);
    let mut pager = sync_pager(first, &transport);

    assert!(!pager.has_previous());
    pager.next_page().unwrap().next_page().unwrap();
    assert_eq!(pager.items(), &[300, 301]);
    assert!(!pager.has_next());
    assert!(pager.has_previous());

    pager.previous_page().unwrap();
    assert_eq!(pager.items(), &[200, 201]);
    assert!(pager.has_next());
    assert!(pager.has_previous());
}

#[test]
fn test_sync_failed_fetch_leaves_state_unchanged() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond("/next", HttpResponse::new(500, "boom"));
    let mut pager = sync_pager(
        page_response(vec![1, 2], Some("/next".into()), Some("/prev".into())),
        &transport,
    );

    let items_before = pager.items().to_vec();
    let cursors_before = pager.state().cursors().clone();

    let err = pager.next_page().unwrap_err();
    assert!(err.is_transport());

    assert_eq!(pager.items(), items_before.as_slice());
    assert_eq!(pager.state().cursors(), &cursors_before);
    assert!(pager.has_next());
}

#[test]
fn test_sync_unparseable_page_leaves_state_unchanged() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond("/next", HttpResponse::ok("not json"));
    let mut pager = sync_pager(page_response(vec![1], Some("/next".into()), None), &transport);

    let err = pager.next_page().unwrap_err();
    assert!(err.is_parse());
    assert_eq!(pager.items(), &[1]);
    assert_eq!(pager.state().cursor(Direction::Forward), Some("/next"));
}

#[test]
fn test_sync_retry_after_failure_succeeds() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond("/next", HttpResponse::new(503, "busy"))
        .respond_json("/next", &page_response(vec![9], None, None))
        .unwrap();
    let mut pager = sync_pager(page_response(vec![1], Some("/next".into()), None), &transport);

    assert!(pager.next_page().is_err());
    assert_eq!(pager.next_page().unwrap().items(), &[9]);
}

#[test]
fn test_sync_non_object_json_is_argument_error() {
    let transport: Arc<MemoryTransport> = Arc::new(MemoryTransport::new());
    let err = SyncPager::with_json(json!([1, 2, 3]), transport).unwrap_err();
    assert!(matches!(err, Error::Argument { .. }));
}

#[test]
fn test_sync_open_fetches_first_page() {
    let transport = Arc::new(MemoryTransport::new());
    chain(&transport, 2, 1);

    let mut pager: SyncPager<Response> =
        SyncPager::open(&page_url(1), transport.clone(), json_parser()).unwrap();
    assert_eq!(pager.items(), &[100]);
    assert_eq!(pager.all_items().unwrap(), vec![100, 200]);
}

// ============================================================================
// SyncPager Iterator Tests
// ============================================================================

#[test]
fn test_sync_iter_visits_pages_of_two_two_zero() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/p2", &page_response(vec![3, 4], Some("/p3".into()), None))
        .unwrap()
        .respond_json("/p3", &page_response(vec![], None, None))
        .unwrap();
    let mut pager = sync_pager(page_response(vec![1, 2], Some("/p2".into()), None), &transport);

    let items: Vec<u32> = pager.iter().map(Result::unwrap).collect();
    assert_eq!(items, vec![1, 2, 3, 4]);
    assert_eq!(transport.requests(), vec!["/p2", "/p3"]);
}

#[test]
fn test_sync_iter_skips_empty_middle_pages() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/p2", &page_response(vec![], Some("/p3".into()), None))
        .unwrap()
        .respond_json("/p3", &page_response(vec![7], None, None))
        .unwrap();
    let mut pager = sync_pager(page_response(vec![], Some("/p2".into()), None), &transport);

    let items: Vec<u32> = pager.iter().collect::<crate::Result<_>>().unwrap();
    assert_eq!(items, vec![7]);
}

#[test]
fn test_sync_iter_reports_fetch_failure_once() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond("/p2", HttpResponse::new(500, "down"));
    let mut pager = sync_pager(page_response(vec![1], Some("/p2".into()), None), &transport);

    let mut iter = pager.iter();
    assert_eq!(iter.next().unwrap().unwrap(), 1);
    assert!(iter.next().unwrap().unwrap_err().is_transport());
    assert!(iter.next().is_none());
    assert!(iter.next().is_none());
    drop(iter);

    assert_eq!(transport.request_count(), 1);
    assert_eq!(pager.items(), &[1]);
}

#[test_case(1, 0 ; "single empty page")]
#[test_case(1, 3 ; "single page")]
#[test_case(4, 0 ; "chain of empty pages")]
#[test_case(5, 3 ; "five pages of three")]
fn test_sync_full_drain_returns_n_times_k(pages: usize, per_page: usize) {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, pages, per_page);
    let mut pager = sync_pager(first, &transport);

    let items = pager.all_items().unwrap();
    let expected: Vec<u32> = (1..=pages)
        .flat_map(|n| (0..per_page).map(move |i| (n * 100 + i) as u32))
        .collect();
    assert_eq!(items.len(), pages * per_page);
    assert_eq!(items, expected);
}

#[test]
fn test_sync_pages_forward() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 1);
    let mut pager = sync_pager(first, &transport);

    let pages: Vec<Page<u32>> = pager.pages().map(Result::unwrap).collect();
    assert_eq!(
        pages,
        vec![
            Page::new(vec![100]),
            Page::new(vec![200]),
            Page::new(vec![300])
        ]
    );
}

#[test]
fn test_sync_pages_yields_later_empty_pages() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/p2", &page_response(vec![], None, None))
        .unwrap();
    let mut pager = sync_pager(page_response(vec![1], Some("/p2".into()), None), &transport);

    let sizes: Vec<usize> = pager.pages().map(|p| p.unwrap().len()).collect();
    assert_eq!(sizes, vec![1, 0]);
}

#[test]
fn test_sync_pages_empty_first_page_yields_nothing() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/p2", &page_response(vec![5, 6], None, None))
        .unwrap();
    let mut pager = sync_pager(page_response(vec![], Some("/p2".into()), None), &transport);

    assert_eq!(pager.pages().count(), 0);
    assert_eq!(transport.request_count(), 0);
    assert!(pager.has_next());
}

#[test]
fn test_sync_previous_pages_walks_backward() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 1);
    let mut pager = sync_pager(first, &transport);
    pager.next_page().unwrap().next_page().unwrap();

    let items: Vec<u32> = pager
        .previous_pages()
        .flat_map(|page| page.unwrap().to_vec())
        .collect();
    assert_eq!(items, vec![300, 200, 100]);
    assert!(!pager.has_previous());
}

#[test]
fn test_sync_pages_stops_after_error() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond("/p2", HttpResponse::new(404, "gone"));
    let mut pager = sync_pager(page_response(vec![1], Some("/p2".into()), None), &transport);

    let mut pages = pager.pages();
    assert!(pages.next().unwrap().is_ok());
    assert!(pages.next().unwrap().is_err());
    assert!(pages.next().is_none());
}

// ============================================================================
// AsyncPager Tests
// ============================================================================

#[tokio::test]
async fn test_async_empty_initial_response() {
    let transport = Arc::new(MemoryTransport::new());
    let pager = async_pager(ApiResponse::new(vec![], vec![]), &transport);

    assert!(!pager.has_next());
    assert!(!pager.has_previous());
    assert!(pager.items().is_empty());
}

#[tokio::test]
async fn test_async_next_page_round_trip() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/u", &page_response(vec![2], None, None))
        .unwrap();
    let mut pager = async_pager(page_response(vec![1], Some("/u".into()), None), &transport);

    pager.next_page().await.unwrap();
    assert_eq!(pager.items(), &[2]);
    assert!(!pager.has_next());
}

#[tokio::test]
async fn test_async_navigation_error_without_cursor() {
    let transport = Arc::new(MemoryTransport::new());
    let mut pager = async_pager(page_response(vec![1], None, None), &transport);

    assert!(pager.next_page().await.unwrap_err().is_navigation());
    assert!(pager.previous_page().await.unwrap_err().is_navigation());
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_async_failed_fetch_leaves_state_unchanged() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond("/next", HttpResponse::new(500, "boom"));
    let mut pager = async_pager(
        page_response(vec![1, 2], Some("/next".into()), None),
        &transport,
    );
    let cursors_before = pager.state().cursors().clone();

    let err = pager.next_page().await.unwrap_err();
    assert!(err.is_transport());
    assert_eq!(pager.items(), &[1, 2]);
    assert_eq!(pager.state().cursors(), &cursors_before);
}

#[tokio::test]
async fn test_async_backward_navigation() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 2, 2);
    let mut pager = async_pager(first, &transport);

    pager.next_page().await.unwrap();
    assert!(pager.has_previous());
    pager.previous_page().await.unwrap();
    assert_eq!(pager.items(), &[100, 101]);
}

#[test_case(1, 0 ; "single empty page")]
#[test_case(3, 2 ; "three pages of two")]
#[test_case(6, 4 ; "six pages of four")]
fn test_async_all_items_returns_n_times_k(pages: usize, per_page: usize) {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, pages, per_page);
    let mut pager = async_pager(first, &transport);

    let items = tokio_test::block_on(pager.all_items()).unwrap();
    assert_eq!(items.len(), pages * per_page);
    assert!(items.windows(2).all(|w| w[0] < w[1]));
    assert!(!pager.has_next());
}

#[tokio::test]
async fn test_async_all_items_deep_chain_does_not_overflow() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 5_000, 1);
    let mut pager = async_pager(first, &transport);

    let items = pager.all_items().await.unwrap();
    assert_eq!(items.len(), 5_000);
    assert_eq!(transport.request_count(), 4_999);
}

#[tokio::test]
async fn test_async_all_items_stops_on_error() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json("/p2", &page_response(vec![2], Some("/p3".into()), None))
        .unwrap()
        .respond("/p3", HttpResponse::new(502, "bad gateway"));
    let mut pager = async_pager(page_response(vec![1], Some("/p2".into()), None), &transport);

    let err = pager.all_items().await.unwrap_err();
    assert!(err.is_transport());
    // Last good page stays current
    assert_eq!(pager.items(), &[2]);
    assert!(pager.has_next());
}

#[tokio::test]
async fn test_async_for_each_page_in_order() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 2);
    let mut pager = async_pager(first, &transport);

    let seen = Arc::new(Mutex::new(Vec::new()));
    pager
        .for_each_page(|page| {
            let seen = Arc::clone(&seen);
            async move {
                tokio::task::yield_now().await;
                seen.lock().unwrap().push(page.to_vec());
                Ok::<_, Error>(())
            }
        })
        .await
        .unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![vec![100, 101], vec![200, 201], vec![300, 301]]
    );
}

#[tokio::test]
async fn test_async_for_each_page_awaits_processor_before_fetching() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 1);
    let mut pager = async_pager(first, &transport);

    let requests_seen = Arc::new(Mutex::new(Vec::new()));
    let observed = Arc::clone(&transport);
    pager
        .for_each_page(|_| {
            let requests_seen = Arc::clone(&requests_seen);
            let observed = Arc::clone(&observed);
            async move {
                tokio::task::yield_now().await;
                requests_seen.lock().unwrap().push(observed.request_count());
                Ok::<_, Error>(())
            }
        })
        .await
        .unwrap();

    assert_eq!(*requests_seen.lock().unwrap(), vec![0, 1, 2]);
}

#[tokio::test]
async fn test_async_for_each_page_processor_error_stops() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 1);
    let mut pager = async_pager(first, &transport);

    let err = pager
        .for_each_page(|_| async { Err::<(), _>(Error::Other("stop".to_string())) })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "stop");
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn test_async_for_each_item() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 2, 3);
    let mut pager = async_pager(first, &transport);

    let mut items = Vec::new();
    pager.for_each_item(|item| items.push(item)).await.unwrap();

    assert_eq!(items, vec![100, 101, 102, 200, 201, 202]);
}

#[tokio::test]
async fn test_async_item_stream() {
    let transport = Arc::new(MemoryTransport::new());
    let first = chain(&transport, 3, 2);
    let pager = async_pager(first, &transport);

    let items: Vec<u32> = pager
        .into_item_stream()
        .map(Result::unwrap)
        .collect()
        .await;
    assert_eq!(items, vec![100, 101, 200, 201, 300, 301]);
}

#[tokio::test]
async fn test_async_item_stream_ends_after_error() {
    let transport = Arc::new(MemoryTransport::new());
    transport.respond("/p2", HttpResponse::new(500, "down"));
    let pager = async_pager(page_response(vec![1], Some("/p2".into()), None), &transport);

    let results: Vec<crate::Result<u32>> = pager.into_item_stream().collect().await;
    assert_eq!(results.len(), 2);
    assert_eq!(*results[0].as_ref().unwrap(), 1);
    assert!(results[1].as_ref().unwrap_err().is_transport());
}

#[tokio::test]
async fn test_async_open_with_json_values() {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json(
            "/start",
            &json!({"data": [{"id": "a"}], "links": [{"rel": "next", "href": "/two", "method": "GET"}]}),
        )
        .unwrap()
        .respond_json("/two", &json!({"data": [{"id": "b"}]}))
        .unwrap();

    let mut pager: AsyncPager<serde_json::Value> =
        AsyncPager::open("/start", transport.clone(), json_parser())
            .await
            .unwrap();
    let ids: Vec<String> = pager
        .all_items()
        .await
        .unwrap()
        .iter()
        .map(|item| item["id"].as_str().unwrap_or_default().to_string())
        .collect();

    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_async_open_rejects_error_status() {
    let transport = Arc::new(MemoryTransport::new());
    let err = AsyncPager::<Response>::open("/missing", transport.clone(), json_parser())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::HttpStatus { status: 404, .. }));
}

// ============================================================================
// Unpageable Later Page Tests
// ============================================================================

fn json_transport_with_second_page(body: &str) -> Arc<MemoryTransport> {
    let transport = Arc::new(MemoryTransport::new());
    transport
        .respond_json(
            "/p1",
            &json!({"data": [1], "links": [{"rel": "next", "href": "/p2"}]}),
        )
        .unwrap()
        .respond("/p2", HttpResponse::ok(body));
    transport
}

#[test_case("null" ; "null body")]
#[test_case("[1, 2]" ; "array body")]
#[test_case("\"page\"" ; "string body")]
fn test_sync_non_object_later_page_is_parse_error(body: &str) {
    let transport = json_transport_with_second_page(body);
    let mut pager =
        SyncPager::<serde_json::Value>::open("/p1", transport.clone(), json_parser()).unwrap();

    let err = pager.next_page().unwrap_err();
    assert!(err.is_parse());
    assert_eq!(pager.items(), &[json!(1)]);
    assert!(pager.has_next());

    let mut items = pager.iter();
    assert_eq!(items.next().unwrap().unwrap(), json!(1));
    assert!(items.next().unwrap().unwrap_err().is_parse());
    assert!(items.next().is_none());
}

#[test_case("null" ; "null body")]
#[test_case("[1, 2]" ; "array body")]
#[test_case("\"page\"" ; "string body")]
fn test_async_non_object_later_page_fails_drain(body: &str) {
    let transport = json_transport_with_second_page(body);
    let mut pager = tokio_test::block_on(AsyncPager::<serde_json::Value>::open(
        "/p1",
        transport.clone(),
        json_parser(),
    ))
    .unwrap();

    let err = tokio_test::block_on(pager.all_items()).unwrap_err();
    assert!(err.is_parse());
    assert_eq!(pager.items(), &[json!(1)]);
    assert!(pager.has_next());
    assert_eq!(transport.requests(), vec!["/p1", "/p2"]);
}
