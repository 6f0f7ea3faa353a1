//! Integration tests for the scraper
//!
//! These tests use wiremock to serve a small catalog in the books.toscrape.com
//! layout and run the pagination walk and the full scrape end-to-end.

use book_harvester::crawler::{
    build_http_client, discover_item_urls, discover_item_urls_with_observer, extract,
    extract_record, Coordinator, ExtractError, ExtractOutcome, ScrapeObserver,
};
use book_harvester::output::{parse_records, ScrapeStatistics};
use book_harvester::record::{EXPECTED_FIELDS, NO_DESCRIPTION};
use book_harvester::{
    scrape_books, scrape_books_with_observer, HarvestError, ProductRecord, ScrapeOptions,
    ScrapeOutput,
};
use reqwest::Client;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const RATINGS: [&str; 5] = ["One", "Two", "Three", "Four", "Five"];

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

fn item_href(page: u32, index: u32) -> String {
    format!("book-{}-{}_{}/index.html", page, index, page * 100 + index)
}

fn item_title(page: u32, index: u32) -> String {
    format!("Book {}.{}", page, index)
}

/// Builds a catalog page with one titled anchor per item
fn catalog_page(page: u32, total: u32, items: u32) -> String {
    let articles: String = (1..=items)
        .map(|index| {
            format!(
                r#"<li><article class="product_pod">
                     <div class="image_container"><a href="{href}"><img src="x.jpg" alt="{title}"></a></div>
                     <h3><a href="{href}" title="{title}">{title}</a></h3>
                   </article></li>"#,
                href = item_href(page, index),
                title = item_title(page, index)
            )
        })
        .collect();

    format!(
        r#"<html><body>
             <ol class="row">{}</ol>
             <ul class="pager">
               <li class="current">
                 Page {} of {}
               </li>
               <li class="next"><a href="page-{}.html">next</a></li>
             </ul>
           </body></html>"#,
        articles,
        page,
        total,
        page + 1
    )
}

/// Builds an item page; `with_description` controls the description block
fn item_page(title: &str, rating: &str, with_description: bool) -> String {
    let description = if with_description {
        r#"<div id="product_description" class="sub-header"><h2>Product Description</h2></div>
           <p>Une histoire d'été.&nbsp;Très belle.</p>"#
    } else {
        ""
    };

    format!(
        r#"<html><body><article class="product_page">
             <div class="row">
               <div class="col-sm-6 product_main">
                 <h1>{title}</h1>
                 <p class="star-rating {rating}"><i class="icon-star"></i></p>
               </div>
             </div>
             {description}
             <div class="sub-header"><h2>Product Information</h2></div>
             <table class="table table-striped">
               <tr><th>UPC</th><td>upc-{title}</td></tr>
               <tr><th>Product Type</th><td>Books</td></tr>
               <tr><th>Price (excl. tax)</th><td>£51.77</td></tr>
               <tr><th>Price (incl. tax)</th><td>£51.77</td></tr>
               <tr><th>Tax</th><td>£0.00</td></tr>
               <tr><th>Availability</th><td>
                 In stock (22 available)
               </td></tr>
               <tr><th>Number of reviews</th><td>0</td></tr>
             </table>
           </article></body></html>"#,
        title = title,
        rating = rating,
        description = description
    )
}

/// Mounts catalog pages `1..=mounted_pages` of a catalog reporting `total` pages,
/// plus every item page they link to
async fn mount_catalog(server: &MockServer, total: u32, mounted_pages: u32, items: u32) {
    for page in 1..=mounted_pages {
        Mock::given(method("GET"))
            .and(path(format!("/catalogue/page-{}.html", page)))
            .respond_with(html_response(catalog_page(page, total, items)))
            .mount(server)
            .await;

        for index in 1..=items {
            let rating = RATINGS[((page + index) % 5) as usize];
            Mock::given(method("GET"))
                .and(path(format!("/catalogue/{}", item_href(page, index))))
                .respond_with(html_response(item_page(
                    &item_title(page, index),
                    rating,
                    true,
                )))
                .mount(server)
                .await;
        }
    }
}

fn catalog_url(server: &MockServer) -> String {
    format!("{}/catalogue/page-1.html", server.uri())
}

fn test_client() -> Client {
    build_http_client(&Default::default(), &Default::default()).expect("Failed to build client")
}

fn records_options(page_limit: i64) -> ScrapeOptions {
    ScrapeOptions {
        page_limit,
        as_serialized_text: false,
        ..ScrapeOptions::default()
    }
}

/// Observer that records checkpoints as strings
#[derive(Default)]
struct RecordingObserver {
    events: Mutex<Vec<String>>,
    stats: Mutex<Option<ScrapeStatistics>>,
}

impl RecordingObserver {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: String) {
        self.events.lock().unwrap().push(event);
    }
}

impl ScrapeObserver for RecordingObserver {
    fn on_invalid_page_limit(&self, requested: i64) {
        self.push(format!("invalid:{}", requested));
    }

    fn on_catalog_page(&self, page_number: u32, links_found: usize) {
        self.push(format!("page:{}:{}", page_number, links_found));
    }

    fn on_page_limit_reached(&self, limit: u32) {
        self.push(format!("limit:{}", limit));
    }

    fn on_last_page_reached(&self, total: u32) {
        self.push(format!("last:{}", total));
    }

    fn on_discovery_complete(&self, urls_found: usize, _elapsed: Duration) {
        self.push(format!("discovered:{}", urls_found));
    }

    fn on_discovery_failed(&self, url: &str, _error: &HarvestError) {
        self.push(format!("failed:{}", url));
    }

    fn on_item_dropped(&self, url: &str, _error: &ExtractError) {
        self.push(format!("dropped:{}", url));
    }

    fn on_output_written(&self, path: &Path, _bytes: usize) {
        self.push(format!("written:{}", path.display()));
    }

    fn on_batch_complete(&self, stats: &ScrapeStatistics) {
        *self.stats.lock().unwrap() = Some(stats.clone());
    }
}

#[tokio::test]
async fn test_single_page_scrape_returns_complete_records() {
    let server = MockServer::start().await;
    mount_catalog(&server, 50, 1, 20).await;

    let output = scrape_books(&catalog_url(&server), &records_options(1))
        .await
        .expect("Scrape failed");
    let records = output.into_records().expect("Expected records");

    assert_eq!(records.len(), 20);
    for (index, record) in records.iter().enumerate() {
        let expected_title = item_title(1, index as u32 + 1);
        assert_eq!(record.get("Name"), Some(expected_title.as_str()));
        assert!(
            record.missing_fields().is_empty(),
            "Record {} is missing {:?}",
            index,
            record.missing_fields()
        );
        for field in EXPECTED_FIELDS {
            assert!(record.contains(field));
        }
        assert!(["1", "2", "3", "4", "5"].contains(&record.get("Rating").unwrap()));
        assert_eq!(record.get("Availability"), Some("In stock (22 available)"));
    }
}

#[tokio::test]
async fn test_failing_item_is_dropped_not_raised() {
    let server = MockServer::start().await;

    // Registered first so it takes precedence over the item mock mounted below
    let broken = format!("/catalogue/{}", item_href(1, 7));
    Mock::given(method("GET"))
        .and(path(broken.as_str()))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    mount_catalog(&server, 50, 1, 20).await;

    let observer = Arc::new(RecordingObserver::default());
    let output = scrape_books_with_observer(
        &catalog_url(&server),
        &records_options(1),
        observer.clone(),
    )
    .await
    .expect("Scrape failed");
    let records = output.into_records().expect("Expected records");

    assert_eq!(records.len(), 19);
    assert!(records
        .iter()
        .all(|record| record.get("Name") != Some(item_title(1, 7).as_str())));
    // Discovery order survives the gap
    assert_eq!(records[5].get("Name"), Some(item_title(1, 6).as_str()));
    assert_eq!(records[6].get("Name"), Some(item_title(1, 8).as_str()));

    let dropped: Vec<String> = observer
        .events()
        .into_iter()
        .filter(|event| event.starts_with("dropped:"))
        .collect();
    assert_eq!(dropped, vec![format!("dropped:{}{}", server.uri(), broken)]);

    let stats = observer.stats.lock().unwrap().clone().expect("No statistics");
    assert_eq!(stats.discovered, 20);
    assert_eq!(stats.extracted, 19);
    assert_eq!(stats.dropped, 1);
}

#[tokio::test]
async fn test_discovery_grows_with_page_limit_and_is_capped() {
    let server = MockServer::start().await;
    // Only the three catalog pages exist; asking for page 4 would fail the walk
    mount_catalog(&server, 3, 3, 2).await;
    let client = test_client();
    let url = catalog_url(&server);

    let mut previous = 0;
    for (limit, expected) in [(1, 2), (2, 4), (3, 6), (10, 6), (0, 6)] {
        let urls = discover_item_urls(&client, &url, limit)
            .await
            .expect("Discovery failed");
        assert_eq!(urls.len(), expected, "page limit {}", limit);
        if limit > 0 {
            assert!(urls.len() >= previous);
            previous = urls.len();
        }
    }
}

#[tokio::test]
async fn test_discovered_urls_are_absolute_and_ordered() {
    let server = MockServer::start().await;
    mount_catalog(&server, 2, 2, 3).await;

    let urls = discover_item_urls(&test_client(), &catalog_url(&server), 0)
        .await
        .expect("Discovery failed");

    let expected: Vec<String> = [(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3)]
        .iter()
        .map(|(page, index)| format!("{}/catalogue/{}", server.uri(), item_href(*page, *index)))
        .collect();
    assert_eq!(urls, expected);
}

#[tokio::test]
async fn test_negative_page_limit_makes_no_requests() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 1, 2).await;

    for limit in [-1, -7, i64::MIN] {
        let output = scrape_books(&catalog_url(&server), &records_options(limit))
            .await
            .expect("Scrape failed");
        assert_eq!(output, ScrapeOutput::Records(vec![]));
    }

    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty(), "Unexpected requests: {}", requests.len());
}

#[tokio::test]
async fn test_pagination_fetch_failure_aborts_scrape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-2.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;
    mount_catalog(&server, 3, 1, 2).await;

    let observer = Arc::new(RecordingObserver::default());
    let result =
        scrape_books_with_observer(&catalog_url(&server), &records_options(0), observer.clone())
            .await;

    assert!(matches!(result, Err(HarvestError::Fetch { .. })));
    assert!(observer
        .events()
        .contains(&format!("failed:{}/catalogue/page-2.html", server.uri())));
    // No item page was requested once the walk failed
    let requests = server.received_requests().await.unwrap_or_default();
    assert!(requests
        .iter()
        .all(|request| request.url.path().contains("page-")));
}

#[tokio::test]
async fn test_catalog_without_indicator_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogue/page-1.html"))
        .respond_with(html_response(
            "<html><body><a href=\"x/index.html\" title=\"x\">x</a></body></html>".to_string(),
        ))
        .mount(&server)
        .await;

    let result = discover_item_urls(&test_client(), &catalog_url(&server), 1).await;
    assert!(matches!(result, Err(HarvestError::HtmlParse { .. })));
}

#[tokio::test]
async fn test_walk_checkpoints() {
    let server = MockServer::start().await;
    mount_catalog(&server, 2, 2, 1).await;

    let observer = RecordingObserver::default();
    discover_item_urls_with_observer(&test_client(), &catalog_url(&server), 0, &observer)
        .await
        .expect("Discovery failed");

    assert_eq!(
        observer.events(),
        vec!["page:1:1", "page:2:1", "limit:2", "discovered:2"]
    );
}

#[tokio::test]
async fn test_walk_stops_at_last_page_when_starting_mid_catalog() {
    let server = MockServer::start().await;
    mount_catalog(&server, 3, 3, 1).await;

    let observer = RecordingObserver::default();
    let start = format!("{}/catalogue/page-2.html", server.uri());
    let urls = discover_item_urls_with_observer(&test_client(), &start, 5, &observer)
        .await
        .expect("Discovery failed");

    assert_eq!(urls.len(), 2);
    assert_eq!(
        observer.events(),
        vec!["page:2:1", "page:3:1", "last:3", "discovered:2"]
    );
}

#[tokio::test]
async fn test_repeated_scrape_is_identical() {
    let server = MockServer::start().await;
    mount_catalog(&server, 4, 1, 5).await;
    let client = test_client();
    let url = catalog_url(&server);

    let first_urls = discover_item_urls(&client, &url, 1).await.unwrap();
    let second_urls = discover_item_urls(&client, &url, 1).await.unwrap();
    assert_eq!(first_urls, second_urls);

    let first = scrape_books(&url, &records_options(1)).await.unwrap();
    let second = scrape_books(&url, &records_options(1)).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_single_worker_keeps_order() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 1, 6).await;

    let options = ScrapeOptions {
        workers: 1,
        ..records_options(0)
    };
    let records = scrape_books(&catalog_url(&server), &options)
        .await
        .unwrap()
        .into_records()
        .unwrap();

    let names: Vec<&str> = records.iter().filter_map(|r| r.get("Name")).collect();
    let expected: Vec<String> = (1..=6).map(|index| item_title(1, index)).collect();
    assert_eq!(names, expected);
}

/// Mounts `count` item pages that each answer after `delay`
async fn mount_slow_items(server: &MockServer, count: u32, delay: Duration) -> Vec<String> {
    let mut urls = Vec::new();
    for index in 1..=count {
        let item_path = format!("/catalogue/slow_{}/index.html", index);
        Mock::given(method("GET"))
            .and(path(item_path.as_str()))
            .respond_with(
                html_response(item_page(&format!("Slow {}", index), "Two", true))
                    .set_delay(delay),
            )
            .mount(server)
            .await;
        urls.push(format!("{}{}", server.uri(), item_path));
    }
    urls
}

#[tokio::test]
async fn test_worker_pool_width_bounds_concurrency() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(300);
    let urls = mount_slow_items(&server, 6, delay).await;
    let client = test_client();

    let timed_run = |workers: usize| {
        let coordinator = Coordinator::new(ScrapeOptions {
            workers,
            ..ScrapeOptions::default()
        });
        let client = client.clone();
        let urls = urls.clone();
        async move {
            let start = Instant::now();
            let outcomes = coordinator.extract_all(&client, &urls).await;
            assert!(outcomes.iter().all(ExtractOutcome::is_success));
            start.elapsed()
        }
    };

    // Six slow items through a pool of two take at least three delays
    let narrow = timed_run(2).await;
    assert!(narrow >= delay * 3, "workers=2 took {:?}", narrow);

    // A single worker serializes every fetch
    let single = timed_run(1).await;
    assert!(single >= delay * 6, "workers=1 took {:?}", single);

    // A pool as wide as the batch runs them all at once
    let wide = timed_run(6).await;
    assert!(wide < delay * 3, "workers=6 took {:?}", wide);
    assert!(wide < narrow);
}

#[tokio::test]
async fn test_extract_item_without_description() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/catalogue/plain_1/index.html"))
        .respond_with(html_response(item_page("Plain", "Five", false)))
        .mount(&server)
        .await;

    let url = format!("{}/catalogue/plain_1/index.html", server.uri());
    let record = extract_record(&test_client(), &url).await;

    assert_eq!(record.get("Description"), Some(NO_DESCRIPTION));
    assert_eq!(record.get("Rating"), Some("5"));
}

#[tokio::test]
async fn test_extract_reports_fetch_failure() {
    let server = MockServer::start().await;
    let url = format!("{}/catalogue/missing_1/index.html", server.uri());

    match extract(&test_client(), &url).await {
        ExtractOutcome::Failure {
            url: failed_url,
            error: ExtractError::Fetch(reason),
        } => {
            assert_eq!(failed_url, url);
            assert_eq!(reason, "HTTP 404");
        }
        other => panic!("Expected fetch failure, got {:?}", other),
    }
    assert!(extract_record(&test_client(), &url).await.is_empty());
}

#[tokio::test]
async fn test_serialized_output_round_trips() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 1, 3).await;
    let url = catalog_url(&server);

    let records = scrape_books(&url, &records_options(1))
        .await
        .unwrap()
        .into_records()
        .unwrap();
    let json = scrape_books(
        &url,
        &ScrapeOptions {
            page_limit: 1,
            ..ScrapeOptions::default()
        },
    )
    .await
    .unwrap()
    .into_serialized()
    .expect("Expected serialized output");

    assert!(json.contains("£51.77"));
    assert!(json.contains("Une histoire d'été.Très belle."));
    let parsed: Vec<ProductRecord> = parse_records(&json).unwrap();
    assert_eq!(parsed, records);
}

#[tokio::test]
async fn test_persist_json_output() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 1, 2).await;
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("artifacts").join("books_data.txt");

    let observer = Arc::new(RecordingObserver::default());
    let options = ScrapeOptions {
        persist: true,
        page_limit: 1,
        output_path: Some(output_path.clone()),
        ..ScrapeOptions::default()
    };
    let json = scrape_books_with_observer(&catalog_url(&server), &options, observer.clone())
        .await
        .unwrap()
        .into_serialized()
        .unwrap();

    let written = std::fs::read_to_string(&output_path).unwrap();
    assert_eq!(written, json);
    assert_eq!(parse_records(&written).unwrap().len(), 2);
    assert!(observer
        .events()
        .contains(&format!("written:{}", output_path.display())));
}

#[tokio::test]
async fn test_persist_text_output() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 1, 2).await;
    let dir = TempDir::new().unwrap();
    let output_path = dir.path().join("books_data.txt");

    let options = ScrapeOptions {
        persist: true,
        output_path: Some(output_path.clone()),
        ..records_options(1)
    };
    let records = scrape_books(&catalog_url(&server), &options)
        .await
        .unwrap()
        .into_records()
        .unwrap();

    let written = std::fs::read_to_string(&output_path).unwrap();
    let blocks: Vec<&str> = written.trim_end().split("\n\n").collect();
    assert_eq!(blocks.len(), records.len());
    assert!(blocks[0].starts_with(&format!("Name: {}", item_title(1, 1))));
    assert!(written.ends_with("Number of reviews: 0\n\n"));
}

#[tokio::test]
async fn test_persist_write_failure_is_raised() {
    let server = MockServer::start().await;
    mount_catalog(&server, 1, 1, 1).await;
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let options = ScrapeOptions {
        persist: true,
        output_path: Some(blocker.join("books_data.txt")),
        ..records_options(1)
    };
    let result = scrape_books(&catalog_url(&server), &options).await;

    assert!(matches!(result, Err(HarvestError::Io(_))));
}
