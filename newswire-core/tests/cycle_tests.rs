// End-to-end tests for the scrape cycle against a mock listing site

use newswire_core::config::{SourceConfig, default_selectors};
use newswire_core::cycle::run_cycle;
use newswire_core::store::Database;
use newswire_scraper::Fetcher;
use tempfile::TempDir;
use tokio::sync::Mutex;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn create_test_db() -> (TempDir, Mutex<Database>) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db = Database::new(&db_path).unwrap();
    (temp_dir, Mutex::new(db))
}

fn source(url: String) -> SourceConfig {
    SourceConfig {
        url,
        selectors: default_selectors(),
    }
}

const LISTING_PAGE: &str = r#"
    <html><body>
        <div class="cms_Chrome">
            <div class="title"><a href="/story-1">First headline</a></div>
            <div class="description">First description</div>
            <div class="citation"><a>Jane Doe</a><span>Aug 1, 2026</span></div>
            <div class="pull-right"><a href="/story-1"><img src="/one.jpg"></a></div>
        </div>
        <div class="cms_Chrome">
            <div class="title"><a href="/story-2">Second headline</a></div>
            <div class="description">Second description</div>
            <div class="citation"><a>John Roe</a><span>Aug 2, 2026</span></div>
            <div class="pull-right"><a href="/story-2"><img src="/two.jpg"></a></div>
        </div>
    </body></html>
"#;

async fn mount_listing(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_one_cycle_produces_ordered_records() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/news-list", LISTING_PAGE).await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let url = format!("{}/news-list", mock_server.uri());
    let sources = vec![source(url.clone())];

    let summary = run_cycle(&fetcher, &db, &sources, 1000).await;

    assert_eq!(summary.completed, vec![(url.clone(), 2)]);
    assert!(summary.failed.is_empty());

    let records = db.lock().await.list_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].index, 1);
    assert_eq!(records[1].index, 2);
    assert_eq!(records[0].site, url);
    assert_eq!(records[0].headline, "First headline");
    assert_eq!(records[0].author, "Jane Doe");
    assert_eq!(records[0].image.as_deref(), Some("/one.jpg"));
    assert_eq!(records[1].date, "Aug 2, 2026");
}

#[tokio::test]
async fn test_failing_source_does_not_block_the_next_one() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/healthy", LISTING_PAGE).await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let broken = format!("{}/broken", mock_server.uri());
    let healthy = format!("{}/healthy", mock_server.uri());
    let sources = vec![source(broken.clone()), source(healthy.clone())];

    let summary = run_cycle(&fetcher, &db, &sources, 1000).await;

    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, broken);
    assert_eq!(summary.completed, vec![(healthy.clone(), 2)]);

    // The healthy source keeps its per-source offset (position 1).
    let records = db.lock().await.list_all().unwrap();
    let indexes: Vec<i64> = records.iter().map(|r| r.index).collect();
    assert_eq!(indexes, vec![1001, 1002]);
    assert!(records.iter().all(|r| r.site == healthy));
}

#[tokio::test]
async fn test_sources_get_distinct_offset_ranges() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/first", LISTING_PAGE).await;
    mount_listing(&mock_server, "/second", LISTING_PAGE).await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let sources = vec![
        source(format!("{}/first", mock_server.uri())),
        source(format!("{}/second", mock_server.uri())),
    ];

    run_cycle(&fetcher, &db, &sources, 1000).await;

    let records = db.lock().await.list_all().unwrap();
    let indexes: Vec<i64> = records.iter().map(|r| r.index).collect();
    assert_eq!(indexes, vec![1, 2, 1001, 1002]);
}

#[tokio::test]
async fn test_two_identical_cycles_yield_identical_records() {
    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/news-list", LISTING_PAGE).await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let sources = vec![source(format!("{}/news-list", mock_server.uri()))];

    run_cycle(&fetcher, &db, &sources, 1000).await;
    let first = db.lock().await.list_all().unwrap();

    run_cycle(&fetcher, &db, &sources, 1000).await;
    let second = db.lock().await.list_all().unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_empty_page_clears_stale_records() {
    let mock_server = MockServer::start().await;

    // First cycle sees a populated listing, the second an empty page.
    Mock::given(method("GET"))
        .and(path("/news-list"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html")
                .set_body_string(LISTING_PAGE),
        )
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_listing(
        &mock_server,
        "/news-list",
        "<html><body><p>maintenance</p></body></html>",
    )
    .await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let url = format!("{}/news-list", mock_server.uri());
    let sources = vec![source(url.clone())];

    run_cycle(&fetcher, &db, &sources, 1000).await;
    assert_eq!(db.lock().await.list_all().unwrap().len(), 2);

    let summary = run_cycle(&fetcher, &db, &sources, 1000).await;
    assert_eq!(summary.completed, vec![(url, 0)]);
    assert!(db.lock().await.list_all().unwrap().is_empty());
}

#[tokio::test]
async fn test_src_less_image_does_not_steal_the_next_ones() {
    let page = r#"
        <div class="cms_Chrome">
            <div class="title"><a href="/s1">Lazy-loaded story</a></div>
            <div class="pull-right"><a href="/s1"><img data-lazy="/lazy.jpg"></a></div>
        </div>
        <div class="cms_Chrome">
            <div class="title"><a href="/s2">Illustrated story</a></div>
            <div class="pull-right"><a href="/s2"><img src="/second.jpg"></a></div>
        </div>
    "#;

    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/news-list", page).await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let sources = vec![source(format!("{}/news-list", mock_server.uri()))];

    run_cycle(&fetcher, &db, &sources, 1000).await;

    let records = db.lock().await.list_all().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].image, None);
    assert_eq!(records[1].image.as_deref(), Some("/second.jpg"));
}

#[tokio::test]
async fn test_missing_fields_fall_back_to_defaults() {
    let page = r#"
        <div class="cms_Chrome">
            <div class="title"><a href="/s1">Bylined story</a></div>
            <div class="citation"><a>Jane Doe</a></div>
        </div>
        <div class="cms_Chrome">
            <div class="title"><a href="/s2">Anonymous story</a></div>
        </div>
        <div class="cms_Chrome">
            <div class="title"><a href="/s3">Another anonymous story</a></div>
        </div>
    "#;

    let mock_server = MockServer::start().await;
    mount_listing(&mock_server, "/news-list", page).await;

    let (_temp_dir, db) = create_test_db();
    let fetcher = Fetcher::new();
    let sources = vec![source(format!("{}/news-list", mock_server.uri()))];

    run_cycle(&fetcher, &db, &sources, 1000).await;

    let records = db.lock().await.list_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].author, "Jane Doe");
    assert_eq!(records[1].author, "Author not found");
    assert_eq!(records[2].author, "Author not found");
    assert!(records.iter().all(|r| r.date == "Date not found"));
    assert!(records.iter().all(|r| r.image.is_none()));
}
