//! Integration tests for the monitor
//!
//! These tests use wiremock to stand up landing pages and run the full
//! fetch, classify, aggregate and notify cycle end-to-end.

use chrono::NaiveDate;
use landing_monitor::checker::{ErrorCategory, Monitor, FETCH_FAILURE_MESSAGE};
use landing_monitor::config::parse_config;
use landing_monitor::output::summary::ALL_CLEAR_TITLE;
use landing_monitor::output::write_report;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 2024-01-01 was a Monday
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
}

fn tuesday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
}

/// Mounts the standard set of landing pages on the mock server
async fn mount_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>All good</html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/moved"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/ok"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/liquid"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html>Liquid error: undefined method</html>"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_run_classifies_each_page() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let base = server.uri();

    let config = parse_config(&format!(
        r#"
[notification]
recipients = ["ops@example.com"]

[[target]]
name = "Shop"
[[target.entries]]
final-url = "{base}/ok?gclid=abc"
[[target.entries]]
final-url = "{base}/ok?gclid=def"
[[target.entries]]
final-url = "{base}/missing"
[[target.entries]]
final-url = "{base}/moved"
[[target.entries]]
final-url = "{base}/liquid"
[[target.entries]]
final-url = "{base}/paused"
status = "PAUSED"
"#
    ))
    .unwrap();

    let monitor = Monitor::new(config).unwrap();
    let report = monitor.run(tuesday(), false).await.unwrap();

    assert_eq!(report.targets.len(), 1);
    let shop = &report.targets[0].data;

    // Query strings stripped, paused entry skipped
    assert_eq!(shop.url_count(), 4);

    assert_eq!(shop.bad_urls().len(), 1);
    assert_eq!(shop.bad_urls()[0].url(), format!("{}/missing", base));
    assert_eq!(shop.bad_urls()[0].message(), "HTTP Error Code - 404");

    assert_eq!(shop.warn_urls().len(), 1);
    assert_eq!(shop.warn_urls()[0].url(), format!("{}/moved", base));
    assert_eq!(shop.warn_urls()[0].message(), "HTTP Code - 301");

    assert_eq!(shop.on_page_errors().len(), 1);
    assert_eq!(shop.on_page_errors()[0].url(), format!("{}/liquid", base));
    assert_eq!(
        shop.on_page_errors()[0].message(),
        "Page contains: \"Liquid error:\""
    );

    assert_eq!(report.summary.total_errors, 1);
    assert_eq!(report.summary.total_warnings, 1);
    assert_eq!(report.summary.total_content_errors, 1);
    assert_eq!(
        report.summary.title,
        "Errors found! 1 url(s) have errors - please check ASAP."
    );
    assert!(report.summary.should_notify);
    assert!(!report.notified);

    assert!(report.document.contains("<h2 style=\"color: #757575; line-height: 100%;\">Shop</h2>"));
    assert!(report
        .document
        .contains("Of the 4 urls checked, 1 contain errors, 1 have warning signs, and 1 have content errors."));
}

#[tokio::test]
async fn test_unreachable_url_does_not_stop_the_pass() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let base = server.uri();

    let config = parse_config(&format!(
        r#"
[notification]
recipients = ["ops@example.com"]

[[target]]
name = "Mixed"
[[target.entries]]
final-url = "http://127.0.0.1:1/unreachable"
[[target.entries]]
final-url = "{base}/missing"
[[target.entries]]
final-url = "{base}/ok"
"#
    ))
    .unwrap();

    let report = Monitor::new(config)
        .unwrap()
        .run(tuesday(), false)
        .await
        .unwrap();

    let mixed = &report.targets[0].data;
    assert!(mixed.is_processed());
    assert_eq!(mixed.bad_urls().len(), 2);

    assert_eq!(mixed.bad_urls()[0].url(), "http://127.0.0.1:1/unreachable");
    assert_eq!(mixed.bad_urls()[0].message(), FETCH_FAILURE_MESSAGE);
    assert_eq!(mixed.bad_urls()[0].category(), ErrorCategory::FetchFailure);

    assert_eq!(mixed.bad_urls()[1].message(), "HTTP Error Code - 404");
    assert!(mixed.warn_urls().is_empty());
    assert!(mixed.on_page_errors().is_empty());
}

#[tokio::test]
async fn test_targets_are_reported_in_configuration_order() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let base = server.uri();

    let config = parse_config(&format!(
        r#"
[fetcher]
concurrency = 4

[notification]
recipients = ["ops@example.com"]

[[target]]
name = "Zeta"
[[target.entries]]
final-url = "{base}/moved"

[[target]]
name = "Empty"

[[target]]
name = "Alpha"
[[target.entries]]
final-url = "{base}/ok"
[[target.entries]]
final-url = "{base}/liquid"
"#
    ))
    .unwrap();

    let report = Monitor::new(config)
        .unwrap()
        .run(tuesday(), false)
        .await
        .unwrap();

    let names: Vec<_> = report.targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Zeta", "Empty", "Alpha"]);

    // A target with nothing to check contributes no fragment
    assert!(report.targets[1].text.is_empty());
    assert!(report.targets[1].data.is_clean());

    assert_eq!(
        report.summary.title,
        "Content errors found! 1 url(s) have warning signs."
    );
}

#[tokio::test]
async fn test_reassurance_notification_is_written_to_outbox() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let base = server.uri();
    let outbox = tempfile::tempdir().unwrap();

    let config_text = format!(
        r#"
[notification]
recipients = ["ops@example.com", "lead@example.com"]
reply-to = "scripts@example.com"
outbox-dir = "{outbox}"

[[target]]
name = "Healthy"
[[target.entries]]
final-url = "{base}/ok"
"#,
        outbox = outbox.path().display()
    );

    // Clean run on a regular day: nothing is sent
    let report = Monitor::new(parse_config(&config_text).unwrap())
        .unwrap()
        .run(tuesday(), true)
        .await
        .unwrap();
    assert_eq!(report.summary.title, ALL_CLEAR_TITLE);
    assert!(!report.summary.should_notify);
    assert!(!report.notified);
    assert_eq!(std::fs::read_dir(outbox.path()).unwrap().count(), 0);

    // Same run on the reassurance day: the all-clear goes out
    let report = Monitor::new(parse_config(&config_text).unwrap())
        .unwrap()
        .run(monday(), true)
        .await
        .unwrap();
    assert!(report.notified);

    let files: Vec<_> = std::fs::read_dir(outbox.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);

    let message = std::fs::read_to_string(&files[0]).unwrap();
    assert!(message.contains("To: ops@example.com,lead@example.com\r\n"));
    assert!(message.contains("Reply-To: scripts@example.com\r\n"));
    assert!(message.contains("Subject: Landing Page Monitor\r\n"));
    assert!(message.contains(ALL_CLEAR_TITLE));
    assert!(!message.contains("HTTP Error Code"));
}

#[tokio::test]
async fn test_markdown_report_written_to_disk() {
    let server = MockServer::start().await;
    mount_pages(&server).await;
    let base = server.uri();
    let dir = tempfile::tempdir().unwrap();

    let config = parse_config(&format!(
        r#"
[notification]
recipients = ["ops@example.com"]
send-reassurance-email = false

[output]
format = "markdown"

[[target]]
name = "Blog"
[[target.entries]]
final-url = "{base}/missing"
"#
    ))
    .unwrap();

    let report = Monitor::with_config_hash(config, Some("abc123"))
        .unwrap()
        .run(monday(), false)
        .await
        .unwrap();

    let path = dir.path().join("reports").join("monitor.md");
    write_report(&report.document, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.starts_with("# Landing Page Monitor"));
    assert!(written.contains("Blog"));
    assert!(written.contains("HTTP Error Code - 404"));
    assert!(written.contains("Config hash: abc123"));
}
