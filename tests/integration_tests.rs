//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: CLI arguments → config → HTTP requests →
//! rendered text/JSON output

use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write as _;
use tempfile::NamedTempFile;
use webrecon::cli::{Cli, Runner};
use webrecon::http::{HttpClient, HttpClientConfig};
use webrecon::pagination::{PaginatedCollector, StopReason};
use webrecon::subdomains::VirusTotalSource;
use webrecon::{Error, HttpMethod, RequestResult};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Write a config file pointing both subdomain sources at the mock server
fn config_file(base: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        "timeout_secs: 5\n\
         retry:\n  max_retries: 2\n  initial_backoff_ms: 1\n  max_backoff_ms: 5\n\
         endpoints:\n  virustotal: \"{base}\"\n  crtsh: \"{base}\"\n"
    )
    .unwrap();
    file
}

async fn run_cli(args: &[&str]) -> Result<String, Error> {
    let cli = Cli::try_parse_from(args).unwrap();
    let mut out = Vec::new();
    Runner::new(cli).run_with_output(&mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

fn listing(ids: &[&str]) -> serde_json::Value {
    json!({ "data": ids.iter().map(|id| json!({ "id": id, "type": "domain" })).collect::<Vec<_>>() })
}

async fn mount_listing_page(server: &MockServer, cursor: &str, ids: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/ui/domains/example.com/subdomains"))
        .and(query_param("cursor", cursor))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing(ids)))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Method Probing
// ============================================================================

#[tokio::test]
async fn test_methods_scan_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .and(header("X-Api", "k=v"))
        .respond_with(ResponseTemplate::new(200).set_body_string("hello"))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(405))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(403).set_body_string("no"))
        .mount(&mock_server)
        .await;

    let url = format!("{}/admin", mock_server.uri());
    let out = run_cli(&["webrecon", "methods", "-u", &url, "--headers", "X-Api=k=v"])
        .await
        .unwrap();

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "");
    assert_eq!(lines[1], url);
    assert_eq!(lines[2], " GET      status = 200, size = 5 bytes");
    assert_eq!(lines[3], " POST     status = 405, size = 0 bytes");
    assert_eq!(lines[4], " PUT      status = 403, size = 2 bytes");
    assert!(lines[5].starts_with(" PATCH    status = 404"));
    assert!(lines[6].starts_with(" DELETE   status = 404"));
    assert_eq!(lines.len(), 7);
}

#[tokio::test]
async fn test_methods_from_file_with_unreachable_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut urls = NamedTempFile::new().unwrap();
    writeln!(urls, "http://127.0.0.1:1/\n\n  {}/  ", mock_server.uri()).unwrap();

    let path = urls.path().to_string_lossy().to_string();
    let out = run_cli(&["webrecon", "methods", "-f", &path, "-e"]).await.unwrap();

    let sections: Vec<&str> = out.split("\n\n").collect();
    assert_eq!(sections.len(), 2);

    // Every method against the closed port is reported inline
    let refused: Vec<&str> = sections[0]
        .lines()
        .filter(|line| line.contains("error = "))
        .collect();
    assert_eq!(refused.len(), HttpMethod::probe_set(true).len());

    assert!(out.contains(&format!("{}/\n GET      status = 200", mock_server.uri())));
}

#[tokio::test]
async fn test_methods_json_format() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .mount(&mock_server)
        .await;

    let url = mock_server.uri();
    let out = run_cli(&["webrecon", "--format", "json", "methods", "-u", &url])
        .await
        .unwrap();

    let value: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(value["url"], url);
    assert_eq!(value["results"][0]["method"], "GET");
    assert_eq!(value["results"][0]["body_size"], 2);
    assert_eq!(value["results"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_methods_malformed_headers_is_usage_error() {
    let result = run_cli(&[
        "webrecon",
        "methods",
        "-u",
        "http://127.0.0.1:1/",
        "--headers",
        "missing-separator",
    ])
    .await;

    assert!(matches!(result, Err(Error::Usage { .. })));
}

#[tokio::test]
async fn test_run_captures_every_outcome() {
    let mock_server = MockServer::start().await;

    Mock::given(method("TRACE"))
        .respond_with(ResponseTemplate::new(501))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let headers = Default::default();
    let cookies = Default::default();

    let ok = client
        .run(&mock_server.uri(), HttpMethod::TRACE, &headers, &cookies)
        .await;
    assert_eq!(ok, RequestResult::success(501, 0));

    let failed = client
        .run("http://127.0.0.1:1/", HttpMethod::GET, &headers, &cookies)
        .await;
    assert_eq!(failed, RequestResult::failure("Connection refused"));
}

// ============================================================================
// Page Scans
// ============================================================================

#[tokio::test]
async fn test_paths_scan_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("Cookie", "session=1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><head><script src="/js/app.js"></script></head>
<body><img src="/logo.png"><a href="/about">About</a><form action="/login"></form></body></html>"#,
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/", mock_server.uri());
    let out = run_cli(&["webrecon", "paths", "-u", &url, "--cookies", "session=1"])
        .await
        .unwrap();

    let expected = format!(
        "[*] Scraping: {url}\n\
         [*] Extracting urls\n\
         \n[+] Media urls:\n/logo.png\n\
         \n[+] Script urls:\n/js/app.js\n\
         \n[+] Link urls:\n/about\n/login\n"
    );
    assert_eq!(out, expected);
}

#[tokio::test]
async fn test_forms_from_url() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<form action="/session" method="post"><input name="user"></form><input name="q">"#,
        ))
        .mount(&mock_server)
        .await;

    let url = format!("{}/login", mock_server.uri());
    let out = run_cli(&["webrecon", "forms", &url]).await.unwrap();

    assert!(out.starts_with("========================= FORMS ======================="));
    assert!(out.contains("        action: /session\n"));
    assert!(out.contains("                name: user\n"));
    assert!(out.contains("=================== STANDALONE INPUTS =====================\n    1. input"));
    assert!(out.contains("        name: q\n"));
}

#[tokio::test]
async fn test_forms_non_200_is_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = run_cli(&["webrecon", "forms", &mock_server.uri()]).await;
    assert!(matches!(result, Err(Error::UnexpectedStatus { status: 404 })));
}

// ============================================================================
// Subdomain Enumeration
// ============================================================================

#[tokio::test]
async fn test_virustotal_collects_until_empty_page() {
    let mock_server = MockServer::start().await;

    mount_listing_page(&mock_server, "STAwCi4=", &["a.example.com", "b.example.com"]).await;
    mount_listing_page(&mock_server, "STEwCi4=", &["c.example.com"]).await;
    mount_listing_page(&mock_server, "STIwCi4=", &[]).await;

    let config = config_file(&mock_server.uri());
    let config_path = config.path().to_string_lossy().to_string();
    let out = run_cli(&["webrecon", "-C", &config_path, "virustotal", "example.com"])
        .await
        .unwrap();

    assert_eq!(out, "a.example.com\nb.example.com\nc.example.com\n");
}

#[tokio::test]
async fn test_virustotal_throttle_is_fatal_without_output() {
    let mock_server = MockServer::start().await;

    mount_listing_page(&mock_server, "STAwCi4=", &["a.example.com"]).await;

    Mock::given(method("GET"))
        .and(path("/ui/domains/example.com/subdomains"))
        .and(query_param("cursor", "STEwCi4="))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let config = config_file(&mock_server.uri());
    let config_path = config.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(["webrecon", "-C", &config_path, "virustotal", "example.com"])
        .unwrap();

    let mut out = Vec::new();
    let result = Runner::new(cli).run_with_output(&mut out).await;

    assert!(matches!(result, Err(Error::UpstreamThrottle)));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_collector_over_virustotal_source() {
    let mock_server = MockServer::start().await;

    mount_listing_page(&mock_server, "STAwCi4=", &["a.example.com"]).await;
    mount_listing_page(&mock_server, "STEwCi4=", &["a.example.com"]).await;

    let client =
        HttpClient::with_config(HttpClientConfig::builder().no_rate_limit().build()).unwrap();
    let collector = PaginatedCollector::new(VirusTotalSource::new(&client, mock_server.uri()));

    let collection = collector.collect("example.com").await.unwrap();

    assert_eq!(collection.results.len(), 1);
    assert_eq!(collection.stop, StopReason::RedundantPage);
    assert_eq!(collection.stopped_at, 1);
    assert_eq!(collection.pages_fetched, 2);
}

#[tokio::test]
async fn test_crtsh_retries_then_lists_names() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "example.com"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<table><tr><td class=\"outer\">form</td></tr>\
             <tr><td class=\"outer\"><table>\
             <tr><th>ID</th><th>Logged</th><th>Before</th><th>After</th><th>Names</th></tr>\
             <tr><td>1</td><td>x</td><td>x</td><td>x</td><td>www.example.com<br>example.com</td></tr>\
             </table></td></tr></table>",
        ))
        .mount(&mock_server)
        .await;

    let config = config_file(&mock_server.uri());
    let config_path = config.path().to_string_lossy().to_string();
    let out = run_cli(&["webrecon", "-C", &config_path, "crtsh", "example.com"])
        .await
        .unwrap();

    assert_eq!(out, "example.com\nwww.example.com\n");
}

#[tokio::test]
async fn test_crtsh_persistent_502_gives_up() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .expect(3)
        .mount(&mock_server)
        .await;

    let config = config_file(&mock_server.uri());
    let config_path = config.path().to_string_lossy().to_string();
    let result = run_cli(&["webrecon", "-C", &config_path, "crtsh", "example.com"]).await;

    assert!(matches!(
        result,
        Err(Error::MaxRetriesExceeded {
            max_retries: 2,
            status: 502
        })
    ));
}

// ============================================================================
// Payload and Config
// ============================================================================

#[tokio::test]
async fn test_char_code_output() {
    let out = run_cli(&["webrecon", "char-code", "TEST"]).await.unwrap();
    assert_eq!(out, "String.fromCharCode(84,69,83,84)\n");
}

#[tokio::test]
async fn test_invalid_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "timeout_secs: 0").unwrap();

    let config_path = file.path().to_string_lossy().to_string();
    let result = run_cli(&["webrecon", "-C", &config_path, "char-code", "A"]).await;

    assert!(matches!(result, Err(Error::Config { .. })));
}
