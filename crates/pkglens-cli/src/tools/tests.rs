//! Tool tests against a mock registry.

use super::*;
use pkglens_config::PackageJson;
use pkglens_registry::{DownloadPeriod, RetryConfig, SearchOptions};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> RegistryClient {
    RegistryClient::builder()
        .registry_url(server.uri())
        .downloads_url(server.uri())
        .retry(RetryConfig::none())
        .build()
        .unwrap()
}

fn react_dom_packument() -> serde_json::Value {
    json!({
        "name": "react-dom",
        "description": "React package for working with the DOM.",
        "dist-tags": { "latest": "18.2.0", "next": "19.0.0-rc.0" },
        "license": "MIT",
        "homepage": "https://reactjs.org/",
        "repository": { "type": "git", "url": "git+https://github.com/facebook/react.git", "directory": "packages/react-dom" },
        "keywords": ["react"],
        "maintainers": [{ "name": "gnoff" }, "sophiebits <sophiebits@example.com>"],
        "time": {
            "created": "2011-10-26T17:46:21.942Z",
            "modified": "2024-04-25T18:00:00.000Z",
            "18.1.0": "2022-04-26T16:00:00.000Z",
            "18.2.0": "2022-06-14T19:46:38.369Z"
        },
        "versions": {
            "18.1.0": react_dom_version("18.1.0"),
            "18.2.0": react_dom_version("18.2.0")
        }
    })
}

fn react_dom_version(version: &str) -> serde_json::Value {
    json!({
        "name": "react-dom",
        "version": version,
        "license": "MIT",
        "dependencies": { "loose-envify": "^1.1.0", "scheduler": "^0.23.0" },
        "peerDependencies": { "react": format!("^{}", version) },
        "dist": {
            "tarball": format!("https://registry.npmjs.org/react-dom/-/react-dom-{}.tgz", version),
            "shasum": "abc123",
            "unpackedSize": 4_400_000,
            "fileCount": 60
        }
    })
}

async fn mount_react_dom(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/react-dom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(react_dom_packument()))
        .mount(server)
        .await;
}

#[test]
fn test_report_serialization_flattens_data() {
    let report = Report::ok(json!({ "name": "lodash" }));
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value, json!({ "success": true, "name": "lodash" }));

    let failed: Report<serde_json::Value> =
        Report::failed(&pkglens_core::LensError::not_found("Package 'nope'"));
    let value = serde_json::to_value(&failed).unwrap();
    assert_eq!(value["success"], json!(false));
    assert!(value["error"].as_str().unwrap().contains("not found"));
    assert!(value.get("suggestion").is_some());
}

#[test]
fn test_normalize_repository_url() {
    assert_eq!(
        normalize_repository_url("git+https://github.com/lodash/lodash.git"),
        "https://github.com/lodash/lodash"
    );
    assert_eq!(normalize_repository_url("github:sindresorhus/got"), "https://github.com/sindresorhus/got");
    assert_eq!(normalize_repository_url("git://github.com/a/b.git"), "https://github.com/a/b");
}

#[tokio::test]
async fn test_info_summarizes_packument() {
    let server = MockServer::start().await;
    mount_react_dom(&server).await;

    let report = info::package_info(&test_client(&server), "react-dom").await;
    assert!(report.success);
    let info = report.data.unwrap();
    assert_eq!(info.latest_version.as_deref(), Some("18.2.0"));
    assert_eq!(info.license.as_deref(), Some("MIT"));
    assert_eq!(info.repository.as_deref(), Some("https://github.com/facebook/react"));
    assert_eq!(info.maintainers, vec!["gnoff".to_string(), "sophiebits".to_string()]);
    assert_eq!(info.version_count, 2);
    assert_eq!(info.created.as_deref(), Some("2011-10-26T17:46:21.942Z"));
}

#[tokio::test]
async fn test_unknown_package_is_a_failed_report() {
    let server = MockServer::start().await;
    let report = info::package_info(&test_client(&server), "no-such-package-xyz").await;

    assert!(!report.success);
    assert!(report.data.is_none());
    assert!(report.error.unwrap().contains("not found"));
}

#[tokio::test]
async fn test_invalid_name_fails_before_network() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = info::package_info(&test_client(&server), ".hidden").await;
    assert!(!report.success);
    assert!(report.error.unwrap().starts_with("Invalid package name"));
}

#[tokio::test]
async fn test_version_details_for_exact_version() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/react-dom/18.1.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(react_dom_version("18.1.0")))
        .expect(1)
        .mount(&server)
        .await;

    let report = version::version_details(&test_client(&server), "react-dom", Some("v18.1.0")).await;
    let details = report.data.unwrap();
    assert_eq!(details.version, "18.1.0");
    assert_eq!(details.peer_dependencies.get("react").map(String::as_str), Some("^18.1.0"));
    assert_eq!(details.dependencies.len(), 2);
    assert_eq!(details.file_count, Some(60));
}

#[tokio::test]
async fn test_version_details_rejects_ranges() {
    let server = MockServer::start().await;
    let report = version::version_details(&test_client(&server), "react-dom", Some("^18")).await;
    assert!(!report.success);
}

#[tokio::test]
async fn test_search_preserves_registry_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/-/v1/search"))
        .and(query_param("text", "http client"))
        .and(query_param("size", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "package": { "name": "got", "version": "14.0.0" }, "score": { "final": 0.9 } },
                { "package": { "name": "axios", "version": "1.6.0" }, "score": { "final": 0.95 } }
            ],
            "total": 812,
            "time": "Sat Jun 01 2024"
        })))
        .mount(&server)
        .await;

    let options = SearchOptions { limit: 2, offset: 0 };
    let summary = search::search(&test_client(&server), " http client ", options)
        .await
        .data
        .unwrap();

    let names: Vec<&str> = summary.results.iter().map(|hit| hit.name.as_str()).collect();
    assert_eq!(names, vec!["got", "axios"]);
    assert_eq!(summary.total, 812);
    assert_eq!(summary.query, "http client");
}

#[tokio::test]
async fn test_downloads_report() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/downloads/point/last-month/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloads": 220_000_000u64,
            "start": "2024-05-01",
            "end": "2024-05-30",
            "package": "lodash"
        })))
        .mount(&server)
        .await;

    let report = downloads::downloads(&test_client(&server), "lodash", DownloadPeriod::LastMonth).await;
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["success"], json!(true));
    assert_eq!(value["period"], json!("last-month"));
    assert_eq!(value["downloads"], json!(220_000_000u64));
}

#[tokio::test]
async fn test_score_degrades_without_download_stats() {
    let server = MockServer::start().await;
    mount_react_dom(&server).await;

    let report = score::quality_score(&test_client(&server), "react-dom").await;
    assert!(report.success);
    let quality = report.data.unwrap();
    assert_eq!(quality.weekly_downloads, None);
    assert_eq!(quality.breakdown.popularity, 0);
    assert!(quality.notes.iter().any(|note| note == "download stats unavailable"));
}

#[tokio::test]
async fn test_score_uses_download_stats() {
    let server = MockServer::start().await;
    mount_react_dom(&server).await;
    Mock::given(method("GET"))
        .and(path("/downloads/point/last-week/react-dom"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "downloads": 25_000_000u64,
            "start": "2024-05-25",
            "end": "2024-05-31",
            "package": "react-dom"
        })))
        .mount(&server)
        .await;

    let quality = score::quality_score(&test_client(&server), "react-dom")
        .await
        .data
        .unwrap();
    assert_eq!(quality.weekly_downloads, Some(25_000_000));
    assert_eq!(quality.breakdown.popularity, 25);
    assert_eq!(quality.breakdown.metadata, 27);
}

#[tokio::test]
async fn test_size_uses_latest_version() {
    let server = MockServer::start().await;
    mount_react_dom(&server).await;

    let size = size::package_size(&test_client(&server), "react-dom", None)
        .await
        .data
        .unwrap();
    assert_eq!(size.version, "18.2.0");
    assert_eq!(size.category, size::SizeCategory::Large);
    assert_eq!(size.human_size.as_deref(), Some("4.2 MiB"));
    assert_eq!(size.dependency_count, 2);
}

#[tokio::test]
async fn test_compat_against_project() {
    let server = MockServer::start().await;
    mount_react_dom(&server).await;
    let client = test_client(&server);

    let react_17 = PackageJson {
        dependencies: [("react".to_string(), "^17.0.2".to_string())].into_iter().collect(),
        ..Default::default()
    };
    let report = compat::check_compat(&client, "react-dom", None, &react_17, None)
        .await
        .data
        .unwrap();
    assert_eq!(report.verdict, compat::Verdict::Incompatible);
    assert_eq!(report.peers[0].status, compat::CheckStatus::Unsatisfied);

    let react_18 = PackageJson {
        dependencies: [("react".to_string(), "^18.2.0".to_string())].into_iter().collect(),
        ..Default::default()
    };
    let report = compat::check_compat(&client, "react-dom", None, &react_18, Some("20.11.0"))
        .await
        .data
        .unwrap();
    assert_eq!(report.verdict, compat::Verdict::Compatible);
    assert!(report.engine.is_none());

    let report = compat::check_compat(&client, "react-dom", None, &PackageJson::default(), None)
        .await
        .data
        .unwrap();
    assert_eq!(report.verdict, compat::Verdict::Unknown);
}
