//! Unit tests for CLI commands.

use super::*;
use pkglens_config::{ColorChoice, OutputSettings};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Create a test command context pointed at `registry`, writing JSON output
fn create_test_context(temp_dir: &TempDir, registry: &str) -> CommandContext {
    let settings = Settings {
        registry: RegistrySettings {
            url: registry.to_string(),
            downloads_url: registry.to_string(),
            max_retries: 0,
            ..RegistrySettings::default()
        },
        output: OutputSettings {
            json: true,
            color: ColorChoice::Never,
        },
    };
    let cwd = Utf8PathBuf::try_from(temp_dir.path().to_path_buf()).unwrap();
    CommandContext::from_settings(cwd, settings).unwrap()
}

#[test]
fn test_client_config_from_settings() {
    let settings = RegistrySettings {
        url: "https://registry.example.com".to_string(),
        timeout_ms: 2_500,
        max_retries: 5,
        base_delay_ms: 200,
        max_concurrent: 4,
        cache_capacity: 50,
        cache_ttl_secs: 60,
        ..RegistrySettings::default()
    };

    let config = client_config(&settings);
    assert_eq!(config.registry_url, "https://registry.example.com");
    assert_eq!(config.downloads_url, "https://api.npmjs.org");
    assert_eq!(config.timeout, Duration::from_millis(2_500));
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.base_delay, Duration::from_millis(200));
    assert_eq!(config.retry.max_jitter, RetryConfig::default().max_jitter);
    assert_eq!(config.max_concurrent, 4);
    assert_eq!(config.cache_capacity, 50);
    assert_eq!(config.cache_ttl, Duration::from_secs(60));
}

#[test]
fn test_default_settings_match_client_defaults() {
    let config = client_config(&RegistrySettings::default());
    assert_eq!(config, ClientConfig::default());
}

#[tokio::test]
async fn test_dispatch_info_success() {
    let temp_dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lodash"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "lodash",
            "dist-tags": { "latest": "4.17.21" },
            "versions": {},
            "time": {}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let ctx = create_test_context(&temp_dir, &server.uri());
    let command = Commands::Info {
        package: "lodash".to_string(),
    };
    assert!(dispatch_command(command, &ctx).await.unwrap());
}

#[tokio::test]
async fn test_dispatch_reports_failures_as_false() {
    let temp_dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    let ctx = create_test_context(&temp_dir, &server.uri());

    // Unknown package
    let command = Commands::Score {
        package: "does-not-exist".to_string(),
    };
    assert!(!dispatch_command(command, &ctx).await.unwrap());

    // A version range is not an exact version
    let command = Commands::Size {
        package: "lodash@^4".to_string(),
    };
    assert!(!dispatch_command(command, &ctx).await.unwrap());

    let command = Commands::Downloads {
        package: "lodash".to_string(),
        period: "last-year".to_string(),
    };
    assert!(!dispatch_command(command, &ctx).await.unwrap());
}

#[tokio::test]
async fn test_compat_defaults_to_cwd_package_json() {
    let temp_dir = tempfile::tempdir().unwrap();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/react-dom/18.2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "react-dom",
            "version": "18.2.0",
            "peerDependencies": { "react": "^18.2.0" },
            "dist": { "tarball": "", "shasum": "" }
        })))
        .mount(&server)
        .await;

    let ctx = create_test_context(&temp_dir, &server.uri());

    // No package.json yet
    let command = Commands::Compat {
        package: "react-dom@18.2.0".to_string(),
        project: None,
        node: None,
    };
    assert!(!dispatch_command(command, &ctx).await.unwrap());

    std::fs::write(
        temp_dir.path().join("package.json"),
        r#"{ "dependencies": { "react": "^18.2.0" } }"#,
    )
    .unwrap();
    let command = Commands::Compat {
        package: "react-dom@18.2.0".to_string(),
        project: None,
        node: None,
    };
    assert!(dispatch_command(command, &ctx).await.unwrap());
}
