//! Catalog retrieval against a mock metadata endpoint

use lintforge_core::catalog::fetch_catalog;
use lintforge_core::{BiomeAdapter, ErrorKind};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const METADATA_PATH: &str = "/metadata/rules.json";

fn metadata() -> serde_json::Value {
    json!({
        "lints": {
            "languages": {
                "js": {
                    "suspicious": {
                        "noDebugger": {
                            "version": "1.0.0",
                            "recommended": true,
                            "docs": "Disallow the use of debugger",
                            "sources": [{ "eslint": "no-debugger" }]
                        },
                        "noConsole": {
                            "sourceKind": "inspired",
                            "sources": [{ "eslint": "no-console" }]
                        }
                    }
                },
                "jsx": {
                    "correctness": {
                        "useJsxKeyInIterable": {
                            "sources": [{ "eslintReact": "jsx-key" }]
                        }
                    }
                }
            }
        }
    })
}

async fn serve(response: ResponseTemplate) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(METADATA_PATH))
        .respond_with(response)
        .mount(&server)
        .await;
    server
}

fn url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), METADATA_PATH)
}

#[tokio::test]
async fn test_fetch_and_flatten() {
    let server = serve(ResponseTemplate::new(200).set_body_json(metadata())).await;

    let catalog = BiomeAdapter::default().fetch(&url(&server)).await.unwrap();
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.entries["noDebugger"].original_rule, "no-debugger");
    assert_eq!(catalog.entries["noDebugger"].category, "suspicious");
    assert_eq!(
        catalog.entries["useJsxKeyInIterable"].original_rule,
        "react/jsx-key"
    );
    assert!(!catalog.entries.contains_key("noConsole"));

    let inspired = BiomeAdapter::default()
        .include_inspired(true)
        .fetch(&url(&server))
        .await
        .unwrap();
    assert_eq!(inspired.entries["noConsole"].original_rule, "no-console");
}

#[tokio::test]
async fn test_server_error_is_fetch_error() {
    let server = serve(ResponseTemplate::new(500)).await;

    let err = fetch_catalog(&url(&server)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(err.to_string().contains("500"));
    assert!(err.is_fatal_to_run());
}

#[tokio::test]
async fn test_missing_languages_is_format_error() {
    let server = serve(ResponseTemplate::new(200).set_body_json(json!({ "lints": {} }))).await;

    let err = fetch_catalog(&url(&server)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
    assert!(err.to_string().contains("lints.languages"));
}

#[tokio::test]
async fn test_non_json_body_is_format_error() {
    let server = serve(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>")).await;

    let err = fetch_catalog(&url(&server)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[tokio::test]
async fn test_unreachable_host_is_fetch_error() {
    let err = fetch_catalog("http://127.0.0.1:1/rules.json")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Fetch);
}
