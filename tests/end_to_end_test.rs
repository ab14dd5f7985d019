use collrun::http::HttpClient;
use collrun::runner::{CollectionRunner, RunSummary};
use collrun::{CollectionLoader, CollrunError, Value, VariableStore};
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn users_collection() -> serde_json::Value {
    json!({
        "info": {"name": "users api"},
        "variable": [{"key": "name", "value": "from-collection"}],
        "item": [
            {
                "name": "users",
                "item": [
                    {
                        "name": "create_user",
                        "event": [{
                            "listen": "test",
                            "script": {"exec": [
                                "var jsonData = pm.response.json();",
                                "pm.environment.set(\"uid\", jsonData.responseData.user.id);",
                                "pm.environment.set(\"tags\", jsonData.responseData.user.tags);",
                                "pm.environment.set(\"created\", \"yes\");"
                            ]}
                        }],
                        "request": {
                            "method": "POST",
                            "header": [{"key": "Content-Type", "value": "application/json"}],
                            "body": {"mode": "raw", "raw": "{\"name\": \"{{name}}\", \"roles\": \"{{roles}}\"}"},
                            "url": {"raw": "{{host_url}}/users"}
                        }
                    },
                    {
                        "name": "get_user",
                        "request": {
                            "method": "GET",
                            "header": [{"key": "Authorization", "value": "{{token}}"}],
                            "url": "{{host_url}}/users/{{uid}}"
                        }
                    },
                    {
                        "name": "tag_user",
                        "request": {
                            "method": "PUT",
                            "body": {"mode": "raw", "raw": "{\"tags\": {{tags}}}"},
                            "url": "{{host_url}}/users/{{uid}}/tags"
                        }
                    }
                ]
            },
            {"name": "health", "request": "{{host_url}}/health"}
        ]
    })
}

fn write_collection(dir: &TempDir) -> std::path::PathBuf {
    let file = dir.path().join("users.postman_collection.json");
    fs::write(&file, users_collection().to_string()).unwrap();
    file
}

fn initial_store(server: &MockServer) -> VariableStore {
    let mut store = VariableStore::new();
    store.set("host_url", server.uri());
    store.set("name", "alice");
    store.set("token", "T");
    store.set("roles", vec!["admin".to_string(), "dev".to_string()]);
    store
}

async fn mount_user_api(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(body_json(json!({"name": "alice", "roles": ["admin", "dev"]})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "responseData": {"user": {"id": "abc123", "tags": ["new", "beta"]}}
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/abc123"))
        .and(header("Authorization", "Bearer T"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "gone"})))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/users/abc123/tags"))
        .and(body_json(json!({"tags": ["new", "beta"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/health"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(server)
        .await;
}

/// Captured values flow from one response into the next request
#[tokio::test]
async fn test_chained_requests_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_user_api(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let collection = CollectionLoader::load_from_path(write_collection(&temp_dir)).unwrap();
    let mut runner = CollectionRunner::new(
        collection,
        initial_store(&mock_server),
        HttpClient::new().unwrap(),
    );

    let created = runner.find_and_send("create_user").await.unwrap();
    assert_eq!(created.response.status.code(), 201);
    assert_eq!(runner.store().get("uid"), Some(&Value::from("abc123")));
    assert_eq!(runner.store().get("created"), Some(&Value::from("yes")));
    assert_eq!(
        runner.store().get("tags"),
        Some(&Value::ListOfString(vec!["new".to_string(), "beta".to_string()]))
    );

    // non-2xx is still a response
    let fetched = runner.find_and_send("get_user").await.unwrap();
    assert_eq!(fetched.response.status.code(), 404);
    assert_eq!(fetched.json, json!({"error": "gone"}));

    let tagged = runner.find_and_send("tag_user").await.unwrap();
    assert_eq!(tagged.json, json!({"ok": true}));
}

#[tokio::test]
async fn test_non_json_body_is_decode_error() {
    let mock_server = MockServer::start().await;
    mount_user_api(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let collection = CollectionLoader::load_from_path(write_collection(&temp_dir)).unwrap();
    let store_before = initial_store(&mock_server);
    let mut runner = CollectionRunner::new(collection, store_before, HttpClient::new().unwrap());
    let snapshot = runner.store().clone();

    let result = runner.find_and_send("health").await;
    assert!(matches!(result, Err(CollrunError::DecodeError(_))));
    assert_eq!(runner.store(), &snapshot);
}

#[tokio::test]
async fn test_run_all_in_collection_order() {
    let mock_server = MockServer::start().await;
    mount_user_api(&mock_server).await;

    let temp_dir = TempDir::new().unwrap();
    let collection = CollectionLoader::load_from_path(write_collection(&temp_dir)).unwrap();
    let mut runner = CollectionRunner::new(
        collection,
        initial_store(&mock_server),
        HttpClient::new().unwrap(),
    );

    let results = runner.run_all(false).await;
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["create_user", "get_user", "tag_user", "health"]);
    assert_eq!(results[1].status.map(|s| s.code()), Some(404));
    assert!(results[..3].iter().all(|r| r.success));
    assert!(!results[3].success);

    let summary = RunSummary::from_results(&results);
    assert_eq!(summary.passed, 3);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.non_success_status, 1);
}

#[tokio::test]
async fn test_transport_failure() {
    // nothing listens on this port once the server is dropped
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let temp_dir = TempDir::new().unwrap();
    let collection = CollectionLoader::load_from_path(write_collection(&temp_dir)).unwrap();
    let mut store = VariableStore::new();
    store.set("host_url", uri);

    let mut runner = CollectionRunner::new(collection, store, HttpClient::new().unwrap());
    let result = runner.find_and_send("create_user").await;
    assert!(matches!(result, Err(ref e) if e.is_transport_error()));
    assert!(!runner.store().contains("uid"));
}
