//! Integration tests for the HTTP client against a mock remote store.

use lanes::{ApiError, BoardApi, Config, HttpClient, Id, Task};
use serde_json::json;
use std::net::TcpListener;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, cookie: Option<&str>) -> HttpClient {
    let config = Config {
        api_url: format!("{}/api", server.uri()),
        ..Config::default()
    };
    HttpClient::new(&config, cookie).unwrap()
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_fetch_project_unwraps_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "name": "Launch",
                "columns": [
                    {"_id": "colA", "title": "To do"},
                    {"_id": "colB", "title": "Done"}
                ]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let detail = client_for(&server, None).fetch_project(&Id::from("p1")).await.unwrap();

    assert_eq!(detail.name, "Launch");
    assert_eq!(detail.columns.len(), 2);
    assert_eq!(detail.columns[1].id, "colB");
}

#[tokio::test]
async fn test_fetch_tasks_keeps_server_order_and_fields() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/p1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                {"_id": "t2", "columnId": "colA", "content": "second", "projectId": "p1"},
                {"_id": "t1", "columnId": "colB"}
            ]
        })))
        .mount(&server)
        .await;

    let tasks = client_for(&server, None).fetch_tasks(&Id::from("p1")).await.unwrap();

    assert_eq!(tasks[0].id, "t2");
    assert_eq!(tasks[0].extra["projectId"], json!("p1"));
    assert_eq!(tasks[1].content, "");
}

#[tokio::test]
async fn test_list_projects() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{"_id": "p1", "name": "Launch"}]
        })))
        .mount(&server)
        .await;

    let projects = client_for(&server, None).list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Launch");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/p1/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server, None).fetch_tasks(&Id::from("p1")).await;
    assert!(matches!(result, Err(ApiError::Decode(_))));
}

// =============================================================================
// Writes
// =============================================================================

#[tokio::test]
async fn test_persist_sends_full_sequence() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/p1/update-tasks"))
        .and(body_json(json!([
            {"_id": "t2", "columnId": "colA", "content": "b"},
            {"_id": "t1", "columnId": "colB", "content": "a"}
        ])))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let tasks = vec![Task::new("t2", "colA", "b"), Task::new("t1", "colB", "a")];
    client_for(&server, None)
        .persist_tasks(&Id::from("p1"), &tasks)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_task_body() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/add-task"))
        .and(body_json(json!({"projectId": "p1", "columnId": "colA"})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server, None)
        .create_task(&Id::from("p1"), &Id::from("colA"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_update_and_delete_task() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/t1"))
        .and(body_json(json!({"newContent": "Ship it"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/tasks/t1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    client.update_task(&Id::from("t1"), "Ship it").await.unwrap();
    client.delete_task(&Id::from("t1")).await.unwrap();
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_unauthorized_statuses() {
    for status in [401, 403] {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let err = client_for(&server, None).list_projects().await.unwrap_err();
        assert_eq!(err, ApiError::Unauthorized { status });
        assert!(err.is_auth());
    }
}

#[tokio::test]
async fn test_error_body_message() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/tasks/p1/update-tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"error": "database unavailable"})))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .persist_tasks(&Id::from("p1"), &[])
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 500,
            message: "database unavailable".to_string()
        }
    );
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_error_without_body_uses_reason() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/projects/p9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server, None)
        .delete_project(&Id::from("p9"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            message: "Not Found".to_string()
        }
    );
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    // Reserve a port, then free it so nothing is listening there
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = Config {
        api_url: format!("http://127.0.0.1:{}/api", port),
        ..Config::default()
    };
    let client = HttpClient::new(&config, None).unwrap();

    let err = client.list_projects().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(err.is_transient());
}

// =============================================================================
// Session Cookie
// =============================================================================

#[tokio::test]
async fn test_login_captures_cookie() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"email": "ada@example.com", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "sid=abc123; Path=/"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, None);
    assert!(client.session_cookie().is_none());

    client.login("ada@example.com", "secret").await.unwrap();
    assert_eq!(client.session_cookie(), Some("sid=abc123".to_string()));
}

#[tokio::test]
async fn test_saved_cookie_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .and(header("cookie", "sid=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let projects = client_for(&server, Some("sid=abc123")).list_projects().await.unwrap();
    assert!(projects.is_empty());
}
