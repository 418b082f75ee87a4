use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum_helpers::{API_VERSION_METADATA_KEY, ShutdownCoordinator};
use core_config::ListenerConfig;
use domain_todo::TodoService;
use grpc_client::server::ServerConfig;
use http_body_util::BodyExt;
use prost_types::Timestamp;
use rpc::todo::v1::{
    CreateRequest, DeleteRequest, ReadAllRequest, ReadRequest, ToDo, UpdateRequest,
    to_do_service_client::ToDoServiceClient,
};
use serde_json::{Value, json};
use test_utils::InMemoryTodoStore;
use todo_server::{Listeners, TransportConfig, gateway, serve};
use tokio::task::JoinHandle;
use tonic::Code;
use tonic::transport::Channel;
use tower::ServiceExt;

struct Harness {
    store: InMemoryTodoStore,
    grpc_addr: SocketAddr,
    coordinator: ShutdownCoordinator,
    handle: JoinHandle<eyre::Result<()>>,
}

impl Harness {
    async fn start() -> Self {
        let local = ListenerConfig::new("127.0.0.1", 0);
        let listeners = Listeners::bind(&local, &local).await.unwrap();
        let grpc_addr = listeners.grpc_addr().unwrap();
        let transport = TransportConfig::new(ServerConfig::new(local.clone()), local)
            .with_shutdown_timeout(Duration::from_secs(1));

        let store = InMemoryTodoStore::new();
        let coordinator = ShutdownCoordinator::new();
        let handle = tokio::spawn({
            let service = TodoService::new(store.clone());
            let coordinator = coordinator.clone();
            async move { serve(listeners, service, &transport, coordinator).await }
        });

        Self {
            store,
            grpc_addr,
            coordinator,
            handle,
        }
    }

    async fn client(&self) -> ToDoServiceClient<Channel> {
        ToDoServiceClient::connect(format!("http://{}", self.grpc_addr))
            .await
            .unwrap()
    }

    fn gateway(&self) -> Router {
        gateway::router(self.grpc_addr, Duration::from_secs(5)).unwrap()
    }

    async fn stop(self) {
        self.coordinator.shutdown();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("servers did not stop")
            .unwrap()
            .unwrap();
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn call_raw(app: &Router, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn new_year() -> Timestamp {
    Timestamp {
        seconds: 1_704_067_200,
        nanos: 0,
    }
}

#[tokio::test]
async fn test_grpc_scenario() {
    let harness = Harness::start().await;
    let mut client = harness.client().await;

    let id = client
        .create(CreateRequest {
            api: "v1".into(),
            to_do: Some(ToDo {
                id: 0,
                title: "buy milk".into(),
                description: "2%".into(),
                reminder: Some(new_year()),
            }),
        })
        .await
        .unwrap()
        .into_inner()
        .id;
    assert!(id > 0);

    let read = client
        .read(ReadRequest {
            api: "v1".into(),
            id,
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(read.api, "v1");
    let todo = read.to_do.unwrap();
    assert_eq!(todo.title, "buy milk");
    assert_eq!(todo.description, "2%");
    assert_eq!(todo.reminder, Some(new_year()));

    let updated = client
        .update(UpdateRequest {
            api: "v1".into(),
            to_do: Some(ToDo {
                title: "buy oat milk".into(),
                ..todo
            }),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(updated.updated, 1);

    let all = client
        .read_all(ReadAllRequest { api: "v1".into() })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(all.to_dos.len(), 1);
    assert_eq!(all.to_dos[0].title, "buy oat milk");

    let deleted = client
        .delete(DeleteRequest {
            api: "v1".into(),
            id,
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(deleted.deleted, 1);

    let status = client
        .read(ReadRequest {
            api: "v1".into(),
            id,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), format!("ToDo with ID='{id}' is not found"));
    assert_eq!(
        status.metadata().get(API_VERSION_METADATA_KEY).unwrap(),
        "v1"
    );

    assert_eq!(harness.store.open_connections(), 0);
    harness.stop().await;
}

#[tokio::test]
async fn test_grpc_version_mismatch() {
    let harness = Harness::start().await;
    let mut client = harness.client().await;

    let status = client
        .read_all(ReadAllRequest { api: "v2".into() })
        .await
        .unwrap_err();
    assert_eq!(status.code(), Code::Unimplemented);
    assert_eq!(
        status.message(),
        "unsupported API version: service implements API version 'v1', but asked for 'v2'"
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_grpc_health_reports_serving() {
    use tonic_health::pb::HealthCheckRequest;
    use tonic_health::pb::health_check_response::ServingStatus;
    use tonic_health::pb::health_client::HealthClient;

    let harness = Harness::start().await;
    let channel = Channel::from_shared(format!("http://{}", harness.grpc_addr))
        .unwrap()
        .connect()
        .await
        .unwrap();
    let mut health = HealthClient::new(channel);

    let response = health
        .check(HealthCheckRequest {
            service: "todo.v1.ToDoService".into(),
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(response.status, ServingStatus::Serving as i32);

    harness.stop().await;
}

#[tokio::test]
async fn test_gateway_scenario() {
    let harness = Harness::start().await;
    let app = harness.gateway();

    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/task",
        Some(json!({
            "api": "v1",
            "toDo": {
                "title": "buy milk",
                "description": "2%",
                "reminder": "2024-01-01T00:00:00Z"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api"], "v1");
    let id: i64 = body["id"].as_str().unwrap().parse().unwrap();
    assert!(id > 0);

    let (status, body) = call(&app, Method::GET, &format!("/v1/task/{id}?api=v1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "api": "v1",
            "toDo": {
                "id": id.to_string(),
                "title": "buy milk",
                "description": "2%",
                "reminder": "2024-01-01T00:00:00Z"
            }
        })
    );

    // path id wins over the body id
    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/v1/task/{id}"),
        Some(json!({
            "api": "v1",
            "toDo": {
                "id": "999",
                "title": "buy oat milk",
                "description": "2%",
                "reminder": "2024-01-01T00:00:00Z"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "api": "v1", "updated": "1" }));

    let (status, body) = call(&app, Method::GET, "/v1/task/all", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["toDos"].as_array().unwrap().len(), 1);
    assert_eq!(body["toDos"][0]["title"], "buy oat milk");

    let (status, body) = call(&app, Method::DELETE, &format!("/v1/task/{id}?api=v1"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "api": "v1", "deleted": "1" }));

    let (status, body) = call(&app, Method::GET, &format!("/v1/task/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({
            "api": "v1",
            "code": 5,
            "error": "NOT_FOUND",
            "message": format!("ToDo with ID='{id}' is not found")
        })
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_gateway_accepts_legacy_field_name() {
    let harness = Harness::start().await;
    let app = harness.gateway();

    let (status, _) = call(
        &app,
        Method::POST,
        "/v1/task",
        Some(json!({
            "todo": { "title": "legacy", "reminder": "2024-01-01T01:00:00+01:00" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let rows = harness.store.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "legacy");
    assert_eq!(rows[0].reminder.timestamp(), 1_704_067_200);

    harness.stop().await;
}

#[tokio::test]
async fn test_gateway_error_mapping() {
    let harness = Harness::start().await;
    let app = harness.gateway();

    let (status, body) = call(&app, Method::GET, "/v1/task/all?api=v2", None).await;
    assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(body["api"], "v1");
    assert_eq!(body["code"], 12);
    assert_eq!(body["error"], "UNIMPLEMENTED");

    let (status, body) = call(
        &app,
        Method::POST,
        "/v1/task",
        Some(json!({ "api": "v1", "toDo": { "title": "no reminder" } })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["api"], "v1");
    assert_eq!(body["error"], "INVALID_ARGUMENT");

    let (status, body) = call(
        &app,
        Method::PUT,
        "/v1/task/41",
        Some(json!({ "toDo": { "title": "ghost", "reminder": "2024-01-01T00:00:00Z" } })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 5);

    let (status, body) = call_raw(&app, Method::POST, "/v1/task", "{not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3);
    assert_eq!(body["api"], "v1");

    let (status, body) = call_raw(
        &app,
        Method::POST,
        "/v1/task",
        r#"{"toDo":{"title":"t","reminder":"tomorrow"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_ARGUMENT");
    assert_eq!(body["api"], "v1");

    let (status, body) = call(&app, Method::GET, "/v1/task/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 3);
    assert_eq!(body["api"], "v1");

    let (status, body) = call(&app, Method::GET, "/v2/task", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
    assert!(body.get("api").is_none());

    assert!(harness.store.rows().is_empty());
    harness.stop().await;
}

#[tokio::test]
async fn test_gateway_store_unavailable() {
    let harness = Harness::start().await;
    let app = harness.gateway();
    harness.store.set_unavailable(true);

    let (status, body) = call(&app, Method::GET, "/v1/task/all", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 14);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("failed to connect to database: ")
    );

    harness.stop().await;
}

#[tokio::test]
async fn test_gateway_without_grpc_listener_is_unavailable() {
    let addr = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let app = gateway::router(addr, Duration::from_secs(2)).unwrap();

    let (status, body) = call(&app, Method::GET, "/v1/task/all", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "UNAVAILABLE");
}

#[tokio::test]
async fn test_shutdown_stops_both_listeners() {
    let harness = Harness::start().await;
    let grpc_addr = harness.grpc_addr;
    harness.stop().await;

    assert!(
        tokio::net::TcpStream::connect(grpc_addr).await.is_err(),
        "gRPC listener still accepting after shutdown"
    );
}

#[tokio::test]
async fn test_bind_conflict_fails_startup() {
    let taken = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = taken.local_addr().unwrap().port();

    let result = Listeners::bind(
        &ListenerConfig::new("127.0.0.1", 0),
        &ListenerConfig::new("127.0.0.1", port),
    )
    .await;
    assert!(result.is_err());
}
