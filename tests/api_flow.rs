//! End-to-end run against an in-process stub API: calls are documented,
//! access is recorded per role and the preview serves the result.

use std::net::SocketAddr;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use oxyde::{
    Access, ApiType, AuthType, Call, Context, DocContext, Error, JsonType, PreviewModel,
    PreviewServer,
};

#[derive(Debug, Serialize, Deserialize, ApiType)]
#[serde(rename_all = "camelCase")]
struct User {
    #[api("Unique user identifier.")]
    user_id: String,
    #[api("Display name.")]
    name: String,
}

#[derive(Serialize, ApiType)]
#[serde(rename_all = "camelCase")]
struct UserIdParams {
    #[api("Identifier of the user.")]
    user_id: String,
}

#[derive(Serialize, ApiType)]
struct NewUser {
    #[api("Display name.")]
    name: String,
}

#[derive(Serialize, ApiType)]
struct TraceHeaders {
    #[serde(rename = "X-Trace")]
    #[api("?Trace identifier.")]
    trace: Option<String>,
}

#[derive(Debug, Deserialize, ApiType)]
struct TraceEcho {
    #[api("Echoed trace identifier.")]
    trace: String,
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        == Some("Bearer admin")
}

async fn read_user(Path(user_id): Path<String>, headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    Json(json!({ "userId": user_id, "name": "John" })).into_response()
}

async fn delete_user(Path(_user_id): Path<String>) -> StatusCode {
    StatusCode::NO_CONTENT
}

async fn create_user(Json(body): Json<Value>) -> Response {
    let user = json!({
        "userId": uuid::Uuid::new_v4().to_string(),
        "name": body["name"],
    });
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn version() -> &'static str {
    "1.2.3"
}

async fn trace(headers: HeaderMap) -> Json<Value> {
    let trace = headers
        .get("x-trace")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    Json(json!({ "trace": trace }))
}

async fn start_stub_api() -> SocketAddr {
    let app = Router::new()
        .route("/v1/users", post(create_user))
        .route("/v1/users/{user_id}", get(read_user).delete(delete_user))
        .route("/v1/version", get(version))
        .route("/v1/trace", get(trace));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn admin_context(addr: SocketAddr) -> Context {
    let mut ctx = Context::new(format!("http://{}", addr));
    ctx.auth = AuthType::Bearer("admin".into());
    ctx.user_name = "admin".into();
    ctx
}

async fn document_read_user(ctx: &Context, dc: &mut DocContext) -> oxyde::Result<()> {
    let mut guest = ctx.clone();
    guest.auth = AuthType::Bearer("guest".into());

    dc.new_endpoint("v1", "users", "Read user", "Reads a single user.");

    dc.collect_role("guest");
    dc.collect_usage("Not authorized", "Guests may not read users.");
    Call::get("/{apiVersion}/users/{userId}")
        .params(&UserIdParams {
            user_id: "42".into(),
        })
        .expect(401)
        .send_empty(&guest, dc)
        .await?;

    dc.collect_role("admin");
    dc.collect_both("User found", "");
    let user: User = Call::get("/{apiVersion}/users/{userId}")
        .params(&UserIdParams {
            user_id: "42".into(),
        })
        .send(ctx, dc)
        .await?;
    assert_eq!(user.user_id, "42");
    assert_eq!(user.name, "John");

    dc.save_endpoint();
    Ok(())
}

#[tokio::test]
async fn test_calls_are_documented() {
    let addr = start_stub_api().await;
    let ctx = admin_context(addr);
    let mut dc = DocContext::new();
    dc.set_roles_order(vec!["admin".into(), "guest".into(), "auditor".into()]);

    document_read_user(&ctx, &mut dc).await.unwrap();

    let endpoint = &dc.endpoints()[0];
    assert_eq!(endpoint.method, "GET");
    assert_eq!(endpoint.root_path, format!("http://{}", addr));
    assert_eq!(endpoint.request_path, "/v1/users/{userId}");
    let params = endpoint.parameters.as_ref().unwrap();
    assert_eq!(params[0].json_name, "userId");
    assert_eq!(params[0].json_type, JsonType::String);
    let response = endpoint.response_body.as_ref().unwrap();
    assert_eq!(response.len(), 2);
    assert!(endpoint.request_body.is_none());

    assert_eq!(endpoint.usages.len(), 2);
    assert_eq!(endpoint.usages[0].status_code, 200);
    assert_eq!(endpoint.usages[1].status_code, 401);
    assert_eq!(
        endpoint.usages[0].url,
        format!("http://{}/v1/users/42", addr)
    );
    assert_eq!(endpoint.usages[1].response_body, "");

    assert_eq!(dc.access("GET", "/v1/users/{userId}", "admin"), Access::Granted);
    assert_eq!(dc.access("GET", "/v1/users/{userId}", "guest"), Access::Denied);
    assert_eq!(dc.access("GET", "/v1/users/{userId}", "auditor"), Access::Unknown);
}

#[tokio::test]
async fn test_body_text_and_header_calls() {
    let addr = start_stub_api().await;
    let ctx = admin_context(addr);
    let mut dc = DocContext::new();

    dc.new_endpoint("v1", "users", "Create user", "");
    dc.collect_both("User created", "");
    let user: User = Call::post("/{apiVersion}/users")
        .body(&NewUser {
            name: "Alice".into(),
        })
        .expect(201)
        .send(&ctx, &mut dc)
        .await
        .unwrap();
    assert_eq!(user.name, "Alice");
    assert_eq!(user.user_id.len(), 36);
    dc.save_endpoint();

    let created = &dc.endpoints()[0];
    assert_eq!(created.method, "POST");
    assert_eq!(created.request_body.as_ref().unwrap()[0].json_name, "name");
    assert_eq!(created.usages[0].request_body, "{\n  \"name\": \"Alice\"\n}");

    let text = Call::get("/{apiVersion}/version")
        .send_text(&ctx, &mut dc)
        .await
        .unwrap();
    assert_eq!(text, "1.2.3");

    dc.new_endpoint("v1", "diagnostics", "Trace", "");
    dc.collect_both("Trace echoed", "");
    let echo: TraceEcho = Call::get("/{apiVersion}/trace")
        .headers(&TraceHeaders {
            trace: Some("t-1".into()),
        })
        .send(&ctx, &mut dc)
        .await
        .unwrap();
    assert_eq!(echo.trace, "t-1");
    dc.save_endpoint();

    let traced = &dc.endpoints()[1];
    let header = &traced.headers.as_ref().unwrap()[0];
    assert_eq!(header.json_name, "X-Trace");
    assert!(!header.mandatory);
    assert_eq!(traced.usages[0].headers[0].name, "X-Trace");
    assert_eq!(traced.usages[0].headers[0].value, "t-1");

    Call::delete("/{apiVersion}/users/{userId}")
        .params(&UserIdParams {
            user_id: user.user_id.clone(),
        })
        .expect(204)
        .send_empty(&ctx, &mut dc)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unexpected_status_is_an_error() {
    let addr = start_stub_api().await;
    let ctx = admin_context(addr);
    let mut dc = DocContext::new();
    dc.new_endpoint("v1", "users", "Read user", "");
    dc.collect_both("Created?", "");

    let err = Call::get("/{apiVersion}/users/{userId}")
        .params(&UserIdParams {
            user_id: "42".into(),
        })
        .expect(201)
        .send::<User>(&ctx, &mut dc)
        .await
        .unwrap_err();
    match err {
        Error::UnexpectedStatus {
            expected, actual, ..
        } => {
            assert_eq!(expected, 201);
            assert_eq!(actual, 200);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(dc.endpoint().unwrap().usages.is_empty());

    let err = Call::get("/{apiVersion}/users")
        .params(&vec!["42"])
        .send_empty(&ctx, &mut dc)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NonStructParameters { .. }));
}

#[tokio::test]
async fn test_preview_server_routes() {
    let addr = start_stub_api().await;
    let ctx = admin_context(addr);
    let mut dc = DocContext::new();
    dc.set_roles_order(vec!["admin".into(), "guest".into()]);
    document_read_user(&ctx, &mut dc).await.unwrap();

    let server = PreviewServer::new(PreviewModel::from_context(&dc)).unwrap();
    let id = server.model().endpoints[0].id.clone();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let preview = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(server.run(listener));

    let client = reqwest::Client::new();
    let index = client.get(&preview).send().await.unwrap();
    assert_eq!(index.status(), 200);
    let index = index.text().await.unwrap();
    assert!(index.contains("USERS"));
    assert!(index.contains("Access matrix"));
    assert!(index.contains("<div class=\"access-NO\">NO</div>"));

    let css = client
        .get(format!("{}/style.css", preview))
        .send()
        .await
        .unwrap();
    assert_eq!(css.headers()["content-type"], "text/css");

    let details = client
        .get(format!("{}/endpoint-details?id={}", preview, id))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(details.contains("Reads a single user."));
    assert!(details.contains("Not authorized"));

    let unknown = client
        .get(format!("{}/endpoint-details?id=missing", preview))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(unknown, index);
}
