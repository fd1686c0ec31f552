use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::Service;
use uuid::Uuid;

use server::auth::{ServerAuthConfig, ServerState};
use server::routes;
use service::ai::client::mock::ScriptedGenerator;
use service::ai::AiService;

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

async fn build_app() -> anyhow::Result<Router> {
    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await {
        let msg = format!("{}", e);
        if msg.contains("duplicate key value violates unique constraint") {
            eprintln!("migrations already applied, continue: {}", msg);
        } else {
            return Err(e.into());
        }
    }
    let state = ServerState {
        db,
        auth: ServerAuthConfig { jwt_secret: "test-secret".into(), token_ttl_minutes: 480 },
        ai: Arc::new(AiService::new(Arc::new(ScriptedGenerator::default()))),
    };
    Ok(routes::build_router(cors(), state))
}

async fn body_json(resp: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn post_json(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

#[tokio::test]
async fn test_register_login_me_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";

    // Register
    let req = post_json(
        "/auth/register",
        &json!({"email": email, "password": password, "full_name": "Tester"}),
    )?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let user = body_json(resp).await?;
    assert_eq!(user["email"], email.as_str());
    assert_eq!(user["role"], "user");

    // Duplicate register conflicts
    let req = post_json(
        "/auth/register",
        &json!({"email": email, "password": password}),
    )?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Login
    let req = post_json("/auth/login", &json!({"email": email, "password": password}))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let session = body_json(resp).await?;
    let token = session["access_token"].as_str().unwrap().to_string();
    assert_eq!(session["token_type"], "bearer");

    // Wrong password
    let req = post_json("/auth/login", &json!({"email": email, "password": "wrong-pass"}))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Me with bearer token
    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await?;
    assert_eq!(me["email"], email.as_str());

    // Me without token
    let req = Request::builder()
        .method("GET")
        .uri("/auth/me")
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_profile_update_feeds_me() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";
    let req = post_json("/auth/register", &json!({"email": email, "password": password}))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = post_json("/auth/login", &json!({"email": email, "password": password}))?;
    let session = body_json(app.clone().call(req).await?).await?;
    let token = session["access_token"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("PUT")
        .uri("/auth/profile")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(serde_json::to_vec(&json!({
            "weight": 70.5,
            "height": 178.0,
            "gender": "male",
            "date_of_birth": "1995-04-02"
        }))?))?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await?;
    assert_eq!(updated["weight"], 70.5);
    assert_eq!(updated["gender"], "male");

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_reject_regular_users() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return Ok(());
    }
    let app = build_app().await?;

    let email = format!("user_{}@example.com", Uuid::new_v4());
    let password = "S3curePass!";
    let req = post_json("/auth/register", &json!({"email": email, "password": password}))?;
    app.clone().call(req).await?;
    let req = post_json("/auth/login", &json!({"email": email, "password": password}))?;
    let session = body_json(app.clone().call(req).await?).await?;
    let token = session["access_token"].as_str().unwrap().to_string();

    let req = Request::builder()
        .method("GET")
        .uri("/admin/stats")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::empty())?;
    let resp = app.clone().call(req).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    Ok(())
}
