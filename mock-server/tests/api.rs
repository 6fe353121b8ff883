use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Achievement, ErrorBody, Identity, Profile, ServiceSummary};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str, session: Option<&str>) -> Request<String> {
    let mut builder = Request::builder().uri(uri);
    if let Some(name) = session {
        builder = builder.header(http::header::COOKIE, format!("session={name}"));
    }
    builder.body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, session: Option<&str>, body: &str) -> Request<String> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(name) = session {
        builder = builder.header(http::header::COOKIE, format!("session={name}"));
    }
    builder.body(body.to_string()).unwrap()
}

// --- open routes ---

#[tokio::test]
async fn version_is_served_anonymously() {
    let app = app();
    let resp = app.oneshot(get("/api/version", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn login_page_is_served_anonymously() {
    let app = app();
    let resp = app.oneshot(get("/api/login", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_bytes(resp).await;
    assert!(body.starts_with(b"<p>Sign in"));
}

#[tokio::test]
async fn image_for_seeded_user() {
    let app = app();
    let resp = app.oneshot(get("/api/image/1", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(http::header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );
    let body = body_bytes(resp).await;
    assert!(!body.is_empty());
}

#[tokio::test]
async fn image_for_unknown_user_is_404() {
    let app = app();
    let resp = app.oneshot(get("/api/image/99", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- current user ---

#[tokio::test]
async fn me_without_session_is_401() {
    let app = app();
    let resp = app.oneshot(get("/api/users/me", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: ErrorBody = body_json(resp).await;
    assert_eq!(body.error, "not logged in");
}

#[tokio::test]
async fn me_with_unknown_session_is_401() {
    let app = app();
    let resp = app.oneshot(get("/api/users/me", Some("mallory"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_member_identity() {
    let app = app();
    let resp = app.oneshot(get("/api/users/me", Some("ada"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let identity: Identity = body_json(resp).await;
    assert_eq!(identity.id, 1);
    assert_eq!(identity.username, "ada");
    assert!(!identity.admin);
}

#[tokio::test]
async fn me_carries_admin_flag() {
    let app = app();
    let resp = app.oneshot(get("/api/users/me", Some("grace"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let identity: Identity = body_json(resp).await;
    assert!(identity.admin);
}

// --- profiles ---

#[tokio::test]
async fn profile_requires_session() {
    let app = app();
    let resp = app.oneshot(get("/api/users/ada", None)).await.unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_by_username() {
    let app = app();
    let resp = app.oneshot(get("/api/users/ada", Some("ada"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Profile = body_json(resp).await;
    assert_eq!(profile.id, 1);
    assert_eq!(profile.about, "Writes compilers for fun.");
    assert_eq!(profile.tags.len(), 2);
}

#[tokio::test]
async fn profile_by_numeric_id() {
    let app = app();
    let resp = app.oneshot(get("/api/users/2", Some("ada"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Profile = body_json(resp).await;
    assert_eq!(profile.username, "grace");
}

#[tokio::test]
async fn unknown_profile_is_404() {
    let app = app();
    let resp = app.oneshot(get("/api/users/heinrich", Some("ada"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_about_updates_the_session_user() {
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            "/api/users/1",
            Some("ada"),
            r#"{"about":"New text."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Profile = body_json(resp).await;
    assert_eq!(profile.about, "New text.");

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/users/ada", Some("ada")))
        .await
        .unwrap();
    let profile: Profile = body_json(resp).await;
    assert_eq!(profile.about, "New text.");
}

#[tokio::test]
async fn patch_about_ignores_the_path_id() {
    // the production backend patches the session user, whatever the path says
    use tower::Service;

    let mut app = app().into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PATCH",
            "/api/users/999",
            Some("ada"),
            r#"{"about":"Still ada."}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let profile: Profile = body_json(resp).await;
    assert_eq!(profile.id, 1);
    assert_eq!(profile.about, "Still ada.");
}

#[tokio::test]
async fn patch_about_requires_session() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "PATCH",
            "/api/users/1",
            None,
            r#"{"about":"nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- services and achievements ---

#[tokio::test]
async fn services_listing_hides_the_api_key() {
    let app = app();
    let resp = app.oneshot(get("/api/services", Some("ada"))).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body[0]["name"], "arcade");
    assert!(body[0].get("api_key").is_none());
}

#[tokio::test]
async fn achievements_for_seeded_service() {
    let app = app();
    let resp = app
        .oneshot(get("/api/services/1/achievements", Some("ada")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let achievements: Vec<Achievement> = body_json(resp).await;
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].goals.len(), 2);
}

#[tokio::test]
async fn achievements_for_unknown_service_is_empty() {
    let app = app();
    let resp = app
        .oneshot(get("/api/services/99/achievements", Some("ada")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let achievements: Vec<Achievement> = body_json(resp).await;
    assert!(achievements.is_empty());
}

#[tokio::test]
async fn create_service_requires_admin() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/services",
            Some("ada"),
            r#"{"name":"quiz night"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn create_achievement_rejects_empty_goals() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/services/1/achievements",
            Some("grace"),
            r#"{"name":"Empty","goals":[]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_achievement_rejects_gapped_sequence() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/services/1/achievements",
            Some("grace"),
            r#"{"name":"Broken","goals":[{"description":"First","sequence":0},{"description":"Third","sequence":2}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_achievement_on_unknown_service_is_404() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/api/services/99/achievements",
            Some("grace"),
            r#"{"name":"Lost","goals":[{"description":"Where","sequence":0}]}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- admin lifecycle ---

#[tokio::test]
async fn admin_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // register a service
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            "/api/services",
            Some("grace"),
            r#"{"name":"quiz night"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let service: mock_server::Service = body_json(resp).await;
    assert_eq!(service.name, "quiz night");
    assert!(!service.api_key.is_empty());
    let id = service.id;

    // create an achievement with unsorted but valid goal sequences
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "POST",
            &format!("/api/services/{id}/achievements"),
            Some("grace"),
            r#"{"name":"Quizmaster","goals":[{"description":"Win a quiz","sequence":1},{"description":"Attend a quiz","sequence":0}]}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let achievement: Achievement = body_json(resp).await;
    assert_eq!(achievement.goals[0].sequence, 0);
    assert_eq!(achievement.goals[0].description, "Attend a quiz");

    // members see the new service in the listing
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/api/services", Some("ada")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let services: Vec<ServiceSummary> = body_json(resp).await;
    assert_eq!(services.len(), 2);

    // and its achievement
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get(&format!("/api/services/{id}/achievements"), Some("ada")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let achievements: Vec<Achievement> = body_json(resp).await;
    assert_eq!(achievements.len(), 1);
    assert_eq!(achievements[0].name, "Quizmaster");
}
