//! Mock implementation of the profile & achievements backend.
//!
//! # Design
//! Serves the same surface as the production backend so the client core can
//! be exercised over real HTTP. Accounts come from an OAuth flow this mock
//! does not model, so state is seeded with two users — a member and an
//! admin — plus one service with an achievement. Sessions are a fixed-name
//! cookie, `session=<username>`; authenticated routes answer 401 with a
//! JSON error body when it is missing or unknown, admin routes answer 403
//! for non-admins.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

/// A member account with everything the routes project payloads from.
#[derive(Clone, Debug)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub about: String,
    pub admin: bool,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    pub name: String,
    pub category: String,
}

/// Payload for `/api/users/me`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Identity {
    pub id: u32,
    pub username: String,
    pub admin: bool,
}

/// Payload for `/api/users/{key}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Profile {
    pub id: u32,
    pub username: String,
    pub about: String,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Service {
    pub id: u32,
    pub name: String,
    pub api_key: String,
}

/// Listing payload for `/api/services` — the api key stays admin-only.
#[derive(Debug, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub id: u32,
    pub name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Achievement {
    pub id: i32,
    pub name: String,
    pub goals: Vec<Goal>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Goal {
    pub id: i32,
    pub description: String,
    pub sequence: i32,
}

#[derive(Deserialize)]
pub struct AboutPatch {
    pub about: String,
}

#[derive(Deserialize)]
pub struct ServiceCreate {
    pub name: String,
}

#[derive(Deserialize)]
pub struct AchievementCreate {
    pub name: String,
    pub goals: Vec<GoalCreate>,
}

#[derive(Deserialize)]
pub struct GoalCreate {
    pub description: String,
    pub sequence: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub struct Backend {
    users: Vec<User>,
    services: Vec<Service>,
    achievements: HashMap<u32, Vec<Achievement>>,
    next_service_id: u32,
    next_achievement_id: i32,
    next_goal_id: i32,
}

impl Backend {
    /// Fixture state: a member, an admin, and one service with a two-goal
    /// achievement.
    fn seeded() -> Self {
        let users = vec![
            User {
                id: 1,
                username: "ada".to_string(),
                about: "Writes compilers for fun.".to_string(),
                admin: false,
                tags: vec![
                    Tag {
                        name: "rust".to_string(),
                        category: "language".to_string(),
                    },
                    Tag {
                        name: "board games".to_string(),
                        category: "interest".to_string(),
                    },
                ],
            },
            User {
                id: 2,
                username: "grace".to_string(),
                about: "Keeps the servers honest.".to_string(),
                admin: true,
                tags: vec![Tag {
                    name: "cobol".to_string(),
                    category: "language".to_string(),
                }],
            },
        ];
        let services = vec![Service {
            id: 1,
            name: "arcade".to_string(),
            api_key: "svc-key-1".to_string(),
        }];
        let mut achievements = HashMap::new();
        achievements.insert(
            1,
            vec![Achievement {
                id: 1,
                name: "First Steps".to_string(),
                goals: vec![
                    Goal {
                        id: 1,
                        description: "Sign in for the first time".to_string(),
                        sequence: 0,
                    },
                    Goal {
                        id: 2,
                        description: "Fill in your about text".to_string(),
                        sequence: 1,
                    },
                ],
            }],
        );
        Self {
            users,
            services,
            achievements,
            next_service_id: 2,
            next_achievement_id: 2,
            next_goal_id: 3,
        }
    }
}

pub type Db = Arc<RwLock<Backend>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Backend::seeded()));
    Router::new()
        .route("/api/version", get(version))
        .route("/api/login", get(login))
        .route("/api/image/{id}", get(image))
        .route("/api/users/me", get(current_user))
        .route("/api/users/{key}", get(profile).patch(update_about))
        .route("/api/services", get(list_services).post(create_service))
        .route(
            "/api/services/{id}/achievements",
            get(list_achievements).post(create_achievement),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

type ApiRejection = (StatusCode, Json<ErrorBody>);

fn unauthorized() -> ApiRejection {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: "not logged in".to_string(),
        }),
    )
}

fn forbidden() -> ApiRejection {
    (
        StatusCode::FORBIDDEN,
        Json(ErrorBody {
            error: "admin only".to_string(),
        }),
    )
}

fn not_found(what: &str) -> ApiRejection {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("{what} not found"),
        }),
    )
}

fn bad_request(msg: &str) -> ApiRejection {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            error: msg.to_string(),
        }),
    )
}

/// Resolve the session cookie (`session=<username>`) to a seeded user.
fn session_user(db: &Backend, headers: &HeaderMap) -> Option<User> {
    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    let name = cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix("session="))?;
    db.users.iter().find(|u| u.username == name).cloned()
}

/// Goal sequences must count 0, 1, 2, … once sorted.
fn sequence_is_valid(sequences: &[u32]) -> bool {
    sequences.iter().enumerate().all(|(i, &s)| s == i as u32)
}

#[derive(Serialize)]
struct VersionResponse {
    version: &'static str,
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Navigation target for unauthorized clients. The real backend bounces
/// through an OAuth provider here; the mock serves a landing page.
async fn login() -> Html<&'static str> {
    Html("<p>Sign in with your member account.</p>")
}

async fn image(
    State(db): State<Db>,
    Path(id): Path<u32>,
) -> Result<impl IntoResponse, ApiRejection> {
    let db = db.read().await;
    if !db.users.iter().any(|u| u.id == id) {
        return Err(not_found("image"));
    }
    let placeholder = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32"><circle cx="16" cy="16" r="14" fill="#888"/></svg>"##;
    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        placeholder,
    ))
}

async fn current_user(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Identity>, ApiRejection> {
    let db = db.read().await;
    let user = session_user(&db, &headers).ok_or_else(unauthorized)?;
    Ok(Json(Identity {
        id: user.id,
        username: user.username,
        admin: user.admin,
    }))
}

/// Profile lookup. A numeric key selects by id, anything else by username.
async fn profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(key): Path<String>,
) -> Result<Json<Profile>, ApiRejection> {
    let db = db.read().await;
    session_user(&db, &headers).ok_or_else(unauthorized)?;

    let user = match key.parse::<u32>() {
        Ok(id) => db.users.iter().find(|u| u.id == id),
        Err(_) => db.users.iter().find(|u| u.username == key),
    }
    .ok_or_else(|| not_found("user"))?;

    Ok(Json(Profile {
        id: user.id,
        username: user.username.clone(),
        about: user.about.clone(),
        tags: user.tags.clone(),
    }))
}

/// Update the about text. The production backend applies the patch to the
/// session user and ignores the path id; reproduced here.
async fn update_about(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(_key): Path<String>,
    Json(patch): Json<AboutPatch>,
) -> Result<Json<Profile>, ApiRejection> {
    let mut db = db.write().await;
    let id = session_user(&db, &headers).ok_or_else(unauthorized)?.id;

    let user = db
        .users
        .iter_mut()
        .find(|u| u.id == id)
        .ok_or_else(|| not_found("user"))?;
    user.about = patch.about;

    Ok(Json(Profile {
        id: user.id,
        username: user.username.clone(),
        about: user.about.clone(),
        tags: user.tags.clone(),
    }))
}

async fn list_services(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<Vec<ServiceSummary>>, ApiRejection> {
    let db = db.read().await;
    session_user(&db, &headers).ok_or_else(unauthorized)?;
    let services = db
        .services
        .iter()
        .map(|s| ServiceSummary {
            id: s.id,
            name: s.name.clone(),
        })
        .collect();
    Ok(Json(services))
}

async fn create_service(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<ServiceCreate>,
) -> Result<Json<Service>, ApiRejection> {
    let mut db = db.write().await;
    let user = session_user(&db, &headers).ok_or_else(unauthorized)?;
    if !user.admin {
        return Err(forbidden());
    }

    let id = db.next_service_id;
    db.next_service_id += 1;
    let service = Service {
        id,
        name: input.name,
        api_key: format!("svc-key-{id}"),
    };
    db.services.push(service.clone());
    Ok(Json(service))
}

/// Achievements for one service, goals ordered by sequence. An unknown
/// service yields an empty list, like the production query does.
async fn list_achievements(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(service_id): Path<u32>,
) -> Result<Json<Vec<Achievement>>, ApiRejection> {
    let db = db.read().await;
    session_user(&db, &headers).ok_or_else(unauthorized)?;
    let achievements = db.achievements.get(&service_id).cloned().unwrap_or_default();
    Ok(Json(achievements))
}

async fn create_achievement(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(service_id): Path<u32>,
    Json(mut input): Json<AchievementCreate>,
) -> Result<Json<Achievement>, ApiRejection> {
    let mut db = db.write().await;
    let user = session_user(&db, &headers).ok_or_else(unauthorized)?;
    if !user.admin {
        return Err(forbidden());
    }
    if !db.services.iter().any(|s| s.id == service_id) {
        return Err(not_found("service"));
    }

    if input.goals.is_empty() {
        return Err(bad_request("achievement must have at least one goal"));
    }
    input.goals.sort_by_key(|g| g.sequence);
    let sequences: Vec<u32> = input.goals.iter().map(|g| g.sequence).collect();
    if !sequence_is_valid(&sequences) {
        return Err(bad_request("goal sequence must start at 0 and count up by 1"));
    }

    let achievement_id = db.next_achievement_id;
    db.next_achievement_id += 1;
    let goals = input
        .goals
        .into_iter()
        .map(|g| {
            let goal_id = db.next_goal_id;
            db.next_goal_id += 1;
            Goal {
                id: goal_id,
                description: g.description,
                sequence: g.sequence as i32,
            }
        })
        .collect();
    let achievement = Achievement {
        id: achievement_id,
        name: input.name,
        goals,
    };
    db.achievements
        .entry(service_id)
        .or_default()
        .push(achievement.clone());
    Ok(Json(achievement))
}
