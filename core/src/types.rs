//! Domain DTOs for the profile & achievements API.
//!
//! # Design
//! These types mirror the backend's wire schema but are defined
//! independently. The mock-server crate declares its own copies; integration
//! tests catch any schema drift between the two crates. Ids are integers on
//! the wire (`u32` for users and services, `i32` for achievements and
//! goals), matching the backend's payloads.

use serde::{Deserialize, Serialize};

/// A label attached to a profile, e.g. a favourite language or a committee.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub category: String,
}

/// A member profile as served by `/api/users/{username}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileData {
    pub id: u32,
    pub username: String,
    pub about: String,
    pub tags: Vec<Tag>,
}

/// The caller's own identity as served by `/api/users/me`.
///
/// Some backend deployments omit the `admin` flag from the identity
/// payload; it defaults to `false` there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: u32,
    pub username: String,
    #[serde(default)]
    pub admin: bool,
}

/// An external service that awards achievements to members.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AchievementService {
    pub id: u32,
    pub name: String,
}

/// An achievement offered by a service, with its ordered goals.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Achievement {
    pub id: i32,
    pub name: String,
    pub goals: Vec<Goal>,
}

/// A single step towards an achievement. `sequence` is the ordering index;
/// the backend serves goals sorted by it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Goal {
    pub id: i32,
    pub description: String,
    pub sequence: i32,
}

/// A service as returned to admins on creation, including the api key the
/// external service authenticates with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceAdmin {
    pub id: u32,
    pub name: String,
    pub api_key: String,
}

/// Request payload for registering a new achievement service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
}

/// Request payload for creating an achievement on a service. The backend
/// requires at least one goal, with sequences counting 0, 1, 2, …
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementCreate {
    pub name: String,
    pub goals: Vec<GoalCreate>,
}

/// A goal inside an `AchievementCreate` payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalCreate {
    pub description: String,
    pub sequence: u32,
}
