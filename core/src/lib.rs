//! Synchronous API client core for the profile & achievements backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `ProfileClient` is stateless — it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Session handling stays with the host: requests flag whether they need
//!   credentials, and an expired session surfaces as a login redirect the
//!   host must perform.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod http;
pub mod text;
pub mod types;

pub use client::{CurrentUserOutcome, ProfileClient};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use text::to_title_case;
pub use types::{
    Achievement, AchievementCreate, AchievementService, CurrentUser, Goal, GoalCreate,
    ProfileData, ServiceAdmin, ServiceCreate, Tag,
};
