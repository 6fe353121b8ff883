//! Stateless HTTP request builder and response parser for the profile API.
//!
//! # Design
//! `ProfileClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The host executes the actual HTTP round-trip, keeping the
//! core deterministic and free of I/O dependencies. Side effects stay with
//! the host too: a 401 on the current-user lookup comes back as
//! `CurrentUserOutcome::Unauthorized` with the login URL the host must
//! navigate to.
//!
//! `build_submit_about` has no parse counterpart — the raw response stays
//! with the host, which inspects the status itself.

use log::debug;
use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Achievement, AchievementCreate, AchievementService, CurrentUser, ProfileData, ServiceAdmin,
    ServiceCreate,
};

/// Environment variable holding the backend base URL for `from_env`.
const BACKEND_URL_VAR: &str = "BACKEND_URL";

/// Result of a current-user lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentUserOutcome {
    /// The session is valid and the backend returned the caller's identity.
    LoggedIn(CurrentUser),

    /// The backend answered 401. The host must navigate to `login_url`.
    /// The body is still parsed and carried in `user` when it decodes;
    /// a malformed 401 body is not an error.
    Unauthorized {
        login_url: String,
        user: Option<CurrentUser>,
    },
}

/// PATCH body for the about-text update.
#[derive(Serialize)]
struct AboutPatch<'a> {
    about: &'a str,
}

/// Synchronous, stateless client for the profile & achievements API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The host is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`, attaching its session cookie
/// to requests flagged with `credentials`.
#[derive(Debug, Clone)]
pub struct ProfileClient {
    base_url: String,
}

impl ProfileClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Construct a client from the `BACKEND_URL` environment variable, for
    /// deployments that configure the backend location through the
    /// environment rather than in code.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var(BACKEND_URL_VAR)
            .map_err(|_| ApiError::EnvError(BACKEND_URL_VAR.to_string()))?;
        Ok(Self::new(&base_url))
    }

    /// The sign-in page. Hosts navigate here on `Unauthorized`, and may
    /// also render it as an explicit login link.
    pub fn login_url(&self) -> String {
        format!("{}/api/login", self.base_url)
    }

    /// The profile image for a user. Image loading is left to the host;
    /// this route is open and needs no credentials.
    pub fn image_url(&self, user_id: u32) -> String {
        format!("{}/api/image/{user_id}", self.base_url)
    }

    pub fn build_current_user(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/users/me", self.base_url),
            headers: Vec::new(),
            body: None,
            credentials: true,
        }
    }

    pub fn build_profile(&self, username: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/users/{username}", self.base_url),
            headers: Vec::new(),
            body: None,
            credentials: true,
        }
    }

    pub fn build_backend_version(&self) -> HttpRequest {
        // the only anonymous call; everything else rides the session
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/version", self.base_url),
            headers: Vec::new(),
            body: None,
            credentials: false,
        }
    }

    pub fn build_submit_about(&self, user_id: u32, about: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&AboutPatch { about })
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Patch,
            path: format!("{}/api/users/{user_id}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            credentials: true,
        })
    }

    pub fn build_achievement_services(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/services", self.base_url),
            headers: Vec::new(),
            body: None,
            credentials: true,
        }
    }

    pub fn build_achievements(&self, service_id: u32) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/services/{service_id}/achievements", self.base_url),
            headers: Vec::new(),
            body: None,
            credentials: true,
        }
    }

    pub fn build_create_service(&self, input: &ServiceCreate) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/services", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            credentials: true,
        })
    }

    pub fn build_create_achievement(
        &self,
        service_id: u32,
        input: &AchievementCreate,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: format!("{}/api/services/{service_id}/achievements", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
            credentials: true,
        })
    }

    /// Interpret a current-user response.
    ///
    /// The 401 branch is decided from the status alone, before any parse:
    /// the redirect must reach the host even when the body is garbage. The
    /// body is still parsed afterwards and passed along when it decodes.
    pub fn parse_current_user(
        &self,
        response: HttpResponse,
    ) -> Result<CurrentUserOutcome, ApiError> {
        if response.status == 401 {
            let login_url = self.login_url();
            debug!("current-user request unauthorized, redirecting host to {login_url}");
            let user = serde_json::from_str(&response.body).ok();
            return Ok(CurrentUserOutcome::Unauthorized { login_url, user });
        }
        check_status(&response, 200)?;
        let user: CurrentUser = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(CurrentUserOutcome::LoggedIn(user))
    }

    pub fn parse_profile(&self, response: HttpResponse) -> Result<ProfileData, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_backend_version(&self, response: HttpResponse) -> Result<String, ApiError> {
        #[derive(serde::Deserialize)]
        struct VersionResponse {
            version: String,
        }

        check_status(&response, 200)?;
        let parsed: VersionResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
        Ok(parsed.version)
    }

    pub fn parse_achievement_services(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<AchievementService>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_achievements(&self, response: HttpResponse) -> Result<Vec<Achievement>, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_service(&self, response: HttpResponse) -> Result<ServiceAdmin, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_achievement(
        &self,
        response: HttpResponse,
    ) -> Result<Achievement, ApiError> {
        check_status(&response, 200)?;
        serde_json::from_str(&response.body)
            .map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
