//! # Admin Session Service
//!
//! Static-credential login for the review dashboard. A successful login issues
//! an opaque token (`uuid` v4) that is kept in memory only; restarting the
//! server logs every administrator out. Tokens expire after `SESSION_TTL`,
//! and at most `MAX_SESSIONS` are live at once (the oldest is dropped).
//!
//! Protected handlers in other services call [`require_admin`] with the
//! request's `Authorization: Bearer <token>` header.
//!
//! ## Routes
//! - `POST /api/admin/login`: `LoginRequest` in, `LoginResponse` out.
//! - `POST /api/admin/logout`: revokes the caller's token.

mod login;
mod logout;

use actix_web::web::{post, scope};
use actix_web::{http::header, HttpRequest, HttpResponse, Scope};
use common::requests::UpdateResponse;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

const API_PATH: &str = "/api/admin";

pub const UNAUTHORIZED: &str = "Admin session required.";

pub const SESSION_TTL: Duration = Duration::from_secs(8 * 60 * 60);
pub const MAX_SESSIONS: usize = 32;

pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/login", post().to(login::process))
        .route("/logout", post().to(logout::process))
}

/// Credentials plus the live tokens and their issue times, shared as
/// `web::Data`.
#[derive(Clone)]
pub struct AdminSessions {
    email: String,
    password: Option<String>,
    ttl: Duration,
    tokens: Arc<RwLock<HashMap<String, Instant>>>,
}

impl AdminSessions {
    pub fn new(email: impl Into<String>, password: Option<String>) -> Self {
        Self::with_ttl(email, password, SESSION_TTL)
    }

    pub fn with_ttl(email: impl Into<String>, password: Option<String>, ttl: Duration) -> Self {
        Self {
            email: email.into(),
            password,
            ttl,
            tokens: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn login_enabled(&self) -> bool {
        self.password.is_some()
    }

    /// Both inputs are trimmed; the email is compared case-insensitively.
    pub fn credentials_match(&self, email: &str, password: &str) -> bool {
        match &self.password {
            Some(expected) => {
                email.trim().eq_ignore_ascii_case(self.email.trim()) && password.trim() == expected.trim()
            }
            None => false,
        }
    }

    /// New token. Expired tokens are pruned first; past `MAX_SESSIONS` the
    /// oldest live one is evicted.
    pub async fn issue(&self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        let now = Instant::now();
        let mut tokens = self.tokens.write().await;
        tokens.retain(|_, issued| now.duration_since(*issued) < self.ttl);
        while tokens.len() >= MAX_SESSIONS {
            let Some(oldest) = tokens.iter().min_by_key(|(_, issued)| **issued).map(|(t, _)| t.clone()) else {
                break;
            };
            tokens.remove(&oldest);
        }
        tokens.insert(token.clone(), now);
        token
    }

    pub async fn is_valid(&self, token: &str) -> bool {
        self.tokens
            .read()
            .await
            .get(token)
            .is_some_and(|issued| issued.elapsed() < self.ttl)
    }

    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.write().await.remove(token).is_some()
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(req: &HttpRequest) -> Option<String> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// `Err` carries the `401` response to return as-is.
pub async fn require_admin(req: &HttpRequest, sessions: &AdminSessions) -> Result<String, HttpResponse> {
    match bearer_token(req) {
        Some(token) if sessions.is_valid(&token).await => Ok(token),
        _ => Err(HttpResponse::Unauthorized().json(UpdateResponse {
            success: false,
            message: Some(UNAUTHORIZED.to_string()),
        })),
    }
}
