//! Signed-cookie sessions and flash toasts.
//!
//! Handlers take a `Session` argument instead of reaching for ambient request
//! state. The `session` cookie is `base64url(claims json) "." base64url(hmac)`,
//! signed with `SESSION_SECRET`. Issuing sessions (login) lives elsewhere;
//! this service only verifies them.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderValue},
    response::{IntoResponse, Redirect, Response},
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use tracing::warn;

use crate::cookies::read_cookie;
use crate::errors::AppError;
use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

pub const SESSION_COOKIE: &str = "session";
pub const TOAST_COOKIE: &str = "toast";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    pub member_id: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ToastKind {
    Success,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ToastKind,
}

/// Verifies session cookies against the configured secret.
#[derive(Clone)]
pub struct SessionSigner {
    key: Arc<[u8]>,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::from(secret.as_bytes()),
        }
    }

    fn mac(&self) -> Option<HmacSha256> {
        HmacSha256::new_from_slice(&self.key).ok()
    }

    /// Returns the claims when the cookie is well-formed and correctly signed.
    pub fn verify(&self, cookie: &str) -> Option<SessionClaims> {
        let (payload, signature) = cookie.split_once('.')?;
        let signature = URL_SAFE_NO_PAD.decode(signature).ok()?;

        let mut mac = self.mac()?;
        mac.update(payload.as_bytes());
        mac.verify_slice(&signature).ok()?;

        let json = URL_SAFE_NO_PAD.decode(payload).ok()?;
        serde_json::from_slice(&json).ok()
    }

    #[cfg(test)]
    pub fn sign(&self, claims: &SessionClaims) -> String {
        let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
        let mut mac = self.mac().unwrap();
        mac.update(payload.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        format!("{payload}.{signature}")
    }
}

/// The authenticated caller for the current request.
#[derive(Debug)]
pub struct Session {
    claims: SessionClaims,
    toast: Option<Toast>,
}

impl Session {
    pub fn new(claims: SessionClaims) -> Self {
        Self {
            claims,
            toast: None,
        }
    }

    pub fn member_id(&self) -> &str {
        &self.claims.member_id
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        match self.claims.role {
            Role::Admin => Ok(()),
            Role::Member => {
                warn!(
                    "Member {} attempted to reach an admin route",
                    self.claims.member_id
                );
                Err(AppError::Forbidden)
            }
        }
    }

    /// Queues a toast shown on the next page load.
    pub fn toast(&mut self, message: impl Into<String>, kind: ToastKind) {
        self.toast = Some(Toast {
            message: message.into(),
            kind,
        });
    }

    /// Redirects to `location`, carrying any queued toast as a cookie.
    pub fn commit_redirect(self, location: &str) -> Response {
        let mut response = Redirect::to(location).into_response();

        if let Some(toast) = self.toast {
            let cookie = serde_json::to_vec(&toast)
                .map(|json| URL_SAFE_NO_PAD.encode(json))
                .map(|value| format!("{TOAST_COOKIE}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age=60"));

            match cookie.ok().and_then(|c| HeaderValue::from_str(&c).ok()) {
                Some(value) => {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
                None => warn!("Dropped toast that could not be encoded as a cookie"),
            }
        }

        response
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let raw = read_cookie(&parts.headers, SESSION_COOKIE).ok_or(AppError::Unauthorized)?;

        match state.sessions.verify(raw) {
            Some(claims) => Ok(Session::new(claims)),
            None => {
                warn!("Rejected session cookie with an invalid signature");
                Err(AppError::Unauthorized)
            }
        }
    }
}
