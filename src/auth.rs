// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Authentication state.
//!
//! The access token lives in memory only. Components that care about admin status subscribe to
//! an [`AuthStore`] and read the latest [`AuthState`] whenever they need it.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use serde::Deserialize;
use tokio::sync::watch;

const ADMIN_ROLES: [&str; 2] = ["ADMIN", "ROLE_ADMIN"];

/// Claims read from the JWT payload segment. The signature is not verified client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub exp: Option<u64>,
}

impl TokenClaims {
    fn is_expired_at(&self, now: SystemTime) -> bool {
        let Some(exp) = self.exp else {
            return false;
        };
        let now_secs = now.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or(0);
        exp < now_secs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    token: Option<String>,
    claims: Option<TokenClaims>,
}

impl AuthState {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn from_token(token: impl Into<String>) -> Result<Self, AuthError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Self {
            token: Some(token),
            claims: Some(claims),
        })
    }

    /// Local admin identity without a token (demo mode only).
    pub fn local_admin() -> Self {
        Self {
            token: None,
            claims: Some(TokenClaims {
                sub: Some("demo".to_owned()),
                roles: vec!["ADMIN".to_owned()],
                exp: None,
            }),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn username(&self) -> Option<&str> {
        self.claims.as_ref().and_then(|claims| claims.sub.as_deref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin_at(SystemTime::now())
    }

    pub fn is_admin_at(&self, now: SystemTime) -> bool {
        let Some(claims) = &self.claims else {
            return false;
        };
        if claims.is_expired_at(now) {
            return false;
        }
        claims.roles.iter().any(|role| ADMIN_ROLES.contains(&role.as_str()))
    }
}

/// Owner side of the auth state. Cloned subscriptions observe every update.
#[derive(Debug)]
pub struct AuthStore {
    tx: watch::Sender<AuthState>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new(AuthState::anonymous())
    }
}

impl AuthStore {
    pub fn new(initial: AuthState) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.tx.subscribe(),
        }
    }

    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    pub fn login(&self, token: &str) -> Result<(), AuthError> {
        let state = AuthState::from_token(token)?;
        tracing::info!(user = state.username().unwrap_or("?"), "login");
        self.set(state);
        Ok(())
    }

    pub fn logout(&self) {
        tracing::info!("logout");
        self.set(AuthState::anonymous());
    }

    pub fn set(&self, state: AuthState) {
        self.tx.send_replace(state);
    }
}

#[derive(Debug, Clone)]
pub struct AuthSubscription {
    rx: watch::Receiver<AuthState>,
}

impl AuthSubscription {
    pub fn state(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    pub fn is_admin(&self) -> bool {
        self.rx.borrow().is_admin()
    }

    /// Returns true once per store update since the last call.
    pub fn take_changed(&mut self) -> bool {
        match self.rx.has_changed() {
            Ok(true) => {
                self.rx.borrow_and_update();
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MalformedToken,
    InvalidPayload(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedToken => f.write_str("token is not a JWT (expected three segments)"),
            Self::InvalidPayload(message) => write!(f, "token payload is invalid: {message}"),
        }
    }
}

impl std::error::Error for AuthError {}

fn decode_claims(token: &str) -> Result<TokenClaims, AuthError> {
    let parts = token.trim().split('.').collect::<Vec<_>>();
    if parts.len() != 3 || parts.iter().any(|part| part.is_empty()) {
        return Err(AuthError::MalformedToken);
    }
    let payload = parts[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .map_err(|err| AuthError::InvalidPayload(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| AuthError::InvalidPayload(err.to_string()))
}
