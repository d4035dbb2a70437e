// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Technology catalog service boundary.
//!
//! The terminal engine only talks to [`TechnologyApi`]. Calls are blocking and are issued from
//! the engine's thread one at a time, so program runs never overlap.

use std::fmt;

use crate::technology::{Page, PageQuery, Technology, TechnologyId, TechnologyRequest};

pub mod http;
pub mod memory;

pub use http::HttpTechnologyApi;
pub use memory::MemoryTechnologyApi;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

pub trait TechnologyApi: Send + Sync {
    fn list(&self, query: &PageQuery) -> Result<Page<Technology>, ApiError>;

    fn get(&self, id: TechnologyId) -> Result<Technology, ApiError>;

    fn create(&self, request: &TechnologyRequest) -> Result<Technology, ApiError>;

    fn update(&self, id: TechnologyId, request: &TechnologyRequest)
        -> Result<Technology, ApiError>;

    fn delete(&self, id: TechnologyId) -> Result<(), ApiError>;

    /// Distinct category names.
    fn categories(&self) -> Result<Vec<String>, ApiError>;

    /// Raw icon image bytes.
    fn icon(&self, id: TechnologyId) -> Result<Vec<u8>, ApiError>;

    fn upload_icon(
        &self,
        id: TechnologyId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Technology, ApiError>;

    fn update_icon_path(&self, id: TechnologyId, path: &str) -> Result<Technology, ApiError>;

    /// Sets or clears the bearer token sent with mutating calls.
    fn set_token(&self, token: Option<String>);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    Transport(String),
    Status { code: u16, message: String },
    Decode(String),
    NotFound(TechnologyId),
    Unauthorized,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "network error: {message}"),
            Self::Status { code, message } if message.is_empty() => {
                write!(f, "server responded with {code}")
            }
            Self::Status { code, message } => write!(f, "server responded with {code}: {message}"),
            Self::Decode(message) => write!(f, "invalid response: {message}"),
            Self::NotFound(id) => write!(f, "technology {id} not found"),
            Self::Unauthorized => f.write_str("not authorized"),
        }
    }
}

impl std::error::Error for ApiError {}
