// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Exo-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Exo and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Blocking HTTP client for the portfolio REST API.

use std::io::Read;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::de::DeserializeOwned;

use super::{ApiError, TechnologyApi};
use crate::technology::{Page, PageQuery, Technology, TechnologyId, TechnologyRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const MAX_ICON_BYTES: u64 = 5 * 1024 * 1024;
const BOUNDARY_PREFIX: &str = "----exo-icon-";

static BOUNDARY_COUNTER: AtomicU64 = AtomicU64::new(0);

pub struct HttpTechnologyApi {
    base_url: String,
    agent: ureq::Agent,
    token: RwLock<Option<String>>,
}

impl HttpTechnologyApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            base_url,
            agent,
            token: RwLock::new(None),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL of a technology icon.
    pub fn icon_url(&self, id: TechnologyId) -> String {
        format!("{}/technologies/{id}/icon", self.base_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, request: ureq::Request) -> ureq::Request {
        let token = self.token.read().ok().and_then(|guard| guard.clone());
        match token {
            Some(token) => request.set("Authorization", &format!("Bearer {token}")),
            None => request,
        }
    }

    fn read_json<T: DeserializeOwned>(
        &self,
        result: Result<ureq::Response, ureq::Error>,
    ) -> Result<T, ApiError> {
        let response = result.map_err(map_ureq_error)?;
        response.into_json::<T>().map_err(|err| ApiError::Decode(err.to_string()))
    }
}

impl TechnologyApi for HttpTechnologyApi {
    fn list(&self, query: &PageQuery) -> Result<Page<Technology>, ApiError> {
        tracing::debug!(page = query.page, size = query.size, "GET /technologies");
        let request = self
            .agent
            .get(&self.url("/technologies"))
            .query("page", &query.page.to_string())
            .query("size", &query.size.to_string())
            .query("sortBy", &query.sort_by)
            .query("sortDir", query.sort_dir.as_str());
        self.read_json(self.authorize(request).call())
    }

    fn get(&self, id: TechnologyId) -> Result<Technology, ApiError> {
        let request = self.agent.get(&self.url(&format!("/technologies/{id}")));
        self.read_json(self.authorize(request).call()).map_err(|err| match err {
            ApiError::Status { code: 404, .. } => ApiError::NotFound(id),
            other => other,
        })
    }

    fn create(&self, request: &TechnologyRequest) -> Result<Technology, ApiError> {
        tracing::debug!(name = %request.name, "POST /technologies");
        let call = self.agent.post(&self.url("/technologies"));
        self.read_json(self.authorize(call).send_json(request))
    }

    fn update(
        &self,
        id: TechnologyId,
        request: &TechnologyRequest,
    ) -> Result<Technology, ApiError> {
        tracing::debug!(id, "PUT /technologies/{{id}}");
        let call = self.agent.put(&self.url(&format!("/technologies/{id}")));
        self.read_json(self.authorize(call).send_json(request))
    }

    fn delete(&self, id: TechnologyId) -> Result<(), ApiError> {
        tracing::debug!(id, "DELETE /technologies/{{id}}");
        let call = self.agent.delete(&self.url(&format!("/technologies/{id}")));
        self.authorize(call).call().map_err(map_ureq_error)?;
        Ok(())
    }

    fn categories(&self) -> Result<Vec<String>, ApiError> {
        let call = self.agent.get(&self.url("/technologies/categories"));
        self.read_json(self.authorize(call).call())
    }

    fn icon(&self, id: TechnologyId) -> Result<Vec<u8>, ApiError> {
        let call = self.agent.get(&self.icon_url(id));
        let response = self.authorize(call).call().map_err(map_ureq_error)?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_ICON_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(bytes)
    }

    fn upload_icon(
        &self,
        id: TechnologyId,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Technology, ApiError> {
        tracing::debug!(id, file_name, len = bytes.len(), "PUT /technologies/{{id}}/icon");
        let boundary = multipart_boundary(bytes);
        let body = multipart_body(&boundary, file_name, bytes);
        let call = self
            .agent
            .put(&self.icon_url(id))
            .set("Content-Type", &format!("multipart/form-data; boundary={boundary}"));
        self.read_json(self.authorize(call).send_bytes(&body))
    }

    fn update_icon_path(&self, id: TechnologyId, path: &str) -> Result<Technology, ApiError> {
        let call = self
            .agent
            .put(&self.url(&format!("/technologies/{id}/icon-path")))
            .query("imagePath", path);
        self.read_json(self.authorize(call).call())
    }

    fn set_token(&self, token: Option<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = token;
        }
    }
}

fn map_ureq_error(err: ureq::Error) -> ApiError {
    match err {
        ureq::Error::Status(401 | 403, _) => ApiError::Unauthorized,
        ureq::Error::Status(code, response) => {
            let message = response.into_string().unwrap_or_default();
            ApiError::Status {
                code,
                message: message.trim().chars().take(200).collect(),
            }
        }
        ureq::Error::Transport(transport) => ApiError::Transport(transport.to_string()),
    }
}

/// Per-request boundary that never occurs inside `payload`.
fn multipart_boundary(payload: &[u8]) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let salt = nanos ^ BOUNDARY_COUNTER.fetch_add(1, Ordering::Relaxed).rotate_left(32);
    boundary_avoiding(payload, salt)
}

fn boundary_avoiding(payload: &[u8], mut salt: u64) -> String {
    loop {
        let candidate = format!("{BOUNDARY_PREFIX}{salt:016x}");
        let needle = candidate.as_bytes();
        if !payload.windows(needle.len()).any(|window| window == needle) {
            return candidate;
        }
        salt = salt.wrapping_add(1);
    }
}

fn multipart_body(boundary: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let content_type = guess_image_content_type(file_name);
    let safe_name = file_name.replace('"', "");
    let mut body = Vec::with_capacity(bytes.len() + 256);
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"icon\"; filename=\"{safe_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

fn guess_image_content_type(file_name: &str) -> &'static str {
    let lower = file_name.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".svg") {
        "image/svg+xml"
    } else {
        "application/octet-stream"
    }
}
