//! StreamX backend API client

use std::io::{Read, Write};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::error::ApiError;
use crate::models::{PaymentProvider, UserSummary, VideoRecord};

pub const DEFAULT_BACKEND_URL: &str = "https://streamxvideo-backend-production.up.railway.app";

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of a `/api/auth` reply. `user` is absent when the backend rejects
/// the credentials without an HTTP error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub user: Option<UserSummary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentResponse {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Serialize)]
struct PaymentRequest<'a> {
    email: &'a str,
}

/// The remote operations the client depends on
pub trait Backend {
    fn list_videos(&self) -> Result<Vec<VideoRecord>, ApiError>;

    fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError>;

    fn start_payment(&self, provider: PaymentProvider, email: &str) -> Result<PaymentResponse, ApiError>;

    fn confirm_payment(&self, token: &str, email: &str) -> Result<(), ApiError>;

    /// Stream the asset behind `file` into `out`, returning the byte count
    fn download(&self, file: &str, email: &str, out: &mut dyn Write) -> Result<u64, ApiError>;
}

#[derive(Clone)]
pub struct BackendClient {
    base_url: String,
    agent: ureq::Agent,
    user_agent: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build()
            .new_agent();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
            user_agent: format!("StreamXVideo/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    fn check_status(status: u16) -> Result<(), ApiError> {
        if (200..300).contains(&status) {
            Ok(())
        } else {
            Err(ApiError::Status(status))
        }
    }
}

impl Backend for BackendClient {
    fn list_videos(&self) -> Result<Vec<VideoRecord>, ApiError> {
        let url = self.endpoint("/api/videos")?;
        debug!(%url, "fetching video list");

        let mut response = self
            .agent
            .get(url.as_str())
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json")
            .call()?;
        Self::check_status(response.status().as_u16())?;

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        let url = self.endpoint("/api/auth")?;
        debug!(%url, "submitting credentials");

        let mut response = self
            .agent
            .post(url.as_str())
            .header("User-Agent", &self.user_agent)
            .send_json(credentials)?;
        Self::check_status(response.status().as_u16())?;

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn start_payment(&self, provider: PaymentProvider, email: &str) -> Result<PaymentResponse, ApiError> {
        let url = self.endpoint(&format!("/api/payments/{}", provider.endpoint()))?;
        debug!(%url, "starting payment");

        let mut response = self
            .agent
            .post(url.as_str())
            .header("User-Agent", &self.user_agent)
            .send_json(&PaymentRequest { email })?;
        Self::check_status(response.status().as_u16())?;

        let body = response.body_mut().read_to_string()?;
        Ok(serde_json::from_str(&body)?)
    }

    fn confirm_payment(&self, token: &str, email: &str) -> Result<(), ApiError> {
        let mut url = self.endpoint("/api/payments/success")?;
        url.query_pairs_mut()
            .append_pair("token", token)
            .append_pair("email", email);
        debug!(path = url.path(), "confirming payment");

        let response = self
            .agent
            .get(url.as_str())
            .header("User-Agent", &self.user_agent)
            .call()?;
        Self::check_status(response.status().as_u16())
    }

    fn download(&self, file: &str, email: &str, out: &mut dyn Write) -> Result<u64, ApiError> {
        let mut url = self.endpoint("/api/videos/download")?;
        url.query_pairs_mut().append_pair("file", file);
        debug!(%url, "downloading asset");

        let response = self
            .agent
            .get(url.as_str())
            .header("User-Agent", &self.user_agent)
            .header("user-email", email)
            .call()?;
        Self::check_status(response.status().as_u16())?;

        let mut reader = response.into_body().into_reader();
        let mut buffer = vec![0u8; 64 * 1024];
        let mut written: u64 = 0;

        loop {
            match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => {
                    out.write_all(&buffer[..n])?;
                    written += n as u64;
                }
                Err(ref e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        out.flush()?;
        Ok(written)
    }
}
