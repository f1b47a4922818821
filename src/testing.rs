//! Scriptable backend for unit tests

use std::cell::RefCell;
use std::io::Write;

use crate::api::{AuthResponse, Backend, Credentials, PaymentResponse};
use crate::error::ApiError;
use crate::models::{PaymentProvider, UserSummary, VideoRecord};

pub struct FakeBackend {
    /// `None` makes the list call fail
    pub videos: Option<Vec<VideoRecord>>,
    /// `Err(status)` fails the call; `Ok(None)` answers without a user
    pub auth: Result<Option<UserSummary>, u16>,
    pub payment: Result<Option<String>, u16>,
    pub confirm: Result<(), u16>,
    pub download: Result<Vec<u8>, u16>,
    pub calls: RefCell<Vec<String>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            videos: Some(Vec::new()),
            auth: Ok(None),
            payment: Ok(None),
            confirm: Ok(()),
            download: Ok(Vec::new()),
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl FakeBackend {
    pub fn with_videos(count: usize) -> Self {
        Self {
            videos: Some(videos(count)),
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls_to(&self, name: &str) -> usize {
        self.calls.borrow().iter().filter(|c| c.starts_with(name)).count()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

pub fn videos(count: usize) -> Vec<VideoRecord> {
    (1..=count)
        .map(|i| VideoRecord {
            id: i.to_string(),
            title: format!("Video {}", i),
            file_path: format!("/uploads/video{}.mp4", i),
            thumbnail_path: None,
        })
        .collect()
}

pub fn user(email: &str, subscribed: bool) -> UserSummary {
    UserSummary {
        email: email.to_string(),
        is_subscribed: subscribed,
    }
}

impl Backend for FakeBackend {
    fn list_videos(&self) -> Result<Vec<VideoRecord>, ApiError> {
        self.record("list_videos".into());
        self.videos.clone().ok_or(ApiError::Status(503))
    }

    fn authenticate(&self, credentials: &Credentials) -> Result<AuthResponse, ApiError> {
        self.record(format!("authenticate:{}", credentials.email));
        match &self.auth {
            Ok(user) => Ok(AuthResponse { user: user.clone() }),
            Err(status) => Err(ApiError::Status(*status)),
        }
    }

    fn start_payment(&self, provider: PaymentProvider, email: &str) -> Result<PaymentResponse, ApiError> {
        self.record(format!("start_payment:{}:{}", provider.endpoint(), email));
        match &self.payment {
            Ok(url) => Ok(PaymentResponse { url: url.clone() }),
            Err(status) => Err(ApiError::Status(*status)),
        }
    }

    fn confirm_payment(&self, token: &str, email: &str) -> Result<(), ApiError> {
        self.record(format!("confirm_payment:{}:{}", token, email));
        self.confirm.map_err(ApiError::Status)
    }

    fn download(&self, file: &str, email: &str, out: &mut dyn Write) -> Result<u64, ApiError> {
        self.record(format!("download:{}:{}", file, email));
        match &self.download {
            Ok(bytes) => {
                out.write_all(bytes)?;
                Ok(bytes.len() as u64)
            }
            Err(status) => Err(ApiError::Status(*status)),
        }
    }
}
