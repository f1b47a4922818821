//! Data models for the StreamX Video client

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Top-level screen selection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen {
    Marketing,
    Landing,
    Gallery,
    PaymentReturn,
}

/// Which side of the entitlement gate the viewer is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Visitor,
    MemberLocked,
    MemberSubscribed,
}

impl ViewState {
    pub fn is_member(&self) -> bool {
        !matches!(self, ViewState::Visitor)
    }

    pub fn is_subscribed(&self) -> bool {
        matches!(self, ViewState::MemberSubscribed)
    }
}

/// Credential submission flavour. The backend treats both the same; only the
/// wording of the outcome differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
    Login,
    Signup,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentProvider {
    #[default]
    PayPal,
    Stripe,
}

impl PaymentProvider {
    /// Path segment under `/api/payments/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            PaymentProvider::PayPal => "paypal",
            PaymentProvider::Stripe => "stripe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentProvider::PayPal => "PayPal",
            PaymentProvider::Stripe => "Stripe",
        }
    }
}

/// Account summary returned by `/api/auth`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub email: String,
    #[serde(default)]
    pub is_subscribed: bool,
}

/// One entry of `/api/videos`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    pub title: String,
    pub file_path: String,
    #[serde(default)]
    pub thumbnail_path: Option<String>,
}

impl VideoRecord {
    /// Absolute URL for playback. Backend-relative paths get the backend
    /// host prepended; absolute links are kept as they are.
    pub fn playback_url(&self, backend_url: &str) -> String {
        resolve_asset_url(&self.file_path, backend_url)
    }

    pub fn thumbnail_url(&self, backend_url: &str) -> Option<String> {
        self.thumbnail_path
            .as_deref()
            .map(|path| resolve_asset_url(path, backend_url))
    }

    /// Name offered in the save dialog: last path segment, query stripped
    pub fn file_name(&self) -> String {
        file_name_of(&self.file_path)
    }
}

pub fn resolve_asset_url(path: &str, backend_url: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{}{}", backend_url.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", backend_url.trim_end_matches('/'), path)
    }
}

pub fn file_name_of(path: &str) -> String {
    let name = path
        .split('?')
        .next()
        .unwrap_or(path)
        .rsplit('/')
        .next()
        .unwrap_or(path);
    if name.is_empty() {
        "video.mp4".to_string()
    } else {
        name.to_string()
    }
}

/// The backend has served both numeric and string ids
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "unsupported video id: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_id_number_or_string() {
        let json = r#"[
            {"id": 7, "title": "A", "file_path": "/uploads/a.mp4"},
            {"id": "b-2", "title": "B", "file_path": "https://cdn.example.com/b.mp4", "thumbnail_path": "/thumbs/b.jpg"}
        ]"#;
        let videos: Vec<VideoRecord> = serde_json::from_str(json).unwrap();
        assert_eq!(videos[0].id, "7");
        assert_eq!(videos[0].thumbnail_path, None);
        assert_eq!(videos[1].id, "b-2");
    }

    #[test]
    fn test_playback_url_resolution() {
        let video = VideoRecord {
            id: "1".into(),
            title: "A".into(),
            file_path: "/uploads/a.mp4".into(),
            thumbnail_path: Some("thumbs/a.jpg".into()),
        };
        assert_eq!(video.playback_url("https://api.example.com/"), "https://api.example.com/uploads/a.mp4");
        assert_eq!(video.thumbnail_url("https://api.example.com").as_deref(), Some("https://api.example.com/thumbs/a.jpg"));

        let remote = VideoRecord { file_path: "https://cdn.example.com/x.mp4".into(), ..video };
        assert_eq!(remote.playback_url("https://api.example.com"), "https://cdn.example.com/x.mp4");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name_of("/uploads/2024/clip.mp4"), "clip.mp4");
        assert_eq!(file_name_of("https://cdn.example.com/v/clip.mp4?sig=abc"), "clip.mp4");
        assert_eq!(file_name_of("/uploads/"), "video.mp4");
    }

    #[test]
    fn test_user_summary_wire_format() {
        let user: UserSummary = serde_json::from_str(r#"{"email":"a@b.c","isSubscribed":true}"#).unwrap();
        assert!(user.is_subscribed);
        let missing: UserSummary = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();
        assert!(!missing.is_subscribed);
    }
}
