//! Status banner text

use chrono::{DateTime, Duration, Utc};

/// Messages carrying this marker are success notices and clear themselves
pub const SUCCESS_MARKER: &str = "✅";

pub fn auto_clear_delay() -> Duration {
    Duration::milliseconds(3000)
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    text: String,
    set_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(text: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            text: text.into(),
            set_at: now,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_success(&self) -> bool {
        self.text.contains(SUCCESS_MARKER)
    }

    pub fn is_error(&self) -> bool {
        self.text.contains('❌')
    }

    /// Success notices expire after the fixed delay; everything else stays
    /// until replaced.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_success() && now - self.set_at >= auto_clear_delay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_message_clears_after_delay() {
        let now = Utc::now();
        let msg = StatusMessage::new("✅ Connexion réussie !", now);
        assert!(msg.is_success());
        assert!(!msg.is_expired(now + Duration::milliseconds(2999)));
        assert!(msg.is_expired(now + Duration::milliseconds(3000)));
    }

    #[test]
    fn test_other_messages_persist() {
        let now = Utc::now();
        let msg = StatusMessage::new("Email ou mot de passe incorrect.", now);
        assert!(!msg.is_expired(now + Duration::hours(1)));
        assert!(StatusMessage::new("❌ Erreur de téléchargement", now).is_error());
    }
}
