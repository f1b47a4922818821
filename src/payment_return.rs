//! Payment provider return leg
//!
//! The provider sends the viewer back to `/success?token=..&email=..`. The
//! token is confirmed with the backend, then the viewer is redirected to the
//! gallery with an activation notice.

use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

#[cfg(test)]
use crate::api::Backend;
use crate::error::ApiError;
use crate::i18n::Strings;
use crate::location::Location;
use crate::session::SessionStore;

pub const RETURN_PATH: &str = "/success";

pub fn redirect_delay() -> Duration {
    Duration::milliseconds(2500)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnState {
    /// `token` or `email` absent from the launch location
    MissingParams,
    Verifying,
    Confirmed { at: DateTime<Utc> },
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmRequest {
    pub token: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct PaymentReturn {
    email: String,
    state: ReturnState,
}

impl PaymentReturn {
    pub fn is_return(location: &Location) -> bool {
        location.path() == RETURN_PATH
    }

    /// Read the return parameters. The request is `None` when there is
    /// nothing to confirm.
    pub fn start(location: &Location) -> (Self, Option<ConfirmRequest>) {
        let token = location.get_non_empty("token");
        let email = location.get_non_empty("email");
        match (token, email) {
            (Some(token), Some(email)) => (
                Self {
                    email: email.to_string(),
                    state: ReturnState::Verifying,
                },
                Some(ConfirmRequest {
                    token: token.to_string(),
                    email: email.to_string(),
                }),
            ),
            _ => {
                warn!("payment return without token or email");
                (
                    Self {
                        email: email.unwrap_or_default().to_string(),
                        state: ReturnState::MissingParams,
                    },
                    None,
                )
            }
        }
    }

    /// Apply the confirmation outcome. A confirmed payment drops the stored
    /// session so the next login picks up the new entitlement.
    pub fn finish<S: SessionStore + ?Sized>(&mut self, result: Result<(), ApiError>, store: &mut S, now: DateTime<Utc>) {
        if self.state != ReturnState::Verifying {
            return;
        }
        match result {
            Ok(()) => {
                info!("payment confirmed");
                if let Err(e) = store.clear() {
                    warn!("failed to clear stale session: {}", e);
                }
                self.state = ReturnState::Confirmed { at: now };
            }
            Err(e) => {
                warn!("payment confirmation failed: {}", e);
                self.state = ReturnState::Failed;
            }
        }
    }

    /// One-shot confirmation against `backend`
    #[cfg(test)]
    pub fn confirm<B, S>(backend: &B, location: &Location, store: &mut S, now: DateTime<Utc>) -> Self
    where
        B: Backend + ?Sized,
        S: SessionStore + ?Sized,
    {
        let (mut ret, request) = Self::start(location);
        if let Some(req) = request {
            let result = backend.confirm_payment(&req.token, &req.email);
            ret.finish(result, store, now);
        }
        ret
    }

    /// The gallery location to move to once the redirect delay has passed
    pub fn poll(&self, strings: &Strings, now: DateTime<Utc>) -> Option<Location> {
        match self.state {
            ReturnState::Confirmed { at } if now - at >= redirect_delay() => Some(
                Location::new("/")
                    .with("message", strings.subscription_activated)
                    .with("email", &self.email),
            ),
            _ => None,
        }
    }

    pub fn state(&self) -> ReturnState {
        self.state
    }

    pub fn message(&self, strings: &Strings) -> &'static str {
        match self.state {
            ReturnState::MissingParams => strings.payment_missing_params,
            ReturnState::Verifying => strings.verifying_payment,
            ReturnState::Confirmed { .. } => strings.payment_confirmed,
            ReturnState::Failed => strings.payment_confirm_failed,
        }
    }
}
