//! View-state controller
//!
//! Owns the visitor/member gate, the cached video list and its pagination,
//! the status banner and the persisted session. Every backend call comes in
//! two halves: `begin_*` checks guards and marks the request in flight,
//! `finish_*` applies the outcome. The UI runs the network part on a worker
//! thread between the two; the test-only one-shot methods (`initialize`,
//! `submit_credentials`, ...) chain them synchronously.

use std::collections::HashSet;
#[cfg(test)]
use std::io::Write;

use chrono::{DateTime, Utc};
use rand::Rng;
use tracing::{info, warn};
use url::Url;

#[cfg(test)]
use crate::api::Backend;
use crate::api::{AuthResponse, Credentials, PaymentResponse};
use crate::error::ApiError;
use crate::i18n::Strings;
use crate::location::Location;
use crate::models::{file_name_of, AuthMode, PaymentProvider, VideoRecord, ViewState};
use crate::pagination::Pagination;
use crate::session::{self, Session, SessionStore};
use crate::status::StatusMessage;

/// Everything the controller needs to know about its surroundings
#[derive(Debug, Clone)]
pub struct Context {
    pub strings: &'static Strings,
    pub backend_url: String,
    pub provider: PaymentProvider,
    pub page_size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    Videos,
    Auth,
    Payment,
    Download,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTicket {
    pub provider: PaymentProvider,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadTicket {
    pub file: String,
    pub email: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadRejection {
    NotSubscribed,
    Busy,
}

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    Rejected(DownloadRejection),
    Saved(u64),
    Failed,
}

pub struct ViewController<S: SessionStore, R: Rng> {
    ctx: Context,
    store: S,
    rng: R,
    session: Option<Session>,
    videos: Vec<VideoRecord>,
    teaser: Option<usize>,
    pagination: Pagination,
    requested_page: usize,
    mirror_page: bool,
    location: Location,
    status: Option<StatusMessage>,
    prefill_email: String,
    pending: HashSet<RequestKind>,
}

impl<S: SessionStore, R: Rng> ViewController<S, R> {
    pub fn new(ctx: Context, store: S, rng: R) -> Self {
        let pagination = Pagination::new(ctx.page_size);
        Self {
            ctx,
            store,
            rng,
            session: None,
            videos: Vec::new(),
            teaser: None,
            pagination,
            requested_page: 1,
            mirror_page: false,
            location: Location::default(),
            status: None,
            prefill_email: String::new(),
            pending: HashSet::new(),
        }
    }

    // ---- accessors -------------------------------------------------------

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn strings(&self) -> &'static Strings {
        self.ctx.strings
    }

    pub fn set_strings(&mut self, strings: &'static Strings) {
        self.ctx.strings = strings;
    }

    pub fn set_provider(&mut self, provider: PaymentProvider) {
        self.ctx.provider = provider;
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn view_state(&self) -> ViewState {
        match &self.session {
            None => ViewState::Visitor,
            Some(s) if s.user.is_subscribed => ViewState::MemberSubscribed,
            Some(_) => ViewState::MemberLocked,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn videos(&self) -> &[VideoRecord] {
        &self.videos
    }

    pub fn page_videos(&self) -> &[VideoRecord] {
        &self.videos[self.pagination.range()]
    }

    pub fn teaser(&self) -> Option<&VideoRecord> {
        self.teaser.and_then(|i| self.videos.get(i))
    }

    /// Up to `n` videos other than the teaser, in list order
    pub fn landing_grid(&self, n: usize) -> Vec<&VideoRecord> {
        let teaser_id = self.teaser().map(|t| t.id.as_str());
        self.videos
            .iter()
            .filter(|v| Some(v.id.as_str()) != teaser_id)
            .take(n)
            .collect()
    }

    pub fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn prefill_email(&self) -> &str {
        &self.prefill_email
    }

    pub fn is_pending(&self, kind: RequestKind) -> bool {
        self.pending.contains(&kind)
    }

    pub fn set_status(&mut self, text: &str, now: DateTime<Utc>) {
        self.status = Some(StatusMessage::new(text, now));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    // ---- initialize ------------------------------------------------------

    #[cfg(test)]
    pub fn initialize<B: Backend + ?Sized>(&mut self, backend: &B, location: Location, now: DateTime<Utc>) {
        if self.begin_initialize(location, now) {
            let result = backend.list_videos();
            self.finish_videos(result, now);
        }
    }

    /// Apply the launch location and restore the stored session. Returns
    /// whether the caller should fetch the video list.
    pub fn begin_initialize(&mut self, location: Location, now: DateTime<Utc>) -> bool {
        self.requested_page = location
            .get("page")
            .and_then(|p| p.trim().parse::<usize>().ok())
            .unwrap_or(1);
        self.mirror_page = location.get("page").is_some();

        if let Some(message) = location.get_non_empty("message") {
            self.status = Some(StatusMessage::new(message, now));
        }
        if let Some(email) = location.get_non_empty("email") {
            self.prefill_email = email.to_string();
        }
        self.location = location;

        self.session = session::restore(&mut self.store, now);
        match &self.session {
            Some(s) => {
                info!(subscribed = s.user.is_subscribed, "restored session");
                if self.prefill_email.is_empty() {
                    self.prefill_email = s.user.email.clone();
                }
            }
            None => info!("no active session, starting as visitor"),
        }

        self.pending.insert(RequestKind::Videos)
    }

    pub fn finish_videos(&mut self, result: Result<Vec<VideoRecord>, ApiError>, now: DateTime<Utc>) {
        self.pending.remove(&RequestKind::Videos);

        match result {
            Ok(videos) => {
                info!(count = videos.len(), "video list loaded");
                self.teaser = if videos.is_empty() {
                    None
                } else {
                    Some(self.rng.random_range(0..videos.len()))
                };
                self.videos = videos;
            }
            Err(e) => {
                warn!("failed to load videos: {}", e);
                self.videos.clear();
                self.teaser = None;
                self.set_status(self.ctx.strings.videos_load_failed, now);
            }
        }

        self.pagination.set_count(self.videos.len());
        let page = self.pagination.set_page(self.requested_page);
        if self.mirror_page {
            self.location.set("page", &page.to_string());
        }
    }

    // ---- credentials -----------------------------------------------------

    #[cfg(test)]
    pub fn submit_credentials<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        email: &str,
        password: &str,
        mode: AuthMode,
        now: DateTime<Utc>,
    ) -> bool {
        match self.begin_auth(email, password, now) {
            Some(credentials) => {
                let result = backend.authenticate(&credentials);
                self.finish_auth(result, mode, now)
            }
            None => false,
        }
    }

    pub fn begin_auth(&mut self, email: &str, password: &str, now: DateTime<Utc>) -> Option<Credentials> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            self.set_status(self.ctx.strings.fill_all_fields, now);
            return None;
        }
        if !self.pending.insert(RequestKind::Auth) {
            return None;
        }
        Some(Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })
    }

    /// Adopt the returned user, or leave the session exactly as it was
    pub fn finish_auth(&mut self, result: Result<AuthResponse, ApiError>, mode: AuthMode, now: DateTime<Utc>) -> bool {
        self.pending.remove(&RequestKind::Auth);

        let user = match result {
            Ok(AuthResponse { user: Some(user) }) => user,
            Ok(AuthResponse { user: None }) => {
                warn!("auth response carried no user");
                self.set_status(self.ctx.strings.credentials_failed, now);
                return false;
            }
            Err(e) => {
                warn!("authentication failed: {}", e);
                self.set_status(self.ctx.strings.credentials_failed, now);
                return false;
            }
        };

        let session = Session::start(user, now);
        if let Err(e) = self.store.save(&session) {
            warn!("failed to persist session: {}", e);
        }
        info!(subscribed = session.user.is_subscribed, ?mode, "session started");

        self.prefill_email = session.user.email.clone();
        self.session = Some(session);
        let text = match mode {
            AuthMode::Login => self.ctx.strings.login_success,
            AuthMode::Signup => self.ctx.strings.signup_success,
        };
        self.set_status(text, now);
        true
    }

    // ---- payment ---------------------------------------------------------

    /// Returns the provider URL to open, if any
    #[cfg(test)]
    pub fn request_payment<B: Backend + ?Sized>(&mut self, backend: &B, now: DateTime<Utc>) -> Option<String> {
        let ticket = self.begin_payment(now)?;
        let result = backend.start_payment(ticket.provider, &ticket.email);
        self.finish_payment(result, now)
    }

    pub fn begin_payment(&mut self, now: DateTime<Utc>) -> Option<PaymentTicket> {
        self.expire_if_due(now);
        let Some(email) = self.session.as_ref().map(|s| s.user.email.clone()) else {
            self.set_status(self.ctx.strings.login_required, now);
            return None;
        };
        if !self.pending.insert(RequestKind::Payment) {
            return None;
        }
        Some(PaymentTicket {
            provider: self.ctx.provider,
            email,
        })
    }

    pub fn finish_payment(&mut self, result: Result<PaymentResponse, ApiError>, now: DateTime<Utc>) -> Option<String> {
        self.pending.remove(&RequestKind::Payment);

        let url = match result {
            Ok(PaymentResponse { url: Some(url) }) => url,
            Ok(PaymentResponse { url: None }) => {
                warn!("payment response carried no redirect URL");
                self.set_status(self.ctx.strings.payment_failed, now);
                return None;
            }
            Err(e) => {
                warn!("payment initiation failed: {}", e);
                self.set_status(self.ctx.strings.payment_failed, now);
                return None;
            }
        };

        // Only hand web URLs to the system opener
        match Url::parse(url.trim()) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                info!(provider = self.ctx.provider.label(), "redirecting to payment provider");
                self.set_status(self.ctx.strings.payment_redirect, now);
                Some(parsed.to_string())
            }
            _ => {
                warn!("payment redirect is not a web URL");
                self.set_status(self.ctx.strings.payment_failed, now);
                None
            }
        }
    }

    // ---- download --------------------------------------------------------

    #[cfg(test)]
    pub fn request_download<B: Backend + ?Sized>(
        &mut self,
        backend: &B,
        file: &str,
        out: &mut dyn Write,
        now: DateTime<Utc>,
    ) -> DownloadOutcome {
        let ticket = match self.begin_download(file, now) {
            Ok(ticket) => ticket,
            Err(rejection) => return DownloadOutcome::Rejected(rejection),
        };
        let result = backend.download(&ticket.file, &ticket.email, out);
        let outcome = match &result {
            Ok(bytes) => DownloadOutcome::Saved(*bytes),
            Err(_) => DownloadOutcome::Failed,
        };
        self.finish_download(result, &ticket.file_name, now);
        outcome
    }

    /// Entitlement gate. Rejection happens before any network traffic.
    pub fn begin_download(&mut self, file: &str, now: DateTime<Utc>) -> Result<DownloadTicket, DownloadRejection> {
        self.expire_if_due(now);
        let entitled = self
            .session
            .as_ref()
            .filter(|s| s.user.is_subscribed)
            .map(|s| s.user.email.clone());
        let Some(email) = entitled else {
            self.set_status(self.ctx.strings.subscription_required, now);
            return Err(DownloadRejection::NotSubscribed);
        };
        if !self.pending.insert(RequestKind::Download) {
            return Err(DownloadRejection::Busy);
        }
        Ok(DownloadTicket {
            file: file.to_string(),
            email,
            file_name: file_name_of(file),
        })
    }

    /// The user backed out of the save dialog
    pub fn cancel_download(&mut self) {
        self.pending.remove(&RequestKind::Download);
    }

    pub fn finish_download(&mut self, result: Result<u64, ApiError>, file_name: &str, now: DateTime<Utc>) -> bool {
        self.pending.remove(&RequestKind::Download);
        match result {
            Ok(bytes) => {
                info!(file_name, bytes, "download saved");
                self.set_status(self.ctx.strings.download_done, now);
                true
            }
            Err(e) => {
                warn!(file_name, "download failed: {}", e);
                self.set_status(self.ctx.strings.download_error, now);
                false
            }
        }
    }

    // ---- session lifecycle -----------------------------------------------

    pub fn logout(&mut self, now: DateTime<Utc>) {
        if let Err(e) = self.store.clear() {
            warn!("failed to clear stored session: {}", e);
        }
        if self.session.take().is_some() {
            info!("logged out");
        }
        self.set_status(self.ctx.strings.logged_out, now);
    }

    /// Periodic housekeeping: drop expired success notices and sessions.
    /// Returns whether anything visible changed.
    pub fn tick(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;
        if self.status.as_ref().is_some_and(|s| s.is_expired(now)) {
            self.status = None;
            changed = true;
        }
        if self.expire_if_due(now) {
            changed = true;
        }
        changed
    }

    fn expire_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if !self.session.as_ref().is_some_and(|s| s.is_expired(now)) {
            return false;
        }
        info!("session expired");
        self.session = None;
        if let Err(e) = self.store.clear() {
            warn!("failed to clear expired session: {}", e);
        }
        self.set_status(self.ctx.strings.session_expired, now);
        true
    }

    // ---- pagination ------------------------------------------------------

    /// Clamp and select page `n`, mirroring it into the location
    pub fn set_page(&mut self, n: usize) -> usize {
        let page = self.pagination.set_page(n);
        self.requested_page = page;
        self.mirror_page = true;
        self.location.set("page", &page.to_string());
        page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.pagination.current() + 1)
    }

    pub fn prev_page(&mut self) -> usize {
        self.set_page(self.pagination.current().saturating_sub(1))
    }

    #[cfg(test)]
    pub fn set_page_size(&mut self, page_size: usize) {
        self.ctx.page_size = page_size;
        self.pagination.set_page_size(page_size);
        if self.mirror_page {
            self.location.set("page", &self.pagination.current().to_string());
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;
