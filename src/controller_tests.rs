//! Tests for the view-state controller

#[cfg(test)]
mod tests {
    use crate::controller::*;
    use crate::error::ApiError;
    use crate::i18n::FR;
    use crate::location::Location;
    use crate::models::{AuthMode, PaymentProvider, ViewState};
    use crate::session::{MemorySessionStore, Session};
    use crate::testing::{user, FakeBackend};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    type Controller = ViewController<MemorySessionStore, StdRng>;

    fn controller_with(store: MemorySessionStore, seed: u64) -> Controller {
        let ctx = Context {
            strings: &FR,
            backend_url: "https://api.example.com".into(),
            provider: PaymentProvider::PayPal,
            page_size: 20,
        };
        ViewController::new(ctx, store, StdRng::seed_from_u64(seed))
    }

    fn controller() -> Controller {
        controller_with(MemorySessionStore::default(), 7)
    }

    fn now() -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
    }

    fn status(c: &Controller) -> &str {
        c.status().map(|s| s.text()).unwrap_or("")
    }

    fn logged_in(subscribed: bool) -> Controller {
        let mut store = MemorySessionStore::default();
        store.session = Some(Session::start(user("member@example.com", subscribed), now()));
        let mut c = controller_with(store, 7);
        c.initialize(&FakeBackend::with_videos(5), Location::default(), now());
        c
    }

    // ---- initialize -------------------------------------------------------

    #[test]
    fn test_initialize_loads_videos_and_teaser() {
        let backend = FakeBackend::with_videos(45);
        let mut c = controller();
        c.initialize(&backend, Location::default(), now());

        assert_eq!(c.videos().len(), 45);
        assert!(c.teaser().is_some());
        assert_eq!(c.pagination().total_pages(), 3);
        assert_eq!(c.pagination().current(), 1);
        assert_eq!(c.view_state(), ViewState::Visitor);
        assert!(c.status().is_none());
        assert!(!c.is_pending(RequestKind::Videos));
        // no page param on launch, none added
        assert_eq!(c.location().get("page"), None);
    }

    #[test]
    fn test_teaser_is_deterministic_for_a_seed() {
        let backend = FakeBackend::with_videos(30);
        let mut a = controller_with(MemorySessionStore::default(), 99);
        let mut b = controller_with(MemorySessionStore::default(), 99);
        a.initialize(&backend, Location::default(), now());
        b.initialize(&backend, Location::default(), now());
        assert_eq!(a.teaser(), b.teaser());
    }

    #[test]
    fn test_initialize_failure_leaves_empty_list() {
        let backend = FakeBackend { videos: None, ..FakeBackend::default() };
        let mut c = controller();
        c.initialize(&backend, Location::default(), now());

        assert!(c.videos().is_empty());
        assert!(c.teaser().is_none());
        assert!(c.page_videos().is_empty());
        assert_eq!(c.pagination().total_pages(), 0);
        assert_eq!(c.pagination().current(), 1);
        assert_eq!(status(&c), FR.videos_load_failed);
    }

    #[test]
    fn test_initialize_applies_query_message_and_email() {
        let backend = FakeBackend::with_videos(3);
        let mut c = controller();
        c.initialize(&backend, Location::parse("?message=Abonnement%20activ%C3%A9&email=a%40b.com"), now());

        assert_eq!(status(&c), "Abonnement activé");
        assert_eq!(c.prefill_email(), "a@b.com");
        // not a success notice, so it stays
        c.tick(now() + Duration::seconds(10));
        assert_eq!(status(&c), "Abonnement activé");
    }

    #[test]
    fn test_initialize_restores_live_session() {
        let c = logged_in(true);
        assert_eq!(c.view_state(), ViewState::MemberSubscribed);
        assert_eq!(c.prefill_email(), "member@example.com");
    }

    #[test]
    fn test_initialize_drops_expired_session() {
        let mut store = MemorySessionStore::default();
        store.session = Some(Session::start(user("old@example.com", true), now() - Duration::minutes(30)));
        let mut c = controller_with(store, 7);
        c.initialize(&FakeBackend::with_videos(1), Location::default(), now());

        assert_eq!(c.view_state(), ViewState::Visitor);
        assert!(c.store().session.is_none());
    }

    #[test]
    fn test_page_query_roundtrip() {
        let backend = FakeBackend::with_videos(45);
        let mut first = controller();
        first.initialize(&backend, Location::default(), now());
        assert_eq!(first.set_page(2), 2);
        let url = first.location().to_relative_url();
        assert_eq!(url, "/?page=2");

        let mut second = controller();
        second.initialize(&backend, Location::parse(&url), now());
        assert_eq!(second.pagination().current(), 2);
        assert_eq!(second.page_videos().first().map(|v| v.id.as_str()), Some("21"));
    }

    #[test]
    fn test_out_of_range_page_query_is_clamped_and_mirrored() {
        let backend = FakeBackend::with_videos(45);
        let mut c = controller();
        c.initialize(&backend, Location::parse("?page=99"), now());
        assert_eq!(c.pagination().current(), 3);
        assert_eq!(c.location().get("page"), Some("3"));

        let mut c = controller();
        c.initialize(&backend, Location::parse("?page=abc"), now());
        assert_eq!(c.pagination().current(), 1);
    }

    // ---- pagination -------------------------------------------------------

    #[test]
    fn test_set_page_clamps() {
        let backend = FakeBackend::with_videos(45);
        let mut c = controller();
        c.initialize(&backend, Location::default(), now());

        assert_eq!(c.set_page(99), 3);
        assert_eq!(c.page_videos().len(), 5);
        assert_eq!(c.location().get("page"), Some("3"));
        assert_eq!(c.set_page(0), 1);
        assert_eq!(c.page_videos().len(), 20);
        assert_eq!(c.next_page(), 2);
        assert_eq!(c.prev_page(), 1);
        assert_eq!(c.prev_page(), 1);
    }

    #[test]
    fn test_page_size_change_keeps_page_valid() {
        let backend = FakeBackend::with_videos(45);
        let mut c = controller();
        c.initialize(&backend, Location::default(), now());
        c.set_page(3);
        c.set_page_size(50);
        assert_eq!(c.pagination().current(), 1);
        assert_eq!(c.location().get("page"), Some("1"));
    }

    #[test]
    fn test_landing_grid_excludes_teaser() {
        let backend = FakeBackend::with_videos(10);
        let mut c = controller();
        c.initialize(&backend, Location::default(), now());

        let teaser_id = c.teaser().map(|t| t.id.clone()).unwrap();
        let grid = c.landing_grid(6);
        assert_eq!(grid.len(), 6);
        assert!(grid.iter().all(|v| v.id != teaser_id));
    }

    // ---- credentials ------------------------------------------------------

    #[test]
    fn test_login_success_starts_session() {
        let backend = FakeBackend {
            auth: Ok(Some(user("new@example.com", false))),
            ..FakeBackend::with_videos(3)
        };
        let mut c = controller();
        c.initialize(&backend, Location::default(), now());

        assert!(c.submit_credentials(&backend, " new@example.com ", "secret", AuthMode::Login, now()));
        assert_eq!(c.view_state(), ViewState::MemberLocked);
        assert_eq!(status(&c), FR.login_success);
        assert_eq!(backend.calls_to("authenticate:new@example.com"), 1);

        let stored = c.store().session.clone().unwrap();
        assert_eq!(stored.expires_at, now() + Duration::minutes(10));
        assert_eq!(c.session(), Some(&stored));
        assert!(!c.is_pending(RequestKind::Auth));
    }

    #[test]
    fn test_signup_wording() {
        let backend = FakeBackend {
            auth: Ok(Some(user("new@example.com", true))),
            ..FakeBackend::default()
        };
        let mut c = controller();
        assert!(c.submit_credentials(&backend, "new@example.com", "pw", AuthMode::Signup, now()));
        assert_eq!(c.view_state(), ViewState::MemberSubscribed);
        assert_eq!(status(&c), FR.signup_success);
    }

    #[test]
    fn test_auth_without_user_leaves_session_unchanged() {
        let backend = FakeBackend { auth: Ok(None), ..FakeBackend::default() };

        let mut visitor = controller();
        assert!(!visitor.submit_credentials(&backend, "a@b.c", "pw", AuthMode::Login, now()));
        assert_eq!(visitor.view_state(), ViewState::Visitor);
        assert!(visitor.store().session.is_none());
        assert!(!status(&visitor).is_empty());

        let mut member = logged_in(false);
        let before = member.session().cloned();
        assert!(!member.submit_credentials(&backend, "other@b.c", "pw", AuthMode::Login, now()));
        assert_eq!(member.session().cloned(), before);
        assert_eq!(status(&member), FR.credentials_failed);
    }

    #[test]
    fn test_auth_transport_failure_is_generic() {
        let backend = FakeBackend { auth: Err(401), ..FakeBackend::default() };
        let mut c = controller();
        assert!(!c.submit_credentials(&backend, "a@b.c", "pw", AuthMode::Signup, now()));
        assert_eq!(status(&c), FR.credentials_failed);
        assert_eq!(c.store().saves, 0);
    }

    #[test]
    fn test_empty_fields_do_not_hit_backend() {
        let backend = FakeBackend::default();
        let mut c = controller();
        assert!(!c.submit_credentials(&backend, "  ", "pw", AuthMode::Login, now()));
        assert!(!c.submit_credentials(&backend, "a@b.c", "", AuthMode::Login, now()));
        assert_eq!(backend.call_count(), 0);
        assert_eq!(status(&c), FR.fill_all_fields);
    }

    #[test]
    fn test_second_auth_while_pending_is_ignored() {
        let mut c = controller();
        assert!(c.begin_auth("a@b.c", "pw", now()).is_some());
        assert!(c.is_pending(RequestKind::Auth));
        assert!(c.begin_auth("a@b.c", "pw", now()).is_none());
        c.finish_auth(Err(ApiError::Status(500)), AuthMode::Login, now());
        assert!(c.begin_auth("a@b.c", "pw", now()).is_some());
    }

    // ---- download ---------------------------------------------------------

    #[test]
    fn test_download_requires_subscription() {
        let backend = FakeBackend::with_videos(5);

        let mut locked = logged_in(false);
        let calls_before = backend.call_count();
        let mut out = Vec::new();
        let outcome = locked.request_download(&backend, "/uploads/video1.mp4", &mut out, now());
        assert_eq!(outcome, DownloadOutcome::Rejected(DownloadRejection::NotSubscribed));
        assert_eq!(backend.call_count(), calls_before);
        assert_eq!(status(&locked), FR.subscription_required);
        assert!(out.is_empty());

        let mut visitor = controller();
        let outcome = visitor.request_download(&backend, "/uploads/video1.mp4", &mut out, now());
        assert_eq!(outcome, DownloadOutcome::Rejected(DownloadRejection::NotSubscribed));
        assert_eq!(backend.call_count(), calls_before);
    }

    #[test]
    fn test_download_when_subscribed() {
        let backend = FakeBackend { download: Ok(b"mp4-bytes".to_vec()), ..FakeBackend::default() };
        let mut c = logged_in(true);
        let mut out = Vec::new();

        let outcome = c.request_download(&backend, "/uploads/video1.mp4", &mut out, now());
        assert_eq!(outcome, DownloadOutcome::Saved(9));
        assert_eq!(out, b"mp4-bytes");
        assert_eq!(backend.calls_to("download:/uploads/video1.mp4:member@example.com"), 1);
        assert_eq!(status(&c), FR.download_done);

        // success notice clears itself
        c.tick(now() + Duration::milliseconds(3000));
        assert!(c.status().is_none());
    }

    #[test]
    fn test_download_failure_message() {
        let backend = FakeBackend { download: Err(404), ..FakeBackend::default() };
        let mut c = logged_in(true);
        let outcome = c.request_download(&backend, "/uploads/missing.mp4", &mut Vec::new(), now());
        assert_eq!(outcome, DownloadOutcome::Failed);
        assert_eq!(status(&c), FR.download_error);
        assert!(!c.is_pending(RequestKind::Download));
    }

    #[test]
    fn test_download_ticket_and_cancel() {
        let mut c = logged_in(true);
        let ticket = c.begin_download("https://cdn.example.com/v/clip.mp4?sig=1", now()).unwrap();
        assert_eq!(ticket.file_name, "clip.mp4");
        assert_eq!(c.begin_download("/x.mp4", now()), Err(DownloadRejection::Busy));
        c.cancel_download();
        assert!(c.begin_download("/x.mp4", now()).is_ok());
    }

    // ---- payment ----------------------------------------------------------

    #[test]
    fn test_payment_requires_session() {
        let backend = FakeBackend::default();
        let mut c = controller();
        assert_eq!(c.request_payment(&backend, now()), None);
        assert_eq!(backend.call_count(), 0);
        assert_eq!(status(&c), FR.login_required);
    }

    #[test]
    fn test_payment_returns_redirect() {
        let backend = FakeBackend {
            payment: Ok(Some("https://www.paypal.com/checkoutnow?token=EC-1".into())),
            ..FakeBackend::default()
        };
        let mut c = logged_in(false);
        let url = c.request_payment(&backend, now());
        assert_eq!(url.as_deref(), Some("https://www.paypal.com/checkoutnow?token=EC-1"));
        assert_eq!(backend.calls_to("start_payment:paypal:member@example.com"), 1);
        // session is untouched until the return round trip
        assert_eq!(c.view_state(), ViewState::MemberLocked);
    }

    #[test]
    fn test_payment_uses_configured_provider() {
        let backend = FakeBackend {
            payment: Ok(Some("https://checkout.stripe.com/c/pay/cs_1".into())),
            ..FakeBackend::default()
        };
        let mut c = logged_in(false);
        c.set_provider(PaymentProvider::Stripe);
        assert!(c.request_payment(&backend, now()).is_some());
        assert_eq!(backend.calls_to("start_payment:stripe:"), 1);
    }

    #[test]
    fn test_payment_failures() {
        let mut c = logged_in(false);

        let failing = FakeBackend { payment: Err(500), ..FakeBackend::default() };
        assert_eq!(c.request_payment(&failing, now()), None);
        assert_eq!(status(&c), FR.payment_failed);

        let no_url = FakeBackend { payment: Ok(None), ..FakeBackend::default() };
        c.clear_status();
        assert_eq!(c.request_payment(&no_url, now()), None);
        assert_eq!(status(&c), FR.payment_failed);

        let bad_scheme = FakeBackend { payment: Ok(Some("file:///etc/passwd".into())), ..FakeBackend::default() };
        c.clear_status();
        assert_eq!(c.request_payment(&bad_scheme, now()), None);
        assert_eq!(status(&c), FR.payment_failed);
        assert!(!c.is_pending(RequestKind::Payment));
    }

    // ---- lifecycle --------------------------------------------------------

    #[test]
    fn test_logout_returns_to_visitor() {
        let mut c = logged_in(true);
        c.logout(now());
        assert_eq!(c.view_state(), ViewState::Visitor);
        assert!(c.store().session.is_none());
        assert_eq!(status(&c), FR.logged_out);
    }

    #[test]
    fn test_tick_expires_session() {
        let mut c = logged_in(true);
        assert!(!c.tick(now() + Duration::minutes(9)));
        assert_eq!(c.view_state(), ViewState::MemberSubscribed);

        assert!(c.tick(now() + Duration::minutes(10)));
        assert_eq!(c.view_state(), ViewState::Visitor);
        assert!(c.store().session.is_none());
        assert_eq!(status(&c), FR.session_expired);
    }

    #[test]
    fn test_expired_session_blocks_download() {
        let backend = FakeBackend::default();
        let mut c = logged_in(true);
        let outcome = c.request_download(&backend, "/v.mp4", &mut Vec::new(), now() + Duration::minutes(11));
        assert_eq!(outcome, DownloadOutcome::Rejected(DownloadRejection::NotSubscribed));
        assert_eq!(backend.call_count(), 0);
        assert_eq!(c.view_state(), ViewState::Visitor);
    }

    #[test]
    fn test_success_status_auto_clears_only_after_delay() {
        let mut c = controller();
        c.set_status(FR.login_success, now());
        assert!(!c.tick(now() + Duration::milliseconds(2999)));
        assert!(c.status().is_some());
        assert!(c.tick(now() + Duration::milliseconds(3000)));
        assert!(c.status().is_none());

        c.set_status(FR.payment_failed, now());
        c.tick(now() + Duration::minutes(5));
        assert_eq!(status(&c), FR.payment_failed);
    }
}
