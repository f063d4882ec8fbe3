//! Integration tests for the full payment and entitlement flow.
//!
//! These tests verify the end-to-end path:
//! 1. A free user exhausts the free allowance and is denied
//! 2. StartCheckoutHandler creates a pending session and redirect
//! 3. ConfirmationPoller drives the session to a terminal outcome
//! 4. Access state and session state settle together
//!
//! Uses the in-memory adapters and the mock payment provider, so the flow
//! runs without external dependencies and with paused tokio time.

use std::sync::Arc;

use mindspace_core::adapters::memory::{InMemorySessionRepository, InMemoryUserStore};
use mindspace_core::adapters::stripe::{mock_checkout_completed_event, MockPaymentProvider};
use mindspace_core::application::handlers::entitlement::{
    CheckAccessHandler, CheckAccessQuery, RecordReflectionCommand, RecordReflectionHandler,
};
use mindspace_core::application::handlers::payment::{
    CheckPaymentStatusHandler, ConfirmationPoller, FinalizePaymentHandler, HandleWebhookCommand,
    HandleWebhookHandler, PollOutcome, StartCheckoutCommand, StartCheckoutHandler, WebhookOutcome,
};
use mindspace_core::config::PollerConfig;
use mindspace_core::domain::entitlement::{AccessDecision, UserRecord, DEFAULT_FREE_LIMIT};
use mindspace_core::domain::foundation::UserId;
use mindspace_core::domain::payment::{PaymentStatus, UNLOCK_FULL_ACCESS};
use mindspace_core::ports::{PaymentSessionRepository, UserStore};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// Installs a test-writer subscriber so handler tracing output is captured
/// per test. Safe to call from every test; only the first call installs.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

struct App {
    users: Arc<InMemoryUserStore>,
    sessions: Arc<InMemorySessionRepository>,
    provider: MockPaymentProvider,
    check_access: CheckAccessHandler,
    record_reflection: RecordReflectionHandler,
    start_checkout: StartCheckoutHandler,
    webhook: HandleWebhookHandler,
    poller: ConfirmationPoller,
    user_id: UserId,
}

fn app_with(user: UserRecord) -> App {
    init_tracing();
    let user_id = user.id.clone();
    let users = Arc::new(InMemoryUserStore::with_users([user]));
    let sessions = Arc::new(InMemorySessionRepository::new());
    let provider = MockPaymentProvider::new();

    let finalize = Arc::new(FinalizePaymentHandler::new(users.clone(), sessions.clone()));
    let check_status = Arc::new(CheckPaymentStatusHandler::new(
        sessions.clone(),
        Arc::new(provider.clone()),
        finalize.clone(),
    ));

    App {
        check_access: CheckAccessHandler::new(users.clone(), DEFAULT_FREE_LIMIT),
        record_reflection: RecordReflectionHandler::new(users.clone()),
        start_checkout: StartCheckoutHandler::new(
            users.clone(),
            sessions.clone(),
            Arc::new(provider.clone()),
        ),
        webhook: HandleWebhookHandler::new(
            Arc::new(provider.clone()),
            sessions.clone(),
            finalize,
        ),
        poller: ConfirmationPoller::new(
            check_status,
            users.clone(),
            DEFAULT_FREE_LIMIT,
            PollerConfig::default(),
        ),
        users,
        sessions,
        provider,
        user_id,
    }
}

fn app() -> App {
    app_with(UserRecord::new(UserId::generate(), "user@example.com"))
}

async fn decision(app: &App) -> AccessDecision {
    app.check_access
        .handle(CheckAccessQuery {
            user_id: app.user_id.clone(),
        })
        .await
        .unwrap()
        .decision
}

// =============================================================================
// End-to-end flow
// =============================================================================

#[tokio::test(start_paused = true)]
async fn free_user_pays_and_unlocks_full_access() {
    let app = app();

    // Fresh user has one free reflection
    assert_eq!(
        decision(&app).await,
        AccessDecision::GrantedFreeTrial { remaining: 1 }
    );

    // Completing a reflection consumes it
    app.record_reflection
        .handle(RecordReflectionCommand {
            user_id: app.user_id.clone(),
            answers: vec![2; 10],
        })
        .await
        .unwrap();
    assert_eq!(decision(&app).await, AccessDecision::Denied);

    // Start checkout
    app.provider
        .set_checkout_session("cs_e2e", "https://checkout.stripe.com/pay/cs_e2e");
    let checkout = app
        .start_checkout
        .handle(StartCheckoutCommand {
            user_id: app.user_id.clone(),
            package_id: UNLOCK_FULL_ACCESS.to_string(),
            return_origin: "https://app.mindspace.example".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(
        checkout.redirect_url,
        "https://checkout.stripe.com/pay/cs_e2e"
    );

    // Provider confirms on the third lookup
    app.provider.script_statuses([
        Ok(PaymentStatus::Pending),
        Ok(PaymentStatus::Pending),
        Ok(PaymentStatus::Paid),
    ]);
    let outcome = app.poller.poll_until_terminal(&checkout.session_id).await;
    assert_eq!(
        outcome,
        PollOutcome::Success {
            decision: AccessDecision::GrantedPaid
        }
    );
    assert_eq!(app.provider.status_call_count(), 3);

    // Access and session settled together
    assert_eq!(decision(&app).await, AccessDecision::GrantedPaid);
    let session = app.sessions.get(&checkout.session_id).await.unwrap().unwrap();
    assert_eq!(session.status, PaymentStatus::Paid);

    // Paid reflections no longer touch the counter
    app.record_reflection
        .handle(RecordReflectionCommand {
            user_id: app.user_id.clone(),
            answers: vec![1; 10],
        })
        .await
        .unwrap();
    let user = app.users.get(&app.user_id).await.unwrap().unwrap();
    assert_eq!(user.free_reflections_used, 1);
}

#[tokio::test(start_paused = true)]
async fn abandoned_checkout_expires_and_access_stays_denied() {
    let mut user = UserRecord::new(UserId::generate(), "user@example.com");
    user.free_reflections_used = 1;
    let app = app_with(user);

    app.provider.set_checkout_session("cs_exp", "https://x");
    let checkout = app
        .start_checkout
        .handle(StartCheckoutCommand {
            user_id: app.user_id.clone(),
            package_id: UNLOCK_FULL_ACCESS.to_string(),
            return_origin: "https://app.mindspace.example".to_string(),
        })
        .await
        .unwrap();

    app.provider
        .script_statuses([Ok(PaymentStatus::Pending), Ok(PaymentStatus::Expired)]);
    let outcome = app.poller.poll_until_terminal(&checkout.session_id).await;
    assert_eq!(outcome, PollOutcome::Expired);

    assert_eq!(decision(&app).await, AccessDecision::Denied);
    let session = app.sessions.get(&checkout.session_id).await.unwrap().unwrap();
    assert_eq!(session.status, PaymentStatus::Expired);
}

#[tokio::test(start_paused = true)]
async fn slow_confirmation_times_out_then_webhook_settles_it() {
    let app = app();

    app.provider.set_checkout_session("cs_slow", "https://x");
    let checkout = app
        .start_checkout
        .handle(StartCheckoutCommand {
            user_id: app.user_id.clone(),
            package_id: UNLOCK_FULL_ACCESS.to_string(),
            return_origin: "https://app.mindspace.example".to_string(),
        })
        .await
        .unwrap();

    // Provider never confirms within the attempt budget
    app.provider.script_statuses([Ok(PaymentStatus::Pending)]);
    let outcome = app.poller.poll_until_terminal(&checkout.session_id).await;
    assert_eq!(outcome, PollOutcome::Timeout);
    assert_eq!(app.provider.status_call_count(), 10);

    // The webhook path still unlocks access afterwards
    app.provider.set_webhook_event(mock_checkout_completed_event(
        "cs_slow",
        app.user_id.as_str(),
        "user@example.com",
    ));
    let result = app
        .webhook
        .handle(HandleWebhookCommand {
            payload: b"{}".to_vec(),
            signature: "t=1,v1=ab".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(result, WebhookOutcome::AccessUnlocked);
    assert_eq!(decision(&app).await, AccessDecision::GrantedPaid);
}

#[tokio::test(start_paused = true)]
async fn webhook_and_poller_converge_on_one_paid_state() {
    let app = app();

    app.provider.set_checkout_session("cs_race", "https://x");
    let checkout = app
        .start_checkout
        .handle(StartCheckoutCommand {
            user_id: app.user_id.clone(),
            package_id: UNLOCK_FULL_ACCESS.to_string(),
            return_origin: "https://app.mindspace.example".to_string(),
        })
        .await
        .unwrap();

    // Webhook arrives first
    app.provider.set_webhook_event(mock_checkout_completed_event(
        "cs_race",
        app.user_id.as_str(),
        "user@example.com",
    ));
    app.webhook
        .handle(HandleWebhookCommand {
            payload: b"{}".to_vec(),
            signature: "t=1,v1=ab".to_string(),
        })
        .await
        .unwrap();

    // Poller then finds the session already settled and skips the provider
    let outcome = app.poller.poll_until_terminal(&checkout.session_id).await;
    assert_eq!(
        outcome,
        PollOutcome::Success {
            decision: AccessDecision::GrantedPaid
        }
    );
    assert_eq!(app.provider.status_call_count(), 0);
}

#[tokio::test]
async fn beta_tester_never_needs_to_pay() {
    let mut user = UserRecord::new(UserId::generate(), "beta@example.com");
    user.is_beta_tester = true;
    user.free_reflections_used = 50;
    let app = app_with(user);

    assert_eq!(decision(&app).await, AccessDecision::GrantedBeta);

    app.record_reflection
        .handle(RecordReflectionCommand {
            user_id: app.user_id.clone(),
            answers: vec![3; 10],
        })
        .await
        .unwrap();
    let record = app.users.get(&app.user_id).await.unwrap().unwrap();
    assert_eq!(record.free_reflections_used, 50);
}
