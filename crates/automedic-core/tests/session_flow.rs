//! Integration tests for submission sessions over the resolver strategies.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use automedic_core::{
    DiagnosisError, DiagnosisRequest, DiagnosisResolver, DiagnosisResult, DiagnosisSession,
    FixedResolver, FormInput, MockResolver, OverlapPolicy, SessionState,
    GENERIC_FAILURE_MESSAGE,
};

/// Resolver that always fails, like an unreachable endpoint.
struct FailingResolver;

#[async_trait]
impl DiagnosisResolver for FailingResolver {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn resolve(&self, _request: &DiagnosisRequest) -> automedic_core::Result<DiagnosisResult> {
        Err(DiagnosisError::Transport("connection refused".to_string()))
    }
}

fn request(symptoms: &str) -> DiagnosisRequest {
    DiagnosisRequest::new("Toyota", "Corolla", Some(2012), 140_000, symptoms)
}

/// Test: a successful submission settles in Success and is kept
#[tokio::test]
async fn test_submit_success() {
    let session = DiagnosisSession::new(Arc::new(MockResolver::new(Duration::ZERO)));
    assert_eq!(session.state(), SessionState::Idle);

    let state = session.submit(request("battery light on")).await.unwrap();
    assert_eq!(state.result().unwrap().issue_title, "Dead Battery");
    assert_eq!(session.state(), state);
    assert!(!session.is_loading());
}

/// Test: resolver failures collapse into the generic message
#[tokio::test]
async fn test_submit_failure_uses_generic_message() {
    let session = DiagnosisSession::new(Arc::new(FailingResolver));

    let state = session.submit(request("anything")).await.unwrap();
    assert_eq!(state, SessionState::Failed(GENERIC_FAILURE_MESSAGE.to_string()));
    assert!(state.result().is_none());
}

/// Test: each submission replaces the previous outcome wholesale
#[tokio::test]
async fn test_latest_submission_replaces_previous() {
    let session = DiagnosisSession::new(Arc::new(MockResolver::new(Duration::ZERO)));

    session.submit(request("squeaky brakes")).await.unwrap();
    let state = session.submit(request("wobbles at 70")).await.unwrap();
    assert_eq!(state.result().unwrap().issue_title, "Unbalanced Tires");
    assert_eq!(session.state().result().unwrap().issue_title, "Unbalanced Tires");
}

/// Test: form text with bad numbers still submits (silent coercion)
#[tokio::test]
async fn test_form_with_bad_numbers_still_submits() {
    let session = DiagnosisSession::new(Arc::new(MockResolver::new(Duration::ZERO)));
    let form = FormInput {
        make: "Mazda".to_string(),
        model: "3".to_string(),
        year: "twenty-ten".to_string(),
        mileage: "a lot".to_string(),
        symptoms: "misfires on cold start".to_string(),
    };
    let req = form.into_request();
    assert_eq!(req.car_year, None);
    assert_eq!(req.mileage, 0);

    let state = session.submit(req).await.unwrap();
    assert_eq!(state.result().unwrap().issue_title, "Dead Battery");
}

/// Test: the reject policy refuses a second submission while one is pending
#[tokio::test(start_paused = true)]
async fn test_reject_overlapping_submission() {
    let session = DiagnosisSession::with_policy(
        Arc::new(FixedResolver::brake_pads(Duration::from_millis(1500))),
        OverlapPolicy::Reject,
    );

    let (first, second) = tokio::join!(
        session.submit(request("brakes")),
        session.submit(request("battery")),
    );

    assert!(matches!(first, Ok(SessionState::Success(_))));
    assert!(matches!(second, Err(DiagnosisError::SubmissionInFlight)));
    assert_eq!(
        session.state().result().unwrap().issue_title,
        "Worn Brake Pads"
    );
}

/// Test: the supersede policy discards the older submission's outcome
#[tokio::test(start_paused = true)]
async fn test_supersede_overlapping_submission() {
    let session = DiagnosisSession::with_policy(
        Arc::new(MockResolver::new(Duration::from_millis(1500))),
        OverlapPolicy::Supersede,
    );

    let (first, second) = tokio::join!(
        session.submit(request("brakes squeak")),
        session.submit(request("engine stutters")),
    );

    assert!(matches!(first, Err(DiagnosisError::Superseded)));
    let second = second.unwrap();
    assert_eq!(second.result().unwrap().issue_title, "Engine Misfire");
    assert_eq!(session.state(), second);
}

/// Test: the session is pending while the resolver runs
#[tokio::test(start_paused = true)]
async fn test_loading_while_pending() {
    let session = Arc::new(DiagnosisSession::new(Arc::new(MockResolver::new(
        Duration::from_millis(1500),
    ))));

    let handle = {
        let session = session.clone();
        tokio::spawn(async move { session.submit(request("tire noise")).await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(session.is_loading());

    let state = handle.await.unwrap().unwrap();
    assert_eq!(state.result().unwrap().issue_title, "Unbalanced Tires");
    assert!(!session.is_loading());
}

/// Test: a submission abandoned mid-flight does not leave the session Pending
#[tokio::test(start_paused = true)]
async fn test_dropped_submission_returns_to_idle() {
    let session = DiagnosisSession::new(Arc::new(MockResolver::new(Duration::from_millis(1500))));

    let abandoned =
        tokio::time::timeout(Duration::from_millis(100), session.submit(request("brakes"))).await;
    assert!(abandoned.is_err());
    assert_eq!(session.state(), SessionState::Idle);
    assert!(!session.is_loading());

    let state = session.submit(request("brakes")).await.unwrap();
    assert_eq!(state.result().unwrap().issue_title, "Worn Brake Pads");
}

/// Test: dropping a superseded submission leaves the newer one untouched
#[tokio::test(start_paused = true)]
async fn test_dropped_superseded_submission_keeps_newer_state() {
    let session = DiagnosisSession::with_policy(
        Arc::new(MockResolver::new(Duration::from_millis(1500))),
        OverlapPolicy::Supersede,
    );

    let first = tokio::time::timeout(Duration::from_millis(100), session.submit(request("brakes")));
    let second = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        session.submit(request("battery")).await
    };
    let (first, second) = tokio::join!(first, second);

    assert!(first.is_err());
    assert_eq!(second.unwrap().result().unwrap().issue_title, "Dead Battery");
    assert_eq!(session.state().result().unwrap().issue_title, "Dead Battery");
}
