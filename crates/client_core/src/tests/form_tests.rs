use std::sync::Mutex;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use shared::domain::ContactForm;

use super::*;
use crate::{
    fakes::RecordingFormView,
    mock_endpoint::{spawn_endpoint, unreachable_base_url, Reply},
    transport::{RestContactTransport, SubmitEndpoint},
    validation::ContactSubmission,
};

const UA: &str = "Mozilla/5.0 (Macintosh) landing-tests";

fn mario() -> ContactForm {
    ContactForm {
        nome: "Mario".to_string(),
        cognome: "Rossi".to_string(),
        telefono: "333 1234567".to_string(),
        email: "TEST@Email.com".to_string(),
        privacy: true,
    }
}

fn settings() -> FormSettings {
    FormSettings {
        user_agent: UA.to_string(),
        notice_ttl: Duration::from_secs(5),
    }
}

/// Answers every submit with a fixed result and records what it was given,
/// along with the view's loading state at call time.
struct ScriptedTransport {
    result: Result<(), SubmitFailure>,
    view: Arc<RecordingFormView>,
    calls: Mutex<Vec<(ContactSubmission, String, bool)>>,
}

impl ScriptedTransport {
    fn new(view: Arc<RecordingFormView>, result: Result<(), SubmitFailure>) -> Arc<Self> {
        Arc::new(Self {
            result,
            view,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(ContactSubmission, String, bool)> {
        self.calls.lock().expect("calls").clone()
    }
}

#[async_trait]
impl ContactTransport for ScriptedTransport {
    async fn submit(
        &self,
        submission: &ContactSubmission,
        user_agent: &str,
    ) -> Result<(), SubmitFailure> {
        let loading = self.view.snapshot().loading;
        self.calls.lock().expect("calls").push((
            submission.clone(),
            user_agent.to_string(),
            loading,
        ));
        self.result.clone()
    }
}

fn controller_with(
    input: ContactForm,
    result: Result<(), SubmitFailure>,
) -> (
    ContactFormController,
    Arc<RecordingFormView>,
    Arc<ScriptedTransport>,
) {
    let view = Arc::new(RecordingFormView::with_input(input));
    let transport = ScriptedTransport::new(view.clone(), result);
    let controller = ContactFormController::new(
        view.clone() as Arc<dyn ContactFormView>,
        transport.clone() as Arc<dyn ContactTransport>,
        settings(),
    );
    (controller, view, transport)
}

#[tokio::test]
async fn blur_sets_and_clears_field_error() {
    let mut form = mario();
    form.telefono = "123".to_string();
    let (controller, view, _transport) = controller_with(form, Ok(()));

    assert_eq!(
        controller.on_blur(FieldName::Telefono),
        Err(ValidationError::TelefonoInvalid)
    );
    assert_eq!(
        view.field_error(FieldName::Telefono).as_deref(),
        Some("Inserisci un numero di telefono valido (es. 333 1234567)")
    );

    view.edit(|input| input.telefono = "+39 333 1234567".to_string());
    assert_eq!(controller.on_blur(FieldName::Telefono), Ok(()));
    assert_eq!(view.field_error(FieldName::Telefono), None);
}

#[tokio::test]
async fn input_clears_displayed_error_without_validating() {
    let mut form = mario();
    form.nome = "M".to_string();
    let (controller, view, _transport) = controller_with(form, Ok(()));

    controller.on_input(FieldName::Nome);
    assert_eq!(view.field_error(FieldName::Nome), None);

    controller.on_blur(FieldName::Nome).expect_err("too short");
    assert!(view.field_error(FieldName::Nome).is_some());

    controller.on_input(FieldName::Nome);
    assert_eq!(view.field_error(FieldName::Nome), None);
    assert_eq!(view.snapshot().input.nome, "M");
}

#[tokio::test]
async fn invalid_submit_renders_errors_and_never_calls_transport() {
    let mut form = mario();
    form.privacy = false;
    form.email = "email-non-valida".to_string();
    let (mut controller, view, transport) = controller_with(form, Ok(()));

    let outcome = controller.submit().await;

    let errors = match outcome {
        SubmitOutcome::Aborted(errors) => errors,
        other => panic!("expected validation abort, got {other:?}"),
    };
    assert_eq!(
        errors.get(FieldName::Privacy),
        Some(ValidationError::PrivacyNotAccepted)
    );
    assert!(transport.calls().is_empty());
    assert_eq!(controller.phase(), SubmitPhase::Idle);

    let snapshot = view.snapshot();
    assert!(!snapshot.loading_seen);
    assert_eq!(
        snapshot.errors.get(&FieldName::Privacy).map(String::as_str),
        Some("Devi accettare la privacy policy per procedere")
    );
    assert!(snapshot.errors.contains_key(&FieldName::Email));
    assert!(!snapshot.errors.contains_key(&FieldName::Nome));
}

#[tokio::test]
async fn successful_submit_sends_normalized_lead_and_shows_success() {
    let (mut controller, view, transport) = controller_with(mario(), Ok(()));

    assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);

    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    let (submission, user_agent, loading_during_call) = &calls[0];
    assert_eq!(submission.nome(), "Mario");
    assert_eq!(submission.cognome(), "Rossi");
    assert_eq!(submission.telefono(), "3331234567");
    assert_eq!(submission.email(), "test@email.com");
    assert!(submission.privacy());
    assert_eq!(user_agent, UA);
    assert!(*loading_during_call, "submit control must be disabled in flight");

    let snapshot = view.snapshot();
    assert_eq!(snapshot.input, ContactForm::default());
    assert!(snapshot.errors.is_empty());
    assert!(!snapshot.form_visible);
    assert!(snapshot.success_visible);
    assert!(!snapshot.loading);
    assert_eq!(controller.phase(), SubmitPhase::Succeeded);
}

#[tokio::test]
async fn submit_after_success_is_ignored() {
    let (mut controller, _view, transport) = controller_with(mario(), Ok(()));
    assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
    assert_eq!(controller.submit().await, SubmitOutcome::Ignored);
    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn network_failure_shows_connectivity_notice_and_keeps_input() {
    let failure = SubmitFailure::NetworkFailure("connection refused".to_string());
    let (mut controller, view, _transport) = controller_with(mario(), Err(failure.clone()));

    let outcome = controller.submit().await;
    assert_eq!(
        outcome,
        SubmitOutcome::Failed {
            failure,
            notice: Notice::Connectivity,
        }
    );

    let snapshot = view.snapshot();
    assert_eq!(
        snapshot.notice.as_deref(),
        Some("Errore di connessione. Verifica la tua connessione internet.")
    );
    assert!(!snapshot.loading, "submit control must be re-enabled");
    assert_eq!(snapshot.input, mario());
    assert!(snapshot.form_visible);
    assert!(!snapshot.success_visible);
    assert_eq!(controller.phase(), SubmitPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn server_error_notice_hides_itself_after_ttl() {
    let (mut controller, view, _transport) =
        controller_with(mario(), Err(SubmitFailure::http_status(500, None)));

    controller.submit().await;
    assert_eq!(
        view.snapshot().notice.as_deref(),
        Some("Errore del server. Riprova più tardi.")
    );
    assert_eq!(view.snapshot().input, mario());

    tokio::time::sleep(Duration::from_millis(4_900)).await;
    assert!(view.snapshot().notice.is_some());
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(view.snapshot().notice, None);
}

#[tokio::test(start_paused = true)]
async fn repeated_failures_restart_the_auto_hide() {
    let (mut controller, view, transport) =
        controller_with(mario(), Err(SubmitFailure::http_status(503, None)));

    controller.submit().await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    controller.submit().await;
    assert_eq!(transport.calls().len(), 2);

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(
        view.snapshot().notice.is_some(),
        "first timer must not hide the second notice"
    );

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(view.snapshot().notice, None);
}

#[tokio::test(start_paused = true)]
async fn dismiss_hides_notice_and_cancels_timer() {
    let (mut controller, view, _transport) = controller_with(
        mario(),
        Err(SubmitFailure::ParseFailure("bad payload".to_string())),
    );

    let outcome = controller.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            notice: Notice::Generic,
            ..
        }
    ));
    assert_eq!(
        view.snapshot().notice.as_deref(),
        Some("Si è verificato un errore. Riprova più tardi.")
    );

    controller.dismiss_notice();
    assert_eq!(view.snapshot().notice, None);
    assert!(!controller.notice_timer.is_pending());
}

#[tokio::test]
async fn end_to_end_success_against_rest_endpoint() {
    let server = spawn_endpoint(Reply::Json(StatusCode::CREATED, json!({}))).await;
    let view = Arc::new(RecordingFormView::with_input(mario()));
    let transport = Arc::new(RestContactTransport::new(SubmitEndpoint::new(
        &server.base_url,
        "anon",
    )));
    let mut controller = ContactFormController::new(
        view.clone() as Arc<dyn ContactFormView>,
        transport as Arc<dyn ContactTransport>,
        settings(),
    );

    assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);

    let received = server.received().await;
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].body.telefono, "3331234567");
    assert_eq!(received[0].body.email, "test@email.com");
    assert!(received[0].body.privacy_accepted);
    assert!(view.snapshot().success_visible);
    assert_eq!(view.snapshot().input.nome, "");
}

#[tokio::test]
async fn end_to_end_server_error_keeps_form() {
    let server = spawn_endpoint(Reply::Json(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "Internal Server Error" }),
    ))
    .await;
    let view = Arc::new(RecordingFormView::with_input(mario()));
    let transport = Arc::new(RestContactTransport::new(SubmitEndpoint::new(
        &server.base_url,
        "anon",
    )));
    let mut controller = ContactFormController::new(
        view.clone() as Arc<dyn ContactFormView>,
        transport as Arc<dyn ContactTransport>,
        settings(),
    );

    let outcome = controller.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            notice: Notice::ServerError,
            ..
        }
    ));
    let snapshot = view.snapshot();
    assert_eq!(snapshot.input, mario());
    assert!(snapshot.notice.is_some());
    assert!(!snapshot.loading);
}

#[tokio::test]
async fn end_to_end_unreachable_endpoint_reports_connectivity() {
    let base_url = unreachable_base_url().await;
    let view = Arc::new(RecordingFormView::with_input(mario()));
    let transport = Arc::new(RestContactTransport::new(SubmitEndpoint::new(
        base_url, "anon",
    )));
    let mut controller = ContactFormController::new(
        view.clone() as Arc<dyn ContactFormView>,
        transport as Arc<dyn ContactTransport>,
        settings(),
    );

    let outcome = controller.submit().await;
    assert!(matches!(
        outcome,
        SubmitOutcome::Failed {
            notice: Notice::Connectivity,
            ..
        }
    ));
    assert_eq!(view.snapshot().input, mario());
}
