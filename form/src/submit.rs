use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::warn;

use crate::{
    transport::Transport,
    validate::{ContactForm, FieldError, validate},
};

/// Ceiling on the transport call; a hung request must not leave the form
/// stuck in its busy state.
pub const SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

/// How long the success notice stays up before auto-dismissing.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

/// Rendering surface for the form. Implementations are thin adapters over
/// the actual page; everything above this trait is testable headless.
pub trait FormUi: Send + Sync {
    fn clear_errors(&self);
    fn field_error(&self, error: &FieldError);
    fn set_busy(&self, busy: bool);
    fn success_notice(&self);
    fn dismiss_notice(&self);
    fn failure_notice(&self);
    fn reset_fields(&self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Payload accepted by the server.
    Sent,
    /// Validation failed, nothing was transmitted.
    Invalid,
    /// Transport failed or timed out; the form is re-submittable.
    Failed,
    /// A prior submission is still running; this one was ignored.
    InFlight,
}

/// Drives one form instance: validate, transmit, render the outcome.
/// At most one submission is in flight at a time.
pub struct Submitter<T: Transport> {
    ui: Arc<dyn FormUi>,
    transport: T,
    in_flight: AtomicBool,
}

impl<T: Transport> Submitter<T> {
    pub fn new(ui: Arc<dyn FormUi>, transport: T) -> Self {
        Self {
            ui,
            transport,
            in_flight: AtomicBool::new(false),
        }
    }

    pub async fn submit(&self, form: &ContactForm) -> SubmitOutcome {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return SubmitOutcome::InFlight;
        }
        let _flight = ResetOnDrop(&self.in_flight);

        self.ui.clear_errors();

        let payload = match validate(form) {
            Ok(payload) => payload,
            Err(errors) => {
                for error in &errors {
                    self.ui.field_error(error);
                }

                return SubmitOutcome::Invalid;
            }
        };

        self.ui.set_busy(true);
        let result = timeout(SUBMIT_TIMEOUT, self.transport.send(&payload)).await;
        // Busy state clears on every path, including timeout.
        self.ui.set_busy(false);

        match result {
            Ok(Ok(())) => {
                self.ui.success_notice();
                self.ui.reset_fields();

                let ui = self.ui.clone();
                tokio::spawn(async move {
                    sleep(NOTICE_TTL).await;
                    ui.dismiss_notice();
                });

                SubmitOutcome::Sent
            }
            Ok(Err(e)) => {
                warn!("Submission failed: {e}");
                self.ui.failure_notice();

                SubmitOutcome::Failed
            }
            Err(_) => {
                warn!("Submission timed out after {SUBMIT_TIMEOUT:?}");
                self.ui.failure_notice();

                SubmitOutcome::Failed
            }
        }
    }
}

struct ResetOnDrop<'a>(&'a AtomicBool);

impl Drop for ResetOnDrop<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Mutex, atomic::AtomicUsize};

    use async_trait::async_trait;
    use tokio::{sync::Notify, task::yield_now, time::advance};

    use super::*;
    use crate::{
        transport::TransportError,
        validate::ContactPayload,
    };

    #[derive(Default)]
    struct RecordingUi {
        events: Mutex<Vec<String>>,
    }

    impl RecordingUi {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: &str) {
            self.events.lock().unwrap().push(event.to_string());
        }
    }

    impl FormUi for RecordingUi {
        fn clear_errors(&self) {
            self.push("clear_errors");
        }

        fn field_error(&self, error: &FieldError) {
            self.push(&format!("error:{}", error.field.id()));
        }

        fn set_busy(&self, busy: bool) {
            self.push(if busy { "busy:on" } else { "busy:off" });
        }

        fn success_notice(&self) {
            self.push("success");
        }

        fn dismiss_notice(&self) {
            self.push("dismiss");
        }

        fn failure_notice(&self) {
            self.push("failure");
        }

        fn reset_fields(&self) {
            self.push("reset");
        }
    }

    enum Behavior {
        Succeed,
        Fail,
        Hang,
        /// Wait until released, then succeed.
        Block(Arc<Notify>),
    }

    struct FakeTransport {
        behavior: Behavior,
        calls: AtomicUsize,
    }

    impl FakeTransport {
        fn new(behavior: Behavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transport for FakeTransport {
        async fn send(&self, _payload: &ContactPayload) -> Result<(), TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match &self.behavior {
                Behavior::Succeed => Ok(()),
                Behavior::Fail => Err(TransportError::Status(500)),
                Behavior::Hang => std::future::pending().await,
                Behavior::Block(released) => {
                    released.notified().await;
                    Ok(())
                }
            }
        }
    }

    fn valid_form() -> ContactForm {
        ContactForm {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            message: "I would like to talk about a project.".to_string(),
            ..ContactForm::default()
        }
    }

    fn submitter(behavior: Behavior) -> (Arc<RecordingUi>, Submitter<Arc<FakeTransport>>) {
        let ui = Arc::new(RecordingUi::default());
        let transport = Arc::new(FakeTransport::new(behavior));

        (ui.clone(), Submitter::new(ui, transport))
    }

    #[async_trait]
    impl Transport for Arc<FakeTransport> {
        async fn send(&self, payload: &ContactPayload) -> Result<(), TransportError> {
            self.as_ref().send(payload).await
        }
    }

    #[tokio::test]
    async fn test_invalid_form_never_transmits() {
        let (ui, submitter) = submitter(Behavior::Succeed);

        let outcome = submitter.submit(&ContactForm::default()).await;

        assert_eq!(outcome, SubmitOutcome::Invalid);
        assert_eq!(submitter.transport.calls(), 0);
        assert_eq!(
            ui.events(),
            vec!["clear_errors", "error:name", "error:email", "error:message"]
        );
    }

    #[tokio::test]
    async fn test_success_resets_form_and_sends_once() {
        let (ui, submitter) = submitter(Behavior::Succeed);

        let outcome = submitter.submit(&valid_form()).await;

        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(submitter.transport.calls(), 1);
        assert_eq!(
            ui.events(),
            vec!["clear_errors", "busy:on", "busy:off", "success", "reset"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_notice_auto_dismisses() {
        let (ui, submitter) = submitter(Behavior::Succeed);

        submitter.submit(&valid_form()).await;

        // Let the dismiss task start its timer before moving the clock.
        yield_now().await;
        assert!(!ui.events().contains(&"dismiss".to_string()));

        advance(NOTICE_TTL).await;
        yield_now().await;

        assert_eq!(ui.events().last().unwrap(), "dismiss");
    }

    #[tokio::test]
    async fn test_transport_failure_clears_busy_state() {
        let (ui, submitter) = submitter(Behavior::Fail);

        let outcome = submitter.submit(&valid_form()).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(
            ui.events(),
            vec!["clear_errors", "busy:on", "busy:off", "failure"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_transport_times_out_as_failure() {
        let (ui, submitter) = submitter(Behavior::Hang);

        let outcome = submitter.submit(&valid_form()).await;

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(ui.events().last().unwrap(), "failure");
        assert!(ui.events().contains(&"busy:off".to_string()));
    }

    #[tokio::test]
    async fn test_second_submit_rejected_while_in_flight() {
        let released = Arc::new(Notify::new());
        let ui = Arc::new(RecordingUi::default());
        let transport = Arc::new(FakeTransport::new(Behavior::Block(released.clone())));
        let submitter = Arc::new(Submitter::new(
            ui.clone() as Arc<dyn FormUi>,
            transport.clone(),
        ));

        let first = {
            let submitter = submitter.clone();
            tokio::spawn(async move { submitter.submit(&valid_form()).await })
        };

        // Let the first submission reach the transport before racing it.
        while transport.calls() == 0 {
            yield_now().await;
        }

        assert_eq!(submitter.submit(&valid_form()).await, SubmitOutcome::InFlight);

        released.notify_one();
        assert_eq!(first.await.unwrap(), SubmitOutcome::Sent);

        // Only the first attempt ever reached the transport.
        assert_eq!(transport.calls(), 1);

        // The form is usable again once the flight has landed.
        released.notify_one();
        assert_eq!(submitter.submit(&valid_form()).await, SubmitOutcome::Sent);
        assert_eq!(transport.calls(), 2);
    }
}
