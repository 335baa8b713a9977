//! Interaction state for a single prompt/answer session.
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, instrument};

use crate::credential::Credential;
use crate::dispatch::{Generator, SubmitError, SubmitRequest};
use crate::mode::Mode;

/// Who is using the session. Supplied externally and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub email: Option<String>,
    pub display_name: Option<String>,
}

/// What the session currently displays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConversationView {
    /// Nothing submitted yet, the welcome banner is shown.
    #[default]
    NotStarted,
    /// The most recent question and its answer.
    Started { question: String, answer: String },
}

impl ConversationView {
    pub fn is_started(&self) -> bool {
        matches!(self, ConversationView::Started { .. })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Select a mode (Short Form or Long Form) before submitting")]
    NoModeSelected,
    #[error("A submission is already in progress")]
    InFlight,
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

#[derive(Debug, Default)]
pub struct Session {
    identity: Identity,
    draft: String,
    mode: Option<Mode>,
    view: ConversationView,
    last_error: Option<SubmitError>,
    in_flight: bool,
}

impl Session {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            ..Default::default()
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn view(&self) -> &ConversationView {
        &self.view
    }

    /// Failure of the most recent submission, if it failed.
    pub fn last_error(&self) -> Option<&SubmitError> {
        self.last_error.as_ref()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Replaces the draft prompt.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Selects `mode`, overwriting any prior selection.
    pub fn select_mode(&mut self, mode: Mode) {
        debug!(%mode, "Mode selected");
        self.mode = Some(mode);
    }

    /// Starts a submission of the current draft.
    ///
    /// Nothing changes if no mode is selected or a submission is pending.
    pub fn begin_submit(&mut self) -> Result<SubmitRequest, SessionError> {
        if self.in_flight {
            return Err(SessionError::InFlight);
        }
        let mode = self.mode.ok_or(SessionError::NoModeSelected)?;
        self.in_flight = true;
        Ok(SubmitRequest::new(self.draft.clone(), mode))
    }

    /// Applies the result of a submission started with [`Session::begin_submit`].
    ///
    /// On failure the draft, mode and view are left as they were.
    pub fn complete_submit(
        &mut self,
        request: SubmitRequest,
        result: Result<String, SubmitError>,
    ) -> Result<(), SessionError> {
        self.in_flight = false;
        match result {
            Ok(answer) => {
                info!(mode = %request.mode, "Submission succeeded");
                self.view = ConversationView::Started {
                    question: request.prompt,
                    answer,
                };
                self.draft.clear();
                self.mode = None;
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                error!("Error submitting data: {e}");
                self.last_error = Some(e.clone());
                Err(SessionError::Submit(e))
            }
        }
    }

    /// Drops a pending submission without touching any other state.
    pub fn abandon_submit(&mut self) {
        if self.in_flight {
            debug!("Submission abandoned");
        }
        self.in_flight = false;
    }

    /// Submits the draft with the selected mode and applies the result.
    #[instrument(skip(self, generator, credential))]
    pub async fn submit(
        &mut self,
        generator: &dyn Generator,
        credential: &Credential,
    ) -> Result<(), SessionError> {
        let request = self.begin_submit()?;
        let result = generator.generate(&request, credential).await;
        self.complete_submit(request, result)
    }

    /// Returns to the initial state. The identity is kept.
    pub fn reset(&mut self) {
        debug!("Session reset");
        *self = Self::new(std::mem::take(&mut self.identity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records requests and replies with a fixed result.
    struct RecordingGenerator {
        requests: Mutex<Vec<(SubmitRequest, Option<String>)>>,
        reply: Result<String, SubmitError>,
    }

    impl RecordingGenerator {
        fn replying(reply: Result<String, SubmitError>) -> Self {
            Self {
                requests: Mutex::new(vec![]),
                reply,
            }
        }

        fn requests(&self) -> Vec<(SubmitRequest, Option<String>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Generator for RecordingGenerator {
        async fn generate(
            &self,
            request: &SubmitRequest,
            credential: &Credential,
        ) -> Result<String, SubmitError> {
            self.requests
                .lock()
                .unwrap()
                .push((request.clone(), credential.token().map(String::from)));
            self.reply.clone()
        }
    }

    fn identity() -> Identity {
        Identity {
            email: Some("jane@example.com".to_string()),
            display_name: Some("Jane".to_string()),
        }
    }

    #[test]
    fn test_new_session_is_initial_state() {
        let session = Session::new(identity());
        assert_eq!(session.draft(), "");
        assert_eq!(session.mode(), None);
        assert_eq!(session.view(), &ConversationView::NotStarted);
        assert!(session.last_error().is_none());
        assert!(!session.is_in_flight());
        assert_eq!(session.identity(), &identity());
    }

    #[test]
    fn test_select_mode_overwrites() {
        let mut session = Session::default();
        session.select_mode(Mode::ShortForm);
        session.select_mode(Mode::LongForm);
        assert_eq!(session.mode(), Some(Mode::LongForm));
        session.select_mode(Mode::LongForm);
        assert_eq!(session.mode(), Some(Mode::LongForm));
    }

    #[tokio::test]
    async fn test_submit_success_sends_one_request() {
        let generator = RecordingGenerator::replying(Ok("An answer".to_string()));
        let mut session = Session::new(identity());
        session.set_draft("Write a tagline");
        session.select_mode(Mode::LongForm);

        session
            .submit(&generator, &Credential::new("tok"))
            .await
            .unwrap();

        assert_eq!(
            generator.requests(),
            vec![(
                SubmitRequest::new("Write a tagline", Mode::LongForm),
                Some("tok".to_string())
            )]
        );
        assert_eq!(
            session.view(),
            &ConversationView::Started {
                question: "Write a tagline".to_string(),
                answer: "An answer".to_string()
            }
        );
        assert_eq!(session.draft(), "");
        assert_eq!(session.mode(), None);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_submit_empty_draft_sends_empty_prompt() {
        let generator = RecordingGenerator::replying(Ok("ok".to_string()));
        let mut session = Session::default();
        session.select_mode(Mode::ShortForm);

        session.submit(&generator, &Credential::none()).await.unwrap();

        assert_eq!(
            generator.requests(),
            vec![(SubmitRequest::new("", Mode::ShortForm), None)]
        );
    }

    #[tokio::test]
    async fn test_submit_without_mode_is_noop() {
        let generator = RecordingGenerator::replying(Ok("unused".to_string()));
        let mut session = Session::default();
        session.set_draft("hello");

        let err = session
            .submit(&generator, &Credential::none())
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::NoModeSelected);
        assert!(generator.requests().is_empty());
        assert_eq!(session.draft(), "hello");
        assert_eq!(session.view(), &ConversationView::NotStarted);
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_submit_failure_leaves_state_untouched() {
        let failure = SubmitError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        let generator = RecordingGenerator::replying(Err(failure.clone()));
        let mut session = Session::default();
        session.set_draft("hello");
        session.select_mode(Mode::ShortForm);

        let err = session
            .submit(&generator, &Credential::none())
            .await
            .unwrap_err();

        assert_eq!(err, SessionError::Submit(failure.clone()));
        assert_eq!(session.draft(), "hello");
        assert_eq!(session.mode(), Some(Mode::ShortForm));
        assert_eq!(session.view(), &ConversationView::NotStarted);
        assert_eq!(session.last_error(), Some(&failure));
        assert!(!session.is_in_flight());
    }

    #[tokio::test]
    async fn test_failure_after_success_keeps_previous_answer() {
        let mut session = Session::default();
        session.set_draft("first");
        session.select_mode(Mode::ShortForm);
        session
            .submit(
                &RecordingGenerator::replying(Ok("one".to_string())),
                &Credential::none(),
            )
            .await
            .unwrap();

        session.set_draft("second");
        session.select_mode(Mode::LongForm);
        let failing =
            RecordingGenerator::replying(Err(SubmitError::Transport("refused".to_string())));
        assert!(session.submit(&failing, &Credential::none()).await.is_err());

        assert_eq!(
            session.view(),
            &ConversationView::Started {
                question: "first".to_string(),
                answer: "one".to_string()
            }
        );
        assert_eq!(session.draft(), "second");
        assert!(session.last_error().is_some());

        // The next success clears the failure.
        let succeeding = RecordingGenerator::replying(Ok("two".to_string()));
        session.submit(&succeeding, &Credential::none()).await.unwrap();
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_begin_submit_rejects_duplicates() {
        let mut session = Session::default();
        session.select_mode(Mode::ShortForm);

        let request = session.begin_submit().unwrap();
        assert!(session.is_in_flight());
        assert_eq!(session.begin_submit().unwrap_err(), SessionError::InFlight);

        session.complete_submit(request, Ok("done".to_string())).unwrap();
        assert!(!session.is_in_flight());
    }

    #[test]
    fn test_abandon_submit_keeps_state() {
        let mut session = Session::default();
        session.set_draft("pending");
        session.select_mode(Mode::LongForm);

        session.begin_submit().unwrap();
        session.abandon_submit();

        assert!(!session.is_in_flight());
        assert_eq!(session.draft(), "pending");
        assert_eq!(session.mode(), Some(Mode::LongForm));
        assert!(session.begin_submit().is_ok());
    }

    #[tokio::test]
    async fn test_reset_returns_to_initial_state() {
        let generator = RecordingGenerator::replying(Ok("answer".to_string()));
        let mut session = Session::new(identity());
        session.set_draft("question");
        session.select_mode(Mode::ShortForm);
        session.submit(&generator, &Credential::none()).await.unwrap();
        session.set_draft("leftover");
        session.select_mode(Mode::LongForm);

        session.reset();

        assert_eq!(session.view(), &ConversationView::NotStarted);
        assert_eq!(session.draft(), "");
        assert_eq!(session.mode(), None);
        assert!(session.last_error().is_none());
        assert_eq!(session.identity(), &identity());
    }
}
