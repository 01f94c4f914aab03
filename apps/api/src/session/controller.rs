//! Interview Session Controller: owns one voice-interview attempt.
//!
//! All state changes happen on voice events or user actions, one at a time.
//! The only concurrent work is the feedback run, which reports back through
//! its join handle, and the delayed navigation task; both are tied to this
//! controller and torn down by [`SessionController::dispose`].

use std::future::pending;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::SessionSettings;
use crate::models::user::Caller;
use crate::session::collaborators::{
    CreateFeedbackRequest, FeedbackGenerator, InterviewStore, Navigator, Route,
};
use crate::session::error::SessionError;
use crate::session::orchestrator::{FeedbackOrchestrator, FeedbackOutcome};
use crate::session::script::{interview_script, onboarding_script};
use crate::session::status::{CallStatus, CallTrigger};
use crate::session::transcript::Transcript;
use crate::session::view::{CallButton, SessionView};
use crate::session::voice::{
    EventSubscription, ScriptConfig, VariableBindings, VoiceClient, VoiceEvent,
};

/// Pause between a finished interview and the return to the dashboard, so the
/// SDK can finish its own teardown.
pub const NAVIGATION_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq)]
pub enum SessionMode {
    /// Onboarding script that collects preferences. No feedback step.
    Generate,
    /// Question-driven interview, scored once the call ends.
    Interview {
        interview_id: Uuid,
        feedback_id: Option<Uuid>,
        questions: Vec<String>,
    },
}

/// Immutable input to one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub user_name: String,
    pub user_id: String,
    pub mode: SessionMode,
}

/// Remote collaborators and settings injected at construction.
pub struct SessionDeps {
    pub feedback: Arc<dyn FeedbackGenerator>,
    pub interviews: Arc<dyn InterviewStore>,
    pub navigator: Arc<dyn Navigator>,
    pub settings: SessionSettings,
}

/// User-initiated actions fed to [`SessionController::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    StartCall,
    Disconnect,
    Dispose,
}

pub struct SessionController<V: VoiceClient> {
    config: SessionConfig,
    caller: Caller,
    settings: SessionSettings,
    voice: V,
    events: Option<EventSubscription>,
    orchestrator: FeedbackOrchestrator,
    navigator: Arc<dyn Navigator>,

    status: CallStatus,
    transcript: Transcript,
    is_speaking: bool,
    mic_granted: bool,
    last_error: Option<SessionError>,
    feedback_error: Option<SessionError>,
    feedback_id: Option<String>,

    feedback_task: Option<JoinHandle<FeedbackOutcome>>,
    pending_navigation: Option<JoinHandle<()>>,
    disposed: bool,
}

impl<V: VoiceClient> SessionController<V> {
    pub fn new(config: SessionConfig, caller: Caller, mut voice: V, deps: SessionDeps) -> Self {
        let events = voice.subscribe();
        Self {
            config,
            caller,
            settings: deps.settings,
            voice,
            events: Some(events),
            orchestrator: FeedbackOrchestrator::new(deps.feedback, deps.interviews),
            navigator: deps.navigator,
            status: CallStatus::Inactive,
            transcript: Transcript::new(),
            is_speaking: false,
            mic_granted: false,
            last_error: None,
            feedback_error: None,
            feedback_id: None,
            feedback_task: None,
            pending_navigation: None,
            disposed: false,
        }
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Latest start or SDK error.
    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    /// Error from the feedback step, shown as a banner.
    pub fn feedback_error(&self) -> Option<&SessionError> {
        self.feedback_error.as_ref()
    }

    pub fn feedback_id(&self) -> Option<&str> {
        self.feedback_id.as_deref()
    }

    pub fn is_generating_feedback(&self) -> bool {
        self.orchestrator.is_processing()
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    pub fn view(&self) -> SessionView<'_> {
        let generating_feedback = self.is_generating_feedback();
        SessionView {
            status: self.status,
            button: CallButton::for_status(self.status, generating_feedback),
            caller_name: self.caller.display_name(),
            caller_photo_url: self.caller.photo_url(),
            last_line: self.transcript.last(),
            is_speaking: self.is_speaking,
            mic_granted: self.mic_granted,
            generating_feedback,
            error_banner: self.feedback_error.as_ref().map(ToString::to_string),
            last_error: self.last_error.as_ref().map(ToString::to_string),
        }
    }

    /// "Start call". A no-op unless the call is idle and no feedback run is
    /// outstanding.
    pub async fn start_call(&mut self) {
        if self.disposed {
            return;
        }
        if self.orchestrator.is_processing() {
            debug!("Start ignored: feedback generation in flight");
            return;
        }
        if self.apply(CallTrigger::StartRequested).is_none() {
            debug!("Start ignored while {:?}", self.status);
            return;
        }
        self.last_error = None;

        let (script, variables) = self.script();
        info!(
            "Starting {} call for user {}",
            script_label(&script),
            self.config.user_id
        );
        if let Err(e) = self.voice.start(&script, &variables).await {
            self.fail_start(e.to_string());
        }
    }

    /// "End call". Stops the SDK first, then finishes the session.
    pub async fn disconnect(&mut self) {
        if self.disposed {
            return;
        }
        if self.status.next(CallTrigger::Disconnected).is_none() {
            debug!("Disconnect ignored while {:?}", self.status);
            return;
        }
        if let Err(e) = self.voice.stop().await {
            warn!("Voice client failed to stop: {e}");
            self.last_error = Some(SessionError::Voice(e.to_string()));
        }
        if self.apply(CallTrigger::Disconnected).is_some() {
            self.on_finished();
        }
    }

    pub fn handle_event(&mut self, event: VoiceEvent) {
        if self.disposed {
            return;
        }
        match event {
            VoiceEvent::CallStart => {
                if self.apply(CallTrigger::CallStarted).is_some() {
                    self.mic_granted = true;
                }
            }
            VoiceEvent::CallEnd => match self.apply(CallTrigger::CallEnded) {
                Some(CallStatus::Finished) => self.on_finished(),
                Some(CallStatus::Inactive) => {
                    self.last_error = Some(SessionError::StartFailed(
                        "call ended before it connected".to_string(),
                    ));
                }
                _ => debug!("call-end ignored while {:?}", self.status),
            },
            VoiceEvent::SpeechStart => self.is_speaking = true,
            VoiceEvent::SpeechEnd => self.is_speaking = false,
            VoiceEvent::Message(message) => {
                if self.status != CallStatus::Active {
                    return;
                }
                if let Some(entry) = message.as_final_entry() {
                    debug!("{}: {}", entry.role.as_str(), entry.content);
                    self.transcript.push(entry);
                }
            }
            VoiceEvent::Error(message) => {
                warn!("Voice client error: {message}");
                self.last_error = Some(SessionError::Voice(message));
            }
            VoiceEvent::CallStartFailed(message) => self.fail_start(message),
        }
    }

    /// Waits for an outstanding feedback run and applies its outcome.
    pub async fn settle_feedback(&mut self) {
        if self.feedback_task.is_none() {
            return;
        }
        let outcome = next_outcome(&mut self.feedback_task).await;
        self.apply_outcome(outcome);
    }

    /// Drives the session from SDK events and user actions until the action
    /// channel closes or `Dispose` arrives, then disposes the controller.
    pub async fn run(&mut self, mut actions: mpsc::Receiver<UserAction>) {
        loop {
            tokio::select! {
                event = next_event(&mut self.events) => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        debug!("Voice client closed its event stream");
                        self.events = None;
                    }
                },
                outcome = next_outcome(&mut self.feedback_task) => self.apply_outcome(outcome),
                action = actions.recv() => match action {
                    Some(UserAction::StartCall) => self.start_call().await,
                    Some(UserAction::Disconnect) => self.disconnect().await,
                    Some(UserAction::Dispose) | None => break,
                },
            }
        }
        self.dispose().await;
    }

    /// Releases the event subscription, stops a live call and cancels pending
    /// navigation. An in-flight feedback request is left to complete on its
    /// own; its result is discarded.
    pub async fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.events = None;

        if self.status == CallStatus::Active {
            if let Err(e) = self.voice.stop().await {
                warn!("Voice client failed to stop during dispose: {e}");
            }
        }
        if let Some(navigation) = self.pending_navigation.take() {
            navigation.abort();
        }
        if self.feedback_task.take().is_some() {
            info!("Controller disposed with feedback in flight; its result will be discarded");
        }
        self.orchestrator.finish();
        debug!("Session controller disposed");
    }

    fn script(&self) -> (ScriptConfig, VariableBindings) {
        match &self.config.mode {
            SessionMode::Interview { questions, .. } => interview_script(questions),
            SessionMode::Generate => onboarding_script(
                &self.settings.workflow_id,
                &self.config.user_name,
                &self.config.user_id,
            ),
        }
    }

    fn apply(&mut self, trigger: CallTrigger) -> Option<CallStatus> {
        let next = self.status.next(trigger)?;
        info!("Call status {:?} -> {:?} ({trigger:?})", self.status, next);
        self.status = next;
        Some(next)
    }

    fn fail_start(&mut self, message: String) {
        warn!("Call failed to start: {message}");
        self.apply(CallTrigger::StartFailed);
        self.last_error = Some(SessionError::StartFailed(message));
    }

    fn on_finished(&mut self) {
        self.is_speaking = false;

        let SessionMode::Interview {
            interview_id,
            feedback_id,
            ..
        } = self.config.mode
        else {
            info!("Onboarding call finished, returning to dashboard");
            self.navigator.navigate(Route::Dashboard);
            return;
        };

        let request = CreateFeedbackRequest {
            interview_id,
            user_id: self.config.user_id.clone(),
            transcript: self.transcript.entries().to_vec(),
            feedback_id,
        };

        match self.orchestrator.begin(request) {
            Ok(Some(task)) => {
                self.feedback_error = None;
                self.feedback_task = Some(task);
            }
            Ok(None) => {}
            Err(e) => {
                warn!("Feedback not generated ({}): {e}", e.kind());
                self.feedback_error = Some(e);
                self.schedule_navigation();
            }
        }
    }

    fn apply_outcome(&mut self, outcome: FeedbackOutcome) {
        self.orchestrator.finish();
        match outcome {
            FeedbackOutcome::Saved { feedback_id, .. } => {
                self.feedback_error = None;
                self.feedback_id = Some(feedback_id);
            }
            FeedbackOutcome::SavedNotMarked {
                feedback_id, error, ..
            } => {
                self.feedback_id = Some(feedback_id);
                self.feedback_error = Some(error);
            }
            FeedbackOutcome::Failed(error) => {
                warn!("Feedback failed ({}): {error}", error.kind());
                self.feedback_error = Some(error);
            }
        }
        self.schedule_navigation();
    }

    fn schedule_navigation(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(previous) = self.pending_navigation.take() {
            previous.abort();
        }
        let navigator = Arc::clone(&self.navigator);
        self.pending_navigation = Some(tokio::spawn(async move {
            tokio::time::sleep(NAVIGATION_DELAY).await;
            navigator.navigate(Route::Dashboard);
        }));
    }
}

impl<V: VoiceClient> Drop for SessionController<V> {
    fn drop(&mut self) {
        if let Some(navigation) = self.pending_navigation.take() {
            navigation.abort();
        }
    }
}

fn script_label(script: &ScriptConfig) -> &'static str {
    match script {
        ScriptConfig::Assistant(_) => "interview",
        ScriptConfig::Workflow { .. } => "onboarding",
    }
}

async fn next_event(events: &mut Option<EventSubscription>) -> Option<VoiceEvent> {
    match events {
        Some(subscription) => subscription.recv().await,
        None => pending().await,
    }
}

async fn next_outcome(task: &mut Option<JoinHandle<FeedbackOutcome>>) -> FeedbackOutcome {
    let Some(handle) = task.as_mut() else {
        return pending().await;
    };
    let joined = handle.await;
    *task = None;
    joined.unwrap_or_else(|e| FeedbackOutcome::Failed(SessionError::TaskAborted(e.to_string())))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use mockall::predicate::eq;
    use serde_json::json;

    use super::*;
    use crate::models::user::Identity;
    use crate::session::collaborators::{FeedbackResult, MockInterviewStore};
    use crate::session::orchestrator::tests::FakeGenerator;
    use crate::session::transcript::{Role, TranscriptEntry};
    use crate::session::voice::{event_channel, ClientMessage, EventSink, VoiceError};

    #[derive(Default)]
    struct VoiceLog {
        sink: Option<EventSink>,
        starts: Vec<(ScriptConfig, VariableBindings)>,
        stops: usize,
    }

    /// Scriptable stand-in for the voice SDK.
    #[derive(Clone, Default)]
    struct FakeVoice {
        log: Arc<Mutex<VoiceLog>>,
        fail_start: Option<String>,
        on_start: Vec<VoiceEvent>,
        end_on_stop: bool,
    }

    impl FakeVoice {
        fn emit(&self, event: VoiceEvent) {
            let log = self.log.lock().unwrap();
            log.sink.as_ref().expect("subscribed").emit(event);
        }

        fn starts(&self) -> usize {
            self.log.lock().unwrap().starts.len()
        }

        fn stops(&self) -> usize {
            self.log.lock().unwrap().stops
        }

        fn released(&self) -> bool {
            self.log
                .lock()
                .unwrap()
                .sink
                .as_ref()
                .map(EventSink::is_released)
                .unwrap_or(true)
        }
    }

    #[async_trait]
    impl VoiceClient for FakeVoice {
        async fn start(
            &mut self,
            script: &ScriptConfig,
            variables: &VariableBindings,
        ) -> Result<(), VoiceError> {
            self.log
                .lock()
                .unwrap()
                .starts
                .push((script.clone(), variables.clone()));
            if let Some(message) = &self.fail_start {
                return Err(VoiceError(message.clone()));
            }
            for event in &self.on_start {
                self.emit(event.clone());
            }
            Ok(())
        }

        async fn stop(&mut self) -> Result<(), VoiceError> {
            self.log.lock().unwrap().stops += 1;
            if self.end_on_stop {
                self.emit(VoiceEvent::CallEnd);
            }
            Ok(())
        }

        fn subscribe(&mut self) -> EventSubscription {
            let (sink, subscription) = event_channel();
            self.log.lock().unwrap().sink = Some(sink);
            subscription
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl RecordingNavigator {
        fn routes(&self) -> Vec<Route> {
            self.routes.lock().unwrap().clone()
        }
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    struct Harness {
        controller: SessionController<FakeVoice>,
        voice: FakeVoice,
        generator: Arc<FakeGenerator>,
        navigator: Arc<RecordingNavigator>,
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            api_base_url: "http://localhost:8080".to_string(),
            workflow_id: "wf_onboarding".to_string(),
        }
    }

    fn interview_mode(interview_id: Uuid) -> SessionConfig {
        SessionConfig {
            user_name: "Ada".to_string(),
            user_id: "uid-1".to_string(),
            mode: SessionMode::Interview {
                interview_id,
                feedback_id: None,
                questions: vec!["Tell me about yourself.".to_string()],
            },
        }
    }

    fn generate_mode() -> SessionConfig {
        SessionConfig {
            user_name: "Ada".to_string(),
            user_id: "uid-1".to_string(),
            mode: SessionMode::Generate,
        }
    }

    fn harness(
        config: SessionConfig,
        voice: FakeVoice,
        generator: FakeGenerator,
        store: MockInterviewStore,
    ) -> Harness {
        let generator = Arc::new(generator);
        let navigator = Arc::new(RecordingNavigator::default());
        let controller = SessionController::new(
            config,
            Caller::SignedIn(Identity {
                display_name: Some("Ada".to_string()),
                uid: "uid-1".to_string(),
                photo_url: None,
            }),
            voice.clone(),
            SessionDeps {
                feedback: generator.clone(),
                interviews: Arc::new(store),
                navigator: navigator.clone(),
                settings: settings(),
            },
        );
        Harness {
            controller,
            voice,
            generator,
            navigator,
        }
    }

    fn unused_store() -> MockInterviewStore {
        let mut store = MockInterviewStore::new();
        store.expect_mark_taken().never();
        store
    }

    fn saved_f1() -> FakeGenerator {
        FakeGenerator::replying(Ok(FeedbackResult::saved("f1", json!({"totalScore": 82}))))
    }

    fn final_line(role: Role, text: &str) -> VoiceEvent {
        VoiceEvent::Message(ClientMessage::final_transcript(role, text))
    }

    async fn bring_up(h: &mut Harness) {
        h.controller.start_call().await;
        h.controller.handle_event(VoiceEvent::CallStart);
        assert_eq!(h.controller.status(), CallStatus::Active);
    }

    #[tokio::test]
    async fn test_only_final_transcripts_are_recorded() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        bring_up(&mut h).await;

        h.controller
            .handle_event(VoiceEvent::Message(ClientMessage::partial_transcript(Role::User, "h")));
        h.controller.handle_event(final_line(Role::User, "hi"));

        assert_eq!(
            h.controller.transcript().entries(),
            &[TranscriptEntry::new(Role::User, "hi")]
        );
        assert_eq!(h.controller.view().last_line.map(|e| e.content.as_str()), Some("hi"));
    }

    #[tokio::test]
    async fn test_messages_outside_active_call_are_ignored() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        h.controller.handle_event(final_line(Role::User, "too early"));
        h.controller.start_call().await;
        h.controller.handle_event(final_line(Role::User, "still connecting"));

        assert!(h.controller.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_start_uses_interviewer_script_with_questions() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        h.controller.start_call().await;

        assert_eq!(h.controller.status(), CallStatus::Connecting);
        let log = h.voice.log.lock().unwrap();
        let (script, vars) = &log.starts[0];
        assert!(matches!(script, ScriptConfig::Assistant(_)));
        assert_eq!(
            vars.get("questions").map(String::as_str),
            Some("- Tell me about yourself.")
        );
    }

    #[tokio::test]
    async fn test_start_failure_reverts_to_inactive() {
        let voice = FakeVoice {
            fail_start: Some("microphone denied".to_string()),
            ..FakeVoice::default()
        };
        let mut h = harness(interview_mode(Uuid::new_v4()), voice, saved_f1(), unused_store());

        h.controller.start_call().await;

        assert_eq!(h.controller.status(), CallStatus::Inactive);
        assert!(matches!(h.controller.last_error(), Some(SessionError::StartFailed(m)) if m == "microphone denied"));
        assert_eq!(
            h.controller.view().last_error.as_deref(),
            Some("Could not start the call: microphone denied")
        );
        assert_eq!(h.controller.view().button, CallButton::Start);
        assert!(h.navigator.routes().is_empty());

        // Manual retry is allowed.
        h.controller.start_call().await;
        assert_eq!(h.voice.starts(), 2);
    }

    #[tokio::test]
    async fn test_start_failed_event_reverts_to_inactive() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        h.controller.start_call().await;
        h.controller
            .handle_event(VoiceEvent::CallStartFailed("assistant not found".to_string()));

        assert_eq!(h.controller.status(), CallStatus::Inactive);
        assert!(h.controller.last_error().is_some());

        // A late call-start must not resurrect the failed attempt.
        h.controller.handle_event(VoiceEvent::CallStart);
        assert_eq!(h.controller.status(), CallStatus::Inactive);
    }

    #[tokio::test]
    async fn test_start_is_noop_while_connecting() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        h.controller.start_call().await;
        h.controller.start_call().await;

        assert_eq!(h.voice.starts(), 1);
        assert_eq!(h.controller.view().button, CallButton::Connecting);
    }

    #[tokio::test]
    async fn test_async_errors_do_not_change_status() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        bring_up(&mut h).await;

        h.controller.handle_event(VoiceEvent::Error("jitter".to_string()));

        assert_eq!(h.controller.status(), CallStatus::Active);
        assert!(matches!(h.controller.last_error(), Some(SessionError::Voice(m)) if m == "jitter"));
    }

    #[tokio::test]
    async fn test_speech_events_toggle_speaking_flag() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        bring_up(&mut h).await;

        h.controller.handle_event(VoiceEvent::SpeechStart);
        assert!(h.controller.is_speaking());
        assert_eq!(h.controller.status(), CallStatus::Active);
        h.controller.handle_event(VoiceEvent::SpeechEnd);
        assert!(!h.controller.is_speaking());
        assert!(h.controller.view().mic_granted);
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_interview_marks_taken_and_navigates() {
        let interview_id = Uuid::new_v4();
        let mut store = MockInterviewStore::new();
        store
            .expect_mark_taken()
            .with(eq(interview_id))
            .times(1)
            .returning(|_| Ok(()));
        let mut h = harness(interview_mode(interview_id), FakeVoice::default(), saved_f1(), store);

        bring_up(&mut h).await;
        h.controller.handle_event(final_line(Role::Assistant, "Tell me about yourself."));
        h.controller.handle_event(final_line(Role::User, "I build databases."));
        h.controller.handle_event(VoiceEvent::CallEnd);

        assert_eq!(h.controller.status(), CallStatus::Finished);
        assert!(h.controller.is_generating_feedback());

        h.controller.settle_feedback().await;

        assert!(!h.controller.is_generating_feedback());
        assert!(h.controller.feedback_error().is_none());
        assert!(h.controller.view().error_banner.is_none());
        assert_eq!(h.controller.feedback_id(), Some("f1"));

        let sent = h.generator.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].interview_id, interview_id);
        assert_eq!(sent[0].user_id, "uid-1");
        assert_eq!(sent[0].transcript.len(), 2);

        assert!(h.navigator.routes().is_empty(), "navigation waits for the delay");
        tokio::time::sleep(NAVIGATION_DELAY + Duration::from_millis(10)).await;
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generator_failure_is_displayed_and_interview_untouched() {
        let generator = FakeGenerator::replying(Ok(FeedbackResult::failed("boom")));
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), generator, unused_store());

        bring_up(&mut h).await;
        h.controller.handle_event(final_line(Role::User, "hello"));
        h.controller.handle_event(VoiceEvent::CallEnd);
        h.controller.settle_feedback().await;

        assert_eq!(
            h.controller.feedback_error().map(ToString::to_string),
            Some("boom".to_string())
        );
        assert_eq!(h.controller.view().error_banner.as_deref(), Some("boom"));
        assert!(h.controller.feedback_id().is_none());

        tokio::time::sleep(NAVIGATION_DELAY + Duration::from_millis(10)).await;
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_transcript_skips_generator() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());

        bring_up(&mut h).await;
        h.controller.handle_event(VoiceEvent::CallEnd);

        assert!(matches!(h.controller.feedback_error(), Some(SessionError::EmptyTranscript)));
        assert_eq!(h.controller.feedback_error().unwrap().kind(), "no_conversation_recorded");
        assert!(!h.controller.is_generating_feedback());
        assert_eq!(h.generator.calls(), 0);

        tokio::time::sleep(NAVIGATION_DELAY + Duration::from_millis(10)).await;
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
    }

    #[tokio::test]
    async fn test_generate_mode_navigates_immediately_without_feedback() {
        let mut h = harness(generate_mode(), FakeVoice::default(), saved_f1(), unused_store());

        h.controller.start_call().await;
        {
            let log = h.voice.log.lock().unwrap();
            let (script, vars) = &log.starts[0];
            assert_eq!(
                script,
                &ScriptConfig::Workflow {
                    workflow_id: "wf_onboarding".to_string()
                }
            );
            assert_eq!(vars.get("username").map(String::as_str), Some("Ada"));
        }
        h.controller.handle_event(VoiceEvent::CallStart);
        h.controller.handle_event(final_line(Role::User, "I want a backend role"));
        h.controller.handle_event(VoiceEvent::CallEnd);

        assert_eq!(h.controller.status(), CallStatus::Finished);
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
        assert!(!h.controller.is_generating_feedback());
        assert_eq!(h.generator.calls(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_finish_sends_one_request() {
        let generator = FakeGenerator::gated(Ok(FeedbackResult::saved("f1", json!({}))));
        let mut store = MockInterviewStore::new();
        store.expect_mark_taken().times(1).returning(|_| Ok(()));
        let voice = FakeVoice {
            end_on_stop: true,
            ..FakeVoice::default()
        };
        let mut h = harness(interview_mode(Uuid::new_v4()), voice, generator, store);

        bring_up(&mut h).await;
        h.controller.handle_event(final_line(Role::User, "hello"));
        h.controller.disconnect().await;
        assert_eq!(h.controller.status(), CallStatus::Finished);
        assert!(h.controller.is_generating_feedback());

        // The SDK reports call-end after our stop request.
        h.controller.handle_event(VoiceEvent::CallEnd);
        h.controller.handle_event(VoiceEvent::CallEnd);
        assert_eq!(h.controller.view().button, CallButton::Disabled);

        tokio::task::yield_now().await;
        h.generator.release();
        h.controller.settle_feedback().await;

        assert_eq!(h.generator.calls(), 1);
        assert_eq!(h.voice.stops(), 1);
        assert!(h.controller.feedback_error().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispose_discards_inflight_result_and_cancels_navigation() {
        let generator = FakeGenerator::gated(Ok(FeedbackResult::saved("f1", json!({}))));
        let mut store = MockInterviewStore::new();
        store.expect_mark_taken().returning(|_| Ok(()));
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), generator, store);

        bring_up(&mut h).await;
        h.controller.handle_event(final_line(Role::User, "hello"));
        h.controller.handle_event(VoiceEvent::CallEnd);
        assert!(h.controller.is_generating_feedback());

        h.controller.dispose().await;
        assert!(!h.controller.is_generating_feedback());
        assert!(!h.controller.view().generating_feedback);

        h.generator.release();
        h.controller.settle_feedback().await;

        assert!(h.voice.released());
        assert!(h.controller.feedback_id().is_none());
        tokio::time::sleep(NAVIGATION_DELAY * 2).await;
        assert!(h.navigator.routes().is_empty());

        // Events after dispose are ignored.
        h.controller.handle_event(VoiceEvent::Error("late".to_string()));
        assert!(h.controller.last_error().is_none());
    }

    #[tokio::test]
    async fn test_dispose_stops_live_call() {
        let mut h = harness(interview_mode(Uuid::new_v4()), FakeVoice::default(), saved_f1(), unused_store());
        bring_up(&mut h).await;

        h.controller.dispose().await;
        h.controller.dispose().await;

        assert_eq!(h.voice.stops(), 1);
        assert!(h.voice.released());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_loop_end_to_end() {
        let interview_id = Uuid::new_v4();
        let mut store = MockInterviewStore::new();
        store
            .expect_mark_taken()
            .with(eq(interview_id))
            .times(1)
            .returning(|_| Ok(()));
        let voice = FakeVoice {
            on_start: vec![
                VoiceEvent::CallStart,
                final_line(Role::Assistant, "Why Rust?"),
                VoiceEvent::Message(ClientMessage::partial_transcript(Role::User, "Be")),
                final_line(Role::User, "Because of ownership."),
            ],
            end_on_stop: true,
            ..FakeVoice::default()
        };
        let mut h = harness(interview_mode(interview_id), voice, saved_f1(), store);
        let (tx, rx) = mpsc::channel(4);

        let driver = async {
            tx.send(UserAction::StartCall).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            tx.send(UserAction::Disconnect).await.unwrap();
            tokio::time::sleep(NAVIGATION_DELAY + Duration::from_millis(100)).await;
            tx.send(UserAction::Dispose).await.unwrap();
        };
        tokio::join!(h.controller.run(rx), driver);

        assert_eq!(h.controller.status(), CallStatus::Finished);
        assert_eq!(h.controller.transcript().len(), 2);
        assert_eq!(h.generator.calls(), 1);
        assert_eq!(h.controller.feedback_id(), Some("f1"));
        assert_eq!(h.navigator.routes(), vec![Route::Dashboard]);
        assert!(h.voice.released());
    }
}
