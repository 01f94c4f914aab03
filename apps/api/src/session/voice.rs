//! Capability interface for the real-time voice SDK.
//!
//! The SDK is an external collaborator. The controller only needs to start and
//! stop a call and to consume its lifecycle events, which arrive through an
//! [`EventSubscription`] released when dropped.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc;

use crate::session::script::AssistantConfig;
use crate::session::transcript::{Role, TranscriptEntry};

#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct VoiceError(pub String);

/// What the remote agent should run for this call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptConfig {
    /// A fixed assistant definition (interview mode).
    Assistant(AssistantConfig),
    /// A hosted workflow referenced by id (generate mode).
    Workflow { workflow_id: String },
}

/// Template variables substituted into the script by the SDK.
pub type VariableBindings = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageKind {
    Transcript,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptType {
    Partial,
    Final,
    #[serde(other)]
    Unknown,
}

/// Payload of a `message` event, in the SDK's wire shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientMessage {
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub transcript_type: Option<TranscriptType>,
    pub role: Option<Role>,
    pub transcript: Option<String>,
}

impl ClientMessage {
    pub fn final_transcript(role: Role, text: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Transcript,
            transcript_type: Some(TranscriptType::Final),
            role: Some(role),
            transcript: Some(text.into()),
        }
    }

    pub fn partial_transcript(role: Role, text: impl Into<String>) -> Self {
        Self {
            transcript_type: Some(TranscriptType::Partial),
            ..Self::final_transcript(role, text)
        }
    }

    /// The finalized utterance carried by this message, if it is one.
    /// Interim transcripts and every other message type yield `None`.
    pub fn as_final_entry(&self) -> Option<TranscriptEntry> {
        if self.kind != MessageKind::Transcript
            || self.transcript_type != Some(TranscriptType::Final)
        {
            return None;
        }
        let role = self.role?;
        let content = self.transcript.as_ref()?;
        Some(TranscriptEntry::new(role, content.clone()))
    }
}

/// Lifecycle events emitted by the SDK.
#[derive(Debug, Clone)]
pub enum VoiceEvent {
    CallStart,
    CallEnd,
    SpeechStart,
    SpeechEnd,
    Message(ClientMessage),
    Error(String),
    CallStartFailed(String),
}

#[async_trait]
pub trait VoiceClient: Send {
    /// Requests a call. Success means the request was accepted; the call is
    /// live only once `CallStart` arrives.
    async fn start(
        &mut self,
        script: &ScriptConfig,
        variables: &VariableBindings,
    ) -> Result<(), VoiceError>;

    async fn stop(&mut self) -> Result<(), VoiceError>;

    /// Registers a listener for lifecycle events.
    fn subscribe(&mut self) -> EventSubscription;
}

/// Sending half held by a [`VoiceClient`] implementation.
#[derive(Debug, Clone)]
pub struct EventSink {
    tx: mpsc::UnboundedSender<VoiceEvent>,
}

impl EventSink {
    /// Delivers an event. Returns `false` once the subscriber is gone.
    pub fn emit(&self, event: VoiceEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn is_released(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Receiving half owned by the controller. Dropping it unsubscribes.
#[derive(Debug)]
pub struct EventSubscription {
    rx: mpsc::UnboundedReceiver<VoiceEvent>,
}

impl EventSubscription {
    pub async fn recv(&mut self) -> Option<VoiceEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<VoiceEvent> {
        self.rx.try_recv().ok()
    }
}

/// Creates a connected sink/subscription pair.
pub fn event_channel() -> (EventSink, EventSubscription) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EventSink { tx }, EventSubscription { rx })
}
