//! Gemini Live `BidiGenerateContent` message types.
//!
//! Only the subset the relay needs is modelled. Unknown server fields are
//! ignored so new protocol additions do not break the session.

use base64::prelude::*;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::core::live::base::{LiveConfig, LiveError, LiveResult, Modality, ResponseFrame};

// =============================================================================
// Client Messages
// =============================================================================

/// Messages sent from the gateway to the Live API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    /// First message on every session
    Setup(Setup),
    /// Streaming audio input
    RealtimeInput(RealtimeInput),
}

impl ClientMessage {
    /// Build the setup message for a session.
    pub fn setup(model_resource: String, config: &LiveConfig) -> Self {
        Self::Setup(Setup {
            model: model_resource,
            generation_config: GenerationConfig {
                response_modalities: config.response_modalities.clone(),
                speech_config: SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: config.voice.clone(),
                        },
                    },
                },
                enable_affective_dialog: config.affective_dialog,
            },
            input_audio_transcription: config
                .input_transcription
                .then_some(AudioTranscriptionConfig {}),
            output_audio_transcription: config
                .output_transcription
                .then_some(AudioTranscriptionConfig {}),
        })
    }

    /// Wrap one chunk of client audio as realtime input.
    pub fn audio(mime_type: &str, chunk: &[u8]) -> Self {
        Self::RealtimeInput(RealtimeInput {
            audio: Blob {
                mime_type: mime_type.to_string(),
                data: BASE64_STANDARD.encode(chunk),
            },
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Setup {
    pub model: String,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_audio_transcription: Option<AudioTranscriptionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_audio_transcription: Option<AudioTranscriptionConfig>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_modalities: Vec<Modality>,
    pub speech_config: SpeechConfig,
    pub enable_affective_dialog: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechConfig {
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrebuiltVoiceConfig {
    pub voice_name: String,
}

/// Empty marker object enabling a transcription direction.
#[derive(Debug, Clone, Serialize)]
pub struct AudioTranscriptionConfig {}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RealtimeInput {
    pub audio: Blob,
}

/// Inline binary payload, base64 encoded on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    #[serde(default)]
    pub mime_type: String,
    pub data: String,
}

// =============================================================================
// Server Messages
// =============================================================================

/// Messages received from the Live API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerMessage {
    pub setup_complete: Option<serde_json::Value>,
    pub server_content: Option<ServerContent>,
    pub go_away: Option<serde_json::Value>,
}

impl ServerMessage {
    pub fn from_slice(data: &[u8]) -> LiveResult<Self> {
        serde_json::from_slice(data).map_err(|e| {
            LiveError::ProtocolError(format!("Malformed server message: {e}"))
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerContent {
    pub model_turn: Option<Content>,
    pub input_transcription: Option<Transcription>,
    pub output_transcription: Option<Transcription>,
    pub turn_complete: Option<bool>,
    pub interrupted: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Part {
    pub text: Option<String>,
    pub inline_data: Option<Blob>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Transcription {
    pub text: Option<String>,
}

impl ServerContent {
    /// Collapse one content message into a response frame.
    ///
    /// Audio is the concatenation of every inline data part. Text is the
    /// concatenation of text parts, falling back to the output transcription.
    pub fn into_frame(self) -> LiveResult<ResponseFrame> {
        let mut audio: Vec<u8> = Vec::new();
        let mut text = String::new();

        if let Some(turn) = self.model_turn {
            for part in turn.parts {
                if let Some(blob) = part.inline_data {
                    let decoded = BASE64_STANDARD.decode(blob.data.as_bytes()).map_err(|e| {
                        LiveError::ProtocolError(format!("Invalid inline audio payload: {e}"))
                    })?;
                    audio.extend_from_slice(&decoded);
                }
                if let Some(part_text) = part.text {
                    text.push_str(&part_text);
                }
            }
        }

        if text.is_empty()
            && let Some(transcript) = self.output_transcription.and_then(|t| t.text)
        {
            text = transcript;
        }

        Ok(ResponseFrame {
            audio: (!audio.is_empty()).then(|| Bytes::from(audio)),
            text: (!text.is_empty()).then_some(text),
        })
    }
}
