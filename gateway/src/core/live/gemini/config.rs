//! Gemini Live (Vertex AI) endpoint configuration.

use std::fmt;
use std::time::Duration;
use zeroize::Zeroizing;

/// Default Vertex AI region.
pub const DEFAULT_GEMINI_REGION: &str = "us-central1";

/// Default native-audio model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-live-2.5-flash-preview-native-audio";

/// Default prebuilt voice.
pub const DEFAULT_GEMINI_VOICE: &str = "Puck";

/// MIME type of the client audio forwarded as realtime input.
pub const GEMINI_INPUT_AUDIO_MIME: &str = "audio/pcm;rate=16000";

/// How long to wait for `setupComplete` after the setup message.
pub const GEMINI_SETUP_TIMEOUT: Duration = Duration::from_secs(10);

/// Bidirectional streaming service path on the regional Vertex host.
const BIDI_SERVICE_PATH: &str =
    "ws/google.cloud.aiplatform.v1beta1.LlmBidiService/BidiGenerateContent";

/// Connection settings for the Gemini Live connector.
#[derive(Clone, Default)]
pub struct GeminiSettings {
    /// Google Cloud project; `None` means the gate is not ready
    pub project: Option<String>,
    /// Vertex AI region
    pub region: String,
    /// OAuth bearer token for the Vertex endpoint, wiped on drop
    pub access_token: Option<Zeroizing<String>>,
    /// Replaces the regional endpoint (used against local fakes)
    pub endpoint_override: Option<String>,
}

impl fmt::Debug for GeminiSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiSettings")
            .field("project", &self.project)
            .field("region", &self.region)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("endpoint_override", &self.endpoint_override)
            .finish()
    }
}

impl GeminiSettings {
    /// WebSocket URL of the regional `BidiGenerateContent` endpoint.
    pub fn endpoint(&self) -> String {
        if let Some(endpoint) = &self.endpoint_override {
            return endpoint.clone();
        }
        format!(
            "wss://{region}-aiplatform.googleapis.com/{BIDI_SERVICE_PATH}",
            region = self.region
        )
    }

    /// Fully qualified model resource name for the setup message.
    pub fn model_resource(&self, project: &str, model: &str) -> String {
        format!(
            "projects/{project}/locations/{region}/publishers/google/models/{model}",
            region = self.region
        )
    }
}
