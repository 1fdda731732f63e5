//! Streaming Session Configuration
//!
//! Assembles the configuration payload for a realtime streaming session
//! from the stored settings and the signed-in user. Pure functions: the
//! same inputs always produce the same payload.

use chrono::Utc;
use serde::Serialize;
use session::models::UserIdentity;

use crate::settings::Settings;

const STREAM_MODEL: &str = "models/gemini-2.0-flash-exp";
const BASE_INSTRUCTIONS: &str = "You are a helpful assistant named Theta. ";

/// Safety blocking threshold, keyed by the stored 0-3 level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SafetyThreshold {
    #[serde(rename = "BLOCK_NONE")]
    BlockNone,
    #[serde(rename = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh,
    #[serde(rename = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove,
    #[serde(rename = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove,
    #[serde(rename = "HARM_BLOCK_THRESHOLD_UNSPECIFIED")]
    Unspecified,
}

impl SafetyThreshold {
    /// Map a stored level to a threshold; anything out of range is
    /// explicit `Unspecified` rather than a guess.
    pub fn from_level(level: u8) -> Self {
        match level {
            0 => SafetyThreshold::BlockNone,
            1 => SafetyThreshold::BlockOnlyHigh,
            2 => SafetyThreshold::BlockMediumAndAbove,
            3 => SafetyThreshold::BlockLowAndAbove,
            _ => SafetyThreshold::Unspecified,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: SafetyThreshold,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrebuiltVoiceConfig {
    #[serde(rename = "voiceName")]
    pub voice_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoiceConfig {
    #[serde(rename = "prebuiltVoiceConfig")]
    pub prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpeechConfig {
    #[serde(rename = "voiceConfig")]
    pub voice_config: VoiceConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    #[serde(rename = "responseModalities")]
    pub response_modalities: &'static str,
    #[serde(rename = "speechConfig")]
    pub speech_config: SpeechConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstructionPart {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<InstructionPart>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolSet {
    #[serde(rename = "functionDeclarations")]
    pub function_declarations: Vec<serde_json::Value>,
}

/// Full streaming session configuration payload
#[derive(Debug, Clone, Serialize)]
pub struct StreamConfig {
    pub model: &'static str,
    #[serde(rename = "inputAudioTranscription")]
    pub input_audio_transcription: serde_json::Value,
    #[serde(rename = "outputAudioTranscription")]
    pub output_audio_transcription: serde_json::Value,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    #[serde(rename = "systemInstruction")]
    pub system_instruction: SystemInstruction,
    pub tools: ToolSet,
    #[serde(rename = "safetySettings")]
    pub safety_settings: Vec<SafetySetting>,
}

/// Assemble the streaming configuration for one session
pub fn stream_config(
    settings: &Settings,
    user: Option<&UserIdentity>,
    conversation_summary: Option<&str>,
    tool_declarations: Vec<serde_json::Value>,
) -> StreamConfig {
    let instructions = assemble_instructions(user, conversation_summary);

    StreamConfig {
        model: STREAM_MODEL,
        input_audio_transcription: serde_json::json!({}),
        output_audio_transcription: serde_json::json!({}),
        generation_config: GenerationConfig {
            temperature: settings.temperature,
            top_p: settings.top_p,
            top_k: settings.top_k,
            response_modalities: "audio",
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig {
                        voice_name: settings.voice_name.clone(),
                    },
                },
            },
        },
        system_instruction: SystemInstruction {
            parts: vec![InstructionPart { text: instructions }],
        },
        tools: ToolSet {
            function_declarations: tool_declarations,
        },
        safety_settings: vec![
            SafetySetting {
                category: "HARM_CATEGORY_HARASSMENT",
                threshold: SafetyThreshold::from_level(settings.harassment_threshold),
            },
            SafetySetting {
                category: "HARM_CATEGORY_DANGEROUS_CONTENT",
                threshold: SafetyThreshold::from_level(settings.dangerous_content_threshold),
            },
            SafetySetting {
                category: "HARM_CATEGORY_SEXUALLY_EXPLICIT",
                threshold: SafetyThreshold::from_level(settings.sexually_explicit_threshold),
            },
            // Hate speech intentionally shares the harassment level.
            SafetySetting {
                category: "HARM_CATEGORY_HATE_SPEECH",
                threshold: SafetyThreshold::from_level(settings.harassment_threshold),
            },
            SafetySetting {
                category: "HARM_CATEGORY_CIVIC_INTEGRITY",
                threshold: SafetyThreshold::from_level(settings.civic_integrity_threshold),
            },
        ],
    }
}

fn assemble_instructions(user: Option<&UserIdentity>, summary: Option<&str>) -> String {
    let context_prefix = match summary.filter(|s| !s.is_empty()) {
        Some(summary) => format!(
            "This is a continuing conversation. Here is the summary of the previous \
             messages:\n---\n{summary}\n---\n\nPlease consider this context in your \
             responses. The current date is {}.\n\n",
            Utc::now().format("%a %b %d %Y"),
        ),
        None => String::new(),
    };

    let user_prefix = match user.and_then(UserIdentity::label) {
        Some(name) => format!("The user you are speaking with is logged in as {name}. "),
        None => "The user is not logged in. ".to_string(),
    };

    format!("{context_prefix}{user_prefix}{BASE_INSTRUCTIONS}")
}

/// Streaming endpoint URL. A missing key is reported once and yields
/// `None`; the caller decides whether that is fatal.
pub fn websocket_url(api_key: Option<&str>) -> Option<String> {
    match api_key.filter(|key| !key.is_empty()) {
        Some(key) => Some(format!(
            "wss://generativelanguage.googleapis.com/ws/google.ai.generativelanguage.v1alpha.GenerativeService.BidiGenerateContent?key={key}"
        )),
        None => {
            tracing::warn!("Streaming API key is not configured, connection will fail");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(display_name: Option<&str>, email: Option<&str>) -> UserIdentity {
        UserIdentity {
            id: Default::default(),
            email: email.map(String::from),
            display_name: display_name.map(String::from),
        }
    }

    #[test]
    fn test_threshold_levels() {
        assert_eq!(SafetyThreshold::from_level(0), SafetyThreshold::BlockNone);
        assert_eq!(SafetyThreshold::from_level(1), SafetyThreshold::BlockOnlyHigh);
        assert_eq!(
            SafetyThreshold::from_level(2),
            SafetyThreshold::BlockMediumAndAbove
        );
        assert_eq!(
            SafetyThreshold::from_level(3),
            SafetyThreshold::BlockLowAndAbove
        );
        assert_eq!(SafetyThreshold::from_level(7), SafetyThreshold::Unspecified);
    }

    #[test]
    fn test_instructions_name_the_signed_in_user() {
        let text = assemble_instructions(Some(&user(Some("Ada"), None)), None);
        assert_eq!(
            text,
            "The user you are speaking with is logged in as Ada. \
             You are a helpful assistant named Theta. "
        );

        // Email is the fallback label.
        let text = assemble_instructions(Some(&user(None, Some("ada@example.com"))), None);
        assert!(text.contains("logged in as ada@example.com"));
    }

    #[test]
    fn test_instructions_anonymous_clause() {
        let text = assemble_instructions(None, None);
        assert!(text.starts_with("The user is not logged in. "));
    }

    #[test]
    fn test_summary_prefix_carries_context_and_date() {
        let text = assemble_instructions(None, Some("We discussed sourdough."));
        assert!(text.starts_with("This is a continuing conversation."));
        assert!(text.contains("---\nWe discussed sourdough.\n---"));
        assert!(text.contains("The current date is"));

        // An empty summary adds no prefix.
        let text = assemble_instructions(None, Some(""));
        assert!(text.starts_with("The user is not logged in. "));
    }

    #[test]
    fn test_hate_speech_reuses_harassment_level() {
        let settings = Settings {
            harassment_threshold: 1,
            ..Default::default()
        };

        let config = stream_config(&settings, None, None, Vec::new());
        let by_category = |category: &str| {
            config
                .safety_settings
                .iter()
                .find(|s| s.category == category)
                .unwrap()
                .threshold
        };

        assert_eq!(
            by_category("HARM_CATEGORY_HATE_SPEECH"),
            SafetyThreshold::BlockOnlyHigh
        );
        assert_eq!(
            by_category("HARM_CATEGORY_HARASSMENT"),
            SafetyThreshold::BlockOnlyHigh
        );
        assert_eq!(
            by_category("HARM_CATEGORY_DANGEROUS_CONTENT"),
            SafetyThreshold::BlockLowAndAbove
        );
    }

    #[test]
    fn test_payload_shape() {
        let config = stream_config(&Settings::default(), None, None, Vec::new());
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["model"], "models/gemini-2.0-flash-exp");
        assert_eq!(value["generationConfig"]["responseModalities"], "audio");
        assert_eq!(
            value["generationConfig"]["speechConfig"]["voiceConfig"]["prebuiltVoiceConfig"]
                ["voiceName"],
            "Aoede"
        );
        assert_eq!(
            value["safetySettings"][0]["threshold"],
            "BLOCK_LOW_AND_ABOVE"
        );
        assert!(value["inputAudioTranscription"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_websocket_url_requires_key() {
        assert!(websocket_url(None).is_none());
        assert!(websocket_url(Some("")).is_none());

        let url = websocket_url(Some("key123")).unwrap();
        assert!(url.starts_with("wss://"));
        assert!(url.ends_with("?key=key123"));
    }
}
