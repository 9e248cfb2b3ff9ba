//! AI mode registry and provider routing.
//!
//! Each mode carries its display metadata and system prompt; a separate
//! routing table maps the mode to the completion backend best suited for
//! the task. Mode restriction is derived solely from
//! [`restricted_modes`](crate::policy::restricted_modes) — call sites must
//! not re-derive it from trial state.

use serde::{Deserialize, Serialize};

use legate_core::Tier;

use crate::policy;

/// Assistant operating mode, selecting a system prompt and backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    Assistance,
    Education,
    Coding,
    Reflection,
    Planning,
    Image,
    Video,
}

impl AiMode {
    /// All modes, in display order.
    pub fn all() -> &'static [AiMode] {
        &[
            AiMode::Assistance,
            AiMode::Education,
            AiMode::Coding,
            AiMode::Reflection,
            AiMode::Planning,
            AiMode::Image,
            AiMode::Video,
        ]
    }

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            AiMode::Assistance => "Assistance",
            AiMode::Education => "Education",
            AiMode::Coding => "Coding",
            AiMode::Reflection => "Reflection",
            AiMode::Planning => "Planning",
            AiMode::Image => "Image Generation",
            AiMode::Video => "Video Analysis",
        }
    }

    /// Short description for the mode picker.
    pub fn description(&self) -> &'static str {
        match self {
            AiMode::Assistance => "General help and everyday tasks",
            AiMode::Education => "Learning and teaching support",
            AiMode::Coding => "Programming and development help",
            AiMode::Reflection => "Thoughtful discussion and analysis",
            AiMode::Planning => "Organization and productivity",
            AiMode::Image => "Generate images from prompts",
            AiMode::Video => "Analyze and discuss videos",
        }
    }

    /// System prompt sent to the completion backend.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            AiMode::Assistance => {
                "You are Legacy, a helpful AI assistant. Provide clear, friendly, and \
                 practical assistance for everyday tasks and questions. Keep responses \
                 concise and solution-oriented."
            }
            AiMode::Education => {
                "You are Legacy in Education mode. Act as a patient, pedagogical teacher. \
                 Structure your responses clearly with: 1) Simple explanation, 2) Detailed \
                 explanation with examples, 3) Practice suggestions. Adapt to the user's \
                 level and encourage learning through questions."
            }
            AiMode::Coding => {
                "You are Legacy in Coding mode. You are an expert programmer. ONLY provide \
                 code, technical explanations, debugging help, and development assistance. \
                 Use markdown code blocks for all code. Include comments in code. Provide \
                 best practices and optimizations. Do not engage in non-technical \
                 conversations."
            }
            AiMode::Reflection => {
                "You are Legacy in Reflection mode. Provide LONG, DETAILED, and \
                 ARGUMENTATIVE responses. Explore topics deeply with multiple perspectives. \
                 Use structured paragraphs. Ask probing questions. Analyze implications and \
                 consequences. Be philosophical and thorough. Your responses should be \
                 comprehensive and thought-provoking, typically 3-5 paragraphs minimum."
            }
            AiMode::Planning => {
                "You are Legacy in Planning mode. Help users organize tasks, create \
                 schedules, set goals, and improve productivity. Be structured and \
                 actionable. Provide step-by-step plans, timelines, and prioritization \
                 strategies. Use bullet points and numbered lists."
            }
            AiMode::Image => {
                "You are Legacy in Image Generation mode. When users provide a prompt, \
                 acknowledge it and explain that you'll generate an image. Describe what \
                 the image will contain based on their prompt. Be creative and detailed in \
                 your descriptions."
            }
            AiMode::Video => {
                "You are Legacy in Video Analysis mode. Analyze video content, describe \
                 scenes, identify key moments, and provide insights about the visual and \
                 audio elements."
            }
        }
    }

    /// Whether this mode produces an image alongside the text response.
    pub fn generates_image(&self) -> bool {
        matches!(self, AiMode::Image)
    }

    /// Whether this mode is restricted for the given tier.
    pub fn is_restricted(&self, tier: Tier) -> bool {
        policy::restricted_modes(tier).contains(self)
    }

    /// Parse a mode from a string (case-insensitive); unknown strings fall
    /// back to the general assistant, matching the legacy client.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "assistance" => AiMode::Assistance,
            "education" => AiMode::Education,
            "coding" => AiMode::Coding,
            "reflection" => AiMode::Reflection,
            "planning" => AiMode::Planning,
            "image" => AiMode::Image,
            "video" => AiMode::Video,
            _ => AiMode::Assistance,
        }
    }
}

impl std::fmt::Display for AiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiMode::Assistance => write!(f, "assistance"),
            AiMode::Education => write!(f, "education"),
            AiMode::Coding => write!(f, "coding"),
            AiMode::Reflection => write!(f, "reflection"),
            AiMode::Planning => write!(f, "planning"),
            AiMode::Image => write!(f, "image"),
            AiMode::Video => write!(f, "video"),
        }
    }
}

/// Completion backend family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    Google,
    Anthropic,
}

impl std::fmt::Display for ModelProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelProvider::Google => write!(f, "google"),
            ModelProvider::Anthropic => write!(f, "anthropic"),
        }
    }
}

/// Backend routing for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeRoute {
    pub provider: ModelProvider,
    pub model: &'static str,
}

/// Map each mode to the backend best suited for that task.
///
/// Fast general-purpose modes route to Gemini Flash; the modes that benefit
/// from longer-form reasoning route to Claude.
pub fn route_for_mode(mode: AiMode) -> ModeRoute {
    match mode {
        AiMode::Assistance | AiMode::Coding | AiMode::Planning | AiMode::Image | AiMode::Video => {
            ModeRoute {
                provider: ModelProvider::Google,
                model: "gemini-2.0-flash",
            }
        }
        AiMode::Education | AiMode::Reflection => ModeRoute {
            provider: ModelProvider::Anthropic,
            model: "claude-3-5-sonnet-20241022",
        },
    }
}
