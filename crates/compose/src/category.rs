//! Closed template classification categories.
//!
//! Every category is a plain enum whose built-in enhancement instruction is
//! produced by an exhaustive `match`: adding a variant without instruction
//! text does not compile. The string form of each variant is the label used
//! on the wire and in persisted templates (e.g. `"Creative Writing"`).

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

/// A closed set of values that contributes one instruction clause each.
pub trait Category: Copy + Eq + Ord + Hash + fmt::Debug + 'static {
    /// Category label used in error messages (e.g. `"domain"`)
    const NAME: &'static str;

    /// All variants, in declaration order
    const ALL: &'static [Self];

    /// Wire/display label of the variant
    fn as_str(self) -> &'static str;

    /// Position of the variant in [`Category::ALL`]
    fn index(self) -> usize;

    /// Default enhancement instruction for the variant
    fn builtin_instruction(self) -> &'static str;

    /// Parse a label, failing on anything that is not a variant.
    fn parse(value: &str) -> Result<Self, ComposeError> {
        Self::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == value)
            .ok_or_else(|| ComposeError::unknown_variant(Self::NAME, value))
    }
}

macro_rules! impl_label_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ComposeError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty as Category>::parse(s)
            }
        }
    };
}

/// Subject area of a template
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TemplateDomain {
    Code,
    #[default]
    General,
    Marketing,
    Education,
    #[serde(rename = "Creative Writing")]
    CreativeWriting,
    Meta,
}

impl Category for TemplateDomain {
    const NAME: &'static str = "domain";
    const ALL: &'static [Self] = &[
        Self::Code,
        Self::General,
        Self::Marketing,
        Self::Education,
        Self::CreativeWriting,
        Self::Meta,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Code => "Code",
            Self::General => "General",
            Self::Marketing => "Marketing",
            Self::Education => "Education",
            Self::CreativeWriting => "Creative Writing",
            Self::Meta => "Meta",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn builtin_instruction(self) -> &'static str {
        match self {
            Self::Code => "This prompt is related to code. Focus on improving the prompt's ability to elicit correct, efficient, and maintainable code from an AI. Consider aspects like code structure, best practices, and testability when refining the prompt.",
            Self::General => "This prompt is for a general-purpose task. Improve the prompt's clarity, conciseness, and relevance to its intended context. Ensure the prompt is well-structured and effectively guides the AI towards the desired outcome.",
            Self::Marketing => "This prompt is for marketing. Improve the prompt's ability to elicit persuasive, clear, and engaging marketing content from an AI. Tailor the prompt to the specific marketing channel and target audience.",
            Self::Education => "This prompt is for education. Improve the prompt's ability to elicit clear, accurate, and pedagogically effective educational content from an AI. Tailor the prompt to the specific age group and knowledge level of the learners.",
            Self::CreativeWriting => "This prompt is for creative writing. Improve the prompt's ability to elicit original, vivid, and engaging creative writing from an AI. Focus on aspects like narrative structure, character development, and style.",
            Self::Meta => "This prompt is a meta-prompt, designed to generate other prompts. Improve the clarity, structure, and effectiveness of this meta-prompt. Ensure it provides sufficient context and instructions to generate high-quality prompts for the intended purpose.",
        }
    }
}

impl_label_traits!(TemplateDomain);

/// Model vendor the template is written for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderType {
    OpenAI,
    #[default]
    Anthropic,
    Replit,
    Deepseek,
    Gemini,
}

impl Category for ProviderType {
    const NAME: &'static str = "provider";
    const ALL: &'static [Self] = &[
        Self::OpenAI,
        Self::Anthropic,
        Self::Replit,
        Self::Deepseek,
        Self::Gemini,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
            Self::Replit => "Replit",
            Self::Deepseek => "Deepseek",
            Self::Gemini => "Gemini",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn builtin_instruction(self) -> &'static str {
        match self {
            Self::OpenAI => "This prompt will be used with OpenAI models. Consider the model's capabilities when refining the prompt.",
            Self::Anthropic => "This prompt will be used with Anthropic Claude models. Consider the model's conversational abilities and focus on natural language.",
            Self::Replit => "This prompt is for Replit models. Consider the Replit environment and focus on code-related instructions.",
            Self::Deepseek => "This prompt is for Deepseek models. Focus on code-related instructions and leverage its ability to understand and generate code.",
            Self::Gemini => "This prompt will be used with Google Gemini models. Consider the model's strengths in reasoning and problem-solving.",
        }
    }
}

impl_label_traits!(ProviderType);

/// Specific target model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelType {
    #[default]
    #[serde(rename = "Claude-Sonnet-3.5")]
    ClaudeSonnet35,
    #[serde(rename = "GPT-3.5-Turbo")]
    Gpt35Turbo,
    #[serde(rename = "GPT-4")]
    Gpt4,
    #[serde(rename = "GPT-4-Turbo")]
    Gpt4Turbo,
    #[serde(rename = "Claude-Sonnet")]
    ClaudeSonnet,
    #[serde(rename = "Claude-Haiku")]
    ClaudeHaiku,
    #[serde(rename = "Claude-Opus")]
    ClaudeOpus,
    #[serde(rename = "Replit-Code")]
    ReplitCode,
    #[serde(rename = "Replit-Chat")]
    ReplitChat,
    #[serde(rename = "Deepseek-Coder")]
    DeepseekCoder,
    #[serde(rename = "Gemini-Pro")]
    GeminiPro,
}

impl Category for ModelType {
    const NAME: &'static str = "model";
    const ALL: &'static [Self] = &[
        Self::ClaudeSonnet35,
        Self::Gpt35Turbo,
        Self::Gpt4,
        Self::Gpt4Turbo,
        Self::ClaudeSonnet,
        Self::ClaudeHaiku,
        Self::ClaudeOpus,
        Self::ReplitCode,
        Self::ReplitChat,
        Self::DeepseekCoder,
        Self::GeminiPro,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::ClaudeSonnet35 => "Claude-Sonnet-3.5",
            Self::Gpt35Turbo => "GPT-3.5-Turbo",
            Self::Gpt4 => "GPT-4",
            Self::Gpt4Turbo => "GPT-4-Turbo",
            Self::ClaudeSonnet => "Claude-Sonnet",
            Self::ClaudeHaiku => "Claude-Haiku",
            Self::ClaudeOpus => "Claude-Opus",
            Self::ReplitCode => "Replit-Code",
            Self::ReplitChat => "Replit-Chat",
            Self::DeepseekCoder => "Deepseek-Coder",
            Self::GeminiPro => "Gemini-Pro",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn builtin_instruction(self) -> &'static str {
        match self {
            Self::ClaudeSonnet35 => "Leverage Claude Sonnet 3.5's advanced capabilities in contextual understanding, creative writing, and complex reasoning.",
            Self::Gpt35Turbo => "Optimize for GPT-3.5 Turbo's strengths in general-purpose tasks while being mindful of its limitations.",
            Self::Gpt4 => "Leverage GPT-4's advanced reasoning and deeper context understanding capabilities.",
            Self::Gpt4Turbo => "Utilize GPT-4-Turbo's enhanced speed and up-to-date knowledge while maintaining high accuracy.",
            Self::ClaudeSonnet => "Optimize for Claude Sonnet's nuanced understanding and creative capabilities.",
            Self::ClaudeHaiku => "Focus on concise, efficient responses suited for Claude Haiku's quick processing.",
            Self::ClaudeOpus => "Leverage Claude Opus's advanced reasoning and extended context capabilities.",
            Self::ReplitCode => "Optimize for Replit Code's specialized code generation and completion features.",
            Self::ReplitChat => "Utilize Replit Chat's conversational abilities within the development context.",
            Self::DeepseekCoder => "Leverage Deepseek Coder's specialized code understanding and generation capabilities.",
            Self::GeminiPro => "Optimize for Gemini Pro's strong reasoning and problem-solving capabilities.",
        }
    }
}

impl_label_traits!(ModelType);

/// Perspective the enhanced prompt should be written for.
///
/// A template without a role stores `None` (serialized as `"None"`, see
/// [`role_type`]) and contributes no role clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    Architect,
    Developer,
    Tester,
}

impl Category for Role {
    const NAME: &'static str = "role";
    const ALL: &'static [Self] = &[Self::Architect, Self::Developer, Self::Tester];

    fn as_str(self) -> &'static str {
        match self {
            Self::Architect => "Architect",
            Self::Developer => "Developer",
            Self::Tester => "Tester",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn builtin_instruction(self) -> &'static str {
        match self {
            Self::Architect => "Focus on improving the prompt's effectiveness for eliciting high-level design, architecture, and technical decision-making guidance.",
            Self::Developer => "Focus on improving the prompt's effectiveness for eliciting implementation details, code structure, algorithms, and data structures.",
            Self::Tester => "Focus on improving the prompt's effectiveness for eliciting information related to testing strategies and identifying potential issues.",
        }
    }
}

impl_label_traits!(Role);

/// Engineering methodology tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Methodology {
    #[serde(rename = "TDD")]
    Tdd,
    #[serde(rename = "BDD")]
    Bdd,
    Refactoring,
    #[serde(rename = "Code Review")]
    CodeReview,
    #[serde(rename = "Atomic Design")]
    AtomicDesign,
    #[serde(rename = "SOLID Principles")]
    SolidPrinciples,
    #[serde(rename = "DRY")]
    Dry,
}

impl Category for Methodology {
    const NAME: &'static str = "methodology";
    const ALL: &'static [Self] = &[
        Self::Tdd,
        Self::Bdd,
        Self::Refactoring,
        Self::CodeReview,
        Self::AtomicDesign,
        Self::SolidPrinciples,
        Self::Dry,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Tdd => "TDD",
            Self::Bdd => "BDD",
            Self::Refactoring => "Refactoring",
            Self::CodeReview => "Code Review",
            Self::AtomicDesign => "Atomic Design",
            Self::SolidPrinciples => "SOLID Principles",
            Self::Dry => "DRY",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn builtin_instruction(self) -> &'static str {
        match self {
            Self::Tdd => "Refine the prompt to elicit a focus on writing tests before implementing code.",
            Self::Bdd => "Refine the prompt to elicit a focus on defining behavior from the user's perspective.",
            Self::Refactoring => "Refine the prompt to elicit a focus on improving code structure and maintainability.",
            Self::CodeReview => "Refine the prompt to elicit constructive feedback on code quality.",
            Self::AtomicDesign => "Refine the prompt to elicit a focus on breaking down the UI into small, reusable components.",
            Self::SolidPrinciples => "Refine the prompt to elicit adherence to SOLID principles of object-oriented design.",
            Self::Dry => "Refine the prompt to elicit a focus on eliminating code duplication.",
        }
    }
}

impl_label_traits!(Methodology);

/// Label of the "no role" sentinel
pub const NO_ROLE: &str = "None";

/// Parse a role label where `"None"` means no role.
pub fn parse_role_type(value: &str) -> Result<Option<Role>, ComposeError> {
    if value == NO_ROLE {
        Ok(None)
    } else {
        Role::parse(value).map(Some)
    }
}

/// Serde adapter for `Option<Role>` fields stored as `"None"` / role label.
///
/// ```ignore
/// #[serde(with = "promptdeck_compose::role_type")]
/// pub role_type: Option<Role>,
/// ```
pub mod role_type {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_role_type, Category, Role, NO_ROLE};

    pub fn serialize<S: Serializer>(value: &Option<Role>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map(Role::as_str).unwrap_or(NO_ROLE))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Role>, D::Error> {
        let label = String::deserialize(deserializer)?;
        parse_role_type(&label).map_err(de::Error::custom)
    }
}
