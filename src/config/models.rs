//! Closed enumerations referenced by the configuration sections.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::Level;

/// Models served through the browser-session ChatGPT integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OpenaiWebChatModel {
    #[serde(rename = "gpt_3_5")]
    Gpt35,
    #[serde(rename = "gpt_4")]
    Gpt4,
    #[serde(rename = "gpt_4o")]
    Gpt4o,
    #[serde(rename = "o1")]
    O1,
    #[serde(rename = "o1_mini")]
    O1Mini,
}

impl OpenaiWebChatModel {
    pub const ALL: [Self; 5] = [Self::Gpt35, Self::Gpt4, Self::Gpt4o, Self::O1, Self::O1Mini];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt35 => "gpt_3_5",
            Self::Gpt4 => "gpt_4",
            Self::Gpt4o => "gpt_4o",
            Self::O1 => "o1",
            Self::O1Mini => "o1_mini",
        }
    }

    /// Upstream model code used when the configured mapping has no entry.
    pub fn default_code(self) -> &'static str {
        match self {
            Self::Gpt35 => "gpt-4o-mini",
            Self::Gpt4 => "gpt-4",
            Self::Gpt4o => "gpt-4o",
            Self::O1 => "o1",
            Self::O1Mini => "o1-mini",
        }
    }
}

impl fmt::Display for OpenaiWebChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Models served through the token-based OpenAI API integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OpenaiApiChatModel {
    #[serde(rename = "gpt_3_5")]
    Gpt35,
    #[serde(rename = "gpt_4")]
    Gpt4,
    #[serde(rename = "gpt_4o")]
    Gpt4o,
    #[serde(rename = "o1")]
    O1,
    #[serde(rename = "o1_mini")]
    O1Mini,
}

impl OpenaiApiChatModel {
    pub const ALL: [Self; 5] = [Self::Gpt35, Self::Gpt4, Self::Gpt4o, Self::O1, Self::O1Mini];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gpt35 => "gpt_3_5",
            Self::Gpt4 => "gpt_4",
            Self::Gpt4o => "gpt_4o",
            Self::O1 => "o1",
            Self::O1Mini => "o1_mini",
        }
    }

    pub fn default_code(self) -> &'static str {
        match self {
            Self::Gpt35 => "gpt-4o-mini",
            Self::Gpt4 => "gpt-4",
            Self::Gpt4o => "gpt-4o",
            Self::O1 => "o1",
            Self::O1Mini => "o1-mini",
        }
    }
}

impl fmt::Display for OpenaiApiChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Built-in model code mapping for the web integration. Total over
/// [`OpenaiWebChatModel::ALL`].
pub fn default_web_model_code_mapping() -> BTreeMap<OpenaiWebChatModel, String> {
    OpenaiWebChatModel::ALL
        .iter()
        .map(|model| (*model, model.default_code().to_string()))
        .collect()
}

pub fn default_api_model_code_mapping() -> BTreeMap<OpenaiApiChatModel, String> {
    OpenaiApiChatModel::ALL
        .iter()
        .map(|model| (*model, model.default_code().to_string()))
        .collect()
}

/// How attachments reach the ChatGPT web backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpenaiWebFileUploadStrategy {
    /// The server relays every upload.
    ServerUploadOnly,
    /// The browser uploads directly.
    #[default]
    BrowserUploadOnly,
    /// The server relays small files and the browser uploads anything larger
    /// than `data.max_file_upload_size`.
    BrowserUploadWhenFileSizeExceed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsoleLogLevel {
    #[default]
    Info,
    Debug,
    Warning,
}

impl ConsoleLogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
            Self::Warning => "WARNING",
        }
    }

    pub fn as_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Debug => Level::DEBUG,
            Self::Warning => Level::WARN,
        }
    }
}
