//! Runtime configuration read from the environment.

use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_DATA_DIR: &str = "budget-data";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiConfig {
    /// `None` disables every AI feature for the lifetime of the process.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }
}

impl AiConfig {
    /// `GEMINI_API_KEY` (or `API_KEY`), `GEMINI_MODEL`, `GEMINI_BASE_URL`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_key: non_blank("GEMINI_API_KEY").or_else(|| non_blank("API_KEY")),
            model: non_blank("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_blank("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl StoreConfig {
    /// `BUDGET_TRACKER_DATA_DIR`, defaulting to `./budget-data`.
    pub fn from_env() -> Self {
        std::env::var("BUDGET_TRACKER_DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|dir| Self {
                data_dir: PathBuf::from(dir),
            })
            .unwrap_or_default()
    }
}
