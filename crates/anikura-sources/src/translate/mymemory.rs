use super::TranslationBackend;
use anikura_models::script;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct MemoryEnvelope {
    #[serde(rename = "responseData")]
    response_data: Option<MemoryResponse>,
    #[serde(default)]
    matches: Vec<MemoryMatch>,
}

#[derive(Debug, Deserialize)]
struct MemoryResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MemoryMatch {
    translation: Option<String>,
}

/// MyMemory translation API. Source language is auto-detected, target
/// is Simplified Chinese.
pub struct MyMemory {
    client: Client,
    base_url: String,
}

impl MyMemory {
    pub fn new() -> Self {
        Self::with_base_url("https://api.mymemory.translated.net")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Prefer the main translation when it is already Chinese, then the
    /// first Chinese match, then whatever the main translation was.
    fn pick(envelope: MemoryEnvelope) -> Option<String> {
        let translated = envelope
            .response_data
            .and_then(|r| r.translated_text)
            .filter(|t| !t.is_empty());
        if let Some(text) = &translated {
            if script::is_chinese(text) {
                return translated;
            }
        }
        envelope
            .matches
            .into_iter()
            .filter_map(|m| m.translation)
            .find(|t| script::is_chinese(t))
            .or(translated)
    }
}

impl Default for MyMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationBackend for MyMemory {
    async fn resolve(&self, text: &str) -> Option<String> {
        let url = format!(
            "{}/get?q={}&langpair=auto|zh-CN",
            self.base_url,
            urlencoding::encode(text)
        );
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("MyMemory request failed: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("MyMemory returned HTTP {}", response.status());
            return None;
        }
        match response.json::<MemoryEnvelope>().await {
            Ok(envelope) => Self::pick(envelope),
            Err(e) => {
                debug!("MyMemory response unreadable: {}", e);
                None
            }
        }
    }
}
