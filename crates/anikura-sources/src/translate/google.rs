use super::TranslationBackend;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// The unofficial `translate_a/single?client=gtx` web endpoint. No API
/// key; it may throttle under load, which simply resolves to None.
pub struct GoogleWeb {
    client: Client,
    base_url: String,
}

impl GoogleWeb {
    pub fn new() -> Self {
        Self::with_base_url("https://translate.googleapis.com")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for GoogleWeb {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationBackend for GoogleWeb {
    async fn resolve(&self, text: &str) -> Option<String> {
        let url = format!(
            "{}/translate_a/single?client=gtx&sl=auto&tl=zh-CN&dt=t&q={}",
            self.base_url,
            urlencoding::encode(text)
        );
        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Google translate request failed: {}", e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("Google translate returned HTTP {}", response.status());
            return None;
        }
        match response.json::<serde_json::Value>().await {
            Ok(value) => join_segments(&value),
            Err(e) => {
                debug!("Google translate response unreadable: {}", e);
                None
            }
        }
    }
}

/// The endpoint answers a bare nested array: `data[0]` holds the
/// translated segments and each segment's first element is its text.
fn join_segments(value: &serde_json::Value) -> Option<String> {
    let parts = value.get(0)?.as_array()?;
    let joined: String = parts
        .iter()
        .filter_map(|part| part.get(0)?.as_str())
        .collect();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_multi_segment_answers() {
        let value: serde_json::Value = serde_json::from_str(
            r#"[[["进击的","Attack on",null],["巨人","Titan",null]],null,"en"]"#,
        )
        .unwrap();
        assert_eq!(join_segments(&value).as_deref(), Some("进击的巨人"));
    }

    #[test]
    fn empty_or_malformed_payload_resolves_nothing() {
        assert_eq!(join_segments(&serde_json::json!([])), None);
        assert_eq!(join_segments(&serde_json::json!({"data": []})), None);
        assert_eq!(join_segments(&serde_json::json!([[]])), None);
    }
}
