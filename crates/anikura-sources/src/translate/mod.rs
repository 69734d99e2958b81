mod google;
mod mymemory;

pub use google::GoogleWeb;
pub use mymemory::MyMemory;

use anikura_models::script;
use async_trait::async_trait;

/// Best-effort text translation into Chinese. Providers swallow their
/// own failures and answer None; nothing here ever errors out to the
/// caller.
#[async_trait]
pub trait TranslationBackend: Send + Sync {
    async fn resolve(&self, text: &str) -> Option<String>;
}

/// Ordered provider chain.
///
/// Providers are consulted in fixed order; the first answer passing the
/// Chinese-script acceptance check wins. When no answer passes, the
/// first non-empty answer is returned as-is and the coordinator decides
/// whether to keep it.
pub struct ProviderChain {
    providers: Vec<Box<dyn TranslationBackend>>,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn TranslationBackend>>) -> Self {
        Self { providers }
    }

    /// The production chain: MyMemory first, the unofficial Google web
    /// endpoint second.
    pub fn standard() -> Self {
        Self::new(vec![Box::new(MyMemory::new()), Box::new(GoogleWeb::new())])
    }
}

#[async_trait]
impl TranslationBackend for ProviderChain {
    async fn resolve(&self, text: &str) -> Option<String> {
        let mut fallback = None;
        for provider in &self.providers {
            if let Some(candidate) = provider.resolve(text).await {
                if script::is_chinese(&candidate) {
                    return Some(candidate);
                }
                fallback.get_or_insert(candidate);
            }
        }
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixed {
        reply: Option<&'static str>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl TranslationBackend for Fixed {
        async fn resolve(&self, _text: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.map(str::to_string)
        }
    }

    fn fixed(reply: Option<&'static str>) -> (Box<dyn TranslationBackend>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (Box::new(Fixed { reply, calls: calls.clone() }), calls)
    }

    #[tokio::test]
    async fn accepted_primary_answer_short_circuits_the_chain() {
        let (primary, _) = fixed(Some("进击的巨人"));
        let (secondary, secondary_calls) = fixed(Some("unused"));
        let chain = ProviderChain::new(vec![primary, secondary]);

        assert_eq!(chain.resolve("Attack on Titan").await.as_deref(), Some("进击的巨人"));
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn secondary_is_consulted_when_primary_fails_the_check() {
        let (primary, _) = fixed(None);
        let (secondary, _) = fixed(Some("刀剑神域"));
        let chain = ProviderChain::new(vec![primary, secondary]);

        assert_eq!(chain.resolve("Sword Art Online").await.as_deref(), Some("刀剑神域"));
    }

    #[tokio::test]
    async fn unaccepted_answers_fall_back_to_the_first_non_empty_one() {
        let (primary, _) = fixed(Some("still english"));
        let (secondary, _) = fixed(Some("also english"));
        let chain = ProviderChain::new(vec![primary, secondary]);

        assert_eq!(chain.resolve("Some Title").await.as_deref(), Some("still english"));
    }

    #[tokio::test]
    async fn empty_chain_resolves_nothing() {
        let chain = ProviderChain::new(Vec::new());
        assert_eq!(chain.resolve("anything").await, None);
    }
}
