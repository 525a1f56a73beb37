//! The simplification call itself.

use crate::error::ProviderCallFailed;
use crate::locale::Language;
use crate::prompt::build_prompt;
use crate::provider::Provider;
use anyhow::anyhow;
use std::sync::Arc;
use tracing::debug;

/// Sends paragraphs to the provider with the fixed instruction prompt.
#[derive(Clone)]
pub struct Simplifier {
    provider: Arc<dyn Provider>,
    language: Language,
}

impl Simplifier {
    pub fn new(provider: Arc<dyn Provider>, language: Language) -> Self {
        Self { provider, language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Ask the provider for a simplified version of `text`.
    ///
    /// Issues exactly one provider call and returns its answer with
    /// surrounding whitespace removed. No retries.
    pub async fn simplify(&self, text: &str) -> Result<String, ProviderCallFailed> {
        let prompt = build_prompt(self.language, text);
        debug!(
            provider = self.provider.name(),
            model = self.provider.model(),
            prompt_len = prompt.len(),
            "Sending simplification request"
        );

        let answer = self.provider.generate(&prompt).await?;
        let simplified = answer.trim();
        if simplified.is_empty() {
            return Err(anyhow!("Provider returned an empty simplification").into());
        }
        Ok(simplified.to_string())
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeProvider;
    use super::*;
    use crate::prompt::DELIMITER;

    #[tokio::test]
    async fn test_simplify_trims_answer() {
        let provider = Arc::new(FakeProvider::replying("  Hello world.  "));
        let simplifier = Simplifier::new(provider.clone(), Language::En);

        let text = simplifier.simplify("Salutations, planet.").await.unwrap();
        assert_eq!(text, "Hello world.");
    }

    #[tokio::test]
    async fn test_simplify_sends_one_prompt_with_text_after_instruction() {
        let provider = Arc::new(FakeProvider::replying("Mitochondria give cells energy."));
        let simplifier = Simplifier::new(provider.clone(), Language::En);
        let original = "The mitochondria is the powerhouse of the cell.";

        let text = simplifier.simplify(original).await.unwrap();
        assert_eq!(text, "Mitochondria give cells energy.");

        let prompts = provider.prompts();
        assert_eq!(prompts.len(), 1);
        let (instruction, tail) = prompts[0].split_once(DELIMITER).unwrap();
        assert_eq!(instruction, Language::En.strings().instruction);
        assert_eq!(tail, original);
    }

    #[tokio::test]
    async fn test_simplify_propagates_provider_failure() {
        let simplifier = Simplifier::new(Arc::new(FakeProvider::failing()), Language::Vi);
        let err = simplifier.simplify("văn bản").await.unwrap_err();
        assert!(err.to_string().contains("status 500"));
    }

    #[tokio::test]
    async fn test_simplify_rejects_blank_answer() {
        let simplifier = Simplifier::new(Arc::new(FakeProvider::replying(" \n\t ")), Language::Vi);
        let err = simplifier.simplify("văn bản").await.unwrap_err();
        assert!(err.to_string().contains("empty simplification"));
    }
}
