use tracing::{info, warn};

use crate::error::Result;
use crate::llm::{compose, ComposerConfig, TextGenerator};
use crate::models::{NormalizedCase, SectionPlan};

/// Execute Stage 2: compose the prompt and hand it to the provider
///
/// One provider call per invocation. Failures are returned untouched so the
/// response stage can classify them.
pub async fn execute_stage2(
    generator: &dyn TextGenerator,
    case: &NormalizedCase,
    plan: &SectionPlan,
    config: &ComposerConfig,
) -> Result<String> {
    let prompt = compose(case, plan, config);

    info!(
        "Stage 2: requesting petition from {} ({} prompt bytes, urgent={}, nullity={})",
        generator.model(),
        prompt.as_str().len(),
        plan.include_urgent_relief,
        plan.include_debt_nullity
    );

    match generator.generate(&prompt).await {
        Ok(text) => {
            info!("Stage 2: received {} bytes of petition text", text.len());
            Ok(text)
        }
        Err(e) => {
            warn!("Stage 2: generation failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::PetitionError;
    use crate::llm::ComposedPrompt;
    use crate::models::IntakeForm;
    use crate::stages::{normalize_form, plan};

    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &ComposedPrompt) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.as_str().to_string());
            Ok("PETIÇÃO".to_string())
        }

        fn model(&self) -> &str {
            "recording"
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl TextGenerator for FailingGenerator {
        async fn generate(&self, _prompt: &ComposedPrompt) -> Result<String> {
            Err(PetitionError::provider("429 Too Many Requests - quota exhausted"))
        }

        fn model(&self) -> &str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_stage2_sends_composed_prompt_once() {
        let generator = RecordingGenerator {
            prompts: Mutex::new(Vec::new()),
        };
        let case = normalize_form(&IntakeForm {
            author_name: Some("João Pereira".to_string()),
            ..Default::default()
        });
        let plan = plan(&case);

        let text = execute_stage2(&generator, &case, &plan, &ComposerConfig::default())
            .await
            .unwrap();

        assert_eq!(text, "PETIÇÃO");
        let prompts = generator.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("João Pereira"));
    }

    #[tokio::test]
    async fn test_stage2_passes_provider_error_through() {
        let case = normalize_form(&IntakeForm::default());
        let err = execute_stage2(&FailingGenerator, &case, &plan(&case), &ComposerConfig::default())
            .await
            .unwrap_err();

        match err {
            PetitionError::Provider { cause } => {
                assert_eq!(cause, "429 Too Many Requests - quota exhausted")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
