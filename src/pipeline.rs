use std::sync::Arc;

use serde_json::Value;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::error::Result;
use crate::llm::{compose, ComposedPrompt, ComposerConfig, TextGenerator};
use crate::stages::{
    execute_stage2, normalize, plan, to_result, NormalizeConfig, PetitionResult, ResponseConfig,
};

/// Settings shared by every petition request
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub normalize: NormalizeConfig,
    pub composer: ComposerConfig,
    pub response: ResponseConfig,
}

/// The "generate petition" operation, from raw payload to caller contract
///
/// Holds only read-only configuration and the provider handle, so one
/// instance serves concurrent requests.
#[derive(Clone)]
pub struct PetitionPipeline {
    generator: Arc<dyn TextGenerator>,
    config: PipelineConfig,
}

impl PetitionPipeline {
    pub fn new(generator: Arc<dyn TextGenerator>, config: PipelineConfig) -> Self {
        Self { generator, config }
    }

    /// Normalize, plan and compose without calling the provider
    pub fn compose(&self, raw: Option<&Value>) -> Result<ComposedPrompt> {
        let case = normalize(raw, &self.config.normalize)?;
        let plan = plan(&case);
        Ok(compose(&case, &plan, &self.config.composer))
    }

    /// Run stages 0-2 and return the petition text or the classified failure
    pub async fn generate(&self, raw: Option<&Value>) -> Result<String> {
        let case = normalize(raw, &self.config.normalize)?;
        let plan = plan(&case);
        info!(
            "Planned sections: urgent={}, material={}, moral={}, nullity={}",
            plan.include_urgent_relief,
            plan.include_material_damages,
            plan.include_moral_damages,
            plan.include_debt_nullity
        );
        execute_stage2(self.generator.as_ref(), &case, &plan, &self.config.composer).await
    }

    /// Full operation: every outcome ends up in a `PetitionResult`
    pub async fn handle(&self, raw: Option<&Value>) -> PetitionResult {
        let request_id = Uuid::new_v4();
        let span = info_span!("petition", %request_id);

        async {
            let outcome = self.generate(raw).await;
            let result = to_result(outcome, &self.config.response);
            info!("Petition request finished with status {}", result.status);
            result
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    use crate::error::PetitionError;
    use crate::llm::{GeminiClient, GeminiConfig};
    use crate::stages::{ErrorCode, ResponseBody, ValidationPolicy};

    struct EchoGenerator;

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, prompt: &ComposedPrompt) -> Result<String> {
            Ok(format!("ECHO {}", prompt.as_str().len()))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    struct UpstreamDown;

    #[async_trait]
    impl TextGenerator for UpstreamDown {
        async fn generate(&self, _prompt: &ComposedPrompt) -> Result<String> {
            Err(PetitionError::provider("error sending request: connection refused"))
        }

        fn model(&self) -> &str {
            "down"
        }
    }

    fn pipeline_with(generator: Arc<dyn TextGenerator>, policy: ValidationPolicy) -> PetitionPipeline {
        let config = PipelineConfig {
            normalize: NormalizeConfig { policy },
            ..Default::default()
        };
        PetitionPipeline::new(generator, config)
    }

    #[tokio::test]
    async fn test_empty_payload_rejected_under_default_policy() {
        let pipeline = pipeline_with(Arc::new(EchoGenerator), ValidationPolicy::NonEmpty);
        let result = pipeline.handle(Some(&json!({}))).await;

        assert_eq!(result.status, 400);
        assert!(matches!(
            result.body,
            ResponseBody::Failure { code: ErrorCode::InvalidInput, .. }
        ));
    }

    #[tokio::test]
    async fn test_empty_payload_defaulted_under_lenient_policy() {
        let pipeline = pipeline_with(Arc::new(EchoGenerator), ValidationPolicy::Lenient);

        let prompt = pipeline.compose(Some(&json!({}))).unwrap();
        assert!(prompt.as_str().contains("DOS PEDIDOS"));

        let result = pipeline.handle(Some(&json!({}))).await;
        assert_eq!(result.status, 200);
        assert_eq!(
            result.body,
            ResponseBody::Success {
                text: format!("ECHO {}", prompt.as_str().len())
            }
        );
    }

    #[tokio::test]
    async fn test_missing_credential_fails_first_attempt() {
        let client = GeminiClient::new(GeminiConfig::default()).unwrap();
        let pipeline = pipeline_with(Arc::new(client), ValidationPolicy::NonEmpty);

        let result = pipeline
            .handle(Some(&json!({"author-name": "Maria"})))
            .await;

        assert_eq!(result.status, 500);
        assert!(matches!(
            result.body,
            ResponseBody::Failure { code: ErrorCode::ConfigurationError, .. }
        ));
    }

    #[tokio::test]
    async fn test_provider_failure_detail_is_verbatim() {
        let pipeline = pipeline_with(Arc::new(UpstreamDown), ValidationPolicy::NonEmpty);
        let result = pipeline
            .handle(Some(&json!({"problem-type": "power-cutoff"})))
            .await;

        assert_eq!(result.status, 502);
        match result.body {
            ResponseBody::Failure { details, .. } => assert_eq!(
                details.as_deref(),
                Some("error sending request: connection refused")
            ),
            other => panic!("unexpected body: {other:?}"),
        }
    }
}
