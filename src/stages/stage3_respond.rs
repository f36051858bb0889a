use serde::Serialize;

use crate::error::PetitionError;

pub const GENERATION_FAILED_MESSAGE: &str = "Falha ao gerar a petição no servidor.";
pub const MISCONFIGURED_MESSAGE: &str = "Servidor mal configurado.";

/// Configuration for the response stage
#[derive(Debug, Clone)]
pub struct ResponseConfig {
    /// Attach the upstream provider message to provider failures
    pub expose_provider_details: bool,
}

impl Default for ResponseConfig {
    fn default() -> Self {
        Self {
            expose_provider_details: true,
        }
    }
}

/// Machine-readable failure class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    InvalidInput,
    ConfigurationError,
    ProviderError,
}

impl ErrorCode {
    pub fn status(&self) -> u16 {
        match self {
            ErrorCode::InvalidInput => 400,
            ErrorCode::ConfigurationError => 500,
            ErrorCode::ProviderError => 502,
        }
    }
}

/// Body returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Success {
        text: String,
    },
    Failure {
        error: String,
        code: ErrorCode,
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

/// Outcome of one petition request, ready for the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionResult {
    pub status: u16,
    pub body: ResponseBody,
}

impl PetitionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.body, ResponseBody::Success { .. })
    }
}

/// Execute Stage 3: map the pipeline outcome into the caller contract
///
/// Provider text is passed through verbatim.
pub fn to_result(outcome: Result<String, PetitionError>, config: &ResponseConfig) -> PetitionResult {
    let (code, error, details) = match outcome {
        Ok(text) => {
            return PetitionResult {
                status: 200,
                body: ResponseBody::Success { text },
            };
        }
        Err(PetitionError::Input(message)) => (ErrorCode::InvalidInput, message, None),
        Err(PetitionError::Configuration(_)) => (
            ErrorCode::ConfigurationError,
            MISCONFIGURED_MESSAGE.to_string(),
            None,
        ),
        Err(PetitionError::Provider { cause }) => (
            ErrorCode::ProviderError,
            GENERATION_FAILED_MESSAGE.to_string(),
            config.expose_provider_details.then_some(cause),
        ),
    };

    PetitionResult {
        status: code.status(),
        body: ResponseBody::Failure {
            error,
            code,
            details,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_is_verbatim() {
        let text = "  EXCELENTÍSSIMO(A)...\n\n".to_string();
        let result = to_result(Ok(text.clone()), &ResponseConfig::default());

        assert_eq!(result.status, 200);
        assert!(result.is_success());
        assert_eq!(
            serde_json::to_value(&result.body).unwrap(),
            json!({ "text": text })
        );
    }

    #[test]
    fn test_input_error_is_client_error() {
        let result = to_result(
            Err(PetitionError::Input("Nenhum dado recebido do formulário.".to_string())),
            &ResponseConfig::default(),
        );

        assert_eq!(result.status, 400);
        assert_eq!(
            serde_json::to_value(&result.body).unwrap(),
            json!({ "error": "Nenhum dado recebido do formulário.", "code": "INVALID_INPUT" })
        );
    }

    #[test]
    fn test_configuration_error_hides_detail() {
        let result = to_result(
            Err(PetitionError::Configuration("API_KEY is not set".to_string())),
            &ResponseConfig::default(),
        );

        assert_eq!(result.status, 500);
        let body = serde_json::to_value(&result.body).unwrap();
        assert_eq!(body["code"], "CONFIGURATION_ERROR");
        assert_eq!(body["error"], MISCONFIGURED_MESSAGE);
        assert!(body.get("details").is_none());
    }

    #[test]
    fn test_provider_error_keeps_upstream_detail() {
        let cause = "403 Forbidden - {\"error\": {\"message\": \"API key not valid\"}}";
        let result = to_result(
            Err(PetitionError::provider(cause)),
            &ResponseConfig::default(),
        );

        assert_eq!(result.status, 502);
        assert_eq!(
            result.body,
            ResponseBody::Failure {
                error: GENERATION_FAILED_MESSAGE.to_string(),
                code: ErrorCode::ProviderError,
                details: Some(cause.to_string()),
            }
        );
    }

    #[test]
    fn test_provider_detail_can_be_withheld() {
        let config = ResponseConfig {
            expose_provider_details: false,
        };
        let result = to_result(Err(PetitionError::provider("quota exhausted")), &config);
        let body = serde_json::to_value(&result.body).unwrap();
        assert!(body.get("details").is_none());
        assert_eq!(body["error"], GENERATION_FAILED_MESSAGE);
    }
}
