//! Edge Function Command Handlers

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::application::commands::InvokeEdgeFunction;
use crate::application::error::ApplicationError;
use crate::application::ports::EdgeFunctionPort;

/// InvokeEdgeFunction Handler
///
/// 只做请求转发和 success 信封校验，返回远端的完整 body
pub struct InvokeEdgeFunctionHandler {
    gateway: Arc<dyn EdgeFunctionPort>,
}

impl InvokeEdgeFunctionHandler {
    pub fn new(gateway: Arc<dyn EdgeFunctionPort>) -> Self {
        Self { gateway }
    }

    pub async fn handle(&self, command: InvokeEdgeFunction) -> Result<Value, ApplicationError> {
        if !command.payload.is_object() {
            return Err(ApplicationError::validation("payload 必须是 JSON 对象"));
        }

        let started = Instant::now();
        let result = self.gateway.invoke(command.function, command.payload).await;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => tracing::info!(function = %command.function, elapsed_ms, "Edge function invoked"),
            Err(e) => tracing::warn!(
                function = %command.function,
                elapsed_ms,
                error = %e,
                "Edge function failed"
            ),
        }

        Ok(result?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::EdgeFunction;
    use crate::infrastructure::adapters::FakeEdgeClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_invoke_forwards_payload() {
        let fake = FakeEdgeClient::new().arc();
        let handler = InvokeEdgeFunctionHandler::new(fake.clone());

        let body = handler
            .handle(InvokeEdgeFunction {
                function: EdgeFunction::EnhancePromptAi,
                payload: json!({ "prompt": "linen summer dress" }),
            })
            .await
            .unwrap();
        assert_eq!(body["success"], true);

        let calls = fake.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, EdgeFunction::EnhancePromptAi);
        assert_eq!(calls[0].1["prompt"], "linen summer dress");
    }

    #[tokio::test]
    async fn test_gateway_failure_is_external_service_error() {
        let handler = InvokeEdgeFunctionHandler::new(FakeEdgeClient::new().failing_calls([0]).arc());

        let err = handler
            .handle(InvokeEdgeFunction {
                function: EdgeFunction::AnalyzeUserStyle,
                payload: json!({}),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ExternalServiceError(_)));
    }

    #[tokio::test]
    async fn test_non_object_payload_is_rejected() {
        let fake = FakeEdgeClient::new().arc();
        let handler = InvokeEdgeFunctionHandler::new(fake.clone());

        let err = handler
            .handle(InvokeEdgeFunction {
                function: EdgeFunction::GenerateImageGemini,
                payload: json!("prompt"),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(fake.invocation_count(), 0);
    }
}
