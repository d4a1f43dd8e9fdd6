//! Fake Edge Client - 不访问网络的 edge function 客户端
//!
//! 本地开发（gateway.fake = true）和编排测试使用

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::application::ports::{EdgeFunction, EdgeFunctionPort, GatewayError};

type InvokeHook = Box<dyn Fn(usize) + Send + Sync>;

/// Fake Edge Client
///
/// 按调用序号（从 0 开始）决定成功或失败，成功时返回带 success 的响应
pub struct FakeEdgeClient {
    failing_calls: HashSet<usize>,
    result_base_url: String,
    calls: AtomicUsize,
    invocations: Mutex<Vec<(EdgeFunction, Value)>>,
    hook: Option<InvokeHook>,
}

impl FakeEdgeClient {
    pub fn new() -> Self {
        Self {
            failing_calls: HashSet::new(),
            result_base_url: "https://fake.storage.local/tryon".to_string(),
            calls: AtomicUsize::new(0),
            invocations: Mutex::new(Vec::new()),
            hook: None,
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 指定哪些调用序号返回失败
    pub fn failing_calls(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls = calls.into_iter().collect();
        self
    }

    /// 每次调用时以调用序号执行回调
    pub fn with_hook(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.hook = Some(Box::new(hook));
        self
    }

    pub fn invocation_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn invocations(&self) -> Vec<(EdgeFunction, Value)> {
        self.invocations.lock().clone()
    }
}

impl Default for FakeEdgeClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EdgeFunctionPort for FakeEdgeClient {
    async fn invoke(&self, function: EdgeFunction, payload: Value) -> Result<Value, GatewayError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.invocations.lock().push((function, payload.clone()));
        if let Some(hook) = &self.hook {
            hook(call);
        }

        if self.failing_calls.contains(&call) {
            tracing::debug!(function = %function, call, "Fake edge function failing");
            return Err(GatewayError::ServiceError(format!(
                "simulated failure on call {}",
                call
            )));
        }

        let body = match function {
            EdgeFunction::VirtualTryOn => {
                let session_id = payload
                    .get("sessionId")
                    .and_then(Value::as_str)
                    .unwrap_or("unknown")
                    .to_string();
                json!({
                    "success": true,
                    "sessionId": session_id,
                    "resultUrl": format!("{}/{}.png", self.result_base_url, session_id),
                })
            }
            other => json!({ "success": true, "function": other.name() }),
        };
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{virtual_tryon, VirtualTryOnRequest};
    use crate::domain::tryon::TryOnSettings;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_fake_tryon_round_trip() {
        let fake = FakeEdgeClient::new();
        let session_id = Uuid::new_v4();
        let request = VirtualTryOnRequest {
            session_id,
            body_image_url: "body".into(),
            clothing_image_url: "cloth".into(),
            settings: TryOnSettings::default().into(),
        };

        let response = virtual_tryon(&fake, &request).await.unwrap();
        assert!(response.result_url.ends_with(&format!("{}.png", session_id)));
        assert_eq!(fake.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_fake_failing_calls() {
        let fake = FakeEdgeClient::new().failing_calls([0]);
        assert!(fake.invoke(EdgeFunction::AnalyzeUserStyle, json!({})).await.is_err());
        assert!(fake.invoke(EdgeFunction::AnalyzeUserStyle, json!({})).await.is_ok());
    }
}
