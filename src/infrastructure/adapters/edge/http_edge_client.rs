//! HTTP Edge Client - 调用远端 edge function
//!
//! 实现 EdgeFunctionPort trait
//!
//! 远端 API:
//! POST {base_url}/functions/v1/{name}
//! Headers: Authorization: Bearer {anon_key}, apikey: {anon_key}
//! Response: {"success": true, ...} 或 {"error": "..."}

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{EdgeFunction, EdgeFunctionPort, GatewayError};

/// HTTP Edge 客户端配置
#[derive(Debug, Clone)]
pub struct HttpEdgeClientConfig {
    /// 项目基础 URL（不含 /functions/v1）
    pub base_url: String,
    /// 匿名 key，同时用于 Bearer 和 apikey 头
    pub anon_key: Option<String>,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
    /// 网络错误/超时的重试次数
    pub max_retries: u32,
}

impl Default for HttpEdgeClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:54321".to_string(),
            anon_key: None,
            timeout_secs: 120,
            max_retries: 0,
        }
    }
}

impl HttpEdgeClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_anon_key(mut self, key: impl Into<String>) -> Self {
        self.anon_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

/// HTTP Edge 客户端
pub struct HttpEdgeClient {
    client: Client,
    config: HttpEdgeClientConfig,
}

impl HttpEdgeClient {
    pub fn new(config: HttpEdgeClientConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn function_url(&self, function: EdgeFunction) -> String {
        format!(
            "{}/functions/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            function.name()
        )
    }

    async fn send_once(&self, function: EdgeFunction, payload: &Value) -> Result<Value, GatewayError> {
        let mut request = self.client.post(self.function_url(function)).json(payload);
        if let Some(key) = &self.config.anon_key {
            request = request.bearer_auth(key).header("apikey", key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Timeout
            } else if e.is_connect() {
                GatewayError::NetworkError(format!("Cannot connect to edge function: {}", e))
            } else {
                GatewayError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::InvalidResponse(format!("Failed to read body: {}", e)))?;
        let body: Option<Value> = serde_json::from_str(&text).ok();

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or(text);
            return Err(GatewayError::ServiceError(format!("HTTP {}: {}", status, message)));
        }

        let body = body.ok_or_else(|| {
            GatewayError::InvalidResponse(format!("{} returned a non-JSON body", function))
        })?;

        if body.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(GatewayError::Rejected {
                function: function.name().to_string(),
                message: error_message(&body).unwrap_or_else(|| "missing success flag".to_string()),
            });
        }

        Ok(body)
    }
}

fn error_message(body: &Value) -> Option<String> {
    body.get("error").and_then(Value::as_str).map(str::to_string)
}

/// 第一次重试的等待时间，之后每次翻倍
const RETRY_BASE_DELAY_MS: u64 = 200;
/// 单次重试等待上限
const RETRY_MAX_DELAY_MS: u64 = 10_000;

fn retry_delay(attempt: u32) -> Duration {
    let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
    Duration::from_millis(
        RETRY_BASE_DELAY_MS
            .saturating_mul(factor)
            .min(RETRY_MAX_DELAY_MS),
    )
}

#[async_trait]
impl EdgeFunctionPort for HttpEdgeClient {
    async fn invoke(&self, function: EdgeFunction, payload: Value) -> Result<Value, GatewayError> {
        let mut attempt = 0;
        loop {
            tracing::debug!(function = %function, attempt, "Invoking edge function");

            match self.send_once(function, &payload).await {
                Ok(body) => {
                    tracing::info!(function = %function, "Edge function succeeded");
                    return Ok(body);
                }
                Err(e @ (GatewayError::NetworkError(_) | GatewayError::Timeout))
                    if attempt < self.config.max_retries =>
                {
                    attempt += 1;
                    tracing::warn!(function = %function, attempt, error = %e, "Edge function call failed, retrying");
                    tokio::time::sleep(retry_delay(attempt)).await;
                }
                Err(e) => {
                    tracing::warn!(function = %function, error = %e, "Edge function failed");
                    return Err(e);
                }
            }
        }
    }

    async fn health_check(&self) -> bool {
        self.client
            .get(&self.config.base_url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok()
    }
}
