//! Edge Function Port - 远程服务网关抽象
//!
//! 按名称调用远端 edge function，具体实现在 infrastructure/adapters/edge

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::tryon::{FitAdjustment, TryOnSettings};

/// 网关错误
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// HTTP 2xx 但 body 中 success 不为 true
    #[error("Rejected by {function}: {message}")]
    Rejected { function: String, message: String },
}

/// 已知的 edge function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeFunction {
    GenerateImageOpenAi,
    GenerateImageGemini,
    GenerateImageHuggingFace,
    VirtualTryOn,
    AnalyzeReferenceImage,
    EnhancePromptAi,
    AnalyzeUserStyle,
    CreateQuotePayment,
    SendAchievementEmail,
}

impl EdgeFunction {
    pub const ALL: [EdgeFunction; 9] = [
        EdgeFunction::GenerateImageOpenAi,
        EdgeFunction::GenerateImageGemini,
        EdgeFunction::GenerateImageHuggingFace,
        EdgeFunction::VirtualTryOn,
        EdgeFunction::AnalyzeReferenceImage,
        EdgeFunction::EnhancePromptAi,
        EdgeFunction::AnalyzeUserStyle,
        EdgeFunction::CreateQuotePayment,
        EdgeFunction::SendAchievementEmail,
    ];

    /// URL 路径中的函数名
    pub fn name(&self) -> &'static str {
        match self {
            EdgeFunction::GenerateImageOpenAi => "generate-image-openai",
            EdgeFunction::GenerateImageGemini => "generate-image-gemini",
            EdgeFunction::GenerateImageHuggingFace => "generate-image-huggingface",
            EdgeFunction::VirtualTryOn => "virtual-tryon",
            EdgeFunction::AnalyzeReferenceImage => "analyze-reference-image",
            EdgeFunction::EnhancePromptAi => "enhance-prompt-ai",
            EdgeFunction::AnalyzeUserStyle => "analyze-user-style",
            EdgeFunction::CreateQuotePayment => "create-quote-payment",
            EdgeFunction::SendAchievementEmail => "send-achievement-email",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.name() == name)
    }
}

impl std::fmt::Display for EdgeFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Edge Function Port
///
/// invoke 只在 HTTP 2xx 且 body.success == true 时返回 Ok(body)
#[async_trait]
pub trait EdgeFunctionPort: Send + Sync {
    async fn invoke(&self, function: EdgeFunction, payload: Value) -> Result<Value, GatewayError>;

    /// 检查网关是否可用
    async fn health_check(&self) -> bool {
        true
    }
}

/// virtual-tryon 的请求体（camelCase 与远端约定一致）
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualTryOnRequest {
    pub session_id: Uuid,
    pub body_image_url: String,
    pub clothing_image_url: String,
    pub settings: TryOnSettingsPayload,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TryOnSettingsPayload {
    pub fit_adjustment: FitAdjustment,
    pub preserve_background: bool,
    pub enhance_quality: bool,
}

impl From<TryOnSettings> for TryOnSettingsPayload {
    fn from(s: TryOnSettings) -> Self {
        Self {
            fit_adjustment: s.fit_adjustment,
            preserve_background: s.preserve_background,
            enhance_quality: s.enhance_quality,
        }
    }
}

/// virtual-tryon 的成功响应
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualTryOnResponse {
    pub result_url: String,
    #[serde(default)]
    pub session_id: Option<String>,
}

/// 调用 virtual-tryon 并解析结果
pub async fn virtual_tryon(
    gateway: &dyn EdgeFunctionPort,
    request: &VirtualTryOnRequest,
) -> Result<VirtualTryOnResponse, GatewayError> {
    let payload =
        serde_json::to_value(request).map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
    let body = gateway.invoke(EdgeFunction::VirtualTryOn, payload).await?;
    serde_json::from_value(body).map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_names_round_trip() {
        for f in EdgeFunction::ALL {
            assert_eq!(EdgeFunction::from_name(f.name()), Some(f));
        }
        assert_eq!(EdgeFunction::from_name("generate-image-xai"), None);
    }

    #[test]
    fn test_tryon_request_is_camel_case() {
        let request = VirtualTryOnRequest {
            session_id: Uuid::nil(),
            body_image_url: "https://cdn/body.png".into(),
            clothing_image_url: "https://cdn/dress.png".into(),
            settings: TryOnSettings::default().into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["bodyImageUrl"], "https://cdn/body.png");
        assert_eq!(json["clothingImageUrl"], "https://cdn/dress.png");
        assert_eq!(json["settings"]["fitAdjustment"], "regular");
        assert_eq!(json["settings"]["preserveBackground"], true);
        assert!(json.get("sessionId").is_some());
    }
}
