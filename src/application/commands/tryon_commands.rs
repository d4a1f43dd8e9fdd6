//! Try-On Commands

use crate::domain::tryon::TryOnSettings;

/// 批量虚拟试穿命令
///
/// clothing_image_urls 与 generated_image_ids 一一对应
#[derive(Debug, Clone)]
pub struct BatchTryOn {
    pub user_id: String,
    pub body_image_url: String,
    pub clothing_image_urls: Vec<String>,
    pub generated_image_ids: Vec<String>,
    pub settings: TryOnSettings,
}
