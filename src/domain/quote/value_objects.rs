//! Quote Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::QuoteError;

/// 报价唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(Uuid);

impl QuoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for QuoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for QuoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 设计复杂度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// 价格系数
    pub fn multiplier(&self) -> f64 {
        match self {
            Complexity::Simple => 1.0,
            Complexity::Medium => 1.3,
            Complexity::Complex => 1.75,
        }
    }

    /// 标准工期（天）
    pub fn base_days(&self) -> u32 {
        match self {
            Complexity::Simple => 7,
            Complexity::Medium => 10,
            Complexity::Complex => 14,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Complexity::Simple => "simple",
            Complexity::Medium => "medium",
            Complexity::Complex => "complex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "simple" => Some(Complexity::Simple),
            "medium" => Some(Complexity::Medium),
            "complex" => Some(Complexity::Complex),
            _ => None,
        }
    }
}

/// 单件产品所需的一种材料
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    /// 每件产品的用量
    pub quantity_needed: f64,
    /// 材料单价
    pub unit_cost: f64,
}

impl Material {
    pub fn new(name: impl Into<String>, quantity_needed: f64, unit_cost: f64) -> Self {
        Self {
            name: name.into(),
            quantity_needed,
            unit_cost,
        }
    }

    /// 单件产品的材料成本
    pub fn cost_per_unit(&self) -> f64 {
        self.quantity_needed * self.unit_cost
    }

    fn validate(&self) -> Result<(), QuoteError> {
        if self.name.trim().is_empty() {
            return Err(QuoteError::InvalidMaterial("材料名称不能为空".to_string()));
        }
        if !self.quantity_needed.is_finite() || self.quantity_needed <= 0.0 {
            return Err(QuoteError::InvalidMaterial(format!(
                "{}: 用量必须大于 0",
                self.name
            )));
        }
        if !self.unit_cost.is_finite() || self.unit_cost < 0.0 {
            return Err(QuoteError::InvalidMaterial(format!(
                "{}: 单价不能为负数",
                self.name
            )));
        }
        Ok(())
    }
}

/// 报价请求
///
/// 不变量（validate 通过后）:
/// - materials 非空且每项合法
/// - quantity > 0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub materials: Vec<Material>,
    pub quantity: u32,
    pub complexity: Complexity,
    #[serde(default)]
    pub rush_order: bool,
}

impl QuoteRequest {
    pub fn validate(&self) -> Result<(), QuoteError> {
        if self.materials.is_empty() {
            return Err(QuoteError::EmptyMaterials);
        }
        if self.quantity == 0 {
            return Err(QuoteError::InvalidQuantity(self.quantity));
        }
        self.materials.iter().try_for_each(Material::validate)
    }
}

/// 价格明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownLine {
    pub label: String,
    pub amount: f64,
}

impl BreakdownLine {
    pub fn new(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            amount,
        }
    }
}

/// 替代方案（调整需求后的价格/工期变化）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteAlternative {
    pub title: String,
    pub description: String,
    pub price_change: f64,
    pub timeline_change: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(materials: Vec<Material>, quantity: u32) -> QuoteRequest {
        QuoteRequest {
            materials,
            quantity,
            complexity: Complexity::Simple,
            rush_order: false,
        }
    }

    #[test]
    fn test_validate_rejects_empty_materials() {
        let req = request(vec![], 10);
        assert_eq!(req.validate(), Err(QuoteError::EmptyMaterials));
    }

    #[test]
    fn test_validate_rejects_zero_quantity() {
        let req = request(vec![Material::new("cotton", 2.0, 5.0)], 0);
        assert_eq!(req.validate(), Err(QuoteError::InvalidQuantity(0)));
    }

    #[test]
    fn test_validate_rejects_bad_material() {
        let req = request(vec![Material::new("silk", 1.0, -3.0)], 1);
        assert!(matches!(req.validate(), Err(QuoteError::InvalidMaterial(_))));

        let req = request(vec![Material::new("  ", 1.0, 3.0)], 1);
        assert!(matches!(req.validate(), Err(QuoteError::InvalidMaterial(_))));
    }

    #[test]
    fn test_complexity_round_trip_str() {
        for c in [Complexity::Simple, Complexity::Medium, Complexity::Complex] {
            assert_eq!(Complexity::from_str(c.as_str()), Some(c));
        }
        assert_eq!(Complexity::from_str("extreme"), None);
    }

    #[test]
    fn test_request_deserialize_defaults_rush_order() {
        let json = r#"{"materials":[{"name":"cotton","quantity_needed":2,"unit_cost":5}],"quantity":10,"complexity":"simple"}"#;
        let req: QuoteRequest = serde_json::from_str(json).unwrap();
        assert!(!req.rush_order);
        assert_eq!(req.complexity, Complexity::Simple);
    }
}
