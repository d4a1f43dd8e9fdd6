//! Quote Engine - 报价计算
//!
//! base_price  = Σ(quantity_needed × unit_cost) × quantity
//! final_price = base_price × complexity_multiplier (× RUSH_MULTIPLIER if rush)

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{BreakdownLine, Complexity, QuoteAlternative, QuoteError, QuoteId, QuoteRequest};

/// 加急订单价格系数
pub const RUSH_MULTIPLIER: f64 = 1.5;

/// 报价有效期（天）
pub const QUOTE_VALIDITY_DAYS: i64 = 7;

/// 低于该数量时建议批量下单
const BULK_THRESHOLD: u32 = 20;

/// 批量下单的预估折扣
const BULK_DISCOUNT: f64 = 0.08;

/// 报价结果
///
/// 每次 generate_quote 生成一个，之后不可变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub id: QuoteId,
    pub base_price: f64,
    pub final_price: f64,
    /// 工期（天）
    pub timeline: u32,
    pub breakdown: Vec<BreakdownLine>,
    /// 置信度 0.5 - 0.95
    pub confidence: f64,
    pub alternatives: Vec<QuoteAlternative>,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// 报价对比结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteComparison {
    pub cheapest: QuoteResult,
    pub fastest: QuoteResult,
    pub recommended: QuoteResult,
    pub price_range: f64,
    pub timeline_range: u32,
    pub analysis: String,
}

/// 四舍五入到分
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// 生成报价
pub fn generate_quote(request: &QuoteRequest) -> Result<QuoteResult, QuoteError> {
    request.validate()?;

    let material_cost: f64 = request.materials.iter().map(|m| m.cost_per_unit()).sum();
    let base_price = round_cents(material_cost * request.quantity as f64);

    let adjusted = round_cents(base_price * request.complexity.multiplier());
    let surcharge = rush_surcharge(adjusted, request.rush_order);
    let final_price = round_cents(adjusted + surcharge);

    let mut breakdown = vec![
        BreakdownLine::new("materials", base_price),
        BreakdownLine::new("complexity_adjustment", round_cents(adjusted - base_price)),
    ];
    if request.rush_order {
        breakdown.push(BreakdownLine::new("rush_surcharge", surcharge));
    }

    let timeline = estimate_timeline(request.complexity, request.quantity, request.rush_order);
    let created_at = Utc::now();

    Ok(QuoteResult {
        id: QuoteId::new(),
        base_price,
        final_price,
        timeline,
        breakdown,
        confidence: estimate_confidence(request),
        alternatives: build_alternatives(request, base_price, final_price, timeline),
        valid_until: created_at + Duration::days(QUOTE_VALIDITY_DAYS),
        created_at,
    })
}

fn rush_surcharge(adjusted: f64, rush_order: bool) -> f64 {
    if rush_order {
        round_cents(adjusted * (RUSH_MULTIPLIER - 1.0))
    } else {
        0.0
    }
}

fn price_for(base_price: f64, complexity: Complexity, rush_order: bool) -> f64 {
    let adjusted = round_cents(base_price * complexity.multiplier());
    round_cents(adjusted + rush_surcharge(adjusted, rush_order))
}

/// 估算工期：复杂度越高、批量越大工期越长；加急减半
fn estimate_timeline(complexity: Complexity, quantity: u32, rush_order: bool) -> u32 {
    let mut days = complexity.base_days() as f64;

    if quantity > 50 {
        days *= 1.5;
    } else if quantity > 20 {
        days *= 1.2;
    }

    if rush_order {
        days *= 0.5;
    }

    (days.ceil() as u32).max(1)
}

fn estimate_confidence(request: &QuoteRequest) -> f64 {
    let mut confidence: f64 = 0.8;

    match request.complexity {
        Complexity::Simple => confidence += 0.1,
        Complexity::Medium => {}
        Complexity::Complex => confidence -= 0.1,
    }
    if request.rush_order {
        confidence -= 0.15;
    }

    confidence.clamp(0.5, 0.95)
}

fn build_alternatives(
    request: &QuoteRequest,
    base_price: f64,
    final_price: f64,
    timeline: u32,
) -> Vec<QuoteAlternative> {
    let mut alternatives = Vec::new();

    if request.rush_order {
        let standard_price = price_for(base_price, request.complexity, false);
        let standard_days = estimate_timeline(request.complexity, request.quantity, false);
        alternatives.push(QuoteAlternative {
            title: "Standard Timeline".to_string(),
            description: "Drop the rush requirement to remove the surcharge".to_string(),
            price_change: round_cents(standard_price - final_price),
            timeline_change: standard_days as i64 - timeline as i64,
        });
    }

    if request.complexity == Complexity::Complex {
        let simplified_price = price_for(base_price, Complexity::Medium, request.rush_order);
        let simplified_days =
            estimate_timeline(Complexity::Medium, request.quantity, request.rush_order);
        alternatives.push(QuoteAlternative {
            title: "Simplified Design".to_string(),
            description: "Reduce design complexity to medium".to_string(),
            price_change: round_cents(simplified_price - final_price),
            timeline_change: simplified_days as i64 - timeline as i64,
        });
    }

    if request.quantity < BULK_THRESHOLD {
        let bulk_quantity = BULK_THRESHOLD.max(request.quantity * 2);
        alternatives.push(QuoteAlternative {
            title: "Bulk Order".to_string(),
            description: format!("Increase quantity to {} for a volume discount", bulk_quantity),
            price_change: -round_cents(final_price * BULK_DISCOUNT),
            timeline_change: 3,
        });
    }

    alternatives
}

/// 综合评分：价格越低、工期越短、置信度越高越好
fn value_score(quote: &QuoteResult) -> f64 {
    let price = quote.final_price.max(0.01);
    let timeline = quote.timeline.max(1) as f64;
    quote.confidence / (price * timeline)
}

/// 对比多个报价
///
/// 平局时取先出现的报价
pub fn compare_quotes(quotes: &[QuoteResult]) -> Result<QuoteComparison, QuoteError> {
    let (first, rest) = match quotes {
        [first, rest @ ..] if !rest.is_empty() => (first, rest),
        _ => return Err(QuoteError::NotEnoughQuotes(quotes.len())),
    };

    let mut cheapest = first;
    let mut fastest = first;
    let mut recommended = first;
    for quote in rest {
        if quote.final_price < cheapest.final_price {
            cheapest = quote;
        }
        if quote.timeline < fastest.timeline {
            fastest = quote;
        }
        if value_score(quote) > value_score(recommended) {
            recommended = quote;
        }
    }

    let max_price = quotes.iter().map(|q| q.final_price).fold(f64::MIN, f64::max);
    let min_price = quotes.iter().map(|q| q.final_price).fold(f64::MAX, f64::min);
    let max_days = quotes.iter().map(|q| q.timeline).max().unwrap_or(0);
    let min_days = quotes.iter().map(|q| q.timeline).min().unwrap_or(0);
    let price_range = round_cents(max_price - min_price);
    let timeline_range = max_days - min_days;

    let mut analysis = format!(
        "Analyzed {} quotes with price range of ${:.2} and timeline range of {} days. ",
        quotes.len(),
        price_range,
        timeline_range
    );
    if recommended.id == cheapest.id {
        analysis.push_str("The cheapest option also offers the best overall value.");
    } else {
        analysis.push_str(&format!(
            "The recommended option costs ${:.2} more but offers a better balance of timeline and confidence.",
            recommended.final_price - cheapest.final_price
        ));
    }

    Ok(QuoteComparison {
        cheapest: cheapest.clone(),
        fastest: fastest.clone(),
        recommended: recommended.clone(),
        price_range,
        timeline_range,
        analysis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::Material;

    fn request(complexity: Complexity, quantity: u32, rush_order: bool) -> QuoteRequest {
        QuoteRequest {
            materials: vec![
                Material::new("cotton", 2.0, 5.0),
                Material::new("silk", 0.5, 45.0),
            ],
            quantity,
            complexity,
            rush_order,
        }
    }

    #[test]
    fn test_cotton_scenario() {
        let req = QuoteRequest {
            materials: vec![Material::new("cotton", 2.0, 5.0)],
            quantity: 10,
            complexity: Complexity::Simple,
            rush_order: false,
        };

        let quote = generate_quote(&req).unwrap();
        assert_eq!(quote.base_price, 100.0);
        assert_eq!(quote.final_price, 100.0);
        assert_eq!(quote.timeline, 7);
        assert_eq!(quote.breakdown[0], BreakdownLine::new("materials", 100.0));
    }

    #[test]
    fn test_non_rush_price_is_cent_rounded_base_times_multiplier() {
        // 每一步都按分取整，等式只在取整后成立（33.33 * 1.3 = 43.329 -> 43.33）
        for complexity in [Complexity::Simple, Complexity::Medium, Complexity::Complex] {
            for quantity in [1, 7, 33, 120] {
                let quote = generate_quote(&request(complexity, quantity, false)).unwrap();
                assert_eq!(
                    quote.final_price,
                    round_cents(quote.base_price * complexity.multiplier())
                );
            }
        }

        let quote = generate_quote(&QuoteRequest {
            materials: vec![Material::new("thread", 1.0, 33.33)],
            quantity: 1,
            complexity: Complexity::Medium,
            rush_order: false,
        })
        .unwrap();
        assert_eq!(quote.base_price, 33.33);
        assert_eq!(quote.final_price, 43.33);
        assert_ne!(quote.final_price, quote.base_price * 1.3);
    }

    #[test]
    fn test_rush_price_not_below_base() {
        for complexity in [Complexity::Simple, Complexity::Medium, Complexity::Complex] {
            let quote = generate_quote(&request(complexity, 12, true)).unwrap();
            assert!(quote.final_price >= quote.base_price);

            let normal = generate_quote(&request(complexity, 12, false)).unwrap();
            assert!(quote.final_price > normal.final_price);
            assert!(quote.breakdown.iter().any(|l| l.label == "rush_surcharge"));
        }
    }

    #[test]
    fn test_invalid_request_is_rejected() {
        let mut req = request(Complexity::Simple, 0, false);
        assert_eq!(generate_quote(&req), Err(QuoteError::InvalidQuantity(0)));

        req.quantity = 3;
        req.materials.clear();
        assert_eq!(generate_quote(&req), Err(QuoteError::EmptyMaterials));
    }

    #[test]
    fn test_timeline_grows_with_quantity_and_complexity() {
        let small = generate_quote(&request(Complexity::Simple, 5, false)).unwrap();
        let large = generate_quote(&request(Complexity::Simple, 80, false)).unwrap();
        let complex = generate_quote(&request(Complexity::Complex, 5, false)).unwrap();
        let rush = generate_quote(&request(Complexity::Simple, 5, true)).unwrap();

        assert!(large.timeline > small.timeline);
        assert!(complex.timeline > small.timeline);
        assert!(rush.timeline < small.timeline);
        assert!(rush.timeline >= 1);
    }

    #[test]
    fn test_confidence_and_alternatives() {
        let quote = generate_quote(&request(Complexity::Complex, 5, true)).unwrap();
        assert!((quote.confidence - 0.55).abs() < 1e-9);

        let titles: Vec<_> = quote.alternatives.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["Standard Timeline", "Simplified Design", "Bulk Order"]);
        assert!(quote.alternatives.iter().all(|a| a.price_change < 0.0));

        let bulk = &quote.alternatives[2];
        assert_eq!(bulk.description, "Increase quantity to 20 for a volume discount");
        assert_eq!(bulk.timeline_change, 3);

        let simple = generate_quote(&request(Complexity::Simple, 30, false)).unwrap();
        assert!(simple.alternatives.is_empty());
        assert_eq!(simple.valid_until - simple.created_at, Duration::days(7));
    }

    #[test]
    fn test_compare_requires_two_quotes() {
        assert_eq!(compare_quotes(&[]), Err(QuoteError::NotEnoughQuotes(0)));

        let quote = generate_quote(&request(Complexity::Simple, 5, false)).unwrap();
        assert_eq!(
            compare_quotes(std::slice::from_ref(&quote)),
            Err(QuoteError::NotEnoughQuotes(1))
        );
    }

    #[test]
    fn test_compare_ranks_quotes() {
        let cheap_slow = generate_quote(&request(Complexity::Simple, 60, false)).unwrap();
        let pricey_fast = generate_quote(&request(Complexity::Medium, 60, true)).unwrap();

        let comparison = compare_quotes(&[cheap_slow.clone(), pricey_fast.clone()]).unwrap();
        assert_eq!(comparison.cheapest.id, cheap_slow.id);
        assert_eq!(comparison.fastest.id, pricey_fast.id);
        assert_eq!(comparison.recommended.id, cheap_slow.id);
        assert_eq!(
            comparison.price_range,
            round_cents(pricey_fast.final_price - cheap_slow.final_price)
        );
        assert_eq!(comparison.timeline_range, cheap_slow.timeline - pricey_fast.timeline);
        assert!(comparison.analysis.starts_with("Analyzed 2 quotes"));
    }
}
