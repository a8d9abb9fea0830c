// Stay pricing: nightly subtotal plus an ordered schedule of fees

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// How a single fee is derived from the stay subtotal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FeeKind {
    Flat(Decimal),
    // Percentage of the subtotal, e.g. 12.5 for 12.5%
    Percentage(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeRule {
    pub name: String,
    pub kind: FeeKind,
}

impl FeeRule {
    pub fn flat(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            name: name.into(),
            kind: FeeKind::Flat(amount),
        }
    }

    pub fn percentage(name: impl Into<String>, percent: Decimal) -> Self {
        Self {
            name: name.into(),
            kind: FeeKind::Percentage(percent),
        }
    }

    pub fn compute(&self, subtotal: Decimal) -> Decimal {
        match self.kind {
            FeeKind::Flat(amount) => amount,
            FeeKind::Percentage(percent) => subtotal * percent / Decimal::ONE_HUNDRED,
        }
    }
}

// Fees are applied in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeSchedule {
    rules: Vec<FeeRule>,
}

impl FeeSchedule {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(rules: Vec<FeeRule>) -> Self {
        Self { rules }
    }

    // The flat service fee charged at checkout
    pub fn with_service_fee(amount: Decimal) -> Self {
        Self::new(vec![FeeRule::flat("Service fee", amount)])
    }

    pub fn push(mut self, rule: FeeRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(&self) -> &[FeeRule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub fees: Vec<FeeLine>,
    pub total: Decimal,
}

impl PriceBreakdown {
    pub fn fees_total(&self) -> Decimal {
        self.fees.iter().map(|fee| fee.amount).sum()
    }
}

// A zero-night stay prices to zero everywhere, fee lines included
pub fn price_stay(nights: u32, price_per_night: Decimal, schedule: &FeeSchedule) -> PriceBreakdown {
    if nights == 0 {
        return PriceBreakdown {
            subtotal: Decimal::ZERO,
            fees: schedule
                .rules()
                .iter()
                .map(|rule| FeeLine {
                    name: rule.name.clone(),
                    amount: Decimal::ZERO,
                })
                .collect(),
            total: Decimal::ZERO,
        };
    }

    let subtotal = Decimal::from(nights) * price_per_night;
    let fees: Vec<FeeLine> = schedule
        .rules()
        .iter()
        .map(|rule| FeeLine {
            name: rule.name.clone(),
            amount: rule.compute(subtotal),
        })
        .collect();
    let total = subtotal + fees.iter().map(|fee| fee.amount).sum::<Decimal>();

    PriceBreakdown {
        subtotal,
        fees,
        total,
    }
}
