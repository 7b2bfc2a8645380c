//! Business constants used by the engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::money::to_decimal;

/// Default COGS proxy as a share of GMV (a stated business assumption)
pub const DEFAULT_ASSUMED_COGS_RATE: f64 = 0.4;
/// Line items whose fees and vouchers exceed this share of GMV raise an alert
pub const DEFAULT_FEE_ALERT_RATIO: f64 = 0.5;
/// Above this share of GMV the fixed fee alone is blamed for an alert
pub const DEFAULT_FEE_ALERT_FIXED_FEE_SHARE: f64 = 0.2;
/// Deliveries taking longer than this many days are slow
pub const DEFAULT_SLOW_DELIVERY_DAYS: f64 = 5.0;
/// Orders discounted strictly above this percentage breach the guardrail
pub const DEFAULT_DISCOUNT_GUARDRAIL_PCT: f64 = 40.0;

/// Tunable thresholds shared by the aggregator and the economics calculator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineSettings {
    pub assumed_cogs_rate: f64,
    pub fee_alert_ratio: f64,
    pub fee_alert_fixed_fee_share: f64,
    pub slow_delivery_days: f64,
    pub discount_guardrail_pct: f64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            assumed_cogs_rate: DEFAULT_ASSUMED_COGS_RATE,
            fee_alert_ratio: DEFAULT_FEE_ALERT_RATIO,
            fee_alert_fixed_fee_share: DEFAULT_FEE_ALERT_FIXED_FEE_SHARE,
            slow_delivery_days: DEFAULT_SLOW_DELIVERY_DAYS,
            discount_guardrail_pct: DEFAULT_DISCOUNT_GUARDRAIL_PCT,
        }
    }
}

impl EngineSettings {
    /// Reject values that would make the derived figures meaningless
    pub fn validate(&self) -> EngineResult<()> {
        check_unit_share("assumed_cogs_rate", self.assumed_cogs_rate)?;
        check_positive("fee_alert_ratio", self.fee_alert_ratio)?;
        check_unit_share("fee_alert_fixed_fee_share", self.fee_alert_fixed_fee_share)?;
        check_positive("slow_delivery_days", self.slow_delivery_days)?;
        if !(0.0..=100.0).contains(&self.discount_guardrail_pct) {
            return Err(EngineError::InvalidSetting {
                name: "discount_guardrail_pct",
                reason: format!("{} is outside 0..=100", self.discount_guardrail_pct),
            });
        }
        Ok(())
    }

    pub(crate) fn cogs_rate(&self) -> Decimal {
        to_decimal(self.assumed_cogs_rate)
    }

    pub(crate) fn alert_ratio(&self) -> Decimal {
        to_decimal(self.fee_alert_ratio)
    }

    pub(crate) fn fixed_fee_share(&self) -> Decimal {
        to_decimal(self.fee_alert_fixed_fee_share)
    }

    pub(crate) fn guardrail_pct(&self) -> Decimal {
        to_decimal(self.discount_guardrail_pct)
    }
}

fn check_unit_share(name: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EngineError::InvalidSetting {
            name,
            reason: format!("{value} is outside 0..=1"),
        })
    }
}

fn check_positive(name: &'static str, value: f64) -> EngineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidSetting {
            name,
            reason: format!("{value} must be greater than zero"),
        })
    }
}
