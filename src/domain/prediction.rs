//! Price prediction input validation and fan-in.
//!
//! A prediction runs the upstream model once per [`RiskLevel`]. The inputs
//! are checked before anything goes on the wire, and the three results are
//! always reported in risk order regardless of completion order.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::pivot::HotelPriceRecord;
use crate::error::GatewayError;

/// Message shown in every failed slot.
pub const PREDICTION_FAILURE_MESSAGE: &str = "Prediction failed. Please try again later.";

/// Default spacing between slot reveals, in milliseconds.
pub const DEFAULT_REVEAL_STEP_MS: u64 = 300;

/// Risk appetite passed to the prediction model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum RiskLevel {
    /// Conservative pricing.
    Low,
    /// Balanced pricing.
    Medium,
    /// Aggressive pricing.
    High,
}

impl RiskLevel {
    /// All levels in display order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Wire value (1–3).
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Medium => 2,
            Self::High => 3,
        }
    }
}

impl From<RiskLevel> for u8 {
    fn from(level: RiskLevel) -> Self {
        level.as_u8()
    }
}

impl TryFrom<u8> for RiskLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Low),
            2 => Ok(Self::Medium),
            3 => Ok(Self::High),
            other => Err(format!("risk level must be 1, 2 or 3, got {other}")),
        }
    }
}

/// How failures inside a batch are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PredictionMode {
    /// Any failure marks all three slots as failed.
    #[default]
    AllOrNothing,
    /// Each slot reports its own success or failure.
    Settled,
}

impl std::str::FromStr for PredictionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all_or_nothing" | "all-or-nothing" => Ok(Self::AllOrNothing),
            "settled" => Ok(Self::Settled),
            other => Err(format!("unknown prediction mode: {other}")),
        }
    }
}

/// Raw prediction input as submitted by the dashboard.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PredictionInput {
    /// Target stay date.
    #[serde(default)]
    pub date: Option<String>,
    /// User region.
    #[serde(default)]
    pub region: Option<String>,
    /// Home hotel address.
    #[serde(default)]
    pub address: Option<String>,
    /// Expected occupancy rate.
    #[serde(default)]
    pub occupancy: Option<f64>,
    /// Price records already loaded on the dashboard.
    #[serde(default)]
    pub records: Vec<HotelPriceRecord>,
}

/// Input that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPrediction {
    /// Target stay date.
    pub date: NaiveDate,
    /// User region.
    pub region: String,
    /// Home hotel address, empty when unknown.
    pub address: String,
    /// Expected occupancy rate.
    pub occupancy: Option<f64>,
    /// Competitor prices on the target date.
    pub prices: Vec<f64>,
}

impl ValidatedPrediction {
    /// Builds the upstream request body for one risk level.
    #[must_use]
    pub fn request_for(&self, risk: RiskLevel) -> PredictionRequest {
        PredictionRequest {
            date: self.date.format("%Y-%m-%d").to_string(),
            region: self.region.clone(),
            address: self.address.clone(),
            occupancy: self.occupancy,
            risk: risk.as_u8(),
            prices: self.prices.clone(),
        }
    }
}

/// Body of `POST /predict` on the pricing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// Target stay date, `yyyy-mm-dd`.
    pub date: String,
    /// User region.
    pub region: String,
    /// Home hotel address.
    pub address: String,
    /// Expected occupancy rate.
    pub occupancy: Option<f64>,
    /// Risk level 1–3.
    pub risk: u8,
    /// Competitor prices on the target date.
    pub prices: Vec<f64>,
}

/// Response of `POST /predict` on the pricing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    /// Suggested nightly price.
    pub predicted_price: f64,
}

/// One displayed prediction result.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PredictionSlot {
    /// Risk level of this slot.
    #[schema(value_type = u8)]
    pub risk: RiskLevel,
    /// Predicted price when the request succeeded.
    pub predicted_price: Option<f64>,
    /// Failure message when it did not.
    pub error: Option<String>,
    /// Presentation delay before the client reveals this slot.
    pub reveal_after_ms: u64,
}

/// Checks the input; no request may be issued when this fails.
///
/// # Errors
///
/// Returns [`GatewayError::Validation`] when the date or region is missing,
/// the date is not `yyyy-mm-dd`, or no price exists for the date.
pub fn validate_prediction(input: &PredictionInput) -> Result<ValidatedPrediction, GatewayError> {
    let raw_date = non_blank(input.date.as_deref())
        .ok_or_else(|| GatewayError::Validation("select a date to predict".to_string()))?;
    let region = non_blank(input.region.as_deref())
        .ok_or_else(|| GatewayError::Validation("user region is not set".to_string()))?;
    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
        .map_err(|_| GatewayError::Validation(format!("invalid date: {raw_date}")))?;

    let prices = prices_on(&input.records, raw_date);
    if prices.is_empty() {
        return Err(GatewayError::Validation(format!(
            "no price data for {raw_date}"
        )));
    }

    Ok(ValidatedPrediction {
        date,
        region: region.to_string(),
        address: non_blank(input.address.as_deref()).unwrap_or_default().to_string(),
        occupancy: input.occupancy,
        prices,
    })
}

/// Non-null prices recorded for `date`, in input order.
#[must_use]
pub fn prices_on(records: &[HotelPriceRecord], date: &str) -> Vec<f64> {
    records
        .iter()
        .filter(|r| r.date == date)
        .filter_map(|r| r.room_price.filter(|p| p.is_finite()))
        .collect()
}

/// Turns per-level outcomes into displayed slots.
///
/// `outcomes` may arrive in any order; slots are emitted in risk order with
/// reveal delays of `index × reveal_step_ms`.
#[must_use]
pub fn collect_slots<E>(
    mut outcomes: Vec<(RiskLevel, Result<f64, E>)>,
    mode: PredictionMode,
    reveal_step_ms: u64,
) -> Vec<PredictionSlot> {
    outcomes.sort_by_key(|(risk, _)| *risk);
    let any_failed = outcomes.iter().any(|(_, r)| r.is_err());

    outcomes
        .into_iter()
        .zip(0u64..)
        .map(|((risk, result), index)| {
            let failed = match mode {
                PredictionMode::AllOrNothing => any_failed,
                PredictionMode::Settled => result.is_err(),
            };
            let reveal_after_ms = index.saturating_mul(reveal_step_ms);
            if failed {
                PredictionSlot {
                    risk,
                    predicted_price: None,
                    error: Some(PREDICTION_FAILURE_MESSAGE.to_string()),
                    reveal_after_ms,
                }
            } else {
                PredictionSlot {
                    risk,
                    predicted_price: result.ok(),
                    error: None,
                    reveal_after_ms,
                }
            }
        })
        .collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
