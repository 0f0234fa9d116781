//! Prediction DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::pivot::HotelPriceRecord;
use crate::domain::prediction::{PredictionInput, PredictionSlot};

/// Request body for `POST /predictions`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct PredictRequest {
    /// Stay date to predict (`yyyy-mm-dd`).
    #[serde(default)]
    pub date: Option<String>,
    /// Region; defaults to the profile region.
    #[serde(default)]
    pub region: Option<String>,
    /// Home hotel address.
    #[serde(default)]
    pub address: Option<String>,
    /// Expected occupancy (0–1).
    #[serde(default)]
    pub occupancy: Option<f64>,
    /// Price records currently loaded on the dashboard.
    #[serde(default)]
    #[schema(value_type = Vec<Object>)]
    pub records: Vec<HotelPriceRecord>,
}

impl From<PredictRequest> for PredictionInput {
    fn from(req: PredictRequest) -> Self {
        Self {
            date: req.date,
            region: req.region,
            address: req.address,
            occupancy: req.occupancy,
            records: req.records,
        }
    }
}

/// Response body for `POST /predictions`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PredictResponse {
    /// One slot per risk level, in risk order.
    pub slots: Vec<PredictionSlot>,
}
