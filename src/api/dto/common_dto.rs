//! Shared DTO types used across multiple endpoints.

use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::service::DashboardQuery;
use crate::upstream::PriceType;

/// Date-range query parameters for dashboard endpoints.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeParams {
    /// First stay date (`yyyy-mm-dd`), inclusive.
    #[param(value_type = String, example = "2025-01-01")]
    pub start_date: NaiveDate,
    /// Last stay date (`yyyy-mm-dd`), inclusive.
    #[param(value_type = String, example = "2025-01-31")]
    pub end_date: NaiveDate,
    /// `avg` or `min`. Defaults to `min`.
    #[serde(default)]
    #[param(value_type = Option<String>, example = "min")]
    pub price_type: Option<PriceType>,
    /// Hotel names to keep, one `hotels=` pair per name so names may
    /// contain commas. Empty keeps all.
    #[serde(default)]
    pub hotels: Vec<String>,
}

impl DateRangeParams {
    /// Converts into the service query, trimming the hotel filter and
    /// dropping blank names.
    #[must_use]
    pub fn into_query(self) -> DashboardQuery {
        let hotels = self
            .hotels
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();
        DashboardQuery {
            price_type: self.price_type.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
            hotels,
        }
    }
}
