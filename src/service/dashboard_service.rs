//! Dashboard service: fetches price and context series and shapes them for
//! the table and the charts.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use super::ProfileService;
use crate::domain::UserId;
use crate::domain::pivot::{HotelPriceRecord, PivotTable, TrendSeries, build_pivot, filter_hotels};
use crate::error::GatewayError;
use crate::upstream::{PriceType, PricingApi, RangeQuery, SeriesKind};

/// Date range and filters of a dashboard request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    /// Price aggregate.
    pub price_type: PriceType,
    /// First stay date, inclusive.
    pub start_date: NaiveDate,
    /// Last stay date, inclusive.
    pub end_date: NaiveDate,
    /// Hotels to keep; empty keeps all.
    pub hotels: Vec<String>,
}

/// Price records with their table and chart views.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardPrices {
    /// Records after the hotel filter, as returned upstream.
    pub records: Vec<HotelPriceRecord>,
    /// Pivot table with average, max and min rows.
    pub pivot: PivotTable,
    /// One chart series per hotel.
    pub trends: Vec<TrendSeries>,
}

/// Read-only orchestration over the pricing API.
#[derive(Debug, Clone)]
pub struct DashboardService {
    pricing: Arc<dyn PricingApi>,
    profiles: ProfileService,
}

impl DashboardService {
    /// Creates a new `DashboardService`.
    #[must_use]
    pub fn new(pricing: Arc<dyn PricingApi>, profiles: ProfileService) -> Self {
        Self { pricing, profiles }
    }

    /// Fetches hotel prices and builds the pivot and trend views.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an inverted range, or an
    /// upstream error if the pricing API fails.
    pub async fn prices(
        &self,
        user_id: UserId,
        query: &DashboardQuery,
    ) -> Result<DashboardPrices, GatewayError> {
        let range = self.range(user_id, None, query)?;
        let records = self.pricing.hotel_prices(&range).await?;
        let records = filter_hotels(records, &query.hotels);
        let pivot = build_pivot(&records);
        let trends = pivot.trend_series();

        tracing::debug!(
            %user_id,
            records = records.len(),
            hotels = trends.len(),
            dates = pivot.dates.len(),
            "dashboard prices built"
        );
        Ok(DashboardPrices {
            records,
            pivot,
            trends,
        })
    }

    /// Fetches one of the auxiliary series. Region-keyed series use the
    /// region saved on the profile.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Validation`] for an inverted range or a
    /// missing region, or an upstream error if the pricing API fails.
    pub async fn series(
        &self,
        user_id: UserId,
        kind: SeriesKind,
        query: &DashboardQuery,
    ) -> Result<Vec<serde_json::Value>, GatewayError> {
        let region = if kind.is_per_user() {
            None
        } else {
            self.profiles
                .find(user_id)
                .await?
                .and_then(|profile| profile.region)
        };
        let range = self.range(user_id, region, query)?;
        self.pricing.series(kind, &range).await
    }

    fn range(
        &self,
        user_id: UserId,
        region: Option<String>,
        query: &DashboardQuery,
    ) -> Result<RangeQuery, GatewayError> {
        if query.start_date > query.end_date {
            return Err(GatewayError::Validation(format!(
                "start_date {} is after end_date {}",
                query.start_date, query.end_date
            )));
        }
        Ok(RangeQuery {
            user_id,
            region,
            price_type: query.price_type,
            start_date: query.start_date,
            end_date: query.end_date,
        })
    }
}
