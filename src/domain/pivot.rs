//! Pivot and trend builders over flat hotel price records.
//!
//! The pricing API returns one record per (hotel, date, site) observation.
//! The dashboard table needs one row per hotel with one cell per date, plus
//! average / max / min rows across hotels; the charts need the same data as
//! per-hotel series.

use std::collections::btree_map::Entry as DateEntry;
use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

/// A raw price observation from the pricing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelPriceRecord {
    /// Hotel the price belongs to.
    pub hotel_name: String,
    /// Stay date, ISO `yyyy-mm-dd`.
    pub date: String,
    /// Nightly room price; `null` observations are ignored.
    #[serde(default)]
    pub room_price: Option<f64>,
    /// Booking site the price was scraped from.
    #[serde(default)]
    pub site: Option<String>,
}

/// Distinguishes real hotel rows from the synthetic statistic rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    /// One hotel.
    Hotel,
    /// Per-date mean across hotels.
    Average,
    /// Per-date maximum across hotels.
    Max,
    /// Per-date minimum across hotels.
    Min,
}

/// One row of the pivot table.
///
/// Serialized flat: `{"id": .., "hotelName": .., "kind": .., "2025-01-01": 100.0, ..}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    /// Stable row id: the hotel's first-seen index, or `avg` / `max` / `min`.
    pub id: String,
    /// Hotel name, or the statistic label for synthetic rows.
    #[serde(rename = "hotelName")]
    pub hotel_name: String,
    /// Row kind.
    pub kind: RowKind,
    /// Price per date; `None` when the row has no value for that date.
    #[serde(flatten)]
    pub cells: BTreeMap<String, Option<f64>>,
}

impl PivotRow {
    /// Returns the cell for `date`, flattening missing and null cells.
    #[must_use]
    pub fn price_on(&self, date: &str) -> Option<f64> {
        self.cells.get(date).copied().flatten()
    }
}

/// One point of a chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Stay date.
    pub date: String,
    /// Minimum price on that date, if any.
    pub price: Option<f64>,
}

/// Chart series for a single hotel, aligned to the pivot's date axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    /// Hotel name.
    pub hotel_name: String,
    /// One point per pivot date, in date order.
    pub points: Vec<TrendPoint>,
}

/// Pivoted view of a set of price records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PivotTable {
    /// Hotel rows in first-seen order, followed by the average, max and min rows.
    #[serde(rename = "pivotRows")]
    pub rows: Vec<PivotRow>,
    /// Sorted, de-duplicated date axis.
    pub dates: Vec<String>,
}

impl PivotTable {
    /// Returns the hotel rows only.
    pub fn hotel_rows(&self) -> impl Iterator<Item = &PivotRow> {
        self.rows.iter().filter(|row| row.kind == RowKind::Hotel)
    }

    /// Returns the synthetic row of the given kind.
    #[must_use]
    pub fn stat_row(&self, kind: RowKind) -> Option<&PivotRow> {
        self.rows.iter().find(|row| row.kind == kind)
    }

    /// Reshapes the hotel rows into chart series.
    #[must_use]
    pub fn trend_series(&self) -> Vec<TrendSeries> {
        self.hotel_rows()
            .map(|row| TrendSeries {
                hotel_name: row.hotel_name.clone(),
                points: self
                    .dates
                    .iter()
                    .map(|date| TrendPoint {
                        date: date.clone(),
                        price: row.price_on(date),
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Builds the pivot table.
///
/// Each hotel cell holds the minimum non-null price among that hotel's
/// records for the date. The three trailing rows hold, per date, the
/// rounded mean, the max and the min of the non-null hotel cells, or
/// `None` when no hotel has a value.
#[must_use]
pub fn build_pivot(records: &[HotelPriceRecord]) -> PivotTable {
    let mut dates: BTreeSet<&str> = BTreeSet::new();
    let mut order: Vec<&str> = Vec::new();
    let mut mins: HashMap<&str, BTreeMap<&str, f64>> = HashMap::new();

    for record in records {
        dates.insert(record.date.as_str());
        let cells = match mins.entry(record.hotel_name.as_str()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => {
                order.push(record.hotel_name.as_str());
                slot.insert(BTreeMap::new())
            }
        };
        let Some(price) = record.room_price.filter(|p| p.is_finite()) else {
            continue;
        };
        match cells.entry(record.date.as_str()) {
            DateEntry::Occupied(mut current) => {
                if price < *current.get() {
                    current.insert(price);
                }
            }
            DateEntry::Vacant(slot) => {
                slot.insert(price);
            }
        }
    }

    let mut rows: Vec<PivotRow> = order
        .iter()
        .enumerate()
        .map(|(index, hotel)| {
            let hotel_cells = mins.get(hotel);
            PivotRow {
                id: index.to_string(),
                hotel_name: (*hotel).to_string(),
                kind: RowKind::Hotel,
                cells: dates
                    .iter()
                    .map(|date| {
                        let price = hotel_cells.and_then(|c| c.get(date)).copied();
                        ((*date).to_string(), price)
                    })
                    .collect(),
            }
        })
        .collect();

    let mut average = BTreeMap::new();
    let mut max = BTreeMap::new();
    let mut min = BTreeMap::new();
    for date in &dates {
        let values: Vec<f64> = rows.iter().filter_map(|row| row.price_on(date)).collect();
        let stats = DateStats::of(&values);
        average.insert((*date).to_string(), stats.map(|s| s.average));
        max.insert((*date).to_string(), stats.map(|s| s.max));
        min.insert((*date).to_string(), stats.map(|s| s.min));
    }

    rows.push(stat_row("avg", "Average", RowKind::Average, average));
    rows.push(stat_row("max", "Max", RowKind::Max, max));
    rows.push(stat_row("min", "Min", RowKind::Min, min));

    PivotTable {
        rows,
        dates: dates.into_iter().map(str::to_string).collect(),
    }
}

/// Keeps only the records of the selected hotels. An empty selection keeps
/// everything.
#[must_use]
pub fn filter_hotels(records: Vec<HotelPriceRecord>, selected: &[String]) -> Vec<HotelPriceRecord> {
    if selected.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| selected.iter().any(|name| *name == r.hotel_name))
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct DateStats {
    average: f64,
    max: f64,
    min: f64,
}

impl DateStats {
    fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sum: f64 = values.iter().sum();
        #[allow(clippy::cast_precision_loss)]
        let mean = sum / values.len() as f64;
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        Some(Self {
            average: mean.round(),
            max,
            min,
        })
    }
}

fn stat_row(id: &str, label: &str, kind: RowKind, cells: BTreeMap<String, Option<f64>>) -> PivotRow {
    PivotRow {
        id: id.to_string(),
        hotel_name: label.to_string(),
        kind,
        cells,
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn rec(hotel: &str, date: &str, price: Option<f64>) -> HotelPriceRecord {
        HotelPriceRecord {
            hotel_name: hotel.to_string(),
            date: date.to_string(),
            room_price: price,
            site: None,
        }
    }

    fn row<'a>(table: &'a PivotTable, name: &str) -> &'a PivotRow {
        let Some(row) = table.rows.iter().find(|r| r.hotel_name == name) else {
            panic!("row {name} missing");
        };
        row
    }

    #[test]
    fn two_hotels_one_date() {
        let table = build_pivot(&[
            rec("A", "2025-01-01", Some(100.0)),
            rec("B", "2025-01-01", Some(200.0)),
        ]);
        assert_eq!(table.dates, vec!["2025-01-01".to_string()]);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(row(&table, "A").price_on("2025-01-01"), Some(100.0));
        assert_eq!(row(&table, "B").price_on("2025-01-01"), Some(200.0));
        let avg = table.stat_row(RowKind::Average).map(|r| r.price_on("2025-01-01"));
        let max = table.stat_row(RowKind::Max).map(|r| r.price_on("2025-01-01"));
        let min = table.stat_row(RowKind::Min).map(|r| r.price_on("2025-01-01"));
        assert_eq!(avg, Some(Some(150.0)));
        assert_eq!(max, Some(Some(200.0)));
        assert_eq!(min, Some(Some(100.0)));
    }

    #[test]
    fn keeps_minimum_price_per_hotel_and_date() {
        let table = build_pivot(&[
            rec("A", "2025-01-01", Some(180.0)),
            rec("A", "2025-01-01", Some(120.0)),
            rec("A", "2025-01-01", Some(150.0)),
        ]);
        assert_eq!(row(&table, "A").price_on("2025-01-01"), Some(120.0));
    }

    #[test]
    fn hotel_order_is_first_seen_and_dates_are_sorted() {
        let table = build_pivot(&[
            rec("Zeta", "2025-01-03", Some(1.0)),
            rec("Alpha", "2025-01-01", Some(1.0)),
            rec("Zeta", "2025-01-02", Some(1.0)),
        ]);
        let names: Vec<&str> = table.hotel_rows().map(|r| r.hotel_name.as_str()).collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
        assert_eq!(table.dates, vec!["2025-01-01", "2025-01-02", "2025-01-03"]);
        let kinds: Vec<RowKind> = table.rows.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::Hotel,
                RowKind::Hotel,
                RowKind::Average,
                RowKind::Max,
                RowKind::Min
            ]
        );
    }

    #[test]
    fn missing_dates_are_null_not_interpolated() {
        let table = build_pivot(&[
            rec("A", "2025-01-01", Some(100.0)),
            rec("B", "2025-01-02", Some(300.0)),
        ]);
        let a = row(&table, "A");
        assert_eq!(a.cells.get("2025-01-02"), Some(&None));
        // A single contributing hotel defines all three stats.
        let avg = table.stat_row(RowKind::Average).map(|r| r.price_on("2025-01-02"));
        assert_eq!(avg, Some(Some(300.0)));
    }

    #[test]
    fn all_null_date_gives_null_stats() {
        let table = build_pivot(&[
            rec("A", "2025-01-01", Some(100.0)),
            rec("A", "2025-01-02", None),
            rec("B", "2025-01-02", None),
        ]);
        for kind in [RowKind::Average, RowKind::Max, RowKind::Min] {
            let Some(stat) = table.stat_row(kind) else {
                panic!("stat row missing");
            };
            assert_eq!(stat.cells.get("2025-01-02"), Some(&None));
        }
    }

    #[test]
    fn stat_rows_share_the_hotel_date_set() {
        let table = build_pivot(&[
            rec("A", "2025-02-01", Some(10.0)),
            rec("B", "2025-02-03", Some(20.0)),
        ]);
        for r in &table.rows {
            let keys: Vec<&String> = r.cells.keys().collect();
            assert_eq!(keys, table.dates.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn average_is_rounded() {
        let table = build_pivot(&[
            rec("A", "2025-01-01", Some(100.0)),
            rec("B", "2025-01-01", Some(101.0)),
            rec("C", "2025-01-01", Some(101.0)),
        ]);
        let avg = table.stat_row(RowKind::Average).map(|r| r.price_on("2025-01-01"));
        assert_eq!(avg, Some(Some(101.0)));
    }

    #[test]
    fn empty_input_yields_only_stat_rows() {
        let table = build_pivot(&[]);
        assert!(table.dates.is_empty());
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows.iter().all(|r| r.cells.is_empty()));
    }

    #[test]
    fn row_serializes_flat() {
        let table = build_pivot(&[rec("A", "2025-01-01", Some(100.0))]);
        let json = serde_json::to_value(&table.rows).unwrap_or_default();
        assert_eq!(json[0]["hotelName"], "A");
        assert_eq!(json[0]["2025-01-01"], 100.0);
        assert_eq!(json[1]["id"], "avg");
    }

    #[test]
    fn trend_series_aligns_to_dates() {
        let table = build_pivot(&[
            rec("A", "2025-01-01", Some(100.0)),
            rec("B", "2025-01-02", Some(200.0)),
        ]);
        let series = table.trend_series();
        assert_eq!(series.len(), 2);
        let Some(a) = series.first() else {
            panic!("series missing");
        };
        assert_eq!(a.points.len(), 2);
        assert_eq!(a.points.get(1).and_then(|p| p.price), None);
    }

    #[test]
    fn filter_keeps_selected_hotels_only() {
        let records = vec![
            rec("A", "2025-01-01", Some(1.0)),
            rec("B", "2025-01-01", Some(2.0)),
        ];
        let kept = filter_hotels(records.clone(), &["B".to_string()]);
        assert_eq!(kept.len(), 1);
        assert_eq!(filter_hotels(records, &[]).len(), 2);
    }
}
