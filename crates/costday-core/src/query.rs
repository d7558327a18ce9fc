//! Filtered, sorted views over the asset collection
//!
//! Everything here is a pure function of the collection and a reference
//! date. Nothing is cached: days owned grow with the calendar, so derived
//! values are recomputed on every call.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Asset;

/// Field to order the view by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Name,
    Price,
    AverageDailyPrice,
}

/// Direction of the ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::Name => write!(f, "name"),
            SortKey::Price => write!(f, "price"),
            SortKey::AverageDailyPrice => write!(f, "average-daily-price"),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "name" => Ok(SortKey::Name),
            "price" => Ok(SortKey::Price),
            "average-daily-price" | "daily" | "avg" => Ok(SortKey::AverageDailyPrice),
            other => Err(format!(
                "Unknown sort key '{}'. Use name, price, or average-daily-price.",
                other
            )),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => write!(f, "ascending"),
            SortDirection::Descending => write!(f, "descending"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Ascending),
            "desc" | "descending" => Ok(SortDirection::Descending),
            other => Err(format!(
                "Unknown sort order '{}'. Use asc or desc.",
                other
            )),
        }
    }
}

/// Search and ordering parameters for a view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewOptions {
    pub search_text: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ViewOptions {
    pub fn new(
        search_text: impl Into<String>,
        sort_key: SortKey,
        sort_direction: SortDirection,
    ) -> Self {
        Self {
            search_text: search_text.into(),
            sort_key,
            sort_direction,
        }
    }
}

/// Sums over a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Sum of purchase prices
    pub total_value: f64,
    /// Sum of each asset's own average daily price
    pub total_average_daily_price: f64,
}

/// An asset together with the values derived from it for display
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRow {
    #[serde(flatten)]
    pub asset: Asset,
    pub days_since_purchase: i64,
    pub average_daily_price: f64,
}

/// Whether `asset` passes the search filter
///
/// Matches when the search is empty, when the name contains it ignoring
/// case, or when the two-decimal price string contains it verbatim.
pub fn matches_search(asset: &Asset, search_text: &str) -> bool {
    if search_text.is_empty() {
        return true;
    }
    asset
        .name
        .to_lowercase()
        .contains(&search_text.to_lowercase())
        || asset.formatted_price().contains(search_text)
}

/// Filter and order `assets` for display
///
/// The sort is stable in both directions: assets with equal keys keep their
/// relative collection order.
pub fn view(assets: &[Asset], options: &ViewOptions, reference: NaiveDate) -> Vec<Asset> {
    let mut filtered: Vec<Asset> = assets
        .iter()
        .filter(|asset| matches_search(asset, &options.search_text))
        .cloned()
        .collect();

    let compare = |a: &Asset, b: &Asset| -> Ordering {
        match options.sort_key {
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Price => a.purchase_price.total_cmp(&b.purchase_price),
            SortKey::AverageDailyPrice => a
                .average_daily_price(reference)
                .total_cmp(&b.average_daily_price(reference)),
        }
    };

    match options.sort_direction {
        SortDirection::Ascending => filtered.sort_by(|a, b| compare(a, b)),
        SortDirection::Descending => filtered.sort_by(|a, b| compare(b, a)),
    }

    filtered
}

/// Total value and total daily cost of `assets`
pub fn totals(assets: &[Asset], reference: NaiveDate) -> Totals {
    assets.iter().fold(Totals::default(), |mut acc, asset| {
        acc.total_value += asset.purchase_price;
        acc.total_average_daily_price += asset.average_daily_price(reference);
        acc
    })
}

/// Attach derived values to each asset, keeping order
pub fn rows(assets: &[Asset], reference: NaiveDate) -> Vec<AssetRow> {
    assets
        .iter()
        .map(|asset| AssetRow {
            asset: asset.clone(),
            days_since_purchase: asset.days_since_purchase(reference),
            average_daily_price: asset.average_daily_price(reference),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn reference() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
    }

    fn asset(name: &str, price: f64, days_ago: i64) -> Asset {
        Asset::new(name, reference() - Duration::days(days_ago), price)
    }

    fn names(assets: &[Asset]) -> Vec<&str> {
        assets.iter().map(|a| a.name.as_str()).collect()
    }

    #[test]
    fn test_sort_by_name_ascending() {
        let assets = vec![asset("B", 100.0, 5), asset("A", 50.0, 5), asset("C", 50.0, 5)];
        let options = ViewOptions::new("", SortKey::Name, SortDirection::Ascending);

        let result = view(&assets, &options, reference());
        assert_eq!(names(&result), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_by_name_descending() {
        let assets = vec![asset("B", 100.0, 5), asset("A", 50.0, 5), asset("C", 50.0, 5)];
        let options = ViewOptions::new("", SortKey::Name, SortDirection::Descending);

        let result = view(&assets, &options, reference());
        assert_eq!(names(&result), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_same_name_keeps_collection_order() {
        let assets = vec![
            asset("Lamp", 10.0, 5),
            asset("Desk", 20.0, 5),
            asset("Lamp", 30.0, 5),
            asset("Lamp", 40.0, 5),
        ];
        let prices = |result: &[Asset]| -> Vec<f64> {
            result.iter().map(|a| a.purchase_price).collect()
        };

        let asc = view(
            &assets,
            &ViewOptions::new("", SortKey::Name, SortDirection::Ascending),
            reference(),
        );
        assert_eq!(prices(&asc), vec![20.0, 10.0, 30.0, 40.0]);

        let desc = view(
            &assets,
            &ViewOptions::new("", SortKey::Name, SortDirection::Descending),
            reference(),
        );
        assert_eq!(prices(&desc), vec![10.0, 30.0, 40.0, 20.0]);

        // Filtering first keeps the surviving order too
        let filtered = view(
            &assets,
            &ViewOptions::new("lamp", SortKey::Name, SortDirection::Descending),
            reference(),
        );
        assert_eq!(prices(&filtered), vec![10.0, 30.0, 40.0]);
    }

    #[test]
    fn test_sort_by_price_descending_is_stable() {
        let assets = vec![asset("B", 100.0, 5), asset("A", 50.0, 5), asset("C", 50.0, 5)];
        let options = ViewOptions::new("", SortKey::Price, SortDirection::Descending);

        let result = view(&assets, &options, reference());
        let prices: Vec<f64> = result.iter().map(|a| a.purchase_price).collect();
        assert_eq!(prices, vec![100.0, 50.0, 50.0]);
        // The two 50s keep their collection order
        assert_eq!(names(&result), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_sort_by_price_ascending_is_stable() {
        let assets = vec![asset("B", 100.0, 5), asset("A", 50.0, 5), asset("C", 50.0, 5)];
        let options = ViewOptions::new("", SortKey::Price, SortDirection::Ascending);

        let result = view(&assets, &options, reference());
        assert_eq!(names(&result), vec!["A", "C", "B"]);
    }

    #[test]
    fn test_sort_by_average_daily_price() {
        // 100/10 = 10, 90/3 = 30, 40/1 = 40
        let assets = vec![
            asset("cheap-daily", 100.0, 10),
            asset("mid-daily", 90.0, 3),
            asset("new", 40.0, 0),
        ];

        let asc = view(
            &assets,
            &ViewOptions::new("", SortKey::AverageDailyPrice, SortDirection::Ascending),
            reference(),
        );
        assert_eq!(names(&asc), vec!["cheap-daily", "mid-daily", "new"]);

        let desc = view(
            &assets,
            &ViewOptions::new("", SortKey::AverageDailyPrice, SortDirection::Descending),
            reference(),
        );
        assert_eq!(names(&desc), vec!["new", "mid-daily", "cheap-daily"]);
    }

    #[test]
    fn test_average_daily_order_depends_on_reference_date() {
        // Same price, bought 1 and 2 days before the first reference date
        let assets = vec![asset("older", 100.0, 2), asset("newer", 100.0, 1)];
        let options =
            ViewOptions::new("", SortKey::AverageDailyPrice, SortDirection::Descending);

        let result = view(&assets, &options, reference());
        assert_eq!(names(&result), vec!["newer", "older"]);

        // Future-dated purchases both clamp to one day, so order falls back to
        // collection order
        let earlier = reference() - Duration::days(10);
        let result = view(&assets, &options, earlier);
        assert_eq!(names(&result), vec!["older", "newer"]);
    }

    #[test]
    fn test_search_matches_formatted_price() {
        let assets = vec![asset("Camera", 19.90, 5), asset("Watch", 250.00, 5)];
        let options = ViewOptions::new("9.9", SortKey::Name, SortDirection::Ascending);

        let result = view(&assets, &options, reference());
        assert_eq!(names(&result), vec!["Camera"]);
    }

    #[test]
    fn test_search_name_is_case_insensitive() {
        let assets = vec![asset("Camera", 19.90, 5), asset("Watch", 250.00, 5)];

        let result = view(
            &assets,
            &ViewOptions::new("a", SortKey::Name, SortDirection::Ascending),
            reference(),
        );
        assert_eq!(names(&result), vec!["Camera", "Watch"]);

        let result = view(
            &assets,
            &ViewOptions::new("WAT", SortKey::Name, SortDirection::Ascending),
            reference(),
        );
        assert_eq!(names(&result), vec!["Watch"]);
    }

    #[test]
    fn test_search_uses_two_decimal_rendering() {
        let assets = vec![asset("Pen", 19.9, 5)];

        let hit = ViewOptions::new("19.90", SortKey::Name, SortDirection::Ascending);
        assert_eq!(view(&assets, &hit, reference()).len(), 1);

        let miss = ViewOptions::new("19.900", SortKey::Name, SortDirection::Ascending);
        assert!(view(&assets, &miss, reference()).is_empty());
    }

    #[test]
    fn test_empty_search_keeps_everything() {
        let assets = vec![asset("", 0.0, 0), asset("x", 1.0, 1)];
        let result = view(&assets, &ViewOptions::default(), reference());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_view_does_not_touch_input() {
        let assets = vec![asset("B", 1.0, 1), asset("A", 2.0, 1)];
        let before = assets.clone();
        let _ = view(&assets, &ViewOptions::default(), reference());
        assert_eq!(assets, before);
    }

    #[test]
    fn test_totals_sum_per_asset_rates() {
        let assets = vec![asset("a", 100.0, 10), asset("b", 200.0, 20)];

        let totals = totals(&assets, reference());
        assert_eq!(totals.total_value, 300.0);
        assert_eq!(totals.total_average_daily_price, 20.0);
    }

    #[test]
    fn test_totals_are_not_rate_of_totals() {
        let assets = vec![asset("a", 100.0, 1), asset("b", 100.0, 100)];

        let totals = totals(&assets, reference());
        // 100/1 + 100/100, not 200/101
        assert_eq!(totals.total_average_daily_price, 101.0);
    }

    #[test]
    fn test_totals_empty() {
        assert_eq!(totals(&[], reference()), Totals::default());
    }

    #[test]
    fn test_rows_carry_derived_values() {
        let assets = vec![asset("a", 100.0, 10), asset("b", 5.0, 0)];

        let rows = rows(&assets, reference());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].days_since_purchase, 10);
        assert_eq!(rows[0].average_daily_price, 10.0);
        assert_eq!(rows[1].days_since_purchase, 1);
        assert_eq!(rows[1].average_daily_price, 5.0);
    }

    #[test]
    fn test_parse_sort_options() {
        assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
        assert_eq!("Price".parse::<SortKey>().unwrap(), SortKey::Price);
        assert_eq!(
            "average_daily_price".parse::<SortKey>().unwrap(),
            SortKey::AverageDailyPrice
        );
        assert!("size".parse::<SortKey>().is_err());

        assert_eq!(
            "desc".parse::<SortDirection>().unwrap(),
            SortDirection::Descending
        );
        assert_eq!(
            "Ascending".parse::<SortDirection>().unwrap(),
            SortDirection::Ascending
        );
        assert!("up".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_sort_key_display_round_trips() {
        for key in [SortKey::Name, SortKey::Price, SortKey::AverageDailyPrice] {
            assert_eq!(key.to_string().parse::<SortKey>().unwrap(), key);
        }
    }
}
