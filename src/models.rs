use crate::error::InventoryError;
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Quantity at or below which an item is reported as low on stock
pub const LOW_STOCK_THRESHOLD: i64 = 5;

/// Storage and export format for acquisition dates
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column headers of the tabular export, in column order
pub const EXPORT_HEADERS: [&str; 5] = ["Name", "Category", "Quantity", "Location", "AcquiredOn"];

/// Parses a `YYYY-MM-DD` date; anything else yields `None`
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT).ok()
}

/// One inventory record.
///
/// `id` is `None` until the store has persisted the item and assigned it an
/// identifier; rows read back from storage always carry `Some(id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryItem {
    pub id: Option<i64>,
    pub name: String,
    pub category: String,
    /// Not validated here; negative counts are stored as given
    pub quantity: i64,
    pub location: String,
    pub acquired_on: Option<NaiveDate>,
}

impl InventoryItem {
    /// Creates an item that has not been persisted yet
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        quantity: i64,
        location: impl Into<String>,
        acquired_on: Option<NaiveDate>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            quantity,
            location: location.into(),
            acquired_on,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Acquisition date as `YYYY-MM-DD`, or an empty string when unset
    pub fn acquired_on_text(&self) -> String {
        self.acquired_on
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }

    pub fn is_low_stock(&self, threshold: i64) -> bool {
        self.quantity <= threshold
    }

    /// Same fields, ignoring the identifier
    pub fn same_fields(&self, other: &InventoryItem) -> bool {
        self.name == other.name
            && self.category == other.category
            && self.quantity == other.quantity
            && self.location == other.location
            && self.acquired_on == other.acquired_on
    }
}

/// Partial edit of an item: only the fields that are `Some` change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub quantity: Option<i64>,
    pub location: Option<String>,
    pub acquired_on: Option<NaiveDate>,
}

impl ItemPatch {
    pub fn is_empty(&self) -> bool {
        *self == ItemPatch::default()
    }

    /// Copy of `item` with the given fields replaced; the id is kept
    pub fn apply(&self, item: &InventoryItem) -> InventoryItem {
        InventoryItem {
            id: item.id,
            name: self.name.clone().unwrap_or_else(|| item.name.clone()),
            category: self.category.clone().unwrap_or_else(|| item.category.clone()),
            quantity: self.quantity.unwrap_or(item.quantity),
            location: self.location.clone().unwrap_or_else(|| item.location.clone()),
            acquired_on: self.acquired_on.or(item.acquired_on),
        }
    }
}

/// Field a keyword search is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    Name,
    Category,
    Quantity,
    Location,
    AcquiredOn,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Name => "name",
            Criterion::Category => "category",
            Criterion::Quantity => "quantity",
            Criterion::Location => "location",
            Criterion::AcquiredOn => "acquired_on",
        }
    }

    pub fn all() -> &'static [Criterion] {
        &[
            Criterion::Name,
            Criterion::Category,
            Criterion::Quantity,
            Criterion::Location,
            Criterion::AcquiredOn,
        ]
    }

    /// Text fields match on a case-insensitive substring; quantity and date
    /// must equal the keyword exactly.
    pub fn matches(&self, item: &InventoryItem, keyword: &str) -> bool {
        match self {
            Criterion::Name => contains_ignore_case(&item.name, keyword),
            Criterion::Category => contains_ignore_case(&item.category, keyword),
            Criterion::Location => contains_ignore_case(&item.location, keyword),
            Criterion::Quantity => item.quantity.to_string() == keyword,
            Criterion::AcquiredOn => item.acquired_on_text() == keyword,
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = InventoryError;

    /// Accepts the English field names as well as the labels of the legacy
    /// Spanish search form (`nombre`, `tipo`, `cantidad`, `ubicación`, `fecha`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" | "nombre" => Ok(Criterion::Name),
            "category" | "type" | "tipo" => Ok(Criterion::Category),
            "quantity" | "qty" | "cantidad" => Ok(Criterion::Quantity),
            "location" | "ubicación" | "ubicacion" => Ok(Criterion::Location),
            "acquired_on" | "acquiredon" | "date" | "fecha" => Ok(Criterion::AcquiredOn),
            _ => Err(InventoryError::UnknownCriterion(s.to_string())),
        }
    }
}

/// Result of an update or delete addressed by identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The row existed and was changed
    Applied,
    /// No row has that identifier
    NotFound,
    /// The write itself failed (already logged)
    Failed,
}

impl WriteOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, WriteOutcome::Applied)
    }
}

/// One row of the raw tabular query used for reports.
///
/// Values are the stored text, so an unparseable or missing date is
/// exported as-is rather than being dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub location: String,
    pub acquired_on: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resistor() -> InventoryItem {
        InventoryItem::new(
            "Resistor 10k",
            "Passive",
            10,
            "A1",
            NaiveDate::from_ymd_opt(2024, 1, 15),
        )
    }

    #[test]
    fn new_item_is_unpersisted() {
        assert_eq!(resistor().id, None);
        assert_eq!(resistor().with_id(7).id, Some(7));
    }

    #[test]
    fn patch_replaces_only_given_fields() {
        let stored = resistor().with_id(3);
        let rename = ItemPatch {
            name: Some("Resistor 4k7".to_string()),
            ..Default::default()
        };

        let merged = rename.apply(&stored);
        assert_eq!(merged.id, Some(3));
        assert_eq!(merged.name, "Resistor 4k7");
        assert_eq!(merged.category, "Passive");
        assert_eq!(merged.quantity, 10);
        assert_eq!(merged.location, "A1");
        assert_eq!(merged.acquired_on, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn patch_can_set_quantity_to_zero() {
        let patch = ItemPatch {
            quantity: Some(0),
            location: Some(String::new()),
            ..Default::default()
        };
        let merged = patch.apply(&resistor());
        assert_eq!(merged.quantity, 0);
        assert_eq!(merged.location, "");
        assert_eq!(merged.name, "Resistor 10k");
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let patch = ItemPatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&resistor()), resistor());
    }

    #[test]
    fn date_text_round_trips() {
        let item = resistor();
        assert_eq!(item.acquired_on_text(), "2024-01-15");
        assert_eq!(parse_date("2024-01-15"), item.acquired_on);
    }

    #[test]
    fn unparseable_date_is_none() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("15/01/2024"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[test]
    fn missing_date_formats_empty() {
        let mut item = resistor();
        item.acquired_on = None;
        assert_eq!(item.acquired_on_text(), "");
    }

    #[test]
    fn low_stock_is_inclusive() {
        let mut item = resistor();
        item.quantity = 5;
        assert!(item.is_low_stock(LOW_STOCK_THRESHOLD));
        item.quantity = 6;
        assert!(!item.is_low_stock(LOW_STOCK_THRESHOLD));
        item.quantity = -1;
        assert!(item.is_low_stock(LOW_STOCK_THRESHOLD));
    }

    #[test]
    fn text_criteria_ignore_case() {
        let item = resistor();
        assert!(Criterion::Name.matches(&item, "resistor"));
        assert!(Criterion::Name.matches(&item, "10K"));
        assert!(Criterion::Category.matches(&item, "PASS"));
        assert!(Criterion::Location.matches(&item, "a1"));
        assert!(!Criterion::Location.matches(&item, "B"));
    }

    #[test]
    fn quantity_criterion_is_exact() {
        let item = resistor();
        assert!(Criterion::Quantity.matches(&item, "10"));
        assert!(!Criterion::Quantity.matches(&item, "1"));
        assert!(!Criterion::Quantity.matches(&item, "010"));
    }

    #[test]
    fn date_criterion_is_exact() {
        let item = resistor();
        assert!(Criterion::AcquiredOn.matches(&item, "2024-01-15"));
        assert!(!Criterion::AcquiredOn.matches(&item, "2024-01"));
    }

    #[test]
    fn empty_keyword_matches_text_fields() {
        let item = resistor();
        assert!(Criterion::Name.matches(&item, ""));
        assert!(Criterion::Category.matches(&item, ""));
        assert!(!Criterion::Quantity.matches(&item, ""));
    }

    #[test]
    fn criterion_parses_english_and_legacy_labels() {
        assert_eq!("Name".parse::<Criterion>().unwrap(), Criterion::Name);
        assert_eq!("tipo".parse::<Criterion>().unwrap(), Criterion::Category);
        assert_eq!("Cantidad".parse::<Criterion>().unwrap(), Criterion::Quantity);
        assert_eq!("Ubicación".parse::<Criterion>().unwrap(), Criterion::Location);
        assert_eq!("fecha".parse::<Criterion>().unwrap(), Criterion::AcquiredOn);
        for criterion in Criterion::all() {
            assert_eq!(criterion.as_str().parse::<Criterion>().unwrap(), *criterion);
        }
    }

    #[test]
    fn unknown_criterion_is_rejected() {
        let err = "colour".parse::<Criterion>().unwrap_err();
        assert!(matches!(err, InventoryError::UnknownCriterion(ref s) if s == "colour"));
    }
}
