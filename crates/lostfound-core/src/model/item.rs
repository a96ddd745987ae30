// ── Lost & found report domain types ──

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

use super::item_id::ItemId;

/// Reporter name recorded when the writer does not give one.
pub const ANONYMOUS_REPORTER: &str = "Anonymous";

/// Closed set of item categories.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Category {
    Electronics,
    Documents,
    Jewelry,
    Clothing,
    Bags,
    Keys,
    Medical,
    Personal,
    Other,
}

/// Whether the reporter lost the item or found it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ReportType {
    Lost,
    Found,
}

/// Lifecycle of a report in the backing store. Only `Active` reports
/// are listed for reconciliation.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum ItemStatus {
    #[default]
    Active,
    Claimed,
    Closed,
}

/// One lost-or-found report.
///
/// Immutable once built: the catalog hands out `Arc<Item>` and an edit is
/// a new record with a new identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub report_type: ReportType,
    pub location: String,
    #[serde(default)]
    pub contact: String,
    pub reported_by: String,
    pub reported_on: NaiveDate,
    #[serde(default)]
    pub status: ItemStatus,
}

/// A required field was blank at the write boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must not be empty")]
pub struct ItemValidationError {
    pub field: &'static str,
}

/// A report as submitted by a writer, before an identifier is allocated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub report_type: ReportType,
    pub location: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub reported_by: Option<String>,
}

impl NewItem {
    pub fn new(
        name: impl Into<String>,
        category: Category,
        report_type: ReportType,
        location: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            category,
            report_type,
            location: location.into(),
            contact: String::new(),
            reported_by: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = contact.into();
        self
    }

    pub fn with_reporter(mut self, reported_by: impl Into<String>) -> Self {
        self.reported_by = Some(reported_by.into());
        self
    }

    /// Reject blank required fields. Runs before anything touches the
    /// store or the catalog.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError { field: "name" });
        }
        if self.location.trim().is_empty() {
            return Err(ItemValidationError { field: "location" });
        }
        Ok(())
    }

    /// Seal the draft into an `Item`, trimming free-text fields.
    pub fn into_item(self, id: ItemId, reported_on: NaiveDate) -> Item {
        let reported_by = self
            .reported_by
            .map(|r| r.trim().to_owned())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| ANONYMOUS_REPORTER.to_owned());

        Item {
            id,
            name: self.name.trim().to_owned(),
            description: self.description.trim().to_owned(),
            category: self.category,
            report_type: self.report_type,
            location: self.location.trim().to_owned(),
            contact: self.contact.trim().to_owned(),
            reported_by,
            reported_on,
            status: ItemStatus::Active,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
    }

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!("personal".parse::<Category>().unwrap(), Category::Personal);
        assert_eq!("KEYS".parse::<Category>().unwrap(), Category::Keys);
        assert!("Furniture".parse::<Category>().is_err());
    }

    #[test]
    fn category_set_is_closed() {
        assert_eq!(Category::iter().count(), 9);
        assert_eq!(Category::Electronics.to_string(), "Electronics");
    }

    #[test]
    fn report_type_round_trips_through_display() {
        for kind in ReportType::iter() {
            assert_eq!(kind.to_string().parse::<ReportType>().unwrap(), kind);
        }
    }

    #[test]
    fn validate_rejects_blank_name() {
        let draft = NewItem::new("   ", Category::Bags, ReportType::Lost, "Lobby");
        assert_eq!(draft.validate().unwrap_err().field, "name");
    }

    #[test]
    fn validate_rejects_blank_location() {
        let draft = NewItem::new("Umbrella", Category::Other, ReportType::Found, "");
        assert_eq!(draft.validate().unwrap_err().field, "location");
    }

    #[test]
    fn validate_allows_empty_contact() {
        let draft = NewItem::new("Umbrella", Category::Other, ReportType::Found, "Lobby");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn into_item_trims_and_defaults_reporter() {
        let item = NewItem::new(" Wallet ", Category::Personal, ReportType::Lost, " Cafeteria ")
            .with_contact(" ext. 221 ")
            .with_reporter("  ")
            .into_item(ItemId::from("ITEM001"), day());

        assert_eq!(item.name, "Wallet");
        assert_eq!(item.location, "Cafeteria");
        assert_eq!(item.contact, "ext. 221");
        assert_eq!(item.reported_by, ANONYMOUS_REPORTER);
        assert_eq!(item.status, ItemStatus::Active);
    }
}
