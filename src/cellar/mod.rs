pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::drink::{DrinkState, DrinkStatus, DrinkWindow};
use crate::error::{CellarError, Result};

pub use sqlite::SqliteCellar;

/// Highest star rating
pub const MAX_RATING: u8 = 5;

/// Trait for wine record storage (the relational-store capability)
#[async_trait]
pub trait CellarStore: Send + Sync {
    /// Store a new wine and return it with its id
    async fn insert(&self, wine: NewWine) -> Result<WineRecord>;

    /// Fetch a wine by id
    async fn get(&self, id: &str) -> Result<Option<WineRecord>>;

    /// Overwrite an existing wine
    async fn update(&self, wine: WineRecord) -> Result<WineRecord>;

    /// Remove a wine
    async fn delete(&self, id: &str) -> Result<()>;

    /// All wines in the requested order
    async fn list(&self, sort: CellarSort) -> Result<Vec<WineRecord>>;

    /// In-stock wines whose drink window includes `current_year`,
    /// best rated first
    async fn drink_now(&self, current_year: i32) -> Result<Vec<WineRecord>>;

    /// Take one bottle out of stock
    async fn take_one(&self, id: &str) -> Result<WineRecord>;
}

/// Stored wine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WineRecord {
    pub id: String,
    pub producer: String,
    pub name: String,
    #[serde(default)]
    pub vintage: Option<i32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    /// 0-5 stars
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub photo_path: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub drink_from_year: Option<i32>,
    #[serde(default)]
    pub drink_to_year: Option<i32>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl WineRecord {
    pub fn drink_window(&self) -> DrinkWindow {
        DrinkWindow::new(self.drink_from_year, self.drink_to_year)
    }

    pub fn drink_state(&self, current_year: i32) -> DrinkState {
        self.drink_window().classify(current_year)
    }

    pub fn drink_status(&self, current_year: i32) -> DrinkStatus {
        DrinkStatus::of(self.drink_window(), current_year)
    }

    /// "Producer – Name (vintage)"
    pub fn display_name(&self) -> String {
        match self.vintage {
            Some(vintage) => format!("{} – {} ({})", self.producer, self.name, vintage),
            None => format!("{} – {}", self.producer, self.name),
        }
    }

    /// Clamp drink years and rating into their storable ranges
    pub fn sanitized(mut self) -> Self {
        self.producer = self.producer.trim().to_string();
        self.name = self.name.trim().to_string();
        let window = self.drink_window().clamped();
        self.drink_from_year = window.from;
        self.drink_to_year = window.to;
        self.rating = self.rating.map(|r| r.min(MAX_RATING));
        self
    }

    fn validate(&self) -> Result<()> {
        if self.producer.is_empty() && self.name.is_empty() {
            return Err(CellarError::InvalidInput(
                "A wine needs at least a producer or a name.".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input for a new wine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewWine {
    pub producer: String,
    pub name: String,
    pub vintage: Option<i32>,
    pub location: Option<String>,
    pub quantity: Option<u32>,
    pub rating: Option<u8>,
    pub photo_path: Option<String>,
    pub purchase_date: Option<String>,
    pub price: Option<f64>,
    pub drink_from_year: Option<i32>,
    pub drink_to_year: Option<i32>,
}

impl NewWine {
    pub fn new(producer: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Materialize into a record with a fresh id; quantity defaults to one bottle
    pub fn into_record(self) -> WineRecord {
        WineRecord {
            id: uuid::Uuid::new_v4().to_string(),
            producer: self.producer,
            name: self.name,
            vintage: self.vintage,
            location: self.location.filter(|l| !l.trim().is_empty()),
            quantity: self.quantity.unwrap_or(1),
            rating: self.rating,
            photo_path: self.photo_path,
            purchase_date: self.purchase_date,
            price: self.price,
            drink_from_year: self.drink_from_year,
            drink_to_year: self.drink_to_year,
            created_at: Utc::now(),
        }
        .sanitized()
    }
}

/// Listing order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellarSort {
    /// Highest rating first
    Rating,
    /// Producer A-Z
    Producer,
    /// Location A-Z
    Location,
    /// Newest first
    #[default]
    Created,
}

impl fmt::Display for CellarSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CellarSort::Rating => "rating",
            CellarSort::Producer => "producer",
            CellarSort::Location => "location",
            CellarSort::Created => "created",
        };
        f.write_str(s)
    }
}

impl FromStr for CellarSort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rating" => Ok(CellarSort::Rating),
            "producer" => Ok(CellarSort::Producer),
            "location" => Ok(CellarSort::Location),
            "created" => Ok(CellarSort::Created),
            other => Err(format!("unknown sort order: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_record_sanitizes() {
        let mut wine = NewWine::new(" Penfolds ", "Grange");
        wine.rating = Some(9);
        wine.drink_from_year = Some(1800);
        wine.drink_to_year = Some(2300);
        wine.location = Some("  ".to_string());
        let record = wine.into_record();
        assert_eq!(record.producer, "Penfolds");
        assert_eq!(record.quantity, 1);
        assert_eq!(record.rating, Some(5));
        assert_eq!(record.drink_window(), DrinkWindow::new(Some(1900), Some(2100)));
        assert!(record.location.is_none());
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_display_name() {
        let mut record = NewWine::new("Penfolds", "Grange").into_record();
        assert_eq!(record.display_name(), "Penfolds – Grange");
        record.vintage = Some(2010);
        assert_eq!(record.display_name(), "Penfolds – Grange (2010)");
    }

    #[test]
    fn test_drink_state_on_record() {
        let mut record = NewWine::new("Penfolds", "Grange").into_record();
        assert_eq!(record.drink_state(2024), DrinkState::NoWindow);
        record.drink_from_year = Some(2030);
        assert_eq!(record.drink_state(2024), DrinkState::TooEarly);
        assert_eq!(record.drink_status(2024).label, "too early (from 2030)");
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("Rating".parse::<CellarSort>().unwrap(), CellarSort::Rating);
        assert_eq!(CellarSort::default().to_string(), "created");
        assert!("price".parse::<CellarSort>().is_err());
    }
}
