use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cellar::{CellarSort, CellarStore, NewWine, WineRecord};
use crate::drink::DrinkState;
use crate::error::{CellarError, Result};

const COLUMNS: &str = "id, producer, name, vintage, location, quantity, rating, photo_path, \
                       purchase_date, price, drink_from_year, drink_to_year, created_at";

/// SQLite-backed cellar
///
/// ```sql
/// CREATE TABLE wines (
///     id TEXT PRIMARY KEY,
///     producer TEXT NOT NULL,
///     name TEXT NOT NULL,
///     vintage INTEGER,
///     location TEXT,
///     quantity INTEGER NOT NULL DEFAULT 0,
///     rating INTEGER,
///     photo_path TEXT,
///     purchase_date TEXT,
///     price REAL,
///     drink_from_year INTEGER,
///     drink_to_year INTEGER,
///     created_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteCellar {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCellar {
    /// Open (or create) the cellar database; `:memory:` is supported
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS wines (
                id TEXT PRIMARY KEY,
                producer TEXT NOT NULL,
                name TEXT NOT NULL,
                vintage INTEGER,
                location TEXT,
                quantity INTEGER NOT NULL DEFAULT 0,
                rating INTEGER,
                photo_path TEXT,
                purchase_date TEXT,
                price REAL,
                drink_from_year INTEGER,
                drink_to_year INTEGER,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_wines_created_at ON wines(created_at)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CellarError::from("cellar connection poisoned"))
    }

    fn row_to_wine(row: &Row<'_>) -> rusqlite::Result<WineRecord> {
        let created_at: String = row.get(12)?;
        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|_| Utc::now());

        Ok(WineRecord {
            id: row.get(0)?,
            producer: row.get(1)?,
            name: row.get(2)?,
            vintage: row.get(3)?,
            location: row.get(4)?,
            quantity: row.get::<_, i64>(5)?.max(0) as u32,
            rating: row.get::<_, Option<i64>>(6)?.map(|r| r.clamp(0, 5) as u8),
            photo_path: row.get(7)?,
            purchase_date: row.get(8)?,
            price: row.get(9)?,
            drink_from_year: row.get(10)?,
            drink_to_year: row.get(11)?,
            created_at,
        })
    }

    fn query_wines(conn: &Connection, sql: &str) -> Result<Vec<WineRecord>> {
        let mut stmt = conn.prepare(sql)?;
        let wines = stmt
            .query_map([], Self::row_to_wine)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(wines)
    }

    fn get_locked(conn: &Connection, id: &str) -> Result<Option<WineRecord>> {
        let sql = format!("SELECT {} FROM wines WHERE id = ?1", COLUMNS);
        let wine = conn
            .query_row(&sql, params![id], Self::row_to_wine)
            .optional()?;
        Ok(wine)
    }

    fn warn_if_inverted(wine: &WineRecord) {
        if wine.drink_window().is_inverted() {
            tracing::warn!(
                "Storing inverted drink window {:?}-{:?} for {}",
                wine.drink_from_year,
                wine.drink_to_year,
                wine.display_name()
            );
        }
    }
}

#[async_trait]
impl CellarStore for SqliteCellar {
    async fn insert(&self, wine: NewWine) -> Result<WineRecord> {
        let wine = wine.into_record();
        wine.validate()?;
        Self::warn_if_inverted(&wine);

        let conn = self.conn()?;
        conn.execute(
            &format!(
                "INSERT INTO wines ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                COLUMNS
            ),
            params![
                wine.id,
                wine.producer,
                wine.name,
                wine.vintage,
                wine.location,
                wine.quantity,
                wine.rating,
                wine.photo_path,
                wine.purchase_date,
                wine.price,
                wine.drink_from_year,
                wine.drink_to_year,
                wine.created_at.to_rfc3339(),
            ],
        )?;

        tracing::debug!("Inserted wine {} ({})", wine.display_name(), wine.id);
        Ok(wine)
    }

    async fn get(&self, id: &str) -> Result<Option<WineRecord>> {
        let conn = self.conn()?;
        Self::get_locked(&conn, id)
    }

    async fn update(&self, wine: WineRecord) -> Result<WineRecord> {
        let wine = wine.sanitized();
        wine.validate()?;
        Self::warn_if_inverted(&wine);

        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE wines SET producer = ?2, name = ?3, vintage = ?4, location = ?5, quantity = ?6,
                 rating = ?7, photo_path = ?8, purchase_date = ?9, price = ?10,
                 drink_from_year = ?11, drink_to_year = ?12
             WHERE id = ?1",
            params![
                wine.id,
                wine.producer,
                wine.name,
                wine.vintage,
                wine.location,
                wine.quantity,
                wine.rating,
                wine.photo_path,
                wine.purchase_date,
                wine.price,
                wine.drink_from_year,
                wine.drink_to_year,
            ],
        )?;

        if changed == 0 {
            return Err(CellarError::NotFound(wine.id));
        }

        Self::get_locked(&conn, &wine.id)?.ok_or(CellarError::NotFound(wine.id))
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM wines WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(CellarError::NotFound(id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, sort: CellarSort) -> Result<Vec<WineRecord>> {
        let order = match sort {
            CellarSort::Rating => "COALESCE(rating, 0) DESC, created_at DESC",
            CellarSort::Producer => "producer COLLATE NOCASE, name COLLATE NOCASE",
            CellarSort::Location => "COALESCE(location, '') COLLATE NOCASE, producer COLLATE NOCASE",
            CellarSort::Created => "created_at DESC",
        };

        let conn = self.conn()?;
        Self::query_wines(&conn, &format!("SELECT {} FROM wines ORDER BY {}", COLUMNS, order))
    }

    async fn drink_now(&self, current_year: i32) -> Result<Vec<WineRecord>> {
        let conn = self.conn()?;
        let in_stock = Self::query_wines(
            &conn,
            &format!(
                "SELECT {} FROM wines WHERE quantity > 0
                 ORDER BY COALESCE(rating, 0) DESC, producer COLLATE NOCASE, name COLLATE NOCASE",
                COLUMNS
            ),
        )?;

        Ok(in_stock
            .into_iter()
            .filter(|w| w.drink_state(current_year) == DrinkState::ReadyNow)
            .collect())
    }

    async fn take_one(&self, id: &str) -> Result<WineRecord> {
        let conn = self.conn()?;
        conn.execute(
            "UPDATE wines SET quantity = quantity - 1 WHERE id = ?1 AND quantity > 0",
            params![id],
        )?;

        Self::get_locked(&conn, id)?.ok_or_else(|| CellarError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wine(producer: &str, name: &str, quantity: u32, rating: Option<u8>) -> NewWine {
        NewWine {
            quantity: Some(quantity),
            rating,
            ..NewWine::new(producer, name)
        }
    }

    fn windowed(mut w: NewWine, from: Option<i32>, to: Option<i32>) -> NewWine {
        w.drink_from_year = from;
        w.drink_to_year = to;
        w
    }

    #[tokio::test]
    async fn test_cellar_create() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        assert!(cellar.list(CellarSort::Created).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let mut new = wine("Penfolds", "Grange", 3, Some(5));
        new.vintage = Some(2010);
        new.price = Some(650.0);
        let stored = cellar.insert(new).await.unwrap();

        let fetched = cellar.get(&stored.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Grange");
        assert_eq!(fetched.vintage, Some(2010));
        assert_eq!(fetched.quantity, 3);
        assert_eq!(fetched.price, Some(650.0));
        assert!(cellar.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_requires_producer_or_name() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let err = cellar.insert(NewWine::new(" ", "")).await.unwrap_err();
        assert!(matches!(err, CellarError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_years_clamped_on_write() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let stored = cellar
            .insert(windowed(wine("A", "B", 1, None), Some(1492), Some(3000)))
            .await
            .unwrap();
        assert_eq!(stored.drink_from_year, Some(1900));
        assert_eq!(stored.drink_to_year, Some(2100));

        let mut edited = stored.clone();
        edited.drink_to_year = Some(2200);
        let updated = cellar.update(edited).await.unwrap();
        assert_eq!(updated.drink_to_year, Some(2100));
    }

    #[tokio::test]
    async fn test_inverted_window_accepted() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let stored = cellar
            .insert(windowed(wine("A", "B", 1, None), Some(2030), Some(2020)))
            .await
            .unwrap();
        assert_eq!(stored.drink_state(2024), DrinkState::TooEarly);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let ghost = NewWine::new("Ghost", "Wine").into_record();
        assert!(matches!(cellar.update(ghost).await, Err(CellarError::NotFound(_))));
        assert!(matches!(cellar.delete("nope").await, Err(CellarError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let stored = cellar.insert(wine("A", "B", 1, None)).await.unwrap();
        cellar.delete(&stored.id).await.unwrap();
        assert!(cellar.get(&stored.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_sorting() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let mut a = wine("beta", "One", 1, Some(2));
        a.location = Some("Rack B".to_string());
        let mut b = wine("Alpha", "Two", 1, Some(4));
        b.location = Some("rack a".to_string());
        cellar.insert(a).await.unwrap();
        cellar.insert(b).await.unwrap();

        let by_rating = cellar.list(CellarSort::Rating).await.unwrap();
        assert_eq!(by_rating[0].producer, "Alpha");

        let by_producer = cellar.list(CellarSort::Producer).await.unwrap();
        assert_eq!(by_producer[0].producer, "Alpha");
        assert_eq!(by_producer[1].producer, "beta");

        let by_location = cellar.list(CellarSort::Location).await.unwrap();
        assert_eq!(by_location[0].location.as_deref(), Some("rack a"));
    }

    #[tokio::test]
    async fn test_drink_now_filters_and_orders() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        cellar
            .insert(windowed(wine("Ready", "Low", 2, Some(2)), Some(2020), Some(2030)))
            .await
            .unwrap();
        cellar
            .insert(windowed(wine("Ready", "High", 1, Some(5)), Some(2020), None))
            .await
            .unwrap();
        cellar
            .insert(windowed(wine("Empty", "Stock", 0, Some(5)), Some(2020), Some(2030)))
            .await
            .unwrap();
        cellar
            .insert(windowed(wine("Young", "Wine", 6, Some(4)), Some(2028), None))
            .await
            .unwrap();
        cellar
            .insert(windowed(wine("Old", "Wine", 6, Some(4)), None, Some(2019)))
            .await
            .unwrap();
        cellar.insert(wine("No", "Window", 6, Some(5))).await.unwrap();

        let ready = cellar.drink_now(2024).await.unwrap();
        let names: Vec<_> = ready.iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["High", "Low"]);
    }

    #[tokio::test]
    async fn test_take_one() {
        let cellar = SqliteCellar::new(":memory:").await.unwrap();
        let stored = cellar.insert(wine("A", "B", 2, None)).await.unwrap();

        assert_eq!(cellar.take_one(&stored.id).await.unwrap().quantity, 1);
        assert_eq!(cellar.take_one(&stored.id).await.unwrap().quantity, 0);
        // never below zero
        assert_eq!(cellar.take_one(&stored.id).await.unwrap().quantity, 0);
        assert!(matches!(
            cellar.take_one("missing").await,
            Err(CellarError::NotFound(_))
        ));
    }
}
