//! # Cellar Engine
//!
//! Core of a personal wine-cellar inventory:
//! - Match ranking of encyclopedia search results against a producer/name/vintage guess
//! - Parallel multi-language Wikipedia search with thumbnail enrichment
//! - Drink-window classification and labels
//! - SQLite cellar store
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use cellar_engine::{EngineConfig, RecognitionEngine, WineGuess};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = RecognitionEngine::from_config(&EngineConfig::default())?;
//!
//!     let response = engine
//!         .recognize(WineGuess::new("Château Margaux", "", "2015"))
//!         .await?;
//!
//!     for m in &response.matches {
//!         println!("{} - {}%", m.display_name(), m.confidence);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! The ranker and classifier are also usable as plain functions:
//!
//! ```rust
//! use cellar_engine::drink::{classify, DrinkState, DrinkWindow};
//! use cellar_engine::ranking::rank;
//!
//! let matches = rank("Domaine X", "Cuvée Y", "2019", &[]);
//! assert_eq!(matches[0].confidence, 60);
//!
//! let state = classify(DrinkWindow::new(Some(2020), Some(2025)), 2024);
//! assert_eq!(state, DrinkState::ReadyNow);
//! ```

pub mod cellar;
pub mod config;
pub mod core;
pub mod drink;
pub mod engine;
pub mod error;
pub mod providers;
pub mod ranking;
pub mod text;

// Re-export primary types
pub use cellar::{CellarSort, CellarStore, NewWine, SqliteCellar, WineRecord};
pub use config::EngineConfig;
pub use self::core::{Language, RecognizeResponse, ScoredMatch, SearchCandidate, SourceRef, WineGuess};
pub use drink::{DrinkState, DrinkStatus, DrinkWindow};
pub use engine::RecognitionEngine;
pub use error::{CellarError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
