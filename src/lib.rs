//! Box to Box - football trivia grid backend
//!
//! Players fill a 3x3 grid whose rows and columns are countries, clubs or
//! achievements. This crate resolves grid labels against Wikidata, answers
//! each cell from the live graph or a local achievement index, generates
//! random boards that are guaranteed playable, and validates guesses.
//!
//! ## Flow
//! Board Generator -> Entity Resolver -> Criterion Matcher / Local
//! Achievement Index (per cell) -> athlete -> valid cells index
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use box_to_box::{config::AppConfig, entity::EntityResolver, wikidata::WikidataClient};
//! use box_to_box::entity::ResolveType;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = WikidataClient::new(&AppConfig::default())?;
//! let resolver = EntityResolver::new(Arc::new(client));
//! let clubs = resolver.resolve("Barcelona", ResolveType::Club).await?;
//! assert_eq!(clubs[0].id, "Q7156");
//! # Ok(())
//! # }
//! ```

// Core error handling and configuration
pub mod config;
pub mod error;

// Knowledge graph port and the Wikidata adapter
pub mod graph;
pub mod wikidata;

// Entity resolution and matching
pub mod entity;
pub mod matching;
pub mod similarity;

// Local achievement data
pub mod local_index;

// Player search
pub mod lookup;

// Board precomputation and generation
pub mod board;

// REST API surface
#[cfg(feature = "server")]
pub mod api;

pub use error::{BoardError, Result};
