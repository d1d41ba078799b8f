//! Wikidata integration
//!
//! This module provides:
//! - SPARQL and search API response types
//! - Query builders for entity lookup, criterion matching and player data
//! - `WikidataClient`, the live `KnowledgeGraph` implementation

pub mod client;
pub mod queries;
pub mod types;

pub use client::WikidataClient;
