//! Entity Resolver
//!
//! Maps a free-text label plus a type hint to entities ranked by popularity.
//! Achievement labels and curated clubs never reach the live graph.

use std::sync::Arc;

use tracing::{debug, info};

use super::{overrides, Achievement, Entity, ResolveType};
use crate::error::Result;
use crate::graph::KnowledgeGraph;

#[derive(Clone)]
pub struct EntityResolver {
    graph: Arc<dyn KnowledgeGraph>,
}

impl EntityResolver {
    pub fn new(graph: Arc<dyn KnowledgeGraph>) -> Self {
        Self { graph }
    }

    /// Resolve `label` as `kind`.
    ///
    /// Returns an empty list when nothing matches. For `Auto` an empty list
    /// means the caller should try a concrete type itself.
    pub async fn resolve(&self, label: &str, kind: ResolveType) -> Result<Vec<Entity>> {
        let label = label.trim();
        if label.is_empty() {
            return Ok(vec![]);
        }

        if matches!(kind, ResolveType::Auto | ResolveType::Achievement) {
            if let Some(achievement) = Achievement::from_label(label) {
                debug!("Resolved achievement label {:?} -> {}", label, achievement.id());
                return Ok(vec![achievement.entity()]);
            }
            if kind == ResolveType::Achievement {
                return Ok(vec![]);
            }
        }

        if kind == ResolveType::Club {
            if let Some(entity) = overrides::club_override(label) {
                info!("Using curated club: {} -> {}", label, entity.id);
                return Ok(vec![entity]);
            }
        }

        let mut entities = self.graph.lookup_entities(label, kind).await?;
        entities.sort_by(|a, b| b.popularity.cmp(&a.popularity));

        debug!("Resolved {} entities for {:?} ({:?})", entities.len(), label, kind);
        Ok(entities)
    }

    /// Resolve as `preferred`, then as the opposite concrete type if that
    /// yields nothing.
    pub async fn resolve_with_fallback(
        &self,
        label: &str,
        preferred: ResolveType,
    ) -> Result<Vec<Entity>> {
        let entities = self.resolve(label, preferred).await?;
        if !entities.is_empty() {
            return Ok(entities);
        }

        match preferred.opposite() {
            Some(other) => {
                debug!("No {:?} match for {:?}, trying {:?}", preferred, label, other);
                self.resolve(label, other).await
            }
            None => Ok(entities),
        }
    }
}
