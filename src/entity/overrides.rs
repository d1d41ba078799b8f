//! Curated club identifiers.
//!
//! The generic label query is unreliable for short or ambiguous club names
//! ("Inter", "Milan"), so well-known clubs resolve straight from this table.

use super::{Entity, EntityType, MAX_POPULARITY};

const CLUB_OVERRIDES: &[(&str, &str)] = &[
    ("barcelona", "Q7156"),
    ("fc barcelona", "Q7156"),
    ("real madrid", "Q8682"),
    ("manchester united", "Q18656"),
    ("man united", "Q18656"),
    ("chelsea", "Q9616"),
    ("arsenal", "Q9617"),
    ("liverpool", "Q1130849"),
    ("bayern munich", "Q15789"),
    ("bayern", "Q15789"),
    ("juventus", "Q1385804"),
    ("juve", "Q1385804"),
    ("milan", "Q1543"),
    ("ac milan", "Q1543"),
    ("inter milan", "Q631"),
    ("inter", "Q631"),
    ("psg", "Q483020"),
    ("paris saint-germain", "Q483020"),
    ("manchester city", "Q50602"),
    ("man city", "Q50602"),
    ("tottenham", "Q18741"),
    ("atletico madrid", "Q8701"),
    ("atletico", "Q8701"),
    ("borussia dortmund", "Q41420"),
    ("dortmund", "Q41420"),
];

/// Identifier for a curated club label, matched after trimming and lowercasing
pub fn club_override_id(label: &str) -> Option<&'static str> {
    let normalized = label.trim().to_lowercase();
    CLUB_OVERRIDES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, id)| *id)
}

/// Synthetic entity for a curated club, keeping the caller's label
pub fn club_override(label: &str) -> Option<Entity> {
    club_override_id(label)
        .map(|id| Entity::new(id, label.trim(), EntityType::Club, MAX_POPULARITY))
}
