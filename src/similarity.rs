//! String similarity helpers shared by entity ranking and player search.

use crate::entity::Entity;

/// Case-insensitive normalized edit-distance similarity in `[0, 1]`.
///
/// `1.0` means the strings are equal after lowercasing and trimming.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    strsim::normalized_levenshtein(&a, &b)
}

/// Pick the entity whose label is most similar to `label`.
///
/// A single candidate is returned unconditionally. On equal scores the earlier
/// candidate wins, so resolver order (popularity) breaks ties.
pub fn best_match<'a>(label: &str, entities: &'a [Entity]) -> Option<&'a Entity> {
    if entities.len() == 1 {
        return entities.first();
    }

    let mut best: Option<(&Entity, f64)> = None;
    for entity in entities {
        let score = similarity(label, &entity.label);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((entity, score)),
        }
    }
    best.map(|(entity, _)| entity)
}

/// Human-readable tenure, e.g. `2014–2021` or `2022–present`
pub fn format_period(start: Option<i32>, end: Option<i32>) -> String {
    match (start, end) {
        (Some(start), Some(end)) => format!("{}–{}", start, end),
        (Some(start), None) => format!("{}–present", start),
        (None, Some(end)) => format!("unknown–{}", end),
        (None, None) => "unknown period".to_string(),
    }
}
