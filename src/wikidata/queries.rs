//! SPARQL query builders.

use crate::entity::{Entity, EntityType, ResolveType};

/// Association football club
const CLUB_CLASS: &str = "Q476028";
/// Country / sovereign state
const COUNTRY_CLASSES: [&str; 2] = ["Q6256", "Q3624078"];
/// Premier League, La Liga, Serie A, Bundesliga, Ligue 1
const TOP_LEAGUES: [&str; 5] = ["Q9448", "Q324867", "Q13394", "Q82595", "Q13394653"];
/// Occupation: association football player
const FOOTBALLER_OCCUPATION: &str = "Q937857";

pub const ENTITY_LOOKUP_LIMIT: usize = 10;
pub const NAME_SEARCH_LIMIT: usize = 20;

/// Escape a value for use inside a double-quoted SPARQL literal
pub fn escape_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// True for plain item ids such as "Q7156"
pub fn is_entity_id(raw: &str) -> bool {
    let mut chars = raw.chars();
    matches!(chars.next(), Some('Q'))
        && raw.len() > 1
        && chars.all(|c| c.is_ascii_digit())
}

fn country_filter() -> String {
    format!(
        "{{ ?entity wdt:P31 wd:{}. }} UNION {{ ?entity wdt:P31 wd:{}. }}",
        COUNTRY_CLASSES[0], COUNTRY_CLASSES[1]
    )
}

fn club_filter() -> String {
    let leagues = TOP_LEAGUES
        .iter()
        .map(|q| format!("wd:{}", q))
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "?entity wdt:P31 wd:{}.\n      ?entity wdt:P118 ?league.\n      VALUES ?league {{ {} }}",
        CLUB_CLASS, leagues
    )
}

/// Label/alias lookup constrained by type, most linked first.
///
/// `Auto` binds `?isCountry` and `?isClub` so results can be typed, and
/// keeps only items that are one or the other.
pub fn entity_lookup(label: &str, kind: ResolveType) -> String {
    let escaped = escape_literal(label);
    let (type_filter, classify) = match kind {
        ResolveType::Country => (country_filter(), String::new()),
        ResolveType::Club => (club_filter(), String::new()),
        ResolveType::Auto | ResolveType::Achievement => (
            String::new(),
            format!(
                "BIND(EXISTS {{ {} }} AS ?isCountry)\n      BIND(EXISTS {{ ?entity wdt:P31 wd:{} }} AS ?isClub)\n      FILTER(?isCountry || ?isClub)",
                country_filter(),
                CLUB_CLASS
            ),
        ),
    };

    format!(
        r#"SELECT DISTINCT ?entity ?entityLabel ?countryLabel ?sitelinks ?isCountry ?isClub WHERE {{
      {{ ?entity rdfs:label "{label}"@en. }} UNION {{ ?entity skos:altLabel "{label}"@en. }}
      {type_filter}
      {classify}
      OPTIONAL {{ ?entity wdt:P17 ?country. }}
      OPTIONAL {{ ?entity wikibase:sitelinks ?sitelinks. }}
      SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
    }}
    ORDER BY DESC(?sitelinks)
    LIMIT {limit}"#,
        label = escaped,
        type_filter = type_filter,
        classify = classify,
        limit = ENTITY_LOOKUP_LIMIT,
    )
}

/// Triple pattern constraining `?player` by one criterion
fn criterion_pattern(entity: &Entity) -> Option<String> {
    match entity.entity_type {
        EntityType::Country => Some(format!("?player wdt:P27 wd:{}.", entity.id)),
        // Past and present clubs, not only the current one
        EntityType::Club => Some(format!("?player p:P54/ps:P54 wd:{}.", entity.id)),
        EntityType::Achievement => None,
    }
}

/// Athletes satisfying both criteria. No limit.
pub fn athletes_matching(a: &Entity, b: &Entity) -> Option<String> {
    if !is_entity_id(&a.id) || !is_entity_id(&b.id) {
        return None;
    }
    let first = criterion_pattern(a)?;
    let second = criterion_pattern(b)?;

    Some(format!(
        r#"SELECT DISTINCT ?player ?playerLabel WHERE {{
      {first}
      {second}
      SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
    }}"#,
        first = first,
        second = second,
    ))
}

pub fn athletes_by_name(name: &str) -> String {
    let escaped = escape_literal(name);
    format!(
        r#"SELECT DISTINCT ?player ?playerLabel ?dob ?pobLabel ?description WHERE {{
      {{ ?player rdfs:label "{name}"@en. }}
      UNION {{ ?player skos:altLabel "{name}"@en. }}
      UNION {{
        ?player rdfs:label ?label.
        FILTER(CONTAINS(LCASE(?label), LCASE("{name}")))
        FILTER(LANG(?label) = "en")
      }}
      ?player wdt:P31 wd:Q5.
      ?player wdt:P106 wd:{occupation}.
      OPTIONAL {{ ?player wdt:P569 ?dob. }}
      OPTIONAL {{ ?player wdt:P19 ?pob. }}
      OPTIONAL {{ ?player schema:description ?description. FILTER(LANG(?description) = "en") }}
      SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
    }}
    LIMIT {limit}"#,
        name = escaped,
        occupation = FOOTBALLER_OCCUPATION,
        limit = NAME_SEARCH_LIMIT,
    )
}

/// Citizenships and team memberships (with start/end qualifiers)
pub fn athlete_details(athlete_id: &str) -> String {
    format!(
        r#"SELECT DISTINCT ?country ?countryLabel ?club ?clubLabel ?startTime ?endTime WHERE {{
      VALUES ?player {{ wd:{id} }}
      OPTIONAL {{ ?player wdt:P27 ?country. }}
      OPTIONAL {{
        ?player p:P54 ?clubStatement.
        ?clubStatement ps:P54 ?club.
        OPTIONAL {{ ?clubStatement pq:P580 ?startTime. }}
        OPTIONAL {{ ?clubStatement pq:P582 ?endTime. }}
      }}
      SERVICE wikibase:label {{ bd:serviceParam wikibase:language "en". }}
    }}"#,
        id = athlete_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_literal() {
        assert_eq!(escape_literal(r#"Club "X""#), r#"Club \"X\""#);
        assert_eq!(escape_literal(r"a\b"), r"a\\b");
    }

    #[test]
    fn test_is_entity_id() {
        assert!(is_entity_id("Q7156"));
        assert!(!is_entity_id("Q"));
        assert!(!is_entity_id("BALLON_DOR"));
        assert!(!is_entity_id("Q1 }"));
    }

    #[test]
    fn test_club_lookup_restricted_to_top_leagues() {
        let query = entity_lookup("Chelsea", ResolveType::Club);
        assert!(query.contains(r#"rdfs:label "Chelsea"@en"#));
        assert!(query.contains("wd:Q476028"));
        assert!(query.contains("wd:Q13394653"));
        assert!(!query.contains("BIND(EXISTS"));
    }

    #[test]
    fn test_auto_lookup_classifies() {
        let query = entity_lookup("Argentina", ResolveType::Auto);
        assert!(query.contains("AS ?isCountry"));
        assert!(query.contains("BIND(EXISTS { ?entity wdt:P31 wd:Q476028 } AS ?isClub)"));
        assert!(query.contains("FILTER(?isCountry || ?isClub)"));
        assert!(!query.contains("wdt:P118"));
    }

    #[test]
    fn test_matching_query_uses_entity_types() {
        let country = Entity::new("Q414", "Argentina", EntityType::Country, 0);
        let club = Entity::new("Q7156", "Barcelona", EntityType::Club, 0);
        let query = athletes_matching(&country, &club).unwrap();
        assert!(query.contains("?player wdt:P27 wd:Q414."));
        assert!(query.contains("?player p:P54/ps:P54 wd:Q7156."));
        assert!(!query.contains("LIMIT"));
    }

    #[test]
    fn test_matching_query_rejects_sentinels() {
        let club = Entity::new("Q7156", "Barcelona", EntityType::Club, 0);
        let award = crate::entity::Achievement::BallonDor.entity();
        assert!(athletes_matching(&club, &award).is_none());
    }
}
