//! Rule-based intent classification
//!
//! Classification walks [`RULES`] in order and the first rule with a matching
//! keyword wins, so the table order is the category precedence.

use std::fmt;

use serde::Serialize;

const DESTINATION_PLACEHOLDER: &str = "your destination";

/// Coarse purpose of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IntentCategory {
    NearbyQuery,
    HistoryQuery,
    LocationQuery,
    NavigationQuery,
    Unrecognized,
}

impl IntentCategory {
    /// Order in which categories are tested; `Unrecognized` is the default
    pub const PRECEDENCE: [IntentCategory; 5] = [
        IntentCategory::NearbyQuery,
        IntentCategory::HistoryQuery,
        IntentCategory::LocationQuery,
        IntentCategory::NavigationQuery,
        IntentCategory::Unrecognized,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::NearbyQuery => "nearby-query",
            IntentCategory::HistoryQuery => "history-query",
            IntentCategory::LocationQuery => "location-query",
            IntentCategory::NavigationQuery => "navigation-query",
            IntentCategory::Unrecognized => "unrecognized",
        }
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of place a nearby query asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlaceKind {
    Museum,
    Restaurant,
    Any,
}

/// Landmarks with a dedicated history narrative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Landmark {
    EmpireStateBuilding,
    StatueOfLiberty,
}

impl Landmark {
    /// Catalog identifier of the landmark
    #[must_use]
    pub fn poi_id(&self) -> &'static str {
        match self {
            Landmark::EmpireStateBuilding => "1",
            Landmark::StatueOfLiberty => "2",
        }
    }

    #[must_use]
    pub fn history(&self) -> &'static str {
        match self {
            Landmark::EmpireStateBuilding => {
                "The Empire State Building is a 102-story Art Deco skyscraper in Midtown Manhattan. \
                 It was completed in 1931 and was the world's tallest building until 1970. \
                 It's named after New York's nickname, the Empire State."
            }
            Landmark::StatueOfLiberty => {
                "The Statue of Liberty is a colossal neoclassical sculpture on Liberty Island in New York Harbor. \
                 It was a gift from the people of France, dedicated in 1886. \
                 The statue represents Libertas, the Roman goddess of freedom."
            }
        }
    }
}

/// A classified command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "kebab-case")]
pub enum Intent {
    NearbyQuery { kind: PlaceKind },
    HistoryQuery { landmark: Option<Landmark> },
    LocationQuery,
    NavigationQuery { destination: String },
    Unrecognized,
}

impl Intent {
    #[must_use]
    pub fn category(&self) -> IntentCategory {
        match self {
            Intent::NearbyQuery { .. } => IntentCategory::NearbyQuery,
            Intent::HistoryQuery { .. } => IntentCategory::HistoryQuery,
            Intent::LocationQuery => IntentCategory::LocationQuery,
            Intent::NavigationQuery { .. } => IntentCategory::NavigationQuery,
            Intent::Unrecognized => IntentCategory::Unrecognized,
        }
    }
}

/// One row of the dispatch table
struct IntentRule {
    category: IntentCategory,
    keywords: &'static [&'static str],
    build: fn(&str) -> Intent,
}

impl IntentRule {
    fn matches(&self, normalized: &str) -> bool {
        self.keywords.iter().any(|keyword| normalized.contains(keyword))
    }
}

const RULES: &[IntentRule] = &[
    IntentRule {
        category: IntentCategory::NearbyQuery,
        keywords: &["nearby", "near me"],
        build: nearby_intent,
    },
    IntentRule {
        category: IntentCategory::HistoryQuery,
        keywords: &["history", "about"],
        build: history_intent,
    },
    IntentRule {
        category: IntentCategory::LocationQuery,
        keywords: &["where am i", "my location"],
        build: location_intent,
    },
    IntentRule {
        category: IntentCategory::NavigationQuery,
        keywords: &["take me to", "directions to"],
        build: navigation_intent,
    },
];

const PLACE_KINDS: &[(&[&str], PlaceKind)] = &[
    (&["museum"], PlaceKind::Museum),
    (&["restaurant", "food"], PlaceKind::Restaurant),
];

const LANDMARKS: &[(&[&str], Landmark)] = &[
    (&["empire state", "empire"], Landmark::EmpireStateBuilding),
    (&["liberty", "statue"], Landmark::StatueOfLiberty),
];

const DESTINATION_PREFIXES: &[&str] = &["take me to ", "directions to "];

fn first_keyword_match<T: Copy>(table: &[(&[&str], T)], normalized: &str) -> Option<T> {
    table
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(_, value)| *value)
}

fn nearby_intent(normalized: &str) -> Intent {
    Intent::NearbyQuery {
        kind: first_keyword_match(PLACE_KINDS, normalized).unwrap_or(PlaceKind::Any),
    }
}

fn history_intent(normalized: &str) -> Intent {
    Intent::HistoryQuery {
        landmark: first_keyword_match(LANDMARKS, normalized),
    }
}

fn location_intent(_normalized: &str) -> Intent {
    Intent::LocationQuery
}

fn navigation_intent(normalized: &str) -> Intent {
    Intent::NavigationQuery {
        destination: extract_destination(normalized)
            .unwrap_or(DESTINATION_PLACEHOLDER)
            .to_string(),
    }
}

/// Text following the first navigation phrase, up to the end of the line
fn extract_destination(normalized: &str) -> Option<&str> {
    DESTINATION_PREFIXES.iter().find_map(|prefix| {
        let start = normalized.find(prefix)? + prefix.len();
        let destination = normalized[start..].lines().next()?.trim();
        (!destination.is_empty()).then_some(destination)
    })
}

/// Keyword classifier over free text
pub struct IntentClassifier;

impl IntentClassifier {
    /// Classify a command. Every input maps to some intent.
    #[must_use]
    pub fn classify(command: &str) -> Intent {
        let normalized = command.trim().to_lowercase();

        RULES
            .iter()
            .find(|rule| rule.matches(&normalized))
            .map_or(Intent::Unrecognized, |rule| (rule.build)(&normalized))
    }

    /// Categories in the order the rule table tests them, ending with the default
    pub fn precedence() -> impl Iterator<Item = IntentCategory> {
        RULES
            .iter()
            .map(|rule| rule.category)
            .chain(std::iter::once(IntentCategory::Unrecognized))
    }
}
