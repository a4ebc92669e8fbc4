//! Answers classified commands from the POI catalog

use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::intent::{Intent, IntentClassifier, Landmark, PlaceKind};
use crate::models::{Coordinates, Poi, bearing_to_cardinal};
use crate::poi::{NearbyPoi, ProximityQuery};

const RESTAURANTS_RESPONSE: &str = "I found several restaurants nearby. The closest ones are Joe's Pizza, Cafe Luna, and Green Garden Restaurant.";
const NO_MUSEUMS_RESPONSE: &str = "I couldn't find any museums near your current location.";
const NO_POIS_RESPONSE: &str =
    "I couldn't find any points of interest near your current location.";
const AREA_HISTORY_RESPONSE: &str = "This area has a rich history. It was first settled by Native Americans, and later became an important center for trade and commerce. Many historical events have taken place here over the centuries.";
const FALLBACK_RESPONSE: &str = "I'm not sure how to help with that. You can ask me about nearby attractions, the history of a place, or how to get to a specific location.";

/// Destinations closer than this count as "already there"
const ARRIVAL_THRESHOLD_KM: f64 = 0.05;

/// Most nearby POIs named in a location answer
const MAX_LISTED_NEIGHBOURS: usize = 3;

/// Times Square, the default reference position
pub const DEFAULT_POSITION: Coordinates = Coordinates {
    latitude: 40.7580,
    longitude: -73.9855,
};

/// Answer to one command
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantResponse {
    pub intent: Intent,
    /// Plain text for display or speech synthesis
    pub response_text: String,
    /// POI the answer is about, for follow-up navigation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referenced_poi: Option<Poi>,
}

/// Voice assistant over the POI catalog
#[derive(Debug, Clone)]
pub struct VoiceAssistant {
    proximity: ProximityQuery,
    position: Coordinates,
    search_radius_km: f64,
    processing_delay: Duration,
}

impl VoiceAssistant {
    #[must_use]
    pub fn new(proximity: ProximityQuery) -> Self {
        Self {
            proximity,
            position: DEFAULT_POSITION,
            search_radius_km: ProximityQuery::DEFAULT_RADIUS_KM,
            processing_delay: Duration::ZERO,
        }
    }

    /// Position used when a command does not carry one
    #[must_use]
    pub fn with_position(mut self, position: Coordinates) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_search_radius(mut self, radius_km: f64) -> Self {
        self.search_radius_km = radius_km;
        self
    }

    /// Simulated processing latency awaited before each answer
    #[must_use]
    pub fn with_processing_delay(mut self, delay: Duration) -> Self {
        self.processing_delay = delay;
        self
    }

    #[must_use]
    pub fn position(&self) -> Coordinates {
        self.position
    }

    /// Answer a command relative to the configured position
    pub async fn process(&self, command: &str) -> AssistantResponse {
        self.process_at(command, self.position).await
    }

    /// Answer a command relative to `position`
    #[tracing::instrument(name = "process_command", level = "debug", skip(self))]
    pub async fn process_at(&self, command: &str, position: Coordinates) -> AssistantResponse {
        if !self.processing_delay.is_zero() {
            tokio::time::sleep(self.processing_delay).await;
        }
        self.respond(command, &position)
    }

    /// Classify and answer without the processing delay
    #[must_use]
    pub fn respond(&self, command: &str, position: &Coordinates) -> AssistantResponse {
        let intent = IntentClassifier::classify(command);
        info!("Classified command as {}", intent.category());

        let (response_text, referenced_poi) = match &intent {
            Intent::NearbyQuery { kind } => self.answer_nearby(*kind, position),
            Intent::HistoryQuery { landmark } => self.answer_history(*landmark, command),
            Intent::LocationQuery => self.answer_location(position),
            Intent::NavigationQuery { destination } => {
                self.answer_navigation(destination, position)
            }
            Intent::Unrecognized => (FALLBACK_RESPONSE.to_string(), None),
        };

        AssistantResponse {
            intent,
            response_text,
            referenced_poi,
        }
    }

    fn nearby(&self, position: &Coordinates) -> Vec<NearbyPoi> {
        match self.proximity.within_radius(position, self.search_radius_km) {
            Ok(results) => results,
            Err(e) => {
                warn!("Proximity search failed, answering without results: {}", e);
                Vec::new()
            }
        }
    }

    fn answer_nearby(&self, kind: PlaceKind, position: &Coordinates) -> (String, Option<Poi>) {
        match kind {
            PlaceKind::Restaurant => (RESTAURANTS_RESPONSE.to_string(), None),
            PlaceKind::Museum => {
                let museums: Vec<Poi> = self
                    .nearby(position)
                    .into_iter()
                    .map(|nearby| nearby.poi)
                    .filter(|poi| poi.name.contains("Museum") || poi.description.contains("museum"))
                    .collect();
                match museums.first() {
                    Some(closest) => (
                        format!(
                            "I found {} nearby. The closest one is {}, which is {}.",
                            count_of(museums.len(), "museum", "museums"),
                            closest.name,
                            closest.summary_clause()
                        ),
                        Some(closest.clone()),
                    ),
                    None => (NO_MUSEUMS_RESPONSE.to_string(), None),
                }
            }
            PlaceKind::Any => {
                let nearby = self.nearby(position);
                match nearby.first() {
                    Some(closest) => (
                        format!(
                            "I found {} nearby. The closest one is {}, which is {}.",
                            count_of(nearby.len(), "point of interest", "points of interest"),
                            closest.poi.name,
                            closest.poi.summary_clause()
                        ),
                        Some(closest.poi.clone()),
                    ),
                    None => (NO_POIS_RESPONSE.to_string(), None),
                }
            }
        }
    }

    fn answer_history(&self, landmark: Option<Landmark>, command: &str) -> (String, Option<Poi>) {
        let store = self.proximity.store();

        if let Some(landmark) = landmark {
            let poi = match store.get_by_id(landmark.poi_id()) {
                Ok(poi) => Some(poi.clone()),
                Err(e) => {
                    warn!("Landmark {:?} missing from catalog: {}", landmark, e);
                    None
                }
            };
            return (landmark.history().to_string(), poi);
        }

        match store.find_by_name(command) {
            Some(poi) => {
                debug!("History request resolved to catalog entry {}", poi.id);
                (poi.description.clone(), Some(poi.clone()))
            }
            None => (AREA_HISTORY_RESPONSE.to_string(), None),
        }
    }

    fn answer_location(&self, position: &Coordinates) -> (String, Option<Poi>) {
        let nearby = self.nearby(position);
        let Some((closest, others)) = nearby.split_first() else {
            return (
                format!(
                    "You are currently at {}. I couldn't find any points of interest nearby.",
                    position.format_coordinates()
                ),
                None,
            );
        };

        let mut text = format!(
            "You are currently near {} in {}.",
            closest.poi.name, closest.poi.location
        );
        if !others.is_empty() {
            let names: Vec<&str> = others
                .iter()
                .take(MAX_LISTED_NEIGHBOURS)
                .map(|nearby| nearby.poi.name.as_str())
                .collect();
            text.push_str(&format!(
                " There are several points of interest nearby, including {}.",
                join_names(&names)
            ));
        }
        (text, Some(closest.poi.clone()))
    }

    fn answer_navigation(&self, destination: &str, position: &Coordinates) -> (String, Option<Poi>) {
        let Some(poi) = self.proximity.store().find_by_name(destination) else {
            return (
                format!(
                    "I'll help you navigate to {destination}. Let me find the best route for you."
                ),
                None,
            );
        };

        let target = poi.coordinates();
        if position.distance_km(&target) < ARRIVAL_THRESHOLD_KM {
            return (format!("You're already at {}.", poi.name), Some(poi.clone()));
        }

        let miles = position.distance_miles(&target);
        let direction = bearing_to_cardinal(position.bearing_degrees(&target));
        (
            format!(
                "I'll help you navigate to {}. It's about {:.1} miles {} from your current location.",
                poi.name, miles, direction
            ),
            Some(poi.clone()),
        )
    }
}

fn count_of(n: usize, singular: &str, plural: &str) -> String {
    if n == 1 {
        format!("1 {singular}")
    } else {
        format!("{n} {plural}")
    }
}

/// "A", "A and B", "A, B, and C"
fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::IntentCategory;
    use crate::poi::PoiStore;
    use rstest::rstest;
    use std::sync::Arc;

    fn assistant() -> VoiceAssistant {
        VoiceAssistant::new(ProximityQuery::new(Arc::new(PoiStore::builtin().unwrap())))
    }

    fn referenced_id(response: &AssistantResponse) -> Option<&str> {
        response.referenced_poi.as_ref().map(|poi| poi.id.as_str())
    }

    #[tokio::test]
    async fn test_nearby_museums() {
        let response = assistant().process("what's nearby museums").await;
        assert_eq!(
            response.intent,
            Intent::NearbyQuery {
                kind: PlaceKind::Museum
            }
        );
        assert_eq!(
            response.response_text,
            "I found 1 museum nearby. The closest one is Metropolitan Museum of Art, which is the largest art museum in the United States."
        );
        assert_eq!(referenced_id(&response), Some("4"));
    }

    #[tokio::test]
    async fn test_no_museums_far_away() {
        let london = Coordinates::new(51.5074, -0.1278);
        let response = assistant().process_at("museums near me", london).await;
        assert_eq!(response.response_text, NO_MUSEUMS_RESPONSE);
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test]
    async fn test_nearby_generic() {
        let response = assistant().process("what's nearby?").await;
        assert_eq!(
            response.response_text,
            "I found 4 points of interest nearby. The closest one is Times Square, which is major commercial intersection and tourist destination."
        );
        assert_eq!(referenced_id(&response), Some("5"));
    }

    #[tokio::test]
    async fn test_nearby_restaurants() {
        let response = assistant().process("food near me").await;
        assert_eq!(response.response_text, RESTAURANTS_RESPONSE);
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test]
    async fn test_history_landmarks() {
        let assistant = assistant();

        let empire = assistant.process("Tell me the history of the Empire State").await;
        assert!(empire.response_text.starts_with("The Empire State Building is a 102-story"));
        assert_eq!(referenced_id(&empire), Some("1"));

        let liberty = assistant.process("what about the statue").await;
        assert!(liberty.response_text.contains("gift from the people of France"));
        assert_eq!(referenced_id(&liberty), Some("2"));
    }

    #[tokio::test]
    async fn test_history_of_other_catalog_entry() {
        let response = assistant().process("tell me about central park").await;
        assert_eq!(referenced_id(&response), Some("3"));
        assert!(response.response_text.starts_with("Central Park is an urban park"));
    }

    #[tokio::test]
    async fn test_history_generic() {
        let response = assistant().process("tell me about this neighborhood").await;
        assert_eq!(response.response_text, AREA_HISTORY_RESPONSE);
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test]
    async fn test_history_landmark_missing_from_catalog() {
        let store = PoiStore::new(Vec::new()).unwrap();
        let assistant = VoiceAssistant::new(ProximityQuery::new(Arc::new(store)));
        let response = assistant.process("history of the empire state").await;
        assert_eq!(response.response_text, Landmark::EmpireStateBuilding.history());
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test]
    async fn test_where_am_i() {
        let response = assistant().process("Where am I?").await;
        assert_eq!(
            response.response_text,
            "You are currently near Times Square in Manhattan, New York City, USA. There are several points of interest nearby, including Empire State Building, Metropolitan Museum of Art, and Central Park."
        );
        assert_eq!(referenced_id(&response), Some("5"));
    }

    #[tokio::test]
    async fn test_where_am_i_nowhere_near() {
        let response = assistant()
            .process_at("my location please", Coordinates::new(0.0, 0.0))
            .await;
        assert_eq!(
            response.response_text,
            "You are currently at 0.0000, 0.0000. I couldn't find any points of interest nearby."
        );
    }

    #[tokio::test]
    async fn test_navigation_to_known_landmark() {
        let response = assistant().process("take me to Empire State Building").await;
        assert_eq!(response.intent.category(), IntentCategory::NavigationQuery);
        assert_eq!(
            response.intent,
            Intent::NavigationQuery {
                destination: "empire state building".to_string()
            }
        );
        assert_eq!(
            response.response_text,
            "I'll help you navigate to Empire State Building. It's about 0.7 miles south from your current location."
        );
        assert_eq!(referenced_id(&response), Some("1"));
    }

    #[tokio::test]
    async fn test_navigation_direction() {
        let response = assistant().process("directions to central park").await;
        assert_eq!(
            response.response_text,
            "I'll help you navigate to Central Park. It's about 2.0 miles northeast from your current location."
        );
    }

    #[tokio::test]
    async fn test_navigation_already_there() {
        let response = assistant().process("take me to times square").await;
        assert_eq!(response.response_text, "You're already at Times Square.");
        assert_eq!(referenced_id(&response), Some("5"));
    }

    #[tokio::test]
    async fn test_navigation_unknown_destination() {
        let response = assistant().process("Take me to the Brooklyn Bridge").await;
        assert_eq!(
            response.response_text,
            "I'll help you navigate to the brooklyn bridge. Let me find the best route for you."
        );
        assert!(response.referenced_poi.is_none());
    }

    #[rstest]
    #[case("take me to the metro station", "the metro station")]
    #[case("take me to tate", "tate")]
    #[case("directions to tan", "tan")]
    #[tokio::test]
    async fn test_navigation_keeps_unmatched_destination(
        #[case] command: &str,
        #[case] destination: &str,
    ) {
        let response = assistant().process(command).await;
        assert_eq!(
            response.response_text,
            format!("I'll help you navigate to {destination}. Let me find the best route for you.")
        );
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test]
    async fn test_history_ignores_partial_landmark_words() {
        let response = assistant().process("tell me about the meteor shower").await;
        assert_eq!(response.response_text, AREA_HISTORY_RESPONSE);
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test]
    async fn test_navigation_without_destination() {
        let response = assistant().process("take me to").await;
        assert_eq!(
            response.response_text,
            "I'll help you navigate to your destination. Let me find the best route for you."
        );
    }

    #[tokio::test]
    async fn test_unrecognized() {
        let response = assistant().process("asdkjasd").await;
        assert_eq!(response.intent, Intent::Unrecognized);
        assert_eq!(response.response_text, FALLBACK_RESPONSE);
        assert!(response.referenced_poi.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_processing_delay_is_awaited() {
        let assistant = assistant().with_processing_delay(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();
        let response = assistant.process("asdkjasd").await;
        assert!(started.elapsed() >= Duration::from_millis(1500));
        assert_eq!(response.response_text, FALLBACK_RESPONSE);
    }

    #[test]
    fn test_response_serialization() {
        let response = assistant().respond("asdkjasd", &DEFAULT_POSITION);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["intent"]["category"], "unrecognized");
        assert_eq!(json["responseText"], FALLBACK_RESPONSE);
        assert!(json.get("referencedPoi").is_none());
    }

    #[test]
    fn test_join_names() {
        assert_eq!(join_names(&[]), "");
        assert_eq!(join_names(&["A"]), "A");
        assert_eq!(join_names(&["A", "B"]), "A and B");
        assert_eq!(join_names(&["A", "B", "C"]), "A, B, and C");
    }
}
