//! Point of interest model

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// A named real-world place with its audio-guide text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poi {
    /// Stable identifier, unique within a catalog
    pub id: String,
    pub name: String,
    /// Human-readable place, e.g. "New York City, USA"
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    /// One-line summary
    pub short_description: String,
    /// Long-form text used as the audio-guide source
    pub description: String,
    pub image_url: String,
}

impl Poi {
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Short description phrased to follow "which is ..."
    #[must_use]
    pub fn summary_clause(&self) -> String {
        let mut chars = self.short_description.chars();
        match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl Display for Poi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} [{}]", self.name, self.id)?;
        writeln!(
            f,
            "   📍 {} ({})",
            self.location,
            self.coordinates().format_coordinates()
        )?;
        if !self.short_description.is_empty() {
            writeln!(f, "   ℹ️ {}", self.short_description)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Poi {
        Poi {
            id: "5".to_string(),
            name: "Times Square".to_string(),
            location: "Manhattan, New York City, USA".to_string(),
            latitude: 40.7580,
            longitude: -73.9855,
            short_description: "Major commercial intersection and tourist destination".to_string(),
            description: "Times Square is a major commercial intersection.".to_string(),
            image_url: "https://images.pexels.com/photos/5155784/pexels-photo-5155784.jpeg"
                .to_string(),
        }
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(
            json["shortDescription"],
            "Major commercial intersection and tourist destination"
        );
        assert!(json.get("imageUrl").is_some());
        assert!(json.get("short_description").is_none());
    }

    #[test]
    fn test_display() {
        let text = sample().to_string();
        assert!(text.starts_with("Times Square [5]\n"));
        assert!(text.contains("40.7580, -73.9855"));
    }

    #[test]
    fn test_summary_clause_lowercases_first_letter() {
        assert_eq!(
            sample().summary_clause(),
            "major commercial intersection and tourist destination"
        );
    }
}
