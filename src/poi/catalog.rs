//! POI catalog
//!
//! The catalog owns every point of interest and answers lookups by
//! identifier or by free-text name. It is built once and never mutated.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::models::Poi;
use crate::{Result, TourGuideError};

const BUILTIN_LANDMARKS: &str = include_str!("landmarks.json");

/// Spoken names that refer to a builtin landmark, most specific first
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("empire state", "1"),
    ("statue of liberty", "2"),
    ("lady liberty", "2"),
    ("liberty island", "2"),
    ("central park", "3"),
    ("metropolitan museum", "4"),
    ("the met", "4"),
    ("times square", "5"),
];

/// Read-only catalog of points of interest
#[derive(Debug, Clone)]
pub struct PoiStore {
    pois: Vec<Poi>,
    index: HashMap<String, usize>,
    aliases: Vec<(String, String)>,
}

impl PoiStore {
    /// Build a catalog, rejecting duplicate identifiers
    pub fn new(pois: Vec<Poi>) -> Result<Self> {
        let mut index = HashMap::with_capacity(pois.len());
        for (position, poi) in pois.iter().enumerate() {
            if index.insert(poi.id.clone(), position).is_some() {
                return Err(TourGuideError::validation(format!(
                    "duplicate point of interest id '{}'",
                    poi.id
                )));
            }
        }

        Ok(Self {
            pois,
            index,
            aliases: Vec::new(),
        })
    }

    /// The New York landmarks shipped with the application
    pub fn builtin() -> Result<Self> {
        let pois: Vec<Poi> = serde_json::from_str(BUILTIN_LANDMARKS)?;
        let store = Self::new(pois)?.with_aliases(
            BUILTIN_ALIASES
                .iter()
                .map(|(alias, id)| ((*alias).to_string(), (*id).to_string())),
        );
        debug!("Loaded {} builtin points of interest", store.len());
        Ok(store)
    }

    /// Load a catalog from a JSON array of POIs
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading points of interest from: {:?}", path);

        let content = fs::read_to_string(path)?;
        let pois: Vec<Poi> = serde_json::from_str(&content)?;
        let store = Self::new(pois)?;

        info!("Loaded {} points of interest", store.len());
        Ok(store)
    }

    /// Attach spoken aliases (`alias`, `poi id`) used by [`PoiStore::find_by_name`]
    #[must_use]
    pub fn with_aliases<I>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.aliases
            .extend(aliases.into_iter().map(|(alias, id)| (alias.to_lowercase(), id)));
        self
    }

    /// Look up a POI by identifier
    pub fn get_by_id(&self, id: &str) -> Result<&Poi> {
        self.index
            .get(id)
            .map(|&position| &self.pois[position])
            .ok_or_else(|| TourGuideError::not_found(id))
    }

    /// The full catalog in insertion order
    #[must_use]
    pub fn get_all(&self) -> &[Poi] {
        &self.pois
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pois.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pois.is_empty()
    }

    /// Resolve free text such as "the empire state building" to a POI.
    ///
    /// Tries an exact name match, then the longest catalog name mentioned in
    /// the text, then the alias table, and finally a catalog name that starts
    /// a run of words with the text. Every step compares whole words, so
    /// "the metro" does not resolve to "the met".
    #[must_use]
    pub fn find_by_name(&self, text: &str) -> Option<&Poi> {
        let needle = words(text);
        if needle.is_empty() {
            return None;
        }

        if let Some(poi) = self.pois.iter().find(|p| words(&p.name) == needle) {
            return Some(poi);
        }

        let mentioned = self
            .pois
            .iter()
            .filter(|p| contains_run(&needle, &words(&p.name)))
            .max_by_key(|p| p.name.len());
        if mentioned.is_some() {
            return mentioned;
        }

        let aliased = self
            .aliases
            .iter()
            .filter(|(alias, _)| contains_run(&needle, &words(alias)))
            .find_map(|(_, id)| self.get_by_id(id).ok());
        if aliased.is_some() {
            return aliased;
        }

        if needle.concat().len() < 3 {
            return None;
        }
        self.pois
            .iter()
            .find(|p| starts_run(&words(&p.name), &needle))
    }
}

/// Lowercased alphanumeric words of `text`
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Whether `phrase` appears in `haystack` as consecutive whole words
fn contains_run(haystack: &[String], phrase: &[String]) -> bool {
    !phrase.is_empty() && haystack.windows(phrase.len()).any(|window| window == phrase)
}

/// Whether `prefix` matches consecutive words of `name`, the last one possibly cut short
fn starts_run(name: &[String], prefix: &[String]) -> bool {
    let Some((last, whole)) = prefix.split_last() else {
        return false;
    };
    name.windows(prefix.len()).any(|window| {
        window[..whole.len()] == *whole && window[whole.len()].starts_with(last.as_str())
    })
}
