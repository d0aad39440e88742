//! Rule-based entity extraction from raw utterance text.
//!
//! The extractor is a pure function of its input plus a fixed ruleset:
//! it never reads or writes the Context Store. "Nothing found" is a valid
//! empty result; only malformed input is an error.
//!
//! The ruleset is tuned for short, noisy vendor utterances: trigger
//! phrases mark explicit statements ("I sell ...", "my stall is in ..."),
//! a keyword lexicon canonicalizes business types, landmark prepositions
//! capture nearby reference points, and a cue vocabulary picks up
//! environmental hints.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use thiserror::Error;

use super::{Entity, EntityType};
use crate::domain::context::Provenance;
use crate::domain::foundation::{SessionId, Timestamp};

/// Maximum accepted utterance length (bytes).
pub const MAX_UTTERANCE_LENGTH: usize = 8_192;

/// Confidence attached to trigger-phrase (explicit) statements.
const EXPLICIT_CONFIDENCE: f64 = 0.9;
/// Confidence attached to bare-keyword (inferred) mentions.
const KEYWORD_CONFIDENCE: f64 = 0.55;
/// Confidence attached to captured landmarks.
const LANDMARK_CONFIDENCE: f64 = 0.8;
/// Confidence attached to environmental cues.
const CUE_CONFIDENCE: f64 = 0.6;
/// Confidence attached to explicit operating statements.
const OPERATING_EXPLICIT_CONFIDENCE: f64 = 0.85;
/// Confidence attached to incidental time-of-day mentions.
const OPERATING_INFERRED_CONFIDENCE: f64 = 0.6;
/// Confidence attached to season-only hints (below the fact floor).
const SEASON_HINT_CONFIDENCE: f64 = 0.55;
/// Confidence attached to stated preferences.
const PREFERENCE_CONFIDENCE: f64 = 0.7;
/// Confidence attached to recognized declinations.
const DECLINE_CONFIDENCE: f64 = 0.9;

/// Errors for malformed extractor input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("utterance is empty")]
    EmptyUtterance,

    #[error("utterance too long: {actual} bytes exceeds maximum of {max} bytes")]
    UtteranceTooLong { max: usize, actual: usize },
}

/// A candidate value for one context slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub value: String,
    pub confidence: f64,
    pub provenance: Provenance,
}

impl Candidate {
    fn new(value: impl Into<String>, confidence: f64, provenance: Provenance) -> Self {
        Self {
            value: value.into(),
            confidence: confidence.clamp(0.0, 1.0),
            provenance,
        }
    }
}

/// Location signals pulled out of one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ExtractedLocation {
    pub explicit: Option<String>,
    pub landmarks: BTreeSet<String>,
    pub cues: BTreeSet<String>,
}

impl ExtractedLocation {
    /// Returns true if no location signal was found.
    pub fn is_empty(&self) -> bool {
        self.explicit.is_none() && self.landmarks.is_empty() && self.cues.is_empty()
    }
}

/// Everything extracted from one utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContext {
    pub session_id: SessionId,
    pub business_type: Option<Candidate>,
    pub location: Option<ExtractedLocation>,
    pub operating_conditions: Option<Candidate>,
    pub preferences: Vec<(String, Candidate)>,
    pub entities: Vec<Entity>,
    pub declined: bool,
    pub language: String,
    pub extracted_at: Timestamp,
}

impl ExtractedContext {
    /// Creates an empty result for a session.
    pub fn empty(session_id: SessionId) -> Self {
        Self {
            session_id,
            business_type: None,
            location: None,
            operating_conditions: None,
            preferences: Vec::new(),
            entities: Vec::new(),
            declined: false,
            language: "en".to_string(),
            extracted_at: Timestamp::now(),
        }
    }

    /// Returns true if nothing beyond language was detected.
    pub fn is_empty(&self) -> bool {
        self.business_type.is_none()
            && self.location.as_ref().map_or(true, |l| l.is_empty())
            && self.operating_conditions.is_none()
            && self.preferences.is_empty()
            && self.entities.is_empty()
            && !self.declined
    }
}

/// Sentence-boundary pseudo-token.
const BREAK: &str = "|";

static BUSINESS_LEXICON: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("vegetable", "vegetables"),
        ("vegetables", "vegetables"),
        ("sabzi", "vegetables"),
        ("fruit", "fruits"),
        ("fruits", "fruits"),
        ("tea", "tea"),
        ("chai", "tea"),
        ("flower", "flowers"),
        ("flowers", "flowers"),
        ("fish", "fish"),
        ("grocery", "groceries"),
        ("groceries", "groceries"),
        ("kirana", "groceries"),
        ("snack", "snacks"),
        ("snacks", "snacks"),
        ("samosa", "snacks"),
        ("samosas", "snacks"),
        ("chaat", "snacks"),
        ("cloth", "garments"),
        ("clothes", "garments"),
        ("garment", "garments"),
        ("garments", "garments"),
        ("saree", "garments"),
        ("sarees", "garments"),
        ("tailor", "tailoring"),
        ("tailoring", "tailoring"),
        ("stitching", "tailoring"),
        ("milk", "dairy"),
        ("dairy", "dairy"),
        ("egg", "eggs"),
        ("eggs", "eggs"),
        ("juice", "juice"),
        ("paan", "paan"),
        ("shoes", "footwear"),
        ("chappal", "footwear"),
        ("chappals", "footwear"),
        ("footwear", "footwear"),
        ("utensils", "utensils"),
        ("bangles", "bangles"),
        ("toys", "toys"),
        ("newspapers", "newspapers"),
        ("coconut", "coconuts"),
        ("coconuts", "coconuts"),
    ])
});

static BUSINESS_TRIGGERS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["i", "sell"],
        vec!["we", "sell"],
        vec!["i", "am", "selling"],
        vec!["i", "make"],
        vec!["my", "business", "is"],
        vec!["i", "run", "a"],
        vec!["i", "run"],
        vec!["i", "have", "a"],
    ]
});

static LOCATION_TRIGGERS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["my", "shop", "is", "in"],
        vec!["my", "shop", "is", "at"],
        vec!["my", "stall", "is", "in"],
        vec!["my", "stall", "is", "at"],
        vec!["i", "am", "in"],
        vec!["i'm", "in"],
        vec!["i", "am", "at"],
        vec!["i", "live", "in"],
        vec!["we", "are", "in"],
        vec!["located", "in"],
        vec!["i", "sit", "in"],
        vec!["i", "sit", "at"],
    ]
});

static LANDMARK_PREPOSITIONS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["in", "front", "of"],
        vec!["next", "to"],
        vec!["close", "to"],
        vec!["near"],
        vec!["opposite"],
        vec!["behind"],
        vec!["beside"],
        vec!["outside"],
    ]
});

static ENV_CUES: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["bus", "stand"],
        vec!["market"],
        vec!["bazaar"],
        vec!["mandi"],
        vec!["traffic"],
        vec!["crowd"],
        vec!["crowded"],
        vec!["highway"],
        vec!["school"],
        vec!["college"],
        vec!["temple"],
        vec!["mosque"],
        vec!["office"],
        vec!["hospital"],
        vec!["park"],
        vec!["mall"],
    ]
});

static OPERATING_TRIGGERS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["i", "open"],
        vec!["i", "close"],
        vec!["i", "work"],
        vec!["we", "open"],
        vec!["my", "hours"],
        vec!["open", "from"],
        vec!["i", "start"],
    ]
});

static TIME_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "morning", "mornings", "evening", "evenings", "afternoon", "afternoons", "night",
        "nights", "daily", "weekday", "weekdays", "weekend", "weekends", "monday", "tuesday",
        "wednesday", "thursday", "friday", "saturday", "sunday", "dawn", "dusk",
    ])
});

static SEASON_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "monsoon", "rains", "rainy", "summer", "winter", "festival", "diwali", "holi",
    ])
});

static PREFERENCE_TRIGGERS: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["i", "prefer"],
        vec!["i", "want"],
        vec!["i", "would", "like"],
        vec!["i", "like"],
        vec!["i", "need"],
    ]
});

static DECLINE_PHRASES: Lazy<Vec<Vec<&'static str>>> = Lazy::new(|| {
    vec![
        vec!["don't", "know"],
        vec!["dont", "know"],
        vec!["do", "not", "know"],
        vec!["no", "idea"],
        vec!["not", "sure"],
        vec!["won't", "say"],
        vec!["wont", "say"],
        vec!["rather", "not"],
        vec!["skip", "that"],
        vec!["skip", "this"],
        vec!["skip", "it"],
        vec!["leave", "it"],
        vec!["doesn't", "matter"],
        vec!["does", "not", "matter"],
        vec!["never", "mind"],
    ]
});

static DECLINE_WHOLE: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["no", "skip", "pass", "nahi"]));

static ARTICLES: Lazy<HashSet<&'static str>> =
    Lazy::new(|| HashSet::from(["the", "a", "an", "my", "our", "this", "that", "some"]));

static CAPTURE_STOPS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    HashSet::from([
        "and", "but", "or", "so", "because", "where", "which", "who", "near", "opposite",
        "behind", "beside", "outside", "at", "in", "on", "from", "to", "with", "for", "is",
        "are", "was", "it", "every", "during",
    ])
});

/// Rule-based extractor over a fixed lexicon.
///
/// Stateless and cheap to clone; one instance serves all sessions.
#[derive(Debug, Clone, Default)]
pub struct EntityExtractor;

impl EntityExtractor {
    /// Creates a new extractor with the built-in ruleset.
    pub fn new() -> Self {
        Self
    }

    /// Extracts typed candidate facts from one utterance.
    ///
    /// # Errors
    ///
    /// - `EmptyUtterance` if the text is blank
    /// - `UtteranceTooLong` if the text exceeds [`MAX_UTTERANCE_LENGTH`]
    pub fn extract(
        &self,
        text: &str,
        session_id: &SessionId,
    ) -> Result<ExtractedContext, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyUtterance);
        }
        if text.len() > MAX_UTTERANCE_LENGTH {
            return Err(ExtractionError::UtteranceTooLong {
                max: MAX_UTTERANCE_LENGTH,
                actual: text.len(),
            });
        }

        let tokens = tokenize(text);
        let mut result = ExtractedContext::empty(session_id.clone());
        result.language = detect_language(text);

        self.extract_declination(&tokens, &mut result);
        self.extract_business(&tokens, &mut result);
        self.extract_location(&tokens, &mut result);
        self.extract_operating(&tokens, &mut result);
        self.extract_preferences(&tokens, &mut result);

        Ok(result)
    }

    fn extract_declination(&self, tokens: &[String], result: &mut ExtractedContext) {
        let words: Vec<&str> = tokens.iter().filter(|t| *t != BREAK).map(|t| t.as_str()).collect();
        let matched = if words.len() == 1 && DECLINE_WHOLE.contains(words[0]) {
            Some(words[0].to_string())
        } else {
            DECLINE_PHRASES
                .iter()
                .find(|phrase| find_phrase(tokens, phrase).is_some())
                .map(|phrase| phrase.join(" "))
        };
        if let Some(value) = matched {
            result.declined = true;
            result
                .entities
                .push(Entity::new(EntityType::Declination, value, DECLINE_CONFIDENCE));
        }
    }

    fn extract_business(&self, tokens: &[String], result: &mut ExtractedContext) {
        for trigger in BUSINESS_TRIGGERS.iter() {
            if let Some(after) = find_phrase(tokens, trigger) {
                let captured = capture_after(tokens, after, 3);
                if let Some(canonical) = captured
                    .iter()
                    .find_map(|w| BUSINESS_LEXICON.get(w.as_str()).copied())
                {
                    result.business_type = Some(Candidate::new(
                        canonical,
                        EXPLICIT_CONFIDENCE,
                        Provenance::Explicit,
                    ));
                    result.entities.push(Entity::new(
                        EntityType::BusinessType,
                        canonical,
                        EXPLICIT_CONFIDENCE,
                    ));
                    return;
                }
            }
        }

        // No trigger matched: a bare keyword mention is an inferred hint.
        if let Some(canonical) = tokens
            .iter()
            .find_map(|t| BUSINESS_LEXICON.get(t.as_str()).copied())
        {
            result.business_type = Some(Candidate::new(
                canonical,
                KEYWORD_CONFIDENCE,
                Provenance::Inferred,
            ));
            result.entities.push(Entity::new(
                EntityType::BusinessType,
                canonical,
                KEYWORD_CONFIDENCE,
            ));
        }
    }

    fn extract_location(&self, tokens: &[String], result: &mut ExtractedContext) {
        let mut location = ExtractedLocation::default();

        for trigger in LOCATION_TRIGGERS.iter() {
            if let Some(after) = find_phrase(tokens, trigger) {
                let captured = capture_after(tokens, after, 3);
                if !captured.is_empty() {
                    let place = captured.join(" ");
                    result.entities.push(Entity::new(
                        EntityType::ExplicitLocation,
                        place.clone(),
                        EXPLICIT_CONFIDENCE,
                    ));
                    location.explicit = Some(place);
                    break;
                }
            }
        }

        let mut i = 0;
        while i < tokens.len() {
            let mut advanced = false;
            for prep in LANDMARK_PREPOSITIONS.iter() {
                if phrase_at(tokens, i, prep) {
                    let captured = capture_after(tokens, i + prep.len(), 3);
                    if !captured.is_empty() {
                        let landmark = captured.join(" ");
                        result.entities.push(Entity::new(
                            EntityType::Landmark,
                            landmark.clone(),
                            LANDMARK_CONFIDENCE,
                        ));
                        i += prep.len() + captured.len();
                        location.landmarks.insert(landmark);
                        advanced = true;
                    }
                    break;
                }
            }
            if !advanced {
                i += 1;
            }
        }

        for cue in ENV_CUES.iter() {
            if find_phrase(tokens, cue).is_some() {
                let cue_text = cue.join(" ");
                // a cue that is already part of a captured landmark stays a landmark
                if location.landmarks.iter().any(|l| l.contains(&cue_text)) {
                    continue;
                }
                result.entities.push(Entity::new(
                    EntityType::EnvironmentalCue,
                    cue_text.clone(),
                    CUE_CONFIDENCE,
                ));
                location.cues.insert(cue_text);
            }
        }

        if !location.is_empty() {
            result.location = Some(location);
        }
    }

    fn extract_operating(&self, tokens: &[String], result: &mut ExtractedContext) {
        let mut mentions: Vec<String> = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let t = tokens[i].as_str();
            if TIME_WORDS.contains(t) && !mentions.iter().any(|m| m == t) {
                mentions.push(t.to_string());
            } else if t.chars().all(|c| c.is_ascii_digit())
                && i + 1 < tokens.len()
                && matches!(tokens[i + 1].as_str(), "am" | "pm")
            {
                mentions.push(format!("{}{}", t, tokens[i + 1]));
                i += 1;
            }
            i += 1;
        }

        let seasons: Vec<String> = tokens
            .iter()
            .filter(|t| SEASON_WORDS.contains(t.as_str()))
            .map(|t| t.to_string())
            .collect();

        if mentions.is_empty() {
            // A season-only remark is a hint: it relates to operating
            // conditions but does not pin down actual working hours.
            if let Some(season) = seasons.first() {
                result.entities.push(Entity::new(
                    EntityType::OperatingConditions,
                    season.clone(),
                    SEASON_HINT_CONFIDENCE,
                ));
            }
            return;
        }

        for season in &seasons {
            if !mentions.contains(season) {
                mentions.push(season.clone());
            }
        }
        let value = mentions.join(" ");
        let explicit = OPERATING_TRIGGERS
            .iter()
            .any(|trigger| find_phrase(tokens, trigger).is_some());
        let (confidence, provenance) = if explicit {
            (OPERATING_EXPLICIT_CONFIDENCE, Provenance::Explicit)
        } else {
            (OPERATING_INFERRED_CONFIDENCE, Provenance::Inferred)
        };
        result.operating_conditions = Some(Candidate::new(value.clone(), confidence, provenance));
        result
            .entities
            .push(Entity::new(EntityType::OperatingConditions, value, confidence));
    }

    fn extract_preferences(&self, tokens: &[String], result: &mut ExtractedContext) {
        for trigger in PREFERENCE_TRIGGERS.iter() {
            if let Some(after) = find_phrase(tokens, trigger) {
                let captured = capture_after(tokens, after, 4);
                if !captured.is_empty() {
                    let value = captured.join(" ");
                    result.entities.push(Entity::new(
                        EntityType::Preference,
                        value.clone(),
                        PREFERENCE_CONFIDENCE,
                    ));
                    result.preferences.push((
                        "general".to_string(),
                        Candidate::new(value, PREFERENCE_CONFIDENCE, Provenance::Explicit),
                    ));
                    return;
                }
            }
        }
    }
}

/// Splits text into lowercase word tokens with `|` sentence breaks.
fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    for c in text.to_lowercase().chars() {
        if c.is_alphanumeric() || c == '\'' {
            current.push(c);
        } else {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
            if matches!(c, '.' | ',' | '!' | '?' | ';' | ':') {
                tokens.push(BREAK.to_string());
            }
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

/// Finds `phrase` as a token subsequence; returns the index just past it.
fn find_phrase(tokens: &[String], phrase: &[&str]) -> Option<usize> {
    if phrase.is_empty() || tokens.len() < phrase.len() {
        return None;
    }
    (0..=tokens.len() - phrase.len())
        .find(|&i| phrase_at(tokens, i, phrase))
        .map(|i| i + phrase.len())
}

/// Returns true if `phrase` starts at token index `i`.
fn phrase_at(tokens: &[String], i: usize, phrase: &[&str]) -> bool {
    tokens.len() >= i + phrase.len()
        && phrase.iter().enumerate().all(|(j, w)| tokens[i + j] == *w)
}

/// Captures up to `max_words` content words following `start`.
///
/// Leading articles are stripped; capture stops at sentence breaks and
/// common connective/prepositional stop words.
fn capture_after(tokens: &[String], start: usize, max_words: usize) -> Vec<String> {
    let mut captured = Vec::new();
    let mut i = start;
    while i < tokens.len() && captured.is_empty() && ARTICLES.contains(tokens[i].as_str()) {
        i += 1;
    }
    while i < tokens.len() && captured.len() < max_words {
        let t = tokens[i].as_str();
        if t == BREAK || CAPTURE_STOPS.contains(t) {
            break;
        }
        captured.push(t.to_string());
        i += 1;
    }
    captured
}

/// Script-based language detection.
///
/// Counts characters per Indic script block and returns the dominant
/// script's language code, defaulting to English for Latin text.
fn detect_language(text: &str) -> String {
    let mut counts: HashMap<&'static str, usize> = HashMap::new();
    for c in text.chars() {
        let code = c as u32;
        let lang = match code {
            0x0900..=0x097F => "hi",
            0x0980..=0x09FF => "bn",
            0x0A00..=0x0A7F => "pa",
            0x0A80..=0x0AFF => "gu",
            0x0B80..=0x0BFF => "ta",
            0x0C00..=0x0C7F => "te",
            0x0C80..=0x0CFF => "kn",
            0x0D00..=0x0D7F => "ml",
            _ => continue,
        };
        *counts.entry(lang).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .max_by_key(|(_, n)| *n)
        .map(|(lang, _)| lang.to_string())
        .unwrap_or_else(|| "en".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::DeviceTag;

    fn extract(text: &str) -> ExtractedContext {
        let session_id = SessionId::mint(&DeviceTag::local());
        EntityExtractor::new().extract(text, &session_id).unwrap()
    }

    mod input_validation {
        use super::*;

        #[test]
        fn empty_text_is_an_error() {
            let session_id = SessionId::mint(&DeviceTag::local());
            let result = EntityExtractor::new().extract("   ", &session_id);
            assert_eq!(result, Err(ExtractionError::EmptyUtterance));
        }

        #[test]
        fn oversized_text_is_an_error() {
            let session_id = SessionId::mint(&DeviceTag::local());
            let text = "a".repeat(MAX_UTTERANCE_LENGTH + 1);
            let result = EntityExtractor::new().extract(&text, &session_id);
            assert!(matches!(
                result,
                Err(ExtractionError::UtteranceTooLong { .. })
            ));
        }

        #[test]
        fn nothing_found_is_a_valid_empty_result() {
            let result = extract("the weather is pleasant today");
            assert!(result.business_type.is_none());
            assert!(result.location.is_none());
            assert!(!result.declined);
        }
    }

    mod business_type {
        use super::*;

        #[test]
        fn trigger_phrase_yields_explicit_candidate() {
            let result = extract("I sell vegetables here");
            let candidate = result.business_type.unwrap();
            assert_eq!(candidate.value, "vegetables");
            assert!(candidate.confidence >= 0.7);
            assert_eq!(candidate.provenance, Provenance::Explicit);
        }

        #[test]
        fn lexicon_canonicalizes_synonyms() {
            let result = extract("I sell chai from a cart");
            assert_eq!(result.business_type.unwrap().value, "tea");
        }

        #[test]
        fn bare_keyword_is_an_inferred_hint() {
            let result = extract("the vegetables get spoiled quickly");
            let candidate = result.business_type.unwrap();
            assert_eq!(candidate.value, "vegetables");
            assert_eq!(candidate.provenance, Provenance::Inferred);
            assert!(candidate.confidence < 0.7);
        }

        #[test]
        fn emits_matching_entity() {
            let result = extract("I sell fish");
            assert!(result
                .entities
                .iter()
                .any(|e| e.entity_type == EntityType::BusinessType && e.value == "fish"));
        }
    }

    mod location {
        use super::*;

        #[test]
        fn near_captures_landmark_without_article() {
            let result = extract("I sell vegetables near the railway station");
            let location = result.location.unwrap();
            assert!(location.landmarks.contains("railway station"));
            assert!(location.explicit.is_none());
        }

        #[test]
        fn multiple_landmarks_are_all_captured() {
            let result = extract("my cart stands near the temple, opposite the bus depot");
            let location = result.location.unwrap();
            assert!(location.landmarks.contains("temple"));
            assert!(location.landmarks.contains("bus depot"));
        }

        #[test]
        fn explicit_statement_sets_explicit_location() {
            let result = extract("my stall is in shivaji nagar near the temple");
            let location = result.location.unwrap();
            assert_eq!(location.explicit.as_deref(), Some("shivaji nagar"));
            assert!(location.landmarks.contains("temple"));
        }

        #[test]
        fn cues_are_collected() {
            let result = extract("there is a lot of traffic and a big market here");
            let location = result.location.unwrap();
            assert!(location.cues.contains("traffic"));
            assert!(location.cues.contains("market"));
        }

        #[test]
        fn cue_inside_landmark_is_not_duplicated() {
            let result = extract("I stand near the temple gate");
            let location = result.location.unwrap();
            assert!(location.landmarks.contains("temple gate"));
            assert!(!location.cues.contains("temple"));
        }

        #[test]
        fn landmark_confidence_is_a_fact() {
            let result = extract("near the clock tower");
            let entity = result
                .entities
                .iter()
                .find(|e| e.entity_type == EntityType::Landmark)
                .unwrap();
            assert!(entity.is_fact(0.5));
        }
    }

    mod operating_conditions {
        use super::*;

        #[test]
        fn trigger_with_times_is_explicit() {
            let result = extract("I open in the morning and close at night");
            let candidate = result.operating_conditions.unwrap();
            assert_eq!(candidate.provenance, Provenance::Explicit);
            assert!(candidate.value.contains("morning"));
            assert!(candidate.value.contains("night"));
        }

        #[test]
        fn incidental_time_mention_is_inferred() {
            let result = extract("there are more customers in the evening");
            let candidate = result.operating_conditions.unwrap();
            assert_eq!(candidate.provenance, Provenance::Inferred);
        }

        #[test]
        fn clock_times_are_captured() {
            let result = extract("I open from 6 am to 9 pm daily");
            let candidate = result.operating_conditions.unwrap();
            assert!(candidate.value.contains("6am"));
            assert!(candidate.value.contains("9pm"));
            assert!(candidate.value.contains("daily"));
        }

        #[test]
        fn season_only_mention_is_a_hint_not_a_candidate() {
            let result = extract("the monsoon makes everything slow");
            assert!(result.operating_conditions.is_none());
            let hint = result
                .entities
                .iter()
                .find(|e| e.entity_type == EntityType::OperatingConditions)
                .unwrap();
            assert!(hint.confidence >= 0.5);
            assert!(hint.confidence < 0.6);
        }

        #[test]
        fn season_with_times_joins_the_candidate() {
            let result = extract("I work mornings except during the monsoon");
            let candidate = result.operating_conditions.unwrap();
            assert!(candidate.value.contains("mornings"));
            assert!(candidate.value.contains("monsoon"));
        }
    }

    mod preferences {
        use super::*;

        #[test]
        fn stated_preference_is_captured() {
            let result = extract("I want more regular customers");
            assert_eq!(result.preferences.len(), 1);
            let (key, candidate) = &result.preferences[0];
            assert_eq!(key, "general");
            assert!(candidate.value.contains("regular customers"));
            assert_eq!(candidate.provenance, Provenance::Explicit);
        }
    }

    mod declination {
        use super::*;

        #[test]
        fn phrase_decline_is_detected() {
            let result = extract("I don't know about that");
            assert!(result.declined);
            assert!(result
                .entities
                .iter()
                .any(|e| e.entity_type == EntityType::Declination));
        }

        #[test]
        fn single_word_decline_is_detected() {
            assert!(extract("skip").declined);
            assert!(extract("no").declined);
        }

        #[test]
        fn ordinary_negation_is_not_a_decline() {
            // "no" only counts as a decline when it is the whole utterance
            let result = extract("there is no shade near my stall");
            assert!(!result.declined);
        }
    }

    mod language {
        use super::*;

        #[test]
        fn latin_text_defaults_to_english() {
            assert_eq!(extract("I sell fruits").language, "en");
        }

        #[test]
        fn devanagari_text_detects_hindi() {
            assert_eq!(extract("मैं सब्ज़ी बेचता हूँ").language, "hi");
        }

        #[test]
        fn tamil_text_detects_tamil() {
            assert_eq!(extract("நான் காய்கறி விற்கிறேன்").language, "ta");
        }
    }

    mod scenario {
        use super::*;

        #[test]
        fn vegetables_near_railway_station() {
            let result = extract("I sell vegetables near the railway station");

            let business = result.business_type.as_ref().unwrap();
            assert_eq!(business.value, "vegetables");
            assert!(business.confidence >= 0.7);

            let location = result.location.as_ref().unwrap();
            assert_eq!(location.landmarks.len(), 1);
            assert!(location.landmarks.contains("railway station"));
        }
    }
}
