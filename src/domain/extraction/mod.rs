//! Entity extraction - turning raw utterance text into typed facts.
//!
//! Leaf component: depends on nothing above the foundation layer and
//! never touches the Context Store.

mod entity;
mod extractor;

pub use entity::{Entity, EntityType};
pub use extractor::{
    Candidate, EntityExtractor, ExtractedContext, ExtractedLocation, ExtractionError,
    MAX_UTTERANCE_LENGTH,
};
