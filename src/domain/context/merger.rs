//! Context Merger - deterministic reconciliation of new facts into state.
//!
//! One code path resolves conflicts for both live dialogue turns and
//! server updates applied during sync, so precedence rules cannot drift
//! between the online and offline paths.
//!
//! # Rules
//!
//! - Location: explicit > inferred > unset, regardless of recency; when
//!   two explicit values collide, the most recently produced one wins.
//! - Business type / operating conditions / preferences: last-write-wins
//!   by extraction timestamp, never overwritten by a lower-confidence or
//!   lower-provenance value.
//! - Landmarks and environmental cues: set union, idempotent.
//! - A same-timestamp explicit collision is a logic-bug signal: logged,
//!   resolved by last-explicit-wins, never surfaced as a failure.

use std::fmt;

use tracing::warn;

use super::{ContextField, Provenance, SessionContext, SlotValue, UserProfile};
use crate::domain::extraction::{Candidate, ExtractedContext};
use crate::domain::foundation::Timestamp;

/// Entities below this confidence are hints and never set slots.
const FACT_FLOOR: f64 = 0.5;

/// A same-timestamp explicit collision observed during a merge.
///
/// Should not normally occur given deterministic merge rules; recorded
/// for the log and resolved by last-explicit-wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConflict {
    pub field: String,
    pub existing: String,
    pub incoming: String,
}

impl fmt::Display for MergeConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "merge conflict on {}: '{}' vs '{}'",
            self.field, self.existing, self.incoming
        )
    }
}

/// What a merge changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Fields that received a new or updated value.
    pub updated: Vec<ContextField>,
    /// Fields whose explicit value was replaced by a different explicit
    /// value. The dialogue policy re-gathers these with a confirmation.
    pub contradicted: Vec<ContextField>,
    /// Same-timestamp explicit collisions (logic-bug signals).
    pub conflicts: Vec<MergeConflict>,
}

impl MergeReport {
    /// Returns true if the merge changed anything.
    pub fn has_changes(&self) -> bool {
        !self.updated.is_empty()
    }

    fn note_updated(&mut self, field: ContextField) {
        if !self.updated.contains(&field) {
            self.updated.push(field);
        }
    }

    fn note_contradicted(&mut self, field: ContextField) {
        if !self.contradicted.contains(&field) {
            self.contradicted.push(field);
        }
    }
}

/// Result of merging extracted facts into a session.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub context: SessionContext,
    pub report: MergeReport,
}

/// Deterministic, stateless context merger.
#[derive(Debug, Clone, Default)]
pub struct ContextMerger;

impl ContextMerger {
    /// Creates a new merger.
    pub fn new() -> Self {
        Self
    }

    /// Merges extracted facts into a copy of the existing context.
    ///
    /// The input context is untouched; the caller persists the returned
    /// copy through the Context Store under the per-session lock.
    pub fn merge(&self, existing: &SessionContext, extracted: &ExtractedContext) -> MergeOutcome {
        let mut context = existing.clone();
        let mut report = MergeReport::default();
        let produced_at = extracted.extracted_at;

        if let Some(candidate) = &extracted.business_type {
            Self::merge_slot(
                context.business_type_mut(),
                candidate,
                produced_at,
                ContextField::BusinessType,
                &mut report,
            );
        }

        self.merge_location(&mut context, extracted, produced_at, &mut report);

        if let Some(candidate) = &extracted.operating_conditions {
            Self::merge_slot(
                context.operating_conditions_mut(),
                candidate,
                produced_at,
                ContextField::OperatingConditions,
                &mut report,
            );
        }

        for (key, candidate) in &extracted.preferences {
            if candidate.confidence < FACT_FLOOR {
                continue;
            }
            let preferences = context.preferences_mut();
            let keep_current = preferences.get(key).map_or(false, |current| {
                current.updated_at.is_after(&produced_at)
                    || candidate.confidence < current.confidence
            });
            if !keep_current {
                preferences.insert(
                    key.clone(),
                    SlotValue::new(
                        candidate.value.clone(),
                        candidate.provenance,
                        candidate.confidence,
                        produced_at,
                    ),
                );
            }
        }

        for conflict in &report.conflicts {
            warn!(
                target: "sahayak::context::merger",
                session_id = %existing.session_id(),
                %conflict,
                "resolved by last-explicit-wins"
            );
        }

        MergeOutcome { context, report }
    }

    /// Seeds a fresh session from the user's most recent closed session.
    ///
    /// Only explicit facts carry over; history never does.
    pub fn seed_session(&self, context: &mut SessionContext, previous: &SessionContext) {
        context.seed_from(previous);
    }

    /// Records a detected utterance language on the profile.
    pub fn absorb_language(&self, profile: &mut UserProfile, language: &str) {
        if !language.is_empty() {
            profile.record_language(language);
        }
    }

    /// Folds a server-side profile copy into the local one.
    pub fn merge_profiles(&self, local: &mut UserProfile, remote: &UserProfile) {
        local.absorb_remote(remote);
    }

    fn merge_slot(
        slot: &mut Option<SlotValue>,
        candidate: &Candidate,
        produced_at: Timestamp,
        field: ContextField,
        report: &mut MergeReport,
    ) {
        if candidate.confidence < FACT_FLOOR {
            return;
        }
        let incoming = SlotValue::new(
            candidate.value.clone(),
            candidate.provenance,
            candidate.confidence,
            produced_at,
        );
        let Some(current) = slot.as_mut() else {
            *slot = Some(incoming);
            report.note_updated(field);
            return;
        };
        if current.updated_at.is_after(&produced_at) {
            return;
        }
        if candidate.confidence < current.confidence {
            return;
        }
        if candidate.provenance.rank() < current.provenance.rank() {
            return;
        }
        if current.value == incoming.value {
            // same fact restated; refresh recency only
            current.updated_at = produced_at;
            return;
        }
        let both_explicit = current.provenance == Provenance::Explicit
            && candidate.provenance == Provenance::Explicit;
        if both_explicit {
            if current.updated_at == produced_at {
                report.conflicts.push(MergeConflict {
                    field: field.display_name().to_string(),
                    existing: current.value.clone(),
                    incoming: incoming.value.clone(),
                });
            }
            report.note_contradicted(field);
        }
        *current = incoming;
        report.note_updated(field);
    }

    fn merge_location(
        &self,
        context: &mut SessionContext,
        extracted: &ExtractedContext,
        produced_at: Timestamp,
        report: &mut MergeReport,
    ) {
        let Some(extracted_location) = &extracted.location else {
            return;
        };
        let created_at = *context.created_at();
        let location = context.location_mut();
        let mut changed = false;

        if let Some(incoming) = &extracted_location.explicit {
            match location.explicit().map(str::to_string) {
                None => {
                    location.set_explicit(incoming, produced_at);
                    changed = true;
                }
                Some(current) if current == *incoming => {
                    // restated; keep the fresher production time
                    if location
                        .explicit_at()
                        .map_or(true, |at| produced_at.is_after(at))
                    {
                        location.set_explicit(incoming, produced_at);
                    }
                }
                Some(current) => {
                    let current_at = location.explicit_at().copied().unwrap_or(created_at);
                    if produced_at.is_after(&current_at) {
                        report.note_contradicted(ContextField::Location);
                        location.set_explicit(incoming, produced_at);
                        changed = true;
                    } else if produced_at == current_at {
                        report.conflicts.push(MergeConflict {
                            field: "location".to_string(),
                            existing: current,
                            incoming: incoming.clone(),
                        });
                        report.note_contradicted(ContextField::Location);
                        location.set_explicit(incoming, produced_at);
                        changed = true;
                    }
                    // an older explicit never displaces a newer one
                }
            }
        }

        for landmark in &extracted_location.landmarks {
            changed |= location.add_landmark(landmark.clone());
        }
        for cue in &extracted_location.cues {
            changed |= location.add_cue(cue.clone());
        }
        location.derive_inference();

        if changed {
            report.note_updated(ContextField::Location);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::ExtractedLocation;
    use crate::domain::foundation::{DeviceTag, SessionId, UserId};
    use std::collections::BTreeSet;

    fn test_session() -> SessionContext {
        SessionContext::new(
            SessionId::mint(&DeviceTag::local()),
            UserId::new("vendor-1").unwrap(),
        )
    }

    fn extraction_at(session: &SessionContext, at: Timestamp) -> ExtractedContext {
        let mut extracted = ExtractedContext::empty(session.session_id().clone());
        extracted.extracted_at = at;
        extracted
    }

    fn business(value: &str, confidence: f64, provenance: Provenance) -> Candidate {
        Candidate {
            value: value.to_string(),
            confidence,
            provenance,
        }
    }

    fn explicit_location(place: &str) -> ExtractedLocation {
        ExtractedLocation {
            explicit: Some(place.to_string()),
            landmarks: BTreeSet::new(),
            cues: BTreeSet::new(),
        }
    }

    fn landmarks(names: &[&str]) -> ExtractedLocation {
        ExtractedLocation {
            explicit: None,
            landmarks: names.iter().map(|s| s.to_string()).collect(),
            cues: BTreeSet::new(),
        }
    }

    mod business_type {
        use super::*;

        #[test]
        fn sets_empty_slot() {
            let session = test_session();
            let mut extracted = extraction_at(&session, Timestamp::now());
            extracted.business_type = Some(business("vegetables", 0.9, Provenance::Explicit));

            let outcome = ContextMerger::new().merge(&session, &extracted);

            assert_eq!(outcome.context.business_type().unwrap().value, "vegetables");
            assert!(outcome.report.updated.contains(&ContextField::BusinessType));
        }

        #[test]
        fn hint_below_floor_never_sets_slot() {
            let session = test_session();
            let mut extracted = extraction_at(&session, Timestamp::now());
            extracted.business_type = Some(business("tea", 0.4, Provenance::Inferred));

            let outcome = ContextMerger::new().merge(&session, &extracted);
            assert!(outcome.context.business_type().is_none());
        }

        #[test]
        fn lower_confidence_never_overwrites() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.business_type = Some(business("vegetables", 0.9, Provenance::Explicit));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0.plus_secs(60));
            second.business_type = Some(business("fruits", 0.6, Provenance::Explicit));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert_eq!(outcome.context.business_type().unwrap().value, "vegetables");
            assert!(!outcome.report.contradicted.contains(&ContextField::BusinessType));
        }

        #[test]
        fn newer_equal_confidence_explicit_wins_and_is_contradiction() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.business_type = Some(business("vegetables", 0.9, Provenance::Explicit));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0.plus_secs(60));
            second.business_type = Some(business("fruits", 0.9, Provenance::Explicit));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert_eq!(outcome.context.business_type().unwrap().value, "fruits");
            assert!(outcome.report.contradicted.contains(&ContextField::BusinessType));
        }

        #[test]
        fn inferred_never_downgrades_explicit() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.business_type = Some(business("vegetables", 0.9, Provenance::Explicit));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0.plus_secs(60));
            second.business_type = Some(business("fruits", 0.95, Provenance::Inferred));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert_eq!(outcome.context.business_type().unwrap().value, "vegetables");
        }

        #[test]
        fn restating_the_same_value_refreshes_recency_only() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.business_type = Some(business("tea", 0.9, Provenance::Explicit));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0.plus_secs(60));
            second.business_type = Some(business("tea", 0.9, Provenance::Explicit));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert!(!outcome.report.has_changes());
            assert_eq!(
                outcome.context.business_type().unwrap().updated_at,
                t0.plus_secs(60)
            );
        }

        #[test]
        fn stale_update_loses_to_fresher_slot() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut fresh = extraction_at(&session, t0.plus_secs(120));
            fresh.business_type = Some(business("vegetables", 0.9, Provenance::Explicit));
            let merged = ContextMerger::new().merge(&session, &fresh).context;

            let mut stale = extraction_at(&merged, t0);
            stale.business_type = Some(business("fruits", 0.9, Provenance::Explicit));
            let outcome = ContextMerger::new().merge(&merged, &stale);

            assert_eq!(outcome.context.business_type().unwrap().value, "vegetables");
        }
    }

    mod location {
        use super::*;

        #[test]
        fn explicit_beats_inference_regardless_of_recency() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.location = Some(explicit_location("shivaji nagar"));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0.plus_secs(300));
            second.location = Some(landmarks(&["bus depot"]));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert_eq!(outcome.context.location().resolved(), Some("shivaji nagar"));
            assert!(outcome.context.location().landmarks().contains("bus depot"));
        }

        #[test]
        fn newer_explicit_replaces_older_and_reports_contradiction() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.location = Some(explicit_location("shivaji nagar"));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0.plus_secs(60));
            second.location = Some(explicit_location("kothrud"));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert_eq!(outcome.context.location().explicit(), Some("kothrud"));
            assert!(outcome.report.contradicted.contains(&ContextField::Location));
        }

        #[test]
        fn older_explicit_never_displaces_newer() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut newer = extraction_at(&session, t0.plus_secs(60));
            newer.location = Some(explicit_location("kothrud"));
            let merged = ContextMerger::new().merge(&session, &newer).context;

            let mut older = extraction_at(&merged, t0);
            older.location = Some(explicit_location("shivaji nagar"));
            let outcome = ContextMerger::new().merge(&merged, &older);

            assert_eq!(outcome.context.location().explicit(), Some("kothrud"));
            assert!(outcome.report.conflicts.is_empty());
        }

        #[test]
        fn explicit_commutes_across_merge_order() {
            let t0 = Timestamp::now();
            let session = test_session();

            let mut a = extraction_at(&session, t0);
            a.location = Some(explicit_location("shivaji nagar"));
            let mut b = extraction_at(&session, t0.plus_secs(60));
            b.location = Some(explicit_location("kothrud"));

            let merger = ContextMerger::new();
            let ab = merger.merge(&merger.merge(&session, &a).context, &b).context;
            let ba = merger.merge(&merger.merge(&session, &b).context, &a).context;

            assert_eq!(ab.location().explicit(), ba.location().explicit());
            assert_eq!(ab.location().explicit(), Some("kothrud"));
        }

        #[test]
        fn same_timestamp_explicit_collision_is_conflict_with_fallback() {
            let session = test_session();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.location = Some(explicit_location("shivaji nagar"));
            let merged = ContextMerger::new().merge(&session, &first).context;

            let mut second = extraction_at(&merged, t0);
            second.location = Some(explicit_location("kothrud"));
            let outcome = ContextMerger::new().merge(&merged, &second);

            assert_eq!(outcome.report.conflicts.len(), 1);
            // last-explicit-wins fallback
            assert_eq!(outcome.context.location().explicit(), Some("kothrud"));
        }

        #[test]
        fn landmarks_union_across_merges() {
            let session = test_session();
            let merger = ContextMerger::new();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.location = Some(landmarks(&["railway station"]));
            let step1 = merger.merge(&session, &first).context;

            let mut second = extraction_at(&step1, t0.plus_secs(60));
            second.location = Some(landmarks(&["railway station", "temple"]));
            let step2 = merger.merge(&step1, &second).context;

            assert_eq!(step2.location().landmarks().len(), 2);
            assert!(step2.location().landmarks().contains("railway station"));
            assert!(step2.location().landmarks().contains("temple"));
        }

        #[test]
        fn reapplying_same_landmark_reports_no_change() {
            let session = test_session();
            let merger = ContextMerger::new();
            let t0 = Timestamp::now();

            let mut first = extraction_at(&session, t0);
            first.location = Some(landmarks(&["temple"]));
            let step1 = merger.merge(&session, &first).context;

            let mut again = extraction_at(&step1, t0.plus_secs(60));
            again.location = Some(landmarks(&["temple"]));
            let outcome = merger.merge(&step1, &again);

            assert!(!outcome.report.has_changes());
            assert_eq!(outcome.context.location().landmarks().len(), 1);
        }
    }

    mod profiles {
        use super::*;

        #[test]
        fn absorb_language_records_on_profile() {
            let mut profile = UserProfile::new(UserId::new("vendor-1").unwrap());
            let merger = ContextMerger::new();
            merger.absorb_language(&mut profile, "hi");
            merger.absorb_language(&mut profile, "");
            assert_eq!(profile.preferred_languages(), ["hi"]);
        }
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn landmark_strategy() -> impl Strategy<Value = Vec<String>> {
            prop::collection::vec("[a-z]{3,10}( [a-z]{3,10})?", 1..6)
        }

        proptest! {
            #[test]
            fn landmark_sets_are_unions_of_all_updates(batches in prop::collection::vec(landmark_strategy(), 1..5)) {
                let session = test_session();
                let merger = ContextMerger::new();
                let t0 = Timestamp::now();

                let mut current = session.clone();
                for (i, batch) in batches.iter().enumerate() {
                    let mut extracted = extraction_at(&current, t0.plus_secs(i as u64 * 10));
                    extracted.location = Some(ExtractedLocation {
                        explicit: None,
                        landmarks: batch.iter().cloned().collect(),
                        cues: BTreeSet::new(),
                    });
                    current = merger.merge(&current, &extracted).context;
                }

                let expected: BTreeSet<String> = batches.into_iter().flatten().collect();
                prop_assert_eq!(current.location().landmarks(), &expected);
            }

            #[test]
            fn explicit_location_survives_any_merge_sequence(
                places in prop::collection::vec("[a-z]{3,12}", 1..5),
                offsets in prop::collection::vec(0u64..1000, 1..5),
            ) {
                let session = test_session();
                let merger = ContextMerger::new();
                let t0 = Timestamp::now();

                let mut current = session.clone();
                for (place, offset) in places.iter().zip(offsets.iter()) {
                    let mut extracted = extraction_at(&current, t0.plus_secs(*offset));
                    extracted.location = Some(explicit_location(place));
                    current = merger.merge(&current, &extracted).context;
                }

                // once any explicit value entered, reads resolve explicitly
                prop_assert!(current.location().explicit().is_some());
                prop_assert_eq!(
                    current.location().resolved(),
                    current.location().explicit()
                );
            }
        }
    }
}
