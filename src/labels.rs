//! Labels: a set of descriptive string tags attached to partials and
//! partial-groups (spec §4.8, component C8). Labels carry no semantic
//! effect on rendering; they are forwarded purely for diagnostic or
//! grouping purposes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of non-empty string tags. `BTreeSet` keeps iteration order
/// deterministic for diagnostic output.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Labels(BTreeSet<String>);

impl Labels {
    pub fn new() -> Labels {
        Labels(BTreeSet::new())
    }

    /// Build a label set from an iterable of strings, silently dropping
    /// any empty entries (labels are defined as non-empty strings).
    pub fn from_iter<I: IntoIterator<Item = S>, S: Into<String>>(items: I) -> Labels {
        Labels(items.into_iter().map(Into::into).filter(|s: &String| !s.is_empty()).collect())
    }

    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        if label.is_empty() {
            return false;
        }
        self.0.insert(label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.0.contains(label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A partial's full envelope specification, its absolute start time, and
/// its descriptive labels (spec §4.8). The labels are forwarded verbatim
/// through rendering and never influence a sample value.
#[derive(Debug, Clone, PartialEq)]
pub struct Partial {
    pub envelopes: crate::envelope::PartialEnvelopes,
    pub start_time_seconds: f64,
    pub labels: Labels,
}

impl Partial {
    pub fn new(envelopes: crate::envelope::PartialEnvelopes, start_time_seconds: f64, labels: Labels) -> Partial {
        Partial { envelopes, start_time_seconds, labels }
    }
}

/// A labeled group of partials, rendered and mixed together (spec §4.8's
/// "partial-groups"). Group labels are independent of each member
/// partial's own labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialGroup {
    pub partials: Vec<Partial>,
    pub labels: Labels,
}

impl PartialGroup {
    pub fn new(partials: Vec<Partial>, labels: Labels) -> PartialGroup {
        PartialGroup { partials, labels }
    }

    /// Every label in scope for a member partial: its own labels plus the
    /// group's. Purely descriptive — has no effect on rendering.
    pub fn labels_for(&self, partial: &Partial) -> Labels {
        let mut combined = self.labels.clone();
        for label in partial.labels.iter() {
            combined.insert(label.clone());
        }
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_labels_are_dropped() {
        let labels = Labels::from_iter(vec!["lead", "", "pad"]);
        assert_eq!(labels.len(), 2);
        assert!(labels.contains("lead"));
        assert!(!labels.contains(""));
    }

    #[test]
    fn insert_is_idempotent() {
        let mut labels = Labels::new();
        assert!(labels.insert("bass"));
        assert!(!labels.insert("bass"));
        assert_eq!(labels.len(), 1);
    }

    #[test]
    fn iteration_order_is_deterministic() {
        let labels = Labels::from_iter(vec!["zeta", "alpha", "mid"]);
        let collected: Vec<&String> = labels.iter().collect();
        assert_eq!(collected, vec!["alpha", "mid", "zeta"]);
    }

    fn make_partial(labels: Labels) -> Partial {
        use crate::envelope::{AmplitudeEnvelope, FrequencyEnvelope, PhaseCoordinate, PhaseCoordinates};
        let amp = AmplitudeEnvelope::new(vec![0.4], vec![]).unwrap();
        let freq = FrequencyEnvelope::new(vec![1000.0], vec![]).unwrap();
        let phase = PhaseCoordinates::new(vec![
            PhaseCoordinate::Controlled { time_seconds: 0.0, phase: 0.0 },
            PhaseCoordinate::Natural { time_seconds: 1.0 },
        ])
        .unwrap();
        Partial::new(crate::envelope::PartialEnvelopes::new(amp, freq, phase), 0.0, labels)
    }

    #[test]
    fn group_labels_combine_own_and_member_labels() {
        let group = PartialGroup::new(vec![make_partial(Labels::from_iter(vec!["lead"]))], Labels::from_iter(vec!["bright"]));
        let combined = group.labels_for(&group.partials[0]);
        assert!(combined.contains("lead"));
        assert!(combined.contains("bright"));
    }
}
