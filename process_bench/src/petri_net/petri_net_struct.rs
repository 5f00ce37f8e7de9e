use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// Place in a Petri net
pub struct Place {
    id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// Transition in a Petri net
pub struct Transition {
    /// Transition label (None if this transition is _silent_)
    pub label: Option<String>,
    id: Uuid,
}

impl Transition {
    /// Whether this transition is silent (i.e., has no label)
    pub fn is_silent(&self) -> bool {
        self.label.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", content = "nodes")]
/// Arc type in a Petri net
pub enum ArcType {
    /// From Place to Transition
    PlaceTransition(Uuid, Uuid),
    /// From Transition to Place
    TransitionPlace(Uuid, Uuid),
}

impl ArcType {
    /// Create new from place to transition
    pub fn place_to_transition(from: PlaceID, to: TransitionID) -> ArcType {
        ArcType::PlaceTransition(from.0, to.0)
    }
    /// Create new from transition to place
    pub fn transition_to_place(from: TransitionID, to: PlaceID) -> ArcType {
        ArcType::TransitionPlace(from.0, to.0)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
/// Arc in a Petri net
///
/// Connecting a transition and a place (or the other way around)
pub struct Arc {
    /// Source and target of Arc
    pub from_to: ArcType,
    /// Weight (i.e., how many tokens this arc moves)
    pub weight: u32,
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Eq, Hash)]
/// Place ID
pub struct PlaceID(pub Uuid);

impl From<&Place> for PlaceID {
    fn from(value: &Place) -> Self {
        PlaceID(value.id)
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize, Eq, Hash)]
/// Transition ID
pub struct TransitionID(pub Uuid);

impl From<&Transition> for TransitionID {
    fn from(value: &Transition) -> Self {
        TransitionID(value.id)
    }
}

/// Marking of a Petri net: assigning [`PlaceID`]s to a number of tokens
pub type Marking = HashMap<PlaceID, u64>;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
///
/// A Petri net of [`Place`]s and [`Transition`]s
///
/// Bipartite graph of [`Place`]s and [`Transition`]s with [`Arc`]s connecting them,
/// as well as initial and final [`Marking`]s
pub struct PetriNet {
    /// Places
    pub places: HashMap<Uuid, Place>,
    /// Transitions
    pub transitions: HashMap<Uuid, Transition>,
    /// Arcs
    pub arcs: Vec<Arc>,
    /// Initial marking
    pub initial_marking: Option<Marking>,
    /// Final markings (any of them are accepted as a final marking)
    pub final_markings: Option<Vec<Marking>>,
}

impl PetriNet {
    /// Create new [`PetriNet`] with no places or transitions
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a place with a generated UUID
    pub fn add_place(&mut self) -> PlaceID {
        let place_id = Uuid::new_v4();
        self.places.insert(place_id, Place { id: place_id });
        PlaceID(place_id)
    }

    /// Add a transition with a label (`None` for a silent transition)
    pub fn add_transition(&mut self, label: Option<String>) -> TransitionID {
        let transition_id = Uuid::new_v4();
        self.transitions.insert(
            transition_id,
            Transition {
                id: transition_id,
                label,
            },
        );
        TransitionID(transition_id)
    }

    /// Add an arc with the given weight (defaults to 1)
    pub fn add_arc(&mut self, from_to: ArcType, weight: Option<u32>) {
        self.arcs.push(Arc {
            from_to,
            weight: weight.unwrap_or(1),
        });
    }

    /// Number of places
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// Number of transitions (visible and silent)
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// Number of arcs
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Number of silent transitions
    pub fn silent_transition_count(&self) -> usize {
        self.transitions.values().filter(|t| t.is_silent()).count()
    }

    /// IDs of all silent transitions
    pub fn silent_transitions(&self) -> Vec<TransitionID> {
        self.transitions
            .values()
            .filter(|t| t.is_silent())
            .map(TransitionID::from)
            .collect()
    }

    /// Whether two (or more) visible transitions share a label
    pub fn contains_duplicate_labels(&self) -> bool {
        let mut seen: HashSet<&str> = HashSet::new();
        self.transitions
            .values()
            .filter_map(|t| t.label.as_deref())
            .any(|label| !seen.insert(label))
    }

    /// Look up a visible transition by its label
    pub fn transition_by_label(&self, label: &str) -> Option<TransitionID> {
        self.transitions
            .values()
            .find(|t| t.label.as_deref() == Some(label))
            .map(TransitionID::from)
    }

    /// Whether this net carries a non-empty initial marking and at least one
    /// non-empty final marking
    ///
    /// Replay-based metrics require both; nets without them cannot be scored.
    pub fn has_valid_markings(&self) -> bool {
        let initial_ok = self
            .initial_marking
            .as_ref()
            .is_some_and(|m| !m.is_empty());
        let final_ok = self
            .final_markings
            .as_ref()
            .is_some_and(|ms| ms.iter().any(|m| !m.is_empty()));
        initial_ok && final_ok
    }

    /// Get the preset of a [`PetriNet`] transition (input places with arc weights)
    pub fn preset_of_transition(&self, t: TransitionID) -> Vec<(PlaceID, u32)> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::PlaceTransition(from, to) if to == t.0 => {
                    Some((PlaceID(from), x.weight))
                }
                _ => None,
            })
            .collect()
    }

    /// Get the postset of a [`PetriNet`] transition (output places with arc weights)
    pub fn postset_of_transition(&self, t: TransitionID) -> Vec<(PlaceID, u32)> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::TransitionPlace(from, to) if from == t.0 => {
                    Some((PlaceID(to), x.weight))
                }
                _ => None,
            })
            .collect()
    }

    /// Get the preset of a [`PetriNet`] place (input transitions)
    pub fn preset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::TransitionPlace(from, to) if to == p.0 => Some(TransitionID(from)),
                _ => None,
            })
            .collect()
    }

    /// Get the postset of a [`PetriNet`] place (output transitions)
    pub fn postset_of_place(&self, p: PlaceID) -> Vec<TransitionID> {
        self.arcs
            .iter()
            .filter_map(|x: &Arc| match x.from_to {
                ArcType::PlaceTransition(from, to) if from == p.0 => Some(TransitionID(to)),
                _ => None,
            })
            .collect()
    }

    /// Check if place is in the initial marking
    pub fn is_in_initial_marking(&self, p: &PlaceID) -> bool {
        self.initial_marking
            .as_ref()
            .is_some_and(|m| m.contains_key(p))
    }

    /// Check if place is in _any_ final marking
    pub fn is_in_a_final_marking(&self, p: &PlaceID) -> bool {
        self.final_markings
            .as_ref()
            .is_some_and(|ms| ms.iter().any(|m| m.contains_key(p)))
    }

    /// Remove a transition together with all arcs touching it
    pub fn remove_transition(&mut self, t: TransitionID) {
        self.transitions.remove(&t.0);
        self.arcs.retain(|a| match a.from_to {
            ArcType::PlaceTransition(_, to) => to != t.0,
            ArcType::TransitionPlace(from, _) => from != t.0,
        });
    }

    /// Remove a place together with all arcs touching it
    ///
    /// The place is also dropped from the initial and final markings.
    pub fn remove_place(&mut self, p: PlaceID) {
        self.places.remove(&p.0);
        self.arcs.retain(|a| match a.from_to {
            ArcType::PlaceTransition(from, _) => from != p.0,
            ArcType::TransitionPlace(_, to) => to != p.0,
        });
        if let Some(m) = self.initial_marking.as_mut() {
            m.remove(&p);
        }
        if let Some(ms) = self.final_markings.as_mut() {
            for m in ms.iter_mut() {
                m.remove(&p);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn petri_net_structure() {
        let mut net = PetriNet::new();
        let p1 = net.add_place();
        let p2 = net.add_place();
        let t1 = net.add_transition(Some("a".into()));
        let t2 = net.add_transition(None);
        net.add_arc(ArcType::place_to_transition(p1, t1), None);
        net.add_arc(ArcType::transition_to_place(t1, p2), None);
        net.add_arc(ArcType::place_to_transition(p2, t2), None);

        assert_eq!(net.place_count(), 2);
        assert_eq!(net.transition_count(), 2);
        assert_eq!(net.arc_count(), 3);
        assert_eq!(net.silent_transition_count(), 1);
        assert_eq!(net.silent_transitions(), vec![t2]);
        assert!(!net.contains_duplicate_labels());

        assert_eq!(net.preset_of_transition(t1), vec![(p1, 1)]);
        assert_eq!(net.postset_of_transition(t1), vec![(p2, 1)]);
        assert_eq!(net.postset_of_place(p2), vec![t2]);
        assert_eq!(net.preset_of_place(p2), vec![t1]);
        assert_eq!(net.transition_by_label("a"), Some(t1));
        assert_eq!(net.transition_by_label("b"), None);
    }

    #[test]
    fn marking_validity() {
        let mut net = PetriNet::new();
        let p1 = net.add_place();
        let p2 = net.add_place();
        assert!(!net.has_valid_markings());
        net.initial_marking = Some(Marking::from([(p1, 1)]));
        assert!(!net.has_valid_markings());
        net.final_markings = Some(vec![Marking::new()]);
        assert!(!net.has_valid_markings());
        net.final_markings = Some(vec![Marking::from([(p2, 1)])]);
        assert!(net.has_valid_markings());
    }

    #[test]
    fn remove_nodes() {
        let mut net = PetriNet::new();
        let p1 = net.add_place();
        let p2 = net.add_place();
        let t1 = net.add_transition(Some("a".into()));
        net.add_arc(ArcType::place_to_transition(p1, t1), None);
        net.add_arc(ArcType::transition_to_place(t1, p2), None);
        net.initial_marking = Some(Marking::from([(p1, 1)]));

        net.remove_transition(t1);
        assert_eq!(net.transition_count(), 0);
        assert_eq!(net.arc_count(), 0);

        net.remove_place(p1);
        assert_eq!(net.place_count(), 1);
        assert!(net.initial_marking.as_ref().unwrap().is_empty());
    }

    #[test]
    fn duplicate_labels() {
        let mut net = PetriNet::new();
        net.add_transition(Some("a".into()));
        net.add_transition(None);
        net.add_transition(None);
        assert!(!net.contains_duplicate_labels());
        net.add_transition(Some("a".into()));
        assert!(net.contains_duplicate_labels());
    }
}
