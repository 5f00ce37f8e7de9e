use std::collections::HashMap;

use crate::event_log::event_log_struct::EventLog;
use crate::petri_net::petri_net_struct::{PetriNet, PlaceID, TransitionID};

///
/// Errors that can occur for the input of the token-based replay algorithm
///
#[derive(Debug, Clone)]
pub enum TokenBasedReplayError {
    /// Error if no (non-empty) initial marking is provided
    NoInitialMarking,
    /// Error if no (non-empty) final marking is provided
    NoFinalMarking,
    /// Error if more than one final marking is provided
    TooManyFinalMarkings,
    /// Error if the Petri net contains duplicate labels
    DuplicateLabels,
}

impl std::fmt::Display for TokenBasedReplayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenBasedReplayError::NoInitialMarking => write!(f, "No initial marking"),
            TokenBasedReplayError::NoFinalMarking => write!(f, "No final marking"),
            TokenBasedReplayError::TooManyFinalMarkings => write!(f, "Too many final markings"),
            TokenBasedReplayError::DuplicateLabels => {
                write!(f, "Petri net contains duplicate labels")
            }
        }
    }
}

impl std::error::Error for TokenBasedReplayError {}

///
/// Result from the token-based replay computation
///
#[derive(Debug, Clone, Default)]
pub struct TokenBasedReplayResult {
    /// Produced tokens during token-based replay
    pub produced: u64,
    /// Consumed tokens during token-based replay
    pub consumed: u64,
    /// Missing tokens during token-based replay
    pub missing: u64,
    /// Remaining tokens during token-based replay
    pub remaining: u64,
}

impl TokenBasedReplayResult {
    /// Computes the fitness from the produced, consumed, missing, and remaining tokens
    pub fn compute_fitness(&self) -> f64 {
        if self.consumed == 0 || self.produced == 0 {
            return 1.0;
        }
        let fitness = 0.5 * (1.0 - (self.missing as f64 / self.consumed as f64))
            + 0.5 * (1.0 - (self.remaining as f64 / self.produced as f64));
        fitness.clamp(0.0, 1.0)
    }
}

///
/// Token-based replay of an [`EventLog`] on a [`PetriNet`] with unique labels
///
/// Replays every trace from the initial marking: each event consumes from the
/// preset and produces into the postset of the transition carrying its
/// activity label, counting missing tokens where consumption is not covered.
/// At the end of each trace the final marking is consumed and leftover tokens
/// are counted as remaining. Events with no matching transition and silent
/// transitions (which never fire) both surface as missing/remaining tokens.
///
pub fn token_based_replay(
    petri_net: &PetriNet,
    event_log: &EventLog,
) -> Result<TokenBasedReplayResult, TokenBasedReplayError> {
    if !petri_net
        .initial_marking
        .as_ref()
        .is_some_and(|m| !m.is_empty())
    {
        return Err(TokenBasedReplayError::NoInitialMarking);
    }
    let final_markings = petri_net.final_markings.as_deref().unwrap_or(&[]);
    match final_markings.len() {
        0 => return Err(TokenBasedReplayError::NoFinalMarking),
        1 => {}
        _ => return Err(TokenBasedReplayError::TooManyFinalMarkings),
    }
    if final_markings[0].is_empty() {
        return Err(TokenBasedReplayError::NoFinalMarking);
    }
    if petri_net.contains_duplicate_labels() {
        return Err(TokenBasedReplayError::DuplicateLabels);
    }

    let label_to_transition: HashMap<&str, TransitionID> = petri_net
        .transitions
        .values()
        .filter_map(|t| t.label.as_deref().map(|l| (l, TransitionID::from(t))))
        .collect();
    let presets: HashMap<TransitionID, Vec<(PlaceID, u32)>> = label_to_transition
        .values()
        .map(|t| (*t, petri_net.preset_of_transition(*t)))
        .collect();
    let postsets: HashMap<TransitionID, Vec<(PlaceID, u32)>> = label_to_transition
        .values()
        .map(|t| (*t, petri_net.postset_of_transition(*t)))
        .collect();

    let m_init = petri_net.initial_marking.as_ref().cloned().unwrap_or_default();
    let m_final = final_markings[0].clone();
    let trace_count = event_log.traces.len() as u64;

    let mut result = TokenBasedReplayResult::default();
    result.produced += m_init.values().sum::<u64>() * trace_count;
    result.consumed += m_final.values().sum::<u64>() * trace_count;

    for trace in &event_log.traces {
        let mut marking: HashMap<PlaceID, i64> =
            m_init.iter().map(|(p, c)| (*p, *c as i64)).collect();

        for event in &trace.events {
            let Some(t) = label_to_transition.get(event.activity.as_str()) else {
                // Log move without model counterpart: one uncovered consumption
                result.consumed += 1;
                result.missing += 1;
                continue;
            };
            for (p, w) in &presets[t] {
                let tokens = marking.entry(*p).or_insert(0);
                *tokens -= i64::from(*w);
                result.consumed += u64::from(*w);
                if *tokens < 0 {
                    result.missing += (-*tokens) as u64;
                    *tokens = 0;
                }
            }
            for (p, w) in &postsets[t] {
                *marking.entry(*p).or_insert(0) += i64::from(*w);
                result.produced += u64::from(*w);
            }
        }

        for (p, c) in &m_final {
            let tokens = marking.entry(*p).or_insert(0);
            *tokens -= *c as i64;
            if *tokens < 0 {
                result.missing += (-*tokens) as u64;
                *tokens = 0;
            }
        }
        result.remaining += marking.values().filter(|c| **c > 0).sum::<i64>() as u64;
    }

    Ok(result)
}
