use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// An event: one executed activity inside a [`Trace`]
pub struct Event {
    /// Name of the executed activity
    pub activity: String,
    /// Timestamp of the event (if recorded)
    pub timestamp: Option<DateTime<Utc>>,
}

impl Event {
    /// Create a new [`Event`] of the given activity without a timestamp
    pub fn new<S: Into<String>>(activity: S) -> Self {
        Self {
            activity: activity.into(),
            timestamp: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
/// A trace: sequence of [`Event`]s belonging to one case
pub struct Trace {
    /// Case identifier (if recorded)
    pub case_id: Option<String>,
    /// Events of this trace, in execution order
    pub events: Vec<Event>,
}

impl Trace {
    /// Create a new empty [`Trace`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a [`Trace`] from a sequence of activity names
    pub fn from_activities<I, S>(activities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            case_id: None,
            events: activities
                .into_iter()
                .map(|a| Event::new(a.as_ref()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
/// An event log: collection of [`Trace`]s
pub struct EventLog {
    /// Name of the log (if any)
    pub name: Option<String>,
    /// Traces of this log
    pub traces: Vec<Trace>,
}

impl EventLog {
    /// Create a new empty [`EventLog`]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an [`EventLog`] from activity name sequences (one inner sequence per trace)
    pub fn from_activity_traces<I, T, S>(traces: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: None,
            traces: traces.into_iter().map(Trace::from_activities).collect(),
        }
    }

    /// Whether this log contains no events at all
    pub fn is_empty(&self) -> bool {
        self.traces.iter().all(|t| t.events.is_empty())
    }

    /// Total number of events over all traces
    pub fn total_events(&self) -> usize {
        self.traces.iter().map(|t| t.events.len()).sum()
    }

    /// Distinct activity names, in order of first occurrence
    pub fn activities(&self) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut result = Vec::new();
        for trace in &self.traces {
            for event in &trace.events {
                if seen.insert(&event.activity) {
                    result.push(event.activity.clone());
                }
            }
        }
        result
    }

    /// Distinct directly-follows pairs `(a, b)` observed in this log
    pub fn directly_follows_pairs(&self) -> HashSet<(String, String)> {
        let mut pairs = HashSet::new();
        for trace in &self.traces {
            for window in trace.events.windows(2) {
                pairs.insert((window[0].activity.clone(), window[1].activity.clone()));
            }
        }
        pairs
    }

    /// Activities occurring first in at least one trace
    pub fn start_activities(&self) -> HashSet<String> {
        self.traces
            .iter()
            .filter_map(|t| t.events.first())
            .map(|e| e.activity.clone())
            .collect()
    }

    /// Activities occurring last in at least one trace
    pub fn end_activities(&self) -> HashSet<String> {
        self.traces
            .iter()
            .filter_map(|t| t.events.last())
            .map(|e| e.activity.clone())
            .collect()
    }
}
