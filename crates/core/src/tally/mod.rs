//! Per-action running counters.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::events::ActionResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionTally {
    pub attempted: u64,
    pub successful: u64,
    pub unsuccessful: u64,
    pub total: u64,
}

impl ActionTally {
    /// Sum of the three named counters. Can be lower than `total` when
    /// events carried an unrecognized result label.
    pub fn classified(&self) -> u64 {
        self.attempted + self.successful + self.unsuccessful
    }
}

/// Action label -> counters. Keys are kept sorted so every export of the
/// table lists actions in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TallyTable {
    actions: BTreeMap<String, ActionTally>,
}

impl TallyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event for `action`.
    ///
    /// A zeroed tally is created the first time an action is seen. The named
    /// counter matching `result` is bumped, if any, and `total` always is.
    pub fn record(&mut self, action: &str, result: &str) {
        let tally = self.actions.entry(action.to_owned()).or_default();

        match ActionResult::classify(result) {
            ActionResult::Successful => tally.successful += 1,
            ActionResult::Unsuccessful => tally.unsuccessful += 1,
            ActionResult::Attempted => tally.attempted += 1,
            ActionResult::Other => {}
        }

        tally.total += 1;
    }

    pub fn get(&self, action: &str) -> Option<&ActionTally> {
        self.actions.get(action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn snapshot(&self) -> TallySnapshot<'_> {
        TallySnapshot {
            actions: &self.actions,
        }
    }
}

/// Read-only view of a [`TallyTable`], handed to the reporter.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct TallySnapshot<'a> {
    actions: &'a BTreeMap<String, ActionTally>,
}

impl<'a> TallySnapshot<'a> {
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ActionTally)> + 'a {
        self.actions.iter().map(|(action, tally)| (action.as_str(), tally))
    }

    pub fn get(&self, action: &str) -> Option<&'a ActionTally> {
        self.actions.get(action)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
