//! Nudge trigger computation and firing bookkeeping
//!
//! Everything here is pure. The caller owns the [`TriggerSet`] and the
//! [`TriggerState`] and feeds in elapsed seconds as the countdown advances.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::NudgeConfig;

/// Strictly ascending, distinct trigger offsets in seconds from the start
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TriggerSet(Vec<u64>);

impl TriggerSet {
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn offsets(&self) -> &[u64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Offsets from a [`TriggerSet`] that have already fired
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerState {
    fired: BTreeSet<u64>,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_fired(&self, offset: u64) -> bool {
        self.fired.contains(&offset)
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Fired offsets in ascending order
    pub fn fired(&self) -> Vec<u64> {
        self.fired.iter().copied().collect()
    }

    pub fn clear(&mut self) {
        self.fired.clear();
    }
}

/// What comes next for a running countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NextTrigger {
    Upcoming { offset: u64, seconds_until: u64 },
    /// Every configured nudge has fired
    AllFired,
    /// Nothing ahead, either because no nudges were configured or because
    /// the remaining ones are due but not yet checked
    NoneUpcoming,
}

/// Lay out trigger offsets for a countdown of `duration_seconds`.
///
/// `Count(n)` splits the countdown into `n + 1` parts and places a nudge on
/// each inner boundary, so no nudge lands on the start or the end.
/// `Percent(p)` yields a single offset. Offsets are floored, sorted and
/// deduplicated, so two nudges never share a second.
pub fn compute_triggers(duration_seconds: u64, config: NudgeConfig) -> TriggerSet {
    let mut offsets: Vec<u64> = match config {
        NudgeConfig::Count(n) => {
            let n = u64::from(n);
            (1..=n).map(|i| duration_seconds * i / (n + 1)).collect()
        }
        NudgeConfig::Percent(p) => vec![duration_seconds * u64::from(p) / 100],
    };

    offsets.sort_unstable();
    offsets.dedup();
    TriggerSet(offsets)
}

/// Fire every offset that `elapsed_seconds` has reached and that has not
/// fired before. Returns the newly fired offsets in ascending order.
///
/// `elapsed_seconds` must not go backwards between calls on the same state.
pub fn check_triggers(set: &TriggerSet, state: &mut TriggerState, elapsed_seconds: u64) -> Vec<u64> {
    let mut newly_fired = Vec::new();
    for offset in set.iter().take_while(|&offset| offset <= elapsed_seconds) {
        if state.fired.insert(offset) {
            newly_fired.push(offset);
        }
    }
    newly_fired
}

/// Find the earliest unfired offset strictly after `elapsed_seconds`
pub fn next_trigger(set: &TriggerSet, state: &TriggerState, elapsed_seconds: u64) -> NextTrigger {
    let upcoming = set
        .iter()
        .find(|&offset| offset > elapsed_seconds && !state.has_fired(offset));

    match upcoming {
        Some(offset) => NextTrigger::Upcoming {
            offset,
            seconds_until: offset - elapsed_seconds,
        },
        None if !set.is_empty() && state.len() == set.len() => NextTrigger::AllFired,
        None => NextTrigger::NoneUpcoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn set(offsets: &[u64]) -> TriggerSet {
        TriggerSet(offsets.to_vec())
    }

    #[test]
    fn count_partitions_into_n_plus_one() {
        let triggers = compute_triggers(600, NudgeConfig::Count(3));
        assert_eq!(triggers.offsets(), &[150, 300, 450]);
    }

    #[test]
    fn percent_yields_single_offset() {
        assert_eq!(compute_triggers(600, NudgeConfig::Percent(50)).offsets(), &[300]);
        assert_eq!(compute_triggers(600, NudgeConfig::Percent(0)).offsets(), &[0]);
        assert_eq!(compute_triggers(600, NudgeConfig::Percent(100)).offsets(), &[600]);
    }

    #[test]
    fn count_floors_uneven_splits() {
        // 125 / 4 = 31.25, 250 / 4 = 62.5, 375 / 4 = 93.75
        assert_eq!(compute_triggers(125, NudgeConfig::Count(3)).offsets(), &[31, 62, 93]);
    }

    #[test]
    fn degenerate_count_is_deduplicated() {
        // floor(2 * i / 6) for i = 1..=5 gives 0, 0, 1, 1, 1
        assert_eq!(compute_triggers(2, NudgeConfig::Count(5)).offsets(), &[0, 1]);
    }

    #[test]
    fn same_elapsed_twice_fires_once() {
        let triggers = set(&[150, 300, 450]);
        let mut state = TriggerState::new();

        assert_eq!(check_triggers(&triggers, &mut state, 150), vec![150]);
        assert!(check_triggers(&triggers, &mut state, 150).is_empty());
        assert_eq!(state.fired(), vec![150]);
    }

    #[test]
    fn jump_fires_whole_batch_in_order() {
        let triggers = set(&[150, 300, 450]);
        let mut state = TriggerState::new();

        assert!(check_triggers(&triggers, &mut state, 0).is_empty());
        assert_eq!(check_triggers(&triggers, &mut state, 450), vec![150, 300, 450]);
        assert!(check_triggers(&triggers, &mut state, 600).is_empty());
    }

    #[test]
    fn zero_offset_fires_on_first_check() {
        let triggers = compute_triggers(600, NudgeConfig::Percent(0));
        let mut state = TriggerState::new();
        assert_eq!(check_triggers(&triggers, &mut state, 1), vec![0]);
    }

    #[test]
    fn next_trigger_walks_the_set() {
        let triggers = set(&[150, 300, 450]);
        let mut state = TriggerState::new();

        assert_eq!(
            next_trigger(&triggers, &state, 0),
            NextTrigger::Upcoming { offset: 150, seconds_until: 150 }
        );

        check_triggers(&triggers, &mut state, 150);
        check_triggers(&triggers, &mut state, 320);
        assert_eq!(
            next_trigger(&triggers, &state, 320),
            NextTrigger::Upcoming { offset: 450, seconds_until: 130 }
        );

        check_triggers(&triggers, &mut state, 450);
        assert_eq!(next_trigger(&triggers, &state, 450), NextTrigger::AllFired);
    }

    #[test]
    fn next_trigger_distinguishes_empty_from_exhausted() {
        let state = TriggerState::new();
        assert_eq!(next_trigger(&TriggerSet::empty(), &state, 0), NextTrigger::NoneUpcoming);

        // Due but not yet checked: nothing upcoming, but not all fired either
        assert_eq!(next_trigger(&set(&[10]), &state, 10), NextTrigger::NoneUpcoming);
    }

    #[test]
    fn clearing_state_rearms_triggers() {
        let triggers = set(&[5]);
        let mut state = TriggerState::new();
        check_triggers(&triggers, &mut state, 5);
        state.clear();
        assert!(state.is_empty());
        assert_eq!(check_triggers(&triggers, &mut state, 5), vec![5]);
    }

    proptest! {
        #[test]
        fn count_yields_n_inner_ascending_offsets(n in 1u32..500, extra in 1u64..20_000) {
            let duration = u64::from(n) + extra;
            let triggers = compute_triggers(duration, NudgeConfig::Count(n));

            prop_assert_eq!(triggers.len(), n as usize);
            prop_assert!(triggers.offsets().windows(2).all(|w| w[0] < w[1]));
            prop_assert!(triggers.iter().all(|o| o > 0 && o < duration));
        }

        #[test]
        fn monotonic_checks_fire_each_offset_exactly_once(
            duration in 1u64..5_000,
            n in 1u32..50,
            steps in proptest::collection::vec(0u64..200, 1..60),
        ) {
            let triggers = compute_triggers(duration, NudgeConfig::Count(n));
            let mut state = TriggerState::new();
            let mut elapsed = 0;
            let mut all_fired = Vec::new();

            for step in steps {
                elapsed += step;
                all_fired.extend(check_triggers(&triggers, &mut state, elapsed));
            }
            all_fired.extend(check_triggers(&triggers, &mut state, duration));

            prop_assert_eq!(all_fired, triggers.offsets().to_vec());
        }
    }
}
