//! Vote tallying.
//!
//! Plurality over the ballots of living voters. A tie at the top is broken
//! uniformly at random among the tied targets; no ballots means no execution.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{EngineError, Result, VoteRejection};
use crate::game::{Player, PlayerId, VoteBallot};
use crate::random::RandomSource;

/// The counted result of a day's vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Ballots per target, ascending by target id.
    pub counts: BTreeMap<PlayerId, usize>,
    pub executed: Option<PlayerId>,
    /// True if `executed` was drawn from several tied targets.
    pub tie_break: bool,
}

/// Checks a single ballot against the current seats.
pub fn validate_ballot(players: &[Player], voter: PlayerId, target: PlayerId) -> Result<()> {
    let reject = |reason| EngineError::InvalidVote {
        voter,
        target,
        reason,
    };
    let (Some(v), Some(t)) = (players.get(voter), players.get(target)) else {
        return Err(reject(VoteRejection::UnknownPlayer));
    };
    if !v.alive {
        return Err(reject(VoteRejection::DeadVoter));
    }
    if !t.alive {
        return Err(reject(VoteRejection::DeadTarget));
    }
    if voter == target {
        return Err(reject(VoteRejection::SelfVote));
    }
    Ok(())
}

/// Counts ballots per target, ignoring ballots whose voter has since died.
pub fn count_ballots(players: &[Player], ballots: &VoteBallot) -> BTreeMap<PlayerId, usize> {
    let mut counts = BTreeMap::new();
    for (&voter, &target) in ballots {
        if players.get(voter).is_some_and(|p| p.alive) {
            *counts.entry(target).or_insert(0) += 1;
        }
    }
    counts
}

/// Counts the ballots and picks who is executed.
pub fn tally<R: RandomSource>(players: &[Player], ballots: &VoteBallot, rng: &mut R) -> Tally {
    let counts = count_ballots(players, ballots);
    let Some(&max) = counts.values().max() else {
        return Tally {
            counts,
            executed: None,
            tie_break: false,
        };
    };

    let leaders: Vec<PlayerId> = counts
        .iter()
        .filter(|(_, &c)| c == max)
        .map(|(&p, _)| p)
        .collect();
    let tie_break = leaders.len() > 1;
    let executed = if tie_break {
        leaders[rng.below(leaders.len())]
    } else {
        leaders[0]
    };

    Tally {
        counts,
        executed: Some(executed),
        tie_break,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RoleKind;
    use crate::random::ScriptedSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn players(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::new(i, RoleKind::Villager)).collect()
    }

    fn ballots(pairs: &[(PlayerId, PlayerId)]) -> VoteBallot {
        pairs.iter().copied().collect()
    }

    #[test]
    fn empty_ballot_executes_nobody() {
        let mut rng = ScriptedSource::default();
        let t = tally(&players(4), &VoteBallot::new(), &mut rng);
        assert_eq!(t.executed, None);
        assert!(t.counts.is_empty());
        assert!(!t.tie_break);
    }

    #[test]
    fn clear_plurality_executes_leader() {
        let mut rng = ScriptedSource::default();
        let t = tally(&players(4), &ballots(&[(1, 0), (2, 0), (0, 3)]), &mut rng);
        assert_eq!(t.executed, Some(0));
        assert_eq!(t.counts.get(&0), Some(&2));
        assert!(!t.tie_break);
    }

    #[test]
    fn tie_draws_among_leaders_only() {
        // A=0, B=1 with two ballots each, C=2 with one.
        let votes = ballots(&[(2, 0), (3, 0), (0, 1), (4, 1), (1, 2)]);
        let table = players(5);

        let mut first = ScriptedSource::new([0]);
        assert_eq!(tally(&table, &votes, &mut first).executed, Some(0));
        let mut second = ScriptedSource::new([1]);
        let t = tally(&table, &votes, &mut second);
        assert_eq!(t.executed, Some(1));
        assert!(t.tie_break);
    }

    #[test]
    fn tie_break_is_roughly_uniform() {
        let votes = ballots(&[(2, 0), (3, 0), (0, 1), (4, 1), (1, 2)]);
        let table = players(5);
        let mut hits = [0usize; 3];
        for seed in 0..2000 {
            let mut rng = StdRng::seed_from_u64(seed);
            let executed = tally(&table, &votes, &mut rng).executed.unwrap();
            hits[executed] += 1;
        }
        assert_eq!(hits[2], 0);
        assert!(hits[0] > 850 && hits[1] > 850, "skewed tie-break: {:?}", hits);
    }

    #[test]
    fn dead_voters_do_not_count() {
        let mut table = players(4);
        table[3].alive = false;
        let counts = count_ballots(&table, &ballots(&[(3, 0), (1, 2)]));
        assert_eq!(counts.get(&0), None);
        assert_eq!(counts.get(&2), Some(&1));
    }

    #[test]
    fn ballot_validation() {
        let mut table = players(4);
        table[3].alive = false;
        let reason = |voter, target| match validate_ballot(&table, voter, target) {
            Err(EngineError::InvalidVote { reason, .. }) => Some(reason),
            _ => None,
        };
        assert_eq!(reason(3, 0), Some(VoteRejection::DeadVoter));
        assert_eq!(reason(0, 3), Some(VoteRejection::DeadTarget));
        assert_eq!(reason(1, 1), Some(VoteRejection::SelfVote));
        assert_eq!(reason(1, 7), Some(VoteRejection::UnknownPlayer));
        assert_eq!(reason(1, 2), None);
    }
}
