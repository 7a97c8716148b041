use crate::core::scoring::score_breakdown;
use crate::models::{MatchResult, Profile, WeightConfig};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Errors surfaced by the ranking stage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("Target not found: {0}")]
    TargetNotFound(String),
}

/// Result of ranking one target against a population
#[derive(Debug, Clone)]
pub struct Ranking {
    pub target: Profile,
    pub matches: Vec<MatchResult>,
    /// Candidates actually scored (population minus the target, unless cut short)
    pub candidates_scored: usize,
    /// False when the time budget expired before every candidate was scored
    pub complete: bool,
}

/// Execution options for the ranker
#[derive(Debug, Clone, Copy)]
pub struct RankOptions {
    /// Score candidates on the rayon pool once there are at least this many
    pub parallel_threshold: Option<usize>,
    /// Stop scoring new candidates once this much time has passed
    pub time_budget: Option<Duration>,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: Some(2_000),
            time_budget: None,
        }
    }
}

/// Ranks a population against one target profile
///
/// # Pipeline Stages
/// 1. Resolve the target by id
/// 2. Score every other profile with the pairwise scorer
/// 3. Sort by score (descending), ties by candidate id (ascending)
/// 4. Truncate to top-N
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    options: RankOptions,
}

impl Matcher {
    pub fn new(options: RankOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Rank `population` for the profile identified by `target_id`
    ///
    /// # Arguments
    /// * `target_id` - Id of the profile to find matches for
    /// * `population` - Normalized snapshot, target included
    /// * `weights` - Factor weights for the pairwise score
    /// * `top_n` - Maximum number of matches to return
    ///
    /// # Returns
    /// The resolved target with its ranked matches, or
    /// `MatchError::TargetNotFound` when the id is absent.
    pub fn rank(
        &self,
        target_id: &str,
        population: &[Profile],
        weights: &WeightConfig,
        top_n: usize,
    ) -> Result<Ranking, MatchError> {
        let target = population
            .iter()
            .find(|p| p.id == target_id)
            .ok_or_else(|| MatchError::TargetNotFound(target_id.to_string()))?;

        let candidates: Vec<&Profile> = population.iter().filter(|p| p.id != target_id).collect();
        let deadline = self.options.time_budget.map(|budget| Instant::now() + budget);

        let evaluate = |candidate: &&Profile| -> Option<MatchResult> {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                return None;
            }
            let factors = score_breakdown(target, candidate, weights);
            Some(MatchResult {
                id: candidate.id.clone(),
                name: candidate.name.clone(),
                score: factors.total,
                factors: Some(factors),
            })
        };

        let parallel = self
            .options
            .parallel_threshold
            .is_some_and(|threshold| candidates.len() >= threshold);

        let mut matches: Vec<MatchResult> = if parallel {
            candidates.par_iter().filter_map(evaluate).collect()
        } else {
            // Sequential scoring stops at the first expired check
            candidates.iter().map_while(evaluate).collect()
        };

        let candidates_scored = matches.len();
        let complete = candidates_scored == candidates.len();
        if !complete {
            tracing::warn!(
                "Time budget expired for {}: scored {} of {} candidates",
                target_id,
                candidates_scored,
                candidates.len()
            );
        }

        sort_matches(&mut matches);
        matches.truncate(top_n);

        Ok(Ranking {
            target: target.clone(),
            matches,
            candidates_scored,
            complete,
        })
    }
}

/// Sort by score (descending), then by candidate id (ascending)
pub fn sort_matches(matches: &mut [MatchResult]) {
    matches.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
}
