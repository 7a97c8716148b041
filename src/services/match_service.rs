use crate::core::{normalize, MatchError, Matcher};
use crate::models::{MatchReport, Profile, WeightConfig};
use crate::services::source::{ProfileSource, StoreError};

/// Outcome of a match computation that reached the storage layer
#[derive(Debug, Clone)]
pub enum MatchOutcome {
    Found(MatchReport),
    NotFound { target_id: String },
}

/// Defaults applied when a caller omits weights or top-N
#[derive(Debug, Clone, Copy)]
pub struct MatchDefaults {
    pub weights: WeightConfig,
    pub top_n: usize,
    pub max_top_n: usize,
}

impl Default for MatchDefaults {
    fn default() -> Self {
        Self {
            weights: WeightConfig::default(),
            top_n: 10,
            max_top_n: 100,
        }
    }
}

/// Drives one matching invocation: fetch, normalize, rank, report
pub struct MatchService<S> {
    source: S,
    matcher: Matcher,
    defaults: MatchDefaults,
}

impl<S: ProfileSource> MatchService<S> {
    pub fn new(source: S, matcher: Matcher, defaults: MatchDefaults) -> Self {
        Self {
            source,
            matcher,
            defaults,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn defaults(&self) -> &MatchDefaults {
        &self.defaults
    }

    /// Compute ranked matches for `target_id`
    ///
    /// The population is fetched fresh on every call. Storage failures are
    /// returned unmodified; an unknown target is a `MatchOutcome::NotFound`.
    pub async fn compute_matches(
        &self,
        target_id: &str,
        weights: Option<WeightConfig>,
        top_n: Option<usize>,
    ) -> Result<MatchOutcome, StoreError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let weights = weights.unwrap_or(self.defaults.weights);
        let top_n = top_n.unwrap_or(self.defaults.top_n).min(self.defaults.max_top_n);

        tracing::info!("[{}] Computing matches for {} (top {})", run_id, target_id, top_n);

        let raw_profiles = self.source.fetch_active_profiles().await.map_err(|e| {
            tracing::error!("[{}] Failed to fetch profiles: {}", run_id, e);
            e
        })?;

        // Every record is normalized; malformed fields degrade instead of dropping the row
        let population: Vec<Profile> = raw_profiles.iter().map(normalize).collect();
        let population_size = population.len();

        tracing::debug!("[{}] Normalized {} profiles", run_id, population_size);

        match self.matcher.rank(target_id, &population, &weights, top_n) {
            Ok(ranking) => {
                tracing::info!(
                    "[{}] Returning {} matches for {} (from {} candidates)",
                    run_id,
                    ranking.matches.len(),
                    target_id,
                    ranking.candidates_scored
                );

                Ok(MatchOutcome::Found(MatchReport {
                    run_id,
                    target: ranking.target.into(),
                    matches: ranking.matches,
                    population_size,
                    complete: ranking.complete,
                }))
            }
            Err(MatchError::TargetNotFound(id)) => {
                tracing::info!("[{}] Target {} not found among {} profiles", run_id, id, population_size);
                Ok(MatchOutcome::NotFound { target_id: id })
            }
        }
    }
}

/// Drop per-factor breakdowns unless the caller asked for them
pub fn strip_breakdown(report: &mut MatchReport) {
    for m in &mut report.matches {
        m.factors = None;
    }
}
