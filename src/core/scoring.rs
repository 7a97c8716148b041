use crate::models::{FactorScores, Profile, WeightConfig};
use std::collections::BTreeSet;

/// Normalization constant for skill complementarity
///
/// Number of skill-category buckets in the domain (Technical, Business,
/// Management, Design). Fixed tuning constant, not derived from the data.
pub const SKILL_CATEGORY_BUCKETS: f64 = 4.0;

/// Largest possible gap between two known experience levels (Senior - Junior)
const MAX_EXPERIENCE_GAP: f64 = 2.0;

/// Calculate the compatibility score of `candidate` for `target`
///
/// Scoring formula:
/// score = (
///     skill_complementarity * 0.30 +     # Disjoint skill sets = higher
///     shared_interests * 0.20 +          # Jaccard of interests
///     shared_industries * 0.15 +         # Jaccard of startup industries
///     goal_alignment * 0.25 +            # Shared goals over average goal count
///     experience_compatibility * 0.10    # Closer experience levels = higher
/// )
///
/// Weights shown are the defaults. No clamping is applied, so the result lies
/// in [0, sum of weights] apart from the unbounded skill factor.
#[inline]
pub fn score(target: &Profile, candidate: &Profile, weights: &WeightConfig) -> f64 {
    score_breakdown(target, candidate, weights).total
}

/// Calculate every factor for a pair along with the weighted total
pub fn score_breakdown(target: &Profile, candidate: &Profile, weights: &WeightConfig) -> FactorScores {
    let skill = skill_complementarity(&target.skills, &candidate.skills);
    let interests = jaccard(&target.interests, &candidate.interests);
    let industries = jaccard(&target.startup_industries, &candidate.startup_industries);
    let goals = goal_alignment(&target.startup_goals, &candidate.startup_goals);
    let experience = experience_compatibility(
        target.experience_level.rank(),
        candidate.experience_level.rank(),
    );

    let total = skill * weights.skill_complementarity
        + interests * weights.shared_interests
        + industries * weights.shared_industries
        + goals * weights.goal_alignment
        + experience * weights.experience_compatibility;

    FactorScores {
        skill_complementarity: skill,
        shared_interests: interests,
        shared_industries: industries,
        goal_alignment: goals,
        experience_compatibility: experience,
        total,
    }
}

/// Skill complementarity: (|A ∪ B| - |A ∩ B|) / SKILL_CATEGORY_BUCKETS
///
/// Rewards disjoint skill sets rather than overlap.
#[inline]
pub fn skill_complementarity(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    (union - intersection) as f64 / SKILL_CATEGORY_BUCKETS
}

/// Jaccard similarity |A ∩ B| / |A ∪ B|, 0 when both sets are empty
#[inline]
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Shared goals divided by the average goal count, 0 when both are empty
#[inline]
pub fn goal_alignment(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let average = (a.len() + b.len()) as f64 / 2.0;
    if average == 0.0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / average
}

/// Experience compatibility: 1 for equal levels, 0.5 one apart, 0 two apart
///
/// Unknown levels (0) contribute nothing. The weight is not redistributed,
/// so profiles missing experience data score lower.
#[inline]
pub fn experience_compatibility(level_a: u8, level_b: u8) -> f64 {
    if level_a == 0 || level_b == 0 {
        return 0.0;
    }
    let gap = (level_a as f64 - level_b as f64).abs();
    (1.0 - gap / MAX_EXPERIENCE_GAP).max(0.0)
}
