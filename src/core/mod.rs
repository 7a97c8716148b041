// Core algorithm exports
pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use matcher::{Matcher, MatchError, RankOptions, Ranking};
pub use normalize::normalize;
pub use scoring::{score, score_breakdown, SKILL_CATEGORY_BUCKETS};
