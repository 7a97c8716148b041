// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{RawProfile, Profile, ExperienceLevel, WeightConfig, WeightOverrides, FactorScores, MatchResult};
pub use requests::{ComputeMatchesRequest, MatchesQuery};
pub use responses::{MatchReport, TargetSummary, HealthResponse, ErrorResponse};
