//! Cofounder Algo - co-founder profile matching service
//!
//! This library provides the matching engine behind the co-founder finder:
//! raw profile records are normalized into attribute sets, scored pairwise
//! against a target with a weighted five-factor formula, and ranked into a
//! top-N list.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, MatchError, RankOptions, Ranking, normalize, score, score_breakdown};
pub use models::{RawProfile, Profile, ExperienceLevel, WeightConfig, MatchResult, MatchReport};
pub use services::{MatchService, MatchOutcome, ProfileSource, StoreError};
