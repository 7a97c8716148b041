use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use crate::models::domain::{ExperienceLevel, MatchResult, Profile};

/// Attributes of the resolved target, echoed back with its matches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetSummary {
    pub id: String,
    pub name: String,
    pub experience_level: ExperienceLevel,
    pub skills: BTreeSet<String>,
    pub skill_categories: BTreeSet<String>,
    pub interests: BTreeSet<String>,
    pub startup_industries: BTreeSet<String>,
    pub startup_goals: BTreeSet<String>,
}

impl From<Profile> for TargetSummary {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id,
            name: profile.name,
            experience_level: profile.experience_level,
            skills: profile.skills,
            skill_categories: profile.skill_categories,
            interests: profile.interests,
            startup_industries: profile.startup_industries,
            startup_goals: profile.startup_goals,
        }
    }
}

/// Successful match computation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub run_id: String,
    pub target: TargetSummary,
    pub matches: Vec<MatchResult>,
    pub population_size: usize,
    /// False when a time budget cut scoring short
    pub complete: bool,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
