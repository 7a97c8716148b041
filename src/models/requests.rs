use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::WeightOverrides;

/// Request to compute matches for a target profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ComputeMatchesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[validate(nested)]
    #[serde(default)]
    pub weights: Option<WeightOverrides>,
    #[serde(default, alias = "top_n", rename = "topN")]
    pub top_n: Option<usize>,
    #[serde(default, alias = "include_breakdown", rename = "includeBreakdown")]
    pub include_breakdown: bool,
}

/// Query parameters for `GET /matches/{user_id}`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchesQuery {
    #[serde(default, alias = "top_n", rename = "topN")]
    pub top_n: Option<usize>,
    #[serde(default, alias = "include_breakdown", rename = "includeBreakdown")]
    pub include_breakdown: bool,
}
