use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use validator::{Validate, ValidationError};

/// Raw profile record as supplied by a storage collaborator
///
/// Attribute fields are kept as untyped JSON so that comma-separated strings,
/// native lists and JSON-encoded structures all reach the normalizer intact.
/// Numeric ids are accepted and stringified. A `name` or `experience_level`
/// that is not a string is read as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawProfile {
    #[serde(alias = "userId", alias = "user_id", deserialize_with = "id_from_string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Value,
    #[serde(default, alias = "skillCategories")]
    pub skill_categories: Value,
    #[serde(default)]
    pub interests: Value,
    #[serde(default, alias = "startupIndustries")]
    pub startup_industries: Value,
    #[serde(default, alias = "startupGoals")]
    pub startup_goals: Value,
    #[serde(default, alias = "experienceLevel", deserialize_with = "lenient_string")]
    pub experience_level: Option<String>,
}

fn id_from_string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(id) => Ok(id),
        Value::Number(id) => Ok(id.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "profile id must be a string or number, got {}",
            other
        ))),
    }
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Null => None,
        other => {
            tracing::debug!("Ignoring non-string profile field value {}", other);
            None
        }
    })
}

/// Ordered experience enumeration; `Unknown` sits at 0 and is excluded from
/// the experience compatibility factor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExperienceLevel {
    #[default]
    Unknown,
    Junior,
    MidLevel,
    Senior,
}

impl ExperienceLevel {
    /// Numeric level: Junior=1, Mid-level=2, Senior=3, unknown=0
    pub fn rank(self) -> u8 {
        match self {
            ExperienceLevel::Unknown => 0,
            ExperienceLevel::Junior => 1,
            ExperienceLevel::MidLevel => 2,
            ExperienceLevel::Senior => 3,
        }
    }

    pub fn is_known(self) -> bool {
        self != ExperienceLevel::Unknown
    }

    /// Look up a raw label. Matching is case-insensitive and ignores
    /// surrounding whitespace; anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "junior" => ExperienceLevel::Junior,
            "mid-level" => ExperienceLevel::MidLevel,
            "senior" => ExperienceLevel::Senior,
            _ => ExperienceLevel::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExperienceLevel::Unknown => "unknown",
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::MidLevel => "Mid-level",
            ExperienceLevel::Senior => "Senior",
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ExperienceLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?;
        Ok(label.map(|l| Self::from_label(&l)).unwrap_or_default())
    }
}

/// Normalized profile, read-only for the duration of one ranking call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    pub name: String,
    pub skills: BTreeSet<String>,
    pub skill_categories: BTreeSet<String>,
    pub interests: BTreeSet<String>,
    pub startup_industries: BTreeSet<String>,
    pub startup_goals: BTreeSet<String>,
    pub experience_level: ExperienceLevel,
}

/// Per-factor weights for the pairwise score
///
/// Weights are not required to sum to 1. Factors missing from a partial
/// configuration section fall back to the built-in defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
#[validate(schema(function = "validate_finite_weights"))]
pub struct WeightConfig {
    #[validate(range(min = 0.0))]
    pub skill_complementarity: f64,
    #[validate(range(min = 0.0))]
    pub shared_interests: f64,
    #[validate(range(min = 0.0))]
    pub shared_industries: f64,
    #[validate(range(min = 0.0))]
    pub goal_alignment: f64,
    #[validate(range(min = 0.0))]
    pub experience_compatibility: f64,
}

impl WeightConfig {
    pub fn sum(&self) -> f64 {
        self.skill_complementarity
            + self.shared_interests
            + self.shared_industries
            + self.goal_alignment
            + self.experience_compatibility
    }
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            skill_complementarity: 0.30,
            shared_interests: 0.20,
            shared_industries: 0.15,
            goal_alignment: 0.25,
            experience_compatibility: 0.10,
        }
    }
}

fn validate_finite_weights(weights: &WeightConfig) -> Result<(), ValidationError> {
    let all = [
        weights.skill_complementarity,
        weights.shared_interests,
        weights.shared_industries,
        weights.goal_alignment,
        weights.experience_compatibility,
    ];
    // NaN slips through the range checks
    if all.iter().all(|w| w.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::new("non_finite_weight"))
    }
}

/// Caller-supplied weight overrides
///
/// Factors left out keep the value of the base configuration they are
/// applied to, so partial overrides follow the deployment's tuned weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct WeightOverrides {
    #[validate(range(min = 0.0))]
    pub skill_complementarity: Option<f64>,
    #[validate(range(min = 0.0))]
    pub shared_interests: Option<f64>,
    #[validate(range(min = 0.0))]
    pub shared_industries: Option<f64>,
    #[validate(range(min = 0.0))]
    pub goal_alignment: Option<f64>,
    #[validate(range(min = 0.0))]
    pub experience_compatibility: Option<f64>,
}

impl WeightOverrides {
    pub fn apply(&self, base: &WeightConfig) -> WeightConfig {
        WeightConfig {
            skill_complementarity: self.skill_complementarity.unwrap_or(base.skill_complementarity),
            shared_interests: self.shared_interests.unwrap_or(base.shared_interests),
            shared_industries: self.shared_industries.unwrap_or(base.shared_industries),
            goal_alignment: self.goal_alignment.unwrap_or(base.goal_alignment),
            experience_compatibility: self
                .experience_compatibility
                .unwrap_or(base.experience_compatibility),
        }
    }
}

/// Unweighted factor values plus the weighted total for one pair
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScores {
    pub skill_complementarity: f64,
    pub shared_interests: f64,
    pub shared_industries: f64,
    pub goal_alignment: f64,
    pub experience_compatibility: f64,
    pub total: f64,
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub id: String,
    pub name: String,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<FactorScores>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_labels() {
        assert_eq!(ExperienceLevel::from_label("Senior"), ExperienceLevel::Senior);
        assert_eq!(ExperienceLevel::from_label("  mid-level "), ExperienceLevel::MidLevel);
        assert_eq!(ExperienceLevel::from_label("JUNIOR"), ExperienceLevel::Junior);
        assert_eq!(ExperienceLevel::from_label("Principal"), ExperienceLevel::Unknown);
        assert_eq!(ExperienceLevel::from_label(""), ExperienceLevel::Unknown);
        assert_eq!(ExperienceLevel::Senior.rank(), 3);
        assert_eq!(ExperienceLevel::Unknown.rank(), 0);
    }

    #[test]
    fn test_default_weights_sum_to_one() {
        let weights = WeightConfig::default();
        assert!((weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_weight_override() {
        let weights: WeightConfig =
            serde_json::from_str(r#"{"goal_alignment": 0.5}"#).unwrap();
        assert_eq!(weights.goal_alignment, 0.5);
        assert_eq!(weights.skill_complementarity, 0.30);
        assert_eq!(weights.shared_industries, 0.15);
    }

    #[test]
    fn test_unknown_weight_factor_rejected() {
        let result = serde_json::from_str::<WeightConfig>(r#"{"distance": 0.5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_weight_fails_validation() {
        let weights = WeightConfig {
            shared_interests: -0.1,
            ..WeightConfig::default()
        };
        assert!(weights.validate().is_err());
        assert!(WeightConfig::default().validate().is_ok());
    }

    #[test]
    fn test_non_finite_weight_fails_validation() {
        let weights = WeightConfig {
            goal_alignment: f64::NAN,
            ..WeightConfig::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn test_overrides_apply_onto_base() {
        let base = WeightConfig {
            skill_complementarity: 0.5,
            ..WeightConfig::default()
        };
        let overrides: WeightOverrides =
            serde_json::from_str(r#"{"goal_alignment": 0.4}"#).unwrap();

        let merged = overrides.apply(&base);
        assert_eq!(merged.goal_alignment, 0.4);
        assert_eq!(merged.skill_complementarity, 0.5);
        assert_eq!(merged.shared_interests, 0.20);

        assert!(serde_json::from_str::<WeightOverrides>(r#"{"distance": 1.0}"#).is_err());
        let negative: WeightOverrides =
            serde_json::from_str(r#"{"shared_interests": -0.1}"#).unwrap();
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_raw_profile_tolerates_non_string_fields() {
        let raw: Vec<RawProfile> = serde_json::from_str(
            r#"[{"id": 17, "name": 7, "experience_level": 3, "skills": "A"}, {"userId": "2", "name": null}]"#,
        )
        .unwrap();
        assert_eq!(raw[0].id, "17");
        assert_eq!(raw[0].name, None);
        assert_eq!(raw[0].experience_level, None);
        assert_eq!(raw[1].id, "2");

        assert!(serde_json::from_str::<RawProfile>(r#"{"id": true}"#).is_err());
        assert!(serde_json::from_str::<RawProfile>(r#"{"name": "No Id"}"#).is_err());
    }

    #[test]
    fn test_raw_profile_accepts_aliases() {
        let raw: RawProfile = serde_json::from_str(
            r#"{"userId": "42", "skillCategories": "Technical", "experienceLevel": "Junior"}"#,
        )
        .unwrap();
        assert_eq!(raw.id, "42");
        assert_eq!(raw.skill_categories, Value::String("Technical".into()));
        assert!(raw.skills.is_null());
    }
}
