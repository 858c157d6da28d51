use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::entity::{dream, interpretation};

/// Dream interpretation request body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterpretRequest {
    /// Dream text in Thai. A single symbol word or a full narrative.
    #[validate(length(max = 4000, message = "ความฝันยาวเกินไป (สูงสุด 4000 ตัวอักษร)"))]
    pub dream_text: String,
}

/// Interpretation returned to the caller. The wire keys are snake_case,
/// matching what the model emits, so cache hits serialize identically.
#[derive(Debug, Serialize, ToSchema)]
pub struct InterpretationResult {
    pub analysis: String,
    pub lucky_numbers: String,
    /// Present and true only when served from the semantic cache.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_cached: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// Shape the model is instructed to emit. Parsed strictly; anything that is
/// not a JSON object with these keys is a generation-format failure.
#[derive(Debug, Deserialize)]
pub struct GenerationOutcome {
    pub analysis: String,
    #[serde(default = "default_lucky_numbers")]
    pub lucky_numbers: String,
    #[serde(default)]
    pub metrics: GenerationMetrics,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Set by the model when it declines to interpret the input.
    #[serde(default)]
    pub refused: bool,
}

fn default_lucky_numbers() -> String {
    "-".to_string()
}

/// Sentiment scores as emitted by the model, before clamping.
#[derive(Debug, Default, Deserialize)]
pub struct GenerationMetrics {
    #[serde(default)]
    pub stress: i64,
    #[serde(default)]
    pub anxiety: i64,
    #[serde(default)]
    pub happiness: i64,
}

impl GenerationMetrics {
    pub fn stress_score(&self) -> i32 {
        clamp_score(self.stress)
    }

    pub fn anxiety_score(&self) -> i32 {
        clamp_score(self.anxiety)
    }

    pub fn happiness_score(&self) -> i32 {
        clamp_score(self.happiness)
    }
}

/// Scores are stored on a 0..=10 scale regardless of what the model emits.
fn clamp_score(value: i64) -> i32 {
    value.clamp(0, 10) as i32
}

/// One entry in the caller's dream history.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DreamHistoryItem {
    pub id: Uuid,
    pub dream_text: String,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interpretation: Option<InterpretationSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InterpretationSummary {
    pub analysis: String,
    pub lucky_numbers: String,
    pub stress_score: i32,
    pub anxiety_score: i32,
    pub happiness_score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<i32>,
}

impl DreamHistoryItem {
    pub fn from_models(
        dream: dream::Model,
        interpretation: Option<interpretation::Model>,
    ) -> Self {
        Self {
            id: dream.id,
            dream_text: dream.dream_text,
            tags: dream.tags,
            created_at: dream.created_at,
            interpretation: interpretation.map(|i| InterpretationSummary {
                analysis: i.analysis_text,
                lucky_numbers: i.lucky_numbers,
                stress_score: i.stress_score,
                anxiety_score: i.anxiety_score,
                happiness_score: i.happiness_score,
                rating: i.rating,
            }),
        }
    }
}

/// Query parameters for the history listing.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct HistoryQuery {
    /// Substring filter on the dream text.
    pub search: Option<String>,
}

/// Interpretation rating request body.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RateRequest {
    #[validate(range(min = 1, max = 5, message = "คะแนนต้องอยู่ระหว่าง 1 ถึง 5"))]
    pub rating: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_a_complete_generation() {
        // Arrange
        let raw = r#"{
            "analysis": "งูในฝันหมายถึงเนื้อคู่",
            "lucky_numbers": "23, 57",
            "metrics": { "stress": 3, "anxiety": 2, "happiness": 8 },
            "tags": ["งู"],
            "refused": false
        }"#;

        // Act
        let outcome: GenerationOutcome = serde_json::from_str(raw).unwrap();

        // Assert
        assert_eq!(outcome.analysis, "งูในฝันหมายถึงเนื้อคู่");
        assert_eq!(outcome.lucky_numbers, "23, 57");
        assert_eq!(outcome.tags, vec!["งู"]);
        assert!(!outcome.refused);
    }

    #[test]
    fn missing_optional_keys_fall_back() {
        // Arrange
        let raw = r#"{ "analysis": "คำทำนาย" }"#;

        // Act
        let outcome: GenerationOutcome = serde_json::from_str(raw).unwrap();

        // Assert
        assert_eq!(outcome.lucky_numbers, "-");
        assert!(outcome.tags.is_empty());
        assert!(!outcome.refused);
        assert_eq!(outcome.metrics.stress_score(), 0);
    }

    #[test]
    fn missing_analysis_is_a_parse_failure() {
        // Arrange
        let raw = r#"{ "lucky_numbers": "7" }"#;

        // Act
        let result = serde_json::from_str::<GenerationOutcome>(raw);

        // Assert
        assert!(result.is_err());
    }

    #[test]
    fn interpretation_result_keeps_snake_case_wire_keys() {
        // Arrange
        let result = InterpretationResult {
            analysis: "คำทำนาย".to_string(),
            lucky_numbers: "23, 57".to_string(),
            is_cached: Some(true),
            tags: None,
        };

        // Act
        let json = serde_json::to_value(&result).unwrap();

        // Assert
        assert_eq!(json["lucky_numbers"], "23, 57");
        assert_eq!(json["is_cached"], true);
        assert!(json.get("luckyNumbers").is_none());
        assert!(json.get("tags").is_none());
    }

    #[test]
    fn scores_are_clamped_to_the_storage_scale() {
        // Arrange
        let metrics = GenerationMetrics {
            stress: 15,
            anxiety: -3,
            happiness: 10,
        };

        // Act & Assert
        assert_eq!(metrics.stress_score(), 10);
        assert_eq!(metrics.anxiety_score(), 0);
        assert_eq!(metrics.happiness_score(), 10);
    }
}
