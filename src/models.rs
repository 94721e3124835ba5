use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Output classes in the order the classifier was trained on.
pub const BLOOD_GROUPS: [&str; 8] = ["A+", "A-", "AB-", "AB+", "B+", "B-", "O+", "O-"];

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Prediction {
    pub predicted_blood_type: String,
    /// Raw model score at the predicted index.
    pub confidence: f32,
}

impl Prediction {
    /// Picks the highest scoring class. The score is reported as-is, without renormalizing.
    pub fn from_scores(scores: &[f32]) -> Result<Self, PredictError> {
        if scores.len() != BLOOD_GROUPS.len() {
            return Err(PredictError::UnexpectedOutput {
                expected: BLOOD_GROUPS.len(),
                actual: scores.len(),
            });
        }

        // Length is checked above, so index 0 exists. Strict `>` keeps the first of equal maxima.
        let mut index = 0;
        for (i, score) in scores.iter().enumerate().skip(1) {
            if score.total_cmp(&scores[index]).is_gt() {
                index = i;
            }
        }
        let confidence = scores[index];

        if !confidence.is_finite() {
            return Err(PredictError::Inference(format!(
                "non-finite score {confidence} at index {index}"
            )));
        }

        Ok(Self {
            predicted_blood_type: BLOOD_GROUPS[index].to_string(),
            confidence,
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ErrorResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_argmax_and_keeps_raw_score() {
        let scores = [0.01, 0.02, 0.05, 0.6, 0.1, 0.07, 0.1, 0.05];
        let prediction = Prediction::from_scores(&scores).unwrap();
        assert_eq!(prediction.predicted_blood_type, "AB+");
        assert_eq!(prediction.confidence, 0.6);
    }

    #[test]
    fn unnormalized_scores_are_not_rescaled() {
        let scores = [0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.1, 0.3];
        let prediction = Prediction::from_scores(&scores).unwrap();
        assert_eq!(prediction.predicted_blood_type, "O-");
        assert!((prediction.confidence - 0.3).abs() < f32::EPSILON);
    }

    #[test]
    fn ties_resolve_to_first_index() {
        let scores = [0.0, 0.4, 0.0, 0.0, 0.4, 0.0, 0.2, 0.0];
        let prediction = Prediction::from_scores(&scores).unwrap();
        assert_eq!(prediction.predicted_blood_type, "A-");
    }

    #[test]
    fn rejects_wrong_output_width() {
        let err = Prediction::from_scores(&[0.5, 0.5]).unwrap_err();
        assert!(matches!(
            err,
            PredictError::UnexpectedOutput {
                expected: 8,
                actual: 2
            }
        ));
        assert!(matches!(
            Prediction::from_scores(&[]),
            Err(PredictError::UnexpectedOutput { actual: 0, .. })
        ));
    }

    #[test]
    fn rejects_nan_scores() {
        let scores = [f32::NAN; 8];
        assert!(matches!(
            Prediction::from_scores(&scores),
            Err(PredictError::Inference(_))
        ));
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let prediction = Prediction {
            predicted_blood_type: "O+".to_string(),
            confidence: 0.5,
        };
        let json = serde_json::to_value(&prediction).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "predicted_blood_type": "O+", "confidence": 0.5 })
        );
    }
}
