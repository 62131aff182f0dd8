//! Pipeline result types

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::logic::errors::PredictError;
use crate::logic::features::FeatureRecord;

/// Classifier output for one record
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PredictionResult {
    /// Echoed only when the service assembled the record itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureRecord>,
    /// Verbatim string form of the classifier's category
    #[serde(rename = "prediction")]
    pub label: String,
}

/// One slot of a batch, at the same position as its input
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub index: usize,
    pub outcome: Result<PredictionResult, PredictError>,
}

impl BatchItem {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Serialized as `{"index": i, "result": {..}}` or `{"index": i, "error": {..}}`
impl Serialize for BatchItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("index", &self.index)?;
        match &self.outcome {
            Ok(result) => map.serialize_entry("result", result)?,
            Err(error) => map.serialize_entry("error", &error.to_body())?,
        }
        map.end()
    }
}

/// Per-item outcomes in input order; always as long as the input
pub type BatchResult = Vec<BatchItem>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::errors::FieldViolation;

    #[test]
    fn test_prediction_without_features() {
        let result = PredictionResult { features: None, label: "2".into() };
        assert_eq!(serde_json::to_string(&result).unwrap(), r#"{"prediction":"2"}"#);
    }

    #[test]
    fn test_batch_item_shapes() {
        let ok = BatchItem {
            index: 0,
            outcome: Ok(PredictionResult { features: None, label: "Low".into() }),
        };
        let err = BatchItem {
            index: 1,
            outcome: Err(PredictError::InvalidRecord {
                violations: vec![FieldViolation::MissingField { field: "wave_height".into() }],
            }),
        };

        let ok = serde_json::to_value(&ok).unwrap();
        assert_eq!(ok["index"], 0);
        assert_eq!(ok["result"]["prediction"], "Low");
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(&err).unwrap();
        assert_eq!(err["index"], 1);
        assert_eq!(err["error"]["kind"], "InvalidRecord");
        assert_eq!(err["error"]["violations"][0]["field"], "wave_height");
        assert!(err.get("result").is_none());
    }
}
