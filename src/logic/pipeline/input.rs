//! Batch input decoding
//!
//! Only the document's top-level shape can reject a whole upload. Anything
//! wrong inside an individual object is left for that item to report.

use serde_json::{Map, Value};

use crate::logic::errors::{DocumentError, FieldViolation, PredictError};
use crate::logic::features::assembler::to_number;
use crate::logic::features::FEATURE_LAYOUT;
use crate::logic::observation::Coordinate;

/// One batch entry: a full feature record or a point to fetch features for
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Features(Map<String, Value>),
    Coordinates {
        latitude: Option<Value>,
        longitude: Option<Value>,
    },
}

impl RawInput {
    /// Any feature key makes it a record; otherwise `latitude`/`longitude`
    /// make it a coordinate request. Objects with neither are records and
    /// will report every field missing.
    pub fn from_object(object: Map<String, Value>) -> Self {
        let has_feature = FEATURE_LAYOUT.iter().any(|name| object.contains_key(*name));
        let has_coordinate = object.contains_key("latitude") || object.contains_key("longitude");

        if !has_feature && has_coordinate {
            Self::Coordinates {
                latitude: object.get("latitude").cloned(),
                longitude: object.get("longitude").cloned(),
            }
        } else {
            Self::Features(object)
        }
    }

    pub fn from_coordinate(coordinate: Coordinate) -> Self {
        Self::Coordinates {
            latitude: Some(Value::from(coordinate.latitude)),
            longitude: Some(Value::from(coordinate.longitude)),
        }
    }
}

/// Decode `latitude`/`longitude`, reporting both problems at once
pub fn parse_coordinate(
    latitude: Option<&Value>,
    longitude: Option<&Value>,
) -> Result<Coordinate, PredictError> {
    let mut violations = Vec::new();
    let mut read = |name: &str, value: Option<&Value>| -> f64 {
        match value.map(to_number) {
            Some(Ok(v)) => v,
            Some(Err(found)) => {
                violations.push(FieldViolation::InvalidType { field: name.to_string(), found });
                f64::NAN
            }
            None => {
                violations.push(FieldViolation::MissingField { field: name.to_string() });
                f64::NAN
            }
        }
    };

    let latitude = read("latitude", latitude);
    let longitude = read("longitude", longitude);

    if violations.is_empty() {
        Ok(Coordinate::new(latitude, longitude))
    } else {
        Err(PredictError::InvalidRecord { violations })
    }
}

/// Parse an uploaded JSON document: one object, or an array of objects
pub fn parse_document(bytes: &[u8]) -> Result<Vec<RawInput>, DocumentError> {
    let document: Value = serde_json::from_slice(bytes)
        .map_err(|e| DocumentError::UnparseableDocument(e.to_string()))?;

    match document {
        Value::Object(object) => Ok(vec![RawInput::from_object(object)]),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(object) => Ok(RawInput::from_object(object)),
                other => Err(DocumentError::UnsupportedDocumentShape(format!(
                    "element {} is {}, expected an object",
                    index,
                    describe(&other)
                ))),
            })
            .collect(),
        other => Err(DocumentError::UnsupportedDocumentShape(format!(
            "top level is {}, expected an object or an array of objects",
            describe(&other)
        ))),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
