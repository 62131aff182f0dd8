//! Feature Assembler
//!
//! Turns fetched samples or a client-supplied JSON object into a
//! [`FeatureRecord`]. Every problem is collected before failing, and nothing
//! is ever defaulted or imputed.

use serde_json::{Map, Value};

use super::layout::{ATMOSPHERIC_FEATURES, FEATURE_COUNT, FEATURE_LAYOUT, MARINE_FEATURES};
use super::record::FeatureRecord;
use crate::logic::errors::{FieldViolation, PredictError};
use crate::logic::observation::{Observations, Sample};

/// Coordinate path: copy the marine and atmospheric readings into layout order
pub fn assemble_observations(observations: &Observations) -> Result<FeatureRecord, PredictError> {
    let mut values = [0.0f64; FEATURE_COUNT];
    let mut violations = Vec::new();

    let sources: [(&[&str], &Sample); 2] = [
        (MARINE_FEATURES, &observations.marine),
        (ATMOSPHERIC_FEATURES, &observations.atmospheric),
    ];

    let mut index = 0;
    for (names, sample) in sources {
        for &name in names {
            match sample.get(name) {
                Some(&v) => values[index] = v,
                None => violations.push(FieldViolation::MissingField { field: name.to_string() }),
            }
            index += 1;
        }
    }

    finish(values, violations)
}

/// Direct path: validate a pre-supplied record (manual entry or batch item)
pub fn assemble_raw(raw: &Map<String, Value>) -> Result<FeatureRecord, PredictError> {
    let mut values = [0.0f64; FEATURE_COUNT];
    let mut violations = Vec::new();

    for (index, &name) in FEATURE_LAYOUT.iter().enumerate() {
        match raw.get(name) {
            None => violations.push(FieldViolation::MissingField { field: name.to_string() }),
            Some(value) => match to_number(value) {
                Ok(v) => values[index] = v,
                Err(found) => violations.push(FieldViolation::InvalidType {
                    field: name.to_string(),
                    found,
                }),
            },
        }
    }

    finish(values, violations)
}

fn finish(values: [f64; FEATURE_COUNT], violations: Vec<FieldViolation>) -> Result<FeatureRecord, PredictError> {
    if violations.is_empty() {
        Ok(FeatureRecord::from_values(values))
    } else {
        Err(PredictError::InvalidRecord { violations })
    }
}

/// Accept JSON numbers and numeric strings; describe anything else
pub(crate) fn to_number(value: &Value) -> Result<f64, String> {
    match value {
        Value::Number(n) => n.as_f64().ok_or_else(|| format!("number {}", n)),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(format!("string {:?}", s)),
        },
        Value::Null => Err("null".to_string()),
        Value::Bool(b) => Err(format!("boolean {}", b)),
        Value::Array(_) => Err("array".to_string()),
        Value::Object(_) => Err("object".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_raw() -> Map<String, Value> {
        let mut raw = Map::new();
        for (i, name) in FEATURE_LAYOUT.iter().enumerate() {
            raw.insert(name.to_string(), json!(i as f64 * 1.5));
        }
        raw
    }

    fn missing_fields(err: &PredictError) -> Vec<String> {
        err.violations()
            .iter()
            .filter(|v| matches!(v, FieldViolation::MissingField { .. }))
            .map(|v| v.field().to_string())
            .collect()
    }

    #[test]
    fn test_raw_complete_record() {
        let record = assemble_raw(&full_raw()).unwrap();
        assert_eq!(record.get("wave_height"), Some(0.0));
        assert_eq!(record.get("wind_direction_100m"), Some(17.0 * 1.5));
    }

    #[test]
    fn test_raw_key_order_does_not_matter() {
        // JSON objects are unordered; only the layout decides vector order
        let mut reversed = Map::new();
        for (name, value) in full_raw().into_iter().rev() {
            reversed.insert(name, value);
        }
        assert_eq!(assemble_raw(&reversed).unwrap(), assemble_raw(&full_raw()).unwrap());
    }

    #[test]
    fn test_raw_reports_all_missing_fields() {
        let mut raw = full_raw();
        raw.remove("wave_period");
        raw.remove("precipitation");
        raw.remove("wind_direction_100m");

        let err = assemble_raw(&raw).unwrap_err();
        assert_eq!(
            missing_fields(&err),
            vec!["wave_period", "precipitation", "wind_direction_100m"]
        );
    }

    #[test]
    fn test_raw_mixed_violations() {
        let mut raw = full_raw();
        raw.insert("wave_height".into(), json!("not-a-number"));
        raw.insert("weather_code".into(), json!(null));
        raw.insert("pressure_msl".into(), json!(true));
        raw.remove("surface_pressure");

        let err = assemble_raw(&raw).unwrap_err();
        let violations = err.violations();
        assert_eq!(violations.len(), 4);
        assert_eq!(
            violations[0],
            FieldViolation::InvalidType {
                field: "wave_height".into(),
                found: "string \"not-a-number\"".into(),
            }
        );
        assert!(matches!(&violations[1], FieldViolation::InvalidType { field, .. } if field == "weather_code"));
        assert!(matches!(&violations[2], FieldViolation::InvalidType { field, .. } if field == "pressure_msl"));
        assert!(matches!(&violations[3], FieldViolation::MissingField { field } if field == "surface_pressure"));
    }

    #[test]
    fn test_raw_numeric_strings_convert() {
        let mut raw = full_raw();
        raw.insert("wave_height".into(), json!("1.25"));
        raw.insert("wave_direction".into(), json!("NaN"));

        let err = assemble_raw(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].field(), "wave_direction");

        raw.insert("wave_direction".into(), json!(" 90 "));
        let record = assemble_raw(&raw).unwrap();
        assert_eq!(record.get("wave_height"), Some(1.25));
        assert_eq!(record.get("wave_direction"), Some(90.0));
    }

    #[test]
    fn test_raw_extra_keys_ignored() {
        let mut raw = full_raw();
        raw.insert("latitude".into(), json!(17.68));
        raw.insert("note".into(), json!("harbour"));
        assert!(assemble_raw(&raw).is_ok());
    }

    #[test]
    fn test_empty_object_names_every_field() {
        let err = assemble_raw(&Map::new()).unwrap_err();
        assert_eq!(missing_fields(&err).len(), FEATURE_COUNT);
    }

    #[test]
    fn test_observations_in_layout_order() {
        let mut observations = Observations::default();
        for (i, name) in MARINE_FEATURES.iter().enumerate() {
            observations.marine.insert(name.to_string(), i as f64);
        }
        for (i, name) in ATMOSPHERIC_FEATURES.iter().enumerate() {
            observations.atmospheric.insert(name.to_string(), 100.0 + i as f64);
        }

        let record = assemble_observations(&observations).unwrap();
        let expected: Vec<f64> = (0..9).map(|i| i as f64).chain((0..9).map(|i| 100.0 + i as f64)).collect();
        assert_eq!(record.values().to_vec(), expected);
    }

    #[test]
    fn test_observations_missing_keys() {
        let mut observations = Observations::default();
        for name in MARINE_FEATURES {
            observations.marine.insert(name.to_string(), 1.0);
        }
        for name in &ATMOSPHERIC_FEATURES[2..] {
            observations.atmospheric.insert(name.to_string(), 1.0);
        }

        let err = assemble_observations(&observations).unwrap_err();
        assert_eq!(missing_fields(&err), vec!["temperature_2m", "relative_humidity_2m"]);
    }

    #[test]
    fn test_observations_never_cross_sources() {
        // A marine variable reported by the atmospheric provider does not count
        let mut observations = Observations::default();
        for name in FEATURE_LAYOUT {
            observations.atmospheric.insert(name.to_string(), 1.0);
        }
        let err = assemble_observations(&observations).unwrap_err();
        assert_eq!(missing_fields(&err).len(), MARINE_FEATURES.len());
    }
}
