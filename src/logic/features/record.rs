//! Feature Record - the 18 observations of one point, in layout order

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::layout::{feature_index, FEATURE_COUNT, FEATURE_LAYOUT};

/// One complete set of features, stored in FEATURE_LAYOUT order.
///
/// There is no way to build a partial record: the assembler is the only
/// producer and it refuses to fill gaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRecord {
    /// Wrap values that are already in layout order
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Get feature by name
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// The vector handed to the scaling transform
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        self.values
    }

    /// (name, value) pairs in layout order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_LAYOUT.iter().copied().zip(self.values.iter().copied())
    }
}

// Keys are written in layout order so echoed records read like the training table.
impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}
