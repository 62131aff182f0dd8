//! Features Module - Versioned feature layout and record assembly

pub mod layout;
pub mod record;
pub mod assembler;

pub use layout::{
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, MARINE_FEATURES, ATMOSPHERIC_FEATURES,
    LayoutInfo, LayoutMismatchError, layout_hash, validate_feature_names,
};
pub use record::FeatureRecord;
pub use assembler::{assemble_observations, assemble_raw};
