//! Core inference logic, independent of the HTTP layer

pub mod errors;
pub mod features;
pub mod model;
pub mod observation;
pub mod pipeline;
