//! Public types for the nerview API.

mod annotation;
mod label;

pub use annotation::{AnnotatedToken, Annotations};
pub use label::{EntityLabel, Rgb, UNKNOWN_COLOR};
