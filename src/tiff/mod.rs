//! TIFF field types, tag numbers and decoded values.

pub mod tags;
mod value;

pub use value::{Rational, SRational, Value};
