//! Heuristic analyzers
//!
//! Each analyzer reads one [`Document`](crate::dom::Document) and returns plain
//! records. They share no state and can run in any order.

pub mod color;
pub mod images;
pub mod typography;

#[cfg(test)]
mod tests;

pub use color::{ColorAnalyzer, Palette};
pub use images::ImageAnalyzer;
pub use typography::TypographyAnalyzer;
