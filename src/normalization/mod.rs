//! Field-level normalization shared by the generate and import stages.

pub mod array_literal;
pub mod date;
pub mod genre;
