pub mod catalog;
pub mod cli;
pub mod database_ops;
pub mod export;
pub mod normalization;
pub mod sources;
pub mod synth;
pub mod tracing;

pub mod util {
    pub mod env;
}
