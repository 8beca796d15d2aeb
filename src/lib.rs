// src/lib.rs — Library root for evoforest

pub mod cli;
pub mod core;
pub mod dataset;
pub mod forest;
pub mod infra;
pub mod provider;
pub mod util;
