// src/dataset/mod.rs — CSV dataset I/O

mod codec;
mod validate;

pub use codec::{load_forest, parse_refusal, save_forest, write_forest, OUTPUT_HEADER};
pub use validate::{validate_csv, ValidationIssue, ValidationReport, REFUSAL_TOKENS, REQUIRED_COLUMNS};
