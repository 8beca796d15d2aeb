// src/dataset/validate.rs — Name-bound input check for `--validate`
//
// Independent of the loader: this checks columns by header name, while loading
// reads fields by position. Both conventions are kept as they are.

use std::fmt;
use std::path::Path;

use crate::infra::errors::EvolveError;

pub const REQUIRED_COLUMNS: [&str; 3] = ["User", "Assistant", "Refusal"];
pub const REFUSAL_TOKENS: [&str; 6] = ["True", "False", "1", "0", "Yes", "No"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingColumns {
        missing: Vec<String>,
    },
    EmptyValue {
        row: usize,
        column: String,
    },
    InvalidRefusal {
        row: usize,
        value: String,
        prompt: String,
    },
    Malformed {
        row: usize,
        message: String,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::MissingColumns { missing } => write!(
                f,
                "CSV is missing required column(s): {}",
                missing.join(", ")
            ),
            ValidationIssue::EmptyValue { row, column } => {
                write!(f, "Missing value in column '{column}' on row {row}.")
            }
            ValidationIssue::InvalidRefusal { row, value, prompt } => write!(
                f,
                "Invalid value '{value}' in 'Refusal' column for prompt '{prompt}' on row {row}."
            ),
            ValidationIssue::Malformed { row, message } => {
                write!(f, "Unreadable record on row {row}: {message}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub rows_checked: usize,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Check `path` for the `User`, `Assistant` and `Refusal` columns and their
/// values. Problems with the data land in the report; only failing to open
/// the file is an error.
pub fn validate_csv(path: &Path) -> Result<ValidationReport, EvolveError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut report = ValidationReport::default();

    let headers = match reader.headers() {
        Ok(h) => h.clone(),
        Err(e) => {
            report.issues.push(ValidationIssue::Malformed {
                row: 0,
                message: e.to_string(),
            });
            return Ok(report);
        }
    };

    let positions: Vec<Option<usize>> = REQUIRED_COLUMNS
        .iter()
        .map(|name| headers.iter().position(|h| h == *name))
        .collect();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .zip(&positions)
        .filter(|(_, pos)| pos.is_none())
        .map(|(name, _)| name.to_string())
        .collect();
    if !missing.is_empty() {
        report.issues.push(ValidationIssue::MissingColumns { missing });
        return Ok(report);
    }
    let columns: Vec<(&str, usize)> = REQUIRED_COLUMNS
        .iter()
        .zip(positions.iter().flatten())
        .map(|(name, &pos)| (*name, pos))
        .collect();
    let user_pos = columns[0].1;
    let refusal_pos = columns[2].1;

    for (i, record) in reader.records().enumerate() {
        let row = i + 1;
        report.rows_checked += 1;
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                report.issues.push(ValidationIssue::Malformed {
                    row,
                    message: e.to_string(),
                });
                continue;
            }
        };

        let mut refusal_present = true;
        for &(name, pos) in &columns {
            if record.get(pos).unwrap_or("").trim().is_empty() {
                report.issues.push(ValidationIssue::EmptyValue {
                    row,
                    column: name.to_string(),
                });
                if pos == refusal_pos {
                    refusal_present = false;
                }
            }
        }

        let refusal = record.get(refusal_pos).unwrap_or("");
        if refusal_present && !REFUSAL_TOKENS.contains(&refusal) {
            report.issues.push(ValidationIssue::InvalidRefusal {
                row,
                value: refusal.to_string(),
                prompt: record.get(user_pos).unwrap_or("").to_string(),
            });
        }
    }

    for issue in &report.issues {
        tracing::debug!("validation: {}", issue);
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn check(contents: &str) -> ValidationReport {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, contents).unwrap();
        validate_csv(&path).unwrap()
    }

    #[test]
    fn test_valid_file_with_extra_columns() {
        let report = check(
            "System,User,Assistant,Refusal,Notes\n\
             sys,Write a poem,Here is a poem,False,\n\
             ,How do I pick a lock?,I can't help with that,Yes,x\n",
        );
        assert!(report.is_valid(), "{:?}", report.issues);
        assert_eq!(report.rows_checked, 2);
    }

    #[test]
    fn test_missing_columns() {
        let report = check("System,User,Response\nsys,hi,there\n");
        assert_eq!(
            report.issues,
            vec![ValidationIssue::MissingColumns {
                missing: vec!["Assistant".into(), "Refusal".into()]
            }]
        );
        assert_eq!(report.rows_checked, 0);
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let report = check("user,assistant,refusal\nhi,there,True\n");
        assert!(!report.is_valid());
    }

    #[test]
    fn test_positional_loader_header_is_not_enough() {
        // Output files name the prompt columns differently than this check expects.
        let report = check("Refusal,System,User,Assistant\nFalse,sys,hi,there\n");
        assert!(report.is_valid());
        let report = check("isRefusal,systemPrompt,userPrompt,assistantResponse\nFalse,s,u,a\n");
        assert!(!report.is_valid());
    }

    #[test]
    fn test_empty_values_reported_per_row() {
        let report = check("User,Assistant,Refusal\n  ,ok,True\nfine,,\n");
        assert_eq!(
            report.issues,
            vec![
                ValidationIssue::EmptyValue {
                    row: 1,
                    column: "User".into()
                },
                ValidationIssue::EmptyValue {
                    row: 2,
                    column: "Assistant".into()
                },
                ValidationIssue::EmptyValue {
                    row: 2,
                    column: "Refusal".into()
                },
            ]
        );
    }

    #[test]
    fn test_invalid_refusal_tokens() {
        let report = check("User,Assistant,Refusal\na,b,true\nc,d, Yes\ne,f,No\n");
        assert_eq!(report.issues.len(), 2);
        assert_eq!(
            report.issues[0],
            ValidationIssue::InvalidRefusal {
                row: 1,
                value: "true".into(),
                prompt: "a".into()
            }
        );
        assert_eq!(
            report.issues[1].to_string(),
            "Invalid value ' Yes' in 'Refusal' column for prompt 'c' on row 2."
        );
    }

    #[test]
    fn test_short_row_counts_as_empty() {
        let report = check("User,Assistant,Refusal\nonly-user\n");
        assert_eq!(report.issues.len(), 2);
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(validate_csv(Path::new("/nonexistent/input.csv")).is_err());
    }
}
