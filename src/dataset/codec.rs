// src/dataset/codec.rs — Forest <-> flat CSV rows
//
// One row per node: (isRefusal, systemPrompt, userPrompt, assistantResponse),
// pre-order per tree, trees in root order. Loading is positional and turns
// every row into its own root, so tree shape does not survive a round trip.

use std::io::Write;
use std::path::Path;

use crate::forest::{Forest, Node};
use crate::infra::errors::EvolveError;

pub const OUTPUT_HEADER: [&str; 4] = ["Refusal", "System", "User", "Assistant"];

/// `True`, `1` and `Yes` (any case, surrounding whitespace ignored) are true.
pub fn parse_refusal(raw: &str) -> bool {
    let v = raw.trim();
    v.eq_ignore_ascii_case("true") || v == "1" || v.eq_ignore_ascii_case("yes")
}

fn refusal_field(is_refusal: bool) -> &'static str {
    if is_refusal {
        "True"
    } else {
        "False"
    }
}

/// Read seed rows from `path`. The header line is skipped without inspection.
pub fn load_forest(path: &Path) -> Result<Forest, EvolveError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let mut forest = Forest::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        if record.len() < 4 {
            return Err(EvolveError::Dataset {
                path: path.to_path_buf(),
                row,
                message: format!("expected 4 fields, found {}", record.len()),
            });
        }
        forest.push_root(Node::new(
            &record[1],
            &record[2],
            &record[3],
            parse_refusal(&record[0]),
        ));
    }

    tracing::info!("Loaded {} rows from {}", forest.roots().len(), path.display());
    Ok(forest)
}

/// Write the whole forest to `writer`, header first.
pub fn write_forest<W: Write>(forest: &Forest, writer: W) -> Result<(), EvolveError> {
    let mut w = csv::Writer::from_writer(writer);
    w.write_record(OUTPUT_HEADER)?;
    for id in forest.preorder() {
        let node = forest.node(id);
        w.write_record([
            refusal_field(node.is_refusal),
            node.system_prompt.as_str(),
            node.user_prompt.as_str(),
            node.assistant_response.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}

/// Replace `path` with the forest.
///
/// Rows go to a temporary file next to `path`, which is then renamed over it,
/// so a failed write leaves the previous checkpoint in place.
pub fn save_forest(forest: &Forest, path: &Path) -> Result<(), EvolveError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    write_forest(forest, std::io::BufWriter::new(tmp.as_file_mut()))?;
    tmp.persist(path).map_err(|e| EvolveError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_refusal() {
        for t in ["True", "true", " TRUE ", "1", "Yes", "yes"] {
            assert!(parse_refusal(t), "{t:?}");
        }
        for f in ["False", "0", "No", "", "maybe", "y"] {
            assert!(!parse_refusal(f), "{f:?}");
        }
    }

    #[test]
    fn test_write_quotes_and_orders_rows() {
        let mut forest = Forest::new();
        let root = forest.push_root(Node::new("sys", "hello, world", "hi \"there\"", true));
        forest.append_child(root, Node::derived(forest.node(root), "line one\nline two"));
        forest.push_root(Node::new("sys", "second", "", false));

        let mut buf = Vec::new();
        write_forest(&forest, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Refusal,System,User,Assistant\n\
             True,sys,\"hello, world\",\"hi \"\"there\"\"\"\n\
             False,sys,\"line one\nline two\",\n\
             False,sys,second,\n"
        );
    }

    #[test]
    fn test_load_skips_header_and_ignores_extra_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.csv");
        std::fs::write(
            &path,
            "a,b,c,d,e\nYes,You are helpful,Write a poem,A poem.,extra\n0,sys,Other,,\n",
        )
        .unwrap();

        let forest = load_forest(&path).unwrap();

        assert_eq!(forest.roots().len(), 2);
        let first = forest.node(forest.roots()[0]);
        assert!(first.is_refusal);
        assert_eq!(first.system_prompt, "You are helpful");
        assert_eq!(first.user_prompt, "Write a poem");
        assert_eq!(first.assistant_response, "A poem.");
        assert!(!forest.node(forest.roots()[1]).is_refusal);
    }

    #[test]
    fn test_load_short_row_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.csv");
        std::fs::write(&path, "r,s,u,a\nTrue,sys,ok,fine\nTrue,sys\n").unwrap();

        match load_forest(&path).unwrap_err() {
            EvolveError::Dataset { row, .. } => assert_eq!(row, 2),
            other => panic!("expected Dataset error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_forest(Path::new("/nonexistent/seed.csv")).is_err());
    }

    #[test]
    fn test_save_replaces_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        std::fs::write(&path, "previous checkpoint\n").unwrap();

        let mut forest = Forest::new();
        forest.push_root(Node::new("s", "u", "a", false));
        save_forest(&forest, &path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Refusal,System,User,Assistant\nFalse,s,u,a\n"
        );
        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.csv")]);
    }

    #[test]
    fn test_save_into_missing_dir_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone").join("out.csv");
        let mut forest = Forest::new();
        forest.push_root(Node::new("s", "u", "a", false));

        assert!(save_forest(&forest, &missing).is_err());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_header_only_is_empty_forest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.csv");
        std::fs::write(&path, "Refusal,System,User,Assistant\n").unwrap();
        assert!(load_forest(&path).unwrap().is_empty());
    }
}
