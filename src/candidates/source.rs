use super::types::CandidateRecord;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Documents shorter than this (after trimming) are treated as unreadable,
/// typically scans with no text layer.
pub const MIN_DOCUMENT_CHARS: usize = 20;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("candidate source not found at {0}")]
    NotFound(PathBuf),
    #[error("failed to read candidate source {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid CSV in candidate source: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON in candidate source: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported candidate source format '{0}' (expected .csv or .json)")]
    UnsupportedFormat(String),
}

/// Load every candidate row from a CSV or JSON file.
///
/// CSV rows become string fields keyed by header; blank cells are dropped so
/// they read as missing. JSON must be an array; non-object entries are kept
/// as empty records so they still show up in the ranking.
pub fn load_candidates(path: &Path) -> Result<Vec<CandidateRecord>, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => parse_csv(file),
        "json" => parse_json(file),
        other => Err(SourceError::UnsupportedFormat(other.to_string())),
    }
}

pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, SourceError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();

    for row in csv_reader.records() {
        let row = row?;
        let fields: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();

        // Fully blank rows are spreadsheet padding, not candidates.
        if fields.is_empty() {
            continue;
        }
        records.push(CandidateRecord::new(records.len(), fields));
    }

    Ok(records)
}

pub fn parse_json<R: Read>(reader: R) -> Result<Vec<CandidateRecord>, SourceError> {
    let rows: Vec<Value> = serde_json::from_reader(reader)?;

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(position, row)| match row {
            Value::Object(fields) => CandidateRecord::new(position, fields),
            other => {
                tracing::warn!(position, kind = %json_kind(&other), "candidate row is not an object");
                CandidateRecord::new(position, Map::new())
            }
        })
        .collect();

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Outcome of reading a candidate's attached document.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    Text(String),
    Unreadable(String),
}

/// Read a plain-text document, resolving relative paths against `base_dir`.
pub fn read_document(path: &str, base_dir: Option<&Path>) -> Document {
    let path = Path::new(path);
    let resolved = match base_dir {
        Some(dir) if path.is_relative() => dir.join(path),
        _ => path.to_path_buf(),
    };

    match std::fs::read_to_string(&resolved) {
        Ok(text) => {
            let trimmed = text.trim();
            if trimmed.chars().count() < MIN_DOCUMENT_CHARS {
                Document::Unreadable(format!("{} has no usable text", resolved.display()))
            } else {
                Document::Text(trimmed.to_string())
            }
        }
        Err(e) => Document::Unreadable(format!("{}: {}", resolved.display(), e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_csv_rows() {
        let data = "nom,email,années_exp,compétences,disponibilité\n\
                    Alice Durand,alice@example.com,5,\"Python, SQL\",Immédiat\n\
                    Bob Laurent,bob@example.com,2,JavaScript,2024-02-15\n";
        let records = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name(), "Alice Durand");
        assert_eq!(records[0].skills(), "Python, SQL");
        assert_eq!(records[1].position, 1);
        assert_eq!(records[1].availability(), "2024-02-15");
    }

    #[test]
    fn test_parse_csv_skips_blank_rows_and_cells() {
        let data = "name,email,skills\nAlice,,Rust\n,,\nBob,bob@example.com,\n";
        let records = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].email(), "");
        assert_eq!(records[1].name(), "Bob");
        assert_eq!(records[1].position, 1);
    }

    #[test]
    fn test_parse_json_keeps_non_objects() {
        let data = r#"[{"name": "Alice", "years_exp": 4}, 42, {"name": "Bob"}]"#;
        let records = parse_json(data.as_bytes()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].name(), "Unknown");
        assert_eq!(records[2].position, 2);
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        let result = parse_json(r#"{"name": "Alice"}"#.as_bytes());
        assert!(matches!(result, Err(SourceError::Json(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let path = env::temp_dir().join("shortlist_test_missing_source.csv");
        let _ = std::fs::remove_file(&path);
        assert!(matches!(load_candidates(&path), Err(SourceError::NotFound(_))));
    }

    #[test]
    fn test_load_unsupported_extension() {
        let path = env::temp_dir().join("shortlist_test_source.xlsx");
        std::fs::write(&path, "not really a workbook").unwrap();
        let result = load_candidates(&path);
        assert!(matches!(result, Err(SourceError::UnsupportedFormat(ext)) if ext == "xlsx"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_read_document_text_and_unreadable() {
        let dir = env::temp_dir();
        let good = dir.join("shortlist_test_doc_good.txt");
        let short = dir.join("shortlist_test_doc_short.txt");
        std::fs::write(&good, "Senior data engineer, eight years of Python and SQL.").unwrap();
        std::fs::write(&short, "   scan   ").unwrap();

        assert!(matches!(
            read_document("shortlist_test_doc_good.txt", Some(&dir)),
            Document::Text(_)
        ));
        assert!(matches!(
            read_document(short.to_str().unwrap(), None),
            Document::Unreadable(_)
        ));
        assert!(matches!(
            read_document("shortlist_test_doc_absent.txt", Some(&dir)),
            Document::Unreadable(_)
        ));

        let _ = std::fs::remove_file(&good);
        let _ = std::fs::remove_file(&short);
    }
}
