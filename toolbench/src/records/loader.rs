//! Record loading from and saving to line-delimited JSON files

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{BenchmarkRecord, KeyOrder};

/// Error type for record loading and saving
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error on line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("Could not replace file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Load records from a line-delimited JSON file
pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<BenchmarkRecord>, LoadError> {
    let path = path.as_ref();
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    let records = parse_records(&content)?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse records from line-delimited JSON text, skipping blank lines
pub fn parse_records(content: &str) -> Result<Vec<BenchmarkRecord>, LoadError> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_line(line).map_err(|source| LoadError::Parse {
                line: idx + 1,
                source,
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Result<BenchmarkRecord, serde_json::Error> {
    let fields: Map<String, Value> = serde_json::from_str(line)?;
    let key_order = KeyOrder::new(fields.keys().cloned().collect());
    let mut record: BenchmarkRecord = serde_json::from_value(Value::Object(fields))?;
    record.key_order = key_order;
    Ok(record)
}

/// One compact JSON line; keys follow the record's original order, new keys last
fn format_line(record: &BenchmarkRecord) -> Result<String, serde_json::Error> {
    let fields = match serde_json::to_value(record)? {
        Value::Object(fields) => fields,
        other => return serde_json::to_string(&other),
    };

    let mut ordered = Map::with_capacity(fields.len());
    for key in record.key_order.keys() {
        if let Some(value) = fields.get(key) {
            ordered.insert(key.clone(), value.clone());
        }
    }
    for (key, value) in fields {
        ordered.entry(key).or_insert(value);
    }
    serde_json::to_string(&ordered)
}

/// Write all records, one per line, replacing the destination in one step.
///
/// The content goes to a temporary file in the destination directory which is
/// then renamed over the target, so readers see either the old or the new file.
pub fn save_records(path: impl AsRef<Path>, records: &[BenchmarkRecord]) -> Result<(), LoadError> {
    let path = path.as_ref();

    let mut buf = String::new();
    for record in records {
        let line = format_line(record).map_err(LoadError::Serialize)?;
        buf.push_str(&line);
        buf.push('\n');
    }

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(buf.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    tracing::debug!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

/// `<stem>_scored.<ext>` next to the input
pub fn scored_path(input: impl AsRef<Path>) -> PathBuf {
    with_stem_suffix(input.as_ref(), "_scored")
}

/// `<stem>_with_correctness.<ext>` next to the input
pub fn correctness_path(input: impl AsRef<Path>) -> PathBuf {
    with_stem_suffix(input.as_ref(), "_with_correctness")
}

fn with_stem_suffix(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    input.with_file_name(file_name)
}
