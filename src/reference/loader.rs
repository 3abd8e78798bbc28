use super::error::LoadError;
use super::types::{Dimension, DimensionProfile, Question, ReferenceData};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const QUESTION_COLUMNS: [&str; 2] = ["dim", "text"];

pub const PROFILE_COLUMNS: [&str; 9] = [
    "key",
    "label",
    "root_need",
    "relation_tendency",
    "dependency",
    "risk",
    "merit",
    "actions",
    "reward",
];

/// Where the two reference tables live and how strictly to check them.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSource {
    pub dir: PathBuf,
    pub questions_file: String,
    pub profiles_file: String,
    pub strict_coverage: bool,
}

impl DataSource {
    pub fn questions_path(&self) -> PathBuf {
        self.dir.join(&self.questions_file)
    }

    pub fn profiles_path(&self) -> PathBuf {
        self.dir.join(&self.profiles_file)
    }
}

/// Question bank compiled into the binary, used when no data directory is
/// configured.
pub const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.csv");

/// Profile table compiled into the binary
pub const BUILTIN_PROFILES: &str = include_str!("../../data/pillars.csv");

/// Load and validate both reference tables.
///
/// Meant to run once at startup; wrap the result in an `Arc` and hand it to
/// whatever needs it.
pub fn load_reference_data(source: &DataSource) -> Result<ReferenceData, LoadError> {
    let questions = load_questions(&source.questions_path())?;
    let profiles = load_profiles(&source.profiles_path())?;

    let data = assemble(questions, profiles, source.strict_coverage)?;
    debug!(
        questions = data.questions().len(),
        "Loaded reference data from {}",
        source.dir.display()
    );
    Ok(data)
}

/// Parse the tables shipped inside the binary. Used when neither the config
/// file nor the command line names a data directory.
pub fn load_builtin_reference_data(strict_coverage: bool) -> Result<ReferenceData, LoadError> {
    let questions = parse_questions(Path::new("<built-in>/questions.csv"), BUILTIN_QUESTIONS)?;
    let profiles = parse_profiles(Path::new("<built-in>/pillars.csv"), BUILTIN_PROFILES)?;

    let data = assemble(questions, profiles, strict_coverage)?;
    debug!(questions = data.questions().len(), "Loaded built-in reference data");
    Ok(data)
}

fn assemble(
    questions: Vec<Question>,
    profiles: Vec<DimensionProfile>,
    strict_coverage: bool,
) -> Result<ReferenceData, LoadError> {
    let data = ReferenceData::new(questions, profiles, strict_coverage)
        .map_err(LoadError::Inconsistent)?;

    for dim in data.uncovered_dimensions() {
        warn!(
            "No questions for dimension '{}'; its score will fall back to a mean of 0",
            dim.key()
        );
    }
    Ok(data)
}

/// Load the question bank (`dim`, `text`), preserving row order.
pub fn load_questions(path: &Path) -> Result<Vec<Question>, LoadError> {
    parse_questions(path, &read_source(path)?)
}

fn parse_questions(path: &Path, content: &str) -> Result<Vec<Question>, LoadError> {
    let table = parse_table(path, content, &QUESTION_COLUMNS)?;

    table
        .rows
        .iter()
        .map(|row| {
            let dimension = table.parse_dimension(row, "dim")?;
            let text = table.cell(row, "text");
            if text.is_empty() {
                return Err(table.invalid_row(row, "question text is empty".to_string()));
            }
            Ok(Question {
                dimension,
                text: text.to_string(),
            })
        })
        .collect()
}

/// Load the dimension profiles. Duplicates and gaps are caught later by
/// [`ReferenceData::new`].
pub fn load_profiles(path: &Path) -> Result<Vec<DimensionProfile>, LoadError> {
    parse_profiles(path, &read_source(path)?)
}

fn parse_profiles(path: &Path, content: &str) -> Result<Vec<DimensionProfile>, LoadError> {
    let table = parse_table(path, content, &PROFILE_COLUMNS)?;

    table
        .rows
        .iter()
        .map(|row| {
            let dimension = table.parse_dimension(row, "key")?;
            let label = table.cell(row, "label");
            if label.is_empty() {
                return Err(table.invalid_row(row, "profile label is empty".to_string()));
            }
            Ok(DimensionProfile {
                dimension,
                label: label.to_string(),
                root_need: table.cell(row, "root_need").to_string(),
                relation_tendency: table.cell(row, "relation_tendency").to_string(),
                dependency: table.cell(row, "dependency").to_string(),
                risk: table.cell(row, "risk").to_string(),
                merit: table.cell(row, "merit").to_string(),
                actions: table.cell(row, "actions").to_string(),
                reward: table.cell(row, "reward").to_string(),
            })
        })
        .collect()
}

/// Human-readable report for a load failure: error kind and message, the
/// attempted path, and what the data directory actually contains.
pub fn describe_load_failure(error: &LoadError, data_dir: &Path) -> String {
    let mut lines = vec![
        "Failed to load reference data. Check file placement and encoding.".to_string(),
        format!("  Error: {}: {}", error.kind(), error),
    ];
    if let Some(path) = error.path() {
        lines.push(format!("  Attempted path: {}", path.display()));
    }
    lines.push(format!("  Data directory: {}", data_dir.display()));
    match directory_listing(data_dir) {
        Ok(names) if names.is_empty() => lines.push("  Files present: (none)".to_string()),
        Ok(names) => lines.push(format!("  Files present: {}", names.join(", "))),
        Err(e) => lines.push(format!("  Files present: (directory not readable: {})", e)),
    }
    lines.join("\n")
}

/// Sorted entry names of a directory
pub fn directory_listing(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut names = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();
    Ok(names)
}

struct Table {
    path: PathBuf,
    columns: HashMap<String, usize>,
    rows: Vec<StringRecord>,
}

impl Table {
    fn cell<'r>(&self, row: &'r StringRecord, column: &str) -> &'r str {
        self.columns
            .get(column)
            .and_then(|&i| row.get(i))
            .unwrap_or("")
    }

    fn parse_dimension(&self, row: &StringRecord, column: &str) -> Result<Dimension, LoadError> {
        self.cell(row, column)
            .parse::<Dimension>()
            .map_err(|e| self.invalid_row(row, e.to_string()))
    }

    fn invalid_row(&self, row: &StringRecord, message: String) -> LoadError {
        LoadError::InvalidRow {
            path: self.path.clone(),
            line: row.position().map(|p| p.line()).unwrap_or(0),
            message,
        }
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|source| LoadError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_table(path: &Path, content: &str, required: &[&str]) -> Result<Table, LoadError> {
    // Spreadsheet tools commonly prepend a BOM
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: HashMap<String, usize> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_string(), i))
        .collect();

    let missing: Vec<String> = required
        .iter()
        .filter(|name| !columns.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        });
    }

    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_error)?;

    Ok(Table {
        path: path.to_path_buf(),
        columns,
        rows,
    })
}
