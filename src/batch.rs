//! Multi-file conversion
//!
//! Each input is converted on its own: a file that cannot be read or converted
//! is reported and the remaining files are still attempted. Dump files are
//! named after their input (`<stem>_dump.cypher`) and can be loaded together
//! with the statements from [`loader_statements`]. Two inputs whose names
//! fold to the same dump name cannot both be written: the later one is
//! reported as failed.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{error, info};
use thiserror::Error;

use crate::converters::mei::{convert_mei_to_cypher, ConversionError, ConversionResult, ConversionSettings};
use crate::utils::paths::safe_basename;

/// Appended to the input stem to name its dump
pub const DUMP_SUFFIX: &str = "_dump.cypher";

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot convert {}: {source}", .path.display())]
    Conversion {
        path: PathBuf,
        #[source]
        source: ConversionError,
    },

    #[error("{} would overwrite the dump {name} of {}", .path.display(), .first.display())]
    DumpNameTaken {
        path: PathBuf,
        name: String,
        first: PathBuf,
    },
}

/// Outcome of one input file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<ConversionResult, BatchError>,
}

impl FileReport {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn dump_file_name(&self) -> String {
        dump_file_name(&self.path)
    }
}

/// Name of the dump written for `path`.
pub fn dump_file_name(path: &Path) -> String {
    format!("{}{}", safe_basename(&path.to_string_lossy()), DUMP_SUFFIX)
}

/// Read and convert one file; the path as given is the source name.
pub fn convert_path(
    path: &Path,
    settings: Option<ConversionSettings>,
) -> Result<ConversionResult, BatchError> {
    let mei = fs::read_to_string(path).map_err(|source| BatchError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    convert_mei_to_cypher(&path.to_string_lossy(), &mei, settings).map_err(|source| {
        BatchError::Conversion {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Convert every file, in order, isolating failures.
///
/// A converted file whose dump name is already claimed by an earlier
/// converted file fails with [`BatchError::DumpNameTaken`].
pub fn convert_paths<P: AsRef<Path>>(paths: &[P], settings: &ConversionSettings) -> Vec<FileReport> {
    let mut reports: Vec<FileReport> = paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let outcome = convert_path(path, Some(settings.clone()));
            match &outcome {
                Ok(result) => info!("{}: converted ({} statements)", path.display(), result.statement_count),
                Err(e) => error!("{}", e),
            }
            FileReport {
                path: path.to_path_buf(),
                outcome,
            }
        })
        .collect();
    reject_dump_name_clashes(&mut reports);
    reports
}

/// Fail every converted report whose dump name an earlier converted report
/// already uses.
pub fn reject_dump_name_clashes(reports: &mut [FileReport]) {
    let mut claimed: HashMap<String, PathBuf> = HashMap::new();
    for report in reports.iter_mut().filter(|r| r.is_ok()) {
        let name = report.dump_file_name();
        match claimed.get(&name) {
            Some(first) => {
                let err = BatchError::DumpNameTaken {
                    path: report.path.clone(),
                    name,
                    first: first.clone(),
                };
                error!("{}", err);
                report.outcome = Err(err);
            }
            None => {
                claimed.insert(name, report.path.clone());
            }
        }
    }
}

/// Statements loading the given dumps with APOC, `per_statement` files each.
///
/// `per_statement == 0` puts every file into a single statement.
pub fn loader_statements(dump_files: &[String], per_statement: usize) -> Vec<String> {
    if dump_files.is_empty() {
        return Vec::new();
    }
    let size = if per_statement == 0 {
        dump_files.len()
    } else {
        per_statement
    };

    dump_files
        .chunks(size)
        .map(|group| {
            let files = group
                .iter()
                .map(|f| format!("'{}'", f))
                .collect::<Vec<_>>()
                .join(", ");
            format!("CALL apoc.cypher.runFiles([{}], {{statistics: false}})", files)
        })
        .collect()
}
