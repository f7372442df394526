//! Batch compilation
//!
//! Files are compiled independently of each other. With `parallel` set they
//! run on the rayon pool; reports always come back in input order so error
//! output is reproducible.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;
use walkdir::WalkDir;

use crate::compiler::Compiler;
use crate::error::{Error, JournalError, Result};
use crate::model::Document;

/// All files below `dir` with the given extension, sorted by path
pub fn discover(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) == Some(extension) {
            paths.push(entry.into_path());
        }
    }

    paths.sort();
    Ok(paths)
}

/// Outcome for one input file
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub document: Option<Document>,
    pub errors: Vec<JournalError>,
    /// Set when the file could not be read at all
    pub failure: Option<Error>,
}

impl FileReport {
    pub fn is_success(&self) -> bool {
        self.document.is_some()
    }

    fn compile(compiler: &Compiler, path: &Path) -> Self {
        let report = match compiler.compile_path(path) {
            Ok(compilation) => Self {
                path: path.to_path_buf(),
                document: compilation.document,
                errors: compilation.errors,
                failure: None,
            },
            Err(e) => Self {
                path: path.to_path_buf(),
                document: None,
                errors: Vec::new(),
                failure: Some(e),
            },
        };

        info!(
            path = %path.display(),
            compiled = report.is_success(),
            errors = report.errors.len(),
            "compiled journal"
        );
        report
    }
}

/// Compile every path, returning reports in the order of `paths`
pub fn compile_files(compiler: &Compiler, paths: &[PathBuf], parallel: bool) -> Vec<FileReport> {
    if parallel {
        paths
            .par_iter()
            .map(|path| FileReport::compile(compiler, path))
            .collect()
    } else {
        paths
            .iter()
            .map(|path| FileReport::compile(compiler, path))
            .collect()
    }
}

/// Counts over a batch of reports
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub compiled: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let compiled = reports.iter().filter(|r| r.is_success()).count();
        Self {
            compiled,
            failed: reports.len() - compiled,
        }
    }

    pub fn total(&self) -> usize {
        self.compiled + self.failed
    }

    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}
