use crate::problem_instance::ProblemInstanceKey;
use crate::scanner::{get_key_value, COMMENT_MARKER};
use crate::MergeError;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One file's contribution to one problem instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFact {
    pub file_name: PathBuf,
    pub suite_name: String,
    pub function: u32,
    pub dimension: u32,
    pub instance: u32,
}

impl ArchiveFact {
    pub fn new(
        file_name: impl Into<PathBuf>,
        suite_name: impl Into<String>,
        function: u32,
        dimension: u32,
        instance: u32,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            suite_name: suite_name.into(),
            function,
            dimension,
            instance,
        }
    }

    pub fn key(&self) -> ProblemInstanceKey {
        ProblemInstanceKey::new(self.suite_name.clone(), self.function, self.dimension, self.instance)
    }
}

/// Finds archive files and reports which problem instances each one covers.
pub trait FileCataloger {
    /// Candidate files under `directory`. A missing directory yields an empty list.
    fn list_candidate_files(&self, directory: &Path) -> Result<Vec<PathBuf>, MergeError>;

    /// Facts for one file. A `CatalogWarning` means the file should be skipped.
    fn extract_archive_facts(&self, path: &Path) -> Result<Vec<ArchiveFact>, MergeError>;
}

/// Catalogs archive files on disk, reading the instance markers in each file.
///
/// A marker line looks like `% instance = 2, name = bbob-biobj_f01_i02_d05`.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCataloger {
    extension: Option<String>,
}

impl DirectoryCataloger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only list files ending in `.{extension}`.
    pub fn with_extension(extension: impl Into<String>) -> Self {
        Self {
            extension: Some(extension.into()),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        match &self.extension {
            Some(wanted) => path.extension().map_or(false, |ext| ext == wanted.as_str()),
            None => true,
        }
    }
}

impl FileCataloger for DirectoryCataloger {
    fn list_candidate_files(&self, directory: &Path) -> Result<Vec<PathBuf>, MergeError> {
        if !directory.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(directory) {
            let entry = entry.map_err(|e| MergeError::Io(e.into()))?;
            if entry.file_type().is_file() && self.accepts(entry.path()) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn extract_archive_facts(&self, path: &Path) -> Result<Vec<ArchiveFact>, MergeError> {
        let bytes = fs::read(path)?;
        let text = String::from_utf8(bytes)
            .map_err(|_| MergeError::warning(path, "file is not valid UTF-8"))?;

        let mut facts: Vec<ArchiveFact> = Vec::new();
        for line in text.lines() {
            let Some(comment) = line.strip_prefix(COMMENT_MARKER) else {
                continue;
            };
            if !comment.contains("instance") {
                continue;
            }
            let fact = parse_marker(path, comment)?;
            if !facts.contains(&fact) {
                facts.push(fact);
            }
        }

        if facts.is_empty() {
            return Err(MergeError::warning(path, "no instance markers found"));
        }
        Ok(facts)
    }
}

fn parse_marker(path: &Path, comment: &str) -> Result<ArchiveFact, MergeError> {
    let instance_value = get_key_value(comment, "instance")
        .ok_or_else(|| MergeError::warning(path, format!("marker without instance value: '%{}'", comment)))?;
    let instance = instance_value
        .parse::<u32>()
        .map_err(|_| MergeError::warning(path, format!("invalid instance '{}'", instance_value)))?;
    let name = get_key_value(comment, "name")
        .ok_or_else(|| MergeError::warning(path, format!("marker without problem name: '%{}'", comment)))?;
    let (suite_name, function, name_instance, dimension) = parse_problem_name(name)
        .ok_or_else(|| MergeError::warning(path, format!("cannot parse problem name '{}'", name)))?;

    if name_instance != instance {
        return Err(MergeError::warning(
            path,
            format!("problem name '{}' disagrees with instance {}", name, instance),
        ));
    }
    Ok(ArchiveFact::new(path, suite_name, function, dimension, instance))
}

/// Splits `{suite}_f{function}_i{instance}_d{dimension}` into its parts.
///
/// Returns `(suite, function, instance, dimension)`. The suite name may itself
/// contain underscores.
pub fn parse_problem_name(name: &str) -> Option<(String, u32, u32, u32)> {
    let mut parts = name.rsplitn(4, '_');
    let dimension = parts.next()?.strip_prefix('d')?.parse().ok()?;
    let instance = parts.next()?.strip_prefix('i')?.parse().ok()?;
    let function = parts.next()?.strip_prefix('f')?.parse().ok()?;
    let suite = parts.next().filter(|s| !s.is_empty())?;
    Some((suite.to_string(), function, instance, dimension))
}
