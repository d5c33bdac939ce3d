use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum MergeError {
    Io(std::io::Error),
    EmptyInput { path: PathBuf },
    MissingInstance { file_name: PathBuf, instance: u32 },
    DuplicateFile { file_name: PathBuf, key: String },
    CatalogWarning { file_name: PathBuf, reason: String },
    Parse(String),
    Other(String),
}

impl MergeError {
    /// Only catalog warnings may be skipped; everything else aborts the run.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MergeError::CatalogWarning { .. })
    }

    pub fn warning(file_name: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        MergeError::CatalogWarning {
            file_name: file_name.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::Io(e) => write!(f, "IO error: {}", e),
            MergeError::EmptyInput { path } => {
                write!(f, "Folder '{}' does not exist or is empty", path.display())
            }
            MergeError::MissingInstance { file_name, instance } => write!(
                f,
                "File '{}' does not contain 'instance = {}'",
                file_name.display(),
                instance
            ),
            MergeError::DuplicateFile { file_name, key } => write!(
                f,
                "File '{}' is already listed for problem instance {}",
                file_name.display(),
                key
            ),
            MergeError::CatalogWarning { file_name, reason } => {
                write!(f, "Skipping '{}': {}", file_name.display(), reason)
            }
            MergeError::Parse(e) => write!(f, "Parse error: {}", e),
            MergeError::Other(e) => write!(f, "Error: {}", e),
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for MergeError {
    fn from(err: std::io::Error) -> Self {
        MergeError::Io(err)
    }
}

impl From<String> for MergeError {
    fn from(err: String) -> Self {
        MergeError::Other(err)
    }
}

impl From<&str> for MergeError {
    fn from(err: &str) -> Self {
        MergeError::Other(err.to_string())
    }
}
