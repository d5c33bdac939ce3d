use std::path::PathBuf;

const DEFAULT_INPUT_DIR: &str = "./archives";
const DEFAULT_OUTPUT_DIR: &str = "./archives_merged";
const DEFAULT_EXTENSION: &str = "adat";

/// Where to read archive files from and where to write merged files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Only files with this extension are cataloged; `None` takes every file.
    pub extension: Option<String>,
}

impl MergeConfig {
    /// Configuration from `ADAT_MERGE_INPUT_DIR`, `ADAT_MERGE_OUTPUT_DIR` and
    /// `ADAT_MERGE_EXTENSION`, falling back to defaults. An empty extension
    /// variable disables filtering.
    pub fn from_env() -> Self {
        let input_dir = std::env::var("ADAT_MERGE_INPUT_DIR").unwrap_or_else(|_| DEFAULT_INPUT_DIR.to_string());
        let output_dir = std::env::var("ADAT_MERGE_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string());
        let extension = match std::env::var("ADAT_MERGE_EXTENSION") {
            Ok(ext) if ext.is_empty() => None,
            Ok(ext) => Some(ext),
            Err(_) => Some(DEFAULT_EXTENSION.to_string()),
        };
        Self {
            input_dir: PathBuf::from(input_dir),
            output_dir: PathBuf::from(output_dir),
            extension,
        }
    }

    /// Custom configuration for tests; no extension filter.
    pub fn custom(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            extension: None,
        }
    }

    pub fn with_extension(mut self, extension: Option<String>) -> Self {
        self.extension = extension.map(|ext| ext.trim_start_matches('.').to_string());
        self
    }

    /// Path of a merged output file.
    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self::custom(DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR).with_extension(Some(DEFAULT_EXTENSION.to_string()))
    }
}
