use crate::archive::SolutionArchive;
use crate::scanner::{self, ScanAction, ScanState};
use crate::MergeError;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Identity of one problem instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProblemInstanceKey {
    pub suite_name: String,
    pub function: u32,
    pub dimension: u32,
    pub instance: u32,
}

impl ProblemInstanceKey {
    pub fn new(suite_name: impl Into<String>, function: u32, dimension: u32, instance: u32) -> Self {
        Self {
            suite_name: suite_name.into(),
            function,
            dimension,
            instance,
        }
    }

    /// Same suite, function and dimension; the instance is ignored.
    pub fn same_problem(&self, other: &ProblemInstanceKey) -> bool {
        self.suite_name == other.suite_name
            && self.function == other.function
            && self.dimension == other.dimension
    }
}

impl fmt::Display for ProblemInstanceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_f{:02}_i{:02}_d{:02}",
            self.suite_name, self.function, self.instance, self.dimension
        )
    }
}

/// Position of an in-progress read over a record's files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadCursor {
    pub file_initialized: bool,
    /// Lines consumed from the current file.
    pub position: usize,
    pub file_index: usize,
}

/// A problem instance together with every archive file holding solutions for it.
#[derive(Debug, Clone)]
pub struct ProblemInstanceRecord {
    key: ProblemInstanceKey,
    file_names: Vec<PathBuf>,
    cursor: ReadCursor,
}

impl ProblemInstanceRecord {
    pub fn new(
        file_name: impl Into<PathBuf>,
        suite_name: impl Into<String>,
        function: u32,
        dimension: u32,
        instance: u32,
    ) -> Self {
        Self::from_key(file_name, ProblemInstanceKey::new(suite_name, function, dimension, instance))
    }

    pub fn from_key(file_name: impl Into<PathBuf>, key: ProblemInstanceKey) -> Self {
        Self {
            key,
            file_names: vec![file_name.into()],
            cursor: ReadCursor::default(),
        }
    }

    pub fn key(&self) -> &ProblemInstanceKey {
        &self.key
    }

    pub fn file_names(&self) -> &[PathBuf] {
        &self.file_names
    }

    pub fn cursor(&self) -> ReadCursor {
        self.cursor
    }

    /// Appends `file_name`, rejecting a name that is already listed so no file is read twice.
    pub fn add_file_name(&mut self, file_name: impl Into<PathBuf>) -> Result<(), MergeError> {
        let file_name = file_name.into();
        if self.file_names.contains(&file_name) {
            return Err(MergeError::DuplicateFile {
                file_name,
                key: self.key.to_string(),
            });
        }
        self.file_names.push(file_name);
        Ok(())
    }

    pub fn equals_problem(&self, suite_name: &str, function: u32, dimension: u32) -> bool {
        self.key.suite_name == suite_name
            && self.key.function == function
            && self.key.dimension == dimension
    }

    pub fn equals(&self, suite_name: &str, function: u32, dimension: u32, instance: u32) -> bool {
        self.equals_problem(suite_name, function, dimension) && self.key.instance == instance
    }

    /// Name of the merged output file shared by all instances of this problem.
    pub fn output_file_name(&self) -> String {
        format!(
            "{}_f{:02}_d{:02}_nondominated.adat",
            self.key.suite_name, self.key.function, self.key.dimension
        )
    }

    /// Feeds this instance's solution lines from every file, in list order, to `archive`.
    ///
    /// Returns the number of lines fed. Fails with `MissingInstance` as soon as a
    /// file turns out not to contain this instance's marker.
    pub fn fill_archive<A: SolutionArchive + ?Sized>(
        &mut self,
        archive: &mut A,
    ) -> Result<usize, MergeError> {
        self.cursor = ReadCursor::default();
        let instance = self.key.instance;
        let mut fed = 0;

        for (file_index, file_name) in self.file_names.iter().enumerate() {
            self.cursor = ReadCursor {
                file_initialized: false,
                position: 0,
                file_index,
            };
            let mut reader = BufReader::new(File::open(file_name)?);
            self.cursor.file_initialized = true;

            let mut state = ScanState::Searching;
            let mut line = String::new();
            let mut fed_from_file = 0;
            loop {
                line.clear();
                if reader.read_line(&mut line)? == 0 {
                    break;
                }
                self.cursor.position += 1;
                if !line.ends_with('\n') {
                    line.push('\n');
                }

                let (next, action) = scanner::step(state, &line, instance).map_err(|e| match e {
                    MergeError::Parse(reason) => MergeError::Parse(format!(
                        "{}:{}: {}",
                        file_name.display(),
                        self.cursor.position,
                        reason
                    )),
                    other => other,
                })?;
                state = next;

                if let ScanAction::Emit(solution) = action {
                    archive.add_solution(solution.value1, solution.value2, solution.raw)?;
                    fed_from_file += 1;
                }
                if state == ScanState::Done {
                    break;
                }
            }

            if state == ScanState::Searching {
                return Err(MergeError::MissingInstance {
                    file_name: file_name.clone(),
                    instance,
                });
            }
            debug!(record = %self.key, file = %file_name.display(), solutions = fed_from_file, "read instance block");
            fed += fed_from_file;
        }

        Ok(fed)
    }

    /// Appends this instance's block to the shared output file under `output_path`.
    ///
    /// The block is a `% instance = N` / `%` header followed by every line the
    /// archive yields, in the order it yields them. Returns the number of lines written.
    pub fn write_archive_solutions<A: SolutionArchive + ?Sized>(
        &self,
        output_path: &Path,
        archive: &mut A,
    ) -> Result<usize, MergeError> {
        fs::create_dir_all(output_path)?;
        let file_name = output_path.join(self.output_file_name());
        let file = OpenOptions::new().create(true).append(true).open(&file_name)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "% instance = {}\n%\n", self.key.instance)?;
        let mut written = 0;
        while let Some(text) = archive.next_solution_text() {
            writer.write_all(text.as_bytes())?;
            written += 1;
        }
        writer.flush()?;

        Ok(written)
    }
}

impl fmt::Display for ProblemInstanceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}
