use crate::cataloger::{ArchiveFact, FileCataloger};
use crate::problem_instance::{ProblemInstanceKey, ProblemInstanceRecord};
use crate::MergeError;
use rustc_hash::FxHashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// All problem instances found in a set of archive files, in discovery order.
#[derive(Debug, Default)]
pub struct InstanceCatalog {
    problem_instances: Vec<ProblemInstanceRecord>,
    index: FxHashMap<ProblemInstanceKey, usize>,
    current_instance: usize,
    files_cataloged: usize,
}

impl InstanceCatalog {
    /// Catalogs every candidate file under `input_path`.
    ///
    /// Files whose facts cannot be extracted are logged and skipped; any other
    /// failure aborts construction.
    pub fn new<C: FileCataloger + ?Sized>(input_path: &Path, cataloger: &C) -> Result<Self, MergeError> {
        let input_files = cataloger.list_candidate_files(input_path)?;
        if input_files.is_empty() {
            return Err(MergeError::EmptyInput {
                path: input_path.to_path_buf(),
            });
        }

        let mut fact_sets = Vec::with_capacity(input_files.len());
        for input_file in &input_files {
            match cataloger.extract_archive_facts(input_file) {
                Ok(facts) => fact_sets.push(facts),
                Err(e) if e.is_recoverable() => warn!("{}", e),
                Err(e) => return Err(e),
            }
        }
        let files_cataloged = fact_sets.len();
        info!(files = files_cataloged, "Successfully processed archive information");

        let mut catalog = Self::default();
        catalog.insert_facts(fact_sets.into_iter().flatten());
        catalog.files_cataloged = files_cataloged;
        info!(instances = catalog.len(), "Stored archive information");
        Ok(catalog)
    }

    /// Builds a catalog directly from facts, merging facts that share a key.
    ///
    /// With no cataloger to ask, `files_cataloged` is the number of distinct
    /// file names among the facts.
    pub fn from_facts(facts: impl IntoIterator<Item = ArchiveFact>) -> Self {
        let mut catalog = Self::default();
        catalog.insert_facts(facts);
        catalog.files_cataloged = catalog_file_count(&catalog);
        catalog
    }

    fn insert_facts(&mut self, facts: impl IntoIterator<Item = ArchiveFact>) {
        for fact in facts {
            self.add_entry(fact.file_name, &fact.suite_name, fact.function, fact.dimension, fact.instance);
        }
    }

    /// Adds `file_name` to the record for this key, creating the record on first sight.
    fn add_entry(
        &mut self,
        file_name: PathBuf,
        suite_name: &str,
        function: u32,
        dimension: u32,
        instance: u32,
    ) {
        let key = ProblemInstanceKey::new(suite_name, function, dimension, instance);
        match self.index.get(&key) {
            Some(&position) => {
                if let Err(e) = self.problem_instances[position].add_file_name(file_name) {
                    warn!("{}", e);
                }
            }
            None => {
                self.index.insert(key.clone(), self.problem_instances.len());
                self.problem_instances.push(ProblemInstanceRecord::from_key(file_name, key));
            }
        }
    }

    /// Returns the next record and advances, or `None` once every record was handed out.
    pub fn next_problem_instance_info(&mut self) -> Option<&mut ProblemInstanceRecord> {
        if self.current_instance >= self.problem_instances.len() {
            return None;
        }
        self.current_instance += 1;
        self.problem_instances.get_mut(self.current_instance - 1)
    }

    pub fn records(&self) -> &[ProblemInstanceRecord] {
        &self.problem_instances
    }

    pub fn len(&self) -> usize {
        self.problem_instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problem_instances.is_empty()
    }

    /// Files whose facts made it into the catalog.
    pub fn files_cataloged(&self) -> usize {
        self.files_cataloged
    }
}

fn catalog_file_count(catalog: &InstanceCatalog) -> usize {
    let mut seen: Vec<&Path> = catalog
        .problem_instances
        .iter()
        .flat_map(|record| record.file_names().iter().map(PathBuf::as_path))
        .collect();
    seen.sort();
    seen.dedup();
    seen.len()
}

impl fmt::Display for InstanceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in &self.problem_instances {
            writeln!(f, "{}", record)?;
        }
        Ok(())
    }
}
