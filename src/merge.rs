use crate::archive::SolutionArchive;
use crate::catalog::InstanceCatalog;
use crate::cataloger::FileCataloger;
use crate::config::MergeConfig;
use crate::MergeError;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::info;

/// Totals for one merge run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub files_cataloged: usize,
    pub instances: usize,
    pub solutions_read: usize,
    pub solutions_written: usize,
    pub output_files: Vec<String>,
}

/// Catalogs `config.input_dir` and replays every problem instance through `archive`
/// into the merged files under `config.output_dir`.
///
/// Instances are processed in discovery order. The archive is drained after each
/// instance, so one archive serves the whole run. Existing output files are
/// appended to, never truncated.
pub fn merge_archives<C, A>(
    config: &MergeConfig,
    cataloger: &C,
    archive: &mut A,
) -> Result<MergeSummary, MergeError>
where
    C: FileCataloger + ?Sized,
    A: SolutionArchive + ?Sized,
{
    let mut catalog = InstanceCatalog::new(&config.input_dir, cataloger)?;
    let mut summary = MergeSummary {
        files_cataloged: catalog.files_cataloged(),
        instances: catalog.len(),
        ..MergeSummary::default()
    };
    let mut output_files = BTreeSet::new();

    while let Some(record) = catalog.next_problem_instance_info() {
        let read = record.fill_archive(archive)?;
        let written = record.write_archive_solutions(&config.output_dir, archive)?;
        info!(
            record = %record,
            files = record.file_names().len(),
            read,
            written,
            "merged problem instance"
        );
        summary.solutions_read += read;
        summary.solutions_written += written;
        output_files.insert(record.output_file_name());
    }

    summary.output_files = output_files.into_iter().collect();
    info!(
        instances = summary.instances,
        output_files = summary.output_files.len(),
        "merge complete"
    );
    Ok(summary)
}
