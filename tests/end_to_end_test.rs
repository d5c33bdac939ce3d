use adat_merge::{
    archive::{NondominatedArchive, PassThroughArchive, SolutionArchive},
    cataloger::{ArchiveFact, DirectoryCataloger},
    config::MergeConfig,
    merge::merge_archives,
    InstanceCatalog, MergeError,
};
use std::fs;

const TWO_INSTANCES: &str = "% instance = 1\n\
    1\t1.0\t2.0\n\
    2\t0.5\t3.0\n\
    % instance = 2\n\
    1\t4.0\t4.0\n";

/// Two instances in one file end up as two blocks of the same output file.
#[test]
fn test_one_file_two_instances_pass_through() -> Result<(), MergeError> {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("f.adat");
    let output = temp_dir.path().join("out");
    fs::write(&input, TWO_INSTANCES)?;

    let mut catalog = InstanceCatalog::from_facts(vec![
        ArchiveFact::new(&input, "bbob", 1, 10, 1),
        ArchiveFact::new(&input, "bbob", 1, 10, 2),
    ]);
    assert_eq!(catalog.len(), 2);

    let mut archive = PassThroughArchive::new();
    let mut blocks = Vec::new();
    while let Some(record) = catalog.next_problem_instance_info() {
        record.fill_archive(&mut archive)?;
        blocks.push(record.write_archive_solutions(&output, &mut archive)?);
    }
    assert_eq!(blocks, vec![2, 1]);

    let entries: Vec<_> = fs::read_dir(&output)?.collect::<Result<_, _>>()?;
    assert_eq!(entries.len(), 1);

    let merged = fs::read_to_string(output.join("bbob_f01_d10_nondominated.adat"))?;
    assert_eq!(
        merged,
        "% instance = 1\n%\n1\t1.0\t2.0\n2\t0.5\t3.0\n% instance = 2\n%\n1\t4.0\t4.0\n"
    );
    Ok(())
}

/// A fact pointing at a file without the instance marker aborts the fill.
#[test]
fn test_missing_instance_is_fatal() -> Result<(), MergeError> {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("f.adat");
    fs::write(&input, TWO_INSTANCES)?;

    let mut catalog = InstanceCatalog::from_facts(vec![ArchiveFact::new(&input, "bbob", 1, 10, 3)]);
    let record = catalog.next_problem_instance_info().unwrap();
    let mut archive = PassThroughArchive::new();
    let err = record.fill_archive(&mut archive).unwrap_err();

    match err {
        MergeError::MissingInstance { file_name, instance } => {
            assert_eq!(file_name, input);
            assert_eq!(instance, 3);
        }
        other => panic!("expected MissingInstance, got {}", other),
    }
    Ok(())
}

/// Full run over a directory: runs split across files, a skipped file, two problems.
#[test]
fn test_merge_directory_of_runs() -> Result<(), MergeError> {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("archives");
    let output = temp_dir.path().join("merged");
    fs::create_dir_all(input.join("second_run"))?;

    fs::write(
        input.join("run_f01.adat"),
        "% instance = 1, name = bbob-biobj_f01_i01_d02\n\
         % function evaluation | 2 objectives | 2 variables\n\
         1\t1.0\t3.0\t0.1\t0.1\n\
         % instance = 2, name = bbob-biobj_f01_i02_d02\n\
         % function evaluation | 2 objectives | 2 variables\n\
         1\t5.0\t5.0\t0.2\t0.2\n",
    )?;
    fs::write(
        input.join("second_run").join("run_f01.adat"),
        "% instance = 1, name = bbob-biobj_f01_i01_d02\n\
         % function evaluation | 2 objectives | 2 variables\n\
         1\t3.0\t1.0\t0.3\t0.3\n\
         7\t2.0\t4.0\t0.4\t0.4\n",
    )?;
    fs::write(
        input.join("run_f02.adat"),
        "% instance = 1, name = bbob-biobj_f02_i01_d02\n\
         % function evaluation | 2 objectives | 2 variables\n\
         1\t0.0\t0.0\t0.0\t0.0\n",
    )?;
    fs::write(input.join("broken.adat"), "% instance = x, name = nonsense\n")?;
    fs::write(input.join("notes.txt"), "ignored\n")?;

    let config = MergeConfig::custom(&input, &output).with_extension(Some("adat".to_string()));
    let cataloger = DirectoryCataloger::with_extension("adat");
    let mut archive = NondominatedArchive::new();
    let summary = merge_archives(&config, &cataloger, &mut archive)?;

    assert_eq!(summary.files_cataloged, 3);
    assert_eq!(summary.instances, 3);
    assert_eq!(summary.solutions_read, 5);
    assert_eq!(summary.solutions_written, 4);
    assert_eq!(
        summary.output_files,
        vec![
            "bbob-biobj_f01_d02_nondominated.adat".to_string(),
            "bbob-biobj_f02_d02_nondominated.adat".to_string(),
        ]
    );

    let f01 = fs::read_to_string(output.join("bbob-biobj_f01_d02_nondominated.adat"))?;
    assert_eq!(
        f01,
        "% instance = 1\n%\n\
         1\t1.0\t3.0\t0.1\t0.1\n\
         1\t3.0\t1.0\t0.3\t0.3\n\
         % instance = 2\n%\n\
         1\t5.0\t5.0\t0.2\t0.2\n"
    );
    let f02 = fs::read_to_string(output.join("bbob-biobj_f02_d02_nondominated.adat"))?;
    assert_eq!(f02, "% instance = 1\n%\n1\t0.0\t0.0\t0.0\t0.0\n");
    assert!(archive.next_solution_text().is_none());
    Ok(())
}

/// Running twice appends a second copy of every block instead of overwriting.
#[test]
fn test_rerun_appends() -> Result<(), MergeError> {
    let temp_dir = tempfile::tempdir().unwrap();
    let input = temp_dir.path().join("archives");
    fs::create_dir_all(&input)?;
    fs::write(
        input.join("run.adat"),
        "% instance = 3, name = bbob_f07_i03_d05\n1\t1.0\t1.0\n",
    )?;

    let config = MergeConfig::custom(&input, temp_dir.path().join("merged"));
    let cataloger = DirectoryCataloger::new();
    merge_archives(&config, &cataloger, &mut PassThroughArchive::new())?;
    merge_archives(&config, &cataloger, &mut PassThroughArchive::new())?;

    let merged = fs::read_to_string(config.output_file("bbob_f07_d05_nondominated.adat"))?;
    assert_eq!(merged, "% instance = 3\n%\n1\t1.0\t1.0\n".repeat(2));
    Ok(())
}
