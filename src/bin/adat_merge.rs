use adat_merge::archive::{NondominatedArchive, PassThroughArchive, SolutionArchive};
use adat_merge::cataloger::DirectoryCataloger;
use adat_merge::config::MergeConfig;
use adat_merge::merge::merge_archives;
use adat_merge::MergeError;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "adat_merge")]
#[command(about = "Merge archive files into one non-dominated archive per problem", long_about = None)]
struct Cli {
    /// Folder with the archive files (searched recursively)
    input: Option<PathBuf>,
    /// Folder for the merged *_nondominated.adat files
    output: Option<PathBuf>,
    /// Only read files with this extension
    #[arg(long, conflicts_with = "all_files")]
    extension: Option<String>,
    /// Read every file regardless of extension
    #[arg(long)]
    all_files: bool,
    /// Copy every solution instead of keeping only non-dominated ones
    #[arg(long)]
    keep_dominated: bool,
    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,
}

impl Cli {
    fn into_config(self) -> MergeConfig {
        let mut config = MergeConfig::from_env();
        if let Some(input) = self.input {
            config.input_dir = input;
        }
        if let Some(output) = self.output {
            config.output_dir = output;
        }
        if self.all_files {
            config.extension = None;
        } else if self.extension.is_some() {
            config = config.with_extension(self.extension);
        }
        config
    }
}

fn main() -> Result<(), MergeError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let keep_dominated = cli.keep_dominated;
    let summary_json = cli.summary_json;
    let config = cli.into_config();

    tracing::info!(
        input = %config.input_dir.display(),
        output = %config.output_dir.display(),
        extension = ?config.extension,
        "starting merge"
    );

    let cataloger = match &config.extension {
        Some(extension) => DirectoryCataloger::with_extension(extension.clone()),
        None => DirectoryCataloger::new(),
    };
    let mut archive: Box<dyn SolutionArchive> = if keep_dominated {
        Box::new(PassThroughArchive::new())
    } else {
        Box::new(NondominatedArchive::new())
    };

    let summary = merge_archives(&config, &cataloger, archive.as_mut())?;

    if summary_json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| MergeError::Other(format!("summary serialize: {}", e)))?;
        println!("{}", json);
    }
    Ok(())
}
