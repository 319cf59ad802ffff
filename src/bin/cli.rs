//! eventset CLI
//!
//! Generates sample container files and inspects datasets built from them.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eventset::container::ContainerBuilder;
use eventset::{DatasetConfig, EventDataset};
use tracing_subscriber::{fmt, EnvFilter};

/// eventset CLI
#[derive(Parser, Debug)]
#[command(name = "eventset")]
#[command(about = "Index multi-file event containers as one dataset")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write sample container files
    Generate {
        /// Output directory
        #[arg(short, long)]
        out: PathBuf,

        /// Number of files to write
        #[arg(short, long, default_value = "3")]
        files: usize,

        /// Records per file
        #[arg(short, long, default_value = "100")]
        records: usize,

        /// Payload values per record
        #[arg(short, long, default_value = "16")]
        width: usize,

        /// File name prefix
        #[arg(short, long, default_value = "events")]
        prefix: String,
    },

    /// Build a dataset and print a summary
    Inspect {
        /// Directories to search
        #[arg(required = true)]
        directories: Vec<PathBuf>,

        /// Substring a file name must contain
        #[arg(long)]
        filter: Option<String>,

        /// Keep only the first N files per directory
        #[arg(long)]
        max_files: Option<usize>,

        /// Fraction of each file skipped before the window
        #[arg(long, default_value = "0.0")]
        start: f64,

        /// Fraction of each file included in the window
        #[arg(long = "use", default_value = "1.0")]
        use_fraction: f64,

        /// Print the first N samples
        #[arg(long, default_value = "5")]
        show: usize,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,eventset=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    let result = match args.command {
        Commands::Generate {
            out,
            files,
            records,
            width,
            prefix,
        } => generate(&out, files, records, width, &prefix),
        Commands::Inspect {
            directories,
            filter,
            max_files,
            start,
            use_fraction,
            show,
        } => {
            let mut builder = DatasetConfig::builder()
                .directories(directories)
                .start_fraction(start)
                .use_fraction(use_fraction);
            if let Some(filter) = filter {
                builder = builder.name_filter(filter);
            }
            if let Some(max_files) = max_files {
                builder = builder.max_files_per_directory(max_files);
            }
            inspect(builder.build(), show)
        }
    };

    if let Err(e) = result {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

/// Write `files` containers with an f32 payload and an i64 label per record
fn generate(
    out: &Path,
    files: usize,
    records: usize,
    width: usize,
    prefix: &str,
) -> eventset::Result<()> {
    fs::create_dir_all(out)?;

    for file_idx in 0..files {
        let path = out.join(format!("{}_{:04}.evd", prefix, file_idx));

        let payload: Vec<f32> = (0..records * width)
            .map(|i| (file_idx * 1000) as f32 + i as f32 / width as f32)
            .collect();
        let labels: Vec<i64> = (0..records).map(|i| (i % 2) as i64).collect();

        let mut builder = ContainerBuilder::new(&path)?;
        builder.add_array("event_data", &[width], &payload)?;
        builder.add_array("labels", &[], &labels)?;
        let metadata = builder.finish()?;

        tracing::info!(
            "Wrote {} ({} records, {} bytes)",
            metadata.path.display(),
            records,
            metadata.file_size
        );
    }

    Ok(())
}

fn inspect(config: DatasetConfig, show: usize) -> eventset::Result<()> {
    let dataset = EventDataset::open(config)?;

    println!("{} records in {} files", dataset.len(), dataset.files().len());
    for file in dataset.files() {
        println!(
            "  [{}] {}: {} records, selected {}..{}",
            file.file_id,
            file.path.display(),
            file.record_count,
            file.selected.start,
            file.selected.end
        );
    }

    for sample in dataset.iter().take(show) {
        let sample = sample?;
        println!(
            "  #{}: payload {} {:?}, label {} {:?}",
            sample.index,
            sample.payload.dtype().name(),
            sample.payload.shape(),
            sample.label.dtype().name(),
            sample.label.scalar::<i64>()
        );
    }

    Ok(())
}
