use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mp3meta::report::Summary;
use mp3meta::{LoadResult, Loader};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "mp3meta")]
#[command(author, version, about = "Show duration, bitrate and stream info of MP3 files")]
struct Args {
    /// File or directory to inspect
    path: PathBuf,

    /// Output report file (.csv, .json)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of parallel workers (default: number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Ignore Xing/Info headers and estimate duration from the bitrate
    #[arg(long)]
    no_xing: bool,

    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Log each parsing step to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Only show summary
    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();

    init_logging(args.verbose);

    // Set up thread pool
    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    // Collect MP3 files
    let files: Vec<PathBuf> = if args.path.is_dir() {
        WalkDir::new(&args.path)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| {
                e.path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("mp3"))
                    .unwrap_or(false)
            })
            .map(|e| e.path().to_path_buf())
            .collect()
    } else {
        vec![args.path.clone()]
    };

    if files.is_empty() {
        eprintln!("No .mp3 files found in {}", args.path.display());
        std::process::exit(1);
    }

    // Set up progress bar
    let pb = if !args.quiet && files.len() > 1 {
        let pb = ProgressBar::new(files.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let loader = Loader::new().with_xing(!args.no_xing);

    // Load files in parallel
    let results: Vec<LoadResult> = files
        .par_iter()
        .map(|path| {
            let result = loader.analyze(path);
            if let Some(ref pb) = pb {
                pb.inc(1);
                pb.set_message(result.file_name.clone());
            }
            result
        })
        .collect();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let summary = Summary::from_results(&results);

    if args.json {
        match serde_json::to_string_pretty(&results) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing results: {}", e);
                std::process::exit(1);
            }
        }
    } else if !args.quiet {
        for r in &results {
            print_result(r);
        }
    }

    if !args.json && (files.len() > 1 || args.quiet) {
        eprintln!("\n{}", "─".repeat(70));
        eprintln!(
            "{} file(s), {} ok, {} failed, {} total",
            summary.total,
            summary.ok,
            summary.error,
            format_duration(summary.total_duration)
        );
    }

    if let Some(ref output_path) = args.output {
        if let Err(e) = mp3meta::report::generate(output_path, &results) {
            eprintln!("Failed to write report: {}", e);
            std::process::exit(1);
        }
        if !args.quiet {
            eprintln!("Report saved: {}", output_path.display());
        }
    }

    if summary.error > 0 {
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "mp3meta=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_result(r: &LoadResult) {
    match (&r.metadata, &r.error) {
        (Some(m), _) => println!(
            "{:>9}  {:>4}kbps  {:>5}Hz  {:<8} {:<9}  {}",
            format_duration(m.duration),
            m.bitrate,
            m.frequency,
            m.version,
            m.layer,
            r.file_name
        ),
        (None, error) => println!(
            "\x1b[31m{:<9}\x1b[0m  {}  ({})",
            "[ERROR]",
            r.file_name,
            error.as_deref().unwrap_or("unknown error")
        ),
    }
}

fn format_duration(secs: f64) -> String {
    let total = secs.round() as u64;
    let (h, m, s) = (total / 3600, (total / 60) % 60, total % 60);
    if h > 0 {
        format!("{}:{:02}:{:02}", h, m, s)
    } else {
        format!("{}:{:02}", m, s)
    }
}
