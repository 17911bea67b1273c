//! Document structure recovery over extractor dumps.
//!
//! Usage:
//!   cargo run --bin recover_structure -- dumps/report.json
//!   cargo run --bin recover_structure -- dumps/ --output-dir structures/
//!   cargo run --bin recover_structure -- dumps/ --config tuning.json --verbose

use clap::Parser;
use section_oxide::{BatchOutcome, JsonFragmentSource, StructureConfig, StructureRecovery};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "recover_structure")]
#[command(about = "Recover sections, captions and paragraphs from extractor dumps", long_about = None)]
struct Cli {
    /// A JSON dump or a directory of JSON dumps
    input: PathBuf,

    /// Write one <stem>.structure.json per document into this directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// JSON file with configuration overrides
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Disable the chain search time budget
    #[arg(long)]
    no_budget: bool,

    /// Debug-level logging
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(cli: &Cli) -> section_oxide::Result<StructureConfig> {
    let config = match &cli.config {
        Some(path) => StructureConfig::from_json(&fs::read_to_string(path)?)?,
        None => StructureConfig::default(),
    };
    Ok(if cli.no_budget {
        config.with_resolution_budget(None)
    } else {
        config
    })
}

fn discover_dumps(input: &Path) -> std::io::Result<Vec<PathBuf>> {
    if !input.is_dir() {
        return Ok(vec![input.to_path_buf()]);
    }

    let mut dumps: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    dumps.sort();
    Ok(dumps)
}

fn write_structure(output_dir: &Path, document_id: &str, json: &str) -> std::io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{}.structure.json", document_id));
    fs::write(&path, json)?;
    Ok(path)
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        },
    };

    let dumps = match discover_dumps(&cli.input) {
        Ok(dumps) if !dumps.is_empty() => dumps,
        Ok(_) => {
            eprintln!("Error: no JSON dumps found in {}", cli.input.display());
            return ExitCode::FAILURE;
        },
        Err(e) => {
            eprintln!("Error reading {}: {}", cli.input.display(), e);
            return ExitCode::FAILURE;
        },
    };

    let print_to_stdout = cli.output_dir.is_none() && !cli.input.is_dir();
    let sources: Vec<JsonFragmentSource> = dumps
        .iter()
        .map(|path| JsonFragmentSource::new(path, &config))
        .collect();

    let engine = StructureRecovery::new(config);
    let start = Instant::now();
    let outcomes = engine.recover_batch(&sources);
    let elapsed = start.elapsed();

    let mut recovered = 0usize;
    let mut skipped = 0usize;

    for outcome in &outcomes {
        match outcome {
            BatchOutcome::Recovered {
                document_id,
                structure,
            } => {
                let json = match structure.to_json_pretty() {
                    Ok(json) => json,
                    Err(e) => {
                        eprintln!("✗ {}: {}", document_id, e);
                        skipped += 1;
                        continue;
                    },
                };

                if let Some(output_dir) = &cli.output_dir {
                    match write_structure(output_dir, document_id, &json) {
                        Ok(path) => eprintln!(
                            "✓ {}: {} paragraphs, {} headers → {}",
                            document_id,
                            structure.paragraphs.len(),
                            structure.headers.len(),
                            path.display()
                        ),
                        Err(e) => {
                            eprintln!("✗ {}: {}", document_id, e);
                            skipped += 1;
                            continue;
                        },
                    }
                } else {
                    if print_to_stdout {
                        println!("{}", json);
                    }
                    eprintln!(
                        "✓ {}: {} paragraphs, {} headers",
                        document_id,
                        structure.paragraphs.len(),
                        structure.headers.len()
                    );
                }
                recovered += 1;
            },
            BatchOutcome::Skipped {
                document_id,
                reason,
            } => {
                eprintln!("✗ {}: {}", document_id, reason);
                skipped += 1;
            },
        }
    }

    eprintln!("\n{}", "=".repeat(60));
    eprintln!("  Documents:    {}", outcomes.len());
    eprintln!("  ✓ Recovered:  {}", recovered);
    eprintln!("  ✗ Skipped:    {}", skipped);
    eprintln!("  Total Time:   {:.2}s", elapsed.as_secs_f64());
    eprintln!("{}", "=".repeat(60));

    if recovered == 0 {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
