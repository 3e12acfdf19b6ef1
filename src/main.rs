// main.rs - CLI entry point

use std::path::Path;
use std::time::Instant;

use pairalign::cli::{Config, InputSource};
use pairalign::data::loaders::load_pairs;
use pairalign::data::first_fasta_record;
use pairalign::prelude::*;

fn main() {
    env_logger::Builder::from_default_env()
        .format_timestamp_secs()
        .init();

    if let Err(e) = run_main() {
        eprintln!("❌ ERROR: {}", e);
        std::process::exit(1);
    }
}

fn run_main() -> Result<(), String> {
    let mut args: Args = argh::from_env();
    let command_line = std::env::args().collect::<Vec<String>>().join(" ");

    // Handle generate config first
    if args.generate_config {
        let sample_config = Config::generate_sample();
        println!("{}", sample_config);
        println!("\n💡 Save this content to a .toml file and use --config /path/to/config.toml");
        return Ok(());
    }

    // Load configuration file if specified
    if let Some(config_path) = args.config.clone() {
        args = args.with_config_file(&config_path)?;
        if !args.json {
            println!("📄 Loaded configuration from: {}", config_path);
        }
    }

    // Validate all arguments
    let validation = validate_args(&args)?;

    if !args.json {
        println!("🚀 pairalign v{}", env!("CARGO_PKG_VERSION"));
        println!("📥 Input: {}", validation.input.description());
        println!("🧬 Mode: {}", validation.scoring.mode().description());
        println!(
            "📊 Scoring: match {}, mismatch {}, gap open {}, gap extend {}",
            validation.scoring.match_score(),
            validation.scoring.mismatch_penalty(),
            validation.scoring.open_gap_penalty(),
            validation.scoring.extend_gap_penalty()
        );
    }

    // Configure thread pool
    if let Some(n) = args.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("Failed to configure thread pool: {}", e))?;
        log::info!("Threads: {}", n);
    } else {
        log::info!("Threads: {} (auto-detected)", rayon::current_num_threads());
    }

    if args.dry_run {
        println!("✅ Dry run completed successfully");
        return Ok(());
    }

    let total_start = Instant::now();

    match &validation.input {
        InputSource::Literal { seq1, seq2 } => {
            let seq1 = Sequence::new("seq1", seq1).map_err(|e| e.to_string())?;
            let seq2 = Sequence::new("seq2", seq2).map_err(|e| e.to_string())?;
            run_single(&args, &validation, &seq1, &seq2)?;
        }
        InputSource::Fasta { fasta1, fasta2 } => {
            let seq1 = first_fasta_record(Path::new(fasta1))?;
            let seq2 = first_fasta_record(Path::new(fasta2))?;
            run_single(&args, &validation, &seq1, &seq2)?;
        }
        InputSource::Records { id1, id2, data_dir } => {
            run_records(&args, &validation, id1, id2, data_dir)?;
        }
        InputSource::Batch { pairs } => {
            run_batch(&args, &validation, pairs, &command_line)?;
        }
        InputSource::Download { ids, data_dir, format } => {
            run_download(&args, &validation, ids, data_dir, *format)?;
        }
    }

    if !args.json {
        println!(
            "⏱️  Total execution time: {:.2}s",
            total_start.elapsed().as_secs_f64()
        );
        println!("🔧 Command: {}", command_line);
    }
    Ok(())
}

/// Align one pair held in memory
fn run_single(args: &Args, validation: &ValidationResult, seq1: &Sequence, seq2: &Sequence) -> Result<(), String> {
    let aligner = Aligner::new(validation.scoring).with_max_cells(validation.max_cells);
    let set = aligner
        .align(seq1.residues(), seq2.residues())
        .map_err(|e| e.to_string())?;
    let response = PairwiseAlignmentResponse::new(&set.best, aligner.config());

    print_response(args, &response, Some(set.co_optimal))?;

    if args.save || args.output.is_some() {
        let persister = LocalFilePersister::new(&args.output_dir)?;
        let result = persister.persist(
            &PersistData::Text(render_report(&response)),
            FileFormat::Alignment,
            args.output.as_deref(),
            "pairwise_alignment",
        );
        report_saved(&result)?;
    }
    Ok(())
}

/// Fetch two records from the local store and align them
fn run_records(
    args: &Args,
    validation: &ValidationResult,
    id1: &str,
    id2: &str,
    data_dir: &str,
) -> Result<(), String> {
    let tools = build_tools(args, validation, data_dir)?;
    let response = tools
        .align_records(id1, id2, validation.database, &validation.scoring)
        .map_err(|e| e.to_string())?;

    print_response(args, &response, None)?;

    if args.save || args.output.is_some() {
        let result = tools.save_report(&response, args.output.as_deref());
        report_saved(&result)?;
    }
    Ok(())
}

/// Save records from the local store into the output directory
fn run_download(
    args: &Args,
    validation: &ValidationResult,
    ids: &[String],
    data_dir: &str,
    format: RecordFormat,
) -> Result<(), String> {
    let tools = build_tools(args, validation, data_dir)?;
    let result = tools.download_data_local(ids, validation.database, format, args.output.as_deref());

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize result: {}", e))?;
        println!("{}", json);
        return if result.success { Ok(()) } else { Err("Download failed".to_string()) };
    }
    report_saved(&result)
}

/// Align every pair of a pairs file in parallel
fn run_batch(args: &Args, validation: &ValidationResult, pairs: &str, command_line: &str) -> Result<(), String> {
    let jobs = load_pairs(Path::new(pairs))?;
    if !args.json {
        println!("📋 Loaded {} pairs from {}", jobs.len(), pairs);
    }

    let aligner = Aligner::new(validation.scoring).with_max_cells(validation.max_cells);
    let outcomes = align_batch(&jobs, &aligner, !args.json);
    let failed = outcomes.iter().filter(|o| !o.is_success()).count();

    if args.json {
        let records: Vec<serde_json::Value> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(response) => serde_json::json!({"name": outcome.name, "result": response}),
                Err(e) => serde_json::json!({"name": outcome.name, "error": e.to_string()}),
            })
            .collect();
        let json = serde_json::to_string_pretty(&records)
            .map_err(|e| format!("Failed to serialize results: {}", e))?;
        println!("{}", json);
    } else {
        for outcome in &outcomes {
            match &outcome.result {
                Ok(response) => println!("   {} score {}", outcome.name, response.score),
                Err(e) => println!("   ⚠️  {} failed: {}", outcome.name, e),
            }
        }
        println!("✅ Aligned {} pairs ({} failed)", outcomes.len() - failed, failed);
    }

    if let Some(summary) = &args.summary {
        write_summary(summary, &args.summary_format, &outcomes, command_line)?;
    }
    Ok(())
}

fn build_tools(args: &Args, validation: &ValidationResult, data_dir: &str) -> Result<AlignmentTools, String> {
    let persister = LocalFilePersister::new(&args.output_dir)?;
    Ok(AlignmentTools::new(Box::new(LocalFetcher::new(data_dir)), Box::new(persister))
        .with_max_cells(validation.max_cells))
}

fn print_response(args: &Args, response: &PairwiseAlignmentResponse, co_optimal: Option<u64>) -> Result<(), String> {
    if args.json {
        let json = serde_json::to_string_pretty(response)
            .map_err(|e| format!("Failed to serialize result: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    println!("\n🎯 Alignment Score: {}", response.score);
    if let Some(count) = co_optimal {
        if count > 1 {
            println!("🔀 Co-optimal alignments: {} (showing the first)", count);
        }
    }
    println!("\n{}", response.full_alignment_str);
    Ok(())
}

fn report_saved(result: &LocalFileResult) -> Result<(), String> {
    match (&result.path, result.success) {
        (Some(path), true) => {
            println!("📁 Saved {} file to: {}", result.format.extension(), path.display());
            Ok(())
        }
        _ => Err(result
            .error
            .clone()
            .unwrap_or_else(|| "Failed to save file".to_string())),
    }
}
