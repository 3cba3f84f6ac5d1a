use anyhow::Result;
use clap::Parser;
use console::style;
use std::process::ExitCode;

use jpeg2gif::cli::{print_configuration, BatchArgs};
use jpeg2gif::utils::{error_println, format_duration};
use jpeg2gif::{BatchSummary, GifEngine, JsonMessage, SequenceStatus};

/// Validate command line arguments
fn validate_inputs(args: &BatchArgs) -> Result<()> {
    if !args.base_dir.exists() {
        return Err(anyhow::anyhow!(
            "Base directory does not exist: {}",
            args.base_dir.display()
        ));
    }
    if !args.base_dir.is_dir() {
        return Err(anyhow::anyhow!(
            "Base path is not a directory: {}",
            args.base_dir.display()
        ));
    }
    Ok(())
}

fn print_summary(summary: &BatchSummary, dry_run: bool) {
    println!();
    let header = if dry_run {
        style("Dry Run Results Summary:").bold().cyan()
    } else {
        style("Results Summary:").bold().green()
    };
    println!("{}", header);
    println!("  Sequence folders found: {}", style(summary.discovered).bold());

    let converted_label = if dry_run {
        "Would be created"
    } else {
        "GIF files created"
    };
    println!(
        "  {}: {}",
        converted_label,
        style(summary.converted).bold().green()
    );
    if summary.skipped > 0 {
        println!(
            "  Skipped (no JPEG images): {}",
            style(summary.skipped).bold().yellow()
        );
    }
    if summary.failed > 0 {
        println!("  Failed: {}", style(summary.failed).bold().red());
        println!();
        println!("{}", style("Errors encountered:").bold().red());
        let failures = summary.results.iter().filter_map(|result| match &result.status {
            SequenceStatus::Failed(message) => Some((&result.folder, message)),
            _ => None,
        });
        for (i, (folder, message)) in failures.enumerate() {
            println!(
                "  {}: {} - {}",
                style(format!("#{}", i + 1)).dim(),
                style(folder.sequence_path.display()).bold().red(),
                message
            );
        }
    }

    println!();
    println!(
        "  Total processing time: {}",
        style(format_duration(summary.total_time)).bold()
    );
}

fn run(args: &BatchArgs) -> Result<()> {
    let config = args.gif.engine_config()?;
    validate_inputs(args)?;

    let json_progress = config.json_progress;
    let dry_run = config.dry_run;

    if !json_progress {
        println!("{}", style("JPEG Sequence to GIF - Batch Mode").bold().blue());
        println!();
        if config.verbose {
            print_configuration(&config);
        }
    }

    let engine = GifEngine::new(config);
    let summary = engine.process_all_sequences(&args.base_dir);

    if json_progress {
        JsonMessage::summary(&summary);
    } else {
        print_summary(&summary, dry_run);
        println!();
        println!(
            "{}",
            style(format!(
                "Done: {} GIF file(s) {}",
                summary.converted,
                if dry_run { "planned" } else { "created" }
            ))
            .bold()
        );
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = BatchArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error_println(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
