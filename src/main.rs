use anyhow::Result;
use clap::Parser;
use console::style;
use std::process::ExitCode;

use jpeg2gif::cli::{print_configuration, SingleArgs};
use jpeg2gif::utils::{error_println, format_duration};
use jpeg2gif::GifEngine;

fn run(args: &SingleArgs) -> Result<ExitCode> {
    // Invalid config values abort before anything is read or written
    let config = args.gif.engine_config()?;
    let json_progress = config.json_progress;

    if !json_progress {
        println!("{}", style("JPEG Sequence to GIF").bold().blue());
        println!();
        if config.verbose {
            print_configuration(&config);
        }
    }

    let engine = GifEngine::new(config);

    match engine.create_gif(&args.input_dir, &args.output_file) {
        Ok(outcome) => {
            engine.report_success(&outcome);
            if !json_progress {
                println!(
                    "  Total processing time: {}",
                    style(format_duration(outcome.processing_time)).bold()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            engine.report_failure(&args.input_dir, &format!("{:#}", e));
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    let args = SingleArgs::parse();

    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error_println(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
