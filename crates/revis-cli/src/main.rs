use revis_cli::{CliArgs, FONT_SIZE_ENV, font_size_from_env, run, viz_config};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("revis=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let cli = match CliArgs::parse(&args) {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("\nexample:");
            eprintln!("  revis src/main.rs diagnostics.json out/");
            return ExitCode::from(2);
        }
    };
    let font_size = font_size_from_env(env::var(FONT_SIZE_ENV).ok().as_deref());

    match run(&cli, viz_config(font_size)) {
        Ok(report) => {
            for path in &report.written {
                println!("{}", path.display());
            }
            for skipped in &report.skipped {
                println!("skipped {}: {}", skipped.key, skipped.reason);
            }
            for hint in &report.inline_hints {
                println!(
                    "hint {}:{}: {}",
                    hint.range.start.line + 1,
                    hint.range.start.character + 1,
                    hint.hover_message
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
