use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use envx_core::complete_schema;
use envx_engine::{
    EnvxConfig, OutputFormat, format_env, generate_type_declarations, load_from_path, parse,
    render_dotenv,
};
use tracing::{Level, debug};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "envx")]
#[command(version, about = "Build, check and type .envx environment files")]
struct Cli {
    /// Enable debug logging on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate a .env file from a .envx file.
    Build(BuildArgs),
    /// Validate a .envx file without writing anything.
    Check(InputArgs),
    /// Print the resolved and validated values.
    Print(PrintArgs),
    /// Generate TypeScript declarations from a .envx file.
    Types(TypesArgs),
}

#[derive(Debug, Args)]
struct InputArgs {
    /// Path to the .envx file (default: config `input` or `.envx`).
    #[arg(short, long)]
    input: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct BuildArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Output .env path (default: config `output.env` or `.env`).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Overwrite an existing output file without asking.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Debug, Args)]
struct PrintArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Args)]
struct TypesArgs {
    #[command(flatten)]
    source: InputArgs,
    /// Output declarations path (default: config `output.types` or `envx.ts`).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_config().and_then(|config| match cli.command {
        Command::Build(args) => run_build(args, &config),
        Command::Check(args) => run_check(args, &config),
        Command::Print(args) => run_print(args, &config),
        Command::Types(args) => run_types(args, &config),
    });

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(io::stderr)
        .init();
}

fn load_config() -> Result<EnvxConfig, String> {
    EnvxConfig::load_or_default(".")
        .map_err(|err| format!("Failed to load '{}': {err}", envx_engine::CONFIG_FILE_NAME))
}

fn input_path(args: &InputArgs, config: &EnvxConfig) -> PathBuf {
    args.input
        .clone()
        .unwrap_or_else(|| config.input_path().to_path_buf())
}

fn run_build(args: BuildArgs, config: &EnvxConfig) -> Result<(), String> {
    let input = input_path(&args.source, config);
    let output = args
        .output
        .unwrap_or_else(|| config.env_output_path().to_path_buf());
    let overwrite = args.overwrite || config.overwrite();

    if !overwrite && output.exists() && !confirm_overwrite(&output)? {
        println!("[envx:info] Operation cancelled.");
        return Ok(());
    }

    let outcome = load_from_path(&input, None).map_err(|err| err.to_string())?;
    write_output(&output, &render_dotenv(&outcome.result))?;

    println!(
        "[envx:success] .env file generated at: {}",
        output.display()
    );
    Ok(())
}

fn run_check(args: InputArgs, config: &EnvxConfig) -> Result<(), String> {
    let input = input_path(&args, config);
    let outcome = load_from_path(&input, None).map_err(|err| err.to_string())?;
    debug!(keys = outcome.result.len(), "check passed");
    println!("[envx:success] No validation errors found in .envx file.");
    Ok(())
}

fn run_print(args: PrintArgs, config: &EnvxConfig) -> Result<(), String> {
    let input = input_path(&args.source, config);
    let outcome = load_from_path(&input, None).map_err(|err| err.to_string())?;
    let rendered = format_env(&outcome.result, args.format)
        .map_err(|err| format!("Failed to format output: {err}"))?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn run_types(args: TypesArgs, config: &EnvxConfig) -> Result<(), String> {
    let input = input_path(&args.source, config);
    let output = args
        .output
        .unwrap_or_else(|| config.types_output_path().to_path_buf());

    let content = fs::read_to_string(&input)
        .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?;
    let parsed = parse(&content).map_err(|err| err.to_string())?;
    let schema = complete_schema(&parsed.entries, &parsed.schema);

    write_output(&output, &generate_type_declarations(&schema))?;

    println!(
        "[envx:success] TypeScript definitions generated at: {}",
        output.display()
    );
    Ok(())
}

/// Asks on stdin whether `path` may be replaced. Only `y` confirms.
fn confirm_overwrite(path: &Path) -> Result<bool, String> {
    print!("\"{}\" exists. Overwrite? (y/N): ", path.display());
    io::stdout()
        .flush()
        .map_err(|err| format!("Failed to write prompt: {err}"))?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

fn write_output(path: &Path, contents: &str) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                format!(
                    "Failed to create output directory '{}': {err}",
                    parent.display()
                )
            })?;
        }
    }

    fs::write(path, contents)
        .map_err(|err| format!("Failed to write '{}': {err}", path.display()))
}
