use clap::{Parser, Subcommand, ValueEnum};
use pyjava_transpiler::parser::Parser as _;
use pyjava_transpiler::{
    CompileError, GenerateOptions, IndentMode, Mapping, PythonParser, generate_to_path, transpile_with,
};
use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

#[derive(Parser)]
#[command(name = "pyjava")]
#[command(about = "pyjava - compile a Python class subset to Java")]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Java from .py files
    Generate {
        /// Path to .py file or directory
        #[arg(required_unless_present = "stdin")]
        file: Option<PathBuf>,

        /// Read from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON with source mappings
        #[arg(long, requires = "stdin")]
        json: bool,

        /// Write to this file instead of next to the input (single file or stdin only)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// How statement indentation is computed
        #[arg(long, value_enum, default_value_t = Indent::Source)]
        indent: Indent,

        /// Spaces per nesting level with `--indent structural`
        #[arg(long, default_value_t = 4)]
        indent_width: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Indent {
    /// Reuse each statement's source column
    Source,
    /// Indent by nesting depth
    Structural,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate { file, stdin, json, output, indent, indent_width } => {
            let options = GenerateOptions {
                indent: match indent {
                    Indent::Source => IndentMode::SourceColumn,
                    Indent::Structural => IndentMode::Structural { width: indent_width },
                },
            };

            let ok = if stdin {
                generate_stdin(&options, json, output.as_deref())
            } else if let Some(path) = file {
                generate_path(&path, &options, output.as_deref())
            } else {
                eprintln!("Error: provide a file/directory or use --stdin");
                false
            };

            if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "pyjava_transpiler=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn generate_stdin(options: &GenerateOptions, json_output: bool, output: Option<&Path>) -> bool {
    let mut source = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut source) {
        eprintln!("Error: failed to read stdin: {}", e);
        return false;
    }

    let result = match transpile_with(&source, options) {
        Ok(result) => result,
        Err(e) => {
            report(&e, &source, "<stdin>");
            return false;
        }
    };

    let rendered = if json_output {
        match serde_json::to_string(&result) {
            Ok(json) => json + "\n",
            Err(e) => {
                eprintln!("Error: failed to serialize result: {}", e);
                return false;
            }
        }
    } else {
        result.code
    };

    match output {
        Some(path) => write_output(path, &rendered),
        None => {
            print!("{}", rendered);
            true
        }
    }
}

fn generate_path(path: &Path, options: &GenerateOptions, output: Option<&Path>) -> bool {
    if path.is_file() {
        if path.extension().is_none_or(|ext| ext != "py") {
            eprintln!("Error: {} is not a .py file", path.display());
            return false;
        }
        let start = Instant::now();
        let target = output.map_or_else(|| path.with_extension("java"), Path::to_path_buf);
        if generate_file(path, &target, options).is_none() {
            return false;
        }
        print_summary(1, start.elapsed());
        true
    } else if path.is_dir() {
        if output.is_some() {
            eprintln!("Error: --output cannot be used with a directory");
            return false;
        }
        generate_directory(path, options)
    } else {
        eprintln!("Error: {} does not exist", path.display());
        false
    }
}

fn generate_directory(dir: &Path, options: &GenerateOptions) -> bool {
    let start = Instant::now();
    let mut file_count = 0;
    let mut failures = 0;

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "py"))
    {
        let path = entry.path();
        match generate_file(path, &path.with_extension("java"), options) {
            Some(_) => file_count += 1,
            None => failures += 1,
        }
    }

    if file_count == 0 && failures == 0 {
        eprintln!("No .py files found in {}", dir.display());
        return false;
    }

    print_summary(file_count, start.elapsed());
    failures == 0
}

fn generate_file(path: &Path, target: &Path, options: &GenerateOptions) -> Option<Vec<Mapping>> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: failed to read {}: {}", path.display(), e);
            return None;
        }
    };

    let result = PythonParser::new()
        .parse(&source)
        .map_err(CompileError::from)
        .and_then(|module| Ok(generate_to_path(&module, target, options)?));

    match result {
        Ok(mappings) => {
            print_generated(&target.display().to_string());
            Some(mappings)
        }
        Err(e) => {
            report(&e, &source, &path.display().to_string());
            None
        }
    }
}

fn write_output(path: &Path, content: &str) -> bool {
    match fs::write(path, content) {
        Ok(()) => true,
        Err(e) => {
            eprintln!("Error: failed to write {}: {}", path.display(), e);
            false
        }
    }
}

fn report(error: &CompileError, source: &str, filename: &str) {
    tracing::debug!(?error, "compile failed");
    if io::stderr().is_terminal() {
        eprint!("{}", error.render_color(source, filename));
    } else {
        eprint!("{}", error.render(source, filename));
    }
}

fn print_generated(path: &str) {
    let is_tty = io::stderr().is_terminal();
    if is_tty {
        eprintln!("  \x1b[32m✓\x1b[0m {}", path);
    } else {
        eprintln!("  ✓ {}", path);
    }
}

fn print_summary(count: usize, elapsed: std::time::Duration) {
    let is_tty = io::stderr().is_terminal();
    let time_str = format_duration(elapsed);
    let files_word = if count == 1 { "file" } else { "files" };

    if is_tty {
        eprintln!("\n\x1b[1m✨ Generated {} {} in {}\x1b[0m", count, files_word, time_str);
    } else {
        eprintln!("\n✨ Generated {} {} in {}", count, files_word, time_str);
    }
}

fn format_duration(d: std::time::Duration) -> String {
    let micros = d.as_micros();
    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{:.1}ms", micros as f64 / 1000.0)
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}
