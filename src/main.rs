//! # lipi
//!
//! Run scripts written in the lipi dialect: variable assignment, `if` blocks
//! and `print`, with identifiers in Latin or Telugu script.
//!
//! ## Usage
//!
//! - Run a script file: `lipi script.lipi`
//! - Read the script from stdin: `lipi -`
//! - Run inline code: `lipi -e 'x = 1 print(x)'`
//! - Run `./code.txt` if present, otherwise start an interactive shell: `lipi`

use clap::{Parser as ClapParser, ValueEnum};
use lipi::ast::Program;
use lipi::interpreter::Interpreter;
use lipi::{BlockEnd, ParseError, lexer, parser};
use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Script run when no file or inline code is given.
const DEFAULT_SCRIPT: &str = "code.txt";

/// CLI arguments for lipi.
#[derive(ClapParser)]
#[command(name = "lipi")]
#[command(version = PKG_VERSION)]
#[command(about = "Run lipi scripts (Latin and Telugu identifiers)", long_about = None)]
struct Cli {
    /// Script file to execute (`-` reads from stdin)
    #[arg(value_name = "FILE", conflicts_with = "eval")]
    file: Option<PathBuf>,

    /// Execute the given code instead of a file
    #[arg(short, long, value_name = "CODE")]
    eval: Option<String>,

    /// Where an `if` body ends [env: LIPI_BLOCKS]
    #[arg(long, value_name = "MODE")]
    blocks: Option<Blocks>,

    /// Print the token stream to stderr before parsing
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree to stderr before running
    #[arg(long)]
    ast: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Blocks {
    /// At a closing `}` or at end of input
    Brace,
    /// Always at end of input
    EndOfInput,
}

impl From<Blocks> for BlockEnd {
    fn from(blocks: Blocks) -> Self {
        match blocks {
            Blocks::Brace => BlockEnd::Brace,
            Blocks::EndOfInput => BlockEnd::EndOfInput,
        }
    }
}

/// Settings shared by every way of running code.
struct Options {
    block_end: BlockEnd,
    dump_tokens: bool,
    dump_ast: bool,
}

/// Entry point for the CLI tool.
fn main() {
    let cli = Cli::parse();

    let options = Options {
        block_end: resolve_block_end(cli.blocks),
        dump_tokens: cli.tokens,
        dump_ast: cli.ast,
    };

    if let Some(code) = cli.eval {
        execute_script(&code, None, &options);
        return;
    }

    match cli.file {
        Some(path) if path.as_os_str() == "-" => {
            let mut script = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut script) {
                eprintln!("Error reading stdin: {}", e);
                std::process::exit(1);
            }
            execute_script(&script, Some("<stdin>"), &options);
        }
        Some(path) => run_file(&path, &options),
        None => {
            let default_path = Path::new(DEFAULT_SCRIPT);
            if default_path.is_file() {
                run_file(default_path, &options);
            } else {
                run_repl(&options);
            }
        }
    }
}

/// The `--blocks` flag wins over `LIPI_BLOCKS`; an unrecognised variable value
/// is reported and ignored.
fn resolve_block_end(flag: Option<Blocks>) -> BlockEnd {
    if let Some(blocks) = flag {
        return blocks.into();
    }

    match env::var("LIPI_BLOCKS") {
        Ok(value) => match Blocks::from_str(&value, true) {
            Ok(blocks) => blocks.into(),
            Err(_) => {
                eprintln!(
                    "Warning: ignoring LIPI_BLOCKS={:?} (expected 'brace' or 'end-of-input')",
                    value
                );
                BlockEnd::default()
            }
        },
        Err(_) => BlockEnd::default(),
    }
}

/// Read and execute a script file.
fn run_file(path: &Path, options: &Options) {
    let script = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    };

    let filename = path.to_string_lossy();
    execute_script(&script, Some(&*filename), options);
}

/// Lex, parse and run a script against stdout, exiting on failure.
///
/// # Arguments
/// * `script` - The script source code.
/// * `filename` - Optional filename for better error messages.
fn execute_script(script: &str, filename: Option<&str>, options: &Options) {
    let program = match build_program(script, options) {
        Ok(program) => program,
        Err(e) => {
            print_parse_error(&e, script, filename);
            std::process::exit(1);
        }
    };

    let mut interpreter = Interpreter::stdout();
    if let Err(e) = interpreter.execute(&program) {
        eprintln!("Execution error: {}", e);
        std::process::exit(1);
    }
}

fn build_program(script: &str, options: &Options) -> Result<Program, ParseError> {
    let tokens = lexer::tokenize(script);
    if options.dump_tokens {
        eprintln!("Tokens: {:#?}", tokens);
    }

    let program = parser::parse_tokens(tokens, options.block_end)?;
    if options.dump_ast {
        eprintln!("Program: {:#?}", program);
    }
    Ok(program)
}

/// Print a parse error with the offending source line underneath.
fn print_parse_error(error: &ParseError, source: &str, filename: Option<&str>) {
    let line = error.line();
    match filename {
        Some(f) => eprintln!("Parse error in {}: {}", f, error),
        None => eprintln!("Parse error: {}", error),
    }

    if let Some(line_content) = get_line(source, line) {
        eprintln!();
        eprintln!("  {} | {}", line, line_content);
        eprintln!(
            "  {} | {}",
            " ".repeat(line.to_string().len()),
            "^".repeat(line_content.trim().chars().count().max(1))
        );
    }
}

/// Get a specific line from source code.
fn get_line(source: &str, line_num: usize) -> Option<String> {
    if line_num == 0 {
        return None;
    }
    source.lines().nth(line_num - 1).map(|s| s.to_string())
}

/// Start an interactive shell. Bindings persist for the whole session.
fn run_repl(options: &Options) {
    println!("lipi {}", PKG_VERSION);
    println!("Type 'exit' or press Ctrl+D to quit\n");

    let mut interpreter = Interpreter::stdout();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        if let Err(e) = stdout.flush() {
            eprintln!("Error writing prompt: {}", e);
            break;
        }

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {
                let input = input.trim();

                if input == "exit" || input == "quit" {
                    println!("Goodbye!");
                    break;
                }

                if input.is_empty() {
                    continue;
                }

                match build_program(input, options) {
                    Ok(program) => {
                        if let Err(e) = interpreter.execute(&program) {
                            eprintln!("Error: {}", e);
                        }
                    }
                    Err(e) => {
                        print_parse_error(&e, input, None);
                    }
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }
}
