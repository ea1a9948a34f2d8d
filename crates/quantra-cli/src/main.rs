//! quantra - unit-aware command-line calculator
//!
//! Usage:
//!   quantra "36 km/h in m/s"          # Single expression
//!   echo "5 m/s / 2 s" | quantra      # Pipe mode
//!   quantra -f calculations.txt       # File mode
//!   quantra -i                        # Interactive REPL
//!   quantra --server                  # JSON-RPC 2.0 over stdin/stdout
//!   quantra --list Length             # Units of a quantity

mod server;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use quantra_core::{Engine, UnitRegistry, UnitsFile};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quantra")]
#[command(about = "A calculator for physical quantities", long_about = None)]
struct Args {
    /// Expression to evaluate
    expression: Option<String>,

    /// Read expressions from file
    #[arg(short, long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Interactive REPL mode
    #[arg(short, long)]
    interactive: bool,

    /// Show only the result (no input echo)
    #[arg(short, long)]
    quiet: bool,

    /// Serve JSON-RPC 2.0 requests on stdin/stdout
    #[arg(long)]
    server: bool,

    /// Register extra quantities and units from a JSON file
    #[arg(long, value_name = "FILE")]
    units: Option<PathBuf>,

    /// List quantities, or the units of one quantity
    #[arg(long, value_name = "QUANTITY", num_args = 0..=1)]
    list: Option<Option<String>>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let registry = Arc::new(UnitRegistry::with_defaults());
    if let Some(path) = &args.units {
        load_units(&registry, path)?;
    }

    if let Some(quantity) = &args.list {
        return list(&registry, quantity.as_deref());
    }

    let mut engine = Engine::with_registry(registry);

    if args.server {
        server::run_server(&mut engine)?;
    } else if let Some(expr) = &args.expression {
        eval_and_print(&mut engine, expr, args.quiet);
    } else if let Some(path) = &args.file {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        for line in content.lines() {
            eval_and_print(&mut engine, line, args.quiet);
        }
    } else if args.interactive {
        run_repl(&mut engine, args.quiet)?;
    } else if !io::stdin().is_terminal() {
        // Pipe mode (stdin is not a tty)
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            eval_and_print(&mut engine, &line, args.quiet);
        }
    } else {
        eprintln!("Usage: quantra <expression>");
        eprintln!("       quantra -f <file>");
        eprintln!("       quantra -i");
        eprintln!("       quantra --server");
        eprintln!("       echo \"36 km/h in m/s\" | quantra");
        std::process::exit(1);
    }

    Ok(())
}

fn load_units(registry: &UnitRegistry, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading units file {}", path.display()))?;
    let file = UnitsFile::from_json(&text)
        .with_context(|| format!("parsing units file {}", path.display()))?;
    let count = file
        .apply(registry)
        .with_context(|| format!("registering units from {}", path.display()))?;
    tracing::info!(path = %path.display(), units = count, "loaded units file");
    Ok(())
}

fn list(registry: &UnitRegistry, quantity: Option<&str>) -> Result<()> {
    let mut stdout = io::stdout().lock();
    match quantity {
        None => {
            for quantity in registry.quantities() {
                let standard = registry.standard_unit(quantity.name())?;
                writeln!(
                    stdout,
                    "{:<24} {:<10} {:<16} {}",
                    quantity.name(),
                    quantity.kind_name(),
                    quantity.dimension(),
                    standard
                )?;
            }
        }
        Some(name) => {
            for unit in registry.units(name)? {
                let aliases = unit.aliases().join(", ");
                writeln!(stdout, "{:<12} {:<32} {}", unit.abbreviation(), unit.name(), aliases)?;
            }
        }
    }
    Ok(())
}

fn eval_and_print(engine: &mut Engine, input: &str, quiet: bool) {
    let result = engine.eval(input);

    if quiet {
        if !result.is_empty() {
            println!("{result}");
        }
    } else {
        let result_str = result.to_string();
        if result_str.is_empty() {
            println!("{input}");
        } else {
            // Pad input to align results
            let padding = 40usize.saturating_sub(input.len());
            println!("{input}{:>width$} = {result_str}", "", width = padding);
        }
    }
}

fn run_repl(engine: &mut Engine, quiet: bool) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("quantra - calculator for physical quantities");
    println!("Type expressions to calculate. Press Ctrl+D to exit.\n");

    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            println!();
            break;
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match line.to_lowercase().as_str() {
            "quit" | "exit" => break,
            "clear" => {
                engine.clear();
                println!("Cleared.");
                continue;
            }
            "help" => {
                print_help();
                continue;
            }
            _ => {}
        }

        eval_and_print(engine, line, quiet);
    }

    Ok(())
}

fn print_help() {
    println!(
        r#"
Commands:
  help     Show this help
  clear    Clear all variables and history
  quit     Exit the REPL

Examples:
  1 km + 500 m            Addition in the left unit
  5 m/s / 2 s             Named result (Acceleration)
  36 km/h in m/s          Unit conversion
  2 kg * 3 kg             Unnamed result in SI (kg2)
  9.81 kg.m/s2 in N       Cast an SI value to a quantity
  d = 100 m               Variable assignment
  min(3 m, 2 km)          Functions: min, max, abs, recip

Unit literals are relative values: 10 degC in degF is a temperature
difference (18 degF), not a reading on the Fahrenheit scale.
"#
    );
}
