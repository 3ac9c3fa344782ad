//! Cellgrid - headless spreadsheet command line

mod config_path;

use anyhow::{Context, Result, anyhow};
use cellgrid_core::{CellRef, Sheet};
use cellgrid_engine::builtins::BUILTINS;
use cellgrid_engine::engine::{Cell, Value, format_value, parse_number};
use std::env;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: cellgrid [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                     Sheet document (JSON) to open");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -s, --set <ID=RAW>         Set a cell's raw value (can be repeated)");
    eprintln!("      --insert-row <ROW>     Insert a row after ROW");
    eprintln!("      --delete-row <ROW>     Delete ROW");
    eprintln!("      --insert-column <COL>  Insert a column after COL");
    eprintln!("      --delete-column <COL>  Delete COL");
    eprintln!("  -o, --output <FILE>        Save the resulting sheet to FILE");
    eprintln!("  -w, --write                Save back to [FILE]");
    eprintln!("      --config <FILE>        Sheet configuration (TOML)");
    eprintln!("      --list-functions       List the formula functions and exit");
    eprintln!("  -h, --help                 Print help");
}

enum Command {
    Set(CellRef, String),
    InsertRow(String),
    DeleteRow(String),
    InsertColumn(String),
    DeleteColumn(String),
}

struct Options {
    file_path: Option<PathBuf>,
    commands: Vec<Command>,
    output_file: Option<PathBuf>,
    write_back: bool,
    config_file: Option<PathBuf>,
}

fn take_value<'a>(args: &'a [String], i: &mut usize, what: &str) -> Result<&'a str> {
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("{} requires {}", args[*i - 1], what))
}

fn parse_set(arg: &str) -> Result<Command> {
    let (id, raw) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("--set expects ID=RAW, got {:?}", arg))?;
    let cell_ref = CellRef::parse(id.trim()).with_context(|| format!("bad cell id {:?}", id))?;
    Ok(Command::Set(cell_ref, raw.to_string()))
}

enum Mode {
    Help,
    ListFunctions,
    Run(Options),
}

fn print_functions() {
    for builtin in BUILTINS {
        println!("{}\t{}", builtin.name, builtin.description);
    }
}

fn parse_args(args: &[String]) -> Result<Mode> {
    let mut options = Options {
        file_path: None,
        commands: Vec::new(),
        output_file: None,
        write_back: false,
        config_file: None,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => return Ok(Mode::Help),
            "--list-functions" => return Ok(Mode::ListFunctions),
            "-s" | "--set" => {
                let value = take_value(args, &mut i, "ID=RAW")?;
                options.commands.push(parse_set(value)?);
            }
            "--insert-row" => {
                let row = take_value(args, &mut i, "a row id")?;
                options.commands.push(Command::InsertRow(row.to_string()));
            }
            "--delete-row" => {
                let row = take_value(args, &mut i, "a row id")?;
                options.commands.push(Command::DeleteRow(row.to_string()));
            }
            "--insert-column" => {
                let col = take_value(args, &mut i, "a column id")?;
                options.commands.push(Command::InsertColumn(col.to_string()));
            }
            "--delete-column" => {
                let col = take_value(args, &mut i, "a column id")?;
                options.commands.push(Command::DeleteColumn(col.to_string()));
            }
            "-o" | "--output" => {
                options.output_file = Some(PathBuf::from(take_value(args, &mut i, "a file path")?));
            }
            "-w" | "--write" => options.write_back = true,
            "--config" => {
                options.config_file = Some(PathBuf::from(take_value(args, &mut i, "a file path")?));
            }
            arg if arg.starts_with('-') => return Err(anyhow!("Unknown option: {}", arg)),
            arg => {
                if options.file_path.is_some() {
                    return Err(anyhow!("Unexpected argument: {}", arg));
                }
                options.file_path = Some(PathBuf::from(arg));
            }
        }
        i += 1;
    }

    if options.write_back && options.file_path.is_none() {
        return Err(anyhow!("--write requires a FILE argument"));
    }
    Ok(Mode::Run(options))
}

/// Display text for a cell, with its number format applied to numbers.
fn display(cell: &Cell) -> String {
    let number_format = cell.format.number_format;
    if cell.is_formula() {
        return cell
            .computed
            .as_ref()
            .map(|v| format_value(v, number_format))
            .unwrap_or_default();
    }
    match (number_format, parse_number(&cell.value)) {
        (Some(_), Some(n)) => format_value(&Value::Number(n), number_format),
        _ => cell.value.clone(),
    }
}

fn run(options: Options) -> Result<()> {
    let config = config_path::load_config(options.config_file.as_deref())?;
    let mut sheet = Sheet::with_file(options.file_path.clone(), config)?;

    for command in options.commands {
        match command {
            Command::Set(cell_ref, raw) => sheet.set_cell_value_validated(cell_ref, &raw)?,
            Command::InsertRow(row) => sheet.add_row(&row),
            Command::DeleteRow(row) => sheet.delete_row(&row),
            Command::InsertColumn(col) => sheet.add_column(&col),
            Command::DeleteColumn(col) => sheet.delete_column(&col),
        }
    }

    if options.write_back {
        let path = sheet.save()?;
        eprintln!("Saved {}", path.display());
    }
    if let Some(output_path) = options.output_file {
        sheet.save_file(&output_path)?;
        eprintln!("Saved {}", output_path.display());
    }

    for (cell_ref, cell) in &sheet.cells {
        println!("{}\t{}\t{}", cell_ref, cell.value, display(cell));
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("CELLGRID_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = match parse_args(&args) {
        Ok(Mode::Run(options)) => options,
        Ok(Mode::Help) => {
            print_usage();
            return;
        }
        Ok(Mode::ListFunctions) => {
            print_functions();
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            print_usage();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
