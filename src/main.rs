use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::error;

use inidoc::{Error, IniDocument, LineEnding, Options, ScannerMode, Section, Value};

/// Inspect and edit INI configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the INI file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// How values are interpreted: raw, normal or typed
    #[arg(short, long, default_value = "typed", value_parser = parse_mode)]
    mode: ScannerMode,

    /// Write CRLF line endings when saving
    #[arg(long)]
    crlf: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the whole file in canonical form
    Dump,
    /// Print a section, or a single value
    Get { section: String, key: Option<String> },
    /// Set a value and save
    Set {
        section: String,
        key: String,
        value: String,
    },
    /// Delete a section, or a single entry, and save
    Delete { section: String, key: Option<String> },
}

fn parse_mode(s: &str) -> Result<ScannerMode, Error> {
    s.parse()
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let read_only = matches!(args.command, Command::Dump | Command::Get { .. });
    let line_ending = if args.crlf {
        LineEnding::CrLf
    } else {
        LineEnding::Lf
    };
    let options = Options::new()
        .read_only(read_only)
        .scanner_mode(args.mode)
        .line_ending(line_ending);

    let mut ini = IniDocument::open(&args.path, options)?;

    match args.command {
        Command::Dump => {
            for section in ini.fetch_all().sections() {
                print_section(section);
            }
        }
        Command::Get { section, key: None } => {
            if let Some(section) = ini.fetch_section(&section) {
                print_section(section);
            }
        }
        Command::Get {
            section,
            key: Some(key),
        } => {
            if let Some(value) = ini.fetch_entry(&section, &key) {
                println!("{}", describe(value));
            }
        }
        Command::Set {
            section,
            key,
            value,
        } => {
            ini.set_entry(&section, &key, &value)?;
            ini.save()?;
        }
        Command::Delete { section, key } => {
            match key {
                Some(key) => ini.delete_entry(&section, &key)?,
                None => ini.delete_section(&section)?,
            }
            ini.save()?;
        }
    }

    Ok(())
}

fn print_section(section: &Section) {
    println!("[{}]", section.name());

    for entry in section.entries() {
        println!("{} = {}", entry.key(), describe(entry.value()));
    }

    println!();
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(s) => format!("{s:?}"),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Null => "null".to_owned(),
    }
}
