use log::{debug, info};
use prgtrace::config::Config;
use prgtrace::entry_points::{load_pointer_file, parse_table_arg, EntryPoints};
use prgtrace::{Brackets, ConfigError, Disassembler, Error, Markup, PointerTable, Rom};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

const USAGE: &str = "Usage: prgtrace [options] <rom-file>";

/// Everything the command line asked for.
#[derive(Debug, Default)]
struct Options {
    rom: Option<PathBuf>,
    markup: Option<Markup>,
    round_brackets: bool,
    codepointers: Option<PathBuf>,
    tables: Vec<PointerTable>,
    config: Option<PathBuf>,
    output: Option<PathBuf>,
    stats: bool,
}

fn print_help() {
    eprintln!("{}", USAGE);
    eprintln!("\nOptions:");
    eprintln!("  --html                 Write an HTML listing with anchors");
    eprintln!("  --dialect NAME         Output dialect: text or html");
    eprintln!("  --round-brackets       Use ( ) instead of [ ] for indirect operands");
    eprintln!("  --codepointers FILE    Read extra code pointer tables (offset|count lines)");
    eprintln!("  --table OFFSET:COUNT   Add a code pointer table (repeatable)");
    eprintln!("  --config FILE          Read settings from a TOML file");
    eprintln!("  --output FILE          Write the listing to FILE instead of stdout");
    eprintln!("  --stats                Print analysis statistics to stderr");
    eprintln!("  -h, --help             Show this help message");
}

fn value(args: &[String], i: usize, flag: &str) -> Result<String, ConfigError> {
    args.get(i + 1)
        .cloned()
        .ok_or_else(|| ConfigError::BadArgument(format!("{} needs a value", flag)))
}

fn parse_args(args: &[String]) -> Result<Options, ConfigError> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--html" => options.markup = Some(Markup::Html),
            "--dialect" => {
                options.markup = Some(value(args, i, "--dialect")?.parse()?);
                i += 1;
            }
            "--round-brackets" => options.round_brackets = true,
            "--codepointers" => {
                options.codepointers = Some(value(args, i, "--codepointers")?.into());
                i += 1;
            }
            "--table" => {
                options.tables.push(parse_table_arg(&value(args, i, "--table")?)?);
                i += 1;
            }
            "--config" => {
                options.config = Some(value(args, i, "--config")?.into());
                i += 1;
            }
            "--output" => {
                options.output = Some(value(args, i, "--output")?.into());
                i += 1;
            }
            "--stats" => options.stats = true,
            "-h" | "--help" => {
                print_help();
                process::exit(0);
            }
            arg if !arg.starts_with('-') && options.rom.is_none() => {
                options.rom = Some(arg.into());
            }
            arg => {
                return Err(ConfigError::BadArgument(format!("unknown option '{}'", arg)));
            }
        }
        i += 1;
    }

    Ok(options)
}

fn run(options: Options) -> Result<(), Error> {
    let rom_path = options
        .rom
        .ok_or_else(|| ConfigError::BadArgument("no ROM file given".to_string()))?;

    let config = match &options.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let mut dialect = config.dialect();
    if let Some(markup) = options.markup {
        dialect.markup = markup;
    }
    if options.round_brackets {
        dialect.brackets = Brackets::Round;
    }

    let mut entry_points = EntryPoints::new();
    entry_points.extend(config.pointer_tables.iter().copied())?;
    if let Some(path) = &options.codepointers {
        entry_points.extend(load_pointer_file(path)?)?;
    }
    entry_points.extend(options.tables)?;
    debug!(
        "Output options: {:?}, {} extra pointer tables",
        dialect,
        entry_points.extra().len()
    );

    let rom = Rom::load(&rom_path)?;
    let mut disassembler = Disassembler::new(rom, entry_points);
    disassembler.run();
    let listing = disassembler.listing(dialect).to_string();

    match &options.output {
        Some(path) => {
            fs::write(path, &listing).map_err(ConfigError::Io)?;
            info!("Wrote listing to {}", path.display());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(listing.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(ConfigError::Io)?;
        }
    }

    if options.stats {
        eprint!("{}", disassembler.stats());
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();

    let result = parse_args(&args).map_err(Error::from).and_then(run);
    if let Err(e) = result {
        eprintln!("prgtrace: {}", e);
        if matches!(e, Error::Config(ConfigError::BadArgument(_))) {
            eprintln!("{}", USAGE);
            eprintln!("Try 'prgtrace -h' for help");
        }
        process::exit(1);
    }
}
