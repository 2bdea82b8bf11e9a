use pixy::encode::{EncodeOptions, PixyError, convert_svg, encode_svg};
use pixy::{Matrix, PathFormatOptions, format_path, parse_transform};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Path(pixy::Error),
    Encode(PixyError),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Path(err) => write!(f, "{err}"),
            CliError::Encode(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<pixy::Error> for CliError {
    fn from(value: pixy::Error) -> Self {
        Self::Path(value)
    }
}

impl From<PixyError> for CliError {
    fn from(value: PixyError) -> Self {
        Self::Encode(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Encode,
    Ops,
    Path,
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    input: Option<String>,
    out: Option<String>,
    pretty: bool,
    lenient: bool,
    relative: bool,
    shorthand: bool,
    elide: bool,
    digits: Option<u32>,
    transform: Option<String>,
}

fn usage() -> &'static str {
    "pixy-cli\n\
\n\
USAGE:\n\
  pixy-cli [encode] [--lenient] [--out <path>] [<svg>|-]\n\
  pixy-cli ops [--pretty] [--lenient] [<svg>|-]\n\
  pixy-cli path [--relative] [--shorthand] [--elide] [--digits <n>] [--transform <t>] <d>\n\
\n\
NOTES:\n\
  - If <svg> is omitted or '-', input is read from stdin.\n\
  - encode writes next to the input file with a .pixy extension (or ./out.pixy for stdin).\n\
  - ops prints every record of the stream as JSON.\n\
  - path prints rewritten path data; <d> is the value of a path's `d` attribute.\n\
  - Set PIXY_LOG (e.g. PIXY_LOG=debug) to enable logging on stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "encode" if args.input.is_none() => args.command = Command::Encode,
            "ops" if args.input.is_none() => args.command = Command::Ops,
            "path" if args.input.is_none() => args.command = Command::Path,
            "--pretty" => args.pretty = true,
            "--lenient" => args.lenient = true,
            "--relative" => args.relative = true,
            "--shorthand" => args.shorthand = true,
            "--elide" => args.elide = true,
            "--digits" => {
                let Some(digits) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.digits = Some(digits.parse::<u32>().map_err(|_| CliError::Usage(usage()))?);
            }
            "--transform" => {
                let Some(t) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.transform = Some(t.clone());
            }
            "--out" => {
                let Some(out) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.out = Some(out.clone());
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            input => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(input.to_string());
            }
        }
    }

    if args.command == Command::Path && args.input.is_none() {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn default_out_path(input: Option<&str>) -> PathBuf {
    match input {
        Some(path) if path != "-" => PathBuf::from(path).with_extension("pixy"),
        _ => PathBuf::from("out.pixy"),
    }
}

fn encode_options(args: &Args) -> EncodeOptions {
    if args.lenient {
        EncodeOptions::lenient()
    } else {
        EncodeOptions::strict()
    }
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Encode => {
            let text = read_input(args.input.as_deref())?;
            let bytes = encode_svg(&text, &encode_options(&args))?;
            let out = args
                .out
                .map(PathBuf::from)
                .unwrap_or_else(|| default_out_path(args.input.as_deref()));
            std::fs::write(&out, &bytes)?;
            tracing::info!(path = %out.display(), bytes = bytes.len(), "wrote pixy");
            Ok(())
        }
        Command::Ops => {
            let text = read_input(args.input.as_deref())?;
            let drawing = convert_svg(&text, &encode_options(&args))?;
            write_json(&drawing.records(), args.pretty)
        }
        Command::Path => {
            let geometry = args.input.as_deref().unwrap_or_default();
            let transform = match args.transform.as_deref() {
                Some(t) => Some(parse_transform(&Matrix::identity(), t)?),
                None => None,
            };
            let options = PathFormatOptions {
                absolute: !args.relative,
                shorthand: args.shorthand,
                digits: args.digits,
                elide_letters: args.elide,
                transform,
            };
            println!("{}", format_path(geometry, &options)?);
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("PIXY_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
