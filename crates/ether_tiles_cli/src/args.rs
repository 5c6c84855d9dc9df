use std::path::PathBuf;

use crate::CliError;

pub const USAGE: &str = "\
Usage: ether-tiles <command> <file> [--config <path>] [--verbose]

Commands:
  inspect <tsx>       Print the tileset header and every declared tile
  validate <tsx>      Load with the configured schema and report warnings
  export-json <tsx>   Print the tileset as JSON
  level <tmx>         Summarize the gameplay content of a level";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Inspect,
    Validate,
    ExportJson,
    Level,
}

impl Command {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "inspect" => Some(Command::Inspect),
            "validate" => Some(Command::Validate),
            "export-json" => Some(Command::ExportJson),
            "level" => Some(Command::Level),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub command: Command,
    pub path: PathBuf,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Parse arguments, program name excluded
pub fn parse_args<I>(args: I) -> Result<Args, CliError>
where
    I: IntoIterator<Item = String>,
{
    let mut command = None;
    let mut path = None;
    let mut config = None;
    let mut verbose = false;

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let value = args
                    .next()
                    .ok_or_else(|| CliError::Usage("--config needs a path".to_string()))?;
                config = Some(PathBuf::from(value));
            }
            "--verbose" | "-v" => verbose = true,
            flag if flag.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option '{}'", flag)));
            }
            _ if command.is_none() => {
                command = Some(
                    Command::parse(&arg)
                        .ok_or_else(|| CliError::Usage(format!("unknown command '{}'", arg)))?,
                );
            }
            _ if path.is_none() => path = Some(PathBuf::from(&arg)),
            _ => return Err(CliError::Usage(format!("unexpected argument '{}'", arg))),
        }
    }

    Ok(Args {
        command: command.ok_or_else(|| CliError::Usage("missing command".to_string()))?,
        path: path.ok_or_else(|| CliError::Usage("missing file argument".to_string()))?,
        config,
        verbose,
    })
}
