use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;
#[cfg(unix)]
use std::os::unix::process::CommandExt;
use std::path::PathBuf;
use std::process::{self, Command};

use envfile::{EnvLoader, EnvStore, ParseMode};

const DEFAULT_FILE: &str = ".env";

const HELP: &str = "\
envfile - run commands with variables loaded from dotenv files

Usage:
  envfile run [OPTIONS] -- COMMAND [ARGS...]
  envfile run [OPTIONS] COMMAND [ARGS...]
  envfile --help
  envfile --version

Commands:
  run       Load dotenv files and execute a command
";

const RUN_HELP: &str = "\
envfile run - load dotenv files and execute a command

Usage:
  envfile run [OPTIONS] -- COMMAND [ARGS...]
  envfile run [OPTIONS] COMMAND [ARGS...]

Options:
  -f, --file <PATHS>      Dotenv file path(s). Repeat or pass comma-separated paths.
                          Defaults to .env. Missing files are skipped.
  -n, --no-clobber        Keep existing environment variables over file values.
  -t, --traverse          Search parent directories for relative dotenv files.
      --no-interpolation  Keep $VAR placeholders as literal text.
      --simple            Use the legacy splitter (no quoting, no interpolation).
  -v, --verbose           Print loader diagnostics to stderr.
  -h, --help              Show this help text.
";

#[derive(Debug, Clone, PartialEq, Eq)]
enum RunCommand {
    Help,
    Execute(RunOptions),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunOptions {
    files: Vec<PathBuf>,
    clobber: bool,
    traverse: bool,
    interpolation: bool,
    simple: bool,
    verbose: bool,
    command: OsString,
    args: Vec<OsString>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            clobber: true,
            traverse: false,
            interpolation: true,
            simple: false,
            verbose: false,
            command: OsString::new(),
            args: Vec::new(),
        }
    }
}

fn main() {
    process::exit(run(env::args_os()));
}

fn run(args: impl IntoIterator<Item = OsString>) -> i32 {
    let mut args = args.into_iter();
    let _bin = args.next();

    let Some(subcommand) = args.next() else {
        print_help();
        return 0;
    };

    let subcommand = subcommand.to_string_lossy();
    match subcommand.as_ref() {
        "-h" | "--help" | "help" => {
            print_help();
            0
        }
        "-V" | "--version" | "version" => {
            print_version();
            0
        }
        "run" => match parse_run_options(args.collect()) {
            Ok(RunCommand::Help) => {
                print_run_help();
                0
            }
            Ok(RunCommand::Execute(options)) => match execute_run(options) {
                Ok(code) => code,
                Err(err) => {
                    eprintln!("envfile: {err}");
                    1
                }
            },
            Err(err) => {
                eprintln!("envfile: {err}");
                eprintln!("Try `envfile run --help`.");
                1
            }
        },
        unknown => {
            eprintln!("envfile: unknown subcommand `{unknown}`");
            eprintln!("Try `envfile --help`.");
            1
        }
    }
}

fn parse_run_options(args: Vec<OsString>) -> Result<RunCommand, String> {
    let mut options = RunOptions::default();
    let mut index = 0usize;
    while index < args.len() {
        let token = args[index].to_string_lossy();
        match token.as_ref() {
            "--" => {
                index += 1;
                break;
            }
            "-h" | "--help" => return Ok(RunCommand::Help),
            "-f" | "--file" => {
                index += 1;
                let Some(value) = args.get(index) else {
                    return Err("missing value for `-f/--file`".to_owned());
                };
                parse_file_text(&value.to_string_lossy(), &mut options.files)?;
                index += 1;
            }
            value if value.starts_with("--file=") => {
                parse_file_text(&value["--file=".len()..], &mut options.files)?;
                index += 1;
            }
            "-n" | "--no-clobber" => {
                options.clobber = false;
                index += 1;
            }
            "-t" | "--traverse" => {
                options.traverse = true;
                index += 1;
            }
            "--no-interpolation" => {
                options.interpolation = false;
                index += 1;
            }
            "--simple" => {
                options.simple = true;
                index += 1;
            }
            "-v" | "--verbose" => {
                options.verbose = true;
                index += 1;
            }
            unknown if unknown.starts_with('-') => {
                return Err(format!("unknown option `{unknown}`"));
            }
            _ => break,
        }
    }

    let remaining = &args[index..];
    let Some((command, command_args)) = remaining.split_first() else {
        return Err("missing command after `run`".to_owned());
    };

    if options.files.is_empty() {
        options.files.push(PathBuf::from(DEFAULT_FILE));
    }

    options.command = command.clone();
    options.args = command_args.to_vec();
    Ok(RunCommand::Execute(options))
}

fn parse_file_text(raw: &str, files: &mut Vec<PathBuf>) -> Result<(), String> {
    let mut added = 0usize;
    for segment in raw.split(',') {
        let trimmed = segment.trim();
        if trimmed.is_empty() {
            continue;
        }
        files.push(PathBuf::from(trimmed));
        added += 1;
    }
    if added == 0 {
        return Err("`-f/--file` requires at least one path".to_owned());
    }
    Ok(())
}

fn execute_run(options: RunOptions) -> Result<i32, String> {
    // Load into a snapshot of the real environment so interpolation sees
    // inherited variables, then hand the result to the child process
    // instead of mutating our own environment.
    let mut loader = EnvLoader::new()
        .paths(&options.files)
        .clobber_existing_vars(options.clobber)
        .only_exact_path(!options.traverse)
        .interpolation_enabled(options.interpolation)
        .debug(options.verbose)
        .target(EnvStore::from_memory(snapshot_process_env()));
    if options.simple {
        loader = loader.parse_mode(ParseMode::Simple);
    }

    let (entries, _) = loader.load_entries().map_err(|err| err.to_string())?;

    let mut command = Command::new(&options.command);
    command.args(&options.args);
    for entry in entries {
        if !options.clobber && env::var_os(&entry.key).is_some() {
            continue;
        }
        command.env(entry.key, entry.value);
    }

    execute_command(command, &options.command)
}

fn snapshot_process_env() -> BTreeMap<String, String> {
    env::vars_os()
        .map(|(key, value)| {
            (
                key.to_string_lossy().into_owned(),
                value.to_string_lossy().into_owned(),
            )
        })
        .collect()
}

#[cfg(unix)]
fn execute_command(mut command: Command, program: &OsString) -> Result<i32, String> {
    let err = command.exec();
    Err(format!(
        "failed to execute `{}`: {err}",
        program.to_string_lossy()
    ))
}

#[cfg(not(unix))]
fn execute_command(mut command: Command, program: &OsString) -> Result<i32, String> {
    let status = command
        .status()
        .map_err(|err| format!("failed to execute `{}`: {err}", program.to_string_lossy()))?;
    Ok(status.code().unwrap_or(1))
}

fn print_help() {
    println!("{HELP}");
}

fn print_run_help() {
    println!("{RUN_HELP}");
}

fn print_version() {
    println!("envfile {}", env!("CARGO_PKG_VERSION"));
}
