//! Compile flags from `compile_commands.json`.

use std::path::Path;

use tracing::{debug, warn};

use super::QueryResult;
use crate::args::CompileArgs;
use crate::clang::database::{CompilationDatabase, locate};
use crate::config::Config;
use crate::error::Result;

/// The arguments of the first compile command recorded for `file`, minus
/// the file itself. `None` when no database covers the file.
///
/// ## Errors
/// Fails when libclang is unavailable.
pub fn database_arguments(file: &str, config: &Config) -> Result<Option<Vec<String>>> {
    let Some(directory) = locate(Path::new(file), &config.database_file_name) else {
        return Ok(None);
    };
    debug!(directory = %directory.display(), "found compilation database");
    let Some(database) = CompilationDatabase::from_directory(&directory)? else {
        return Ok(None);
    };
    let command = database.compile_commands(file)?.into_iter().next();
    Ok(command.map(|arguments| arguments.into_iter().filter(|arg| arg != file).collect()))
}

/// Turns a recorded command line into parse flags: drops the compiler
/// executable and the `-o <output>` pair.
pub fn command_to_flags(command: &[String]) -> Vec<String> {
    let mut flags = Vec::new();
    let mut arguments = command.iter().skip(1);
    while let Some(argument) = arguments.next() {
        if argument == "-o" {
            arguments.next();
            continue;
        }
        if argument.starts_with("-o") {
            continue;
        }
        flags.push(argument.clone());
    }
    flags
}

/// The flags a request is parsed with.
///
/// Explicit request flags win. A request without flags takes them from the
/// closest compilation database when that lookup is enabled, and from
/// [`Config::default_flags`] otherwise.
pub fn parse_flags(args: &CompileArgs, config: &Config) -> Vec<String> {
    if !args.flags.is_empty() {
        return args.flags.clone();
    }
    if config.compile_database {
        match database_arguments(&args.file, config) {
            Ok(Some(command)) => {
                let flags = command_to_flags(&command);
                if !flags.is_empty() {
                    debug!(?flags, "using flags from compilation database");
                    return flags;
                }
            }
            Ok(None) => {}
            Err(e) => warn!(error = %e, file = %args.file, "compilation database lookup failed"),
        }
    }
    config.default_flags.clone()
}

/// `{'commands':'<arguments joined by spaces>'}` for the file named by
/// `input` (`"<path>:<flags>"`), falling back to the configured default
/// flags when no database covers it.
///
/// ## Errors
/// Fails on malformed arguments or when libclang is unavailable.
pub fn compile_commands(input: &str) -> QueryResult {
    let args = CompileArgs::parse(input)?;
    let config = Config::global();
    let arguments = database_arguments(&args.file, config)?
        .unwrap_or_else(|| config.default_flags.clone());
    Ok(Some(format!("{{'commands':'{}'}}", arguments.join(" "))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_command_to_flags() {
        let command = strings(&["clang++", "-DFOO", "-I/src/inc", "-o", "test.o", "-c"]);
        assert_eq!(command_to_flags(&command), strings(&["-DFOO", "-I/src/inc", "-c"]));
    }

    #[test]
    fn test_command_to_flags_joined_output() {
        let command = strings(&["cc", "-otest.o", "-Wall"]);
        assert_eq!(command_to_flags(&command), strings(&["-Wall"]));
    }

    #[test]
    fn test_request_flags_win() {
        let args = CompileArgs::parse("a.cpp:-std=c++17").unwrap();
        assert_eq!(parse_flags(&args, &Config::default()), strings(&["-std=c++17"]));
    }

    #[test]
    fn test_defaults_without_database() {
        let args = CompileArgs::parse("a.cpp:").unwrap();
        let config = Config {
            compile_database: false,
            default_flags: strings(&["-std=c++11"]),
            ..Config::default()
        };
        assert_eq!(parse_flags(&args, &config), strings(&["-std=c++11"]));
    }
}
