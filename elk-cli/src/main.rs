mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use odata_elk::{FieldMappings, TransformError, transform, transform_pretty};
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mappings = FieldMappings::from_path(&cli.config).context("Load field mappings failed.")?;
    info!(scope = %cli.scope, "transforming filter");

    let options = cli.options();
    let result = if cli.pretty {
        transform_pretty(&mappings, &cli.scope, &cli.filter, &options)
    } else {
        transform(&mappings, &cli.scope, &cli.filter, &options)
    };

    match result {
        Ok(document) => {
            println!("{document}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", failure_line(&err));
            Ok(exit_code(&err))
        }
    }
}

fn failure_line(err: &TransformError) -> String {
    match err.position() {
        Some(position) => format!("{}: {err} (at byte {position})", err.kind()),
        None => format!("{}: {err}", err.kind()),
    }
}

fn exit_code(err: &TransformError) -> ExitCode {
    if err.is_user_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn mappings_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "log_*:\n  name: newName\n  age: person.age").unwrap();
        file
    }

    fn cli(config: &std::path::Path, filter: &str) -> Cli {
        Cli::try_parse_from([
            "odata-elk",
            "--config",
            config.to_str().unwrap(),
            "--scope",
            "log_*",
            "--filter",
            filter,
        ])
        .unwrap()
    }

    #[test]
    fn valid_filter_succeeds() {
        let file = mappings_file();
        let code = run(cli(file.path(), "name eq 'Naveen'")).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);
    }

    #[test]
    fn user_errors_exit_with_two() {
        let file = mappings_file();
        assert_eq!(run(cli(file.path(), "lname eq 'x'")).unwrap(), ExitCode::from(2));
        assert_eq!(run(cli(file.path(), "name like 'x'")).unwrap(), ExitCode::from(2));
    }

    #[test]
    fn missing_config_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = run(cli(&dir.path().join("absent.yaml"), "name eq 'x'")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.yaml"));
    }

    #[test]
    fn internal_errors_exit_with_one() {
        let err = TransformError::Internal(anyhow::anyhow!("boom"));
        assert_eq!(exit_code(&err), ExitCode::FAILURE);
        assert_eq!(
            failure_line(&err),
            "INTERNAL_SERVER_ERROR: An unknown error occurred while building the search query"
        );
    }

    #[test]
    fn failure_line_names_the_code() {
        let file = mappings_file();
        let mappings = FieldMappings::from_path(file.path()).unwrap();
        let options = cli(file.path(), "x").options();

        let err = transform(&mappings, "log_*", "lname eq 'x'", &options).unwrap_err();
        assert_eq!(
            failure_line(&err),
            "BAD_REQUEST: Invalid filter field 'lname'. Please check that it is present in the backend field configuration"
        );

        let err = transform(&mappings, "log_*", "name eq 'a' age gt 1", &options).unwrap_err();
        assert_eq!(
            failure_line(&err),
            "BAD_REQUEST: malformed filter: unexpected token 'age' (at byte 12)"
        );
    }
}
