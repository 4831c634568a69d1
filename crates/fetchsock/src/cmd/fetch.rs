use fetchsock_exchange::{fetch_with_config, ExchangeConfig};

use crate::cmd::{parse_optional_duration, FetchArgs};
use crate::exit::{exchange_error, CliError, CliResult, FAILURE, SUCCESS};
use crate::output::{print_contents, OutputFormat};

pub fn run(args: FetchArgs, format: OutputFormat) -> CliResult<i32> {
    let timeout = parse_optional_duration(args.timeout.as_deref())?;
    let config = ExchangeConfig {
        read_timeout: timeout,
        write_timeout: timeout,
        ..ExchangeConfig::default()
    };

    let lines = fetch_with_config(&args.path, &args.file, &config)
        .map_err(|err| exchange_error("fetch failed", err))?;

    if lines.is_empty() {
        return Err(content_unavailable(&args.file));
    }

    tracing::info!(file = %args.file, lines = lines.len(), "file contents obtained");
    print_contents(&args.file, &lines, format);
    Ok(SUCCESS)
}

fn content_unavailable(file: &str) -> CliError {
    CliError::new(
        FAILURE,
        format!("could not obtain file contents for {file}; check the file name and extension"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_response_is_plain_failure() {
        let err = content_unavailable("nope.txt");
        assert_eq!(err.code, FAILURE);
        assert!(err.message.contains("could not obtain file contents"));
    }
}
