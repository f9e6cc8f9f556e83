use super::CliError;
use tracing::metadata::LevelFilter;
use tracing_subscriber::EnvFilter;

fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins when it is set and valid; otherwise the level follows the
/// number of `-v` flags. Output goes to stderr so that stdout only carries
/// paths, fixed documents or the JSON summary.
pub fn setup_logging(verbosity: u8) -> Result<(), CliError> {
    let default_level = level_for(verbosity);
    let default_env_filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse(default_level.to_string().to_ascii_lowercase())
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let env_filter = match std::env::var("RUST_LOG").ok() {
        Some(directive) => match EnvFilter::builder().parse(&directive) {
            Ok(env_filter) => env_filter,
            Err(err) => {
                eprintln!("invalid log filter: {err}");
                eprintln!("falling back to default logging");
                default_env_filter
            }
        },
        None => default_env_filter,
    };

    tracing_subscriber::fmt()
        .compact()
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::WARN);
        assert_eq!(level_for(1), LevelFilter::INFO);
        assert_eq!(level_for(2), LevelFilter::DEBUG);
        assert_eq!(level_for(9), LevelFilter::TRACE);
    }
}
