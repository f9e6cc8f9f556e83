use clap::Parser as ClapParser;
use std::io::{self, Read};
use std::path::PathBuf;
use velafix::cli::{self, CliError, FixOptions};
use velafix::fix::{DEFAULT_BINDING, FixConfig};

#[derive(ClapParser)]
#[command(name = "velafix")]
#[command(about = "Default unguarded comprehensions over parameter fields to an empty struct")]
#[command(version)]
struct Cli {
    /// Files to fix, or directories to search for *.cue files
    paths: Vec<PathBuf>,

    /// Root identifier whose fields are protected
    #[arg(long, default_value = DEFAULT_BINDING)]
    binding: String,

    /// List files that would change without writing them
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Print a JSON summary instead of changed paths
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cli::setup_logging(cli.verbose) {
        eprintln!("velafix: {e}");
    }

    let config = FixConfig::with_binding(cli.binding);
    let code = if cli.paths.is_empty() {
        match run_stdin(&config) {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("velafix: {e}");
                1
            }
        }
    } else {
        let options = FixOptions {
            paths: cli.paths,
            config,
            dry_run: cli.dry_run,
        };
        let summary = cli::run(&options);

        if cli.json {
            println!("{}", summary.to_json());
        } else {
            for path in &summary.changed {
                println!("{}", path.display());
            }
        }
        for failure in &summary.failures {
            eprintln!("velafix: {}", failure.error);
        }
        summary.exit_code()
    };

    std::process::exit(code);
}

fn run_stdin(config: &FixConfig) -> Result<(), CliError> {
    if atty::is(atty::Stream::Stdin) {
        return Err(CliError::NoInput);
    }

    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .map_err(|e| CliError::io("<stdin>", e))?;

    let fixed = cli::fix_source(&source, config).map_err(|source| CliError::Parse {
        path: PathBuf::from("<stdin>"),
        source,
    })?;
    print!("{}", fixed.output);
    Ok(())
}
