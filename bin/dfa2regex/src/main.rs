use std::process::ExitCode;

use bytes_regex::prelude::*;

use tracing::{debug, error, info, trace};
use tracing_subscriber::{filter, prelude::*};

use clap::{Arg, ArgAction, ArgMatches, Command};

fn cli() -> clap::Command {
    Command::new("dfa2regex")
        .about("reads a JSON description of a byte DFA and prints an equivalent regular expression")
        .arg(
            Arg::new("input")
                .value_name("FILE")
                .default_value("-")
                .help("JSON file with start_state, match_states and transition_table, `-` for stdin"),
        )
        .arg(
            Arg::new("table")
                .long("table")
                .action(ArgAction::SetTrue)
                .help("print the completed transition table to stderr"),
        )
        .arg(
            Arg::new("verbosity")
                .short('v')
                .long("verbosity")
                .num_args(0..=1)
                .require_equals(true)
                .value_parser(["warn", "info", "debug", "trace"])
                .default_missing_value("info"),
        )
}

fn setup_logging(matches: &ArgMatches) {
    let level = match matches
        .try_get_one::<String>("verbosity")
        .ok()
        .flatten()
        .map(|m| m.as_str())
    {
        Some("trace") => filter::LevelFilter::TRACE,
        Some("debug") => filter::LevelFilter::DEBUG,
        Some("info") => filter::LevelFilter::INFO,
        _ => filter::LevelFilter::WARN,
    };

    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(stderr_log.with_filter(level))
        .init();

    trace!("setup {level} logging");
}

fn run(matches: &ArgMatches) -> Result<String, DescriptionError> {
    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("-");

    let description: DfaDescription<usize> = if input == "-" {
        debug!("reading DFA description from stdin");
        DfaDescription::from_reader(std::io::stdin().lock())?
    } else {
        DfaDescription::from_path(input)?
    };
    debug!(
        "read description with {} transition entries",
        description.transition_table.len()
    );

    let dfa = description.into_dfa()?;
    if matches.get_flag("table") {
        eprintln!("{dfa}");
    }

    let start = std::time::Instant::now();
    let regex = synthesize(&dfa);
    info!(
        "synthesis for {} states took {}µs",
        dfa.size(),
        start.elapsed().as_micros()
    );
    Ok(regex.render())
}

pub fn main() -> ExitCode {
    let matches = cli().get_matches();

    setup_logging(&matches);

    match run(&matches) {
        Ok(regex) => {
            println!("{regex}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
