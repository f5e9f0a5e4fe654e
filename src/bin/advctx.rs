//! Command-line interface for treecontext
//! Reads aligned bracket treebanks and writes adverb-phrase context tables.
//!
//! Usage:
//!   advctx `<input>...` [--out-dir `<dir>`] [--marker `<label>`] [--threshold `<f>`] [-v] [-q]

use clap::{Arg, ArgAction, Command, value_parser};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::path::PathBuf;
use treecontext::{AnalysisConfig, Treebank, analyze, report};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

/// Minimal stderr logger
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let level = match record.level() {
                Level::Error => "error",
                Level::Warn => "warning",
                Level::Info => "info",
                Level::Debug => "debug",
                Level::Trace => "trace",
            };
            eprintln!("{}: {}", level, record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

fn main() {
    let matches = Command::new("advctx")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tabulate the syntactic contexts of adverb phrases in an aligned treebank")
        .arg_required_else_help(true)
        .arg(
            Arg::new("input")
                .help("Treebank files or glob patterns (plain or gzip)")
                .required(true)
                .num_args(1..)
                .index(1),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .short('o')
                .help("Directory for prevs.csv, sames.csv and nexts.csv")
                .value_parser(value_parser!(PathBuf))
                .default_value("."),
        )
        .arg(
            Arg::new("marker")
                .long("marker")
                .short('m')
                .help("Label substring marking the phrases to analyze")
                .default_value(treecontext::ADVP_MARKER),
        )
        .arg(
            Arg::new("threshold")
                .long("threshold")
                .short('t')
                .help("Minimum relative frequency to report (inclusive)")
                .value_parser(value_parser!(f64))
                .default_value("0.1"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Log more (repeat for debug output)")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .short('q')
                .help("Only log errors")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    init_logging(matches.get_count("verbose"), matches.get_flag("quiet"));

    let mut config = AnalysisConfig::default();
    if let Some(marker) = matches.get_one::<String>("marker") {
        config = config.with_marker(marker);
    }
    if let Some(&threshold) = matches.get_one::<f64>("threshold") {
        config = config.with_threshold(threshold);
    }

    let inputs: Vec<&String> = matches
        .get_many::<String>("input")
        .map(|values| values.collect())
        .unwrap_or_default();
    let treebank = Treebank::from_inputs(&inputs).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    });

    let analysis = analyze(&treebank, &config);

    let out_dir = matches
        .get_one::<PathBuf>("out-dir")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    match report::write_tables(&analysis.tables, &out_dir) {
        Ok(written) => {
            for path in written {
                log::info!("wrote {}", path.display());
            }
        }
        Err(e) => {
            eprintln!("Error writing tables to {}: {}", out_dir.display(), e);
            std::process::exit(1);
        }
    }

    let summary = analysis.summary;
    if summary.sentences == 0 {
        log::warn!("no sentences read");
    }
    println!(
        "{} sentences ({} skipped), {} {} occurrences",
        summary.sentences, summary.skipped, summary.occurrences, config.marker
    );
}
