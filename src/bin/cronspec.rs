use clap::{ArgAction, Parser, ValueEnum};
use cronspec::{ParseOptions, SecondsField, Spec};
use jiff::{Timestamp, Zoned};
use std::process;
use tracing_subscriber::EnvFilter;

const MAX_OCCURRENCES: u32 = 1000;

#[derive(Parser)]
#[command(name = "cronspec", about = "Cron recurrence rules", version)]
struct Cli {
    /// Cron expression (e.g., "0 9 * * Mon-Fri" or "0 0 ^1 * *")
    expression: Option<String>,

    /// Number of occurrences to show [default: 1, or all up to --to]
    #[arg(short, long)]
    n: Option<u32>,

    /// Start instant, exclusive (e.g., "2025-01-01T00:00:00+00:00[UTC]")
    #[arg(long)]
    from: Option<String>,

    /// End instant, inclusive
    #[arg(long)]
    to: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Validate expression without computing
    #[arg(long)]
    check: bool,

    /// Print the canonical form of the expression
    #[arg(long)]
    normalize: bool,

    /// Whether a leading seconds field is accepted
    #[arg(long, value_enum, default_value_t = SecondsArg::Optional)]
    seconds: SecondsArg,

    /// Accept expressions without the weekday field
    #[arg(long)]
    weekday_optional: bool,

    /// Reject @daily and friends
    #[arg(long)]
    no_presets: bool,

    /// Log to stderr (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum SecondsArg {
    Never,
    Optional,
    Required,
}

impl From<SecondsArg> for SecondsField {
    fn from(arg: SecondsArg) -> Self {
        match arg {
            SecondsArg::Never => SecondsField::Never,
            SecondsArg::Optional => SecondsField::Optional,
            SecondsArg::Required => SecondsField::Required,
        }
    }
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            seconds: self.seconds.into(),
            weekday_optional: self.weekday_optional,
            presets: !self.no_presets,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "cronspec=debug",
        _ => "cronspec=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Accept a zoned datetime, or a plain RFC 3339 timestamp read in the local
/// time zone.
fn parse_instant(flag: &str, text: &str) -> Zoned {
    if let Ok(zoned) = text.parse::<Zoned>() {
        return zoned;
    }
    match text.parse::<Timestamp>() {
        Ok(ts) => ts.to_zoned(jiff::tz::TimeZone::system()),
        Err(e) => {
            eprintln!("error: invalid --{flag} value {text:?}: {e}");
            process::exit(1);
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let expression = match cli.expression {
        Some(ref expr) => expr.as_str(),
        None => {
            eprintln!("error: no expression provided");
            process::exit(2);
        }
    };

    let spec = match Spec::parse_with(expression, &cli.parse_options()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.display_rich());
            process::exit(1);
        }
    };

    if cli.check {
        if spec.is_feasible() {
            println!("\u{2713} valid");
        } else {
            println!("\u{2713} valid (never matches)");
        }
        process::exit(0);
    }

    if cli.normalize {
        if cli.json {
            match serde_json::to_string(&spec) {
                Ok(json) => println!("{json}"),
                Err(e) => {
                    eprintln!("error: failed to serialize: {e}");
                    process::exit(1);
                }
            }
        } else {
            println!("{spec}");
        }
        process::exit(0);
    }

    let from = match cli.from {
        Some(ref text) => parse_instant("from", text),
        None => Zoned::now(),
    };
    let to = cli.to.as_deref().map(|text| parse_instant("to", text));

    let default_n = if to.is_some() { MAX_OCCURRENCES } else { 1 };
    let mut n = cli.n.unwrap_or(default_n);
    if n > MAX_OCCURRENCES {
        eprintln!("warning: capped at {MAX_OCCURRENCES} occurrences");
        n = MAX_OCCURRENCES;
    }

    let results: Vec<Zoned> = match to {
        Some(ref to) => spec.between(&from, to).take(n as usize).collect(),
        None => spec.next_n_after(&from, n as usize),
    };

    if results.is_empty() {
        eprintln!("no upcoming occurrences");
        process::exit(0);
    }

    if cli.json {
        let iso_strings: Vec<String> = results.iter().map(|z| z.to_string()).collect();
        match serde_json::to_string(&iso_strings) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: failed to serialize: {e}");
                process::exit(1);
            }
        }
    } else {
        for z in &results {
            println!("{z}");
        }
    }
}
