use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tweetstats::{format_day, init_tracing_once, DateAuthorEntry, PostStats, RankedEntry, Report, Strategy};

#[derive(Parser, Debug)]
#[command(
    name = "tweetstats",
    about = "Top dates, emojis and mentions over a line-delimited JSON post dump",
    version,
    long_about = None
)]
struct Args {
    /// NDJSON input (`.zst` is decompressed on the fly)
    input: PathBuf,

    /// Execution strategy
    #[arg(short, long, value_enum, default_value = "memory")]
    strategy: StrategyArg,

    /// Number of entries per ranking
    #[arg(short = 'k', long, default_value_t = 10)]
    top: usize,

    /// Which statistic to compute
    #[arg(short, long, value_enum, default_value = "all")]
    query: Query,

    /// Print results as one JSON object
    #[arg(long)]
    json: bool,

    /// Hide the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Number of worker threads for the time strategy
    #[arg(short = 't', long)]
    threads: Option<usize>,

    /// Run both strategies and fail if their rankings differ
    #[arg(long)]
    verify: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum StrategyArg {
    Memory,
    Time,
}

impl From<StrategyArg> for Strategy {
    fn from(s: StrategyArg) -> Self {
        match s {
            StrategyArg::Memory => Strategy::Memory,
            StrategyArg::Time => Strategy::Time,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Query {
    Dates,
    Emojis,
    Mentions,
    All,
}

impl Query {
    fn wants(self, q: Query) -> bool {
        self == Query::All || self == q
    }
}

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    dates: Option<Vec<DateAuthorEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    emojis: Option<Vec<RankedEntry<char>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mentions: Option<Vec<RankedEntry<String>>>,
}

fn keep<T>(report: Report<T>, failures: &mut usize) -> Vec<T> {
    if !report.is_ok() {
        *failures += 1;
    }
    report.entries
}

fn collect(stats: &PostStats, query: Query, failures: &mut usize) -> Output {
    let mut out = Output::default();
    if query.wants(Query::Dates) {
        out.dates = Some(keep(stats.top_date_authors(), failures));
    }
    if query.wants(Query::Emojis) {
        out.emojis = Some(keep(stats.top_emojis(), failures));
    }
    if query.wants(Query::Mentions) {
        out.mentions = Some(keep(stats.top_mentions(), failures));
    }
    out
}

fn print_text(out: &Output) {
    if let Some(dates) = &out.dates {
        println!("# top dates (most active author)");
        for e in dates {
            println!("{}\t{}", format_day(e.date), e.author);
        }
    }
    if let Some(emojis) = &out.emojis {
        println!("# top emojis");
        for e in emojis {
            println!("{}\t{}", e.key, e.count);
        }
    }
    if let Some(mentions) = &out.mentions {
        println!("# top mentions");
        for e in mentions {
            println!("@{}\t{}", e.key, e.count);
        }
    }
}

/// Compute the requested statistics, plus the `--verify` cross-check.
/// Returns the output and how many statistics failed to read the input.
fn run(args: &Args) -> Result<(Output, usize)> {
    let mut stats = PostStats::new()
        .input(&args.input)
        .top_k(args.top)
        .strategy(args.strategy.into())
        .progress(!args.no_progress);
    if let Some(n) = args.threads {
        stats = stats.parallelism(n);
    }

    let mut failures = 0usize;
    let out = collect(&stats, args.query, &mut failures);

    if args.verify {
        let other = match stats.options().strategy {
            Strategy::Memory => Strategy::Time,
            Strategy::Time => Strategy::Memory,
        };
        // failures are counted from the primary run only
        let mut ignored = 0usize;
        let check = collect(&stats.clone().strategy(other), args.query, &mut ignored);
        if check != out {
            bail!("strategies disagree on {}", args.input.display());
        }
        tracing::info!("memory and time strategies agree");
    }
    Ok((out, failures))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing_once();

    let (out, failures) = run(&args)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_text(&out);
    }

    if failures > 0 {
        bail!("{} statistic(s) could not read {}", failures, args.input.display());
    }
    Ok(())
}
