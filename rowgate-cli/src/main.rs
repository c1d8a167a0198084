//! Reads a generated series, cancels the read after a few rows and reports
//! how many rows were delivered and what the final status of the read was.
use async_executor::Executor;
use async_io::Timer;
use clap::{Parser, ValueEnum};
use rowgate_reader::{CancelPolicy, Error, ReadState, ReadSummary, ReaderConfig, StreamingRowReader};
use rowgate_runtime::CancellationSignal;
use rowgate_source::mem_impl::{MemSource, MemTable};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

const SERIES_TABLE: &str = "generate_series";
// mid-pull cancel needs pulls that actually wait, otherwise the
// cancelling task never runs before the read is over.
const MIN_MID_PULL_LATENCY: Duration = Duration::from_millis(2);

fn main() {
    init_tracing();
    let args = Args::parse();
    let signal = CancellationSignal::new();
    #[cfg(unix)]
    if let Err(e) = rowgate_runtime::signal::subscribe_stop_signal(signal.clone()) {
        log::warn!("failed to subscribe stop signal: {}", e);
    }
    let ex = Executor::new();
    let report = async_io::block_on(ex.run(run(&args, &ex, signal)));
    for e in &report.scan_failures {
        println!("scan failed: {}", e);
    }
    println!("rowsRead: {}", report.rows_read);
    match &report.status {
        Ok(summary) => println!("finalStatus: ok ({})", summary),
        Err(e) => println!("finalStatus: {}", e),
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[derive(Debug)]
struct Report {
    rows_read: u64,
    scan_failures: Vec<Error>,
    status: rowgate_reader::Result<ReadSummary>,
}

async fn run(args: &Args, ex: &Executor<'_>, signal: CancellationSignal) -> Report {
    let mut latency = Duration::from_millis(args.latency_ms);
    if args.mid_pull {
        latency = latency.max(MIN_MID_PULL_LATENCY);
    }
    let mut table = MemTable::series(1, args.rows);
    if !latency.is_zero() {
        table = table.latency(latency);
    }
    let source = MemSource::new();
    source.add_table(SERIES_TABLE, table);
    let conn = source.connect();
    let config = ReaderConfig::new().policy(args.policy.into());
    let mut reader =
        StreamingRowReader::open(&source, &conn, &args.query, signal.clone(), config).await;

    let mut scan_failures = vec![];
    let mut armed = false;
    loop {
        if !armed && reader.rows_delivered() == args.cancel_after {
            armed = true;
            if args.mid_pull {
                // fires halfway through the next pull.
                let signal = signal.clone();
                ex.spawn(async move {
                    Timer::after(latency / 2).await;
                    signal.cancel();
                })
                .detach();
            } else {
                signal.cancel();
            }
        }
        if let Err(e) = reader.next_scan::<(i64,)>().await {
            if let Error::Scan { .. } = e {
                scan_failures.push(e);
            }
        }
        if reader.state() != ReadState::Open {
            break;
        }
    }
    let report = Report {
        rows_read: reader.rows_delivered(),
        scan_failures,
        status: reader.final_status(),
    };
    reader.close();
    report
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// query to run, i.e. name of the table to read
    #[arg(short, long, env = "ROWGATE_QUERY", default_value = SERIES_TABLE)]
    query: String,

    /// number of rows in the generated series
    #[arg(short, long, env = "ROWGATE_ROWS", default_value = "10000000")]
    rows: i64,

    /// cancel once this many rows have been read
    #[arg(short, long, env = "ROWGATE_CANCEL_AFTER", default_value = "2")]
    cancel_after: u64,

    /// what happens to a pull in flight when the cancel fires
    #[arg(short, long, env = "ROWGATE_POLICY", value_enum, default_value_t = Policy::FailFast)]
    policy: Policy,

    /// delay of every pull in milliseconds
    #[arg(short, long, env = "ROWGATE_LATENCY_MS", default_value = "0")]
    latency_ms: u64,

    /// fire the cancel from another task while the next pull is in flight
    #[arg(short, long)]
    mid_pull: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Policy {
    FailFast,
    DrainThenStop,
}

impl From<Policy> for CancelPolicy {
    #[inline]
    fn from(src: Policy) -> Self {
        match src {
            Policy::FailFast => CancelPolicy::FailFast,
            Policy::DrainThenStop => CancelPolicy::DrainThenStop,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(args: &[&str]) -> Report {
        let args = Args::parse_from(std::iter::once("rowgate").chain(args.iter().copied()));
        let ex = Executor::new();
        async_io::block_on(ex.run(run(&args, &ex, CancellationSignal::new())))
    }

    #[test]
    fn test_cancel_after_two_rows() {
        for policy in ["fail-fast", "drain-then-stop"] {
            let report = run_with(&["--rows", "10", "--policy", policy]);
            assert_eq!(2, report.rows_read);
            assert_eq!(Err(Error::Canceled { rows_delivered: 2 }), report.status);
            assert!(report.scan_failures.is_empty());
        }
    }

    #[test]
    fn test_cancel_mid_pull() {
        let report = run_with(&["--rows", "10", "--latency-ms", "40", "--mid-pull"]);
        assert_eq!(2, report.rows_read);
        assert_eq!(Err(Error::Canceled { rows_delivered: 2 }), report.status);

        let report = run_with(&[
            "--rows",
            "10",
            "--latency-ms",
            "40",
            "--mid-pull",
            "--policy",
            "drain-then-stop",
        ]);
        assert_eq!(3, report.rows_read);
        assert_eq!(Err(Error::Canceled { rows_delivered: 3 }), report.status);
    }

    #[test]
    fn test_read_to_end() {
        let report = run_with(&["--rows", "5", "--cancel-after", "100"]);
        assert_eq!(5, report.rows_read);
        assert_eq!(
            Ok(ReadSummary {
                rows_delivered: 5,
                scan_errors: 0
            }),
            report.status
        );
    }

    #[test]
    fn test_unknown_query() {
        let report = run_with(&["--query", "no_such_table"]);
        assert_eq!(0, report.rows_read);
        assert!(matches!(report.status, Err(Error::SourceOpen(_))));
    }
}
