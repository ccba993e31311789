use std::{
    io::{stdout, BufWriter, Read, Write},
    sync::Once,
};

use crate::{
    common::error::AppError,
    domain::ledger::Ledger,
    io::{reader, writer},
    worker::processor::Processor,
};

const DEFAULT_MONTHS_BACK: i32 = 6;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, defaulting to
/// `finance_tracker=info`. Only the first call has any effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("finance_tracker=info"));

        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    });
}

/// What `run` prints once the input is loaded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Totals, chart, trend and budgets.
    #[default]
    Report,
    /// The export payload.
    Json,
    /// Every transaction as CSV.
    Statement,
}

/// Command-line settings: `<input.csv> [--months N] [--json | --statement]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub input_path: String,
    pub months_back: i32,
    pub output: OutputMode,
}

impl AppConfig {
    /// Parses program arguments; the first one is the program name.
    pub fn from_args<I, S>(args: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::<String>::into).skip(1);
        let mut input_path = None;
        let mut months_back = DEFAULT_MONTHS_BACK;
        let mut output = OutputMode::Report;

        while let Some(arg) = args.next() {
            if arg == "--json" || arg == "--statement" {
                let mode = if arg == "--json" { OutputMode::Json } else { OutputMode::Statement };
                if output != OutputMode::Report && output != mode {
                    return Err(AppError::InvalidArg("--json and --statement cannot be combined".into()));
                }
                output = mode;
            } else if arg == "--months" {
                let raw = args
                    .next()
                    .ok_or_else(|| AppError::InvalidArg("--months needs a value".into()))?;
                months_back = raw
                    .parse()
                    .map_err(|_| AppError::InvalidArg(format!("--months {raw}")))?;
            } else if arg.starts_with("--") {
                return Err(AppError::InvalidArg(arg));
            } else if input_path.is_none() {
                input_path = Some(arg);
            } else {
                return Err(AppError::InvalidArg(format!("unexpected argument {arg}")));
            }
        }

        Ok(Self {
            input_path: input_path.ok_or(AppError::MissingArg)?,
            months_back,
            output,
        })
    }
}

pub fn run<I, S>(args: I) -> Result<(), AppError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let config = AppConfig::from_args(args)?;

    let file = std::fs::File::open(&config.input_path)?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    let mut ledger = Ledger::new();
    load(&mut reader, &mut ledger)?;

    let stdout = stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_output(&mut out, &ledger, &config)?;
    out.flush()?;

    Ok(())
}

/// Applies every CSV row to `ledger`, stopping at the first bad row.
pub fn load<R: Read>(rdr: &mut csv::Reader<R>, ledger: &mut Ledger) -> Result<Processor, AppError> {
    let mut processor = Processor::new();
    for event in reader::read_events(rdr) {
        let event = event.map_err(AppError::Parse)?;
        processor.process(ledger, event)?;
    }
    tracing::info!(
        records = processor.records_applied(),
        budgets = processor.budgets_applied(),
        "input loaded"
    );
    Ok(processor)
}

/// Writes whatever `config.output` asks for.
pub fn write_output<W: Write>(mut out: W, ledger: &Ledger, config: &AppConfig) -> Result<(), AppError> {
    match config.output {
        OutputMode::Report => write_report(&mut out, ledger, config.months_back)?,
        OutputMode::Json => writeln!(out, "{}", ledger.export()?)?,
        OutputMode::Statement => writer::write_transactions(&mut out, &ledger.list_all())?,
    }
    Ok(())
}

/// Writes totals, the expense chart, the monthly trend and budget status.
pub fn write_report<W: Write>(mut out: W, ledger: &Ledger, months_back: i32) -> Result<(), AppError> {
    writeln!(out, "income:  {}", ledger.total_income())?;
    writeln!(out, "expense: {}", ledger.total_expense())?;
    writeln!(out, "balance: {}", ledger.balance())?;

    writeln!(out)?;
    writeln!(out, "expenses by category")?;
    writeln!(out, "{}", ledger.expense_chart())?;

    let trend = ledger.monthly_trend(months_back);
    if !trend.is_empty() {
        writeln!(out)?;
        writeln!(out, "monthly trend")?;
        for (month, totals) in &trend {
            writeln!(out, "{month}  income {}  expense {}", totals.income, totals.expense)?;
        }
    }

    let reports = ledger.all_budget_reports();
    if !reports.is_empty() {
        writeln!(out)?;
        writeln!(out, "budgets")?;
        writer::write_budget_reports(&mut out, &reports)?;
    }
    Ok(())
}
