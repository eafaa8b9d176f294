//! pivotsql CLI - Generate pivot tables from discovered category values
//!
//! Usage:
//!   pivotsql run [JOB] [--db <path>] [--table <t> --row-by <c> --column-by <c> --value <v>...]
//!   pivotsql plan [JOB] [--db <path>] [--dialect <dialect>] [--output sql|json]
//!   pivotsql jobs
//!
//! Examples:
//!   pivotsql run scores
//!   pivotsql run --db warehouse.db --table exam_scores --row-by uid --column-by subject --value score --permanent --prefix main
//!   pivotsql plan scores --dialect postgres --output json

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use pivotsql::config::{FilterSettings, PivotJob, Settings};
use pivotsql::pivot::{execute_pivot, plan_pivot, PivotQuery, PivotRequest, ValueNames};
use pivotsql::sql::{Dialect, SqlDialect};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pivotsql")]
#[command(about = "pivotsql - Turn the distinct values of a column into a pivot table")]
#[command(version)]
struct Cli {
    /// Config file (defaults to PIVOTSQL_CONFIG, ./pivotsql.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a permanent pivot table in a SQLite database
    Run {
        #[command(flatten)]
        pivot: PivotArgs,

        /// SQLite database file (overrides [database] path)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Discover categories and print the statements without running them
    Plan {
        #[command(flatten)]
        pivot: PivotArgs,

        /// SQLite database file used for discovery (overrides [database] path)
        #[arg(long)]
        db: Option<PathBuf>,

        /// SQL dialect to render
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Output format
        #[arg(short, long, default_value = "sql")]
        output: OutputFormat,
    },

    /// List pivot jobs in the config file
    Jobs,
}

/// Pivot inputs. Flags override the named job, which overrides [defaults].
#[derive(Args)]
struct PivotArgs {
    /// Name of a [pivots.<name>] job
    job: Option<String>,

    /// Source table (schema-qualified allowed)
    #[arg(long)]
    table: Option<String>,

    /// Row key column
    #[arg(long)]
    row_by: Option<String>,

    /// Category column
    #[arg(long)]
    column_by: Option<String>,

    /// Value column (repeatable)
    #[arg(long = "value")]
    values: Vec<String>,

    /// Aggregate function
    #[arg(long)]
    aggregate: Option<String>,

    /// Create a permanent table (requires a prefix)
    #[arg(long)]
    permanent: bool,

    /// Schema prefix for permanent tables
    #[arg(long)]
    prefix: Option<String>,

    /// Keep only this category (repeatable)
    #[arg(long)]
    include: Vec<String>,

    /// Drop this category (repeatable)
    #[arg(long)]
    exclude: Vec<String>,

    /// Keep only categories matching this regex
    #[arg(long)]
    pattern: Option<String>,
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Redshift,
    Duckdb,
    Mysql,
    Sqlite,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Redshift => Dialect::Redshift,
            DialectArg::Duckdb => Dialect::DuckDb,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Sqlite => Dialect::Sqlite,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// DROP and CREATE statements with bound parameters as comments
    Sql,
    /// The whole plan as JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = load_settings(cli.config.as_ref()).and_then(|settings| match cli.command {
        Commands::Run { pivot, db } => cmd_run(&settings, &pivot, db),
        Commands::Plan {
            pivot,
            db,
            dialect,
            output,
        } => cmd_plan(&settings, &pivot, db, dialect, output),
        Commands::Jobs => cmd_jobs(&settings),
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("pivotsql=info,warn")),
        1 => EnvFilter::new("pivotsql=debug,warn"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(path) => Settings::from_file(path)
            .with_context(|| format!("loading config '{}'", path.display())),
        None => Settings::load().context("loading config"),
    }
}

fn cmd_run(settings: &Settings, args: &PivotArgs, db: Option<PathBuf>) -> Result<()> {
    let request = run_request(settings, resolve_job(settings, args)?)?;

    let mut conn = open_database(settings, db)?;
    let query = plan_pivot(&mut conn, &request)?;
    execute_pivot(&mut conn, &query)?;

    println!("{}", query.target);
    Ok(())
}

/// `run` owns its connection, so the target must be a permanent table.
fn run_request(settings: &Settings, mut job: PivotJob) -> Result<PivotRequest> {
    job.dialect = Some(Dialect::Sqlite);
    let request = job.to_request(&settings.defaults)?;
    if request.temporary {
        bail!(
            "a temporary pivot table is dropped when `pivotsql run` exits; \
             use --permanent --prefix main or set temporary = false"
        );
    }
    Ok(request)
}

fn cmd_plan(
    settings: &Settings,
    args: &PivotArgs,
    db: Option<PathBuf>,
    dialect: Option<DialectArg>,
    output: OutputFormat,
) -> Result<()> {
    let mut job = resolve_job(settings, args)?;
    if let Some(dialect) = dialect {
        job.dialect = Some(dialect.into());
    }

    let mut conn = open_database(settings, db)?;
    let request = job.to_request(&settings.defaults)?;
    let query = plan_pivot(&mut conn, &request)?;

    match output {
        OutputFormat::Sql => print_plan(&query),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&query)?),
    }
    Ok(())
}

fn cmd_jobs(settings: &Settings) -> Result<()> {
    if settings.pivots.is_empty() {
        println!("No pivot jobs defined.");
        return Ok(());
    }

    println!("Pivot jobs:");
    for (name, job) in &settings.pivots {
        let values: Vec<&str> = job.values.iter().collect();
        println!(
            "  - {} ({} by {} x {}: {})",
            name,
            job.table,
            job.row_by,
            job.column_by,
            values.join(", ")
        );
    }
    Ok(())
}

/// Start from the named job (or a blank one) and apply flag overrides.
fn resolve_job(settings: &Settings, args: &PivotArgs) -> Result<PivotJob> {
    let mut job = match &args.job {
        Some(name) => settings.get_job(name)?.clone(),
        None => PivotJob {
            table: args
                .table
                .clone()
                .context("--table is required without a job name")?,
            row_by: args
                .row_by
                .clone()
                .context("--row-by is required without a job name")?,
            column_by: args
                .column_by
                .clone()
                .context("--column-by is required without a job name")?,
            values: ValueNames::default(),
            aggregate: None,
            temporary: None,
            prefix: None,
            dialect: None,
            filter: FilterSettings::default(),
        },
    };

    if let Some(table) = &args.table {
        job.table = table.clone();
    }
    if let Some(row_by) = &args.row_by {
        job.row_by = row_by.clone();
    }
    if let Some(column_by) = &args.column_by {
        job.column_by = column_by.clone();
    }
    if !args.values.is_empty() {
        job.values = args.values.clone().into();
    }
    if let Some(aggregate) = &args.aggregate {
        job.aggregate = Some(aggregate.clone());
    }
    if args.permanent {
        job.temporary = Some(false);
    }
    if let Some(prefix) = &args.prefix {
        job.prefix = Some(prefix.clone());
    }
    if !args.include.is_empty() {
        job.filter.include = Some(args.include.clone());
    }
    job.filter.exclude.extend(args.exclude.iter().cloned());
    if let Some(pattern) = &args.pattern {
        job.filter.pattern = Some(pattern.clone());
    }

    Ok(job)
}

fn open_database(settings: &Settings, db: Option<PathBuf>) -> Result<Connection> {
    let path = match db {
        Some(path) => path,
        None => match settings.database.resolved_path()? {
            Some(path) => path,
            None => bail!("no database given; pass --db or set [database] path"),
        },
    };
    Connection::open(&path).with_context(|| format!("opening database '{}'", path.display()))
}

fn print_plan(query: &PivotQuery) {
    println!("-- pivotsql plan");
    println!("-- Target: {}", query.target);
    println!("-- Dialect: {}", query.dialect);
    println!("-- Columns: {}", query.columns.len());
    println!();
    println!("{}", query.drop_sql);
    println!();
    println!("{}", query.create_sql);

    if !query.params.is_empty() {
        println!();
        println!("-- Parameters:");
        for (i, param) in query.params.iter().enumerate() {
            println!(
                "--   {} = {}",
                query.dialect.placeholder(i + 1),
                param.to_sql_literal(query.dialect)
            );
        }
    }
}
