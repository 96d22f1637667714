use std::process::ExitCode;

use tempviews::cli::{Cli, OutputFormat};
use tempviews::datafusion::{
    DataFusionContext, ErrorKind, SessionOptions, TempTableLoader, MERCHANTS_CSV, PRODUCTS_CSV,
};
use tempviews::output::render;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse_args();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let delimiter = u8::try_from(cli.delimiter)
        .map_err(|_| format!("delimiter must be a single-byte character: {:?}", cli.delimiter))?;

    let mut ctx = DataFusionContext::with_options(SessionOptions {
        target_partitions: cli.partitions,
        ..SessionOptions::default()
    })?;

    let loaded = TempTableLoader::new()
        .with_base_dir(&cli.data_dir)
        .with_delimiter(delimiter)
        .load(&mut ctx);
    if let Err(e) = &loaded {
        if e.kind() == ErrorKind::NotFound {
            log::error!(
                "expected {} and {} under {}",
                MERCHANTS_CSV,
                PRODUCTS_CSV,
                cli.data_dir.display()
            );
        }
    }
    loaded?;

    match &cli.query {
        Some(sql) => {
            let batches = ctx.execute_sql_batches(sql)?;
            print!("{}", render(&batches, cli.format)?);
        }
        None => describe_views(&ctx, cli.format)?,
    }

    Ok(())
}

/// Prints each registered view with its row count and inferred columns.
fn describe_views(
    ctx: &DataFusionContext,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    for name in ctx.list_tables() {
        let rows = ctx.row_count(&name)?;
        let schema = ctx
            .get_table_schema(&name)
            .ok_or_else(|| format!("no schema for view '{}'", name))?;

        if format == OutputFormat::Table {
            println!("{} ({} rows)", name, rows);
            for column in &schema.columns {
                println!("  {:<20} {}", column.name, column.data_type);
            }
        } else {
            let sample = ctx.execute_sql_batches(&format!("SELECT * FROM {} LIMIT 5", name))?;
            print!("{}", render(&sample, format)?);
        }
    }
    Ok(())
}
