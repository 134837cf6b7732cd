//! Folio - cursor pagination over PostgreSQL tables.
//!
//! Prints each page as one JSON document on stdout; logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # First page of `movies`, newest first
//! folio --table movies
//!
//! # Next page, oldest first, two rows per page
//! folio --table movies --order-by id --page-size 2 --cursor Mw==
//!
//! # Page preceding a cursor
//! folio --table movies --order-by id --cursor Mw== --previous
//!
//! # Every remaining page
//! DATABASE_URL=postgres://localhost/cinema folio --table movies --follow
//! ```

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Parser;
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use folio_core::metrics::init_metrics;
use folio_core::models::{DEFAULT_PAGE_SIZE, Direction, OrderBy, PageRequest, PageResult};
use folio_core::services::PageResolver;
use folio_storage::{Database, DatabaseConfig, PgOrderedSource, SourceConfig};

/// Folio CLI - cursor pagination over a PostgreSQL table.
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Folio - cursor pagination over PostgreSQL tables")]
#[command(version)]
struct Cli {
    /// PostgreSQL database URL.
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://localhost/folio")]
    database_url: String,

    /// Table to paginate, optionally schema-qualified.
    #[arg(long, env = "FOLIO_TABLE")]
    table: String,

    /// Ordering column; a leading '-' pages from the largest key down.
    #[arg(long, env = "FOLIO_ORDER_BY", default_value = "-id", allow_hyphen_values = true)]
    order_by: OrderBy,

    /// Rows per page.
    #[arg(
        long,
        env = "FOLIO_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    page_size: u32,

    /// Cursor returned by a previous page (empty for the first page).
    #[arg(long, default_value = "")]
    cursor: String,

    /// Fetch the page preceding the cursor instead of the next one.
    #[arg(long)]
    previous: bool,

    /// Keep fetching pages in the same direction until the last one.
    #[arg(long)]
    follow: bool,

    /// Upper bound on pages printed with --follow.
    #[arg(long, default_value_t = 1000)]
    max_pages: u32,

    /// Run page queries outside a repeatable-read snapshot.
    #[arg(long)]
    no_snapshot: bool,

    /// Enable JSON log output.
    #[arg(long, env = "JSON_LOGS")]
    json_logs: bool,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.json_logs);
    init_metrics();

    debug!(database_url = %mask_password(&cli.database_url), "Database endpoint");

    let db = Database::connect(&DatabaseConfig::for_cli(&cli.database_url))
        .await
        .context("Failed to connect to database")?;

    if !db.is_healthy().await {
        bail!("Database is not answering queries");
    }

    let source = PgOrderedSource::new(&db, SourceConfig::new(&cli.table, &cli.order_by.column))
        .context("Invalid table or ordering column")?;
    let source = Arc::new(source);
    let resolver = PageResolver::new(source.clone());

    let direction = Direction::from_previous_flag(cli.previous);
    let mut request = PageRequest::new(cli.cursor.as_str(), cli.page_size, cli.order_by.mode);

    info!(
        table = %cli.table,
        order_by = %cli.order_by,
        page_size = cli.page_size,
        direction = direction.as_str(),
        "Resolving pages"
    );

    let mut pages = 0;
    loop {
        let page = if cli.no_snapshot {
            resolver
                .resolve(&request, direction)
                .await
                .context("Failed to resolve page")?
        } else {
            resolve_in_snapshot(&source, &request, direction).await?
        };

        print_page(&page).context("Failed to write page")?;
        pages += 1;

        if !cli.follow || page.is_last() {
            break;
        }
        if pages >= cli.max_pages {
            warn!(pages, "Stopping before the last page (--max-pages reached)");
            break;
        }
        request = request.with_cursor(page.next_cursor);
    }

    debug!(pages, "Done");
    db.close().await;
    Ok(())
}

/// Resolve one page with every probe reading the same snapshot.
async fn resolve_in_snapshot(
    source: &PgOrderedSource,
    request: &PageRequest,
    direction: Direction,
) -> Result<PageResult> {
    let snapshot = Arc::new(source.snapshot().await.context("Failed to open snapshot")?);

    let page = PageResolver::new(snapshot.clone())
        .resolve(request, direction)
        .await;

    snapshot
        .finish()
        .await
        .context("Failed to close snapshot")?;

    page.context("Failed to resolve page")
}

/// Write a page as `{"rows": [...], "next_cursor": "..."}` on one line.
fn print_page(page: &PageResult) -> io::Result<()> {
    let rows: Vec<&serde_json::Value> = page.rows.iter().map(|record| &record.fields).collect();
    let document = json!({
        "rows": rows,
        "next_cursor": page.next_cursor,
    });

    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, &document)?;
    writeln!(stdout)
}

/// Initialize tracing subscriber.
fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .init();
    }
}

/// Mask password in database URL for logging.
fn mask_password(url_str: &str) -> String {
    match url::Url::parse(url_str) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("****"));
            }
            url.to_string()
        }
        Err(_) => url_str.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::models::OrderMode;

    #[test]
    fn test_mask_password_hides_secret() {
        let masked = mask_password("postgres://folio:hunter2@db:5432/cinema");
        assert!(!masked.contains("hunter2"));
        assert!(masked.contains("****"));
    }

    #[test]
    fn test_cli_accepts_descending_order_by() {
        let cli = Cli::try_parse_from(["folio", "--table", "movies", "--order-by", "-rating_seq"])
            .unwrap();
        assert_eq!(cli.order_by.column, "rating_seq");
        assert_eq!(cli.order_by.mode, OrderMode::ByKeyDescending);
    }

    // Test critique: une taille de page nulle est refusée avant d'atteindre le cœur
    #[test]
    fn test_cli_rejects_zero_page_size() {
        let result = Cli::try_parse_from(["folio", "--table", "movies", "--page-size", "0"]);
        assert!(result.is_err());
    }
}
