//! Shared helpers for PostgreSQL query building and row conversion.

use sqlx::PgExecutor;

use folio_core::error::{StorageError, StorageResult};
use folio_core::models::Record;
use folio_core::ports::{QueryDescriptor, SortDirection};

use super::source::SourceConfig;

/// PostgreSQL truncates identifiers beyond this length.
const MAX_IDENTIFIER_LEN: usize = 63;

/// Check that `name` is a plain, unquoted SQL identifier.
pub fn validate_identifier(name: &str, field_name: &str) -> StorageResult<()> {
    let mut chars = name.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if !starts_ok || !rest_ok || name.len() > MAX_IDENTIFIER_LEN {
        return Err(StorageError::InvalidIdentifier(format!(
            "{} '{}' must match [A-Za-z_][A-Za-z0-9_]* (max {} chars)",
            field_name, name, MAX_IDENTIFIER_LEN
        )));
    }

    Ok(())
}

/// Check a table name, optionally schema-qualified (`schema.table`).
pub fn validate_table_name(name: &str) -> StorageResult<()> {
    let mut parts = name.split('.');
    let first = parts.next().unwrap_or_default();
    let second = parts.next();

    if parts.next().is_some() {
        return Err(StorageError::InvalidIdentifier(format!(
            "table '{}' has more than one schema qualifier",
            name
        )));
    }

    validate_identifier(first, "table")?;
    if let Some(table) = second {
        validate_identifier(table, "table")?;
    }

    Ok(())
}

/// Build the keyset SELECT for a descriptor.
///
/// SAFETY: This dynamic SQL is safe from injection because:
/// 1. Table and column names are validated identifiers (see [`SourceConfig::validate`])
/// 2. Operators and sort keywords come from enums, never from user strings
/// 3. The boundary is always bound as `$1`
pub fn select_sql(config: &SourceConfig, query: &QueryDescriptor) -> String {
    let key = &config.key_column;
    let where_clause = match query.comparison.as_sql() {
        Some(op) => format!("WHERE t.{} {} $1", key, op),
        None => String::new(),
    };

    format!(
        "SELECT t.{key}::BIGINT AS key, to_jsonb(t) AS fields FROM {table} AS t {where_clause} ORDER BY t.{key} {dir} LIMIT {limit}",
        key = key,
        table = config.table,
        where_clause = where_clause,
        dir = query.sort.as_sql(),
        limit = query.limit,
    )
}

/// Build the extreme-key query: `MAX` for descending, `MIN` for ascending.
pub fn first_key_sql(config: &SourceConfig, sort: SortDirection) -> String {
    let aggregate = match sort {
        SortDirection::Asc => "MIN",
        SortDirection::Desc => "MAX",
    };
    format!(
        "SELECT {}(t.{})::BIGINT FROM {} AS t",
        aggregate, config.key_column, config.table
    )
}

/// Run a descriptor on any PostgreSQL executor (pool or transaction).
pub async fn fetch_records<'e, E>(
    executor: E,
    config: &SourceConfig,
    query: &QueryDescriptor,
) -> StorageResult<Vec<Record>>
where
    E: PgExecutor<'e>,
{
    let sql = select_sql(config, query);

    let mut statement = sqlx::query_as::<_, RecordRow>(&sql);
    if query.comparison.as_sql().is_some() {
        statement = statement.bind(query.boundary);
    }

    let rows = statement
        .fetch_all(executor)
        .await
        .map_err(|e| StorageError::QueryError(e.to_string()))?;

    Ok(rows.into_iter().map(RecordRow::into_record).collect())
}

/// Fetch the first key in `sort` order on any PostgreSQL executor.
pub async fn fetch_first_key<'e, E>(
    executor: E,
    config: &SourceConfig,
    sort: SortDirection,
) -> StorageResult<Option<i64>>
where
    E: PgExecutor<'e>,
{
    // MIN/MAX return NULL when the table is empty, so we need Option<i64> in the tuple
    let row: (Option<i64>,) = sqlx::query_as(&first_key_sql(config, sort))
        .fetch_one(executor)
        .await
        .map_err(|e| StorageError::QueryError(e.to_string()))?;

    Ok(row.0)
}

/// Database row representation for Record.
#[derive(sqlx::FromRow)]
struct RecordRow {
    key: i64,
    fields: serde_json::Value,
}

impl RecordRow {
    fn into_record(self) -> Record {
        Record::new(self.key, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::ports::Comparison;

    fn movies() -> SourceConfig {
        SourceConfig::new("movies", "id")
    }

    #[test]
    fn test_identifier_rules() {
        assert!(validate_identifier("id", "key").is_ok());
        assert!(validate_identifier("_created_seq2", "key").is_ok());
        // Injection / caractères interdits
        assert!(validate_identifier("id; DROP TABLE movies", "key").is_err());
        assert!(validate_identifier("\"id\"", "key").is_err());
        assert!(validate_identifier("2id", "key").is_err());
        assert!(validate_identifier("", "key").is_err());
        assert!(validate_identifier(&"x".repeat(64), "key").is_err());
    }

    #[test]
    fn test_table_name_allows_one_schema() {
        assert!(validate_table_name("movies").is_ok());
        assert!(validate_table_name("public.movies").is_ok());
        assert!(validate_table_name("a.b.c").is_err());
        assert!(validate_table_name("public.").is_err());
    }

    #[test]
    fn test_error_includes_field_name() {
        let err = validate_identifier("bad-name", "key column").unwrap_err();
        assert!(err.to_string().contains("key column"));
    }

    #[test]
    fn test_select_sql_with_filter() {
        let query = QueryDescriptor {
            comparison: Comparison::Ge,
            boundary: 3,
            sort: SortDirection::Asc,
            limit: 3,
        };
        assert_eq!(
            select_sql(&movies(), &query),
            "SELECT t.id::BIGINT AS key, to_jsonb(t) AS fields FROM movies AS t WHERE t.id >= $1 ORDER BY t.id ASC LIMIT 3"
        );
    }

    #[test]
    fn test_select_sql_without_filter_binds_nothing() {
        let sql = select_sql(&movies(), &QueryDescriptor::first_row(SortDirection::Desc));
        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("$1"));
        assert!(sql.ends_with("ORDER BY t.id DESC LIMIT 1"));
    }

    #[test]
    fn test_first_key_sql_picks_aggregate() {
        assert_eq!(
            first_key_sql(&movies(), SortDirection::Desc),
            "SELECT MAX(t.id)::BIGINT FROM movies AS t"
        );
        assert!(first_key_sql(&movies(), SortDirection::Asc).starts_with("SELECT MIN("));
    }
}
