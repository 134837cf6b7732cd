//! In-memory ordered data source.
//!
//! Records are kept in a `BTreeMap` keyed by the ordering key, so every
//! descriptor maps onto a single range scan. Useful for tests, fixtures
//! and small embedded datasets.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;

use folio_core::error::StorageResult;
use folio_core::models::Record;
use folio_core::ports::{Comparison, OrderedDataSource, QueryDescriptor, SortDirection};

/// Ordered records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: BTreeMap<i64, serde_json::Value>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the record with `record.key`.
    pub fn insert(&mut self, record: Record) -> Option<serde_json::Value> {
        self.records.insert(record.key, record.fields)
    }

    /// Remove the record with `key`.
    pub fn remove(&mut self, key: i64) -> Option<serde_json::Value> {
        self.records.remove(&key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for MemorySource {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter
                .into_iter()
                .map(|record| (record.key, record.fields))
                .collect(),
        }
    }
}

fn key_range(comparison: Comparison, boundary: i64) -> (Bound<i64>, Bound<i64>) {
    match comparison {
        Comparison::Lt => (Bound::Unbounded, Bound::Excluded(boundary)),
        Comparison::Le => (Bound::Unbounded, Bound::Included(boundary)),
        Comparison::Gt => (Bound::Excluded(boundary), Bound::Unbounded),
        Comparison::Ge => (Bound::Included(boundary), Bound::Unbounded),
        Comparison::None => (Bound::Unbounded, Bound::Unbounded),
    }
}

#[async_trait]
impl OrderedDataSource for MemorySource {
    async fn select(&self, query: &QueryDescriptor) -> StorageResult<Vec<Record>> {
        let range = self.records.range(key_range(query.comparison, query.boundary));
        let limit = query.limit as usize;
        let to_record =
            |(key, fields): (&i64, &serde_json::Value)| Record::new(*key, fields.clone());

        Ok(match query.sort {
            SortDirection::Asc => range.take(limit).map(to_record).collect(),
            SortDirection::Desc => range.rev().take(limit).map(to_record).collect(),
        })
    }

    async fn first_key(&self, sort: SortDirection) -> StorageResult<Option<i64>> {
        let entry = match sort {
            SortDirection::Asc => self.records.first_key_value(),
            SortDirection::Desc => self.records.last_key_value(),
        };
        Ok(entry.map(|(key, _)| *key))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use folio_core::models::{Direction, OrderMode, PageRequest};
    use folio_core::services::{PageResolver, encode_cursor};

    fn movie(id: i64, name: &str, rating: i64, director: i64) -> Record {
        Record::new(
            id,
            json!({ "id": id, "name": name, "rating": rating, "director": director }),
        )
    }

    fn movies() -> Arc<MemorySource> {
        Arc::new(MemorySource::from_iter([
            movie(1, "Star Wars", 93, 1),
            movie(2, "Blade Runner", 90, 2),
            movie(3, "Alien", 91, 2),
        ]))
    }

    fn asc(cursor: &str) -> PageRequest {
        PageRequest::new(cursor, 2, OrderMode::ByKeyAscending)
    }

    fn desc(cursor: &str) -> PageRequest {
        PageRequest::new(cursor, 2, OrderMode::ByKeyDescending)
    }

    fn names(rows: &[Record]) -> Vec<&str> {
        rows.iter()
            .filter_map(|record| record.fields["name"].as_str())
            .collect()
    }

    // -------------------------------------------------------------------------
    // Descriptor semantics
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_select_applies_filter_sort_and_limit() {
        let source = MemorySource::from_iter((1..=6).map(|id| Record::new(id, json!(id))));

        let query = QueryDescriptor {
            comparison: Comparison::Lt,
            boundary: 5,
            sort: SortDirection::Desc,
            limit: 3,
        };
        let keys: Vec<i64> = source
            .select(&query)
            .await
            .unwrap()
            .iter()
            .map(|r| r.key)
            .collect();
        assert_eq!(keys, vec![4, 3, 2]);
    }

    #[tokio::test]
    async fn test_first_key_finds_both_extremes() {
        let source = movies();
        assert_eq!(source.first_key(SortDirection::Desc).await.unwrap(), Some(3));
        assert_eq!(source.first_key(SortDirection::Asc).await.unwrap(), Some(1));
        let empty = MemorySource::new();
        assert_eq!(empty.first_key(SortDirection::Asc).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_filter_at_i64_extremes() {
        let source = MemorySource::from_iter([
            Record::new(i64::MIN, json!(0)),
            Record::new(i64::MAX, json!(0)),
        ]);

        let query = QueryDescriptor {
            comparison: Comparison::Gt,
            boundary: i64::MAX,
            sort: SortDirection::Asc,
            limit: 10,
        };
        assert!(source.select(&query).await.unwrap().is_empty());

        let query = QueryDescriptor {
            comparison: Comparison::Ge,
            boundary: i64::MIN,
            ..query
        };
        assert_eq!(source.select(&query).await.unwrap().len(), 2);
    }

    // -------------------------------------------------------------------------
    // Movie catalogue, ascending by id, two per page
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_ascending_pages_through_catalogue() {
        let resolver = PageResolver::new(movies());

        let first = resolver
            .resolve(&asc(""), Direction::Forward)
            .await
            .unwrap();
        assert_eq!(names(&first.rows), vec!["Star Wars", "Blade Runner"]);
        assert_eq!(first.next_cursor.as_str(), "Mw==");

        let second = resolver
            .resolve(&asc("Mw=="), Direction::Forward)
            .await
            .unwrap();
        assert_eq!(names(&second.rows), vec!["Alien"]);
        assert_eq!(second.next_cursor.as_str(), "");
    }

    #[tokio::test]
    async fn test_ascending_previous_page_is_reversed_for_display() {
        let resolver = PageResolver::new(movies());

        let page = resolver
            .resolve(&asc("Mw=="), Direction::Backward)
            .await
            .unwrap();
        assert_eq!(names(&page.rows), vec!["Star Wars", "Blade Runner"]);
        assert_eq!(page.next_cursor.as_str(), "");
    }

    // Test critique: pas de page précédente au début du jeu de données
    #[tokio::test]
    async fn test_previous_without_cursor_returns_no_rows() {
        let resolver = PageResolver::new(movies());

        let page = resolver
            .resolve(&asc(""), Direction::Backward)
            .await
            .unwrap();
        assert!(page.rows.is_empty());
        assert_eq!(page.next_cursor.as_str(), "");
    }

    #[tokio::test]
    async fn test_descending_default_order_starts_at_newest() {
        let resolver = PageResolver::new(movies());

        let page = resolver
            .resolve(&desc(""), Direction::Forward)
            .await
            .unwrap();
        assert_eq!(names(&page.rows), vec!["Alien", "Blade Runner"]);
        assert_eq!(page.next_cursor, encode_cursor(1));

        let last = resolver
            .resolve(&desc(page.next_cursor.as_str()), Direction::Forward)
            .await
            .unwrap();
        assert_eq!(names(&last.rows), vec!["Star Wars"]);
        assert!(last.is_last());
    }

    // Test critique: une suppression entre deux pages ne casse pas le curseur
    #[tokio::test]
    async fn test_cursor_survives_deleted_boundary_row() {
        let mut source: MemorySource = (1..=6)
            .map(|id| Record::new(id, json!({ "id": id })))
            .collect();

        let first = PageResolver::new(Arc::new(source.clone()))
            .resolve(&asc(""), Direction::Forward)
            .await
            .unwrap();
        assert_eq!(first.next_cursor, encode_cursor(3));

        // La ligne pointée par le curseur disparaît
        source.remove(3);

        let second = PageResolver::new(Arc::new(source))
            .resolve(&asc(first.next_cursor.as_str()), Direction::Forward)
            .await
            .unwrap();
        assert_eq!(second.keys(), vec![4, 5]);
        assert_eq!(second.next_cursor, encode_cursor(6));
    }
}
