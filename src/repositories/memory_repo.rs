use axum::async_trait;

use crate::error::SearchError;
use crate::models::row::{FieldValue, StorageRow};
use crate::repositories::query_builder::{Clause, Operator, SelectQuery, SqlValue};
use crate::repositories::RestaurantStore;

/// Restaurant table held in memory, used for fixtures and local runs.
///
/// Clauses are evaluated the way postgres would for the column types in
/// `sql/restaurant.sql`: `LIKE` is case-sensitive and a null never matches.
/// Thresholds read the column as a number, so text ratings compare too.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRestaurantRepo {
    rows: Vec<StorageRow>,
}

impl InMemoryRestaurantRepo {
    pub fn new(rows: Vec<StorageRow>) -> Self {
        Self { rows }
    }
}

#[async_trait]
impl RestaurantStore for InMemoryRestaurantRepo {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<StorageRow>, SearchError> {
        Ok(self
            .rows
            .iter()
            .filter(|row| query.predicate.clauses().iter().all(|clause| matches(row, clause)))
            .cloned()
            .collect())
    }
}

fn matches(row: &StorageRow, clause: &Clause) -> bool {
    let Some(field) = row.get(clause.column.as_str()) else {
        return false;
    };

    match (clause.operator, field, &clause.value) {
        (Operator::Eq, FieldValue::Text(have), SqlValue::Text(want)) => have == want,
        (Operator::Eq, FieldValue::Int(have), SqlValue::Int(want)) => *have == i64::from(*want),
        (Operator::Eq, FieldValue::Bool(have), SqlValue::Bool(want)) => have == want,
        (Operator::Like, FieldValue::Text(have), SqlValue::Text(pattern)) => like(have, pattern),
        (Operator::AtLeast, _, SqlValue::Float(min)) => row
            .finite_float(clause.column.as_str())
            .is_ok_and(|have| have >= *min),
        _ => false,
    }
}

/// `%`-delimited substring match; the only pattern shape the builder emits.
fn like(haystack: &str, pattern: &str) -> bool {
    match pattern
        .strip_prefix('%')
        .and_then(|rest| rest.strip_suffix('%'))
    {
        Some(needle) => haystack.contains(needle),
        None => haystack == pattern,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::FilterCriteria;

    fn row(id: &str, city: &str, rating: f64, veg: bool) -> StorageRow {
        StorageRow::new()
            .with("id", id)
            .with("restaurant_id", 1_i64)
            .with("city", city)
            .with("rating", rating)
            .with("veg", veg)
    }

    fn ids(rows: &[StorageRow]) -> Vec<String> {
        rows.iter().map(|row| row.text("id")).collect()
    }

    #[tokio::test]
    async fn empty_predicate_returns_everything_in_order() {
        let repo = InMemoryRestaurantRepo::new(vec![
            row("b", "Pune", 4.0, true),
            row("a", "Delhi", 3.0, false),
        ]);
        let rows = repo
            .select(&SelectQuery::for_criteria(&FilterCriteria::default()))
            .await
            .unwrap();
        assert_eq!(ids(&rows), vec!["b", "a"]);
    }

    #[tokio::test]
    async fn clauses_are_conjunctive() {
        let repo = InMemoryRestaurantRepo::new(vec![
            row("1", "Navi Mumbai", 4.0, true),
            row("2", "Mumbai", 2.0, true),
            row("3", "Mumbai", 4.5, false),
            row("4", "mumbai", 4.9, true),
        ]);
        let criteria = FilterCriteria {
            city: "Mumbai".to_string(),
            min_rating: 3.0,
            vegetarian: Some(true),
            ..FilterCriteria::default()
        };
        let rows = repo.select(&SelectQuery::for_criteria(&criteria)).await.unwrap();
        assert_eq!(ids(&rows), vec!["1"]);
    }

    #[tokio::test]
    async fn rating_threshold_reads_text_ratings() {
        let repo = InMemoryRestaurantRepo::new(vec![
            StorageRow::new().with("id", "hi").with("rating", "4.2"),
            StorageRow::new().with("id", "lo").with("rating", "2.9"),
            StorageRow::new().with("id", "int").with("rating", 4_i64),
            StorageRow::new().with("id", "junk").with("rating", "n/a"),
        ]);
        let criteria = FilterCriteria {
            min_rating: 3.0,
            ..FilterCriteria::default()
        };
        let rows = repo.select(&SelectQuery::for_criteria(&criteria)).await.unwrap();
        assert_eq!(ids(&rows), vec!["hi", "int"]);
    }

    #[tokio::test]
    async fn null_columns_never_match() {
        let repo = InMemoryRestaurantRepo::new(vec![StorageRow::new()
            .with("id", "x")
            .with("city", FieldValue::Null)]);
        let criteria = FilterCriteria {
            city: "a".to_string(),
            ..FilterCriteria::default()
        };
        let rows = repo.select(&SelectQuery::for_criteria(&criteria)).await.unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn like_handles_wrapped_and_bare_patterns() {
        assert!(like("Bandra West", "%dra%"));
        assert!(like("anything", "%%"));
        assert!(!like("Bandra", "%Juhu%"));
        assert!(like("exact", "exact"));
    }
}
