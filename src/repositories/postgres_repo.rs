use axum::async_trait;
use bb8_postgres::bb8::{Pool, PooledConnection};
use bb8_postgres::tokio_postgres::types::ToSql;
use bb8_postgres::tokio_postgres::{NoTls, Row};
use bb8_postgres::PostgresConnectionManager;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::SearchError;
use crate::models::row::{FieldValue, StorageRow};
use crate::repositories::query_builder::{SelectQuery, SqlValue, RESTAURANT_TABLE};
use crate::repositories::RestaurantStore;

pub type PostgresPool = Pool<PostgresConnectionManager<NoTls>>;

pub struct PostgresConnectionRepo {
    postgres_connection: PostgresPool,
}

impl PostgresConnectionRepo {
    pub fn new(postgres_connection: PostgresPool) -> Self {
        Self {
            postgres_connection,
        }
    }

    async fn get_postgres_connection(
        &self,
    ) -> Result<PooledConnection<'_, PostgresConnectionManager<NoTls>>, SearchError> {
        self.postgres_connection.get().await.map_err(|e| {
            warn!("Failed to retrieve postgres connection due to: {}", e);
            SearchError::from(e)
        })
    }
}

#[async_trait]
impl RestaurantStore for PostgresConnectionRepo {
    async fn select(&self, query: &SelectQuery) -> Result<Vec<StorageRow>, SearchError> {
        let conn = self.get_postgres_connection().await?;
        let stmt = jsonb_select(query);
        let values = query.predicate.bound_values();
        let params: Vec<&(dyn ToSql + Sync)> = values.iter().map(|value| as_sql(value)).collect();
        debug!("Running restaurant query: {} with {} bound values", stmt, params.len());

        let rows = conn.query(stmt.as_str(), &params).await.map_err(|e| {
            warn!("Ran into an error retrieving restaurants due to: {}", e);
            SearchError::from(e)
        })?;

        Ok(rows.iter().map(parse_row_into_storage_row).collect())
    }
}

/// Same rows as `SELECT *`, but each one arrives as a single jsonb object so
/// every column type (numeric, uuid, timestamps, ...) reaches the projection
/// with a usable value.
fn jsonb_select(query: &SelectQuery) -> String {
    format!(
        "SELECT to_jsonb({RESTAURANT_TABLE}) AS restaurant_row FROM {RESTAURANT_TABLE} WHERE {}",
        query.predicate.sql()
    )
}

fn as_sql(value: &SqlValue) -> &(dyn ToSql + Sync) {
    match value {
        SqlValue::Text(text) => text,
        SqlValue::Int(int) => int,
        SqlValue::Float(float) => float,
        SqlValue::Bool(flag) => flag,
    }
}

fn parse_row_into_storage_row(row: &Row) -> StorageRow {
    match row.try_get::<_, Value>("restaurant_row") {
        Ok(Value::Object(columns)) => {
            let mut storage_row = StorageRow::new();
            for (column, value) in columns {
                storage_row.insert(&column, json_to_field_value(value));
            }
            storage_row
        }
        Ok(other) => {
            warn!("Expected a jsonb object per restaurant row, got: {}", other);
            StorageRow::new()
        }
        Err(e) => {
            warn!("Could not read restaurant row due to: {}", e);
            StorageRow::new()
        }
    }
}

fn json_to_field_value(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(flag) => FieldValue::Bool(flag),
        Value::Number(number) => match number.as_i64() {
            Some(int) => FieldValue::Int(int),
            None => number.as_f64().map_or_else(
                || FieldValue::Text(number.to_string()),
                FieldValue::Float,
            ),
        },
        Value::String(text) => FieldValue::Text(text),
        nested @ (Value::Array(_) | Value::Object(_)) => FieldValue::Text(nested.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::filter::FilterCriteria;
    use crate::services::search_service::parse_row_into_restaurant;
    use serde_json::json;

    #[test]
    fn select_wraps_each_row_in_jsonb() {
        let criteria = FilterCriteria {
            city: "Pune".to_string(),
            vegetarian: Some(true),
            ..FilterCriteria::default()
        };
        assert_eq!(
            jsonb_select(&SelectQuery::for_criteria(&criteria)),
            "SELECT to_jsonb(restaurant) AS restaurant_row FROM restaurant WHERE true AND city LIKE $1 AND veg = $2"
        );
    }

    #[test]
    fn json_values_map_to_field_values() {
        assert_eq!(json_to_field_value(json!(null)), FieldValue::Null);
        assert_eq!(json_to_field_value(json!(true)), FieldValue::Bool(true));
        assert_eq!(json_to_field_value(json!(42)), FieldValue::Int(42));
        assert_eq!(json_to_field_value(json!(4.25)), FieldValue::Float(4.25));
        assert_eq!(json_to_field_value(json!("Pune")), FieldValue::from("Pune"));
        assert_eq!(
            json_to_field_value(json!(["a", 1])),
            FieldValue::from(r#"["a",1]"#)
        );
    }

    #[test]
    fn numeric_and_uuid_columns_survive_projection() {
        // jsonb renders NUMERIC as a number and UUID/INT ids as string/number.
        let object = json!({
            "id": 17,
            "restaurant_id": 9001,
            "name": "Vaishali",
            "city": "Pune",
            "rating": 4.30,
            "veg": true,
            "image": null
        });
        let Value::Object(columns) = object else {
            unreachable!()
        };
        let mut row = StorageRow::new();
        for (column, value) in columns {
            row.insert(&column, json_to_field_value(value));
        }

        let restaurant = parse_row_into_restaurant(&row).unwrap();
        assert_eq!(restaurant.id, "17");
        assert_eq!(restaurant.restaurant_id, 9001);
        assert_eq!(restaurant.rating, 4.3);
        assert!(restaurant.veg);
        assert_eq!(restaurant.image, "");

        let uuid = StorageRow::new()
            .with("id", json_to_field_value(json!("0b6f0b8e-1c1f-4a8e-9d55-2f1a8e0e7a10")))
            .with("rating", json_to_field_value(json!("NaN")));
        assert_eq!(uuid.text("id"), "0b6f0b8e-1c1f-4a8e-9d55-2f1a8e0e7a10");
        assert!(parse_row_into_restaurant(&uuid).is_err());
    }
}
