use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{ProjectionError, SearchError};
use crate::models::filter::FilterCriteria;
use crate::models::restaurant::Restaurant;
use crate::models::row::StorageRow;
use crate::repositories::query_builder::SelectQuery;
use crate::repositories::RestaurantStore;

pub const DEFAULT_QUERY_TIMEOUT_MS: u64 = 5000;

#[derive(Clone, Debug)]
pub struct SearchSettings {
    pub query_timeout: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_millis(DEFAULT_QUERY_TIMEOUT_MS),
        }
    }
}

/// Projected rows plus how many rows were dropped because they could not be
/// projected.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchOutcome {
    pub restaurants: Vec<Restaurant>,
    pub dropped: usize,
}

pub struct SearchService {
    store: Arc<dyn RestaurantStore>,
    settings: SearchSettings,
}

impl SearchService {
    pub fn new(store: Arc<dyn RestaurantStore>, settings: SearchSettings) -> Self {
        Self { store, settings }
    }

    /// Runs one search. A failing or slow store fails the whole search, a
    /// malformed row only drops that row.
    pub async fn search(&self, criteria: &FilterCriteria) -> Result<SearchOutcome, SearchError> {
        let query = SelectQuery::for_criteria(criteria);
        debug!("Searching restaurants with: {}", query.sql());

        let rows = tokio::time::timeout(self.settings.query_timeout, self.store.select(&query))
            .await
            .map_err(|_| {
                warn!(
                    "Restaurant query timed out after {:?}",
                    self.settings.query_timeout
                );
                SearchError::Timeout(self.settings.query_timeout)
            })??;

        let total = rows.len();
        let restaurants: Vec<Restaurant> = rows
            .iter()
            .filter_map(|row| match parse_row_into_restaurant(row) {
                Ok(restaurant) => Some(restaurant),
                Err(e) => {
                    warn!("Dropping restaurant row {:?} due to: {}", row.text("id"), e);
                    None
                }
            })
            .collect();

        let dropped = total - restaurants.len();
        debug!("Search matched {} rows, dropped {}", total, dropped);
        Ok(SearchOutcome {
            restaurants,
            dropped,
        })
    }
}

/// Projects a storage row into a restaurant.
///
/// Only the rating is strict. A bad `restaurant_id` reads as `0`.
pub fn parse_row_into_restaurant(row: &StorageRow) -> Result<Restaurant, ProjectionError> {
    let rating = row.finite_float("rating")?;
    let restaurant_id = row
        .integer("restaurant_id")
        .ok()
        .and_then(|id| i32::try_from(id).ok())
        .unwrap_or_else(|| {
            warn!(
                "Restaurant {:?} has unusable restaurant_id {:?}, using 0",
                row.text("id"),
                row.text("restaurant_id")
            );
            0
        });

    Ok(Restaurant {
        id: row.text("id"),
        restaurant_id,
        name: row.text("name"),
        url: row.text("url"),
        cuisines: row.text("cuisines"),
        image: row.text("image"),
        address: row.text("address"),
        city: row.text("city"),
        rating,
        veg: row.truthy("veg"),
    })
}
