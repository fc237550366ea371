use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Restaurant {
    #[serde(rename = "_id")]
    pub id: String,
    pub restaurant_id: i32,
    pub name: String,
    pub url: String,
    pub cuisines: String,
    pub image: String,
    pub address: String,
    pub city: String,
    pub rating: f64,
    pub veg: bool,
}

/// Response body of `GET /search`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SearchResult {
    pub data: ResultData,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ResultData {
    pub count: usize,
    pub restaurants: Vec<Restaurant>,
}

impl From<Vec<Restaurant>> for SearchResult {
    fn from(restaurants: Vec<Restaurant>) -> Self {
        Self {
            data: ResultData {
                count: restaurants.len(),
                restaurants,
            },
        }
    }
}
