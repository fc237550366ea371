/// Minimum-rating value meaning "no rating constraint".
pub const UNSET_RATING: f64 = -1.0;

/// Sparse set of search constraints for a single request.
///
/// Empty strings, a `restaurant_id` of `0`, a negative `min_rating` and a
/// `vegetarian` of `None` are all "unset" and contribute no clause.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterCriteria {
    pub id: String,
    pub name: String,
    pub url: String,
    pub address: String,
    pub city: String,
    pub restaurant_id: i32,
    pub min_rating: f64,
    pub vegetarian: Option<bool>,
    pub cuisines: String,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            url: String::new(),
            address: String::new(),
            city: String::new(),
            restaurant_id: 0,
            min_rating: UNSET_RATING,
            vegetarian: None,
            cuisines: String::new(),
        }
    }
}

impl FilterCriteria {
    /// `0.0` is a real threshold, only negatives (and NaN) are unset.
    pub fn has_min_rating(&self) -> bool {
        self.min_rating >= 0.0
    }
}

/// Lenient boolean parse of a query-string or column value.
///
/// Accepts the usual spellings of true (`1`, `t`, `T`, `TRUE`, `true`,
/// `True`); everything else, including malformed input, is false.
pub fn parse_truthy(raw: &str) -> bool {
    matches!(raw.trim(), "1" | "t" | "T" | "TRUE" | "true" | "True")
}
