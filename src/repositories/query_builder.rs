use crate::models::filter::FilterCriteria;

pub const RESTAURANT_TABLE: &str = "restaurant";

/// Columns a search may constrain. Only these names ever reach the SQL text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Id,
    Name,
    Url,
    Address,
    City,
    RestaurantId,
    Rating,
    Veg,
    Cuisines,
}

impl Column {
    pub const fn as_str(self) -> &'static str {
        match self {
            Column::Id => "id",
            Column::Name => "name",
            Column::Url => "url",
            Column::Address => "address",
            Column::City => "city",
            Column::RestaurantId => "restaurant_id",
            Column::Rating => "rating",
            Column::Veg => "veg",
            Column::Cuisines => "cuisines",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operator {
    Eq,
    Like,
    AtLeast,
}

impl Operator {
    const fn as_sql(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Like => "LIKE",
            Operator::AtLeast => ">=",
        }
    }
}

/// A bound query parameter.
#[derive(Clone, Debug, PartialEq)]
pub enum SqlValue {
    Text(String),
    Int(i32),
    Float(f64),
    Bool(bool),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Clause {
    pub column: Column,
    pub operator: Operator,
    pub value: SqlValue,
}

/// WHERE-clause fragment with its positionally bound values.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<Clause>,
}

impl Predicate {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Predicate text with `$n` placeholders, starting from `true`.
    pub fn sql(&self) -> String {
        let conditions: String = self
            .clauses
            .iter()
            .enumerate()
            .map(|(index, clause)| {
                format!(
                    " AND {} {} ${}",
                    clause.column.as_str(),
                    clause.operator.as_sql(),
                    index + 1
                )
            })
            .collect();
        format!("true{conditions}")
    }

    /// Values in placeholder order.
    pub fn bound_values(&self) -> Vec<&SqlValue> {
        self.clauses.iter().map(|clause| &clause.value).collect()
    }

    fn push(&mut self, column: Column, operator: Operator, value: SqlValue) {
        self.clauses.push(Clause {
            column,
            operator,
            value,
        });
    }

    fn push_exact(&mut self, column: Column, value: &str) {
        if !value.is_empty() {
            self.push(column, Operator::Eq, SqlValue::Text(value.to_string()));
        }
    }

    fn push_substring(&mut self, column: Column, value: &str) {
        if !value.is_empty() {
            self.push(column, Operator::Like, SqlValue::Text(format!("%{value}%")));
        }
    }
}

/// Builds the predicate for a search.
///
/// Fields are visited in a fixed order (id, name, url, address, city,
/// restaurant id, rating, veg, cuisines) so clause positions and bound values
/// stay correlated. Unset fields add nothing.
pub fn build_predicate(criteria: &FilterCriteria) -> Predicate {
    let mut predicate = Predicate::default();

    predicate.push_exact(Column::Id, &criteria.id);
    predicate.push_exact(Column::Name, &criteria.name);
    predicate.push_substring(Column::Url, &criteria.url);
    predicate.push_substring(Column::Address, &criteria.address);
    predicate.push_substring(Column::City, &criteria.city);
    if criteria.restaurant_id != 0 {
        predicate.push(
            Column::RestaurantId,
            Operator::Eq,
            SqlValue::Int(criteria.restaurant_id),
        );
    }
    if criteria.has_min_rating() {
        predicate.push(
            Column::Rating,
            Operator::AtLeast,
            SqlValue::Float(criteria.min_rating),
        );
    }
    if let Some(veg) = criteria.vegetarian {
        predicate.push(Column::Veg, Operator::Eq, SqlValue::Bool(veg));
    }
    predicate.push_substring(Column::Cuisines, &criteria.cuisines);

    predicate
}

/// Full `SELECT` against the restaurant table.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectQuery {
    pub predicate: Predicate,
}

impl SelectQuery {
    pub fn for_criteria(criteria: &FilterCriteria) -> Self {
        Self {
            predicate: build_predicate(criteria),
        }
    }

    pub fn sql(&self) -> String {
        format!(
            "SELECT * FROM {RESTAURANT_TABLE} WHERE {}",
            self.predicate.sql()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(value: &str) -> SqlValue {
        SqlValue::Text(value.to_string())
    }

    #[test]
    fn unset_criteria_builds_base_predicate_only() {
        let predicate = build_predicate(&FilterCriteria::default());
        assert_eq!(predicate.sql(), "true");
        assert!(predicate.bound_values().is_empty());
    }

    #[test]
    fn each_substring_field_wraps_value_in_wildcards() {
        let cases: [(fn(&mut FilterCriteria), &str); 4] = [
            (|c| c.url = "zomato".to_string(), "url"),
            (|c| c.address = "zomato".to_string(), "address"),
            (|c| c.city = "zomato".to_string(), "city"),
            (|c| c.cuisines = "zomato".to_string(), "cuisines"),
        ];

        for (set, column) in cases {
            let mut criteria = FilterCriteria::default();
            set(&mut criteria);
            let predicate = build_predicate(&criteria);

            assert_eq!(predicate.sql(), format!("true AND {column} LIKE $1"));
            assert_eq!(predicate.bound_values(), vec![&text("%zomato%")]);
        }
    }

    #[test]
    fn exact_fields_bind_literals() {
        let criteria = FilterCriteria {
            id: "abc".to_string(),
            name: "Leopold Cafe".to_string(),
            restaurant_id: 9,
            ..FilterCriteria::default()
        };
        let predicate = build_predicate(&criteria);

        assert_eq!(
            predicate.sql(),
            "true AND id = $1 AND name = $2 AND restaurant_id = $3"
        );
        assert_eq!(
            predicate.bound_values(),
            vec![&text("abc"), &text("Leopold Cafe"), &SqlValue::Int(9)]
        );
    }

    #[test]
    fn rating_sentinel_and_zero_boundary() {
        let unset = FilterCriteria {
            min_rating: -1.0,
            ..FilterCriteria::default()
        };
        assert_eq!(build_predicate(&unset).sql(), "true");

        let zero = FilterCriteria {
            min_rating: 0.0,
            ..FilterCriteria::default()
        };
        let predicate = build_predicate(&zero);
        assert_eq!(predicate.sql(), "true AND rating >= $1");
        assert_eq!(predicate.bound_values(), vec![&SqlValue::Float(0.0)]);
    }

    #[test]
    fn vegetarian_is_tri_state() {
        let unset = build_predicate(&FilterCriteria::default());
        assert!(unset.clauses().is_empty());

        for veg in [true, false] {
            let criteria = FilterCriteria {
                vegetarian: Some(veg),
                ..FilterCriteria::default()
            };
            let predicate = build_predicate(&criteria);
            assert_eq!(predicate.sql(), "true AND veg = $1");
            assert_eq!(predicate.bound_values(), vec![&SqlValue::Bool(veg)]);
        }
    }

    #[test]
    fn all_fields_follow_fixed_order() {
        let criteria = FilterCriteria {
            id: "1".to_string(),
            name: "n".to_string(),
            url: "u".to_string(),
            address: "a".to_string(),
            city: "c".to_string(),
            restaurant_id: 5,
            min_rating: 3.5,
            vegetarian: Some(true),
            cuisines: "k".to_string(),
        };
        let predicate = build_predicate(&criteria);

        assert_eq!(
            predicate.sql(),
            "true AND id = $1 AND name = $2 AND url LIKE $3 AND address LIKE $4 \
             AND city LIKE $5 AND restaurant_id = $6 AND rating >= $7 AND veg = $8 \
             AND cuisines LIKE $9"
        );
        assert_eq!(predicate.bound_values().len(), predicate.clauses().len());
        assert_eq!(predicate.bound_values()[6], &SqlValue::Float(3.5));
        assert_eq!(predicate.bound_values()[8], &text("%k%"));
    }

    #[test]
    fn user_input_never_reaches_sql_text() {
        let criteria = FilterCriteria {
            city: "'; DROP TABLE restaurant; --".to_string(),
            name: "x' OR '1'='1".to_string(),
            ..FilterCriteria::default()
        };
        let query = SelectQuery::for_criteria(&criteria);

        assert_eq!(
            query.sql(),
            "SELECT * FROM restaurant WHERE true AND name = $1 AND city LIKE $2"
        );
        assert_eq!(
            query.predicate.bound_values()[1],
            &text("%'; DROP TABLE restaurant; --%")
        );
    }
}
