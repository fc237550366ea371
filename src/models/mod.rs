pub mod filter;
pub mod restaurant;
pub mod row;
