pub mod product;
pub mod search;
