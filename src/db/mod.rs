pub mod catalog;

pub use catalog::{CatalogError, CatalogSource, CatalogStore, JsonFileSource};
