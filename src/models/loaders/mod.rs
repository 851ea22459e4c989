pub mod catalog_loader;

pub use catalog_loader::{load_catalog, CATALOG_KEY};
