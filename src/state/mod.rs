mod persistence;

pub use persistence::{load_catalog, ReportStore};
