pub mod builtin;
pub mod catalog;
pub mod geometry;

pub use builtin::builtin_catalog;
pub use catalog::{
    Catalog, CatalogError, Connection, GroupSpec, GroupStyle, ShimmerStyle, StarSpec,
};
pub use geometry::CatalogPos;
