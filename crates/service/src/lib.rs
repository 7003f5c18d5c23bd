//! Service layer for counts.
//! - `count::repository` is the data access seam (SeaORM behind a trait).
//! - `count::service` turns absence into `None` and storage failures into `ServiceError`.

pub mod errors;
pub mod count;
#[cfg(test)]
pub mod test_support;

pub use count::repository::{CountRepository, SeaOrmCountRepository};
pub use count::service::{CountService, SEED_VALUES};
