pub mod errors;
pub mod db;
pub mod count;

pub use count::Model as Count;
