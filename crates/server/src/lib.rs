pub mod routes;
pub mod startup;
pub mod errors;
pub mod envelope;

pub use startup::run;
