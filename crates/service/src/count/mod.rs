pub mod repository;
pub mod service;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
