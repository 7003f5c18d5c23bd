use serde::{Deserialize, Serialize};

/// Body of the root health probe.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Health {
    pub message: String,
}

impl Health {
    pub fn running() -> Self {
        Self { message: "Server is running".to_string() }
    }
}
