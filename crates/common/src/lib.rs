//! Pieces shared by every binary and crate in the workspace: logging setup
//! and small response types that do not belong to a single layer.

pub mod types;
pub mod utils;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_serializes_message() {
        let h = types::Health::running();
        let json = serde_json::to_value(&h).unwrap();
        assert_eq!(json, serde_json::json!({"message": "Server is running"}));
    }
}
