//! Shared plumbing for the product services: logging setup, environment
//! helpers and the small response types every service returns.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reply_serializes_flat() {
        let v = serde_json::to_value(types::StatusReply::updated()).unwrap();
        assert_eq!(v, serde_json::json!({"status": "updated"}));
    }

    #[test]
    fn service_kind_names_and_ports() {
        use types::ServiceKind;
        assert_eq!(ServiceKind::Create.port_var(), "CREATE_SERVICE_PORT");
        assert_eq!(ServiceKind::Read.default_port(), 8082);
        assert_eq!(ServiceKind::Delete.health_message(), "Delete service OK");
        assert_eq!(ServiceKind::Update.as_str(), "update");
    }
}
