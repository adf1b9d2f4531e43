use serde::{Deserialize, Serialize};

/// Body returned by the mutating endpoints, e.g. `{"status":"updated"}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusReply {
    pub status: String,
}

impl StatusReply {
    pub fn updated() -> Self { Self { status: "updated".into() } }
    pub fn deleted() -> Self { Self { status: "deleted".into() } }
}

/// Which of the four product services a process is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Create,
    Read,
    Update,
    Delete,
}

impl ServiceKind {
    pub const ALL: [ServiceKind; 4] = [Self::Create, Self::Read, Self::Update, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Read => "read",
            Self::Update => "update",
            Self::Delete => "delete",
        }
    }

    /// Environment variable holding this service's listen port.
    pub fn port_var(self) -> &'static str {
        match self {
            Self::Create => "CREATE_SERVICE_PORT",
            Self::Read => "READ_SERVICE_PORT",
            Self::Update => "UPDATE_SERVICE_PORT",
            Self::Delete => "DELETE_SERVICE_PORT",
        }
    }

    pub fn default_port(self) -> u16 {
        match self {
            Self::Create => 8081,
            Self::Read => 8082,
            Self::Update => 8083,
            Self::Delete => 8084,
        }
    }

    /// Plain-text body served on `/health`.
    pub fn health_message(self) -> &'static str {
        match self {
            Self::Create => "Create service OK",
            Self::Read => "Read service OK",
            Self::Update => "Update service OK",
            Self::Delete => "Delete service OK",
        }
    }
}

impl std::fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
