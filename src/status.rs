use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusData {
    #[serde(default)]
    pub contexts: Vec<ContextStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextStatus {
    pub name: String,
    #[serde(default)]
    pub services: Vec<ServiceStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    #[serde(default)]
    pub localaddr: String,
    #[serde(default)]
    pub localport: String,
    #[serde(default)]
    pub remoteaddr: String,
    #[serde(default)]
    pub remoteport: String,
    #[serde(default)]
    pub proto: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub nconns: u64,
    #[serde(default)]
    pub sent: u64,
    #[serde(default)]
    pub recv: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Stopped,
    Error,
    Unknown,
}

impl ServiceState {
    pub fn parse(status: &str) -> Self {
        if status.eq_ignore_ascii_case("running") || status.eq_ignore_ascii_case("started") {
            Self::Running
        } else if status.eq_ignore_ascii_case("stopped") || status.eq_ignore_ascii_case("disabled")
        {
            Self::Stopped
        } else if status.eq_ignore_ascii_case("error") || status.eq_ignore_ascii_case("failed") {
            Self::Error
        } else {
            Self::Unknown
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Running => "running",
            Self::Stopped => "stopped",
            Self::Error => "error",
            Self::Unknown => "unknown",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::Running => "●",
            Self::Stopped => "○",
            Self::Error => "✗",
            Self::Unknown => "?",
        }
    }

    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_maps_known_states() {
        assert_eq!(ServiceState::parse("running"), ServiceState::Running);
        assert_eq!(ServiceState::parse("Running"), ServiceState::Running);
        assert_eq!(ServiceState::parse("stopped"), ServiceState::Stopped);
        assert_eq!(ServiceState::parse("error"), ServiceState::Error);
        assert_eq!(ServiceState::parse(""), ServiceState::Unknown);
        assert_eq!(ServiceState::parse("weird"), ServiceState::Unknown);
    }

    #[test]
    fn snapshot_decodes_with_missing_fields() {
        let json = r#"{"contexts":[{"name":"db","services":[{"name":"pg","status":"running","sent":100,"recv":50}]}]}"#;
        let status: StatusData = serde_json::from_str(json).unwrap();
        assert_eq!(status.contexts.len(), 1);
        let service = &status.contexts[0].services[0];
        assert_eq!(service.name, "pg");
        assert_eq!(service.sent, 100);
        assert_eq!(service.recv, 50);
        assert!(service.localaddr.is_empty());
        assert_eq!(service.nconns, 0);
    }

    #[test]
    fn snapshot_decodes_without_services() {
        let json = r#"{"contexts":[{"name":"empty"}]}"#;
        let status: StatusData = serde_json::from_str(json).unwrap();
        assert!(status.contexts[0].services.is_empty());
    }
}
