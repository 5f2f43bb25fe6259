use crate::status::{ContextStatus, ServiceStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub record_id: String,
    pub ctx: String,
    pub name: String,
    pub status: Option<String>,
    pub localaddr: Option<String>,
    pub localport: Option<String>,
    pub remoteaddr: Option<String>,
    pub remoteport: Option<String>,
    pub proto: Option<String>,
    pub nconns: Option<u64>,
    pub sent: Option<u64>,
    pub recv: Option<u64>,
}

impl Row {
    pub fn context(name: &str) -> Self {
        Self {
            record_id: name.to_string(),
            ctx: name.to_string(),
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn service(context: &str, service: &ServiceStatus) -> Self {
        Self {
            record_id: format!("{context}.{}", service.name),
            ctx: context.to_string(),
            name: service.name.clone(),
            status: Some(service.status.clone()),
            localaddr: Some(service.localaddr.clone()),
            localport: Some(service.localport.clone()),
            remoteaddr: Some(service.remoteaddr.clone()),
            remoteport: Some(service.remoteport.clone()),
            proto: Some(service.proto.clone()),
            nconns: Some(service.nconns),
            sent: Some(service.sent),
            recv: Some(service.recv),
        }
    }

    pub fn is_context(&self) -> bool {
        self.record_id == self.ctx
    }
}

// One summary row per context followed by its service rows, in the order the
// backend reported them. The row set is rebuilt from scratch on every poll;
// duplicate names are passed through untouched.
pub fn flatten(contexts: &[ContextStatus]) -> Vec<Row> {
    let mut rows = Vec::new();
    for context in contexts {
        rows.push(Row::context(&context.name));
        for service in &context.services {
            rows.push(Row::service(&context.name, service));
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ServiceStatus;

    fn service(name: &str, status: &str, sent: u64, recv: u64) -> ServiceStatus {
        ServiceStatus {
            name: name.to_string(),
            status: status.to_string(),
            sent,
            recv,
            ..ServiceStatus::default()
        }
    }

    #[test]
    fn flattens_context_then_services() {
        let contexts = vec![ContextStatus {
            name: "db".to_string(),
            services: vec![service("pg", "running", 100, 50)],
        }];

        let rows = flatten(&contexts);
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].record_id, "db");
        assert_eq!(rows[0].ctx, "db");
        assert_eq!(rows[0].name, "db");
        assert!(rows[0].is_context());
        assert!(rows[0].status.is_none());

        assert_eq!(rows[1].record_id, "db.pg");
        assert_eq!(rows[1].ctx, "db");
        assert_eq!(rows[1].name, "pg");
        assert_eq!(rows[1].status.as_deref(), Some("running"));
        assert_eq!(rows[1].sent, Some(100));
        assert_eq!(rows[1].recv, Some(50));
        assert!(!rows[1].is_context());
    }

    #[test]
    fn preserves_backend_order() {
        let contexts = vec![
            ContextStatus {
                name: "zz".to_string(),
                services: vec![service("b", "running", 0, 0), service("a", "stopped", 0, 0)],
            },
            ContextStatus {
                name: "aa".to_string(),
                services: vec![],
            },
        ];

        let rows = flatten(&contexts);
        let ids: Vec<&str> = rows.iter().map(|row| row.record_id.as_str()).collect();
        assert_eq!(ids, ["zz", "zz.b", "zz.a", "aa"]);
    }

    #[test]
    fn does_not_deduplicate() {
        let contexts = vec![
            ContextStatus {
                name: "db".to_string(),
                services: vec![],
            },
            ContextStatus {
                name: "db".to_string(),
                services: vec![],
            },
        ];

        assert_eq!(flatten(&contexts).len(), 2);
    }

    #[test]
    fn empty_snapshot_flattens_to_no_rows() {
        assert!(flatten(&[]).is_empty());
    }
}
