// The single selected record id, owned by the app controller. The selection
// is never validated against the current row set; a stale id simply produces
// a dispatch the backend rejects.
#[derive(Debug, Default)]
pub struct Selection {
    current: String,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, record_id: String) {
        self.current = record_id;
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_empty()
    }

    pub fn target(&self) -> Option<CommandTarget> {
        CommandTarget::parse(&self.current)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTarget {
    pub context: String,
    pub service: Option<String>,
}

impl CommandTarget {
    // record_id is either `context` or `context.service`; the service part
    // may itself contain dots, the context may not.
    pub fn parse(record_id: &str) -> Option<Self> {
        if record_id.is_empty() {
            return None;
        }
        let mut parts = record_id.splitn(2, '.');
        let context = parts.next()?.to_string();
        if context.is_empty() {
            return None;
        }
        Some(Self {
            context,
            service: parts.next().map(str::to_string),
        })
    }
}
