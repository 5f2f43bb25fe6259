// Test doubles for the bridge and the display surface. Kept as a regular
// module so integration tests can drive the app controller without a running
// agent.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::bridge::{Bridge, BridgeError};
use crate::login::LoginForm;
use crate::rows::Row;
use crate::status::StatusData;
use crate::surface::DisplaySurface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeCall {
    Status,
    StartContext(String),
    StopContext(String),
    StartService(String, String),
    StopService(String, String),
    Login(String, String, String),
    Logout(String),
    Restart,
}

// Records every call and replays configured results. Status responses can be
// scripted per-poll through `queue_status`; when the queue is empty the
// fallback response repeats.
pub struct MockBridge {
    calls: Mutex<Vec<BridgeCall>>,
    status_queue: Mutex<VecDeque<Result<StatusData, BridgeError>>>,
    status_fallback: Mutex<Result<StatusData, BridgeError>>,
    command_result: Mutex<Result<(), BridgeError>>,
    login_result: Mutex<Result<(), BridgeError>>,
}

impl Default for MockBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBridge {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            status_queue: Mutex::new(VecDeque::new()),
            status_fallback: Mutex::new(Ok(StatusData::default())),
            command_result: Mutex::new(Ok(())),
            login_result: Mutex::new(Ok(())),
        }
    }

    pub fn with_status(self, status: StatusData) -> Self {
        *self.status_fallback.lock().unwrap() = Ok(status);
        self
    }

    pub fn with_command_error(self, error: BridgeError) -> Self {
        *self.command_result.lock().unwrap() = Err(error);
        self
    }

    pub fn with_login_error(self, error: BridgeError) -> Self {
        *self.login_result.lock().unwrap() = Err(error);
        self
    }

    pub fn queue_status(&self, result: Result<StatusData, BridgeError>) {
        self.status_queue.lock().unwrap().push_back(result);
    }

    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn take_calls(&self) -> Vec<BridgeCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    fn record(&self, call: BridgeCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn command(&self, call: BridgeCall) -> Result<(), BridgeError> {
        self.record(call);
        self.command_result.lock().unwrap().clone()
    }
}

#[async_trait]
impl Bridge for MockBridge {
    async fn status(&self) -> Result<StatusData, BridgeError> {
        self.record(BridgeCall::Status);
        match self.status_queue.lock().unwrap().pop_front() {
            Some(result) => result,
            None => self.status_fallback.lock().unwrap().clone(),
        }
    }

    async fn start_context(&self, context: &str) -> Result<(), BridgeError> {
        self.command(BridgeCall::StartContext(context.to_string()))
    }

    async fn stop_context(&self, context: &str) -> Result<(), BridgeError> {
        self.command(BridgeCall::StopContext(context.to_string()))
    }

    async fn start_service(&self, context: &str, service: &str) -> Result<(), BridgeError> {
        self.command(BridgeCall::StartService(
            context.to_string(),
            service.to_string(),
        ))
    }

    async fn stop_service(&self, context: &str, service: &str) -> Result<(), BridgeError> {
        self.command(BridgeCall::StopService(
            context.to_string(),
            service.to_string(),
        ))
    }

    async fn login(
        &self,
        context: &str,
        username: &str,
        password: &str,
    ) -> Result<(), BridgeError> {
        self.record(BridgeCall::Login(
            context.to_string(),
            username.to_string(),
            password.to_string(),
        ));
        self.login_result.lock().unwrap().clone()
    }

    async fn logout(&self, context: &str) -> Result<(), BridgeError> {
        self.command(BridgeCall::Logout(context.to_string()))
    }

    async fn restart(&self) -> Result<(), BridgeError> {
        self.command(BridgeCall::Restart)
    }
}

#[derive(Debug, Default)]
pub struct SurfaceLog {
    pub rows: Vec<Row>,
    pub selected: String,
    pub alerts: Vec<String>,
    pub set_rows_calls: u32,
    pub login_opens: u32,
    pub login_open: bool,
    pub last_login_form: Option<LoginForm>,
}

// Surface that records what the core pushed at it; the shared log handle
// lets a test keep inspecting after the surface moves into the controller.
pub struct RecordingSurface {
    log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> (Self, Rc<RefCell<SurfaceLog>>) {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        (Self { log: Rc::clone(&log) }, log)
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_rows(&mut self, rows: Vec<Row>) {
        let mut log = self.log.borrow_mut();
        log.rows = rows;
        log.selected.clear();
        log.set_rows_calls += 1;
    }

    fn select_row(&mut self, record_id: &str) {
        let mut log = self.log.borrow_mut();
        if log.rows.iter().any(|row| row.record_id == record_id) {
            log.selected = record_id.to_string();
        }
    }

    fn alert(&mut self, message: &str) {
        self.log.borrow_mut().alerts.push(message.to_string());
    }

    fn open_login(&mut self, form: &LoginForm) {
        let mut log = self.log.borrow_mut();
        log.login_opens += 1;
        log.login_open = true;
        log.last_login_form = Some(form.clone());
    }

    fn close_login(&mut self) {
        self.log.borrow_mut().login_open = false;
    }
}
