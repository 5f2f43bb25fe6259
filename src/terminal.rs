use futures::channel::mpsc;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::app::UiEvent;
use crate::dispatcher::Action;
use crate::login::LoginForm;
use crate::rows::Row;
use crate::status::ServiceState;
use crate::surface::DisplaySurface;

// Plain stdout rendering of the panel: the table is reprinted whenever the
// row set or the selection marker changes, operator input arrives as command
// lines on stdin. This is the headless stand-in for a real widget surface.
pub struct TerminalSurface {
    rows: Vec<Row>,
    selected: String,
}

impl Default for TerminalSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            selected: String::new(),
        }
    }

    fn timestamp() -> String {
        chrono::Local::now().format("%H:%M:%S").to_string()
    }

    fn render(&self) {
        println!();
        println!("── tunnelmux @ {} ──", Self::timestamp());
        println!(
            "  {:<20} {:<16} {:<8} {:<26} {:<26} {:<5} {:>5} {:>10} {:>10}",
            "CONTEXT", "NAME", "STATUS", "LOCAL", "REMOTE", "PROTO", "CONNS", "SENT", "RECV"
        );
        for row in &self.rows {
            let marker = if row.record_id == self.selected { ">" } else { " " };
            if row.is_context() {
                println!("{marker} {}", row.ctx);
                continue;
            }

            let status = row.status.as_deref().unwrap_or("");
            let state = ServiceState::parse(status);
            let local = join_addr(row.localaddr.as_deref(), row.localport.as_deref());
            let remote = join_addr(row.remoteaddr.as_deref(), row.remoteport.as_deref());
            println!(
                "{marker} {:<20} {:<16} {} {:<6} {:<26} {:<26} {:<5} {:>5} {:>10} {:>10}",
                row.ctx,
                row.name,
                state.symbol(),
                status,
                local,
                remote,
                row.proto.as_deref().unwrap_or(""),
                row.nconns.unwrap_or(0),
                row.sent.unwrap_or(0),
                row.recv.unwrap_or(0),
            );
        }
        if self.rows.is_empty() {
            println!("  (no contexts reported)");
        }
    }
}

impl DisplaySurface for TerminalSurface {
    fn set_rows(&mut self, rows: Vec<Row>) {
        let changed = rows != self.rows;
        self.rows = rows;
        if !self.selected.is_empty()
            && !self.rows.iter().any(|row| row.record_id == self.selected)
        {
            self.selected.clear();
        }
        if changed {
            self.render();
        }
    }

    fn select_row(&mut self, record_id: &str) {
        if self.selected != record_id
            && self.rows.iter().any(|row| row.record_id == record_id)
        {
            self.selected = record_id.to_string();
            self.render();
        }
    }

    fn alert(&mut self, message: &str) {
        println!("[{}] ! {message}", Self::timestamp());
    }

    fn open_login(&mut self, form: &LoginForm) {
        println!("[{}] login: enter `auth <context> <username> <password>` or `cancel`", Self::timestamp());
        if !form.context.is_empty() {
            println!("         (selected context: {})", form.context);
        }
    }

    fn close_login(&mut self) {
        println!("[{}] login closed", Self::timestamp());
    }
}

pub fn print_help() {
    println!("commands:");
    println!("  select <context[.service]>   pick the row commands apply to");
    println!("  login | logout               authenticate the selected context");
    println!("  start | stop                 start/stop the selected context");
    println!("  start-svc | stop-svc         start/stop the selected service");
    println!("  refresh                      poll the agent now");
    println!("  restart                      restart the agent");
    println!("  auth <ctx> <user> <pass>     submit the open login form");
    println!("  cancel                       dismiss the open login form");
    println!("  help | quit");
}

pub fn parse_command(line: &str) -> Option<UiEvent> {
    let mut parts = line.split_whitespace();
    let event = match parts.next()? {
        "select" => UiEvent::RowSelected(parts.next().unwrap_or("").to_string()),
        "login" => UiEvent::Action(Action::Login),
        "logout" => UiEvent::Action(Action::Logout),
        "start" => UiEvent::Action(Action::StartContext),
        "stop" => UiEvent::Action(Action::StopContext),
        "start-svc" | "start_svc" => UiEvent::Action(Action::StartService),
        "stop-svc" | "stop_svc" => UiEvent::Action(Action::StopService),
        "refresh" => UiEvent::Action(Action::Refresh),
        "restart" => UiEvent::Action(Action::Restart),
        "auth" => UiEvent::LoginSubmitted(LoginForm {
            context: parts.next().unwrap_or("").to_string(),
            username: parts.next().unwrap_or("").to_string(),
            password: parts.next().unwrap_or("").to_string(),
        }),
        "cancel" => UiEvent::LoginCancelled,
        "quit" | "exit" => UiEvent::Quit,
        _ => return None,
    };
    Some(event)
}

pub async fn read_input(sender: mpsc::UnboundedSender<UiEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                if line == "help" {
                    print_help();
                    continue;
                }
                match parse_command(line) {
                    Some(event) => {
                        let quit = event == UiEvent::Quit;
                        if sender.unbounded_send(event).is_err() || quit {
                            break;
                        }
                    }
                    None => println!("unknown command: {line} (try `help`)"),
                }
            }
            Ok(None) => {
                let _ = sender.unbounded_send(UiEvent::Quit);
                break;
            }
            Err(error) => {
                log::warn!("[terminal] stdin read failed: {error}");
                break;
            }
        }
    }
}

fn join_addr(addr: Option<&str>, port: Option<&str>) -> String {
    match (addr.unwrap_or(""), port.unwrap_or("")) {
        ("", "") => String::new(),
        (addr, "") => addr.to_string(),
        (addr, port) => format!("{addr}:{port}"),
    }
}
