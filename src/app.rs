use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::channel::mpsc;
use tokio::time::{self, MissedTickBehavior};

use crate::bridge::Bridge;
use crate::dispatcher::{self, Action};
use crate::login::{self, LoginFlow, LoginForm};
use crate::reconciler::Reconciler;
use crate::selection::Selection;
use crate::surface::DisplaySurface;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    RowSelected(String),
    Action(Action),
    LoginSubmitted(LoginForm),
    LoginCancelled,
    Quit,
}

// Top-level controller owning every piece of mutable state: the selection
// slot, the login singleton and the reconciler flag all live here and are
// passed down by reference. Everything runs on one logical thread; the only
// suspension points are bridge calls and the poll timer, so reconciliation
// passes and command dispatch serialize instead of overlapping.
pub struct App {
    pub bridge: Arc<dyn Bridge>,
    pub surface: Box<dyn DisplaySurface>,
    pub selection: Selection,
    pub login: LoginFlow,
    pub reconciler: Reconciler,
    poll_interval: Duration,
}

impl App {
    pub fn new(
        bridge: Arc<dyn Bridge>,
        surface: Box<dyn DisplaySurface>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            bridge,
            surface,
            selection: Selection::new(),
            login: LoginFlow::new(),
            reconciler: Reconciler::new(),
            poll_interval,
        }
    }

    pub async fn run(&mut self, mut events: mpsc::UnboundedReceiver<UiEvent>) {
        let mut ticker = time::interval(self.poll_interval);
        // A tick that fires while a pass is still awaiting the bridge is
        // delayed, not stacked; the timer keeps running regardless of the
        // previous tick's outcome.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.reconcile().await,
                event = events.next() => match event {
                    None | Some(UiEvent::Quit) => break,
                    Some(event) => self.handle_event(event).await,
                },
            }
        }

        log::info!("[app] event loop finished");
    }

    pub async fn reconcile(&mut self) {
        self.reconciler
            .pass(self.bridge.as_ref(), self.surface.as_mut(), &self.selection)
            .await;
    }

    pub async fn handle_event(&mut self, event: UiEvent) {
        match event {
            UiEvent::RowSelected(record_id) => {
                log::debug!("[app] row selected: {record_id:?}");
                self.selection.set(record_id);
            }
            UiEvent::Action(action) => dispatcher::dispatch(action, self).await,
            UiEvent::LoginSubmitted(form) => self.submit_login(form).await,
            UiEvent::LoginCancelled => self.cancel_login(),
            UiEvent::Quit => {}
        }
    }

    async fn submit_login(&mut self, form: LoginForm) {
        if let Err(message) = self.login.begin_submit(&form) {
            self.surface.alert(&message);
            return;
        }

        let result = self
            .bridge
            .login(&form.context, &form.username, &form.password)
            .await;

        // The modal closes on a short fixed delay after the call settles,
        // then the outcome is reported.
        time::sleep(login::CLOSE_DELAY).await;
        self.login.close();
        self.surface.close_login();

        match result {
            Ok(()) => {
                log::info!("[app] logged in to context {:?}", form.context);
                self.surface.alert("logged in successfully");
            }
            Err(error) => {
                log::warn!("[app] login to {:?} failed: {error}", form.context);
                self.surface.alert(&error.to_string());
            }
        }
    }

    fn cancel_login(&mut self) {
        if !self.login.is_open() {
            return;
        }
        self.login.close();
        self.surface.close_login();
    }
}
