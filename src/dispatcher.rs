use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Logout,
    StartContext,
    StopContext,
    StartService,
    StopService,
    Refresh,
    Restart,
}

impl Action {
    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::StartContext => "start context",
            Self::StopContext => "stop context",
            Self::StartService => "start service",
            Self::StopService => "stop service",
            Self::Refresh => "refresh",
            Self::Restart => "restart",
        }
    }
}

// One handler per toolbar action. Each reads the current selection, derives
// the target, issues the bridge call and surfaces an error envelope verbatim.
// Mutating commands never touch the local rows; the next reconciliation pass
// reflects whatever the backend decided.
pub async fn dispatch(action: Action, app: &mut App) {
    log::debug!(
        "[dispatcher] {} (selection: {:?})",
        action.label(),
        app.selection.current()
    );

    match action {
        Action::Login => {
            if let Some(form) = app.login.open(&app.selection) {
                app.surface.open_login(&form);
            }
        }
        Action::Logout => {
            let Some(target) = app.selection.target() else {
                app.surface.alert("select a context first");
                return;
            };
            if let Err(error) = app.bridge.logout(&target.context).await {
                app.surface.alert(&error.to_string());
            }
        }
        Action::StartContext => {
            let Some(target) = app.selection.target() else {
                app.surface.alert("select a context first");
                return;
            };
            if let Err(error) = app.bridge.start_context(&target.context).await {
                app.surface.alert(&error.to_string());
            }
        }
        Action::StopContext => {
            let Some(target) = app.selection.target() else {
                app.surface.alert("select a context first");
                return;
            };
            if let Err(error) = app.bridge.stop_context(&target.context).await {
                app.surface.alert(&error.to_string());
            }
        }
        Action::StartService => {
            let Some((context, service)) = service_target(app) else {
                return;
            };
            if let Err(error) = app.bridge.start_service(&context, &service).await {
                app.surface.alert(&error.to_string());
            }
        }
        Action::StopService => {
            let Some((context, service)) = service_target(app) else {
                return;
            };
            if let Err(error) = app.bridge.stop_service(&context, &service).await {
                app.surface.alert(&error.to_string());
            }
        }
        Action::Refresh => {
            // Out-of-band reconciliation pass, bypassing the timer.
            app.reconcile().await;
        }
        Action::Restart => match app.bridge.restart().await {
            Ok(()) => app.surface.alert("agent restart requested"),
            Err(error) => app.surface.alert(&error.to_string()),
        },
    }
}

// Precondition check for service-scoped commands: a summary-row selection has
// no service component and must not reach the bridge.
fn service_target(app: &mut App) -> Option<(String, String)> {
    let Some(target) = app.selection.target() else {
        app.surface.alert("select a service first");
        return None;
    };
    let Some(service) = target.service else {
        app.surface.alert("select a service row, not a context");
        return None;
    };
    Some((target.context, service))
}
