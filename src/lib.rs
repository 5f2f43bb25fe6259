//! Control-panel core for the tunnelmux agent: status polling, row
//! reconciliation, selection tracking and command dispatch, with rendering
//! kept behind the `DisplaySurface` trait.

pub mod agent;
pub mod app;
pub mod bridge;
pub mod dispatcher;
pub mod login;
pub mod mock;
pub mod reconciler;
pub mod rows;
pub mod selection;
pub mod settings;
pub mod status;
pub mod surface;
pub mod terminal;
