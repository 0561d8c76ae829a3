// Library root: client state, workflows, and the backend seam for the
// pollboard terminal client.

pub mod alert;
pub mod api;
pub mod app;
pub mod config;
pub mod credentials;
pub mod form;
pub mod model;
pub mod protocol;
pub mod router;
pub mod store;
pub mod workflow;
