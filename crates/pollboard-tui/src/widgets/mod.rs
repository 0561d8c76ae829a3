// TUI widget modules.

pub mod alert_dialog;
pub mod create_form;
pub mod poll_detail;
pub mod poll_list;
pub mod sign_in;
pub mod status_bar;
