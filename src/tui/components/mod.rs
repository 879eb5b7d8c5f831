//! Reusable screen regions.

pub mod account_panel;
pub mod mode_toggle;
pub mod status_bar;
