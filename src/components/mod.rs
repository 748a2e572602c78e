//! Reusable view components shared by pages.

pub mod guarded;
pub mod nav_bar;
pub mod payload_view;
