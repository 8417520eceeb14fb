//! Daemon subsystem: sweep orchestration and email notifications.

pub mod loop_main;
pub mod notifications;
