//! Device health: diagnostic tool invocation and output classification.

pub mod health;
pub mod probe;
