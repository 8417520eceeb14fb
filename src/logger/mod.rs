//! Diagnostic logging: tagged stderr text or JSON lines.

pub mod jsonl;
