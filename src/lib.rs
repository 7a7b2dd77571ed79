//! CEE advisor - regulatory Q&A over the documents in force at a date.

pub mod advisor;
pub mod ai;
pub mod chat;
pub mod config;
pub mod display;
pub mod knowledge;
pub mod server;
