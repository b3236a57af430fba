//! StateGraph integration tests: compile validation, invoke, routing, limits, streaming.

#[path = "../init_logging.rs"]
mod init_logging;

mod common;
mod compile;
mod invoke;
mod stream;
