//! Line protocol handling.
//!
//! This module implements the text protocol a presentation shell uses to
//! drive the engine: the command parser and the session that turns commands
//! into engine calls and reply lines.

pub mod parser;
pub mod session;

pub use parser::{parse_command, Command};
pub use session::{Flow, Session};
