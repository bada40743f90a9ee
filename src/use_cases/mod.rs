//! Use cases (orchestration)
//!
//! This module contains use cases that orchestrate operations across multiple ports.
//! Use cases coordinate the reader subsystem, the card session and the installer
//! to fulfill one command per run.

mod dispatch;
mod execute;
mod session;

pub use dispatch::{
    dispatch, ALREADY_INSTALLED_MESSAGE, DELETED_MESSAGE, INSTALLED_MESSAGE,
    NOT_INSTALLED_MESSAGE,
};
pub use execute::{execute_command, run_session};
pub use session::{CardSession, TeardownReport};
