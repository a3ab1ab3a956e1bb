//! GRC Desk - modal orchestration for a governance, risk and compliance dashboard
//!
//! This library owns the one piece of shared UI state the dashboard needs: which
//! dialog is open, the record it was opened with, and whether a submission from
//! it is still running. Pages and panels call into a [`ModalController`].

#![allow(clippy::uninlined_format_args)] // Style preference
#![allow(clippy::return_self_not_must_use)] // Builder pattern is clear enough

pub mod cli;
pub mod config;
pub mod logger;
pub mod modals;
pub mod records;
pub mod replay;

pub use config::Config;
pub use modals::{ModalController, ModalError, ModalKind, ModalPayload, ModalView, SubmitError};
