//! Interrupt Dispatch Core
//!
//! Registers one callback per interrupt source, keeps the trigger
//! configuration of every GPIO line, and demultiplexes each hardware
//! interrupt into callback invocations.
//!
//! # Module Organization
//!
//! - [`source`]: interrupt source identifiers and their validation
//! - [`callback`]: callback entries and per-source configuration
//! - [`registry`]: fixed-capacity callback table
//! - [`lines`]: per-line trigger state machine
//! - [`demux`]: status-register demultiplexers
//! - [`vectors`]: hardware vector to demultiplexer wiring
//! - [`controller`]: [`InterruptManager`], the entry point for callers

use core::fmt;

pub mod callback;
pub mod controller;
pub mod demux;
pub mod lines;
pub mod registry;
pub mod source;
pub mod vectors;

pub use callback::{CallbackDesc, IrqHandler, RtcAlarmConfig, SourceConfig};
pub use controller::InterruptManager;
pub use source::{IrqSource, Line, Port, SourceId};

/// Interrupt dispatch errors.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IrqError {
    /// Out-of-range identifier, missing registration, or a configuration
    /// that does not fit the source.
    InvalidArgument,
    /// No storage left for the request.
    ResourceExhausted,
    /// The peripheral is not ready for the request yet.
    Busy,
}

impl fmt::Display for IrqError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::ResourceExhausted => write!(f, "resource exhausted"),
            Self::Busy => write!(f, "peripheral busy"),
        }
    }
}

impl core::error::Error for IrqError {}

/// Result type for interrupt dispatch operations.
pub type IrqResult<T> = Result<T, IrqError>;
