//! Hardware Abstraction Layer (HAL) - Interrupt Collaborators
//!
//! These traits are the narrow register-level operations the dispatch core
//! consumes from each peripheral. Platform drivers implement them over
//! memory-mapped registers; host tests implement them over plain atomics.
//!
//! All methods take `&self`: the same collaborator is reached from normal
//! flow (configuration) and from interrupt context (status read/clear), and
//! the registers behind it are interior-mutable by nature.
//!
//! # Available Interfaces
//!
//! - [`interrupt`]: vector-level interrupt controller (NVIC)
//! - [`gpio`]: digital-line interrupt configuration and status
//! - [`rtc`]: real-time-clock alarms and control flags
//! - [`serial`]: serial-port interrupt causes
//! - [`board`]: the bundle of collaborators a board provides

pub mod board;
pub mod gpio;
pub mod interrupt;
pub mod rtc;
pub mod serial;
