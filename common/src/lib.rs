//! Shared `no_std` building blocks for the peripheral layer.
//!
//! - [`sync`]: spinlocks and the interrupt-masking hook they rely on
//! - [`arch`]: architecture implementations of that hook

#![no_std]

pub mod arch;
pub mod sync;
