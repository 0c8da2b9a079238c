//! Peripheral Interrupt Dispatch
//!
//! Routes the hardware interrupts of a small microcontroller (GPIO lines,
//! the RTC and the UARTs) to callbacks registered at run time.
//!
//! # Module Organization
//!
//! - [`hal`]: Platform-independent collaborator traits
//! - [`irq`]: Callback registry, line configuration and demultiplexers
//! - [`platform`]: Platform-specific collaborators (SoC level)
//! - `sim`: Register-level simulation of a board, for tests
//!
//! # Design Principles
//!
//! 1. **Fixed storage**: Every table is sized at compile time; nothing allocates
//! 2. **Interrupt-safe mutation**: Normal-flow updates run with interrupts masked
//! 3. **Callbacks outside the lock**: A callback may re-enter the manager
//!
//! # Usage Example
//!
//! ```no_run
//! use common::sync::irq::IrqControl;
//! use pal_drivers::hal::interrupt::TriggerMode;
//! use pal_drivers::irq::{CallbackDesc, IrqResult, IrqSource, SourceConfig};
//! use pal_drivers::{InterruptManager, IrqBoard};
//!
//! fn on_button(_ctx: usize, line: u32, _config: &SourceConfig) {
//!     log::info!("line {line} fired");
//! }
//!
//! fn setup<B: IrqBoard, I: IrqControl>(manager: &InterruptManager<B, I>) -> IrqResult<()> {
//!     let config = SourceConfig::Gpio { trigger: TriggerMode::FallingEdge };
//!     manager.register_callback(IrqSource::Gpio(3), CallbackDesc::new(on_button, 0, config))?;
//!     manager.enable(IrqSource::Gpio(3))
//! }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod hal;
pub mod irq;
pub mod platform;

#[cfg(any(test, feature = "sim"))]
pub mod sim;

// Re-export commonly used types
pub use hal::board::IrqBoard;
pub use hal::interrupt::{InterruptController, TriggerMode};
pub use irq::{CallbackDesc, InterruptManager, IrqError, IrqResult, IrqSource, SourceConfig};
