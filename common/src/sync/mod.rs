//! Locks for state shared with interrupt handlers.
//!
//! [`IrqSpinLock`] guards anything an interrupt handler also reads;
//! [`SpinLock`] is for data that stays in normal flow.

pub mod irq;
pub mod irq_spinlock;
pub mod spinlock;

pub use irq_spinlock::{IrqSpinLock, IrqSpinLockGuard};
pub use spinlock::{SpinLock, SpinLockGuard};
