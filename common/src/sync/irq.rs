use core::fmt::Debug;

/// Architecture-specific interrupt masking interface.
///
/// Implemented once per target (see [`crate::arch`]) and by host
/// simulations, where masking has nothing to act on.
pub trait IrqControl {
    /// Saved interrupt state
    type State: Copy + Debug;

    /// Mask interrupts and return the previous state.
    fn disable() -> Self::State;

    /// Restore interrupts to a previous state.
    fn restore(state: Self::State);
}

