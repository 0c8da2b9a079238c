//! Interrupt Controller Hardware Abstraction Layer.
//!
//! Vector-level masking and priorities, plus the trigger modes shared by
//! edge/level-sensitive sources.

use crate::irq::IrqResult;

/// Interrupt number type.
pub type IrqNumber = u32;

/// Interrupt priority level.
///
/// Lower values indicate higher priority, as on the NVIC.
pub type Priority = u8;

/// Interrupt controller trait.
///
/// This trait represents the system's vector-level interrupt controller.
pub trait InterruptController {
    /// Enable (unmask) an interrupt vector.
    fn enable(&self, irq: IrqNumber) -> IrqResult<()>;

    /// Disable (mask) an interrupt vector.
    fn disable(&self, irq: IrqNumber) -> IrqResult<()>;

    /// Check if an interrupt vector is currently pending.
    fn is_pending(&self, irq: IrqNumber) -> bool;

    /// Clear the pending state of an interrupt vector.
    fn clear_pending(&self, irq: IrqNumber) -> IrqResult<()>;
}

/// Extension trait for interrupt controllers with priority support.
pub trait PriorityInterruptController: InterruptController {
    /// Set the priority of an interrupt vector.
    fn set_priority(&self, irq: IrqNumber, priority: Priority) -> IrqResult<()>;

    /// Get the priority of an interrupt vector.
    fn priority(&self, irq: IrqNumber) -> Priority;
}

/// Interrupt trigger mode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TriggerMode {
    /// Interrupt triggers on a rising edge.
    RisingEdge,
    /// Interrupt triggers on a falling edge.
    FallingEdge,
    /// Interrupt triggers on both edges.
    BothEdges,
    /// Interrupt is active when the signal is high.
    LevelHigh,
    /// Interrupt is active when the signal is low.
    LevelLow,
}

impl TriggerMode {
    /// Every trigger mode, in declaration order.
    pub const ALL: [TriggerMode; 5] = [
        TriggerMode::RisingEdge,
        TriggerMode::FallingEdge,
        TriggerMode::BothEdges,
        TriggerMode::LevelHigh,
        TriggerMode::LevelLow,
    ];

    /// Whether the mode latches on a transition rather than a level.
    pub const fn is_edge(self) -> bool {
        matches!(
            self,
            TriggerMode::RisingEdge | TriggerMode::FallingEdge | TriggerMode::BothEdges
        )
    }
}
