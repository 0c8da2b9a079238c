//! GPIO (General Purpose Input/Output) interrupt Hardware Abstraction Layer.
//!
//! Lines are identified by their validated [`Line`] index; every status
//! bitmask uses bit `n` for line `n`.

use super::interrupt::TriggerMode;
use crate::irq::IrqResult;
use crate::irq::source::Line;

/// Register encoding of a trigger mode.
///
/// Most GPIO blocks split the trigger into an edge/level select, a polarity
/// select and a dual-edge override. Drivers program these three bits for a
/// line; [`TriggerBits::mode`] decodes them back.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TriggerBits {
    /// Edge-triggered (`true`) or level-triggered (`false`).
    pub edge: bool,
    /// Falling edge / low level when set.
    pub active_low: bool,
    /// Both edges, overriding `active_low`.
    pub dual_edge: bool,
}

impl From<TriggerMode> for TriggerBits {
    fn from(mode: TriggerMode) -> Self {
        let (edge, active_low, dual_edge) = match mode {
            TriggerMode::RisingEdge => (true, false, false),
            TriggerMode::FallingEdge => (true, true, false),
            TriggerMode::BothEdges => (true, false, true),
            TriggerMode::LevelHigh => (false, false, false),
            TriggerMode::LevelLow => (false, true, false),
        };
        Self {
            edge,
            active_low,
            dual_edge,
        }
    }
}

impl TriggerBits {
    /// Decode the trigger mode these bits select.
    pub const fn mode(self) -> TriggerMode {
        match (self.edge, self.active_low, self.dual_edge) {
            (_, _, true) => TriggerMode::BothEdges,
            (true, false, false) => TriggerMode::RisingEdge,
            (true, true, false) => TriggerMode::FallingEdge,
            (false, false, false) => TriggerMode::LevelHigh,
            (false, true, false) => TriggerMode::LevelLow,
        }
    }
}

/// Digital-line interrupt operations of a GPIO port.
pub trait GpioIrqLines {
    /// Switch a line to GPIO input.
    fn set_input(&self, line: Line) -> IrqResult<()>;

    /// Program the trigger condition of a line.
    ///
    /// Does not touch the line's interrupt-enable bit.
    fn configure_trigger(&self, line: Line, mode: TriggerMode) -> IrqResult<()>;

    /// Set or clear the interrupt-enable bit of a line.
    fn set_irq_enabled(&self, line: Line, enabled: bool) -> IrqResult<()>;

    /// Read back the interrupt-enable bit of a line.
    fn irq_enabled(&self, line: Line) -> bool;

    /// Snapshot the interrupt status register.
    fn read_status(&self) -> u32;

    /// Clear the given status bits. Bits not in `mask` are preserved.
    fn clear_status(&self, mask: u32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_encoding_matches_the_port_layout() {
        let bits = |mode| {
            let b = TriggerBits::from(mode);
            (b.edge, b.active_low, b.dual_edge)
        };

        assert_eq!(bits(TriggerMode::RisingEdge), (true, false, false));
        assert_eq!(bits(TriggerMode::FallingEdge), (true, true, false));
        assert_eq!(bits(TriggerMode::LevelHigh), (false, false, false));
        assert_eq!(bits(TriggerMode::LevelLow), (false, true, false));
        assert_eq!(bits(TriggerMode::BothEdges), (true, false, true));
    }

    #[test]
    fn every_mode_decodes_back_and_edge_modes_set_the_edge_bit() {
        for mode in TriggerMode::ALL {
            let bits = TriggerBits::from(mode);
            assert_eq!(bits.mode(), mode);
            assert_eq!(bits.edge, mode.is_edge());
        }
    }

    #[test]
    fn dual_edge_overrides_polarity() {
        let bits = TriggerBits {
            edge: false,
            active_low: true,
            dual_edge: true,
        };
        assert_eq!(bits.mode(), TriggerMode::BothEdges);
    }
}
