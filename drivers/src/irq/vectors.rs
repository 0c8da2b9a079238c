//! Hardware vector table.
//!
//! Built once from the board, it maps every vector number the board wires
//! to this core onto the demultiplexer that owns it. Interrupt entry points
//! only pass their vector number; tests drive the same path with synthetic
//! status registers.

use super::source::{N_PORTS, Port};
use crate::hal::board::IrqBoard;
use crate::hal::interrupt::IrqNumber;

/// Demultiplexer instances.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Demux {
    Gpio,
    Rtc,
    Uart(Port),
}

/// Number of demultiplexers, hence of table entries.
pub const N_VECTORS: usize = 2 + N_PORTS;

impl Demux {
    /// Every demultiplexer, in declaration order.
    pub fn all() -> impl Iterator<Item = Demux> {
        [Demux::Gpio, Demux::Rtc]
            .into_iter()
            .chain(Port::all().map(Demux::Uart))
    }
}

#[derive(Debug)]
pub struct VectorTable {
    /// Sorted by vector number.
    entries: [(IrqNumber, Demux); N_VECTORS],
}

impl VectorTable {
    pub fn new<B: IrqBoard>(board: &B) -> Self {
        let mut entries = [(0, Demux::Gpio); N_VECTORS];
        for (slot, demux) in entries.iter_mut().zip(Demux::all()) {
            *slot = (board.vector(demux), demux);
        }
        entries.sort_unstable_by_key(|&(irq, _)| irq);
        Self { entries }
    }

    /// Demultiplexer owning `irq`.
    pub fn lookup(&self, irq: IrqNumber) -> Option<Demux> {
        self.entries
            .binary_search_by_key(&irq, |&(irq, _)| irq)
            .ok()
            .map(|i| self.entries[i].1)
    }

    /// Vector number serviced by `demux`.
    pub fn vector(&self, demux: Demux) -> IrqNumber {
        self.entries
            .iter()
            .find(|&&(_, d)| d == demux)
            .map(|&(irq, _)| irq)
            .unwrap_or_default()
    }

    /// Entries in ascending vector order.
    pub fn iter(&self) -> impl Iterator<Item = (IrqNumber, Demux)> + '_ {
        self.entries.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{self, SimBoard};

    #[test]
    fn entries_ascend_by_vector_number() {
        let table = VectorTable::new(&SimBoard::new());
        let order: Vec<Demux> = table.iter().map(|(_, d)| d).collect();

        assert_eq!(
            order,
            [
                Demux::Rtc,
                Demux::Uart(Port::new(0).unwrap()),
                Demux::Uart(Port::new(1).unwrap()),
                Demux::Gpio,
            ]
        );
    }

    #[test]
    fn lookup_and_vector_agree() {
        let table = VectorTable::new(&SimBoard::new());

        assert_eq!(table.lookup(sim::GPIO_IRQN), Some(Demux::Gpio));
        assert_eq!(table.lookup(sim::RTC_IRQN), Some(Demux::Rtc));
        assert_eq!(table.lookup(0), None);
        for (irq, demux) in table.iter() {
            assert_eq!(table.vector(demux), irq);
        }
    }
}
