//! MAX32660 Platform
//!
//! Interrupt collaborators of the MAX32660 (Cortex-M4F): the NVIC, GPIO
//! port 0, the RTC and both UARTs. On ARM targets this module also owns the
//! process-wide [`InterruptManager`] and the vector entry points that feed
//! it.

mod gpio;
mod nvic;
mod rtc;
mod uart;

pub use gpio::{GPIO0_BASE, Gpio0};
pub use nvic::Nvic;
pub use rtc::{RTC_BASE, Rtc};
pub use uart::{UART0_BASE, UART1_BASE, Uart};

use crate::hal::board::IrqBoard;
use crate::hal::interrupt::IrqNumber;
use crate::irq::source::{N_PORTS, Port};
use crate::irq::vectors::Demux;

// External vector numbers
pub const RTC_IRQN: IrqNumber = 3;
pub const UART0_IRQN: IrqNumber = 14;
pub const UART1_IRQN: IrqNumber = 15;
pub const GPIO0_IRQN: IrqNumber = 24;

/// Number of external vectors.
pub const IRQ_COUNT: IrqNumber = 66;

/// Interrupt hardware of the MAX32660.
pub struct Max32660 {
    nvic: Nvic,
    gpio: Gpio0,
    rtc: Rtc,
    uarts: [Uart; N_PORTS],
}

impl Max32660 {
    /// # Safety
    ///
    /// Only one instance may exist; it takes over the interrupt registers
    /// of every peripheral listed above.
    pub const unsafe fn new() -> Self {
        unsafe {
            Self {
                nvic: Nvic::new(),
                gpio: Gpio0::new(GPIO0_BASE),
                rtc: Rtc::new(RTC_BASE),
                uarts: [Uart::new(UART0_BASE), Uart::new(UART1_BASE)],
            }
        }
    }
}

impl IrqBoard for Max32660 {
    type Nvic = Nvic;
    type Gpio = Gpio0;
    type Rtc = Rtc;
    type Uart = Uart;

    fn nvic(&self) -> &Nvic {
        &self.nvic
    }

    fn gpio(&self) -> &Gpio0 {
        &self.gpio
    }

    fn rtc(&self) -> &Rtc {
        &self.rtc
    }

    fn uart(&self, port: Port) -> &Uart {
        &self.uarts[port.index()]
    }

    fn vector(&self, demux: Demux) -> IrqNumber {
        match demux {
            Demux::Gpio => GPIO0_IRQN,
            Demux::Rtc => RTC_IRQN,
            Demux::Uart(port) if port.number() == 0 => UART0_IRQN,
            Demux::Uart(_) => UART1_IRQN,
        }
    }
}

#[cfg(target_arch = "arm")]
mod entry {
    use common::arch::arm::irq::CortexMIrq;
    use spin::Once;

    use super::{GPIO0_IRQN, Max32660, RTC_IRQN, UART0_IRQN, UART1_IRQN};
    use crate::irq::{InterruptManager, IrqError, IrqResult};

    pub type Manager = InterruptManager<Max32660, CortexMIrq>;

    static MANAGER: Once<Manager> = Once::new();

    /// Create the interrupt manager.
    ///
    /// # Errors
    ///
    /// [`IrqError::Busy`] if the manager already exists.
    pub fn init_interrupts() -> IrqResult<&'static Manager> {
        let mut fresh = false;
        let manager = MANAGER.call_once(|| {
            fresh = true;
            // SAFETY: `call_once` runs this at most once per process.
            InterruptManager::new(unsafe { Max32660::new() })
        });

        if fresh {
            Ok(manager)
        } else {
            log::warn!("irq: manager already initialized");
            Err(IrqError::Busy)
        }
    }

    /// The manager, once [`init_interrupts`] has run.
    pub fn irq_manager() -> Option<&'static Manager> {
        MANAGER.get()
    }

    fn service(irq: u32) {
        if let Some(manager) = MANAGER.get() {
            manager.handle_vector(irq);
        }
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn GPIO0_IRQHandler() {
        service(GPIO0_IRQN);
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn RTC_IRQHandler() {
        service(RTC_IRQN);
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn UART0_IRQHandler() {
        service(UART0_IRQN);
    }

    #[unsafe(no_mangle)]
    pub extern "C" fn UART1_IRQHandler() {
        service(UART1_IRQN);
    }
}

#[cfg(target_arch = "arm")]
pub use entry::{Manager, init_interrupts, irq_manager};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irq::vectors::VectorTable;

    #[test]
    fn vectors_route_to_their_demultiplexers() {
        // SAFETY: registers are never touched; only vector numbers are read.
        let board = unsafe { Max32660::new() };
        let table = VectorTable::new(&board);

        assert_eq!(table.lookup(GPIO0_IRQN), Some(Demux::Gpio));
        assert_eq!(table.lookup(RTC_IRQN), Some(Demux::Rtc));
        assert_eq!(table.lookup(UART0_IRQN), Port::new(0).map(Demux::Uart));
        assert_eq!(table.lookup(UART1_IRQN), Port::new(1).map(Demux::Uart));
        assert_eq!(table.lookup(0), None);
    }

    #[test]
    fn every_vector_is_external() {
        for demux in Demux::all() {
            // SAFETY: as above.
            let board = unsafe { Max32660::new() };
            assert!(board.vector(demux) < IRQ_COUNT);
        }
    }
}
