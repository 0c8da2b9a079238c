//! Serial Port (UART) interrupt Hardware Abstraction Layer.
//!
//! Byte transfer lives with the UART driver; the dispatch core only sees
//! the interrupt cause register and the matching enable register.

bitflags::bitflags! {
    /// UART interrupt causes. The same layout is used by the flag register
    /// and the enable register; bit `n` is reported to callbacks as index `n`.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct UartIntFlags: u32 {
        const RX_FRAME_ERROR = 1 << 0;
        const RX_PARITY_ERROR = 1 << 1;
        const CTS_CHANGE = 1 << 2;
        const RX_OVERRUN = 1 << 3;
        const RX_FIFO_THRESHOLD = 1 << 4;
        const TX_FIFO_ALMOST_EMPTY = 1 << 5;
        const TX_FIFO_THRESHOLD = 1 << 6;
        const BREAK = 1 << 7;
        const RX_TIMEOUT = 1 << 8;
        const LAST_BREAK = 1 << 9;
    }
}

/// Interrupt cause operations of one UART port.
pub trait UartIrq {
    /// Snapshot the interrupt flag register.
    fn read_int_flags(&self) -> u32;

    /// Clear the given flag bits.
    fn clear_int_flags(&self, mask: u32);

    /// Read the interrupt enable register.
    fn int_enabled(&self) -> u32;
}
