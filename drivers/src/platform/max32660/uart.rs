//! MAX32660 UART Interrupt Driver

use core::ptr::{read_volatile, write_volatile};

use crate::hal::serial::UartIrq;

pub const UART0_BASE: usize = 0x4004_2000;
pub const UART1_BASE: usize = 0x4004_3000;

const INT_EN_OFFSET: usize = 0x0C;
const INT_FL_OFFSET: usize = 0x10;

/// Interrupt registers of one MAX32660 UART.
pub struct Uart {
    base: usize,
}

impl Uart {
    /// # Safety
    ///
    /// `base` must point to a UART register block and only one instance
    /// per block may exist.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }
}

impl UartIrq for Uart {
    fn read_int_flags(&self) -> u32 {
        self.read_reg(INT_FL_OFFSET)
    }

    fn clear_int_flags(&self, mask: u32) {
        // Flags are write-one-to-clear.
        unsafe { write_volatile((self.base + INT_FL_OFFSET) as *mut u32, mask) }
    }

    fn int_enabled(&self) -> u32 {
        self.read_reg(INT_EN_OFFSET)
    }
}
