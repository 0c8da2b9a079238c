//! MAX32660 GPIO0 Interrupt Driver

use core::ptr::{read_volatile, write_volatile};

use crate::hal::gpio::{GpioIrqLines, TriggerBits};
use crate::hal::interrupt::TriggerMode;
use crate::irq::IrqResult;
use crate::irq::source::Line;

pub const GPIO0_BASE: usize = 0x4000_8000;

// Register offsets
const EN_SET_OFFSET: usize = 0x04;
const OUT_EN_CLR_OFFSET: usize = 0x14;
const INT_MOD_OFFSET: usize = 0x28;
const INT_POL_OFFSET: usize = 0x2C;
const INT_EN_OFFSET: usize = 0x34;
const INT_EN_SET_OFFSET: usize = 0x38;
const INT_EN_CLR_OFFSET: usize = 0x3C;
const INT_STAT_OFFSET: usize = 0x40;
const INT_CLR_OFFSET: usize = 0x48;
const INT_DUAL_EDGE_OFFSET: usize = 0x5C;

/// GPIO port 0 of the MAX32660.
///
/// Set/clear register pairs make single-line updates atomic with respect
/// to the other lines, except for the trigger registers, which are only
/// written under the manager's lock.
pub struct Gpio0 {
    base: usize,
}

impl Gpio0 {
    /// # Safety
    ///
    /// `base` must point to the GPIO0 register block and only one instance
    /// may exist.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    #[inline]
    fn read_reg(&self, offset: usize) -> u32 {
        unsafe { read_volatile((self.base + offset) as *const u32) }
    }

    #[inline]
    fn write_reg(&self, offset: usize, value: u32) {
        unsafe { write_volatile((self.base + offset) as *mut u32, value) }
    }

    fn modify_reg(&self, offset: usize, mask: u32, set: bool) {
        let value = self.read_reg(offset);
        let value = if set { value | mask } else { value & !mask };
        self.write_reg(offset, value);
    }
}

impl GpioIrqLines for Gpio0 {
    fn set_input(&self, line: Line) -> IrqResult<()> {
        self.write_reg(EN_SET_OFFSET, line.mask());
        self.write_reg(OUT_EN_CLR_OFFSET, line.mask());
        Ok(())
    }

    fn configure_trigger(&self, line: Line, mode: TriggerMode) -> IrqResult<()> {
        let bits = TriggerBits::from(mode);
        self.modify_reg(INT_MOD_OFFSET, line.mask(), bits.edge);
        self.modify_reg(INT_POL_OFFSET, line.mask(), bits.active_low);
        self.modify_reg(INT_DUAL_EDGE_OFFSET, line.mask(), bits.dual_edge);
        Ok(())
    }

    fn set_irq_enabled(&self, line: Line, enabled: bool) -> IrqResult<()> {
        let offset = if enabled {
            INT_EN_SET_OFFSET
        } else {
            INT_EN_CLR_OFFSET
        };
        self.write_reg(offset, line.mask());
        Ok(())
    }

    fn irq_enabled(&self, line: Line) -> bool {
        self.read_reg(INT_EN_OFFSET) & line.mask() != 0
    }

    fn read_status(&self) -> u32 {
        self.read_reg(INT_STAT_OFFSET)
    }

    fn clear_status(&self, mask: u32) {
        // Write-one-to-clear.
        self.write_reg(INT_CLR_OFFSET, mask);
    }
}
