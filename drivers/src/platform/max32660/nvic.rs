//! Cortex-M4 NVIC Driver

use core::ptr::{read_volatile, write_volatile};

use super::IRQ_COUNT;
use crate::hal::interrupt::{
    InterruptController, IrqNumber, Priority, PriorityInterruptController,
};
use crate::irq::{IrqError, IrqResult};

const ISER_BASE: usize = 0xE000_E100;
const ICER_BASE: usize = 0xE000_E180;
const ISPR_BASE: usize = 0xE000_E200;
const ICPR_BASE: usize = 0xE000_E280;
const IPR_BASE: usize = 0xE000_E400;

/// Implemented priority bits, held in the top of each priority byte.
const PRIO_BITS: u32 = 3;

#[inline(always)]
fn bank(base: usize, irq: IrqNumber) -> *mut u32 {
    (base + (irq as usize / 32) * 4) as *mut u32
}

#[inline(always)]
fn bit(irq: IrqNumber) -> u32 {
    1 << (irq % 32)
}

fn check(irq: IrqNumber) -> IrqResult<()> {
    if irq < IRQ_COUNT {
        Ok(())
    } else {
        Err(IrqError::InvalidArgument)
    }
}

// ============================================================================
// HAL Implementation
// ============================================================================

/// Nested vectored interrupt controller of the Cortex-M4 core.
#[derive(Debug)]
pub struct Nvic;

impl Nvic {
    /// # Safety
    ///
    /// Only one instance may exist; it owns the NVIC enable, pending and
    /// priority registers of every external vector.
    pub const unsafe fn new() -> Self {
        Self
    }
}

impl InterruptController for Nvic {
    fn enable(&self, irq: IrqNumber) -> IrqResult<()> {
        check(irq)?;
        // Set-enable registers ignore zero bits.
        unsafe { write_volatile(bank(ISER_BASE, irq), bit(irq)) };
        Ok(())
    }

    fn disable(&self, irq: IrqNumber) -> IrqResult<()> {
        check(irq)?;
        unsafe { write_volatile(bank(ICER_BASE, irq), bit(irq)) };
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> bool {
        check(irq).is_ok() && unsafe { read_volatile(bank(ISPR_BASE, irq)) } & bit(irq) != 0
    }

    fn clear_pending(&self, irq: IrqNumber) -> IrqResult<()> {
        check(irq)?;
        unsafe { write_volatile(bank(ICPR_BASE, irq), bit(irq)) };
        Ok(())
    }
}

impl PriorityInterruptController for Nvic {
    fn set_priority(&self, irq: IrqNumber, priority: Priority) -> IrqResult<()> {
        check(irq)?;
        if u32::from(priority) >= 1 << PRIO_BITS {
            return Err(IrqError::InvalidArgument);
        }
        let reg = (IPR_BASE + irq as usize) as *mut u8;
        unsafe { write_volatile(reg, priority << (8 - PRIO_BITS)) };
        Ok(())
    }

    fn priority(&self, irq: IrqNumber) -> Priority {
        if check(irq).is_err() {
            return 0;
        }
        let reg = (IPR_BASE + irq as usize) as *const u8;
        unsafe { read_volatile(reg) >> (8 - PRIO_BITS) }
    }
}
