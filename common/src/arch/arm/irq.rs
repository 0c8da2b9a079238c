use crate::sync::irq::IrqControl;

const PRIMASK_PM_BIT: u32 = 1 << 0;

pub struct CortexMIrq;

/// Interrupt masking for ARMv6-M/ARMv7-M cores.
///
/// Masks every configurable-priority interrupt by setting PRIMASK.
///
/// # State Management
/// The `State` type is `bool`: `true` when interrupts were unmasked before
/// the call to `disable()`, so nested critical sections only unmask on the
/// outermost `restore()`.
///
/// # Assembly Details
///
/// - `mrs {0}, PRIMASK`: read the current mask
/// - `cpsid i`: set PRIMASK
/// - `cpsie i`: clear PRIMASK
///
/// Neither block is marked `nomem`: the compiler must not move memory
/// accesses of the critical section across the mask boundaries.
impl IrqControl for CortexMIrq {
    type State = bool;

    #[inline(always)]
    fn disable() -> bool {
        let primask: u32;
        unsafe {
            core::arch::asm!(
                "mrs {0}, PRIMASK",
                "cpsid i",
                out(reg) primask,
                options(nostack, preserves_flags)
            );
        }
        primask & PRIMASK_PM_BIT == 0
    }

    #[inline(always)]
    fn restore(prev_enabled: bool) {
        if prev_enabled {
            unsafe {
                core::arch::asm!("cpsie i", options(nostack, preserves_flags));
            }
        }
    }
}
