//! MAX32660 RTC Alarm Driver

use core::ptr::{read_volatile, write_volatile};

use crate::hal::rtc::{RtcAlarm, RtcAlarms, RtcCtrl};
use crate::irq::{IrqError, IrqResult};

pub const RTC_BASE: usize = 0x4000_6000;

// Register offsets
const RAS_OFFSET: usize = 0x08;
const RSSA_OFFSET: usize = 0x0C;
const CTRL_OFFSET: usize = 0x10;

/// Polls of the busy flag before a write is given up.
const BUSY_SPINS: u32 = 10_000;

/// Real-time clock of the MAX32660.
pub struct Rtc {
    base: usize,
}

impl Rtc {
    /// # Safety
    ///
    /// `base` must point to the RTC register block and only one instance
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

    fn write_ctrl(&self, ctrl: RtcCtrl) {
        self.write_reg(CTRL_OFFSET, ctrl.bits());
    }

    /// Wait until the counter accepts register writes.
    fn wait_not_busy(&self) -> IrqResult<()> {
        for _ in 0..BUSY_SPINS {
            if !self.read_ctrl().contains(RtcCtrl::BUSY) {
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(IrqError::Busy)
    }

    /// Run `f` with register writes unlocked.
    fn with_write_enable(&self, f: impl FnOnce(RtcCtrl) -> IrqResult<()>) -> IrqResult<()> {
        self.wait_not_busy()?;
        let ctrl = self.read_ctrl();
        self.write_ctrl(ctrl | RtcCtrl::WRITE_ENABLE);

        let result = self.wait_not_busy().and_then(|()| f(self.read_ctrl()));

        let ctrl = self.read_ctrl();
        self.write_ctrl(ctrl - RtcCtrl::WRITE_ENABLE);
        result
    }
}

impl RtcAlarms for Rtc {
    fn read_ctrl(&self) -> RtcCtrl {
        RtcCtrl::from_bits_retain(self.read_reg(CTRL_OFFSET))
    }

    fn clear_ctrl(&self, bits: RtcCtrl) {
        let ctrl = self.read_ctrl();
        self.write_ctrl(ctrl - bits);
    }

    fn enable_alarm(&self, alarm: RtcAlarm, deadline: u32) -> IrqResult<()> {
        self.with_write_enable(|ctrl| {
            // Alarm registers only latch with the alarm disabled.
            self.write_ctrl(ctrl - alarm.enable_bit());
            self.wait_not_busy()?;

            match alarm {
                RtcAlarm::TimeOfDay => self.write_reg(RAS_OFFSET, deadline),
                RtcAlarm::SubSecond => self.write_reg(RSSA_OFFSET, deadline),
            }

            self.wait_not_busy()?;
            let ctrl = self.read_ctrl();
            self.write_ctrl(ctrl | alarm.enable_bit());
            Ok(())
        })
    }

    fn disable_alarm(&self, alarm: RtcAlarm) -> IrqResult<()> {
        self.with_write_enable(|ctrl| {
            self.write_ctrl(ctrl - alarm.enable_bit());
            Ok(())
        })
    }
}
