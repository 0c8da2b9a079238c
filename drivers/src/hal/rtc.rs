//! Real-Time Clock (RTC) interrupt Hardware Abstraction Layer.
//!
//! The RTC raises one interrupt vector for three events. Each event has a
//! flag bit in the control register and a companion enable bit that must
//! still be set for the event to be delivered.

use crate::irq::IrqResult;

bitflags::bitflags! {
    /// RTC control register bits relevant to interrupt dispatch.
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct RtcCtrl: u32 {
        /// Counter running; gates the read-ready event.
        const ENABLE = 1 << 0;
        /// Time-of-day alarm interrupt enable.
        const TOD_ALARM_IE = 1 << 1;
        /// Sub-second alarm interrupt enable.
        const SUBSEC_ALARM_IE = 1 << 2;
        /// Counter update in progress.
        const BUSY = 1 << 3;
        /// Read-ready flag.
        const READY = 1 << 5;
        /// Time-of-day alarm flag.
        const TOD_ALARM = 1 << 6;
        /// Sub-second alarm flag.
        const SUBSEC_ALARM = 1 << 7;
        /// Write enable for the counter and alarm registers.
        const WRITE_ENABLE = 1 << 15;

        /// Every event flag, cleared on each interrupt entry.
        const EVENT_FLAGS = Self::READY.bits()
            | Self::TOD_ALARM.bits()
            | Self::SUBSEC_ALARM.bits();
    }
}

/// RTC alarm kinds that can be armed with a deadline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RtcAlarm {
    /// Fires when the seconds counter reaches the deadline.
    TimeOfDay,
    /// Fires when the sub-second counter reaches the deadline.
    SubSecond,
}

impl RtcAlarm {
    /// Both alarms, in arming order.
    pub const ALL: [RtcAlarm; 2] = [RtcAlarm::TimeOfDay, RtcAlarm::SubSecond];

    /// Interrupt-enable bit of this alarm.
    pub const fn enable_bit(self) -> RtcCtrl {
        match self {
            RtcAlarm::TimeOfDay => RtcCtrl::TOD_ALARM_IE,
            RtcAlarm::SubSecond => RtcCtrl::SUBSEC_ALARM_IE,
        }
    }
}

/// RTC events delivered to the registered callback.
///
/// The discriminant is the index passed to the callback.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum RtcEvent {
    ReadReady = 0,
    TimeOfDay = 1,
    SubSecond = 2,
}

impl RtcEvent {
    /// Every event in ascending index order.
    pub const ALL: [RtcEvent; 3] = [RtcEvent::ReadReady, RtcEvent::TimeOfDay, RtcEvent::SubSecond];

    /// Flag bit that reports the event.
    pub const fn flag(self) -> RtcCtrl {
        match self {
            RtcEvent::ReadReady => RtcCtrl::READY,
            RtcEvent::TimeOfDay => RtcCtrl::TOD_ALARM,
            RtcEvent::SubSecond => RtcCtrl::SUBSEC_ALARM,
        }
    }

    /// Enable bit that must still be set when the event is delivered.
    pub const fn gate(self) -> RtcCtrl {
        match self {
            RtcEvent::ReadReady => RtcCtrl::ENABLE,
            RtcEvent::TimeOfDay => RtcCtrl::TOD_ALARM_IE,
            RtcEvent::SubSecond => RtcCtrl::SUBSEC_ALARM_IE,
        }
    }

    pub const fn index(self) -> u32 {
        self as u32
    }
}

/// RTC alarm operations.
pub trait RtcAlarms {
    /// Read the control register.
    fn read_ctrl(&self) -> RtcCtrl;

    /// Clear the given control bits.
    fn clear_ctrl(&self, bits: RtcCtrl);

    /// Program `deadline` into an alarm and set its interrupt enable.
    ///
    /// # Errors
    ///
    /// [`IrqError::Busy`](crate::irq::IrqError::Busy) when the counter does
    /// not accept writes in time.
    fn enable_alarm(&self, alarm: RtcAlarm, deadline: u32) -> IrqResult<()>;

    /// Clear an alarm's interrupt enable.
    fn disable_alarm(&self, alarm: RtcAlarm) -> IrqResult<()>;
}
