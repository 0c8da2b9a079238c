//! Status-register demultiplexers.
//!
//! Each demultiplexer runs in interrupt context and shares one shape:
//! snapshot the status register once, clear exactly the snapshotted bits,
//! then walk the snapshot from bit 0 upwards and invoke the callback for
//! every asserted bit. Bits that arrive after the snapshot stay pending for
//! the next entry. Nothing here allocates, blocks or reports errors.

use super::callback::CallbackDesc;
use super::source::{Line, SourceId};
use crate::hal::gpio::GpioIrqLines;
use crate::hal::rtc::{RtcAlarms, RtcCtrl, RtcEvent};
use crate::hal::serial::UartIrq;

/// Indices of the set bits of a mask, lowest first.
#[derive(Debug, Clone)]
pub struct SetBits(u32);

impl SetBits {
    pub const fn new(mask: u32) -> Self {
        Self(mask)
    }
}

impl Iterator for SetBits {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0 - 1;
        Some(bit)
    }
}

/// Demultiplex the GPIO port.
///
/// `lookup` is asked for each asserted line in turn. The first asserted
/// line without a callback ends the scan: lines above it are not
/// dispatched on this entry even if they have callbacks, and their status
/// bits are already cleared.
pub fn gpio<G, F>(gpio: &G, mut lookup: F)
where
    G: GpioIrqLines,
    F: FnMut(SourceId) -> Option<CallbackDesc>,
{
    let snapshot = gpio.read_status();
    gpio.clear_status(snapshot);

    for index in SetBits::new(snapshot) {
        let entry = Line::new(index as u8).and_then(|line| lookup(SourceId::Gpio(line)));
        let Some(desc) = entry else {
            log::trace!("gpio: no callback for line {index}, dropping {snapshot:#x}");
            return;
        };
        desc.invoke(index);
    }
}

/// Demultiplex the RTC.
///
/// The event flags are cleared on every entry. An event is delivered only
/// if its flag was in the snapshot and its enable bit is still set when
/// the control register is read again.
pub fn rtc<R: RtcAlarms>(rtc: &R, entry: Option<CallbackDesc>) {
    let snapshot = rtc.read_ctrl();
    rtc.clear_ctrl(RtcCtrl::EVENT_FLAGS);

    let Some(desc) = entry else {
        return;
    };

    for event in RtcEvent::ALL {
        if snapshot.contains(event.flag()) && rtc.read_ctrl().contains(event.gate()) {
            desc.invoke(event.index());
        }
    }
}

/// Demultiplex one UART port.
///
/// A cause bit is delivered only while its enable bit is set.
pub fn uart<U: UartIrq>(uart: &U, entry: Option<CallbackDesc>) {
    let snapshot = uart.read_int_flags();
    uart.clear_int_flags(snapshot);

    let Some(desc) = entry else {
        return;
    };

    for index in SetBits::new(snapshot) {
        if uart.int_enabled() & (1 << index) != 0 {
            desc.invoke(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::interrupt::TriggerMode;
    use crate::hal::rtc::RtcAlarm;
    use crate::hal::serial::UartIntFlags;
    use crate::irq::callback::{RtcAlarmConfig, SourceConfig};
    use crate::irq::registry::CallbackRegistry;
    use crate::sim::{Recorder, SimGpio, SimRtc, SimUart};

    fn gpio_config() -> SourceConfig {
        SourceConfig::Gpio {
            trigger: TriggerMode::RisingEdge,
        }
    }

    fn registry_with(recorder: &'static Recorder, lines: &[u8]) -> CallbackRegistry {
        let mut registry = CallbackRegistry::new();
        for &n in lines {
            let id = SourceId::Gpio(Line::new(n).unwrap());
            registry.install(id, recorder.desc(gpio_config()));
        }
        registry
    }

    #[test]
    fn set_bits_ascend() {
        let bits: Vec<u32> = SetBits::new(0b1010_0101).collect();
        assert_eq!(bits, [0, 2, 5, 7]);
        assert_eq!(SetBits::new(0).count(), 0);
        assert_eq!(SetBits::new(1 << 31).collect::<Vec<_>>(), [31]);
    }

    #[test]
    fn gpio_dispatches_in_ascending_order() {
        static REC: Recorder = Recorder::new();
        let sim = SimGpio::new();
        let registry = registry_with(&REC, &[0, 2]);
        sim.raise(0b101);

        gpio(&sim, |id| registry.lookup(id));

        assert_eq!(&*REC.indices(), &[0, 2]);
        assert_eq!(REC.last_config(), Some(gpio_config()));
    }

    #[test]
    fn gpio_scan_stops_at_first_unregistered_line() {
        static REC: Recorder = Recorder::new();
        let sim = SimGpio::new();
        let registry = registry_with(&REC, &[1, 5]);
        sim.raise((1 << 1) | (1 << 3) | (1 << 5));

        gpio(&sim, |id| registry.lookup(id));

        assert_eq!(&*REC.indices(), &[1]);
        assert_eq!(sim.read_status(), 0);
    }

    #[test]
    fn gpio_bits_beyond_the_last_line_end_the_scan() {
        static REC: Recorder = Recorder::new();
        let sim = SimGpio::new();
        let registry = registry_with(&REC, &[0]);
        sim.raise(1 | (1 << 20));

        gpio(&sim, |id| registry.lookup(id));

        assert_eq!(&*REC.indices(), &[0]);
    }

    #[test]
    fn gpio_clears_only_the_snapshot() {
        static REC: Recorder = Recorder::new();
        let sim = SimGpio::new();
        let registry = registry_with(&REC, &[4]);
        sim.raise(1 << 4);
        sim.raise_after_read(1 << 6);

        gpio(&sim, |id| registry.lookup(id));

        assert_eq!(&*REC.indices(), &[4]);
        assert_eq!(sim.read_status(), 1 << 6);
    }

    #[test]
    fn gpio_with_nothing_pending_is_silent() {
        static REC: Recorder = Recorder::new();
        let sim = SimGpio::new();
        let registry = registry_with(&REC, &[0, 1, 2]);

        gpio(&sim, |id| registry.lookup(id));

        assert!(REC.indices().is_empty());
    }

    fn rtc_config() -> SourceConfig {
        SourceConfig::Rtc(RtcAlarmConfig {
            alarm: RtcAlarm::TimeOfDay,
            deadline: 60,
        })
    }

    #[test]
    fn rtc_delivers_flagged_and_enabled_events() {
        static REC: Recorder = Recorder::new();
        let sim = SimRtc::new();
        sim.set(RtcCtrl::ENABLE | RtcCtrl::TOD_ALARM_IE | RtcCtrl::SUBSEC_ALARM_IE);
        sim.set(RtcCtrl::TOD_ALARM | RtcCtrl::SUBSEC_ALARM);

        rtc(&sim, Some(REC.desc(rtc_config())));

        assert_eq!(
            &*REC.indices(),
            &[RtcEvent::TimeOfDay.index(), RtcEvent::SubSecond.index()]
        );
        assert!(!sim.read_ctrl().intersects(RtcCtrl::EVENT_FLAGS));
    }

    #[test]
    fn rtc_skips_events_whose_enable_is_clear() {
        static REC: Recorder = Recorder::new();
        let sim = SimRtc::new();
        sim.set(RtcCtrl::ENABLE | RtcCtrl::TOD_ALARM_IE);
        sim.set(RtcCtrl::READY | RtcCtrl::SUBSEC_ALARM | RtcCtrl::TOD_ALARM);

        rtc(&sim, Some(REC.desc(rtc_config())));

        assert_eq!(
            &*REC.indices(),
            &[RtcEvent::ReadReady.index(), RtcEvent::TimeOfDay.index()]
        );
    }

    #[test]
    fn rtc_rechecks_enable_after_clearing_flags() {
        static REC: Recorder = Recorder::new();
        let sim = SimRtc::new();
        sim.set(RtcCtrl::ENABLE | RtcCtrl::TOD_ALARM_IE | RtcCtrl::TOD_ALARM);
        sim.drop_on_clear(RtcCtrl::TOD_ALARM_IE);

        rtc(&sim, Some(REC.desc(rtc_config())));

        assert!(REC.indices().is_empty());
    }

    #[test]
    fn rtc_without_callback_still_clears_flags() {
        let sim = SimRtc::new();
        sim.set(RtcCtrl::ENABLE | RtcCtrl::TOD_ALARM_IE | RtcCtrl::TOD_ALARM);

        rtc(&sim, None);

        assert_eq!(sim.read_ctrl(), RtcCtrl::ENABLE | RtcCtrl::TOD_ALARM_IE);
    }

    #[test]
    fn uart_delivers_enabled_causes_in_order() {
        static REC: Recorder = Recorder::new();
        let sim = SimUart::new();
        sim.set_int_enabled(UartIntFlags::RX_FIFO_THRESHOLD | UartIntFlags::RX_OVERRUN);
        sim.raise(
            UartIntFlags::RX_FIFO_THRESHOLD | UartIntFlags::RX_OVERRUN | UartIntFlags::BREAK,
        );

        uart(&sim, Some(REC.desc(SourceConfig::Uart)));

        assert_eq!(&*REC.indices(), &[3, 4]);
        assert_eq!(sim.read_int_flags(), 0);
    }

    #[test]
    fn uart_without_callback_still_clears_flags() {
        let sim = SimUart::new();
        sim.set_int_enabled(UartIntFlags::all());
        sim.raise(UartIntFlags::TX_FIFO_ALMOST_EMPTY);

        uart(&sim, None);

        assert_eq!(sim.read_int_flags(), 0);
    }
}
