//! Callback entries and per-source configuration.

use super::source::SourceId;
use crate::hal::interrupt::{Priority, TriggerMode};
use crate::hal::rtc::RtcAlarm;

/// Priority given to a source's vector when the caller names none.
pub const DEFAULT_PRIORITY: Priority = 1;

/// Interrupt callback.
///
/// Called from interrupt context with the registered context word, the
/// index of the event within the source (GPIO line, RTC event, UART cause
/// bit) and the registered configuration. Must not block.
pub type IrqHandler = fn(context: usize, index: u32, config: &SourceConfig);

/// Alarm armed by enabling the RTC source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RtcAlarmConfig {
    pub alarm: RtcAlarm,
    pub deadline: u32,
}

/// Per-source configuration, one variant per peripheral kind.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceConfig {
    /// Trigger programmed when a GPIO line is registered.
    Gpio { trigger: TriggerMode },
    /// Alarm armed when the RTC source is enabled.
    Rtc(RtcAlarmConfig),
    /// UARTs carry no configuration of their own.
    Uart,
}

impl SourceConfig {
    /// Whether this configuration belongs to the kind of `id`.
    pub const fn fits(&self, id: SourceId) -> bool {
        matches!(
            (self, id),
            (SourceConfig::Gpio { .. }, SourceId::Gpio(_))
                | (SourceConfig::Rtc(_), SourceId::Rtc)
                | (SourceConfig::Uart, SourceId::Uart(_))
        )
    }
}

/// A registered callback.
#[derive(Debug, Copy, Clone)]
pub struct CallbackDesc {
    pub handler: IrqHandler,
    pub context: usize,
    pub config: SourceConfig,
    pub priority: Priority,
}

impl CallbackDesc {
    pub const fn new(handler: IrqHandler, context: usize, config: SourceConfig) -> Self {
        Self {
            handler,
            context,
            config,
            priority: DEFAULT_PRIORITY,
        }
    }

    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    #[inline]
    pub fn invoke(&self, index: u32) {
        (self.handler)(self.context, index, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irq::source::{Line, Port};
    use core::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn config_fits_only_its_own_kind() {
        let line = SourceId::Gpio(Line::new(0).unwrap());
        let port = SourceId::Uart(Port::new(0).unwrap());
        let gpio = SourceConfig::Gpio {
            trigger: TriggerMode::RisingEdge,
        };
        let rtc = SourceConfig::Rtc(RtcAlarmConfig {
            alarm: RtcAlarm::TimeOfDay,
            deadline: 10,
        });

        assert!(gpio.fits(line));
        assert!(!gpio.fits(SourceId::Rtc));
        assert!(rtc.fits(SourceId::Rtc));
        assert!(!rtc.fits(port));
        assert!(SourceConfig::Uart.fits(port));
        assert!(!SourceConfig::Uart.fits(line));
    }

    #[test]
    fn invoke_passes_context_index_and_config() {
        static SEEN: AtomicU32 = AtomicU32::new(0);

        fn handler(context: usize, index: u32, config: &SourceConfig) {
            assert_eq!(*config, SourceConfig::Uart);
            SEEN.store(context as u32 * 100 + index, Ordering::SeqCst);
        }

        let desc = CallbackDesc::new(handler, 7, SourceConfig::Uart);
        assert_eq!(desc.priority, DEFAULT_PRIORITY);
        desc.invoke(3);
        assert_eq!(SEEN.load(Ordering::SeqCst), 703);
        assert_eq!(desc.with_priority(4).priority, 4);
    }
}
