//! Callback Registry
//!
//! One optional [`CallbackDesc`] per interrupt source, stored inline in a
//! fixed array so interrupt-context lookups never allocate. Entries are
//! `Copy`: a lookup hands the demultiplexer its own copy, so the entry can
//! be replaced or removed while the callback runs.

use super::callback::CallbackDesc;
use super::source::{N_SOURCES, SourceId};
use super::{IrqError, IrqResult};

pub struct CallbackRegistry {
    slots: [Option<CallbackDesc>; N_SOURCES],
}

impl CallbackRegistry {
    pub const fn new() -> Self {
        Self {
            slots: [None; N_SOURCES],
        }
    }

    /// Install `desc` for `id`, returning the entry it replaces.
    pub fn install(&mut self, id: SourceId, desc: CallbackDesc) -> Option<CallbackDesc> {
        self.slots[id.slot()].replace(desc)
    }

    /// Remove the entry for `id`.
    ///
    /// # Errors
    ///
    /// [`IrqError::InvalidArgument`] if nothing is installed.
    pub fn remove(&mut self, id: SourceId) -> IrqResult<CallbackDesc> {
        self.slots[id.slot()].take().ok_or(IrqError::InvalidArgument)
    }

    /// Copy of the entry for `id`, if any.
    #[inline]
    pub fn lookup(&self, id: SourceId) -> Option<CallbackDesc> {
        self.slots[id.slot()]
    }

    pub fn is_registered(&self, id: SourceId) -> bool {
        self.slots[id.slot()].is_some()
    }

    /// Number of installed entries.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::rtc::RtcAlarm;
    use crate::irq::callback::{RtcAlarmConfig, SourceConfig};
    use crate::irq::source::{Line, Port};

    fn noop(_: usize, _: u32, _: &SourceConfig) {}

    fn uart0() -> SourceId {
        SourceId::Uart(Port::new(0).unwrap())
    }

    #[test]
    fn starts_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert!(SourceId::all().all(|id| registry.lookup(id).is_none()));
    }

    #[test]
    fn install_replaces_existing_entry() {
        let mut registry = CallbackRegistry::new();
        let first = CallbackDesc::new(noop, 1, SourceConfig::Uart);
        let second = CallbackDesc::new(noop, 2, SourceConfig::Uart);

        assert!(registry.install(uart0(), first).is_none());
        let replaced = registry.install(uart0(), second).unwrap();

        assert_eq!(replaced.context, 1);
        assert_eq!(registry.lookup(uart0()).unwrap().context, 2);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn remove_empties_only_its_slot() {
        let mut registry = CallbackRegistry::new();
        let line = SourceId::Gpio(Line::new(3).unwrap());
        registry.install(uart0(), CallbackDesc::new(noop, 1, SourceConfig::Uart));
        let alarm = SourceConfig::Rtc(RtcAlarmConfig {
            alarm: RtcAlarm::SubSecond,
            deadline: 1,
        });
        registry.install(SourceId::Rtc, CallbackDesc::new(noop, 2, alarm));

        assert_eq!(registry.remove(uart0()).unwrap().context, 1);
        assert!(!registry.is_registered(uart0()));
        assert!(registry.is_registered(SourceId::Rtc));
        assert_eq!(registry.remove(line).unwrap_err(), IrqError::InvalidArgument);
    }

    #[test]
    fn remove_twice_fails() {
        let mut registry = CallbackRegistry::new();
        registry.install(uart0(), CallbackDesc::new(noop, 1, SourceConfig::Uart));

        assert!(registry.remove(uart0()).is_ok());
        assert_eq!(registry.remove(uart0()).unwrap_err(), IrqError::InvalidArgument);
    }
}
