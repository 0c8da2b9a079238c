//! Interrupt source identifiers.
//!
//! Callers name sources with [`IrqSource`], which may carry any index.
//! [`IrqSource::validate`] turns it into a [`SourceId`], whose line and
//! port indices are in range by construction; nothing past the
//! [`InterruptManager`](super::InterruptManager) boundary sees a raw index.

use super::{IrqError, IrqResult};

/// Number of GPIO lines that can raise interrupts.
pub const N_LINES: usize = 14;

/// Number of UART ports.
pub const N_PORTS: usize = 2;

/// Number of registry slots: one per line, the RTC, one per port.
pub const N_SOURCES: usize = N_LINES + 1 + N_PORTS;

/// Deadline programmed into both RTC alarms by a global enable.
pub const RTC_MAX_VALUE: u32 = 0xFFFF_FFFF;

/// Interrupt source as named by callers.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum IrqSource {
    /// A GPIO line.
    Gpio(u8),
    /// The real-time clock.
    Rtc,
    /// A UART port.
    Uart(u8),
}

impl IrqSource {
    /// Check the index against the kind's maximum.
    pub fn validate(self) -> IrqResult<SourceId> {
        match self {
            IrqSource::Gpio(n) => Line::new(n).map(SourceId::Gpio),
            IrqSource::Rtc => Some(SourceId::Rtc),
            IrqSource::Uart(n) => Port::new(n).map(SourceId::Uart),
        }
        .ok_or(IrqError::InvalidArgument)
    }
}

/// GPIO line index, always below [`N_LINES`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Line(u8);

impl Line {
    pub const fn new(n: u8) -> Option<Self> {
        if (n as usize) < N_LINES {
            Some(Self(n))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Status-register bit of this line.
    pub const fn mask(self) -> u32 {
        1 << self.0
    }

    /// Every line in ascending order.
    pub fn all() -> impl Iterator<Item = Line> {
        (0..N_LINES as u8).map(Line)
    }
}

/// UART port index, always below [`N_PORTS`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Port(u8);

impl Port {
    pub const fn new(n: u8) -> Option<Self> {
        if (n as usize) < N_PORTS {
            Some(Self(n))
        } else {
            None
        }
    }

    pub const fn number(self) -> u8 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Every port in ascending order.
    pub fn all() -> impl Iterator<Item = Port> {
        (0..N_PORTS as u8).map(Port)
    }
}

/// Validated interrupt source.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SourceId {
    Gpio(Line),
    Rtc,
    Uart(Port),
}

impl SourceId {
    /// Registry slot of this source.
    pub const fn slot(self) -> usize {
        match self {
            SourceId::Gpio(line) => line.index(),
            SourceId::Rtc => N_LINES,
            SourceId::Uart(port) => N_LINES + 1 + port.index(),
        }
    }

    /// Every source, ordered by slot.
    pub fn all() -> impl Iterator<Item = SourceId> {
        Line::all()
            .map(SourceId::Gpio)
            .chain(core::iter::once(SourceId::Rtc))
            .chain(Port::all().map(SourceId::Uart))
    }
}

impl From<SourceId> for IrqSource {
    fn from(id: SourceId) -> Self {
        match id {
            SourceId::Gpio(line) => IrqSource::Gpio(line.number()),
            SourceId::Rtc => IrqSource::Rtc,
            SourceId::Uart(port) => IrqSource::Uart(port.number()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_indices() {
        assert_eq!(
            IrqSource::Gpio(N_LINES as u8).validate(),
            Err(IrqError::InvalidArgument)
        );
        assert_eq!(
            IrqSource::Uart(N_PORTS as u8).validate(),
            Err(IrqError::InvalidArgument)
        );
        assert_eq!(IrqSource::Gpio(u8::MAX).validate(), Err(IrqError::InvalidArgument));
    }

    #[test]
    fn accepts_boundary_indices() {
        let last = IrqSource::Gpio(N_LINES as u8 - 1).validate().unwrap();
        assert_eq!(last, SourceId::Gpio(Line::new(13).unwrap()));
        assert_eq!(IrqSource::Rtc.validate(), Ok(SourceId::Rtc));
        assert!(IrqSource::Uart(1).validate().is_ok());
    }

    #[test]
    fn slots_are_dense_and_unique() {
        let slots: Vec<usize> = SourceId::all().map(SourceId::slot).collect();
        assert_eq!(slots, (0..N_SOURCES).collect::<Vec<_>>());
    }

    #[test]
    fn round_trips_through_caller_form() {
        for id in SourceId::all() {
            assert_eq!(IrqSource::from(id).validate(), Ok(id));
        }
    }

    #[test]
    fn line_mask_matches_status_bit() {
        let line = Line::new(5).unwrap();
        assert_eq!(line.mask(), 0b10_0000);
    }
}
