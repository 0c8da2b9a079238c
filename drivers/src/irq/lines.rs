//! Line Configuration Store
//!
//! Trigger mode and enabled flag of every GPIO line, kept independently of
//! the callback registry. A line is `Disabled` at start with no trigger;
//! only [`LineStore::set_trigger`], [`LineStore::enable`] and
//! [`LineStore::disable`] change it.

use super::IrqResult;
use super::source::{Line, N_LINES};
use crate::hal::gpio::GpioIrqLines;
use crate::hal::interrupt::TriggerMode;

/// Stored configuration of one line.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LineConfig {
    pub trigger: Option<TriggerMode>,
    pub enabled: bool,
}

/// Observable state of a line.
///
/// `Enabled(None)` is reachable when a caller enables a line before giving
/// it a trigger; the hardware then fires on whatever trigger it resets to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LineState {
    Disabled,
    Enabled(Option<TriggerMode>),
}

impl LineConfig {
    pub const fn state(&self) -> LineState {
        if self.enabled {
            LineState::Enabled(self.trigger)
        } else {
            LineState::Disabled
        }
    }
}

pub struct LineStore {
    lines: [LineConfig; N_LINES],
}

impl LineStore {
    pub const fn new() -> Self {
        Self {
            lines: [LineConfig {
                trigger: None,
                enabled: false,
            }; N_LINES],
        }
    }

    pub fn get(&self, line: Line) -> LineConfig {
        self.lines[line.index()]
    }

    /// Reprogram the trigger of `line`.
    ///
    /// Interrupt generation for the line is off while the trigger changes:
    /// 1. remember the hardware enable bit
    /// 2. clear it
    /// 3. clear the line's pending status
    /// 4. program the trigger
    /// 5. restore the enable bit as remembered, even if step 4 failed
    pub fn set_trigger<G: GpioIrqLines>(
        &mut self,
        gpio: &G,
        line: Line,
        mode: TriggerMode,
    ) -> IrqResult<()> {
        let was_enabled = gpio.irq_enabled(line);
        if was_enabled {
            gpio.set_irq_enabled(line, false)?;
        }

        gpio.clear_status(line.mask());
        let programmed = gpio.configure_trigger(line, mode);

        let restored = if was_enabled {
            gpio.set_irq_enabled(line, true)
        } else {
            Ok(())
        };

        programmed?;
        restored?;

        let config = &mut self.lines[line.index()];
        config.trigger = Some(mode);
        config.enabled = was_enabled;
        Ok(())
    }

    /// Turn interrupt generation on, keeping the configured trigger.
    pub fn enable<G: GpioIrqLines>(&mut self, gpio: &G, line: Line) -> IrqResult<()> {
        gpio.set_irq_enabled(line, true)?;
        self.lines[line.index()].enabled = true;
        Ok(())
    }

    /// Turn interrupt generation off, keeping the configured trigger.
    pub fn disable<G: GpioIrqLines>(&mut self, gpio: &G, line: Line) -> IrqResult<()> {
        gpio.set_irq_enabled(line, false)?;
        self.lines[line.index()].enabled = false;
        Ok(())
    }

    /// Lines that have a trigger, in ascending order.
    pub fn configured(&self) -> impl Iterator<Item = (Line, TriggerMode)> + '_ {
        Line::all().filter_map(|line| self.get(line).trigger.map(|mode| (line, mode)))
    }
}

impl Default for LineStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::irq::IrqError;
    use crate::sim::SimGpio;

    fn line(n: u8) -> Line {
        Line::new(n).unwrap()
    }

    #[test]
    fn lines_start_disabled_without_trigger() {
        let store = LineStore::new();
        assert!(Line::all().all(|l| store.get(l) == LineConfig::default()));
        assert_eq!(store.get(line(0)).state(), LineState::Disabled);
        assert_eq!(store.configured().count(), 0);
    }

    #[test]
    fn set_trigger_keeps_enabled_line_enabled() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();
        store.set_trigger(&gpio, line(4), TriggerMode::RisingEdge).unwrap();
        store.enable(&gpio, line(4)).unwrap();

        store.set_trigger(&gpio, line(4), TriggerMode::LevelLow).unwrap();

        assert!(gpio.irq_enabled(line(4)));
        assert_eq!(gpio.trigger(line(4)), Some(TriggerMode::LevelLow));
        assert_eq!(
            store.get(line(4)).state(),
            LineState::Enabled(Some(TriggerMode::LevelLow))
        );
    }

    #[test]
    fn set_trigger_leaves_disabled_line_disabled() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();

        store.set_trigger(&gpio, line(2), TriggerMode::BothEdges).unwrap();

        assert!(!gpio.irq_enabled(line(2)));
        assert_eq!(gpio.trigger(line(2)), Some(TriggerMode::BothEdges));
        assert_eq!(store.get(line(2)).state(), LineState::Disabled);
    }

    #[test]
    fn set_trigger_masks_the_line_while_programming() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();
        store.set_trigger(&gpio, line(7), TriggerMode::FallingEdge).unwrap();
        store.enable(&gpio, line(7)).unwrap();

        gpio.inject_on_configure(line(7).mask());
        store.set_trigger(&gpio, line(7), TriggerMode::RisingEdge).unwrap();

        assert_eq!(gpio.fired_during_configure(), 0);
        assert!(gpio.irq_enabled(line(7)));
        // The event raised mid-reconfiguration is still pending afterwards.
        assert_eq!(gpio.read_status(), line(7).mask());
    }

    #[test]
    fn set_trigger_discards_stale_status_of_that_line_only() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();
        gpio.raise(line(1).mask() | line(9).mask());

        store.set_trigger(&gpio, line(1), TriggerMode::LevelHigh).unwrap();

        assert_eq!(gpio.read_status(), line(9).mask());
    }

    #[test]
    fn failed_programming_restores_enable_and_keeps_old_trigger() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();
        store.set_trigger(&gpio, line(3), TriggerMode::RisingEdge).unwrap();
        store.enable(&gpio, line(3)).unwrap();

        gpio.fail_configure(line(3).mask());
        let err = store.set_trigger(&gpio, line(3), TriggerMode::LevelLow);

        assert_eq!(err, Err(IrqError::Busy));
        assert!(gpio.irq_enabled(line(3)));
        assert_eq!(store.get(line(3)).trigger, Some(TriggerMode::RisingEdge));
    }

    #[test]
    fn enable_and_disable_keep_trigger() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();
        store.set_trigger(&gpio, line(0), TriggerMode::LevelHigh).unwrap();

        store.enable(&gpio, line(0)).unwrap();
        store.disable(&gpio, line(0)).unwrap();

        assert_eq!(store.get(line(0)).trigger, Some(TriggerMode::LevelHigh));
        assert_eq!(gpio.trigger(line(0)), Some(TriggerMode::LevelHigh));
        assert!(!gpio.irq_enabled(line(0)));
    }

    #[test]
    fn configured_lists_lines_in_ascending_order() {
        let gpio = SimGpio::new();
        let mut store = LineStore::new();
        store.set_trigger(&gpio, line(9), TriggerMode::LevelLow).unwrap();
        store.set_trigger(&gpio, line(1), TriggerMode::RisingEdge).unwrap();

        let configured: Vec<_> = store.configured().collect();
        assert_eq!(
            configured,
            [
                (line(1), TriggerMode::RisingEdge),
                (line(9), TriggerMode::LevelLow)
            ]
        );
    }
}
