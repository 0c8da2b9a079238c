//! Interrupt Controller Facade
//!
//! [`InterruptManager`] is the only way normal-flow code touches the
//! callback registry and the line store. Every mutation runs under an
//! [`IrqSpinLock`], so the demultiplexers, which take the same lock for
//! their lookups, only ever see complete entries. Callbacks run after the
//! lock is released and may call back into the manager.

use common::sync::IrqSpinLock;
use common::sync::irq::IrqControl;

use super::callback::{CallbackDesc, RtcAlarmConfig, SourceConfig};
use super::demux;
use super::lines::{LineConfig, LineStore};
use super::registry::CallbackRegistry;
use super::source::{IrqSource, Line, RTC_MAX_VALUE, SourceId};
use super::vectors::{Demux, VectorTable};
use super::{IrqError, IrqResult};
use crate::hal::board::IrqBoard;
use crate::hal::gpio::GpioIrqLines;
use crate::hal::interrupt::{
    InterruptController, IrqNumber, Priority, PriorityInterruptController, TriggerMode,
};
use crate::hal::rtc::{RtcAlarm, RtcAlarms};

/// State shared between normal flow and interrupt context.
struct Tables {
    registry: CallbackRegistry,
    lines: LineStore,
}

/// Interrupt controller for one board.
pub struct InterruptManager<B: IrqBoard, I: IrqControl> {
    board: B,
    vectors: VectorTable,
    tables: IrqSpinLock<Tables, I>,
}

impl<B: IrqBoard, I: IrqControl> InterruptManager<B, I> {
    /// Take ownership of the board's interrupt collaborators.
    ///
    /// Every line starts disabled with no trigger and no callbacks are
    /// registered.
    pub fn new(board: B) -> Self {
        let vectors = VectorTable::new(&board);
        log::debug!("irq: manager up, vectors {vectors:?}");

        Self {
            board,
            vectors,
            tables: IrqSpinLock::new(Tables {
                registry: CallbackRegistry::new(),
                lines: LineStore::new(),
            }),
        }
    }

    /// Mask every vector and hand the board back.
    pub fn remove(self) -> IrqResult<B> {
        for (irq, _) in self.vectors.iter() {
            self.board.nvic().disable(irq)?;
        }
        log::debug!("irq: manager removed");
        Ok(self.board)
    }

    pub fn board(&self) -> &B {
        &self.board
    }

    pub fn vectors(&self) -> &VectorTable {
        &self.vectors
    }

    /// Register `desc` for `source`, replacing any existing callback.
    ///
    /// The source's vector gets `desc.priority` first. A GPIO line is then
    /// switched to input and given the trigger carried in its
    /// [`SourceConfig::Gpio`]. If any step fails nothing is installed.
    /// Replacing an RTC entry disarms the old alarm when the new entry
    /// names a different one.
    ///
    /// # Errors
    ///
    /// - [`IrqError::InvalidArgument`] if `source` is out of range or
    ///   `desc.config` belongs to another kind of source
    /// - any error of the line or priority programming
    pub fn register_callback(&self, source: IrqSource, desc: CallbackDesc) -> IrqResult<()> {
        let id = Self::validate(source)?;
        if !desc.config.fits(id) {
            log::warn!("irq: {:?} does not fit {source:?}", desc.config);
            return Err(IrqError::InvalidArgument);
        }

        let mut tables = self.tables.lock();

        self.board
            .nvic()
            .set_priority(self.vector_of(id), desc.priority)?;

        if let (SourceId::Gpio(line), SourceConfig::Gpio { trigger }) = (id, desc.config) {
            let gpio = self.board.gpio();
            gpio.set_input(line)?;
            tables.lines.set_trigger(gpio, line, trigger)?;
        }

        // An alarm armed for the old entry must not outlive it.
        if let (Some(SourceConfig::Rtc(old)), SourceConfig::Rtc(new)) = (
            tables.registry.lookup(id).map(|old| old.config),
            desc.config,
        ) {
            if old.alarm != new.alarm {
                self.board.rtc().disable_alarm(old.alarm)?;
            }
        }

        if tables.registry.install(id, desc).is_some() {
            log::debug!("irq: replaced callback for {source:?}");
        } else {
            log::debug!("irq: registered callback for {source:?}");
        }
        Ok(())
    }

    /// Disable `source`, then drop its callback.
    ///
    /// Once this returns the callback is never invoked again.
    ///
    /// # Errors
    ///
    /// [`IrqError::InvalidArgument`] if `source` is out of range or has no
    /// callback; nothing changes in either case.
    pub fn unregister(&self, source: IrqSource) -> IrqResult<()> {
        let id = Self::validate(source)?;
        let mut tables = self.tables.lock();

        let Some(desc) = tables.registry.lookup(id) else {
            log::warn!("irq: {source:?} has no callback");
            return Err(IrqError::InvalidArgument);
        };

        self.disable_source(&mut tables, id, Some(&desc.config))?;
        tables.registry.remove(id)?;
        log::debug!("irq: unregistered {source:?}");
        Ok(())
    }

    /// Drop a GPIO line's callback if it has one.
    pub fn release_line(&self, line: u8) -> IrqResult<()> {
        let id = Self::validate(IrqSource::Gpio(line))?;
        let mut tables = self.tables.lock();

        if let Some(desc) = tables.registry.lookup(id) {
            self.disable_source(&mut tables, id, Some(&desc.config))?;
            tables.registry.remove(id)?;
            log::debug!("irq: released line {line}");
        }
        Ok(())
    }

    /// Enable interrupt generation for `source` and unmask its vector.
    ///
    /// A GPIO line keeps its configured trigger; enabling a line that was
    /// never given one is left to the caller. The RTC arms the alarm named
    /// in its registered configuration.
    ///
    /// # Errors
    ///
    /// [`IrqError::InvalidArgument`] if `source` is out of range, or is the
    /// RTC without a registered alarm configuration.
    pub fn enable(&self, source: IrqSource) -> IrqResult<()> {
        let id = Self::validate(source)?;
        let mut tables = self.tables.lock();

        match id {
            SourceId::Gpio(line) => tables.lines.enable(self.board.gpio(), line)?,
            SourceId::Rtc => {
                let alarm = Self::rtc_alarm(&tables)?;
                self.board.rtc().enable_alarm(alarm.alarm, alarm.deadline)?;
            }
            SourceId::Uart(_) => {}
        }

        self.board.nvic().enable(self.vector_of(id))?;
        log::debug!("irq: enabled {source:?}");
        Ok(())
    }

    /// Disable interrupt generation for `source`.
    ///
    /// A GPIO line is masked at the port only, since its vector is shared
    /// with the other lines; the RTC and UARTs are also masked at their
    /// vector.
    ///
    /// # Errors
    ///
    /// [`IrqError::InvalidArgument`] if `source` is out of range, or is the
    /// RTC without a registered alarm configuration.
    pub fn disable(&self, source: IrqSource) -> IrqResult<()> {
        let id = Self::validate(source)?;
        let mut tables = self.tables.lock();

        let config = tables.registry.lookup(id).map(|desc| desc.config);
        self.disable_source(&mut tables, id, config.as_ref())?;
        log::debug!("irq: disabled {source:?}");
        Ok(())
    }

    /// Reprogram the trigger of a GPIO line, keeping its enabled state.
    pub fn set_trigger(&self, line: u8, mode: TriggerMode) -> IrqResult<()> {
        let SourceId::Gpio(line) = Self::validate(IrqSource::Gpio(line))? else {
            return Err(IrqError::InvalidArgument);
        };

        self.tables
            .lock()
            .lines
            .set_trigger(self.board.gpio(), line, mode)?;
        log::debug!("irq: line {} now {mode:?}", line.number());
        Ok(())
    }

    /// Set the priority of the vector serving `source`.
    pub fn set_priority(&self, source: IrqSource, priority: Priority) -> IrqResult<()> {
        let id = Self::validate(source)?;
        self.board
            .nvic()
            .set_priority(self.vector_of(id), priority)
    }

    /// Unmask every vector in ascending order.
    ///
    /// Every GPIO line that has a trigger is enabled, and both RTC alarms
    /// are armed at [`RTC_MAX_VALUE`].
    pub fn global_enable(&self) -> IrqResult<()> {
        let mut tables = self.tables.lock();

        for (irq, demux) in self.vectors.iter() {
            self.board.nvic().enable(irq)?;
            match demux {
                Demux::Gpio => {
                    let gpio = self.board.gpio();
                    let armed = tables
                        .lines
                        .configured()
                        .fold(0, |mask, (line, _)| mask | line.mask());
                    for line in Line::all().filter(|line| armed & line.mask() != 0) {
                        tables.lines.enable(gpio, line)?;
                    }
                }
                Demux::Rtc => {
                    for alarm in RtcAlarm::ALL {
                        self.board.rtc().enable_alarm(alarm, RTC_MAX_VALUE)?;
                    }
                }
                Demux::Uart(_) => {}
            }
        }

        log::debug!("irq: global enable");
        Ok(())
    }

    /// Clear and mask every vector in ascending order.
    ///
    /// Every GPIO line is disabled without losing its trigger, and both
    /// RTC alarms are disarmed.
    pub fn global_disable(&self) -> IrqResult<()> {
        let mut tables = self.tables.lock();

        for (irq, demux) in self.vectors.iter() {
            let nvic = self.board.nvic();
            nvic.clear_pending(irq)?;
            nvic.disable(irq)?;
            match demux {
                Demux::Gpio => {
                    let gpio = self.board.gpio();
                    for line in Line::all() {
                        tables.lines.disable(gpio, line)?;
                    }
                }
                Demux::Rtc => {
                    for alarm in RtcAlarm::ALL {
                        self.board.rtc().disable_alarm(alarm)?;
                    }
                }
                Demux::Uart(_) => {}
            }
        }

        log::debug!("irq: global disable");
        Ok(())
    }

    pub fn is_registered(&self, source: IrqSource) -> bool {
        source
            .validate()
            .is_ok_and(|id| self.tables.lock().registry.is_registered(id))
    }

    pub fn line_config(&self, line: u8) -> IrqResult<LineConfig> {
        let line = Line::new(line).ok_or(IrqError::InvalidArgument)?;
        Ok(self.tables.with(|tables| tables.lines.get(line)))
    }

    /// Interrupt entry: run the demultiplexer owning `irq`.
    ///
    /// Vectors this manager does not own are ignored.
    pub fn handle_vector(&self, irq: IrqNumber) {
        if let Some(demux) = self.vectors.lookup(irq) {
            self.dispatch(demux);
        }
    }

    /// Run one demultiplexer against the current hardware status.
    pub fn dispatch(&self, demux: Demux) {
        match demux {
            Demux::Gpio => demux::gpio(self.board.gpio(), |id| self.lookup(id)),
            Demux::Rtc => demux::rtc(self.board.rtc(), self.lookup(SourceId::Rtc)),
            Demux::Uart(port) => {
                demux::uart(self.board.uart(port), self.lookup(SourceId::Uart(port)))
            }
        }
    }

    #[inline]
    fn lookup(&self, id: SourceId) -> Option<CallbackDesc> {
        self.tables.lock().registry.lookup(id)
    }

    fn validate(source: IrqSource) -> IrqResult<SourceId> {
        source.validate().inspect_err(|_| {
            log::warn!("irq: {source:?} is out of range");
        })
    }

    fn vector_of(&self, id: SourceId) -> IrqNumber {
        let demux = match id {
            SourceId::Gpio(_) => Demux::Gpio,
            SourceId::Rtc => Demux::Rtc,
            SourceId::Uart(port) => Demux::Uart(port),
        };
        self.vectors.vector(demux)
    }

    fn rtc_alarm(tables: &Tables) -> IrqResult<RtcAlarmConfig> {
        match tables.registry.lookup(SourceId::Rtc).map(|desc| desc.config) {
            Some(SourceConfig::Rtc(alarm)) => Ok(alarm),
            _ => {
                log::warn!("irq: rtc has no alarm configuration");
                Err(IrqError::InvalidArgument)
            }
        }
    }

    fn disable_source(
        &self,
        tables: &mut Tables,
        id: SourceId,
        config: Option<&SourceConfig>,
    ) -> IrqResult<()> {
        match (id, config) {
            (SourceId::Gpio(line), _) => tables.lines.disable(self.board.gpio(), line),
            (SourceId::Rtc, Some(SourceConfig::Rtc(alarm))) => {
                self.board.rtc().disable_alarm(alarm.alarm)?;
                self.board.nvic().disable(self.vector_of(id))
            }
            (SourceId::Rtc, _) => {
                log::warn!("irq: rtc has no alarm configuration");
                Err(IrqError::InvalidArgument)
            }
            (SourceId::Uart(_), _) => self.board.nvic().disable(self.vector_of(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimBoard;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static DEPTH: AtomicUsize = AtomicUsize::new(0);
    static MASKS: AtomicUsize = AtomicUsize::new(0);
    static DEPTH_IN_CALLBACK: AtomicUsize = AtomicUsize::new(usize::MAX);

    /// Counts mask/restore pairs instead of touching a core.
    struct CountingIrq;

    impl IrqControl for CountingIrq {
        type State = ();

        fn disable() {
            DEPTH.fetch_add(1, Ordering::SeqCst);
            MASKS.fetch_add(1, Ordering::SeqCst);
        }

        fn restore(_state: ()) {
            DEPTH.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn note_depth(_context: usize, _index: u32, _config: &SourceConfig) {
        DEPTH_IN_CALLBACK.store(DEPTH.load(Ordering::SeqCst), Ordering::SeqCst);
    }

    #[test]
    fn mutations_mask_interrupts_and_callbacks_run_unmasked() {
        let manager: InterruptManager<SimBoard, CountingIrq> =
            InterruptManager::new(SimBoard::new());
        let config = SourceConfig::Gpio {
            trigger: TriggerMode::RisingEdge,
        };

        let before = MASKS.load(Ordering::SeqCst);
        manager
            .register_callback(IrqSource::Gpio(1), CallbackDesc::new(note_depth, 0, config))
            .unwrap();
        assert!(MASKS.load(Ordering::SeqCst) > before);
        assert_eq!(DEPTH.load(Ordering::SeqCst), 0);

        manager.set_trigger(1, TriggerMode::FallingEdge).unwrap();
        manager.enable(IrqSource::Gpio(1)).unwrap();
        assert_eq!(DEPTH.load(Ordering::SeqCst), 0);

        manager.board().gpio.raise(1 << 1);
        manager.dispatch(Demux::Gpio);

        assert_eq!(DEPTH_IN_CALLBACK.load(Ordering::SeqCst), 0);
        assert_eq!(DEPTH.load(Ordering::SeqCst), 0);
    }
}
