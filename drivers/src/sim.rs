//! Simulated board for host tests.
//!
//! Every register is an atomic, so the dispatch core can be driven outside
//! real interrupt context: raise status bits, call
//! [`InterruptManager::handle_vector`](crate::irq::InterruptManager::handle_vector),
//! and read back what the callbacks saw through a [`Recorder`].

use core::ops::Deref;
use core::sync::atomic::{AtomicBool, AtomicU8, AtomicU32, AtomicU64, Ordering};

use common::sync::SpinLock;
use common::sync::irq::IrqControl;

use crate::hal::board::IrqBoard;
use crate::hal::gpio::{GpioIrqLines, TriggerBits};
use crate::hal::interrupt::{
    InterruptController, IrqNumber, Priority, PriorityInterruptController, TriggerMode,
};
use crate::hal::rtc::{RtcAlarm, RtcAlarms, RtcCtrl};
use crate::hal::serial::{UartIntFlags, UartIrq};
use crate::irq::callback::{CallbackDesc, SourceConfig};
use crate::irq::source::{Line, N_PORTS, Port};
use crate::irq::vectors::Demux;
use crate::irq::{IrqError, IrqResult};

pub const RTC_IRQN: IrqNumber = 3;
pub const UART0_IRQN: IrqNumber = 14;
pub const UART1_IRQN: IrqNumber = 15;
pub const GPIO_IRQN: IrqNumber = 24;

const SIM_VECTORS: usize = 64;

/// Host stand-in for interrupt masking; there is no interrupt layer.
pub struct SimIrq;

impl IrqControl for SimIrq {
    type State = ();

    fn disable() {}

    fn restore(_state: ()) {}
}

fn set_bit(reg: &AtomicU32, mask: u32, on: bool) {
    if on {
        reg.fetch_or(mask, Ordering::SeqCst);
    } else {
        reg.fetch_and(!mask, Ordering::SeqCst);
    }
}

pub struct SimNvic {
    enabled: AtomicU64,
    pending: AtomicU64,
    priorities: [AtomicU8; SIM_VECTORS],
    max_priority: AtomicU8,
}

impl SimNvic {
    pub const fn new() -> Self {
        Self {
            enabled: AtomicU64::new(0),
            pending: AtomicU64::new(0),
            priorities: [const { AtomicU8::new(0) }; SIM_VECTORS],
            max_priority: AtomicU8::new(Priority::MAX),
        }
    }

    fn bit(irq: IrqNumber) -> IrqResult<u64> {
        if (irq as usize) < SIM_VECTORS {
            Ok(1 << irq)
        } else {
            Err(IrqError::InvalidArgument)
        }
    }

    pub fn is_enabled(&self, irq: IrqNumber) -> bool {
        Self::bit(irq).is_ok_and(|bit| self.enabled.load(Ordering::SeqCst) & bit != 0)
    }

    /// Refuse priorities above `max`, as a core with few priority bits does.
    pub fn limit_priority(&self, max: Priority) {
        self.max_priority.store(max, Ordering::SeqCst);
    }

    pub fn pend(&self, irq: IrqNumber) {
        if let Ok(bit) = Self::bit(irq) {
            self.pending.fetch_or(bit, Ordering::SeqCst);
        }
    }
}

impl InterruptController for SimNvic {
    fn enable(&self, irq: IrqNumber) -> IrqResult<()> {
        self.enabled.fetch_or(Self::bit(irq)?, Ordering::SeqCst);
        Ok(())
    }

    fn disable(&self, irq: IrqNumber) -> IrqResult<()> {
        self.enabled.fetch_and(!Self::bit(irq)?, Ordering::SeqCst);
        Ok(())
    }

    fn is_pending(&self, irq: IrqNumber) -> bool {
        Self::bit(irq).is_ok_and(|bit| self.pending.load(Ordering::SeqCst) & bit != 0)
    }

    fn clear_pending(&self, irq: IrqNumber) -> IrqResult<()> {
        self.pending.fetch_and(!Self::bit(irq)?, Ordering::SeqCst);
        Ok(())
    }
}

impl PriorityInterruptController for SimNvic {
    fn set_priority(&self, irq: IrqNumber, priority: Priority) -> IrqResult<()> {
        Self::bit(irq)?;
        if priority > self.max_priority.load(Ordering::SeqCst) {
            return Err(IrqError::InvalidArgument);
        }
        self.priorities[irq as usize].store(priority, Ordering::SeqCst);
        Ok(())
    }

    fn priority(&self, irq: IrqNumber) -> Priority {
        self.priorities
            .get(irq as usize)
            .map_or(0, |p| p.load(Ordering::SeqCst))
    }
}

/// GPIO port with hooks for the reconfiguration window.
pub struct SimGpio {
    input: AtomicU32,
    int_en: AtomicU32,
    int_mod: AtomicU32,
    int_pol: AtomicU32,
    dual_edge: AtomicU32,
    configured: AtomicU32,
    status: AtomicU32,
    late: AtomicU32,
    inject: AtomicU32,
    fired: AtomicU32,
    failing: AtomicU32,
}

impl SimGpio {
    pub const fn new() -> Self {
        Self {
            input: AtomicU32::new(0),
            int_en: AtomicU32::new(0),
            int_mod: AtomicU32::new(0),
            int_pol: AtomicU32::new(0),
            dual_edge: AtomicU32::new(0),
            configured: AtomicU32::new(0),
            status: AtomicU32::new(0),
            late: AtomicU32::new(0),
            inject: AtomicU32::new(0),
            fired: AtomicU32::new(0),
            failing: AtomicU32::new(0),
        }
    }

    /// Assert status bits.
    pub fn raise(&self, mask: u32) {
        self.status.fetch_or(mask, Ordering::SeqCst);
    }

    /// Assert status bits right after the next status read.
    pub fn raise_after_read(&self, mask: u32) {
        self.late.fetch_or(mask, Ordering::SeqCst);
    }

    /// Assert the line's status bit while its trigger is being programmed.
    ///
    /// If the line's interrupt enable is set at that moment the event
    /// counts as fired, see [`SimGpio::fired_during_configure`].
    pub fn inject_on_configure(&self, mask: u32) {
        self.inject.fetch_or(mask, Ordering::SeqCst);
    }

    pub fn fired_during_configure(&self) -> u32 {
        self.fired.load(Ordering::SeqCst)
    }

    /// Make trigger programming of these lines fail with `Busy`.
    pub fn fail_configure(&self, mask: u32) {
        self.failing.fetch_or(mask, Ordering::SeqCst);
    }

    pub fn is_input(&self, line: Line) -> bool {
        self.input.load(Ordering::SeqCst) & line.mask() != 0
    }

    /// Trigger mode programmed in the registers, if any.
    pub fn trigger(&self, line: Line) -> Option<TriggerMode> {
        let has = |reg: &AtomicU32| reg.load(Ordering::SeqCst) & line.mask() != 0;
        has(&self.configured).then(|| {
            TriggerBits {
                edge: has(&self.int_mod),
                active_low: has(&self.int_pol),
                dual_edge: has(&self.dual_edge),
            }
            .mode()
        })
    }
}

impl GpioIrqLines for SimGpio {
    fn set_input(&self, line: Line) -> IrqResult<()> {
        set_bit(&self.input, line.mask(), true);
        Ok(())
    }

    fn configure_trigger(&self, line: Line, mode: TriggerMode) -> IrqResult<()> {
        let bit = line.mask();
        if self.failing.load(Ordering::SeqCst) & bit != 0 {
            return Err(IrqError::Busy);
        }

        if self.inject.fetch_and(!bit, Ordering::SeqCst) & bit != 0 {
            self.raise(bit);
            if self.int_en.load(Ordering::SeqCst) & bit != 0 {
                self.fired.fetch_or(bit, Ordering::SeqCst);
            }
        }

        let bits = TriggerBits::from(mode);
        set_bit(&self.int_mod, bit, bits.edge);
        set_bit(&self.int_pol, bit, bits.active_low);
        set_bit(&self.dual_edge, bit, bits.dual_edge);
        set_bit(&self.configured, bit, true);
        Ok(())
    }

    fn set_irq_enabled(&self, line: Line, enabled: bool) -> IrqResult<()> {
        set_bit(&self.int_en, line.mask(), enabled);
        Ok(())
    }

    fn irq_enabled(&self, line: Line) -> bool {
        self.int_en.load(Ordering::SeqCst) & line.mask() != 0
    }

    fn read_status(&self) -> u32 {
        let status = self.status.load(Ordering::SeqCst);
        let late = self.late.swap(0, Ordering::SeqCst);
        self.raise(late);
        status
    }

    fn clear_status(&self, mask: u32) {
        self.status.fetch_and(!mask, Ordering::SeqCst);
    }
}

pub struct SimRtc {
    ctrl: AtomicU32,
    deadlines: [AtomicU32; 2],
    dropped_on_clear: AtomicU32,
    busy: AtomicBool,
}

impl SimRtc {
    pub const fn new() -> Self {
        Self {
            ctrl: AtomicU32::new(0),
            deadlines: [const { AtomicU32::new(0) }; 2],
            dropped_on_clear: AtomicU32::new(0),
            busy: AtomicBool::new(false),
        }
    }

    /// Set control bits, flags or enables alike.
    pub fn set(&self, bits: RtcCtrl) {
        self.ctrl.fetch_or(bits.bits(), Ordering::SeqCst);
    }

    /// Also clear `bits` the next time flags are cleared.
    pub fn drop_on_clear(&self, bits: RtcCtrl) {
        self.dropped_on_clear.fetch_or(bits.bits(), Ordering::SeqCst);
    }

    /// Refuse alarm writes with `Busy`.
    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    pub fn deadline(&self, alarm: RtcAlarm) -> u32 {
        self.deadlines[alarm as usize].load(Ordering::SeqCst)
    }

    pub fn is_armed(&self, alarm: RtcAlarm) -> bool {
        self.read_ctrl().contains(alarm.enable_bit())
    }
}

impl RtcAlarms for SimRtc {
    fn read_ctrl(&self) -> RtcCtrl {
        RtcCtrl::from_bits_retain(self.ctrl.load(Ordering::SeqCst))
    }

    fn clear_ctrl(&self, bits: RtcCtrl) {
        let dropped = self.dropped_on_clear.swap(0, Ordering::SeqCst);
        self.ctrl.fetch_and(!(bits.bits() | dropped), Ordering::SeqCst);
    }

    fn enable_alarm(&self, alarm: RtcAlarm, deadline: u32) -> IrqResult<()> {
        if self.busy.load(Ordering::SeqCst) {
            return Err(IrqError::Busy);
        }
        self.deadlines[alarm as usize].store(deadline, Ordering::SeqCst);
        self.set(alarm.enable_bit());
        Ok(())
    }

    fn disable_alarm(&self, alarm: RtcAlarm) -> IrqResult<()> {
        self.ctrl
            .fetch_and(!alarm.enable_bit().bits(), Ordering::SeqCst);
        Ok(())
    }
}

pub struct SimUart {
    int_fl: AtomicU32,
    int_en: AtomicU32,
}

impl SimUart {
    pub const fn new() -> Self {
        Self {
            int_fl: AtomicU32::new(0),
            int_en: AtomicU32::new(0),
        }
    }

    pub fn raise(&self, flags: UartIntFlags) {
        self.int_fl.fetch_or(flags.bits(), Ordering::SeqCst);
    }

    pub fn set_int_enabled(&self, flags: UartIntFlags) {
        self.int_en.store(flags.bits(), Ordering::SeqCst);
    }
}

impl UartIrq for SimUart {
    fn read_int_flags(&self) -> u32 {
        self.int_fl.load(Ordering::SeqCst)
    }

    fn clear_int_flags(&self, mask: u32) {
        self.int_fl.fetch_and(!mask, Ordering::SeqCst);
    }

    fn int_enabled(&self) -> u32 {
        self.int_en.load(Ordering::SeqCst)
    }
}

pub struct SimBoard {
    pub nvic: SimNvic,
    pub gpio: SimGpio,
    pub rtc: SimRtc,
    pub uarts: [SimUart; N_PORTS],
}

impl SimBoard {
    pub const fn new() -> Self {
        Self {
            nvic: SimNvic::new(),
            gpio: SimGpio::new(),
            rtc: SimRtc::new(),
            uarts: [const { SimUart::new() }; N_PORTS],
        }
    }
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl IrqBoard for SimBoard {
    type Nvic = SimNvic;
    type Gpio = SimGpio;
    type Rtc = SimRtc;
    type Uart = SimUart;

    fn nvic(&self) -> &SimNvic {
        &self.nvic
    }

    fn gpio(&self) -> &SimGpio {
        &self.gpio
    }

    fn rtc(&self) -> &SimRtc {
        &self.rtc
    }

    fn uart(&self, port: Port) -> &SimUart {
        &self.uarts[port.index()]
    }

    fn vector(&self, demux: Demux) -> IrqNumber {
        match demux {
            Demux::Gpio => GPIO_IRQN,
            Demux::Rtc => RTC_IRQN,
            Demux::Uart(port) if port.number() == 0 => UART0_IRQN,
            Demux::Uart(_) => UART1_IRQN,
        }
    }
}

pub const RECORD_CAPACITY: usize = 32;

struct RecordLog {
    indices: [u32; RECORD_CAPACITY],
    len: usize,
    last_config: Option<SourceConfig>,
}

/// Callback sink that records every invocation it receives.
///
/// Intended to live in a `static` so its address can be the callback
/// context.
pub struct Recorder {
    log: SpinLock<RecordLog>,
}

/// Snapshot of the recorded indices.
#[derive(Debug, Clone, Copy)]
pub struct Hits {
    indices: [u32; RECORD_CAPACITY],
    len: usize,
}

impl Deref for Hits {
    type Target = [u32];

    fn deref(&self) -> &[u32] {
        &self.indices[..self.len]
    }
}

impl Recorder {
    pub const fn new() -> Self {
        Self {
            log: SpinLock::new(RecordLog {
                indices: [0; RECORD_CAPACITY],
                len: 0,
                last_config: None,
            }),
        }
    }

    /// Callback entry that records into `self`.
    pub fn desc(&'static self, config: SourceConfig) -> CallbackDesc {
        CallbackDesc::new(Self::record, self as *const Self as usize, config)
    }

    pub fn indices(&self) -> Hits {
        let log = self.log.lock();
        Hits {
            indices: log.indices,
            len: log.len,
        }
    }

    pub fn last_config(&self) -> Option<SourceConfig> {
        self.log.lock().last_config
    }

    fn record(context: usize, index: u32, config: &SourceConfig) {
        // SAFETY: `context` comes from `Recorder::desc`, which only accepts
        // a `&'static Recorder`.
        let recorder = unsafe { &*(context as *const Recorder) };
        let mut log = recorder.log.lock();
        if log.len < RECORD_CAPACITY {
            let len = log.len;
            log.indices[len] = index;
            log.len += 1;
        }
        log.last_config = Some(*config);
    }
}
