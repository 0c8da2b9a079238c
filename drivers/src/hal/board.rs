//! Board-level bundle of interrupt collaborators.

use super::gpio::GpioIrqLines;
use super::interrupt::{IrqNumber, PriorityInterruptController};
use super::rtc::RtcAlarms;
use super::serial::UartIrq;
use crate::irq::source::Port;
use crate::irq::vectors::Demux;

/// Everything the interrupt manager needs from a board.
///
/// A board owns one vector-level controller, one GPIO port with
/// [`N_LINES`](crate::irq::source::N_LINES) interrupt lines, one RTC and
/// [`N_PORTS`](crate::irq::source::N_PORTS) UARTs.
pub trait IrqBoard {
    type Nvic: PriorityInterruptController;
    type Gpio: GpioIrqLines;
    type Rtc: RtcAlarms;
    type Uart: UartIrq;

    fn nvic(&self) -> &Self::Nvic;

    fn gpio(&self) -> &Self::Gpio;

    fn rtc(&self) -> &Self::Rtc;

    fn uart(&self, port: Port) -> &Self::Uart;

    /// Hardware vector number serviced by a demultiplexer.
    fn vector(&self, demux: Demux) -> IrqNumber;
}
