//! Recording mocks for driver tests
//!
//! Every mock appends to one shared log so tests can assert on the exact
//! interleaving of pin changes, bus writes and delays.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, InputPin, OutputPin};
use embedded_hal::spi::{ErrorKind, ErrorType as SpiErrorType, Operation, SpiDevice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Pin(&'static str, bool),
    Write(Vec<u8>),
    DelayUs(u32),
}

pub type Log = Rc<RefCell<Vec<Op>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct MockSpi {
    pub log: Log,
    /// Fail every transfer
    pub broken: bool,
}

impl SpiErrorType for MockSpi {
    type Error = ErrorKind;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), Self::Error> {
        if self.broken {
            return Err(ErrorKind::Other);
        }
        for op in operations {
            if let Operation::Write(bytes) = op {
                self.log.borrow_mut().push(Op::Write(bytes.to_vec()));
            }
        }
        Ok(())
    }
}

pub struct MockPin {
    pub name: &'static str,
    pub log: Log,
    pub level: Rc<RefCell<bool>>,
}

impl MockPin {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: log.clone(),
            level: Rc::new(RefCell::new(false)),
        }
    }
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        *self.level.borrow_mut() = false;
        self.log.borrow_mut().push(Op::Pin(self.name, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        *self.level.borrow_mut() = true;
        self.log.borrow_mut().push(Op::Pin(self.name, true));
        Ok(())
    }
}

impl InputPin for MockPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(*self.level.borrow())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!*self.level.borrow())
    }
}

pub struct MockDelay {
    pub log: Log,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Op::DelayUs(ns / 1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.log.borrow_mut().push(Op::DelayUs(us));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Op::DelayUs(ms * 1000));
    }
}

/// Total delay recorded, in microseconds
pub fn delayed_us(log: &Log) -> u64 {
    log.borrow()
        .iter()
        .map(|op| match op {
            Op::DelayUs(us) => *us as u64,
            _ => 0,
        })
        .sum()
}
