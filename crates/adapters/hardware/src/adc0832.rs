//! ADC0832 8-bit converter, bit-banged over three GPIO lines.
//!
//! One conversion clocks out a start bit, the single-ended mode bit and
//! the channel bit, then reads the result twice: MSB first, then LSB
//! first. The two frames must agree.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use champlain_app::ports::SoundSensor;
use champlain_domain::error::{MalformedReading, SensorError};

use crate::error::HardwareError;
use crate::gpio::{Direction, Line};

/// Half clock period.
const HALF_PERIOD: Duration = Duration::from_micros(2);

/// Driver for one ADC0832 channel.
#[derive(Debug)]
pub struct Adc0832<L> {
    cs: L,
    clk: L,
    dio: L,
    channel: u8,
}

impl<L: Line> Adc0832<L> {
    /// # Errors
    ///
    /// Returns [`HardwareError::InvalidChannel`] unless `channel` is 0 or 1.
    pub fn new(cs: L, clk: L, dio: L, channel: u8) -> Result<Self, HardwareError> {
        if channel > 1 {
            return Err(HardwareError::InvalidChannel(channel));
        }
        Ok(Self {
            cs,
            clk,
            dio,
            channel,
        })
    }

    /// Run one conversion. Blocks for the duration of the transfer.
    ///
    /// The chip is deselected and the data line returned to output on
    /// every path, including failures.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::Driver`] on a GPIO failure and
    /// [`MalformedReading::Mismatch`] when the two frames disagree.
    pub fn read_blocking(&mut self) -> Result<u8, SensorError> {
        let result = self.transfer();
        let released = self.release();

        let (msb, lsb) = result?;
        released?;
        if msb == lsb {
            Ok(msb)
        } else {
            Err(SensorError::Malformed(MalformedReading::Mismatch {
                first: msb,
                second: lsb,
            }))
        }
    }

    fn transfer(&mut self) -> Result<(u8, u8), HardwareError> {
        self.dio.set_direction(Direction::OutLow)?;
        self.cs.write(false)?;

        // start bit, then SGL/DIF = 1 (single-ended)
        self.clock_out(true)?;
        self.clock_out(true)?;
        // ODD/SIGN selects the channel
        self.clock_out(self.channel == 1)?;

        self.clk.write(false)?;
        self.dio.write(true)?;
        pause();

        let mut msb = 0u8;
        for _ in 0..8 {
            self.clk.write(true)?;
            pause();
            self.clk.write(false)?;
            pause();
            self.dio.set_direction(Direction::In)?;
            msb = (msb << 1) | u8::from(self.dio.read()?);
        }

        let mut lsb = 0u8;
        for bit in 0..8 {
            lsb |= u8::from(self.dio.read()?) << bit;
            self.clk.write(true)?;
            pause();
            self.clk.write(false)?;
            pause();
        }

        Ok((msb, lsb))
    }

    fn clock_out(&mut self, bit: bool) -> Result<(), HardwareError> {
        self.clk.write(false)?;
        self.dio.write(bit)?;
        pause();
        self.clk.write(true)?;
        pause();
        Ok(())
    }

    fn release(&mut self) -> Result<(), HardwareError> {
        let deselect = self.cs.write(true);
        let restore = self.dio.set_direction(Direction::OutLow);
        deselect.and(restore)
    }
}

fn pause() {
    std::thread::sleep(HALF_PERIOD);
}

/// Microphone on one ADC0832 channel.
///
/// Conversions run on the blocking pool; the mutex keeps them from
/// interleaving on the bus.
#[derive(Debug)]
pub struct AdcMicrophone<L> {
    adc: Arc<Mutex<Adc0832<L>>>,
}

impl<L: Line + 'static> AdcMicrophone<L> {
    #[must_use]
    pub fn new(adc: Adc0832<L>) -> Self {
        Self {
            adc: Arc::new(Mutex::new(adc)),
        }
    }
}

impl<L: Line + 'static> SoundSensor for AdcMicrophone<L> {
    async fn read_raw(&self) -> Result<u8, SensorError> {
        let adc = Arc::clone(&self.adc);
        tokio::task::spawn_blocking(move || {
            adc.lock()
                .unwrap_or_else(PoisonError::into_inner)
                .read_blocking()
        })
        .await
        .map_err(HardwareError::Task)?
    }
}
