//! Bit-Bang Transport über zwei GPIO-Leitungen
//!
//! Der BP5758D spricht ein I2C-ähnliches Protokoll, das aber kein echtes
//! I2C ist: das ACK-Bit wird nur abgetaktet, nie gelesen.

use embedded_hal::delay::DelayNs;

use crate::traits::{BusPin, DriverError};
use crate::types::PinRole;

/// Die beiden gebundenen Bus-Leitungen
pub struct BusPins<P> {
    clock: P,
    data: P,
}

impl<P: BusPin> BusPins<P> {
    pub fn new(clock: P, data: P) -> Self {
        Self { clock, data }
    }

    pub fn into_inner(self) -> (P, P) {
        (self.clock, self.data)
    }
}

/// Software-Bus mit festem Settle-Delay nach jeder Flanke
///
/// Ohne gebundene Pins liefert jeder Transfer `DriverError::NotInitialized`
/// und fasst keine Leitung an.
pub struct SoftBus<P, D> {
    pins: Option<BusPins<P>>,
    delay: D,
    settle_us: u32,
}

impl<P: BusPin, D: DelayNs> SoftBus<P, D> {
    pub fn new(delay: D, settle_us: u32) -> Self {
        Self {
            pins: None,
            delay,
            settle_us,
        }
    }

    /// Bindet die Pins und bringt den Bus in den Ruhezustand (beide Low)
    pub fn bind(&mut self, pins: BusPins<P>) {
        self.pins = Some(pins);
        self.pre_init();
    }

    pub fn is_bound(&self) -> bool {
        self.pins.is_some()
    }

    pub fn settle_us(&self) -> u32 {
        self.settle_us
    }

    pub fn inner_delay(&self) -> &D {
        &self.delay
    }

    /// Gibt Pins und Delay zurück (z.B. für Tests)
    pub fn release(self) -> (Option<BusPins<P>>, D) {
        (self.pins, self.delay)
    }

    /// Sendet den Puffer als eine Transaktion: Start, Bytes, Stop
    pub fn write_buffer(&mut self, bytes: &[u8]) -> Result<(), DriverError> {
        let Some(pins) = self.pins.as_mut() else {
            return Err(DriverError::NotInitialized);
        };
        let mut line = Line {
            pins,
            delay: &mut self.delay,
            settle_us: self.settle_us,
        };

        // Start
        line.set(PinRole::Data, false);
        line.set(PinRole::Clock, false);

        for &byte in bytes {
            line.write_byte(byte);
        }

        // Stop
        line.set(PinRole::Clock, true);
        line.set(PinRole::Data, true);

        Ok(())
    }

    fn pre_init(&mut self) {
        let Some(pins) = self.pins.as_mut() else {
            return;
        };
        let mut line = Line {
            pins,
            delay: &mut self.delay,
            settle_us: self.settle_us,
        };

        line.pins.data.set_output();
        line.set(PinRole::Data, false);
        line.pins.clock.set_output();
        line.set(PinRole::Clock, false);
    }
}

/// Geliehener Zugriff auf Pins + Delay für einen Transfer
struct Line<'a, P, D> {
    pins: &'a mut BusPins<P>,
    delay: &'a mut D,
    settle_us: u32,
}

impl<P: BusPin, D: DelayNs> Line<'_, P, D> {
    fn set(&mut self, which: PinRole, high: bool) {
        match which {
            PinRole::Clock => self.pins.clock.set_level(high),
            PinRole::Data => self.pins.data.set_level(high),
        }
        self.delay.delay_us(self.settle_us);
    }

    fn write_bit(&mut self, bit: bool) {
        self.set(PinRole::Data, bit);
        self.set(PinRole::Clock, true);
        self.set(PinRole::Clock, false);
    }

    fn write_byte(&mut self, byte: u8) {
        for shift in (0..8).rev() {
            self.write_bit((byte >> shift) & 1 == 1);
        }

        // ACK-Takt: Data freigeben, Antwort wird ignoriert
        self.pins.data.set_input();
        self.set(PinRole::Clock, true);
        self.set(PinRole::Clock, false);
        self.pins.data.set_output();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingPin {
        rising: usize,
        level: bool,
        input_switches: usize,
    }

    impl BusPin for CountingPin {
        fn set_output(&mut self) {}

        fn set_input(&mut self) {
            self.input_switches += 1;
        }

        fn set_level(&mut self, high: bool) {
            if high && !self.level {
                self.rising += 1;
            }
            self.level = high;
        }
    }

    #[derive(Default)]
    struct CountingDelay {
        calls: usize,
        total_ns: u64,
    }

    impl DelayNs for CountingDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.calls += 1;
            self.total_ns += u64::from(ns);
        }
    }

    #[test]
    fn test_unbound_bus_rejects_write() {
        let mut bus: SoftBus<CountingPin, _> = SoftBus::new(CountingDelay::default(), 1);
        assert!(!bus.is_bound());
        assert_eq!(bus.write_buffer(&[0xAA]), Err(DriverError::NotInitialized));
        assert_eq!(bus.inner_delay().calls, 0);
    }

    #[test]
    fn test_clock_pulses_per_byte() {
        let mut bus = SoftBus::new(CountingDelay::default(), 1);
        bus.bind(BusPins::new(CountingPin::default(), CountingPin::default()));
        bus.write_buffer(&[0x00, 0xFF]).unwrap();

        let (pins, _) = bus.release();
        let (clock, data) = pins.unwrap().into_inner();
        // 9 Takte pro Byte (8 Bits + ACK) + Stop
        assert_eq!(clock.rising, 2 * 9 + 1);
        assert_eq!(data.input_switches, 2);
    }

    #[test]
    fn test_delay_after_every_transition() {
        let mut bus = SoftBus::new(CountingDelay::default(), 3);
        bus.bind(BusPins::new(CountingPin::default(), CountingPin::default()));
        let after_init = bus.inner_delay().calls;
        assert_eq!(after_init, 2);

        bus.write_buffer(&[0x5A]).unwrap();
        // Start 2 + 8 Bits * 3 + ACK 2 + Stop 2
        let calls = bus.inner_delay().calls - after_init;
        assert_eq!(calls, 2 + 24 + 2 + 2);
        assert_eq!(bus.inner_delay().total_ns, (after_init + calls) as u64 * 3_000);
    }
}
