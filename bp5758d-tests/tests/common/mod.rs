//! Mocks für die Integration Tests
//!
//! Alle Pins und das Delay schreiben in einen gemeinsamen Trace, aus dem
//! `decode_frames()` die gesendeten Bytes zurückgewinnt.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use bp5758d_core::{
    Bp5758d, BusPin, CommandRegistry, DriverConfig, DriverError, PinResolver, PinRole,
};
use embedded_hal::delay::DelayNs;

// ============================================================================
// Trace
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Output(PinRole),
    Input(PinRole),
    Level(PinRole, bool),
    DelayNs(u32),
}

pub type Trace = Rc<RefCell<Vec<Event>>>;

pub fn new_trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

// ============================================================================
// Mock Pin / Delay
// ============================================================================

pub struct RecordingPin {
    role: PinRole,
    trace: Trace,
}

impl RecordingPin {
    pub fn new(role: PinRole, trace: &Trace) -> Self {
        Self {
            role,
            trace: trace.clone(),
        }
    }
}

impl BusPin for RecordingPin {
    fn set_output(&mut self) {
        self.trace.borrow_mut().push(Event::Output(self.role));
    }

    fn set_input(&mut self) {
        self.trace.borrow_mut().push(Event::Input(self.role));
    }

    fn set_level(&mut self, high: bool) {
        self.trace.borrow_mut().push(Event::Level(self.role, high));
    }
}

/// Delay ohne echte Wartezeit, zeichnet nur auf
pub struct MockDelay {
    trace: Trace,
}

impl MockDelay {
    pub fn new(trace: &Trace) -> Self {
        Self {
            trace: trace.clone(),
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.trace.borrow_mut().push(Event::DelayNs(ns));
    }
}

// ============================================================================
// Mock Resolver / Registry
// ============================================================================

pub struct MockResolver {
    pub clock: Option<RecordingPin>,
    pub data: Option<RecordingPin>,
    pub lookups: Vec<PinRole>,
}

impl MockResolver {
    pub fn new(trace: &Trace) -> Self {
        Self {
            clock: Some(RecordingPin::new(PinRole::Clock, trace)),
            data: Some(RecordingPin::new(PinRole::Data, trace)),
            lookups: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            clock: None,
            data: None,
            lookups: Vec::new(),
        }
    }
}

impl PinResolver for MockResolver {
    type Pin = RecordingPin;

    fn find_pin_for_role(&mut self, role: PinRole) -> Option<RecordingPin> {
        self.lookups.push(role);
        match role {
            PinRole::Clock => self.clock.take(),
            PinRole::Data => self.data.take(),
        }
    }
}

#[derive(Default)]
pub struct MockRegistry {
    pub commands: Vec<&'static str>,
    pub aliases: Vec<(&'static str, &'static str)>,
}

impl CommandRegistry for MockRegistry {
    fn register_command(
        &mut self,
        name: &'static str,
        _args: &'static str,
        _description: &'static str,
    ) {
        self.commands.push(name);
    }

    fn create_alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.push((alias, target));
    }
}

// ============================================================================
// Setup Helpers
// ============================================================================

pub type TestDriver = Bp5758d<RecordingPin, MockDelay>;

/// Treiber mit beiden Pins, initialisiert, Trace danach geleert
pub fn init_driver(config: DriverConfig) -> (TestDriver, Trace) {
    let trace = new_trace();
    let mut driver = Bp5758d::new(MockDelay::new(&trace), config);
    let mut resolver = MockResolver::new(&trace);
    let mut registry = MockRegistry::default();

    let result: Result<(), DriverError> = driver.initialize(&mut resolver, &mut registry);
    result.unwrap();

    trace.borrow_mut().clear();
    (driver, trace)
}

// ============================================================================
// Bus Decoder
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedFrame {
    pub bytes: Vec<u8>,
    pub acks: usize,
}

/// Rekonstruiert die Frames aus den aufgezeichneten Flanken
///
/// - Bits werden an der fallenden Clock-Flanke gelesen (Data als Ausgang)
/// - fallende Clock-Flanke mit Data als Eingang = ACK-Takt
/// - Data Low gesetzt bei Clock High = Start, die nächste fallende Flanke gehört dazu
/// - Data High gesetzt bei Clock High = Stop, Frame fertig
///
/// Nach `pre_init` (beide Low) ist der Start stumm, das passt ebenfalls.
pub fn decode_frames(trace: &Trace) -> Vec<DecodedFrame> {
    let mut frames = Vec::new();
    let mut clock = false;
    let mut data = false;
    let mut data_input = false;
    let mut in_start = false;
    let mut bits: Vec<bool> = Vec::new();
    let mut acks = 0;

    for event in trace.borrow().iter() {
        match *event {
            Event::Input(PinRole::Data) => data_input = true,
            Event::Output(PinRole::Data) => data_input = false,
            Event::Level(PinRole::Clock, high) => {
                let falling = clock && !high;
                clock = high;
                if !falling {
                    continue;
                }
                if in_start {
                    in_start = false;
                } else if data_input {
                    acks += 1;
                } else {
                    bits.push(data);
                }
            }
            Event::Level(PinRole::Data, high) => {
                data = high;
                if !clock {
                    continue;
                }
                if !high {
                    in_start = true;
                    bits.clear();
                    acks = 0;
                } else {
                    assert_eq!(bits.len() % 8, 0, "frame ends mid-byte");
                    let bytes = bits
                        .chunks(8)
                        .map(|byte| byte.iter().fold(0u8, |acc, &bit| (acc << 1) | bit as u8))
                        .collect();
                    frames.push(DecodedFrame { bytes, acks });
                    bits.clear();
                    acks = 0;
                }
            }
            _ => {}
        }
    }

    frames
}

/// Zählt alle Level-Wechsel und Delays im Trace
pub fn count_levels_and_delays(trace: &Trace) -> (usize, usize) {
    let events = trace.borrow();
    let levels = events.iter().filter(|e| matches!(e, Event::Level(..))).count();
    let delays = events.iter().filter(|e| matches!(e, Event::DelayNs(_))).count();
    (levels, delays)
}
