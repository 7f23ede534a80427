//! Core Types für den BP5758D
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

use rgb::RGB8;

use crate::logic::{convert_current, scale_to_uint10, unpack_level};

/// Anzahl der Ausgänge des Chips (OUT1..OUT5)
pub const CHANNEL_COUNT: usize = 5;

/// Länge eines Frames in Bytes
pub const FRAME_LEN: usize = 17;

/// Maximaler 10-Bit Helligkeitswert
pub const MAX_LEVEL: u16 = 0x3FF;

// Adress-Bytes: 0b10MM_0000, MM = Modus
pub const ADDR_SLEEP: u8 = 0x80;
pub const ADDR_OUT: u8 = 0x90;
pub const ADDR_OUT_3CH: u8 = 0xA0;
pub const ADDR_OUT_2CH: u8 = 0xB0;

/// Enable-Byte: OUT1..OUT5 aktiv
pub const ENABLE_OUTPUTS_ALL: u8 = 0x1F;

/// Settle-Delay nach jeder Flanke in Mikrosekunden
pub const DEFAULT_SETTLE_DELAY_US: u32 = 1;

/// Rolle einer Bus-Leitung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinRole {
    Clock,
    Data,
}

impl fmt::Display for PinRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinRole::Clock => f.write_str("BP5758D_CLK"),
            PinRole::Data => f.write_str("BP5758D_DAT"),
        }
    }
}

/// Strom-Code im Format des Chips
///
/// Wird nur über [`CurrentCode::from_milliamps`] erzeugt, enthält also immer
/// den bereits umgerechneten Wert, nie die Eingabe in mA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CurrentCode(u8);

impl CurrentCode {
    pub const ZERO: CurrentCode = CurrentCode(0);
    pub const MA_14: CurrentCode = CurrentCode(0x0E);

    /// Rechnet eine Strom-Angabe in mA in den Chip-Code um.
    ///
    /// Gibt `None` zurück, wenn der Code nicht in ein Byte passt.
    pub fn from_milliamps(milliamps: u8) -> Option<Self> {
        convert_current(milliamps).map(Self)
    }

    pub const fn code(self) -> u8 {
        self.0
    }
}

/// Maximalströme der beiden Kanalgruppen (RGB und CW)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CurrentLimits {
    pub rgb: CurrentCode,
    pub cw: CurrentCode,
}

impl Default for CurrentLimits {
    fn default() -> Self {
        Self {
            rgb: CurrentCode::MA_14,
            cw: CurrentCode::MA_14,
        }
    }
}

/// Zuordnung physischer Ausgang → logischer Farbkanal
///
/// `remap.source(i)` ist der Index im RGBCW-Eingang, der Ausgang `i` speist.
/// Manche Lampen sind RGBCW verdrahtet, andere GBRCW usw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "[u8; 5]", into = "[u8; 5]"))]
pub struct ChannelRemap([u8; CHANNEL_COUNT]);

impl ChannelRemap {
    pub const IDENTITY: ChannelRemap = ChannelRemap([0, 1, 2, 3, 4]);

    /// Erstellt eine Zuordnung, jeder Index muss kleiner als 5 sein
    pub fn new(indices: [u8; CHANNEL_COUNT]) -> Option<Self> {
        if indices.iter().all(|&i| (i as usize) < CHANNEL_COUNT) {
            Some(Self(indices))
        } else {
            None
        }
    }

    pub fn source(&self, slot: usize) -> usize {
        self.0[slot] as usize
    }

    pub fn indices(&self) -> [u8; CHANNEL_COUNT] {
        self.0
    }
}

impl Default for ChannelRemap {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TryFrom<[u8; CHANNEL_COUNT]> for ChannelRemap {
    type Error = InvalidRemap;

    fn try_from(indices: [u8; CHANNEL_COUNT]) -> Result<Self, Self::Error> {
        Self::new(indices).ok_or(InvalidRemap)
    }
}

impl From<ChannelRemap> for [u8; CHANNEL_COUNT] {
    fn from(remap: ChannelRemap) -> Self {
        remap.0
    }
}

/// Fehler bei einer ungültigen Kanal-Zuordnung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidRemap;

impl fmt::Display for InvalidRemap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("channel remap index out of range (0..=4)")
    }
}

/// 10-Bit Helligkeiten der fünf physischen Ausgänge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelLevels([u16; CHANNEL_COUNT]);

impl ChannelLevels {
    /// Erstellt Helligkeiten, Werte über 1023 werden begrenzt
    pub fn new(levels: [u16; CHANNEL_COUNT]) -> Self {
        Self(levels.map(|level| level.min(MAX_LEVEL)))
    }

    /// Skaliert RGBCW-Werte (0-255) auf 10 Bit, in Ausgangs-Reihenfolge
    pub fn from_rgbcw(rgbcw: &[f32; CHANNEL_COUNT], remap: &ChannelRemap) -> Self {
        Self(core::array::from_fn(|slot| {
            scale_to_uint10(rgbcw[remap.source(slot)])
        }))
    }

    pub fn get(&self, slot: usize) -> u16 {
        self.0[slot]
    }

    pub fn as_array(&self) -> &[u16; CHANNEL_COUNT] {
        &self.0
    }

    pub fn is_all_zero(&self) -> bool {
        self.0.iter().all(|&level| level == 0)
    }
}

/// Ausgangs-Modus, bestimmt Adresse und aktive Stromgruppen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputMode {
    /// Alle Kanäle aus → Chip in den Sleep-Modus
    Sleep,
    /// Nur OUT4/OUT5 (CW)
    TwoChannel,
    /// Nur OUT1..OUT3 (RGB)
    ThreeChannel,
    /// Alle fünf Ausgänge
    FiveChannel,
}

impl OutputMode {
    pub fn address(self) -> u8 {
        match self {
            OutputMode::Sleep => ADDR_SLEEP,
            OutputMode::TwoChannel => ADDR_OUT_2CH,
            OutputMode::ThreeChannel => ADDR_OUT_3CH,
            OutputMode::FiveChannel => ADDR_OUT,
        }
    }
}

/// Ein Bus-Frame: `[address][enable][current x5][data x10]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame([u8; FRAME_LEN]);

impl Frame {
    pub(crate) const ADDRESS: usize = 0;
    pub(crate) const ENABLE: usize = 1;
    pub(crate) const CURRENT: usize = 2;
    pub(crate) const DATA: usize = 7;

    /// Frame mit Adresse, Rest Null
    pub fn zeroed(address: u8) -> Self {
        let mut bytes = [0; FRAME_LEN];
        bytes[Self::ADDRESS] = address;
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; FRAME_LEN]) -> Self {
        Self(bytes)
    }

    pub fn address(&self) -> u8 {
        self.0[Self::ADDRESS]
    }

    pub fn enable(&self) -> u8 {
        self.0[Self::ENABLE]
    }

    /// Strom-Bytes für OUT1..OUT5
    pub fn currents(&self) -> &[u8] {
        &self.0[Self::CURRENT..Self::DATA]
    }

    /// Dekodiert die 10-Bit Helligkeit von Ausgang `slot`
    pub fn level(&self, slot: usize) -> u16 {
        let i = Self::DATA + 2 * slot;
        unpack_level(self.0[i], self.0[i + 1])
    }

    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.0
    }

    pub(crate) fn bytes_mut(&mut self) -> &mut [u8; FRAME_LEN] {
        &mut self.0
    }
}

/// Treiber-Konfiguration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Wartezeit nach jeder Flanke (µs)
    pub settle_delay_us: u32,
    /// Start-Ströme für RGB und CW
    pub currents: CurrentLimits,
    /// Vorkonfigurierte Kanal-Zuordnung, `None` = Identität beim Init
    pub remap: Option<ChannelRemap>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            settle_delay_us: DEFAULT_SETTLE_DELAY_US,
            currents: CurrentLimits::default(),
            remap: None,
        }
    }
}

/// RGBCW-Farbe aus einem Hex-String (`FF00000000`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgbcw {
    pub rgb: RGB8,
    pub cold: u8,
    pub warm: u8,
}

impl Rgbcw {
    /// Kanalwerte in logischer R, G, B, C, W Reihenfolge
    pub fn to_channels(self) -> [f32; CHANNEL_COUNT] {
        [
            f32::from(self.rgb.r),
            f32::from(self.rgb.g),
            f32::from(self.rgb.b),
            f32::from(self.cold),
            f32::from(self.warm),
        ]
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for ChannelLevels {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "ChannelLevels [{}, {}, {}, {}, {}]",
            self.0[0],
            self.0[1],
            self.0[2],
            self.0[3],
            self.0[4]
        )
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "Frame {=[u8]:#x}", self.0.as_slice())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Rgbcw {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "Rgbcw {{ rgb: ({}, {}, {}), c: {}, w: {} }}",
            self.rgb.r,
            self.rgb.g,
            self.rgb.b,
            self.cold,
            self.warm
        )
    }
}
