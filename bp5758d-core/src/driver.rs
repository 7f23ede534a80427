//! BP5758D Treiber
//!
//! Hält den Kanal- und Strom-Zustand und schickt ihn als Frame über den
//! [`SoftBus`]. Ersetzt die globalen Variablen durch ein eigenes Objekt.

use embedded_hal::delay::DelayNs;

use crate::command::{ALIAS_LED_MAP, CMD_MAP, COMMANDS};
use crate::logic::{encode_frame, sleep_frames};
use crate::traits::{BusPin, CommandRegistry, DriverError, PinResolver};
use crate::transport::{BusPins, SoftBus};
use crate::types::{
    CHANNEL_COUNT, ChannelLevels, ChannelRemap, CurrentCode, CurrentLimits, DriverConfig,
    PinRole,
};

/// Treiber für einen BP5758D an zwei Bit-Bang-Leitungen
///
/// # Ablauf
/// 1. [`Bp5758d::new`] mit Delay und Konfiguration
/// 2. [`Bp5758d::initialize`] bindet die Pins und registriert die Kommandos
/// 3. [`Bp5758d::write_color`] / [`Bp5758d::set_current`] im Betrieb
pub struct Bp5758d<P, D> {
    bus: SoftBus<P, D>,
    levels: ChannelLevels,
    currents: CurrentLimits,
    remap: Option<ChannelRemap>,
    last_rgbcw: [f32; CHANNEL_COUNT],
}

impl<P: BusPin, D: DelayNs> Bp5758d<P, D> {
    pub fn new(delay: D, config: DriverConfig) -> Self {
        Self {
            bus: SoftBus::new(delay, config.settle_delay_us),
            levels: ChannelLevels::default(),
            currents: config.currents,
            remap: config.remap,
            last_rgbcw: [0.0; CHANNEL_COUNT],
        }
    }

    /// Initialisiert den Treiber
    ///
    /// Setzt die Identitäts-Zuordnung (nur falls keine gesetzt ist), löst die
    /// Pin-Rollen auf, registriert die Kommandos und bringt den Bus in den
    /// Ruhezustand.
    ///
    /// # Fehlerbehandlung
    /// Gibt `DriverError::PinNotAssigned` zurück wenn eine Rolle fehlt. Die
    /// Kommandos sind dann trotzdem registriert, jeder Transfer liefert aber
    /// `DriverError::NotInitialized`.
    pub fn initialize<R, C>(
        &mut self,
        resolver: &mut R,
        registry: &mut C,
    ) -> Result<(), DriverError>
    where
        R: PinResolver<Pin = P>,
        C: CommandRegistry,
    {
        if self.remap.is_none() {
            self.remap = Some(ChannelRemap::IDENTITY);
        }

        let clock = resolver.find_pin_for_role(PinRole::Clock);
        let data = resolver.find_pin_for_role(PinRole::Data);

        for info in COMMANDS.iter() {
            registry.register_command(info.name, info.args, info.description);
        }
        registry.create_alias(ALIAS_LED_MAP, CMD_MAP);

        let (clock, data) = match (clock, data) {
            (Some(clock), Some(data)) => (clock, data),
            (None, _) => return Err(Self::missing(PinRole::Clock)),
            (_, None) => return Err(Self::missing(PinRole::Data)),
        };
        self.bus.bind(BusPins::new(clock, data));

        #[cfg(feature = "defmt")]
        defmt::info!(
            "BP5758D initialized (settle {} us, currents {})",
            self.bus.settle_us(),
            self.currents
        );

        Ok(())
    }

    fn missing(role: PinRole) -> DriverError {
        #[cfg(feature = "defmt")]
        defmt::warn!("BP5758D: no pin assigned for role {}", role);

        DriverError::PinNotAssigned(role)
    }

    /// Schreibt RGBCW-Werte (0-255) über die Kanal-Zuordnung auf den Chip
    pub fn write_color(&mut self, rgbcw: &[f32; CHANNEL_COUNT]) -> Result<(), DriverError> {
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Write Requested: {} {} {} {} {}",
            rgbcw[0],
            rgbcw[1],
            rgbcw[2],
            rgbcw[3],
            rgbcw[4]
        );

        self.last_rgbcw = *rgbcw;
        let remap = self.remap.unwrap_or_default();
        self.levels = ChannelLevels::from_rgbcw(rgbcw, &remap);
        self.flush()
    }

    /// Schreibt 10-Bit Werte direkt, in Ausgangs-Reihenfolge (ohne Zuordnung)
    pub fn write_levels(&mut self, levels: ChannelLevels) -> Result<(), DriverError> {
        self.levels = levels;
        self.flush()
    }

    /// Sendet den aktuellen Zustand an den Chip
    ///
    /// Sind alle Kanäle 0, gehen zwei Frames raus (aus + Sleep).
    pub fn flush(&mut self) -> Result<(), DriverError> {
        #[cfg(feature = "defmt")]
        defmt::debug!("Writing to Lamp: {}", self.levels);

        if self.levels.is_all_zero() {
            for frame in sleep_frames() {
                self.bus.write_buffer(frame.as_bytes())?;
            }
            return Ok(());
        }

        let frame = encode_frame(&self.levels, &self.currents);
        self.bus.write_buffer(frame.as_bytes())
    }

    /// Setzt die Maximalströme (mA) für RGB und CW und sendet sofort neu
    ///
    /// # Fehlerbehandlung
    /// `DriverError::CurrentOutOfRange` wenn ein Wert keinen gültigen Code
    /// ergibt; es wird dann nichts geändert.
    pub fn set_current(&mut self, rgb_milliamps: u8, cw_milliamps: u8) -> Result<(), DriverError> {
        let rgb = CurrentCode::from_milliamps(rgb_milliamps)
            .ok_or(DriverError::CurrentOutOfRange(rgb_milliamps))?;
        let cw = CurrentCode::from_milliamps(cw_milliamps)
            .ok_or(DriverError::CurrentOutOfRange(cw_milliamps))?;

        self.currents = CurrentLimits { rgb, cw };
        self.flush()
    }

    /// Setzt die Kanal-Zuordnung und schreibt die letzte Farbe neu
    ///
    /// "Letzte Farbe" ist der letzte [`Bp5758d::write_color`] Aufruf. Werte aus
    /// [`Bp5758d::write_levels`] zählen nicht; ohne vorherige Farbe gehen die
    /// Sleep-Frames raus.
    pub fn set_remap(&mut self, remap: ChannelRemap) -> Result<(), DriverError> {
        self.remap = Some(remap);
        let rgbcw = self.last_rgbcw;
        self.write_color(&rgbcw)
    }

    pub fn levels(&self) -> &ChannelLevels {
        &self.levels
    }

    pub fn currents(&self) -> CurrentLimits {
        self.currents
    }

    pub fn remap(&self) -> Option<ChannelRemap> {
        self.remap
    }

    pub fn is_initialized(&self) -> bool {
        self.bus.is_bound()
    }
}
