//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Hardware-Zugriff
//! ohne konkrete Implementierung.

use core::fmt;

use crate::types::PinRole;

/// Fehler-Typ für Treiber-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DriverError {
    /// Für die Rolle ist kein GPIO-Pin konfiguriert
    PinNotAssigned(PinRole),
    /// Bus hat keine gebundenen Pins (initialize() fehlgeschlagen oder nie aufgerufen)
    NotInitialized,
    /// Strom-Wert (mA) ergibt keinen gültigen Chip-Code
    CurrentOutOfRange(u8),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::PinNotAssigned(role) => write!(f, "no pin assigned for role {}", role),
            DriverError::NotInitialized => f.write_str("bus pins not initialized"),
            DriverError::CurrentOutOfRange(ma) => write!(f, "current {} out of range", ma),
        }
    }
}

/// Trait für eine einzelne Bus-Leitung (Clock oder Data)
///
/// Abstrahiert einen GPIO, der zwischen Ausgang und Eingang umgeschaltet
/// werden kann. Alle Operationen sind aus Sicht des Treibers unfehlbar.
///
/// # Implementierungen
/// - **Production:** FlexBusPin (ESP32 `Flex` GPIO)
/// - **Testing:** RecordingPin (zeichnet jede Flanke auf)
pub trait BusPin {
    /// Schaltet den Pin als Ausgang
    fn set_output(&mut self);

    /// Schaltet den Pin als Eingang (hochohmig)
    fn set_input(&mut self);

    /// Setzt den Ausgangspegel
    fn set_level(&mut self, high: bool);
}

impl<T: BusPin + ?Sized> BusPin for &mut T {
    fn set_output(&mut self) {
        T::set_output(self)
    }

    fn set_input(&mut self) {
        T::set_input(self)
    }

    fn set_level(&mut self, high: bool) {
        T::set_level(self, high)
    }
}

/// Trait für die Pin-Rollen-Auflösung
///
/// Liefert für eine Rolle den konfigurierten GPIO, oder `None` wenn
/// für die Rolle (noch) nichts zugewiesen ist.
pub trait PinResolver {
    type Pin: BusPin;

    fn find_pin_for_role(&mut self, role: PinRole) -> Option<Self::Pin>;
}

/// Trait für die Kommando-Registrierung
///
/// Der Treiber meldet hier beim Initialisieren seine Kommandos an.
/// Die eigentliche Ausführung läuft über [`crate::Command`].
pub trait CommandRegistry {
    fn register_command(
        &mut self,
        name: &'static str,
        args: &'static str,
        description: &'static str,
    );

    fn create_alias(&mut self, alias: &'static str, target: &'static str);
}
