// Bus-Pin Implementierungen für den ESP32-C6
//
// Bindet esp-hal `Flex` GPIOs an die Traits aus bp5758d-core.

use bp5758d_core::{BusPin, CommandRegistry, PinResolver, PinRole};
use defmt::info;
use esp_hal::gpio::{Flex, InputConfig, Level, OutputConfig};

/// Bus-Leitung auf einem umschaltbaren GPIO
///
/// Data muss für den ACK-Takt kurz auf Eingang, daher `Flex` statt `Output`.
pub struct FlexBusPin<'d> {
    pin: Flex<'d>,
}

impl<'d> FlexBusPin<'d> {
    pub fn new(mut pin: Flex<'d>) -> Self {
        pin.apply_output_config(&OutputConfig::default());
        pin.apply_input_config(&InputConfig::default());
        Self { pin }
    }
}

impl BusPin for FlexBusPin<'_> {
    fn set_output(&mut self) {
        self.pin.set_input_enable(false);
        self.pin.set_output_enable(true);
    }

    fn set_input(&mut self) {
        self.pin.set_output_enable(false);
        self.pin.set_input_enable(true);
    }

    fn set_level(&mut self, high: bool) {
        self.pin.set_level(Level::from(high));
    }
}

/// Pin-Zuordnung des Boards
///
/// Jede Rolle kann genau einmal abgeholt werden; nicht bestückte Rollen
/// bleiben `None`.
pub struct BoardPins<'d> {
    clock: Option<Flex<'d>>,
    data: Option<Flex<'d>>,
}

impl<'d> BoardPins<'d> {
    pub fn new(clock: Option<Flex<'d>>, data: Option<Flex<'d>>) -> Self {
        Self { clock, data }
    }
}

impl<'d> PinResolver for BoardPins<'d> {
    type Pin = FlexBusPin<'d>;

    fn find_pin_for_role(&mut self, role: PinRole) -> Option<FlexBusPin<'d>> {
        let pin = match role {
            PinRole::Clock => self.clock.take(),
            PinRole::Data => self.data.take(),
        };
        pin.map(FlexBusPin::new)
    }
}

/// Registry, die die Kommandos nur ins Log schreibt
///
/// Ausgeführt wird über den Kommando-Channel, nicht über die Registry.
pub struct LogRegistry;

impl CommandRegistry for LogRegistry {
    fn register_command(
        &mut self,
        name: &'static str,
        args: &'static str,
        _description: &'static str,
    ) {
        info!("Command registered: {} {}", name, args);
    }

    fn create_alias(&mut self, alias: &'static str, target: &'static str) {
        info!("Alias registered: {} -> {}", alias, target);
    }
}
