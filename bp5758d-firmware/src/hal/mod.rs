// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul verbindet die ESP32 GPIOs mit den Traits aus bp5758d-core.
// Der Treiber selbst bleibt damit auf dem Host testbar.

pub mod bus_pin;

pub use bus_pin::{BoardPins, FlexBusPin, LogRegistry};
