// Bulb Task - Besitzt den BP5758D Treiber und führt Kommandos aus
use bp5758d_core::{Bp5758d, BusPin, DriverConfig};
use defmt::{error, info};
use embedded_hal::delay::DelayNs;
use esp_hal::delay::Delay;
use esp_hal::gpio::Flex;

use crate::config::SETTLE_DELAY_US;
use crate::hal::{BoardPins, LogRegistry};
use crate::BulbCommandReceiver;

/// Bulb Logic - Testbare Kommando-Schleife ohne Hardware-Abhängigkeit
///
/// Der Treiber gehört exklusiv diesem Task. Andere Tasks erreichen ihn
/// nur über den Kommando-Channel, dadurch läuft immer nur ein Transfer.
///
/// # Parameter
/// - `driver`: initialisierter Treiber (Hardware oder Mock-Pins)
/// - `command_receiver`: Channel Receiver für geparste Kommandos
pub async fn bulb_logic<P: BusPin, D: DelayNs>(
    mut driver: Bp5758d<P, D>,
    command_receiver: BulbCommandReceiver,
) -> ! {
    loop {
        let command = command_receiver.receive().await;
        info!("Command received: {}", command);

        // Transfer blockiert bis der Frame komplett draußen ist
        match driver.execute(command) {
            Ok(()) => info!("Lamp levels: {}", driver.levels()),
            Err(e) => error!("Command failed: {}", e),
        }
    }
}

/// Bulb Task - Embassy Task für die Lampe
///
/// Übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `bulb_logic()` Funktion auf.
///
/// # Parameter
/// - `clock`: GPIO für BP5758D_CLK
/// - `data`: GPIO für BP5758D_DAT
/// - `command_receiver`: Channel Receiver für Kommandos
#[embassy_executor::task]
pub async fn bulb_task(
    clock: Flex<'static>,
    data: Flex<'static>,
    command_receiver: BulbCommandReceiver,
) {
    let config = DriverConfig {
        settle_delay_us: SETTLE_DELAY_US,
        ..DriverConfig::default()
    };
    let mut driver = Bp5758d::new(Delay::new(), config);

    let mut pins = BoardPins::new(Some(clock), Some(data));
    if let Err(e) = driver.initialize(&mut pins, &mut LogRegistry) {
        // Kein Abbruch: Kommandos laufen weiter, melden aber NotInitialized
        error!("BP5758D init failed: {}", e);
    }

    bulb_logic(driver, command_receiver).await
}
