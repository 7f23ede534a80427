// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::gpio::Flex;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

// Projekt-Module und Konfiguration
use bp5758d_steuerung::config::{BP5758D_CLK_GPIO, BP5758D_DAT_GPIO, STARTUP_COMMANDS};
use bp5758d_steuerung::tasks::bulb_task;
use bp5758d_steuerung::{BulbCommandChannel, send_backlog};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime, spawnt den Bulb-Task
/// und schickt das Start-Backlog. Danach schläft main().
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    defmt::info!(
        "BP5758D on CLK=GPIO{} DAT=GPIO{}",
        BP5758D_CLK_GPIO,
        BP5758D_DAT_GPIO
    );

    // Bus-Leitungen als Flex GPIO (Data muss zwischen Ein- und Ausgang wechseln)
    // WICHTIG: GPIO4/GPIO5 müssen zu BP5758D_CLK_GPIO / BP5758D_DAT_GPIO in config.rs passen
    let clock = Flex::new(peripherals.GPIO4);
    let data = Flex::new(peripherals.GPIO5);

    // Kommando-Channel erstellen (main → Bulb Task)
    static COMMAND_CHANNEL: static_cell::StaticCell<BulbCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(BulbCommandChannel::new());
    let command_sender = command_channel.sender();
    let command_receiver = command_channel.receiver();

    // Spawn Bulb Task (besitzt den Treiber)
    spawner
        .spawn(bulb_task(clock, data, command_receiver))
        .unwrap();

    // Start-Backlog, z.B. "BP5758D_Current 14 14"
    send_backlog(STARTUP_COMMANDS, command_sender).await;

    // Main-Loop: schläft (alle Arbeit läuft im Bulb Task)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
