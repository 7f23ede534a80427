// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von bp5758d-core
pub use bp5758d_core::{Bp5758d, Command, CommandError, DriverConfig, DriverError};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::COMMAND_CHANNEL_SIZE;

// ============================================================================
// Start-Backlog
// ============================================================================

/// Parst ein Backlog (`cmd; cmd; ...`) und schickt jedes Kommando an den Bulb-Task
///
/// Ungültige Kommandos werden geloggt und übersprungen.
pub async fn send_backlog(backlog: &str, sender: BulbCommandSender) {
    for line in backlog.split(';').map(str::trim).filter(|line| !line.is_empty()) {
        match Command::parse(line) {
            Ok(command) => sender.send(command).await,
            Err(e) => defmt::error!("Startup command '{}' rejected: {}", line, e),
        }
    }
}

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Diese Type-Aliase vereinfachen die Lesbarkeit der Funktionssignaturen.
// Statt:  Sender<'static, NoopRawMutex, Command, 4>
// Nutze:  BulbCommandSender

/// Channel für Lampen-Kommandos (main / andere Tasks → Bulb Task)
pub type BulbCommandChannel = Channel<NoopRawMutex, Command, COMMAND_CHANNEL_SIZE>;

/// Sender für Lampen-Kommandos
/// Erzeugt aus BulbCommandChannel
pub type BulbCommandSender = Sender<'static, NoopRawMutex, Command, COMMAND_CHANNEL_SIZE>;

/// Receiver für Lampen-Kommandos (Bulb Task empfängt)
/// Empfängt Commands von BulbCommandSender
pub type BulbCommandReceiver = Receiver<'static, NoopRawMutex, Command, COMMAND_CHANNEL_SIZE>;
