// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen

// ============================================================================
// BP5758D Bus
// ============================================================================

/// GPIO-Pin für die Clock-Leitung (Rolle BP5758D_CLK)
/// Muss zu `peripherals.GPIO4` in main.rs passen
pub const BP5758D_CLK_GPIO: u8 = 4;

/// GPIO-Pin für die Data-Leitung (Rolle BP5758D_DAT)
/// Muss zu `peripherals.GPIO5` in main.rs passen
pub const BP5758D_DAT_GPIO: u8 = 5;

/// Wartezeit nach jeder Flanke in Mikrosekunden
/// 1 µs reicht für den BP5758D, größere Werte nur bei langen Leitungen
pub const SETTLE_DELAY_US: u32 = 1;

// ============================================================================
// Kommandos
// ============================================================================

/// Kapazität des Kommando-Channels (main → Bulb-Task)
pub const COMMAND_CHANNEL_SIZE: usize = 4;

/// Start-Backlog, wird nach dem Init der Reihe nach ausgeführt
/// Wird zur Build-Zeit aus der Environment Variable BP5758D_STARTUP geladen
/// Setze diese in .env file, z.B. `BP5758D_STARTUP=BP5758D_Current 14 14; BP5758D_RGBCW 000000FF80`
pub const STARTUP_COMMANDS: &str = match option_env!("BP5758D_STARTUP") {
    Some(commands) => commands,
    None => "BP5758D_Current 14 14",
};
