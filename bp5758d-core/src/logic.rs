//! Pure Business Logic Functions
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use rgb::RGB8;

use crate::types::{
    CHANNEL_COUNT, ChannelLevels, CurrentCode, CurrentLimits, ENABLE_OUTPUTS_ALL, Frame,
    MAX_LEVEL, OutputMode, Rgbcw,
};

/// Höchster Strom-Wert, der 1:1 übernommen wird
const CURRENT_DIRECT_MAX: u8 = 63;

/// Lücke in der Strom-Tabelle des Chips oberhalb von 63
const CURRENT_TABLE_GAP: u8 = 34;

/// Skaliert einen Kanalwert 0-255 linear auf 0-1023
///
/// Nachkommastellen werden abgeschnitten. Werte außerhalb von 0-255 werden
/// begrenzt, NaN ergibt 0.
///
/// ```
/// # use bp5758d_core::scale_to_uint10;
/// assert_eq!(scale_to_uint10(255.0), 1023);
/// assert_eq!(scale_to_uint10(127.5), 511);
/// ```
pub fn scale_to_uint10(value: f32) -> u16 {
    // deckt auch NaN ab
    if !(value > 0.0) {
        return 0;
    }
    let value = value.min(255.0);
    (value * f32::from(MAX_LEVEL) / 255.0) as u16
}

/// Rechnet einen Strom in mA in den Code des Chips um
///
/// 0-63 bleiben unverändert, ab 64 wird 34 addiert. Gibt `None` zurück,
/// wenn das Ergebnis nicht in ein Byte passt.
pub fn convert_current(milliamps: u8) -> Option<u8> {
    if milliamps > CURRENT_DIRECT_MAX {
        milliamps.checked_add(CURRENT_TABLE_GAP)
    } else {
        Some(milliamps)
    }
}

/// Teilt einen 10-Bit Wert in zwei 5-Bit Bytes: `[bits 0-4, bits 5-9]`
pub fn pack_level(level: u16) -> [u8; 2] {
    [(level & 0x1F) as u8, ((level >> 5) & 0x1F) as u8]
}

/// Umkehrung von [`pack_level`]
pub fn unpack_level(low: u8, high: u8) -> u16 {
    (u16::from(high & 0x1F) << 5) | u16::from(low & 0x1F)
}

/// Wählt den Ausgangs-Modus anhand der Null-Muster
///
/// Die Reihenfolge der Prüfungen ist entscheidend: z.B. OUT1 und OUT5 aktiv
/// landet im 5-Kanal-Modus, nur OUT2 aktiv im 3-Kanal-Modus.
pub fn select_output_mode(levels: &ChannelLevels) -> OutputMode {
    let [a, b, c, d, e] = *levels.as_array();
    let rgb_off = a == 0 && b == 0 && c == 0;
    let cw_off = d == 0 && e == 0;

    match (rgb_off, cw_off) {
        (true, true) => OutputMode::Sleep,
        (true, false) => OutputMode::TwoChannel,
        (false, true) => OutputMode::ThreeChannel,
        (false, false) => OutputMode::FiveChannel,
    }
}

/// Baut den Frame für den aktuellen Kanalzustand
///
/// Im Sleep-Fall (alle Kanäle 0) entsteht ein leerer Frame an die
/// 5-Kanal-Adresse; den Sleep-Frame danach liefert [`sleep_frames`].
pub fn encode_frame(levels: &ChannelLevels, currents: &CurrentLimits) -> Frame {
    let mode = select_output_mode(levels);
    if mode == OutputMode::Sleep {
        return Frame::zeroed(OutputMode::FiveChannel.address());
    }

    let (rgb, cw) = match mode {
        OutputMode::TwoChannel => (CurrentCode::ZERO, currents.cw),
        OutputMode::ThreeChannel => (currents.rgb, CurrentCode::ZERO),
        _ => (currents.rgb, currents.cw),
    };

    let mut frame = Frame::zeroed(mode.address());
    let bytes = frame.bytes_mut();
    bytes[Frame::ENABLE] = ENABLE_OUTPUTS_ALL;
    bytes[Frame::CURRENT..Frame::CURRENT + 3].fill(rgb.code());
    bytes[Frame::CURRENT + 3..Frame::DATA].fill(cw.code());

    for (slot, &level) in levels.as_array().iter().enumerate() {
        let i = Frame::DATA + 2 * slot;
        bytes[i..i + 2].copy_from_slice(&pack_level(level));
    }
    frame
}

/// Die beiden Frames zum Abschalten: alles 0 an OUT, dann an SLEEP
pub fn sleep_frames() -> [Frame; 2] {
    [
        Frame::zeroed(OutputMode::FiveChannel.address()),
        Frame::zeroed(OutputMode::Sleep.address()),
    ]
}

/// Parst einen RGBCW Hex-String wie `FF00000000` oder `#ff8000`
///
/// Fehlende Bytes am Ende bleiben 0. Gibt `None` bei ungerader Länge,
/// mehr als 5 Bytes oder Nicht-Hex-Zeichen zurück.
pub fn parse_hex_color(text: &str) -> Option<Rgbcw> {
    let digits = text.strip_prefix('#').unwrap_or(text).as_bytes();
    if digits.is_empty() || digits.len() % 2 != 0 || digits.len() > 2 * CHANNEL_COUNT {
        return None;
    }

    let mut values = [0u8; CHANNEL_COUNT];
    for (value, pair) in values.iter_mut().zip(digits.chunks_exact(2)) {
        let high = char::from(pair[0]).to_digit(16)?;
        let low = char::from(pair[1]).to_digit(16)?;
        *value = (high * 16 + low) as u8;
    }

    let [r, g, b, cold, warm] = values;
    Some(Rgbcw {
        rgb: RGB8 { r, g, b },
        cold,
        warm,
    })
}
