//! Text-Kommandos des Treibers
//!
//! Format: `NAME arg arg ...`, getrennt durch Leerzeichen. Mehrere Kommandos
//! lassen sich als Backlog mit `;` verketten.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::driver::Bp5758d;
use crate::logic::parse_hex_color;
use crate::traits::{BusPin, DriverError};
use crate::types::{CHANNEL_COUNT, ChannelRemap, CurrentCode, Rgbcw};

pub const CMD_RGBCW: &str = "BP5758D_RGBCW";
pub const CMD_MAP: &str = "BP5758D_Map";
pub const CMD_CURRENT: &str = "BP5758D_Current";

/// Gemeinsamer Alias für alle LED-Treiber
pub const ALIAS_LED_MAP: &str = "LED_Map";

/// Beschreibung eines Kommandos für die Registrierung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: &'static str,
    pub args: &'static str,
    pub description: &'static str,
}

pub const COMMANDS: [CommandInfo; 3] = [
    CommandInfo {
        name: CMD_RGBCW,
        args: "[HexColor]",
        description: "Direct access to the BP5758D driver. Normally not needed, the LED driver calls it automatically.",
    },
    CommandInfo {
        name: CMD_MAP,
        args: "[Ch0][Ch1][Ch2][Ch3][Ch4]",
        description: "Maps the RGBCW values to given indices of BP5758D channels. Example usage: BP5758D_Map 0 1 2 3 4",
    },
    CommandInfo {
        name: CMD_CURRENT,
        args: "[MaxCurrentRGB][MaxCurrentCW]",
        description: "Sets the maximum current limit for BP5758D driver, first value is for rgb and second for cw",
    },
];

/// Fehler-Typ für Kommandos
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// Zu wenige Argumente, es wurde nichts ausgeführt
    NotEnoughArguments,
    /// Argument nicht parsebar oder außerhalb des Wertebereichs
    InvalidArgument,
    UnknownCommand,
    Driver(DriverError),
}

impl From<DriverError> for CommandError {
    fn from(err: DriverError) -> Self {
        CommandError::Driver(err)
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotEnoughArguments => f.write_str("not enough arguments"),
            CommandError::InvalidArgument => f.write_str("invalid argument"),
            CommandError::UnknownCommand => f.write_str("unknown command"),
            CommandError::Driver(err) => write!(f, "driver error: {}", err),
        }
    }
}

/// Geparstes Kommando
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// `BP5758D_RGBCW FF00000000`
    WriteRgbcw(Rgbcw),
    /// `BP5758D_Map 0 1 2 3 4` bzw. `LED_Map ...`
    Map(ChannelRemap),
    /// `BP5758D_Current 14 14` (mA, vor der Umrechnung)
    Current { rgb: u8, cw: u8 },
}

impl Command {
    /// Parst eine Kommandozeile
    ///
    /// Die Argument-Anzahl wird vor allem anderen geprüft.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(CommandError::UnknownCommand)?;

        let mut args = [""; CHANNEL_COUNT];
        let mut count = 0;
        for token in tokens.take(CHANNEL_COUNT) {
            args[count] = token;
            count += 1;
        }

        let is = |expected: &str| name.eq_ignore_ascii_case(expected);

        if is(CMD_RGBCW) {
            require_args(count, 1)?;
            let color = parse_hex_color(args[0]).ok_or(CommandError::InvalidArgument)?;
            Ok(Command::WriteRgbcw(color))
        } else if is(CMD_MAP) || is(ALIAS_LED_MAP) {
            require_args(count, CHANNEL_COUNT)?;
            let mut indices = [0u8; CHANNEL_COUNT];
            for (index, arg) in indices.iter_mut().zip(args) {
                *index = parse_u8(arg)?;
            }
            let remap = ChannelRemap::new(indices).ok_or(CommandError::InvalidArgument)?;
            Ok(Command::Map(remap))
        } else if is(CMD_CURRENT) {
            require_args(count, 2)?;
            let rgb = parse_current(args[0])?;
            let cw = parse_current(args[1])?;
            Ok(Command::Current { rgb, cw })
        } else {
            Err(CommandError::UnknownCommand)
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        Command::parse(line)
    }
}

fn require_args(count: usize, needed: usize) -> Result<(), CommandError> {
    if count < needed {
        #[cfg(feature = "defmt")]
        defmt::warn!("Command requires {} arguments, got {}", needed, count);

        return Err(CommandError::NotEnoughArguments);
    }
    Ok(())
}

fn parse_u8(arg: &str) -> Result<u8, CommandError> {
    arg.parse().map_err(|_| CommandError::InvalidArgument)
}

fn parse_current(arg: &str) -> Result<u8, CommandError> {
    let milliamps = parse_u8(arg)?;
    CurrentCode::from_milliamps(milliamps).ok_or(CommandError::InvalidArgument)?;
    Ok(milliamps)
}

impl<P: BusPin, D: DelayNs> Bp5758d<P, D> {
    /// Führt ein geparstes Kommando aus
    pub fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::WriteRgbcw(color) => self.write_color(&color.to_channels())?,
            Command::Map(remap) => self.set_remap(remap)?,
            Command::Current { rgb, cw } => self.set_current(rgb, cw)?,
        }
        Ok(())
    }

    /// Parst und führt eine Kommandozeile aus
    pub fn run_command(&mut self, line: &str) -> Result<(), CommandError> {
        let command = Command::parse(line)?;
        self.execute(command)
    }

    /// Führt ein Backlog (`cmd; cmd; ...`) der Reihe nach aus
    ///
    /// Alle Kommandos laufen, auch wenn eines fehlschlägt. Zurück kommt der
    /// erste Fehler.
    pub fn run_backlog(&mut self, backlog: &str) -> Result<(), CommandError> {
        let mut first_error = None;
        for line in backlog.split(';').map(str::trim).filter(|line| !line.is_empty()) {
            if let Err(err) = self.run_command(line) {
                #[cfg(feature = "defmt")]
                defmt::error!("Backlog command '{}' failed: {}", line, err);

                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::RGB8;

    #[test]
    fn test_parse_current() {
        assert_eq!(
            Command::parse("BP5758D_Current 14 70"),
            Ok(Command::Current { rgb: 14, cw: 70 })
        );
        assert_eq!(
            Command::parse("bp5758d_current 1 2"),
            Ok(Command::Current { rgb: 1, cw: 2 })
        );
    }

    #[test]
    fn test_parse_current_not_enough_arguments() {
        assert_eq!(
            Command::parse("BP5758D_Current 14"),
            Err(CommandError::NotEnoughArguments)
        );
        assert_eq!(
            Command::parse("BP5758D_Current"),
            Err(CommandError::NotEnoughArguments)
        );
    }

    #[test]
    fn test_parse_current_invalid() {
        assert_eq!(Command::parse("BP5758D_Current x 14"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("BP5758D_Current 256 14"), Err(CommandError::InvalidArgument));
        assert_eq!(Command::parse("BP5758D_Current 14 222"), Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_parse_map_and_alias() {
        let expected = Command::Map(ChannelRemap::new([1, 0, 2, 4, 3]).unwrap());
        assert_eq!(Command::parse("BP5758D_Map 1 0 2 4 3"), Ok(expected));
        assert_eq!(Command::parse("LED_Map 1 0 2 4 3"), Ok(expected));
        assert_eq!(Command::parse("LED_Map 1 0 2"), Err(CommandError::NotEnoughArguments));
        assert_eq!(Command::parse("LED_Map 1 0 2 4 5"), Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_parse_rgbcw() {
        let cmd = Command::try_from("BP5758D_RGBCW FF00000080").unwrap();
        match cmd {
            Command::WriteRgbcw(color) => {
                assert_eq!(color.rgb, RGB8 { r: 255, g: 0, b: 0 });
                assert_eq!(color.warm, 0x80);
            }
            _ => panic!("Expected WriteRgbcw variant"),
        }
        assert_eq!(Command::parse("BP5758D_RGBCW"), Err(CommandError::NotEnoughArguments));
        assert_eq!(Command::parse("BP5758D_RGBCW zz"), Err(CommandError::InvalidArgument));
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(Command::parse(""), Err(CommandError::UnknownCommand));
        assert_eq!(Command::parse("SM2135_Current 1 2"), Err(CommandError::UnknownCommand));
    }

    #[test]
    fn test_command_table() {
        let names: [&str; 3] = COMMANDS.map(|info| info.name);
        assert_eq!(names, [CMD_RGBCW, CMD_MAP, CMD_CURRENT]);
    }
}
