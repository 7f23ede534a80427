//! BP5758D Core - Platform-agnostic Driver, Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! GPIO und Delay kommen über Traits (`BusPin`, `DelayNs`) von außen.

#![no_std]

pub mod command;
pub mod driver;
pub mod logic;
pub mod traits;
pub mod transport;
pub mod types;

// Re-exports für einfachen Zugriff
pub use command::{Command, CommandError, CommandInfo, COMMANDS};
pub use driver::Bp5758d;
pub use logic::{
    convert_current, encode_frame, pack_level, parse_hex_color, scale_to_uint10,
    select_output_mode, sleep_frames, unpack_level,
};
pub use traits::{BusPin, CommandRegistry, DriverError, PinResolver};
pub use transport::{BusPins, SoftBus};
pub use types::{
    ChannelLevels, ChannelRemap, CurrentCode, CurrentLimits, DriverConfig, Frame, OutputMode,
    PinRole, Rgbcw,
};
