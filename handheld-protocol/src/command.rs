//! Command encoding for the ST7789 controller.
//!
//! Commands are encoded as:
//! - OPCODE (1 byte): sent with D/C low
//! - PARAMETERS (0-4 bytes): sent with D/C high
//!
//! Window commands (CASET/RASET) carry big-endian 16-bit start and end
//! coordinates: `[start_hi, start_lo, end_hi, end_lo]`. Both ends are
//! inclusive.

use heapless::Vec;

/// Maximum number of parameter bytes any command carries
pub const MAX_PARAMS: usize = 4;

/// ST7789 opcodes
pub mod opcode {
    pub const SWRESET: u8 = 0x01;
    pub const SLPOUT: u8 = 0x11;
    pub const NORON: u8 = 0x13;
    pub const INVOFF: u8 = 0x20;
    pub const INVON: u8 = 0x21;
    pub const DISPOFF: u8 = 0x28;
    pub const DISPON: u8 = 0x29;
    pub const CASET: u8 = 0x2A;
    pub const RASET: u8 = 0x2B;
    pub const RAMWR: u8 = 0x2C;
    pub const MADCTL: u8 = 0x36;
    pub const COLMOD: u8 = 0x3A;
}

/// COLMOD parameter for 16 bits per pixel (65K colours, RGB565)
pub const COLMOD_RGB565: u8 = 0x55;

/// MADCTL bits
mod madctl {
    pub const MY: u8 = 0x80;
    pub const MX: u8 = 0x40;
    pub const MV: u8 = 0x20;
}

/// Errors that can occur while building commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Window has zero width or height
    EmptyWindow,
    /// Window extends past the 16-bit address space
    WindowOutOfRange,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::EmptyWindow => f.write_str("empty address window"),
            CommandError::WindowOutOfRange => f.write_str("address window out of range"),
        }
    }
}

/// Controller commands used by the runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Software reset
    SoftwareReset,
    /// Leave sleep mode
    SleepOut,
    /// Normal (non-partial) display mode
    NormalMode,
    /// Colour inversion on (IPS panels need this for true colours)
    InversionOn,
    /// Colour inversion off
    InversionOff,
    /// Panel output off
    DisplayOff,
    /// Panel output on
    DisplayOn,
    /// Set the column address window (inclusive)
    ColumnAddressSet { start: u16, end: u16 },
    /// Set the row address window (inclusive)
    RowAddressSet { start: u16, end: u16 },
    /// Begin writing pixel data into the current window
    MemoryWrite,
    /// Memory addressing mode (scan direction / rotation)
    MemoryAccessControl(u8),
    /// Interface pixel format (colour depth)
    PixelFormat(u8),
}

impl Command {
    /// Opcode byte, sent with D/C low
    pub fn opcode(&self) -> u8 {
        match self {
            Command::SoftwareReset => opcode::SWRESET,
            Command::SleepOut => opcode::SLPOUT,
            Command::NormalMode => opcode::NORON,
            Command::InversionOn => opcode::INVON,
            Command::InversionOff => opcode::INVOFF,
            Command::DisplayOff => opcode::DISPOFF,
            Command::DisplayOn => opcode::DISPON,
            Command::ColumnAddressSet { .. } => opcode::CASET,
            Command::RowAddressSet { .. } => opcode::RASET,
            Command::MemoryWrite => opcode::RAMWR,
            Command::MemoryAccessControl(_) => opcode::MADCTL,
            Command::PixelFormat(_) => opcode::COLMOD,
        }
    }

    /// Parameter bytes, sent with D/C high
    pub fn params(&self) -> Vec<u8, MAX_PARAMS> {
        let mut params = Vec::new();
        match *self {
            Command::ColumnAddressSet { start, end } | Command::RowAddressSet { start, end } => {
                let [start_hi, start_lo] = start.to_be_bytes();
                let [end_hi, end_lo] = end.to_be_bytes();
                // Capacity is exactly four
                let _ = params.extend_from_slice(&[start_hi, start_lo, end_hi, end_lo]);
            }
            Command::MemoryAccessControl(value) | Command::PixelFormat(value) => {
                let _ = params.push(value);
            }
            _ => {}
        }
        params
    }
}

/// Panel rotation, expressed through the MADCTL addressing byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Parse a rotation from degrees (0, 90, 180, 270)
    pub fn from_degrees(degrees: u16) -> Option<Self> {
        match degrees {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    /// MADCTL parameter for this rotation
    pub fn madctl(self) -> u8 {
        match self {
            Rotation::Deg0 => 0x00,
            Rotation::Deg90 => madctl::MX | madctl::MV,
            Rotation::Deg180 => madctl::MX | madctl::MY,
            Rotation::Deg270 => madctl::MY | madctl::MV,
        }
    }
}

/// An inclusive pixel address window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub x0: u16,
    pub y0: u16,
    pub x1: u16,
    pub y1: u16,
}

impl Window {
    /// Create a window from origin and size
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Result<Self, CommandError> {
        if width == 0 || height == 0 {
            return Err(CommandError::EmptyWindow);
        }
        let x1 = x
            .checked_add(width - 1)
            .ok_or(CommandError::WindowOutOfRange)?;
        let y1 = y
            .checked_add(height - 1)
            .ok_or(CommandError::WindowOutOfRange)?;
        Ok(Self { x0: x, y0: y, x1, y1 })
    }

    /// Window covering a whole `width` x `height` panel
    pub fn full(width: u16, height: u16) -> Result<Self, CommandError> {
        Self::new(0, 0, width, height)
    }

    /// Number of pixels inside the window
    pub fn pixel_count(&self) -> usize {
        (self.x1 - self.x0 + 1) as usize * (self.y1 - self.y0 + 1) as usize
    }

    /// The command triple that opens this window for writing
    ///
    /// CASET, RASET, then RAMWR. Pixel data follows the last command.
    pub fn commands(&self) -> [Command; 3] {
        [
            Command::ColumnAddressSet {
                start: self.x0,
                end: self.x1,
            },
            Command::RowAddressSet {
                start: self.y0,
                end: self.y1,
            },
            Command::MemoryWrite,
        ]
    }
}

/// One step of the initialization sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitStep {
    pub command: Command,
    /// Delay to observe after the command, in milliseconds
    pub delay_ms: u32,
}

/// Mode-configuration sequence sent after the hardware reset pulse
///
/// Addressing mode, colour depth, then display on.
pub fn init_sequence(rotation: Rotation) -> [InitStep; 7] {
    [
        InitStep {
            command: Command::SoftwareReset,
            delay_ms: 150,
        },
        InitStep {
            command: Command::SleepOut,
            delay_ms: 10,
        },
        InitStep {
            command: Command::PixelFormat(COLMOD_RGB565),
            delay_ms: 0,
        },
        InitStep {
            command: Command::MemoryAccessControl(rotation.madctl()),
            delay_ms: 0,
        },
        InitStep {
            command: Command::InversionOn,
            delay_ms: 0,
        },
        InitStep {
            command: Command::NormalMode,
            delay_ms: 10,
        },
        InitStep {
            command: Command::DisplayOn,
            delay_ms: 10,
        },
    ]
}
