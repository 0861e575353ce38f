//! Registry of the supported header versions and the closed sets of
//! pixel formats, compression methods and color spaces they accept.

use std::fmt::Display;

use clap::builder::PossibleValue;
use clap::ValueEnum;

use crate::error::Error;

pub const FILE_HEADER_SIZE: u32 = 14;
pub const MAGIC_BYTES: [u8; 2] = *b"BM";

pub const INFO_HEADER_SIZE: u32 = 40;
pub const V4_HEADER_SIZE: u32 = 108;

pub const RED_CHANNEL_MASK: u32 = 0x00FF_0000;
pub const GREEN_CHANNEL_MASK: u32 = 0x0000_FF00;
pub const BLUE_CHANNEL_MASK: u32 = 0x0000_00FF;
pub const ALPHA_CHANNEL_MASK: u32 = 0xFF00_0000;

/// CIEXYZTRIPLE endpoints, unused by the windows color space
pub const COLOR_SPACE_ENDPOINTS_SIZE: usize = 36;
/// red, green and blue gamma, unused by the windows color space
pub const COLOR_SPACE_GAMMA_SIZE: usize = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HeaderVersion {
    /// BITMAPINFOHEADER
    Info,
    /// BITMAPV4HEADER
    V4,
}

impl HeaderVersion {
    pub fn header_size(&self) -> u32 {
        match self {
            Self::Info => INFO_HEADER_SIZE,
            Self::V4 => V4_HEADER_SIZE,
        }
    }

    pub fn from_header_size(size: u32) -> crate::Result<Self> {
        match size {
            INFO_HEADER_SIZE => Ok(Self::Info),
            V4_HEADER_SIZE => Ok(Self::V4),
            _ => Err(Error::UnsupportedHeaderSize(size)),
        }
    }

    pub fn compression(&self) -> Compression {
        match self {
            Self::Info => Compression::Rgb,
            Self::V4 => Compression::BitFields,
        }
    }

    pub fn pixel_format(&self) -> PixelFormat {
        match self {
            Self::Info => PixelFormat::Rgb24,
            Self::V4 => PixelFormat::Argb32,
        }
    }

    pub fn has_color_space(&self) -> bool {
        matches!(self, Self::V4)
    }

    pub fn verify_compression(&self, compression: Compression) -> crate::Result<()> {
        if compression != self.compression() {
            return Err(Error::CompressionNotAllowed(compression, *self));
        }
        Ok(())
    }

    pub fn verify_pixel_format(&self, pixel_format: PixelFormat) -> crate::Result<()> {
        if pixel_format != self.pixel_format() {
            return Err(Error::PixelFormatNotAllowed(pixel_format, *self));
        }
        Ok(())
    }
}

impl ValueEnum for HeaderVersion {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Info, Self::V4]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Info => Some(PossibleValue::new("Info")),
            Self::V4 => Some(PossibleValue::new("V4")),
        }
    }
}

impl Display for HeaderVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "BITMAPINFOHEADER"),
            Self::V4 => write!(f, "BITMAPV4HEADER"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb24,
    Argb32,
}

impl PixelFormat {
    pub fn color_depth(&self) -> u16 {
        match self {
            Self::Rgb24 => 24,
            Self::Argb32 => 32,
        }
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.color_depth() as u32 / 8
    }

    pub fn has_alpha(&self) -> bool {
        matches!(self, Self::Argb32)
    }

    pub fn from_color_depth(color_depth: u16) -> crate::Result<Self> {
        match color_depth {
            24 => Ok(Self::Rgb24),
            32 => Ok(Self::Argb32),
            _ => Err(Error::UnsupportedColorDepth(color_depth)),
        }
    }
}

impl Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb24 => write!(f, "RGB24"),
            Self::Argb32 => write!(f, "ARGB32"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Compression {
    /// BI_RGB, no compression
    Rgb = 0,
    /// BI_BITFIELDS, uncompressed with channel masks
    BitFields = 3,
}

impl Compression {
    pub fn value(&self) -> u32 {
        *self as u32
    }

    pub fn from_value(value: u32) -> crate::Result<Self> {
        match value {
            0 => Ok(Self::Rgb),
            3 => Ok(Self::BitFields),
            _ => Err(Error::UnsupportedCompression(value)),
        }
    }
}

impl Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb => write!(f, "BI_RGB"),
            Self::BitFields => write!(f, "BI_BITFIELDS"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorSpace {
    /// LCS_WINDOWS_COLOR_SPACE
    Windows,
}

impl ColorSpace {
    /// the tag as it appears in the file, "Win " stored little-endian
    pub fn tag(&self) -> [u8; 4] {
        match self {
            Self::Windows => *b" niW",
        }
    }

    pub fn from_tag(tag: [u8; 4]) -> crate::Result<Self> {
        if tag == Self::Windows.tag() {
            return Ok(Self::Windows);
        }
        Err(Error::UnsupportedColorSpace(tag))
    }
}
