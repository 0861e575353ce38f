use std::fmt::Display;

use crate::image::channel::ChannelType;
use crate::image::header::{Compression, HeaderVersion, PixelFormat};

/// Coarse classification of every [`Error`] the codec reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    IndexOutOfRange,
    UnsupportedFormat,
    CorruptOrUnsupportedFile,
    IoFailure,
}

#[derive(Debug)]
pub enum Error {
    InvalidDimension(&'static str, i32),
    InvalidPrintResolution(&'static str, i32),
    InvalidColorPlaneCount(u16),
    CompressionNotAllowed(Compression, HeaderVersion),
    PixelFormatNotAllowed(PixelFormat, HeaderVersion),
    ColorSpaceNotAllowed(HeaderVersion),
    FieldNotInitialized(&'static str),
    PixelArrayNotAllocated,
    ImageSizeMismatch { stored: u32, computed: u32 },
    DimensionsTooLarge { width: i32, height: i32 },
    ChannelDimensionMismatch { image: (i32, i32), channel: (i32, i32) },
    ChannelNotPresent(ChannelType, PixelFormat),
    PixelIndexOutOfRange { row: i32, column: i32, width: i32, height: i32 },
    UnsupportedHeaderSize(u32),
    UnsupportedColorDepth(u16),
    UnsupportedCompression(u32),
    UnsupportedChannelMask(ChannelType, u32),
    UnsupportedColorSpace([u8; 4]),
    InvalidMagicBytes([u8; 2]),
    InvalidHeaderField(&'static str, i64),
    MismatchBetweenDeclaredAndComputed {
        field: &'static str,
        declared: u64,
        computed: u64,
    },
    UnexpectedEndOfFile(&'static str),
    UnableToOpenInputFileForReading(String, std::io::Error),
    UnableToOpenOutputFileForWriting(String, std::io::Error),
    FailedToReadField(&'static str, std::io::Error),
    FailedToWriteField(&'static str, std::io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidDimension(..)
            | Self::InvalidPrintResolution(..)
            | Self::InvalidColorPlaneCount(_)
            | Self::CompressionNotAllowed(..)
            | Self::PixelFormatNotAllowed(..)
            | Self::ColorSpaceNotAllowed(_)
            | Self::FieldNotInitialized(_)
            | Self::PixelArrayNotAllocated
            | Self::ImageSizeMismatch { .. }
            | Self::DimensionsTooLarge { .. }
            | Self::ChannelDimensionMismatch { .. }
            | Self::ChannelNotPresent(..) => ErrorKind::InvalidArgument,
            Self::PixelIndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            Self::UnsupportedHeaderSize(_)
            | Self::UnsupportedColorDepth(_)
            | Self::UnsupportedCompression(_)
            | Self::UnsupportedChannelMask(..)
            | Self::UnsupportedColorSpace(_) => ErrorKind::UnsupportedFormat,
            Self::InvalidMagicBytes(_)
            | Self::InvalidHeaderField(..)
            | Self::MismatchBetweenDeclaredAndComputed { .. }
            | Self::UnexpectedEndOfFile(_) => ErrorKind::CorruptOrUnsupportedFile,
            Self::UnableToOpenInputFileForReading(..)
            | Self::UnableToOpenOutputFileForWriting(..)
            | Self::FailedToReadField(..)
            | Self::FailedToWriteField(..) => ErrorKind::IoFailure,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDimension(name, value) => {
                write!(f, "Dimension '{}' must be positive, but was {}", name, value)
            }
            Self::InvalidPrintResolution(name, value) => {
                write!(
                    f,
                    "Print resolution '{}' must be positive, but was {}",
                    name, value
                )
            }
            Self::InvalidColorPlaneCount(count) => {
                write!(f, "Color plane count must be 1, but was {}", count)
            }
            Self::CompressionNotAllowed(compression, version) => {
                write!(
                    f,
                    "Compression '{}' is not allowed for header version '{}'",
                    compression, version
                )
            }
            Self::PixelFormatNotAllowed(format, version) => {
                write!(
                    f,
                    "Pixel format '{}' is not allowed for header version '{}'",
                    format, version
                )
            }
            Self::ColorSpaceNotAllowed(version) => {
                write!(f, "Header version '{}' has no color space field", version)
            }
            Self::FieldNotInitialized(name) => {
                write!(f, "Field '{}' was accessed before it was set", name)
            }
            Self::PixelArrayNotAllocated => {
                write!(f, "Pixel array was accessed before it was set up")
            }
            Self::ImageSizeMismatch { stored, computed } => {
                write!(
                    f,
                    "Stored raw image size {} does not match the computed size {}",
                    stored, computed
                )
            }
            Self::DimensionsTooLarge { width, height } => {
                write!(
                    f,
                    "Image of {}x{} pixels does not fit into a bitmap file",
                    width, height
                )
            }
            Self::ChannelDimensionMismatch { image, channel } => {
                write!(
                    f,
                    "Channel of {}x{} pixels does not match image of {}x{} pixels",
                    channel.0, channel.1, image.0, image.1
                )
            }
            Self::ChannelNotPresent(channel, format) => {
                write!(
                    f,
                    "Pixel format '{}' has no {} channel",
                    format, channel
                )
            }
            Self::PixelIndexOutOfRange {
                row,
                column,
                width,
                height,
            } => {
                write!(
                    f,
                    "Pixel ({}, {}) is outside of {}x{} pixels",
                    row, column, width, height
                )
            }
            Self::UnsupportedHeaderSize(size) => {
                write!(f, "Header size {} matches no supported header version", size)
            }
            Self::UnsupportedColorDepth(depth) => {
                write!(f, "Color depth of {} bits per pixel is not supported", depth)
            }
            Self::UnsupportedCompression(value) => {
                write!(f, "Compression method {} is not supported", value)
            }
            Self::UnsupportedChannelMask(channel, mask) => {
                write!(f, "Unsupported {} channel mask {:#010X}", channel, mask)
            }
            Self::UnsupportedColorSpace(tag) => {
                write!(f, "Unsupported color space tag {:02X?}", tag)
            }
            Self::InvalidMagicBytes(bytes) => {
                write!(f, "Expected magic bytes 'BM', but found {:02X?}", bytes)
            }
            Self::InvalidHeaderField(name, value) => {
                write!(f, "Header field '{}' has invalid value {}", name, value)
            }
            Self::MismatchBetweenDeclaredAndComputed {
                field,
                declared,
                computed,
            } => {
                write!(
                    f,
                    "Declared {} of {} does not match the computed value {}",
                    field, declared, computed
                )
            }
            Self::UnexpectedEndOfFile(field) => {
                write!(f, "Unexpected end of file while reading '{}'", field)
            }
            Self::UnableToOpenInputFileForReading(path, error) => {
                write!(
                    f,
                    "Unable to open input file '{}' for reading: {}",
                    path, error
                )
            }
            Self::UnableToOpenOutputFileForWriting(path, error) => {
                write!(
                    f,
                    "Unable to open output file '{}' for writing: {}",
                    path, error
                )
            }
            Self::FailedToReadField(field, error) => {
                write!(f, "Failed to read '{}': {}", field, error)
            }
            Self::FailedToWriteField(field, error) => {
                write!(f, "Failed to write '{}': {}", field, error)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnableToOpenInputFileForReading(_, error)
            | Self::UnableToOpenOutputFileForWriting(_, error)
            | Self::FailedToReadField(_, error)
            | Self::FailedToWriteField(_, error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Error, ErrorKind};
    use crate::image::channel::ChannelType;
    use crate::image::header::PixelFormat;

    #[test]
    fn classify_errors() {
        assert_eq!(
            Error::ChannelNotPresent(ChannelType::Alpha, PixelFormat::Rgb24).kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            Error::UnsupportedHeaderSize(12).kind(),
            ErrorKind::UnsupportedFormat
        );
        assert_eq!(
            Error::UnexpectedEndOfFile("width").kind(),
            ErrorKind::CorruptOrUnsupportedFile
        );
        let io_error = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(
            Error::FailedToWriteField("width", io_error).kind(),
            ErrorKind::IoFailure
        );
    }

    #[test]
    fn display_mask_as_hex() {
        let message = Error::UnsupportedChannelMask(ChannelType::Red, 0x00FF_0000).to_string();
        assert_eq!(message, "Unsupported red channel mask 0x00FF0000");
    }
}
