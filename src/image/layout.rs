use super::header::{HeaderVersion, PixelFormat, FILE_HEADER_SIZE};
use crate::error::Error;

/// Rows of the pixel array are padded to a multiple of this many bytes.
pub const ROW_ALIGNMENT: u32 = 4;

/// Byte offsets and sizes derived from header version, geometry and color depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    pub bytes_per_row: u32,
    pub row_padding: u32,
    pub raw_image_size: u32,
    pub pixel_array_offset: u32,
    pub file_size: u32,
}

impl Layout {
    pub fn new(
        version: HeaderVersion,
        width: i32,
        height: i32,
        pixel_format: PixelFormat,
    ) -> crate::Result<Self> {
        let too_large = || Error::DimensionsTooLarge { width, height };
        if width <= 0 {
            return Err(Error::InvalidDimension("width", width));
        }
        if height <= 0 {
            return Err(Error::InvalidDimension("height", height));
        }
        let bytes_per_row = (width as u32)
            .checked_mul(pixel_format.bytes_per_pixel())
            .ok_or_else(too_large)?;
        let row_padding = row_padding(bytes_per_row).ok_or_else(too_large)?;
        let raw_image_size = (bytes_per_row + row_padding)
            .checked_mul(height as u32)
            .ok_or_else(too_large)?;
        let pixel_array_offset = pixel_array_offset(version);
        let file_size = pixel_array_offset
            .checked_add(raw_image_size)
            .ok_or_else(too_large)?;
        Ok(Self {
            bytes_per_row,
            row_padding,
            raw_image_size,
            pixel_array_offset,
            file_size,
        })
    }

    pub fn padded_row_size(&self) -> u32 {
        self.bytes_per_row + self.row_padding
    }
}

/// number of zero bytes appended to a row of `bytes_per_row` bytes,
/// `None` if the padded row no longer fits into a u32
pub fn row_padding(bytes_per_row: u32) -> Option<u32> {
    let padded = bytes_per_row
        .checked_add(ROW_ALIGNMENT - 1)?
        / ROW_ALIGNMENT
        * ROW_ALIGNMENT;
    Some(padded - bytes_per_row)
}

pub fn pixel_array_offset(version: HeaderVersion) -> u32 {
    FILE_HEADER_SIZE + version.header_size()
}
