use header::{ColorSpace, Compression, HeaderVersion, PixelFormat};
use layout::Layout;

use crate::error::Error;

pub mod channel;
pub mod header;
pub mod layout;
pub mod reader;
pub mod writer;

pub const DEFAULT_COLOR_PLANE_COUNT: u16 = 1;
/// 72 DPI expressed in pixels per metre
pub const DEFAULT_PRINT_RESOLUTION: i32 = 2835;
pub const DEFAULT_PALETTE_COLOR_COUNT: u32 = 0;
/// zero means all colors are important
pub const DEFAULT_IMPORTANT_COLOR_COUNT: u32 = 0;

pub trait ImageReader {
    fn read_image(&mut self) -> crate::Result<Bitmap>;
}

pub trait ImageWriter {
    fn write_image(&mut self) -> crate::Result<()>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Pixel {
    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 0,
        }
    }

    pub const fn argb(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }
}

const BLUE: Pixel = Pixel::rgb(0, 0, 255);
const GREEN: Pixel = Pixel::rgb(0, 255, 0);
const RED: Pixel = Pixel::rgb(255, 0, 0);
const WHITE: Pixel = Pixel::rgb(255, 255, 255);

/// In-memory bitmap image.
///
/// Fields that have not been assigned yet are `None`; their accessors
/// fail with [`Error::FieldNotInitialized`]. The pixel array is stored
/// row-major, top row first, and has exactly `width * height` entries
/// once it has been set up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bitmap {
    header_version: HeaderVersion,
    pixel_format: Option<PixelFormat>,
    width: Option<i32>,
    height: Option<i32>,
    color_plane_count: Option<u16>,
    compression: Compression,
    image_size: Option<u32>,
    print_resolution_x: Option<i32>,
    print_resolution_y: Option<i32>,
    palette_color_count: u32,
    important_color_count: u32,
    color_space: Option<ColorSpace>,
    pixels: Option<Vec<Pixel>>,
}

impl Bitmap {
    pub fn new(header_version: HeaderVersion) -> Self {
        Self {
            header_version,
            pixel_format: None,
            width: None,
            height: None,
            color_plane_count: None,
            compression: header_version.compression(),
            image_size: None,
            print_resolution_x: None,
            print_resolution_y: None,
            palette_color_count: DEFAULT_PALETTE_COLOR_COUNT,
            important_color_count: DEFAULT_IMPORTANT_COLOR_COUNT,
            color_space: Self::default_color_space(header_version),
            pixels: None,
        }
    }

    /// Fills every field with the defaults of the header version and
    /// replaces the pixels with a small sample image.
    pub fn initialize_default(&mut self, pixel_format: PixelFormat) -> crate::Result<()> {
        self.header_version.verify_pixel_format(pixel_format)?;
        let (width, height, pixels) = match pixel_format {
            PixelFormat::Rgb24 => (2, 2, vec![BLUE, WHITE, RED, GREEN]),
            PixelFormat::Argb32 => {
                let row = [BLUE, GREEN, RED, WHITE];
                let pixels = row
                    .iter()
                    .map(|p| Pixel { alpha: 127, ..*p })
                    .chain(row.iter().map(|p| Pixel { alpha: 255, ..*p }))
                    .collect();
                (4, 2, pixels)
            }
        };
        self.pixel_format = Some(pixel_format);
        self.compression = self.header_version.compression();
        self.color_plane_count = Some(DEFAULT_COLOR_PLANE_COUNT);
        self.print_resolution_x = Some(DEFAULT_PRINT_RESOLUTION);
        self.print_resolution_y = Some(DEFAULT_PRINT_RESOLUTION);
        self.palette_color_count = DEFAULT_PALETTE_COLOR_COUNT;
        self.important_color_count = DEFAULT_IMPORTANT_COLOR_COUNT;
        self.color_space = Self::default_color_space(self.header_version);
        self.width = Some(width);
        self.height = Some(height);
        self.pixels = Some(pixels);
        self.update_image_size()
    }

    fn default_color_space(header_version: HeaderVersion) -> Option<ColorSpace> {
        header_version
            .has_color_space()
            .then_some(ColorSpace::Windows)
    }

    pub fn header_version(&self) -> HeaderVersion {
        self.header_version
    }

    pub fn header_size(&self) -> u32 {
        self.header_version.header_size()
    }

    /// Switches the header version; compression and color space follow it.
    pub fn set_header_version(&mut self, header_version: HeaderVersion) {
        self.header_version = header_version;
        self.compression = header_version.compression();
        self.color_space = Self::default_color_space(header_version);
    }

    pub fn pixel_format(&self) -> crate::Result<PixelFormat> {
        self.pixel_format
            .ok_or(Error::FieldNotInitialized("pixel format"))
    }

    pub fn set_pixel_format(&mut self, pixel_format: PixelFormat) -> crate::Result<()> {
        self.header_version.verify_pixel_format(pixel_format)?;
        self.pixel_format = Some(pixel_format);
        if !pixel_format.has_alpha() {
            self.clear_alpha();
        }
        Ok(())
    }

    pub fn color_depth(&self) -> crate::Result<u16> {
        Ok(self.pixel_format()?.color_depth())
    }

    pub fn set_color_depth(&mut self, color_depth: u16) -> crate::Result<()> {
        self.set_pixel_format(PixelFormat::from_color_depth(color_depth)?)
    }

    pub fn width(&self) -> crate::Result<i32> {
        self.width.ok_or(Error::FieldNotInitialized("width"))
    }

    pub fn set_width(&mut self, width: i32) -> crate::Result<()> {
        if width <= 0 {
            return Err(Error::InvalidDimension("width", width));
        }
        if self.width != Some(width) {
            self.width = Some(width);
            self.pixels = None;
        }
        Ok(())
    }

    pub fn height(&self) -> crate::Result<i32> {
        self.height.ok_or(Error::FieldNotInitialized("height"))
    }

    pub fn set_height(&mut self, height: i32) -> crate::Result<()> {
        if height <= 0 {
            return Err(Error::InvalidDimension("height", height));
        }
        if self.height != Some(height) {
            self.height = Some(height);
            self.pixels = None;
        }
        Ok(())
    }

    pub fn color_plane_count(&self) -> crate::Result<u16> {
        self.color_plane_count
            .ok_or(Error::FieldNotInitialized("color plane count"))
    }

    pub fn set_color_plane_count(&mut self, count: u16) -> crate::Result<()> {
        if count != DEFAULT_COLOR_PLANE_COUNT {
            return Err(Error::InvalidColorPlaneCount(count));
        }
        self.color_plane_count = Some(count);
        Ok(())
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    pub fn set_compression(&mut self, compression: Compression) -> crate::Result<()> {
        self.header_version.verify_compression(compression)?;
        self.compression = compression;
        Ok(())
    }

    /// raw size of the pixel array in bytes, including row padding
    pub fn image_size(&self) -> crate::Result<u32> {
        self.image_size.ok_or(Error::FieldNotInitialized("image size"))
    }

    pub fn set_image_size(&mut self, image_size: u32) {
        self.image_size = Some(image_size);
    }

    /// Stores the raw image size derived from the current geometry.
    pub fn update_image_size(&mut self) -> crate::Result<()> {
        let image_size = self.raw_image_size_in_bytes()?;
        self.image_size = Some(image_size);
        Ok(())
    }

    pub fn print_resolution_x(&self) -> crate::Result<i32> {
        self.print_resolution_x
            .ok_or(Error::FieldNotInitialized("print resolution x"))
    }

    pub fn set_print_resolution_x(&mut self, resolution: i32) -> crate::Result<()> {
        if resolution <= 0 {
            return Err(Error::InvalidPrintResolution("x", resolution));
        }
        self.print_resolution_x = Some(resolution);
        Ok(())
    }

    pub fn print_resolution_y(&self) -> crate::Result<i32> {
        self.print_resolution_y
            .ok_or(Error::FieldNotInitialized("print resolution y"))
    }

    pub fn set_print_resolution_y(&mut self, resolution: i32) -> crate::Result<()> {
        if resolution <= 0 {
            return Err(Error::InvalidPrintResolution("y", resolution));
        }
        self.print_resolution_y = Some(resolution);
        Ok(())
    }

    pub fn palette_color_count(&self) -> u32 {
        self.palette_color_count
    }

    pub fn set_palette_color_count(&mut self, count: u32) {
        self.palette_color_count = count;
    }

    pub fn important_color_count(&self) -> u32 {
        self.important_color_count
    }

    pub fn set_important_color_count(&mut self, count: u32) {
        self.important_color_count = count;
    }

    pub fn color_space(&self) -> crate::Result<ColorSpace> {
        if !self.header_version.has_color_space() {
            return Err(Error::ColorSpaceNotAllowed(self.header_version));
        }
        self.color_space
            .ok_or(Error::FieldNotInitialized("color space"))
    }

    pub fn set_color_space(&mut self, color_space: ColorSpace) -> crate::Result<()> {
        if !self.header_version.has_color_space() {
            return Err(Error::ColorSpaceNotAllowed(self.header_version));
        }
        self.color_space = Some(color_space);
        Ok(())
    }

    /// (Re)allocates `width * height` zeroed pixels. Changing the width or
    /// height afterwards drops the pixel array again.
    pub fn set_up_pixel_array(&mut self) -> crate::Result<()> {
        Layout::new(
            self.header_version,
            self.width()?,
            self.height()?,
            self.header_version.pixel_format(),
        )?;
        let resolution = self.resolution()?;
        self.pixels = Some(vec![Pixel::default(); resolution]);
        Ok(())
    }

    pub(crate) fn set_pixels(&mut self, pixels: Vec<Pixel>) {
        self.pixels = Some(pixels);
    }

    pub fn pixels(&self) -> crate::Result<&[Pixel]> {
        self.pixels.as_deref().ok_or(Error::PixelArrayNotAllocated)
    }

    pub(crate) fn pixels_mut(&mut self) -> crate::Result<&mut [Pixel]> {
        self.pixels
            .as_deref_mut()
            .ok_or(Error::PixelArrayNotAllocated)
    }

    pub fn pixel(&self, row: i32, column: i32) -> crate::Result<Pixel> {
        let index = self.pixel_index(row, column)?;
        self.pixels()?
            .get(index)
            .copied()
            .ok_or(Error::PixelArrayNotAllocated)
    }

    pub fn set_pixel(&mut self, row: i32, column: i32, pixel: Pixel) -> crate::Result<()> {
        let index = self.pixel_index(row, column)?;
        let has_alpha = self.pixel_format.is_some_and(|f| f.has_alpha());
        let alpha = if has_alpha { pixel.alpha } else { 0 };
        let slot = self
            .pixels_mut()?
            .get_mut(index)
            .ok_or(Error::PixelArrayNotAllocated)?;
        *slot = Pixel { alpha, ..pixel };
        Ok(())
    }

    fn pixel_index(&self, row: i32, column: i32) -> crate::Result<usize> {
        let width = self.width()?;
        let height = self.height()?;
        if row < 0 || column < 0 || row >= height || column >= width {
            return Err(Error::PixelIndexOutOfRange {
                row,
                column,
                width,
                height,
            });
        }
        Ok(row as usize * width as usize + column as usize)
    }

    pub(crate) fn resolution(&self) -> crate::Result<usize> {
        Ok(self.width()? as usize * self.height()? as usize)
    }

    fn clear_alpha(&mut self) {
        if let Some(pixels) = self.pixels.as_mut() {
            pixels.iter_mut().for_each(|p| p.alpha = 0);
        }
    }

    pub fn layout(&self) -> crate::Result<Layout> {
        Layout::new(
            self.header_version,
            self.width()?,
            self.height()?,
            self.pixel_format()?,
        )
    }

    pub fn raw_image_size_in_bytes(&self) -> crate::Result<u32> {
        Ok(self.layout()?.raw_image_size)
    }

    pub fn file_size_in_bytes(&self) -> crate::Result<u32> {
        Ok(self.layout()?.file_size)
    }

    /// Checks every invariant the writer relies on.
    pub fn validate(&self) -> crate::Result<Layout> {
        let pixel_format = self.pixel_format()?;
        self.header_version.verify_compression(self.compression)?;
        self.header_version.verify_pixel_format(pixel_format)?;
        let color_plane_count = self.color_plane_count()?;
        if color_plane_count != DEFAULT_COLOR_PLANE_COUNT {
            return Err(Error::InvalidColorPlaneCount(color_plane_count));
        }
        self.print_resolution_x()?;
        self.print_resolution_y()?;
        if self.header_version.has_color_space() {
            self.color_space()?;
        }
        let layout = self.layout()?;
        let stored = self.image_size()?;
        if stored != layout.raw_image_size {
            return Err(Error::ImageSizeMismatch {
                stored,
                computed: layout.raw_image_size,
            });
        }
        if self.pixels()?.len() != self.resolution()? {
            return Err(Error::PixelArrayNotAllocated);
        }
        Ok(layout)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::{Bitmap, Pixel, BLUE, GREEN, RED, WHITE};
    use crate::error::{Error, ErrorKind};
    use crate::image::header::{ColorSpace, Compression, HeaderVersion, PixelFormat};

    pub fn create_info_image() -> Bitmap {
        let mut image = Bitmap::new(HeaderVersion::Info);
        image.initialize_default(PixelFormat::Rgb24).unwrap();
        image
    }

    pub fn create_v4_image() -> Bitmap {
        let mut image = Bitmap::new(HeaderVersion::V4);
        image.initialize_default(PixelFormat::Argb32).unwrap();
        image
    }

    #[test]
    fn new_image_is_unset() {
        let image = Bitmap::new(HeaderVersion::Info);
        assert_eq!(image.header_size(), 40);
        assert_eq!(image.compression(), Compression::Rgb);
        assert!(matches!(image.width(), Err(Error::FieldNotInitialized("width"))));
        assert!(matches!(image.pixel_format(), Err(Error::FieldNotInitialized(_))));
        assert!(matches!(image.pixels(), Err(Error::PixelArrayNotAllocated)));
    }

    #[test]
    fn default_info_image() {
        let image = create_info_image();
        assert_eq!(image.width().unwrap(), 2);
        assert_eq!(image.height().unwrap(), 2);
        assert_eq!(image.color_depth().unwrap(), 24);
        assert_eq!(image.image_size().unwrap(), 16);
        assert_eq!(image.print_resolution_x().unwrap(), 2835);
        assert_eq!(image.pixels().unwrap(), [BLUE, WHITE, RED, GREEN]);
        assert_eq!(image.file_size_in_bytes().unwrap(), 70);
    }

    #[test]
    fn default_v4_image() {
        let image = create_v4_image();
        assert_eq!(image.header_size(), 108);
        assert_eq!(image.compression(), Compression::BitFields);
        assert_eq!(image.color_space().unwrap(), ColorSpace::Windows);
        assert_eq!(image.image_size().unwrap(), 32);
        assert_eq!(image.pixel(0, 3).unwrap(), Pixel::argb(127, 255, 255, 255));
        assert_eq!(image.pixel(1, 0).unwrap(), Pixel::argb(255, 0, 0, 255));
        assert_eq!(image.file_size_in_bytes().unwrap(), 154);
    }

    #[test]
    fn default_pixel_format_must_match_version() {
        let mut image = Bitmap::new(HeaderVersion::Info);
        let error = image.initialize_default(PixelFormat::Argb32).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn reject_invalid_metadata() {
        let mut image = Bitmap::new(HeaderVersion::Info);
        assert!(image.set_width(0).is_err());
        assert!(image.set_height(-5).is_err());
        assert!(image.set_color_plane_count(2).is_err());
        assert!(image.set_print_resolution_x(0).is_err());
        assert!(image.set_compression(Compression::BitFields).is_err());
        assert!(image.set_color_depth(16).is_err());
        assert!(matches!(
            image.set_color_space(ColorSpace::Windows),
            Err(Error::ColorSpaceNotAllowed(HeaderVersion::Info))
        ));
    }

    #[test]
    fn color_depth_and_pixel_format_are_coupled() {
        let mut image = Bitmap::new(HeaderVersion::V4);
        image.set_color_depth(32).unwrap();
        assert_eq!(image.pixel_format().unwrap(), PixelFormat::Argb32);
        image.set_header_version(HeaderVersion::Info);
        image.set_pixel_format(PixelFormat::Rgb24).unwrap();
        assert_eq!(image.color_depth().unwrap(), 24);
    }

    #[test]
    fn header_version_switch_updates_dependent_fields() {
        let mut image = create_info_image();
        image.set_header_version(HeaderVersion::V4);
        assert_eq!(image.header_size(), 108);
        assert_eq!(image.compression(), Compression::BitFields);
        assert_eq!(image.color_space().unwrap(), ColorSpace::Windows);
    }

    #[test]
    fn pixel_array_requires_geometry() {
        let mut image = Bitmap::new(HeaderVersion::Info);
        image.set_width(3).unwrap();
        assert!(image.set_up_pixel_array().is_err());
        image.set_height(5).unwrap();
        image.set_up_pixel_array().unwrap();
        assert_eq!(image.pixels().unwrap().len(), 15);
    }

    #[test]
    fn geometry_change_drops_pixel_array() {
        let mut image = create_info_image();
        image.set_width(2).unwrap();
        assert_eq!(image.pixels().unwrap().len(), 4);
        image.set_width(3).unwrap();
        assert!(matches!(image.pixels(), Err(Error::PixelArrayNotAllocated)));
        assert!(matches!(image.pixel(1, 2), Err(Error::PixelArrayNotAllocated)));
        assert!(matches!(
            image.set_pixel(1, 2, WHITE),
            Err(Error::PixelArrayNotAllocated)
        ));
        image.set_up_pixel_array().unwrap();
        image.set_height(4).unwrap();
        assert!(image.pixel(3, 2).is_err());
        image.set_up_pixel_array().unwrap();
        assert_eq!(image.pixel(3, 2).unwrap(), Pixel::default());
    }

    #[test]
    fn oversized_pixel_array_is_rejected() {
        let mut image = Bitmap::new(HeaderVersion::V4);
        image.set_width(i32::MAX).unwrap();
        image.set_height(i32::MAX).unwrap();
        let error = image.set_up_pixel_array().unwrap_err();
        assert!(matches!(error, Error::DimensionsTooLarge { .. }));
        assert_eq!(error.kind(), ErrorKind::InvalidArgument);
        assert!(image.pixels().is_err());
    }

    #[test]
    fn pixel_access_is_bound_checked() {
        let mut image = create_info_image();
        assert!(matches!(
            image.pixel(2, 0),
            Err(Error::PixelIndexOutOfRange { row: 2, .. })
        ));
        let error = image.set_pixel(0, -1, WHITE).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn rgb_pixels_drop_alpha() {
        let mut image = create_info_image();
        image.set_pixel(1, 1, Pixel::argb(99, 1, 2, 3)).unwrap();
        assert_eq!(image.pixel(1, 1).unwrap(), Pixel::rgb(1, 2, 3));
    }

    #[test]
    fn validate_detects_stale_image_size() {
        let mut image = create_info_image();
        image.set_width(3).unwrap();
        image.set_up_pixel_array().unwrap();
        assert!(matches!(
            image.validate(),
            Err(Error::ImageSizeMismatch { stored: 16, computed: 24 })
        ));
        image.update_image_size().unwrap();
        assert!(image.validate().is_ok());
    }
}
