use std::io::Read;

use crate::binary_stream::FieldReader;
use crate::error::Error;
use crate::image::channel::ChannelType;
use crate::image::header::{
    ColorSpace, Compression, HeaderVersion, PixelFormat, ALPHA_CHANNEL_MASK, BLUE_CHANNEL_MASK,
    COLOR_SPACE_ENDPOINTS_SIZE, COLOR_SPACE_GAMMA_SIZE, FILE_HEADER_SIZE, GREEN_CHANNEL_MASK,
    MAGIC_BYTES, RED_CHANNEL_MASK,
};
use crate::image::layout::Layout;
use crate::image::{Bitmap, ImageReader, Pixel, DEFAULT_COLOR_PLANE_COUNT};

pub struct BmpImageReader<T: Read> {
    reader: T,
}

impl<T: Read> BmpImageReader<T> {
    pub fn new(reader: T) -> Self {
        Self { reader }
    }
}

impl<T: Read> ImageReader for BmpImageReader<T> {
    fn read_image(&mut self) -> crate::Result<Bitmap> {
        let mut decoder = Decoder::new(&mut self.reader);
        decoder.decode()
    }
}

/// Sizes taken from the file header, checked once the geometry is known.
struct FileHeader {
    file_size: u32,
    pixel_array_offset: u32,
}

fn check_declared(field: &'static str, declared: u64, computed: u64) -> crate::Result<()> {
    if declared != computed {
        return Err(Error::MismatchBetweenDeclaredAndComputed {
            field,
            declared,
            computed,
        });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: i32) -> crate::Result<i32> {
    if value <= 0 {
        return Err(Error::InvalidHeaderField(field, value as i64));
    }
    Ok(value)
}

struct Decoder<'a, T: Read> {
    reader: FieldReader<'a, T>,
}

impl<'a, T: Read> Decoder<'a, T> {
    fn new(reader: &'a mut T) -> Self {
        Self {
            reader: FieldReader::new(reader),
        }
    }

    fn decode(&mut self) -> crate::Result<Bitmap> {
        let file_header = self.read_file_header()?;
        let header_size: u32 = self.reader.read_field("header size")?;
        let version = HeaderVersion::from_header_size(header_size)?;
        let mut image = Bitmap::new(version);
        self.read_info_header(&mut image)?;
        if version == HeaderVersion::V4 {
            self.read_v4_header_extension(&mut image)?;
        }
        let layout = image.layout()?;
        check_declared(
            "pixel array offset",
            file_header.pixel_array_offset as u64,
            layout.pixel_array_offset as u64,
        )?;
        check_declared(
            "header end",
            self.reader.offset(),
            layout.pixel_array_offset as u64,
        )?;
        check_declared(
            "file size",
            file_header.file_size as u64,
            layout.file_size as u64,
        )?;
        self.read_pixel_array(&mut image, &layout)?;
        check_declared(
            "file size",
            file_header.file_size as u64,
            self.reader.offset(),
        )?;
        log::info!(
            "Read {} bitmap of {}x{} pixels",
            version,
            image.width()?,
            image.height()?
        );
        Ok(image)
    }

    fn read_file_header(&mut self) -> crate::Result<FileHeader> {
        let magic = self.reader.read_array::<2>("magic")?;
        if magic != MAGIC_BYTES {
            return Err(Error::InvalidMagicBytes(magic));
        }
        let file_size = self.reader.read_field("file size")?;
        self.reader.skip("reserved", 4)?;
        let pixel_array_offset = self.reader.read_field("pixel array offset")?;
        debug_assert_eq!(self.reader.offset(), FILE_HEADER_SIZE as u64);
        Ok(FileHeader {
            file_size,
            pixel_array_offset,
        })
    }

    fn read_info_header(&mut self, image: &mut Bitmap) -> crate::Result<()> {
        let version = image.header_version();
        let width = check_positive("width", self.reader.read_field("width")?)?;
        let height = check_positive("height", self.reader.read_field("height")?)?;
        image.set_width(width)?;
        image.set_height(height)?;

        let color_plane_count: u16 = self.reader.read_field("color planes")?;
        if color_plane_count != DEFAULT_COLOR_PLANE_COUNT {
            return Err(Error::InvalidHeaderField(
                "color planes",
                color_plane_count as i64,
            ));
        }
        image.set_color_plane_count(color_plane_count)?;

        let color_depth: u16 = self.reader.read_field("color depth")?;
        let pixel_format = PixelFormat::from_color_depth(color_depth)?;
        if pixel_format != version.pixel_format() {
            return Err(Error::UnsupportedColorDepth(color_depth));
        }
        image.set_pixel_format(pixel_format)?;

        let compression = Compression::from_value(self.reader.read_field("compression")?)?;
        if compression != version.compression() {
            return Err(Error::UnsupportedCompression(compression.value()));
        }
        image.set_compression(compression)?;

        let image_size: u32 = self.reader.read_field("image size")?;
        check_declared(
            "image size",
            image_size as u64,
            image.raw_image_size_in_bytes()? as u64,
        )?;
        image.set_image_size(image_size);

        let print_resolution_x =
            check_positive("print resolution x", self.reader.read_field("print resolution x")?)?;
        let print_resolution_y =
            check_positive("print resolution y", self.reader.read_field("print resolution y")?)?;
        image.set_print_resolution_x(print_resolution_x)?;
        image.set_print_resolution_y(print_resolution_y)?;

        image.set_palette_color_count(self.reader.read_field("palette color count")?);
        image.set_important_color_count(self.reader.read_field("important color count")?);
        log::debug!(
            "{}x{} pixels, {} bpp, {}",
            width,
            height,
            color_depth,
            compression
        );
        Ok(())
    }

    fn read_channel_mask(&mut self, channel: ChannelType, expected: u32) -> crate::Result<()> {
        let mask: u32 = self.reader.read_field("channel mask")?;
        if mask != expected {
            return Err(Error::UnsupportedChannelMask(channel, mask));
        }
        Ok(())
    }

    fn read_v4_header_extension(&mut self, image: &mut Bitmap) -> crate::Result<()> {
        self.read_channel_mask(ChannelType::Red, RED_CHANNEL_MASK)?;
        self.read_channel_mask(ChannelType::Green, GREEN_CHANNEL_MASK)?;
        self.read_channel_mask(ChannelType::Blue, BLUE_CHANNEL_MASK)?;
        self.read_channel_mask(ChannelType::Alpha, ALPHA_CHANNEL_MASK)?;
        let tag = self.reader.read_array::<4>("color space")?;
        image.set_color_space(ColorSpace::from_tag(tag)?)?;
        self.reader
            .skip("color space endpoints", COLOR_SPACE_ENDPOINTS_SIZE)?;
        self.reader.skip("gamma", COLOR_SPACE_GAMMA_SIZE)
    }

    fn read_pixel_array(&mut self, image: &mut Bitmap, layout: &Layout) -> crate::Result<()> {
        let width = image.width()? as usize;
        let height = image.height()? as usize;
        let has_alpha = image.pixel_format()?.has_alpha();
        let bytes_per_pixel = image.pixel_format()?.bytes_per_pixel() as usize;
        let mut row_buffer = vec![0; layout.padded_row_size() as usize];
        // grows with the rows actually present in the stream
        let mut pixels: Vec<Pixel> = Vec::with_capacity(width);
        for _ in 0..height {
            self.reader.read_bytes("pixel row", &mut row_buffer)?;
            let row = row_buffer[..layout.bytes_per_row as usize]
                .chunks_exact(bytes_per_pixel)
                .map(|bytes| Pixel {
                    blue: bytes[0],
                    green: bytes[1],
                    red: bytes[2],
                    alpha: if has_alpha { bytes[3] } else { 0 },
                });
            pixels.extend(row);
        }
        // the info variant stores the bottom row first
        if image.header_version() == HeaderVersion::Info {
            pixels.reverse();
            pixels
                .chunks_exact_mut(width)
                .for_each(|row| row.reverse());
        }
        debug_assert_eq!(pixels.len(), width * height);
        image.set_pixels(pixels);
        Ok(())
    }
}
