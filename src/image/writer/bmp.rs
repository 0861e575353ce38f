use std::io::Write;

use crate::binary_stream::FieldWriter;
use crate::image::header::{
    HeaderVersion, ALPHA_CHANNEL_MASK, BLUE_CHANNEL_MASK, COLOR_SPACE_ENDPOINTS_SIZE,
    COLOR_SPACE_GAMMA_SIZE, FILE_HEADER_SIZE, GREEN_CHANNEL_MASK, INFO_HEADER_SIZE, MAGIC_BYTES,
    RED_CHANNEL_MASK,
};
use crate::image::layout::Layout;
use crate::image::{Bitmap, ImageWriter};

pub struct BmpImageWriter<'a, T: Write> {
    writer: T,
    image: &'a Bitmap,
}

impl<'a, T: Write> BmpImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a Bitmap) -> Self {
        Self { writer, image }
    }
}

impl<T: Write> ImageWriter for BmpImageWriter<'_, T> {
    fn write_image(&mut self) -> crate::Result<()> {
        let layout = self.image.validate()?;
        let mut encoder = Encoder::new(&mut self.writer, self.image, layout);
        encoder.encode()
    }
}

fn check_offset(section: &str, actual: u64, expected: u32) {
    if actual != expected as u64 {
        panic!(
            "Writing the {} ended at offset {}, but the layout expects {}",
            section, actual, expected
        );
    }
}

struct Encoder<'a, T: Write> {
    writer: FieldWriter<'a, T>,
    image: &'a Bitmap,
    layout: Layout,
}

impl<'a, T: Write> Encoder<'a, T> {
    fn new(writer: &'a mut T, image: &'a Bitmap, layout: Layout) -> Self {
        Self {
            writer: FieldWriter::new(writer),
            image,
            layout,
        }
    }

    fn encode(&mut self) -> crate::Result<()> {
        log::info!(
            "Writing {} bitmap of {} bytes",
            self.image.header_version(),
            self.layout.file_size
        );
        self.write_file_header()?;
        check_offset("file header", self.writer.offset(), FILE_HEADER_SIZE);
        self.write_info_header()?;
        check_offset(
            "info header",
            self.writer.offset(),
            FILE_HEADER_SIZE + INFO_HEADER_SIZE,
        );
        if self.image.header_version() == HeaderVersion::V4 {
            self.write_v4_header_extension()?;
        }
        check_offset(
            "bitmap header",
            self.writer.offset(),
            self.layout.pixel_array_offset,
        );
        self.write_pixel_array()?;
        check_offset("pixel array", self.writer.offset(), self.layout.file_size);
        self.writer.flush()
    }

    fn write_file_header(&mut self) -> crate::Result<()> {
        self.writer.write_bytes("magic", &MAGIC_BYTES)?;
        self.writer.write_field("file size", self.layout.file_size)?;
        self.writer.write_zeros("reserved", 4)?;
        self.writer
            .write_field("pixel array offset", self.layout.pixel_array_offset)
    }

    fn write_info_header(&mut self) -> crate::Result<()> {
        let image = self.image;
        log::debug!(
            "{}x{} pixels, {} bpp, {}",
            image.width()?,
            image.height()?,
            image.color_depth()?,
            image.compression()
        );
        self.writer.write_field("header size", image.header_size())?;
        self.writer.write_field("width", image.width()?)?;
        self.writer.write_field("height", image.height()?)?;
        self.writer
            .write_field("color planes", image.color_plane_count()?)?;
        self.writer.write_field("color depth", image.color_depth()?)?;
        self.writer
            .write_field("compression", image.compression().value())?;
        self.writer.write_field("image size", image.image_size()?)?;
        self.writer
            .write_field("print resolution x", image.print_resolution_x()?)?;
        self.writer
            .write_field("print resolution y", image.print_resolution_y()?)?;
        self.writer
            .write_field("palette color count", image.palette_color_count())?;
        self.writer
            .write_field("important color count", image.important_color_count())
    }

    fn write_v4_header_extension(&mut self) -> crate::Result<()> {
        self.writer.write_field("red mask", RED_CHANNEL_MASK)?;
        self.writer.write_field("green mask", GREEN_CHANNEL_MASK)?;
        self.writer.write_field("blue mask", BLUE_CHANNEL_MASK)?;
        self.writer.write_field("alpha mask", ALPHA_CHANNEL_MASK)?;
        let color_space = self.image.color_space()?;
        self.writer.write_bytes("color space", &color_space.tag())?;
        self.writer
            .write_zeros("color space endpoints", COLOR_SPACE_ENDPOINTS_SIZE)?;
        self.writer.write_zeros("gamma", COLOR_SPACE_GAMMA_SIZE)
    }

    fn write_pixel_array(&mut self) -> crate::Result<()> {
        let image = self.image;
        let width = image.width()? as usize;
        let height = image.height()? as usize;
        let pixels = image.pixels()?;
        let has_alpha = image.pixel_format()?.has_alpha();
        let padded_row_size = self.layout.padded_row_size() as usize;
        let mut row_buffer = Vec::with_capacity(padded_row_size);
        for row_index in 0..height {
            // the info variant stores the bottom row first
            let source_row = match image.header_version() {
                HeaderVersion::Info => height - 1 - row_index,
                HeaderVersion::V4 => row_index,
            };
            let row = &pixels[source_row * width..(source_row + 1) * width];
            row_buffer.clear();
            for pixel in row {
                row_buffer.extend_from_slice(&[pixel.blue, pixel.green, pixel.red]);
                if has_alpha {
                    row_buffer.push(pixel.alpha);
                }
            }
            row_buffer.resize(padded_row_size, 0);
            self.writer.write_bytes("pixel row", &row_buffer)?;
        }
        Ok(())
    }
}
