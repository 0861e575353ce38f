use std::{
    fs::{File, OpenOptions},
    io::{BufReader, BufWriter},
    path::{Path, PathBuf},
};

pub use cli::CLIParser;
use error::Error;
use image::{
    header::HeaderVersion, reader::bmp::BmpImageReader, writer::bmp::BmpImageWriter, Bitmap,
    ImageReader, ImageWriter,
};

pub mod binary_stream;
mod cli;
pub mod error;
pub mod image;
mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    output_file: PathBuf,
    header_version: HeaderVersion,
}

impl Arguments {
    pub fn output_file(&self) -> &Path {
        &self.output_file
    }

    pub fn header_version(&self) -> HeaderVersion {
        self.header_version
    }
}

fn open_input_file(file_path: &Path) -> Result<File> {
    File::open(file_path).map_err(|e| {
        Error::UnableToOpenInputFileForReading(file_path.to_string_lossy().into_owned(), e)
    })
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.to_string_lossy().into_owned(), e)
        })
}

/// Writes `image` to `file_path`, replacing any existing file.
pub fn save_bitmap(image: &Bitmap, file_path: &Path) -> Result<()> {
    let output_file = open_output_file(file_path)?;
    let mut writer = BmpImageWriter::new(BufWriter::new(&output_file), image);
    writer.write_image()?;
    log::info!("Saved bitmap to {}", file_path.display());
    Ok(())
}

pub fn parse_bitmap(file_path: &Path) -> Result<Bitmap> {
    let input_file = open_input_file(file_path)?;
    let mut reader = BmpImageReader::new(BufReader::new(&input_file));
    let image = reader.read_image()?;
    log::info!("Parsed bitmap from {}", file_path.display());
    Ok(image)
}

/// Builds the default sample image for the requested header version and
/// saves it to the output file.
pub fn write_sample_bitmap(arguments: &Arguments) -> Result<Bitmap> {
    let header_version = arguments.header_version();
    let mut image = Bitmap::new(header_version);
    image.initialize_default(header_version.pixel_format())?;
    save_bitmap(&image, arguments.output_file())?;
    Ok(image)
}
