use std::env::args_os;
use std::path::PathBuf;

use bitmap_codec::image::channel::{Channel, ChannelType};
use bitmap_codec::image::header::{HeaderVersion, PixelFormat};
use bitmap_codec::image::{Bitmap, DEFAULT_COLOR_PLANE_COUNT, DEFAULT_PRINT_RESOLUTION};
use bitmap_codec::save_bitmap;

const WIDTH: i32 = 1920;
const HEIGHT: i32 = 1080;

fn random_channel() -> Channel {
    let mut channel = Channel::new(WIDTH, HEIGHT).expect("channel geometry is valid");
    getrandom::getrandom(channel.dots_mut()).expect("random source unavailable");
    channel
}

fn create_image(header_version: HeaderVersion) -> bitmap_codec::Result<Bitmap> {
    let pixel_format = header_version.pixel_format();
    let mut image = Bitmap::new(header_version);
    image.set_pixel_format(pixel_format)?;
    image.set_width(WIDTH)?;
    image.set_height(HEIGHT)?;
    image.set_color_plane_count(DEFAULT_COLOR_PLANE_COUNT)?;
    image.set_print_resolution_x(DEFAULT_PRINT_RESOLUTION)?;
    image.set_print_resolution_y(DEFAULT_PRINT_RESOLUTION)?;
    image.set_up_pixel_array()?;
    image.update_image_size()?;
    image.set_channel(ChannelType::Red, &random_channel())?;
    image.set_channel(ChannelType::Green, &random_channel())?;
    image.set_channel(ChannelType::Blue, &random_channel())?;
    if pixel_format == PixelFormat::Argb32 {
        let mut alpha = random_channel();
        // 150..=239
        alpha.dots_mut().iter_mut().for_each(|a| *a = 150 + *a % 90);
        image.set_channel(ChannelType::Alpha, &alpha)?;
    }
    Ok(image)
}

fn generate(target_directory: PathBuf) -> bitmap_codec::Result<()> {
    let images = [("apple.bmp", HeaderVersion::V4), ("art.bmp", HeaderVersion::Info)];
    for (file_name, header_version) in images {
        let image = create_image(header_version)?;
        let file_path = target_directory.join(file_name);
        save_bitmap(&image, &file_path)?;
        println!("Generated {} ({})", file_path.display(), header_version);
    }
    Ok(())
}

fn main() {
    let target_directory = args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    if let Err(e) = generate(target_directory) {
        eprintln!("Generating images failed because of: {}", e);
    }
}
