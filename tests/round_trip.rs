use bitmap_codec::error::ErrorKind;
use bitmap_codec::image::channel::{Channel, ChannelType};
use bitmap_codec::image::header::{HeaderVersion, PixelFormat};
use bitmap_codec::image::{Bitmap, Pixel};
use bitmap_codec::{parse_bitmap, save_bitmap, write_sample_bitmap, CLIParser};
use std::path::{Path, PathBuf};
use std::{env, fs};

fn get_project_root_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn get_result_image_path(file_name: &str) -> PathBuf {
    let mut root_path = get_project_root_path();
    root_path.push("tests");
    root_path.push(file_name);
    root_path
}

fn cleanup(path: &Path) {
    if path.exists() && path.is_file() {
        fs::remove_file(path).expect("Deletion of output file failed");
    }
}

fn create_default_image(header_version: HeaderVersion) -> Bitmap {
    let mut image = Bitmap::new(header_version);
    image
        .initialize_default(header_version.pixel_format())
        .expect("Default initialization failed");
    image
}

#[test]
fn test_info_sample_round_trip() {
    let path = get_result_image_path("info_sample.bmp");
    cleanup(&path);
    let image = create_default_image(HeaderVersion::Info);
    save_bitmap(&image, &path).expect("Saving failed");
    assert_eq!(fs::metadata(&path).unwrap().len(), 70);
    let parsed = parse_bitmap(&path).expect("Parsing failed");
    cleanup(&path);
    assert_eq!(parsed, image);
    assert_eq!(parsed.pixel(0, 0).unwrap(), Pixel::rgb(0, 0, 255));
    assert_eq!(parsed.pixel(0, 1).unwrap(), Pixel::rgb(255, 255, 255));
    assert_eq!(parsed.pixel(1, 0).unwrap(), Pixel::rgb(255, 0, 0));
    assert_eq!(parsed.pixel(1, 1).unwrap(), Pixel::rgb(0, 255, 0));
    let layout = parsed.layout().unwrap();
    assert_eq!(layout.pixel_array_offset, 54);
    assert_eq!(layout.row_padding, 2);
}

#[test]
fn test_v4_sample_round_trip() {
    let path = get_result_image_path("v4_sample.bmp");
    cleanup(&path);
    let image = create_default_image(HeaderVersion::V4);
    save_bitmap(&image, &path).expect("Saving failed");
    assert_eq!(fs::metadata(&path).unwrap().len(), 154);
    let parsed = parse_bitmap(&path).expect("Parsing failed");
    cleanup(&path);
    assert_eq!(parsed, image);
    assert_eq!(parsed.pixel(0, 3).unwrap().alpha, 127);
    assert_eq!(parsed.pixel(1, 0).unwrap().alpha, 255);
    let layout = parsed.layout().unwrap();
    assert_eq!(layout.pixel_array_offset, 122);
    assert_eq!(layout.row_padding, 0);
}

#[test]
fn test_reject_unsupported_header_size() {
    let path = get_result_image_path("core_header.bmp");
    cleanup(&path);
    let image = create_default_image(HeaderVersion::Info);
    save_bitmap(&image, &path).expect("Saving failed");
    let mut bytes = fs::read(&path).unwrap();
    bytes[14] = 12;
    fs::write(&path, &bytes).unwrap();
    let error = parse_bitmap(&path).unwrap_err();
    cleanup(&path);
    assert_eq!(error.kind(), ErrorKind::UnsupportedFormat);
}

#[test]
fn test_reject_alpha_for_rgb_image() {
    let mut image = create_default_image(HeaderVersion::Info);
    let alpha = Channel::new(2, 2).unwrap();
    let error = image.set_channel(ChannelType::Alpha, &alpha).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_odd_width_channels_round_trip() {
    let path = get_result_image_path("odd_width.bmp");
    cleanup(&path);
    let mut image = Bitmap::new(HeaderVersion::Info);
    image.initialize_default(PixelFormat::Rgb24).unwrap();
    image.set_width(5).unwrap();
    image.set_height(3).unwrap();
    image.set_up_pixel_array().unwrap();
    image.update_image_size().unwrap();
    let mut red = Channel::new(5, 3).unwrap();
    for (index, dot) in red.dots_mut().iter_mut().enumerate() {
        *dot = (index * 17) as u8;
    }
    image.set_channel(ChannelType::Red, &red).unwrap();
    save_bitmap(&image, &path).expect("Saving failed");
    // 15 bytes per row padded to 16
    assert_eq!(fs::metadata(&path).unwrap().len(), 54 + 3 * 16);
    let parsed = parse_bitmap(&path).expect("Parsing failed");
    cleanup(&path);
    assert_eq!(parsed.red_channel().unwrap(), red);
    assert!(parsed.green_channel().unwrap().dots().iter().all(|d| *d == 0));
}

#[test]
fn test_distinct_metadata_round_trip() {
    for (file_name, header_version) in [
        ("distinct_v4.bmp", HeaderVersion::V4),
        ("distinct_info.bmp", HeaderVersion::Info),
    ] {
        let path = get_result_image_path(file_name);
        cleanup(&path);
        let mut image = Bitmap::new(header_version);
        image
            .set_pixel_format(header_version.pixel_format())
            .unwrap();
        image.set_width(3).unwrap();
        image.set_height(5).unwrap();
        image.set_color_plane_count(1).unwrap();
        image.set_print_resolution_x(1000).unwrap();
        image.set_print_resolution_y(2000).unwrap();
        image.set_palette_color_count(7);
        image.set_important_color_count(3);
        image.set_up_pixel_array().unwrap();
        image.update_image_size().unwrap();
        for row in 0..5 {
            for column in 0..3 {
                let value = (row * 3 + column) as u8 * 16;
                let pixel = Pixel::argb(255 - value, value, 255 - value, value / 2);
                image.set_pixel(row, column, pixel).unwrap();
            }
        }
        save_bitmap(&image, &path).expect("Saving failed");
        let parsed = parse_bitmap(&path).expect("Parsing failed");
        cleanup(&path);
        assert_eq!(parsed, image);
        assert_eq!(parsed.print_resolution_x().unwrap(), 1000);
        assert_eq!(parsed.print_resolution_y().unwrap(), 2000);
        assert_eq!(parsed.palette_color_count(), 7);
        assert_eq!(parsed.important_color_count(), 3);
        assert_eq!(parsed.pixel(4, 2).unwrap().red, 224);
    }
}

#[test]
fn test_write_sample_from_arguments() {
    let path = get_result_image_path("cli_sample.bmp");
    cleanup(&path);
    let mut cli_parser = CLIParser::new();
    let arguments = cli_parser.parse(vec!["test", path.to_str().unwrap(), "-v", "V4"]);
    let written = write_sample_bitmap(&arguments).expect("Writing sample failed");
    let parsed = parse_bitmap(&path).expect("Parsing failed");
    cleanup(&path);
    assert_eq!(written, parsed);
    assert_eq!(parsed.header_version(), HeaderVersion::V4);
}

#[test]
fn test_parse_missing_file() {
    let path = get_result_image_path("does_not_exist.bmp");
    let error = parse_bitmap(&path).unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IoFailure);
}
