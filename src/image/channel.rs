use std::fmt::Display;

use super::{Bitmap, Pixel};
use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelType {
    Red,
    Green,
    Blue,
    Alpha,
}

impl ChannelType {
    fn component(&self, pixel: &Pixel) -> u8 {
        match self {
            Self::Red => pixel.red,
            Self::Green => pixel.green,
            Self::Blue => pixel.blue,
            Self::Alpha => pixel.alpha,
        }
    }

    fn component_mut<'a>(&self, pixel: &'a mut Pixel) -> &'a mut u8 {
        match self {
            Self::Red => &mut pixel.red,
            Self::Green => &mut pixel.green,
            Self::Blue => &mut pixel.blue,
            Self::Alpha => &mut pixel.alpha,
        }
    }
}

impl Display for ChannelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Red => write!(f, "red"),
            Self::Green => write!(f, "green"),
            Self::Blue => write!(f, "blue"),
            Self::Alpha => write!(f, "alpha"),
        }
    }
}

/// A single color component of an image as an owned 2-D byte plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Channel {
    width: i32,
    height: i32,
    dots: Vec<u8>,
}

impl Channel {
    pub fn new(width: i32, height: i32) -> crate::Result<Self> {
        if width <= 0 {
            return Err(Error::InvalidDimension("channel width", width));
        }
        if height <= 0 {
            return Err(Error::InvalidDimension("channel height", height));
        }
        // a plane never holds more bytes than a bitmap file can address
        let resolution = (width as u32)
            .checked_mul(height as u32)
            .ok_or(Error::DimensionsTooLarge { width, height })?;
        Ok(Self {
            width,
            height,
            dots: vec![0; resolution as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn resolution(&self) -> usize {
        self.dots.len()
    }

    pub fn dots(&self) -> &[u8] {
        &self.dots
    }

    pub fn dots_mut(&mut self) -> &mut [u8] {
        &mut self.dots
    }

    pub fn pixel(&self, row: i32, column: i32) -> crate::Result<u8> {
        let index = self.index(row, column)?;
        Ok(self.dots[index])
    }

    pub fn set_pixel(&mut self, row: i32, column: i32, value: u8) -> crate::Result<()> {
        let index = self.index(row, column)?;
        self.dots[index] = value;
        Ok(())
    }

    fn index(&self, row: i32, column: i32) -> crate::Result<usize> {
        if row < 0 || column < 0 || row >= self.height || column >= self.width {
            return Err(Error::PixelIndexOutOfRange {
                row,
                column,
                width: self.width,
                height: self.height,
            });
        }
        Ok(row as usize * self.width as usize + column as usize)
    }
}

fn verify_channel_present(image: &Bitmap, channel_type: ChannelType) -> crate::Result<()> {
    let pixel_format = image.pixel_format()?;
    if channel_type == ChannelType::Alpha && !pixel_format.has_alpha() {
        return Err(Error::ChannelNotPresent(channel_type, pixel_format));
    }
    Ok(())
}

/// Copies one component of every pixel into a new channel.
pub fn extract(image: &Bitmap, channel_type: ChannelType) -> crate::Result<Channel> {
    verify_channel_present(image, channel_type)?;
    let mut channel = Channel::new(image.width()?, image.height()?)?;
    let pixels = image.pixels()?;
    if pixels.len() != channel.resolution() {
        return Err(Error::PixelArrayNotAllocated);
    }
    channel.dots = pixels.iter().map(|p| channel_type.component(p)).collect();
    Ok(channel)
}

/// Overwrites one component of every pixel with the channel's values.
pub fn inject(
    image: &mut Bitmap,
    channel_type: ChannelType,
    channel: &Channel,
) -> crate::Result<()> {
    let image_geometry = (image.width()?, image.height()?);
    if image_geometry != (channel.width, channel.height) {
        return Err(Error::ChannelDimensionMismatch {
            image: image_geometry,
            channel: (channel.width, channel.height),
        });
    }
    verify_channel_present(image, channel_type)?;
    let pixels = image.pixels_mut()?;
    if pixels.len() != channel.resolution() {
        return Err(Error::PixelArrayNotAllocated);
    }
    pixels
        .iter_mut()
        .zip(channel.dots.iter())
        .for_each(|(pixel, dot)| *channel_type.component_mut(pixel) = *dot);
    Ok(())
}

impl Bitmap {
    pub fn red_channel(&self) -> crate::Result<Channel> {
        extract(self, ChannelType::Red)
    }

    pub fn green_channel(&self) -> crate::Result<Channel> {
        extract(self, ChannelType::Green)
    }

    pub fn blue_channel(&self) -> crate::Result<Channel> {
        extract(self, ChannelType::Blue)
    }

    pub fn alpha_channel(&self) -> crate::Result<Channel> {
        extract(self, ChannelType::Alpha)
    }

    pub fn set_channel(
        &mut self,
        channel_type: ChannelType,
        channel: &Channel,
    ) -> crate::Result<()> {
        inject(self, channel_type, channel)
    }
}
