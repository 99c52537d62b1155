//! Packed 1-bit image planes.
//!
//! Pixels are stored row-major, eight to a byte, with the leftmost pixel in the most significant
//! bit. A row that does not fill its last byte leaves the low bits of that byte unused. A set bit
//! means ink on this plane. That is the opposite polarity to the panel RAM, and the controller
//! inverts while transmitting, so the buffer is never stored inverted.

use crate::command::consts::{BUFFER_LEN, HEIGHT, WIDTH};
use crate::error::Error;

/// One plane of `width` x `height` pixels backed by `B`.
#[derive(Clone, Debug)]
pub struct Framebuffer<B = [u8; BUFFER_LEN]> {
    buf: B,
    width: u16,
    height: u16,
    stride: usize,
}

/// Bytes needed for one row of `width` pixels.
pub const fn stride_for(width: u16) -> usize {
    (width as usize + 7) / 8
}

impl<B> Framebuffer<B>
where
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    /// Wrap `buf` as a plane of `width` x `height` pixels. `buf` must be exactly
    /// `ceil(width / 8) * height` bytes long. Its contents are kept as they are.
    pub fn new(width: u16, height: u16, buf: B) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidGeometry { width, height });
        }
        let stride = stride_for(width);
        let expected = stride * usize::from(height);
        let actual = buf.as_ref().len();
        if actual != expected {
            return Err(Error::BufferSize { expected, actual });
        }
        Ok(Framebuffer {
            buf,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Bytes per row.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.buf.as_ref()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.buf.as_mut()
    }

    pub fn into_inner(self) -> B {
        self.buf
    }

    /// Byte index and bit mask of a pixel, or `None` if it lies outside the plane.
    fn locate(&self, x: u16, y: u16) -> Option<(usize, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = usize::from(y) * self.stride + usize::from(x / 8);
        Some((index, 0x80 >> (x % 8)))
    }

    pub fn get_pixel(&self, x: u16, y: u16) -> Option<bool> {
        self.locate(x, y)
            .map(|(index, mask)| self.buf.as_ref()[index] & mask != 0)
    }

    /// Set or clear one pixel. Coordinates outside the plane are ignored.
    pub fn set_pixel(&mut self, x: u16, y: u16, on: bool) {
        if let Some((index, mask)) = self.locate(x, y) {
            let byte = &mut self.buf.as_mut()[index];
            if on {
                *byte |= mask;
            } else {
                *byte &= !mask;
            }
        }
    }

    /// Overwrite every byte of the plane with `value`.
    pub fn fill(&mut self, value: u8) {
        for byte in self.buf.as_mut().iter_mut() {
            *byte = value;
        }
    }

    pub fn clear(&mut self) {
        self.fill(0x00);
    }
}

impl Default for Framebuffer<[u8; BUFFER_LEN]> {
    /// A blank plane covering the whole panel.
    fn default() -> Self {
        Framebuffer {
            buf: [0; BUFFER_LEN],
            width: WIDTH,
            height: HEIGHT,
            stride: stride_for(WIDTH),
        }
    }
}

#[cfg(feature = "std")]
impl Framebuffer<Vec<u8>> {
    /// Allocate a blank plane of `width` x `height` pixels on the heap.
    pub fn alloc(width: u16, height: u16) -> Result<Self, Error> {
        Framebuffer::new(
            width,
            height,
            vec![0; stride_for(width) * usize::from(height)],
        )
    }
}

#[cfg(feature = "graphics")]
mod graphics {
    //! `embedded-graphics` drawing support. `BinaryColor::On` puts ink on the plane.

    use core::convert::Infallible;

    use embedded_graphics::draw_target::DrawTarget;
    use embedded_graphics::geometry::{Dimensions, OriginDimensions, Size};
    use embedded_graphics::pixelcolor::BinaryColor;
    use embedded_graphics::primitives::Rectangle;
    use embedded_graphics::Pixel;
    use itertools::iproduct;

    use super::Framebuffer;

    impl<B> OriginDimensions for Framebuffer<B> {
        fn size(&self) -> Size {
            Size::new(u32::from(self.width), u32::from(self.height))
        }
    }

    impl<B> DrawTarget for Framebuffer<B>
    where
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        type Color = BinaryColor;
        type Error = Infallible;

        fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(point, color) in pixels {
                if let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) {
                    self.set_pixel(x, y, color.is_on());
                }
            }
            Ok(())
        }

        fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
            // Only walk the part of the rectangle that lands on the plane.
            let area = area.intersection(&self.bounding_box());
            if let Some(bottom_right) = area.bottom_right() {
                let on = color.is_on();
                for (y, x) in iproduct!(
                    area.top_left.y..=bottom_right.y,
                    area.top_left.x..=bottom_right.x
                ) {
                    self.set_pixel(x as u16, y as u16, on);
                }
            }
            Ok(())
        }
    }
}
