//! Frame rasterization to image buffers
//!
//! An offline stand-in for an interactive canvas: paints the background and
//! every visible tile of a [`Frame`] into an RGBA image. Overlay text is not
//! drawn.

use image::{Rgba, RgbaImage};

use crate::engine::Frame;

/// Render a frame at its surface size.
///
/// Tiles are placed at their rounded pixel positions and clipped to the
/// surface. Later tiles paint over earlier ones; translucent palette colors
/// are blended with whatever is underneath.
///
/// # Examples
///
/// ```
/// use foodviz::engine::{Frame, RenderTile};
/// use foodviz::renderer::render_frame;
/// use image::Rgba;
///
/// let frame = Frame {
///     width: 4,
///     height: 4,
///     background: Rgba([240, 240, 240, 255]),
///     ease: 1.0,
///     tiles: vec![RenderTile {
///         x: 2.0,
///         y: 0.0,
///         size: 2,
///         palette_index: 0,
///         color: Rgba([212, 196, 84, 255]),
///     }],
/// };
/// let image = render_frame(&frame);
/// assert_eq!(*image.get_pixel(3, 1), Rgba([212, 196, 84, 255]));
/// assert_eq!(*image.get_pixel(0, 0), Rgba([240, 240, 240, 255]));
/// ```
pub fn render_frame(frame: &Frame) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(frame.width, frame.height, frame.background);

    for tile in &frame.tiles {
        fill_square(&mut image, tile.x.round() as i64, tile.y.round() as i64, tile.size, tile.color);
    }

    image
}

fn fill_square(image: &mut RgbaImage, x: i64, y: i64, size: u32, color: Rgba<u8>) {
    let (w, h) = (image.width() as i64, image.height() as i64);
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = (x + size as i64).min(w);
    let y1 = (y + size as i64).min(h);

    for py in y0..y1 {
        for px in x0..x1 {
            let pixel = image.get_pixel_mut(px as u32, py as u32);
            *pixel = blend_over(*pixel, color);
        }
    }
}

/// Source-over compositing for straight (non-premultiplied) alpha.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src.0[3] {
        255 => src,
        0 => dst,
        a => {
            let sa = a as f64 / 255.0;
            let da = dst.0[3] as f64 / 255.0;
            let out_a = sa + da * (1.0 - sa);
            let channel = |s: u8, d: u8| {
                let c = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
                c.round().clamp(0.0, 255.0) as u8
            };
            Rgba([
                channel(src.0[0], dst.0[0]),
                channel(src.0[1], dst.0[1]),
                channel(src.0[2], dst.0[2]),
                (out_a * 255.0).round() as u8,
            ])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::RenderTile;

    fn tile(x: f64, y: f64, size: u32, color: Rgba<u8>) -> RenderTile {
        RenderTile { x, y, size, palette_index: 0, color }
    }

    fn frame(tiles: Vec<RenderTile>) -> Frame {
        Frame {
            width: 10,
            height: 10,
            background: Rgba([240, 240, 240, 255]),
            ease: 1.0,
            tiles,
        }
    }

    #[test]
    fn test_empty_frame_is_background() {
        let image = render_frame(&frame(vec![]));
        assert_eq!(image.dimensions(), (10, 10));
        assert!(image.pixels().all(|p| *p == Rgba([240, 240, 240, 255])));
    }

    #[test]
    fn test_tile_clipped_at_edges() {
        let red = Rgba([255, 0, 0, 255]);
        let image = render_frame(&frame(vec![tile(-2.0, 8.0, 4, red)]));
        assert_eq!(*image.get_pixel(0, 8), red);
        assert_eq!(*image.get_pixel(1, 9), red);
        assert_eq!(*image.get_pixel(2, 9), Rgba([240, 240, 240, 255]));
        assert_eq!(*image.get_pixel(0, 7), Rgba([240, 240, 240, 255]));
    }

    #[test]
    fn test_positions_are_rounded() {
        let blue = Rgba([0, 0, 255, 255]);
        let image = render_frame(&frame(vec![tile(2.6, 3.4, 1, blue)]));
        assert_eq!(*image.get_pixel(3, 3), blue);
    }

    #[test]
    fn test_later_tiles_paint_over() {
        let a = Rgba([1, 2, 3, 255]);
        let b = Rgba([4, 5, 6, 255]);
        let image = render_frame(&frame(vec![tile(0.0, 0.0, 2, a), tile(1.0, 1.0, 2, b)]));
        assert_eq!(*image.get_pixel(0, 0), a);
        assert_eq!(*image.get_pixel(1, 1), b);
    }

    #[test]
    fn test_translucent_blend() {
        let half_black = Rgba([0, 0, 0, 128]);
        let image = render_frame(&frame(vec![tile(0.0, 0.0, 1, half_black)]));
        let p = image.get_pixel(0, 0);
        assert_eq!(p.0[3], 255);
        assert!(p.0[0] > 110 && p.0[0] < 125);
    }
}
