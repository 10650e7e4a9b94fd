use std::collections::HashSet;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use crate::assets::{AssetStore, DecodedImage, ImageHandle};
use crate::world::{Rect, RenderView};

const CLEAR_COLOR: [u8; 4] = [18, 20, 28, 255];

/// Software framebuffer renderer. Draws whatever [`RenderView`] it is handed
/// and never touches game state.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
    warned_missing_images: HashSet<ImageHandle>,
}

impl Renderer {
    pub fn new(window: Arc<Window>) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            width: size.width,
            height: size.height,
            warned_missing_images: HashSet::new(),
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width.max(1), height.max(1), window);
        Pixels::new(width.max(1), height.max(1), surface)
    }

    /// Clears and, when a view is present, draws it. `None` while loading.
    pub(crate) fn render(
        &mut self,
        view: Option<&RenderView>,
        assets: &AssetStore,
    ) -> Result<(), Error> {
        let (width, height) = (self.width, self.height);
        let frame = self.pixels.frame_mut();
        clear_frame(frame, CLEAR_COLOR);
        if let Some(view) = view {
            draw_view(frame, width, height, view, assets, &mut self.warned_missing_images);
        }
        self.pixels.render()
    }
}

fn clear_frame(frame: &mut [u8], color: [u8; 4]) {
    for pixel in frame.chunks_exact_mut(4) {
        pixel.copy_from_slice(&color);
    }
}

fn draw_view(
    frame: &mut [u8],
    width: u32,
    height: u32,
    view: &RenderView,
    assets: &AssetStore,
    warned_missing_images: &mut HashSet<ImageHandle>,
) {
    for command in &view.commands {
        let Some(image) = assets.image(command.image) else {
            if warned_missing_images.insert(command.image) {
                warn!(
                    entity = command.entity.0,
                    image = command.image.0,
                    "renderer_image_missing_skipping_draw"
                );
            }
            continue;
        };
        blit_scaled(frame, width, height, image, command.source, command.dest);
    }
}

/// Nearest-neighbour copy of `source` (image pixels) into `dest` (frame
/// pixels). Fully transparent texels are skipped; everything is clipped.
fn blit_scaled(
    frame: &mut [u8],
    width: u32,
    height: u32,
    image: &DecodedImage,
    source: Rect,
    dest: Rect,
) {
    if image.width == 0 || image.height == 0 || width == 0 || height == 0 {
        return;
    }
    if source.width <= 0.0 || source.height <= 0.0 || dest.width <= 0.0 || dest.height <= 0.0 {
        return;
    }
    let expected_rgba_len = image.width as usize * image.height as usize * 4;
    if image.rgba.len() < expected_rgba_len || frame.len() < width as usize * height as usize * 4 {
        return;
    }

    let left = dest.x.round() as i32;
    let top = dest.y.round() as i32;
    let right = (dest.x + dest.width).round() as i32;
    let bottom = (dest.y + dest.height).round() as i32;
    let draw_left = left.max(0);
    let draw_top = top.max(0);
    let draw_right = right.min(width as i32);
    let draw_bottom = bottom.min(height as i32);
    if draw_left >= draw_right || draw_top >= draw_bottom {
        return;
    }

    let scale_x = source.width / dest.width;
    let scale_y = source.height / dest.height;
    let max_src_x = image.width as i32 - 1;
    let max_src_y = image.height as i32 - 1;
    let frame_width = width as usize;
    let image_width = image.width as usize;

    for out_y in draw_top..draw_bottom {
        let dy = (out_y - top) as f32 + 0.5;
        let src_y = (source.y + dy * scale_y).floor() as i32;
        if src_y < 0 || src_y > max_src_y {
            continue;
        }
        let src_row_offset = src_y as usize * image_width * 4;
        let dst_row_offset = out_y as usize * frame_width * 4;

        for out_x in draw_left..draw_right {
            let dx = (out_x - left) as f32 + 0.5;
            let src_x = (source.x + dx * scale_x).floor() as i32;
            if src_x < 0 || src_x > max_src_x {
                continue;
            }
            let src_offset = src_row_offset + src_x as usize * 4;
            let alpha = image.rgba[src_offset + 3];
            if alpha == 0 {
                continue;
            }
            let dst_offset = dst_row_offset + out_x as usize * 4;
            frame[dst_offset..dst_offset + 4]
                .copy_from_slice(&image.rgba[src_offset..src_offset + 4]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetCompletion, AssetId, AssetManifest, LoadedSheet, SpriteRole};
    use crate::world::{CanvasSize, DrawCommand, EntityId};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];
    const CLEAR: [u8; 4] = [0, 0, 0, 0];

    /// Two-frame strip: left frame red, right frame blue, with one fully
    /// transparent texel at the top-left of the red frame.
    fn strip() -> DecodedImage {
        let mut rgba = Vec::new();
        for y in 0..2 {
            for x in 0..4 {
                let texel = match (x, y) {
                    (0, 0) => CLEAR,
                    (0..=1, _) => RED,
                    _ => BLUE,
                };
                rgba.extend_from_slice(&texel);
            }
        }
        DecodedImage {
            width: 4,
            height: 2,
            rgba,
        }
    }

    fn pixel(frame: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * width + x) * 4) as usize;
        [
            frame[offset],
            frame[offset + 1],
            frame[offset + 2],
            frame[offset + 3],
        ]
    }

    fn rect(x: f32, y: f32, width: f32, height: f32) -> Rect {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn blit_selects_frame_and_skips_transparent_texels() {
        let mut frame = vec![9u8; 8 * 8 * 4];
        let image = strip();

        let (source, dest) = (rect(0.0, 0.0, 2.0, 2.0), rect(0.0, 0.0, 2.0, 2.0));
        blit_scaled(&mut frame, 8, 8, &image, source, dest);
        assert_eq!(pixel(&frame, 8, 0, 0), [9, 9, 9, 9]);
        assert_eq!(pixel(&frame, 8, 1, 0), RED);
        assert_eq!(pixel(&frame, 8, 0, 1), RED);

        let (source, dest) = (rect(2.0, 0.0, 2.0, 2.0), rect(4.0, 4.0, 2.0, 2.0));
        blit_scaled(&mut frame, 8, 8, &image, source, dest);
        assert_eq!(pixel(&frame, 8, 4, 4), BLUE);
        assert_eq!(pixel(&frame, 8, 5, 5), BLUE);
        assert_eq!(pixel(&frame, 8, 3, 4), [9, 9, 9, 9]);
    }

    #[test]
    fn blit_scales_with_nearest_neighbour() {
        let mut frame = vec![0u8; 8 * 8 * 4];
        let image = strip();

        let (source, dest) = (rect(2.0, 0.0, 2.0, 2.0), rect(0.0, 0.0, 8.0, 8.0));
        blit_scaled(&mut frame, 8, 8, &image, source, dest);

        assert_eq!(pixel(&frame, 8, 0, 0), BLUE);
        assert_eq!(pixel(&frame, 8, 7, 7), BLUE);
    }

    #[test]
    fn blit_clips_to_frame_edges() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let image = strip();

        let (source, dest) = (rect(2.0, 0.0, 2.0, 2.0), rect(-1.0, 3.0, 2.0, 2.0));
        blit_scaled(&mut frame, 4, 4, &image, source, dest);

        assert_eq!(pixel(&frame, 4, 0, 3), BLUE);
        assert_eq!(pixel(&frame, 4, 1, 3), [0, 0, 0, 0]);
    }

    #[test]
    fn degenerate_rects_draw_nothing() {
        let mut frame = vec![0u8; 4 * 4 * 4];
        let image = strip();

        let (source, dest) = (rect(0.0, 0.0, 0.0, 2.0), rect(0.0, 0.0, 4.0, 4.0));
        blit_scaled(&mut frame, 4, 4, &image, source, dest);
        let (source, dest) = (rect(2.0, 0.0, 2.0, 2.0), rect(0.0, 0.0, -4.0, 4.0));
        blit_scaled(&mut frame, 4, 4, &image, source, dest);

        assert!(frame.iter().all(|byte| *byte == 0));
    }

    #[test]
    fn missing_image_is_skipped_and_warned_once() {
        let manifest = AssetManifest::default();
        let mut assets = AssetStore::new(&manifest);
        let boss_index = manifest
            .sprites()
            .iter()
            .position(|decl| decl.role == SpriteRole::Boss)
            .expect("boss");
        assets.record(AssetCompletion {
            asset: AssetId(boss_index),
            result: Ok(LoadedSheet {
                image: strip(),
                frame_width: 2,
                frame_height: 2,
                frame_count: 2,
            }),
        });
        let loaded = assets.sheet(SpriteRole::Boss).expect("boss sheet").image;
        let view = RenderView {
            canvas: CanvasSize::new(4.0, 4.0),
            scroll_offset: 0.0,
            commands: vec![
                DrawCommand {
                    entity: EntityId(0),
                    image: ImageHandle(77),
                    source: rect(0.0, 0.0, 2.0, 2.0),
                    dest: rect(0.0, 0.0, 2.0, 2.0),
                },
                DrawCommand {
                    entity: EntityId(1),
                    image: loaded,
                    source: rect(2.0, 0.0, 2.0, 2.0),
                    dest: rect(2.0, 2.0, 2.0, 2.0),
                },
            ],
        };
        let mut frame = vec![0u8; 4 * 4 * 4];
        let mut warned = HashSet::new();

        draw_view(&mut frame, 4, 4, &view, &assets, &mut warned);
        draw_view(&mut frame, 4, 4, &view, &assets, &mut warned);

        assert_eq!(warned.len(), 1);
        assert!(warned.contains(&ImageHandle(77)));
        assert_eq!(pixel(&frame, 4, 0, 0), [0, 0, 0, 0]);
        assert_eq!(pixel(&frame, 4, 3, 3), BLUE);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut frame = vec![0u8; 3 * 2 * 4];
        clear_frame(&mut frame, CLEAR_COLOR);
        assert!(frame.chunks_exact(4).all(|pixel| pixel == CLEAR_COLOR));
    }
}
