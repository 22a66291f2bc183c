use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use image::ImageReader;
use pixels::{Error, Pixels, SurfaceTexture};
use tracing::warn;
use winit::window::Window;

use super::font;
use super::Viewport;
use crate::app::world::{HudSnapshot, ObjectKind, ObjectWorld};

const CLEAR_COLOR: [u8; 4] = [18, 20, 28, 255];
const WINCH_LINE_COLOR: [u8; 4] = [235, 235, 235, 255];
const HUD_TEXT_COLOR: [u8; 4] = [235, 235, 235, 255];
const BANNER_TEXT_COLOR: [u8; 4] = [255, 214, 90, 255];
const PROMPT_TEXT_COLOR: [u8; 4] = [170, 180, 200, 255];
const PLACEHOLDER_MIN_HALF_PX: i32 = 4;
const SCORE_TEXT_SCALE: i32 = 4;
const LIVES_TEXT_SCALE: i32 = 3;
const BANNER_TEXT_SCALE: i32 = 5;
const HEADLINE_TEXT_SCALE: i32 = 7;
const PROMPT_TEXT_SCALE: i32 = 3;

struct LoadedSprite {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

pub(crate) struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    viewport: Viewport,
    asset_root: PathBuf,
    sprite_cache: HashMap<&'static str, Option<LoadedSprite>>,
    warned_missing_sprite_keys: HashSet<&'static str>,
}

impl Renderer {
    pub(crate) fn new(window: Arc<Window>, asset_root: PathBuf) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height)?;
        Ok(Self {
            window,
            pixels,
            viewport: Viewport {
                width: size.width,
                height: size.height,
            },
            asset_root,
            sprite_cache: HashMap::new(),
            warned_missing_sprite_keys: HashSet::new(),
        })
    }

    pub(crate) fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height)?;
        self.viewport = Viewport { width, height };
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        width: u32,
        height: u32,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(width, height, window);
        Pixels::new(width, height, surface)
    }

    pub(crate) fn render_frame(
        &mut self,
        world: &ObjectWorld,
        hud: Option<&HudSnapshot>,
    ) -> Result<(), Error> {
        for obj in world.objects() {
            self.ensure_sprite_loaded(obj.sprite.key);
        }

        let Viewport { width, height } = self.viewport;
        let playfield = world.playfield();
        let scale_x = width as f32 / playfield.width.max(1.0);
        let scale_y = height as f32 / playfield.height.max(1.0);

        let sprite_cache = &self.sprite_cache;
        let frame = self.pixels.frame_mut();

        for pixel in frame.chunks_exact_mut(4) {
            pixel.copy_from_slice(&CLEAR_COLOR);
        }

        if let Some(avatar) = world
            .objects()
            .iter()
            .find(|obj| obj.kind == ObjectKind::Avatar)
        {
            let line_x = (avatar.pos.x * scale_x).round() as i32;
            let line_bottom = (avatar.pos.y * scale_y).round() as i32;
            for y in 0..line_bottom.min(height as i32) {
                if y < 0 {
                    continue;
                }
                blend_pixel(frame, width, line_x, y, WINCH_LINE_COLOR, 1.0);
            }
        }

        for obj in world.objects() {
            if obj.hidden {
                continue;
            }
            let alpha = obj.fade_alpha.unwrap_or(1.0).clamp(0.0, 1.0);
            if alpha <= 0.0 {
                continue;
            }
            let center_x = (obj.pos.x * scale_x).round() as i32;
            let center_y = (obj.pos.y * scale_y).round() as i32;

            match sprite_cache.get(obj.sprite.key).and_then(Option::as_ref) {
                Some(sprite) => {
                    blit_sprite(frame, width, center_x, center_y, sprite, alpha);
                }
                None => {
                    let half = ((obj.radius * scale_x.min(scale_y)).round() as i32)
                        .max(PLACEHOLDER_MIN_HALF_PX);
                    fill_rect_blended(
                        frame,
                        width,
                        height,
                        center_x - half,
                        center_y - half,
                        half * 2,
                        half * 2,
                        placeholder_color(obj.kind),
                        alpha,
                    );
                }
            }
        }

        if let Some(hud) = hud {
            draw_hud(frame, width, height, hud);
        }

        self.pixels.render()
    }

    fn ensure_sprite_loaded(&mut self, key: &'static str) {
        if self.sprite_cache.contains_key(key) {
            return;
        }

        let path = self.asset_root.join(format!("{key}.png"));
        let loaded = ImageReader::open(&path)
            .ok()
            .and_then(|reader| reader.decode().ok())
            .map(|decoded| {
                let rgba = decoded.to_rgba8();
                LoadedSprite {
                    width: rgba.width(),
                    height: rgba.height(),
                    rgba: rgba.into_raw(),
                }
            });

        if loaded.is_none() && self.warned_missing_sprite_keys.insert(key) {
            warn!(sprite = key, path = %path.display(), "sprite_missing_using_placeholder");
        }
        self.sprite_cache.insert(key, loaded);
    }
}

fn placeholder_color(kind: ObjectKind) -> [u8; 4] {
    match kind {
        ObjectKind::Avatar => [232, 232, 246, 255],
        ObjectKind::Fan => [120, 132, 152, 255],
        ObjectKind::Tool => [224, 120, 80, 255],
        ObjectKind::Coin => [240, 202, 60, 255],
        ObjectKind::Star => [250, 240, 150, 255],
        ObjectKind::Laser => [120, 232, 120, 255],
        ObjectKind::Fading => [164, 164, 176, 255],
    }
}

fn draw_hud(frame: &mut [u8], width: u32, height: u32, hud: &HudSnapshot) {
    let center_x = width as i32 / 2;

    if hud.show_score {
        let score_text = format!("SCORE {}", hud.score);
        let x = center_x - font::text_width_px(&score_text, SCORE_TEXT_SCALE) / 2;
        font::draw_text(
            frame,
            width,
            height,
            x,
            12,
            &score_text,
            HUD_TEXT_COLOR,
            SCORE_TEXT_SCALE,
        );

        let lives_text = format!("LIVES {}", hud.lives);
        font::draw_text(
            frame,
            width,
            height,
            12,
            12,
            &lives_text,
            HUD_TEXT_COLOR,
            LIVES_TEXT_SCALE,
        );
    }

    if let Some(headline) = &hud.headline {
        let x = center_x - font::text_width_px(headline, HEADLINE_TEXT_SCALE) / 2;
        let y = height as i32 / 3;
        font::draw_text(
            frame,
            width,
            height,
            x,
            y,
            headline,
            HUD_TEXT_COLOR,
            HEADLINE_TEXT_SCALE,
        );
    }

    if let Some(banner) = &hud.banner {
        let x = center_x - font::text_width_px(banner, BANNER_TEXT_SCALE) / 2;
        let y = height as i32 / 2;
        font::draw_text(
            frame,
            width,
            height,
            x,
            y,
            banner,
            BANNER_TEXT_COLOR,
            BANNER_TEXT_SCALE,
        );
    }

    if let Some(prompt) = &hud.prompt {
        let x = center_x - font::text_width_px(prompt, PROMPT_TEXT_SCALE) / 2;
        let y = height as i32 - 48;
        font::draw_text(
            frame,
            width,
            height,
            x,
            y,
            prompt,
            PROMPT_TEXT_COLOR,
            PROMPT_TEXT_SCALE,
        );
    }
}

fn blit_sprite(
    frame: &mut [u8],
    width: u32,
    center_x: i32,
    center_y: i32,
    sprite: &LoadedSprite,
    alpha: f32,
) {
    let origin_x = center_x - sprite.width as i32 / 2;
    let origin_y = center_y - sprite.height as i32 / 2;

    for sy in 0..sprite.height as i32 {
        for sx in 0..sprite.width as i32 {
            let src_index = ((sy as u32 * sprite.width + sx as u32) * 4) as usize;
            let src = &sprite.rgba[src_index..src_index + 4];
            let src_alpha = (src[3] as f32 / 255.0) * alpha;
            if src_alpha <= 0.0 {
                continue;
            }
            blend_pixel(
                frame,
                width,
                origin_x + sx,
                origin_y + sy,
                [src[0], src[1], src[2], 255],
                src_alpha,
            );
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn fill_rect_blended(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    rect_width: i32,
    rect_height: i32,
    color: [u8; 4],
    alpha: f32,
) {
    let start_x = x.max(0);
    let start_y = y.max(0);
    let end_x = (x + rect_width).min(width as i32);
    let end_y = (y + rect_height).min(height as i32);
    if end_x <= start_x || end_y <= start_y {
        return;
    }

    for py in start_y..end_y {
        for px in start_x..end_x {
            blend_pixel(frame, width, px, py, color, alpha);
        }
    }
}

fn blend_pixel(frame: &mut [u8], width: u32, x: i32, y: i32, color: [u8; 4], alpha: f32) {
    if x < 0 || y < 0 || x >= width as i32 {
        return;
    }
    let Some(pixel_offset) = (y as usize)
        .checked_mul(width as usize)
        .and_then(|row| row.checked_add(x as usize))
    else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    if byte_offset + 4 > frame.len() {
        return;
    }

    let inverse = 1.0 - alpha;
    for channel in 0..3 {
        let dst = frame[byte_offset + channel] as f32;
        let src = color[channel] as f32;
        frame[byte_offset + channel] = (src * alpha + dst * inverse).round() as u8;
    }
    frame[byte_offset + 3] = 255;
}
