//! The tile viewer application.

use anyhow::Context;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use scroll_engine::coords::Vec2;
use scroll_engine::core::{App, AppControl, FrameCtx};
use scroll_engine::paint::Color;
use scroll_engine::render::{RenderCtx, Sprite, SpriteRenderer};
use scroll_engine::shader::{ShaderProgram, ShaderSource, ShaderStage};
use scroll_engine::texture::{GpuTexture, PixelBuffer, Tileset};

use crate::cli::{Selection, ViewerConfig};

/// Background behind the sprite.
const CLEAR: Color = Color::SLATE;

/// GPU state created in `on_start`.
struct Scene {
    renderer: SpriteRenderer,
    sprite: Sprite,
    _texture: GpuTexture,
}

pub struct TileViewer {
    config: ViewerConfig,
    scene: Option<Scene>,
}

impl TileViewer {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            scene: None,
        }
    }

    fn shader_source(&self, stage: ShaderStage) -> anyhow::Result<ShaderSource> {
        let path = match stage {
            ShaderStage::Vertex => self.config.vertex_shader.as_ref(),
            ShaderStage::Fragment => self.config.fragment_shader.as_ref(),
        };
        Ok(match path {
            Some(p) => ShaderSource::from_path(stage, p)?,
            None => ShaderSource::builtin(stage),
        })
    }

    /// Loads the tileset and copies out the selected pixels.
    fn load_pixels(&self) -> anyhow::Result<PixelBuffer> {
        let (tw, th) = self.config.tile_size;
        let tileset = Tileset::load(&self.config.tileset, tw, th)
            .with_context(|| format!("loading tileset {}", self.config.tileset.display()))?;

        let (w, h) = tileset.image().dimensions();
        log::info!(
            "tileset {}: {w}x{h}, {} channels, {}x{} tiles of {tw}x{th}",
            self.config.tileset.display(),
            tileset.image().channels(),
            tileset.columns(),
            tileset.rows()
        );

        let pixels = match self.config.selection {
            Selection::Tile(index) => {
                let rect = tileset.tile_rect(index)?;
                log::info!("cropping tile {index} at {rect}");
                tileset.region(rect)?
            }
            Selection::Region(rect) => {
                log::info!("cropping region {rect}");
                tileset.region(rect)?
            }
        };

        Ok(pixels)
    }
}

impl App for TileViewer {
    fn on_start(&mut self, ctx: &RenderCtx<'_>) -> anyhow::Result<()> {
        let program = ShaderProgram::build(
            ctx.device,
            &self.shader_source(ShaderStage::Vertex)?,
            &self.shader_source(ShaderStage::Fragment)?,
        )?;

        let pixels = self.load_pixels()?;
        let texture = GpuTexture::upload(ctx.device, ctx.queue, &pixels, &self.config.texture)?;

        let renderer = SpriteRenderer::new(ctx, &program, &texture, self.config.canvas)?;
        let sprite = Sprite::at(
            self.config.position,
            sprite_size(pixels.dimensions(), self.config.scale),
        );

        log::info!(
            "drawing {}x{} sprite at ({}, {}) on a {}x{} canvas",
            sprite.rect.size.x,
            sprite.rect.size.y,
            sprite.rect.origin.x,
            sprite.rect.origin.y,
            self.config.canvas.width,
            self.config.canvas.height
        );

        self.scene = Some(Scene {
            renderer,
            sprite,
            _texture: texture,
        });
        Ok(())
    }

    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        if let WindowEvent::KeyboardInput { event, .. } = event {
            if is_exit_key(event.physical_key, event.state) {
                return AppControl::Exit;
            }
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Continue;
        };

        ctx.render(CLEAR, |rctx, target| {
            scene.renderer.draw(rctx, target, &[scene.sprite]);
        })
    }
}

fn is_exit_key(key: PhysicalKey, state: ElementState) -> bool {
    state == ElementState::Pressed && key == PhysicalKey::Code(KeyCode::Escape)
}

/// On-screen size of a `(w, h)` pixel image drawn at `scale`.
fn sprite_size((w, h): (u32, u32), scale: f32) -> Vec2 {
    Vec2::new(w as f32, h as f32) * scale
}
