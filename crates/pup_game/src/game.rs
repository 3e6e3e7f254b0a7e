use glam::{Affine2, Vec2};
use pup_core::input::{InputSource, Key};
use pup_core::SpriteSheetRegistry;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::camera::{desired_scale_for_tower, FocusCamera};
use crate::dog::DogAnim;
use crate::error::LoadError;
use crate::level::{Level, BONE_SHEET, DOG_SHEET};
use crate::level_file::LevelLayout;
use crate::render::RenderSurface;

#[derive(Debug, Clone, Copy)]
pub struct GameOptions {
    pub rng_seed: u64,
    pub win_delay: f32,
    pub show_debug_boxes: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            rng_seed: 0,
            win_delay: 1.0,
            show_debug_boxes: false,
        }
    }
}

pub struct Game {
    layouts: Vec<LevelLayout>,
    level_index: usize,
    pub level: Level,
    pub camera: FocusCamera,
    rng: Pcg32,
    sheets: SpriteSheetRegistry,
    options: GameOptions,
    /// Set once the last level is done; further updates do nothing.
    pub finished: bool,
}

impl Game {
    pub fn new(
        layouts: Vec<LevelLayout>,
        sheets: SpriteSheetRegistry,
        options: GameOptions,
    ) -> Result<Self, LoadError> {
        let Some(first) = layouts.first() else {
            return Err(LoadError::Invalid("no levels to play".to_string()));
        };
        warn_missing_animations(&sheets);

        let mut rng = Pcg32::seed_from_u64(options.rng_seed);
        let level = Level::from_layout(first, options.win_delay, &mut rng);
        log::info!("Starting level 1/{}: '{}'", layouts.len(), level.level_id());
        Ok(Self {
            layouts,
            level_index: 0,
            level,
            camera: FocusCamera::new(),
            rng,
            sheets,
            options,
            finished: false,
        })
    }

    pub fn level_index(&self) -> usize {
        self.level_index
    }

    pub fn level_count(&self) -> usize {
        self.layouts.len()
    }

    pub fn update(&mut self, dt: f32, input: &dyn InputSource) {
        if self.finished {
            return;
        }
        if input.was_pressed_this_frame(Key::R) {
            self.level.reset(&mut self.rng);
        }

        self.level.update(dt, input, &mut self.rng);

        if let Some(focus) = self.level.focus() {
            let height = self
                .level
                .player()
                .map(|p| self.level.pack.chain_height(p))
                .unwrap_or(1);
            self.camera.update(focus, desired_scale_for_tower(height), dt);
        }

        if self.level.done {
            self.advance();
        }
    }

    fn advance(&mut self) {
        let next = self.level_index + 1;
        let Some(layout) = self.layouts.get(next) else {
            self.finished = true;
            log::info!("All {} levels complete", self.layouts.len());
            return;
        };
        self.level = Level::from_layout(layout, self.options.win_delay, &mut self.rng);
        self.level_index = next;
        self.camera.reset();
        log::info!(
            "Starting level {}/{}: '{}'",
            next + 1,
            self.layouts.len(),
            self.level.level_id()
        );
    }

    pub fn view_transform(&self, viewport: Vec2) -> Affine2 {
        self.camera.transform(viewport)
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, viewport: Vec2) {
        surface.set_transform(self.view_transform(viewport));
        self.level
            .render(surface, &self.sheets, self.options.show_debug_boxes);
    }
}

fn warn_missing_animations(sheets: &SpriteSheetRegistry) {
    match sheets.get(DOG_SHEET) {
        Some(sheet) => {
            for anim in DogAnim::ALL {
                if !sheet.has_animation(anim.name()) {
                    log::warn!("Sprite sheet '{DOG_SHEET}' has no '{}' animation", anim.name());
                }
            }
        }
        None => log::warn!("Sprite sheet '{DOG_SHEET}' not loaded; dogs draw frame 0"),
    }
    if sheets.get(BONE_SHEET).is_none() {
        log::warn!("Sprite sheet '{BONE_SHEET}' not loaded; bones draw frame 0");
    }
}
