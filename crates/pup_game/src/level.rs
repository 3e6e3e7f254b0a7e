//! A playable level: tile grid, the dog pack and the remaining bones.
//!
//! `update` drives every chain once per step. Chains are visited by base in
//! pack order; a dog that jumps off mid-frame becomes a new base after its old
//! chain was visited, so a catch-up pass steps any base not yet stepped.

use glam::Vec2;
use pup_core::input::InputSource;
use pup_core::units::phys_from_px;
use pup_core::SpriteSheetRegistry;
use rand::RngCore;

use crate::body::FacingDir;
use crate::bone::Bone;
use crate::controller::{Controller, PlayerController, StepContext};
use crate::dog::{Dog, DogId};
use crate::level_file::{LevelLayout, SpawnKind};
use crate::pack::Pack;
use crate::render::{Rect, RenderSurface, SpriteDraw};
use crate::tiles::{Tile, TileGrid, TILE_SIZE};
use crate::tower::{self, ChainWorld};

pub const DOG_SHEET: &str = "puppy";
pub const BONE_SHEET: &str = "bone";

const GROUND_COLOR: [u8; 4] = [0x33, 0x98, 0x4b, 0xff];
const TEXT_COLOR: [u8; 4] = [0xff, 0xff, 0xff, 0xff];
/// Extra tiles drawn past the grid so boundary ground shows at the edges.
const RENDER_MARGIN_TILES: i32 = 8;

pub struct Level {
    layout: LevelLayout,
    pub tiles: TileGrid,
    pub pack: Pack,
    pub bones: Vec<Bone>,
    pub won: bool,
    pub done: bool,
    win_timer: f32,
    win_delay: f32,
}

impl Level {
    pub fn from_layout(layout: &LevelLayout, win_delay: f32, rng: &mut dyn RngCore) -> Self {
        let mut level = Self {
            layout: layout.clone(),
            tiles: layout.tiles.clone(),
            pack: Pack::new(),
            bones: Vec::new(),
            won: false,
            done: false,
            win_timer: 0.0,
            win_delay,
        };
        level.spawn_entities(rng);
        level
    }

    pub fn level_id(&self) -> &str {
        &self.layout.level_id
    }

    /// Restores tiles and entities to the layout's starting state.
    pub fn reset(&mut self, rng: &mut dyn RngCore) {
        self.tiles = self.layout.tiles.clone();
        self.pack = Pack::new();
        self.bones.clear();
        self.won = false;
        self.done = false;
        self.win_timer = 0.0;
        self.spawn_entities(rng);
        log::info!("Reset level '{}'", self.layout.level_id);
    }

    fn spawn_entities(&mut self, rng: &mut dyn RngCore) {
        for spawn in &self.layout.spawns {
            let cell_mid_x = (spawn.col as f32 + 0.5) * TILE_SIZE;
            let cell_bottom = (spawn.row + 1) as f32 * TILE_SIZE;
            let controller = match spawn.kind {
                SpawnKind::Bone => {
                    let mid_y = (spawn.row as f32 + 0.5) * TILE_SIZE;
                    self.bones.push(Bone::new(cell_mid_x, mid_y));
                    continue;
                }
                SpawnKind::PlayerDog => Controller::Player(PlayerController),
                SpawnKind::WanderDog => Controller::random(),
                SpawnKind::StandDog => Controller::Stand,
            };
            let mut dog = Dog::new(Some(controller), rng);
            dog.body.set_mid_x(cell_mid_x);
            dog.body.set_max_y(cell_bottom - 1.0);
            self.pack.push(dog);
        }
    }

    pub fn update(&mut self, dt: f32, input: &dyn InputSource, rng: &mut dyn RngCore) {
        let mut ctx = StepContext::new(input, rng);
        let mut stepped = vec![false; self.pack.len()];
        loop {
            let mut progressed = false;
            for i in 0..self.pack.len() {
                let id = DogId(i);
                if stepped[i] || self.pack[id].down.is_some() {
                    continue;
                }
                let mut world = ChainWorld {
                    pack: &mut self.pack,
                    tiles: &self.tiles,
                    bones: &mut self.bones,
                };
                for member in tower::update_chain(&mut world, id, dt, &mut ctx) {
                    stepped[member.0] = true;
                }
                progressed = true;
            }
            if !progressed {
                break;
            }
        }

        for bone in &mut self.bones {
            bone.update(dt, &self.tiles);
        }
        self.bones.retain(|b| !b.done);

        if self.won && !self.done {
            self.win_timer += dt;
            if self.win_timer >= self.win_delay {
                self.done = true;
                log::info!("Level '{}' done", self.layout.level_id);
            }
        }
        if !self.won && self.bones.is_empty() {
            self.won = true;
            log::info!("Level '{}' won", self.layout.level_id);
        }

        debug_assert!(
            self.pack.check_invariants().is_ok(),
            "chain invariants broken: {:?}",
            self.pack.check_invariants()
        );
    }

    pub fn player(&self) -> Option<DogId> {
        self.pack.player()
    }

    /// Height of the tallest chain in the level.
    pub fn tallest_tower(&self) -> usize {
        self.pack
            .bases()
            .map(|base| self.pack.chain_height(base))
            .max()
            .unwrap_or(0)
    }

    /// Point the camera should follow: the player's feet.
    pub fn focus(&self) -> Option<Vec2> {
        let body = &self.pack[self.player()?].body;
        Some(Vec2::new(body.mid_x(), body.max_y()))
    }

    pub fn render(&self, surface: &mut dyn RenderSurface, sheets: &SpriteSheetRegistry, show_debug: bool) {
        self.render_tiles(surface);

        let bone_sheet = sheets.get(BONE_SHEET);
        for bone in &self.bones {
            let frame = bone_sheet
                .and_then(|s| s.frame_at("idle", bone.body.anim_count))
                .unwrap_or(0);
            surface.draw_sprite(SpriteDraw {
                sheet: BONE_SHEET.to_string(),
                animation: "idle".to_string(),
                frame,
                position: Vec2::new(bone.body.mid_x(), bone.body.mid_y() + bone.bob_offset()),
                anchor: Vec2::new(0.5, 0.5),
                flip_x: false,
                hue: 0.0,
            });
        }

        let dog_sheet = sheets.get(DOG_SHEET);
        for base in self.pack.bases() {
            for id in self.pack.chain_from(base) {
                let dog = &self.pack[id];
                let anim = dog.animation(dog.body.is_standing_on_ground(&self.tiles));
                let frame = dog_sheet
                    .and_then(|s| s.frame_at(anim.name(), dog.animation_time()))
                    .unwrap_or(0);
                // Riders sit a pixel lower so paws overlap the back below.
                let y_offset = if dog.down.is_some() { phys_from_px(1.0) } else { 0.0 };
                surface.draw_sprite(SpriteDraw {
                    sheet: DOG_SHEET.to_string(),
                    animation: anim.name().to_string(),
                    frame,
                    position: Vec2::new(dog.body.mid_x(), dog.body.max_y() + y_offset),
                    anchor: Vec2::new(0.5, 1.0),
                    flip_x: dog.body.facing == FacingDir::Left,
                    hue: dog.hue,
                });
            }
        }

        if show_debug {
            for (_, dog) in self.pack.iter() {
                surface.debug_rect(body_rect(&dog.body));
            }
            for bone in &self.bones {
                surface.debug_rect(body_rect(&bone.body));
            }
        }

        if self.won {
            let center = Vec2::new(
                self.tiles.width() as f32 * TILE_SIZE / 2.0,
                self.tiles.height() as f32 * TILE_SIZE / 2.0,
            );
            surface.draw_text("You win!", center, TEXT_COLOR);
        }
    }

    fn render_tiles(&self, surface: &mut dyn RenderSurface) {
        for row in -RENDER_MARGIN_TILES..self.tiles.height() + RENDER_MARGIN_TILES {
            for col in -RENDER_MARGIN_TILES..self.tiles.width() + RENDER_MARGIN_TILES {
                if self.tiles.get_tile(col, row) != Tile::Ground {
                    continue;
                }
                let rect = Rect {
                    x: col as f32 * TILE_SIZE,
                    y: row as f32 * TILE_SIZE,
                    w: TILE_SIZE,
                    h: TILE_SIZE,
                };
                surface.fill_rect(rect, GROUND_COLOR);
            }
        }
    }
}

fn body_rect(body: &crate::body::Body) -> Rect {
    Rect {
        x: body.min_x(),
        y: body.min_y(),
        w: body.w,
        h: body.h,
    }
}
