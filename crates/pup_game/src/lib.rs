pub mod body;
pub mod bone;
pub mod camera;
pub mod config;
pub mod controller;
pub mod dog;
pub mod error;
pub mod game;
pub mod level;
pub mod level_file;
pub mod pack;
pub mod render;
pub mod replay;
pub mod tiles;
pub mod tower;

pub use body::{Body, Dir, FacingDir};
pub use controller::{ControlMode, ControlOutcome, Controller, StepContext};
pub use dog::{Dog, DogAnim, DogId};
pub use error::LoadError;
pub use game::{Game, GameOptions};
pub use level::Level;
pub use level_file::{load_level_from_path, LevelLayout, Spawn, SpawnKind};
pub use pack::Pack;
pub use tiles::{Tile, TileGrid, TILE_SIZE};
