use pup_core::input::{InputSource, Key, NullInput, JUMP_KEYS, RUN_KEYS};
use rand::{Rng, RngCore};

use crate::body::FacingDir;
use crate::dog::DogId;
use crate::pack::Pack;
use crate::tiles::TileGrid;

const RANDOM_TURN_CHANCE: f32 = 0.05;
const RANDOM_JUMP_CHANCE: f32 = 0.01;

/// Per-update state shared by every controller that runs this frame.
pub struct StepContext<'a> {
    pub input: &'a dyn InputSource,
    pub rng: &'a mut dyn RngCore,
    /// Set by the first player hand-off of an update; blocks any further
    /// switching until the next update.
    pub control_switched: bool,
}

impl<'a> StepContext<'a> {
    pub fn new(input: &'a dyn InputSource, rng: &'a mut dyn RngCore) -> Self {
        Self {
            input,
            rng,
            control_switched: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMode {
    Player,
    Random,
    Stand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlOutcome {
    Keep,
    /// Move this controller to another dog; the old dog is left standing.
    HandOff(DogId),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Controller {
    Player(PlayerController),
    Random(RandomController),
    Stand,
}

impl Controller {
    pub fn random() -> Self {
        Controller::Random(RandomController::default())
    }

    pub fn mode(&self) -> ControlMode {
        match self {
            Controller::Player(_) => ControlMode::Player,
            Controller::Random(_) => ControlMode::Random,
            Controller::Stand => ControlMode::Stand,
        }
    }

    /// Drives the chain containing `id` for one step. Dogs holding a bone
    /// only coast to a stop.
    pub fn update(
        &mut self,
        pack: &mut Pack,
        id: DogId,
        tiles: &TileGrid,
        dt: f32,
        ctx: &mut StepContext<'_>,
    ) -> ControlOutcome {
        match self {
            Controller::Player(player) => player.update(pack, id, tiles, dt, ctx),
            Controller::Random(random) if !pack[id].got_bone => {
                random.update(pack, id, tiles, dt, ctx);
                ControlOutcome::Keep
            }
            _ => {
                let base = pack.base_of(id);
                pack[base].body.dampen_x(dt);
                ControlOutcome::Keep
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerController;

impl PlayerController {
    pub fn update(
        &mut self,
        pack: &mut Pack,
        id: DogId,
        tiles: &TileGrid,
        dt: f32,
        ctx: &mut StepContext<'_>,
    ) -> ControlOutcome {
        let input: &dyn InputSource = if pack[id].got_bone { &NullInput } else { ctx.input };
        let base = pack.base_of(id);

        let left = input.is_pressed(Key::Left);
        let right = input.is_pressed(Key::Right);
        {
            let base_dog = &mut pack[base];
            base_dog.body.running = input.any_pressed(RUN_KEYS);
            match (left, right) {
                (true, false) => base_dog.move_left(),
                (false, true) => base_dog.move_right(),
                _ => base_dog.body.dampen_x(dt),
            }
        }

        if input.any_pressed_this_frame(JUMP_KEYS) {
            if let Some(outcome) = self.jump(pack, id, base, tiles, ctx) {
                return outcome;
            }
        }

        if ctx.control_switched {
            return ControlOutcome::Keep;
        }
        let target = if input.was_pressed_this_frame(Key::Up) {
            pack[id].up
        } else if input.was_pressed_this_frame(Key::Down) {
            pack[id].down
        } else {
            None
        };
        match target {
            Some(next) => {
                ctx.control_switched = true;
                log::debug!("control moved from dog {} to dog {}", id.0, next.0);
                ControlOutcome::HandOff(next)
            }
            None => ControlOutcome::Keep,
        }
    }

    /// Ground jump from the base, or a mid-air split: a rider leaps off the
    /// dog below it, or a lone airborne base launches its riders and takes
    /// control of the lowest one.
    fn jump(
        &mut self,
        pack: &mut Pack,
        id: DogId,
        base: DogId,
        tiles: &TileGrid,
        ctx: &mut StepContext<'_>,
    ) -> Option<ControlOutcome> {
        if pack[base].body.is_standing_on_ground(tiles) {
            pack[base].jump();
            return None;
        }
        if pack[id].down.is_some() {
            pack.detach_from_below(id);
            pack[id].jump();
            return None;
        }
        // A chain split off earlier this update sees the same jump press;
        // the latch stops it from launching its own riders in turn.
        if ctx.control_switched {
            return None;
        }
        let rider = pack[id].up?;
        pack.detach_from_below(rider);
        pack[rider].jump();
        ctx.control_switched = true;
        log::debug!("dog {} split off its riders, control to dog {}", id.0, rider.0);
        Some(ControlOutcome::HandOff(rider))
    }
}

/// Wanders left and right, changing its mind now and then.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RandomController {
    pub dir: Option<FacingDir>,
}

impl RandomController {
    pub fn update(
        &mut self,
        pack: &mut Pack,
        id: DogId,
        tiles: &TileGrid,
        dt: f32,
        ctx: &mut StepContext<'_>,
    ) {
        if ctx.rng.gen::<f32>() < RANDOM_TURN_CHANCE {
            self.dir = match ctx.rng.gen_range(0..3) {
                0 => Some(FacingDir::Left),
                1 => Some(FacingDir::Right),
                _ => None,
            };
        }

        let base = pack.base_of(id);
        let dog = &mut pack[base];
        match self.dir {
            Some(FacingDir::Left) => dog.move_left(),
            Some(FacingDir::Right) => dog.move_right(),
            None => dog.body.dampen_x(dt),
        }

        if dog.body.is_standing_on_ground(tiles) && ctx.rng.gen::<f32>() < RANDOM_JUMP_CHANCE {
            dog.jump();
        }
    }
}
