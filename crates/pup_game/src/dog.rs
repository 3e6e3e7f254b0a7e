use pup_core::math::lerp;
use pup_core::units::{FPS, PHYSICS_SCALE};
use rand::Rng;

use crate::body::{Body, FacingDir};
use crate::controller::{ControlMode, Controller};

pub const DOG_WIDTH: f32 = 10.0 * PHYSICS_SCALE - 2.0;
pub const DOG_HEIGHT: f32 = 10.0 * PHYSICS_SCALE - 1.0;
pub const WALK_SPEED: f32 = 1.0 * PHYSICS_SCALE * FPS;
pub const RUN_SPEED: f32 = 1.5 * PHYSICS_SCALE * FPS;
pub const JUMP_SPEED: f32 = 3.0 * PHYSICS_SCALE * FPS;

/// Vertical speed separating the up / mid / down jump and riding poses.
pub const JUMP_ANIMATION_SWITCH: f32 = 0.5 * PHYSICS_SCALE * FPS;

/// Stable handle of a dog inside its pack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DogId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DogAnim {
    Idle,
    Run,
    JumpUp,
    JumpMid,
    JumpDown,
    RidingUp,
    RidingMid,
    RidingDown,
    Eat,
    Boop,
}

impl DogAnim {
    pub const ALL: [DogAnim; 10] = [
        DogAnim::Idle,
        DogAnim::Run,
        DogAnim::JumpUp,
        DogAnim::JumpMid,
        DogAnim::JumpDown,
        DogAnim::RidingUp,
        DogAnim::RidingMid,
        DogAnim::RidingDown,
        DogAnim::Eat,
        DogAnim::Boop,
    ];

    pub fn name(self) -> &'static str {
        match self {
            DogAnim::Idle => "idle",
            DogAnim::Run => "run",
            DogAnim::JumpUp => "jump-up",
            DogAnim::JumpMid => "jump-mid",
            DogAnim::JumpDown => "jump-down",
            DogAnim::RidingUp => "riding-up",
            DogAnim::RidingMid => "riding-mid",
            DogAnim::RidingDown => "riding-down",
            DogAnim::Eat => "eat",
            DogAnim::Boop => "boop",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dog {
    pub body: Body,
    pub controller: Option<Controller>,
    pub up: Option<DogId>,
    pub down: Option<DogId>,
    /// Set once this dog has settled into its stacked spot since the last
    /// attach. Knock-offs only happen when every dog below has settled.
    pub reached_desired_position: bool,
    /// A dropped dog has to land before anything may pick it up again.
    pub touched_ground_since_drop: bool,
    pub got_bone: bool,
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_speed: f32,
    pub hue: f32,
    pub boop_timer: f32,
}

impl Dog {
    pub fn new<R: Rng + ?Sized>(controller: Option<Controller>, rng: &mut R) -> Self {
        let mut body = Body::new(DOG_WIDTH, DOG_HEIGHT);
        body.anim_count = rng.gen::<f32>();
        Self {
            body,
            controller,
            up: None,
            down: None,
            reached_desired_position: false,
            touched_ground_since_drop: false,
            got_bone: false,
            walk_speed: WALK_SPEED * lerp(0.85, 1.3, rng.gen::<f32>()),
            run_speed: RUN_SPEED,
            jump_speed: JUMP_SPEED,
            hue: rng.gen::<f32>(),
            boop_timer: 0.0,
        }
    }

    pub fn control_mode(&self) -> Option<ControlMode> {
        self.controller.as_ref().map(Controller::mode)
    }

    pub fn is_player(&self) -> bool {
        self.control_mode() == Some(ControlMode::Player)
    }

    pub fn x_move_speed(&self) -> f32 {
        if self.body.running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    pub fn move_left(&mut self) {
        self.body.facing = FacingDir::Left;
        self.body.dx = -self.x_move_speed();
    }

    pub fn move_right(&mut self) {
        self.body.facing = FacingDir::Right;
        self.body.dx = self.x_move_speed();
    }

    pub fn jump(&mut self) {
        self.body.dy = -self.jump_speed;
    }

    /// Pose for this frame given whether the dog has ground underfoot.
    pub fn animation(&self, on_ground: bool) -> DogAnim {
        let dy = self.body.dy;
        if self.got_bone {
            DogAnim::Eat
        } else if self.boop_timer > 0.0 {
            DogAnim::Boop
        } else if self.down.is_some() {
            if dy < -JUMP_ANIMATION_SWITCH {
                DogAnim::RidingUp
            } else if dy < JUMP_ANIMATION_SWITCH {
                DogAnim::RidingMid
            } else {
                DogAnim::RidingDown
            }
        } else if !on_ground {
            if dy < -JUMP_ANIMATION_SWITCH {
                DogAnim::JumpUp
            } else if dy < JUMP_ANIMATION_SWITCH {
                DogAnim::JumpMid
            } else {
                DogAnim::JumpDown
            }
        } else if self.body.dx.abs() > 0.1 * self.walk_speed {
            DogAnim::Run
        } else {
            DogAnim::Idle
        }
    }

    /// Animation clock; running plays at double speed.
    pub fn animation_time(&self) -> f32 {
        if self.body.running {
            self.body.anim_count * 2.0
        } else {
            self.body.anim_count
        }
    }
}
