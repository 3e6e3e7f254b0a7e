//! One frame of a chain: drive it, carry riders, step physics top-down, pull
//! each rider back onto the dog below, then let the base grab more dogs and
//! let anyone in the chain grab a bone. The chain is walked with an explicit
//! list, not recursion.

use pup_core::math::{clamp_inv_lerp, lerp, smoothing_factor};
use pup_core::units::PHYSICS_SCALE;
use rand::Rng;

use crate::bone::Bone;
use crate::controller::{ControlOutcome, Controller, StepContext};
use crate::dog::DogId;
use crate::pack::Pack;
use crate::tiles::TileGrid;

/// Exponential settle rate for riders chasing their perch. A base running
/// flat out drags a settled rider past `MAX_X_DIST`; walking does not.
pub const SETTLE_RATE: f32 = 10.0;
/// Horizontal offset past which a settled rider falls off.
pub const MAX_X_DIST: f32 = 8.0 * PHYSICS_SCALE;
/// Rider bottom sits this far above the base bottom when centred...
pub const PERCH_HEIGHT_ALIGNED: f32 = 10.0 * PHYSICS_SCALE + 1.0;
/// ...and this far when offset by `PERCH_FALLOFF_DIST` or more.
pub const PERCH_HEIGHT_OFFSET: f32 = 7.0 * PHYSICS_SCALE;
pub const PERCH_FALLOFF_DIST: f32 = 10.0 * PHYSICS_SCALE;
/// Negative: bodies must overlap by this much before a base grabs a dog.
pub const ATTACH_LENIENCY: f32 = -3.0 * PHYSICS_SCALE;
pub const BOOP_TIME: f32 = 0.4;

/// Shared mutable world for one chain update.
pub struct ChainWorld<'w> {
    pub pack: &'w mut Pack,
    pub tiles: &'w TileGrid,
    pub bones: &'w mut [Bone],
}

/// Updates the chain based at `base` and returns every dog that was stepped.
/// Dogs that leave the chain mid-frame are still in the returned list.
pub fn update_chain(
    world: &mut ChainWorld<'_>,
    base: DogId,
    dt: f32,
    ctx: &mut StepContext<'_>,
) -> Vec<DogId> {
    run_driver(world, base, dt, ctx);

    let chain = world.pack.chain_from(base);
    carry_riders(world.pack, &chain, dt);

    for i in (0..chain.len()).rev() {
        let id = chain[i];
        let dog = &mut world.pack[id];
        if dog.down.is_some() {
            // Riders fall with the dog below; the settle holds them on it.
            dog.body.advance(dt, world.tiles);
        } else {
            dog.body.update(dt, world.tiles);
        }
        dog.boop_timer = (dog.boop_timer - dt).max(0.0);
        if dog.body.is_standing_on_ground(world.tiles) {
            dog.touched_ground_since_drop = true;
        }
        settle_rider(world.pack, id, world.tiles, dt, &mut *ctx.rng);
    }

    if world.pack[base].down.is_none() {
        check_for_up_dogs(world.pack, base);
    }

    for &id in &chain {
        collect_bones(world, id, ctx);
    }
    chain
}

fn run_driver(world: &mut ChainWorld<'_>, base: DogId, dt: f32, ctx: &mut StepContext<'_>) {
    let driver = world.pack.chain_driver(base);
    let Some(mut controller) = world.pack[driver].controller.take() else {
        world.pack[base].body.dampen_x(dt);
        return;
    };
    let outcome = controller.update(world.pack, driver, world.tiles, dt, ctx);
    match outcome {
        ControlOutcome::Keep => world.pack[driver].controller = Some(controller),
        ControlOutcome::HandOff(next) => {
            world.pack[driver].controller = Some(Controller::Stand);
            world.pack[next].controller = Some(controller);
        }
    }
}

/// Riders share the vertical velocity of the dog below. Their own horizontal
/// speed bleeds off; sideways motion reaches them only through the settle.
fn carry_riders(pack: &mut Pack, chain: &[DogId], dt: f32) {
    for pair in chain.windows(2) {
        let (below, rider) = (pair[0], pair[1]);
        let dy = pack[below].body.dy;
        let body = &mut pack[rider].body;
        body.dy = dy;
        body.dampen_x(dt);
    }
}

/// Eases the rider on top of `below` toward its perch, knocking it off if it
/// has drifted too far out or gets dragged into terrain.
fn settle_rider<R: Rng + ?Sized>(pack: &mut Pack, below: DogId, tiles: &TileGrid, dt: f32, rng: &mut R) {
    if pack[below].down.is_none() {
        pack[below].reached_desired_position = true;
    }
    let Some(rider) = pack[below].up else {
        return;
    };

    let below_dog = &pack[below];
    let (target_mid_x, below_max_y) = (below_dog.body.mid_x(), below_dog.body.max_y());
    let (facing, walk_speed) = (below_dog.body.facing, below_dog.walk_speed);

    let body = &pack[rider].body;
    let x_diff = target_mid_x - body.mid_x();
    let perch = lerp(
        PERCH_HEIGHT_ALIGNED,
        PERCH_HEIGHT_OFFSET,
        clamp_inv_lerp(x_diff.abs(), 0.0, PERCH_FALLOFF_DIST),
    );
    let y_diff = (below_max_y - perch) - body.max_y();
    let overextended = x_diff.abs() > MAX_X_DIST;

    let amt = smoothing_factor(SETTLE_RATE, dt);
    let rider_dog = &mut pack[rider];
    rider_dog.body.facing = facing;
    rider_dog.body.move_x(settle_step(x_diff, amt), tiles);
    let hit_ground = rider_dog.body.move_y(settle_step(y_diff, amt), tiles);
    let pulled_into_ground = hit_ground && y_diff > 0.0;

    if overextended || pulled_into_ground {
        if pack.all_below_reached(rider) {
            knock_off(pack, rider, walk_speed, rng);
        }
    } else {
        pack[rider].reached_desired_position = true;
    }
}

/// One smoothing step toward `diff`: at least a whole unit so rounding can
/// not stall it, and never past the target.
fn settle_step(diff: f32, amt: f32) -> f32 {
    if diff.abs() <= 1.0 {
        return diff;
    }
    let step = diff * amt;
    if step.abs() < 1.0 {
        diff.signum()
    } else {
        step
    }
}

fn knock_off<R: Rng + ?Sized>(pack: &mut Pack, rider: DogId, walk_speed: f32, rng: &mut R) {
    pack.detach_from_below(rider);
    let dog = &mut pack[rider];
    dog.body.dx = lerp(-walk_speed, walk_speed, rng.gen::<f32>());
    dog.boop_timer = BOOP_TIME;
    log::debug!("dog {} knocked off its tower", rider.0);
}

fn check_for_up_dogs(pack: &mut Pack, acting: DogId) {
    for target in pack.ids().collect::<Vec<_>>() {
        if !pack.can_be_picked_up(acting, target) {
            continue;
        }
        if pack[acting]
            .body
            .is_touching_body(&pack[target].body, ATTACH_LENIENCY)
        {
            pack.attach(acting, target);
        }
    }
}

fn collect_bones(world: &mut ChainWorld<'_>, id: DogId, ctx: &mut StepContext<'_>) {
    if world.pack[id].got_bone {
        return;
    }
    let body = &world.pack[id].body;
    let Some(bone) = world
        .bones
        .iter_mut()
        .find(|b| !b.done && body.is_touching_body(&b.body, 0.0))
    else {
        return;
    };
    bone.done = true;
    world.pack.splice_out(id);
    world.pack[id].got_bone = true;
    log::info!("dog {} picked up a bone", id.0);

    if world.pack[id].is_player() && world.bones.iter().any(|b| !b.done) {
        pass_player_on(world.pack, id, ctx);
    }
}

/// A bone holder can no longer move, so the player takes over the nearest
/// dog that is still free to fetch the rest.
fn pass_player_on(pack: &mut Pack, holder: DogId, ctx: &mut StepContext<'_>) {
    let (x, y) = (pack[holder].body.mid_x(), pack[holder].body.mid_y());
    let Some(next) = pack
        .ids()
        .filter(|&other| !pack[other].got_bone)
        .min_by(|&a, &b| {
            let dist = |d: DogId| (pack[d].body.mid_x() - x).hypot(pack[d].body.mid_y() - y);
            dist(a).total_cmp(&dist(b))
        })
    else {
        return;
    };
    let controller = pack[holder].controller.replace(Controller::Stand);
    pack[next].controller = controller;
    ctx.control_switched = true;
    log::info!("control passed from dog {} to dog {}", holder.0, next.0);
}
