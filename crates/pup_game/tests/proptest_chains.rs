//! Property tests for the dog-chain link structure and body geometry.
//!
//! Random sequences of attach / detach / splice operations (and random
//! keyboard input through a full level) must never break link symmetry,
//! create a cycle, or leave a chain with more than one base.

use std::collections::HashSet;

use proptest::prelude::*;
use pup_core::input::{InputState, Key};
use pup_game::{Body, Controller, Dog, DogId, Level, LevelLayout, Pack};
use rand::SeedableRng;
use rand_pcg::Pcg32;

const PACK_SIZE: usize = 8;

#[derive(Debug, Clone)]
enum ChainOp {
    Attach(usize, usize),
    Detach(usize),
    Splice(usize),
    Land(usize),
    GrabBone(usize),
    SetPlayer(usize),
}

fn chain_op_strategy() -> impl Strategy<Value = ChainOp> {
    prop_oneof![
        3 => (0..PACK_SIZE, 0..PACK_SIZE).prop_map(|(a, b)| ChainOp::Attach(a, b)),
        1 => (0..PACK_SIZE).prop_map(ChainOp::Detach),
        1 => (0..PACK_SIZE).prop_map(ChainOp::Splice),
        2 => (0..PACK_SIZE).prop_map(ChainOp::Land),
        1 => (0..PACK_SIZE).prop_map(ChainOp::GrabBone),
        1 => (0..PACK_SIZE).prop_map(ChainOp::SetPlayer),
    ]
}

fn fresh_pack() -> Pack {
    let mut rng = Pcg32::seed_from_u64(99);
    let mut pack = Pack::new();
    for _ in 0..PACK_SIZE {
        let id = pack.push(Dog::new(Some(Controller::Stand), &mut rng));
        pack[id].touched_ground_since_drop = true;
    }
    pack
}

fn players_per_chain_ok(pack: &Pack) -> bool {
    pack.bases().all(|base| {
        pack.chain_from(base)
            .into_iter()
            .filter(|&id| pack[id].is_player())
            .count()
            <= 1
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn random_link_ops_preserve_invariants(ops in prop::collection::vec(chain_op_strategy(), 1..60)) {
        let mut pack = fresh_pack();

        for op in ops {
            match op {
                ChainOp::Attach(a, b) => {
                    // Only bases act, and only on eligible targets.
                    let (acting, target) = (pack.base_of(DogId(a)), DogId(b));
                    if pack.can_be_picked_up(acting, target) {
                        let top = pack.top_of(acting);
                        pack.attach(acting, target);
                        prop_assert_eq!(pack[target].down, Some(top));
                        prop_assert!(pack.same_chain(acting, target));
                    }
                }
                ChainOp::Detach(i) => pack.detach_from_below(DogId(i)),
                ChainOp::Splice(i) => {
                    pack.splice_out(DogId(i));
                    prop_assert_eq!(pack[DogId(i)].up, None);
                    prop_assert_eq!(pack[DogId(i)].down, None);
                }
                ChainOp::Land(i) => pack[DogId(i)].touched_ground_since_drop = true,
                ChainOp::GrabBone(i) => {
                    pack.splice_out(DogId(i));
                    pack[DogId(i)].got_bone = true;
                }
                ChainOp::SetPlayer(i) => {
                    if let Some(old) = pack.player() {
                        pack[old].controller = Some(Controller::Stand);
                    }
                    pack[DogId(i)].controller = Some(Controller::Player(Default::default()));
                }
            }

            prop_assert!(pack.check_invariants().is_ok(), "{:?}", pack.check_invariants());
            prop_assert!(players_per_chain_ok(&pack));

            // Every dog is in exactly one chain.
            let mut seen = HashSet::new();
            for base in pack.bases() {
                for id in pack.chain_from(base) {
                    prop_assert!(seen.insert(id));
                }
            }
            prop_assert_eq!(seen.len(), pack.len());

            // Bone holders are always on their own.
            for (_, dog) in pack.iter() {
                if dog.got_bone {
                    prop_assert!(dog.up.is_none() && dog.down.is_none());
                }
            }
        }
    }

    #[test]
    fn random_play_preserves_invariants(
        frames in prop::collection::vec((prop::sample::subsequence(vec![Key::Left, Key::Right, Key::Up, Key::Down, Key::Z, Key::ShiftLeft], 0..4), 1..20usize), 1..25),
        seed in any::<u64>(),
    ) {
        let layout = LevelLayout::from_rows(
            "prop",
            &[
                "............",
                "....#.......",
                ".S.D.P.S.BD.",
                "############",
            ],
        ).expect("valid layout");
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut level = Level::from_layout(&layout, 0.5, &mut rng);
        let mut input = InputState::new();

        for (keys, repeat) in frames {
            input.set_held(&keys.into_iter().collect());
            for _ in 0..repeat {
                level.update(1.0 / 60.0, &input, &mut rng);
                input.end_frame();
                prop_assert!(level.pack.check_invariants().is_ok());
                prop_assert!(players_per_chain_ok(&level.pack));
                prop_assert_eq!(level.pack.iter().filter(|(_, d)| d.is_player()).count(), 1);
            }
        }
    }

    #[test]
    fn geometry_setters_round_trip(
        w in 1u32..200, h in 1u32..200,
        v in -10_000i32..10_000,
    ) {
        let (w, h, v) = (w as f32, h as f32, v as f32);
        let mut body = Body::new(w, h);

        body.set_min_x(v);
        prop_assert_eq!(body.min_x(), v);
        prop_assert_eq!(body.max_x() - body.min_x(), w);
        body.set_max_x(v);
        prop_assert_eq!(body.max_x(), v);
        body.set_mid_x(v);
        prop_assert!((body.mid_x() - v).abs() < 1e-3);
        prop_assert!((body.max_x() - body.min_x() - w).abs() < 1e-3);

        body.set_min_y(v);
        prop_assert_eq!(body.min_y(), v);
        body.set_max_y(v);
        prop_assert_eq!(body.max_y(), v);
        prop_assert_eq!(body.max_y() - body.min_y(), h);
        body.set_mid_y(v);
        prop_assert!((body.mid_y() - v).abs() < 1e-3);
    }
}
