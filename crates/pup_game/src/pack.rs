//! Arena of dogs plus the operations that rewire their stacking links.
//!
//! Every dog lives in one `Vec` and refers to its neighbours by [`DogId`].
//! A chain is a maximal run connected by `up`/`down`; its base is the dog
//! with no `down`. The link helpers here keep `a.up == Some(b)` and
//! `b.down == Some(a)` in lockstep so no caller ever writes one half.

use std::collections::HashSet;
use std::ops::{Index, IndexMut};

use crate::dog::{Dog, DogId};

#[derive(Debug, Default, Clone)]
pub struct Pack {
    dogs: Vec<Dog>,
}

impl Pack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, dog: Dog) -> DogId {
        self.dogs.push(dog);
        DogId(self.dogs.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.dogs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dogs.is_empty()
    }

    pub fn get(&self, id: DogId) -> Option<&Dog> {
        self.dogs.get(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = DogId> {
        (0..self.dogs.len()).map(DogId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (DogId, &Dog)> {
        self.dogs.iter().enumerate().map(|(i, d)| (DogId(i), d))
    }

    /// Dogs with nothing underneath them, in arena order.
    pub fn bases(&self) -> impl Iterator<Item = DogId> + '_ {
        self.iter().filter(|(_, d)| d.down.is_none()).map(|(id, _)| id)
    }

    pub fn player(&self) -> Option<DogId> {
        self.iter().find(|(_, d)| d.is_player()).map(|(id, _)| id)
    }

    // Walks are capped at the arena size so a corrupted link set cannot hang
    // the caller; `check_invariants` reports the corruption itself.

    pub fn base_of(&self, id: DogId) -> DogId {
        let mut cur = id;
        for _ in 0..self.dogs.len() {
            match self[cur].down {
                Some(down) => cur = down,
                None => break,
            }
        }
        cur
    }

    pub fn top_of(&self, id: DogId) -> DogId {
        let mut cur = id;
        for _ in 0..self.dogs.len() {
            match self[cur].up {
                Some(up) => cur = up,
                None => break,
            }
        }
        cur
    }

    /// `id` followed by every dog stacked on top of it, bottom to top.
    pub fn chain_from(&self, id: DogId) -> Vec<DogId> {
        let mut out = vec![id];
        let mut cur = id;
        while let Some(up) = self[cur].up {
            if out.len() >= self.dogs.len() {
                break;
            }
            out.push(up);
            cur = up;
        }
        out
    }

    /// The whole chain containing `id`, from its base up.
    pub fn chain_of(&self, id: DogId) -> Vec<DogId> {
        self.chain_from(self.base_of(id))
    }

    pub fn chain_height(&self, id: DogId) -> usize {
        self.chain_of(id).len()
    }

    pub fn same_chain(&self, a: DogId, b: DogId) -> bool {
        self.base_of(a) == self.base_of(b)
    }

    pub fn chain_has_player(&self, id: DogId) -> bool {
        self.chain_of(id).into_iter().any(|d| self[d].is_player())
    }

    /// Dog whose controller drives the chain based at `base` this frame: the
    /// player if it is anywhere in the chain, otherwise the base itself.
    pub fn chain_driver(&self, base: DogId) -> DogId {
        self.chain_from(base)
            .into_iter()
            .find(|&d| self[d].is_player())
            .unwrap_or(base)
    }

    /// True when every dog below `id` has settled into place.
    pub fn all_below_reached(&self, id: DogId) -> bool {
        let mut cur = id;
        for _ in 0..self.dogs.len() {
            match self[cur].down {
                Some(down) => {
                    if !self[down].reached_desired_position {
                        return false;
                    }
                    cur = down;
                }
                None => break,
            }
        }
        true
    }

    /// Whether the chain of `acting` may pick up `target` (and whatever rides
    /// on it) by touching it.
    pub fn can_be_picked_up(&self, acting: DogId, target: DogId) -> bool {
        if acting == target {
            return false;
        }
        let (actor, candidate) = (&self[acting], &self[target]);
        if actor.got_bone || candidate.got_bone {
            return false;
        }
        if candidate.down.is_some() || !candidate.touched_ground_since_drop {
            return false;
        }
        if self.same_chain(acting, target) {
            return false;
        }
        !self.chain_has_player(target)
    }

    /// Puts `target` (a base) and its riders on top of `acting`'s chain.
    pub fn attach(&mut self, acting: DogId, target: DogId) {
        debug_assert!(self[target].down.is_none(), "attach target must be a base");
        let top = self.top_of(acting);
        self[top].up = Some(target);
        self[target].down = Some(top);
        for id in self.chain_of(acting) {
            self[id].reached_desired_position = false;
        }
        log::debug!("dog {} stacked onto dog {}", target.0, top.0);
    }

    /// Cuts the link under `id`. The dog keeps its riders and has to land
    /// before it can be picked up again.
    pub fn detach_from_below(&mut self, id: DogId) {
        if let Some(down) = self[id].down.take() {
            self[down].up = None;
        }
        self[id].touched_ground_since_drop = false;
    }

    /// Removes `id` from its chain entirely, joining the dogs that were
    /// above and below it. With nothing below, the dogs above become a free
    /// chain that must land before being picked up again.
    pub fn splice_out(&mut self, id: DogId) {
        let down = self[id].down.take();
        let up = self[id].up.take();
        match (down, up) {
            (Some(d), Some(u)) => {
                self[d].up = Some(u);
                self[u].down = Some(d);
                for member in self.chain_of(d) {
                    self[member].reached_desired_position = false;
                }
            }
            (Some(d), None) => self[d].up = None,
            (None, Some(u)) => {
                self[u].down = None;
                self[u].touched_ground_since_drop = false;
            }
            (None, None) => {}
        }
    }

    /// Link symmetry, no cycles, and exactly one base per chain.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (id, dog) in self.iter() {
            if let Some(up) = dog.up {
                if up == id {
                    return Err(format!("dog {} rides itself", id.0));
                }
                match self.get(up) {
                    Some(u) if u.down == Some(id) => {}
                    Some(_) => return Err(format!("dog {}.up = {} is not mirrored", id.0, up.0)),
                    None => return Err(format!("dog {}.up = {} is out of range", id.0, up.0)),
                }
            }
            if let Some(down) = dog.down {
                match self.get(down) {
                    Some(d) if d.up == Some(id) => {}
                    Some(_) => {
                        return Err(format!("dog {}.down = {} is not mirrored", id.0, down.0))
                    }
                    None => return Err(format!("dog {}.down = {} is out of range", id.0, down.0)),
                }
            }
        }

        // With symmetric links every dog belongs to exactly one downward
        // walk; reaching a base from every dog rules out cycles.
        for id in self.ids() {
            let mut seen = HashSet::new();
            let mut cur = id;
            while let Some(down) = self[cur].down {
                if !seen.insert(cur) {
                    return Err(format!("dog {} sits in a cycle", id.0));
                }
                cur = down;
            }
        }
        Ok(())
    }
}

impl Index<DogId> for Pack {
    type Output = Dog;

    fn index(&self, id: DogId) -> &Dog {
        &self.dogs[id.0]
    }
}

impl IndexMut<DogId> for Pack {
    fn index_mut(&mut self, id: DogId) -> &mut Dog {
        &mut self.dogs[id.0]
    }
}
