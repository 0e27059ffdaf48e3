//! Fixed-capacity entity pools.
//!
//! A pool never grows or shrinks after construction.  Live entities form a
//! contiguous prefix and dead ones the suffix; every mutation below keeps that
//! ordering, which lets iteration stop at the first dead slot.

use rand::RngCore;
use tracing::trace;

use crate::assets::Sprites;
use crate::collision::Rect;
use crate::entities::{Entity, SpawnEnv};
use crate::render::Canvas;

#[derive(Clone, Debug)]
pub struct Pool<T> {
    slots: Vec<T>,
}

impl<T: Entity> Pool<T> {
    /// `capacity` dormant entities.
    pub fn new(capacity: usize) -> Self {
        Pool {
            slots: (0..capacity).map(|_| T::default()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// All slots, live prefix first.
    pub fn slots(&self) -> &[T] {
        &self.slots
    }

    pub fn live(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().take_while(|e| e.is_visible())
    }

    pub fn live_count(&self) -> usize {
        self.live().count()
    }

    /// Spawn the tail slot and move it to the front.  Returns `None`, leaving
    /// the pool untouched, when the tail is alive (the pool is full).
    pub fn get(
        &mut self,
        x: f32,
        y: f32,
        speed: f32,
        env: &SpawnEnv,
        rng: &mut dyn RngCore,
    ) -> Option<&mut T> {
        let tail_free = self.slots.last().is_some_and(|tail| !tail.is_visible());
        if !tail_free {
            trace!(capacity = self.capacity(), "pool exhausted, spawn dropped");
            return None;
        }
        self.slots.last_mut()?.spawn(x, y, speed, env, rng);
        self.slots.rotate_right(1);
        self.slots.first_mut()
    }

    /// Run `step` on each live entity; entities for which it returns `true`
    /// are cleared and moved to the tail.
    pub fn animate(&mut self, mut step: impl FnMut(&mut T) -> bool) {
        let mut i = 0;
        while i < self.slots.len() && self.slots[i].is_visible() {
            if step(&mut self.slots[i]) {
                self.retire(i);
            } else {
                i += 1;
            }
        }
    }

    /// Clear the entity at `index` and move it behind every other slot.
    pub fn retire(&mut self, index: usize) {
        if let Some(entity) = self.slots.get_mut(index) {
            entity.clear();
            self.slots[index..].rotate_left(1);
        }
    }

    /// Draw each live entity, then check it against the ship.  Returns `true`
    /// if any live hazard overlaps `ship`.
    pub fn draw(
        &self,
        canvas: &mut dyn Canvas,
        sprites: &Sprites,
        ship: &Rect,
        debug_boxes: bool,
    ) -> bool {
        let mut hit = false;
        for entity in self.live() {
            entity.draw(canvas, sprites, debug_boxes);
            if let Some(hazard) = entity.hazard() {
                hit |= hazard.overlaps(ship);
            }
        }
        hit
    }

    /// Kill every entity.
    pub fn reset(&mut self) {
        for entity in self.slots.iter_mut() {
            entity.clear();
        }
    }
}
