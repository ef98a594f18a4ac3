//! Body registry
//!
//! The caller owns the world and passes it by `&mut` to [`super::step`].
//! Bodies keep the id they were given on insert; iteration is in id order.

use serde::{Deserialize, Serialize};

use super::body::{BodyId, RigidBody};
use super::bounds::Channel;
use super::response::NumericGuards;
use crate::settings::PhysicsSettings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Tunables consumed by every step
    pub settings: PhysicsSettings,
    /// Horizontal channel walls, if the playfield has them
    pub channel: Option<Channel>,
    /// Numeric guard trips accumulated over every step
    pub guards: NumericGuards,
    /// Completed steps
    pub time_ticks: u64,
    pub(super) bodies: Vec<RigidBody>,
    next_id: u32,
}

impl World {
    pub fn new(settings: PhysicsSettings) -> Self {
        Self {
            settings,
            channel: None,
            guards: NumericGuards::default(),
            time_ticks: 0,
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Add walls at `y = 0` and `y = height`
    pub fn with_channel(mut self, height: f64) -> Self {
        self.channel = Some(Channel { height });
        self
    }

    /// Register a body and assign it a fresh id
    pub fn insert(&mut self, mut body: RigidBody) -> BodyId {
        let id = BodyId(self.next_id);
        self.next_id += 1;
        body.id = id;
        body.sync_geometry();
        log::trace!("Inserted body {:?} ({:?})", id, body.shape);
        self.bodies.push(body);
        id
    }

    /// Remove a body (e.g. a ball that left the field)
    pub fn remove(&mut self, id: BodyId) -> Option<RigidBody> {
        let index = self.bodies.iter().position(|b| b.id == id)?;
        Some(self.bodies.remove(index))
    }

    pub fn get(&self, id: BodyId) -> Option<&RigidBody> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut RigidBody> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn bodies(&self) -> &[RigidBody] {
        &self.bodies
    }

    /// Keep only the bodies matching `keep`
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&RigidBody) -> bool,
    {
        self.bodies.retain(keep);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Sum of mechanical energy, ignoring NaN entries
    pub fn total_energy(&self) -> f64 {
        self.bodies
            .iter()
            .map(|b| b.mechanical_energy)
            .filter(|e| !e.is_nan())
            .sum()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(PhysicsSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::vector::Vector2;

    #[test]
    fn test_insert_assigns_unique_ids() {
        let mut world = World::default();
        let a = world.insert(RigidBody::circle(Vector2::ZERO, 1.0));
        let b = world.insert(RigidBody::circle(Vector2::ONE, 1.0));
        assert_ne!(a, b);
        assert_eq!(world.len(), 2);
        assert_eq!(world.get(b).unwrap().position, Vector2::ONE);
    }

    #[test]
    fn test_remove_keeps_other_ids() {
        let mut world = World::default();
        let a = world.insert(RigidBody::circle(Vector2::ZERO, 1.0));
        let b = world.insert(RigidBody::circle(Vector2::ONE, 1.0));
        let removed = world.remove(a).unwrap();
        assert_eq!(removed.id, a);
        assert!(world.get(a).is_none());
        assert!(world.get(b).is_some());
        assert!(world.remove(a).is_none());

        // Ids are never reused
        let c = world.insert(RigidBody::circle(Vector2::ZERO, 1.0));
        assert_ne!(c, a);
    }

    #[test]
    fn test_retain_drops_out_of_bounds() {
        let mut world = World::default();
        world.insert(RigidBody::circle(Vector2::new(-5.0, 0.0), 1.0));
        let keep = world.insert(RigidBody::circle(Vector2::new(50.0, 0.0), 1.0));
        world.retain(|b| b.position.x >= 0.0);
        assert_eq!(world.len(), 1);
        assert_eq!(world.bodies()[0].id, keep);
    }

    #[test]
    fn test_total_energy_skips_nan() {
        let mut world = World::default();
        world.insert(RigidBody::circle(Vector2::ZERO, 1.0).with_velocity(Vector2::new(0.2, 0.0)));
        let id = world.insert(RigidBody::circle(Vector2::ONE, 1.0));
        world.get_mut(id).unwrap().mechanical_energy = f64::NAN;
        assert!((world.total_energy() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn test_world_serializes() {
        let mut world = World::default().with_channel(600.0);
        world.insert(RigidBody::rectangle(Vector2::new(20.0, 300.0), 10.0, 80.0));
        let json = serde_json::to_string(&world).unwrap();
        let back: World = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.channel, world.channel);
    }
}
