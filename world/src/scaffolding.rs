//! Direct world-construction helpers for collision and enclosure tests.
//!
//! Everything here bypasses the pending change log so a scenario can be
//! staged without polluting the first asserted [`ChangeBatch`]. Gated behind
//! the `scenario_scaffolding` cargo feature; production builds never compile
//! this module.
//!
//! [`ChangeBatch`]: grid_skirmish_core::ChangeBatch

use grid_skirmish_core::{Cell, Direction, EntityKind, GridPoint, Owner};

use crate::entities::{Bullet, Enemy};
use crate::World;

/// Writes a cell state directly, without a change record.
pub fn set_cell(world: &mut World, point: GridPoint, cell: Cell) {
    world.grid.set(point, cell);
}

/// Teleports the hero to `point`, moving its occupancy marker along.
pub fn place_hero(world: &mut World, point: GridPoint) {
    world.grid.set(world.hero.pos, Cell::Empty);
    world.hero.pos = point;
    world.grid.set(point, EntityKind::Hero.marker());
}

/// Sets the hero's facing direction.
pub fn aim_hero(world: &mut World, direction: Direction) {
    world.hero.direction = Some(direction);
}

/// Overrides the hero's remaining lives.
pub fn set_hero_lives(world: &mut World, lives: u32) {
    world.hero.lives = lives;
}

/// Marks the hero as mid-trail, as if it had already left the border.
pub fn begin_trail(world: &mut World) {
    world.hero.drawing_trail = true;
}

/// Adds an enemy at `point` with the provided lives.
pub fn place_enemy(world: &mut World, point: GridPoint, lives: u32) {
    world.enemies.push(Enemy::new(point, lives));
    world.grid.set(point, EntityKind::Enemy.marker());
}

/// Forces an enemy's heading and step counter, skipping the random redirect.
pub fn direct_enemy(world: &mut World, index: usize, direction: Direction, steps: u32) {
    if let Some(enemy) = world.enemies.get_mut(index) {
        enemy.direction = Some(direction);
        enemy.steps_left = steps;
    }
}

/// Spawns a live bullet at `point` heading `direction`.
pub fn spawn_bullet(world: &mut World, point: GridPoint, direction: Direction, owner: Owner) {
    world.bullets.push(Bullet::new(point, direction, owner));
    world.grid.set(point, EntityKind::Bullet.marker());
}

/// Draws one direction from the world's generator, never equal to `prior`.
pub fn resample_direction(world: &mut World, prior: Option<Direction>) -> Direction {
    crate::redirect(&mut world.rng, prior)
}
