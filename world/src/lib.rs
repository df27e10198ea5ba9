#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative grid and entity state for Grid Skirmish.
//!
//! The world owns the cell grid, the hero, the enemies, and the live bullets,
//! and resolves one engine operation per [`apply`] call. Every grid mutation
//! is reported through the pending change log so an external renderer can
//! repaint incrementally; the two normal game-end conditions surface as
//! [`GameEnd`] values raised out of the mutating operation.

mod enclosure;
mod entities;
mod grid;
#[cfg(feature = "scenario_scaffolding")]
pub mod scaffolding;

use grid_skirmish_core::{
    Cell, ChangeBatch, Command, Direction, EntityKind, GameEnd, GridPoint, Owner, PositionChange,
    StatusChange, Variant, HERO_SPAWN,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use entities::{Bullet, Enemy, Hero};
use grid::Grid;

/// Bounded retries when resampling an enemy direction.
const DIRECTION_RESAMPLE_CAP: u32 = 16;
/// Random probes attempted when placing or relocating an enemy.
const PLACEMENT_PROBE_CAP: u32 = 512;
/// Minimum Manhattan distance between the hero and a freshly placed enemy.
const MIN_ENEMY_SPAWN_DISTANCE: u32 = 10;

const DEFAULT_ENEMY_COUNT: usize = 4;
const DEFAULT_HERO_LIVES: u32 = 3;
const DEFAULT_ENEMY_FIRE_ODDS: u32 = 31;

/// Configuration parameters required to construct a world.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    variant: Variant,
    enemy_count: usize,
    hero_lives: u32,
    enemy_lives: u32,
    enemy_fire_odds: u32,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration with the variant's default rule table.
    ///
    /// Tank-battle enemies survive one hit and relocate; trail-enclosure
    /// enemies die instantly.
    #[must_use]
    pub const fn new(variant: Variant, rng_seed: u64) -> Self {
        let enemy_lives = match variant {
            Variant::TankBattle => 2,
            Variant::TrailEnclosure => 1,
        };
        Self {
            variant,
            enemy_count: DEFAULT_ENEMY_COUNT,
            hero_lives: DEFAULT_HERO_LIVES,
            enemy_lives,
            enemy_fire_odds: DEFAULT_ENEMY_FIRE_ODDS,
            rng_seed,
        }
    }

    /// Overrides the number of enemies placed at initialization.
    #[must_use]
    pub const fn with_enemy_count(mut self, enemy_count: usize) -> Self {
        self.enemy_count = enemy_count;
        self
    }

    /// Overrides the hero's starting lives.
    #[must_use]
    pub const fn with_hero_lives(mut self, hero_lives: u32) -> Self {
        self.hero_lives = hero_lives;
        self
    }

    /// Overrides the per-enemy lives counter.
    #[must_use]
    pub const fn with_enemy_lives(mut self, enemy_lives: u32) -> Self {
        self.enemy_lives = enemy_lives;
        self
    }

    /// Overrides the one-in-N odds of an enemy firing on a given tick.
    #[must_use]
    pub const fn with_enemy_fire_odds(mut self, enemy_fire_odds: u32) -> Self {
        self.enemy_fire_odds = enemy_fire_odds;
        self
    }
}

/// Represents the authoritative Grid Skirmish world state.
///
/// One world instance serves one game session; the grid and the entity set
/// are never shared across sessions.
#[derive(Debug)]
pub struct World {
    grid: Grid,
    hero: Hero,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    rules: Config,
    rng: ChaCha8Rng,
    statuses: Vec<StatusChange>,
}

impl World {
    /// Creates a new world ready for initialization.
    ///
    /// The grid is empty until an [`Command::Initialize`] seeds it; every
    /// random draw derives from the configured seed, so identical seeds and
    /// command sequences replay identically.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            grid: Grid::new(0, 0),
            hero: Hero::new(HERO_SPAWN, config.hero_lives),
            enemies: Vec::new(),
            bullets: Vec::new(),
            rules: config,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            statuses: Vec::new(),
        }
    }

    fn initialize(&mut self, map: Vec<Vec<Cell>>) {
        let rows = map.len();
        let columns = map.first().map_or(0, Vec::len);
        self.grid = Grid::new(rows, columns);
        self.enemies.clear();
        self.bullets.clear();
        self.statuses.clear();

        let terrain = map.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().enumerate().map(move |(col, cell)| {
                PositionChange::point(GridPoint::new(row as i32, col as i32), *cell)
            })
        });
        self.grid.update_many(terrain);

        self.hero = Hero::new(HERO_SPAWN, self.rules.hero_lives);
        self.grid
            .update(PositionChange::point(HERO_SPAWN, EntityKind::Hero.marker()));

        for _ in 0..self.rules.enemy_count {
            if let Some(pos) = self.random_enemy_position() {
                self.enemies.push(Enemy::new(pos, self.rules.enemy_lives));
                self.grid
                    .update(PositionChange::point(pos, EntityKind::Enemy.marker()));
            }
        }

        self.statuses.push(StatusChange::Points {
            kind: EntityKind::Hero,
            value: 0,
        });
        self.statuses.push(StatusChange::Lives {
            kind: EntityKind::Hero,
            value: self.hero.lives,
        });
    }

    fn move_hero(&mut self, direction: Option<Direction>) -> Result<(), GameEnd> {
        let Some(direction) = direction else {
            return Ok(());
        };
        if !self.hero.is_alive() {
            return Ok(());
        }

        self.hero.direction = Some(direction);
        let from = self.hero.pos;
        let candidate = from.offset(direction);
        let trail_variant = self.rules.variant == Variant::TrailEnclosure;

        match self.grid.get(candidate) {
            Some(Cell::Enemy) => self.hero_hit()?,
            Some(Cell::Border) | Some(Cell::Marked)
                if trail_variant && self.hero.drawing_trail =>
            {
                enclosure::classify(&mut self.grid, &mut self.rng);
                self.hero.drawing_trail = false;
                if self.all_enemies_trapped() {
                    return Err(GameEnd::Win);
                }
            }
            Some(cell) if cell.blocks_movement() => {}
            None => {}
            Some(_) => {
                self.grid.update(PositionChange::moved(
                    candidate,
                    EntityKind::Hero.marker(),
                    from,
                ));
                if trail_variant {
                    self.grid.update(PositionChange::point(from, Cell::Trail));
                    self.hero.drawing_trail = true;
                }
                self.hero.pos = candidate;
            }
        }

        Ok(())
    }

    fn advance_enemies(&mut self) -> Result<(), GameEnd> {
        for index in 0..self.enemies.len() {
            if !self.enemies[index].is_alive() {
                continue;
            }

            if self.enemies[index].steps_left == 0 {
                let rows = self.grid.rows();
                let reset = if rows > 2 {
                    self.rng.gen_range(2..rows) as u32
                } else {
                    2
                };
                let prior = self.enemies[index].direction;
                let next = redirect(&mut self.rng, prior);
                let enemy = &mut self.enemies[index];
                enemy.steps_left = reset;
                enemy.direction = Some(next);
            }

            let Some(direction) = self.enemies[index].direction else {
                continue;
            };
            let from = self.enemies[index].pos;
            let candidate = from.offset(direction);

            match self.grid.get(candidate) {
                // The hero's cell empties when the hit resolves, so the
                // enemy walks into it below.
                Some(Cell::Hero) => self.hero_hit()?,
                Some(Cell::Trail) => {
                    // Crossing the trail costs the hero a life and reverts
                    // the whole crossing; the enemy holds its cell.
                    self.hero_hit()?;
                    continue;
                }
                Some(cell) if cell.blocks_movement() => {
                    self.enemies[index].steps_left = 0;
                    continue;
                }
                None => {
                    self.enemies[index].steps_left = 0;
                    continue;
                }
                Some(_) => {}
            }

            self.grid.update(PositionChange::moved(
                candidate,
                EntityKind::Enemy.marker(),
                from,
            ));
            let enemy = &mut self.enemies[index];
            enemy.pos = candidate;
            enemy.steps_left = enemy.steps_left.saturating_sub(1);
        }

        Ok(())
    }

    fn fire(&mut self, hero_trigger: bool) -> Result<(), GameEnd> {
        if hero_trigger && self.hero.is_alive() {
            let direction = self.hero.direction.unwrap_or(Direction::Down);
            self.bullets
                .push(Bullet::new(self.hero.pos, direction, Owner::Hero));
        }

        for index in 0..self.enemies.len() {
            if !self.enemies[index].is_alive() {
                continue;
            }
            if self.rng.gen_range(0..self.rules.enemy_fire_odds.max(1)) != 0 {
                continue;
            }
            let direction = match self.enemies[index].direction {
                Some(direction) => direction,
                None => Direction::ALL[self.rng.gen_range(0..Direction::ALL.len())],
            };
            self.bullets
                .push(Bullet::new(self.enemies[index].pos, direction, Owner::Enemy));
        }

        for index in 0..self.bullets.len() {
            let Some(direction) = self.bullets[index].direction else {
                continue;
            };
            let from = self.bullets[index].pos;
            let owner = self.bullets[index].owner;
            let candidate = from.offset(direction);

            // Rule 1: a destructible obstacle absorbs the bullet.
            if matches!(self.grid.get(candidate), Some(cell) if cell.is_destructible()) {
                self.grid
                    .update(PositionChange::point(candidate, Cell::Empty));
                self.stop_bullet(index);
                continue;
            }

            // Rule 2: a hero-owned bullet hits a live enemy.
            if owner == Owner::Hero {
                if let Some(enemy_index) = self.enemy_at(candidate) {
                    self.enemies[enemy_index].lives =
                        self.enemies[enemy_index].lives.saturating_sub(1);
                    self.grid
                        .update(PositionChange::point(candidate, Cell::Empty));
                    self.stop_bullet(index);
                    if self.enemies[enemy_index].is_alive() {
                        if let Some(pos) = self.random_enemy_position() {
                            self.enemies[enemy_index].pos = pos;
                            self.grid
                                .update(PositionChange::point(pos, EntityKind::Enemy.marker()));
                        }
                    }
                    self.hero.points += 1;
                    self.statuses.push(StatusChange::Points {
                        kind: EntityKind::Hero,
                        value: self.hero.points,
                    });
                    continue;
                }
            }

            // Rule 3: an enemy-owned bullet hits the hero.
            if owner == Owner::Enemy && self.hero.is_alive() && candidate == self.hero.pos {
                self.stop_bullet(index);
                self.hero_hit()?;
                continue;
            }

            // Rule 4: two live bullets cancel in mid-flight.
            if let Some(other) = self.bullet_at(candidate, index) {
                self.stop_bullet(other);
                self.stop_bullet(index);
                continue;
            }

            // Rule 5: anything else that is not plain empty stops the bullet.
            if self.grid.get(candidate) != Some(Cell::Empty) {
                self.stop_bullet(index);
                continue;
            }

            // Rule 6: advance.
            self.grid.update(PositionChange::moved(
                candidate,
                EntityKind::Bullet.marker(),
                from,
            ));
            self.bullets[index].pos = candidate;
        }

        self.bullets.retain(|bullet| bullet.direction.is_some());

        // Re-assert entity markers over whatever a bullet wrote to their
        // cells this tick.
        for index in 0..self.enemies.len() {
            if self.enemies[index].is_alive() {
                let pos = self.enemies[index].pos;
                self.grid
                    .update(PositionChange::point(pos, EntityKind::Enemy.marker()));
            }
        }
        if self.hero.is_alive() {
            self.grid
                .update(PositionChange::point(self.hero.pos, EntityKind::Hero.marker()));
        }

        Ok(())
    }

    /// Shared hero-death handling: life decrement, trail revert, respawn at
    /// the canonical start cell, and the loss signal on exhaustion.
    fn hero_hit(&mut self) -> Result<(), GameEnd> {
        self.hero.lives = self.hero.lives.saturating_sub(1);
        self.grid
            .update(PositionChange::point(self.hero.pos, Cell::Empty));
        if self.rules.variant == Variant::TrailEnclosure {
            self.revert_trail();
            self.hero.drawing_trail = false;
        }
        self.hero.pos = HERO_SPAWN;
        self.hero.direction = None;
        self.statuses.push(StatusChange::Lives {
            kind: EntityKind::Hero,
            value: self.hero.lives,
        });
        if !self.hero.is_alive() {
            return Err(GameEnd::Loss);
        }
        self.grid
            .update(PositionChange::point(HERO_SPAWN, EntityKind::Hero.marker()));
        Ok(())
    }

    fn revert_trail(&mut self) {
        for point in self.grid.points() {
            if self.grid.get(point) == Some(Cell::Trail) {
                self.grid.update(PositionChange::point(point, Cell::Empty));
            }
        }
    }

    fn all_enemies_trapped(&self) -> bool {
        self.enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .all(|enemy| {
                Direction::ALL.iter().all(|direction| {
                    matches!(
                        self.grid.get(enemy.pos.offset(*direction)),
                        None | Some(Cell::Border) | Some(Cell::Marked)
                    )
                })
            })
    }

    /// Picks a fresh, empty coordinate for an enemy.
    ///
    /// Probes honor the minimum hero distance first, then drop the distance
    /// rule, then fall back to a deterministic sweep so the routine is
    /// bounded on crowded grids.
    fn random_enemy_position(&mut self) -> Option<GridPoint> {
        let rows = self.grid.rows();
        let columns = self.grid.columns();
        if rows <= 2 || columns <= 2 {
            return None;
        }

        for attempt in 0..PLACEMENT_PROBE_CAP * 2 {
            let candidate = GridPoint::new(
                self.rng.gen_range(1..rows),
                self.rng.gen_range(1..columns),
            );
            if self.grid.get(candidate) != Some(Cell::Empty) {
                continue;
            }
            let distant =
                candidate.manhattan_distance(self.hero.pos) >= MIN_ENEMY_SPAWN_DISTANCE;
            if distant || attempt >= PLACEMENT_PROBE_CAP {
                return Some(candidate);
            }
        }

        let hero_pos = self.hero.pos;
        self.grid
            .points()
            .find(|point| self.grid.get(*point) == Some(Cell::Empty) && *point != hero_pos)
    }

    fn enemy_at(&self, point: GridPoint) -> Option<usize> {
        self.enemies
            .iter()
            .position(|enemy| enemy.is_alive() && enemy.pos == point)
    }

    fn bullet_at(&self, point: GridPoint, skip: usize) -> Option<usize> {
        self.bullets.iter().enumerate().find_map(|(index, bullet)| {
            (index != skip && bullet.direction.is_some() && bullet.pos == point).then_some(index)
        })
    }

    fn stop_bullet(&mut self, index: usize) {
        let pos = self.bullets[index].pos;
        self.bullets[index].direction = None;
        self.grid.update(PositionChange::point(pos, Cell::Empty));
    }
}

/// Applies one engine operation to the world.
///
/// This is the single mutual-exclusion boundary: callers serialize every
/// operation through the exclusive borrow. On return, `out` holds every
/// change the operation applied in emission order, even when the operation
/// raised a [`GameEnd`] partway through.
pub fn apply(world: &mut World, command: Command, out: &mut ChangeBatch) -> Result<(), GameEnd> {
    let result = match command {
        Command::Initialize { map } => {
            world.initialize(map);
            Ok(())
        }
        Command::MoveHero { direction } => world.move_hero(direction),
        Command::AdvanceEnemies => world.advance_enemies(),
        Command::Fire { hero_trigger } => world.fire(hero_trigger),
    };
    out.positions.extend(world.grid.drain());
    out.statuses.append(&mut world.statuses);
    result
}

/// Picks a new direction that always differs from the prior one.
///
/// Bounded rejection sampling; when the cap runs out the next cardinal after
/// the prior direction is taken so the result still differs.
fn redirect(rng: &mut ChaCha8Rng, prior: Option<Direction>) -> Direction {
    for _ in 0..DIRECTION_RESAMPLE_CAP {
        let candidate = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
        if Some(candidate) != prior {
            return candidate;
        }
    }
    match prior {
        Some(Direction::Up) => Direction::Right,
        Some(Direction::Right) => Direction::Down,
        Some(Direction::Down) => Direction::Left,
        Some(Direction::Left) | None => Direction::Up,
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use grid_skirmish_core::{Cell, Direction, GridPoint, Owner};

    use super::World;

    /// Captures a read-only snapshot of the hero.
    #[must_use]
    pub fn hero_view(world: &World) -> HeroSnapshot {
        HeroSnapshot {
            pos: world.hero.pos,
            direction: world.hero.direction,
            lives: world.hero.lives,
            points: world.hero.points,
            drawing_trail: world.hero.drawing_trail,
        }
    }

    /// Captures read-only snapshots of every enemy, dead or alive.
    #[must_use]
    pub fn enemy_view(world: &World) -> Vec<EnemySnapshot> {
        world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                pos: enemy.pos,
                direction: enemy.direction,
                lives: enemy.lives,
                steps_left: enemy.steps_left,
            })
            .collect()
    }

    /// Captures read-only snapshots of the active bullet set.
    #[must_use]
    pub fn bullet_view(world: &World) -> Vec<BulletSnapshot> {
        world
            .bullets
            .iter()
            .map(|bullet| BulletSnapshot {
                pos: bullet.pos,
                direction: bullet.direction,
                owner: bullet.owner,
            })
            .collect()
    }

    /// Exposes a read-only view of the cell grid.
    #[must_use]
    pub fn grid_view(world: &World) -> GridView<'_> {
        GridView { world }
    }

    /// Immutable representation of the hero's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct HeroSnapshot {
        /// Grid point currently occupied by the hero.
        pub pos: GridPoint,
        /// Last facing direction, `None` before the first move.
        pub direction: Option<Direction>,
        /// Remaining lives.
        pub lives: u32,
        /// Accumulated score.
        pub points: u32,
        /// Whether the hero is mid-trail.
        pub drawing_trail: bool,
    }

    /// Immutable representation of a single enemy's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct EnemySnapshot {
        /// Grid point currently occupied by the enemy.
        pub pos: GridPoint,
        /// Current heading, `None` before the first redirect.
        pub direction: Option<Direction>,
        /// Remaining lives; zero means permanently removed from play.
        pub lives: u32,
        /// Steps remaining before the next forced redirect.
        pub steps_left: u32,
    }

    /// Immutable representation of a single bullet's state used for queries.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct BulletSnapshot {
        /// Grid point currently occupied by the bullet.
        pub pos: GridPoint,
        /// Motion direction, `None` once spent.
        pub direction: Option<Direction>,
        /// Side that fired the bullet.
        pub owner: Owner,
    }

    /// Read-only view into the cell grid.
    #[derive(Clone, Copy, Debug)]
    pub struct GridView<'a> {
        world: &'a World,
    }

    impl GridView<'_> {
        /// Returns the cell state, or `None` out of bounds.
        #[must_use]
        pub fn get(&self, point: GridPoint) -> Option<Cell> {
            self.world.grid.get(point)
        }

        /// Grid dimensions as `(rows, columns)`.
        #[must_use]
        pub fn dimensions(&self) -> (i32, i32) {
            (self.world.grid.rows(), self.world.grid.columns())
        }

        /// Counts the cells currently holding the provided state.
        #[must_use]
        pub fn count(&self, cell: Cell) -> usize {
            self.world
                .grid
                .points()
                .filter(|point| self.world.grid.get(*point) == Some(cell))
                .count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bordered_map(rows: usize, columns: usize) -> Vec<Vec<Cell>> {
        (0..rows)
            .map(|row| {
                (0..columns)
                    .map(|col| {
                        if row == 0 || row == rows - 1 || col == 0 || col == columns - 1 {
                            Cell::Border
                        } else {
                            Cell::Empty
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn initialized_world(config: Config, rows: usize, columns: usize) -> (World, ChangeBatch) {
        let mut world = World::new(config);
        let mut batch = ChangeBatch::new();
        let result = apply(
            &mut world,
            Command::Initialize {
                map: bordered_map(rows, columns),
            },
            &mut batch,
        );
        assert_eq!(result, Ok(()));
        (world, batch)
    }

    #[test]
    fn initialize_places_hero_and_enemies() {
        let config = Config::new(Variant::TankBattle, 7);
        let (world, batch) = initialized_world(config, 20, 30);

        assert_eq!(query::grid_view(&world).get(HERO_SPAWN), Some(Cell::Hero));
        let enemies = query::enemy_view(&world);
        assert_eq!(enemies.len(), 4);
        for enemy in &enemies {
            assert_eq!(query::grid_view(&world).get(enemy.pos), Some(Cell::Enemy));
            assert!(enemy.pos.manhattan_distance(HERO_SPAWN) >= 10);
        }
        assert_eq!(
            batch.statuses,
            vec![
                StatusChange::Points {
                    kind: EntityKind::Hero,
                    value: 0
                },
                StatusChange::Lives {
                    kind: EntityKind::Hero,
                    value: 3
                },
            ]
        );
    }

    #[test]
    fn initialization_is_deterministic_for_same_seed() {
        let config = Config::new(Variant::TankBattle, 42);
        let (first, first_batch) = initialized_world(config, 18, 24);
        let (second, second_batch) = initialized_world(config, 18, 24);

        assert_eq!(query::enemy_view(&first), query::enemy_view(&second));
        assert_eq!(first_batch, second_batch);
    }

    #[test]
    fn redirect_never_repeats_the_prior_direction() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for direction in Direction::ALL {
            for _ in 0..1000 {
                assert_ne!(redirect(&mut rng, Some(direction)), direction);
            }
        }
    }

    #[test]
    fn move_into_missing_direction_is_a_no_op() {
        let config = Config::new(Variant::TankBattle, 3).with_enemy_count(0);
        let (mut world, _) = initialized_world(config, 8, 8);
        let mut batch = ChangeBatch::new();

        let result = apply(&mut world, Command::MoveHero { direction: None }, &mut batch);

        assert_eq!(result, Ok(()));
        assert!(batch.is_empty());
        assert_eq!(query::hero_view(&world).pos, HERO_SPAWN);
    }

    #[test]
    fn uninitialized_world_survives_every_operation() {
        let mut world = World::new(Config::new(Variant::TankBattle, 1));
        let mut batch = ChangeBatch::new();

        assert_eq!(
            apply(
                &mut world,
                Command::MoveHero {
                    direction: Some(Direction::Up)
                },
                &mut batch
            ),
            Ok(())
        );
        assert_eq!(apply(&mut world, Command::AdvanceEnemies, &mut batch), Ok(()));
        assert_eq!(
            apply(&mut world, Command::Fire { hero_trigger: true }, &mut batch),
            Ok(())
        );
    }
}
