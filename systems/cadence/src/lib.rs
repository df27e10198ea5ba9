#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-entity-kind tick scheduling.
//!
//! Each entity kind advances on its own fixed interval. The driver reports
//! elapsed wall time once per frame; this system accumulates it per timer and
//! emits one [`Command`] per due interval, so entity speed stays independent
//! of frame rate. Emission order within a frame is fixed: hero motion, then
//! enemy motion, then bullet resolution.

use std::time::Duration;

use grid_skirmish_core::{Command, InputState};

/// Interval table controlling how often each entity kind acts.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    hero_interval: Duration,
    enemy_interval: Duration,
    fire_interval: Duration,
}

impl Config {
    /// Creates an interval table.
    #[must_use]
    pub const fn new(
        hero_interval: Duration,
        enemy_interval: Duration,
        fire_interval: Duration,
    ) -> Self {
        Self {
            hero_interval,
            enemy_interval,
            fire_interval,
        }
    }
}

impl Default for Config {
    /// Hero input every 20ms, bullets every 100ms, enemies every 200ms.
    fn default() -> Self {
        Self::new(
            Duration::from_millis(20),
            Duration::from_millis(200),
            Duration::from_millis(100),
        )
    }
}

/// Accumulates frame time and converts it into due engine commands.
#[derive(Clone, Copy, Debug)]
pub struct Cadence {
    config: Config,
    hero_elapsed: Duration,
    enemy_elapsed: Duration,
    fire_elapsed: Duration,
}

impl Cadence {
    /// Creates a cadence with all timers at zero.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self {
            config,
            hero_elapsed: Duration::ZERO,
            enemy_elapsed: Duration::ZERO,
            fire_elapsed: Duration::ZERO,
        }
    }

    /// Accumulates `dt` and appends one command per due interval to `out`.
    ///
    /// The input state is sampled once and reused for every command emitted
    /// this frame. A frame longer than an interval emits multiple commands,
    /// keeping simulated speed constant under a slow renderer.
    pub fn handle(&mut self, dt: Duration, input: InputState, out: &mut Vec<Command>) {
        self.hero_elapsed += dt;
        self.enemy_elapsed += dt;
        self.fire_elapsed += dt;

        while self.hero_elapsed >= self.config.hero_interval {
            self.hero_elapsed -= self.config.hero_interval;
            out.push(Command::MoveHero {
                direction: input.direction,
            });
        }
        while self.enemy_elapsed >= self.config.enemy_interval {
            self.enemy_elapsed -= self.config.enemy_interval;
            out.push(Command::AdvanceEnemies);
        }
        while self.fire_elapsed >= self.config.fire_interval {
            self.fire_elapsed -= self.config.fire_interval;
            out.push(Command::Fire {
                hero_trigger: input.fire,
            });
        }
    }
}
