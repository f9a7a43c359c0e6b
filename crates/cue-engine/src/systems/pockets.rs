// systems/pockets.rs
//
// Pocket regions, last-stationary-position tracking and the lives/respawn flow.
//
// Usage (once per fixed step, after Table::step):
//   if respawn.tick() { table.respawn(cue, tracker.last_stationary()); }
//   tracker.observe(cue_ball);

use glam::Vec2;

use crate::api::config::RulesConfig;
use crate::api::types::BallEvent;
use crate::components::ball::Ball;

/// A circular pocket. A ball whose center enters it is pocketed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pocket {
    pub center: Vec2,
    pub radius: f32,
}

impl Pocket {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius: radius.max(0.0) }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.distance_squared(self.center) <= self.radius * self.radius
    }
}

/// Remembers where the tracked ball last came to rest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationaryTracker {
    last: Vec2,
}

impl StationaryTracker {
    /// Seed with the spawn position so a pocketing before the first stop
    /// still has somewhere to respawn.
    pub fn new(seed: Vec2) -> Self {
        Self { last: seed }
    }

    /// Sample the ball. Records its position whenever it is at rest.
    /// Returns true if the position was recorded.
    pub fn observe(&mut self, ball: &mut Ball) -> bool {
        if !ball.is_active() || ball.is_moving() {
            return false;
        }
        self.last = ball.position();
        true
    }

    pub fn last_stationary(&self) -> Vec2 {
        self.last
    }
}

/// Life counter plus a tick-counted respawn timer for the cue ball.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RespawnFlow {
    lives: u32,
    delay_ticks: u32,
    remaining: Option<u32>,
    game_over: bool,
}

impl RespawnFlow {
    /// `fixed_dt` converts the configured delay into the nearest whole tick count.
    pub fn new(rules: &RulesConfig, fixed_dt: f32) -> Self {
        let delay_ticks = if fixed_dt > 0.0 {
            (rules.respawn_delay / fixed_dt).round().max(0.0) as u32
        } else {
            0
        };
        Self {
            lives: rules.lives,
            delay_ticks,
            remaining: None,
            game_over: rules.lives == 0,
        }
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn is_respawn_pending(&self) -> bool {
        self.remaining.is_some()
    }

    /// The cue ball dropped. Costs a life; schedules a respawn or ends the game.
    pub fn on_cue_pocketed(&mut self, events: &mut Vec<BallEvent>) {
        if self.game_over {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        events.push(BallEvent::LivesChanged { lives: self.lives });

        if self.lives > 0 {
            self.remaining = Some(self.delay_ticks);
            log::info!("cue pocketed, {} lives left, respawn in {} ticks", self.lives, self.delay_ticks);
        } else {
            self.remaining = None;
            self.game_over = true;
            events.push(BallEvent::GameOver);
            log::info!("cue pocketed, game over");
        }
    }

    /// Advance the respawn timer one tick. True on the tick the respawn is due.
    pub fn tick(&mut self) -> bool {
        match self.remaining {
            Some(n) => {
                let n = n.saturating_sub(1);
                if n == 0 {
                    self.remaining = None;
                    true
                } else {
                    self.remaining = Some(n);
                    false
                }
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::BallConfig;
    use crate::api::types::{BallId, BallKind};

    #[test]
    fn pocket_contains_edge() {
        let p = Pocket::new(Vec2::new(1.0, 1.0), 0.5);
        assert!(p.contains(Vec2::new(1.5, 1.0)));
        assert!(!p.contains(Vec2::new(1.51, 1.0)));
    }

    #[test]
    fn tracker_records_only_at_rest() {
        let mut ball = Ball::new(BallId(0), BallKind::Cue, Vec2::new(2.0, 2.0), BallConfig::default());
        let mut tracker = StationaryTracker::new(Vec2::new(4.0, 4.0));

        assert!(tracker.observe(&mut ball));
        assert_eq!(tracker.last_stationary(), Vec2::new(2.0, 2.0));

        ball.apply_force(Vec2::new(5.0, 0.0));
        ball.tick(0.02);
        assert!(!tracker.observe(&mut ball));
        assert_eq!(tracker.last_stationary(), Vec2::new(2.0, 2.0));
    }

    #[test]
    fn respawn_after_delay() {
        let rules = RulesConfig::default();
        let mut flow = RespawnFlow::new(&rules, 0.02);
        let mut events = Vec::new();

        flow.on_cue_pocketed(&mut events);
        assert_eq!(flow.lives(), 2);
        assert_eq!(events, vec![BallEvent::LivesChanged { lives: 2 }]);
        assert!(flow.is_respawn_pending());

        // 0.5 s at 50 Hz
        let mut ticks = 1;
        while !flow.tick() {
            ticks += 1;
            assert!(ticks < 100, "respawn never fired");
        }
        assert_eq!(ticks, 25);
        assert!(!flow.is_respawn_pending());
        assert!(!flow.tick());
    }

    #[test]
    fn last_life_ends_the_game() {
        let rules = RulesConfig { lives: 1, ..RulesConfig::default() };
        let mut flow = RespawnFlow::new(&rules, 0.02);
        let mut events = Vec::new();

        flow.on_cue_pocketed(&mut events);
        assert!(flow.is_game_over());
        assert!(!flow.is_respawn_pending());
        assert_eq!(events, vec![BallEvent::LivesChanged { lives: 0 }, BallEvent::GameOver]);

        // Nothing further once the game is over
        flow.on_cue_pocketed(&mut events);
        assert_eq!(events.len(), 2);
    }

    #[test]
    fn zero_delay_respawns_next_tick() {
        let rules = RulesConfig { lives: 3, respawn_delay: 0.0 };
        let mut flow = RespawnFlow::new(&rules, 0.02);
        flow.on_cue_pocketed(&mut Vec::new());
        assert!(flow.tick());
    }
}
