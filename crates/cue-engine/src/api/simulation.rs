use glam::Vec2;

use crate::api::config::SimConfig;
use crate::api::shot::ShotRequest;
use crate::api::types::{BallEvent, BallId, BallKind, BallSnapshot, EventRecord};
use crate::components::ball::Ball;
use crate::core::table::Table;
use crate::core::time::FixedTimestep;
use crate::systems::pockets::{RespawnFlow, StationaryTracker};

/// Owns a table and drives it from variable frame times.
///
/// Per frame: `advance(frame_dt)` runs the accumulated fixed steps, then the
/// presentation layer reads `snapshots()` / `events()` until the next call.
pub struct Simulation {
    config: SimConfig,
    table: Table,
    timestep: FixedTimestep,
    cue: BallId,
    tracker: StationaryTracker,
    respawn: RespawnFlow,
    next_id: u32,
    /// Events produced during the current frame.
    events: Vec<BallEvent>,
    event_records: Vec<EventRecord>,
    snapshots: Vec<BallSnapshot>,
}

impl Simulation {
    /// Build a rectangular table with the cue ball at `table.cue_start`.
    /// The config is sanitized first.
    pub fn new(config: SimConfig) -> Self {
        let config = config.sanitized();
        let mut table = Table::rectangular(&config.table, config.collision);
        let cue = BallId(0);
        table.spawn(Ball::new(cue, BallKind::Cue, config.table.cue_start, config.ball));

        let mut sim = Self {
            table,
            timestep: FixedTimestep::new(config.fixed_dt).with_max_steps(config.max_steps_per_frame),
            cue,
            tracker: StationaryTracker::new(config.table.cue_start),
            respawn: RespawnFlow::new(&config.rules, config.fixed_dt),
            next_id: 1,
            events: Vec::with_capacity(32),
            event_records: Vec::with_capacity(32),
            snapshots: Vec::with_capacity(16),
            config,
        };
        sim.refresh_buffers();
        log::info!(
            "simulation: {}x{} table, dt={}, {} lives",
            sim.config.table.width,
            sim.config.table.height,
            sim.config.fixed_dt,
            sim.respawn.lives()
        );
        sim
    }

    /// Parse a JSON config and build from it.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self::new(SimConfig::from_json(json)?))
    }

    /// Start over with the same config.
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Place an object ball. Returns its ID.
    pub fn spawn_object(&mut self, position: Vec2) -> BallId {
        let id = BallId(self.next_id);
        self.next_id += 1;
        self.table.spawn(Ball::new(id, BallKind::Object, position, self.config.ball));
        self.refresh_buffers();
        id
    }

    /// Shoot a ball. Rejected (returns false) while the ball is moving,
    /// off the table, or after game over.
    pub fn shoot(&mut self, id: BallId, shot: &ShotRequest) -> bool {
        if self.respawn.is_game_over() {
            return false;
        }
        let Some(ball) = self.table.get_mut(id) else {
            log::warn!("simulation: shot for unknown ball {}", id.0);
            return false;
        };
        if !ball.is_active() || ball.is_moving() {
            log::debug!("simulation: shot for ball {} rejected (busy)", id.0);
            return false;
        }
        ball.apply_shot(shot);
        self.refresh_buffers();
        true
    }

    /// Shoot the cue ball.
    pub fn shoot_cue(&mut self, shot: &ShotRequest) -> bool {
        self.shoot(self.cue, shot)
    }

    /// Store a spin selection on a ball for its next spin-preserving shot.
    pub fn set_spin(&mut self, id: BallId, spin: Vec2) -> bool {
        match self.table.get_mut(id) {
            Some(ball) => {
                ball.set_spin(spin);
                true
            }
            None => false,
        }
    }

    /// Feed one frame of wall-clock time. Returns the number of fixed steps run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.events.clear();
        let steps = self.timestep.accumulate(frame_dt);
        for _ in 0..steps {
            self.step_once();
        }
        self.refresh_buffers();
        steps
    }

    /// Run exactly one fixed step, appending to this frame's events.
    pub fn step_once(&mut self) {
        let dt = self.timestep.dt();
        let first_new = self.events.len();
        self.table.step(dt, &mut self.events);

        if self.respawn.tick() {
            let at = self.tracker.last_stationary();
            if self.table.respawn(self.cue, at) {
                self.events.push(BallEvent::Respawned { id: self.cue, position: at });
            }
        }

        let cue = self.cue;
        let cue_pocketed = self.events[first_new..]
            .iter()
            .any(|e| matches!(e, BallEvent::Pocketed { id, .. } if *id == cue));
        if cue_pocketed {
            self.respawn.on_cue_pocketed(&mut self.events);
        }

        if let Some(ball) = self.table.get_mut(cue) {
            self.tracker.observe(ball);
        }
    }

    // -- Accessors --

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut Table {
        &mut self.table
    }

    pub fn cue_id(&self) -> BallId {
        self.cue
    }

    pub fn ball(&self, id: BallId) -> Option<&Ball> {
        self.table.get(id)
    }

    pub fn lives(&self) -> u32 {
        self.respawn.lives()
    }

    pub fn is_game_over(&self) -> bool {
        self.respawn.is_game_over()
    }

    /// Whether any ball is still rolling (shots are usually gated on this).
    pub fn any_moving(&self) -> bool {
        self.table.any_moving()
    }

    /// Where the cue ball will respawn if pocketed now.
    pub fn last_stationary(&self) -> Vec2 {
        self.tracker.last_stationary()
    }

    /// Render interpolation alpha between fixed steps.
    pub fn alpha(&self) -> f32 {
        self.timestep.alpha()
    }

    pub fn events(&self) -> &[BallEvent] {
        &self.events
    }

    pub fn snapshots(&self) -> &[BallSnapshot] {
        &self.snapshots
    }

    pub fn event_records(&self) -> &[EventRecord] {
        &self.event_records
    }

    fn refresh_buffers(&mut self) {
        self.snapshots.clear();
        self.snapshots.extend(self.table.iter().map(|b| BallSnapshot {
            id: b.id.0 as f32,
            x: b.position().x,
            y: b.position().y,
            vx: b.velocity().x,
            vy: b.velocity().y,
            spin_x: b.spin().x,
            spin_y: b.spin().y,
            moving: if b.is_moving_now() { 1.0 } else { 0.0 },
            active: if b.is_active() { 1.0 } else { 0.0 },
        }));
        self.event_records.clear();
        self.event_records.extend(self.events.iter().map(BallEvent::to_record));
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::RulesConfig;

    fn run_until_settled(sim: &mut Simulation) -> Vec<BallEvent> {
        let mut all = Vec::new();
        let mut frames = 0;
        loop {
            sim.advance(1.0 / 60.0);
            all.extend_from_slice(sim.events());
            frames += 1;
            assert!(frames < 10_000, "never settled");
            if !sim.any_moving() && !sim.respawn.is_respawn_pending() {
                return all;
            }
        }
    }

    #[test]
    fn cue_spawns_at_start() {
        let sim = Simulation::default();
        let cue = sim.ball(sim.cue_id()).expect("cue");
        assert_eq!(cue.position(), Vec2::new(4.0, 4.0));
        assert_eq!(sim.snapshots().len(), 1);
        assert_eq!(sim.lives(), 3);
    }

    #[test]
    fn advance_runs_fixed_steps() {
        let mut sim = Simulation::default();
        assert_eq!(sim.advance(0.01), 0);
        assert_eq!(sim.advance(0.01), 1);
        assert_eq!(sim.advance(10.0), 10);
    }

    #[test]
    fn shot_rejected_while_moving() {
        let mut sim = Simulation::default();
        assert!(sim.shoot_cue(&ShotRequest::new(Vec2::X, 5.0)));
        sim.advance(0.02);
        assert!(!sim.shoot_cue(&ShotRequest::new(Vec2::Y, 5.0)));
        assert!(!sim.shoot(BallId(42), &ShotRequest::new(Vec2::Y, 5.0)));
    }

    #[test]
    fn shot_settles_with_single_stop_event() {
        let mut sim = Simulation::default();
        sim.shoot_cue(&ShotRequest::new(Vec2::new(1.0, 0.2), 6.0));
        let events = run_until_settled(&mut sim);
        let stops = events
            .iter()
            .filter(|e| matches!(e, BallEvent::Stopped { .. }))
            .count();
        assert_eq!(stops, 1, "events: {:?}", events);
        assert_eq!(sim.last_stationary(), sim.ball(sim.cue_id()).expect("cue").position());
    }

    #[test]
    fn set_spin_carries_into_next_shot() {
        let mut sim = Simulation::default();
        assert!(sim.set_spin(sim.cue_id(), Vec2::new(0.5, 0.0)));
        sim.shoot_cue(&ShotRequest::new(Vec2::X, 5.0));
        assert_eq!(sim.ball(sim.cue_id()).expect("cue").spin(), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn cue_pocketed_costs_a_life_and_respawns() {
        let mut sim = Simulation::default();
        // Roll straight into the bottom-middle pocket from rest at (8, 1).
        sim.table_mut().respawn(BallId(0), Vec2::new(8.0, 1.0));
        sim.step_once();
        assert_eq!(sim.last_stationary(), Vec2::new(8.0, 1.0));

        assert!(sim.shoot_cue(&ShotRequest::straight(Vec2::NEG_Y, 8.0)));
        let events = run_until_settled(&mut sim);

        assert!(events.iter().any(|e| matches!(e, BallEvent::Pocketed { id: BallId(0), .. })));
        assert!(events.contains(&BallEvent::LivesChanged { lives: 2 }));
        assert!(events.contains(&BallEvent::Respawned { id: BallId(0), position: Vec2::new(8.0, 1.0) }));
        let cue = sim.ball(sim.cue_id()).expect("cue");
        assert!(cue.is_active());
        assert_eq!(cue.position(), Vec2::new(8.0, 1.0));
        assert_eq!(sim.lives(), 2);
    }

    #[test]
    fn game_over_blocks_shots() {
        let config = SimConfig {
            rules: RulesConfig { lives: 1, ..RulesConfig::default() },
            ..SimConfig::default()
        };
        let mut sim = Simulation::new(config);
        sim.table_mut().respawn(BallId(0), Vec2::new(8.0, 1.0));
        sim.shoot_cue(&ShotRequest::straight(Vec2::NEG_Y, 8.0));
        let events = run_until_settled(&mut sim);

        assert!(events.contains(&BallEvent::GameOver));
        assert!(sim.is_game_over());
        assert!(!sim.shoot_cue(&ShotRequest::new(Vec2::X, 1.0)));

        sim.reset();
        assert_eq!(sim.lives(), 1);
        assert!(!sim.is_game_over());
    }

    #[test]
    fn snapshots_never_show_stopped_ball_with_velocity() {
        let mut sim = Simulation::default();
        let id = sim.spawn_object(Vec2::new(10.0, 7.748));
        sim.table_mut().get_mut(id).expect("ball").set_velocity(Vec2::new(0.0, 0.13));
        sim.advance(0.02);

        assert!(sim.events().iter().any(|e| matches!(e, BallEvent::CushionHit { .. })));
        assert!(!sim.any_moving());
        for s in sim.snapshots() {
            if s.moving == 0.0 {
                assert_eq!((s.vx, s.vy), (0.0, 0.0), "ball {} stopped with velocity", s.id);
            }
        }
    }

    #[test]
    fn object_ball_hit_and_events_flattened() {
        let mut sim = Simulation::default();
        let target = sim.spawn_object(Vec2::new(6.0, 4.0));
        assert_eq!(target, BallId(1));
        sim.shoot_cue(&ShotRequest::straight(Vec2::X, 10.0));

        let mut saw_hit = false;
        for _ in 0..120 {
            sim.advance(0.02);
            assert_eq!(sim.event_records().len(), sim.events().len());
            if sim.events().contains(&BallEvent::BallHit { striker: BallId(0), struck: target }) {
                saw_hit = true;
                let rec = sim
                    .event_records()
                    .iter()
                    .find(|r| r.kind == 3.0)
                    .expect("flattened hit");
                assert_eq!((rec.a, rec.b), (0.0, 1.0));
            }
        }
        assert!(saw_hit);
        assert_eq!(sim.snapshots().len(), sim.table().len());
    }

    #[test]
    fn from_json_partial_config() {
        let sim = Simulation::from_json(r#"{ "rules": { "lives": 5 } }"#).expect("valid json");
        assert_eq!(sim.lives(), 5);
        assert!(Simulation::from_json("{ nope").is_err());
    }
}
