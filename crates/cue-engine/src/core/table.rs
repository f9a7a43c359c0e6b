use glam::Vec2;

use crate::api::config::{CollisionConfig, TableConfig};
use crate::api::types::{BallEvent, BallId, BallKind};
use crate::components::ball::Ball;
use crate::systems::collision::CollisionResolver;
use crate::systems::pockets::Pocket;

/// A straight cushion: the half-plane boundary through `point`,
/// with `normal` pointing into the playing area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cushion {
    pub point: Vec2,
    pub normal: Vec2,
}

impl Cushion {
    pub fn new(point: Vec2, normal: Vec2) -> Self {
        Self { point, normal: normal.normalize_or_zero() }
    }

    /// Signed distance from the cushion line (positive on the playing side).
    pub fn distance(&self, p: Vec2) -> f32 {
        (p - self.point).dot(self.normal)
    }
}

/// One contact found after integration, resolved exactly once.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Contact {
    Cushion { ball: usize, normal: Vec2 },
    Pair { striker: usize, struck: usize, normal: Vec2 },
}

/// Ball storage plus the static geometry the balls play against.
/// Balls live in a flat Vec; tables hold a handful, not thousands.
pub struct Table {
    balls: Vec<Ball>,
    cushions: Vec<Cushion>,
    pockets: Vec<Pocket>,
    resolver: CollisionResolver,
}

impl Table {
    /// An empty table with no cushions or pockets.
    pub fn new(resolver: CollisionResolver) -> Self {
        Self {
            balls: Vec::with_capacity(16),
            cushions: Vec::new(),
            pockets: Vec::new(),
            resolver,
        }
    }

    /// A `width × height` table with its origin at the bottom-left corner,
    /// four cushions and six pockets (corners and side middles).
    pub fn rectangular(table: &TableConfig, collision: CollisionConfig) -> Self {
        let (w, h, r) = (table.width, table.height, table.pocket_radius);
        let mut t = Self::new(CollisionResolver::new(collision))
            .with_cushion(Cushion::new(Vec2::ZERO, Vec2::X))
            .with_cushion(Cushion::new(Vec2::new(w, 0.0), Vec2::NEG_X))
            .with_cushion(Cushion::new(Vec2::ZERO, Vec2::Y))
            .with_cushion(Cushion::new(Vec2::new(0.0, h), Vec2::NEG_Y));
        for center in [
            Vec2::new(0.0, 0.0),
            Vec2::new(w * 0.5, 0.0),
            Vec2::new(w, 0.0),
            Vec2::new(0.0, h),
            Vec2::new(w * 0.5, h),
            Vec2::new(w, h),
        ] {
            t.pockets.push(Pocket::new(center, r));
        }
        t
    }

    // -- Builder pattern --

    pub fn with_cushion(mut self, cushion: Cushion) -> Self {
        self.cushions.push(cushion);
        self
    }

    pub fn with_pocket(mut self, pocket: Pocket) -> Self {
        self.pockets.push(pocket);
        self
    }

    // -- Storage --

    /// Add a ball to the table.
    pub fn spawn(&mut self, ball: Ball) {
        log::debug!("table: spawn ball {} ({:?}) at {:?}", ball.id.0, ball.kind, ball.position());
        self.balls.push(ball);
    }

    /// Remove a ball by ID. Returns the removed ball if found.
    pub fn remove(&mut self, id: BallId) -> Option<Ball> {
        let idx = self.balls.iter().position(|b| b.id == id)?;
        Some(self.balls.remove(idx))
    }

    pub fn get(&self, id: BallId) -> Option<&Ball> {
        self.balls.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BallId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|b| b.id == id)
    }

    /// First ball of the given kind.
    pub fn find_kind(&self, kind: BallKind) -> Option<&Ball> {
        self.balls.iter().find(|b| b.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ball> {
        self.balls.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Ball> {
        self.balls.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.balls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balls.is_empty()
    }

    pub fn cushions(&self) -> &[Cushion] {
        &self.cushions
    }

    pub fn pockets(&self) -> &[Pocket] {
        &self.pockets
    }

    pub fn resolver(&self) -> &CollisionResolver {
        &self.resolver
    }

    /// Whether any active ball is above the stop threshold.
    pub fn any_moving(&self) -> bool {
        self.balls.iter().any(|b| b.is_active() && b.is_moving_now())
    }

    /// Put a ball back on the table at rest at `position` and reactivate it.
    /// Returns false if no such ball exists.
    pub fn respawn(&mut self, id: BallId, position: Vec2) -> bool {
        let Some(ball) = self.get_mut(id) else {
            return false;
        };
        ball.reset_to_position(position);
        ball.set_active(true);
        log::info!("table: ball {} respawned at {:?}", id.0, position);
        true
    }

    // -- Simulation --

    /// Advance every ball one fixed step.
    ///
    /// Order: integrate all balls, detect contacts (separating overlaps),
    /// resolve each contact once, then check pockets. Contacts are never
    /// resolved in the middle of integration.
    pub fn step(&mut self, dt: f32, events: &mut Vec<BallEvent>) {
        for ball in self.balls.iter_mut() {
            if let Some(event) = ball.tick(dt) {
                events.push(event);
            }
        }

        let contacts = self.detect_contacts();
        let mut touched = Vec::with_capacity(contacts.len() * 2);
        for contact in contacts {
            match contact {
                Contact::Cushion { ball, normal } => {
                    let b = &mut self.balls[ball];
                    self.resolver.resolve_wall(b, normal);
                    events.push(BallEvent::CushionHit { id: b.id, normal });
                    touched.push(ball);
                }
                Contact::Pair { striker, struck, normal } => {
                    let (a, b) = pair_mut(&mut self.balls, striker, struck);
                    self.resolver.resolve_ball(a, b, normal);
                    events.push(BallEvent::BallHit { striker: a.id, struck: b.id });
                    touched.push(striker);
                    touched.push(struck);
                }
            }
        }

        // Contacts can leave a ball below the stop threshold; settle it now
        // so nothing reads "stopped" with leftover velocity.
        touched.sort_unstable();
        touched.dedup();
        for i in touched {
            if let Some(event) = self.balls[i].settle_after_contact() {
                events.push(event);
            }
        }

        self.check_pockets(events);
    }

    /// Find every cushion and ball-ball contact, pushing overlapping bodies
    /// apart as they are found. Only approaching contacts are returned.
    fn detect_contacts(&mut self) -> Vec<Contact> {
        let mut contacts = Vec::new();

        for (i, ball) in self.balls.iter_mut().enumerate() {
            if !ball.is_active() {
                continue;
            }
            for cushion in &self.cushions {
                let depth = ball.radius() - cushion.distance(ball.position());
                if depth <= 0.0 {
                    continue;
                }
                ball.set_position(ball.position() + cushion.normal * depth);
                if ball.velocity().dot(cushion.normal) < 0.0 {
                    contacts.push(Contact::Cushion { ball: i, normal: cushion.normal });
                }
            }
        }

        let n = self.balls.len();
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = pair_mut(&mut self.balls, i, j);
                if !a.is_active() || !b.is_active() {
                    continue;
                }
                let delta = b.position() - a.position();
                let min_dist = a.radius() + b.radius();
                let dist_sq = delta.length_squared();
                if dist_sq >= min_dist * min_dist {
                    continue;
                }

                let dist = dist_sq.sqrt();
                // a -> b
                let axis = if dist > 1e-6 { delta / dist } else { Vec2::X };
                let half_overlap = (min_dist - dist) * 0.5;
                a.set_position(a.position() - axis * half_overlap);
                b.set_position(b.position() + axis * half_overlap);

                let a_closing = a.velocity().dot(axis);
                let b_closing = -b.velocity().dot(axis);
                if a_closing + b_closing <= 0.0 {
                    continue;
                }

                let a_strikes = a_closing > b_closing || (a_closing == b_closing && a.id < b.id);
                contacts.push(if a_strikes {
                    Contact::Pair { striker: i, struck: j, normal: -axis }
                } else {
                    Contact::Pair { striker: j, struck: i, normal: axis }
                });
            }
        }
        contacts
    }

    /// Pocketed object balls leave the table; the cue ball is stopped and
    /// deactivated until respawned.
    fn check_pockets(&mut self, events: &mut Vec<BallEvent>) {
        let mut i = 0;
        while i < self.balls.len() {
            let ball = &mut self.balls[i];
            let pocket = if ball.is_active() {
                self.pockets.iter().position(|p| p.contains(ball.position()))
            } else {
                None
            };
            if let Some(pocket) = pocket {
                let id = ball.id;
                events.push(BallEvent::Pocketed { id, pocket });
                log::debug!("table: ball {} pocketed in {}", id.0, pocket);
                match ball.kind {
                    BallKind::Cue => {
                        let at = ball.position();
                        ball.reset_to_position(at);
                        ball.set_active(false);
                    }
                    BallKind::Object => {
                        self.balls.remove(i);
                        continue;
                    }
                }
            }
            i += 1;
        }
    }
}

/// Two distinct mutable balls out of one slice.
fn pair_mut(balls: &mut [Ball], i: usize, j: usize) -> (&mut Ball, &mut Ball) {
    debug_assert_ne!(i, j);
    if i < j {
        let (lo, hi) = balls.split_at_mut(j);
        (&mut lo[i], &mut hi[0])
    } else {
        let (lo, hi) = balls.split_at_mut(i);
        (&mut hi[0], &mut lo[j])
    }
}
