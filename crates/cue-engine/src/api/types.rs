use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Unique identifier for a ball on the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BallId(pub u32);

/// What a ball is for. Decides what happens when it drops into a pocket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallKind {
    /// The player's ball: deactivated and respawned when pocketed.
    Cue,
    /// Any other ball: removed from the table when pocketed.
    Object,
}

/// Something the simulation wants the presentation/rules layer to know about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallEvent {
    /// A ball crossed from moving to stopped on this tick.
    Stopped { id: BallId, position: Vec2 },
    /// A ball bounced off a cushion.
    CushionHit { id: BallId, normal: Vec2 },
    /// `striker` hit `struck`.
    BallHit { striker: BallId, struck: BallId },
    /// A ball dropped into pocket `pocket` (index into the table's pockets).
    Pocketed { id: BallId, pocket: usize },
    /// The cue ball was put back on the table.
    Respawned { id: BallId, position: Vec2 },
    /// Remaining lives after a cue-ball pocketing.
    LivesChanged { lives: u32 },
    /// No lives left.
    GameOver,
}

impl BallEvent {
    /// Stable numeric kind used in the flat event buffer.
    pub fn kind(&self) -> u32 {
        match self {
            BallEvent::Stopped { .. } => 1,
            BallEvent::CushionHit { .. } => 2,
            BallEvent::BallHit { .. } => 3,
            BallEvent::Pocketed { .. } => 4,
            BallEvent::Respawned { .. } => 5,
            BallEvent::LivesChanged { .. } => 6,
            BallEvent::GameOver => 7,
        }
    }

    /// Flatten into a fixed-size record for the JS side.
    pub fn to_record(&self) -> EventRecord {
        let kind = self.kind() as f32;
        match *self {
            BallEvent::Stopped { id, position } => EventRecord::new(kind, id.0 as f32, position.x, position.y),
            BallEvent::CushionHit { id, normal } => EventRecord::new(kind, id.0 as f32, normal.x, normal.y),
            BallEvent::BallHit { striker, struck } => {
                EventRecord::new(kind, striker.0 as f32, struck.0 as f32, 0.0)
            }
            BallEvent::Pocketed { id, pocket } => EventRecord::new(kind, id.0 as f32, pocket as f32, 0.0),
            BallEvent::Respawned { id, position } => {
                EventRecord::new(kind, id.0 as f32, position.x, position.y)
            }
            BallEvent::LivesChanged { lives } => EventRecord::new(kind, lives as f32, 0.0, 0.0),
            BallEvent::GameOver => EventRecord::new(kind, 0.0, 0.0, 0.0),
        }
    }
}

/// A ball event packed as four floats.
/// `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct EventRecord {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EventRecord {
    pub const FLOATS: usize = 4;

    pub fn new(kind: f32, a: f32, b: f32, c: f32) -> Self {
        Self { kind, a, b, c }
    }
}

/// Per-ball telemetry packed for the presentation layer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct BallSnapshot {
    pub id: f32,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub spin_x: f32,
    pub spin_y: f32,
    /// 1.0 while moving, 0.0 at rest.
    pub moving: f32,
    /// 1.0 while on the table, 0.0 while waiting to respawn.
    pub active: f32,
}

impl BallSnapshot {
    pub const FLOATS: usize = 9;
}
