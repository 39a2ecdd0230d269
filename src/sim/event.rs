/// Events emitted during a simulation step.
/// The presentation layer consumes these for sound and status messages.

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    PlayerJumped,
    PlayerLanded,
    BulletFired,
    BulletExpired { count: usize },
    EnemyLanded { idx: usize },
    SnowFlakeRespawned,
}
