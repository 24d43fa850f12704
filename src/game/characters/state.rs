// Timed state machines for characters
//
// Timed sequences are stored as `(phase, entered_at)` and advanced against the
// simulation clock. Cancelling a sequence is just overwriting the phase.

use super::stats::PlayerStats;

/// Stages of the player's death sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathStage {
    /// Physics frozen, death pose held
    Frozen,
    /// Collider off, heavy gravity, falling off screen
    Falling,
}

/// Damage and death phases of the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PlayerPhase {
    /// Controllable and vulnerable
    #[default]
    Normal,
    /// Just hit: stunned and invulnerable
    Hurt,
    /// Stun over, still invulnerable, sprite blinking
    Flickering,
    /// Dead, running the death sequence
    Dying(DeathStage),
    /// Death sequence finished; the entity should leave the simulation
    Removed,
}

impl PlayerPhase {
    pub fn is_invulnerable(&self) -> bool {
        matches!(self, Self::Hurt | Self::Flickering)
    }

    pub fn is_stunned(&self) -> bool {
        matches!(self, Self::Hurt)
    }

    pub fn is_dead(&self) -> bool {
        matches!(self, Self::Dying(_) | Self::Removed)
    }

    /// Check if movement input is applied this step
    pub fn can_move(&self) -> bool {
        !self.is_stunned() && !self.is_dead()
    }

    /// How long the phase lasts before the machine moves on, if it is timed
    fn duration(&self, stats: &PlayerStats) -> Option<f32> {
        match self {
            Self::Hurt => Some(stats.hurt_stun_time),
            Self::Flickering => Some(stats.iframe_duration),
            Self::Dying(DeathStage::Frozen) => Some(stats.death_freeze_time),
            Self::Dying(DeathStage::Falling) => Some(stats.death_fall_time),
            Self::Normal | Self::Removed => None,
        }
    }

    fn next(&self) -> Self {
        match self {
            Self::Hurt => Self::Flickering,
            Self::Flickering => Self::Normal,
            Self::Dying(DeathStage::Frozen) => Self::Dying(DeathStage::Falling),
            Self::Dying(DeathStage::Falling) => Self::Removed,
            Self::Normal | Self::Removed => *self,
        }
    }
}

/// The player's hurt / invulnerability / death machine
#[derive(Debug)]
pub struct PlayerStateMachine {
    phase: PlayerPhase,
    entered_at: f32,
}

impl Default for PlayerStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStateMachine {
    pub fn new() -> Self {
        Self {
            phase: PlayerPhase::Normal,
            entered_at: 0.0,
        }
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn entered_at(&self) -> f32 {
        self.entered_at
    }

    /// Time spent in the current phase
    pub fn elapsed(&self, now: f32) -> f32 {
        (now - self.entered_at).max(0.0)
    }

    /// Enter a phase, replacing whatever sequence was running
    fn enter(&mut self, phase: PlayerPhase, at: f32) {
        self.phase = phase;
        self.entered_at = at;
    }

    /// Start (or restart) the hurt sequence. Ignored once dead.
    pub fn hurt(&mut self, now: f32) -> bool {
        if self.phase.is_dead() {
            return false;
        }
        self.enter(PlayerPhase::Hurt, now);
        true
    }

    /// Start the death sequence, cancelling hurt and flicker. Returns false if already dead.
    pub fn die(&mut self, now: f32) -> bool {
        if self.phase.is_dead() {
            return false;
        }
        self.enter(PlayerPhase::Dying(DeathStage::Frozen), now);
        true
    }

    /// Advance every transition that is due by `now`.
    ///
    /// Returns the phases entered, in order. Each phase is considered entered
    /// exactly when the previous one expired, so long frames do not stretch the
    /// sequence.
    pub fn update(&mut self, now: f32, stats: &PlayerStats) -> Vec<PlayerPhase> {
        let mut entered = Vec::new();

        while let Some(duration) = self.phase.duration(stats) {
            let expires_at = self.entered_at + duration;
            if now < expires_at {
                break;
            }
            let next = self.phase.next();
            self.enter(next, expires_at);
            entered.push(next);
        }

        entered
    }

    /// Sprite visibility while flickering: the first toggle hides the sprite,
    /// then it alternates every `flash_interval`. Visible in every other phase.
    pub fn flicker_visible(&self, now: f32, stats: &PlayerStats) -> bool {
        if self.phase != PlayerPhase::Flickering {
            return true;
        }
        let toggles = (self.elapsed(now) / stats.flash_interval).floor() as u64 + 1;
        toggles % 2 == 0
    }
}

/// Which way a ground enemy is walking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatrolDirection {
    MovingLeft,
    MovingRight,
}

impl PatrolDirection {
    pub fn sign(self) -> f32 {
        match self {
            Self::MovingLeft => -1.0,
            Self::MovingRight => 1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Self::MovingLeft => Self::MovingRight,
            Self::MovingRight => Self::MovingLeft,
        }
    }
}

/// Which of the two waypoints a flying enemy is heading to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Waypoint {
    A,
    B,
}

impl Waypoint {
    pub fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> PlayerStats {
        PlayerStats::default()
    }

    #[test]
    fn test_initial_phase() {
        let sm = PlayerStateMachine::new();
        assert_eq!(sm.phase(), PlayerPhase::Normal);
        assert!(sm.phase().can_move());
        assert!(!sm.phase().is_invulnerable());
    }

    #[test]
    fn test_phase_helpers() {
        assert!(PlayerPhase::Hurt.is_stunned());
        assert!(PlayerPhase::Hurt.is_invulnerable());
        assert!(!PlayerPhase::Flickering.is_stunned());
        assert!(PlayerPhase::Flickering.is_invulnerable());
        assert!(PlayerPhase::Flickering.can_move());
        assert!(PlayerPhase::Dying(DeathStage::Frozen).is_dead());
        assert!(PlayerPhase::Removed.is_dead());
        assert!(!PlayerPhase::Dying(DeathStage::Falling).can_move());
    }

    #[test]
    fn test_hurt_then_flicker_then_normal() {
        let s = stats();
        let mut sm = PlayerStateMachine::new();
        sm.hurt(1.0);

        assert!(sm.update(1.2, &s).is_empty());
        assert_eq!(sm.phase(), PlayerPhase::Hurt);

        assert_eq!(sm.update(1.31, &s), vec![PlayerPhase::Flickering]);
        assert!((sm.entered_at() - 1.3).abs() < 1e-5);

        assert!(sm.update(2.7, &s).is_empty());
        assert_eq!(sm.phase(), PlayerPhase::Flickering);

        assert_eq!(sm.update(2.81, &s), vec![PlayerPhase::Normal]);
        assert_eq!(sm.phase(), PlayerPhase::Normal);
    }

    #[test]
    fn test_long_frame_runs_every_due_transition() {
        let s = stats();
        let mut sm = PlayerStateMachine::new();
        sm.hurt(0.0);
        assert_eq!(
            sm.update(5.0, &s),
            vec![PlayerPhase::Flickering, PlayerPhase::Normal]
        );
    }

    #[test]
    fn test_death_cancels_hurt() {
        let s = stats();
        let mut sm = PlayerStateMachine::new();
        sm.hurt(0.0);
        assert!(sm.die(0.1));
        assert_eq!(sm.phase(), PlayerPhase::Dying(DeathStage::Frozen));
        assert!(!sm.phase().is_invulnerable());

        // The old stun deadline no longer applies
        assert!(sm.update(0.35, &s).is_empty());
    }

    #[test]
    fn test_death_stages() {
        let s = stats();
        let mut sm = PlayerStateMachine::new();
        sm.die(2.0);
        assert!(!sm.die(2.1));
        assert!(!sm.hurt(2.1));

        assert_eq!(
            sm.update(2.55, &s),
            vec![PlayerPhase::Dying(DeathStage::Falling)]
        );
        assert!(sm.update(5.4, &s).is_empty());
        assert_eq!(sm.update(5.51, &s), vec![PlayerPhase::Removed]);
        assert!(sm.update(100.0, &s).is_empty());
    }

    #[test]
    fn test_flicker_visibility() {
        let s = stats();
        let mut sm = PlayerStateMachine::new();
        assert!(sm.flicker_visible(0.0, &s));

        sm.hurt(0.0);
        sm.update(0.3, &s);
        assert_eq!(sm.phase(), PlayerPhase::Flickering);

        assert!(!sm.flicker_visible(0.35, &s));
        assert!(sm.flicker_visible(0.45, &s));
        assert!(!sm.flicker_visible(0.55, &s));
    }

    #[test]
    fn test_patrol_direction() {
        assert_eq!(PatrolDirection::MovingLeft.sign(), -1.0);
        assert_eq!(
            PatrolDirection::MovingLeft.reversed(),
            PatrolDirection::MovingRight
        );
    }

    #[test]
    fn test_waypoint_other() {
        assert_eq!(Waypoint::A.other(), Waypoint::B);
        assert_eq!(Waypoint::B.other(), Waypoint::A);
    }
}
