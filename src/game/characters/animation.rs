// Character animation: parameter sink plus clip playback
//
// Gameplay only writes named parameters and fires triggers. The animator turns
// those into the name of the clip that should be on screen, the way an
// animation controller would, and keeps the fired triggers around for the host
// to read. Frame tables come from the host's sprite sheets through `add_clip`;
// without them the clip name is still tracked but never advances.

use std::collections::HashMap;

/// Parameter and trigger names written by gameplay
pub mod params {
    pub const JUMP: &str = "Jump";
    pub const HURT: &str = "Hurt";
    pub const DEATH: &str = "Death";
    pub const IS_DEAD: &str = "IsDead";
    pub const HORIZONTAL_SPEED: &str = "HorizontalSpeed";
    pub const VERTICAL_VELOCITY: &str = "VerticalVelocity";
    pub const IS_GROUNDED: &str = "IsGrounded";
}

/// A single animation clip
#[derive(Debug, Clone)]
pub struct AnimationClip {
    pub name: &'static str,
    pub frame_count: usize,
    /// Duration of each frame in seconds
    pub frame_duration: f32,
    pub looping: bool,
}

impl AnimationClip {
    pub fn new(name: &'static str, frame_count: usize, fps: f32, looping: bool) -> Self {
        Self {
            name,
            frame_count,
            frame_duration: 1.0 / fps,
            looping,
        }
    }

    pub fn looping(name: &'static str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, true)
    }

    /// A clip that plays once and holds its last frame
    pub fn one_shot(name: &'static str, frame_count: usize, fps: f32) -> Self {
        Self::new(name, frame_count, fps, false)
    }
}

/// Plays one clip at a time
#[derive(Debug, Default)]
pub struct AnimationPlayer {
    clips: HashMap<&'static str, AnimationClip>,
    current: &'static str,
    current_frame: usize,
    frame_timer: f32,
    playing: bool,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.clips.insert(clip.name, clip);
    }

    /// Play a clip; no-op if it is already the current one
    pub fn play(&mut self, name: &'static str) {
        if self.current != name {
            self.play_from_start(name);
        }
    }

    /// Play a clip from its first frame, even if it is already current
    pub fn play_from_start(&mut self, name: &'static str) {
        self.current = name;
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.playing = true;
    }

    pub fn update(&mut self, dt: f32) {
        if !self.playing {
            return;
        }

        let Some(clip) = self.clips.get(self.current) else {
            return;
        };

        self.frame_timer += dt;

        while self.frame_timer >= clip.frame_duration {
            self.frame_timer -= clip.frame_duration;
            self.current_frame += 1;

            if self.current_frame >= clip.frame_count {
                if clip.looping {
                    self.current_frame = 0;
                } else {
                    self.current_frame = clip.frame_count - 1;
                    self.playing = false;
                    break;
                }
            }
        }
    }

    pub fn current_clip(&self) -> &'static str {
        self.current
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    #[cfg(test)]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// A one-shot clip that has not reached its last frame yet
    pub fn is_one_shot_running(&self) -> bool {
        self.playing
            && self
                .clips
                .get(self.current)
                .is_some_and(|clip| !clip.looping)
    }
}

/// Picks the clip to show from the current parameters
pub type ClipSelector = fn(&Animator) -> &'static str;

/// Per-entity animation parameter sink
#[derive(Debug)]
pub struct Animator {
    floats: HashMap<&'static str, f32>,
    bools: HashMap<&'static str, bool>,
    /// Triggers fired since the host last drained them
    fired: Vec<&'static str>,
    /// One-shot clip started by each trigger
    trigger_clips: HashMap<&'static str, &'static str>,
    selector: ClipSelector,
    player: AnimationPlayer,
}

impl Animator {
    pub fn new(selector: ClipSelector) -> Self {
        Self {
            floats: HashMap::new(),
            bools: HashMap::new(),
            fired: Vec::new(),
            trigger_clips: HashMap::new(),
            selector,
            player: AnimationPlayer::new(),
        }
    }

    /// Player state graph: idle, run, jump, fall, hurt and dead
    pub fn for_player() -> Self {
        let mut animator = Self::new(select_player_clip);
        animator.on_trigger(params::HURT, "hurt");
        animator.player.play("idle");
        animator
    }

    /// Enemy state graph: move and death
    pub fn for_enemy() -> Self {
        let mut animator = Self::new(select_enemy_clip);
        animator.on_trigger(params::DEATH, "death");
        animator.player.play("move");
        animator
    }

    pub fn add_clip(&mut self, clip: AnimationClip) {
        self.player.add_clip(clip);
    }

    /// Start `clip` from its first frame whenever `trigger` fires
    pub fn on_trigger(&mut self, trigger: &'static str, clip: &'static str) {
        self.trigger_clips.insert(trigger, clip);
    }

    pub fn set_float(&mut self, name: &'static str, value: f32) {
        self.floats.insert(name, value);
    }

    pub fn set_bool(&mut self, name: &'static str, value: bool) {
        self.bools.insert(name, value);
    }

    pub fn set_trigger(&mut self, name: &'static str) {
        self.fired.push(name);
        if let Some(clip) = self.trigger_clips.get(name) {
            self.player.play_from_start(clip);
        }
    }

    /// Float parameter, zero if never set
    pub fn float(&self, name: &str) -> f32 {
        self.floats.get(name).copied().unwrap_or(0.0)
    }

    /// Bool parameter, false if never set
    pub fn bool(&self, name: &str) -> bool {
        self.bools.get(name).copied().unwrap_or(false)
    }

    /// Was this trigger fired since the last drain?
    pub fn fired(&self, name: &str) -> bool {
        self.fired.iter().any(|t| *t == name)
    }

    /// How many times this trigger fired since the last drain
    #[cfg(test)]
    pub fn fired_count(&self, name: &str) -> usize {
        self.fired.iter().filter(|t| **t == name).count()
    }

    /// Hand the fired triggers to the host
    pub fn drain_triggers(&mut self) -> Vec<&'static str> {
        std::mem::take(&mut self.fired)
    }

    /// Pick the clip for the current parameters and advance playback
    pub fn update(&mut self, dt: f32) {
        if !self.player.is_one_shot_running() {
            let clip = (self.selector)(self);
            self.player.play(clip);
        }
        self.player.update(dt);
    }

    pub fn current_clip(&self) -> &'static str {
        self.player.current_clip()
    }

    pub fn current_frame(&self) -> usize {
        self.player.current_frame()
    }
}

fn select_player_clip(animator: &Animator) -> &'static str {
    if animator.bool(params::IS_DEAD) {
        "dead"
    } else if !animator.bool(params::IS_GROUNDED) {
        if animator.float(params::VERTICAL_VELOCITY) > 0.0 {
            "jump"
        } else {
            "fall"
        }
    } else if animator.float(params::HORIZONTAL_SPEED) > 0.1 {
        "run"
    } else {
        "idle"
    }
}

fn select_enemy_clip(animator: &Animator) -> &'static str {
    if animator.bool(params::IS_DEAD) {
        "death"
    } else {
        "move"
    }
}
