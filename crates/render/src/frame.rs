use flashgrid_common::TimerSettings;

/// Boolean switch that ignores requests while its cooldown is running.
///
/// Every accepted request flips the state and restarts the cooldown, so a key
/// held across many frames flips the state once per cooldown period rather
/// than once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DebouncedToggle {
    on: bool,
    cooldown: f32,
    remaining: f32,
}

impl DebouncedToggle {
    pub fn new(on: bool, cooldown: f32) -> Self {
        Self {
            on,
            cooldown: cooldown.max(0.0),
            remaining: 0.0,
        }
    }

    pub fn is_on(&self) -> bool {
        self.on
    }

    pub fn is_cooling_down(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }

    /// Count the cooldown down by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        if self.remaining > 0.0 {
            self.remaining -= dt;
        }
    }

    /// Flip the state unless cooling down. Returns whether it flipped.
    pub fn request(&mut self) -> bool {
        if self.is_cooling_down() {
            return false;
        }
        self.on = !self.on;
        self.remaining = self.cooldown;
        true
    }

    /// Set the state directly, bypassing (and not restarting) the cooldown.
    pub fn force(&mut self, on: bool) {
        self.on = on;
    }
}

/// Something time-driven that happened while advancing a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameEvent {
    /// Total time crossed the suspense threshold.
    SuspenseCue { at: f32 },
    /// Total time crossed the auto-cheat threshold and cheat mode was forced on.
    CheatAutoEnabled { at: f32 },
}

/// One-shot threshold on total elapsed time.
#[derive(Debug, Clone, PartialEq)]
struct OneShot {
    threshold: Option<f32>,
    fired: bool,
}

impl OneShot {
    fn new(threshold: Option<f32>) -> Self {
        Self {
            threshold,
            fired: false,
        }
    }

    fn poll(&mut self, total: f32) -> bool {
        match self.threshold {
            Some(t) if !self.fired && total >= t => {
                self.fired = true;
                true
            }
            _ => false,
        }
    }
}

/// Per-frame timing plus the toggles the input step mutates.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    delta_time: f32,
    total_time: f32,
    frame_index: u64,
    pub flashlight: DebouncedToggle,
    pub cheat: DebouncedToggle,
    suspense: OneShot,
    auto_cheat: OneShot,
}

impl Default for FrameState {
    fn default() -> Self {
        Self::new(&TimerSettings::default())
    }
}

impl FrameState {
    /// Flashlight starts on, cheat mode off.
    pub fn new(timers: &TimerSettings) -> Self {
        Self {
            delta_time: 0.0,
            total_time: 0.0,
            frame_index: 0,
            flashlight: DebouncedToggle::new(true, timers.flashlight_cooldown),
            cheat: DebouncedToggle::new(false, timers.cheat_cooldown),
            suspense: OneShot::new(timers.suspense_cue_after),
            auto_cheat: OneShot::new(timers.auto_cheat_after),
        }
    }

    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn flashlight_on(&self) -> bool {
        self.flashlight.is_on()
    }

    pub fn cheat_mode(&self) -> bool {
        self.cheat.is_on()
    }

    /// Start a new frame `dt` seconds after the previous one.
    ///
    /// Negative or non-finite deltas are treated as zero.
    pub fn advance(&mut self, dt: f32) -> Vec<FrameEvent> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.delta_time = dt;
        self.total_time += dt;
        self.frame_index += 1;
        self.flashlight.tick(dt);
        self.cheat.tick(dt);
        tracing::trace!("time passed: {:.3}s", self.total_time);

        let mut events = Vec::new();
        if self.suspense.poll(self.total_time) {
            events.push(FrameEvent::SuspenseCue {
                at: self.total_time,
            });
        }
        if self.auto_cheat.poll(self.total_time) {
            self.cheat.force(true);
            events.push(FrameEvent::CheatAutoEnabled {
                at: self.total_time,
            });
        }
        events
    }
}
