//! Progress simulation — a fabricated percentage shown while real work runs
//!
//! The indicator does not measure anything. It creeps forward by a randomized
//! step every frame, is held below a ceiling while the lookup or the image
//! preload is still outstanding, and speeds up once the lookup is back so the
//! bar visibly catches up.
//!
//! ```text
//! Idle ─start→ Running ⇄ Catchup ─100%→ Holding ─hold elapsed→ Done
//! ```
//!
//! # Guarantees
//!
//! - **Monotonic**: the percentage never decreases within one run
//! - **Bounded**: the percentage never exceeds 100
//! - **Honest finish**: 100 is only reachable once both signals are in

/// Percentage points per frame before the random factor
pub const BASE_STEP: f64 = 1.0;
/// Step multiplier while catching up
pub const CATCHUP_MULTIPLIER: f64 = 3.0;
/// Catch-up applies only below this percentage
pub const CATCHUP_THRESHOLD: f64 = 70.0;
/// Ceiling while the lookup is outstanding
pub const LOOKUP_CEILING: f64 = 90.0;
/// Ceiling while the image preload is outstanding
pub const PRELOAD_CEILING: f64 = 95.0;
pub const COMPLETE: f64 = 100.0;

/// Lower and upper bound of the per-frame random factor
pub const FACTOR_RANGE: std::ops::Range<f64> = 0.5..1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started
    Idle,
    /// Advancing at the base rate
    Running,
    /// Lookup is back and the bar is behind; advancing faster
    Catchup,
    /// Reached 100, pulse cue is showing
    Holding,
    /// Pulse held, overlay can go away
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSimulator {
    percent: f64,
    phase: Phase,
    lookup_done: bool,
    preload_done: bool,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSimulator {
    pub fn new() -> Self {
        ProgressSimulator {
            percent: 0.0,
            phase: Phase::Idle,
            lookup_done: false,
            preload_done: false,
        }
    }

    /// Begin a run from 0%
    pub fn start(&mut self) {
        *self = Self::new();
        self.phase = Phase::Running;
    }

    pub fn lookup_completed(&mut self) {
        self.lookup_done = true;
    }

    /// Preload finished, successfully or not
    pub fn preload_resolved(&mut self) {
        self.preload_done = true;
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Whole-number percentage for display
    pub fn display_percent(&self) -> u8 {
        self.percent.floor().clamp(0.0, COMPLETE) as u8
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_lookup_done(&self) -> bool {
        self.lookup_done
    }

    pub fn is_preload_done(&self) -> bool {
        self.preload_done
    }

    /// Highest percentage allowed given the outstanding work
    pub fn ceiling(&self) -> f64 {
        if !self.lookup_done {
            LOOKUP_CEILING
        } else if !self.preload_done {
            PRELOAD_CEILING
        } else {
            COMPLETE
        }
    }

    /// Advance one frame with `factor` drawn from [`FACTOR_RANGE`]
    ///
    /// Returns the new percentage. Outside `Running`/`Catchup` this is a no-op.
    pub fn tick(&mut self, factor: f64) -> f64 {
        if !matches!(self.phase, Phase::Running | Phase::Catchup) {
            return self.percent;
        }

        let catching_up = self.lookup_done && self.percent < CATCHUP_THRESHOLD;
        let multiplier = if catching_up { CATCHUP_MULTIPLIER } else { 1.0 };
        let step = BASE_STEP * factor.max(0.0) * multiplier;

        self.percent = (self.percent + step).min(self.ceiling()).max(self.percent);

        self.phase = if self.percent >= COMPLETE {
            Phase::Holding
        } else if self.lookup_done && self.percent < CATCHUP_THRESHOLD {
            Phase::Catchup
        } else {
            Phase::Running
        };

        self.percent
    }

    /// Pulse has been shown for its full duration
    pub fn hold_elapsed(&mut self) {
        if self.phase == Phase::Holding {
            self.phase = Phase::Done;
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }
}

/// Draw the per-frame factor
#[cfg(feature = "client")]
pub fn random_factor<R: rand::Rng>(rng: &mut R) -> f64 {
    rng.gen_range(FACTOR_RANGE)
}
