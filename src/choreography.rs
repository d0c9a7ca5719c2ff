//! The cycle as data: every step of enter, flash and exit laid out on one
//! ordered timeline before the cycle starts.

use std::collections::VecDeque;
use std::time::Duration;
use crate::constants::*;
use crate::ring::RingSpec;

/// Durations that shape a cycle.
///
/// `transition` is both the length of a ring's visual transition and the
/// budget a phase waits after its last ring starts, so changing one always
/// changes the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub transition: Duration,
    pub flash_interval: Duration,
    pub flash_toggles: u32,
    pub flash_fade: Duration,
    pub flash_settle: Duration,
    pub idle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(TRANSITION_MS),
            flash_interval: Duration::from_millis(FLASH_INTERVAL_MS),
            flash_toggles: FLASH_TOGGLES,
            flash_fade: Duration::from_millis(FLASH_FADE_MS),
            flash_settle: Duration::from_millis(FLASH_SETTLE_MS),
            idle: Duration::from_millis(IDLE_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    StartCycle,
    EnterRing(usize),
    BeginFlash,
    FlashToggle(u32),
    SettleFlash,
    RemoveFlash,
    BeginExit,
    ExitRing(usize),
    FinishCycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledCue {
    pub at: Duration,
    pub cue: Cue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CyclePlan {
    timing: Timing,
    delays: Vec<Duration>,
}

impl CyclePlan {
    pub fn new(timing: Timing, rings: &[RingSpec]) -> Self {
        Self {
            timing,
            delays: rings.iter().map(|spec| spec.delay).collect(),
        }
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    fn last_delay(&self) -> Duration {
        self.delays.iter().copied().max().unwrap_or_default()
    }

    pub fn enter_span(&self) -> Duration {
        self.last_delay() + self.timing.transition
    }

    pub fn flash_span(&self) -> Duration {
        self.timing.flash_interval * self.timing.flash_toggles + self.timing.flash_settle
    }

    pub fn exit_span(&self) -> Duration {
        self.last_delay() + self.timing.transition
    }

    /// Time from a cycle's start to its running flag clearing.
    pub fn active_span(&self) -> Duration {
        self.enter_span() + self.flash_span() + self.exit_span()
    }

    /// Time between two consecutive cycle starts.
    pub fn period(&self) -> Duration {
        self.active_span() + self.timing.idle
    }

    /// Lays out one cycle beginning at `start`, ordered by time.
    pub fn cues(&self, start: Duration) -> Vec<ScheduledCue> {
        let mut cues = Vec::with_capacity(self.delays.len() * 2 + self.timing.flash_toggles as usize + 5);
        let at = |offset: Duration, cue: Cue| ScheduledCue { at: start + offset, cue };

        for (i, delay) in self.delays.iter().enumerate() {
            cues.push(at(*delay, Cue::EnterRing(i)));
        }

        let flash_start = self.enter_span();
        cues.push(at(flash_start, Cue::BeginFlash));
        for toggle in 0..self.timing.flash_toggles {
            cues.push(at(flash_start + self.timing.flash_interval * (toggle + 1), Cue::FlashToggle(toggle)));
        }
        cues.push(at(flash_start + self.timing.flash_interval * self.timing.flash_toggles, Cue::SettleFlash));

        let exit_start = flash_start + self.flash_span();
        cues.push(at(exit_start, Cue::RemoveFlash));
        cues.push(at(exit_start, Cue::BeginExit));
        for (i, delay) in self.delays.iter().enumerate() {
            cues.push(at(exit_start + *delay, Cue::ExitRing(i)));
        }
        cues.push(at(exit_start + self.exit_span(), Cue::FinishCycle));

        // Stable, so cues sharing a timestamp keep the order above
        cues.sort_by_key(|cue| cue.at);
        cues
    }
}

/// Pending cues, earliest first.
#[derive(Debug, Default)]
pub struct Timeline {
    cues: VecDeque<ScheduledCue>,
}

impl Timeline {
    pub fn schedule(&mut self, cue: ScheduledCue) {
        let index = self.cues.partition_point(|pending| pending.at <= cue.at);
        self.cues.insert(index, cue);
    }

    pub fn extend(&mut self, cues: impl IntoIterator<Item = ScheduledCue>) {
        for cue in cues {
            self.schedule(cue);
        }
    }

    /// Removes and returns the earliest cue if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<ScheduledCue> {
        match self.cues.front() {
            Some(cue) if cue.at <= now => self.cues.pop_front(),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}
