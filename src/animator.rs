use std::time::Duration;
use tracing::{debug, info};
use crate::choreography::{Cue, CyclePlan, ScheduledCue, Timeline, Timing};
use crate::flash::FlashOverlay;
use crate::layout::Viewport;
use crate::constants::SHIMMER_OPACITY;
use crate::ring::{RING_SPECS, RingHandle};
use crate::state::CyclePhase;

/// Full-viewport container the rings live on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stage {
    pub viewport: Viewport,
}

/// Owns the rings and the flash overlay and drives the enter, flash, exit loop.
pub struct Animator {
    plan: CyclePlan,

    stage: Option<Stage>,
    rings: Vec<RingHandle>,
    overlay: Option<FlashOverlay>,

    is_animating: bool,
    phase: CyclePhase,
    clock: Duration,
    timeline: Timeline,
    cycles_completed: u32,
}

impl Animator {
    pub fn new(timing: Timing) -> Self {
        Self {
            plan: CyclePlan::new(timing, &RING_SPECS),
            stage: None,
            rings: Vec::new(),
            overlay: None,
            is_animating: false,
            phase: CyclePhase::Idle,
            clock: Duration::ZERO,
            timeline: Timeline::default(),
            cycles_completed: 0,
        }
    }

    /// Builds the stage and the hidden rings, sized for `viewport`.
    pub fn initialize(&mut self, viewport: Viewport) {
        self.stage = Some(Stage { viewport });
        self.rings = RING_SPECS
            .iter()
            .map(|spec| RingHandle::new(*spec, viewport))
            .collect();
        info!(
            rings = self.rings.len(),
            width = viewport.width,
            height = viewport.height,
            "animator initialized"
        );
    }

    /// Re-applies the responsive sizes. Called on every viewport resize.
    pub fn resize(&mut self, viewport: Viewport) {
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        stage.viewport = viewport;
        for ring in self.rings.iter_mut() {
            ring.fit(viewport);
        }
        debug!(width = viewport.width, height = viewport.height, "rings resized");
    }

    /// Starts a cycle at the current clock. Returns `false` without scheduling
    /// anything if a cycle is already running or there is nothing to animate.
    pub fn run_cycle(&mut self) -> bool {
        if self.is_animating {
            debug!("cycle already running, ignoring");
            return false;
        }
        if self.stage.is_none() {
            debug!("no stage, ignoring cycle request");
            return false;
        }

        self.is_animating = true;
        for ring in self.rings.iter_mut() {
            ring.reset();
        }
        self.set_phase(CyclePhase::Entering);
        self.timeline.extend(self.plan.cues(self.clock));
        true
    }

    /// Moves the clock forward by one frame.
    pub fn update(&mut self, dt: f32) {
        self.advance(Duration::from_secs_f32(dt.max(0.0)));
    }

    /// Moves the clock forward, fires every cue that became due in order, then
    /// samples the rings and overlay at the new time.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.clock + elapsed;
        while let Some(scheduled) = self.timeline.pop_due(target) {
            // Cues fire at their own timestamp so transitions start on schedule
            self.clock = scheduled.at;
            self.apply(scheduled.cue);
        }
        self.clock = target;

        for ring in self.rings.iter_mut() {
            ring.update(self.clock);
        }
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.update(self.clock);
        }
    }

    fn apply(&mut self, cue: Cue) {
        let timing = *self.plan.timing();
        let now = self.clock;
        match cue {
            Cue::StartCycle => {
                self.run_cycle();
            }
            Cue::EnterRing(index) => {
                if let Some(ring) = self.rings.get_mut(index) {
                    ring.animate_in(now, timing.transition);
                }
            }
            Cue::BeginFlash => {
                self.set_phase(CyclePhase::Flashing);
                self.overlay = Some(FlashOverlay::new(timing.flash_fade));
            }
            Cue::FlashToggle(index) => {
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.toggle(index, now);
                }
                for ring in self.rings.iter_mut() {
                    let shimmer = if ring.target_opacity() == 1.0 { SHIMMER_OPACITY } else { 1.0 };
                    ring.fade_to(shimmer, now, timing.transition);
                }
            }
            Cue::SettleFlash => {
                for ring in self.rings.iter_mut() {
                    ring.fade_to(1.0, now, timing.transition);
                }
                if let Some(overlay) = self.overlay.as_mut() {
                    overlay.fade_out(now);
                }
            }
            Cue::RemoveFlash => {
                self.overlay = None;
            }
            Cue::BeginExit => {
                self.set_phase(CyclePhase::Exiting);
            }
            Cue::ExitRing(index) => {
                if let Some(ring) = self.rings.get_mut(index) {
                    ring.animate_out(now, timing.transition);
                }
            }
            Cue::FinishCycle => {
                self.is_animating = false;
                self.cycles_completed += 1;
                self.set_phase(CyclePhase::Idle);
                self.timeline.schedule(ScheduledCue { at: now + timing.idle, cue: Cue::StartCycle });
                debug!(cycles = self.cycles_completed, "cycle finished");
            }
        }
    }

    fn set_phase(&mut self, phase: CyclePhase) {
        debug!(from = ?self.phase, to = ?phase, at_ms = self.clock.as_millis() as u64, "phase change");
        self.phase = phase;
    }

    /// Removes the stage, rings and overlay and drops anything still scheduled.
    pub fn teardown(&mut self) {
        self.timeline.clear();
        self.overlay = None;
        self.rings.clear();
        self.stage = None;
        self.is_animating = false;
        self.phase = CyclePhase::Idle;
        info!(cycles = self.cycles_completed, "animator torn down");
    }

    pub fn stage(&self) -> Option<&Stage> {
        self.stage.as_ref()
    }

    pub fn rings(&self) -> &[RingHandle] {
        &self.rings
    }

    pub fn overlay(&self) -> Option<&FlashOverlay> {
        self.overlay.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    pub fn phase(&self) -> CyclePhase {
        self.phase
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn plan(&self) -> &CyclePlan {
        &self.plan
    }

    pub fn pending_cues(&self) -> usize {
        self.timeline.len()
    }

    pub fn cycles_completed(&self) -> u32 {
        self.cycles_completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn started() -> Animator {
        let mut animator = Animator::new(Timing::default());
        animator.initialize(Viewport::new(1920.0, 1080.0));
        assert!(animator.run_cycle());
        animator
    }

    /// Steps in 1ms increments for `total`, recording the clock at each phase change.
    fn record_phases(animator: &mut Animator, total: u64) -> Vec<(CyclePhase, Duration)> {
        let mut changes = Vec::new();
        let mut last = animator.phase();
        for _ in 0..total {
            animator.advance(ms(1));
            if animator.phase() != last {
                last = animator.phase();
                changes.push((last, animator.clock()));
            }
        }
        changes
    }

    #[test]
    fn initialize_builds_seven_hidden_rings() {
        let mut animator = Animator::new(Timing::default());
        animator.initialize(Viewport::new(1920.0, 1080.0));

        let rings = animator.rings();
        assert_eq!(rings.len(), 7);
        let sizes: Vec<f32> = rings.iter().map(|ring| ring.spec.size).collect();
        assert_eq!(sizes, vec![900.0, 750.0, 600.0, 480.0, 380.0, 300.0, 240.0]);
        let mut ids: Vec<&str> = rings.iter().map(|ring| ring.spec.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 7);

        for ring in rings {
            assert_eq!(ring.opacity(), 0.0);
            assert_eq!(ring.rotation(), 45.0);
            assert_eq!(ring.scale(), 0.0);
        }
        assert!(animator.stage().is_some());
        assert!(animator.overlay().is_none());
    }

    #[test]
    fn initialize_twice_keeps_seven_rings() {
        let mut animator = Animator::new(Timing::default());
        animator.initialize(Viewport::new(1920.0, 1080.0));
        animator.initialize(Viewport::new(1920.0, 1080.0));
        assert_eq!(animator.rings().len(), 7);
    }

    #[test]
    fn resize_rescales_every_ring() {
        let mut animator = Animator::new(Timing::default());
        animator.initialize(Viewport::new(2560.0, 1440.0));
        assert!((animator.rings()[0].size() - 810.0).abs() < 1e-3);

        animator.resize(Viewport::new(640.0, 400.0));
        for ring in animator.rings() {
            assert!(ring.size() <= 360.0 + 1e-3);
            assert!((ring.size() - (ring.spec.size * 0.3).min(360.0)).abs() < 1e-3);
        }
        assert_eq!(animator.stage().map(|stage| stage.viewport), Some(Viewport::new(640.0, 400.0)));
    }

    #[test]
    fn run_cycle_is_not_reentrant() {
        let mut animator = started();
        let pending = animator.pending_cues();
        assert!(animator.is_animating());

        assert!(!animator.run_cycle());
        assert_eq!(animator.pending_cues(), pending);

        animator.advance(ms(2000));
        assert!(!animator.run_cycle());
    }

    #[test]
    fn run_cycle_needs_a_stage() {
        let mut animator = Animator::new(Timing::default());
        assert!(!animator.run_cycle());
        assert_eq!(animator.pending_cues(), 0);
    }

    #[test]
    fn enter_staggers_rings_largest_first() {
        let mut animator = started();

        animator.advance(ms(100));
        assert!(animator.rings()[0].opacity() > 0.0);
        assert_eq!(animator.rings()[1].opacity(), 0.0);

        animator.advance(ms(100));
        assert!(animator.rings()[1].opacity() > 0.0);
        assert_eq!(animator.rings()[2].opacity(), 0.0);

        // Last ring starts at 900ms and settles at 1400ms
        animator.advance(ms(1199));
        assert_eq!(animator.phase(), CyclePhase::Entering);
        for ring in &animator.rings()[..6] {
            assert_eq!(ring.opacity(), 1.0);
            assert_eq!(ring.scale(), 1.0);
            assert_eq!(ring.rotation(), ring.spec.settled_rotation);
        }
    }

    #[test]
    fn phases_run_in_order_with_their_budgets() {
        let mut animator = started();
        let changes = record_phases(&mut animator, 3600);
        assert_eq!(
            changes,
            vec![
                (CyclePhase::Flashing, ms(1400)),
                (CyclePhase::Exiting, ms(2180)),
                (CyclePhase::Idle, ms(3580)),
            ]
        );

        let last_enter_start = RING_SPECS[6].delay;
        assert!(changes[0].1 >= last_enter_start + ms(500));
        assert!(changes[1].1 >= ms(1880) + ms(300));
    }

    #[test]
    fn flash_blinks_overlay_and_shimmers_rings() {
        let mut animator = started();
        animator.advance(ms(1400));
        let overlay = animator.overlay().expect("overlay during flash");
        assert_eq!(overlay.target_opacity(), 0.0);

        let mut overlay_targets = Vec::new();
        let mut ring_targets = Vec::new();
        for _ in 0..3 {
            animator.advance(ms(120));
            overlay_targets.push(animator.overlay().map(|overlay| overlay.target_opacity()));
            ring_targets.push(animator.rings()[0].target_opacity());
        }
        assert_eq!(overlay_targets, vec![Some(0.5), Some(0.0), Some(0.5)]);
        assert_eq!(ring_targets, vec![0.85, 1.0, 0.85]);
        assert!(animator.rings().iter().all(|ring| ring.opacity() >= 0.85));

        // Fourth toggle settles rings at full opacity and fades the overlay
        animator.advance(ms(120));
        assert!(animator.rings().iter().all(|ring| ring.target_opacity() == 1.0));
        assert_eq!(animator.overlay().map(|overlay| overlay.target_opacity()), Some(0.0));

        animator.advance(ms(299));
        assert!(animator.overlay().is_some());
        animator.advance(ms(1));
        assert!(animator.overlay().is_none());
        assert_eq!(animator.phase(), CyclePhase::Exiting);
    }

    #[test]
    fn overlay_alpha_stays_under_tint() {
        let mut animator = started();
        animator.advance(ms(1400));
        for _ in 0..780 {
            animator.advance(ms(1));
            if let Some(overlay) = animator.overlay() {
                assert!(overlay.alpha() <= 0.3 * 0.5 + 1e-6);
            }
        }
    }

    #[test]
    fn exit_returns_rings_to_reset_pose() {
        let mut animator = started();
        animator.advance(ms(3580));

        assert!(!animator.is_animating());
        assert_eq!(animator.phase(), CyclePhase::Idle);
        assert_eq!(animator.cycles_completed(), 1);
        for ring in animator.rings() {
            assert_eq!(ring.opacity(), 0.0);
            assert_eq!(ring.rotation(), 45.0);
            assert_eq!(ring.scale(), 0.0);
        }
    }

    #[test]
    fn exit_fades_largest_ring_first() {
        let mut animator = started();
        animator.advance(ms(2180 + 250));
        assert!(animator.rings()[0].opacity() < 1.0);
        assert!(animator.rings()[1].opacity() < 1.0);
        assert_eq!(animator.rings()[2].opacity(), 1.0);
    }

    #[test]
    fn cycles_repeat_after_idle() {
        let mut animator = started();
        let period = animator.plan().period();
        assert_eq!(period, ms(8580));

        let mut starts = vec![Duration::ZERO];
        let mut was_animating = true;
        for _ in 0..(8580 * 3 + 10) {
            animator.advance(ms(1));
            if animator.is_animating() && !was_animating {
                starts.push(animator.clock());
            }
            was_animating = animator.is_animating();
        }
        assert_eq!(starts, vec![Duration::ZERO, ms(8580), ms(17160), ms(25740)]);
        assert_eq!(animator.cycles_completed(), 3);
    }

    #[test]
    fn coarse_frames_keep_cue_times() {
        let mut fine = started();
        let mut coarse = started();
        fine.advance(ms(4000));
        for _ in 0..40 {
            coarse.advance(ms(100));
        }
        assert_eq!(fine.cycles_completed(), coarse.cycles_completed());
        assert_eq!(fine.pending_cues(), coarse.pending_cues());
        for (a, b) in fine.rings().iter().zip(coarse.rings()) {
            assert_eq!(a.opacity(), b.opacity());
            assert_eq!(a.scale(), b.scale());
        }
    }

    #[test]
    fn update_converts_frame_time() {
        let mut animator = started();
        for _ in 0..60 {
            animator.update(1.0 / 60.0);
        }
        let elapsed = animator.clock().as_secs_f64();
        assert!((elapsed - 1.0).abs() < 1e-3);
    }

    #[test]
    fn teardown_mid_cycle_stops_everything() {
        let mut animator = started();
        animator.advance(ms(1500));
        assert!(animator.overlay().is_some());

        animator.teardown();
        assert!(animator.stage().is_none());
        assert!(animator.overlay().is_none());
        assert!(animator.rings().is_empty());
        assert_eq!(animator.pending_cues(), 0);

        animator.advance(ms(20_000));
        assert_eq!(animator.cycles_completed(), 0);
        assert!(!animator.is_animating());
    }
}
