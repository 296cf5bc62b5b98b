// Fade/eviction animator
//
// Every classified connection spawns an arc at full opacity. Each call to
// advance_one_tick() fades every live arc by one step and releases the ones
// that were already at the removal threshold. Ticks are driven by processed
// packets, not by a clock: busy links fade arcs quickly, quiet links leave
// them on screen longer.
//
// Opacity is tracked in integer tenths so the step sequence is exact.

use crate::app::config::{FADE_STEP_TENTHS, FADE_THRESHOLD_TENTHS, INITIAL_OPACITY_TENTHS};
use crate::net::Direction;

/// Lifecycle state of an arc after a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ArcState {
    Alive(f64),
    Removed,
}

/// One connection drawn on the map
#[derive(Debug, Clone, PartialEq)]
pub struct RenderableArc {
    /// Remote endpoint (lat, lon)
    pub endpoint_a: (f64, f64),
    /// Host endpoint (lat, lon)
    pub endpoint_b: (f64, f64),
    pub direction: Direction,
    /// Remote city shown next to the endpoint, if known
    pub label: Option<String>,
    opacity_tenths: u8,
}

impl RenderableArc {
    pub fn new(
        endpoint_a: (f64, f64),
        endpoint_b: (f64, f64),
        direction: Direction,
        label: Option<String>,
    ) -> Self {
        Self {
            endpoint_a,
            endpoint_b,
            direction,
            label,
            opacity_tenths: INITIAL_OPACITY_TENTHS,
        }
    }

    /// Current opacity in (0, 1]
    pub fn opacity(&self) -> f64 {
        f64::from(self.opacity_tenths) / 10.0
    }

    /// Apply one fade step
    pub fn tick(&mut self) -> ArcState {
        if self.opacity_tenths > FADE_THRESHOLD_TENTHS {
            self.opacity_tenths -= FADE_STEP_TENTHS;
            ArcState::Alive(self.opacity())
        } else {
            ArcState::Removed
        }
    }
}

/// The set of arcs currently on screen
#[derive(Debug, Clone, Default)]
pub struct FadeAnimator {
    arcs: Vec<RenderableArc>,
}

impl FadeAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, arc: RenderableArc) {
        self.arcs.push(arc);
    }

    /// Fade every live arc by one step, returning how many were removed
    pub fn advance_one_tick(&mut self) -> usize {
        let before = self.arcs.len();
        self.arcs
            .retain_mut(|arc| matches!(arc.tick(), ArcState::Alive(_)));
        before - self.arcs.len()
    }

    /// Live arcs, oldest first
    pub fn live_arcs(&self) -> &[RenderableArc] {
        &self.arcs
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arc(direction: Direction) -> RenderableArc {
        RenderableArc::new((40.7, -74.0), (52.5, 13.4), direction, None)
    }

    #[test]
    fn test_new_arc_is_fully_opaque() {
        assert_eq!(arc(Direction::Outbound).opacity(), 1.0);
    }

    #[test]
    fn test_nine_ticks_alive_tenth_removes() {
        let mut animator = FadeAnimator::new();
        animator.spawn(arc(Direction::Inbound));

        for _ in 0..9 {
            assert_eq!(animator.advance_one_tick(), 0);
        }
        assert_eq!(animator.len(), 1);
        assert!((animator.live_arcs()[0].opacity() - 0.1).abs() < 1e-9);

        assert_eq!(animator.advance_one_tick(), 1);
        assert!(animator.is_empty());
    }

    #[test]
    fn test_arc_tick_states() {
        let mut a = arc(Direction::Outbound);
        assert_eq!(a.tick(), ArcState::Alive(0.9));
        for _ in 0..8 {
            a.tick();
        }
        assert_eq!(a.opacity(), 0.1);
        assert_eq!(a.tick(), ArcState::Removed);
    }

    #[test]
    fn test_staggered_arcs_fade_independently() {
        let mut animator = FadeAnimator::new();
        animator.spawn(arc(Direction::Outbound));
        for _ in 0..5 {
            animator.advance_one_tick();
        }
        animator.spawn(arc(Direction::Inbound));

        let opacities: Vec<f64> = animator.live_arcs().iter().map(|a| a.opacity()).collect();
        assert_eq!(opacities, vec![0.5, 1.0]);

        for _ in 0..5 {
            animator.advance_one_tick();
        }
        // Oldest arc was at 0.1 after 9 ticks and is gone on the 10th
        assert_eq!(animator.len(), 1);
        assert_eq!(animator.live_arcs()[0].direction, Direction::Inbound);
        assert_eq!(animator.live_arcs()[0].opacity(), 0.5);
    }

    #[test]
    fn test_tick_on_empty_set() {
        let mut animator = FadeAnimator::new();
        assert_eq!(animator.advance_one_tick(), 0);
        assert!(animator.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_opacity_never_increases(ticks in 0usize..20) {
            let mut a = arc(Direction::Inbound);
            let mut last = a.opacity();
            for _ in 0..ticks {
                match a.tick() {
                    ArcState::Alive(opacity) => {
                        prop_assert!(opacity < last);
                        prop_assert!(opacity > 0.0);
                        last = opacity;
                    }
                    ArcState::Removed => break,
                }
            }
        }

        #[test]
        fn prop_arc_lives_exactly_ten_ticks(spawn_gaps in prop::collection::vec(0usize..4, 1..20)) {
            let mut animator = FadeAnimator::new();
            let mut spawned_at = Vec::new();
            let mut tick = 0usize;
            for gap in spawn_gaps {
                for _ in 0..gap {
                    animator.advance_one_tick();
                    tick += 1;
                }
                animator.spawn(arc(Direction::Outbound));
                spawned_at.push(tick);
            }
            let expected_live = spawned_at.iter().filter(|&&t| tick - t < 10).count();
            prop_assert_eq!(animator.len(), expected_live);
        }
    }
}
