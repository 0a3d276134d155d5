//! Edge autoscrolling while a drag hovers near the viewport edges.
//!
//! The rate is a pure function of the cursor's position along the scrolling
//! axis ([`autoscroll_rate`]). The loop itself starts after a short delay,
//! then advances the scroll position once per frame by the real time that
//! elapsed since the previous frame.

use std::sync::{Arc, Weak};
use std::time::Duration;

use crate::logging::targets;
use crate::state::Shared;

/// Width of the band along each viewport edge that triggers autoscroll.
pub const AUTOSCROLL_THRESHOLD: f32 = 100.0;

/// Rate at the inner edge of the band, in units per second.
pub const AUTOSCROLL_MIN_RATE: f32 = 150.0;

/// Rate at the viewport edge, in units per second.
pub const AUTOSCROLL_MAX_RATE: f32 = 1500.0;

/// Delay before a nonzero rate starts scrolling.
pub const AUTOSCROLL_START_DELAY: Duration = Duration::from_millis(50);

/// Computes the signed autoscroll rate.
///
/// `cursor` is measured from the leading viewport edge along the scrolling
/// axis. The rate grows linearly with penetration into the edge band and is
/// zero outside the band, exactly on its inner boundary, and whenever
/// scrolling further in that direction would pass the content boundary.
pub fn autoscroll_rate(
    cursor: f32,
    viewport_length: f32,
    scroll_position: f32,
    max_scroll_position: f32,
) -> f32 {
    let scale = |depth: f32| {
        let depth = depth.min(AUTOSCROLL_THRESHOLD);
        AUTOSCROLL_MIN_RATE + (AUTOSCROLL_MAX_RATE - AUTOSCROLL_MIN_RATE) * depth / AUTOSCROLL_THRESHOLD
    };

    if cursor < AUTOSCROLL_THRESHOLD {
        if scroll_position <= 0.0 {
            return 0.0;
        }
        -scale(AUTOSCROLL_THRESHOLD - cursor)
    } else if cursor > viewport_length - AUTOSCROLL_THRESHOLD {
        if scroll_position >= max_scroll_position {
            return 0.0;
        }
        scale(cursor - (viewport_length - AUTOSCROLL_THRESHOLD))
    } else {
        0.0
    }
}

/// Drives the autoscroll loop.
pub(crate) struct AutoScrollLoop<'a> {
    shared: &'a Arc<Shared>,
}

impl<'a> AutoScrollLoop<'a> {
    pub fn new(shared: &'a Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Recomputes the rate for a cursor `axis_position` from the leading edge.
    pub fn update(&self, axis_position: f32) {
        let site = &self.shared.site;
        let rate = autoscroll_rate(
            axis_position,
            self.shared.viewport_length(),
            site.scroll_position(),
            site.max_scroll_position(),
        );

        let mut state = self.shared.state.lock();
        let autoscroll = &mut state.autoscroll;
        let previous = autoscroll.rate;
        autoscroll.rate = rate;

        if rate == 0.0 {
            if previous != 0.0 {
                tracing::trace!(target: targets::AUTOSCROLL, "autoscroll stopped");
            }
            autoscroll.stop();
            return;
        }

        if autoscroll.frame.is_pending() || autoscroll.start_delay.is_pending() {
            return;
        }
        let weak = Arc::downgrade(self.shared);
        autoscroll
            .start_delay
            .schedule(AUTOSCROLL_START_DELAY, move || start(weak));
    }

    /// Returns true while frames are advancing the scroll position.
    pub fn is_scrolling(&self) -> bool {
        self.shared.state.lock().autoscroll.frame.is_pending()
    }
}

fn start(shared: Weak<Shared>) {
    let Some(strong) = shared.upgrade() else {
        return;
    };
    if strong.is_disposed() {
        return;
    }
    let now = strong.clock.now();
    let mut state = strong.state.lock();
    if state.autoscroll.rate == 0.0 {
        return;
    }
    tracing::trace!(target: targets::AUTOSCROLL, rate = state.autoscroll.rate, "autoscroll started");
    state.autoscroll.last_tick = Some(now);
    state.autoscroll.frame.request_frame(move || tick(shared));
}

#[tracing::instrument(skip(shared), target = "lattice_browse::autoscroll", level = "trace")]
fn tick(shared: Weak<Shared>) {
    let Some(strong) = shared.upgrade() else {
        return;
    };
    if strong.is_disposed() {
        return;
    }

    let now = strong.clock.now();
    let (rate, elapsed) = {
        let mut state = strong.state.lock();
        let rate = state.autoscroll.rate;
        if rate == 0.0 {
            return;
        }
        let elapsed = state
            .autoscroll
            .last_tick
            .map(|last| now.saturating_duration_since(last))
            .unwrap_or_default();
        state.autoscroll.last_tick = Some(now);
        (rate, elapsed)
    };

    let mut delta = rate * elapsed.as_secs_f32();
    if delta.abs() < 1.0 {
        delta = 1.0_f32.copysign(rate);
    }

    let site = &strong.site;
    let max = site.max_scroll_position();
    let position = (site.scroll_position() + delta).clamp(0.0, max.max(0.0));
    site.set_scroll_position(position);

    let at_boundary = (rate < 0.0 && position <= 0.0) || (rate > 0.0 && position >= max);
    let mut state = strong.state.lock();
    if at_boundary {
        tracing::trace!(target: targets::AUTOSCROLL, position, "autoscroll reached boundary");
        state.autoscroll.stop();
    } else if state.autoscroll.rate != 0.0 {
        state.autoscroll.frame.request_frame(move || tick(shared));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: f32 = 500.0;

    #[test]
    fn test_rate_zero_in_middle() {
        assert_eq!(autoscroll_rate(250.0, VIEWPORT, 200.0, 1000.0), 0.0);
    }

    #[test]
    fn test_rate_zero_at_band_boundary() {
        assert_eq!(autoscroll_rate(AUTOSCROLL_THRESHOLD, VIEWPORT, 200.0, 1000.0), 0.0);
        assert_eq!(
            autoscroll_rate(VIEWPORT - AUTOSCROLL_THRESHOLD, VIEWPORT, 200.0, 1000.0),
            0.0
        );
    }

    #[test]
    fn test_rate_scales_with_depth() {
        let shallow = autoscroll_rate(90.0, VIEWPORT, 200.0, 1000.0);
        let deep = autoscroll_rate(10.0, VIEWPORT, 200.0, 1000.0);
        assert!(shallow < 0.0 && deep < shallow);
        assert_eq!(autoscroll_rate(0.0, VIEWPORT, 200.0, 1000.0), -AUTOSCROLL_MAX_RATE);
        assert_eq!(autoscroll_rate(-40.0, VIEWPORT, 200.0, 1000.0), -AUTOSCROLL_MAX_RATE);

        let forward = autoscroll_rate(450.0, VIEWPORT, 200.0, 1000.0);
        assert_eq!(forward, AUTOSCROLL_MIN_RATE + (AUTOSCROLL_MAX_RATE - AUTOSCROLL_MIN_RATE) / 2.0);
    }

    #[test]
    fn test_rate_zero_at_content_boundary() {
        assert_eq!(autoscroll_rate(5.0, VIEWPORT, 0.0, 1000.0), 0.0);
        assert_eq!(autoscroll_rate(495.0, VIEWPORT, 1000.0, 1000.0), 0.0);
        assert!(autoscroll_rate(495.0, VIEWPORT, 0.0, 1000.0) > 0.0);
    }
}
