//! Scroll position mapping between source lines and the rendered view.
//!
//! Both directions share one primitive: linear interpolation between the two
//! line-tagged blocks that bracket the target.
//!
//! # Echo suppression
//!
//! A programmatic scroll fires the view's own scroll listener. Without
//! suppression that echo would be reported back to the other side, which
//! scrolls again, and so on. [`EchoSuppressor`] is a two-state machine:
//!
//! ```text
//!            arm(now)
//!   Idle ─────────────────> Suppressing { one_shot_pending, until }
//!    ^                          │  observe(now): echo
//!    │  one-shot spent and      │  (later echoes push `until` forward)
//!    │  poll(now) >= until      │
//!    └──────────────────────────┘
//! ```
//!
//! The one-shot swallows the first scroll event after arming, however late
//! it arrives. The debounce window keeps swallowing the echoes of layout
//! settling until scrolling has been quiet for `debounce`.

use std::time::{Duration, Instant};

// =============================================================================
// Anchors
// =============================================================================

/// A line-tagged block and its rendered top offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollAnchor {
    /// Source line the block came from
    pub line: usize,
    /// Block top, in the same unit as the surface's scroll position
    pub top: f64,
}

impl ScrollAnchor {
    pub const fn new(line: usize, top: f64) -> Self {
        Self { line, top }
    }
}

/// Scrollable rendered surface.
pub trait ScrollSurface {
    /// Line-tagged blocks in view order
    fn anchors(&self) -> Vec<ScrollAnchor>;

    /// Current scroll offset of the viewport's top edge
    fn scroll_top(&self) -> f64;

    /// Scroll programmatically. Returns whether the position changed.
    fn scroll_to(&mut self, top: f64) -> bool;
}

/// Map a (possibly fractional) source line to a scroll offset.
///
/// An anchor on exactly `line` wins. Otherwise the nearest anchors on each
/// side are interpolated; with only one side, that anchor's top is used.
/// Returns `None` when there are no anchors.
pub fn line_to_offset(anchors: &[ScrollAnchor], line: f64) -> Option<f64> {
    if let Some(exact) = anchors.iter().find(|a| a.line as f64 == line) {
        return Some(exact.top);
    }

    let mut lower: Option<&ScrollAnchor> = None;
    let mut upper: Option<&ScrollAnchor> = None;
    for anchor in anchors {
        let at = anchor.line as f64;
        if at <= line {
            if lower.is_none_or(|l| anchor.line > l.line) {
                lower = Some(anchor);
            }
        } else if upper.is_none_or(|u| anchor.line < u.line) {
            upper = Some(anchor);
        }
    }

    match (lower, upper) {
        (Some(lo), Some(hi)) => {
            let ratio = (line - lo.line as f64) / (hi.line - lo.line) as f64;
            Some(lo.top + ratio * (hi.top - lo.top))
        }
        (Some(only), None) | (None, Some(only)) => Some(only.top),
        (None, None) => None,
    }
}

/// Map a scroll offset back to a fractional source line.
///
/// `lower` is the last anchor whose top is at or above `top`, `upper` the
/// first one below it. Returns `None` when there are no anchors.
pub fn offset_to_line(anchors: &[ScrollAnchor], top: f64) -> Option<f64> {
    let split = anchors.partition_point(|a| a.top <= top);
    let lower = split.checked_sub(1).and_then(|i| anchors.get(i));
    let upper = anchors.get(split);

    match (lower, upper) {
        (Some(lo), Some(hi)) => {
            let ratio = (top - lo.top) / (hi.top - lo.top);
            Some(lo.line as f64 + ratio * (hi.line as f64 - lo.line as f64))
        }
        (Some(only), None) | (None, Some(only)) => Some(only.line as f64),
        (None, None) => None,
    }
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for scroll synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollConfig {
    /// Window after a programmatic scroll in which scroll events are echoes.
    /// Default: 600ms
    pub debounce: Duration,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(600),
        }
    }
}

// =============================================================================
// EchoSuppressor
// =============================================================================

/// Suppression state of one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SuppressState {
    /// Scroll events are user scrolls
    #[default]
    Idle,
    /// A programmatic scroll is settling
    Suppressing {
        /// The synchronous echo has not been seen yet
        one_shot_pending: bool,
        /// Return to `Idle` once this passes without scrolling
        until: Instant,
    },
}

/// How an observed scroll event should be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollVerdict {
    /// Caused by our own programmatic scroll; do not report
    Echo,
    /// User scroll; report to the other side
    User,
}

/// Per-view feedback-loop guard.
#[derive(Debug, Clone)]
pub struct EchoSuppressor {
    debounce: Duration,
    state: SuppressState,
}

impl EchoSuppressor {
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            debounce: config.debounce,
            state: SuppressState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> SuppressState {
        self.state
    }

    /// Enter `Suppressing` just before a programmatic scroll.
    pub fn arm(&mut self, now: Instant) {
        self.state = SuppressState::Suppressing {
            one_shot_pending: true,
            until: now + self.debounce,
        };
    }

    /// Classify a scroll event observed at `now`.
    ///
    /// The first event after [`arm`](Self::arm) is always an echo, even
    /// when it arrives after the deadline.
    pub fn observe(&mut self, now: Instant) -> ScrollVerdict {
        self.poll(now);
        let SuppressState::Suppressing { until, .. } = self.state else {
            return ScrollVerdict::User;
        };
        self.state = if now >= until {
            // Late one-shot echo
            SuppressState::Idle
        } else {
            // Still settling; the window restarts from this event
            SuppressState::Suppressing {
                one_shot_pending: false,
                until: now + self.debounce,
            }
        };
        ScrollVerdict::Echo
    }

    /// Timer transition back to `Idle`. Returns whether still suppressing.
    ///
    /// A pending one-shot holds `Suppressing` past the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let SuppressState::Suppressing { one_shot_pending: false, until } = self.state {
            if now >= until {
                self.state = SuppressState::Idle;
            }
        }
        self.is_suppressing()
    }

    pub fn is_suppressing(&self) -> bool {
        matches!(self.state, SuppressState::Suppressing { .. })
    }

    /// Back to `Idle` (used on reload).
    pub fn reset(&mut self) {
        self.state = SuppressState::Idle;
    }
}

impl Default for EchoSuppressor {
    fn default() -> Self {
        Self::new(ScrollConfig::default())
    }
}

// =============================================================================
// ScrollSync
// =============================================================================

/// Scroll state of one rendered view: last known line plus echo guard.
#[derive(Debug, Clone, Default)]
pub struct ScrollSync {
    suppressor: EchoSuppressor,
    last_line: Option<f64>,
}

impl ScrollSync {
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            suppressor: EchoSuppressor::new(config),
            last_line: None,
        }
    }

    /// Last source line pushed to or pulled from this view.
    pub fn last_line(&self) -> Option<f64> {
        self.last_line
    }

    pub fn suppressor(&self) -> &EchoSuppressor {
        &self.suppressor
    }

    /// Source → view: scroll `surface` to `line`.
    ///
    /// Returns whether the view moved. Suppression is armed only when it did,
    /// since an unmoved view fires no scroll event to swallow.
    pub fn push_line<S>(&mut self, surface: &mut S, line: f64, now: Instant) -> bool
    where
        S: ScrollSurface + ?Sized,
    {
        let Some(top) = line_to_offset(&surface.anchors(), line) else {
            tracing::trace!(line, "no anchors to scroll to");
            return false;
        };
        self.last_line = Some(line);
        // Arm first: the surface may fire its listener synchronously
        let previous = self.suppressor.state();
        self.suppressor.arm(now);
        let moved = surface.scroll_to(top);
        if !moved {
            self.suppressor.state = previous;
        }
        moved
    }

    /// View → source: classify a scroll event and map it to a line.
    ///
    /// Returns `None` for echoes and for views without anchors.
    pub fn observe_scroll<S>(&mut self, surface: &S, now: Instant) -> Option<f64>
    where
        S: ScrollSurface + ?Sized,
    {
        if self.suppressor.observe(now) == ScrollVerdict::Echo {
            tracing::trace!("suppressed scroll echo");
            return None;
        }
        let line = offset_to_line(&surface.anchors(), surface.scroll_top())?;
        self.last_line = Some(line);
        Some(line)
    }

    /// Timer transition; see [`EchoSuppressor::poll`].
    pub fn poll(&mut self, now: Instant) -> bool {
        self.suppressor.poll(now)
    }

    /// Forget everything (used on reload).
    pub fn reset(&mut self) {
        self.suppressor.reset();
        self.last_line = None;
    }
}

// =============================================================================
// Tests
// =============================================================================
