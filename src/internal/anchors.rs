use std::time::{Duration, Instant};

use crate::utils::url::fragment_id;

/// How long a smooth scroll to an anchor takes.
pub const SMOOTH_SCROLL_DURATION: Duration = Duration::from_millis(300);

/// A navigable link on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub label: String,
    pub href: String,
}

impl Link {
    pub fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

/// Anything that can resolve a fragment id to a scroll offset (in lines).
pub trait AnchorTargets {
    fn target_offset(&self, id: &str) -> Option<u16>;
}

/// What happened when a link was activated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorOutcome {
    /// Not a registered same-document link; default navigation applies.
    NotIntercepted,
    /// Intercepted, but the target does not exist. Nothing moves.
    Suppressed,
    Scroll(ScrollAnimation),
}

/// Ease-in-out scroll between two offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollAnimation {
    pub from: u16,
    pub to: u16,
    started: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    pub fn new(from: u16, to: u16, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    /// Offset to display at `now`. Lands exactly on `to` once finished.
    pub fn offset_at(&self, now: Instant) -> u16 {
        if self.duration.is_zero() || self.is_finished(now) {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64()
            / self.duration.as_secs_f64();
        let eased = ease_in_out(t.clamp(0.0, 1.0));
        let from = f64::from(self.from);
        let to = f64::from(self.to);
        (from + (to - from) * eased).round() as u16
    }
}

fn ease_in_out(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Intercepts same-document links registered at start-up.
///
/// Links that appear after [`AnchorScroller::register`] are not covered.
#[derive(Debug, Clone, Default)]
pub struct AnchorScroller {
    registered: Vec<String>,
}

impl AnchorScroller {
    pub fn register(links: &[Link]) -> Self {
        let registered: Vec<String> = links
            .iter()
            .filter(|link| fragment_id(&link.href).is_some())
            .map(|link| link.href.trim().to_string())
            .collect();
        tracing::debug!(count = registered.len(), "Registered anchor links");
        Self { registered }
    }

    pub fn is_registered(&self, href: &str) -> bool {
        self.registered.iter().any(|h| h == href.trim())
    }

    pub fn activate(
        &self,
        href: &str,
        targets: &impl AnchorTargets,
        current: u16,
        now: Instant,
    ) -> AnchorOutcome {
        if !self.is_registered(href) {
            return AnchorOutcome::NotIntercepted;
        }
        let Some(id) = fragment_id(href) else {
            return AnchorOutcome::NotIntercepted;
        };
        match targets.target_offset(id) {
            Some(offset) => AnchorOutcome::Scroll(ScrollAnimation::new(
                current,
                offset,
                now,
                SMOOTH_SCROLL_DURATION,
            )),
            None => {
                tracing::debug!(%id, "Anchor target not found");
                AnchorOutcome::Suppressed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct Targets(HashMap<&'static str, u16>);

    impl AnchorTargets for Targets {
        fn target_offset(&self, id: &str) -> Option<u16> {
            self.0.get(id).copied()
        }
    }

    fn targets() -> Targets {
        Targets(HashMap::from([("catalog", 4), ("about", 40)]))
    }

    fn scroller() -> AnchorScroller {
        AnchorScroller::register(&[
            Link::new("Catalog", "#catalog"),
            Link::new("About", "#about"),
            Link::new("Changelog", "#changelog"),
            Link::new("Home", "/index.html"),
            Link::new("Top", "#"),
        ])
    }

    #[test]
    fn test_only_fragment_links_are_registered() {
        let scroller = scroller();
        assert!(scroller.is_registered("#catalog"));
        assert!(scroller.is_registered("#changelog"));
        assert!(!scroller.is_registered("/index.html"));
        assert!(!scroller.is_registered("#"));
    }

    #[test]
    fn test_scrolls_to_existing_target() {
        let now = Instant::now();
        let outcome = scroller().activate("#about", &targets(), 0, now);
        match outcome {
            AnchorOutcome::Scroll(anim) => {
                assert_eq!(anim.from, 0);
                assert_eq!(anim.to, 40);
                assert_eq!(anim.offset_at(now), 0);
                assert_eq!(anim.offset_at(now + SMOOTH_SCROLL_DURATION), 40);
            }
            other => panic!("expected scroll, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_target_is_suppressed() {
        let outcome = scroller().activate("#changelog", &targets(), 12, Instant::now());
        assert_eq!(outcome, AnchorOutcome::Suppressed);
    }

    #[test]
    fn test_unregistered_links_pass_through() {
        let now = Instant::now();
        assert_eq!(
            scroller().activate("/index.html", &targets(), 0, now),
            AnchorOutcome::NotIntercepted
        );
        // Registered after the fact: not covered.
        assert_eq!(
            scroller().activate("#late", &targets(), 0, now),
            AnchorOutcome::NotIntercepted
        );
    }

    #[test]
    fn test_animation_is_monotonic() {
        let start = Instant::now();
        let anim = ScrollAnimation::new(10, 50, start, Duration::from_millis(100));
        let mut last = anim.offset_at(start);
        for ms in (0..=100).step_by(10) {
            let offset = anim.offset_at(start + Duration::from_millis(ms));
            assert!(offset >= last);
            last = offset;
        }
        assert_eq!(last, 50);
        assert!(anim.is_finished(start + Duration::from_millis(100)));
    }

    #[test]
    fn test_animation_scrolls_upwards() {
        let start = Instant::now();
        let anim = ScrollAnimation::new(40, 4, start, Duration::from_millis(100));
        assert_eq!(anim.offset_at(start + Duration::from_millis(50)), 22);
        assert_eq!(anim.offset_at(start + Duration::from_secs(1)), 4);
    }
}
