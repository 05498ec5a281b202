//! Frame-by-frame interpolation with stop-and-restart semantics.
//!
//! Every animatable property is an [`Animated`] value. Starting a new animation on a property
//! cancels the one in flight and continues from wherever the property currently is, so the
//! visual state always converges to the most recent target.

use crate::geometry::Point;
use serde::{Deserialize, Deserializer};
use serde_with::SerializeDisplay;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum Easing {
    #[strum(to_string = "linear")]
    Linear,
    #[strum(to_string = "ease-in")]
    EaseIn,
    #[default]
    #[strum(to_string = "ease-out", serialize = "ease")]
    EaseOut,
    #[strum(to_string = "ease-in-out")]
    EaseInOut,
}

impl Easing {
    /// Parses a CSS-style timing function name, falling back to ease-out.
    pub fn from_name(name: &str) -> Self {
        name.trim().parse().unwrap_or_else(|_| {
            log::warn!("unknown easing '{name}', using ease-out");
            Self::EaseOut
        })
    }

    /// Maps linear progress in `[0, 1]` to eased progress (quadratic curves).
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
        }
    }
}

// Unknown names fall back instead of failing the whole document.
impl<'de> Deserialize<'de> for Easing {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// Values that can be blended linearly.
pub trait Lerp: Copy {
    fn lerp(self, to: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(self, to: Self, t: f64) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for Point {
    fn lerp(self, to: Self, t: f64) -> Self {
        Point::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

/// Shared timing for every animation the chart issues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timing {
    pub duration: Duration,
    pub easing: Easing,
}

impl Timing {
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Tween<T> {
    from: T,
    to: T,
    started: Duration,
    timing: Timing,
}

impl<T: Lerp> Tween<T> {
    fn progress(&self, now: Duration) -> f64 {
        if self.timing.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started);
        (elapsed.as_secs_f64() / self.timing.duration.as_secs_f64()).min(1.0)
    }

    fn sample(&self, now: Duration) -> T {
        let t = self.progress(now);
        if t >= 1.0 {
            // Land exactly on the target, not on a float approximation of it.
            self.to
        } else {
            self.from.lerp(self.to, self.timing.easing.apply(t))
        }
    }
}

/// A property with an optional in-flight tween.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animated<T> {
    current: T,
    tween: Option<Tween<T>>,
}

impl<T: Lerp + PartialEq> Animated<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: value,
            tween: None,
        }
    }

    pub fn value(&self) -> T {
        self.current
    }

    /// Final value once the current tween (if any) settles.
    pub fn target(&self) -> T {
        self.tween.map(|t| t.to).unwrap_or(self.current)
    }

    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Freezes the property where it is. Returns whether a tween was in flight.
    pub fn cancel(&mut self) -> bool {
        self.tween.take().is_some()
    }

    /// Cancels any running tween and starts a new one from the current value.
    ///
    /// Returns whether a tween was interrupted.
    pub fn animate_to(&mut self, to: T, now: Duration, timing: Timing) -> bool {
        let interrupted = self.cancel();
        if self.current == to {
            return interrupted;
        }
        self.tween = Some(Tween {
            from: self.current,
            to,
            started: now,
            timing,
        });
        interrupted
    }

    /// Jumps to `value` without animating.
    pub fn set(&mut self, value: T) {
        self.tween = None;
        self.current = value;
    }

    /// Jumps to the end of the current tween.
    pub fn finish(&mut self) {
        if let Some(tween) = self.tween.take() {
            self.current = tween.to;
        }
    }

    /// Advances to `now`, retiring the tween once it completes.
    pub fn tick(&mut self, now: Duration) {
        if let Some(tween) = self.tween {
            self.current = tween.sample(now);
            if tween.progress(now) >= 1.0 {
                self.tween = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn timing() -> Timing {
        Timing::new(Duration::from_millis(300), Easing::Linear)
    }

    #[test]
    fn test_easing_names() {
        let cases = vec![
            ("ease", Easing::EaseOut),
            ("ease-out", Easing::EaseOut),
            ("EASE-IN", Easing::EaseIn),
            ("ease-in-out", Easing::EaseInOut),
            ("linear", Easing::Linear),
            ("cubic-bezier(0,0,1,1)", Easing::EaseOut),
        ];
        for (name, expected) in cases {
            assert_eq!(Easing::from_name(name), expected, "{name}");
        }
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in Easing::iter() {
            assert_eq!(easing.apply(0.0), 0.0, "{easing}");
            assert_eq!(easing.apply(1.0), 1.0, "{easing}");
            assert!(easing.apply(0.5) > 0.0 && easing.apply(0.5) < 1.0);
        }
        assert!(Easing::EaseOut.apply(0.5) > 0.5);
        assert!(Easing::EaseIn.apply(0.5) < 0.5);
    }

    #[test]
    fn test_tween_lands_exactly_on_target() {
        let mut v = Animated::new(10.0);
        v.animate_to(1.0 / 3.0, Duration::ZERO, timing());
        v.tick(Duration::from_millis(150));
        assert!((v.value() - (10.0 + (1.0 / 3.0 - 10.0) * 0.5)).abs() < 1e-12);
        v.tick(Duration::from_millis(301));
        assert_eq!(v.value(), 1.0 / 3.0);
        assert!(!v.is_animating());
    }

    #[test]
    fn test_restart_continues_from_current_value() {
        let mut v = Animated::new(Point::new(0.0, 0.0));
        v.animate_to(Point::new(100.0, 0.0), Duration::ZERO, timing());
        v.tick(Duration::from_millis(150));
        assert_eq!(v.value(), Point::new(50.0, 0.0));

        let interrupted = v.animate_to(Point::new(0.0, 0.0), Duration::from_millis(150), timing());
        assert!(interrupted);
        v.tick(Duration::from_millis(300));
        assert_eq!(v.value(), Point::new(25.0, 0.0));
        v.tick(Duration::from_millis(450));
        assert_eq!(v.value(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_animating_to_current_value_is_a_no_op() {
        let mut v = Animated::new(1.0);
        assert!(!v.animate_to(1.0, Duration::ZERO, timing()));
        assert!(!v.is_animating());
    }

    #[test]
    fn test_zero_duration_snaps() {
        let mut v = Animated::new(0.0);
        v.animate_to(5.0, Duration::ZERO, Timing::new(Duration::ZERO, Easing::EaseOut));
        v.tick(Duration::ZERO);
        assert_eq!(v.value(), 5.0);
    }
}
