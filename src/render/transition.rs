use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::render::Shape;

/// Easing curve applied to normalized transition progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    QuadInOut,
    /// d3's default transition curve.
    #[default]
    CubicInOut,
    CubicOut,
}

impl Easing {
    /// Maps progress in `[0, 1]` to eased progress in `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::CubicOut => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Duration and curve of one scheduled transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TransitionSpec {
    pub duration: Duration,
    pub easing: Easing,
}

impl TransitionSpec {
    /// Applies changes in a single step.
    pub const INSTANT: Self = Self {
        duration: Duration::ZERO,
        easing: Easing::CubicInOut,
    };

    #[must_use]
    pub fn new(duration: Duration, easing: Easing) -> Self {
        Self { duration, easing }
    }

    #[must_use]
    pub fn is_instant(self) -> bool {
        self.duration.is_zero()
    }
}

/// Values that can be blended between two endpoints.
pub trait Interpolate: Clone {
    fn interpolate(&self, to: &Self, t: f64) -> Self;
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

impl Interpolate for f64 {
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        lerp(*self, *to, t)
    }
}

impl Interpolate for Shape {
    /// Blends matching shape kinds field by field. Text content and anchors
    /// switch to the target immediately; mismatched kinds snap to `to`.
    fn interpolate(&self, to: &Self, t: f64) -> Self {
        match (self, to) {
            (
                Shape::Line { x1, y1, x2, y2 },
                Shape::Line {
                    x1: tx1,
                    y1: ty1,
                    x2: tx2,
                    y2: ty2,
                },
            ) => Shape::line(
                lerp(*x1, *tx1, t),
                lerp(*y1, *ty1, t),
                lerp(*x2, *tx2, t),
                lerp(*y2, *ty2, t),
            ),
            (
                Shape::Rect {
                    x,
                    y,
                    width,
                    height,
                },
                Shape::Rect {
                    x: tx,
                    y: ty,
                    width: tw,
                    height: th,
                },
            ) => Shape::rect(
                lerp(*x, *tx, t),
                lerp(*y, *ty, t),
                lerp(*width, *tw, t),
                lerp(*height, *th, t),
            ),
            (Shape::Circle { cx, cy, r }, Shape::Circle { cx: tx, cy: ty, r: tr }) => {
                Shape::circle(lerp(*cx, *tx, t), lerp(*cy, *ty, t), lerp(*r, *tr, t))
            }
            (
                Shape::Text { x, y, .. },
                Shape::Text {
                    x: tx,
                    y: ty,
                    text,
                    anchor,
                },
            ) => Shape::text(lerp(*x, *tx, t), lerp(*y, *ty, t), text.clone(), *anchor),
            _ => to.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Tween<T> {
    from: T,
    elapsed: Duration,
    duration: Duration,
    easing: Easing,
}

/// A value animated toward a target.
///
/// Re-targeting while a tween is in flight restarts it from the current
/// interpolated value, so a burst of updates never queues transitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Tweened<T: Interpolate> {
    current: T,
    target: T,
    tween: Option<Tween<T>>,
}

impl<T: Interpolate> Tweened<T> {
    /// Starts settled at `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            current: value.clone(),
            target: value,
            tween: None,
        }
    }

    #[must_use]
    pub fn current(&self) -> &T {
        &self.current
    }

    #[must_use]
    pub fn target(&self) -> &T {
        &self.target
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    /// Animates from the current value to `target`. A zero duration applies
    /// the target immediately.
    pub fn retarget(&mut self, target: T, transition: TransitionSpec) {
        let TransitionSpec { duration, easing } = transition;
        if duration.is_zero() {
            self.current = target.clone();
            self.target = target;
            self.tween = None;
            return;
        }

        self.tween = Some(Tween {
            from: self.current.clone(),
            elapsed: Duration::ZERO,
            duration,
            easing,
        });
        self.target = target;
    }

    /// Advances the tween; returns `true` once settled.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let Some(tween) = self.tween.as_mut() else {
            return true;
        };

        tween.elapsed = (tween.elapsed + dt).min(tween.duration);
        if tween.elapsed >= tween.duration {
            self.finish();
            return true;
        }

        let progress = tween.elapsed.as_secs_f64() / tween.duration.as_secs_f64();
        self.current = tween
            .from
            .interpolate(&self.target, tween.easing.apply(progress));
        false
    }

    /// Jumps to the target.
    pub fn finish(&mut self) {
        self.current = self.target.clone();
        self.tween = None;
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Easing, TransitionSpec, Tweened};

    #[test]
    fn retarget_mid_flight_starts_from_current_value() {
        let mut value = Tweened::new(0.0);
        let linear = TransitionSpec::new(Duration::from_millis(100), Easing::Linear);
        value.retarget(100.0, linear);
        assert!(!value.advance(Duration::from_millis(50)));
        assert!((value.current() - 50.0).abs() < 1e-9);

        value.retarget(0.0, linear);
        value.advance(Duration::from_millis(50));
        assert!((value.current() - 25.0).abs() < 1e-9);
        assert!(value.advance(Duration::from_millis(60)));
        assert_eq!(*value.current(), 0.0);
    }

    #[test]
    fn easing_endpoints_are_fixed() {
        for easing in [
            Easing::Linear,
            Easing::QuadInOut,
            Easing::CubicInOut,
            Easing::CubicOut,
        ] {
            assert_eq!(easing.apply(0.0), 0.0);
            assert_eq!(easing.apply(1.0), 1.0);
        }
    }
}
