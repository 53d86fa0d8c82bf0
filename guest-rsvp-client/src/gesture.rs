//! Shake detection for the cosmetic "broken page" effect.
//!
//! Pure state machine: callers feed samples with their own millisecond
//! timestamps and ask whether the page is shaking at a given instant.

use core::str::FromStr;

pub const DEFAULT_MOTION_THRESHOLD: f64 = 20.0;
/// Pixels per millisecond.
pub const POINTER_SPEED_THRESHOLD: f64 = 3.0;
/// Touch screens trigger a little earlier than mice.
pub const TOUCH_SPEED_THRESHOLD: f64 = 2.0;
/// How long a shake stays visible after the last triggering sample.
pub const SHAKE_HOLD_MS: u64 = 5000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSample {
    /// Acceleration including gravity.
    Motion { x: f64, y: f64, z: f64, at_ms: u64 },
    Pointer { x: f64, y: f64, at_ms: u64 },
    Touch { x: f64, y: f64, at_ms: u64 },
}

impl GestureSample {
    #[must_use]
    pub const fn at_ms(&self) -> u64 {
        match *self {
            Self::Motion { at_ms, .. } | Self::Pointer { at_ms, .. } | Self::Touch { at_ms, .. } => {
                at_ms
            }
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum GestureParseError {
    #[error("unknown sample kind `{0}`, expected motion, pointer or touch")]
    Kind(String),
    #[error("expected {expected} values after `{kind}`, got {got}")]
    Arity {
        kind: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("`{0}` is not a number")]
    Number(String),
}

fn number<T: FromStr>(token: &str) -> Result<T, GestureParseError> {
    token
        .parse()
        .map_err(|_| GestureParseError::Number(token.to_owned()))
}

/// `motion <x> <y> <z> <t_ms>`, `pointer <x> <y> <t_ms>` or `touch <x> <y> <t_ms>`.
impl FromStr for GestureSample {
    type Err = GestureParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_whitespace();
        let kind = tokens.next().unwrap_or_default();
        let values: Vec<&str> = tokens.collect();
        let (kind, expected): (&'static str, usize) = match kind {
            "motion" => ("motion", 4),
            "pointer" => ("pointer", 3),
            "touch" => ("touch", 3),
            other => return Err(GestureParseError::Kind(other.to_owned())),
        };
        if values.len() != expected {
            return Err(GestureParseError::Arity {
                kind,
                expected,
                got: values.len(),
            });
        }
        Ok(match kind {
            "motion" => Self::Motion {
                x: number(values[0])?,
                y: number(values[1])?,
                z: number(values[2])?,
                at_ms: number(values[3])?,
            },
            "pointer" => Self::Pointer {
                x: number(values[0])?,
                y: number(values[1])?,
                at_ms: number(values[2])?,
            },
            _ => Self::Touch {
                x: number(values[0])?,
                y: number(values[1])?,
                at_ms: number(values[2])?,
            },
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Position {
    x: f64,
    y: f64,
    at_ms: u64,
}

impl Position {
    /// `None` while no time has passed since the previous sample.
    #[allow(clippy::cast_precision_loss, reason = "millisecond deltas stay far below 2^52")]
    fn speed_to(&self, next: &Self) -> Option<f64> {
        let elapsed = next.at_ms.checked_sub(self.at_ms).filter(|dt| *dt > 0)?;
        Some(((next.x - self.x).abs() + (next.y - self.y).abs()) / elapsed as f64)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShakeDetector {
    motion_threshold: f64,
    last_pointer: Option<Position>,
    last_touch: Option<Position>,
    shaking_until: Option<u64>,
}

impl Default for ShakeDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MOTION_THRESHOLD)
    }
}

impl ShakeDetector {
    #[must_use]
    pub const fn new(motion_threshold: f64) -> Self {
        Self {
            motion_threshold,
            last_pointer: None,
            last_touch: None,
            shaking_until: None,
        }
    }

    /// Feeds one sample and reports whether the page shakes right after it.
    pub fn observe(&mut self, sample: GestureSample) -> bool {
        let at_ms = sample.at_ms();
        let triggered = match sample {
            GestureSample::Motion { x, y, z, .. } => x.abs() + y.abs() + z.abs() > self.motion_threshold,
            GestureSample::Pointer { x, y, at_ms } => {
                exceeds(&mut self.last_pointer, Position { x, y, at_ms }, POINTER_SPEED_THRESHOLD)
            }
            GestureSample::Touch { x, y, at_ms } => {
                exceeds(&mut self.last_touch, Position { x, y, at_ms }, TOUCH_SPEED_THRESHOLD)
            }
        };
        if triggered {
            self.shaking_until = Some(at_ms.saturating_add(SHAKE_HOLD_MS));
        }
        self.is_shaking(at_ms)
    }

    #[must_use]
    pub fn is_shaking(&self, now_ms: u64) -> bool {
        self.shaking_until.is_some_and(|until| now_ms < until)
    }
}

/// Replaces the baseline with `next` and compares the speed between them.
fn exceeds(baseline: &mut Option<Position>, next: Position, threshold: f64) -> bool {
    let speed = baseline.replace(next).and_then(|previous| previous.speed_to(&next));
    speed.is_some_and(|speed| speed > threshold)
}

/// Once a shake is seen with the experimental flag on, the page stays
/// "broken" until the flag is switched off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EasterEgg {
    broken: bool,
}

impl EasterEgg {
    pub fn update(&mut self, shaking: bool, experimental: bool) -> bool {
        if !experimental {
            self.broken = false;
        } else if shaking {
            self.broken = true;
        }
        self.broken
    }

    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.broken
    }
}
