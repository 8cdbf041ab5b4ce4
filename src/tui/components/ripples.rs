//! Decorative water-ripple background for the entry form.
//!
//! Stateless: every frame is a pure function of the time since start-up, so
//! the widget needs no timers and holds nothing between frames. A ripple is
//! born every [`SPAWN_INTERVAL`] at a pseudo-random spot and expands for
//! [`LIFETIME`] before disappearing.

use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;

pub const SPAWN_INTERVAL: Duration = Duration::from_secs(3);
pub const LIFETIME: Duration = Duration::from_secs(2);

/// Radius (in rows) a ripple reaches at the end of its life.
const MAX_RADIUS: f64 = 6.0;
/// Terminal cells are roughly twice as tall as wide.
const ASPECT: f64 = 2.0;

pub struct Ripples {
    pub elapsed: Duration,
}

/// A ripple alive at some instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    pub index: u64,
    /// Position as fractions of the area (0.0..1.0).
    pub x: f64,
    pub y: f64,
    /// 0.0 at birth, 1.0 at death.
    pub progress: f64,
}

impl Ripples {
    pub fn new(elapsed: Duration) -> Self {
        Self { elapsed }
    }

    /// The ripple visible at this instant, if any. The first one appears one
    /// interval after start-up.
    pub fn active(&self) -> Option<Ripple> {
        let interval = SPAWN_INTERVAL.as_millis();
        let now = self.elapsed.as_millis();
        let index = now / interval;
        if index == 0 {
            return None;
        }
        let age = now % interval;
        if age >= LIFETIME.as_millis() {
            return None;
        }
        let index = u64::try_from(index).ok()?;
        let h = mix(index);
        Some(Ripple {
            index,
            x: unit(h),
            y: unit(h >> 32),
            progress: age as f64 / LIFETIME.as_millis() as f64,
        })
    }
}

/// splitmix64 finalizer: spreads consecutive indices over the whole range.
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit(bits: u64) -> f64 {
    (bits & 0xFFFF) as f64 / 65_536.0
}

impl Widget for Ripples {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(ripple) = self.active() else {
            return;
        };
        if area.is_empty() {
            return;
        }

        let cx = area.x as f64 + ripple.x * area.width as f64;
        let cy = area.y as f64 + ripple.y * area.height as f64;
        let radius = ripple.progress * MAX_RADIUS;

        let mut style = Style::default().fg(Color::Cyan);
        if ripple.progress > 0.5 {
            style = style.add_modifier(Modifier::DIM);
        }

        // Enough samples that the ring has no gaps at full size
        let steps = 64;
        for step in 0..steps {
            let angle = step as f64 / steps as f64 * std::f64::consts::TAU;
            let x = (cx + radius * ASPECT * angle.cos()).round();
            let y = (cy + radius * angle.sin()).round();
            if x < area.left() as f64
                || x >= area.right() as f64
                || y < area.top() as f64
                || y >= area.bottom() as f64
            {
                continue;
            }
            if let Some(cell) = buf.cell_mut((x as u16, y as u16)) {
                cell.set_symbol("·").set_style(style);
            }
        }
    }
}
