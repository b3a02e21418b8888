/// Pure helper functions shared by the simulation and the renderer.
///
/// Nothing here touches game state; every function maps plain values to
/// plain values so the arithmetic can be tested on its own.

use crate::entities::Point;

/// Scene origin on the canvas: the floor line sits 150px down.
pub const SCENE_ORIGIN: Point = Point { x: 0.0, y: 150.0 };

/// Distance from Norman's centre at which spells appear.
pub const CAST_RADIUS: f64 = 12.0;

// ── Angles & casting ─────────────────────────────────────────────────────────

/// Angle of the vector from `p1` to `p2`, in radians.
pub fn angle_between_points(p1: Point, p2: Point) -> f64 {
    (p2.y - p1.y).atan2(p2.x - p1.x)
}

/// Point `CAST_RADIUS` away from `center` in the direction of `angle`.
pub fn casting_point(center: Point, angle: f64) -> Point {
    Point::new(
        center.x + angle.cos() * CAST_RADIUS,
        center.y + angle.sin() * CAST_RADIUS,
    )
}

/// Launch angles for a cast of `shots` spells fanned evenly around `target`.
pub fn shot_angles(target: f64, shots: u32, spread: f64) -> Vec<f64> {
    let middle = (shots.max(1) - 1) as f64 / 2.0;
    (0..shots.max(1))
        .map(|i| target + (i as f64 - middle) * spread)
        .collect()
}

// ── Screen ↔ scene ───────────────────────────────────────────────────────────

/// Where the canvas is displayed, in the host's own units (terminal cells,
/// CSS pixels, ...).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Map a host pointer position to scene coordinates.
///
/// The host position is scaled into canvas pixels by the ratio between the
/// canvas backing store and its displayed size, truncated to whole pixels,
/// then the vertical axis is flipped around the scene origin.
pub fn screen_to_scene(
    x: f64,
    y: f64,
    rect: ScreenRect,
    canvas: (i32, i32),
    origin: Point,
) -> Point {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return Point::new(-origin.x, origin.y);
    }
    let sx = ((x - rect.x) * (canvas.0 as f64 / rect.width)).trunc();
    let sy = ((y - rect.y) * (canvas.1 as f64 / rect.height)).trunc();
    Point::new(sx - origin.x, origin.y - sy)
}

/// Inverse of `screen_to_scene`, without the truncation.
pub fn scene_to_screen(p: Point, rect: ScreenRect, canvas: (i32, i32), origin: Point) -> Point {
    let sx = p.x + origin.x;
    let sy = origin.y - p.y;
    Point::new(
        rect.x + sx * (rect.width / canvas.0 as f64),
        rect.y + sy * (rect.height / canvas.1 as f64),
    )
}

// ── Presentation arithmetic ──────────────────────────────────────────────────

/// Frame of a `len`-frame sequence to show at `progress` (0..1).
/// Progress at or past 1 shows the last frame.
pub fn particle_frame(progress: f64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let index = (progress.max(0.0) * len as f64) as usize;
    Some(index.min(len - 1))
}

/// Cursor after moving `delta` from `index` in a list of `len` items.
/// Moving past either end leaves the cursor on the end.
pub fn step_index(index: usize, delta: i32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as i64 + delta as i64).clamp(0, len as i64 - 1) as usize
}

/// Horizontal position of cloud layer `layer`.  Each layer drifts at its own
/// speed and wraps around the stage with a 30px margin on either side.
pub fn cloud_x(layer: usize, offset: f64, stage_width: f64) -> f64 {
    let speed = 20.0 + layer as f64 * 10.0;
    ((layer as f64 * 80.0 + offset * speed) % (stage_width + 60.0)) - 30.0
}

/// Width of the shrinking resurrect panel.
pub fn cooldown_panel_width(progress: f64) -> i32 {
    (52.0 * (1.0 - progress.clamp(0.0, 1.0))) as i32
}

/// Whole seconds left on a cooldown.
pub fn cooldown_seconds(progress: f64, cooldown: f64) -> i64 {
    ((1.0 - progress.clamp(0.0, 1.0)) * cooldown / 1000.0) as i64
}

/// Leftmost x of a centred row of `count` orbs, each 4px apart.
pub fn orb_row_start(center_x: f64, count: i32) -> f64 {
    center_x - (count as f64 * 4.0) / 2.0
}

/// Souls paid for a kill.
pub fn soul_payout(base: u32, multiplier: f64, doubled: bool) -> u32 {
    let paid = (base as f64 * (1.0 + multiplier)).round() as u32;
    if doubled {
        paid * 2
    } else {
        paid
    }
}

/// HUD text for a streak multiplier, e.g. `(+30%)`; empty without a bonus.
pub fn streak_suffix(multiplier: f64) -> String {
    if multiplier > 0.0 {
        format!("(+{:.0}%)", multiplier * 100.0)
    } else {
        String::new()
    }
}
