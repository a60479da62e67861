//! Target formations for every mode.

use std::f32::consts::{PI, TAU};
use std::fmt;
use std::ops::Range;

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::simulation::{random_unit, Quat, Vec3};

/// Every formation / interactive mode the swarm knows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Sphere,
    Love,
    Nature,
    Cosmos,
    Vortex,
    Festive,
    Fireball,
    Thunder,
    Tornado,
    Saturn,
    Water,
    Snake,
    TicTacToe,
    Memory,
    BalloonPop,
    FogReveal,
}

impl Mode {
    /// Cycle order used by the front end
    pub const ALL: [Mode; 16] = [
        Mode::Sphere,
        Mode::Love,
        Mode::Nature,
        Mode::Cosmos,
        Mode::Vortex,
        Mode::Festive,
        Mode::Fireball,
        Mode::Thunder,
        Mode::Tornado,
        Mode::Saturn,
        Mode::Water,
        Mode::Snake,
        Mode::TicTacToe,
        Mode::Memory,
        Mode::BalloonPop,
        Mode::FogReveal,
    ];

    /// Resolve a mode name; unknown names fall back to the sphere
    pub fn from_name(name: &str) -> Mode {
        let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match key.as_str() {
            "sphere" | "idle" => Mode::Sphere,
            "love" | "hearts" | "heart" => Mode::Love,
            "nature" | "flowers" | "flower" => Mode::Nature,
            "cosmos" | "galaxy" => Mode::Cosmos,
            "vortex" => Mode::Vortex,
            "festive" | "fireworks" => Mode::Festive,
            "fireball" => Mode::Fireball,
            "thunder" | "lightning" => Mode::Thunder,
            "tornado" | "wind" => Mode::Tornado,
            "saturn" => Mode::Saturn,
            "water" => Mode::Water,
            "snake" => Mode::Snake,
            "tic_tac_toe" | "tictactoe" => Mode::TicTacToe,
            "memory" => Mode::Memory,
            "balloon_pop" | "balloon" | "balloons" => Mode::BalloonPop,
            "fog_reveal" | "fog" | "magic_reveal" | "spelling" => Mode::FogReveal,
            _ => {
                warn!("Unknown mode '{}', falling back to sphere", name);
                Mode::Sphere
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Sphere => "sphere",
            Mode::Love => "love",
            Mode::Nature => "nature",
            Mode::Cosmos => "cosmos",
            Mode::Vortex => "vortex",
            Mode::Festive => "festive",
            Mode::Fireball => "fireball",
            Mode::Thunder => "thunder",
            Mode::Tornado => "tornado",
            Mode::Saturn => "saturn",
            Mode::Water => "water",
            Mode::Snake => "snake",
            Mode::TicTacToe => "tic_tac_toe",
            Mode::Memory => "memory",
            Mode::BalloonPop => "balloon_pop",
            Mode::FogReveal => "fog_reveal",
        }
    }

    /// Modes with their own state machine
    pub fn is_game(self) -> bool {
        matches!(
            self,
            Mode::Snake | Mode::TicTacToe | Mode::Memory | Mode::BalloonPop | Mode::FogReveal
        )
    }

    /// Next mode in `ALL`, wrapping
    pub fn next(self) -> Mode {
        let i = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[(i + 1) % Mode::ALL.len()]
    }

    pub fn previous(self) -> Mode {
        let i = Mode::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Mode::ALL[(i + Mode::ALL.len() - 1) % Mode::ALL.len()]
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Target points for `mode`; `None` seeds from entropy
pub fn generate(mode: Mode, count: usize, seed: Option<u64>) -> Vec<Vec3> {
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    generate_with(mode, count, &mut rng)
}

/// Target points for `mode` drawn from a caller-owned generator
pub fn generate_with<R: Rng>(mode: Mode, count: usize, rng: &mut R) -> Vec<Vec3> {
    match mode {
        Mode::Sphere => (0..count).map(|_| random_unit(rng) * 5.0).collect(),
        Mode::Love => (0..count).map(|_| heart_point(rng)).collect(),
        Mode::Nature => (0..count).map(|i| flower_point(i, count, rng)).collect(),
        Mode::Cosmos | Mode::Vortex => (0..count).map(|_| galaxy_point(rng)).collect(),
        Mode::Festive => (0..count).map(|i| festive_point(i, count, rng)).collect(),
        Mode::Fireball => (0..count).map(|_| fireball_point(rng)).collect(),
        Mode::Thunder => (0..count).map(|i| bolt_point(i, rng)).collect(),
        Mode::Tornado => (0..count).map(|_| funnel_point(rng)).collect(),
        Mode::Saturn => (0..count).map(|i| saturn_point(i, count, rng)).collect(),
        Mode::Water => (0..count).map(|_| wave_point(rng)).collect(),
        Mode::Snake => (0..count).map(|i| snake_point(i, count)).collect(),
        Mode::TicTacToe => board_points(count, rng),
        Mode::Memory => (0..count).map(|i| card_point(i, rng)).collect(),
        Mode::BalloonPop => balloon_points(&balloon_layout(1), count, rng),
        Mode::FogReveal => glyph_points(FOG_GLYPHS[0], count, rng),
    }
}

/// Uniform point inside a ball (cube-root radius)
pub fn point_in_ball<R: Rng>(radius: f32, rng: &mut R) -> Vec3 {
    random_unit(rng) * (radius * rng.gen::<f32>().cbrt())
}

fn centered<R: Rng>(rng: &mut R) -> f32 {
    rng.gen::<f32>() - 0.5
}

// ============================================
// Shape formations
// ============================================

fn heart_point<R: Rng>(rng: &mut R) -> Vec3 {
    let t = rng.gen::<f32>() * TAU;
    let x = 16.0 * t.sin().powi(3);
    let y = 13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos();
    // Thicker near the middle of the curve, thin at the tips
    let spread = 1.0 - rng.gen::<f32>().powi(6);
    Vec3::new(x, y, centered(rng) * 5.0 * spread) * 0.3 + point_in_ball(0.2, rng)
}

fn flower_point<R: Rng>(i: usize, count: usize, rng: &mut R) -> Vec3 {
    const GOLDEN_ANGLE: f32 = 137.508 * PI / 180.0;
    let theta = i as f32 * GOLDEN_ANGLE;
    let fill = (i as f32 / count.max(1) as f32).sqrt();
    let petal = 0.55 + 0.45 * (2.5 * theta).cos().abs();
    let r = 6.0 * fill * petal;
    Vec3::new(
        r * theta.cos(),
        r * theta.sin(),
        r * r * 0.06 + centered(rng) * 0.2,
    )
}

fn galaxy_point<R: Rng>(rng: &mut R) -> Vec3 {
    let radius = rng.gen::<f32>() * 8.0;
    let angle = rng.gen::<f32>() * TAU + radius * 3.5;
    Vec3::new(
        angle.cos() * radius,
        centered(rng) * (1.0 - radius / 8.0) * 4.0,
        angle.sin() * radius,
    )
}

fn festive_point<R: Rng>(i: usize, count: usize, rng: &mut R) -> Vec3 {
    let burst = (i * 5 / count.max(1)).min(4);
    let angle = burst as f32 / 5.0 * TAU;
    Vec3::new(angle.cos() * 6.0, angle.sin() * 6.0, 0.0) + point_in_ball(4.0, rng) * 0.6
}

fn fireball_point<R: Rng>(rng: &mut R) -> Vec3 {
    let shell = random_unit(rng) * (3.0 + rng.gen::<f32>());
    let twist = shell.y * 0.5;
    Vec3::new(
        shell.x * twist.cos() - shell.z * twist.sin(),
        shell.y,
        shell.x * twist.sin() + shell.z * twist.cos(),
    )
}

fn bolt_point<R: Rng>(i: usize, rng: &mut R) -> Vec3 {
    let bolt = (i % 5) as f32;
    let t = rng.gen::<f32>();
    // Triangle wave along the bolt, phase shifted per bolt
    let phase = t * 7.0 + bolt * 0.37;
    let zig = (phase.fract() * 2.0 - 1.0).abs() * 2.0 - 1.0;
    Vec3::new(
        (bolt - 2.0) * 3.0 + zig * 0.8 + centered(rng) * 0.3,
        6.0 - t * 12.0,
        centered(rng) * 0.6,
    )
}

fn funnel_point<R: Rng>(rng: &mut R) -> Vec3 {
    let t = rng.gen::<f32>();
    let radius = 0.5 + t * 4.0;
    let angle = t * 20.0 + rng.gen::<f32>() * TAU;
    Vec3::new(angle.cos() * radius, -5.0 + t * 10.0, angle.sin() * radius)
}

fn saturn_point<R: Rng>(i: usize, count: usize, rng: &mut R) -> Vec3 {
    if i * 5 < count * 2 {
        return point_in_ball(2.5, rng);
    }
    let angle = rng.gen::<f32>() * TAU;
    let radius = 3.5 + rng.gen::<f32>() * 3.5;
    let ring = Vec3::new(angle.cos() * radius, centered(rng) * 0.1, angle.sin() * radius);
    Quat::from_axis_angle(Vec3::new(1.0, 0.0, 1.0).normalize(), 0.4) * ring
}

fn wave_point<R: Rng>(rng: &mut R) -> Vec3 {
    let x = centered(rng) * 12.0;
    let z = centered(rng) * 6.0;
    Vec3::new(x, (x * 0.8).sin() * (z * 0.8).cos() * 1.5, z)
}

fn snake_point(i: usize, count: usize) -> Vec3 {
    let s = i as f32 / count.max(1) as f32;
    Vec3::new(s * 20.0 - 10.0, (s * 10.0).sin() * 2.0, 0.0)
}

// ============================================
// Tic-tac-toe board
// ============================================

/// Share of board particles drawing the grid lines
const BOARD_LINE_SHARE: usize = 55;

/// Spacing between cell centers (lines sit halfway between)
pub const BOARD_CELL_SIZE: f32 = 4.0;

/// World center of cell 0..9 (row-major, top-left first)
pub fn board_cell_center(cell: usize) -> Vec3 {
    let col = (cell % 3) as f32;
    let row = (cell / 3) as f32;
    Vec3::new(
        (col - 1.0) * BOARD_CELL_SIZE,
        (1.0 - row) * BOARD_CELL_SIZE,
        0.0,
    )
}

/// Cell under a world point, `None` outside the board
pub fn board_cell_at(point: Vec3) -> Option<usize> {
    let half = BOARD_CELL_SIZE * 1.5;
    if point.x.abs() > half || point.y.abs() > half {
        return None;
    }
    let axis = |v: f32| {
        if v < -BOARD_CELL_SIZE / 2.0 {
            0
        } else if v > BOARD_CELL_SIZE / 2.0 {
            2
        } else {
            1
        }
    };
    let col = axis(point.x);
    let row = 2 - axis(point.y);
    Some(row * 3 + col)
}

/// Particles `0..line_count` draw the grid; the rest form one reserve per cell
pub fn board_mark_groups(count: usize) -> (Range<usize>, [Range<usize>; 9]) {
    let lines = count * BOARD_LINE_SHARE / 100;
    let per_cell = (count - lines) / 9;
    let groups = std::array::from_fn(|cell| {
        let start = lines + cell * per_cell;
        let end = if cell == 8 { count } else { start + per_cell };
        start..end
    });
    (0..lines, groups)
}

/// Parked position of a cell's reserve particles (dim, behind the board)
pub fn board_reserve_point<R: Rng>(cell: usize, rng: &mut R) -> Vec3 {
    board_cell_center(cell) + Vec3::new(0.0, 0.0, -3.0) + point_in_ball(0.4, rng)
}

fn board_points<R: Rng>(count: usize, rng: &mut R) -> Vec<Vec3> {
    let (lines, groups) = board_mark_groups(count);
    let edge = BOARD_CELL_SIZE / 2.0;
    let mut points = Vec::with_capacity(count);
    for i in lines {
        let along = centered(rng) * 10.0;
        let side = if i % 2 == 0 { -edge } else { edge };
        let p = if (i / 2) % 2 == 0 {
            Vec3::new(side, along, 0.0)
        } else {
            Vec3::new(along, side, 0.0)
        };
        points.push(p + Vec3::new(0.0, 0.0, centered(rng) * 0.5));
    }
    for (cell, group) in groups.into_iter().enumerate() {
        for _ in group {
            points.push(board_reserve_point(cell, rng));
        }
    }
    points
}

// ============================================
// Memory cards
// ============================================

pub const MEMORY_CARDS: usize = 12;

/// Card half extents
pub const CARD_HALF_WIDTH: f32 = 1.2;
pub const CARD_HALF_HEIGHT: f32 = 1.5;

/// Card owning particle `index` (cards interleave)
pub fn memory_card_of(index: usize) -> usize {
    index % MEMORY_CARDS
}

/// Center of card 0..12 on the 4x3 grid
pub fn memory_card_center(card: usize) -> Vec3 {
    let col = (card % 4) as f32;
    let row = (card / 4) as f32;
    Vec3::new((col - 1.5) * 3.5, (row - 1.0) * 3.5, 0.0)
}

/// Card under a world point, if any
pub fn memory_card_at(point: Vec3) -> Option<usize> {
    (0..MEMORY_CARDS).find(|&card| {
        let c = memory_card_center(card);
        (point.x - c.x).abs() <= CARD_HALF_WIDTH && (point.y - c.y).abs() <= CARD_HALF_HEIGHT
    })
}

fn card_point<R: Rng>(i: usize, rng: &mut R) -> Vec3 {
    memory_card_center(memory_card_of(i))
        + Vec3::new(
            centered(rng) * 2.0 * CARD_HALF_WIDTH,
            centered(rng) * 2.0 * CARD_HALF_HEIGHT,
            0.0,
        )
}

// ============================================
// Balloons
// ============================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Balloon {
    pub center: Vec3,
    pub radius: f32,
}

/// Balloons for `level` (one balloon per level, at least one)
pub fn balloon_layout(level: u32) -> Vec<Balloon> {
    let n = level.max(1) as usize;
    let spacing = 4.4;
    (0..n)
        .map(|k| {
            let x = (k as f32 - (n - 1) as f32 / 2.0) * spacing;
            let y = if n > 1 { (k as f32 * 1.7).sin() * 1.5 } else { 0.0 };
            Balloon {
                center: Vec3::new(x, y, 0.0),
                radius: 1.6,
            }
        })
        .collect()
}

/// Equal particle slice owned by balloon `k` of `n`
pub fn balloon_slice(k: usize, n: usize, count: usize) -> Range<usize> {
    let n = n.max(1);
    (k * count / n)..((k + 1) * count / n)
}

pub fn balloon_points<R: Rng>(layout: &[Balloon], count: usize, rng: &mut R) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(count);
    for (k, balloon) in layout.iter().enumerate() {
        for _ in balloon_slice(k, layout.len(), count) {
            let shell = 0.85 + rng.gen::<f32>() * 0.15;
            points.push(balloon.center + random_unit(rng) * (balloon.radius * shell));
        }
    }
    if layout.is_empty() {
        points.extend((0..count).map(|_| point_in_ball(2.0, rng)));
    }
    points
}

// ============================================
// Glyphs
// ============================================

/// Glyph sequence for the fog reveal game
pub const FOG_GLYPHS: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R',
    'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

const GLYPH_COLS: usize = 5;
const GLYPH_ROWS: usize = 7;

/// Raster pixels per font pixel along each axis
const GLYPH_UPSCALE: usize = 6;

/// World height of a rendered glyph
const GLYPH_HEIGHT: f32 = 9.0;

/// 5x7 bitmap rows (bit 4 = leftmost column)
fn glyph_rows(ch: char) -> Option<[u8; GLYPH_ROWS]> {
    let rows = match ch.to_ascii_uppercase() {
        'A' => [0x0E, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'C' => [0x0E, 0x11, 0x10, 0x10, 0x10, 0x11, 0x0E],
        'D' => [0x1E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1E],
        'E' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x1F],
        'F' => [0x1F, 0x10, 0x10, 0x1E, 0x10, 0x10, 0x10],
        'G' => [0x0E, 0x11, 0x10, 0x17, 0x11, 0x11, 0x0F],
        'H' => [0x11, 0x11, 0x11, 0x1F, 0x11, 0x11, 0x11],
        'I' => [0x0E, 0x04, 0x04, 0x04, 0x04, 0x04, 0x0E],
        'J' => [0x07, 0x02, 0x02, 0x02, 0x02, 0x12, 0x0C],
        'K' => [0x11, 0x12, 0x14, 0x18, 0x14, 0x12, 0x11],
        'L' => [0x10, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1F],
        'M' => [0x11, 0x1B, 0x15, 0x15, 0x11, 0x11, 0x11],
        'N' => [0x11, 0x11, 0x19, 0x15, 0x13, 0x11, 0x11],
        'O' => [0x0E, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'P' => [0x1E, 0x11, 0x11, 0x1E, 0x10, 0x10, 0x10],
        'Q' => [0x0E, 0x11, 0x11, 0x11, 0x15, 0x12, 0x0D],
        'R' => [0x1E, 0x11, 0x11, 0x1E, 0x14, 0x12, 0x11],
        'S' => [0x0F, 0x10, 0x10, 0x0E, 0x01, 0x01, 0x1E],
        'T' => [0x1F, 0x04, 0x04, 0x04, 0x04, 0x04, 0x04],
        'U' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x0E],
        'V' => [0x11, 0x11, 0x11, 0x11, 0x11, 0x0A, 0x04],
        'W' => [0x11, 0x11, 0x11, 0x15, 0x15, 0x15, 0x0A],
        'X' => [0x11, 0x11, 0x0A, 0x04, 0x0A, 0x11, 0x11],
        'Y' => [0x11, 0x11, 0x11, 0x0A, 0x04, 0x04, 0x04],
        'Z' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x10, 0x1F],
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        _ => return None,
    };
    Some(rows)
}

/// Lit raster pixel centers of `ch` in world units, empty for unknown glyphs
pub fn glyph_raster(ch: char) -> Vec<(f32, f32)> {
    let Some(rows) = glyph_rows(ch) else {
        return Vec::new();
    };
    let width = GLYPH_COLS * GLYPH_UPSCALE;
    let height = GLYPH_ROWS * GLYPH_UPSCALE;
    let pixel = GLYPH_HEIGHT / height as f32;

    let mut lit = Vec::new();
    for ry in 0..height {
        let bits = rows[ry / GLYPH_UPSCALE];
        for rx in 0..width {
            let column = rx / GLYPH_UPSCALE;
            if bits & (0x10 >> column) != 0 {
                lit.push((
                    (rx as f32 + 0.5 - width as f32 / 2.0) * pixel,
                    (height as f32 / 2.0 - ry as f32 - 0.5) * pixel,
                ));
            }
        }
    }
    lit
}

/// Particle targets spelling `ch`; unknown glyphs collapse to a small ball
pub fn glyph_points<R: Rng>(ch: char, count: usize, rng: &mut R) -> Vec<Vec3> {
    let lit = glyph_raster(ch);
    if lit.is_empty() {
        return (0..count).map(|_| point_in_ball(2.0, rng)).collect();
    }
    (0..count)
        .map(|i| {
            let (x, y) = lit[i % lit.len()];
            Vec3::new(
                x + centered(rng) * 0.15,
                y + centered(rng) * 0.15,
                centered(rng) * 0.5,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mode_fills_count() {
        for mode in Mode::ALL {
            for count in [1, 997, 6000] {
                let points = generate(mode, count, Some(11));
                assert_eq!(points.len(), count, "{} with {}", mode, count);
                assert!(points.iter().all(|p| p.is_finite()), "{} produced NaN", mode);
            }
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        for mode in [Mode::Love, Mode::Saturn, Mode::TicTacToe, Mode::FogReveal] {
            assert_eq!(generate(mode, 500, Some(3)), generate(mode, 500, Some(3)));
        }
    }

    #[test]
    fn test_sphere_on_radius_five() {
        for p in generate(Mode::Sphere, 2000, Some(1)) {
            assert!((p.length() - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_mode_names_round_trip_and_fallback() {
        for mode in Mode::ALL {
            assert_eq!(Mode::from_name(mode.name()), mode);
        }
        assert_eq!(Mode::from_name("Tic-Tac-Toe"), Mode::TicTacToe);
        assert_eq!(Mode::from_name("magic_reveal"), Mode::FogReveal);
        assert_eq!(Mode::from_name("hyperspace"), Mode::Sphere);
        assert_eq!(Mode::FogReveal.next(), Mode::Sphere);
        assert_eq!(Mode::Sphere.previous(), Mode::FogReveal);
    }

    #[test]
    fn test_glyph_fallback_sphere() {
        let mut rng = StdRng::seed_from_u64(5);
        assert!(glyph_raster('#').is_empty());
        for p in glyph_points('#', 300, &mut rng) {
            assert!(p.length() <= 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_glyph_raster_shape() {
        // 'I' lights 3 + 5 + 3 font pixels across its rows
        let lit = glyph_raster('I');
        assert_eq!(lit.len(), 11 * GLYPH_UPSCALE * GLYPH_UPSCALE);
        let top = lit.iter().map(|p| p.1).fold(f32::MIN, f32::max);
        let bottom = lit.iter().map(|p| p.1).fold(f32::MAX, f32::min);
        assert!((top - bottom - (GLYPH_HEIGHT - GLYPH_HEIGHT / 42.0)).abs() < 1e-4);
        assert_eq!(glyph_raster('a'), glyph_raster('A'));
    }

    #[test]
    fn test_board_groups_partition_particles() {
        let (lines, groups) = board_mark_groups(6000);
        assert_eq!(lines, 0..3300);
        assert_eq!(groups[0].start, 3300);
        assert_eq!(groups[8].end, 6000);
        for pair in groups.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_board_cell_lookup() {
        for cell in 0..9 {
            assert_eq!(board_cell_at(board_cell_center(cell)), Some(cell));
        }
        assert_eq!(board_cell_at(Vec3::new(0.0, 0.0, 0.0)), Some(4));
        assert_eq!(board_cell_at(Vec3::new(-5.0, 5.0, 0.0)), Some(0));
        assert_eq!(board_cell_at(Vec3::new(9.0, 0.0, 0.0)), None);
    }

    #[test]
    fn test_memory_cards() {
        assert_eq!(memory_card_center(0), Vec3::new(-5.25, -3.5, 0.0));
        assert_eq!(memory_card_center(11), Vec3::new(5.25, 3.5, 0.0));
        for card in 0..MEMORY_CARDS {
            assert_eq!(memory_card_at(memory_card_center(card)), Some(card));
        }
        assert_eq!(memory_card_at(Vec3::new(0.0, 0.0, 0.0)), None);
        let points = generate(Mode::Memory, 1200, Some(2));
        for (i, p) in points.iter().enumerate() {
            let c = memory_card_center(memory_card_of(i));
            assert!((p.x - c.x).abs() <= CARD_HALF_WIDTH + 1e-4);
            assert!((p.y - c.y).abs() <= CARD_HALF_HEIGHT + 1e-4);
        }
    }

    #[test]
    fn test_balloon_slices_cover_count() {
        for level in 1..=5u32 {
            let layout = balloon_layout(level);
            assert_eq!(layout.len(), level as usize);
            let total: usize = (0..layout.len())
                .map(|k| balloon_slice(k, layout.len(), 6001).len())
                .sum();
            assert_eq!(total, 6001);
        }
    }
}
