// Copyright (c) 2026 rezky_nightky

//! Static scene layout: the tree line and the star field.

use rand::Rng;

use crate::surface::Viewport;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tree {
    pub x: f32,
    pub width: f32,
    pub height: f32,
    /// 0 is far away, 1 is up front.
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    /// Normalized size in `0..1`.
    pub size: f32,
}

/// Share of the viewport height the star field occupies, from the top.
pub const STAR_BAND: f32 = 0.6;
/// Stars at or below this normalized size are not part of the field.
pub const STAR_MIN_SIZE: f32 = 0.7;

const STAR_X_PRIME: u64 = 7919;
const STAR_Y_PRIME: u64 = 4271;
const STAR_SIZE_PRIME: u64 = 2731;

/// Random trees sorted farthest-first, which is also their paint order.
pub fn generate_trees<R: Rng + ?Sized>(rng: &mut R, count: usize, viewport: Viewport) -> Vec<Tree> {
    let mut trees: Vec<Tree> = (0..count)
        .map(|_| Tree {
            x: rng.random_range(0.0..viewport.width()),
            width: rng.random_range(20.0..60.0),
            height: rng.random_range(200.0..600.0),
            depth: rng.random_range(0.0..1.0),
        })
        .collect();
    trees.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    trees
}

/// Star positions from a fixed prime-stride pattern. Same arguments, same
/// stars; nothing needs to be stored between frames.
pub fn generate_stars(count: usize, viewport: Viewport) -> Vec<Star> {
    let w = viewport.width() as f64;
    let band = (viewport.height() * STAR_BAND) as f64;

    (0..count as u64)
        .filter_map(|i| {
            let size = ((i * STAR_SIZE_PRIME) % 100) as f32 / 100.0;
            if size <= STAR_MIN_SIZE {
                return None;
            }
            Some(Star {
                x: ((i * STAR_X_PRIME) as f64 % w) as f32,
                y: ((i * STAR_Y_PRIME) as f64 % band) as f32,
                size,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;

    #[test]
    fn trees_are_sorted_farthest_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let trees = generate_trees(&mut rng, 80, Viewport::new(1280.0, 720.0));
        assert_eq!(trees.len(), 80);
        for pair in trees.windows(2) {
            assert!(pair[0].depth >= pair[1].depth);
        }
    }

    #[test]
    fn tree_attributes_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(99);
        let vp = Viewport::new(640.0, 480.0);
        for t in generate_trees(&mut rng, 500, vp) {
            assert!((0.0..640.0).contains(&t.x));
            assert!((20.0..60.0).contains(&t.width));
            assert!((200.0..600.0).contains(&t.height));
            assert!((0.0..1.0).contains(&t.depth));
        }
    }

    #[test]
    fn same_seed_same_forest() {
        let vp = Viewport::new(800.0, 600.0);
        let a = generate_trees(&mut StdRng::seed_from_u64(3), 20, vp);
        let b = generate_trees(&mut StdRng::seed_from_u64(3), 20, vp);
        assert_eq!(a, b);
    }

    #[test]
    fn stars_are_reproducible() {
        let vp = Viewport::new(1920.0, 1080.0);
        assert_eq!(generate_stars(150, vp), generate_stars(150, vp));
    }

    #[test]
    fn stars_are_sparse_and_inside_the_band() {
        let vp = Viewport::new(1920.0, 1080.0);
        let stars = generate_stars(150, vp);
        assert!(!stars.is_empty());
        assert!(stars.len() < 150);
        for s in &stars {
            assert!(s.size > STAR_MIN_SIZE);
            assert!((0.0..1920.0).contains(&s.x));
            assert!((0.0..1080.0 * STAR_BAND).contains(&s.y));
        }
    }

    #[test]
    fn star_pattern_matches_the_prime_strides() {
        // i = 1: size 2731 % 100 = 31 -> dropped; i = 3: 8193 % 100 = 93 -> kept
        let stars = generate_stars(4, Viewport::new(1000.0, 1000.0));
        assert_eq!(stars.len(), 1);
        assert_eq!(stars[0].x, (3.0 * 7919.0) % 1000.0);
        assert_eq!(stars[0].y, (3.0 * 4271.0) % 600.0);
        assert_eq!(stars[0].size, 0.93);
    }
}
