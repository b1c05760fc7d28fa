//! Collision detection and response
//!
//! Two kinds of collision live here:
//! - Sliding: a moving hitbox against static obstacle rects, resolved one
//!   axis at a time so walls only cancel the blocked component of motion.
//! - Contact: sprite against sprite (bullet vs enemy, enemy vs player), rect
//!   overlap first, then per-pixel masks.

use glam::{IVec2, Vec2};

use super::geom::Rect;
use super::mask::Mask;

/// Axis a displacement is applied along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Move `hitbox` by `displacement`, stopping flush against any obstacle.
///
/// Horizontal motion is applied and resolved first, then vertical. Each axis
/// checks the whole span it travelled, so a long step cannot skip over a thin
/// wall. After this returns the hitbox overlaps no obstacle it was pushed into.
pub fn move_and_slide(hitbox: &mut Rect, displacement: Vec2, obstacles: &[Rect]) {
    let start = *hitbox;
    hitbox.pos.x += displacement.x;
    resolve_axis(hitbox, &start, Axis::Horizontal, displacement.x, obstacles);

    let start = *hitbox;
    hitbox.pos.y += displacement.y;
    resolve_axis(hitbox, &start, Axis::Vertical, displacement.y, obstacles);
}

/// Pull `hitbox` back against the direction of travel `motion` along `axis`
/// until it is clear of every obstacle it ran into.
///
/// `start` is where the hitbox was before the move. An obstacle counts when
/// the hitbox now overlaps it, or when it lies between `start` and the new
/// position. Zero motion never moves the hitbox, so re-running resolution
/// after the fact is a no-op.
pub fn resolve_axis(
    hitbox: &mut Rect,
    start: &Rect,
    axis: Axis,
    motion: f32,
    obstacles: &[Rect],
) {
    if motion == 0.0 {
        return;
    }
    for obstacle in obstacles {
        let path = start.union(hitbox);
        let crossed = obstacle.intersects(&path) && !obstacle.intersects(start);
        if !crossed && !obstacle.intersects(hitbox) {
            continue;
        }
        match axis {
            Axis::Horizontal => {
                if motion > 0.0 && obstacle.left() < hitbox.right() {
                    hitbox.set_right(obstacle.left());
                    // `edge - size + size` can round past the edge
                    while obstacle.intersects(hitbox) {
                        hitbox.pos.x = hitbox.pos.x.next_down();
                    }
                } else if motion < 0.0 && obstacle.right() > hitbox.left() {
                    hitbox.set_left(obstacle.right());
                }
            }
            Axis::Vertical => {
                if motion > 0.0 && obstacle.top() < hitbox.bottom() {
                    hitbox.set_bottom(obstacle.top());
                    while obstacle.intersects(hitbox) {
                        hitbox.pos.y = hitbox.pos.y.next_down();
                    }
                } else if motion < 0.0 && obstacle.bottom() > hitbox.top() {
                    hitbox.set_top(obstacle.bottom());
                }
            }
        }
    }
}

/// Whether `hitbox` overlaps any obstacle
pub fn overlaps_any(hitbox: &Rect, obstacles: &[Rect]) -> bool {
    obstacles.iter().any(|o| o.intersects(hitbox))
}

/// Precise contact test between two sprites.
///
/// Rects are the sprites' visual bounds in world space; masks are their
/// current frames. Mask pixels map 1:1 onto the rect starting at its
/// top-left corner, so offsets are rounded to whole pixels.
pub fn rects_collide_precise(a_rect: &Rect, a_mask: &Mask, b_rect: &Rect, b_mask: &Mask) -> bool {
    if !a_rect.intersects(b_rect) {
        return false;
    }
    let offset = (b_rect.pos - a_rect.pos).round();
    a_mask
        .overlap(b_mask, IVec2::new(offset.x as i32, offset.y as i32))
        .is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_moving_right_stops_flush_against_obstacle() {
        let wall = Rect::new(100.0, 0.0, 50.0, 200.0);
        let mut hitbox = Rect::new(60.0, 50.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(25.0, 0.0), &[wall]);
        assert_eq!(hitbox.right(), wall.left());
        assert_eq!(hitbox.top(), 50.0);
    }

    #[test]
    fn test_moving_left_stops_flush_against_obstacle() {
        let wall = Rect::new(0.0, 0.0, 50.0, 200.0);
        let mut hitbox = Rect::new(60.0, 50.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(-25.0, 0.0), &[wall]);
        assert_eq!(hitbox.left(), wall.right());
    }

    #[test]
    fn test_vertical_resolution() {
        let floor = Rect::new(0.0, 100.0, 300.0, 50.0);
        let ceiling = Rect::new(0.0, -50.0, 300.0, 50.0);
        let mut hitbox = Rect::new(10.0, 60.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(0.0, 20.0), &[floor, ceiling]);
        assert_eq!(hitbox.bottom(), floor.top());

        let mut hitbox = Rect::new(10.0, 10.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(0.0, -20.0), &[floor, ceiling]);
        assert_eq!(hitbox.top(), ceiling.bottom());
    }

    #[test]
    fn test_diagonal_into_wall_keeps_sliding() {
        // Wall to the right; moving down-right keeps the vertical component
        let wall = Rect::new(100.0, -1000.0, 50.0, 2000.0);
        let mut hitbox = Rect::new(60.0, 0.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(20.0, 20.0), &[wall]);
        assert_eq!(hitbox.right(), wall.left());
        assert_eq!(hitbox.top(), 20.0);
    }

    #[test]
    fn test_no_corner_snag_on_adjacent_tiles() {
        // Two floor tiles side by side; walking along them must not catch the seam
        let tiles = [
            Rect::new(0.0, 100.0, 64.0, 64.0),
            Rect::new(64.0, 100.0, 64.0, 64.0),
        ];
        let mut hitbox = Rect::new(30.0, 70.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(10.0, 5.0), &tiles);
        assert_eq!(hitbox.left(), 40.0);
        assert_eq!(hitbox.bottom(), 100.0);
    }

    #[test]
    fn test_long_step_cannot_skip_thin_wall() {
        // A 10 wide wall well inside one 125 unit step
        let wall = Rect::new(100.0, -500.0, 10.0, 1000.0);
        let mut hitbox = Rect::new(0.0, 0.0, 68.0, 38.0);
        move_and_slide(&mut hitbox, Vec2::new(125.0, 0.0), &[wall]);
        assert_eq!(hitbox.right(), wall.left());

        let mut hitbox = Rect::new(200.0, 0.0, 68.0, 38.0);
        move_and_slide(&mut hitbox, Vec2::new(-125.0, 0.0), &[wall]);
        assert_eq!(hitbox.left(), wall.right());

        let floor = Rect::new(-500.0, 100.0, 1000.0, 4.0);
        let mut hitbox = Rect::new(0.0, 0.0, 68.0, 38.0);
        move_and_slide(&mut hitbox, Vec2::new(0.0, 125.0), &[floor]);
        assert_eq!(hitbox.bottom(), floor.top());
    }

    #[test]
    fn test_long_step_stops_at_nearest_wall() {
        let near = Rect::new(100.0, -500.0, 4.0, 1000.0);
        let far = Rect::new(150.0, -500.0, 4.0, 1000.0);
        for obstacles in [[near, far], [far, near]] {
            let mut hitbox = Rect::new(0.0, 0.0, 30.0, 30.0);
            move_and_slide(&mut hitbox, Vec2::new(200.0, 0.0), &obstacles);
            assert_eq!(hitbox.right(), near.left());
        }
    }

    #[test]
    fn test_walking_out_of_an_overlap_is_not_pulled_back() {
        // Started overlapping the wall's right edge, moving away from it
        let wall = Rect::new(0.0, 0.0, 100.0, 100.0);
        let mut hitbox = Rect::new(90.0, 10.0, 30.0, 30.0);
        move_and_slide(&mut hitbox, Vec2::new(20.0, 0.0), &[wall]);
        assert_eq!(hitbox.left(), 110.0);
    }

    #[test]
    fn test_zero_obstacles_is_noop() {
        let mut hitbox = Rect::new(0.0, 0.0, 10.0, 10.0);
        move_and_slide(&mut hitbox, Vec2::new(3.0, 4.0), &[]);
        assert_eq!(hitbox.pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn test_precise_collision_rejects_hollow_overlap() {
        // L-shaped sprite: only the left column and bottom row are solid
        let mut alpha = vec![0u8; 100];
        for i in 0..10 {
            alpha[i * 10] = 255;
            alpha[90 + i] = 255;
        }
        let l_shape = Mask::from_alpha(10, 10, &alpha);
        let dot = Mask::filled(2, 2);
        let l_rect = Rect::new(0.0, 0.0, 10.0, 10.0);

        // Dot in the empty top-right corner: rects overlap, pixels do not
        let dot_rect = Rect::new(7.0, 1.0, 2.0, 2.0);
        assert!(l_rect.intersects(&dot_rect));
        assert!(!rects_collide_precise(&l_rect, &l_shape, &dot_rect, &dot));

        // Dot on the bottom row
        let dot_rect = Rect::new(5.0, 8.4, 2.0, 2.0);
        assert!(rects_collide_precise(&l_rect, &l_shape, &dot_rect, &dot));
    }

    #[test]
    fn test_precise_collision_needs_rect_overlap() {
        let a = Mask::filled(4, 4);
        let ra = Rect::new(0.0, 0.0, 4.0, 4.0);
        let rb = Rect::new(4.0, 0.0, 4.0, 4.0);
        assert!(!rects_collide_precise(&ra, &a, &rb, &a));
    }

    #[test]
    fn test_fractional_width_clears_wall_edge() {
        // Widths that do not survive `edge - w + w` exactly
        for i in 0..20_000u32 {
            let wall = Rect::new(1000.0 + i as f32 * 1.1371, -1000.0, 64.0, 2000.0);
            let width = i as f32 * 0.0173 + 0.1;
            let mut hitbox = Rect::new(wall.left() - width - 5.0, 0.0, width, 38.0);

            move_and_slide(&mut hitbox, Vec2::new(10.0, 0.0), &[wall]);
            assert!(!hitbox.intersects(&wall), "case {i} overlaps after clamp");
            assert!(hitbox.right() <= wall.left());

            move_and_slide(&mut hitbox, Vec2::new(0.0, 8.0), &[wall]);
            assert_eq!(hitbox.top(), 8.0, "case {i} lost its vertical motion");
        }
    }

    #[test]
    fn test_fractional_height_clears_floor_edge() {
        for i in 0..20_000u32 {
            let floor = Rect::new(-1000.0, 1000.0 + i as f32 * 1.1371, 2000.0, 64.0);
            let height = i as f32 * 0.0173 + 0.1;
            let mut hitbox = Rect::new(0.0, floor.top() - height - 5.0, 30.0, height);

            move_and_slide(&mut hitbox, Vec2::new(0.0, 10.0), &[floor]);
            assert!(!hitbox.intersects(&floor), "case {i} overlaps after clamp");
        }
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (-200i32..200, -200i32..200, 1i32..80, 1i32..80)
            .prop_map(|(x, y, w, h)| Rect::new(x as f32, y as f32, w as f32, h as f32))
    }

    proptest! {
        #[test]
        fn prop_zero_displacement_is_idempotent(
            hitbox in arb_rect(),
            obstacles in proptest::collection::vec(arb_rect(), 0..6),
        ) {
            let mut moved = hitbox;
            move_and_slide(&mut moved, Vec2::ZERO, &obstacles);
            prop_assert_eq!(moved, hitbox);
        }

        #[test]
        fn prop_resolution_settles(
            start in arb_rect(),
            dx in -40i32..40,
            dy in -40i32..40,
            obstacle in arb_rect(),
        ) {
            // Start clear of the single obstacle, then move into it
            prop_assume!(!start.intersects(&obstacle));
            let mut hitbox = start;
            move_and_slide(&mut hitbox, Vec2::new(dx as f32, dy as f32), &[obstacle]);
            prop_assert!(!hitbox.intersects(&obstacle));
            let settled = hitbox;
            // A second resolution pass with no motion leaves it in place
            move_and_slide(&mut hitbox, Vec2::ZERO, &[obstacle]);
            prop_assert_eq!(hitbox, settled);
        }

        #[test]
        fn prop_fractional_slide_never_overlaps(
            x in -300.0f32..300.0,
            y in -300.0f32..300.0,
            w in 0.1f32..90.0,
            h in 0.1f32..90.0,
            dx in -40.0f32..40.0,
            dy in -40.0f32..40.0,
            ox in -300.0f32..300.0,
            oy in -300.0f32..300.0,
            ow in 0.1f32..120.0,
            oh in 0.1f32..120.0,
        ) {
            let start = Rect::new(x, y, w, h);
            let obstacle = Rect::new(ox, oy, ow, oh);
            prop_assume!(!start.intersects(&obstacle));
            let mut hitbox = start;
            move_and_slide(&mut hitbox, Vec2::new(dx, 0.0), &[obstacle]);
            prop_assert!(!hitbox.intersects(&obstacle));
            move_and_slide(&mut hitbox, Vec2::new(0.0, dy), &[obstacle]);
            prop_assert!(!hitbox.intersects(&obstacle));
        }
    }
}
