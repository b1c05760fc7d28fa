//! Per-pixel collision masks
//!
//! Bounding rects of sprites with a lot of transparent padding overlap long
//! before the visible shapes do. A `Mask` records which pixels of a frame are
//! solid so two overlapping rects can be checked pixel by pixel.

use glam::IVec2;

/// Alpha at or above this value counts as solid
pub const ALPHA_THRESHOLD: u8 = 127;

/// A solid/empty bit grid matching one sprite frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    /// Row-major, one bool per pixel
    bits: Vec<bool>,
}

impl Mask {
    /// Fully solid mask (rect-equivalent collision)
    pub fn filled(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build from a row-major alpha channel.
    ///
    /// Missing trailing samples count as transparent.
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8]) -> Self {
        let len = (width * height) as usize;
        let bits = (0..len)
            .map(|i| alpha.get(i).is_some_and(|&a| a >= ALPHA_THRESHOLD))
            .collect();
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Solid pixel at (x, y); out of bounds is empty
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// First solid pixel shared with `other`, where `offset` is the position of
    /// `other`'s top-left corner relative to ours. Returned in our coordinates.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        // Intersection of the two grids in our coordinate space
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A ring: solid border, hollow center
    fn ring(size: u32) -> Mask {
        let mut alpha = vec![0u8; (size * size) as usize];
        for y in 0..size {
            for x in 0..size {
                if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                    alpha[(y * size + x) as usize] = 255;
                }
            }
        }
        Mask::from_alpha(size, size, &alpha)
    }

    #[test]
    fn test_filled_overlap() {
        let a = Mask::filled(10, 10);
        let b = Mask::filled(4, 4);
        assert_eq!(a.overlap(&b, IVec2::new(8, 8)), Some(IVec2::new(8, 8)));
        assert_eq!(a.overlap(&b, IVec2::new(10, 0)), None);
        assert_eq!(a.overlap(&b, IVec2::new(-4, 0)), None);
    }

    #[test]
    fn test_from_alpha_threshold() {
        let m = Mask::from_alpha(3, 1, &[0, 127, 255]);
        assert!(!m.get(0, 0));
        assert!(m.get(1, 0));
        assert!(m.get(2, 0));
        assert_eq!(m.count(), 2);
    }

    #[test]
    fn test_short_alpha_is_transparent() {
        let m = Mask::from_alpha(2, 2, &[255]);
        assert_eq!(m.count(), 1);
        assert!(!m.get(1, 1));
    }

    #[test]
    fn test_hollow_sprites_rects_overlap_but_masks_do_not() {
        let outer = ring(20);
        let inner = Mask::filled(4, 4);
        // Small solid square sits inside the hollow of the ring
        assert_eq!(outer.overlap(&inner, IVec2::new(8, 8)), None);
        // Touching the border
        assert!(outer.overlap(&inner, IVec2::new(-2, 8)).is_some());
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = ring(12);
        let b = Mask::filled(3, 3);
        let offset = IVec2::new(10, 4);
        assert_eq!(
            a.overlap(&b, offset).is_some(),
            b.overlap(&a, -offset).is_some()
        );
    }
}
