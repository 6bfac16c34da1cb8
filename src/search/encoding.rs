//! Packing of one rectangle's (width, height) into a single integer gene.
//!
//! The high 16 bits hold the width and the low 16 bits the height. Sizes are
//! truncated to whole units on the way in.

use rand::rngs::StdRng;
use rand::Rng;

use crate::error::ConfigError;
use crate::layout::RectSpec;

use super::GeneMutator;

/// Largest side a gene can carry.
pub const MAX_SIDE: u16 = u16::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Gene(pub u32);

impl Gene {
    pub const fn encode(width: u16, height: u16) -> Self {
        Gene(((width as u32) << 16) | height as u32)
    }

    pub const fn width(self) -> u16 {
        (self.0 >> 16) as u16
    }

    pub const fn height(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    pub fn area(self) -> f64 {
        self.width() as f64 * self.height() as f64
    }

    /// Encode a declared rectangle, truncating each side to whole units.
    pub fn from_rect(index: usize, rect: &RectSpec) -> Result<Self, ConfigError> {
        let side = |value: f32| -> Result<u16, ConfigError> {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::InvalidRect {
                    index,
                    width: rect.width,
                    height: rect.height,
                });
            }
            if value >= MAX_SIDE as f32 + 1.0 {
                return Err(ConfigError::DimensionOverflow {
                    index,
                    value,
                    max: MAX_SIDE,
                });
            }
            Ok(value as u16)
        };
        Ok(Gene::encode(side(rect.width)?, side(rect.height)?))
    }
}

/// Encode the whole rectangle list into a candidate vector.
pub fn encode_rects(rects: &[RectSpec]) -> Result<Vec<Gene>, ConfigError> {
    rects
        .iter()
        .enumerate()
        .map(|(i, r)| Gene::from_rect(i, r))
        .collect()
}

/// Decode a candidate back onto the declared rectangles, keeping their labels.
pub fn decode_onto(genes: &[Gene], rects: &[RectSpec]) -> Vec<RectSpec> {
    genes
        .iter()
        .zip(rects)
        .map(|(gene, spec)| RectSpec {
            label: spec.label.clone(),
            width: gene.width() as f32,
            height: gene.height() as f32,
        })
        .collect()
}

/// Inclusive per-side limits for one gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneBounds {
    pub min_w: u16,
    pub max_w: u16,
    pub min_h: u16,
    pub max_h: u16,
}

impl GeneBounds {
    /// Let each side vary by `tolerance` (a fraction) around the seed gene.
    pub fn around(seed: Gene, tolerance: f64) -> Self {
        let range = |side: u16| {
            let s = side as f64;
            let lo = (s * (1.0 - tolerance) - 1e-9).ceil().max(1.0);
            let hi = (s * (1.0 + tolerance) + 1e-9).floor().min(MAX_SIDE as f64);
            (lo.min(s) as u16, hi.max(s) as u16)
        };
        let (min_w, max_w) = range(seed.width());
        let (min_h, max_h) = range(seed.height());
        Self {
            min_w,
            max_w,
            min_h,
            max_h,
        }
    }

    /// Let each side shrink by up to `tolerance` but never grow past the seed.
    /// The seed stays the largest-area candidate, so area fitness keeps it on top.
    pub fn shrink_only(seed: Gene, tolerance: f64) -> Self {
        let b = Self::around(seed, tolerance);
        Self {
            max_w: seed.width(),
            max_h: seed.height(),
            ..b
        }
    }

    pub fn contains(&self, gene: Gene) -> bool {
        (self.min_w..=self.max_w).contains(&gene.width())
            && (self.min_h..=self.max_h).contains(&gene.height())
    }
}

/// Mutation that redraws both sides of a gene uniformly within its bounds.
#[derive(Debug, Clone)]
pub struct BoundedJitter {
    pub bounds: Vec<GeneBounds>,
}

impl BoundedJitter {
    pub fn around(seed: &[Gene], tolerance: f64) -> Self {
        Self {
            bounds: seed.iter().map(|&g| GeneBounds::around(g, tolerance)).collect(),
        }
    }

    pub fn shrink_only(seed: &[Gene], tolerance: f64) -> Self {
        Self {
            bounds: seed
                .iter()
                .map(|&g| GeneBounds::shrink_only(g, tolerance))
                .collect(),
        }
    }
}

impl GeneMutator for BoundedJitter {
    fn mutate(&self, index: usize, gene: Gene, rng: &mut StdRng) -> Gene {
        let Some(b) = self.bounds.get(index) else {
            return gene;
        };
        Gene::encode(
            rng.random_range(b.min_w..=b.max_w),
            rng.random_range(b.min_h..=b.max_h),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn packs_width_high_height_low() {
        let gene = Gene::encode(100, 30);
        assert_eq!(gene.0, (100 << 16) | 30);
        assert_eq!(gene.width(), 100);
        assert_eq!(gene.height(), 30);
        assert_eq!(Gene::encode(MAX_SIDE, MAX_SIDE).width(), MAX_SIDE);
    }

    #[test]
    fn truncates_fractional_sides() {
        let gene = Gene::from_rect(0, &RectSpec::new(30.9, 50.2)).unwrap();
        assert_eq!((gene.width(), gene.height()), (30, 50));
    }

    #[test]
    fn rejects_unencodable_sizes() {
        assert!(matches!(
            Gene::from_rect(3, &RectSpec::new(0.5, 10.0)),
            Err(ConfigError::InvalidRect { index: 3, .. })
        ));
        assert!(matches!(
            Gene::from_rect(1, &RectSpec::new(10.0, f32::NAN)),
            Err(ConfigError::InvalidRect { .. })
        ));
        assert!(matches!(
            Gene::from_rect(0, &RectSpec::new(70_000.0, 10.0)),
            Err(ConfigError::DimensionOverflow { index: 0, .. })
        ));
    }

    #[test]
    fn decode_keeps_labels() {
        let rects = vec![RectSpec::labeled("lid", 30.0, 50.0)];
        let decoded = decode_onto(&[Gene::encode(33, 48)], &rects);
        assert_eq!(decoded, vec![RectSpec::labeled("lid", 33.0, 48.0)]);
    }

    #[test]
    fn bounds_respect_tolerance() {
        let b = GeneBounds::around(Gene::encode(100, 30), 0.1);
        assert_eq!(b, GeneBounds { min_w: 90, max_w: 110, min_h: 27, max_h: 33 });

        let fixed = GeneBounds::around(Gene::encode(100, 30), 0.0);
        assert_eq!(fixed, GeneBounds { min_w: 100, max_w: 100, min_h: 30, max_h: 30 });

        let tiny = GeneBounds::around(Gene::encode(1, 1), 0.5);
        assert_eq!((tiny.min_w, tiny.max_w), (1, 1));

        let shrink = GeneBounds::shrink_only(Gene::encode(100, 30), 0.1);
        assert_eq!(shrink, GeneBounds { min_w: 90, max_w: 100, min_h: 27, max_h: 30 });
    }

    #[test]
    fn jitter_stays_in_bounds() {
        let seed = [Gene::encode(100, 30), Gene::encode(30, 50)];
        let jitter = BoundedJitter::around(&seed, 0.2);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            for (i, &g) in seed.iter().enumerate() {
                assert!(jitter.bounds[i].contains(jitter.mutate(i, g, &mut rng)));
            }
        }
    }
}
