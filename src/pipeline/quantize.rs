//! Adaptive palette reduction for grayscale pages.
//!
//! The palette is built from the page's own luminance histogram with a
//! weighted median cut: start with one box spanning every level present,
//! repeatedly split the box with the largest squared error at its weighted
//! median, stop at `max_colors` boxes or when no box holds more than one
//! level. Each box becomes one palette entry at its weighted mean.
//!
//! Working on a 256-bin histogram keeps the cost independent of page size
//! and makes the result fully deterministic.

use image::imageops::{self, ColorMap};
use image::{GrayImage, Luma};

/// Gray levels chosen for one image plus the level → index lookup table.
#[derive(Debug, Clone)]
pub struct GrayPalette {
    levels: Vec<u8>,
    lut: [u8; 256],
}

/// A palette-indexed image ready for GIF encoding.
#[derive(Debug, Clone)]
pub struct IndexedImage {
    pub width: u32,
    pub height: u32,
    /// Gray level of each palette entry, ascending.
    pub palette: Vec<u8>,
    /// One palette index per pixel, row-major.
    pub indices: Vec<u8>,
}

impl IndexedImage {
    /// Palette expanded to RGB triples (`r == g == b`).
    pub fn rgb_palette(&self) -> Vec<u8> {
        self.palette.iter().flat_map(|&l| [l, l, l]).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct LevelBox {
    lo: u8,
    hi: u8,
}

impl LevelBox {
    fn population(&self, hist: &[u64; 256]) -> u64 {
        hist[self.lo as usize..=self.hi as usize].iter().sum()
    }

    fn mean(&self, hist: &[u64; 256]) -> f64 {
        let (mut n, mut sum) = (0u64, 0u64);
        for level in self.lo..=self.hi {
            let c = hist[level as usize];
            n += c;
            sum += c * level as u64;
        }
        if n == 0 {
            self.lo as f64
        } else {
            sum as f64 / n as f64
        }
    }

    fn squared_error(&self, hist: &[u64; 256]) -> f64 {
        if self.lo == self.hi {
            return 0.0;
        }
        let mean = self.mean(hist);
        (self.lo..=self.hi)
            .map(|level| {
                let d = level as f64 - mean;
                hist[level as usize] as f64 * d * d
            })
            .sum()
    }

    /// Split at the weighted median. Both halves keep at least one populated level.
    fn split(&self, hist: &[u64; 256]) -> (LevelBox, LevelBox) {
        let half = self.population(hist).div_ceil(2);
        let mut acc = 0u64;
        let mut cut = self.lo;
        for level in self.lo..self.hi {
            acc += hist[level as usize];
            cut = level;
            if acc >= half {
                break;
            }
        }
        (
            trim(LevelBox { lo: self.lo, hi: cut }, hist),
            trim(LevelBox { lo: cut + 1, hi: self.hi }, hist),
        )
    }
}

/// Shrink a box to its lowest and highest populated levels.
fn trim(mut b: LevelBox, hist: &[u64; 256]) -> LevelBox {
    while b.lo < b.hi && hist[b.lo as usize] == 0 {
        b.lo += 1;
    }
    while b.hi > b.lo && hist[b.hi as usize] == 0 {
        b.hi -= 1;
    }
    b
}

impl GrayPalette {
    /// Choose at most `max_colors` gray levels for `img`.
    pub fn adaptive(img: &GrayImage, max_colors: usize) -> Self {
        let mut hist = [0u64; 256];
        for p in img.pixels() {
            hist[p[0] as usize] += 1;
        }

        let Some(lo) = hist.iter().position(|&c| c > 0) else {
            return Self {
                levels: vec![0],
                lut: [0; 256],
            };
        };
        let hi = hist.iter().rposition(|&c| c > 0).unwrap_or(lo);

        let max_colors = max_colors.clamp(1, 256);
        let mut boxes = vec![LevelBox {
            lo: lo as u8,
            hi: hi as u8,
        }];

        while boxes.len() < max_colors {
            let worst = boxes
                .iter()
                .enumerate()
                .map(|(i, b)| (i, b.squared_error(&hist)))
                .filter(|(_, err)| *err > 0.0)
                .max_by(|a, b| a.1.total_cmp(&b.1));
            let Some((i, _)) = worst else { break };
            let (left, right) = boxes[i].split(&hist);
            boxes[i] = left;
            boxes.push(right);
        }

        boxes.sort_by_key(|b| b.lo);

        let levels = boxes.iter().map(|b| b.mean(&hist).round() as u8).collect();
        Self {
            levels,
            lut: build_lut(&boxes),
        }
    }

    /// Gray level of each entry, ascending.
    pub fn levels(&self) -> &[u8] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

/// Index of the box holding each level; levels absent from the image go to
/// the nearest box by range.
fn build_lut(boxes: &[LevelBox]) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for level in 0..=255u8 {
        let nearest = boxes
            .iter()
            .enumerate()
            .min_by_key(|(_, b)| {
                if level < b.lo {
                    b.lo - level
                } else if level > b.hi {
                    level - b.hi
                } else {
                    0
                }
            })
            .map(|(i, _)| i as u8)
            .unwrap_or(0);
        lut[level as usize] = nearest;
    }
    lut
}

impl ColorMap for GrayPalette {
    type Color = Luma<u8>;

    fn index_of(&self, color: &Luma<u8>) -> usize {
        self.lut[color[0] as usize] as usize
    }

    fn lookup(&self, index: usize) -> Option<Luma<u8>> {
        self.levels.get(index).map(|&l| Luma([l]))
    }

    fn has_lookup(&self) -> bool {
        true
    }

    fn map_color(&self, color: &mut Luma<u8>) {
        let idx = self.index_of(color);
        color[0] = self.levels[idx];
    }
}

/// Reduce `img` to an indexed image with at most `max_colors` entries.
pub fn quantize(img: &GrayImage, max_colors: usize) -> IndexedImage {
    let palette = GrayPalette::adaptive(img, max_colors);
    let indexed = imageops::index_colors(img, &palette);
    IndexedImage {
        width: img.width(),
        height: img.height(),
        palette: palette.levels,
        indices: indexed.into_raw(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn gradient(w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(w, h, |x, _| Luma([((x * 255) / (w - 1)) as u8]))
    }

    #[test]
    fn palette_never_exceeds_bound() {
        let img = gradient(256, 4);
        for max in [2usize, 3, 7, 15, 16, 255, 256] {
            let q = quantize(&img, max);
            assert!(q.palette.len() <= max, "max {max}: got {}", q.palette.len());
            let used: HashSet<u8> = q.indices.iter().copied().collect();
            assert!(used.len() <= max);
            assert!(used.iter().all(|&i| (i as usize) < q.palette.len()));
        }
    }

    #[test]
    fn few_levels_are_kept_exactly() {
        let img = GrayImage::from_fn(4, 4, |x, _| Luma([if x < 2 { 0 } else { 255 }]));
        let q = quantize(&img, 15);
        assert_eq!(q.palette, vec![0, 255]);
        assert_eq!(q.indices[0], 0);
        assert_eq!(q.indices[3], 1);
    }

    #[test]
    fn uniform_image_has_one_entry() {
        let img = GrayImage::from_pixel(8, 8, Luma([123]));
        let q = quantize(&img, 15);
        assert_eq!(q.palette, vec![123]);
        assert!(q.indices.iter().all(|&i| i == 0));
    }

    #[test]
    fn palette_is_ascending_and_distinct() {
        let q = quantize(&gradient(200, 2), 15);
        assert_eq!(q.palette.len(), 15);
        assert!(q.palette.windows(2).all(|w| w[0] < w[1]), "{:?}", q.palette);
    }

    #[test]
    fn dominant_level_gets_its_own_entry() {
        // Mostly white page with a little dark text.
        let img = GrayImage::from_fn(100, 100, |x, y| {
            if (x + y) % 17 == 0 {
                Luma([(x % 64) as u8])
            } else {
                Luma([255])
            }
        });
        let q = quantize(&img, 4);
        assert!(q.palette.contains(&255), "{:?}", q.palette);
    }

    #[test]
    fn color_map_maps_to_palette() {
        let img = gradient(64, 1);
        let palette = GrayPalette::adaptive(&img, 5);
        for level in 0..=255u8 {
            let mut c = Luma([level]);
            palette.map_color(&mut c);
            assert!(palette.levels().contains(&c[0]));
        }
    }

    #[test]
    fn rgb_palette_is_gray() {
        let q = quantize(&gradient(32, 1), 4);
        let rgb = q.rgb_palette();
        assert_eq!(rgb.len(), q.palette.len() * 3);
        assert!(rgb.chunks(3).all(|c| c[0] == c[1] && c[1] == c[2]));
    }
}
