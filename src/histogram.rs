extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use rgb::RGBA;

use crate::arena::Arena;
use crate::colorspace::{self, LinearColor};
use crate::error::HistogramError;
use crate::HistogramConfig;

/// Number of hash buckets. Prime, and well above any realistic distinct-color
/// count after posterization, so chains stay short.
const HASH_SIZE: usize = 30029;

/// End-of-chain marker in bucket chains.
const EMPTY: u32 = u32::MAX;

/// One chained entry: a posterized packed color and its accumulated weight.
struct BucketEntry {
    key: u32,
    weight: f32,
    next: u32,
}

/// Fixed bucket heads chaining into an entry arena. Lives only for the
/// duration of one build; dropping it discards every entry at once.
struct ColorHash {
    buckets: Vec<u32>,
    entries: Arena<BucketEntry>,
}

impl ColorHash {
    fn new() -> Self {
        Self {
            buckets: vec![EMPTY; HASH_SIZE],
            entries: Arena::new(),
        }
    }

    /// Add one posterized pixel with the given weight boost. Returns `false`
    /// when a new distinct color would exceed `max_colors`.
    fn add(&mut self, key: u32, boost: f32, max_colors: usize) -> bool {
        let bucket = (key % HASH_SIZE as u32) as usize;

        let mut at = self.buckets[bucket];
        while at != EMPTY {
            let entry = self.entries.get_mut(at);
            if entry.key == key {
                entry.weight += boost;
                return true;
            }
            at = entry.next;
        }

        if self.entries.len() >= max_colors {
            return false;
        }

        let head = self.buckets[bucket];
        self.buckets[bucket] = self.entries.alloc(BucketEntry {
            key,
            weight: boost,
            next: head,
        });
        true
    }
}

/// A weighted histogram entry: one distinct (posterized) color.
#[derive(Debug, Clone, Copy)]
pub struct HistogramEntry {
    /// Linearized color of this bucket.
    pub color: LinearColor,
    /// Accumulated occurrence weight from the image scan.
    pub perceptual_weight: f32,
    /// Working weight for the clustering stage. Starts equal to
    /// `perceptual_weight`; this crate never changes it after the build.
    pub adjusted_weight: f32,
}

/// A deduplicated, weighted color set extracted from an image.
///
/// Entry order is unspecified (hash-bucket order, then chain order): it is
/// stable within a single build, but callers must only rely on the set being
/// complete, never on any particular ordering.
#[derive(Debug, Clone)]
pub struct Histogram {
    entries: Vec<HistogramEntry>,
}

impl Histogram {
    /// Number of distinct colors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in unspecified order.
    pub fn entries(&self) -> &[HistogramEntry] {
        &self.entries
    }

    /// Mutable entries, for the clustering stage to rewrite
    /// `adjusted_weight`.
    pub fn entries_mut(&mut self) -> &mut [HistogramEntry] {
        &mut self.entries
    }

    /// Sum of perceptual weights over all entries: the pixel count when no
    /// importance map was supplied, `Σ (0.5 + importance)` otherwise.
    pub fn total_weight(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.perceptual_weight as f64)
            .sum()
    }
}

/// Build a bounded, weighted color histogram from row-major RGBA pixels.
///
/// Each pixel contributes a weight of 1.0, or `0.5 + importance[i]` when an
/// importance map is supplied, to the entry for its posterized color. The
/// build fails with [`HistogramError::Overflow`] as soon as the distinct
/// count would exceed `config.max_colors`, discarding everything built so
/// far; callers retry with a coarser `ignore_bits`.
///
/// Inputs are assumed validated; [`crate::build_histogram`] is the checked
/// entry point.
pub fn build_histogram(
    pixels: &[RGBA<u8>],
    importance: Option<&[f32]>,
    config: &HistogramConfig,
) -> Result<Histogram, HistogramError> {
    if let Some(map) = importance {
        assert_eq!(pixels.len(), map.len());
    }

    let mask = colorspace::posterize_mask(config.ignore_bits);
    let mut hash = ColorHash::new();

    for (i, px) in pixels.iter().enumerate() {
        let boost = match importance {
            Some(map) => 0.5 + map[i],
            None => 1.0,
        };

        let key = colorspace::pack(*px) & mask;
        if !hash.add(key, boost, config.max_colors) {
            return Err(HistogramError::Overflow {
                max_colors: config.max_colors,
            });
        }
    }

    Ok(Histogram {
        entries: materialize(&hash, config.gamma),
    })
}

/// Flatten the hash into a dense entry list, linearizing each color. Visits
/// every bucket and every chain entry exactly once, so the output length is
/// the distinct-color count.
fn materialize(hash: &ColorHash, gamma: f64) -> Vec<HistogramEntry> {
    let mut entries = Vec::with_capacity(hash.entries.len());

    for &head in &hash.buckets {
        let mut at = head;
        while at != EMPTY {
            let entry = hash.entries.get(at);
            entries.push(HistogramEntry {
                color: LinearColor::from_rgba(colorspace::unpack(entry.key), gamma),
                perceptual_weight: entry.weight,
                adjusted_weight: entry.weight,
            });
            at = entry.next;
        }
    }

    entries
}
