//! Per-item length factors and colours.
//!
//! Lengths are evenly spread over the configured range, jittered slightly, then interleaved
//! short/long so neighbouring wedges never have similar lengths. Colours are drawn without
//! replacement, primary palette first, avoiding the previous item's colour whenever the pool
//! offers something else.

use crate::config::{ChartConfig, ColorPalette};
use rand::Rng;

/// Colour used when no palette colour is configured at all.
pub const FALLBACK_COLOR: &str = "#75c9b9";

/// Jitter amplitude as a fraction of the step between evenly spaced factors (±5%).
const JITTER_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub length_factors: Vec<f64>,
    pub colors: Vec<String>,
    /// Set when the palette was empty and [`FALLBACK_COLOR`] had to be used.
    pub palette_exhausted: bool,
}

pub fn distribute<R: Rng + ?Sized>(count: usize, config: &ChartConfig, rng: &mut R) -> Distribution {
    let length_factors = length_factors(
        count,
        config.min_length_factor,
        config.max_length_factor,
        rng,
    );
    let (colors, palette_exhausted) = assign_colors(count, &config.colors, rng);
    log::debug!("Distributed length factors: {length_factors:?}");
    log::debug!("Final color assignments: {colors:?}");
    Distribution {
        length_factors,
        colors,
        palette_exhausted,
    }
}

/// Evenly spaced, jittered and interleaved length factors in `[min, max]`.
pub fn length_factors<R: Rng + ?Sized>(count: usize, min: f64, max: f64, rng: &mut R) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }

    let step = (max - min) / count.saturating_sub(1).max(1) as f64;
    let mut factors: Vec<f64> = (0..count)
        .map(|i| {
            let base = min + i as f64 * step;
            let jitter = (rng.gen_range(0.0..1.0) - 0.5) * step * JITTER_FRACTION;
            (base + jitter).clamp(min, max)
        })
        .collect();

    factors.sort_by(f64::total_cmp);
    interleave(&factors)
}

/// Takes ascending values and alternates smallest / largest remaining:
/// `[a, b, c, d, e] -> [a, e, b, d, c]`.
pub fn interleave<T: Copy>(sorted: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(sorted.len());
    let (mut left, mut right) = (0usize, sorted.len());
    for i in 0..sorted.len() {
        if i % 2 == 0 {
            out.push(sorted[left]);
            left += 1;
        } else {
            right -= 1;
            out.push(sorted[right]);
        }
    }
    out
}

fn dedup_preserving_order(colors: &[String], exclude: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(colors.len());
    for c in colors {
        if !out.contains(c) && !exclude.contains(c) {
            out.push(c.clone());
        }
    }
    out
}

/// Removes and returns a random entry of `pool`, preferring one different from `last`.
fn draw<R: Rng + ?Sized>(pool: &mut Vec<String>, last: Option<&str>, rng: &mut R) -> Option<String> {
    if pool.is_empty() {
        return None;
    }
    let candidates: Vec<usize> = (0..pool.len())
        .filter(|&i| Some(pool[i].as_str()) != last)
        .collect();
    let idx = if candidates.is_empty() {
        rng.gen_range(0..pool.len())
    } else {
        candidates[rng.gen_range(0..candidates.len())]
    };
    Some(pool.remove(idx))
}

fn refill(source: &[String], last: Option<&str>) -> Vec<String> {
    source
        .iter()
        .filter(|c| Some(c.as_str()) != last)
        .cloned()
        .collect()
}

/// Assigns one colour per item. Returns the colours and whether the fallback colour was used.
pub fn assign_colors<R: Rng + ?Sized>(
    count: usize,
    palette: &ColorPalette,
    rng: &mut R,
) -> (Vec<String>, bool) {
    let primary = dedup_preserving_order(&palette.primary, &[]);
    let secondary = dedup_preserving_order(&palette.secondary, &primary);
    log::debug!(
        "Color assignment: {count} items, {} primary colors, {} secondary colors",
        primary.len(),
        secondary.len()
    );

    if primary.is_empty() && secondary.is_empty() {
        if count > 0 {
            log::error!("No colors configured, using {FALLBACK_COLOR} for every item");
        }
        return (vec![FALLBACK_COLOR.to_string(); count], count > 0);
    }

    let mut available_primary = primary.clone();
    let mut available_secondary = secondary.clone();
    let mut assigned: Vec<String> = Vec::with_capacity(count);

    for i in 0..count {
        let last = assigned.last().map(String::as_str);

        if available_primary.is_empty() && available_secondary.is_empty() {
            log::debug!("Item {}: replenishing colors (all were used)", i + 1);
            available_primary = refill(&primary, last);
            available_secondary = refill(&secondary, last);
            if available_primary.is_empty() && available_secondary.is_empty() {
                // A single distinct colour: repeating it is the only option.
                available_primary = primary.clone();
                available_secondary = secondary.clone();
            }
        }

        let chosen = if available_primary.is_empty() {
            draw(&mut available_secondary, last, rng)
        } else {
            draw(&mut available_primary, last, rng)
        };

        match chosen {
            Some(color) => assigned.push(color),
            None => {
                log::error!("No colors available after replenishing");
                assigned.push(FALLBACK_COLOR.to_string());
            }
        }
    }

    (assigned, false)
}
