//! Label wrapping, measurement and placement.
//!
//! Wrapping is a character-count heuristic: the line budget is the box width divided by an
//! estimated average glyph width (`font_size * AVG_CHAR_WIDTH_FACTOR`). It does not look at real
//! glyph metrics, so a line can come out slightly wider or narrower than the budget. The
//! produced lines are then measured with a [`TextMeasurer`] backed by the real rendering surface
//! to size the boxes.

use crate::color::Color;
use crate::config::{ANCHOR_TOLERANCE_DEGREES, AVG_CHAR_WIDTH_FACTOR, ChartStyle, LINE_SPACING};
use crate::geometry::{Point, Rect};
use strum::Display as StrumDisplay;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextExtent {
    pub width: f64,
    pub height: f64,
}

/// Measures a single line of label text at a given font size.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent;
}

/// Headless measurer using the same average glyph width the wrapper assumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EstimatingMeasurer;

impl TextMeasurer for EstimatingMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        TextExtent {
            width: text.chars().count() as f64 * font_size * AVG_CHAR_WIDTH_FACTOR,
            height: font_size,
        }
    }
}

/// Horizontal side a label hangs off its anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    /// Right half of the circle anchors at the start, left half at the end, and a small band
    /// around 12 and 6 o'clock is centred.
    pub fn for_angle(mid_angle: f64) -> Self {
        let a = mid_angle.rem_euclid(360.0);
        let tol = ANCHOR_TOLERANCE_DEGREES;
        if a > tol && a < 180.0 - tol {
            Self::Start
        } else if a > 180.0 + tol && a < 360.0 - tol {
            Self::End
        } else {
            Self::Middle
        }
    }
}

fn max_chars_per_line(max_width_px: f64, font_size: f64) -> usize {
    let per_char = font_size * AVG_CHAR_WIDTH_FACTOR;
    if !(per_char > 0.0 && max_width_px.is_finite()) {
        return 0;
    }
    (max_width_px / per_char).floor().max(0.0) as usize
}

fn split_chunks(word: &str, width: usize) -> (Vec<String>, String) {
    let chars: Vec<char> = word.chars().collect();
    let mut chunks: Vec<String> = chars.chunks(width).map(|c| c.iter().collect()).collect();
    let rest = chunks.pop().unwrap_or_default();
    (chunks, rest)
}

/// Greedy word wrap bounded by an estimated characters-per-line budget.
///
/// Words are appended while the line stays within budget; a single word longer than the budget
/// is cut into budget-sized chunks.
pub fn wrap_words(text: &str, max_width_px: f64, font_size: f64) -> Vec<String> {
    let max_chars = max_chars_per_line(max_width_px, font_size);
    if max_chars == 0 {
        return vec![text.to_string()];
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }

        if current.chars().count() > max_chars && !current.contains(' ') {
            let (chunks, rest) = split_chunks(&current, max_chars);
            lines.extend(chunks);
            current = rest;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

/// First pass: wrapped lines and their measured extents.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredLabel {
    pub lines: Vec<String>,
    pub max_line_width: f64,
    pub line_height: f64,
}

pub fn measure_label(text: &str, style: &ChartStyle, measurer: &dyn TextMeasurer) -> MeasuredLabel {
    let max_text_width = style.box_max_width - 2.0 * style.box_padding;
    let lines = wrap_words(text, max_text_width, style.font_size);

    let line_height = lines
        .first()
        .map(|l| measurer.measure(l, style.font_size).height)
        .unwrap_or(0.0);
    let max_line_width = lines
        .iter()
        .map(|l| measurer.measure(l, style.font_size).width)
        .fold(0.0, f64::max);

    MeasuredLabel {
        lines,
        max_line_width,
        line_height,
    }
}

/// Sizes shared by every label box of a chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    pub box_width: f64,
    pub line_height: f64,
    pub padding: f64,
}

impl LabelMetrics {
    /// One box width for all labels: the widest measured line plus padding, capped at the
    /// configured maximum. One line height: the tallest measured line.
    pub fn shared(labels: &[MeasuredLabel], style: &ChartStyle) -> Self {
        let widest = labels.iter().map(|l| l.max_line_width).fold(0.0, f64::max);
        let line_height = labels.iter().map(|l| l.line_height).fold(0.0, f64::max);
        Self {
            box_width: style
                .box_max_width
                .min(widest + 2.0 * style.box_padding),
            line_height,
            padding: style.box_padding,
        }
    }

    pub fn box_height(&self, line_count: usize) -> f64 {
        line_count as f64 * self.line_height * LINE_SPACING + 2.0 * self.padding
    }
}

/// Second pass: where a label's box sits relative to its anchor point.
pub fn place_box(anchor_point: Point, anchor: TextAnchor, width: f64, height: f64) -> Rect {
    let x = match anchor {
        TextAnchor::Middle => anchor_point.x - width / 2.0,
        TextAnchor::Start => anchor_point.x,
        TextAnchor::End => anchor_point.x - width,
    };
    Rect::new(x, anchor_point.y - height / 2.0, width, height)
}

/// Vertical offset, in ems from the box centre, of line `index` out of `count`.
pub fn line_offset_em(index: usize, count: usize) -> f64 {
    (index as f64 - (count.saturating_sub(1)) as f64 / 2.0) * LINE_SPACING
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    pub lines: Vec<String>,
    pub rect: Rect,
    pub text_anchor: TextAnchor,
    pub fill: Color,
    pub text_color: Color,
}

impl LabelLayout {
    pub fn box_width(&self) -> f64 {
        self.rect.width
    }

    pub fn box_height(&self) -> f64 {
        self.rect.height
    }

    pub fn box_center(&self) -> Point {
        self.rect.center()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_short_text_stays_on_one_line() {
        assert_eq!(wrap_words("Service 1", 140.0, 12.0), vec!["Service 1"]);
    }

    #[test]
    fn test_wrap_two_words_past_the_budget() {
        // 140px / (12 * 0.65) = 17 chars per line.
        assert_eq!(
            wrap_words("Offensive Security", 140.0, 12.0),
            vec!["Offensive", "Security"]
        );
    }

    #[test]
    fn test_wrap_long_name() {
        let lines = wrap_words("Cyber Strategy & Executive Risk", 140.0, 12.0);
        assert_eq!(lines, vec!["Cyber Strategy &", "Executive Risk"]);
        for l in &lines {
            assert!(l.chars().count() <= 17);
        }
    }

    #[test]
    fn test_wrap_splits_overlong_word() {
        let lines = wrap_words("a Supercalifragilisticexpialidocious b", 80.0, 12.0);
        // 10 chars per line.
        assert_eq!(
            lines,
            vec!["a", "Supercalif", "ragilistic", "expialidoc", "ious b"]
        );
    }

    #[test]
    fn test_wrap_degenerate_budget() {
        assert_eq!(wrap_words("anything goes", 1.0, 12.0), vec!["anything goes"]);
        assert_eq!(wrap_words("", 140.0, 12.0), vec![""]);
    }

    #[test]
    fn test_text_anchor() {
        assert_eq!(TextAnchor::for_angle(0.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_angle(4.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_angle(25.7), TextAnchor::Start);
        assert_eq!(TextAnchor::for_angle(178.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_angle(180.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::for_angle(270.0), TextAnchor::End);
        assert_eq!(TextAnchor::for_angle(357.0), TextAnchor::Middle);
        assert_eq!(TextAnchor::End.to_string(), "end");
    }

    #[test]
    fn test_long_label_wraps_and_grows() {
        let style = ChartStyle::default();
        let m = measure_label(
            "Governance, Risk & Compliance (GRC)",
            &style,
            &EstimatingMeasurer,
        );
        assert!(m.lines.len() >= 2);

        let single = measure_label("Service 1", &style, &EstimatingMeasurer);
        assert_eq!(single.lines.len(), 1);

        let metrics = LabelMetrics::shared(&[m.clone(), single.clone()], &style);
        assert!(metrics.box_height(m.lines.len()) > metrics.box_height(single.lines.len()));
        for n in 1..6 {
            assert!(metrics.box_height(n + 1) > metrics.box_height(n));
        }
    }

    #[test]
    fn test_shared_width_is_capped() {
        let style = ChartStyle::default();
        let wide = MeasuredLabel {
            lines: vec!["x".into()],
            max_line_width: 400.0,
            line_height: 12.0,
        };
        let narrow = MeasuredLabel {
            lines: vec!["x".into()],
            max_line_width: 40.0,
            line_height: 14.0,
        };
        let metrics = LabelMetrics::shared(&[narrow.clone()], &style);
        assert_eq!(metrics.box_width, 50.0);
        let metrics = LabelMetrics::shared(&[narrow, wide], &style);
        assert_eq!(metrics.box_width, 150.0);
        assert_eq!(metrics.line_height, 14.0);
        assert_eq!(metrics.box_height(2), 2.0 * 14.0 * 1.2 + 10.0);
    }

    #[test]
    fn test_place_box() {
        let p = Point::new(100.0, 50.0);
        assert_eq!(
            place_box(p, TextAnchor::Start, 80.0, 20.0),
            Rect::new(100.0, 40.0, 80.0, 20.0)
        );
        assert_eq!(
            place_box(p, TextAnchor::End, 80.0, 20.0),
            Rect::new(20.0, 40.0, 80.0, 20.0)
        );
        assert_eq!(
            place_box(p, TextAnchor::Middle, 80.0, 20.0).center(),
            Point::new(100.0, 50.0)
        );
    }

    #[test]
    fn test_line_offsets() {
        assert_eq!(line_offset_em(0, 1), 0.0);
        assert!((line_offset_em(0, 2) + 0.6).abs() < 1e-12);
        assert!((line_offset_em(1, 2) - 0.6).abs() < 1e-12);
        assert!((line_offset_em(0, 3) + 1.2).abs() < 1e-12);
    }
}
