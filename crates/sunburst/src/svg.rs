//! Standalone SVG serialisation of a [`Frame`].

use crate::config::{ChartStyle, LINE_SPACING};
use crate::frame::{Frame, LabelFrame, WedgeFrame};
use crate::geometry::fmt_number as n;
use crate::text::line_offset_em;
use std::fmt::Write as _;

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn dash_array(dash: &[f64]) -> String {
    dash.iter().map(|d| n(*d)).collect::<Vec<_>>().join(", ")
}

fn scale_transform(label: &LabelFrame) -> String {
    let c = label.rect.center();
    format!(
        "translate({cx}, {cy}) scale({s}) translate({ncx}, {ncy})",
        cx = n(c.x),
        cy = n(c.y),
        s = n(label.scale),
        ncx = n(-c.x),
        ncy = n(-c.y)
    )
}

fn write_wedge(out: &mut String, wedge: &WedgeFrame, marker_radius: f64) {
    let _ = write!(
        out,
        r#"<g class="wedge-group" data-index="{}" data-service="{}">"#,
        wedge.index,
        escape_xml(wedge.name.as_str())
    );
    let _ = write!(
        out,
        r#"<path class="wedge-path" d="{}" fill="{}"/>"#,
        wedge.path, wedge.color
    );
    let _ = write!(
        out,
        r#"<circle class="marker-circle" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        n(wedge.marker.x),
        n(wedge.marker.y),
        n(marker_radius),
        wedge.color
    );
    out.push_str("</g>");
}

fn write_label(out: &mut String, label: &LabelFrame, style: &ChartStyle) {
    out.push_str(r#"<g class="label-group">"#);
    let _ = write!(
        out,
        r#"<path class="label-line" d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-dasharray="{}" opacity="{}"/>"#,
        label.connector,
        style.connector_color,
        n(style.connector_width),
        dash_array(&style.connector_dash),
        n(label.connector_opacity)
    );

    let transform = scale_transform(label);
    let r = &label.rect;
    let _ = write!(
        out,
        r#"<rect class="label-box" x="{}" y="{}" width="{}" height="{}" rx="{rx}" ry="{rx}" fill="{}" stroke="{}" stroke-width="{}" transform="{transform}" opacity="{}"/>"#,
        n(r.x),
        n(r.y),
        n(r.width),
        n(r.height),
        label.fill,
        style.box_stroke,
        n(style.box_stroke_width),
        n(label.opacity),
        rx = n(style.box_corner_radius),
    );

    let c = r.center();
    let _ = write!(
        out,
        r#"<text class="label-text" x="{x}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="{}" fill="{}" transform="{transform}" opacity="{}">"#,
        n(c.y),
        n(style.font_size),
        label.text_color,
        n(label.opacity),
        x = n(c.x),
    );
    let count = label.lines.len();
    for (i, line) in label.lines.iter().enumerate() {
        // First line is offset from the centre, the rest step down one line each.
        let dy = if i == 0 {
            line_offset_em(0, count)
        } else {
            LINE_SPACING
        };
        let _ = write!(
            out,
            r#"<tspan x="{}" dy="{}em">{}</tspan>"#,
            n(c.x),
            n(dy),
            escape_xml(line)
        );
    }
    out.push_str("</text></g>");
}

/// Serialises `frame` as a complete SVG document.
pub fn render(frame: &Frame, style: &ChartStyle) -> String {
    let mut out = String::new();
    let size = n(frame.size);
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {size} {size}" width="{size}" height="{size}">"#
    );

    out.push_str(r#"<g class="wedges">"#);
    for wedge in &frame.wedges {
        write_wedge(&mut out, wedge, frame.marker_radius);
    }
    out.push_str("</g>");

    let _ = write!(
        out,
        r#"<circle class="center-circle" cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        n(frame.center.x),
        n(frame.center.y),
        n(frame.inner_radius),
        frame.center_color
    );
    if let (Some(rect), Some(path)) = (frame.logo, style.logo.as_ref()) {
        let _ = write!(
            out,
            r#"<image class="center-logo" href="{}" x="{}" y="{}" width="{}" height="{}"/>"#,
            escape_xml(&path.to_string_lossy()),
            n(rect.x),
            n(rect.y),
            n(rect.width),
            n(rect.height)
        );
    }

    out.push_str(r#"<g class="labels">"#);
    for label in frame.labels_in_paint_order() {
        write_label(&mut out, label, style);
    }
    out.push_str("</g></svg>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::ChartLayout;
    use crate::config::ChartConfig;
    use crate::data::Item;
    use crate::interaction::ChartState;
    use crate::text::EstimatingMeasurer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::time::Duration;

    fn state(names: &[&str]) -> (ChartState, ChartStyle) {
        let items: Vec<Item> = names.iter().map(|s| Item::named(*s)).collect();
        let config = ChartConfig::default();
        let style = ChartStyle::default();
        let mut rng = StdRng::seed_from_u64(1);
        let layout =
            ChartLayout::build(&items, &config, &style, &EstimatingMeasurer, &mut rng).unwrap();
        (ChartState::new(layout, &config, &style), style)
    }

    #[test]
    fn test_document_structure() {
        let (s, style) = state(&["A", "B", "C"]);
        let svg = render(&s.frame(), &style);
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 600 600""#));
        assert!(svg.ends_with("</svg>\n"));
        assert_eq!(svg.matches(r#"class="wedge-path""#).count(), 3);
        assert_eq!(svg.matches(r#"class="marker-circle""#).count(), 3);
        assert_eq!(svg.matches(r#"class="label-box""#).count(), 3);
        assert!(svg.contains(r#"stroke-dasharray="3, 3""#));
        assert!(svg.contains("scale(1)"));
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_multiline_label_offsets() {
        let (s, style) = state(&["Governance, Risk & Compliance (GRC)"]);
        let svg = render(&s.frame(), &style);
        assert!(svg.contains("Governance, Risk"));
        assert!(svg.contains("&amp;"));
        assert!(svg.contains(r#"dy="-1.2em""#));
        assert!(svg.contains(r#"dy="1.2em""#));
    }

    #[test]
    fn test_active_label_drawn_last() {
        let (mut s, style) = state(&["A", "B", "C"]);
        s.handle_pointer_enter(0, Duration::ZERO);
        s.settle();
        let svg = render(&s.frame(), &style);
        assert!(svg.contains("scale(1.8)"));
        let last_group = svg.rfind(r#"<g class="label-group">"#).unwrap();
        assert!(svg[last_group..].contains(">A</tspan>"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape_xml(r#"a<b>&"c'"#), "a&lt;b&gt;&amp;&quot;c&#39;");
    }
}
