use super::model::State;
use super::{CENTER_RING_WIDTH, FONT_FAMILY};
use crate::gui::theme::ThemeColors;
use cairo::{Context, FontSlant, FontWeight};
use gdk4::prelude::*;
use gdk_pixbuf::Pixbuf;
use palette::Srgba;
use std::f64::consts::PI;
use sunburst::color::Color;
use sunburst::config::ChartStyle;
use sunburst::frame::{Frame, LabelFrame, WedgeFrame};
use sunburst::geometry::{Point, Rect};
use sunburst::text::line_offset_em;

fn set_color(cr: &Context, color: Color, alpha: f64) {
    let (r, g, b) = color.components();
    cr.set_source_rgba(r, g, b, alpha);
}

fn set_theme_color(cr: &Context, color: Srgba<f64>) {
    cr.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

/// Chart angles run clockwise from 12 o'clock, cairo's from 3 o'clock.
fn cairo_angle(degrees: f64) -> f64 {
    (degrees - 90.0).to_radians()
}

/// Control points of the cubic that traces the same curve as a quadratic.
pub fn quad_to_cubic(start: Point, control: Point, end: Point) -> (Point, Point) {
    let c1 = Point::new(
        start.x + 2.0 / 3.0 * (control.x - start.x),
        start.y + 2.0 / 3.0 * (control.y - start.y),
    );
    let c2 = Point::new(
        end.x + 2.0 / 3.0 * (control.x - end.x),
        end.y + 2.0 / 3.0 * (control.y - end.y),
    );
    (c1, c2)
}

fn rounded_rect(cr: &Context, rect: Rect, radius: f64) {
    let r = radius.min(rect.width / 2.0).min(rect.height / 2.0).max(0.0);
    let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
    cr.new_sub_path();
    cr.arc(x + w - r, y + r, r, -PI / 2.0, 0.0);
    cr.arc(x + w - r, y + h - r, r, 0.0, PI / 2.0);
    cr.arc(x + r, y + h - r, r, PI / 2.0, PI);
    cr.arc(x + r, y + r, r, PI, 3.0 * PI / 2.0);
    cr.close_path();
}

struct WedgeRenderer<'a> {
    wedge: &'a WedgeFrame,
    center: Point,
    marker_radius: f64,
}

impl<'a> WedgeRenderer<'a> {
    fn new(wedge: &'a WedgeFrame, frame: &Frame) -> Self {
        Self {
            wedge,
            center: frame.center,
            marker_radius: frame.marker_radius,
        }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_sector(cr)?;
        self.draw_marker(cr)
    }

    fn draw_sector(&self, cr: &Context) -> Result<(), cairo::Error> {
        if !(self.wedge.radius > 0.0) {
            return Ok(());
        }
        set_color(cr, self.wedge.color, 1.0);
        cr.move_to(self.center.x, self.center.y);
        cr.arc(
            self.center.x,
            self.center.y,
            self.wedge.radius,
            cairo_angle(self.wedge.start_angle),
            cairo_angle(self.wedge.end_angle),
        );
        cr.close_path();
        cr.fill()
    }

    fn draw_marker(&self, cr: &Context) -> Result<(), cairo::Error> {
        let m = self.wedge.marker;
        set_color(cr, self.wedge.color, 1.0);
        cr.new_sub_path();
        cr.arc(m.x, m.y, self.marker_radius, 0.0, 2.0 * PI);
        cr.fill()
    }
}

struct LabelRenderer<'a> {
    label: &'a LabelFrame,
    style: &'a ChartStyle,
}

impl<'a> LabelRenderer<'a> {
    fn new(label: &'a LabelFrame, style: &'a ChartStyle) -> Self {
        Self { label, style }
    }

    fn draw(&self, cr: &Context) -> Result<(), cairo::Error> {
        self.draw_connector(cr)?;
        if self.label.opacity <= 0.0 {
            return Ok(());
        }

        let c = self.label.rect.center();
        cr.push_group();
        cr.save()?;
        cr.translate(c.x, c.y);
        cr.scale(self.label.scale, self.label.scale);
        cr.translate(-c.x, -c.y);
        self.draw_box(cr)?;
        self.draw_text(cr)?;
        cr.restore()?;
        cr.pop_group_to_source()?;
        cr.paint_with_alpha(self.label.opacity)
    }

    fn draw_connector(&self, cr: &Context) -> Result<(), cairo::Error> {
        let opacity = self.label.connector_opacity;
        if opacity <= 0.0 {
            return Ok(());
        }
        let (start, end) = (self.label.connector_start, self.label.connector_end);
        let (c1, c2) = quad_to_cubic(start, self.label.connector_control, end);

        set_color(cr, self.style.connector_color, opacity);
        cr.set_line_width(self.style.connector_width);
        cr.set_dash(&self.style.connector_dash, 0.0);
        cr.move_to(start.x, start.y);
        cr.curve_to(c1.x, c1.y, c2.x, c2.y, end.x, end.y);
        let result = cr.stroke();
        cr.set_dash(&[], 0.0);
        result
    }

    fn draw_box(&self, cr: &Context) -> Result<(), cairo::Error> {
        rounded_rect(cr, self.label.rect, self.style.box_corner_radius);
        set_color(cr, self.label.fill, 1.0);
        cr.fill_preserve()?;
        set_color(cr, self.style.box_stroke, 1.0);
        cr.set_line_width(self.style.box_stroke_width);
        cr.stroke()
    }

    fn draw_text(&self, cr: &Context) -> Result<(), cairo::Error> {
        let font_size = self.style.font_size;
        let c = self.label.rect.center();
        let count = self.label.lines.len();

        cr.select_font_face(FONT_FAMILY, FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(font_size);
        set_color(cr, self.label.text_color, 1.0);

        for (i, line) in self.label.lines.iter().enumerate() {
            let ext = cr.text_extents(line)?;
            let y = c.y + line_offset_em(i, count) * font_size;
            cr.move_to(
                c.x - ext.x_advance() / 2.0,
                y - ext.y_bearing() - ext.height() / 2.0,
            );
            cr.show_text(line)?;
        }
        Ok(())
    }
}

fn draw_logo(cr: &Context, rect: Rect, pixbuf: &Pixbuf) -> Result<(), cairo::Error> {
    let (w, h) = (pixbuf.width() as f64, pixbuf.height() as f64);
    if w <= 0.0 || h <= 0.0 {
        return Ok(());
    }
    let scale = (rect.width / w).min(rect.height / h);
    let c = rect.center();

    cr.save()?;
    cr.translate(c.x - w * scale / 2.0, c.y - h * scale / 2.0);
    cr.scale(scale, scale);
    cr.set_source_pixbuf(pixbuf, 0.0, 0.0);
    cr.paint()?;
    cr.restore()
}

fn draw_center(
    cr: &Context,
    frame: &Frame,
    logo: Option<&Pixbuf>,
    colors: &ThemeColors,
) -> Result<(), cairo::Error> {
    let c = frame.center;
    cr.new_sub_path();
    cr.arc(c.x, c.y, frame.inner_radius, 0.0, 2.0 * PI);
    set_color(cr, frame.center_color, 1.0);
    cr.fill_preserve()?;
    set_theme_color(cr, colors.center_ring);
    cr.set_line_width(CENTER_RING_WIDTH);
    cr.stroke()?;

    if let (Some(rect), Some(pixbuf)) = (frame.logo, logo) {
        draw_logo(cr, rect, pixbuf)?;
    }
    Ok(())
}

pub fn draw(cr: &Context, state: &State, colors: &ThemeColors) -> Result<(), cairo::Error> {
    set_theme_color(cr, colors.background);
    cr.paint()?;

    let frame = state.chart.frame();
    let viewport = state.viewport;
    cr.save()?;
    cr.translate(viewport.offset.x, viewport.offset.y);
    cr.scale(viewport.scale, viewport.scale);

    for wedge in &frame.wedges {
        WedgeRenderer::new(wedge, &frame).draw(cr)?;
    }
    draw_center(cr, &frame, state.logo.as_ref(), colors)?;
    for label in frame.labels_in_paint_order() {
        LabelRenderer::new(label, &state.data.style).draw(cr)?;
    }

    cr.restore()
}
