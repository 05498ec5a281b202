use super::FONT_FAMILY;
use cairo::{Context, FontSlant, FontWeight, Format, ImageSurface};
use sunburst::text::{EstimatingMeasurer, TextExtent, TextMeasurer};

/// Measures label lines with cairo's toy text API, the same one the view draws with.
pub struct CairoMeasurer {
    cr: Option<Context>,
}

impl CairoMeasurer {
    pub fn new() -> Self {
        let cr = ImageSurface::create(Format::ARgb32, 1, 1)
            .and_then(|surface| Context::new(&surface))
            .map_err(|e| log::warn!("No cairo context for text measurement, estimating: {}", e))
            .ok();
        Self { cr }
    }
}

impl Default for CairoMeasurer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextMeasurer for CairoMeasurer {
    fn measure(&self, text: &str, font_size: f64) -> TextExtent {
        let Some(cr) = &self.cr else {
            return EstimatingMeasurer.measure(text, font_size);
        };
        cr.select_font_face(FONT_FAMILY, FontSlant::Normal, FontWeight::Normal);
        cr.set_font_size(font_size);
        match (cr.text_extents(text), cr.font_extents()) {
            (Ok(ext), Ok(font)) => TextExtent {
                width: ext.x_advance(),
                height: font.ascent() + font.descent(),
            },
            _ => EstimatingMeasurer.measure(text, font_size),
        }
    }
}
