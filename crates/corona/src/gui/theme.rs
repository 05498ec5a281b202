use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use palette::Srgba;
use sunburst::color::Color;

pub struct ThemeColors {
    pub background: Srgba<f64>,
    pub center_ring: Srgba<f64>,
}

impl ThemeColors {
    pub fn from_context(context: &gtk::StyleContext) -> Self {
        Self {
            background: Self::lookup_color(
                context,
                "theme_base_color",
                Srgba::new(1.0, 1.0, 1.0, 1.0),
                Some(1.0),
            ),
            center_ring: Self::lookup_color(
                context,
                "borders",
                Srgba::new(0.8, 0.8, 0.8, 1.0),
                None,
            ),
        }
    }

    fn lookup_color(
        context: &gtk::StyleContext,
        name: &str,
        fallback: Srgba<f64>,
        alpha_override: Option<f64>,
    ) -> Srgba<f64> {
        context
            .lookup_color(name)
            .map(|c| {
                Srgba::new(
                    c.red() as f64,
                    c.green() as f64,
                    c.blue() as f64,
                    alpha_override.unwrap_or(c.alpha() as f64),
                )
            })
            .unwrap_or(fallback)
    }
}

fn add_provider(provider: &gtk::CssProvider) {
    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.corona-drawing-area {
    background: none;
}
.corona-panel {
    padding: 16px 20px;
    border-radius: 6px;
    border-left: 4px solid @borders;
    background-color: alpha(@theme_base_color, 0.95);
    box-shadow: 0 2px 8px alpha(black, 0.15);
}
.corona-panel-title {
    font-weight: bold;
    font-size: 1.2em;
}
.corona-panel-body {
    font-size: 0.95em;
}
";
    provider.load_from_data(css_data);
    add_provider(&provider);
}

/// Tints the description panel with the active wedge's colour.
pub struct AccentStyle {
    provider: gtk::CssProvider,
    current: Option<Color>,
}

impl AccentStyle {
    pub fn install() -> Self {
        let provider = gtk::CssProvider::new();
        add_provider(&provider);
        Self {
            provider,
            current: None,
        }
    }

    pub fn apply(&mut self, accent: Color) {
        if self.current == Some(accent) {
            return;
        }
        self.provider.load_from_data(&accent_css(accent));
        self.current = Some(accent);
    }
}

fn accent_css(accent: Color) -> String {
    format!(
        ".corona-panel {{ border-left-color: {accent}; }}\n.corona-panel-title {{ color: {accent}; }}\n"
    )
}
