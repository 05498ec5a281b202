use crate::config;
use crate::events::AppEvent;
use crate::gui::chart::{self, CairoMeasurer, PanelView, State};
use crate::gui::theme::{self, AccentStyle, ThemeColors};
use crate::gui::window;
use gtk::prelude::*;
use gtk4 as gtk;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use sunburst::ChartData;
use sunburst::geometry::Point;

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub panel: PanelView,
    pub drawing_area: gtk::DrawingArea,
    accent: AccentStyle,
}

#[derive(Debug)]
pub enum AppMsg {
    CursorMove(Point),
    CursorLeave,
    Resize(i32, i32),
    Tick,
    DataReload,
    Quit,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::DataReload => AppMsg::DataReload,
        }
    }
}

/// Microseconds on the monotonic clock, the same base as the frame clock.
fn now() -> Duration {
    Duration::from_micros(glib::monotonic_time().max(0) as u64)
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (State, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Corona"),
            set_default_size: (default_width, default_height),
            add_css_class: "corona-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::Quit);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "overlay"]
            gtk::Overlay {
                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,
                    add_css_class: "corona-drawing-area",

                    connect_resize[sender] => move |_, width, height| {
                        sender.input(AppMsg::Resize(width, height));
                    },

                    add_controller = gtk::EventControllerMotion {
                        connect_motion[sender] => move |_, x, y| {
                            sender.input(AppMsg::CursorMove(Point::new(x, y)));
                        },
                        connect_leave[sender] => move |_| {
                            sender.input(AppMsg::CursorLeave);
                        }
                    }
                },

                add_overlay = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_spacing: 8,
                    set_valign: gtk::Align::Center,
                    set_width_request: chart::PANEL_WIDTH,
                    set_margin_start: chart::PANEL_MARGIN,
                    set_margin_end: chart::PANEL_MARGIN,
                    set_can_target: false,
                    add_css_class: "corona-panel",
                    #[watch]
                    set_visible: model.panel.visible,
                    #[watch]
                    set_opacity: model.panel.opacity,
                    #[watch]
                    set_halign: window::panel_halign(model.panel.side),

                    gtk::Label {
                        add_css_class: "corona-panel-title",
                        set_wrap: true,
                        set_xalign: 0.0,
                        #[watch]
                        set_label: &model.panel.title,
                    },

                    gtk::Label {
                        add_css_class: "corona-panel-body",
                        set_wrap: true,
                        set_xalign: 0.0,
                        #[watch]
                        set_label: &model.panel.body,
                    },
                }
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (state, rx) = init;

        theme::load_css();
        let (default_width, default_height) = window::default_size(&state.data.style);

        let model = AppModel {
            state: Rc::new(RefCell::new(state)),
            panel: PanelView::default(),
            drawing_area: gtk::DrawingArea::default(),
            accent: AccentStyle::install(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();

        let state_draw = model.state.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                if let Err(e) = chart::draw(cr, &state_draw.borrow(), &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let state_tick = model.state.clone();
        let sender_tick = sender.clone();
        widgets.drawing_area.add_tick_callback(move |area, clock| {
            let animating = {
                let mut state = state_tick.borrow_mut();
                if state.is_animating() {
                    state.tick(Duration::from_micros(clock.frame_time().max(0) as u64));
                    true
                } else {
                    false
                }
            };
            if animating {
                area.queue_draw();
                sender_tick.input(AppMsg::Tick);
            }
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, _sender: ComponentSender<Self>) {
        match msg {
            AppMsg::CursorMove(point) => {
                let action = self.state.borrow_mut().update_cursor(point, now());
                window::set_hover_cursor(&self.drawing_area, action.hovered.is_some());
                if action.should_redraw {
                    self.sync_panel();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::CursorLeave => {
                let action = self.state.borrow_mut().leave(now());
                window::set_hover_cursor(&self.drawing_area, false);
                if action.should_redraw {
                    self.sync_panel();
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::Resize(width, height) => {
                self.state
                    .borrow_mut()
                    .resize(width as f64, height as f64);
                self.drawing_area.queue_draw();
            }
            AppMsg::Tick => self.sync_panel(),
            AppMsg::DataReload => {
                let data = config::load_data().unwrap_or_else(|e| {
                    log::error!("Failed to reload chart data: {}, using fallback items", e);
                    ChartData::fallback()
                });
                match self.state.borrow_mut().reload(data, &CairoMeasurer::new()) {
                    Ok(()) => log::info!("Chart data reloaded"),
                    Err(e) => log::error!("Keeping the current chart: {}", e),
                }
                self.sync_panel();
                self.drawing_area.queue_draw();
            }
            AppMsg::Quit => relm4::main_application().quit(),
        }
    }
}

impl AppModel {
    fn sync_panel(&mut self) {
        self.panel = self.state.borrow().panel_view();
        if let Some(accent) = self.panel.accent {
            self.accent.apply(accent);
        }
    }
}
