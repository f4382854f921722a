use crate::config::{self, Config};
use crate::events::AppEvent;
use crate::gui::glass::{self, State};
use crate::gui::theme::{self, ThemeColors};
use crate::sys::sampler::SamplerControl;
use gtk::prelude::*;
use gtk4 as gtk;
use gyrio::TiltSample;
use relm4::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::watch;

const START_PAGE: &str = "start";
const VISUALIZATION_PAGE: &str = "visualization";

pub struct AppModel {
    pub state: Rc<RefCell<State>>,
    pub config: Config,
    pub control_tx: watch::Sender<SamplerControl>,
    pub stack: gtk::Stack,
    pub drawing_area: gtk::DrawingArea,
}

#[derive(Debug)]
pub enum AppMsg {
    ShowVisualization,
    ShowStart,
    Sample(TiltSample),
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::Sample(s) => AppMsg::Sample(s),
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

impl AppModel {
    /// Pushes the sampler's desired state: active only while the
    /// visualization screen is shown, period from the configured rate
    /// hint.
    fn send_control(&self, active: bool) {
        let control = SamplerControl {
            active,
            period: self.config.sensor.rate.period(),
        };
        if self.control_tx.send(control).is_err() {
            log::debug!("sampler is gone; control update dropped");
        }
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (
        Config,
        watch::Sender<SamplerControl>,
        async_channel::Receiver<AppEvent>,
    );
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        #[name = "window"]
        gtk::ApplicationWindow {
            set_title: Some("Tilt Glass"),
            set_default_width: 420,
            set_default_height: 560,
            add_css_class: "tiltglass-window",

            add_controller = gtk::EventControllerKey {
                connect_key_pressed[sender] => move |_, key, _, _| {
                    if key == gtk::gdk::Key::Escape {
                        sender.input(AppMsg::ShowStart);
                        return glib::Propagation::Stop;
                    }
                    glib::Propagation::Proceed
                }
            },

            #[name = "stack"]
            gtk::Stack {
                set_transition_type: gtk::StackTransitionType::SlideLeft,

                add_named[Some(START_PAGE)] = &gtk::Box {
                    set_orientation: gtk::Orientation::Vertical,
                    set_halign: gtk::Align::Center,
                    set_valign: gtk::Align::Center,
                    set_spacing: 16,
                    add_css_class: "tiltglass-start",

                    gtk::Label {
                        set_label: "Tilt Glass",
                        add_css_class: "title-1",
                    },

                    gtk::Label {
                        set_label: "Water in a glass, moved by the gyroscope",
                    },

                    gtk::Button {
                        set_label: "Show",
                        connect_clicked[sender] => move |_| {
                            sender.input(AppMsg::ShowVisualization);
                        }
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, control_tx, rx) = init;

        theme::load_css();

        let state = Rc::new(RefCell::new(State::new()));

        let model = AppModel {
            state: state.clone(),
            config,
            control_tx,
            stack: gtk::Stack::default(),
            drawing_area: gtk::DrawingArea::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.stack = widgets.stack.clone();

        let drawing_area = gtk::DrawingArea::builder()
            .hexpand(true)
            .vexpand(true)
            .build();
        drawing_area.add_css_class("tiltglass-canvas");

        let state_draw = state.clone();
        drawing_area.set_draw_func(move |area, cr, width, height| {
            let style_context = area.style_context();
            let colors = ThemeColors::from_context(&style_context);
            if let Err(e) = glass::draw(
                cr,
                &state_draw.borrow(),
                &colors,
                width as f64,
                height as f64,
            ) {
                log::error!("Drawing error: {}", e);
            }
        });

        widgets
            .stack
            .add_named(&drawing_area, Some(VISUALIZATION_PAGE));
        model.drawing_area = drawing_area;

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
            AppMsg::ShowVisualization => {
                self.state.borrow_mut().activate();
                self.send_control(true);
                self.stack.set_visible_child_name(VISUALIZATION_PAGE);
                self.drawing_area.queue_draw();
            }
            AppMsg::ShowStart => {
                self.state.borrow_mut().deactivate();
                self.send_control(false);
                self.stack.set_visible_child_name(START_PAGE);
            }
            AppMsg::Sample(sample) => {
                if self.state.borrow_mut().apply_sample(sample) {
                    self.drawing_area.queue_draw();
                }
            }
            AppMsg::ConfigReload => match config::load_config() {
                Ok(new_config) => {
                    let rate_changed = new_config.sensor.rate != self.config.sensor.rate;
                    let device_changed = new_config.sensor.device != self.config.sensor.device;
                    self.config = new_config;

                    if rate_changed {
                        self.send_control(self.state.borrow().sampling);
                    }
                    if device_changed {
                        log::warn!("sensor device changed; restart to pick up the new device");
                    }
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("Failed to reload config: {}", e),
            },
        }
    }
}
