// ============================================================================
// WINDOW AND FRAME LOOP
// ============================================================================

use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::animation::Clockwork;
use crate::config::ClockConfig;
use crate::controls::{ControlPanel, PanelKey, PanelLayout};
use crate::error::Result;
use crate::face::{add_face, FaceLayout};
use crate::font::load_font;
use crate::render::{Canvas, DrawCommand, Scene};
use crate::state::{ClockCommand, ClockState};

/// Everything the frame loop mutates.
pub(crate) struct AppState {
    state: ClockState,
    clockwork: Clockwork,
    panel: ControlPanel,
}

impl AppState {
    pub(crate) fn new(state: ClockState, config: &ClockConfig) -> Self {
        Self {
            clockwork: Clockwork::for_state(&state),
            panel: ControlPanel::new(&state, config),
            state,
        }
    }

    pub(crate) fn state(&self) -> &ClockState {
        &self.state
    }

    pub(crate) fn clockwork(&self) -> &Clockwork {
        &self.clockwork
    }

    /// Applies a command. Setting the time replaces every animation at once.
    pub(crate) fn apply(&mut self, command: ClockCommand) {
        let next = self.state.apply(command);
        log::debug!("{command:?}: {:?} -> {:?}", self.state, next);
        self.state = next;
        match command {
            ClockCommand::SetTime(time) => {
                self.clockwork = Clockwork::for_state(&self.state);
                self.panel.show_time(time);
            }
            _ => self.clockwork.sync(&self.state),
        }
    }

    pub(crate) fn update(&mut self, dt: f64) {
        self.clockwork.advance(dt);
        self.panel.tick(dt);
    }

    pub(crate) fn update_with_commands(&mut self, receiver: &Receiver<ClockCommand>, dt: f64) {
        while let Ok(command) = receiver.try_recv() {
            self.apply(command);
        }
        self.update(dt);
    }

    fn handle(&mut self, command: Option<ClockCommand>) {
        if let Some(command) = command {
            self.apply(command);
        }
    }

    pub(crate) fn on_key(&mut self, key: PanelKey) {
        let command = self.panel.on_key(key, &self.state);
        self.handle(command);
    }

    pub(crate) fn on_press(&mut self, layout: &PanelLayout, x: f64, y: f64) {
        let command = self.panel.on_press(layout, x, y, &self.state);
        self.handle(command);
    }

    pub(crate) fn on_drag(&mut self, layout: &PanelLayout, x: f64) {
        let command = self.panel.on_drag(layout, x, &self.state);
        self.handle(command);
    }

    pub(crate) fn on_release(&mut self) {
        self.panel.on_release();
    }
}

fn panel_key(event: &KeyEvent) -> Option<PanelKey> {
    if event.state != ElementState::Pressed {
        return None;
    }
    match &event.logical_key {
        Key::Named(NamedKey::Backspace) => Some(PanelKey::Backspace),
        Key::Named(NamedKey::Tab) => Some(PanelKey::Tab),
        Key::Named(NamedKey::Enter) => Some(PanelKey::Enter),
        Key::Named(NamedKey::Space) => Some(PanelKey::Space),
        Key::Named(NamedKey::ArrowUp) => Some(PanelKey::Up),
        Key::Named(NamedKey::ArrowDown) => Some(PanelKey::Down),
        Key::Named(NamedKey::Escape) => Some(PanelKey::Escape),
        Key::Character(text) => Some(PanelKey::Text(text.to_string())),
        _ => None,
    }
}

fn render_clock(
    canvas: &mut Canvas,
    app: &AppState,
    config: &ClockConfig,
    font: Option<&Font<'static>>,
) {
    let face = FaceLayout::new(canvas.width(), canvas.height(), config);
    let panel = PanelLayout::new(&face, config);

    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color.as_tuple()));
    add_face(&mut scene, &face, &app.clockwork().angles(), config);
    app.panel.render(&mut scene, &panel, app.state(), config);
    scene.render(canvas, font);
}

pub(crate) fn run_window(
    config: &ClockConfig,
    state: ClockState,
    receiver: Option<Receiver<ClockCommand>>,
) -> Result<()> {
    let font = match load_font(config) {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("{e}; numerals and labels will not be drawn");
            None
        }
    };

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(LogicalSize::new(
            config.window_width as f64,
            config.window_height as f64,
        ))
        .with_resizable(false)
        .build(&event_loop)?;

    let window = std::sync::Arc::new(window);
    let window_clone = window.clone();
    let size = window.inner_size();
    let mut fb_width = size.width as usize;
    let mut fb_height = size.height as usize;
    let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
    let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

    let mut app = AppState::new(state, config);
    log::info!(
        "clock started at {} (rate {:.1}, {})",
        app.state().current,
        app.state().rate,
        if app.state().running { "running" } else { "stopped" }
    );

    let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate.max(1.0));
    let mut last_frame = Instant::now();
    let mut last_update = Instant::now();
    let mut cursor = (0.0f64, 0.0f64);

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    log::info!("window closed");
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    fb_width = new_size.width as usize;
                    fb_height = new_size.height as usize;
                    if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                        log::error!("failed to resize pixel buffer: {e}");
                    }
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        log::error!("failed to resize surface: {e}");
                    }
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if let Some(key) = panel_key(&event) {
                        app.on_key(key);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = (position.x, position.y);
                    let face = FaceLayout::new(fb_width, fb_height, config);
                    app.on_drag(&PanelLayout::new(&face, config), cursor.0);
                }
                WindowEvent::MouseInput {
                    state,
                    button: MouseButton::Left,
                    ..
                } => match state {
                    ElementState::Pressed => {
                        let face = FaceLayout::new(fb_width, fb_height, config);
                        app.on_press(&PanelLayout::new(&face, config), cursor.0, cursor.1);
                    }
                    ElementState::Released => app.on_release(),
                },
                WindowEvent::RedrawRequested => {
                    let dt = last_update.elapsed().as_secs_f64();
                    last_update = Instant::now();
                    if let Some(ref receiver) = receiver {
                        app.update_with_commands(receiver, dt);
                    } else {
                        app.update(dt);
                    }

                    let frame = pixels.frame_mut();
                    let mut canvas = Canvas::new(frame, fb_width, fb_height);
                    render_clock(&mut canvas, &app, config, font.as_ref());
                    if let Err(e) = pixels.render() {
                        log::error!("render failed: {e}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window_clone.request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
