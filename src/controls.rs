//! Control panel next to the clock face: stop/continue buttons, the rate
//! slider, and the manual time fields.
//!
//! The panel turns pointer and key input into [`ClockCommand`]s; it never
//! touches the animations itself.

use crate::config::ClockConfig;
use crate::face::FaceLayout;
use crate::input::{TimeEntry, TimeField};
use crate::render::{DrawCommand, Scene};
use crate::state::{ClockCommand, ClockState};
use crate::timing::ClockTime;

const MINOR_TICKS_PER_UNIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Bounds {
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.w && y >= self.y && y <= self.y + self.h
    }

    pub fn center(&self) -> (i32, i32) {
        (
            (self.x + self.w / 2.0).round() as i32,
            (self.y + self.h / 2.0).round() as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Stop,
    Continue,
    Slider,
    Field(TimeField),
    SetTime,
}

/// Keys the panel reacts to, independent of the windowing library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelKey {
    Text(String),
    Backspace,
    Tab,
    Enter,
    Space,
    Up,
    Down,
    Escape,
}

/// Panel geometry in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub origin_x: f64,
    pub width: f64,
    pub scale: f64,
    pub stop: Bounds,
    pub resume: Bounds,
    pub slider: Bounds,
    pub fields: [Bounds; 3],
    pub set_time: Bounds,
}

impl PanelLayout {
    pub fn new(face: &FaceLayout, config: &ClockConfig) -> Self {
        let s = face.scale;
        let origin_x = config.window_height as f64 * s;
        let width = (config.window_width as f64 * s - origin_x).max(0.0);
        let at = |x: f64, y: f64, w: f64, h: f64| Bounds {
            x: origin_x + x * s,
            y: y * s,
            w: w * s,
            h: h * s,
        };
        let margin = 20.0;
        let logical_width = width / s.max(f64::MIN_POSITIVE);
        Self {
            origin_x,
            width,
            scale: s,
            stop: at(margin, 20.0, 100.0, 36.0),
            resume: at(margin + 110.0, 20.0, 120.0, 36.0),
            slider: at(margin, 110.0, (logical_width - 2.0 * margin).max(1.0), 20.0),
            fields: [
                at(margin, 210.0, 60.0, 36.0),
                at(margin + 70.0, 210.0, 60.0, 36.0),
                at(margin + 140.0, 210.0, 60.0, 36.0),
            ],
            set_time: at(margin + 220.0, 210.0, 80.0, 36.0),
        }
    }

    pub fn hit(&self, x: f64, y: f64) -> Option<Control> {
        if self.stop.contains(x, y) {
            return Some(Control::Stop);
        }
        if self.resume.contains(x, y) {
            return Some(Control::Continue);
        }
        if self.slider.contains(x, y) {
            return Some(Control::Slider);
        }
        if self.set_time.contains(x, y) {
            return Some(Control::SetTime);
        }
        TimeField::ALL
            .iter()
            .zip(self.fields.iter())
            .find(|(_, bounds)| bounds.contains(x, y))
            .map(|(field, _)| Control::Field(*field))
    }

    /// Rate for a pointer x position on the slider, snapped to `step`.
    pub fn slider_rate(&self, x: f64, max_rate: f64, step: f64) -> f64 {
        let t = ((x - self.slider.x) / self.slider.w).clamp(0.0, 1.0);
        snap_rate(t * max_rate, max_rate, step)
    }

    fn slider_x(&self, rate: f64, max_rate: f64) -> f64 {
        let t = if max_rate > 0.0 {
            (rate / max_rate).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.slider.x + t * self.slider.w
    }
}

pub fn snap_rate(rate: f64, max_rate: f64, step: f64) -> f64 {
    // Divide by the step count so decimal steps land on exact values.
    let snapped = if step > 0.0 {
        (rate / step).round() / (1.0 / step)
    } else {
        rate
    };
    snapped.clamp(0.0, max_rate.max(0.0))
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub text: String,
    pub is_error: bool,
    pub remaining_seconds: f64,
}

/// Interactive state of the panel.
#[derive(Debug, Clone)]
pub struct ControlPanel {
    entry: TimeEntry,
    notification: Option<Notification>,
    dragging_slider: bool,
    notification_seconds: f64,
    max_rate: f64,
    rate_step: f64,
}

impl ControlPanel {
    pub fn new(state: &ClockState, config: &ClockConfig) -> Self {
        Self {
            entry: TimeEntry::prefilled(state.current),
            notification: None,
            dragging_slider: false,
            notification_seconds: config.notification_seconds,
            max_rate: config.max_rate,
            rate_step: config.rate_step,
        }
    }

    pub fn entry(&self) -> &TimeEntry {
        &self.entry
    }

    /// Refills the time fields with `time`, keeping focus where it was.
    pub fn show_time(&mut self, time: ClockTime) {
        let focus = self.entry.focus();
        self.entry = TimeEntry::prefilled(time);
        self.entry.set_focus(focus);
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn notify(&mut self, text: impl Into<String>, is_error: bool) {
        self.notification = Some(Notification {
            text: text.into(),
            is_error,
            remaining_seconds: self.notification_seconds,
        });
    }

    /// Ages the notification line.
    pub fn tick(&mut self, dt: f64) {
        if let Some(n) = self.notification.as_mut() {
            n.remaining_seconds -= dt;
            if n.remaining_seconds <= 0.0 {
                self.notification = None;
            }
        }
    }

    fn submit(&mut self) -> Option<ClockCommand> {
        match self.entry.submit() {
            Ok(time) => {
                log::info!("manual time set to {time}");
                self.show_time(time);
                self.notify(format!("Time set to {time}"), false);
                Some(ClockCommand::SetTime(time))
            }
            Err(e) => {
                log::warn!("rejected manual time: {e}");
                self.notify(e.user_message(), true);
                None
            }
        }
    }

    fn nudge_rate(&self, state: &ClockState, direction: f64) -> Option<ClockCommand> {
        if !state.running {
            return None;
        }
        let rate = snap_rate(state.rate + direction * self.rate_step, self.max_rate, self.rate_step);
        Some(ClockCommand::SetRate(rate))
    }

    pub fn on_press(
        &mut self,
        layout: &PanelLayout,
        x: f64,
        y: f64,
        state: &ClockState,
    ) -> Option<ClockCommand> {
        let hit = layout.hit(x, y);
        if !matches!(hit, Some(Control::Field(_)) | Some(Control::SetTime)) {
            self.entry.set_focus(None);
        }
        match hit? {
            Control::Stop if state.running => Some(ClockCommand::Stop),
            Control::Continue if !state.running => Some(ClockCommand::Continue),
            Control::Slider if state.running => {
                self.dragging_slider = true;
                Some(ClockCommand::SetRate(layout.slider_rate(
                    x,
                    self.max_rate,
                    self.rate_step,
                )))
            }
            Control::Field(field) => {
                self.entry.set_focus(Some(field));
                None
            }
            Control::SetTime => self.submit(),
            _ => None,
        }
    }

    pub fn on_drag(&mut self, layout: &PanelLayout, x: f64, state: &ClockState) -> Option<ClockCommand> {
        if !self.dragging_slider || !state.running {
            return None;
        }
        let rate = layout.slider_rate(x, self.max_rate, self.rate_step);
        (rate != state.rate).then_some(ClockCommand::SetRate(rate))
    }

    pub fn on_release(&mut self) {
        self.dragging_slider = false;
    }

    pub fn on_key(&mut self, key: PanelKey, state: &ClockState) -> Option<ClockCommand> {
        match key {
            PanelKey::Space => Some(if state.running {
                ClockCommand::Stop
            } else {
                ClockCommand::Continue
            }),
            PanelKey::Tab => {
                self.entry.focus_next();
                None
            }
            PanelKey::Escape => {
                self.entry.set_focus(None);
                None
            }
            PanelKey::Enter => self.submit(),
            PanelKey::Backspace => {
                self.entry.backspace();
                None
            }
            PanelKey::Up => self.nudge_rate(state, 1.0),
            PanelKey::Down => self.nudge_rate(state, -1.0),
            PanelKey::Text(text) => {
                if self.entry.focus().is_some() {
                    self.entry.insert(&text);
                    None
                } else {
                    match text.as_str() {
                        "+" | "=" => self.nudge_rate(state, 1.0),
                        "-" => self.nudge_rate(state, -1.0),
                        _ => None,
                    }
                }
            }
        }
    }

    pub fn render(&self, scene: &mut Scene, layout: &PanelLayout, state: &ClockState, config: &ClockConfig) {
        let s = layout.scale;
        let font_size = config.panel_font_size * s as f32;
        let text = config.stroke_color.as_tuple();
        let accent = config.accent_color.as_tuple();
        let disabled = config.disabled_color.as_tuple();
        let panel_center = (layout.origin_x + layout.width / 2.0).round() as i32;

        button(scene, &layout.stop, "Stop", state.running, font_size, text, disabled, s);
        button(scene, &layout.resume, "Continue", !state.running, font_size, text, disabled, s);

        // Rate slider
        let slider_color = if state.running { accent } else { disabled };
        let track_y = layout.slider.y + layout.slider.h / 2.0;
        scene.add_command(DrawCommand::Line {
            x0: layout.slider.x,
            y0: track_y,
            x1: layout.slider.x + layout.slider.w,
            y1: track_y,
            thickness: (3.0 * s) as f32,
            color: slider_color,
        });
        let major_ticks = config.max_rate.max(0.0).floor() as usize;
        for i in 0..=major_ticks {
            let x = layout.slider_x(i as f64, config.max_rate);
            scene.add_command(DrawCommand::Line {
                x0: x,
                y0: layout.slider.y + layout.slider.h,
                x1: x,
                y1: layout.slider.y + layout.slider.h + 6.0 * s,
                thickness: (1.5 * s) as f32,
                color: text,
            });
            scene.add_command(DrawCommand::Text {
                x: x.round() as i32,
                y: (layout.slider.y + layout.slider.h + 20.0 * s).round() as i32,
                text: i.to_string(),
                font_size: font_size * 0.7,
                color: text,
            });
        }
        // Ten minor divisions per unit of rate.
        let minor_ticks = (config.max_rate.max(0.0) * MINOR_TICKS_PER_UNIT as f64).floor() as usize;
        for i in (0..=minor_ticks).filter(|i| i % MINOR_TICKS_PER_UNIT != 0) {
            let x = layout.slider_x(i as f64 / MINOR_TICKS_PER_UNIT as f64, config.max_rate);
            scene.add_command(DrawCommand::Line {
                x0: x,
                y0: layout.slider.y + layout.slider.h,
                x1: x,
                y1: layout.slider.y + layout.slider.h + 3.0 * s,
                thickness: (1.0 * s) as f32,
                color: text,
            });
        }
        scene.add_command(DrawCommand::Disc {
            cx: layout.slider_x(state.rate, config.max_rate),
            cy: track_y,
            radius: 8.0 * s,
            color: slider_color,
        });
        scene.add_command(DrawCommand::Text {
            x: panel_center,
            y: (layout.slider.y - 20.0 * s).round() as i32,
            text: format!("Rate {:.1}x", state.rate),
            font_size,
            color: text,
        });

        // Manual time fields
        scene.add_command(DrawCommand::Text {
            x: panel_center,
            y: (layout.fields[0].y - 22.0 * s).round() as i32,
            text: "Set time (HH MM SS)".to_string(),
            font_size,
            color: text,
        });
        for (field, bounds) in TimeField::ALL.iter().zip(layout.fields.iter()) {
            let focused = self.entry.focus() == Some(*field);
            let outline: f32 = if focused { 3.0 } else { 1.5 };
            scene.add_command(DrawCommand::Rect {
                x: bounds.x,
                y: bounds.y,
                w: bounds.w,
                h: bounds.h,
                color: if focused { accent } else { text },
                outline: Some(outline * s as f32),
            });
            let (x, y) = bounds.center();
            let contents = self.entry.text(*field);
            scene.add_command(DrawCommand::Text {
                x,
                y,
                text: if contents.is_empty() {
                    field.label().to_string()
                } else {
                    contents.to_string()
                },
                font_size,
                color: if contents.is_empty() { disabled } else { text },
            });
        }
        button(scene, &layout.set_time, "Set", true, font_size, text, disabled, s);

        if let Some(n) = &self.notification {
            scene.add_command(DrawCommand::Text {
                x: panel_center,
                y: (290.0 * s).round() as i32,
                text: n.text.clone(),
                font_size,
                color: if n.is_error {
                    config.error_color.as_tuple()
                } else {
                    text
                },
            });
        }

        let status = if !state.running {
            "Stopped".to_string()
        } else if state.rate == 0.0 {
            "Paused (rate 0)".to_string()
        } else {
            format!("Running since {}", state.current)
        };
        scene.add_command(DrawCommand::Text {
            x: panel_center,
            y: (330.0 * s).round() as i32,
            text: status,
            font_size: font_size * 0.8,
            color: text,
        });
    }
}

fn button(
    scene: &mut Scene,
    bounds: &Bounds,
    label: &str,
    enabled: bool,
    font_size: f32,
    color: (u8, u8, u8),
    disabled: (u8, u8, u8),
    scale: f64,
) {
    let color = if enabled { color } else { disabled };
    scene.add_command(DrawCommand::Rect {
        x: bounds.x,
        y: bounds.y,
        w: bounds.w,
        h: bounds.h,
        color,
        outline: Some((2.0 * scale) as f32),
    });
    let (x, y) = bounds.center();
    scene.add_command(DrawCommand::Text {
        x,
        y,
        text: label.to_string(),
        font_size,
        color,
    });
}
