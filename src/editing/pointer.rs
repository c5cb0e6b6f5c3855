// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Input events delivered to the editor.
//!
//! A `PointerSample` is the one value type every pointer event carries, so
//! the state machine never depends on a windowing toolkit or a 3D
//! library's event objects.

use kurbo::Point;

/// Keyboard modifiers held during a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub ctrl: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        alt: false,
        ctrl: false,
    };
}

/// A picking ray in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: glam::Vec3,
    pub direction: glam::Vec3,
}

/// One pointer sample.
///
/// `x`/`y` are canvas coordinates. When `uv` is present (the pointer is
/// over the mesh) it takes precedence and is corrected and mapped to the
/// canvas by the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub uv: Option<glam::Vec2>,
    pub ray: Option<Ray>,
    pub pressure: f32,
    pub modifiers: Modifiers,
    /// Primary button held
    pub primary_down: bool,
    /// Monotonic timestamp used for debouncing
    pub time_ms: u64,
}

impl PointerSample {
    /// A canvas-space sample with the primary button up
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            uv: None,
            ray: None,
            pressure: 1.0,
            modifiers: Modifiers::NONE,
            primary_down: false,
            time_ms: 0,
        }
    }

    /// A sample originating from a UV hit on the mesh
    pub fn from_uv(uv: glam::Vec2) -> Self {
        Self {
            uv: Some(uv),
            ..Self::at(0.0, 0.0)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn pressed(mut self, primary_down: bool) -> Self {
        self.primary_down = primary_down;
        self
    }

    pub fn at_time(mut self, time_ms: u64) -> Self {
        self.time_ms = time_ms;
        self
    }

    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// A pointer event with its sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointerSample),
    Move(PointerSample),
    Up(PointerSample),
    DoubleClick(PointerSample),
}

impl PointerEvent {
    pub fn sample(&self) -> &PointerSample {
        match self {
            PointerEvent::Down(s)
            | PointerEvent::Move(s)
            | PointerEvent::Up(s)
            | PointerEvent::DoubleClick(s) => s,
        }
    }

    pub fn sample_mut(&mut self) -> &mut PointerSample {
        match self {
            PointerEvent::Down(s)
            | PointerEvent::Move(s)
            | PointerEvent::Up(s)
            | PointerEvent::DoubleClick(s) => s,
        }
    }
}

/// Receiver of a gesture's pointer events.
///
/// Samples arrive already resolved to finite, in-canvas coordinates.
pub trait PointerDelegate {
    type Data;

    fn pointer_down(&mut self, _sample: &PointerSample, _data: &mut Self::Data) {}

    fn pointer_move(&mut self, _sample: &PointerSample, _data: &mut Self::Data) {}

    fn pointer_up(&mut self, _sample: &PointerSample, _data: &mut Self::Data) {}

    fn double_click(&mut self, _sample: &PointerSample, _data: &mut Self::Data) {}

    /// Abandon the gesture in progress
    fn cancel(&mut self, _data: &mut Self::Data) {}
}

/// Keyboard commands the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// Delete / Backspace
    Delete,
    /// Enter: commit the current path
    Commit,
    /// Escape: discard the current path and drop the drag
    Cancel,
}
