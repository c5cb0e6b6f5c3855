// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! The editor: entry point for pointer and keyboard input.
//!
//! `PathEditor` resolves each pointer sample to a canvas position (seam
//! correction, UV -> canvas), drops samples that are non-finite or off the
//! canvas, dispatches the rest to the active tool and then publishes
//! whatever the tool changed. When a gesture ends with the shapes changed,
//! every shape is redrawn into the host's active layer between a snapshot
//! and a commit.

use crate::config::EngineConfig;
use crate::editing::{AnchorRef, EditSession, KeyCommand, PointerDelegate, PointerEvent, PointerSample, SelectionState};
use crate::geometry::is_finite_point;
use crate::model::EntityId;
use crate::path::{Path, PathStyle, Shape};
use crate::render::{self, RenderMode, StitchConfig};
use crate::surface::{self, CanvasSize, SurfaceMapper, SurfaceSample};
use crate::tools::{EditState, ToolBox, ToolId};
use kurbo::Point;
use tiny_skia::Pixmap;

// ============================================================================
// HOST INTERFACES
// ============================================================================

/// Application state the editor reads from and publishes to
pub trait EditorHost {
    /// Tool the user has chosen
    fn tool_id(&self) -> ToolId;

    /// Style for new paths
    fn path_style(&self) -> PathStyle;

    /// Stitch parameters for new shapes; `None` commits plain shapes
    fn stitch_config(&self) -> Option<StitchConfig>;

    fn publish_shapes(&mut self, shapes: &[Shape]);

    fn publish_current_path(&mut self, path: Option<&Path>);

    fn publish_selection(&mut self, selection: &SelectionState);
}

/// The layer being painted
#[derive(Debug)]
pub struct ActiveLayer<'a> {
    pub canvas: &'a mut Pixmap,
    /// Only already-painted pixels may change
    pub lock_transparent: bool,
}

/// Layer stack and undo boundaries
pub trait LayerHost {
    fn active_layer(&mut self) -> Option<ActiveLayer<'_>>;

    /// Recompose the full texture after a layer changed
    fn compose_layers(&mut self);

    /// Undo boundary before a change
    fn snapshot(&mut self);

    /// Undo boundary after a change
    fn commit(&mut self);
}

// ============================================================================
// PATH EDITOR
// ============================================================================

/// Drives an [`EditSession`] from input events
#[derive(Debug)]
pub struct PathEditor<H, L> {
    session: EditSession,
    tool: ToolBox,
    host: H,
    layers: L,
    surface: Option<SurfaceMapper>,
    canvas: CanvasSize,
    /// Layer pixels as they were before any shape was drawn into them
    backdrop: Option<Pixmap>,
    /// Shapes changed since the layer was last redrawn
    layer_dirty: bool,
}

impl<H: EditorHost, L: LayerHost> PathEditor<H, L> {
    pub fn new(host: H, layers: L, canvas: CanvasSize, config: EngineConfig) -> Self {
        let tool = ToolBox::for_id(host.tool_id());
        Self {
            session: EditSession::new(config),
            tool,
            host,
            layers,
            surface: None,
            canvas,
            backdrop: None,
            layer_dirty: false,
        }
    }

    /// Map UV input through `mapper`
    pub fn with_surface(mut self, mapper: SurfaceMapper) -> Self {
        self.surface = Some(mapper);
        self
    }

    /// Start from existing shapes
    pub fn with_shapes(mut self, shapes: Vec<Shape>) -> Self {
        self.session = self.session.with_shapes(shapes);
        self.flush();
        self
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn layers(&self) -> &L {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut L {
        &mut self.layers
    }

    pub fn surface(&self) -> Option<&SurfaceMapper> {
        self.surface.as_ref()
    }

    pub fn set_surface(&mut self, mapper: Option<SurfaceMapper>) {
        self.surface = mapper;
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas
    }

    pub fn set_canvas_size(&mut self, canvas: CanvasSize) {
        self.canvas = canvas;
    }

    /// Forget the layer pixels kept under the shapes. Call after switching
    /// the active layer; the next redraw keeps that layer as it is then.
    pub fn reset_backdrop(&mut self) {
        self.backdrop = None;
    }

    pub fn tool_id(&self) -> ToolId {
        self.tool.id()
    }

    /// Interaction state of the active tool
    pub fn state(&self) -> EditState {
        self.tool.state(&self.session)
    }

    /// Follow the host's tool choice. Leaving a tool ends its gesture and
    /// commits or discards the current path.
    pub fn sync_tool(&mut self) {
        let wanted = self.host.tool_id();
        if wanted == self.tool.id() {
            return;
        }
        tracing::info!("Switching tool {:?} -> {:?}", self.tool.id(), wanted);
        self.tool.exit(&mut self.session);
        self.tool = ToolBox::for_id(wanted);
        self.flush();
    }

    /// Handle one pointer event. Returns false when the sample was rejected.
    pub fn handle_pointer(&mut self, mut event: PointerEvent) -> bool {
        let Some(point) = self.resolve(event.sample()) else {
            if let PointerEvent::Up(sample) = event {
                self.release_off_canvas(sample);
            }
            return false;
        };
        let sample = event.sample_mut();
        sample.x = point.x;
        sample.y = point.y;

        if matches!(event, PointerEvent::Down(_)) {
            self.sync_tool();
        }
        self.session.style = self.host.path_style();
        self.session.stitch_kind = self.host.stitch_config().map(|config| config.kind);

        match &event {
            PointerEvent::Down(sample) => self.tool.pointer_down(sample, &mut self.session),
            PointerEvent::Move(sample) => self.tool.pointer_move(sample, &mut self.session),
            PointerEvent::Up(sample) => self.tool.pointer_up(sample, &mut self.session),
            PointerEvent::DoubleClick(sample) => self.tool.double_click(sample, &mut self.session),
        }
        self.flush();
        true
    }

    pub fn handle_key(&mut self, command: KeyCommand) {
        tracing::debug!("[PathEditor::handle_key] {:?} with {:?}", command, self.tool.id());
        match command {
            KeyCommand::Delete => match self.state() {
                EditState::Idle | EditState::Drawing => {
                    let effect = self.session.delete_selection();
                    tracing::debug!("[PathEditor::handle_key] delete: {:?}", effect);
                }
                state => tracing::debug!("[PathEditor::handle_key] delete ignored while {:?}", state),
            },
            KeyCommand::Commit => {
                self.tool.cancel(&mut self.session);
                self.session.commit_current_path(self.tool.id());
            }
            KeyCommand::Cancel => {
                self.tool.cancel(&mut self.session);
                self.session.discard_current_path();
            }
        }
        self.flush();
    }

    /// End the gesture of a release that was dropped. A finite position is
    /// clamped onto the canvas and released there; anything else cancels.
    fn release_off_canvas(&mut self, mut sample: PointerSample) {
        let point = sample.point();
        if sample.uv.is_none() && is_finite_point(point) {
            let point = self.canvas.clamp(point);
            sample.x = point.x;
            sample.y = point.y;
            self.tool.pointer_up(&sample, &mut self.session);
        } else {
            self.tool.cancel(&mut self.session);
        }
        tracing::debug!("[PathEditor::release_off_canvas] now {:?}", self.state());
        self.flush();
    }

    /// Pointer position in canvas pixels, or `None` when the sample must be
    /// dropped
    fn resolve(&mut self, sample: &PointerSample) -> Option<Point> {
        let point = match sample.uv {
            Some(raw) => {
                let surface_config = self.session.config.surface;
                surface::canvas::check_round_trip(raw, self.canvas, surface_config.round_trip_tolerance);
                let uv = match self.surface.as_mut() {
                    Some(mapper) => mapper.correct(raw, self.canvas).map(|c| c.uv),
                    None => raw.is_finite().then_some(raw),
                };
                let Some(uv) = uv else {
                    tracing::debug!("[PathEditor::resolve] dropped non-finite uv {:?}", raw);
                    return None;
                };
                surface::uv_to_canvas(uv, self.canvas).pixel
            }
            None => sample.point(),
        };

        if !is_finite_point(point) || !self.canvas.contains(point) {
            tracing::debug!("[PathEditor::resolve] dropped sample at {:?}", point);
            return None;
        }
        Some(point)
    }

    /// Publish pending changes. Once no drag is active, redraw the layer
    /// if shapes changed.
    fn flush(&mut self) {
        let changes = self.session.take_changes();
        if changes.shapes {
            self.host.publish_shapes(self.session.shapes());
        }
        if changes.current_path {
            self.host.publish_current_path(self.session.current_path());
        }
        if changes.selection {
            self.host.publish_selection(&self.session.selection);
        }
        if !changes.committed.is_empty() {
            tracing::debug!("[PathEditor::flush] committed {:?}", changes.committed);
        }
        self.layer_dirty |= changes.shapes;
        if self.layer_dirty && !self.session.selection.is_dragging() {
            self.refresh_layer();
        }
    }

    /// Redraw every shape into the active layer as one undo step
    ///
    /// The layer is first restored to its backdrop, so moved, reshaped and
    /// removed shapes leave no pixels behind.
    fn refresh_layer(&mut self) {
        self.layer_dirty = false;
        if self.backdrop.is_none() && self.session.shapes().is_empty() {
            return;
        }
        let Some(mut vector) = Pixmap::new(self.canvas.width, self.canvas.height) else {
            tracing::warn!("Cannot rasterize onto a {}x{} canvas", self.canvas.width, self.canvas.height);
            return;
        };
        let drawn = self.draw_shapes(&mut vector);

        if self.layers.active_layer().is_none() {
            tracing::warn!("No active layer; {} shape(s) not rasterized", drawn);
            return;
        }
        self.layers.snapshot();
        if let Some(layer) = self.layers.active_layer() {
            let fits = self
                .backdrop
                .as_ref()
                .is_some_and(|b| b.width() == layer.canvas.width() && b.height() == layer.canvas.height());
            if !fits {
                self.backdrop = Some(layer.canvas.clone());
            }
            if let Some(backdrop) = &self.backdrop {
                layer.canvas.data_mut().copy_from_slice(backdrop.data());
            }
            render::composite_onto(layer.canvas, &vector, layer.lock_transparent);
        }
        self.layers.compose_layers();
        self.layers.commit();
        tracing::debug!("[PathEditor::refresh_layer] redrew {} shape(s)", drawn);
    }

    /// Render every shape onto `canvas`, returning how many were drawn
    fn draw_shapes(&self, canvas: &mut Pixmap) -> usize {
        let stitch = self.host.stitch_config().unwrap_or(self.session.config.stitch);
        let mut drawn = 0;
        for shape in self.session.shapes() {
            match render::render_shape(canvas, shape, &stitch) {
                Ok(_) => drawn += 1,
                Err(err) => tracing::warn!("Failed to render shape {:?}: {}", shape.id(), err),
            }
        }
        drawn
    }

    /// Surface points of the anchors being edited: the current path's, or
    /// else those of the selected shapes. Empty without a surface.
    pub fn anchor_markers(&self) -> Vec<(AnchorRef, SurfaceSample)> {
        let Some(mapper) = &self.surface else {
            return Vec::new();
        };
        let canvas = self.canvas;
        let owners: Vec<EntityId> = match self.session.current_path() {
            Some(path) => vec![path.id],
            None => self.session.selection.selected_shape_ids.iter().copied().collect(),
        };
        owners
            .into_iter()
            .filter_map(|owner| self.session.path(owner).map(|path| (owner, path)))
            .flat_map(|(owner, path)| {
                path.positions().enumerate().map(move |(index, position)| {
                    (
                        AnchorRef { owner, index },
                        mapper.canvas_to_world(position, canvas),
                    )
                })
            })
            .collect()
    }

    /// Draw every shape and the current path onto `canvas`
    pub fn render_all(&self, canvas: &mut Pixmap) {
        self.draw_shapes(canvas);
        if let Some(path) = self.session.current_path()
            && let Err(err) = render::render(canvas, path, RenderMode::Plain)
        {
            tracing::debug!("[PathEditor::render_all] current path: {}", err);
        }
    }
}
