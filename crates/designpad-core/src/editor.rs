//! Editing session: turns pointer input into design mutations.

use crate::config::{ConfigError, EditorConfig};
use crate::design::Design;
use crate::history::{History, Snapshot};
use crate::input::{InputEvent, PointerEvent};
use crate::layer::LayerId;
use crate::shapes::{Path, SerializableColor, Shape, ShapeId, ShapeKind};
use crate::snap::snap_point;
use crate::tools::{ToolKind, ToolSettings};
use kurbo::{Point, Vec2};
use thiserror::Error;

/// Hit tolerance for selecting shapes, in canvas units.
const SELECT_TOLERANCE: f64 = 2.0;

/// Errors raised while setting up a session.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Invalid editor configuration: {0}")]
    Config(#[from] ConfigError),
}

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorResponse {
    /// The canvas needs to be redrawn.
    pub redraw: bool,
    /// A change was committed to the design (and recorded in history).
    pub committed: bool,
}

impl EditorResponse {
    const NONE: Self = Self { redraw: false, committed: false };
    const REDRAW: Self = Self { redraw: true, committed: false };
    const COMMITTED: Self = Self { redraw: true, committed: true };
}

/// The one gesture in progress.
#[derive(Debug, Clone, Default)]
enum Gesture {
    #[default]
    Idle,
    Drawing(Path),
    Dragging {
        shape: ShapeId,
        /// Pointer position relative to the shape's top-left corner.
        grab_offset: Vec2,
        before: Snapshot,
        moved: bool,
    },
    Rotating {
        shape: ShapeId,
        before: Snapshot,
        moved: bool,
    },
}

/// An editing session over one design.
///
/// Owns the design, its history, the active tool and the gesture in progress.
/// Every committed change records exactly one history snapshot of the state
/// before it; abandoned gestures record none.
#[derive(Debug, Clone)]
pub struct EditorSession {
    design: Design,
    history: History,
    config: EditorConfig,
    /// Style and content for new strokes, shapes and text.
    pub tools: ToolSettings,
    tool: ToolKind,
    gesture: Gesture,
    selection: Option<ShapeId>,
    active_layer: LayerId,
    last_pointer: Point,
    snap_to_grid: bool,
}

impl EditorSession {
    /// Create a session with an empty design.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        Self::with_design(config, Design::new())
    }

    /// Create a session editing an existing design.
    pub fn with_design(config: EditorConfig, mut design: Design) -> Result<Self, EditorError> {
        config.validate()?;
        design.ensure_base_layer();
        let active_layer = design.base_layer().id();
        log::debug!("Editor session started with {} layer(s)", design.layers.len());
        Ok(Self {
            history: History::with_limit(config.history_limit),
            tools: ToolSettings::from_config(&config),
            snap_to_grid: config.snap_to_grid,
            config,
            design,
            tool: ToolKind::default(),
            gesture: Gesture::Idle,
            selection: None,
            active_layer,
            last_pointer: Point::ZERO,
        })
    }

    /// End the session, handing back the design.
    pub fn into_design(self) -> Design {
        self.design
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Switch tools. A gesture in progress is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if !matches!(self.gesture, Gesture::Idle) {
            log::debug!("Abandoning gesture on tool change");
        }
        self.cancel_gesture();
        self.tool = tool;
    }

    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    pub fn set_snap_to_grid(&mut self, enabled: bool) {
        self.snap_to_grid = enabled;
    }

    pub fn selection(&self) -> Option<ShapeId> {
        self.selection
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.selection
            .and_then(|id| self.design.shape(id))
            .map(|(_, shape)| shape)
    }

    /// Select a shape by id. Returns false if it does not exist.
    pub fn select(&mut self, id: ShapeId) -> bool {
        if self.design.shape(id).is_none() {
            return false;
        }
        self.selection = Some(id);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    /// Layer receiving new strokes, shapes and text.
    pub fn active_layer(&self) -> LayerId {
        self.active_layer
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        if self.design.layer(id).is_none() {
            return false;
        }
        self.active_layer = id;
        true
    }

    /// Stroke being drawn, if any (not yet part of the design).
    pub fn active_path(&self) -> Option<&Path> {
        match &self.gesture {
            Gesture::Drawing(path) => Some(path),
            _ => None,
        }
    }

    pub fn is_gesture_active(&self) -> bool {
        !matches!(self.gesture, Gesture::Idle)
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Handle a raw pointer or touch event.
    pub fn handle_input(&mut self, event: &InputEvent) -> EditorResponse {
        match event.to_pointer(self.last_pointer) {
            Some(pointer) => self.handle_pointer(pointer),
            None => EditorResponse::NONE,
        }
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> EditorResponse {
        self.last_pointer = event.position();
        match event {
            PointerEvent::Down { position } => self.pointer_down(position),
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { position } => self.pointer_up(position),
        }
    }

    fn pointer_down(&mut self, position: Point) -> EditorResponse {
        if self.is_gesture_active() {
            // One gesture at a time; extra contacts are ignored.
            return EditorResponse::NONE;
        }
        match self.tool {
            ToolKind::Draw => self.begin_stroke(position),
            ToolKind::Select => self.begin_select(position),
            ToolKind::Shape => {
                let kind = self.tools.shape_kind.clone();
                self.place_shape(kind, position)
            }
            ToolKind::Text => {
                if self.tools.text.is_empty() {
                    return EditorResponse::NONE;
                }
                let kind = ShapeKind::Text {
                    content: self.tools.text.clone(),
                    font: self.tools.font.clone(),
                };
                self.place_shape(kind, position)
            }
        }
    }

    fn pointer_move(&mut self, position: Point) -> EditorResponse {
        let pitch = self.config.grid_pitch;
        let snap = self.snap_to_grid;
        match &mut self.gesture {
            Gesture::Idle => EditorResponse::NONE,
            Gesture::Drawing(path) => {
                path.add_point(position);
                EditorResponse::REDRAW
            }
            Gesture::Dragging { shape, grab_offset, moved, .. } => {
                let target = snap_point(position - *grab_offset, pitch, snap);
                let Some(shape) = self.design.shape_mut(*shape) else {
                    return EditorResponse::NONE;
                };
                if shape.position == target {
                    return EditorResponse::NONE;
                }
                shape.move_to(target);
                *moved = true;
                EditorResponse::REDRAW
            }
            Gesture::Rotating { shape, moved, .. } => {
                let Some(shape) = self.design.shape_mut(*shape) else {
                    return EditorResponse::NONE;
                };
                shape.set_rotation(rotation_towards(shape.center(), position));
                *moved = true;
                EditorResponse::REDRAW
            }
        }
    }

    fn pointer_up(&mut self, _position: Point) -> EditorResponse {
        match std::mem::take(&mut self.gesture) {
            Gesture::Idle => EditorResponse::NONE,
            Gesture::Drawing(path) => {
                if !path.is_committable() {
                    log::debug!("Discarding {}-point stroke", path.len());
                    return EditorResponse::REDRAW;
                }
                self.history.snapshot(&self.design);
                log::debug!("Committed stroke with {} points", path.len());
                self.design.add_path(path);
                EditorResponse::COMMITTED
            }
            Gesture::Dragging { before, moved, .. } | Gesture::Rotating { before, moved, .. } => {
                if !moved {
                    return EditorResponse::NONE;
                }
                self.history.record(before);
                EditorResponse::COMMITTED
            }
        }
    }

    fn begin_stroke(&mut self, position: Point) -> EditorResponse {
        if !self.active_layer_editable() {
            log::warn!("Active layer is hidden or locked; ignoring stroke");
            return EditorResponse::NONE;
        }
        let mut path = Path::new(self.active_layer, self.tools.stroke_color, self.tools.stroke_width);
        path.add_point(position);
        self.gesture = Gesture::Drawing(path);
        EditorResponse::REDRAW
    }

    fn begin_select(&mut self, position: Point) -> EditorResponse {
        // The selected shape's rotation handle takes priority over any body.
        let on_handle = self
            .selected_shape()
            .filter(|shape| shape.hit_rotation_handle(position))
            .map(Shape::id)
            .filter(|&id| self.is_shape_editable(id));
        if let Some(id) = on_handle {
            self.gesture = Gesture::Rotating {
                shape: id,
                before: Snapshot::capture(&self.design),
                moved: false,
            };
            return EditorResponse::REDRAW;
        }

        let Some(id) = self.design.shape_at_point(position, SELECT_TOLERANCE) else {
            let had_selection = self.selection.take().is_some();
            return if had_selection { EditorResponse::REDRAW } else { EditorResponse::NONE };
        };
        let Some((_, shape)) = self.design.shape(id) else {
            return EditorResponse::NONE;
        };
        let grab_offset = position - shape.position;
        self.selection = Some(id);
        self.gesture = Gesture::Dragging {
            shape: id,
            grab_offset,
            before: Snapshot::capture(&self.design),
            moved: false,
        };
        EditorResponse::REDRAW
    }

    fn place_shape(&mut self, kind: ShapeKind, position: Point) -> EditorResponse {
        if !self.active_layer_editable() {
            log::warn!("Active layer is hidden or locked; ignoring {}", kind.name());
            return EditorResponse::NONE;
        }
        let origin = snap_point(position, self.config.grid_pitch, self.snap_to_grid);
        let shape = Shape::new(kind, origin, self.tools.shape_size)
            .with_fill(self.tools.fill_color)
            .with_stroke(self.tools.shape_stroke);

        self.history.snapshot(&self.design);
        let id = self.design.add_shape(self.active_layer, shape);
        self.selection = id;
        EditorResponse::COMMITTED
    }

    fn cancel_gesture(&mut self) {
        match std::mem::take(&mut self.gesture) {
            Gesture::Dragging { before, moved: true, .. } | Gesture::Rotating { before, moved: true, .. } => {
                // Put the shape back where the gesture found it.
                before.restore(&mut self.design);
            }
            _ => {}
        }
    }

    fn active_layer_editable(&self) -> bool {
        self.design.layer(self.active_layer).is_some_and(|l| l.is_editable())
    }

    fn is_shape_editable(&self, id: ShapeId) -> bool {
        self.design.shape(id).is_some_and(|(layer, _)| layer.is_editable())
    }

    // ------------------------------------------------------------------
    // Editing commands
    // ------------------------------------------------------------------

    /// Undo the last committed change.
    pub fn undo(&mut self) -> EditorResponse {
        self.cancel_gesture();
        if !self.history.undo(&mut self.design) {
            return EditorResponse::NONE;
        }
        self.revalidate_references();
        EditorResponse::REDRAW
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> EditorResponse {
        self.cancel_gesture();
        if !self.history.redo(&mut self.design) {
            return EditorResponse::NONE;
        }
        self.revalidate_references();
        EditorResponse::REDRAW
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Set the fill of the selected shape.
    pub fn set_fill_color(&mut self, color: SerializableColor) -> EditorResponse {
        self.tools.fill_color = color;
        self.edit_selected(|shape| {
            if shape.fill_color == color {
                return false;
            }
            shape.fill_color = color;
            true
        })
    }

    /// Set (or remove) the outline of the selected shape.
    pub fn set_stroke_color(&mut self, color: Option<SerializableColor>) -> EditorResponse {
        self.tools.shape_stroke = color;
        self.edit_selected(|shape| {
            if shape.stroke_color == color {
                return false;
            }
            shape.stroke_color = color;
            true
        })
    }

    /// Delete the selected shape.
    pub fn delete_selected(&mut self) -> EditorResponse {
        let Some(id) = self.selection else {
            return EditorResponse::NONE;
        };
        if !self.is_shape_editable(id) {
            return EditorResponse::NONE;
        }
        self.history.snapshot(&self.design);
        self.design.remove_shape(id);
        self.selection = None;
        EditorResponse::COMMITTED
    }

    /// Add a layer on top and make it active.
    pub fn add_layer(&mut self, name: impl Into<String>) -> LayerId {
        self.history.snapshot(&self.design);
        let id = self.design.add_layer(name);
        self.active_layer = id;
        id
    }

    /// Remove a layer. The last remaining layer cannot be removed.
    pub fn remove_layer(&mut self, id: LayerId) -> EditorResponse {
        if self.design.layers.len() <= 1 || self.design.layer(id).is_none() {
            return EditorResponse::NONE;
        }
        self.history.snapshot(&self.design);
        self.design.remove_layer(id);
        self.revalidate_references();
        EditorResponse::COMMITTED
    }

    pub fn toggle_layer_visibility(&mut self, id: LayerId) -> EditorResponse {
        self.edit_layer(id, |layer| layer.visible = !layer.visible)
    }

    pub fn toggle_layer_lock(&mut self, id: LayerId) -> EditorResponse {
        self.edit_layer(id, |layer| layer.locked = !layer.locked)
    }

    /// Clear the design back to a single empty layer.
    pub fn clear(&mut self) -> EditorResponse {
        self.cancel_gesture();
        if self.design.is_empty() && self.design.layers.len() == 1 {
            return EditorResponse::NONE;
        }
        self.history.snapshot(&self.design);
        self.design.clear();
        self.revalidate_references();
        EditorResponse::COMMITTED
    }

    /// Replace the design wholesale (after a load). History starts over.
    pub fn replace_design(&mut self, design: Design) {
        self.gesture = Gesture::Idle;
        self.history.clear();
        self.design = design;
        self.design.ensure_base_layer();
        self.selection = None;
        self.active_layer = self.design.base_layer().id();
    }

    fn edit_selected(&mut self, edit: impl FnOnce(&mut Shape) -> bool) -> EditorResponse {
        let Some(id) = self.selection else {
            return EditorResponse::NONE;
        };
        if !self.is_shape_editable(id) {
            return EditorResponse::NONE;
        }
        let before = Snapshot::capture(&self.design);
        let Some(shape) = self.design.shape_mut(id) else {
            return EditorResponse::NONE;
        };
        if !edit(shape) {
            return EditorResponse::NONE;
        }
        self.history.record(before);
        EditorResponse::COMMITTED
    }

    fn edit_layer(&mut self, id: LayerId, edit: impl FnOnce(&mut crate::layer::Layer)) -> EditorResponse {
        if self.design.layer(id).is_none() {
            return EditorResponse::NONE;
        }
        self.history.snapshot(&self.design);
        if let Some(layer) = self.design.layer_mut(id) {
            edit(layer);
        }
        self.revalidate_references();
        EditorResponse::COMMITTED
    }

    /// Drop references to shapes or layers that no longer exist or can't be edited.
    fn revalidate_references(&mut self) {
        if let Some(id) = self.selection {
            if !self.is_shape_editable(id) {
                self.selection = None;
            }
        }
        if self.design.layer(self.active_layer).is_none() {
            self.active_layer = self.design.base_layer().id();
        }
    }
}

/// Rotation that points a shape's "up" at `target`.
fn rotation_towards(center: Point, target: Point) -> f64 {
    let d = target - center;
    d.y.atan2(d.x) + std::f64::consts::FRAC_PI_2
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Size;

    fn session() -> EditorSession {
        EditorSession::new(EditorConfig::default()).unwrap()
    }

    fn down(s: &mut EditorSession, x: f64, y: f64) -> EditorResponse {
        s.handle_pointer(PointerEvent::Down { position: Point::new(x, y) })
    }

    fn drag(s: &mut EditorSession, x: f64, y: f64) -> EditorResponse {
        s.handle_pointer(PointerEvent::Move { position: Point::new(x, y) })
    }

    fn up(s: &mut EditorSession, x: f64, y: f64) -> EditorResponse {
        s.handle_pointer(PointerEvent::Up { position: Point::new(x, y) })
    }

    fn add_rect(s: &mut EditorSession, x: f64, y: f64) -> ShapeId {
        s.set_tool(ToolKind::Shape);
        s.tools.shape_kind = ShapeKind::Rectangle;
        s.tools.shape_size = Size::new(100.0, 100.0);
        down(s, x, y);
        up(s, x, y);
        s.set_tool(ToolKind::Select);
        s.selection().unwrap()
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = EditorConfig {
            history_limit: 0,
            ..EditorConfig::default()
        };
        assert!(matches!(EditorSession::new(config), Err(EditorError::Config(_))));
    }

    #[test]
    fn test_draw_commits_stroke() {
        let mut s = session();
        s.set_tool(ToolKind::Draw);
        assert!(down(&mut s, 0.0, 0.0).redraw);
        assert!(drag(&mut s, 10.0, 5.0).redraw);
        assert_eq!(s.active_path().map(Path::len), Some(2));
        drag(&mut s, 20.0, 0.0);
        let response = up(&mut s, 20.0, 0.0);

        assert!(response.committed);
        assert_eq!(s.design().paths.len(), 1);
        assert_eq!(s.design().paths[0].len(), 3);
        assert_eq!(s.design().paths[0].layer, s.active_layer());
        assert_eq!(s.history().undo_depth(), 1);
        assert!(s.active_path().is_none());
    }

    #[test]
    fn test_single_point_stroke_discarded() {
        let mut s = session();
        s.set_tool(ToolKind::Draw);
        down(&mut s, 5.0, 5.0);
        let response = up(&mut s, 5.0, 5.0);
        assert!(!response.committed);
        assert!(s.design().paths.is_empty());
        assert!(!s.can_undo());
    }

    #[test]
    fn test_touch_draws_like_pointer() {
        let mut s = session();
        s.set_tool(ToolKind::Draw);
        s.handle_input(&InputEvent::TouchStart { touches: vec![Point::new(1.0, 1.0)] });
        s.handle_input(&InputEvent::TouchMove { touches: vec![Point::new(2.0, 2.0)] });
        let response = s.handle_input(&InputEvent::TouchEnd);
        assert!(response.committed);
        assert_eq!(s.design().paths[0].points, vec![Point::new(1.0, 1.0), Point::new(2.0, 2.0)]);
    }

    #[test]
    fn test_pointer_leave_ends_stroke() {
        let mut s = session();
        s.set_tool(ToolKind::Draw);
        down(&mut s, 0.0, 0.0);
        drag(&mut s, 3.0, 3.0);
        assert!(s.handle_input(&InputEvent::PointerLeave).committed);
        assert!(!s.is_gesture_active());
    }

    #[test]
    fn test_shape_tool_places_and_selects() {
        let mut s = session();
        let id = add_rect(&mut s, 50.0, 50.0);
        let shape = s.selected_shape().unwrap();
        assert_eq!(shape.id(), id);
        assert_eq!(shape.position, Point::new(50.0, 50.0));
        assert_eq!(shape.fill_color, EditorConfig::default().default_fill_color);
        assert_eq!(s.history().undo_depth(), 1);
    }

    #[test]
    fn test_text_tool_requires_content() {
        let mut s = session();
        s.set_tool(ToolKind::Text);
        assert!(!down(&mut s, 10.0, 10.0).committed);
        assert_eq!(s.design().shape_count(), 0);

        s.tools.text = "Hello".to_string();
        assert!(down(&mut s, 10.0, 10.0).committed);
        let shape = s.selected_shape().unwrap();
        assert!(matches!(&shape.kind, ShapeKind::Text { content, .. } if content == "Hello"));
    }

    #[test]
    fn test_drag_moves_with_grab_offset() {
        let mut s = session();
        let id = add_rect(&mut s, 0.0, 0.0);
        s.clear_selection();
        let depth = s.history().undo_depth();

        down(&mut s, 10.0, 10.0);
        assert_eq!(s.selection(), Some(id));
        drag(&mut s, 43.0, 27.0);
        let response = up(&mut s, 43.0, 27.0);

        assert!(response.committed);
        assert_eq!(s.selected_shape().unwrap().position, Point::new(33.0, 17.0));
        assert_eq!(s.history().undo_depth(), depth + 1);

        s.undo();
        assert_eq!(s.design().shape(id).unwrap().1.position, Point::ZERO);
    }

    #[test]
    fn test_drag_snaps_to_grid() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        s.set_snap_to_grid(true);
        down(&mut s, 10.0, 10.0);
        drag(&mut s, 43.0, 27.0);
        up(&mut s, 43.0, 27.0);
        assert_eq!(s.selected_shape().unwrap().position, Point::new(40.0, 20.0));
    }

    #[test]
    fn test_click_without_move_records_nothing() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        let depth = s.history().undo_depth();
        down(&mut s, 10.0, 10.0);
        assert!(!up(&mut s, 10.0, 10.0).committed);
        assert_eq!(s.history().undo_depth(), depth);
    }

    #[test]
    fn test_rotate_from_handle() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        let handle = s.selected_shape().unwrap().rotation_handle();

        down(&mut s, handle.x, handle.y);
        // Pointer straight to the right of center (50, 50) -> quarter turn.
        drag(&mut s, 200.0, 50.0);
        assert!(up(&mut s, 200.0, 50.0).committed);

        let shape = s.selected_shape().unwrap();
        assert!((shape.rotation - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
        assert_eq!(shape.position, Point::ZERO);
    }

    #[test]
    fn test_click_empty_canvas_clears_selection() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        assert!(s.selection().is_some());
        down(&mut s, 500.0, 500.0);
        up(&mut s, 500.0, 500.0);
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_locked_layer_rejects_drawing() {
        let mut s = session();
        let layer = s.active_layer();
        s.toggle_layer_lock(layer);
        s.set_tool(ToolKind::Draw);
        assert!(!down(&mut s, 0.0, 0.0).redraw);
        assert!(!s.is_gesture_active());
    }

    #[test]
    fn test_set_fill_color_records_once() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        let depth = s.history().undo_depth();
        let red = SerializableColor::new(255, 0, 0, 255);

        assert!(s.set_fill_color(red).committed);
        assert!(!s.set_fill_color(red).committed);
        assert_eq!(s.history().undo_depth(), depth + 1);
        assert_eq!(s.selected_shape().unwrap().fill_color, red);
    }

    #[test]
    fn test_delete_selected_and_undo() {
        let mut s = session();
        let id = add_rect(&mut s, 0.0, 0.0);
        assert!(s.delete_selected().committed);
        assert_eq!(s.design().shape_count(), 0);
        assert!(s.selection().is_none());

        s.undo();
        assert!(s.design().shape(id).is_some());
    }

    #[test]
    fn test_undo_drops_stale_selection() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        assert!(s.undo().redraw);
        assert!(s.selection().is_none());
    }

    #[test]
    fn test_layers() {
        let mut s = session();
        let base = s.active_layer();
        let top = s.add_layer("Ink");
        assert_eq!(s.active_layer(), top);
        assert_eq!(s.design().layers.len(), 2);

        assert!(s.toggle_layer_visibility(top).committed);
        assert!(!s.design().layer(top).unwrap().visible);

        assert!(s.remove_layer(top).committed);
        assert_eq!(s.active_layer(), base);
        assert!(!s.remove_layer(base).committed);
    }

    #[test]
    fn test_tool_change_abandons_drag() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        let depth = s.history().undo_depth();
        down(&mut s, 10.0, 10.0);
        drag(&mut s, 60.0, 60.0);
        s.set_tool(ToolKind::Draw);

        assert_eq!(s.selected_shape().unwrap().position, Point::ZERO);
        assert_eq!(s.history().undo_depth(), depth);
        assert!(!s.can_redo());
    }

    #[test]
    fn test_clear_and_replace() {
        let mut s = session();
        add_rect(&mut s, 0.0, 0.0);
        assert!(s.clear().committed);
        assert!(s.design().is_empty());
        assert!(!s.clear().committed);

        s.replace_design(Design::new());
        assert!(!s.can_undo());
        assert_eq!(s.active_layer(), s.design().base_layer().id());
    }

    #[test]
    fn test_layerless_design_gets_base_layer() {
        let empty = Design {
            layers: Vec::new(),
            ..Design::new()
        };
        let mut s = EditorSession::with_design(EditorConfig::default(), empty.clone()).unwrap();
        assert_eq!(s.design().layers.len(), 1);
        assert_eq!(s.active_layer(), s.design().base_layer().id());

        add_rect(&mut s, 0.0, 0.0);
        s.replace_design(empty);
        assert_eq!(s.design().layers.len(), 1);
        assert_eq!(s.active_layer(), s.design().base_layer().id());
    }
}
