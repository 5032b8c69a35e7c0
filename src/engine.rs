//! Floor-plan editor core: the state a UI embeds and drives with events.
//!
//! `EditorCore` owns the metric plan, the projection, selection, and the
//! gesture trackers. Every handler returns a list of [`Action`]s telling the
//! host what changed, in the order it should apply them. The core reads no
//! ambient state (window size, clocks other than for save timestamps); the
//! host passes container sizes and touch points in.
//!
//! Viewport refits happen only on structural changes: load, add, delete,
//! room creation, and debounced container resizes. Drags, resizes and
//! rotations never refit.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};

use crate::config::FloorPlanConfig;
use crate::consts::{DEFAULT_ELEMENT_LENGTH_M, DEFAULT_LABEL_FONT_SIZE_M, DEFAULT_PLACEMENT_M};
use crate::error::ValidationError;
use crate::hit::hit_test;
use crate::input::{GestureResult, InputState, ScaleFactors, UiState};
use crate::layout::{LayoutRecord, RoomDimensions, now_ms};
use crate::model::{Element, ElementId, ElementKind, ElementPatch, Plan};
use crate::occupancy::{TableInfo, table_info};
use crate::projection::{Point, Projection, Size, Viewport, initial_pixels_per_meter};
use crate::render::{RenderNode, scene};
use crate::schedule::{RefitDebouncer, Scheduler, TaskId};
use crate::transform::{TransformController, TransformOutcome};
use crate::viewport::{FitOptions, PinchZoom, fit};

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ElementCreated(Element),
    ElementUpdated { id: ElementId, fields: ElementPatch },
    ElementDeleted { id: ElementId },
    /// Every element was replaced (load or room creation).
    PlanReplaced,
    /// Write these values onto the live rendering node now.
    NodeMoved { id: ElementId, origin: Point, scale: ScaleFactors },
    SelectionChanged(Option<ElementId>),
    ViewportChanged(Viewport),
    RenderNeeded,
}

/// Editor state. Headless and synchronous; safe to test without a renderer.
pub struct EditorCore {
    pub plan: Plan,
    pub config: FloorPlanConfig,
    pub projection: Projection,
    pub ui: UiState,
    pub input: InputState,
    pub pinch: PinchZoom,
    pub container: Size,
    pub room_dimensions: RoomDimensions,
    transform: TransformController,
    refit: RefitDebouncer,
    /// Last loaded record; keeps keys this crate does not own for the next save.
    record: LayoutRecord,
}

impl Default for EditorCore {
    fn default() -> Self {
        Self::new(FloorPlanConfig::default(), Size::default())
    }
}

impl EditorCore {
    /// Create an editor for a container of `initial_container` pixels.
    ///
    /// The starting density comes from the container width; a zero-width
    /// container falls back to `config.pixels_per_meter`.
    #[must_use]
    pub fn new(config: FloorPlanConfig, initial_container: Size) -> Self {
        let pixels_per_meter = if initial_container.width > 0.0 {
            initial_pixels_per_meter(initial_container.width, config.cell_pixels)
        } else {
            config.pixels_per_meter
        };
        Self {
            plan: Plan::new(),
            projection: Projection::new(pixels_per_meter, Viewport::default()),
            ui: UiState::default(),
            input: InputState::default(),
            pinch: config.pinch_zoom(),
            container: initial_container,
            room_dimensions: RoomDimensions::default(),
            transform: config.transform_controller(),
            refit: RefitDebouncer::new(),
            record: LayoutRecord::default(),
            config,
        }
    }

    // --- Persistence ---

    /// Replace the plan with a stored layout, migrating legacy elements.
    pub fn load_layout(&mut self, record: LayoutRecord) -> Vec<Action> {
        let loaded = record.to_plan(self.config.legacy_pixels_per_meter, self.config.snapper().quantum());
        info!(
            elements = loaded.plan.len(),
            migrated = loaded.migrated,
            repaired = loaded.repaired,
            "layout loaded"
        );
        self.plan = loaded.plan;
        self.room_dimensions = loaded.room_dimensions;
        self.record = record;
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        let options = self.config.fit_existing;
        vec![Action::PlanReplaced, self.refit_with(&options), Action::RenderNeeded]
    }

    /// Snapshot for saving. Keys from the last load that this crate does not
    /// own are carried over unchanged.
    #[must_use]
    pub fn layout_record(&self) -> LayoutRecord {
        let mut record = self.record.clone();
        record.apply_plan(&self.plan, self.room_dimensions, now_ms());
        record
    }

    // --- Creation ---

    /// Discard everything and start over with a single room of `dimensions`
    /// (interior meters), sized to fit the current container.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRoomDimensions`] for non-positive
    /// dimensions. The plan is unchanged in that case.
    pub fn create_room(&mut self, dimensions: RoomDimensions) -> Result<Vec<Action>, ValidationError> {
        let interior = Size::new(dimensions.width, dimensions.height);
        if !interior.is_positive() {
            return Err(ValidationError::InvalidRoomDimensions {
                width: dimensions.width,
                height: dimensions.height,
            });
        }

        let pixels_per_meter = self.room_pixels_per_meter(interior);
        let t = self.config.wall_thickness();
        let room = Element::new(
            ElementKind::Room,
            Point::new(-t / 2.0, -t / 2.0),
            Some(Size::new(interior.width + t, interior.height + t)),
        );
        let mut plan = Plan::new();
        plan.add_element(room)?;
        self.plan = plan;
        self.projection.pixels_per_meter = pixels_per_meter;
        self.room_dimensions = dimensions;
        self.ui.selected_id = None;
        self.input = InputState::Idle;
        info!(
            width = dimensions.width,
            height = dimensions.height,
            pixels_per_meter = self.projection.pixels_per_meter,
            "room created"
        );

        let options = self.config.fit_new_room;
        Ok(vec![Action::PlanReplaced, self.refit_with(&options), Action::RenderNeeded])
    }

    /// Density that fits a room of `interior` meters with the configured margin.
    fn room_pixels_per_meter(&self, interior: Size) -> f64 {
        let margin = self.config.room_margin_cells * self.config.cell_pixels;
        let available_w = (self.container.width - 2.0 * margin).max(0.0);
        let available_h = (self.container.height - 2.0 * margin).max(0.0);
        let density = (available_w / interior.width).min(available_h / interior.height);
        density
            .max(self.config.min_room_pixels_per_meter)
            .min(self.config.max_room_pixels_per_meter)
    }

    /// Insert a caller-built element.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if the element's size is invalid for its
    /// kind or it is a second room.
    pub fn add_element(&mut self, element: Element) -> Result<Vec<Action>, ValidationError> {
        let id = self.plan.add_element(element)?;
        let mut actions = Vec::new();
        if let Some(created) = self.plan.get(&id) {
            actions.push(Action::ElementCreated(created.clone()));
        }
        let options = self.config.fit_existing;
        actions.push(self.refit_with(&options));
        actions.push(Action::RenderNeeded);
        Ok(actions)
    }

    fn default_placement(&self) -> Point {
        self.transform
            .snapper()
            .snap_point(Point::new(DEFAULT_PLACEMENT_M, DEFAULT_PLACEMENT_M))
    }

    /// Add a 1 × 1 m table numbered after the existing ones.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the signature of [`EditorCore::add_element`].
    pub fn add_table(&mut self) -> Result<Vec<Action>, ValidationError> {
        let number = self.plan.count_kind(ElementKind::Table) + 1;
        let side = DEFAULT_ELEMENT_LENGTH_M;
        let table = Element::new(ElementKind::Table, self.default_placement(), Some(Size::new(side, side)))
            .with_label(format!("T{number}"));
        self.add_element(table)
    }

    /// Add a named counter of `width` × `height` meters.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] for non-positive dimensions.
    pub fn add_counter(&mut self, label: &str, width: f64, height: f64) -> Result<Vec<Action>, ValidationError> {
        let counter =
            Element::new(ElementKind::Counter, self.default_placement(), Some(Size::new(width, height))).with_label(label);
        self.add_element(counter)
    }

    /// Add a 1 m wall piece one quantum thick.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the signature of [`EditorCore::add_element`].
    pub fn add_wall(&mut self) -> Result<Vec<Action>, ValidationError> {
        let size = Size::new(DEFAULT_ELEMENT_LENGTH_M, self.config.wall_thickness());
        self.add_element(Element::new(ElementKind::Wall, self.default_placement(), Some(size)))
    }

    /// Add a 1 m door one wall thickness deep.
    ///
    /// With a room in the plan the door goes straight onto the wall nearest
    /// the default placement; without one it sits on the grid like any other
    /// element.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the signature of [`EditorCore::add_element`].
    pub fn add_door(&mut self) -> Result<Vec<Action>, ValidationError> {
        let size = Size::new(DEFAULT_ELEMENT_LENGTH_M, self.config.wall_thickness());
        let placement = self.default_placement();
        let door = match self.plan.room() {
            Some(room) => {
                let glued = self.config.door_solver().solve(placement, size.width, room);
                Element::new(ElementKind::Door, glued.position, Some(size)).with_rotation(glued.rotation)
            }
            None => Element::new(ElementKind::Door, placement, Some(size)),
        };
        self.add_element(door.with_label("Door"))
    }

    /// Add a free-standing text label.
    ///
    /// # Errors
    ///
    /// Never fails in practice; shares the signature of [`EditorCore::add_element`].
    pub fn add_label(&mut self, text: &str) -> Result<Vec<Action>, ValidationError> {
        let mut label = Element::new(ElementKind::Label, self.default_placement(), None).with_label(text);
        label.font_size = Some(DEFAULT_LABEL_FONT_SIZE_M);
        self.add_element(label)
    }

    // --- Selection / deletion ---

    /// Select whatever is under the pixel point, or clear the selection.
    pub fn on_tap(&mut self, screen_pt: Point) -> Vec<Action> {
        let metric = self.projection.to_metric(screen_pt);
        let hit = hit_test(&self.plan, metric, self.config.wall_thickness());
        self.select(hit)
    }

    pub fn select(&mut self, id: Option<ElementId>) -> Vec<Action> {
        let id = id.filter(|id| self.plan.get(id).is_some());
        if self.ui.selected_id == id {
            return Vec::new();
        }
        self.ui.selected_id.clone_from(&id);
        vec![Action::SelectionChanged(id), Action::RenderNeeded]
    }

    /// Remove an element. Missing ids are ignored.
    pub fn delete(&mut self, id: &ElementId) -> Vec<Action> {
        if self.plan.remove_element(id).is_none() {
            debug!(%id, "delete ignored: element not found");
            return Vec::new();
        }
        let mut actions = vec![Action::ElementDeleted { id: id.clone() }];
        if self.ui.selected_id.as_ref() == Some(id) {
            self.ui.selected_id = None;
            actions.push(Action::SelectionChanged(None));
        }
        if self.input.target() == Some(id) {
            self.input = InputState::Idle;
        }
        let options = self.config.fit_existing;
        actions.push(self.refit_with(&options));
        actions.push(Action::RenderNeeded);
        actions
    }

    pub fn delete_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id.clone() {
            Some(id) => self.delete(&id),
            None => Vec::new(),
        }
    }

    // --- Gestures ---

    /// Start dragging `id`. Ignored if the element does not exist.
    pub fn begin_drag(&mut self, id: &ElementId) {
        if let Some(element) = self.plan.get(id) {
            self.input = InputState::Dragging { id: id.clone(), origin: element.position };
        }
    }

    /// Finish the active drag with the node's final values.
    pub fn end_drag(&mut self, result: &GestureResult) -> Vec<Action> {
        let InputState::Dragging { id, .. } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let outcome = self.transform.drag_end(&mut self.plan, &self.projection, &id, result);
        outcome_actions(outcome)
    }

    /// Start resizing `id`. Ignored if the element does not exist or is unsized.
    pub fn begin_resize(&mut self, id: &ElementId) {
        if let Some(element) = self.plan.get(id).filter(|e| e.size.is_some()) {
            self.input = InputState::Resizing { id: id.clone(), origin: element.position };
        }
    }

    /// Finish the active resize with the node's final values.
    pub fn end_resize(&mut self, result: &GestureResult) -> Vec<Action> {
        let InputState::Resizing { id, .. } = std::mem::take(&mut self.input) else {
            return Vec::new();
        };
        let outcome = self.transform.resize_end(&mut self.plan, &self.projection, &id, result);
        outcome_actions(outcome)
    }

    /// Abandon the active drag or resize without touching the plan. The host
    /// moves the live node back to where the gesture started.
    pub fn cancel_gesture(&mut self) -> Vec<Action> {
        let input = std::mem::take(&mut self.input);
        let Some((id, origin)) = input.origin() else {
            return Vec::new();
        };
        vec![
            Action::NodeMoved {
                id: id.clone(),
                origin: self.projection.to_pixels(origin),
                scale: ScaleFactors::IDENTITY,
            },
            Action::RenderNeeded,
        ]
    }

    /// Rotate `id` by 90° about its center.
    pub fn rotate(&mut self, id: &ElementId) -> Vec<Action> {
        let outcome = self.transform.rotate(&mut self.plan, &self.projection, id);
        outcome_actions(outcome)
    }

    pub fn rotate_selected(&mut self) -> Vec<Action> {
        match self.ui.selected_id.clone() {
            Some(id) => self.rotate(&id),
            None => Vec::new(),
        }
    }

    // --- Viewport ---

    /// Feed a touch-move with all current touch points (pixels).
    pub fn on_touch_move(&mut self, touches: &[Point]) -> Vec<Action> {
        match self.pinch.on_touch_move(touches, &self.projection) {
            Some(viewport) => {
                self.projection.viewport = viewport;
                vec![Action::ViewportChanged(viewport), Action::RenderNeeded]
            }
            None => Vec::new(),
        }
    }

    /// Touch-end or touch-cancel with `remaining` fingers still down.
    pub fn on_touch_end(&mut self, remaining: usize) {
        self.pinch.on_touch_end(remaining);
    }

    /// The container changed size. The refit runs when `scheduler` fires the
    /// queued task and the host passes it to [`EditorCore::on_frame`].
    pub fn on_container_resize<S: Scheduler>(&mut self, scheduler: &mut S, size: Size) {
        self.refit.request(scheduler, size);
    }

    /// A scheduled task ran. Refits if it was the live resize task.
    pub fn on_frame(&mut self, task: TaskId) -> Vec<Action> {
        let Some(size) = self.refit.fire(task) else {
            return Vec::new();
        };
        self.container = size;
        let options = self.config.fit_existing;
        vec![self.refit_with(&options), Action::RenderNeeded]
    }

    /// Whether a debounced refit is waiting for its frame.
    #[must_use]
    pub fn refit_pending(&self) -> bool {
        self.refit.is_pending()
    }

    fn refit_with(&mut self, options: &FitOptions) -> Action {
        let viewport = fit(self.plan.bounding_box(), self.projection.pixels_per_meter, self.container, options);
        self.projection.viewport = viewport;
        Action::ViewportChanged(viewport)
    }

    // --- Queries ---

    #[must_use]
    pub fn selection(&self) -> Option<&ElementId> {
        self.ui.selected_id.as_ref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.projection.viewport
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.plan.get(id)
    }

    /// Geometry and label of a table, for occupancy overlays.
    #[must_use]
    pub fn table_info(&self, id: &ElementId) -> Option<TableInfo> {
        table_info(&self.plan, id)
    }

    /// Pixel geometry for every element.
    #[must_use]
    pub fn scene(&self) -> Vec<RenderNode> {
        scene(&self.plan, &self.projection)
    }
}

fn outcome_actions(outcome: Option<TransformOutcome>) -> Vec<Action> {
    let Some(outcome) = outcome else {
        return Vec::new();
    };
    vec![
        Action::NodeMoved { id: outcome.id.clone(), origin: outcome.node_position, scale: outcome.node_scale },
        Action::ElementUpdated { id: outcome.id, fields: outcome.patch },
        Action::RenderNeeded,
    ]
}
