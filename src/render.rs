//! Projection of button models onto the canvas.
//!
//! Normalized transforms map to screen circles as follows:
//! - `r  = (size / 100 * canvas_width) / 2`
//! - `cx = x_coord * canvas_width`
//! - `cy = y_coord * canvas_height`
//!
//! Only the width scales the diameter. On a canvas whose two axes are scaled
//! differently the drawn circle therefore does not track the height.
//!
//! The renderer never patches individual shapes after a document edit:
//! [`OverlayRenderer::render`] clears and re-projects everything, so the shapes
//! are always a function of the document plus the current canvas geometry.
//! The one exception is an in-flight drag, which moves a shape in screen space
//! until the drag is committed.

use crate::document::Document;
use crate::model::Transform;

/// A point in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Calculate distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Pixel size of the canvas the overlay is drawn on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasGeometry {
    pub width: f64,
    pub height: f64,
}

impl CanvasGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when either side is not positive; nothing can be projected.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A projected button outline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl Circle {
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }

    /// Distance from `point` to the disc; zero inside.
    pub fn distance_to(&self, point: &Point) -> f64 {
        (self.center().distance_to(point) - self.r).max(0.0)
    }
}

/// Project a transform into screen space.
pub fn project(transform: &Transform, canvas: CanvasGeometry) -> Circle {
    let diameter = transform.size / 100.0 * canvas.width;
    Circle {
        cx: transform.x_coord * canvas.width,
        cy: transform.y_coord * canvas.height,
        r: diameter / 2.0,
    }
}

/// Inverse of [`project`] for the center only. Returns `(x_coord, y_coord)`.
pub fn unproject(center: Point, canvas: CanvasGeometry) -> (f64, f64) {
    (center.x / canvas.width, center.y / canvas.height)
}

/// Text metrics used to estimate a label's bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelMetrics {
    /// Average glyph advance in pixels
    pub char_width: f64,
    /// Line height in pixels
    pub height: f64,
}

impl Default for LabelMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            height: 14.0,
        }
    }
}

/// Key name drawn at a button's center.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    /// Center of the text
    pub position: Point,
    pub width: f64,
    pub height: f64,
}

impl Label {
    fn new(text: &str, position: Point, metrics: LabelMetrics) -> Self {
        Self {
            text: text.to_string(),
            position,
            width: text.chars().count() as f64 * metrics.char_width,
            height: metrics.height,
        }
    }

    /// Distance from `point` to the label's bounding box; zero inside.
    pub fn distance_to(&self, point: &Point) -> f64 {
        let dx = ((point.x - self.position.x).abs() - self.width / 2.0).max(0.0);
        let dy = ((point.y - self.position.y).abs() - self.height / 2.0).max(0.0);
        (dx * dx + dy * dy).sqrt()
    }
}

/// On-screen representation of one button.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonShape {
    /// Index into the document's `buttonModels`
    pub index: usize,
    pub circle: Circle,
    pub label: Option<Label>,
}

impl ButtonShape {
    fn translate(&mut self, dx: f64, dy: f64) {
        self.circle.cx += dx;
        self.circle.cy += dy;
        if let Some(label) = &mut self.label {
            label.position.x += dx;
            label.position.y += dy;
        }
    }
}

/// Which part of a button the pointer landed nearest to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapePart {
    Circle,
    Label,
}

/// Result of a nearest-shape hit test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub part: ShapePart,
    /// Pixel distance from the pointer to the hit shape
    pub distance: f64,
}

/// Screen-space overlay for the open document.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    geometry: CanvasGeometry,
    metrics: LabelMetrics,
    shapes: Vec<ButtonShape>,
    /// Number of full redraw passes, for diagnostics.
    generation: u64,
}

impl OverlayRenderer {
    pub fn new(geometry: CanvasGeometry, metrics: LabelMetrics) -> Self {
        Self {
            geometry,
            metrics,
            shapes: Vec::new(),
            generation: 0,
        }
    }

    pub fn geometry(&self) -> CanvasGeometry {
        self.geometry
    }

    /// Change the canvas size. Existing shapes are stale until the next
    /// [`render`](Self::render).
    pub fn set_geometry(&mut self, geometry: CanvasGeometry) {
        log::debug!(
            "Canvas geometry {}x{} -> {}x{}",
            self.geometry.width,
            self.geometry.height,
            geometry.width,
            geometry.height
        );
        self.geometry = geometry;
    }

    /// Clear all shapes and project every drawable button in `document`.
    pub fn render(&mut self, document: &Document) {
        self.shapes.clear();
        self.generation += 1;

        if self.geometry.is_empty() {
            log::debug!("Skipping overlay render on empty canvas");
            return;
        }

        for (index, model) in document.buttons() {
            let Some(transform) = &model.transform else {
                continue;
            };
            let circle = project(transform, self.geometry);
            let label = model
                .label()
                .map(|text| Label::new(text, circle.center(), self.metrics));
            self.shapes.push(ButtonShape {
                index,
                circle,
                label,
            });
        }

        log::trace!(
            "Overlay pass {}: {} shapes on {}x{} canvas",
            self.generation,
            self.shapes.len(),
            self.geometry.width,
            self.geometry.height
        );
    }

    pub fn shapes(&self) -> &[ButtonShape] {
        &self.shapes
    }

    /// Shape for the button at `index` in the document.
    pub fn shape(&self, index: usize) -> Option<&ButtonShape> {
        self.shapes.iter().find(|shape| shape.index == index)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Move a button's circle and label together by a screen-space delta.
    pub fn translate(&mut self, index: usize, dx: f64, dy: f64) -> bool {
        match self.shapes.iter_mut().find(|shape| shape.index == index) {
            Some(shape) => {
                shape.translate(dx, dy);
                true
            }
            None => false,
        }
    }

    /// Normalized position of a shape's current center.
    pub fn normalized_center(&self, index: usize) -> Option<(f64, f64)> {
        if self.geometry.is_empty() {
            return None;
        }
        self.shape(index)
            .map(|shape| unproject(shape.circle.center(), self.geometry))
    }

    /// Find the shape nearest to `point`, within `tolerance` pixels.
    ///
    /// Containment is not required: a click just outside a small circle still
    /// selects it when no other shape is closer. Ties go to the shape drawn last.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> Option<Hit> {
        let mut best: Option<Hit> = None;

        for shape in &self.shapes {
            let mut candidates = vec![(ShapePart::Circle, shape.circle.distance_to(&point))];
            if let Some(label) = &shape.label {
                candidates.push((ShapePart::Label, label.distance_to(&point)));
            }

            for (part, distance) in candidates {
                if distance > tolerance {
                    continue;
                }
                if best.is_none_or(|b| distance <= b.distance) {
                    best = Some(Hit {
                        index: shape.index,
                        part,
                        distance,
                    });
                }
            }
        }

        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ButtonModel;

    const EPS: f64 = 1e-9;

    fn canvas() -> CanvasGeometry {
        CanvasGeometry::new(400.0, 300.0)
    }

    fn doc_with(buttons: &[(f64, f64, f64, &str)]) -> Document {
        let mut doc = Document::new();
        for &(size, x, y, name) in buttons {
            doc.push(ButtonModel::new(4, name, Transform::new(size, x, y)));
        }
        doc
    }

    #[test]
    fn test_project() {
        let circle = project(&Transform::new(10.0, 0.5, 0.5), canvas());
        assert!((circle.cx - 200.0).abs() < EPS);
        assert!((circle.cy - 150.0).abs() < EPS);
        // Diameter is 10% of the width only
        assert!((circle.r - 20.0).abs() < EPS);
    }

    #[test]
    fn test_unproject_inverts_project() {
        let canvases = [
            CanvasGeometry::new(400.0, 300.0),
            CanvasGeometry::new(1.0, 1000.0),
            CanvasGeometry::new(1919.0, 1079.0),
            CanvasGeometry::new(0.5, 0.25),
        ];
        let transforms = [
            Transform::new(5.0, 0.0, 0.0),
            Transform::new(1.0, 1.0, 1.0),
            Transform::new(20.0, 0.333, 0.777),
            Transform::new(7.0, 0.123456789, 0.987654321),
        ];

        for canvas in canvases {
            for t in &transforms {
                let circle = project(t, canvas);
                let (x, y) = unproject(circle.center(), canvas);
                assert!((x - t.x_coord).abs() < EPS, "x mismatch on {:?}", canvas);
                assert!((y - t.y_coord).abs() < EPS, "y mismatch on {:?}", canvas);
            }
        }
    }

    #[test]
    fn test_out_of_range_size_is_drawn_as_is() {
        let circle = project(&Transform::new(99.0, 0.5, 0.5), canvas());
        assert!((circle.r - 198.0).abs() < EPS);
    }

    #[test]
    fn test_render_skips_buttons_without_transform() {
        let mut doc = doc_with(&[(5.0, 0.1, 0.1, "A")]);
        let mut model = ButtonModel::new(5, "B", Transform::centered());
        model.transform = None;
        doc.push(model);
        doc.push(ButtonModel::new(6, "", Transform::new(5.0, 0.9, 0.9)));

        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);

        let indices: Vec<usize> = renderer.shapes().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 2]);
        // Empty names draw no label
        assert!(renderer.shape(2).unwrap().label.is_none());
    }

    #[test]
    fn test_render_replaces_all_shapes() {
        let mut doc = doc_with(&[(5.0, 0.1, 0.1, "A"), (5.0, 0.9, 0.9, "B")]);
        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);
        assert_eq!(renderer.shapes().len(), 2);

        doc.remove(0);
        renderer.render(&doc);
        assert_eq!(renderer.shapes().len(), 1);
        assert_eq!(renderer.shapes()[0].index, 0);
        assert_eq!(renderer.generation(), 2);
    }

    #[test]
    fn test_empty_canvas_renders_nothing() {
        let doc = doc_with(&[(5.0, 0.5, 0.5, "A")]);
        let mut renderer =
            OverlayRenderer::new(CanvasGeometry::new(0.0, 0.0), LabelMetrics::default());
        renderer.render(&doc);
        assert!(renderer.shapes().is_empty());
        assert_eq!(renderer.normalized_center(0), None);
    }

    #[test]
    fn test_translate_moves_circle_and_label() {
        let doc = doc_with(&[(5.0, 0.5, 0.5, "A")]);
        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);

        assert!(renderer.translate(0, 10.0, -5.0));
        let shape = renderer.shape(0).unwrap();
        assert_eq!(shape.circle.center(), Point::new(210.0, 145.0));
        assert_eq!(shape.label.as_ref().unwrap().position, Point::new(210.0, 145.0));

        let (x, y) = renderer.normalized_center(0).unwrap();
        assert!((x - 0.525).abs() < EPS);
        assert!((y - (145.0 / 300.0)).abs() < EPS);

        assert!(!renderer.translate(7, 1.0, 1.0));
    }

    #[test]
    fn test_hit_test_outside_circle_selects_nearest() {
        // r = 10px at (100, 150); second button far away at (300, 150)
        let doc = doc_with(&[(5.0, 0.25, 0.5, ""), (5.0, 0.75, 0.5, "")]);
        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);

        // 3px outside the first circle's edge
        let hit = renderer.hit_test(Point::new(113.0, 150.0), 24.0).unwrap();
        assert_eq!(hit.index, 0);
        assert_eq!(hit.part, ShapePart::Circle);
        assert!((hit.distance - 3.0).abs() < EPS);

        // Closer to the second one
        let hit = renderer.hit_test(Point::new(280.0, 150.0), 24.0).unwrap();
        assert_eq!(hit.index, 1);
    }

    #[test]
    fn test_hit_test_respects_tolerance() {
        let doc = doc_with(&[(5.0, 0.25, 0.5, "")]);
        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);

        assert!(renderer.hit_test(Point::new(150.0, 150.0), 24.0).is_none());
        assert!(renderer.hit_test(Point::new(150.0, 150.0), 50.0).is_some());
    }

    #[test]
    fn test_hit_test_on_label() {
        // Tiny circle (r = 2px) with a long label
        let doc = doc_with(&[(1.0, 0.5, 0.5, "Jump Button")]);
        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);

        // Inside the label box but 28px from the circle edge
        let hit = renderer.hit_test(Point::new(230.0, 150.0), 5.0).unwrap();
        assert_eq!(hit.part, ShapePart::Label);
        assert_eq!(hit.index, 0);
    }

    #[test]
    fn test_hit_test_overlap_prefers_topmost() {
        let doc = doc_with(&[(10.0, 0.5, 0.5, ""), (10.0, 0.5, 0.5, "")]);
        let mut renderer = OverlayRenderer::new(canvas(), LabelMetrics::default());
        renderer.render(&doc);
        let hit = renderer.hit_test(Point::new(200.0, 150.0), 24.0).unwrap();
        assert_eq!(hit.index, 1);
    }
}
