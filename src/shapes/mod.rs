//! Drawing primitives.
//!
//! Animations issue primitives through [`Shapes`], which records them as [`DrawOp`]s into a
//! [`DisplayList`]. The raster backend later strokes, then fills, each op in order, so a fill is
//! composited over its own stroke.

mod style;

pub use style::{Glow, Paint, ShapeStyle};

use crate::foundation::core::{BezPath, Point, Rect, Vec2};
use crate::foundation::math::midpoint;
use kurbo::Shape as _;
use std::sync::Arc;

const PATH_TOLERANCE: f64 = 0.1;

/// One geometric primitive, in canvas pixels.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    /// Open arc: stroked only. Angles in degrees, clockwise on screen.
    Arc {
        center: Point,
        diameter: f64,
        start_deg: f64,
        end_deg: f64,
    },
    Circle {
        center: Point,
        diameter: f64,
    },
    Line {
        from: Point,
        to: Point,
    },
    /// Closed polygon; `smooth` joins each vertex to the next edge midpoint with a quadratic curve.
    Polygon {
        points: Vec<Point>,
        smooth: bool,
    },
    Rectangle {
        rect: Rect,
        radius: f64,
    },
}

impl Primitive {
    /// Arcs are stroke-only; everything else is closed, stroked and filled.
    pub fn is_closed(&self) -> bool {
        !matches!(self, Self::Arc { .. })
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Self::Arc {
                center,
                diameter,
                start_deg,
                end_deg,
            } => {
                let r = (diameter / 2.0).max(0.0);
                let arc = kurbo::Arc {
                    center: *center,
                    radii: Vec2::new(r, r),
                    start_angle: start_deg.to_radians(),
                    sweep_angle: arc_sweep(*start_deg, *end_deg),
                    x_rotation: 0.0,
                };
                arc.to_path(PATH_TOLERANCE)
            }
            Self::Circle { center, diameter } => {
                let r = (diameter / 2.0).max(0.0);
                kurbo::Circle::new(*center, r).to_path(PATH_TOLERANCE)
            }
            Self::Line { from, to } => {
                let mut path = BezPath::new();
                path.move_to(*from);
                path.line_to(*to);
                path.close_path();
                path
            }
            Self::Polygon { points, smooth } => polygon_path(points, *smooth),
            Self::Rectangle { rect, radius } => {
                let rect = rect.abs();
                let mut r = radius.max(0.0);
                if rect.width() < 2.0 * r {
                    r = rect.width() / 2.0;
                }
                if rect.height() < 2.0 * r {
                    r = rect.height() / 2.0;
                }
                if r > 0.0 {
                    kurbo::RoundedRect::from_rect(rect, r).to_path(PATH_TOLERANCE)
                } else {
                    rect.to_path(PATH_TOLERANCE)
                }
            }
        }
    }

    /// Axis-aligned bounds of the geometry, ignoring stroke width.
    pub fn bounds(&self) -> Rect {
        self.to_path().bounding_box()
    }
}

/// Clockwise sweep in radians from `start` to `end` degrees, canvas-style: a difference of a full
/// turn or more draws the whole circle, otherwise the sweep is wrapped into `[0, 2π)`.
fn arc_sweep(start_deg: f64, end_deg: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let diff = (end_deg - start_deg).to_radians();
    if !diff.is_finite() {
        return 0.0;
    }
    if diff >= tau {
        tau
    } else {
        diff.rem_euclid(tau)
    }
}

fn polygon_path(points: &[Point], smooth: bool) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);
    for (i, &p) in points.iter().enumerate() {
        if smooth {
            let next = points.get(i + 1).copied().unwrap_or(p);
            path.quad_to(p, midpoint(p, next));
        } else {
            path.line_to(p);
        }
    }
    path.close_path();
    path
}

/// A primitive plus the style it is drawn with.
#[derive(Clone, Debug)]
pub struct DrawOp {
    pub primitive: Primitive,
    pub style: Arc<ShapeStyle>,
}

/// Ordered draw ops for one frame. Cleared and refilled every frame; capacity is kept.
#[derive(Clone, Debug, Default)]
pub struct DisplayList {
    ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ops.clear();
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub(crate) fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }
}

/// Stateless primitive issuer bound to one frame's display list.
pub struct Shapes<'a> {
    list: &'a mut DisplayList,
}

impl<'a> Shapes<'a> {
    pub fn new(list: &'a mut DisplayList) -> Self {
        Self { list }
    }

    /// Arc of the circle with the given `diameter`, from `start_deg` clockwise to `end_deg`.
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        diameter: f64,
        start_deg: f64,
        end_deg: f64,
        style: &Arc<ShapeStyle>,
    ) {
        self.push(
            Primitive::Arc {
                center: Point::new(x, y),
                diameter,
                start_deg,
                end_deg,
            },
            style,
        );
    }

    pub fn circle(&mut self, x: f64, y: f64, diameter: f64, style: &Arc<ShapeStyle>) {
        self.push(
            Primitive::Circle {
                center: Point::new(x, y),
                diameter,
            },
            style,
        );
    }

    pub fn line(&mut self, from_x: f64, from_y: f64, to_x: f64, to_y: f64, style: &Arc<ShapeStyle>) {
        self.push(
            Primitive::Line {
                from: Point::new(from_x, from_y),
                to: Point::new(to_x, to_y),
            },
            style,
        );
    }

    /// Closed polygon through `points`, smoothed when the style is `rounded`.
    pub fn polygon(&mut self, points: Vec<Point>, style: &Arc<ShapeStyle>) {
        let smooth = style.rounded;
        self.push(Primitive::Polygon { points, smooth }, style);
    }

    /// Rectangle with corner `radius`, clamped to half the shorter side.
    pub fn rectangle(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        style: &Arc<ShapeStyle>,
    ) {
        self.push(
            Primitive::Rectangle {
                rect: Rect::new(x, y, x + width, y + height),
                radius,
            },
            style,
        );
    }

    fn push(&mut self, primitive: Primitive, style: &Arc<ShapeStyle>) {
        self.list.push(DrawOp {
            primitive,
            style: Arc::clone(style),
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/shapes/primitives.rs"]
mod tests;
