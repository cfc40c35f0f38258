//! # Sketch Geometry
//!
//! Value types produced by the sketch standard library.
//!
//! ## Structure
//!
//! ```text
//! SketchGroup
//! ├── start: BasePath      (pen position after startSketchAt)
//! ├── value: [Segment]     (one per primitive, in call order)
//! ├── position: DVec3      (placement of the sketch plane)
//! └── rotation: DQuat
//!
//! ExtrudeGroup
//! └── value: [ExtrudeFace] (one wall per sketch segment)
//! ```
//!
//! A primitive consumes the sketch it is given and returns it with one more
//! segment. Reading a sketch out of a variable copies it, so a binding never
//! changes after it is declared.

use crate::error::{RuntimeError, RuntimeErrorKind};
use glam::{DQuat, DVec2, DVec3};
use std::borrow::Cow;
use kcl_parser::Span;
use serde::{Deserialize, Serialize};

// =============================================================================
// SEGMENTS
// =============================================================================

/// Primitive that produced a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SegmentKind {
    /// Zero-length stand-in for the start point, returned by tag lookups.
    Start,
    LineTo,
    Line,
    XLineTo,
    YLineTo,
    XLine,
    YLine,
    AngledLine,
    AngledLineOfXLength,
    AngledLineOfYLength,
    AngledLineToX,
    AngledLineToY,
    AngledLineThatIntersects,
    Close,
}

/// Start point of a sketch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasePath {
    pub from: DVec2,
    pub to: DVec2,
    pub tag: Option<String>,
    /// Range of the `startSketchAt` call.
    pub span: Span,
}

impl BasePath {
    fn as_segment(&self) -> Segment {
        Segment {
            kind: SegmentKind::Start,
            from: self.from,
            to: self.to,
            tag: self.tag.clone(),
            span: self.span,
        }
    }
}

/// A straight segment of a sketch path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub from: DVec2,
    pub to: DVec2,
    pub tag: Option<String>,
    /// Range of the call that drew the segment.
    pub span: Span,
}

impl Segment {
    pub fn direction(&self) -> DVec2 {
        self.to - self.from
    }

    pub fn length(&self) -> f64 {
        self.direction().length()
    }

    /// Direction angle in degrees, in `(-180, 180]`.
    pub fn angle(&self) -> f64 {
        let d = self.direction();
        d.y.atan2(d.x).to_degrees()
    }
}

// =============================================================================
// SKETCH GROUP
// =============================================================================

/// An open or closed 2D path under construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchGroup {
    pub start: BasePath,
    pub value: Vec<Segment>,
    pub position: DVec3,
    pub rotation: DQuat,
}

impl SketchGroup {
    /// Sketch whose pen rests at `at`.
    pub fn new(at: DVec2, tag: Option<String>, span: Span) -> Self {
        Self {
            start: BasePath {
                from: at,
                to: at,
                tag,
                span,
            },
            value: Vec::new(),
            position: DVec3::ZERO,
            rotation: DQuat::IDENTITY,
        }
    }

    /// Current pen position: end of the last segment, or the start point.
    pub fn pen(&self) -> DVec2 {
        self.value.last().map_or(self.start.to, |segment| segment.to)
    }

    /// Segment labelled `tag`.
    ///
    /// The tag given to `startSketchAt` names a zero-length segment at the
    /// start point.
    ///
    /// ## Returns
    ///
    /// The segment, or `UnknownTag` located at `span` (the lookup call)
    pub fn segment(&self, tag: &str, span: Span) -> Result<Cow<'_, Segment>, RuntimeError> {
        if let Some(segment) = self.value.iter().find(|segment| segment.tag.as_deref() == Some(tag)) {
            return Ok(Cow::Borrowed(segment));
        }
        if self.start.tag.as_deref() == Some(tag) {
            return Ok(Cow::Owned(self.start.as_segment()));
        }
        Err(RuntimeError::new(RuntimeErrorKind::UnknownTag(tag.to_string()), span))
    }

    pub fn last_segment(&self, span: Span) -> Result<&Segment, RuntimeError> {
        self.value
            .last()
            .ok_or_else(|| RuntimeError::invalid_geometry("sketch has no segments", span))
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.start.tag.as_deref() == Some(tag)
            || self.value.iter().any(|segment| segment.tag.as_deref() == Some(tag))
    }

    /// Appends a segment from the pen to `to`.
    ///
    /// ## Returns
    ///
    /// The extended sketch, or `DuplicateTag` when `tag` is already in use
    pub fn extend(
        mut self,
        kind: SegmentKind,
        to: DVec2,
        tag: Option<String>,
        span: Span,
    ) -> Result<SketchGroup, RuntimeError> {
        if let Some(tag) = &tag {
            if self.has_tag(tag) {
                return Err(RuntimeError::new(RuntimeErrorKind::DuplicateTag(tag.clone()), span));
            }
        }
        let from = self.pen();
        self.value.push(Segment {
            kind,
            from,
            to,
            tag,
            span,
        });
        Ok(self)
    }

    /// Maps a sketch-plane point into world space.
    pub fn to_world(&self, point: DVec2) -> DVec3 {
        self.position + self.rotation * point.extend(0.0)
    }
}

// =============================================================================
// EXTRUSION
// =============================================================================

/// Wall produced by sweeping one segment along the sketch normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeFace {
    pub tag: Option<String>,
    /// Corners in order: base start, base end, top end, top start.
    pub vertices: [DVec3; 4],
    pub span: Span,
}

/// Solid created by `extrude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtrudeGroup {
    pub value: Vec<ExtrudeFace>,
    pub height: f64,
    pub position: DVec3,
    pub rotation: DQuat,
}

impl ExtrudeGroup {
    /// Sweeps every segment of `sketch` by `height` along its plane normal.
    pub fn from_sketch(sketch: &SketchGroup, height: f64) -> Self {
        let up = sketch.rotation * DVec3::new(0.0, 0.0, height);
        let value = sketch
            .value
            .iter()
            .map(|segment| {
                let a = sketch.to_world(segment.from);
                let b = sketch.to_world(segment.to);
                ExtrudeFace {
                    tag: segment.tag.clone(),
                    vertices: [a, b, b + up, a + up],
                    span: segment.span,
                }
            })
            .collect();
        Self {
            value,
            height,
            position: sketch.position,
            rotation: sketch.rotation,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square() -> SketchGroup {
        let span = Span::new(0, 1);
        SketchGroup::new(DVec2::ZERO, None, span)
            .extend(SegmentKind::Line, DVec2::new(1.0, 0.0), Some("a".into()), span)
            .and_then(|s| s.extend(SegmentKind::Line, DVec2::new(1.0, 1.0), None, span))
            .and_then(|s| s.extend(SegmentKind::Close, DVec2::ZERO, Some("c".into()), span))
            .unwrap()
    }

    #[test]
    fn test_pen_follows_last_segment() {
        let sketch = SketchGroup::new(DVec2::new(2.0, 3.0), None, Span::default());
        assert_eq!(sketch.pen(), DVec2::new(2.0, 3.0));
        assert_eq!(square().pen(), DVec2::ZERO);
    }

    #[test]
    fn test_extend_appends_from_pen() {
        let sketch = SketchGroup::new(DVec2::ZERO, None, Span::default());
        let kept = sketch.clone();
        let next = sketch
            .extend(SegmentKind::LineTo, DVec2::ONE, None, Span::default())
            .unwrap();
        assert!(kept.value.is_empty());
        assert_eq!(next.value.len(), 1);
        assert_eq!(next.value[0].from, DVec2::ZERO);
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let err = square()
            .extend(SegmentKind::Line, DVec2::ONE, Some("a".into()), Span::new(5, 9))
            .unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::DuplicateTag("a".into()));
        assert_eq!(err.span, Span::new(5, 9));
    }

    #[test]
    fn test_start_tag_resolves_to_start_point() {
        let sketch = SketchGroup::new(DVec2::new(2.0, 3.0), Some("origin".into()), Span::new(0, 4))
            .extend(SegmentKind::Line, DVec2::new(5.0, 3.0), None, Span::new(5, 9))
            .unwrap();
        let start = sketch.segment("origin", Span::default()).unwrap();
        assert_eq!(start.kind, SegmentKind::Start);
        assert_eq!(start.to, DVec2::new(2.0, 3.0));
        assert_eq!(start.length(), 0.0);
        assert_eq!(start.span, Span::new(0, 4));

        let err = sketch
            .extend(SegmentKind::Line, DVec2::ONE, Some("origin".into()), Span::new(10, 12))
            .unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::DuplicateTag("origin".into()));
    }

    #[test]
    fn test_unknown_tag_reports_lookup_span() {
        let err = square().segment("zz", Span::new(7, 8)).unwrap_err();
        assert_eq!(err.kind, RuntimeErrorKind::UnknownTag("zz".into()));
        assert_eq!(err.span, Span::new(7, 8));
    }

    #[test]
    fn test_segment_measurements() {
        let sketch = square();
        let close = sketch.segment("c", Span::default()).unwrap();
        assert_relative_eq!(close.length(), 2f64.sqrt());
        assert_relative_eq!(close.angle(), -135.0);
    }

    #[test]
    fn test_extrude_builds_one_face_per_segment() {
        let solid = ExtrudeGroup::from_sketch(&square(), 2.0);
        assert_eq!(solid.value.len(), 3);
        let face = &solid.value[0];
        assert_eq!(face.tag.as_deref(), Some("a"));
        assert_eq!(face.vertices[2], DVec3::new(1.0, 0.0, 2.0));
    }
}
