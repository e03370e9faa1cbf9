//! Path verbs, and the raw segment stream a rasterizer hands us.
//!
//! The raw stream follows the point-count convention of path iterators in
//! the Skia family: every line, quad and cubic segment repeats the current
//! point as its first point. The encoder never emits that point, so the
//! number of leading points to skip is spelled out per verb in
//! [`Verb::skip_count`] instead of being implied by pointer arithmetic.

use kurbo::{BezPath, PathEl, Point};

/// Verb codes as they appear in a raw segment stream.
pub mod code {
    pub const MOVE: u8 = 0;
    pub const LINE: u8 = 1;
    pub const QUAD: u8 = 2;
    /// Conic segments exist in the rasterizer's numbering but cannot be
    /// encoded; they are rejected like any other unknown verb.
    pub const CONIC: u8 = 3;
    pub const CUBIC: u8 = 4;
    pub const CLOSE: u8 = 5;
    /// Sentinel ending a glyph's stream.
    pub const DONE: u8 = 6;
}

/// A path-construction instruction that can be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Move,
    Line,
    Quad,
    Cubic,
    Close,
}

impl Verb {
    pub fn from_code(verb: u8) -> Option<Verb> {
        match verb {
            code::MOVE => Some(Verb::Move),
            code::LINE => Some(Verb::Line),
            code::QUAD => Some(Verb::Quad),
            code::CUBIC => Some(Verb::Cubic),
            code::CLOSE => Some(Verb::Close),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Verb::Move => code::MOVE,
            Verb::Line => code::LINE,
            Verb::Quad => code::QUAD,
            Verb::Cubic => code::CUBIC,
            Verb::Close => code::CLOSE,
        }
    }

    /// Leading raw points that repeat the current point.
    pub fn skip_count(self) -> usize {
        match self {
            Verb::Line | Verb::Quad | Verb::Cubic => 1,
            Verb::Move | Verb::Close => 0,
        }
    }

    /// Points that appear in the emitted statement.
    pub fn point_count(self) -> usize {
        match self {
            Verb::Move | Verb::Line => 1,
            Verb::Quad => 2,
            Verb::Cubic => 3,
            Verb::Close => 0,
        }
    }

    /// Points a raw segment with this verb must carry.
    pub fn raw_point_count(self) -> usize {
        self.skip_count() + self.point_count()
    }

    /// The name of the path method the verb is emitted as.
    pub fn method(self) -> &'static str {
        match self {
            Verb::Move => "moveTo",
            Verb::Line => "lineTo",
            Verb::Quad => "quadTo",
            Verb::Cubic => "cubicTo",
            Verb::Close => "close",
        }
    }
}

/// One verb code and the raw points that came with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSegment {
    pub verb: u8,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl RawSegment {
    pub fn new(verb: u8, points: impl Into<Vec<Point>>) -> Self {
        RawSegment {
            verb,
            points: points.into(),
        }
    }

    /// Resolves the verb and returns the points that should be emitted,
    /// with the repeated current point dropped.
    pub fn decode(&self) -> Result<(Verb, &[Point]), SegmentError> {
        let verb = Verb::from_code(self.verb).ok_or(SegmentError::UnknownVerb(self.verb))?;
        if self.points.len() != verb.raw_point_count() {
            return Err(SegmentError::PointCount {
                verb,
                expected: verb.raw_point_count(),
                found: self.points.len(),
            });
        }
        Ok((verb, &self.points[verb.skip_count()..]))
    }
}

/// The ordered raw segments of one glyph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawOutline {
    segments: Vec<RawSegment>,
}

impl RawOutline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: RawSegment) {
        self.segments.push(segment);
    }

    /// Appends the `Done` sentinel.
    pub fn finish(&mut self) {
        self.segments.push(RawSegment::new(code::DONE, Vec::new()));
    }

    /// Segments before the `Done` sentinel; anything after it is ignored.
    pub fn segments(&self) -> impl Iterator<Item = &RawSegment> {
        self.segments.iter().take_while(|seg| seg.verb != code::DONE)
    }

    pub fn is_empty(&self) -> bool {
        self.segments().next().is_none()
    }

    pub fn map_points(&mut self, mut f: impl FnMut(Point) -> Point) {
        for point in self.segments.iter_mut().flat_map(|seg| seg.points.iter_mut()) {
            *point = f(*point);
        }
    }

    /// Replays a path in the raw convention, repeating the current point at
    /// the front of every line, quad and cubic segment.
    pub fn from_bezpath(path: &BezPath) -> Self {
        let mut outline = RawOutline::new();
        let mut current = Point::ZERO;
        let mut start = Point::ZERO;
        for element in path.elements() {
            let segment = match *element {
                PathEl::MoveTo(p) => {
                    start = p;
                    RawSegment::new(code::MOVE, vec![p])
                }
                PathEl::LineTo(p) => RawSegment::new(code::LINE, vec![current, p]),
                PathEl::QuadTo(p1, p2) => RawSegment::new(code::QUAD, vec![current, p1, p2]),
                PathEl::CurveTo(p1, p2, p3) => {
                    RawSegment::new(code::CUBIC, vec![current, p1, p2, p3])
                }
                PathEl::ClosePath => RawSegment::new(code::CLOSE, Vec::new()),
            };
            current = match element {
                PathEl::ClosePath => start,
                other => other.end_point().unwrap_or(current),
            };
            outline.push(segment);
        }
        outline.finish();
        outline
    }
}

/// A raw segment that cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentError {
    UnknownVerb(u8),
    PointCount {
        verb: Verb,
        expected: usize,
        found: usize,
    },
}

impl std::fmt::Display for SegmentError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::UnknownVerb(verb) => write!(f, "unknown verb code {}", verb),
            Self::PointCount {
                verb,
                expected,
                found,
            } => write!(
                f,
                "{:?} segment needs {} raw points, found {}",
                verb, expected, found
            ),
        }
    }
}

impl std::error::Error for SegmentError {}
