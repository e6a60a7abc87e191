//! Static schematic diagrams.
//!
//! Elements are placed one after another: each starts where the previous one
//! ended and runs in its own direction, or the previous direction when none
//! is given. [`Drawing::layout`] turns the element list into plain geometry;
//! rendering that geometry needs the `schematic` feature. Without it,
//! [`render_schematic`] skips and says so instead of failing.

use std::path::{Path, PathBuf};

use ampsweep_core::CommonEmitterParams;
use ampsweep_core::units::{format_ohms, format_value};

use crate::error::Result;

/// Whether this build can render schematics.
pub const SCHEMATIC_AVAILABLE: bool = cfg!(feature = "schematic");

pub type Point = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn unit_vector(self) -> Point {
        match self {
            Direction::Up => (0.0, 1.0),
            Direction::Down => (0.0, -1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    VoltageSource,
    Resistor,
    BjtNpn,
    Ground,
}

/// Where an element's label sits relative to its body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSide {
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    kind: ElementKind,
    direction: Option<Direction>,
    label: Option<(String, LabelSide)>,
}

impl Element {
    fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            direction: None,
            label: None,
        }
    }

    pub fn source_v() -> Self {
        Self::new(ElementKind::VoltageSource)
    }

    pub fn resistor() -> Self {
        Self::new(ElementKind::Resistor)
    }

    pub fn bjt_npn() -> Self {
        Self::new(ElementKind::BjtNpn)
    }

    pub fn ground() -> Self {
        Self::new(ElementKind::Ground)
    }

    pub fn up(self) -> Self {
        self.direction(Direction::Up)
    }

    pub fn down(self) -> Self {
        self.direction(Direction::Down)
    }

    pub fn left(self) -> Self {
        self.direction(Direction::Left)
    }

    pub fn right(self) -> Self {
        self.direction(Direction::Right)
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Attach a label; `\n` splits it over several lines.
    pub fn label(mut self, text: impl Into<String>, side: LabelSide) -> Self {
        self.label = Some((text.into(), side));
        self
    }
}

/// Drawing primitives in drawing units.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path(Vec<Point>),
    Circle { center: Point, radius: f64 },
    Text { at: Point, text: String },
}

/// Where an element ended up.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub kind: ElementKind,
    pub direction: Direction,
    pub start: Point,
    pub end: Point,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub placed: Vec<Placed>,
    pub primitives: Vec<Primitive>,
}

impl Layout {
    /// Bounding box of every primitive as (min, max).
    pub fn bounds(&self) -> Option<(Point, Point)> {
        let mut points = Vec::new();
        for p in &self.primitives {
            match p {
                Primitive::Path(pts) => points.extend(pts.iter().copied()),
                Primitive::Circle { center, radius } => {
                    points.push((center.0 - radius, center.1 - radius));
                    points.push((center.0 + radius, center.1 + radius));
                }
                Primitive::Text { at, .. } => points.push(*at),
            }
        }
        let first = *points.first()?;
        Some(points.iter().fold((first, first), |(lo, hi), &(x, y)| {
            ((lo.0.min(x), lo.1.min(y)), (hi.0.max(x), hi.1.max(y)))
        }))
    }
}

/// An ordered list of elements placed end to end.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    unit: f64,
    elements: Vec<Element>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new(3.0)
    }
}

impl Drawing {
    /// `unit` is the length of a two-terminal element.
    pub fn new(unit: f64) -> Self {
        Self {
            unit,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, element: Element) -> &mut Self {
        self.elements.push(element);
        self
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn layout(&self) -> Layout {
        let u = self.unit;
        let mut cursor: Point = (0.0, 0.0);
        let mut heading = Direction::Right;
        let mut placed = Vec::with_capacity(self.elements.len());
        let mut primitives = Vec::new();

        for element in &self.elements {
            let direction = element.direction.unwrap_or(heading);
            let start = cursor;
            let (end, body_mid) = match element.kind {
                ElementKind::Resistor => {
                    let end = advance(start, direction, u);
                    primitives.push(Primitive::Path(resistor_path(start, direction, u)));
                    (end, midpoint(start, end))
                }
                ElementKind::VoltageSource => {
                    let end = advance(start, direction, u);
                    primitives.extend(source_primitives(start, direction, u));
                    (end, midpoint(start, end))
                }
                ElementKind::BjtNpn => {
                    let (prims, emitter, center) = bjt_primitives(start, u);
                    primitives.extend(prims);
                    (emitter, center)
                }
                ElementKind::Ground => {
                    primitives.extend(ground_primitives(start, u));
                    (start, advance(start, Direction::Down, u * 0.15))
                }
            };

            if let Some((text, side)) = &element.label {
                primitives.extend(label_primitives(text, *side, body_mid, u));
            }

            placed.push(Placed {
                kind: element.kind,
                direction,
                start,
                end,
            });
            cursor = end;
            heading = direction;
        }

        Layout { placed, primitives }
    }
}

fn advance(p: Point, direction: Direction, length: f64) -> Point {
    let (dx, dy) = direction.unit_vector();
    (p.0 + dx * length, p.1 + dy * length)
}

fn midpoint(a: Point, b: Point) -> Point {
    ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0)
}

/// Point at `along` units down the element and `across` units to its left.
fn local(start: Point, direction: Direction, along: f64, across: f64) -> Point {
    let (dx, dy) = direction.unit_vector();
    (start.0 + dx * along - dy * across, start.1 + dy * along + dx * across)
}

fn resistor_path(start: Point, direction: Direction, u: f64) -> Vec<Point> {
    const PEAKS: usize = 6;
    let lead = 0.25 * u;
    let body = u - 2.0 * lead;
    let amplitude = 0.12 * u;

    let mut path = vec![start, local(start, direction, lead, 0.0)];
    for i in 0..PEAKS {
        let along = lead + body * (2 * i + 1) as f64 / (2 * PEAKS) as f64;
        let across = if i % 2 == 0 { amplitude } else { -amplitude };
        path.push(local(start, direction, along, across));
    }
    path.push(local(start, direction, u - lead, 0.0));
    path.push(local(start, direction, u, 0.0));
    path
}

fn source_primitives(start: Point, direction: Direction, u: f64) -> Vec<Primitive> {
    let radius = 0.25 * u;
    let center = local(start, direction, u / 2.0, 0.0);
    let plus = local(start, direction, u / 2.0 + radius * 0.5, 0.0);
    let minus = local(start, direction, u / 2.0 - radius * 0.5, 0.0);
    let s = radius * 0.25;
    vec![
        Primitive::Path(vec![start, local(start, direction, u / 2.0 - radius, 0.0)]),
        Primitive::Path(vec![
            local(start, direction, u / 2.0 + radius, 0.0),
            local(start, direction, u, 0.0),
        ]),
        Primitive::Circle { center, radius },
        Primitive::Path(vec![(plus.0 - s, plus.1), (plus.0 + s, plus.1)]),
        Primitive::Path(vec![(plus.0, plus.1 - s), (plus.0, plus.1 + s)]),
        Primitive::Path(vec![(minus.0 - s, minus.1), (minus.0 + s, minus.1)]),
    ]
}

/// NPN symbol with the base at `base`; returns primitives, emitter and centre.
fn bjt_primitives(base: Point, u: f64) -> (Vec<Primitive>, Point, Point) {
    let (bx, by) = base;
    let bar_x = bx + 0.35 * u;
    let half_bar = 0.25 * u;
    let collector = (bx + 0.75 * u, by + 0.5 * u);
    let emitter = (bx + 0.75 * u, by - 0.5 * u);
    let center = (bx + 0.5 * u, by);

    let collector_join = (bar_x, by + 0.1 * u);
    let emitter_join = (bar_x, by - 0.1 * u);

    // Arrowhead on the emitter leg, pointing away from the base.
    let (ex, ey) = (emitter.0 - emitter_join.0, emitter.1 - emitter_join.1);
    let len = (ex * ex + ey * ey).sqrt();
    let (ux, uy) = (ex / len, ey / len);
    let tip = (emitter_join.0 + ux * len * 0.8, emitter_join.1 + uy * len * 0.8);
    let a = 0.08 * u;
    let wing1 = (tip.0 - ux * a - uy * a, tip.1 - uy * a + ux * a);
    let wing2 = (tip.0 - ux * a + uy * a, tip.1 - uy * a - ux * a);

    let prims = vec![
        Primitive::Path(vec![base, (bar_x, by)]),
        Primitive::Path(vec![(bar_x, by - half_bar), (bar_x, by + half_bar)]),
        Primitive::Path(vec![collector_join, collector]),
        Primitive::Path(vec![emitter_join, emitter]),
        Primitive::Path(vec![wing1, tip, wing2]),
        Primitive::Circle {
            center,
            radius: 0.45 * u,
        },
    ];
    (prims, emitter, center)
}

fn ground_primitives(at: Point, u: f64) -> Vec<Primitive> {
    let lead = 0.15 * u;
    let (x, y) = (at.0, at.1 - lead);
    let mut prims = vec![Primitive::Path(vec![at, (x, y)])];
    for (i, half_width) in [0.2, 0.13, 0.06].iter().enumerate() {
        let yy = y - i as f64 * 0.07 * u;
        prims.push(Primitive::Path(vec![
            (x - half_width * u, yy),
            (x + half_width * u, yy),
        ]));
    }
    prims
}

fn label_primitives(text: &str, side: LabelSide, mid: Point, u: f64) -> Vec<Primitive> {
    let lines: Vec<&str> = text.lines().collect();
    let spacing = 0.22 * u;
    let gap = 0.4 * u;
    let stack = spacing * lines.len().saturating_sub(1) as f64;
    let anchor = match side {
        LabelSide::Top => (mid.0, mid.1 + gap + stack),
        LabelSide::Bottom => (mid.0, mid.1 - gap),
        LabelSide::Left => (mid.0 - gap * 2.0, mid.1 + stack / 2.0),
        LabelSide::Right => (mid.0 + gap, mid.1 + stack / 2.0),
    };
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| Primitive::Text {
            at: (anchor.0, anchor.1 - spacing * i as f64),
            text: line.to_string(),
        })
        .collect()
}

/// The labelled common-emitter diagram: supply, bias resistor, transistor,
/// emitter resistor, ground.
pub fn common_emitter_schematic(params: &CommonEmitterParams) -> Drawing {
    let mut d = Drawing::default();
    d.push(
        Element::source_v()
            .label(format!("{}V\nVcc", format_value(params.vcc)), LabelSide::Top)
            .up(),
    )
    .push(
        Element::resistor()
            .label(format!("{}\nR1", format_ohms(params.r1)), LabelSide::Top)
            .right(),
    )
    .push(Element::bjt_npn().label(format!("{}\nQ1", params.model.name()), LabelSide::Right))
    .push(
        Element::resistor()
            .label(format!("{}\nR4", format_ohms(params.r4)), LabelSide::Right)
            .down(),
    )
    .push(Element::ground());
    d
}

/// What happened to a schematic request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchematicOutcome {
    Rendered(PathBuf),
    /// This build cannot draw schematics.
    Skipped,
}

/// Render `drawing` to `path`, or skip when schematic support is not built in.
pub fn render_schematic(drawing: &Drawing, path: &Path) -> Result<SchematicOutcome> {
    #[cfg(feature = "schematic")]
    {
        render::render_layout(&drawing.layout(), path)?;
        log::info!("wrote {}", path.display());
        Ok(SchematicOutcome::Rendered(path.to_path_buf()))
    }
    #[cfg(not(feature = "schematic"))]
    {
        let _ = (drawing, path);
        log::info!("schematic support not compiled in, skipping circuit diagram");
        Ok(SchematicOutcome::Skipped)
    }
}

#[cfg(feature = "schematic")]
mod render {
    use std::path::Path;

    use plotters::coord::Shift;
    use plotters::prelude::*;

    use super::{Layout, Primitive};
    use crate::bode::{ImageFormat, drawing};
    use crate::error::{Error, Result};

    const PIXELS_PER_UNIT: f64 = 60.0;
    const MARGIN_UNITS: f64 = 1.0;

    pub(super) fn render_layout(layout: &Layout, path: &Path) -> Result<()> {
        let ((x0, y0), (x1, y1)) = layout
            .bounds()
            .ok_or_else(|| Error::Empty("schematic has no elements".to_string()))?;
        let x_range = (x0 - MARGIN_UNITS)..(x1 + MARGIN_UNITS * 2.0);
        let y_range = (y0 - MARGIN_UNITS)..(y1 + MARGIN_UNITS);
        let size = (
            ((x_range.end - x_range.start) * PIXELS_PER_UNIT).ceil() as u32,
            ((y_range.end - y_range.start) * PIXELS_PER_UNIT).ceil() as u32,
        );

        match ImageFormat::from_path(path) {
            ImageFormat::Svg => draw(
                layout,
                SVGBackend::new(path, size).into_drawing_area(),
                x_range,
                y_range,
            ),
            ImageFormat::Bitmap => draw(
                layout,
                BitMapBackend::new(path, size).into_drawing_area(),
                x_range,
                y_range,
            ),
        }
    }

    fn draw<DB: DrawingBackend>(
        layout: &Layout,
        root: DrawingArea<DB, Shift>,
        x_range: std::ops::Range<f64>,
        y_range: std::ops::Range<f64>,
    ) -> Result<()> {
        root.fill(&WHITE).map_err(drawing)?;
        let mut chart = ChartBuilder::on(&root)
            .build_cartesian_2d(x_range, y_range)
            .map_err(drawing)?;

        let stroke = BLACK.stroke_width(2);
        for primitive in &layout.primitives {
            match primitive {
                Primitive::Path(points) => {
                    chart
                        .draw_series(std::iter::once(PathElement::new(points.clone(), stroke)))
                        .map_err(drawing)?;
                }
                Primitive::Circle { center, radius } => {
                    let px = (radius * PIXELS_PER_UNIT).round() as i32;
                    chart
                        .draw_series(std::iter::once(Circle::new(*center, px, stroke)))
                        .map_err(drawing)?;
                }
                Primitive::Text { at, text } => {
                    chart
                        .draw_series(std::iter::once(Text::new(
                            text.clone(),
                            *at,
                            ("sans-serif", 18).into_font().color(&BLACK),
                        )))
                        .map_err(drawing)?;
                }
            }
        }

        root.present().map_err(drawing)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.0 - b.0).abs() < 1e-9 && (a.1 - b.1).abs() < 1e-9
    }

    #[test]
    fn test_elements_chain_end_to_start() {
        let layout = common_emitter_schematic(&CommonEmitterParams::default()).layout();
        assert_eq!(layout.placed.len(), 5);
        for pair in layout.placed.windows(2) {
            assert!(close(pair[0].end, pair[1].start));
        }
    }

    #[test]
    fn test_directions() {
        let layout = common_emitter_schematic(&CommonEmitterParams::default()).layout();
        let dirs: Vec<Direction> = layout.placed.iter().map(|p| p.direction).collect();
        // Q1 has no direction of its own and inherits the resistor's.
        assert_eq!(
            dirs,
            vec![
                Direction::Up,
                Direction::Right,
                Direction::Right,
                Direction::Down,
                Direction::Down
            ]
        );
        let source = &layout.placed[0];
        assert!(close(source.end, (0.0, 3.0)));
        let r1 = &layout.placed[1];
        assert!(close(r1.end, (3.0, 3.0)));
    }

    #[test]
    fn test_labels_present() {
        let layout = common_emitter_schematic(&CommonEmitterParams::default()).layout();
        let texts: Vec<&str> = layout
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        for expected in ["12V", "Vcc", "100kΩ", "R1", "2N3904", "Q1", "1kΩ", "R4"] {
            assert!(texts.contains(&expected), "missing label {expected}");
        }
    }

    #[test]
    fn test_resistor_path_endpoints() {
        let path = resistor_path((0.0, 0.0), Direction::Down, 3.0);
        assert!(close(path[0], (0.0, 0.0)));
        assert!(close(*path.last().unwrap(), (0.0, -3.0)));
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn test_ground_has_zero_length() {
        let mut d = Drawing::default();
        d.push(Element::ground());
        let layout = d.layout();
        assert_eq!(layout.placed[0].start, layout.placed[0].end);
        assert_eq!(layout.primitives.len(), 4);
    }

    #[test]
    fn test_bounds() {
        let mut d = Drawing::new(2.0);
        d.push(Element::resistor().right());
        let ((x0, _), (x1, _)) = d.layout().bounds().unwrap();
        assert_eq!((x0, x1), (0.0, 2.0));
        assert!(Drawing::default().layout().bounds().is_none());
    }

    #[test]
    fn test_capability_flag_matches_feature() {
        assert_eq!(SCHEMATIC_AVAILABLE, cfg!(feature = "schematic"));
    }

    #[cfg(not(feature = "schematic"))]
    #[test]
    fn test_render_skips_without_feature() {
        let drawing = common_emitter_schematic(&CommonEmitterParams::default());
        let outcome = render_schematic(&drawing, Path::new("unused.svg")).unwrap();
        assert_eq!(outcome, SchematicOutcome::Skipped);
    }
}
