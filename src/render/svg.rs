//! SVG generation

use std::f64::consts::PI;

use glam::DVec2;
use svg::Document;
use svg::node::Node;
use svg::node::element::path::Data;
use svg::node::element::{Anchor, Circle, Group, Line, Path, Rectangle, Style, Text};

use super::{CircleCmd, LineCmd, RectCmd, SectorCmd, Surface, TextCmd};
use crate::geometry::{BoundingBox, polar};
use crate::text::LINE_HEIGHT;
use crate::types::{NodeClass, NodeId, PersonId};

/// Prefix of the `id` attribute of every node group
pub const NODE_ID_PREFIX: &str = "tree-node-";

const DEFAULT_STYLE: &str = "\
.node { stroke: #555; stroke-width: 1; }
.male { fill: #cfe2f3; }
.female { fill: #f4cccc; }
.unknown { fill: #eeeeee; }
.fictive { fill: #ffffff; stroke-dasharray: 4 2; }
.link { stroke: #555; stroke-width: 1; fill: none; }
text { font-family: sans-serif; fill: #111; }
";

/// SVG output settings
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Pixels per layout unit
    pub pixels_per_unit: f64,
    /// Blank border around the content, in layout units
    pub margin: f64,
    /// Link target for person nodes; `{id}` is replaced by the person index
    pub detail_href: Option<String>,
    /// Embed the default stylesheet
    pub stylesheet: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            pixels_per_unit: 40.0,
            margin: 0.5,
            detail_href: None,
            stylesheet: true,
        }
    }
}

impl SvgOptions {
    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f64) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    pub fn with_detail_href(mut self, template: impl Into<String>) -> Self {
        self.detail_href = Some(template.into());
        self
    }

    pub fn with_stylesheet(mut self, stylesheet: bool) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    pub fn href_for(&self, person: PersonId) -> Option<String> {
        self.detail_href
            .as_ref()
            .map(|t| t.replace("{id}", &person.index().to_string()))
    }
}

/// Node group being painted
struct OpenNode {
    group: Group,
    href: Option<String>,
    children: Vec<Box<dyn Node>>,
}

/// Surface that accumulates an SVG document
pub struct SvgSurface {
    options: SvgOptions,
    bounds: BoundingBox,
    groups: Vec<Group>,
    open: Option<OpenNode>,
}

impl SvgSurface {
    pub fn new(bounds: BoundingBox, options: SvgOptions) -> Self {
        Self {
            options,
            bounds,
            groups: Vec::new(),
            open: None,
        }
    }

    /// Node groups written so far
    pub fn node_count(&self) -> usize {
        self.groups.len()
    }

    pub fn into_document(mut self) -> Document {
        self.close_node();
        let scale = self.options.pixels_per_unit;
        let view = self.bounds.inflate(self.options.margin);
        let (x, y) = px(view.min, scale);
        let w = (view.width() * scale) as f32;
        let h = (view.height() * scale) as f32;

        let mut doc = Document::new()
            .set("viewBox", (x, y, w, h))
            .set("width", w)
            .set("height", h);
        if self.options.stylesheet {
            doc = doc.add(Style::new(DEFAULT_STYLE));
        }
        for group in self.groups {
            doc = doc.add(group);
        }
        doc
    }

    pub fn finish(self) -> String {
        self.into_document().to_string()
    }

    fn scale(&self) -> f64 {
        self.options.pixels_per_unit
    }

    fn push(&mut self, node: impl Into<Box<dyn Node>>) {
        match self.open.as_mut() {
            Some(open) => open.children.push(node.into()),
            // Commands outside a node get a group of their own
            None => {
                self.groups.push(Group::new().add(node));
            }
        }
    }

    fn close_node(&mut self) {
        let Some(open) = self.open.take() else {
            return;
        };
        let mut group = open.group;
        match open.href {
            Some(href) => {
                let mut anchor = Anchor::new().set("href", href);
                for child in open.children {
                    anchor = anchor.add(child);
                }
                group = group.add(anchor);
            }
            None => {
                for child in open.children {
                    group = group.add(child);
                }
            }
        }
        self.groups.push(group);
    }
}

fn px(p: DVec2, scale: f64) -> (f32, f32) {
    ((p.x * scale) as f32, (p.y * scale) as f32)
}

fn shape_class(class: NodeClass) -> String {
    format!("node {}", class.css_class())
}

/// Arc from the current point to `to` on a circle of radius `r`. Arcs over
/// half a turn must be split by the caller.
fn arc_to(data: Data, r: f32, clockwise: bool, to: (f32, f32)) -> Data {
    data.elliptical_arc_to(vec![r, r, 0.0, 0.0, clockwise as u8 as f32, to.0, to.1])
}

/// Arc through `angles`, split at the midpoint when longer than half a turn
fn arc_path(mut data: Data, r: f64, angles: &[f64], scale: f64) -> Data {
    let rp = (r * scale) as f32;
    for pair in angles.windows(2) {
        let clockwise = pair[1] > pair[0];
        data = arc_to(data, rp, clockwise, px(polar(r, pair[1]), scale));
    }
    data
}

impl Surface for SvgSurface {
    fn begin_node(&mut self, node: NodeId, person: Option<PersonId>, class: NodeClass) {
        self.close_node();
        let mut group = Group::new()
            .set("id", format!("{NODE_ID_PREFIX}{node}"))
            .set("class", class.css_class());
        if let Some(person) = person {
            group = group.set("data-person", person.index());
        }
        self.open = Some(OpenNode {
            group,
            href: person.and_then(|p| self.options.href_for(p)),
            children: Vec::new(),
        });
    }

    fn end_node(&mut self) {
        self.close_node();
    }

    fn circle(&mut self, cmd: &CircleCmd) {
        let scale = self.scale();
        let (cx, cy) = px(cmd.center, scale);
        self.push(
            Circle::new()
                .set("cx", cx)
                .set("cy", cy)
                .set("r", (cmd.radius * scale) as f32)
                .set("class", shape_class(cmd.class)),
        );
    }

    fn sector(&mut self, cmd: &SectorCmd) {
        let scale = self.scale();
        let s = &cmd.sector;
        let (a0, a1) = (s.angles.start, s.angles.end);
        let outer = if s.angles.span().abs() > PI {
            vec![a0, s.angles.mid(), a1]
        } else {
            vec![a0, a1]
        };
        let inner: Vec<f64> = outer.iter().rev().copied().collect();

        let mut data = if s.inner > 0.0 {
            Data::new().move_to(px(polar(s.outer, a0), scale))
        } else {
            Data::new()
                .move_to(px(DVec2::ZERO, scale))
                .line_to(px(polar(s.outer, a0), scale))
        };
        data = arc_path(data, s.outer, &outer, scale);
        if s.inner > 0.0 {
            data = data.line_to(px(polar(s.inner, a1), scale));
            data = arc_path(data, s.inner, &inner, scale);
        }
        data = data.close();

        self.push(
            Path::new()
                .set("d", data)
                .set("class", shape_class(cmd.class)),
        );
    }

    fn rect(&mut self, cmd: &RectCmd) {
        let scale = self.scale();
        let (x, y) = px(cmd.rect.origin, scale);
        let (w, h) = px(cmd.rect.size, scale);
        self.push(
            Rectangle::new()
                .set("x", x)
                .set("y", y)
                .set("width", w)
                .set("height", h)
                .set("class", shape_class(cmd.class)),
        );
    }

    fn line(&mut self, cmd: &LineCmd) {
        let scale = self.scale();
        let (x1, y1) = px(cmd.from, scale);
        let (x2, y2) = px(cmd.to, scale);
        self.push(
            Line::new()
                .set("x1", x1)
                .set("y1", y1)
                .set("x2", x2)
                .set("y2", y2)
                .set("class", "link"),
        );
    }

    fn text(&mut self, cmd: &TextCmd) {
        let scale = self.scale();
        let (cx, cy) = px(cmd.center, scale);
        let font = cmd.text.font_size * scale;
        let step = font * LINE_HEIGHT;
        let n = cmd.text.lines.len() as f64;
        for (i, line) in cmd.text.lines.iter().enumerate() {
            let dy = (i as f64 - (n - 1.0) / 2.0) * step;
            let mut text = Text::new(line.as_str())
                .set("x", cx)
                .set("y", cy + dy as f32)
                .set("font-size", font as f32)
                .set("text-anchor", "middle")
                .set("dominant-baseline", "central");
            if cmd.rotation != 0.0 {
                text = text.set(
                    "transform",
                    format!("rotate({} {} {})", cmd.rotation as f32, cx, cy),
                );
            }
            self.push(text);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{AngleRange, Rect, Sector};
    use crate::text::FittedText;
    use glam::dvec2;

    fn surface() -> SvgSurface {
        SvgSurface::new(
            BoundingBox::from_xywh(-1.0, -1.0, 2.0, 2.0),
            SvgOptions::default().with_stylesheet(false),
        )
    }

    #[test]
    fn nodes_become_identified_groups() {
        let mut s = surface();
        s.begin_node(NodeId(3), Some(PersonId(7)), NodeClass::Female);
        s.rect(&RectCmd {
            rect: Rect::new(0.0, 0.0, 1.0, 0.5),
            class: NodeClass::Female,
        });
        s.end_node();
        assert_eq!(s.node_count(), 1);
        let out = s.finish();
        assert!(out.contains(r#"id="tree-node-3""#), "{out}");
        assert!(out.contains(r#"data-person="7""#), "{out}");
        assert!(out.contains(r#"class="node female""#), "{out}");
        // 2 units plus a 0.5 margin on both sides, at 40 px per unit
        assert!(out.contains(r#"width="120""#), "{out}");
    }

    #[test]
    fn detail_links_wrap_person_nodes() {
        let mut s = SvgSurface::new(
            BoundingBox::from_xywh(0.0, 0.0, 1.0, 1.0),
            SvgOptions::default().with_detail_href("/person/{id}"),
        );
        s.begin_node(NodeId(0), Some(PersonId(12)), NodeClass::Male);
        s.circle(&CircleCmd {
            center: DVec2::ZERO,
            radius: 1.0,
            class: NodeClass::Male,
        });
        s.end_node();
        s.begin_node(NodeId(1), None, NodeClass::Fictive);
        s.circle(&CircleCmd {
            center: DVec2::ZERO,
            radius: 1.0,
            class: NodeClass::Fictive,
        });
        s.end_node();
        let out = s.finish();
        assert_eq!(out.matches("/person/12").count(), 1, "{out}");
        assert_eq!(out.matches("<a ").count(), 1, "{out}");
    }

    #[test]
    fn sectors_are_arc_paths() {
        let mut s = surface();
        s.sector(&SectorCmd {
            sector: Sector::new(AngleRange::new(0.0, PI / 2.0), 1.0, 2.0),
            class: NodeClass::Unknown,
        });
        let out = s.finish();
        let d = out
            .split(" d=\"")
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap_or_default();
        assert!(d.starts_with('M'), "{out}");
        // Outer arc forward, inner arc back
        assert_eq!(d.matches('A').count(), 2, "{out}");
    }

    #[test]
    fn multi_line_text_is_stacked_and_rotated() {
        let mut s = surface();
        s.text(&TextCmd {
            center: dvec2(0.0, 0.0),
            rotation: 90.0,
            text: FittedText {
                font_size: 0.5,
                lines: vec!["Jean".into(), "1850-1920".into()],
            },
        });
        let out = s.finish();
        assert_eq!(out.matches("<text").count(), 2, "{out}");
        assert!(out.contains("rotate(90 0 0)"), "{out}");
        // The writer puts text content on its own line
        let line = regex_lite::Regex::new(r">\s*Jean\s*<").unwrap();
        assert!(line.is_match(&out), "{out}");
    }

    #[test]
    fn href_template_substitutes_person_index() {
        let opts = SvgOptions::default().with_detail_href("p.html?id={id}");
        assert_eq!(opts.href_for(PersonId(5)).as_deref(), Some("p.html?id=5"));
        assert_eq!(SvgOptions::default().href_for(PersonId(5)), None);
    }
}
