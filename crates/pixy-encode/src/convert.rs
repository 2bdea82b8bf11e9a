//! SVG document to [`Drawing`] conversion.

use crate::builder::OpBuilder;
use crate::drawing::{Canvas, Drawing};
use crate::fill::resolve_fill;
use crate::label::StructuralLabel;
use crate::walk::{Flow, TreeVisitor, doctype_name, walk};
use crate::{Error, Result};
use pixy_core::number::parse_length;
use pixy_core::points::{line_to_path, points_to_path};
use pixy_core::{Matrix, Path, Style, StyleStack, parse_transform};
use roxmltree::Node;

pub const INKSCAPE_NS: &str = "http://www.inkscape.org/namespaces/inkscape";

/// Elements whose subtrees never draw directly.
const NON_RENDERING: &[&str] = &[
    "defs", "metadata", "clipPath", "mask", "pattern", "symbol", "marker", "title", "desc",
];

/// How the `<!DOCTYPE>` declaration is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DoctypePolicy {
    /// A declared doctype must name `svg`.
    #[default]
    Strict,
    /// Any doctype is accepted.
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeOptions {
    pub doctype: DoctypePolicy,
    /// Treat a `rect` at the origin covering the whole canvas as a canvas fill.
    pub background_rect: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self::strict()
    }
}

impl EncodeOptions {
    pub fn strict() -> Self {
        Self {
            doctype: DoctypePolicy::Strict,
            background_rect: true,
        }
    }

    pub fn lenient() -> Self {
        Self {
            doctype: DoctypePolicy::Lenient,
            ..Self::strict()
        }
    }
}

struct Converter {
    options: EncodeOptions,
    styles: StyleStack,
    transforms: Vec<Matrix>,
    labels: Vec<Option<StructuralLabel>>,
    /// Canvas size in user units, for background detection.
    size: Option<(f64, f64)>,
    canvas: Option<Canvas>,
    builder: OpBuilder,
}

impl Converter {
    fn new(options: EncodeOptions) -> Self {
        Self {
            options,
            styles: StyleStack::new(),
            transforms: Vec::new(),
            labels: Vec::new(),
            size: None,
            canvas: None,
            builder: OpBuilder::new(),
        }
    }

    fn matrix(&self) -> Matrix {
        self.transforms.last().copied().unwrap_or_default()
    }

    fn enter_svg(&mut self, node: Node<'_, '_>) -> Result<()> {
        if self.canvas.is_some() {
            return Ok(());
        }
        let dimension = |attribute: &'static str| -> Result<f64> {
            let value = node
                .attribute(attribute)
                .ok_or_else(|| Error::MissingAttribute {
                    element: "svg".to_string(),
                    attribute,
                })?;
            Ok(parse_length(value)?)
        };
        let (width, height) = (dimension("width")?, dimension("height")?);
        self.canvas = Some(Canvas::from_size(width, height)?);
        self.size = Some((width, height));
        tracing::debug!(width, height, "canvas");
        Ok(())
    }

    fn enter_group(&mut self, node: Node<'_, '_>) -> Result<()> {
        let label = match node.attribute((INKSCAPE_NS, "label")) {
            Some(l) => StructuralLabel::parse(l)?,
            None => None,
        };
        match label {
            Some(StructuralLabel::Detail(level)) => self.builder.detail(level),
            Some(StructuralLabel::Choice { group, .. }) => self.builder.enter_choice(group),
            None => {}
        }
        self.labels.push(label);
        Ok(())
    }

    fn exit_group(&mut self) {
        if let Some(Some(StructuralLabel::Choice { .. })) = self.labels.pop() {
            self.builder.exit_choice();
        }
    }

    fn background(&mut self, node: Node<'_, '_>) -> Result<()> {
        let Some((width, height)) = self.size else {
            return Ok(());
        };
        let length = |name: &str| -> Result<Option<f64>> {
            Ok(node.attribute(name).map(parse_length).transpose()?)
        };
        let covers = length("x")?.unwrap_or(0.0) == 0.0
            && length("y")?.unwrap_or(0.0) == 0.0
            && length("width")? == Some(width)
            && length("height")? == Some(height);
        if !covers {
            return Ok(());
        }
        if let Some(fill) = resolve_fill(&self.styles)? {
            tracing::debug!(?fill, "background");
            self.builder.compose(fill)?;
        }
        Ok(())
    }

    fn draw(&mut self, geometry: &str) -> Result<()> {
        let mut path = Path::parse(geometry)?;
        let Some(fill) = resolve_fill(&self.styles)? else {
            tracing::debug!("skipping path without solid fill");
            return Ok(());
        };
        let matrix = self.matrix();
        if !matrix.is_identity() {
            path.transform(&matrix)?;
        }
        let segments = path.canonical()?;
        tracing::debug!(segments = segments.len(), ?fill, "path");
        self.builder.add_path(&segments, fill)
    }

    fn finish(mut self) -> Result<Drawing> {
        self.builder.end();
        let canvas = self.canvas.ok_or_else(|| Error::MissingAttribute {
            element: "svg".to_string(),
            attribute: "width",
        })?;
        let (operations, palette) = self.builder.into_parts();
        Ok(Drawing::new(canvas, palette, operations))
    }
}

impl TreeVisitor for Converter {
    fn enter(&mut self, node: Node<'_, '_>) -> Result<Flow> {
        let name = node.tag_name().name();
        if NON_RENDERING.contains(&name) {
            return Ok(Flow::Skip);
        }
        let style = Style::from_attributes(
            node.attributes()
                .filter(|a| a.namespace().is_none())
                .map(|a| (a.name(), a.value())),
        );
        if style.get_own("display") == Some("none") {
            return Ok(Flow::Skip);
        }
        let matrix = match node.attribute("transform") {
            Some(t) => parse_transform(&self.matrix(), t)?,
            None => self.matrix(),
        };
        self.styles.push(style);
        self.transforms.push(matrix);

        match name {
            "svg" => self.enter_svg(node)?,
            "g" => self.enter_group(node)?,
            "rect" if self.options.background_rect => self.background(node)?,
            "path" => {
                if let Some(d) = node.attribute("d") {
                    self.draw(d)?;
                }
            }
            "polygon" | "polyline" => {
                if let Some(points) = node.attribute("points") {
                    self.draw(&points_to_path(points, name == "polygon")?)?;
                }
            }
            "line" => {
                let coord = |name: &str| -> Result<f64> {
                    Ok(node.attribute(name).map(parse_length).transpose()?.unwrap_or(0.0))
                };
                let geometry = line_to_path(coord("x1")?, coord("y1")?, coord("x2")?, coord("y2")?);
                self.draw(&geometry)?;
            }
            _ => {}
        }
        Ok(Flow::Descend)
    }

    fn exit(&mut self, node: Node<'_, '_>) -> Result<()> {
        self.styles.pop();
        self.transforms.pop();
        if node.tag_name().name() == "g" {
            self.exit_group();
        }
        Ok(())
    }
}

/// Converts SVG text into a [`Drawing`].
///
/// The root element must be `svg` with `width` and `height` attributes. Under
/// [`DoctypePolicy::Strict`] a `<!DOCTYPE>` naming anything other than `svg` is rejected.
pub fn convert_svg(text: &str, options: &EncodeOptions) -> Result<Drawing> {
    let mut parsing = roxmltree::ParsingOptions::default();
    parsing.allow_dtd = true;
    let doc = roxmltree::Document::parse_with_options(text, parsing)?;
    let root = doc.root_element();
    if options.doctype == DoctypePolicy::Strict {
        let prolog = text.get(..root.range().start).unwrap_or(text);
        if let Some(doctype) = doctype_name(prolog).filter(|d| *d != "svg") {
            return Err(Error::InvalidDocumentType {
                doctype: doctype.to_string(),
            });
        }
    }
    if root.tag_name().name() != "svg" {
        return Err(Error::InvalidDocumentType {
            doctype: root.tag_name().name().to_string(),
        });
    }
    let mut converter = Converter::new(*options);
    walk(root, &mut converter)?;
    converter.finish()
}

/// Converts SVG text straight to Pixy bytes.
pub fn encode_svg(text: &str, options: &EncodeOptions) -> Result<Vec<u8>> {
    convert_svg(text, options)?.to_bytes()
}
