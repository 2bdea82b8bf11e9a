//! Presentation-property cascade.
//!
//! Each element contributes one [`Style`] frame built from its presentation attributes and its
//! `style` attribute. Frames live on a [`StyleStack`] that is pushed on element entry and popped on
//! exit; a lookup walks from the innermost frame outwards, so every frame's parent is the frame
//! below it.

use crate::color::parse_paint;
use crate::opacity::parse_opacity;
use indexmap::IndexMap;

const INHERIT: &str = "inherit";

/// Properties recognized by the cascade.
pub const PROPERTIES: &[&str] = &[
    "visibility",
    "display",
    "color",
    "font-family",
    "font-size",
    "font-stretch",
    "font-style",
    "font-variant",
    "font-weight",
    "text-anchor",
    "writing-mode",
    "kerning",
    "letter-spacing",
    "fill",
    "fill-opacity",
    "fill-rule",
    "stroke",
    "stroke-dasharray",
    "stroke-dashoffset",
    "stroke-linecap",
    "stroke-linejoin",
    "stroke-miterlimit",
    "stroke-opacity",
    "stroke-width",
    "clip-path",
    "clip-rule",
    "mask",
    "opacity",
    "enable-background",
    "filter",
    "overflow",
    "marker",
    "marker-start",
    "marker-mid",
    "marker-end",
    "stop-color",
    "stop-opacity",
];

const COLOR_PROPERTIES: &[&str] = &["color", "fill", "stroke", "stop-color"];

const OPACITY_PROPERTIES: &[&str] = &["opacity", "fill-opacity", "stroke-opacity", "stop-opacity"];

const ROOT_DEFAULTS: &[(&str, &str)] = &[
    ("display", "inline"),
    ("visibility", "visible"),
    ("opacity", "1"),
    ("stop-opacity", "1"),
    ("fill", "black"),
    ("fill-opacity", "1"),
    ("fill-rule", "nonzero"),
    ("stroke", "none"),
    ("stroke-dasharray", "none"),
    ("stroke-dashoffset", "0"),
    ("stroke-linecap", "butt"),
    ("stroke-linejoin", "miter"),
    ("stroke-miterlimit", "4"),
    ("stroke-opacity", "1"),
    ("stroke-width", "1"),
    ("marker", "none"),
    ("marker-start", "none"),
    ("marker-end", "none"),
    ("marker-mid", "none"),
];

/// Read access to resolved presentation properties.
pub trait PropertySource {
    /// Returns the effective value of `name`, falling back to ancestors.
    fn get(&self, name: &str) -> Option<&str>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    props: IndexMap<String, String>,
}

fn is_valid(name: &str, value: &str) -> bool {
    if value == INHERIT {
        return true;
    }
    if COLOR_PROPERTIES.contains(&name) {
        return parse_paint(value).is_ok();
    }
    if OPACITY_PROPERTIES.contains(&name) {
        return parse_opacity(value).is_ok();
    }
    true
}

impl Style {
    pub fn root() -> Self {
        let mut s = Self::default();
        for (name, value) in ROOT_DEFAULTS {
            s.props.insert((*name).to_string(), (*value).to_string());
        }
        s
    }

    /// Builds a frame from an element's attributes.
    ///
    /// Declarations in the `style` attribute override presentation attributes.
    pub fn from_attributes<'a, I>(attrs: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut s = Self::default();
        let mut inline = None;
        for (name, value) in attrs {
            if name == "style" {
                inline = Some(value);
            } else if PROPERTIES.contains(&name) {
                s.set(name, value.trim().trim_end_matches(';'));
            }
        }
        if let Some(inline) = inline {
            s.apply_inline(inline);
        }
        s
    }

    fn apply_inline(&mut self, inline: &str) {
        for decl in inline.split(';').map(str::trim).filter(|d| !d.is_empty()) {
            let Some((name, value)) = decl.split_once(':') else {
                tracing::warn!(declaration = decl, "discarding invalid style");
                continue;
            };
            self.set(name.trim(), value.trim());
        }
    }

    /// Sets a property, returning `false` (and logging) when it is unknown or invalid.
    pub fn set(&mut self, name: &str, value: &str) -> bool {
        if !PROPERTIES.contains(&name) {
            tracing::warn!(name, value, "discarding unknown style");
            return false;
        }
        if !is_valid(name, value) {
            tracing::warn!(name, value, "invalid style value");
            return false;
        }
        self.props.insert(name.to_string(), value.to_string());
        true
    }

    /// Value declared on this frame only.
    pub fn get_own(&self, name: &str) -> Option<&str> {
        self.props.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct StyleStack {
    frames: Vec<Style>,
}

impl Default for StyleStack {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleStack {
    /// A stack holding only the root defaults.
    pub fn new() -> Self {
        Self {
            frames: vec![Style::root()],
        }
    }

    pub fn push(&mut self, style: Style) {
        self.frames.push(style);
    }

    /// Pops the innermost frame. The root frame is never popped.
    pub fn pop(&mut self) -> Option<Style> {
        if self.frames.len() > 1 {
            self.frames.pop()
        } else {
            None
        }
    }

    /// Number of frames above the root.
    pub fn depth(&self) -> usize {
        self.frames.len() - 1
    }
}

impl PropertySource for StyleStack {
    fn get(&self, name: &str) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .find_map(|s| s.get_own(name).filter(|v| *v != INHERIT))
    }
}

impl PropertySource for Style {
    fn get(&self, name: &str) -> Option<&str> {
        self.get_own(name).filter(|v| *v != INHERIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_supplies_fill_defaults() {
        let stack = StyleStack::new();
        assert_eq!(stack.get("fill"), Some("black"));
        assert_eq!(stack.get("opacity"), Some("1"));
        assert_eq!(stack.get("fill-opacity"), Some("1"));
        assert_eq!(stack.get("font-family"), None);
    }

    #[test]
    fn inline_style_overrides_presentation_attributes() {
        let s = Style::from_attributes([
            ("fill", "red"),
            ("style", "fill: blue; opacity:0.5;"),
            ("d", "M0 0"),
        ]);
        assert_eq!(s.get_own("fill"), Some("blue"));
        assert_eq!(s.get_own("opacity"), Some("0.5"));
        assert_eq!(s.get_own("d"), None);
    }

    #[test]
    fn invalid_and_unknown_declarations_are_discarded() {
        let s = Style::from_attributes([("style", "fill:notacolor;bogus:1;junk;opacity:50%")]);
        assert_eq!(s.get_own("fill"), None);
        assert_eq!(s.get_own("bogus"), None);
        assert_eq!(s.get_own("opacity"), Some("50%"));
    }

    #[test]
    fn lookups_fall_back_through_parents() {
        let mut stack = StyleStack::new();
        stack.push(Style::from_attributes([("fill", "#00f")]));
        stack.push(Style::from_attributes([("opacity", "0.5")]));
        assert_eq!(stack.get("fill"), Some("#00f"));
        assert_eq!(stack.get("opacity"), Some("0.5"));

        stack.push(Style::from_attributes([("fill", "inherit")]));
        assert_eq!(stack.get("fill"), Some("#00f"));

        assert_eq!(stack.depth(), 3);
        stack.pop();
        stack.pop();
        assert_eq!(stack.get("opacity"), Some("1"));
        stack.pop();
        assert_eq!(stack.get("fill"), Some("black"));
        assert!(stack.pop().is_none());
    }
}
