//! Rendered output: a flat segment list with HTML and plain-text views.

use std::fmt;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;

use crate::color::Color;

const CONTAINER_STYLE: &str = "padding: 2px; border-radius: 3px; color: white;";

/// One highlighted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityMark {
    /// Code-point range in the original text
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub surface_text: String,
    pub color: Color,
}

/// Two entities rendered as one container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombinedMark {
    pub start: usize,
    pub end: usize,
    pub label: String,
    /// `first.label + "+" + second.label`
    pub caption: String,
    /// Container background
    pub color: Color,
    /// Text inside the combined range before `first`
    pub leading: String,
    pub first: EntityMark,
    /// Original text between the constituents
    pub between: String,
    pub second: EntityMark,
    /// Text inside the combined range after `second`
    pub trailing: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    /// Uncovered text, copied verbatim
    Text { text: String },
    Entity(EntityMark),
    Combined(CombinedMark),
}

/// Text with entity marks, in left-to-right order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Annotated {
    pub segments: Vec<Segment>,
}

/// A mark in an [`Annotated`] output.
#[derive(Debug, Clone, Copy)]
pub enum MarkRef<'a> {
    Entity(&'a EntityMark),
    Combined(&'a CombinedMark),
}

impl<'a> MarkRef<'a> {
    pub fn label(&self) -> &'a str {
        match *self {
            MarkRef::Entity(mark) => &mark.label,
            MarkRef::Combined(mark) => &mark.label,
        }
    }

    pub fn range(&self) -> (usize, usize) {
        match *self {
            MarkRef::Entity(mark) => (mark.start, mark.end),
            MarkRef::Combined(mark) => (mark.start, mark.end),
        }
    }
}

impl Annotated {
    /// Top-level marks, left to right.
    pub fn marks(&self) -> impl Iterator<Item = MarkRef<'_>> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Text { .. } => None,
            Segment::Entity(mark) => Some(MarkRef::Entity(mark)),
            Segment::Combined(mark) => Some(MarkRef::Combined(mark)),
        })
    }

    /// The text with all markup stripped.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Text { text } => out.push_str(text),
                Segment::Entity(mark) => out.push_str(&mark.surface_text),
                Segment::Combined(mark) => {
                    out.push_str(&mark.leading);
                    out.push_str(&mark.first.surface_text);
                    out.push_str(&mark.between);
                    out.push_str(&mark.second.surface_text);
                    out.push_str(&mark.trailing);
                }
            }
        }
        out
    }

    pub fn to_html(&self) -> String {
        self.to_string()
    }
}

fn write_entity(f: &mut fmt::Formatter<'_>, mark: &EntityMark) -> fmt::Result {
    write!(
        f,
        "<span style=\"background-color: {}; {}\">{}<sub>{}</sub></span>",
        encode_double_quoted_attribute(mark.color.as_str()),
        CONTAINER_STYLE,
        encode_text(&mark.surface_text),
        encode_text(&mark.label),
    )
}

fn write_constituent(f: &mut fmt::Formatter<'_>, mark: &EntityMark) -> fmt::Result {
    write!(
        f,
        "<span style=\"border-bottom: 2px solid {};\">{}<sub>{}</sub></span>",
        encode_double_quoted_attribute(mark.color.as_str()),
        encode_text(&mark.surface_text),
        encode_text(&mark.label),
    )
}

fn write_combined(f: &mut fmt::Formatter<'_>, mark: &CombinedMark) -> fmt::Result {
    write!(
        f,
        "<span style=\"background-color: {}; {}\">",
        encode_double_quoted_attribute(mark.color.as_str()),
        CONTAINER_STYLE,
    )?;
    f.write_str(&encode_text(&mark.leading))?;
    write_constituent(f, &mark.first)?;
    f.write_str(&encode_text(&mark.between))?;
    write_constituent(f, &mark.second)?;
    f.write_str(&encode_text(&mark.trailing))?;
    write!(f, "<sub>{}</sub></span>", encode_text(&mark.caption))
}

/// Writes HTML.
impl fmt::Display for Annotated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text { text } => f.write_str(&encode_text(text))?,
                Segment::Entity(mark) => write_entity(f, mark)?,
                Segment::Combined(mark) => write_combined(f, mark)?,
            }
        }
        Ok(())
    }
}
