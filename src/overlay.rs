//! The overlay renderer: text + spans -> [`Annotated`].
//!
//! Spans are processed from the rightmost start to the leftmost. Each step
//! only touches text to the left of everything already rendered, so the
//! offsets of the remaining spans (given against the original text) stay
//! valid without any bookkeeping.
//!
//! ```text
//! 头  痛  伴  恶  心
//!             ╰──╯ OTHER          processed first
//! ╰──────╯ SIGN_SYMPTOM           processed second
//! ```

use std::cmp::Ordering;

use crate::color::ColorResolver;
use crate::errors::{RenderError, RenderResult};
use crate::markup::{Annotated, CombinedMark, EntityMark, Segment};
use crate::span::{CombinedSpan, Span, TextSpan};

/// Byte offsets of every code point, plus the end of the text.
struct CharIndex<'t> {
    text: &'t str,
    bytes: Vec<usize>,
}

impl<'t> CharIndex<'t> {
    fn new(text: &'t str) -> Self {
        let mut bytes: Vec<usize> = text.char_indices().map(|(idx, _)| idx).collect();
        bytes.push(text.len());
        Self { text, bytes }
    }

    /// Length in code points
    fn len(&self) -> usize {
        self.bytes.len() - 1
    }

    fn slice(&self, start: usize, end: usize) -> &'t str {
        &self.text[self.bytes[start]..self.bytes[end]]
    }
}

/// Order in which spans are spliced in: `start` descending, then `end`
/// descending, then `label` ascending.
///
/// Only the first key matters for valid input. The others make the overlap
/// error deterministic when two spans share a start.
fn processing_order(a: &Span, b: &Span) -> Ordering {
    b.start()
        .cmp(&a.start())
        .then_with(|| b.end().cmp(&a.end()))
        .then_with(|| a.label().cmp(b.label()))
}

fn entity_mark<R: ColorResolver + ?Sized>(span: &TextSpan, colors: &R) -> EntityMark {
    EntityMark {
        start: span.start,
        end: span.end,
        label: span.label.clone(),
        surface_text: span.surface_text.clone(),
        color: colors.resolve(&span.label),
    }
}

fn combined_mark<R: ColorResolver + ?Sized>(
    span: &CombinedSpan,
    index: &CharIndex<'_>,
    colors: &R,
) -> CombinedMark {
    CombinedMark {
        start: span.start,
        end: span.end,
        label: span.label.clone(),
        caption: span.caption(),
        color: colors.resolve(&span.label),
        leading: index.slice(span.start, span.first.start).to_string(),
        first: entity_mark(&span.first, colors),
        between: index.slice(span.first.end, span.second.start).to_string(),
        second: entity_mark(&span.second, colors),
        trailing: index.slice(span.second.end, span.end).to_string(),
    }
}

/// Render `spans` over `text`, resolving colors with `colors`.
///
/// Offsets are code points into `text`. The only overlap allowed is the one
/// between a combined span and its own constituents; independent overlapping
/// spans fail with [`RenderError::OverlapViolation`]. Any invalid span fails
/// the whole call, nothing is partially rendered.
///
/// Surface text is not compared with `text`: each mark shows the surface it
/// was given, so [`Annotated::plain_text`] only reproduces `text` when every
/// surface equals its slice.
pub fn render<R>(text: &str, spans: &[Span], colors: &R) -> RenderResult<Annotated>
where
    R: ColorResolver + ?Sized,
{
    let index = CharIndex::new(text);
    for span in spans {
        span.validate(index.len())?;
    }

    let mut order: Vec<&Span> = spans.iter().collect();
    order.sort_by(|a, b| processing_order(a, b));

    tracing::debug!(
        spans = spans.len(),
        text_len = index.len(),
        "rendering entity overlay"
    );

    let mut segments = Vec::with_capacity(order.len() * 2 + 1);
    // left edge of the already rendered suffix
    let mut cursor = index.len();
    let mut previous: Option<&Span> = None;

    for span in order {
        if let Some(prev) = previous.filter(|_| span.end() > cursor) {
            return Err(RenderError::OverlapViolation {
                first: span.span_ref(),
                second: prev.span_ref(),
            });
        }

        if span.end() < cursor {
            segments.push(Segment::Text {
                text: index.slice(span.end(), cursor).to_string(),
            });
        }

        segments.push(match span {
            Span::Plain(plain) => Segment::Entity(entity_mark(plain, colors)),
            Span::Combined(combined) => Segment::Combined(combined_mark(combined, &index, colors)),
        });

        cursor = span.start();
        previous = Some(span);
    }

    if cursor > 0 {
        segments.push(Segment::Text {
            text: index.slice(0, cursor).to_string(),
        });
    }

    segments.reverse();
    tracing::debug!(segments = segments.len(), "rendered entity overlay");

    Ok(Annotated { segments })
}

/// [`render`] straight to an HTML string.
pub fn render_html<R>(text: &str, spans: &[Span], colors: &R) -> RenderResult<String>
where
    R: ColorResolver + ?Sized,
{
    render(text, spans, colors).map(|annotated| annotated.to_html())
}
