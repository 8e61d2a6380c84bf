//! Span model: labeled half-open ranges over a text.
//!
//! Offsets are zero-based and counted in Unicode code points (not bytes),
//! always against the *original* text.

use std::fmt;

use crate::errors::{InvalidSpanReason, RenderError, RenderResult};

/// Reserved label for a span synthesized from a biological structure and a
/// symptom.
pub const COMBINED_BIO_SYMPTOM: &str = "COMBINED_BIO_SYMPTOM";

/// A plain labeled span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    /// Inclusive start offset
    pub start: usize,
    /// Exclusive end offset
    pub end: usize,
    /// Entity category, e.g. `"DISEASE_DISORDER"`
    pub label: String,
    /// The covered text, `text[start..end]`
    pub surface_text: String,
}

impl TextSpan {
    pub fn new(
        start: usize,
        end: usize,
        label: impl Into<String>,
        surface_text: impl Into<String>,
    ) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            surface_text: surface_text.into(),
        }
    }

    /// Build a span whose surface text is sliced from `text`.
    ///
    /// Out-of-range offsets produce an empty surface text; validation happens
    /// at render time.
    pub fn from_text(text: &str, start: usize, end: usize, label: impl Into<String>) -> Self {
        let surface_text = text
            .chars()
            .skip(start)
            .take(end.saturating_sub(start))
            .collect::<String>();
        Self::new(start, end, label, surface_text)
    }

    pub fn span_ref(&self) -> SpanRef {
        SpanRef::new(self.start, self.end, &self.label)
    }

    fn validate(&self, text_len: usize) -> Result<(), InvalidSpanReason> {
        if self.start >= self.end {
            return Err(InvalidSpanReason::Empty);
        }
        if self.end > text_len {
            return Err(InvalidSpanReason::OutOfBounds { text_len });
        }
        Ok(())
    }
}

/// A span pairing two underlying spans that are rendered as one unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedSpan {
    pub start: usize,
    pub end: usize,
    /// Usually [`COMBINED_BIO_SYMPTOM`]; drives the container color.
    pub label: String,
    /// The earlier constituent
    pub first: TextSpan,
    /// The later constituent
    pub second: TextSpan,
}

impl CombinedSpan {
    pub fn new(label: impl Into<String>, first: TextSpan, second: TextSpan) -> Self {
        Self {
            start: first.start.min(second.start),
            end: first.end.max(second.end),
            label: label.into(),
            first,
            second,
        }
    }

    /// Widen the combined range beyond its constituents.
    pub fn with_range(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// `first.label + "+" + second.label`
    pub fn caption(&self) -> String {
        format!("{}+{}", self.first.label, self.second.label)
    }

    fn validate(&self, text_len: usize) -> Result<(), RenderError> {
        let own = SpanRef::new(self.start, self.end, &self.label);
        let fail = |span: SpanRef, reason| RenderError::InvalidSpan { span, reason };

        if self.start >= self.end {
            return Err(fail(own, InvalidSpanReason::Empty));
        }
        if self.end > text_len {
            return Err(fail(own, InvalidSpanReason::OutOfBounds { text_len }));
        }
        for constituent in [&self.first, &self.second].iter() {
            constituent
                .validate(text_len)
                .map_err(|reason| fail(constituent.span_ref(), reason))?;
            if constituent.start < self.start || constituent.end > self.end {
                return Err(fail(
                    own.clone(),
                    InvalidSpanReason::ConstituentOutside {
                        constituent: constituent.span_ref(),
                    },
                ));
            }
        }
        if self.first.end > self.second.start {
            return Err(fail(
                own,
                InvalidSpanReason::ConstituentsOverlap {
                    first: self.first.span_ref(),
                    second: self.second.span_ref(),
                },
            ));
        }
        Ok(())
    }
}

/// Either a plain span or a combined one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Plain(TextSpan),
    Combined(CombinedSpan),
}

impl Span {
    pub fn start(&self) -> usize {
        match self {
            Span::Plain(span) => span.start,
            Span::Combined(span) => span.start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            Span::Plain(span) => span.end,
            Span::Combined(span) => span.end,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Span::Plain(span) => &span.label,
            Span::Combined(span) => &span.label,
        }
    }

    pub fn is_combined(&self) -> bool {
        matches!(self, Span::Combined(_))
    }

    pub fn span_ref(&self) -> SpanRef {
        SpanRef::new(self.start(), self.end(), self.label())
    }

    /// Check offsets against a text of `text_len` code points.
    pub fn validate(&self, text_len: usize) -> RenderResult<()> {
        match self {
            Span::Plain(span) => span
                .validate(text_len)
                .map_err(|reason| RenderError::InvalidSpan {
                    span: span.span_ref(),
                    reason,
                }),
            Span::Combined(span) => span.validate(text_len),
        }
    }
}

impl From<TextSpan> for Span {
    fn from(span: TextSpan) -> Self {
        Span::Plain(span)
    }
}

impl From<CombinedSpan> for Span {
    fn from(span: CombinedSpan) -> Self {
        Span::Combined(span)
    }
}

/// Identifies a span in error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpanRef {
    pub start: usize,
    pub end: usize,
    pub label: String,
}

impl SpanRef {
    pub fn new(start: usize, end: usize, label: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
        }
    }
}

impl fmt::Display for SpanRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{})", self.label, self.start, self.end)
    }
}
