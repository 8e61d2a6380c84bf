//! Records as emitted by the annotation service.
//!
//! ```json
//! {
//!   "text": "头部疼痛",
//!   "entities": [
//!     {
//!       "entity_group": "COMBINED_BIO_SYMPTOM", "word": "头部疼痛", "start": 0, "end": 4,
//!       "original_entities": [
//!         { "entity_group": "BIOLOGICAL_STRUCTURE", "word": "头部", "start": 0, "end": 2 },
//!         { "entity_group": "SIGN_SYMPTOM", "word": "疼痛", "start": 2, "end": 4 }
//!       ]
//!     }
//!   ]
//! }
//! ```

use std::convert::TryFrom;

use serde::{Deserialize, Serialize};

use crate::color::ColorResolver;
use crate::errors::{InvalidSpanReason, RenderError, RenderResult};
use crate::markup::Annotated;
use crate::overlay::render;
use crate::span::{CombinedSpan, Span, SpanRef, TextSpan, COMBINED_BIO_SYMPTOM};

/// One entity in a service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(alias = "label")]
    pub entity_group: String,
    /// Surface text; sliced from the response text when empty.
    #[serde(default, alias = "surface_text", alias = "surfaceText")]
    pub word: String,
    /// Signed so that negative offsets surface as invalid spans.
    pub start: i64,
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// The two spans a combined entity was built from
    #[serde(
        default,
        alias = "constituents",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_entities: Option<Vec<EntityRecord>>,
}

impl EntityRecord {
    pub fn new(entity_group: impl Into<String>, word: impl Into<String>, start: i64, end: i64) -> Self {
        Self {
            entity_group: entity_group.into(),
            word: word.into(),
            start,
            end,
            score: None,
            original_entities: None,
        }
    }

    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_original_entities(mut self, first: EntityRecord, second: EntityRecord) -> Self {
        self.original_entities = Some(vec![first, second]);
        self
    }

    /// A record is combined when it carries the combined label and its
    /// constituents. A combined label alone renders as a plain span.
    pub fn is_combined(&self) -> bool {
        self.entity_group == COMBINED_BIO_SYMPTOM && self.original_entities.is_some()
    }

    fn span_ref(&self) -> SpanRef {
        let clamp = |offset: i64| usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        SpanRef::new(clamp(self.start), clamp(self.end), &self.entity_group)
    }

    /// Offsets that do not fit a `usize` cannot be inside `text`.
    fn offsets(&self, text: &str) -> RenderResult<(usize, usize)> {
        let convert = |offset: i64| {
            if offset < 0 {
                return Err(InvalidSpanReason::Negative { offset });
            }
            usize::try_from(offset).map_err(|_| InvalidSpanReason::OutOfBounds {
                text_len: text.chars().count(),
            })
        };
        convert(self.start)
            .and_then(|start| convert(self.end).map(|end| (start, end)))
            .map_err(|reason| RenderError::InvalidSpan {
                span: self.span_ref(),
                reason,
            })
    }

    fn to_text_span(&self, text: &str) -> RenderResult<TextSpan> {
        let (start, end) = self.offsets(text)?;
        if self.word.is_empty() {
            Ok(TextSpan::from_text(text, start, end, self.entity_group.as_str()))
        } else {
            Ok(TextSpan::new(start, end, self.entity_group.as_str(), self.word.as_str()))
        }
    }

    /// Convert into a [`Span`]; `text` supplies missing surface text.
    pub fn to_span(&self, text: &str) -> RenderResult<Span> {
        let constituents = match &self.original_entities {
            Some(constituents) if self.is_combined() => constituents,
            _ => return self.to_text_span(text).map(Span::Plain),
        };

        let malformed = |message: &str| RenderError::MalformedEntity {
            label: self.entity_group.clone(),
            message: message.to_string(),
        };

        if constituents.len() != 2 {
            return Err(malformed(&format!(
                "expected 2 original entities, found {}",
                constituents.len()
            )));
        }
        if constituents.iter().any(|c| c.original_entities.is_some()) {
            return Err(malformed("original entities cannot be nested"));
        }

        let mut parts = constituents
            .iter()
            .map(|record| record.to_text_span(text))
            .collect::<RenderResult<Vec<_>>>()?;
        parts.sort_by_key(|part| part.start);
        let second = parts.pop();
        let first = parts.pop();

        let (start, end) = self.offsets(text)?;
        match (first, second) {
            (Some(first), Some(second)) => Ok(Span::Combined(
                CombinedSpan::new(self.entity_group.as_str(), first, second).with_range(start, end),
            )),
            _ => Err(malformed("expected 2 original entities")),
        }
    }
}

/// A full service response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NerResponse {
    pub text: String,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

impl NerResponse {
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn spans(&self) -> RenderResult<Vec<Span>> {
        self.entities
            .iter()
            .map(|record| record.to_span(&self.text))
            .collect()
    }

    pub fn render<R: ColorResolver + ?Sized>(&self, colors: &R) -> RenderResult<Annotated> {
        let spans = self.spans()?;
        render(&self.text, &spans, colors)
    }
}
