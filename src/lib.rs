//! Render labeled entity spans over text as inline highlighted markup.
//!
//! An annotation service hands back a text and a set of labeled character
//! spans. This crate turns that into a single marked-up value where every
//! span is wrapped with its label and a per-label color. "Combined" entities,
//! synthesized from two underlying spans, are rendered as one container with
//! each constituent still underlined and captioned.
//!
//! ## Usage
//!
//! ```
//! use entity_overlay::{render, Domain, Span, TextSpan};
//!
//! let text = "头痛伴恶心";
//! let spans: Vec<Span> = vec![
//!     TextSpan::from_text(text, 0, 2, "SIGN_SYMPTOM").into(),
//!     TextSpan::from_text(text, 3, 4, "SIGN_SYMPTOM").into(),
//! ];
//!
//! let annotated = render(text, &spans, Domain::Medical.color_table()).unwrap();
//! assert_eq!(annotated.plain_text(), text);
//! println!("{}", annotated.to_html());
//! ```
//!
//! ## Modules
//!
//! - [`span`] - Plain and combined span records
//! - [`wire`] - Service response records and their conversion to spans
//! - [`overlap`] - Dropping overlapping records before rendering
//! - [`color`] - Label to color lookup, built-in domain tables, TOML tables
//! - [`overlay`] - The renderer
//! - [`markup`] - The rendered node tree and its HTML form
//! - [`errors`] - Error types

pub mod color;
mod display;
pub mod errors;
pub mod markup;
pub mod overlap;
pub mod overlay;
pub mod span;
pub mod wire;

pub use color::{Color, ColorResolver, ColorTable, Domain, FALLBACK_COLOR};
pub use display::AnnotatedDisplay;
pub use errors::{ConfigError, InvalidSpanReason, RenderError, RenderResult};
pub use markup::{Annotated, CombinedMark, EntityMark, MarkRef, Segment};
pub use overlap::resolve_overlaps;
pub use overlay::{render, render_html};
pub use span::{CombinedSpan, Span, SpanRef, TextSpan, COMBINED_BIO_SYMPTOM};
pub use wire::{EntityRecord, NerResponse};

#[cfg(test)]
mod tests;
