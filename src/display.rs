use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::markup::{Annotated, Segment};

/// An underline to draw below the text, in display columns.
struct Underline<'a> {
    start_col: usize,
    end_col: usize,
    label: &'a str,
}

/// Terminal view of an [`Annotated`] text.
///
/// Marks are listed left to right; a combined mark shows its two
/// constituents before its own extent.
//
// 患者主诉头痛伴恶心
//         ╰──╯SIGN_SYMPTOM
//               ╰──╯SIGN_SYMPTOM
pub struct AnnotatedDisplay<'a> {
    annotated: &'a Annotated,
    show_constituents: bool,
}

impl<'a> AnnotatedDisplay<'a> {
    pub fn new(annotated: &'a Annotated) -> Self {
        AnnotatedDisplay {
            annotated,
            show_constituents: true,
        }
    }

    /// Only draw the outer extent of combined marks.
    pub fn without_constituents(mut self) -> Self {
        self.show_constituents = false;
        self
    }

    fn layout(&self) -> (String, Vec<Underline<'a>>) {
        let mut line = String::new();
        let mut underlines = Vec::new();
        let annotated: &'a Annotated = self.annotated;

        for segment in &annotated.segments {
            match segment {
                Segment::Text { text } => line.push_str(text),
                Segment::Entity(mark) => {
                    let start_col = line.width();
                    line.push_str(&mark.surface_text);
                    underlines.push(Underline {
                        start_col,
                        end_col: line.width(),
                        label: &mark.label,
                    });
                }
                Segment::Combined(mark) => {
                    let start_col = line.width();
                    line.push_str(&mark.leading);
                    let parts = [(&mark.first, &mark.between), (&mark.second, &mark.trailing)];
                    for &(constituent, gap) in parts.iter() {
                        let constituent_col = line.width();
                        line.push_str(&constituent.surface_text);
                        if self.show_constituents {
                            underlines.push(Underline {
                                start_col: constituent_col,
                                end_col: line.width(),
                                label: &constituent.label,
                            });
                        }
                        line.push_str(gap);
                    }
                    underlines.push(Underline {
                        start_col,
                        end_col: line.width(),
                        label: &mark.caption,
                    });
                }
            }
        }

        (line, underlines)
    }
}

impl<'a> fmt::Display for AnnotatedDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, underlines) = self.layout();
        f.write_str(&line)?;

        for underline in underlines {
            f.write_char('\n')?;
            for _ in 0..underline.start_col {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (underline.start_col + 1)..underline.end_col.saturating_sub(1) {
                f.write_char('─')?;
            }
            if underline.end_col - underline.start_col > 1 {
                f.write_char('╯')?;
            }

            f.write_str(underline.label)?;
        }

        Ok(())
    }
}

impl Annotated {
    pub fn display(&self) -> AnnotatedDisplay<'_> {
        AnnotatedDisplay::new(self)
    }
}
