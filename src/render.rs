//! Terminal rendering of annotated tokens.
//!
//! Rendering happens in two stages. [`segments`] is the pure transform
//! from annotations to display segments, independent of any terminal
//! concern and directly testable. [`Segment::ansi`] then paints a segment
//! with ANSI truecolor escapes via `colored`, which honours `NO_COLOR`
//! and the global color override on its own.

use colored::Colorize;

use crate::types::{Annotations, EntityLabel, Rgb};

/// One visual unit of rendered output.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// A token outside any entity, passed through as plain text.
    Plain(String),
    /// An entity token, shown on its label color with the tag attached.
    Badge {
        token: String,
        label: EntityLabel,
        color: Rgb,
    },
}

/// Map annotations to display segments, in input order.
///
/// Every token maps to exactly one segment: `O` tokens become
/// [`Segment::Plain`], everything else becomes a [`Segment::Badge`] with
/// the color the label taxonomy assigns. The input is not reordered,
/// merged, or filtered.
pub fn segments(annotations: &Annotations) -> Vec<Segment> {
    annotations
        .iter()
        .map(|entry| match entry.label.color() {
            None => Segment::Plain(entry.token.clone()),
            Some(color) => Segment::Badge {
                token: entry.token.clone(),
                label: entry.label.clone(),
                color,
            },
        })
        .collect()
}

impl Segment {
    /// Paint this segment for the terminal.
    ///
    /// Badges show the token white on the label color, followed by the
    /// tag in dark text on white, mirroring chip-style entity highlights.
    pub fn ansi(&self) -> String {
        match self {
            Segment::Plain(token) => token.clone(),
            Segment::Badge {
                token,
                label,
                color,
            } => {
                let Rgb(r, g, b) = *color;
                format!(
                    "{}{}",
                    format!(" {token} ").white().on_truecolor(r, g, b),
                    format!(" {} ", label.as_str())
                        .truecolor(31, 41, 55)
                        .on_white()
                        .bold(),
                )
            }
        }
    }
}

/// Render a full annotation sequence as one space-joined line.
pub fn render_line(annotations: &Annotations) -> String {
    segments(annotations)
        .iter()
        .map(Segment::ansi)
        .collect::<Vec<_>>()
        .join(" ")
}

/// A color swatch for one label, used by taxonomy listings.
pub fn swatch(label: &EntityLabel) -> String {
    match label.color() {
        Some(Rgb(r, g, b)) => format!(" {} ", label.as_str())
            .white()
            .bold()
            .on_truecolor(r, g, b)
            .to_string(),
        None => format!(" {} ", label.as_str()),
    }
}
