//! Sparkline rendering.
//!
//! A window of optional samples becomes a fixed-width string: one character
//! per sample, absent samples as spaces. Present values are scaled onto the
//! style's character ramp between the window's own minimum and maximum; a
//! flat window (min == max) renders the ramp midpoint.

use crate::types::{GraphStyle, Sample};

const BAR: &[char] = &['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const LINEAR: &[char] = &['⎽', '⎼', '─', '⎻', '⎺'];
const VERTICAL: &[char] = &['▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];
const ASCII_ART: &[char] = &['.', ',', '-', '~', '+', '*', '#'];
const PIE: &[char] = &['○', '◔', '◑', '◕', '●'];
const FACES: &[char] = &['☹', '⊡', '☺'];
const JAGGED: &[char] = &['v', '-', '^'];

fn ramp(style: GraphStyle) -> &'static [char] {
    match style {
        GraphStyle::Bar => BAR,
        GraphStyle::Linear => LINEAR,
        GraphStyle::Vertical => VERTICAL,
        GraphStyle::AsciiArt => ASCII_ART,
        GraphStyle::Pie => PIE,
        GraphStyle::Faces => FACES,
        GraphStyle::Jagged => JAGGED,
    }
}

/// Renders `samples` (oldest first) as a sparkline in the given style.
///
/// The output always has exactly one character per input sample.
pub fn sparkline(samples: &[Sample], style: GraphStyle) -> String {
    let chars = ramp(style);
    let present: Vec<i64> = samples.iter().flatten().copied().collect();
    let (min, max) = match (present.iter().min(), present.iter().max()) {
        (Some(&min), Some(&max)) => (min, max),
        // Nothing to scale against: the whole line is gaps.
        _ => return " ".repeat(samples.len()),
    };
    let span = (max - min) as f64;

    samples
        .iter()
        .map(|sample| match sample {
            None => ' ',
            Some(value) => {
                let index = if span == 0.0 {
                    chars.len() / 2
                } else {
                    ((*value - min) as f64 / span * (chars.len() - 1) as f64).round() as usize
                };
                chars[index.min(chars.len() - 1)]
            }
        })
        .collect()
}
