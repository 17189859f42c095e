//! Numeric-to-glyph formatting for scale labels.
//!
//! A label is produced in two steps: the value is rendered to text with the
//! C-style `%g` rules ([`general_format`]), then the text is scanned into a
//! fixed window of glyph indices ([`value_to_glyphs`]). The scan is
//! best-effort: a character outside the glyph alphabet is recorded as a soft
//! [`LabelIssue`] and scanning continues, so a glyph sequence is always
//! produced.

use tracing::trace;

use crate::viewer::fonts;

/// Number of glyph positions scanned for one label.
///
/// Note the window is 13 positions while the glyph alphabet reserves separate
/// space and terminator codes; text that fills the whole window leaves no
/// position for the terminator and is reported as [`LabelIssue::TooLong`].
pub const LABEL_GLYPHS: usize = 13;

/// Soft diagnostics recorded while scanning label text.
///
/// These never abort the scan; the glyph sequence is always produced and the
/// caller decides whether to surface the issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelIssue {
    /// A character with no glyph was seen before the end of the text.
    UnknownCharacter(char),
    /// The text did not terminate within the scan window.
    TooLong,
}

/// A formatted scale label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueLabel {
    /// Glyph indices into [`fonts::FONT`], one per label position.
    pub glyphs: [u8; LABEL_GLYPHS],
    /// The first soft issue hit during the scan, if any.
    pub issue: Option<LabelIssue>,
}

/// Render a value with the C `printf("%g")` rules.
///
/// Six significant digits, trailing zeros stripped; scientific notation with
/// an explicit sign and two-digit exponent when the decimal exponent is below
/// -4 or at least 6. This matches the text the glyph scanner was written for,
/// where the standard library `Display` formatting does not.
pub fn general_format(value: f64) -> String {
    const PRECISION: usize = 6;

    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Decimal exponent of the value after rounding to 6 significant digits.
    let scientific = format!("{:.*e}", PRECISION - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent),
        None => (scientific.as_str(), "0"),
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent >= -4 && exponent < PRECISION as i32 {
        let decimals = (PRECISION as i32 - 1 - exponent).max(0) as usize;
        trim_trailing_zeros(&format!("{value:.decimals$}"))
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        let mantissa = trim_trailing_zeros(mantissa);
        format!("{mantissa}e{sign}{:02}", exponent.abs())
    }
}

fn trim_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}

/// Format `value` and scan it into glyph indices.
pub fn value_to_glyphs(value: f64) -> ValueLabel {
    let text = general_format(value);
    let label = glyphs_from_text(&text);
    trace!(%text, issue = ?label.issue, "formatted scale label");
    label
}

/// Scan label text into glyph indices.
///
/// Each of the 13 window positions maps one character: digits to glyphs 0-9,
/// then point, exponent, plus, minus and space; positions past the end of the
/// text read as the terminator. A character outside this alphabet renders as
/// a space and records [`LabelIssue::UnknownCharacter`] unless the terminator
/// was already seen. Text that never terminates inside the window records
/// [`LabelIssue::TooLong`].
pub fn glyphs_from_text(text: &str) -> ValueLabel {
    let bytes = text.as_bytes();
    let mut glyphs = [fonts::GLYPH_END; LABEL_GLYPHS];
    let mut issue = None;
    let mut terminated = false;

    for (position, slot) in glyphs.iter_mut().enumerate() {
        let byte = bytes.get(position).copied().unwrap_or(0);
        *slot = match byte {
            b'0'..=b'9' => byte - b'0',
            b'.' => fonts::GLYPH_POINT,
            b'e' => fonts::GLYPH_EXPONENT,
            b'+' => fonts::GLYPH_PLUS,
            b'-' => fonts::GLYPH_MINUS,
            b' ' => fonts::GLYPH_SPACE,
            0 => {
                terminated = true;
                fonts::GLYPH_END
            }
            other => {
                if !terminated && issue.is_none() {
                    issue = Some(LabelIssue::UnknownCharacter(other as char));
                }
                fonts::GLYPH_SPACE
            }
        };
    }

    if !terminated {
        issue = Some(LabelIssue::TooLong);
    }

    ValueLabel { glyphs, issue }
}
