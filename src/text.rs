//! Fitting person labels into boxes and sectors.
//!
//! There is no font rasterizer here: widths come from a proportional
//! character-width table, which is close enough for sans-serif labels and
//! keeps layouts deterministic.

/// Proportional character widths for printable ASCII (0x20..=0x7e),
/// in hundredths of the average character width.
#[rustfmt::skip]
pub const CHAR_WIDTHS: [u8; 95] = [
    45,  55,  62, 115,  90, 132, 125,  40,
    55,  55,  71, 115,  45,  48,  45,  50,
    91,  91,  91,  91,  91,  91,  91,  91,
    91,  91,  50,  50, 120, 120, 120,  78,
   142, 102, 105, 110, 115, 105,  98, 105,
   125,  58,  58, 107,  95, 145, 125, 115,
    95, 115, 107,  95,  97, 118, 102, 150,
   100,  93, 100,  58,  50,  58, 119,  72,
    72,  86,  92,  80,  92,  85,  52,  92,
    92,  47,  47,  88,  48, 135,  92,  86,
    92,  92,  69,  75,  58,  92,  80, 121,
    81,  80,  76,  91,  49,  91, 118,
];

/// Average character width relative to the font size
pub const CHAR_ASPECT: f64 = 0.57;
/// Baseline-to-baseline distance relative to the font size
pub const LINE_HEIGHT: f64 = 1.2;
/// Font size decrease per search step
pub const FONT_STEP: f64 = 0.9;

/// Width of `text` in hundredths of an average character
pub fn text_length(text: &str) -> u32 {
    text.chars()
        .map(|c| {
            if (' '..='~').contains(&c) {
                CHAR_WIDTHS[(c as usize) - 0x20] as u32
            } else {
                100
            }
        })
        .sum()
}

/// Width of `text` at `font_size`, in the same units as the font size
pub fn text_width(text: &str, font_size: f64) -> f64 {
    text_length(text) as f64 * 0.01 * CHAR_ASPECT * font_size
}

/// Label lines and the font size they fit at
#[derive(Debug, Clone, PartialEq)]
pub struct FittedText {
    pub font_size: f64,
    pub lines: Vec<String>,
}

impl FittedText {
    pub fn height(&self) -> f64 {
        self.lines.len() as f64 * self.font_size * LINE_HEIGHT
    }
}

/// Font size bounds for a fit search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontRange {
    pub max: f64,
    pub min: f64,
}

impl Default for FontRange {
    fn default() -> Self {
        Self { max: 0.4, min: 0.05 }
    }
}

/// Greedy word wrap of one paragraph; `None` when a single word is too wide
pub fn wrap(paragraph: &str, width: f64, font_size: f64) -> Option<Vec<String>> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        if text_width(word, font_size) > width {
            return None;
        }
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{current} {word}");
        if text_width(&candidate, font_size) <= width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    Some(lines)
}

/// Largest font (searching down from `fonts.max`) at which every paragraph
/// wraps into `width` and the stacked lines fit into `height`.
pub fn fit_paragraphs(
    paragraphs: &[&str],
    width: f64,
    height: f64,
    fonts: FontRange,
) -> Option<FittedText> {
    if width <= 0.0 || height <= 0.0 || paragraphs.iter().all(|p| p.trim().is_empty()) {
        return None;
    }
    let mut size = fonts.max;
    while size >= fonts.min {
        let mut lines = Vec::new();
        let mut ok = true;
        for paragraph in paragraphs {
            match wrap(paragraph, width, size) {
                Some(wrapped) => lines.extend(wrapped),
                None => {
                    ok = false;
                    break;
                }
            }
        }
        if ok && lines.len() as f64 * size * LINE_HEIGHT <= height {
            return Some(FittedText {
                font_size: size,
                lines,
            });
        }
        size *= FONT_STEP;
    }
    None
}

/// First candidate label, in order of preference, that fits at all
pub fn fit_label(
    candidates: &[Vec<&str>],
    width: f64,
    height: f64,
    fonts: FontRange,
) -> Option<FittedText> {
    candidates
        .iter()
        .find_map(|paragraphs| fit_paragraphs(paragraphs, width, height, fonts))
}
