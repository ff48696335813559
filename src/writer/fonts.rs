//! Base-14 font metrics and text encoding.
//!
//! The quote templates only use the Helvetica family, so metrics are
//! limited to Helvetica, Helvetica-Bold and Helvetica-Oblique. Widths are
//! the standard PostScript AFM values in 1/1000 em, which is enough for
//! the right-aligned and centered cells the renderer lays out.
//!
//! Text is shown with WinAnsiEncoding: French accented letters map onto
//! their Latin-1 code points and the euro sign onto 0x80.

/// A Base-14 font usable in the quote templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    /// Helvetica regular
    Helvetica,
    /// Helvetica bold
    HelveticaBold,
    /// Helvetica oblique (used for the watermark line)
    HelveticaOblique,
}

impl Font {
    /// All fonts registered in every produced document.
    pub const ALL: [Font; 3] = [Font::Helvetica, Font::HelveticaBold, Font::HelveticaOblique];

    /// PostScript base font name.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// Resource dictionary key (base name without the hyphen).
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "HelveticaBold",
            Font::HelveticaOblique => "HelveticaOblique",
        }
    }

    /// Width of a string in points at the given size.
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: f32 = text.chars().map(|c| self.char_width(c)).sum();
        units * size / 1000.0
    }

    /// Width of a single character in 1/1000 em.
    ///
    /// Accented characters share the width of their base letter.
    pub fn char_width(self, ch: char) -> f32 {
        let ch = fold_accent(ch);
        match self {
            // Bold shares most widths with regular; lowercase differs
            Font::HelveticaBold => bold_width(ch),
            _ => regular_width(ch),
        }
    }
}

/// Map French accented characters to their unaccented base for width lookup.
fn fold_accent(ch: char) -> char {
    match ch {
        'à' | 'â' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'î' | 'ï' => 'i',
        'ô' | 'ö' => 'o',
        'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'À' | 'Â' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Î' | 'Ï' => 'I',
        'Ô' | 'Ö' => 'O',
        'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        _ => ch,
    }
}

fn regular_width(ch: char) -> f32 {
    match ch {
        ' ' | '.' | ',' | ':' | ';' | '/' | '\\' => 278.0,
        '!' | '-' | '(' | ')' | '[' | ']' | '{' | '}' | '`' => 333.0,
        '\'' => 222.0,
        '"' => 355.0,
        '*' => 389.0,
        '?' => 500.0,
        '@' => 1015.0,
        '#' | '$' | '_' | '€' => 556.0,
        '%' => 889.0,
        '&' => 667.0,
        '+' | '=' | '<' | '>' | '~' => 584.0,
        '|' => 260.0,
        '^' => 469.0,
        '0'..='9' => 556.0,
        'A' | 'B' | 'C' | 'D' | 'H' | 'K' | 'N' | 'R' | 'U' => 722.0,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        'F' | 'L' | 'T' | 'Z' => 611.0,
        'G' | 'O' | 'Q' => 778.0,
        'I' => 278.0,
        'J' => 556.0,
        'M' => 833.0,
        'W' => 944.0,
        'a' | 'b' | 'd' | 'e' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' => 556.0,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' => 500.0,
        'f' | 't' => 278.0,
        'i' | 'j' | 'l' => 222.0,
        'm' => 833.0,
        'r' => 333.0,
        'w' => 722.0,
        '°' => 400.0,
        _ => 500.0,
    }
}

fn bold_width(ch: char) -> f32 {
    match ch {
        ' ' | '.' | ',' | '/' | '\\' => 278.0,
        ':' | ';' | '!' | '-' | '(' | ')' | '[' | ']' | '{' | '}' | '`' => 333.0,
        '\'' => 278.0,
        '"' => 474.0,
        '*' => 389.0,
        '?' => 611.0,
        '@' => 975.0,
        '#' | '$' | '_' | '€' => 556.0,
        '%' => 889.0,
        '&' => 722.0,
        '+' | '=' | '<' | '>' | '~' => 584.0,
        '|' => 280.0,
        '^' => 581.0,
        '0'..='9' => 556.0,
        'A' | 'B' | 'C' | 'D' | 'H' | 'K' | 'N' | 'R' | 'U' => 722.0,
        'E' | 'P' | 'S' | 'V' | 'X' | 'Y' => 667.0,
        'F' | 'L' | 'T' | 'Z' => 611.0,
        'G' | 'O' | 'Q' => 778.0,
        'I' => 278.0,
        'J' => 556.0,
        'M' => 833.0,
        'W' => 944.0,
        'a' | 'e' | 'c' | 's' | 'v' | 'x' | 'y' => 556.0,
        'b' | 'd' | 'g' | 'h' | 'n' | 'o' | 'p' | 'q' | 'u' | 'k' => 611.0,
        'f' | 't' | 'i' | 'j' | 'l' => 278.0,
        'm' => 889.0,
        'r' => 389.0,
        'w' => 778.0,
        'z' => 500.0,
        '°' => 400.0,
        _ => 556.0,
    }
}

/// Encode a character to its WinAnsiEncoding byte.
///
/// Latin-1 code points map through unchanged; the few WinAnsi additions the
/// renderer can meet (euro, oe ligatures, typographic quotes/dashes) get
/// their CP-1252 slots; anything else degrades to '?'.
pub fn win_ansi_byte(ch: char) -> u8 {
    let cp = ch as u32;
    match ch {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        'œ' => 0x9C,
        'Œ' => 0x8C,
        _ if cp <= 0xFF => cp as u8,
        _ => b'?',
    }
}
