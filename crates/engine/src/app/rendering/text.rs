//! 3x5 bitmap font covering printable ASCII. Each glyph packs five 3-bit rows,
//! top row in the high bits.

pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;
pub(crate) const TEXT_SCALE: i32 = 2;
pub(crate) const GLYPH_ADVANCE: i32 = (GLYPH_WIDTH + 1) * TEXT_SCALE;
pub(crate) const LINE_ADVANCE: i32 = (GLYPH_HEIGHT + 2) * TEXT_SCALE;

const FIRST_GLYPH: u32 = ' ' as u32;

const GLYPHS: [u16; 95] = [
    0x0000, 0x2482, 0x5a00, 0x5f7d, 0x7ddf, 0x52a5, 0x2aab, 0x2400,
    0x1491, 0x4494, 0x0aa8, 0x05d0, 0x0014, 0x01c0, 0x0002, 0x12a4,
    0x7b6f, 0x2c97, 0x73e7, 0x73cf, 0x5bc9, 0x79cf, 0x79ef, 0x7292,
    0x7bef, 0x7bcf, 0x0410, 0x0414, 0x1511, 0x0e38, 0x4454, 0x72c2,
    0x7be7, 0x2bed, 0x6bae, 0x7927, 0x6b6e, 0x79a7, 0x79a4, 0x796f,
    0x5bed, 0x7497, 0x726f, 0x5bad, 0x4927, 0x5fed, 0x5ffd, 0x7b6f,
    0x6ba4, 0x7b79, 0x6bad, 0x79cf, 0x7492, 0x5b6f, 0x5b6a, 0x5bfd,
    0x5aad, 0x5a92, 0x72a7, 0x6926, 0x4889, 0x324b, 0x2a00, 0x0007,
    0x4400, 0x0e7f, 0x49ae, 0x0f27, 0x13ef, 0x0fa7, 0x39a4, 0x0f79,
    0x49ad, 0x2092, 0x106a, 0x4bad, 0x4927, 0x0ded, 0x0d6d, 0x0f6f,
    0x0d74, 0x0f79, 0x0d64, 0x0f8f, 0x2e93, 0x0b6f, 0x0b6a, 0x0b7a,
    0x0a95, 0x0b79, 0x0e57, 0x3593, 0x2492, 0x64d6, 0x0780,
];

pub(crate) fn glyph_for(ch: char) -> Option<u16> {
    let index = (ch as u32).checked_sub(FIRST_GLYPH)?;
    GLYPHS.get(index as usize).copied()
}

/// Calls `plot` for every lit cell of `text` laid out from `(x, y)`, already scaled.
pub(crate) fn for_each_text_pixel(
    x: i32,
    y: i32,
    text: &str,
    mut plot: impl FnMut(i32, i32),
) {
    let mut cursor_x = x;
    for ch in text.chars() {
        let bits = glyph_for(ch).unwrap_or(0);
        for row in 0..GLYPH_HEIGHT {
            let row_bits = (bits >> ((GLYPH_HEIGHT - 1 - row) * GLYPH_WIDTH)) & 0b111;
            for col in 0..GLYPH_WIDTH {
                if row_bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let origin_x = cursor_x + col * TEXT_SCALE;
                let origin_y = y + row * TEXT_SCALE;
                for sy in 0..TEXT_SCALE {
                    for sx in 0..TEXT_SCALE {
                        plot(origin_x + sx, origin_y + sy);
                    }
                }
            }
        }
        cursor_x += GLYPH_ADVANCE;
    }
}

pub(crate) fn text_width(text: &str) -> i32 {
    let chars = text.chars().count() as i32;
    if chars == 0 {
        0
    } else {
        chars * GLYPH_ADVANCE - TEXT_SCALE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn glyph_lookup_covers_ascii_printable_range() {
        for code in 32u8..=126u8 {
            let ch = char::from(code);
            assert!(glyph_for(ch).is_some(), "missing glyph for '{ch}'");
        }
        assert!(glyph_for('\u{7f}').is_none());
        assert!(glyph_for('é').is_none());
    }

    #[test]
    fn space_lights_no_pixels() {
        let mut lit = 0;
        for_each_text_pixel(0, 0, "   ", |_, _| lit += 1);
        assert_eq!(lit, 0);
    }

    #[test]
    fn dash_is_one_scaled_row() {
        let mut cells = Vec::new();
        for_each_text_pixel(0, 0, "-", |x, y| cells.push((x, y)));
        assert_eq!(cells.len(), (3 * TEXT_SCALE * TEXT_SCALE) as usize);
        assert!(cells.iter().all(|(_, y)| *y >= 2 * TEXT_SCALE && *y < 3 * TEXT_SCALE));
    }

    #[test]
    fn width_counts_advance_without_trailing_gap() {
        assert_eq!(text_width(""), 0);
        assert_eq!(text_width("ab"), 2 * GLYPH_ADVANCE - TEXT_SCALE);
    }
}
