//! 3x5 bitmap font for the HUD text layer. Lowercase input is folded to
//! uppercase; characters outside the covered set render as spaces.

pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Glyph {
    rows: [u8; GLYPH_HEIGHT as usize],
}

const SPACE_GLYPH: Glyph = Glyph {
    rows: [0, 0, 0, 0, 0],
};

pub(crate) fn glyph_advance(scale: i32) -> i32 {
    (GLYPH_WIDTH + 1) * scale
}

pub(crate) fn text_width_px(text: &str, scale: i32) -> i32 {
    text.chars().count() as i32 * glyph_advance(scale)
}

pub(crate) fn draw_text(
    frame: &mut [u8],
    width: u32,
    height: u32,
    mut x: i32,
    y: i32,
    text: &str,
    color: [u8; 4],
    scale: i32,
) {
    for ch in text.chars() {
        let glyph = glyph_for(ch.to_ascii_uppercase());
        draw_glyph(frame, width, height, x, y, glyph, color, scale);
        x += glyph_advance(scale);
    }
}

fn draw_glyph(
    frame: &mut [u8],
    width: u32,
    height: u32,
    x: i32,
    y: i32,
    glyph: Glyph,
    color: [u8; 4],
    scale: i32,
) {
    if width == 0 || height == 0 || scale <= 0 {
        return;
    }

    let width_i32 = width as i32;
    let height_i32 = height as i32;

    for (row_index, row_bits) in glyph.rows.iter().enumerate() {
        let glyph_y = y + row_index as i32 * scale;

        for col in 0..GLYPH_WIDTH {
            if (row_bits & (1 << (GLYPH_WIDTH - 1 - col))) == 0 {
                continue;
            }

            let glyph_x = x + col * scale;
            for sy in 0..scale {
                let pixel_y = glyph_y + sy;
                if pixel_y < 0 || pixel_y >= height_i32 {
                    continue;
                }
                for sx in 0..scale {
                    let pixel_x = glyph_x + sx;
                    if pixel_x < 0 || pixel_x >= width_i32 {
                        continue;
                    }
                    write_pixel_rgba(
                        frame,
                        width as usize,
                        pixel_x as usize,
                        pixel_y as usize,
                        color,
                    );
                }
            }
        }
    }
}

fn write_pixel_rgba(frame: &mut [u8], width: usize, x: usize, y: usize, color: [u8; 4]) {
    let Some(pixel_offset) = y.checked_mul(width).and_then(|row| row.checked_add(x)) else {
        return;
    };
    let Some(byte_offset) = pixel_offset.checked_mul(4) else {
        return;
    };
    let Some(end) = byte_offset.checked_add(4) else {
        return;
    };
    if end > frame.len() {
        return;
    }

    frame[byte_offset..end].copy_from_slice(&color);
}

fn glyph_for(ch: char) -> Glyph {
    match ch {
        ' ' => SPACE_GLYPH,
        '!' => Glyph {
            rows: [0b010, 0b010, 0b010, 0b000, 0b010],
        },
        '-' => Glyph {
            rows: [0b000, 0b000, 0b111, 0b000, 0b000],
        },
        '.' => Glyph {
            rows: [0b000, 0b000, 0b000, 0b000, 0b010],
        },
        ':' => Glyph {
            rows: [0b000, 0b010, 0b000, 0b010, 0b000],
        },
        '0' => Glyph {
            rows: [0b111, 0b101, 0b101, 0b101, 0b111],
        },
        '1' => Glyph {
            rows: [0b010, 0b110, 0b010, 0b010, 0b111],
        },
        '2' => Glyph {
            rows: [0b111, 0b001, 0b111, 0b100, 0b111],
        },
        '3' => Glyph {
            rows: [0b111, 0b001, 0b111, 0b001, 0b111],
        },
        '4' => Glyph {
            rows: [0b101, 0b101, 0b111, 0b001, 0b001],
        },
        '5' => Glyph {
            rows: [0b111, 0b100, 0b111, 0b001, 0b111],
        },
        '6' => Glyph {
            rows: [0b111, 0b100, 0b111, 0b101, 0b111],
        },
        '7' => Glyph {
            rows: [0b111, 0b001, 0b010, 0b010, 0b010],
        },
        '8' => Glyph {
            rows: [0b111, 0b101, 0b111, 0b101, 0b111],
        },
        '9' => Glyph {
            rows: [0b111, 0b101, 0b111, 0b001, 0b111],
        },
        'A' => Glyph {
            rows: [0b010, 0b101, 0b111, 0b101, 0b101],
        },
        'B' => Glyph {
            rows: [0b110, 0b101, 0b110, 0b101, 0b110],
        },
        'C' => Glyph {
            rows: [0b111, 0b100, 0b100, 0b100, 0b111],
        },
        'D' => Glyph {
            rows: [0b110, 0b101, 0b101, 0b101, 0b110],
        },
        'E' => Glyph {
            rows: [0b111, 0b100, 0b110, 0b100, 0b111],
        },
        'F' => Glyph {
            rows: [0b111, 0b100, 0b110, 0b100, 0b100],
        },
        'G' => Glyph {
            rows: [0b111, 0b100, 0b101, 0b101, 0b111],
        },
        'H' => Glyph {
            rows: [0b101, 0b101, 0b111, 0b101, 0b101],
        },
        'I' => Glyph {
            rows: [0b111, 0b010, 0b010, 0b010, 0b111],
        },
        'J' => Glyph {
            rows: [0b111, 0b001, 0b001, 0b101, 0b111],
        },
        'K' => Glyph {
            rows: [0b101, 0b101, 0b110, 0b101, 0b101],
        },
        'L' => Glyph {
            rows: [0b100, 0b100, 0b100, 0b100, 0b111],
        },
        'M' => Glyph {
            rows: [0b101, 0b111, 0b111, 0b101, 0b101],
        },
        'N' => Glyph {
            rows: [0b101, 0b111, 0b111, 0b111, 0b101],
        },
        'O' => Glyph {
            rows: [0b111, 0b101, 0b101, 0b101, 0b111],
        },
        'P' => Glyph {
            rows: [0b110, 0b101, 0b110, 0b100, 0b100],
        },
        'Q' => Glyph {
            rows: [0b111, 0b101, 0b101, 0b111, 0b001],
        },
        'R' => Glyph {
            rows: [0b110, 0b101, 0b110, 0b101, 0b101],
        },
        'S' => Glyph {
            rows: [0b111, 0b100, 0b111, 0b001, 0b111],
        },
        'T' => Glyph {
            rows: [0b111, 0b010, 0b010, 0b010, 0b010],
        },
        'U' => Glyph {
            rows: [0b101, 0b101, 0b101, 0b101, 0b111],
        },
        'V' => Glyph {
            rows: [0b101, 0b101, 0b101, 0b101, 0b010],
        },
        'W' => Glyph {
            rows: [0b101, 0b101, 0b111, 0b111, 0b101],
        },
        'X' => Glyph {
            rows: [0b101, 0b101, 0b010, 0b101, 0b101],
        },
        'Y' => Glyph {
            rows: [0b101, 0b101, 0b010, 0b010, 0b010],
        },
        'Z' => Glyph {
            rows: [0b111, 0b001, 0b010, 0b100, 0b111],
        },
        _ => SPACE_GLYPH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_width_accounts_for_advance() {
        assert_eq!(text_width_px("SCORE", 2), 5 * (GLYPH_WIDTH + 1) * 2);
    }

    #[test]
    fn draw_text_writes_inside_bounds_only() {
        let width = 16u32;
        let height = 16u32;
        let mut frame = vec![0u8; (width * height * 4) as usize];

        draw_text(
            &mut frame,
            width,
            height,
            -2,
            -2,
            "8",
            [255, 255, 255, 255],
            4,
        );
        assert!(frame.iter().any(|byte| *byte != 0));
    }

    #[test]
    fn unknown_characters_render_as_spaces() {
        let width = 8u32;
        let height = 8u32;
        let mut frame = vec![0u8; (width * height * 4) as usize];

        draw_text(&mut frame, width, height, 0, 0, "~", [255, 0, 0, 255], 1);
        assert!(frame.iter().all(|byte| *byte == 0));
    }
}
