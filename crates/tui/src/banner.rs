use std::collections::HashMap;

use once_cell::sync::Lazy;

const GLYPH_HEIGHT: usize = 5;
const SHADOW: char = '░';
const FILL: char = '█';

type Glyph = [&'static str; GLYPH_HEIGHT];

static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('A', [" ## ", "#  #", "####", "#  #", "#  #"]),
        ('E', ["####", "#   ", "### ", "#   ", "####"]),
        ('G', [" ###", "#   ", "# ##", "#  #", " ###"]),
        ('H', ["#  #", "#  #", "####", "#  #", "#  #"]),
        ('I', ["###", " # ", " # ", " # ", "###"]),
        ('M', ["#   #", "## ##", "# # #", "#   #", "#   #"]),
        ('N', ["#  #", "## #", "# ##", "#  #", "#  #"]),
        ('O', [" ## ", "#  #", "#  #", "#  #", " ## "]),
        ('R', ["### ", "#  #", "### ", "# # ", "#  #"]),
        ('S', [" ###", "#   ", " ## ", "   #", "### "]),
        ('T', ["#####", "  #  ", "  #  ", "  #  ", "  #  "]),
        ('U', ["#  #", "#  #", "#  #", "#  #", " ## "]),
        ('V', ["#   #", "#   #", "#   #", " # # ", "  #  "]),
        ('W', ["#   #", "#   #", "# # #", "## ##", "#   #"]),
        ('Y', ["#   #", " # # ", "  #  ", "  #  ", "  #  "]),
        ('!', ["#", "#", "#", " ", "#"]),
        (' ', ["  ", "  ", "  ", "  ", "  "]),
    ])
});

/// Render `text` as block letters with a drop shadow.
///
/// Characters without a glyph are skipped. Each pixel is two cells wide.
pub fn render(text: &str) -> Vec<String> {
    let glyphs: Vec<&Glyph> = text
        .chars()
        .filter_map(|ch| GLYPHS.get(&ch.to_ascii_uppercase()))
        .collect();
    if glyphs.is_empty() {
        return Vec::new();
    }

    let width: usize = glyphs.iter().map(|glyph| glyph_width(glyph) * 2 + 2).sum::<usize>() + 1;
    let mut canvas = vec![vec![' '; width]; GLYPH_HEIGHT + 1];

    let mut x = 0;
    for glyph in glyphs {
        for (row, pattern) in glyph.iter().enumerate() {
            for (col, pixel) in pattern.chars().enumerate() {
                if pixel == '#' {
                    paint(&mut canvas, row, x + col * 2);
                }
            }
        }
        x += glyph_width(glyph) * 2 + 2;
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>().trim_end().to_string())
        .collect()
}

fn glyph_width(glyph: &Glyph) -> usize {
    glyph.iter().map(|row| row.chars().count()).max().unwrap_or(0)
}

fn paint(canvas: &mut [Vec<char>], row: usize, col: usize) {
    for dx in 0..2 {
        set(canvas, row + 1, col + dx + 1, SHADOW);
        set(canvas, row, col + dx, FILL);
    }
}

fn set(canvas: &mut [Vec<char>], row: usize, col: usize, ch: char) {
    let Some(cell) = canvas.get_mut(row).and_then(|line| line.get_mut(col)) else {
        return;
    };
    if ch == FILL || *cell == ' ' {
        *cell = ch;
    }
}
