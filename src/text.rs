use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

pub fn display_width(s: &str) -> usize {
    s.width()
}

// Returns `s` as a cell of exactly `target` display columns: padded with
// spaces when it fits, otherwise truncated on a codepoint boundary with
// `...` appended. Wide glyphs count two columns, so the truncated content
// can land short of the target; padding makes up the difference.
pub fn fit(s: &str, target: usize) -> String {
    let width = s.width();
    if width <= target {
        let mut cell = String::with_capacity(s.len() + (target - width));
        cell.push_str(s);
        pad_to(&mut cell, width, target);
        return cell;
    }

    let mut cell = String::new();
    let mut taken = 0usize;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if taken + w + ELLIPSIS_WIDTH > target {
            break;
        }
        taken += w;
        cell.push(ch);
    }
    cell.push_str(ELLIPSIS);
    pad_to(&mut cell, taken + ELLIPSIS_WIDTH, target);
    cell
}

fn pad_to(cell: &mut String, width: usize, target: usize) {
    for _ in width..target {
        cell.push(' ');
    }
}
