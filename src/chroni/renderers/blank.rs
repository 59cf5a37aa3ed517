//! Blank-row fill: the active region reads back as solid border color.

use crate::chroni::geometry::SCREEN_XRES;

pub fn render(border_color: u8, out: &mut [u8; SCREEN_XRES]) {
    out.fill(border_color);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_entire_row_with_border_color() {
        let mut out = [0u8; SCREEN_XRES];
        render(0x7, &mut out);
        assert!(out.iter().all(|&b| b == 0x7));
    }
}
