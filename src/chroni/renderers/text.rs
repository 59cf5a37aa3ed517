//! Text+attrib renderers: mode 2 (scrollable, 8px cells) and mode 3/4
//! (doubled, no scroll; mode 4 is mode 3 with `line` halved by the caller).

use super::RenderInputs;
use crate::chroni::geometry::SCREEN_XRES;

/// Mode 2: font-row text with per-cell foreground/background attribute and
/// optional fine hscroll/vscroll (spec §4.4, Scenario F).
pub fn render_mode2(inputs: &RenderInputs, line: u8, out: &mut [u8; SCREEN_XRES]) {
    let pixel_offset_start: u16 = if inputs.hscroll_enable {
        inputs.hscroll as u16
    } else {
        0
    };
    let scan_offset: u16 = if inputs.vscroll_enable {
        inputs.vscroll as u16
    } else {
        0
    };
    let line_offset = ((line as u16 + scan_offset) & 7) as u32;
    let mut char_offset: u32 =
        (pixel_offset_start >> 3) as u32 + ((line as u16 + scan_offset) >> 3) as u32 * inputs.pitch as u32;
    let mut pixel_offset = pixel_offset_start;

    let mut fg = 0u8;
    let mut bg = 0u8;
    let mut row = 0u8;
    let mut bit = 0u8;

    for (col, slot) in out.iter_mut().enumerate() {
        if (pixel_offset & 7) == 0 || col == 0 {
            let attrib = inputs.vram.read(inputs.attribs + char_offset);
            fg = attrib >> 4;
            bg = attrib & 0xF;
            let c = inputs.vram.read(inputs.lms + char_offset);
            row = inputs.vram.read(inputs.charset + c as u32 * 8 + line_offset);
            bit = 0x80 >> (pixel_offset & 7);
            char_offset += 1;
        }
        let nibble = if row & bit != 0 { fg } else { bg };
        *slot = inputs.vram.read(inputs.subpals + nibble as u32);
        pixel_offset += 1;
        bit >>= 1;
    }
}

/// Mode 3 (and, with a halved `line`, mode 4): doubled-width text with no
/// scroll support, 16-pixel cells.
pub fn render_mode3(inputs: &RenderInputs, line: u8, out: &mut [u8; SCREEN_XRES]) {
    let line_offset = (line & 7) as u32;
    let mut char_offset: u32 = 0;

    let mut fg = 0u8;
    let mut bg = 0u8;
    let mut row = 0u8;

    for (col, slot) in out.iter_mut().enumerate() {
        let i = col % 16;
        if i == 0 {
            let attrib = inputs.vram.read(inputs.attribs + char_offset);
            fg = attrib >> 4;
            bg = attrib & 0xF;
            let c = inputs.vram.read(inputs.lms + char_offset);
            row = inputs.vram.read(inputs.charset + c as u32 * 8 + line_offset);
            char_offset += 1;
        }
        let bit = 0x80u8 >> (i / 2);
        let nibble = if row & bit != 0 { fg } else { bg };
        *slot = inputs.vram.read(inputs.subpals + nibble as u32);
    }
}
