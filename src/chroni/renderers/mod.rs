/*!
Per-mode scan renderers (spec §4.4 "Scan renderers", Design Note "Per-mode
renderers as a dispatch table").

Every renderer fills exactly `SCREEN_XRES` active-region color indices
(8-bit values that still need resolving through SUBPALS/PALETTE — that
happens once, uniformly, in the rasterizer's pixel-emission loop) given a
`RenderInputs` snapshot taken by the caller before the row starts. None of
the renderers touch the framebuffer, sprite state, or the CPU clock
directly, mirroring how the teacher keeps `Ppu::render_background_tile`
and friends as pure lookups the tick loop composites afterward.
*/

mod bitmap;
mod blank;
mod text;
mod tile;

use crate::chroni::display_list::{
    MODE_BITMAP_1BPP, MODE_BITMAP_2BPP, MODE_BITMAP_2BPP_WIDE_A, MODE_BITMAP_2BPP_WIDE_B,
    MODE_BITMAP_4BPP, MODE_BITMAP_4BPP_WIDE_A, MODE_BITMAP_4BPP_WIDE_B, MODE_TEXT,
    MODE_TEXT_DOUBLE, MODE_TEXT_DOUBLE_TALL, MODE_TILE_2BPP_WIDE, MODE_TILE_4BPP,
    MODE_TILE_4BPP_WIDE,
};
use crate::chroni::geometry::SCREEN_XRES;
use crate::chroni::vram::Vram;

/// Snapshot of everything a renderer needs to produce one scanline's worth
/// of active-region color indices. Built fresh by the rasterizer for every
/// scanline from the current DL row's pointers and the live scroll
/// registers.
pub struct RenderInputs<'a> {
    pub vram: &'a Vram,
    pub lms: u32,
    pub attribs: u32,
    pub charset: u32,
    pub subpals: u32,
    pub tileset_small: u32,
    pub tileset_big: u32,
    pub hscroll: u8,
    pub vscroll: u8,
    pub hscroll_enable: bool,
    pub vscroll_enable: bool,
    pub pitch: u8,
    pub border_color: u8,
}

/// Render one scanline of `mode` at row-relative `line`, filling `out`
/// with `SCREEN_XRES` active-region color indices. Modes with no listed
/// renderer (1, 0xF, and any other unlisted nibble) fall back to border
/// only, per spec §4.5 "unknown DL opcodes ... mode values not listed
/// produce no pixels (border only)".
pub fn render_scan(mode: u8, inputs: &RenderInputs, line: u8, out: &mut [u8; SCREEN_XRES]) {
    match mode {
        MODE_TEXT => text::render_mode2(inputs, line, out),
        MODE_TEXT_DOUBLE => text::render_mode3(inputs, line, out),
        MODE_TEXT_DOUBLE_TALL => text::render_mode3(inputs, line / 2, out),
        MODE_BITMAP_2BPP_WIDE_A | MODE_BITMAP_2BPP_WIDE_B => bitmap::render(inputs, 2, true, out),
        MODE_BITMAP_4BPP_WIDE_A | MODE_BITMAP_4BPP_WIDE_B => bitmap::render(inputs, 4, true, out),
        MODE_BITMAP_1BPP => bitmap::render(inputs, 1, false, out),
        MODE_BITMAP_2BPP => bitmap::render(inputs, 2, false, out),
        MODE_BITMAP_4BPP => bitmap::render(inputs, 4, false, out),
        MODE_TILE_2BPP_WIDE => tile::render_mode_c(inputs, line, out),
        MODE_TILE_4BPP_WIDE => tile::render_mode_d(inputs, line, out),
        MODE_TILE_4BPP => tile::render_mode_e(inputs, line, out),
        _ => blank::render(inputs.border_color, out),
    }
}

/// Render a blank row: the whole active region is border color (spec's
/// Scenario B renders a whole blank-mode scanline as solid border color).
pub fn render_blank(border_color: u8, out: &mut [u8; SCREEN_XRES]) {
    blank::render(border_color, out);
}
