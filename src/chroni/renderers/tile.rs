//! Tile renderers (modes C, D, E): cell data looked up through LMS/ATTRIBS
//! as (tile, palette) pairs, pixels fetched from a tileset bank and
//! expanded through SUBPALS with an explicit `palette*stride` offset —
//! the style the Design Note contrasts with the bitmap renderers' raw
//! `palette_data & 0xF0` offset.

use super::RenderInputs;
use crate::chroni::geometry::SCREEN_XRES;

/// Mode C: 2bpp tile, 8x8 cell, every pixel doubled to cover 8 output
/// columns per cell. The whole cell row is a single byte.
pub fn render_mode_c(inputs: &RenderInputs, line: u8, out: &mut [u8; SCREEN_XRES]) {
    let line_offset = (line & 7) as u32;
    let mut tile_offset: u32 = 0;
    let mut palette = 0u8;
    let mut row_byte = 0u8;

    for (col, slot) in out.iter_mut().enumerate() {
        let i = col % 8;
        if i == 0 {
            palette = inputs.vram.read(inputs.attribs + tile_offset);
            let tile = inputs.vram.read(inputs.lms + tile_offset);
            row_byte = inputs
                .vram
                .read(inputs.tileset_small + tile as u32 * 8 + line_offset);
            tile_offset += 1;
        }
        let src_pixel = i / 2;
        let shift = 6 - (src_pixel as u32 * 2);
        let pixel = (row_byte >> shift) & 0b11;
        *slot = inputs.vram.read(inputs.subpals + palette as u32 * 4 + pixel as u32);
    }
}

/// Mode D: 4bpp tile, 32px wide, each pixel doubled; tile data is 128
/// bytes (16 lines * 8 bytes/line).
pub fn render_mode_d(inputs: &RenderInputs, line: u8, out: &mut [u8; SCREEN_XRES]) {
    render_wide_tile(inputs, line, 32, 128, 8, out);
}

/// Mode E: 4bpp tile, 16px wide, each pixel covers 2 output columns; tile
/// data is 64 bytes (16 lines * 4 bytes/line).
pub fn render_mode_e(inputs: &RenderInputs, line: u8, out: &mut [u8; SCREEN_XRES]) {
    render_wide_tile(inputs, line, 16, 64, 4, out);
}

/// Shared shape of modes D and E: every `cell_width` output columns, load
/// a (palette, tile) pair; every 4 output columns within the cell, advance
/// one byte of packed 4bpp tile data; each source pixel covers 2 output
/// columns.
fn render_wide_tile(
    inputs: &RenderInputs,
    line: u8,
    cell_width: usize,
    tile_stride: u32,
    bytes_per_line: u32,
    out: &mut [u8; SCREEN_XRES],
) {
    let mut tile_offset: u32 = 0;
    let mut palette = 0u8;
    let mut tile = 0u8;
    let mut tile_data = 0u8;

    for (col, slot) in out.iter_mut().enumerate() {
        let i = col % cell_width;
        if i == 0 {
            palette = inputs.vram.read(inputs.attribs + tile_offset);
            tile = inputs.vram.read(inputs.lms + tile_offset);
            tile_offset += 1;
        }
        if i % 4 == 0 {
            let byte_index = (i / 4) as u32;
            tile_data = inputs.vram.read(
                inputs.tileset_big + tile as u32 * tile_stride + line as u32 * bytes_per_line + byte_index,
            );
        }
        let pixel = if (i % 4) / 2 == 0 {
            tile_data >> 4
        } else {
            tile_data & 0xF
        };
        *slot = inputs.vram.read(inputs.subpals + palette as u32 * 16 + pixel as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chroni::vram::Vram;

    fn base_inputs(vram: &Vram) -> RenderInputs<'_> {
        RenderInputs {
            vram,
            lms: 0x100,
            attribs: 0x200,
            charset: 0,
            subpals: 0x400,
            tileset_small: 0x500,
            tileset_big: 0x600,
            hscroll: 0,
            vscroll: 0,
            hscroll_enable: false,
            vscroll_enable: false,
            pitch: 40,
            border_color: 0,
        }
    }

    #[test]
    fn mode_c_doubles_each_2bit_pixel_across_two_columns() {
        let mut vram = Vram::new();
        vram.write(0x100, 5); // tile index 5
        vram.write(0x200, 2); // palette 2
        vram.write(0x500 + 5 * 8, 0b11_10_01_00); // pixels 3,2,1,0
        vram.write(0x400 + 2 * 4 + 3, 0xAA);
        vram.write(0x400 + 2 * 4 + 0, 0xBB);

        let inputs = base_inputs(&vram);
        let mut out = [0u8; SCREEN_XRES];
        render_mode_c(&inputs, 0, &mut out);
        assert_eq!(out[0], 0xAA);
        assert_eq!(out[1], 0xAA);
        assert_eq!(out[6], 0xBB);
        assert_eq!(out[7], 0xBB);
    }

    #[test]
    fn mode_d_advances_one_byte_every_four_output_columns() {
        let mut vram = Vram::new();
        vram.write(0x100, 1); // tile index 1
        vram.write(0x200, 0); // palette 0
        vram.write(0x600 + 1 * 128 + 0 * 8 + 0, 0xAB);
        vram.write(0x400 + 0xA, 0x77);
        vram.write(0x400 + 0xB, 0x88);

        let inputs = base_inputs(&vram);
        let mut out = [0u8; SCREEN_XRES];
        render_mode_d(&inputs, 0, &mut out);
        assert_eq!(out[0], 0x77);
        assert_eq!(out[1], 0x77);
        assert_eq!(out[2], 0x88);
        assert_eq!(out[3], 0x88);
    }

    #[test]
    fn mode_e_reuses_same_byte_layout_with_smaller_cell() {
        let mut vram = Vram::new();
        vram.write(0x100, 2); // tile index 2
        vram.write(0x200, 0);
        vram.write(0x600 + 2 * 64 + 0 * 4 + 0, 0xCD);
        vram.write(0x400 + 0xC, 0x11);
        vram.write(0x400 + 0xD, 0x22);

        let inputs = base_inputs(&vram);
        let mut out = [0u8; SCREEN_XRES];
        render_mode_e(&inputs, 0, &mut out);
        assert_eq!(out[0], 0x11);
        assert_eq!(out[1], 0x11);
        assert_eq!(out[2], 0x22);
        assert_eq!(out[3], 0x22);
    }
}
