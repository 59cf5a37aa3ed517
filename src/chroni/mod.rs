/*!
The `Chroni` facade: owns VRAM, the register file, the rasterizer state,
and the precomputed RGB565 table, and exposes exactly the operations spec
§6 lists under "Exposed by the core". Submodules:

- [`vram`] — the 128 KiB byte store and its page window.
- [`registers`] — the memory-mapped register file.
- [`clock`] — `CpuDriver` and the cooperative `CpuClock` budgeter.
- [`display_list`] — DL opcode decoding and the per-mode dispatch tables.
- [`rasterizer`] — per-frame/per-scanline state (`ypos`, `scanline`,
  pending DLI, LMS/ATTRIBS/SUBPALS pointers, sprite discovery).
- [`renderers`] — the per-mode pixel pipelines.
- [`sprites`] — sprite scanline discovery and per-pixel overlay.
- [`palette`] — the RGB565→RGB888 expansion table.
- [`geometry`] — fixed screen-dimension constants.
- [`trace`] — the feature-gated `trace!` logging macro.
*/

pub mod clock;
pub mod display_list;
pub mod geometry;
pub mod palette;
pub mod rasterizer;
pub mod registers;
pub mod renderers;
pub mod sprites;
pub(crate) mod trace;
pub mod vram;

use clock::{CpuClock, CpuDriver};
use display_list::{Opcode, LINES_PER_MODE, MODE_BLANK};
use geometry::{SCREEN_PITCH, SCREEN_WIDTH, SCREEN_XBORDER, SCREEN_XRES};
use palette::Rgb565Table;
use rasterizer::Rasterizer;
use registers::{RegisterEffect, Registers};
use renderers::{render_blank, render_scan, RenderInputs};
use vram::Vram;

/// The video coprocessor core (spec §1, §2).
pub struct Chroni {
    vram: Vram,
    registers: Registers,
    raster: Rasterizer,
    palette_table: Rgb565Table,
    screen_height: u32,
    framebuffer: Vec<u8>,
    scan_callback: Option<Box<dyn FnMut(u32)>>,
}

impl Chroni {
    /// Build a new core for a given `screen_height` (the framebuffer's row
    /// count — everything else about screen geometry is fixed, see
    /// [`geometry`]).
    pub fn new(screen_height: u32) -> Self {
        let mut core = Self {
            vram: Vram::new(),
            registers: Registers::new(),
            raster: Rasterizer::new(),
            palette_table: Rgb565Table::new(),
            screen_height,
            framebuffer: vec![0u8; screen_height as usize * SCREEN_PITCH],
            scan_callback: None,
        };
        core.reset();
        core
    }

    /// `chroni_init()`: build the RGB565 table, call `reset()`. The table
    /// is built once in `new()`; this exists so the spec's named operation
    /// has a direct counterpart, and so re-initializing is cheap to spell
    /// out explicitly at an integration boundary.
    pub fn init(&mut self) {
        self.reset();
    }

    /// `chroni_reset()`: zero DL, charset, sprites, palette, tile banks,
    /// scroll, status, and rasterizer state. VRAM contents are untouched —
    /// nothing in the spec says a register reset clears video memory.
    pub fn reset(&mut self) {
        self.registers.reset();
        self.raster.reset();
    }

    /// Register an optional per-scanline hook, invoked once a scanline's
    /// CPU cycles have been fully accounted for.
    pub fn set_scan_callback<F>(&mut self, callback: F)
    where
        F: FnMut(u32) + 'static,
    {
        self.scan_callback = Some(Box::new(callback));
    }

    pub fn clear_scan_callback(&mut self) {
        self.scan_callback = None;
    }

    /// `chroni_register_write(index, value)` (spec §4.2). Returns the
    /// effect the caller (the bus, which owns the live `CpuDriver`) must
    /// act on — Chroni itself only has a `CpuClock` to drive while a frame
    /// is in flight, so HALT crossing into an active clock is the
    /// integration's responsibility, exactly as `CpuDriver::set_halt`
    /// exists for.
    pub fn register_write(&mut self, index: u8, value: u8) -> RegisterEffect {
        self.registers.write(index, value)
    }

    /// `chroni_register_read(index)` (spec §4.2).
    pub fn register_read(&self, index: u8) -> u8 {
        self.registers.read(index, (self.raster.ypos >> 1) as u8)
    }

    /// `chroni_vram_write(index14, value)` — page-windowed (spec §4.1).
    pub fn vram_write(&mut self, index: u16, value: u8) {
        trace::trace!("vram write page {} {:#06X} = {:#04X}", self.registers.page(), index, value);
        self.vram.page_write(self.registers.page(), index, value);
    }

    /// `chroni_vram_read(index14)` — page-windowed (spec §4.1).
    pub fn vram_read(&self, index: u16) -> u8 {
        self.vram.page_read(self.registers.page(), index)
    }

    pub fn framebuffer(&self) -> &[u8] {
        &self.framebuffer
    }

    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    /// `chroni_run_frame()`: the main pipeline (spec §4.4 "Frame loop").
    pub fn run_frame(&mut self, cpu: &mut dyn CpuDriver) {
        let mut clock = CpuClock::new(cpu);

        self.raster.run_preblank(&mut clock, &mut self.registers);

        let mut dl_pos = self.registers.dl.get();
        'walk: while self.raster.scanline < self.screen_height {
            let byte = self.vram.read(dl_pos);
            let opcode = Opcode::decode(byte);
            trace::trace!("DL fetch {:#06X}: opcode {:#04X}", dl_pos, byte);
            dl_pos = dl_pos.wrapping_add(1);
            if opcode.is_terminator() {
                break 'walk;
            }

            let mode = opcode.mode();
            if mode == MODE_BLANK {
                let lines = opcode.blank_lines();
                for line in 0..lines {
                    self.render_row(&mut clock, mode, 0, false, false);
                    self.raster.scanline += 1;
                    self.raster.ypos += 1;
                    if line + 1 == lines && opcode.post_dli() {
                        self.raster.post_dli = true;
                    }
                    if self.raster.scanline >= self.screen_height {
                        break 'walk;
                    }
                }
                continue;
            }

            if opcode.load_pointers() {
                let lms_word = self.vram.read_word(dl_pos);
                dl_pos = dl_pos.wrapping_add(2);
                let attribs_word = self.vram.read_word(dl_pos);
                dl_pos = dl_pos.wrapping_add(2);
                let subpals_word = self.vram.read_word(dl_pos);
                dl_pos = dl_pos.wrapping_add(2);
                self.raster.lms = (lms_word as u32) << 1;
                self.raster.attribs = (attribs_word as u32) << 1;
                self.raster.subpals = (subpals_word as u32) << 1;
            }

            let lines = LINES_PER_MODE[mode as usize];
            let pitch = display_list::pitch_for(mode, opcode.hscroll_enable());
            for line in 0..lines {
                self.render_row(&mut clock, mode, line, opcode.hscroll_enable(), opcode.vscroll_enable());
                self.raster.scanline += 1;
                self.raster.ypos += 1;
                if line + 1 == lines && opcode.post_dli() {
                    self.raster.post_dli = true;
                }
                if self.raster.scanline >= self.screen_height {
                    break 'walk;
                }
            }
            self.raster.advance_row_pointers(pitch);
        }

        while self.raster.scanline < self.screen_height {
            self.render_row(&mut clock, MODE_BLANK, 0, false, false);
            self.raster.scanline += 1;
            self.raster.ypos += 1;
        }

        self.registers.set_vblank(true);
        trace::trace!("run_frame: VBLANK set");
        if self.registers.enable_ints() {
            clock.nmi(true);
        }
    }

    /// Render one full scanline (border + active region + border),
    /// composited with sprites and resolved to RGB888, into the
    /// framebuffer.
    fn render_row(&mut self, clock: &mut CpuClock<'_>, mode: u8, line: u8, hscroll_enable: bool, vscroll_enable: bool) {
        let sprites_base = self.registers.sprites.get();
        self.raster
            .do_scan_start(clock, &mut self.registers, &self.vram, sprites_base);

        let mut active = [0u8; SCREEN_XRES];
        if mode == MODE_BLANK {
            render_blank(self.registers.border_color(), &mut active);
        } else {
            let inputs = RenderInputs {
                vram: &self.vram,
                lms: self.raster.lms,
                attribs: self.raster.attribs,
                charset: self.registers.charset.get(),
                subpals: self.raster.subpals,
                tileset_small: self.registers.tileset_small.get(),
                tileset_big: self.registers.tileset_big.get(),
                hscroll: self.registers.hscroll(),
                vscroll: self.registers.vscroll(),
                hscroll_enable,
                vscroll_enable,
                pitch: display_list::pitch_for(mode, hscroll_enable),
                border_color: self.registers.border_color(),
            };
            render_scan(mode, &inputs, line, &mut active);
        }

        // ENABLE_CHRONI only chooses between border and black for a blank
        // (mode 0) scanline (spec §4.4 "render blank scanlines (border or
        // black depending on ENABLE_CHRONI)") — active DL-rendered modes
        // are unaffected by the bit and always render normally.
        let blackout_row = mode == MODE_BLANK && !self.registers.enable_chroni();
        let border_color = self.registers.border_color();
        let row_offset = self.raster.scanline as usize * SCREEN_PITCH;

        debug_assert!(self.raster.scanline < self.screen_height, "scanline out of bounds before pixel write");

        for col in 0..SCREEN_WIDTH {
            let out_offset = row_offset + col * 3;
            if blackout_row {
                self.framebuffer[out_offset..out_offset + 3].copy_from_slice(&[0, 0, 0]);
                self.raster.charge_dot(clock);
                continue;
            }

            let base_color = if col < SCREEN_XBORDER || col >= SCREEN_XBORDER + SCREEN_XRES {
                border_color
            } else {
                active[col - SCREEN_XBORDER]
            };

            let final_color = self
                .raster
                .overlay_sprite(&self.vram, sprites_base, base_color, col as i32);

            let rgb565 = self.vram.read_word(self.registers.palette.get() + final_color as u32 * 2);
            let rgb = self.palette_table.expand(rgb565);
            self.framebuffer[out_offset..out_offset + 3].copy_from_slice(&rgb);

            self.raster.charge_dot(clock);
        }

        self.raster.do_scan_end(clock);

        if let Some(callback) = self.scan_callback.as_mut() {
            callback(self.raster.scanline);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingCpu;

    #[test]
    fn empty_dl_blackout_yields_all_zero_framebuffer_and_single_vblank() {
        let mut chroni = Chroni::new(16);
        chroni.vram_write(0, 0x41); // DL = terminator at vram addr 0 (page 0, offset 0)
        chroni.register_write(0x00, 0);
        chroni.register_write(0x01, 0);
        // ENABLE_CHRONI left off, ENABLE_INTS left off.
        let mut cpu = CountingCpu::new();
        chroni.run_frame(&mut cpu);

        assert!(chroni.framebuffer().iter().all(|&b| b == 0));
        assert_eq!(chroni.register_read(0x09) & 0x80, 0x80);
        assert!(cpu.irq_log().is_empty());
    }

    #[test]
    fn single_blank_row_with_dli_renders_border_color_and_fires_one_edge() {
        let mut chroni = Chroni::new(16);
        // DL = [0x80 (post-dli | mode 0, 1 blank line), 0x41]
        chroni.vram_write(0, 0x80);
        chroni.vram_write(1, 0x41);
        chroni.register_write(0x00, 0);
        chroni.register_write(0x01, 0);
        chroni.register_write(0x04, 0); // palette pointer -> vram 0
        chroni.register_write(0x05, 0);
        chroni.register_write(0x10, 0xAB); // border color index 0xAB
        chroni.register_write(0x09, 0x14); // ENABLE_CHRONI | ENABLE_INTS
        // palette[0xAB] = pure red, RGB565 0xF800, little-endian at vram[0x156..0x158]
        chroni.vram_write(0xAB * 2, 0x00);
        chroni.vram_write(0xAB * 2 + 1, 0xF8);

        let mut cpu = CountingCpu::new();
        chroni.run_frame(&mut cpu);

        assert_eq!(chroni.register_read(0x09) & 0x80, 0x80);
        let row0 = &chroni.framebuffer()[0..geometry::SCREEN_PITCH];
        assert!(row0.chunks_exact(3).all(|px| px == [248, 0, 0]));
        // the DLI fires as a matched (true, false) pair at the next scanline's
        // prologue; `do_scan_start` also unconditionally completes a no-op
        // edge every other scanline, so look for the matched pair rather than
        // an exact log length.
        let log = cpu.irq_log();
        let dli_edge = log
            .windows(2)
            .any(|w| w == [(clock::IrqLine::Nmi, true), (clock::IrqLine::Nmi, false)]);
        assert!(dli_edge, "expected one matched NMI rising/falling pair for the DLI");
    }
}
