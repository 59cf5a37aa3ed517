/*!
Rasterizer state: the per-frame/per-scanline bookkeeping the DL interpreter
carries between scan-start and scan-end (spec §4.4 "Per-scanline
prologue"/"epilogue", §4.1 invariants on `scanline`/`ypos`).

`ypos` increments once per scanline for the *entire* frame — the 8-line
vertical pre-blank, every DL-rendered row, and any trailing fallback-blank
rows — because register 7 reads back `ypos >> 1` at all times (testable
property 4) regardless of where in the frame the read happens. `scanline`
resets to 0 after the pre-blank and only counts rendered rows, since it
indexes directly into the framebuffer (`scanline * screen_pitch`).
*/

use crate::chroni::clock::CpuClock;
use crate::chroni::registers::Registers;
use crate::chroni::sprites::SpriteUnit;
use crate::chroni::vram::Vram;

/// Cycles spent in the HBLANK prefix of every rendered scanline (spec
/// §4.3).
const HBLANK_CYCLES: u32 = 22;
/// Cycles spent after `resume_cpu()` at the end of every rendered
/// scanline (spec §4.3).
const SCAN_END_CYCLES: u32 = 8;
/// Total CPU-scanline budget used for the 8-line vertical pre-blank, where
/// no pixels are produced (spec §4.3: a pre-blank line runs this many
/// cycles normally, then unconditionally resumes — clearing any
/// guest-triggered halt left pending from a previous scanline — before the
/// final 8; the original source's `CPU_SCANLINE` macro never halts here).
const PREBLANK_LEAD_CYCLES: u32 = 144 - SCAN_END_CYCLES;

pub struct Rasterizer {
    pub ypos: u32,
    pub scanline: u32,
    pub xpos: i32,
    pub post_dli: bool,
    pub lms: u32,
    pub attribs: u32,
    pub subpals: u32,
    pub sprites: SpriteUnit,
}

impl Default for Rasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer {
    pub fn new() -> Self {
        Self {
            ypos: 0,
            scanline: 0,
            xpos: 0,
            post_dli: false,
            lms: 0,
            attribs: 0,
            subpals: 0,
            sprites: SpriteUnit::new(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The 8-line vertical pre-blank (spec §4.4 step 1): pure CPU time,
    /// no pixels, `ypos` still advances. Each line runs its full budget
    /// normally, then unconditionally resumes (clearing any guest-triggered
    /// halt left pending from a previous scanline) before the final 8
    /// cycles — it never halts the CPU itself.
    pub fn run_preblank(&mut self, clock: &mut CpuClock<'_>, registers: &mut Registers) {
        for y in 0..8 {
            self.ypos = y;
            clock.run_cpu(PREBLANK_LEAD_CYCLES);
            clock.resume_cpu();
            clock.run_cpu(SCAN_END_CYCLES);
        }
        self.ypos = 8;
        clock.nmi(false);
        registers.set_vblank(false);
        crate::chroni::trace::trace!("run_preblank: VBLANK cleared");
        self.scanline = 0;
    }

    /// Per-scanline prologue (spec §4.4 "do_scan_start"): arms/fires the
    /// pending DLI, yields the HBLANK prefix, and re-runs sprite
    /// discovery for this scanline.
    pub fn do_scan_start(
        &mut self,
        clock: &mut CpuClock<'_>,
        registers: &mut Registers,
        vram: &Vram,
        sprites_base: u32,
    ) {
        registers.set_hblank(true);
        if self.post_dli && registers.enable_ints() {
            crate::chroni::trace::trace!("do_scan_start: DLI firing at scanline {}", self.scanline);
            clock.nmi(true);
        }
        self.post_dli = false;

        clock.run_cpu(HBLANK_CYCLES);
        registers.set_hblank(false);
        clock.nmi(false);

        self.sprites.discover_scanline(
            vram,
            sprites_base,
            registers.enable_sprites(),
            self.scanline as i32,
        );
        self.xpos = 0;
    }

    /// Per-scanline epilogue (spec §4.4 "do_scan_end").
    pub fn do_scan_end(&mut self, clock: &mut CpuClock<'_>) {
        clock.resume_cpu();
        clock.run_cpu(SCAN_END_CYCLES);
    }

    /// Charge CPU time for one emitted dot: every fourth dot costs one
    /// cycle (spec §4.4 "Pixel emission": "every fourth increment costs
    /// one CPU cycle").
    pub fn charge_dot(&mut self, clock: &mut CpuClock<'_>) {
        if self.xpos & 3 == 0 {
            clock.run_cpu(1);
        }
        self.xpos += 1;
    }

    /// Composite a mode-rendered color with the sprite overlay for the
    /// current dot (spec §4.4 "Pixel emission", "Sprite overlay per
    /// pixel"). `xpos` here is the emission-local screen X used for
    /// sprite hit-testing, i.e. including the border offset.
    pub fn overlay_sprite(&mut self, vram: &Vram, sprites_base: u32, mode_color: u8, screen_x: i32) -> u8 {
        let (sprite_color, opaque) = self.sprites.pixel_at(vram, sprites_base, screen_x);
        if opaque {
            sprite_color
        } else {
            mode_color
        }
    }

    /// Advance LMS/ATTRIBS by `pitch` after a fully-rendered DL row (spec
    /// §4.4 step 2, "After the row, advance `lms += pitch` and
    /// `attribs += pitch`").
    pub fn advance_row_pointers(&mut self, pitch: u8) {
        self.lms = self.lms.wrapping_add(pitch as u32);
        self.attribs = self.attribs.wrapping_add(pitch as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::CountingCpu;

    #[test]
    fn preblank_forwards_the_full_scanline_budget_per_line_without_halting() {
        let mut cpu = CountingCpu::new();
        let mut registers = Registers::new();
        registers.set_vblank(true);
        let mut raster = Rasterizer::new();
        {
            let mut clock = CpuClock::new(&mut cpu);
            raster.run_preblank(&mut clock, &mut registers);
        }
        assert_eq!(cpu.total_cycles_run(), 144 * 8);
        assert!(cpu.halt_log().iter().all(|&halted| !halted), "pre-blank never halts the CPU");
        assert_eq!(registers.status() & 0x80, 0);
        assert_eq!(raster.scanline, 0);
    }

    #[test]
    fn scan_start_fires_pending_dli_exactly_once() {
        let mut cpu = CountingCpu::new();
        let mut registers = Registers::new();
        registers.write(0x09, 0x3F); // ENABLE_INTS on
        let vram = Vram::new();
        let mut raster = Rasterizer::new();
        raster.post_dli = true;
        {
            let mut clock = CpuClock::new(&mut cpu);
            raster.do_scan_start(&mut clock, &mut registers, &vram, 0);
        }
        assert_eq!(cpu.irq_log(), &[(crate::chroni::clock::IrqLine::Nmi, true), (crate::chroni::clock::IrqLine::Nmi, false)]);
        assert!(!raster.post_dli);
    }

    #[test]
    fn charge_dot_costs_one_cycle_every_fourth_dot() {
        let mut cpu = CountingCpu::new();
        let mut raster = Rasterizer::new();
        {
            let mut clock = CpuClock::new(&mut cpu);
            for _ in 0..8 {
                raster.charge_dot(&mut clock);
            }
        }
        assert_eq!(cpu.total_cycles_run(), 2);
    }
}
