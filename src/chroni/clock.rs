/*!
CPU-interleave clock: the cooperative cycle budgeter the rasterizer drives
instead of ever stepping a CPU itself (spec §4.3, §5 "Concurrency & resource
model").

`CpuDriver` is the abstract host-CPU contract (spec §6 "Consumed from the
host: CPU driver") — a trait rather than a concrete type, the same way the
teacher decouples cartridge banking behind `Mapper` (implemented by `Nrom`,
`Cnrom`, `Mmc1`, `Mmc3`) and decouples read-only PPU memory access behind
`PpuBus` (implemented by `BusPpuView`). The original C source modeled this
as a table of function pointers selected once at init between an M6502 and
a Z80 backend (`v_cpu` in `cpu.c`); the idiomatic replacement is this trait,
per the Design Note "Function-pointer dispatch for CPU variants → tagged
variant."

`CpuClock` borrows the driver for the lifetime of a single `run_frame` call
and owns only the pending-halt flag; it has no opinion about which concrete
CPU is on the other end.
*/

/// Which interrupt line an edge applies to. Chroni only ever drives `Nmi`,
/// but the host CPU also exposes a maskable `Irq` line (asserted by other
/// memory-mapped devices, not by this core) so the trait names both.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IrqLine {
    Irq,
    Nmi,
}

/// Abstract host CPU, supplied by the integration that owns the bus.
/// Chroni calls `run`/`set_irq_line`/`set_halt`; the remaining methods exist
/// for the monitor/disassembler (an external collaborator, spec §6) and are
/// never invoked by this crate.
pub trait CpuDriver {
    fn reset(&mut self);

    /// Execute up to `cycles` cycles, returning the number actually
    /// executed (an instruction may overrun the requested budget).
    fn run(&mut self, cycles: u32) -> u32;

    fn set_irq_line(&mut self, line: IrqLine, level: bool);

    fn get_pc(&self) -> u16;

    fn get_reg(&self, id: u8) -> u32;

    /// Disassemble the instruction at `addr` into `out`, returning the
    /// address of the next instruction.
    fn disasm(&self, addr: u16, out: &mut String) -> u16;

    fn set_halt(&mut self, halted: bool);
}

/// Cooperative cycle budgeter sitting between the rasterizer and a
/// `CpuDriver`. Suspension points are exactly `run_cpu`, `halt_cpu`, and
/// `resume_cpu` (spec §5): pixel emission between those points is atomic
/// with respect to the guest CPU.
pub struct CpuClock<'a> {
    cpu: &'a mut dyn CpuDriver,
    halted: bool,
}

impl<'a> CpuClock<'a> {
    pub fn new(cpu: &'a mut dyn CpuDriver) -> Self {
        Self {
            cpu,
            halted: false,
        }
    }

    /// Yield `cycles` CPU cycles of execution to the guest processor. While
    /// halted, no cycles are forwarded to the driver — HALT takes effect at
    /// the next yield and lasts until `resume_cpu`.
    pub fn run_cpu(&mut self, cycles: u32) {
        if cycles == 0 || self.halted {
            return;
        }
        self.cpu.run(cycles);
    }

    /// Set a pending-halt flag (register 8 write). Takes effect on the next
    /// `run_cpu` call.
    pub fn halt_cpu(&mut self) {
        self.halted = true;
        self.cpu.set_halt(true);
    }

    /// Clear the pending-halt flag. Unconditionally issued at every
    /// `do_scan_end` (spec §5).
    pub fn resume_cpu(&mut self) {
        self.halted = false;
        self.cpu.set_halt(false);
    }

    /// Drive the CPU NMI line. A high-then-low pair on the same boundary is
    /// a single edge; the CPU layer latches on the rising transition.
    pub fn nmi(&mut self, level: bool) {
        self.cpu.set_irq_line(IrqLine::Nmi, level);
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}
