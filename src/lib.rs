#![doc = r#"
Chroni video coprocessor core.

This crate is the rasterizer half of a retro-style 8-bit computer: a
programmable display generator that walks a Display List (DL) stored in
VRAM, renders scanlines through a handful of pixel pipelines (text,
bitmap, tiled, sprites), and steals CPU cycles in lockstep with a host
processor it never implements itself.

Modules:
- chroni: the `Chroni` facade (VRAM, registers, rasterizer, CPU clock)
  and its submodules (`vram`, `registers`, `clock`, `display_list`,
  `rasterizer`, `renderers`, `sprites`, `palette`).

The CPU itself, the bus dispatch to other memory-mapped devices, the
monitor/disassembler, and any frontend (windowing, input, audio) are
external collaborators. This crate talks to them only through the
`CpuDriver` trait and the plain functions exposed by `Chroni`.

In tests, shared DL/VRAM builders and a counting `CpuDriver` stub are
available under `crate::test_support`.
"#]

pub mod chroni;

pub use chroni::Chroni;
pub use chroni::clock::CpuDriver;

#[cfg(test)]
pub mod test_support;
