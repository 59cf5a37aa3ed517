/*!
Screen geometry constants (spec §6 "Frontend": `screen_width`,
`screen_height`, `screen_pitch`, `SCREEN_XRES`, `SCREEN_XBORDER`).

`screen_height` is the one dimension the host controls (it is supplied at
construction, not fixed here), since nothing in the specification pins it
to a single value — everything else is a fixed property of the mode set.
*/

/// Width, in pixels, of the active (mode-rendered) region of a scanline.
pub const SCREEN_XRES: usize = 320;

/// Border pixels on each side of the active region.
pub const SCREEN_XBORDER: usize = 24;

/// Total scanline width: left border + active region + right border.
pub const SCREEN_WIDTH: usize = SCREEN_XBORDER + SCREEN_XRES + SCREEN_XBORDER;

/// Bytes per scanline row in the framebuffer (RGB888 triplets).
pub const SCREEN_PITCH: usize = SCREEN_WIDTH * 3;
