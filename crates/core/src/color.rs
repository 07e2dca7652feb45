#![forbid(unsafe_code)]

/// ARGB color assigned to buttons from odd-numbered slides.
pub const DARK_SLIDE_COLOR: u32 = 4_294_951_115;
/// ARGB color assigned to buttons from even-numbered slides.
pub const LIGHT_SLIDE_COLOR: u32 = 4_294_934_323;

pub fn slide_color(slide_index: u32) -> u32 {
    if slide_index % 2 == 1 {
        DARK_SLIDE_COLOR
    } else {
        LIGHT_SLIDE_COLOR
    }
}
