use crate::{
    filters::Filter,
    pixel::{Channel, PixelGrid},
    scanlines::filter_scanlines,
};

/// Scanline data for an image showing only `channel` of `grid`.
///
/// Every row is stored with filter type None: each pixel carries the source
/// value in the selected channel and zero in the other two. `grid` itself is
/// only read, so one decoded grid can feed all three channels.
pub fn isolate(grid: &PixelGrid, channel: Channel) -> Vec<u8> {
    filter_scanlines(&grid.isolate(channel), Filter::None)
}
