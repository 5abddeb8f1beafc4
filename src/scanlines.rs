use crate::{
    chunks::ihdr::ImageProfile,
    error::PngError,
    filters::Filter,
    pixel::{PixelGrid, CHANNELS},
};

/// Undoes the per-row filters of decompressed image data.
///
/// Row `y` is read from `data[y * stride..(y + 1) * stride]` with
/// `stride = 1 + 3 * width`. Rows are reconstructed top to bottom, each one
/// straight into the pixel grid so it can serve as the prior row for the
/// next. Bytes after the last row are ignored.
pub fn reconstruct_scanlines(
    data: &[u8],
    profile: &ImageProfile,
) -> Result<PixelGrid, PngError> {
    profile.validate()?;
    let (width, height) = (profile.width as usize, profile.height as usize);
    let stride = profile.scanline_size();
    let bpp = profile.filter_width();
    let expected = stride
        .checked_mul(height)
        .ok_or(PngError::MalformedHeader("image dimensions overflow"))?;
    if data.len() < expected {
        return Err(PngError::TruncatedImageData {
            expected,
            actual: data.len(),
        });
    }
    if data.len() > expected {
        log::warn!("Ignoring {} bytes after the last scanline", data.len() - expected);
    }

    let mut grid = PixelGrid::new(width, height);
    let mut prior: Option<&[u8]> = None;
    let rows = data.chunks_exact(stride).zip(grid.rows_mut());
    for (row, (scanline, current)) in rows.enumerate() {
        let filter = Filter::try_from(scanline[0]).map_err(|e| PngError::UnknownFilterType {
            row,
            filter: e.0,
        })?;
        filter.reconstruct_row(&scanline[1..], prior, current, bpp);
        let current: &[u8] = current;
        prior = Some(current);
    }
    Ok(grid)
}

/// Filters every row of `grid` with `filter` and prefixes each row with the
/// filter type byte, producing data ready for compression.
pub fn filter_scanlines(grid: &PixelGrid, filter: Filter) -> Vec<u8> {
    let row_len = grid.row_len();
    let mut out = vec![0; (row_len + 1) * grid.height()];
    let mut prior: Option<&[u8]> = None;
    for (current, record) in grid.rows().zip(out.chunks_exact_mut(row_len + 1)) {
        record[0] = filter as u8;
        filter.filter_row(current, prior, &mut record[1..], CHANNELS);
        prior = Some(current);
    }
    out
}
