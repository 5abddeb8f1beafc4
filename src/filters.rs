/// Per-scanline prediction filter, stored as the first byte of every row.
///
/// For each byte `x` the filters look at `a` (the byte one pixel to the
/// left), `b` (the byte above) and `c` (the byte above and to the left), all
/// taken from the unfiltered image and 0 where they fall outside of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    None = 0,
    Sub = 1,
    Up = 2,
    Average = 3,
    Paeth = 4,
}

impl Filter {
    pub const ALL: [Filter; 5] = [
        Filter::None,
        Filter::Sub,
        Filter::Up,
        Filter::Average,
        Filter::Paeth,
    ];

    /// Turns the raw byte `x` into its filtered form.
    pub fn filter(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        x.wrapping_sub(self.predict(a, b, c))
    }

    /// Recovers the raw byte from the filtered byte `x`.
    pub fn reconstruct(&self, x: u8, a: u8, b: u8, c: u8) -> u8 {
        x.wrapping_add(self.predict(a, b, c))
    }

    fn predict(&self, a: u8, b: u8, c: u8) -> u8 {
        match self {
            Filter::None => 0,
            Filter::Sub => a,
            Filter::Up => b,
            Filter::Average => ((a as u16 + b as u16) / 2) as u8,
            Filter::Paeth => paeth_predictor(a, b, c),
        }
    }

    /// Reconstructs one row in place of `current`.
    ///
    /// `prior` is the already reconstructed row above, `None` for the first
    /// row. `bpp` is the byte distance to the same channel of the pixel on the
    /// left.
    pub(crate) fn reconstruct_row(
        &self,
        filtered: &[u8],
        prior: Option<&[u8]>,
        current: &mut [u8],
        bpp: usize,
    ) {
        for i in 0..current.len() {
            let (a, b, c) = neighbours(current, prior, i, bpp);
            current[i] = self.reconstruct(filtered[i], a, b, c);
        }
    }

    /// Filters the raw row `current` into `out`.
    pub(crate) fn filter_row(
        &self,
        current: &[u8],
        prior: Option<&[u8]>,
        out: &mut [u8],
        bpp: usize,
    ) {
        for i in 0..current.len() {
            let (a, b, c) = neighbours(current, prior, i, bpp);
            out[i] = self.filter(current[i], a, b, c);
        }
    }
}

fn neighbours(current: &[u8], prior: Option<&[u8]>, i: usize, bpp: usize) -> (u8, u8, u8) {
    let a = if i >= bpp { current[i - bpp] } else { 0 };
    let b = prior.map_or(0, |p| p[i]);
    let c = match prior {
        Some(p) if i >= bpp => p[i - bpp],
        _ => 0,
    };
    (a, b, c)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownFilter(pub u8);

impl TryFrom<u8> for Filter {
    type Error = UnknownFilter;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Sub),
            2 => Ok(Self::Up),
            3 => Ok(Self::Average),
            4 => Ok(Self::Paeth),
            i => Err(UnknownFilter(i)),
        }
    }
}

/// Picks whichever of left, above and upper-left is closest to
/// `a + b - c`. Ties go to `a`, then `b`, then `c`; this order is mandatory.
pub fn paeth_predictor(a: u8, b: u8, c: u8) -> u8 {
    let (a_, b_, c_) = (a as i16, b as i16, c as i16);
    let p = a_ + b_ - c_;
    let pa = (p - a_).abs();
    let pb = (p - b_).abs();
    let pc = (p - c_).abs();
    if pa <= pb && pa <= pc {
        a
    } else if pb <= pc {
        b
    } else {
        c
    }
}
