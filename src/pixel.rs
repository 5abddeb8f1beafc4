use std::{fmt, str::FromStr};

/// Bytes per RGB pixel, which is also the filter distance for 8-bit samples.
pub(crate) const CHANNELS: usize = 3;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Pixel {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Pixel {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub fn channel(&self, channel: Channel) -> u8 {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
        }
    }

    /// Keeps `channel` and zeroes the other two.
    pub fn isolate(&self, channel: Channel) -> Self {
        let mut isolated = Self::default();
        match channel {
            Channel::Red => isolated.red = self.red,
            Channel::Green => isolated.green = self.green,
            Channel::Blue => isolated.blue = self.blue,
        }
        isolated
    }
}

impl From<[u8; 3]> for Pixel {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of the channel's byte within an RGB triple.
    pub fn offset(&self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    /// Lowercase letter used in output file names, e.g. `image_r.png`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Red => "r",
            Self::Green => "g",
            Self::Blue => "b",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChannel(pub String);

impl fmt::Display for UnknownChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown channel '{}', expected r, g or b", self.0)
    }
}

impl std::error::Error for UnknownChannel {}

impl FromStr for Channel {
    type Err = UnknownChannel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "r" | "red" => Ok(Self::Red),
            "g" | "green" => Ok(Self::Green),
            "b" | "blue" => Ok(Self::Blue),
            _ => Err(UnknownChannel(s.to_owned())),
        }
    }
}

/// `height` rows of `width` RGB pixels in one row-major buffer. The byte for
/// channel `c` of pixel `(x, y)` sits at `(y * width + x) * 3 + c`.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * CHANNELS],
        }
    }

    /// Wraps an existing buffer; `None` if its length doesn't match the
    /// dimensions.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        let expected = width.checked_mul(height)?.checked_mul(CHANNELS)?;
        (data.len() == expected).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn row_len(&self) -> usize {
        self.width * CHANNELS
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| (y * self.width + x) * CHANNELS)
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        let i = self.index(x, y)?;
        Some(Pixel::new(self.data[i], self.data[i + 1], self.data[i + 2]))
    }

    /// Returns `false` when `(x, y)` is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, pixel: Pixel) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.data[i..i + CHANNELS].copy_from_slice(&[pixel.red, pixel.green, pixel.blue]);
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: usize) -> Option<&[u8]> {
        let start = self.index(0, y)?;
        Some(&self.data[start..start + self.row_len()])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        // `chunks_exact` panics on a zero chunk size.
        self.data.chunks_exact(self.row_len().max(1))
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut [u8]> + '_ {
        let row_len = self.row_len().max(1);
        self.data.chunks_exact_mut(row_len)
    }

    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .chunks_exact(CHANNELS)
            .map(|p| Pixel::new(p[0], p[1], p[2]))
    }

    /// A copy of the grid where every pixel keeps only `channel`.
    pub fn isolate(&self, channel: Channel) -> Self {
        let offset = channel.offset();
        let data = self
            .data
            .iter()
            .enumerate()
            .map(|(i, &b)| if i % CHANNELS == offset { b } else { 0 })
            .collect();
        Self {
            width: self.width,
            height: self.height,
            data,
        }
    }
}

impl fmt::Debug for PixelGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}
