//! Spectrum snapshot mapping.
//!
//! A snapshot is `N` byte intensities (0-255), one per analysis bin. Each animation narrows it to a
//! frequency band, rescales it into canvas units and optionally mirrors it before sampling `count`
//! slots with a nearest-neighbor stride of `floor(len / count)`.

/// Web-Audio style FFT analyser and the [`SpectrumSource`] contract.
pub mod analyser;

pub use analyser::{AnalyserOpts, FftAnalyser, SpectrumSource, decode_audio_mono};

use crate::foundation::error::{VizError, VizResult};
use std::ops::Range;

/// Named contiguous sub-range of the spectrum, ordered low to high frequency.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyBand {
    Base,
    Lows,
    #[default]
    Mids,
    Highs,
}

impl FrequencyBand {
    pub const ALL: [Self; 4] = [Self::Base, Self::Lows, Self::Mids, Self::Highs];

    /// Bin range covered by this band for a spectrum of `n` bins.
    ///
    /// Bands are cut at 1/16, 1/8, 3/8 and 7/8 of the bin count. They do not overlap, and the top
    /// eighth (mostly empty for music) is left out.
    pub fn range(self, n: usize) -> Range<usize> {
        let base_end = n / 16;
        let lows_end = n / 8;
        let mids_end = n * 3 / 8;
        let highs_end = n * 7 / 8;
        match self {
            Self::Base => 0..base_end,
            Self::Lows => base_end..lows_end,
            Self::Mids => lows_end..mids_end,
            Self::Highs => mids_end..highs_end,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Lows => "lows",
            Self::Mids => "mids",
            Self::Highs => "highs",
        }
    }
}

/// Band-limit a snapshot. Indices of the returned slice are renumbered from zero.
///
/// Fails only for an empty snapshot, which means the analysis window is degenerate.
pub fn select_band(spectrum: &[u8], band: FrequencyBand) -> VizResult<&[u8]> {
    if spectrum.is_empty() {
        return Err(VizError::analysis(
            "spectrum snapshot is empty (zero-length analysis window)",
        ));
    }
    Ok(&spectrum[band.range(spectrum.len())])
}

/// Rescale byte intensities from `0..=255` into `0..=bound`, rounding to whole units.
pub fn scale(spectrum: &[u8], bound: f64) -> Vec<u32> {
    let mut out = Vec::with_capacity(spectrum.len());
    scale_into(spectrum, bound, &mut out);
    out
}

fn scale_into(spectrum: &[u8], bound: f64, out: &mut Vec<u32>) {
    out.clear();
    let bound = bound.max(0.0);
    out.extend(
        spectrum
            .iter()
            .map(|&v| (f64::from(v) * bound / 255.0).round() as u32),
    );
}

/// Overwrite the second half with the reversed first half: `data[len-1-i] = data[i]` for
/// `i < ceil(len/2)`.
///
/// Applying it twice does not restore the original; the second half is already lost.
pub fn mirror_x<T: Copy>(data: &mut [T]) {
    let len = data.len();
    for i in 0..len.div_ceil(2) {
        data[len - 1 - i] = data[i];
    }
}

/// Spectrum index read by slot `i` when `count` slots are mapped onto `len` bins.
///
/// Nearest-neighbor stride of `floor(len / count)`. When `count > len` the stride is zero and every
/// slot reads index 0.
pub fn slot_index(len: usize, count: usize, i: usize) -> usize {
    if count == 0 {
        return 0;
    }
    (len / count) * i
}

/// Per-animation working copy of a snapshot: band-limited, scaled and optionally mirrored.
///
/// The backing buffer is kept across frames.
#[derive(Clone, Debug, Default)]
pub struct WorkingSpectrum {
    data: Vec<u32>,
}

impl WorkingSpectrum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refill from `snapshot` for the given band, scale bound and mirror flag.
    pub fn prepare(
        &mut self,
        snapshot: &[u8],
        band: FrequencyBand,
        bound: f64,
        mirror: bool,
    ) -> VizResult<()> {
        let banded = select_band(snapshot, band)?;
        scale_into(banded, bound, &mut self.data);
        if mirror {
            mirror_x(&mut self.data);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn values(&self) -> &[u32] {
        &self.data
    }

    /// Value at `idx`; reads past the end yield 0.
    pub fn at(&self, idx: usize) -> f64 {
        self.data.get(idx).map_or(0.0, |&v| f64::from(v))
    }

    /// Value read by slot `i` of `count`.
    pub fn slot(&self, count: usize, i: usize) -> f64 {
        self.at(slot_index(self.data.len(), count, i))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spectrum/mapper.rs"]
mod tests;
