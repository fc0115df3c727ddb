use itertools::{Itertools, MinMaxResult};
use serde::{Deserialize, Serialize};

/// Index of the bucket `value` falls in, for a palette of `n` colors spanning `[min, max]`.
///
/// A degenerate extent (`max == min`) and non-finite values land in bucket 0.
/// Values outside the extent are clamped to the first or last bucket.
pub fn bucket_index(value: f64, min: f64, max: f64, n: usize) -> Option<usize> {
    if n == 0 {
        return None;
    }
    let last = n - 1;
    let range = max - min;
    let normalized = if range != 0.0 && range.is_finite() {
        (value - min) / range
    } else {
        0.0
    };
    if !normalized.is_finite() {
        return Some(0);
    }
    let scaled = (normalized.clamp(0.0, 1.0) * last as f64).floor();
    Some((scaled as usize).min(last))
}

/// Palette entry for `value` within `[min, max]`. `None` only for an empty palette.
pub fn color_for<'a, S: AsRef<str>>(
    value: f64,
    min: f64,
    max: f64,
    palette: &'a [S],
) -> Option<&'a str> {
    bucket_index(value, min, max, palette.len()).map(|i| palette[i].as_ref())
}

/// One legend row: a palette color and the lower bound of its bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub color: String,
    pub value: f64,
}

/// Binned color scale over the extent of a metric column
#[derive(Debug, Clone, PartialEq)]
pub struct BinnedColorScale {
    palette: Vec<String>,
    min: f64,
    max: f64,
}

impl BinnedColorScale {
    pub fn new(palette: Vec<String>, min: f64, max: f64) -> Self {
        Self { palette, min, max }
    }

    /// Scale whose extent is the min and max of `values`. No values gives `(0, 0)`.
    pub fn from_values<I>(palette: Vec<String>, values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = match values
            .into_iter()
            .filter(|v| !v.is_nan())
            .minmax_by(|a, b| a.total_cmp(b))
        {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(min, max) => (min, max),
        };
        Self::new(palette, min, max)
    }

    pub fn palette(&self) -> &[String] {
        &self.palette
    }

    pub fn extent(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    pub fn bucket_index(&self, value: f64) -> Option<usize> {
        bucket_index(value, self.min, self.max, self.palette.len())
    }

    pub fn color_for(&self, value: f64) -> Option<&str> {
        color_for(value, self.min, self.max, &self.palette)
    }

    /// Lower bound of bucket `i`: `min + i / (n - 1) * (max - min)`
    pub fn bucket_lower_bound(&self, i: usize) -> f64 {
        let n = self.palette.len();
        if n <= 1 {
            return self.min;
        }
        self.min + (i as f64 / (n - 1) as f64) * (self.max - self.min)
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        self.palette
            .iter()
            .enumerate()
            .map(|(i, color)| LegendEntry {
                color: color.clone(),
                value: self.bucket_lower_bound(i),
            })
            .collect()
    }
}
