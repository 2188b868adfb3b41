use std::cmp::Ordering;

use log::debug;
use serde::Serialize;
use thiserror::Error;

use crate::capture::CaptureRecord;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Statistics requested over an empty dataset")]
    EmptyDataset,

    #[error("Cannot fit an exponential distribution to {samples} delays with mean {mean}")]
    DegenerateDistribution { samples: usize, mean: f64 },

    #[error("Histogram needs at least one bin")]
    InvalidBinCount,
}

/// Values that can be placed on the data axis of a distribution.
pub trait SampleValue: Copy {
    fn order(&self, other: &Self) -> Ordering;
}

impl SampleValue for f64 {
    fn order(&self, other: &Self) -> Ordering {
        self.total_cmp(other)
    }
}

macro_rules! integer_sample {
    ($($ty:ty),*) => {
        $(impl SampleValue for $ty {
            fn order(&self, other: &Self) -> Ordering {
                self.cmp(other)
            }
        })*
    };
}

integer_sample!(u32, u64, usize);

/// Empirical distribution: data sorted ascending, paired with a probability per point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution<T> {
    pub values: Vec<T>,
    pub probabilities: Vec<f64>,
}

impl<T> Distribution<T> {
    pub fn empty() -> Self {
        Self {
            values: Vec::new(),
            probabilities: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Exponential distribution fitted to a delay series, `rate = 1 / mean`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExponentialFit {
    pub rate: f64,
    /// Largest delay of the fitted series; the curve spans `[0, domain_max]`.
    pub domain_max: f64,
}

impl ExponentialFit {
    pub fn mean(&self) -> f64 {
        1.0 / self.rate
    }

    pub fn density(&self, x: f64) -> f64 {
        self.rate * (-self.rate * x).exp()
    }

    /// `points` evenly spaced `(x, density(x))` pairs over `[0, domain_max]`.
    ///
    /// The iterator is lazy and `Clone`; calling `curve` again yields the
    /// same sequence.
    pub fn curve(&self, points: usize) -> FitCurve {
        FitCurve {
            fit: *self,
            points,
            index: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FitCurve {
    fit: ExponentialFit,
    points: usize,
    index: usize,
}

impl Iterator for FitCurve {
    type Item = (f64, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.points {
            return None;
        }
        let x = if self.points > 1 && self.index == self.points - 1 {
            self.fit.domain_max
        } else if self.points > 1 {
            let step = self.fit.domain_max / (self.points - 1) as f64;
            self.index as f64 * step
        } else {
            0.0
        };
        self.index += 1;
        Some((x, self.fit.density(x)))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.points.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for FitCurve {}

/// Equal-width density histogram; densities integrate to 1 over the bins.
///
/// The bins span `[min, max]` of the data, widened to `[v - 0.5, v + 0.5]`
/// when every value is `v`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges; the last bin includes its right edge.
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
    pub densities: Vec<f64>,
}

/// Per-record figures printed after a batch is loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordSummary {
    pub packets: usize,
    pub total_bytes: u64,
    pub span_seconds: f64,
    pub mean_delay: Option<f64>,
    pub max_delay: Option<f64>,
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

fn max(data: &[f64]) -> Option<f64> {
    data.iter().copied().reduce(f64::max)
}

fn sorted<T: SampleValue>(data: &[T]) -> Vec<T> {
    let mut values = data.to_vec();
    values.sort_by(|a, b| a.order(b));
    values
}

pub fn exponential_fit(delays: &[f64]) -> Result<ExponentialFit, StatsError> {
    let domain_max = max(delays).ok_or(StatsError::DegenerateDistribution {
        samples: 0,
        mean: f64::NAN,
    })?;

    let mean = mean(delays);
    if !mean.is_finite() || mean <= 0.0 {
        return Err(StatsError::DegenerateDistribution {
            samples: delays.len(),
            mean,
        });
    }

    Ok(ExponentialFit {
        rate: 1.0 / mean,
        domain_max,
    })
}

/// Ascending empirical CDF: `probabilities[i] = (i + 1) / n`, ending at exactly 1.0.
pub fn empirical_cdf<T: SampleValue>(data: &[T]) -> Result<Distribution<T>, StatsError> {
    if data.is_empty() {
        return Err(StatsError::EmptyDataset);
    }

    let n = data.len() as f64;
    let probabilities = (1..=data.len()).map(|rank| rank as f64 / n).collect();

    Ok(Distribution {
        values: sorted(data),
        probabilities,
    })
}

/// Complementary CDF, `1 - cdf`, ending at exactly 0.0.
pub fn empirical_ccdf<T: SampleValue>(data: &[T]) -> Result<Distribution<T>, StatsError> {
    let mut distribution = empirical_cdf(data)?;
    for p in distribution.probabilities.iter_mut() {
        *p = 1.0 - *p;
    }
    Ok(distribution)
}

/// Delay CCDF of every record, in record order.
///
/// A record without delays gets an empty distribution in its slot so the
/// other recordings can still be compared.
pub fn combined_ccdf(records: &[CaptureRecord]) -> Vec<Distribution<f64>> {
    records
        .iter()
        .map(|record| {
            empirical_ccdf(record.inter_arrival_delays()).unwrap_or_else(|err| {
                debug!("{}: {}", record.source().display(), err);
                Distribution::empty()
            })
        })
        .collect()
}

/// Packet size CDF of every record, with the same empty-slot policy as [`combined_ccdf`].
pub fn combined_size_cdf(records: &[CaptureRecord]) -> Vec<Distribution<usize>> {
    records
        .iter()
        .map(|record| {
            empirical_cdf(record.sizes()).unwrap_or_else(|err| {
                debug!("{}: {}", record.source().display(), err);
                Distribution::empty()
            })
        })
        .collect()
}

/// Non-finite values are left out of the histogram.
pub fn histogram(data: &[f64], bins: usize) -> Result<Histogram, StatsError> {
    if bins == 0 {
        return Err(StatsError::InvalidBinCount);
    }

    let finite: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
    let (mut first, mut last) = match (
        finite.iter().copied().reduce(f64::min),
        finite.iter().copied().reduce(f64::max),
    ) {
        (Some(lo), Some(hi)) => (lo, hi),
        _ => return Err(StatsError::EmptyDataset),
    };
    if first == last {
        first -= 0.5;
        last += 0.5;
    }

    let step = (last - first) / bins as f64;
    let mut edges: Vec<f64> = (0..bins).map(|i| first + i as f64 * step).collect();
    edges.push(last);

    let mut counts = vec![0usize; bins];
    for &x in &finite {
        let mut index = (((x - first) / step) as usize).min(bins - 1);
        if x < edges[index] && index > 0 {
            index -= 1;
        } else if index + 1 < bins && x >= edges[index + 1] {
            index += 1;
        }
        counts[index] += 1;
    }

    let n = finite.len() as f64;
    let densities = counts
        .iter()
        .zip(edges.windows(2))
        .map(|(&count, edge)| count as f64 / (n * (edge[1] - edge[0])))
        .collect();

    Ok(Histogram {
        edges,
        counts,
        densities,
    })
}

pub fn summarize(record: &CaptureRecord) -> RecordSummary {
    let delays = record.inter_arrival_delays();
    RecordSummary {
        packets: record.len(),
        total_bytes: record.total_bytes(),
        span_seconds: record.span_seconds(),
        mean_delay: (!delays.is_empty()).then(|| mean(delays)),
        max_delay: max(delays),
    }
}
