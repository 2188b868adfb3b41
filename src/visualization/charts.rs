use log::warn;
use serde::Serialize;

use crate::analysis::statistics::{
    combined_ccdf, combined_size_cdf, exponential_fit, histogram, Distribution, Histogram,
};
use crate::analysis::AnalysisSession;
use crate::capture::CaptureRecord;
use crate::config::AnalysisConfig;

/// The three aligned columns handed to a charting component for one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureTable {
    #[serde(rename = "Size")]
    pub size: Vec<usize>,
    #[serde(rename = "Seconds")]
    pub seconds: Vec<f64>,
    #[serde(rename = "Inter-Message Delays")]
    pub inter_message_delays: Vec<f64>,
}

impl From<&CaptureRecord> for CaptureTable {
    fn from(record: &CaptureRecord) -> Self {
        Self {
            size: record.sizes().to_vec(),
            seconds: record.timestamps().to_vec(),
            inter_message_delays: record.inter_arrival_delays().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axes {
    pub x_label: String,
    pub y_label: String,
    pub log_x: bool,
}

impl Axes {
    fn linear(x_label: &str, y_label: &str) -> Self {
        Self {
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            log_x: false,
        }
    }

    fn semilog_x(x_label: &str, y_label: &str) -> Self {
        Self {
            log_x: true,
            ..Self::linear(x_label, y_label)
        }
    }
}

/// Bar chart of payload size against capture time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PacketRateChart {
    pub title: String,
    pub axes: Axes,
    pub bar_width: f64,
    pub seconds: Vec<f64>,
    pub sizes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedCurve {
    pub rate: f64,
    pub points: Vec<(f64, f64)>,
}

/// Delay density histogram with the fitted exponential overlaid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DelayPdfChart {
    pub title: String,
    pub axes: Axes,
    pub histogram: Option<Histogram>,
    pub fit: Option<FittedCurve>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series<T> {
    pub label: String,
    #[serde(flatten)]
    pub distribution: Distribution<T>,
}

/// One distribution curve per record on shared axes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedChart<T> {
    pub title: String,
    pub axes: Axes,
    pub series: Vec<Series<T>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    PacketRate(PacketRateChart),
    DelayPdf(DelayPdfChart),
    DelayCcdf(CombinedChart<f64>),
    PacketLengthCdf(CombinedChart<usize>),
}

/// A chart and the file name (without extension) it is rendered under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Artifact {
    pub name: String,
    pub chart: Chart,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartOptions {
    pub histogram_bins: usize,
    pub fit_points: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 50,
            fit_points: 1000,
        }
    }
}

impl From<&AnalysisConfig> for ChartOptions {
    fn from(config: &AnalysisConfig) -> Self {
        Self {
            histogram_bins: config.histogram_bins,
            fit_points: config.fit_points,
        }
    }
}

pub fn packet_rate_chart(label: &str, record: &CaptureRecord) -> PacketRateChart {
    PacketRateChart {
        title: format!("Packet Length as a Function of Time - {label}"),
        axes: Axes::linear("Timestamp (seconds)", "Packet Length (bytes)"),
        bar_width: 0.1,
        seconds: record.timestamps().to_vec(),
        sizes: record.sizes().to_vec(),
    }
}

/// Histogram and fit are left out, with a warning, when the delays cannot support them.
pub fn delay_pdf_chart(label: &str, record: &CaptureRecord, options: &ChartOptions) -> DelayPdfChart {
    let delays = record.inter_arrival_delays();

    let histogram = histogram(delays, options.histogram_bins)
        .map_err(|err| warn!("{label}: no delay histogram: {err}"))
        .ok();
    let fit = exponential_fit(delays)
        .map(|fit| FittedCurve {
            rate: fit.rate,
            points: fit.curve(options.fit_points).collect(),
        })
        .map_err(|err| warn!("{label}: no exponential fit: {err}"))
        .ok();

    DelayPdfChart {
        title: format!("Probability Density Function of Inter-Message Delays - {label}"),
        axes: Axes::linear("Inter-Message Delay (seconds)", "PDF"),
        histogram,
        fit,
    }
}

pub fn delay_ccdf_chart(session: &AnalysisSession) -> CombinedChart<f64> {
    let series = session
        .labeled_records()
        .zip(combined_ccdf(session.records()))
        .map(|((label, _), distribution)| Series { label, distribution })
        .collect();

    CombinedChart {
        title: "Complementary Cumulative Distribution Function (CCDF) of Inter-Message Delays"
            .to_string(),
        axes: Axes::semilog_x("Inter-Message Delay (seconds)", "CCDF"),
        series,
    }
}

pub fn packet_length_cdf_chart(session: &AnalysisSession) -> CombinedChart<usize> {
    let series = combined_size_cdf(session.records())
        .into_iter()
        .enumerate()
        .map(|(index, distribution)| Series {
            label: format!("Recording {}", index + 1),
            distribution,
        })
        .collect();

    CombinedChart {
        title: "Cumulative Distribution Function (CDF) of Packet Length".to_string(),
        axes: Axes::semilog_x("Packet Length (bytes)", "CDF"),
        series,
    }
}

/// Every chart of a session, in render order.
///
/// Per-record charts are numbered from 1, two per record (packet rate, then
/// delay PDF); the combined charts follow under fixed names.
pub fn build_artifacts(session: &AnalysisSession, options: &ChartOptions) -> Vec<Artifact> {
    let mut artifacts = Vec::with_capacity(session.len() * 2 + 2);
    let mut counter = 1;

    for (label, record) in session.labeled_records() {
        artifacts.push(Artifact {
            name: counter.to_string(),
            chart: Chart::PacketRate(packet_rate_chart(&label, record)),
        });
        artifacts.push(Artifact {
            name: (counter + 1).to_string(),
            chart: Chart::DelayPdf(delay_pdf_chart(&label, record, options)),
        });
        counter += 2;
    }

    artifacts.push(Artifact {
        name: "ccdf_combined".to_string(),
        chart: Chart::DelayCcdf(delay_ccdf_chart(session)),
    });
    artifacts.push(Artifact {
        name: "packet_length_cdf".to_string(),
        chart: Chart::PacketLengthCdf(packet_length_cdf_chart(session)),
    });

    artifacts
}
