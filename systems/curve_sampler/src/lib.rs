#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that discretizes strength and milestone-level curves into
//! median and range series suitable for charting.

use xp_planner_core::{ChartSeries, MedianPoint, RangePoint, StrengthCurve};

/// Span of the progress axis covered by the milestone-level sampler.
const PROGRESS_SPAN: f64 = 100.0;

/// Multipliers applied to a median value to derive the surrounding range band.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeBand {
    min_factor: f64,
    max_factor: f64,
}

impl RangeBand {
    /// Creates a band whose lower edge is `median * min_factor` and whose upper
    /// edge is `median * max_factor`.
    #[must_use]
    pub const fn new(min_factor: f64, max_factor: f64) -> Self {
        Self {
            min_factor,
            max_factor,
        }
    }
}

/// Stateless sampler producing chart series from curves.
#[derive(Debug, Default)]
pub struct CurveSampler;

impl CurveSampler {
    /// Samples `curve` at `resolution + 1` evenly spaced points.
    ///
    /// Sample `x` is evaluated at progress `x / 100`, so a resolution of 100
    /// spans the whole game. The median is the clamped curve value and the
    /// range widens it by `band`. Any previous content of `out` is discarded.
    pub fn sample_strength(
        &self,
        curve: &StrengthCurve,
        resolution: u32,
        band: RangeBand,
        out: &mut ChartSeries,
    ) {
        out.clear();
        out.median.reserve(resolution as usize + 1);
        out.range.reserve(resolution as usize + 1);

        for step in 0..=resolution {
            let x = f64::from(step);
            let median = curve.evaluate(x / PROGRESS_SPAN, 1.0);
            out.median.push(MedianPoint { x, y: median });
            out.range.push(RangePoint {
                x,
                low: median * band.min_factor,
                high: median * band.max_factor,
            });
        }
    }

    /// Produces one point per milestone, spread evenly across the progress axis.
    ///
    /// The first range starts at `floor`; every later range starts at the
    /// previous milestone scaled by the band's lower factor. Upper edges scale the
    /// milestone itself by the band's upper factor. Empty input yields empty series.
    pub fn sample_milestones(
        &self,
        milestones: &[f64],
        band: RangeBand,
        floor: f64,
        out: &mut ChartSeries,
    ) {
        out.clear();
        if milestones.is_empty() {
            return;
        }

        let spacing = if milestones.len() > 1 {
            PROGRESS_SPAN / (milestones.len() - 1) as f64
        } else {
            0.0
        };

        let mut previous: Option<f64> = None;
        for (index, &level) in milestones.iter().enumerate() {
            let x = index as f64 * spacing;
            let low = previous.map_or(floor, |prior| prior * band.min_factor);
            out.median.push(MedianPoint { x, y: level });
            out.range.push(RangePoint {
                x,
                low,
                high: level * band.max_factor,
            });
            previous = Some(level);
        }
    }
}
