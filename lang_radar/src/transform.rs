use crate::selector::RankedSeries;

/// The axis maximum never drops below the square root of this percentage.
pub const AXIS_FLOOR_PERCENT: f64 = 20.0;

/// Series ready for a radar chart: square-rooted values and an axis bound.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub suggested_max: f64,
}

/// Square-roots every percentage and leaves 10% headroom above the largest one.
pub fn transform(ranked: &RankedSeries) -> DisplaySeries {
    let values: Vec<f64> = ranked.series.iter().map(|(_, percentage)| percentage.sqrt()).collect();
    let largest = values.iter().copied().fold(0.0, f64::max);
    let suggested_max = AXIS_FLOOR_PERCENT.sqrt().max(largest + largest * 0.1);
    DisplaySeries {
        labels: ranked.labels(),
        values,
        suggested_max,
    }
}

/// Percentage shown to a reader for a transformed value.
pub fn displayed_percentage(value: f64) -> f64 {
    (value * value).round()
}
