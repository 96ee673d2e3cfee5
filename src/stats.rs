use crate::models::IndicatorSeries;
use crate::view::{ChartPoint, latest_point};
use serde::{Deserialize, Serialize};

/// Summary statistics for one indicator series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub indicator_id: String,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub latest: Option<ChartPoint>,
}

/// Compute statistics per indicator, in indicator-code order.
pub fn summarize(series: &IndicatorSeries) -> Vec<Summary> {
    let mut out = Vec::new();
    for (indicator_id, points) in series {
        let mut vals: Vec<f64> = points.iter().filter_map(|p| p.value).collect();
        let missing = points.len() - vals.len();
        vals.sort_by(f64::total_cmp);
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            indicator_id: indicator_id.clone(),
            count,
            missing,
            min,
            max,
            mean,
            median,
            latest: latest_point(points),
        });
    }
    out
}
