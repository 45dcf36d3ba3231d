//! Exponentially weighted mean with span-derived smoothing.
//!
//! alpha = 2 / (span + 1). The average is the *adjusted* form: at step t it
//! is the weighted mean of every observation so far with weights
//! (1 - alpha)^age, normalised by the running weight sum. Leading NaNs are
//! skipped; the first observation seeds the average. An interior NaN keeps the
//! previous average but still ages the accumulated weight.

/// Exponentially weighted mean of `values` with the given span.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n == 0 || span == 0 {
        return result;
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut weighted = values[0];
    let mut old_weight = 1.0;
    result[0] = weighted;

    for i in 1..n {
        let cur = values[i];
        let is_observation = !cur.is_nan();

        if !weighted.is_nan() {
            old_weight *= decay;
            if is_observation {
                if weighted != cur {
                    weighted = (old_weight * weighted + cur) / (old_weight + 1.0);
                }
                old_weight += 1.0;
            }
        } else if is_observation {
            weighted = cur;
        }

        result[i] = weighted;
    }

    result
}
