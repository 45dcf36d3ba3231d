//! Fixed-window kernels shared by the indicators.
//!
//! Rolling extremes use a monotonic deque of indices, so a full pass is O(N)
//! regardless of window size. A window is defined only when it is complete and
//! NaN-free; anything else yields `NaN`, matching the warmup convention of
//! every indicator in this crate.

use std::collections::VecDeque;

/// Rolling maximum over `values[i+1-window..=i]`.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, incumbent| candidate >= incumbent)
}

/// Rolling minimum over `values[i+1-window..=i]`.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, incumbent| candidate <= incumbent)
}

/// Maximum over the centred window `values[i-half..=i+half]`.
///
/// Looks `half` bars ahead. Undefined within `half` bars of either end.
pub fn centered_max(values: &[f64], half: usize) -> Vec<f64> {
    center(&rolling_max(values, 2 * half + 1), half)
}

/// Minimum over the centred window `values[i-half..=i+half]`.
pub fn centered_min(values: &[f64], half: usize) -> Vec<f64> {
    center(&rolling_min(values, 2 * half + 1), half)
}

/// Lag a series by `k` positions; the first `k` positions are `NaN`.
pub fn shift(values: &[f64], k: usize) -> Vec<f64> {
    (0..values.len()).map(|i| lagged(values, i, k)).collect()
}

/// `values[i - k]`, or `NaN` when that position precedes the series.
#[inline]
pub fn lagged(values: &[f64], i: usize, k: usize) -> f64 {
    if i >= k {
        values[i - k]
    } else {
        f64::NAN
    }
}

/// `dominates(candidate, incumbent)` is true when the incumbent can never be
/// the window extreme again once `candidate` has arrived.
fn rolling_extreme(
    values: &[f64],
    window: usize,
    dominates: impl Fn(f64, f64) -> bool,
) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if window == 0 || n < window {
        return result;
    }

    let mut deque: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut last_nan: Option<usize> = None;

    for (i, &v) in values.iter().enumerate() {
        if v.is_nan() {
            last_nan = Some(i);
        } else {
            while let Some(&back) = deque.back() {
                if dominates(v, values[back]) {
                    deque.pop_back();
                } else {
                    break;
                }
            }
            deque.push_back(i);
        }

        if i + 1 < window {
            continue;
        }
        let start = i + 1 - window;
        while deque.front().is_some_and(|&front| front < start) {
            deque.pop_front();
        }
        if last_nan.is_some_and(|k| k >= start) {
            continue;
        }
        if let Some(&front) = deque.front() {
            result[i] = values[front];
        }
    }

    result
}

fn center(trailing: &[f64], half: usize) -> Vec<f64> {
    let n = trailing.len();
    (0..n)
        .map(|i| if i + half < n { trailing[i + half] } else { f64::NAN })
        .collect()
}
