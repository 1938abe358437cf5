//! Separable box (uniform) filter over a 2-D `f64` array.

use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut1, Axis, Zip};

/// Mean over a `window` x `window` neighbourhood centred on each pixel.
///
/// Samples outside the array are clamped to the nearest edge pixel. Callers
/// crop `(window - 1) / 2` pixels from every side, so edge handling never
/// reaches the averaged result.
pub fn box_filter(data: ArrayView2<f64>, window: usize) -> Array2<f64> {
    debug_assert!(window % 2 == 1);

    let horizontal = blur_lanes(data, Axis(1), window);
    blur_lanes(horizontal.view(), Axis(0), window)
}

/// 1-D box blur of every lane along `axis`
fn blur_lanes(data: ArrayView2<f64>, axis: Axis, window: usize) -> Array2<f64> {
    let mut out = Array2::zeros(data.raw_dim());
    Zip::from(data.lanes(axis))
        .and(out.lanes_mut(axis))
        .for_each(|lane_in, lane_out| blur_lane(lane_in, lane_out, window));
    out
}

fn blur_lane(lane_in: ArrayView1<f64>, mut lane_out: ArrayViewMut1<f64>, window: usize) {
    let radius = (window / 2) as isize;
    let last = lane_in.len() as isize - 1;
    let norm = 1.0 / window as f64;

    for (i, value) in lane_out.iter_mut().enumerate() {
        let i = i as isize;
        let sum: f64 = (i - radius..=i + radius)
            .map(|j| lane_in[j.clamp(0, last) as usize])
            .sum();
        *value = sum * norm;
    }
}
