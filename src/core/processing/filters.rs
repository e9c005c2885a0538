use ndarray::{Array3, ArrayViewMut1, Axis, Zip};

/// Reflection about the pixel edge: `d c b a | a b c d | d c b a`.
/// Repeats for offsets larger than the line.
pub fn symmetric_index(i: isize, n: usize) -> usize {
    let n = n as isize;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    (if m >= n { period - m - 1 } else { m }) as usize
}

/// Reflection about the edge pixel: `d c b | a b c d | c b a`.
/// Repeats for offsets larger than the line.
pub fn mirror_index(i: isize, n: usize) -> usize {
    if n <= 1 {
        return 0;
    }
    let period = 2 * (n as isize - 1);
    let m = i.rem_euclid(period);
    (if m >= n as isize { period - m } else { m }) as usize
}

/// Normalized gaussian weights truncated at four sigma.
///
/// A non-positive or NaN sigma yields the identity kernel `[1.0]`.
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (4.0 * sigma + 0.5) as i64;
    if radius <= 0 {
        return vec![1.0];
    }
    let s2 = sigma * sigma;
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (-0.5 / s2 * (x * x) as f64).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= sum);
    weights
}

fn correlate_lane(mut lane: ArrayViewMut1<f32>, weights: &[f64]) {
    let n = lane.len();
    let radius = weights.len() / 2;
    let extended: Vec<f64> = (0..n + 2 * radius)
        .map(|m| lane[symmetric_index(m as isize - radius as isize, n)] as f64)
        .collect();
    for i in 0..n {
        let acc: f64 = weights
            .iter()
            .zip(&extended[i..i + weights.len()])
            .map(|(w, v)| w * v)
            .sum();
        lane[i] = acc as f32;
    }
}

/// Gaussian blur over rows and columns of an `(h, w, c)` buffer; channels are
/// filtered independently. Each pass is stored back as `f32`.
pub fn gaussian_filter(img: &mut Array3<f32>, sigma: f64) {
    let weights = gaussian_kernel(sigma);
    if weights.len() == 1 {
        return;
    }
    for axis in [Axis(0), Axis(1)] {
        Zip::from(img.lanes_mut(axis)).par_for_each(|lane| correlate_lane(lane, &weights));
    }
}

fn median(values: &mut [f32]) -> f32 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    let (lower, upper, _) = values.select_nth_unstable_by(mid, f32::total_cmp);
    let upper = *upper;
    if n % 2 == 1 {
        upper
    } else {
        let lower = lower.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        (lower + upper) / 2.0
    }
}

/// Median of every channel of an `(h, w, c)` buffer.
pub fn channel_median(img: &Array3<f32>) -> Vec<f32> {
    (0..img.len_of(Axis(2)))
        .map(|c| {
            let mut values: Vec<f32> = img.index_axis(Axis(2), c).iter().copied().collect();
            median(&mut values)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_index_repeats_edge() {
        let got: Vec<usize> = (-5..9).map(|i| symmetric_index(i, 4)).collect();
        assert_eq!(got, vec![3, 3, 2, 1, 0, 0, 1, 2, 3, 3, 2, 1, 0, 0]);
    }

    #[test]
    fn mirror_index_skips_edge() {
        let got: Vec<usize> = (-5..9).map(|i| mirror_index(i, 4)).collect();
        assert_eq!(got, vec![1, 2, 3, 2, 1, 0, 1, 2, 3, 2, 1, 0, 1, 2]);
        assert_eq!(mirror_index(-7, 1), 0);
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = gaussian_kernel(2.0);
        assert_eq!(k.len(), 17);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(k[0], k[16]);
        assert!(k[8] > k[7]);
        assert_eq!(gaussian_kernel(0.1), vec![1.0]);
        assert_eq!(gaussian_kernel(f64::NAN), vec![1.0]);
    }

    #[test]
    fn blur_preserves_constant_and_spreads_impulse() {
        let mut flat = Array3::<f32>::from_elem((9, 7, 3), 42.0);
        gaussian_filter(&mut flat, 1.5);
        assert!(flat.iter().all(|v| (v - 42.0).abs() < 1e-4));

        let mut img = Array3::<f32>::zeros((15, 15, 1));
        img[[7, 7, 0]] = 100.0;
        gaussian_filter(&mut img, 1.0);
        let total: f32 = img.iter().sum();
        assert!((total - 100.0).abs() < 1e-3);
        assert!(img[[7, 7, 0]] < 100.0);
        assert!(img[[7, 8, 0]] > 0.0);
        assert!((img[[7, 8, 0]] - img[[8, 7, 0]]).abs() < 1e-4);
    }

    #[test]
    fn median_per_channel() {
        let mut img = Array3::<f32>::zeros((2, 2, 2));
        for (i, v) in [1.0, 9.0, 3.0, 4.0].into_iter().enumerate() {
            img[[i / 2, i % 2, 0]] = v;
            img[[i / 2, i % 2, 1]] = 5.0;
        }
        assert_eq!(channel_median(&img), vec![3.5, 5.0]);

        let mut odd = vec![7.0, 1.0, 3.0];
        assert_eq!(median(&mut odd), 3.0);
    }
}
