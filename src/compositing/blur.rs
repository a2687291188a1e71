//! Separable Gaussian blur over a single alpha plane, used for the drop shadow.

/// Normalized 1D Gaussian kernel spanning about six sigma, always odd.
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    let size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = size / 2;

    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }
    kernel
}

/// Blurs a row-major `width x height` alpha plane. Edges are treated as zero,
/// so a shape blurs out into empty space instead of smearing its border.
pub fn blur_alpha(alpha: &[f32], width: usize, height: usize, sigma: f32) -> Vec<f32> {
    debug_assert_eq!(alpha.len(), width * height);
    let kernel = gaussian_kernel_1d(sigma);
    if kernel.len() == 1 {
        return alpha.to_vec();
    }
    let half = (kernel.len() / 2) as isize;

    let mut temp = vec![0.0f32; alpha.len()];
    for y in 0..height {
        let row = &alpha[y * width..(y + 1) * width];
        for x in 0..width {
            let mut sum = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sx = x as isize + k as isize - half;
                if sx >= 0 && (sx as usize) < width {
                    sum += row[sx as usize] * weight;
                }
            }
            temp[y * width + x] = sum;
        }
    }

    let mut result = vec![0.0f32; alpha.len()];
    for y in 0..height {
        for x in 0..width {
            let mut sum = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let sy = y as isize + k as isize - half;
                if sy >= 0 && (sy as usize) < height {
                    sum += temp[sy as usize * width + x] * weight;
                }
            }
            result[y * width + x] = sum;
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn kernel_is_normalized_and_odd() {
        let kernel = gaussian_kernel_1d(3.0);
        assert_eq!(kernel.len() % 2, 1);
        assert_relative_eq!(kernel.iter().sum::<f32>(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_sigma_is_identity() {
        let alpha = vec![0.0, 1.0, 0.5, 0.25];
        assert_eq!(blur_alpha(&alpha, 2, 2, 0.0), alpha);
    }

    #[test]
    fn blur_spreads_and_conserves_interior_mass() {
        let mut alpha = vec![0.0f32; 21 * 21];
        alpha[10 * 21 + 10] = 1.0;
        let blurred = blur_alpha(&alpha, 21, 21, 1.5);
        assert!(blurred[10 * 21 + 10] < 1.0);
        assert!(blurred[10 * 21 + 11] > 0.0);
        assert_relative_eq!(blurred.iter().sum::<f32>(), 1.0, epsilon = 1e-3);
    }
}
