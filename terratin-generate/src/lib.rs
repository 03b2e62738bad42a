//! Synthetic raster generation
//!
//! Produces square test rasters of integer-valued samples in `[1, maximum]`,
//! either fully random or spatially correlated so that they resemble real
//! elevation data. Values never reach zero, keeping the relative-error
//! metric well-defined on generated input.

use rand::Rng;
use terratin_core::{Error, Raster, Result};

/// Generate an `n x n` raster of uniformly random samples in `[1, maximum]`
pub fn generate_random_raster(n: usize, maximum: u32) -> Result<Raster> {
    check_dimensions(n, maximum)?;
    let mut rng = rand::thread_rng();

    let rows: Vec<Vec<f64>> = (0..n)
        .map(|_| (0..n).map(|_| rng.gen_range(1..=maximum) as f64).collect())
        .collect();
    Raster::from_rows(&rows)
}

/// Generate an `n x n` raster whose samples correlate with their neighbors.
///
/// Each cell follows the previous cell in its row (first row) or the mean
/// of its left and upper neighbors (remaining rows) within a band of
/// `maximum / 10`, clamped to `[1, maximum]`. A rare `1 / (8n)` coin flip
/// resamples a cell uniformly, introducing occasional discontinuities.
pub fn generate_correlated_raster(n: usize, maximum: u32) -> Result<Raster> {
    check_dimensions(n, maximum)?;
    let correlation_width = (maximum / 10) as i64;
    let mut rng = rand::thread_rng();

    let mut rows: Vec<Vec<f64>> = vec![Vec::with_capacity(n); n];
    rows[0].push(rng.gen_range(1..=maximum) as f64);

    // First row correlates each cell with its left neighbor
    for i in 1..n {
        if flip_unfair_coin(&mut rng, n as u32 * 8) {
            rows[0].push(rng.gen_range(1..=maximum) as f64);
        } else {
            let base = rows[0][i - 1] as i64;
            let offset = rng.gen_range(-correlation_width..=correlation_width);
            rows[0].push(clamp_sample(base + offset, maximum));
        }
    }

    // Remaining rows correlate with the left and upper neighbors
    for i in 1..n {
        for j in 0..n {
            if flip_unfair_coin(&mut rng, n as u32 * 8) {
                rows[i].push(rng.gen_range(1..=maximum) as f64);
            } else {
                let base = if j == 0 {
                    rows[i - 1][0] as i64
                } else {
                    ((rows[i][j - 1] + rows[i - 1][j]) / 2.0).floor() as i64
                };
                let offset = rng.gen_range(-correlation_width..=correlation_width);
                rows[i].push(clamp_sample(base + offset, maximum));
            }
        }
    }

    Raster::from_rows(&rows)
}

fn check_dimensions(n: usize, maximum: u32) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidArgument(
            "raster sidelength must be positive".to_string(),
        ));
    }
    if maximum == 0 {
        return Err(Error::InvalidArgument(
            "maximum sample value must be positive".to_string(),
        ));
    }
    Ok(())
}

fn clamp_sample(value: i64, maximum: u32) -> f64 {
    if value <= 0 {
        1.0
    } else if value > maximum as i64 {
        maximum as f64
    } else {
        value as f64
    }
}

/// True roughly once in `n` flips
fn flip_unfair_coin(rng: &mut impl Rng, n: u32) -> bool {
    rng.gen_ratio(1, n.max(2))
}
