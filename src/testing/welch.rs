//! Welch's two-sample t-test
//!
//! Matches the behavior of scipy's `ttest_ind(..., equal_var=False)`:
//! unequal-variance statistic, Welch-Satterthwaite degrees of freedom,
//! two-sided p-value from the Student's t CDF. Degenerate inputs (zero
//! variance in both samples, or a sample with fewer than two values)
//! yield a NaN p-value rather than an error.

use ndarray::ArrayView1;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Outcome of a single Welch's t-test
#[derive(Debug, Clone, Copy)]
pub struct WelchTest {
    /// t statistic (NaN when undefined)
    pub statistic: f64,
    /// Welch-Satterthwaite degrees of freedom (NaN when undefined)
    pub df: f64,
    /// Two-sided p-value (NaN when undefined)
    pub p_value: f64,
}

fn mean(x: ArrayView1<'_, f64>) -> f64 {
    x.sum() / x.len() as f64
}

/// Unbiased sample variance (ddof = 1); NaN for fewer than two values
fn sample_variance(x: ArrayView1<'_, f64>) -> f64 {
    let n = x.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(x);
    x.iter().map(|&v| (v - m).powi(2)).sum::<f64>() / (n - 1) as f64
}

/// Two-sided p-value from a t statistic with `df` degrees of freedom
fn two_sided_pvalue(stat: f64, df: f64) -> f64 {
    if !stat.is_finite() || !df.is_finite() || df <= 0.0 {
        return f64::NAN;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => 2.0 * t_dist.cdf(-stat.abs()),
        Err(_) => f64::NAN,
    }
}

/// Welch's t-test of `a` against `b`.
///
/// The statistic's sign follows `mean(a) - mean(b)`; the p-value is
/// symmetric in the two samples.
pub fn welch_t_test(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> WelchTest {
    let (n_a, n_b) = (a.len() as f64, b.len() as f64);
    let (var_a, var_b) = (sample_variance(a), sample_variance(b));

    // Per-sample variance of the mean
    let vn_a = var_a / n_a;
    let vn_b = var_b / n_b;

    let se = (vn_a + vn_b).sqrt();
    let statistic = (mean(a) - mean(b)) / se;

    // Welch-Satterthwaite approximation; 0/0 when both variances vanish
    let df = (vn_a + vn_b).powi(2)
        / (vn_a.powi(2) / (n_a - 1.0) + vn_b.powi(2) / (n_b - 1.0));

    WelchTest {
        statistic,
        df,
        p_value: two_sided_pvalue(statistic, df),
    }
}
