//! Portfolio metrics: pure functions over a value series or its daily returns.

/// Trading days per year, used to scale the risk-free rate and the Sharpe ratio.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Daily returns of `values`, the first one measured against `initial`.
///
/// A non-positive previous value yields a 0.0 return.
pub fn period_returns(initial: f64, values: &[f64]) -> Vec<f64> {
    let mut previous = initial;
    values
        .iter()
        .map(|&value| {
            let r = if previous > 0.0 {
                (value - previous) / previous
            } else {
                0.0
            };
            previous = value;
            r
        })
        .collect()
}

/// Total return as a fraction: final / initial - 1.
pub fn total_return(initial: f64, values: &[f64]) -> f64 {
    match values.last() {
        Some(&last) if initial > 0.0 => last / initial - 1.0,
        _ => 0.0,
    }
}

/// Population standard deviation of daily returns (not annualized).
pub fn volatility(returns: &[f64]) -> f64 {
    if returns.is_empty() {
        return 0.0;
    }
    let mean = mean_f64(returns);
    let variance =
        returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / returns.len() as f64;
    variance.sqrt()
}

/// Maximum drawdown as a positive fraction (0.25 = 25% below the running peak).
///
/// The peak starts at the first value.
pub fn max_drawdown(values: &[f64]) -> f64 {
    let Some(&first) = values.first() else {
        return 0.0;
    };
    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &value in values {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            max_dd = max_dd.max((peak - value) / peak);
        }
    }
    max_dd
}

/// Annualized Sharpe ratio from daily returns and an annual risk-free rate.
///
/// Sharpe = (mean daily return - rf / 252) / volatility * sqrt(252).
/// Returns 0.0 when volatility is zero.
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let vol = volatility(returns);
    if vol < 1e-15 {
        return 0.0;
    }
    let excess = mean_f64(returns) - risk_free_rate / TRADING_DAYS_PER_YEAR;
    excess / vol * TRADING_DAYS_PER_YEAR.sqrt()
}

fn mean_f64(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    // ── Returns ──

    #[test]
    fn first_return_is_against_initial_capital() {
        let r = period_returns(100.0, &[110.0, 99.0]);
        assert_eq!(r.len(), 2);
        assert!(close(r[0], 0.1));
        assert!(close(r[1], -0.1));
    }

    #[test]
    fn zero_previous_value_gives_zero_return() {
        assert_eq!(period_returns(0.0, &[10.0]), vec![0.0]);
    }

    #[test]
    fn total_return_uses_last_value() {
        assert!(close(total_return(1_000.0, &[900.0, 1_100.0]), 0.1));
        assert_eq!(total_return(1_000.0, &[]), 0.0);
    }

    // ── Volatility ──

    #[test]
    fn volatility_is_population_std() {
        assert!(close(volatility(&[0.01, -0.01]), 0.01));
        assert!(close(volatility(&[0.0, 0.5]), 0.25));
    }

    #[test]
    fn volatility_of_constant_returns_is_zero() {
        assert!(volatility(&[0.02; 10]) < 1e-15);
        assert_eq!(volatility(&[]), 0.0);
    }

    // ── Drawdown ──

    #[test]
    fn drawdown_from_running_peak() {
        let dd = max_drawdown(&[100.0, 120.0, 90.0, 130.0, 65.0]);
        assert!(close(dd, 0.5));
    }

    #[test]
    fn rising_series_has_no_drawdown() {
        assert_eq!(max_drawdown(&[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(max_drawdown(&[]), 0.0);
    }

    // ── Sharpe ──

    #[test]
    fn sharpe_zero_volatility_is_zero() {
        assert_eq!(sharpe_ratio(&[0.001; 50], 0.01), 0.0);
    }

    #[test]
    fn sharpe_subtracts_daily_risk_free() {
        let returns = [0.0, 0.5];
        let expected = (0.25 - 0.01 / 252.0) / 0.25 * 252.0_f64.sqrt();
        assert!(close(sharpe_ratio(&returns, 0.01), expected));
    }

    #[test]
    fn sharpe_is_negative_for_losing_returns() {
        assert!(sharpe_ratio(&[-0.01, -0.02, 0.005], 0.0) < 0.0);
    }
}
