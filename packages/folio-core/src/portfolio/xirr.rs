//! XIRR (money-weighted annualized return) solver.
//!
//! Finds the rate `r` that zeroes the net present value of irregularly dated
//! cash flows:
//!
//! `f(r) = Σ cf_i / (1 + r)^(t_i)`
//!
//! where `t_i` is the year fraction between transaction `i` and the first
//! transaction. The root is found with Newton-Raphson using the closed-form
//! derivative `f'(r) = Σ -t_i * cf_i / (1 + r)^(t_i + 1)`.

use super::performance::days_between;
use crate::config::SolverPolicy;
use crate::types::Transaction;
use crate::{Error, Result};
use tracing::{debug, warn};

/// Calculate XIRR for a date-ordered list of transactions.
///
/// # Arguments
///
/// * `transactions` - Transactions sorted ascending by date; the first one is time zero
/// * `policy` - Solver settings (initial guess, iteration cap, tolerance)
///
/// # Returns
///
/// The annualized rate in percent rounded to 2 decimals. Fewer than two
/// transactions yield `0.0`. A solve that stalls, diverges or runs out of
/// iterations returns [`Error::NonConvergent`].
pub fn compute_xirr(transactions: &[Transaction], policy: &SolverPolicy) -> Result<f64> {
    if transactions.len() < 2 {
        return Ok(0.0);
    }

    let reference = transactions[0].date;
    let flows: Vec<(f64, f64)> = transactions
        .iter()
        .map(|txn| {
            let years = days_between(reference, txn.date) / policy.days_per_year;
            (years, txn.signed_cash_flow())
        })
        .collect();

    let mut rate = policy.initial_guess;

    for iteration in 0..policy.max_iterations {
        let (f, df) = npv_with_derivative(&flows, rate);

        if !f.is_finite() || !df.is_finite() {
            return Err(non_convergent(iteration, rate, "net present value is not finite"));
        }

        if df.abs() < policy.derivative_floor {
            return Err(non_convergent(iteration, rate, "derivative vanished"));
        }

        let next = rate - f / df;

        if !next.is_finite() || 1.0 + next <= 0.0 {
            return Err(non_convergent(iteration + 1, next, "rate left the domain r > -1"));
        }

        if (next - rate).abs() < policy.tolerance {
            debug!(iterations = iteration + 1, rate = next, "XIRR converged");
            return Ok(round_percent(next));
        }

        rate = next;
    }

    Err(non_convergent(policy.max_iterations, rate, "iteration cap reached"))
}

/// XIRR with the legacy neutral fallback: any solver failure reads as `0.0`.
///
/// Use this only where the output shape cannot carry an error; the failure is
/// logged so it stays visible.
pub fn xirr_or_zero(transactions: &[Transaction], policy: &SolverPolicy) -> f64 {
    match compute_xirr(transactions, policy) {
        Ok(rate) => rate,
        Err(e) => {
            warn!("XIRR unavailable, reporting 0: {}", e);
            0.0
        }
    }
}

/// Net present value and its derivative at `rate` for `(years, cash_flow)` pairs.
fn npv_with_derivative(flows: &[(f64, f64)], rate: f64) -> (f64, f64) {
    let base = 1.0 + rate;
    flows.iter().fold((0.0, 0.0), |(f, df), &(years, cash_flow)| {
        let discount = base.powf(years);
        (
            f + cash_flow / discount,
            df - years * cash_flow / (discount * base),
        )
    })
}

fn round_percent(rate: f64) -> f64 {
    (rate * 100.0 * 100.0).round() / 100.0
}

fn non_convergent(iterations: u32, last_rate: f64, reason: &str) -> Error {
    Error::NonConvergent {
        iterations,
        last_rate,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionType;
    use approx::assert_abs_diff_eq;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
    }

    fn purchase(days: i64, amount: f64) -> Transaction {
        Transaction::new(start() + Duration::days(days), TransactionType::Purchase, amount)
    }

    fn redemption(days: i64, amount: f64) -> Transaction {
        Transaction::new(start() + Duration::days(days), TransactionType::Redemption, amount)
    }

    #[test]
    fn test_ten_percent_over_a_year() {
        let txns = vec![purchase(0, 100_000.0), redemption(365, 110_000.0)];

        let xirr = compute_xirr(&txns, &SolverPolicy::default()).unwrap();

        // 365 days is slightly under one 365.25-day year, so the rate lands at 10.01
        assert_abs_diff_eq!(xirr, 10.0, epsilon = 0.01);
    }

    #[test]
    fn test_loss_over_two_years() {
        // Exactly two 365.25-day years
        let end = start() + Duration::hours(730 * 24 + 12);
        let txns = vec![
            purchase(0, 100_000.0),
            Transaction::new(end, TransactionType::Redemption, 90_000.0),
        ];

        let xirr = compute_xirr(&txns, &SolverPolicy::default()).unwrap();

        // sqrt(0.9) - 1 = -5.13%
        assert_abs_diff_eq!(xirr, -5.13, epsilon = 1e-9);
    }

    #[test]
    fn test_multiple_flows_zero_npv() {
        let txns = vec![
            purchase(0, 10_000.0),
            purchase(181, 10_000.0),
            Transaction::new(start() + Duration::days(200), TransactionType::Dividend, 250.0),
            redemption(365, 21_500.0),
        ];
        let policy = SolverPolicy::default();

        let xirr = compute_xirr(&txns, &policy).unwrap();
        assert!(xirr > 0.0);

        let flows: Vec<(f64, f64)> = txns
            .iter()
            .map(|t| {
                (
                    days_between(txns[0].date, t.date) / policy.days_per_year,
                    t.signed_cash_flow(),
                )
            })
            .collect();
        let (npv, _) = npv_with_derivative(&flows, xirr / 100.0);

        // Rounding to 2 decimals leaves a small residual
        assert!(npv.abs() < 5.0, "npv residual too large: {}", npv);
    }

    #[test]
    fn test_degenerate_inputs() {
        let policy = SolverPolicy::default();

        assert_eq!(compute_xirr(&[], &policy).unwrap(), 0.0);
        assert_eq!(compute_xirr(&[purchase(0, 5000.0)], &policy).unwrap(), 0.0);
    }

    #[test]
    fn test_same_day_flows_vanishing_derivative() {
        let txns = vec![purchase(0, 1000.0), redemption(0, 1100.0)];

        let result = compute_xirr(&txns, &SolverPolicy::default());
        assert!(matches!(result, Err(Error::NonConvergent { .. })));
    }

    #[test]
    fn test_all_inflows_do_not_converge() {
        let txns = vec![redemption(0, 1000.0), redemption(365, 1000.0)];

        let result = compute_xirr(&txns, &SolverPolicy::default());
        assert!(matches!(result, Err(Error::NonConvergent { .. })));
        assert_eq!(xirr_or_zero(&txns, &SolverPolicy::default()), 0.0);
    }

    #[test]
    fn test_iteration_cap() {
        let txns = vec![purchase(0, 100_000.0), redemption(365, 110_000.0)];
        let policy = SolverPolicy {
            max_iterations: 1,
            ..SolverPolicy::default()
        };

        match compute_xirr(&txns, &policy) {
            Err(Error::NonConvergent { iterations, .. }) => assert_eq!(iterations, 1),
            other => panic!("expected non-convergence, got {:?}", other),
        }
    }

    #[test]
    fn test_xirr_or_zero_passes_through() {
        let txns = vec![purchase(0, 100_000.0), redemption(365, 110_000.0)];
        let policy = SolverPolicy::default();

        assert_eq!(
            xirr_or_zero(&txns, &policy),
            compute_xirr(&txns, &policy).unwrap()
        );
    }

    #[test]
    fn test_round_percent() {
        assert_eq!(round_percent(0.123456), 12.35);
        assert_eq!(round_percent(-0.051317), -5.13);
    }
}
