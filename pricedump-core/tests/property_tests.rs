//! Property tests for the Adjuster.
//!
//! Uses proptest to verify:
//! 1. Without an adjusted close, open/close pass through and high/low bracket them
//! 2. An adjusted close equal to close leaves a consistent bar untouched
//! 3. Normalizing normalized output is a fixed point
//! 4. High/low always equal max/min of the four emitted prices

use chrono::NaiveDate;
use pricedump_core::data::{epoch_seconds, normalize, normalize_bar, NormalizedBar, RawBar};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (0.01..5000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0i64..20_000).prop_map(|d| {
        NaiveDate::from_ymd_opt(1970, 1, 1).unwrap() + chrono::Duration::days(d)
    })
}

/// Four arbitrary prices, not necessarily consistent with each other.
fn arb_raw_bar() -> impl Strategy<Value = RawBar> {
    (arb_date(), arb_price(), arb_price(), arb_price(), arb_price())
        .prop_map(|(date, o, h, l, c)| RawBar::new(date, o, h, l, c))
}

/// A bar with low <= open, close <= high.
fn arb_consistent_bar() -> impl Strategy<Value = RawBar> {
    (arb_date(), arb_price(), arb_price(), 0.0..50.0_f64, 0.0..50.0_f64).prop_map(
        |(date, o, c, up, down)| {
            let high = o.max(c) + up;
            let low = (o.min(c) - down).max(0.0);
            RawBar::new(date, o, high, low, c)
        },
    )
}

fn max4(b: &NormalizedBar) -> f64 {
    b.open.max(b.high).max(b.low).max(b.close)
}

fn min4(b: &NormalizedBar) -> f64 {
    b.open.min(b.high).min(b.low).min(b.close)
}

proptest! {
    #[test]
    fn unadjusted_open_close_pass_through(bar in arb_raw_bar()) {
        let out = normalize_bar(&bar).unwrap();
        let (o, h, l, c) = (
            bar.open.unwrap(),
            bar.high.unwrap(),
            bar.low.unwrap(),
            bar.close.unwrap(),
        );
        prop_assert_eq!(out.open, o);
        prop_assert_eq!(out.close, c);
        prop_assert_eq!(out.high, o.max(h).max(l).max(c));
        prop_assert_eq!(out.low, o.min(h).min(l).min(c));
        prop_assert_eq!(out.date, epoch_seconds(bar.date));
    }

    #[test]
    fn unit_scale_is_noop_on_consistent_bars(bar in arb_consistent_bar()) {
        let close = bar.close.unwrap();
        let adjusted = bar.clone().with_adj_close(close);
        let out = normalize_bar(&adjusted).unwrap();
        prop_assert_eq!(out.open, bar.open.unwrap());
        prop_assert_eq!(out.high, bar.high.unwrap());
        prop_assert_eq!(out.low, bar.low.unwrap());
        prop_assert_eq!(out.close, close);
    }

    #[test]
    fn normalize_is_idempotent(bar in arb_raw_bar(), adj in proptest::option::of(arb_price())) {
        let mut raw = bar;
        raw.adj_close = adj;
        let once = normalize_bar(&raw).unwrap();

        let again = RawBar::new(raw.date, once.open, once.high, once.low, once.close);
        let twice = normalize_bar(&again).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn high_low_bracket_emitted_prices(bar in arb_raw_bar(), adj in arb_price()) {
        let out = normalize_bar(&bar.with_adj_close(adj)).unwrap();
        prop_assert_eq!(out.high, max4(&out));
        prop_assert_eq!(out.low, min4(&out));
        prop_assert!(out.low <= out.open && out.open <= out.high);
        prop_assert!(out.low <= out.close && out.close <= out.high);
    }

    #[test]
    fn series_preserves_length_and_order(mut bars in proptest::collection::vec(arb_raw_bar(), 0..50)) {
        bars.sort_by_key(|b| b.date);
        let out = normalize(&bars).unwrap();
        prop_assert_eq!(out.len(), bars.len());
        for (raw, norm) in bars.iter().zip(&out) {
            prop_assert_eq!(norm.date, epoch_seconds(raw.date));
        }
    }
}
