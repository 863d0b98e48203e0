//! Summary views computed per request from raw store rows.
//!
//! Each view is a pure fold over rows plus an async entry point that pulls
//! those rows from a [`DashboardStore`](crate::store::DashboardStore). Nothing
//! is cached between requests.

pub mod customers;
pub mod lookup;
pub mod meter_map;
pub mod monthly;
pub mod per_capita;
pub mod stats;
pub mod zones;

/// Receipt window used by the city-wide views.
pub const RECEIPT_WINDOW: i64 = 10_000;

/// Sentinel shown when a customer name cannot be resolved.
pub const UNKNOWN_CUSTOMER: &str = "Desconocido";

pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Treat empty identifiers the same as missing ones.
pub(crate) fn present(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(15.0), 15.0);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(-2.346), -2.35);
    }

    #[test]
    fn blank_ids_are_not_present() {
        assert_eq!(present(Some("m-1")), Some("m-1"));
        assert_eq!(present(Some("  ")), None);
        assert_eq!(present(None), None);
    }
}
