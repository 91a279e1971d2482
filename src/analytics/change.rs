use crate::analytics::types::{Trend, TrendDirection};

/// Percentage change from `previous` to `current`, reported as an absolute
/// magnitude plus a direction.
///
/// | previous | current | value                      | trend           |
/// |----------|---------|----------------------------|-----------------|
/// | 0        | > 0     | 100                        | up              |
/// | 0        | 0       | 0                          | neutral         |
/// | > 0      | any     | \|(c - p) / p\| * 100      | sign of (c - p) |
///
/// No rounding is applied here.
pub fn calculate_percentage_change(current: f64, previous: f64) -> Trend {
    if previous == 0.0 {
        return if current > 0.0 {
            Trend {
                value: 100.0,
                trend: TrendDirection::Up,
            }
        } else {
            Trend {
                value: 0.0,
                trend: TrendDirection::Neutral,
            }
        };
    }

    let change = (current - previous) / previous * 100.0;
    let trend = match change {
        c if c > 0.0 => TrendDirection::Up,
        c if c < 0.0 => TrendDirection::Down,
        _ => TrendDirection::Neutral,
    };

    Trend {
        value: change.abs(),
        trend,
    }
}
