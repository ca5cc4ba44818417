// File: crates/stockchart-core/src/format.rs
// Summary: Compact numeric formatting shared by the price scale and the tooltip.

/// Compact a price/volume value for display.
///
/// - `|v| >= 1e9` → billions, one decimal, trailing `.0` trimmed (`1.5b`)
/// - `|v| >= 1e6` → millions (`2m`), `|v| >= 1e3` → thousands (`1.5k`)
/// - a value that would print as 1000 of one unit moves to the next (`999_999` → `1m`)
/// - `0 < |v| < 0.01` → scientific with one decimal (`5.0e-3`)
/// - otherwise integral values print without decimals, `|v| < 1` with two, the rest with one.
///
/// Non-finite input renders as `-`.
pub fn format_compact(v: f64) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let a = v.abs();
    if let Some(i) = unit_for(a) {
        let (scale, suffix) = UNITS[i];
        return format!("{}{suffix}", one_decimal_trimmed(v / scale));
    }
    if a != 0.0 && a < 0.01 {
        return format!("{v:.1e}");
    }
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else if a < 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.1}")
    }
}

const UNITS: [(f64, &str); 3] = [(1e3, "k"), (1e6, "m"), (1e9, "b")];

/// Index into `UNITS` for `a`, promoted while the printed value would read 1000 of a unit.
fn unit_for(a: f64) -> Option<usize> {
    let mut unit = UNITS.iter().rposition(|&(scale, _)| a >= scale);
    if unit.is_none() && printed_tenths(a) >= 1e3 {
        unit = Some(0);
    }
    while let Some(i) = unit {
        if i + 1 < UNITS.len() && printed_tenths(a / UNITS[i].0) >= 1e3 {
            unit = Some(i + 1);
        } else {
            break;
        }
    }
    unit
}

/// `x` as it reads after one-decimal formatting.
fn printed_tenths(x: f64) -> f64 {
    format!("{x:.1}").parse().unwrap_or(x)
}

fn one_decimal_trimmed(x: f64) -> String {
    let s = format!("{x:.1}");
    match s.strip_suffix(".0") {
        Some(trimmed) => trimmed.to_string(),
        None => s,
    }
}
