/// Display text for metrics that cannot be shown as numbers.
pub const NOT_AVAILABLE: &str = "n/a";

fn group_thousands(mut n: u64) -> String {
    let mut groups = Vec::new();
    while n >= 1000 {
        groups.push(format!("{:03}", n % 1000));
        n /= 1000;
    }
    groups.push(n.to_string());
    groups.reverse();
    groups.join(",")
}

/// en-US grouping with at most one decimal: `114416.55` -> `114,416.6`.
pub fn format_number(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let tenths = (value.abs() * 10.0).round() as u64;
    let sign = if value < 0.0 && tenths > 0 { "-" } else { "" };
    let whole = group_thousands(tenths / 10);
    match tenths % 10 {
        0 => format!("{sign}{whole}"),
        d => format!("{sign}{whole}.{d}"),
    }
}

/// Whole US dollars: `13729.986` -> `$13,730`.
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let dollars = value.abs().round() as u64;
    let sign = if value < 0.0 && dollars > 0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(dollars))
}

/// Number followed by a unit suffix, e.g. `81 kW`.
pub fn with_unit(value: f64, unit: &str) -> String {
    format!("{} {unit}", format_number(value))
}
