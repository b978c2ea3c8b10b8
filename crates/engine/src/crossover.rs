use screener_core::IndicatorSeries;

/// The latest two indices where both series are defined, as
/// `(previous, latest)` pairs of `(a, b)`.
pub fn last_two_joint(
    a: &IndicatorSeries,
    b: &IndicatorSeries,
) -> Option<((f64, f64), (f64, f64))> {
    let mut joint = a
        .values()
        .iter()
        .zip(b.values())
        .rev()
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)));
    let latest = joint.next()?;
    let previous = joint.next()?;
    Some((previous, latest))
}

/// First line at or below the second before, strictly above it now.
pub fn crosses_above(previous: (f64, f64), latest: (f64, f64)) -> bool {
    previous.0 <= previous.1 && latest.0 > latest.1
}
