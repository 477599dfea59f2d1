//! "mm:ss" mile pace helpers.

/// Parse "mm:ss" into total seconds. Anything else yields `None`.
pub fn pace_to_seconds(pace: &str) -> Option<u32> {
    let (m, s) = pace.trim().split_once(':')?;
    let minutes: u32 = m.trim().parse().ok()?;
    let seconds: u32 = s.trim().parse().ok()?;
    minutes.checked_mul(60)?.checked_add(seconds)
}

/// The faster of two paces.
///
/// When only one side parses, that side wins. When neither does, `b` is
/// returned unless it is empty.
pub fn better_pace<'a>(a: &'a str, b: &'a str) -> &'a str {
    match (pace_to_seconds(a), pace_to_seconds(b)) {
        (Some(sa), Some(sb)) => {
            if sa <= sb {
                a
            } else {
                b
            }
        }
        (Some(_), None) => a,
        (None, Some(_)) => b,
        (None, None) => {
            if b.is_empty() {
                a
            } else {
                b
            }
        }
    }
}
