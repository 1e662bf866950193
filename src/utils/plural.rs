//! Count-aware nouns for log and status lines.

/// `"s"` unless `n` is exactly one.
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    match n {
        1 => "",
        _ => "s",
    }
}

/// `3 routes`, `1 route`, `0 routes`.
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plural_s() {
        assert_eq!(plural_s(0), "s");
        assert_eq!(plural_s(1), "");
        assert_eq!(plural_s(2), "s");
    }

    #[test]
    fn test_plural_count() {
        assert_eq!(plural_count(0, "route"), "0 routes");
        assert_eq!(plural_count(1, "route"), "1 route");
        assert_eq!(plural_count(12, "source"), "12 sources");
    }
}
