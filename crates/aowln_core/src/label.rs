//! Caption wrapping for long class and property names.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Labels up to this many characters are left on one line.
pub const WRAP_THRESHOLD: usize = 10;

static CAMEL_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-z]{5,})([A-Z])").expect("camel-case boundary pattern is valid")
});

/// Breaks a long label at camel-case boundaries that follow a lowercase run of
/// at least five characters, e.g. `hasGrandparent` stays but
/// `isResponsibleFor` becomes `isResponsible\nFor`.
pub fn wrap_label(label: &str) -> Cow<'_, str> {
    if label.chars().count() <= WRAP_THRESHOLD {
        return Cow::Borrowed(label);
    }
    CAMEL_BOUNDARY.replace_all(label, "$1\n$2")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_label_untouched() {
        assert_eq!(wrap_label("hasChildX"), "hasChildX");
        assert!(matches!(wrap_label("shortLabel"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_long_label_wrapped() {
        assert_eq!(wrap_label("isResponsibleFor"), "isResponsible\nFor");
        assert_eq!(wrap_label("measurementValue"), "measurement\nValue");
    }

    #[test]
    fn test_short_runs_not_wrapped() {
        // lowercase runs of fewer than five characters never break
        assert_eq!(wrap_label("hasGrandParent"), "hasGrandParent");
        assert_eq!(wrap_label("isAKindOfThing"), "isAKindOfThing");
    }

    #[test]
    fn test_every_boundary_wrapped() {
        assert_eq!(
            wrap_label("measuredValuesAmount"),
            "measured\nValues\nAmount"
        );
    }
}
