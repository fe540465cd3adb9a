//! Shared result alias.
//!
//! Crates keep their own error enums and return them inside a rootcause
//! `Report`, so callers can still match on the typed context.

use rootcause::Report;

/// `Result` carrying a `Report` whose context is `C`.
pub type Result<T, C = ()> = std::result::Result<T, Report<C>>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug, PartialEq)]
    struct Lookup(u32);

    impl fmt::Display for Lookup {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "no entry {}", self.0)
        }
    }

    impl std::error::Error for Lookup {}

    fn find(key: u32) -> Result<&'static str, Lookup> {
        match key {
            1 => Ok("one"),
            other => Err(Lookup(other).into()),
        }
    }

    #[test]
    fn typed_context_survives_the_report() {
        assert_eq!(find(1).expect("found"), "one");
        let err = find(7).unwrap_err();
        assert_eq!(err.current_context(), &Lookup(7));
    }
}
