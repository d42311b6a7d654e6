//! Pure helpers for turning raw form text into chip amounts and names.

use super::models::{Chips, PlayerId};

/// Parse the leading integer of `text`, the way a lenient number field does.
///
/// Leading whitespace and a single `+`/`-` sign are accepted, then the longest
/// run of ASCII digits is read and anything after it is ignored. Returns
/// `None` when no digits follow or the value doesn't fit in [`Chips`].
///
/// ```
/// use chip_tracker::session::functional::parse_chips;
///
/// assert_eq!(parse_chips(" 42"), Some(42));
/// assert_eq!(parse_chips("12abc"), Some(12));
/// assert_eq!(parse_chips("-7"), Some(-7));
/// assert_eq!(parse_chips("abc"), None);
/// ```
#[must_use]
pub fn parse_chips(text: &str) -> Option<Chips> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }

    let digits = &rest[..digits_len];
    if negative {
        format!("-{digits}").parse().ok()
    } else {
        digits.parse().ok()
    }
}

/// Lenient amount: anything unparseable counts as zero.
#[must_use]
pub fn parse_chips_or_zero(text: &str) -> Chips {
    parse_chips(text).unwrap_or(0)
}

/// Starting balance: a non-negative integer, otherwise zero.
#[must_use]
pub fn parse_starting_balance(text: &str) -> Chips {
    parse_chips(text).filter(|&v| v >= 0).unwrap_or(0)
}

/// Display name for a player, falling back to `"<prefix> <id>"` when the
/// draft name is blank.
#[must_use]
pub fn player_name(raw: &str, prefix: &str, id: PlayerId) -> String {
    let name = raw.trim();
    if name.is_empty() {
        format!("{prefix} {id}")
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chips_plain() {
        assert_eq!(parse_chips("0"), Some(0));
        assert_eq!(parse_chips("150"), Some(150));
        assert_eq!(parse_chips("+5"), Some(5));
        assert_eq!(parse_chips("\t 9"), Some(9));
    }

    #[test]
    fn test_parse_chips_trailing_garbage() {
        assert_eq!(parse_chips("50 chips"), Some(50));
        assert_eq!(parse_chips("3.75"), Some(3));
        assert_eq!(parse_chips("1e3"), Some(1));
    }

    #[test]
    fn test_parse_chips_rejects() {
        assert_eq!(parse_chips(""), None);
        assert_eq!(parse_chips("   "), None);
        assert_eq!(parse_chips("-"), None);
        assert_eq!(parse_chips("--5"), None);
        assert_eq!(parse_chips("x5"), None);
        assert_eq!(parse_chips("99999999999999999999"), None);
    }

    #[test]
    fn test_parse_chips_extremes() {
        assert_eq!(parse_chips("9223372036854775807"), Some(Chips::MAX));
        assert_eq!(parse_chips("-9223372036854775808"), Some(Chips::MIN));
    }

    #[test]
    fn test_starting_balance_defaults() {
        assert_eq!(parse_starting_balance("200"), 200);
        assert_eq!(parse_starting_balance("abc"), 0);
        assert_eq!(parse_starting_balance("-20"), 0);
        assert_eq!(parse_starting_balance(""), 0);
    }

    #[test]
    fn test_or_zero() {
        assert_eq!(parse_chips_or_zero("-20"), -20);
        assert_eq!(parse_chips_or_zero("nope"), 0);
    }

    #[test]
    fn test_player_name_default() {
        assert_eq!(player_name("", "Player", 3), "Player 3");
        assert_eq!(player_name("   ", "Spieler", 1), "Spieler 1");
        assert_eq!(player_name(" Ann ", "Player", 1), "Ann");
    }
}
