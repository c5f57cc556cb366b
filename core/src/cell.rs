/// Largest digit a cell can hold.
pub const MAX_DIGIT: u8 = 9;

/// Reduces one raw input string to a single cell entry.
///
/// Every character outside `1`–`9` is dropped and an empty remainder clears
/// the cell. When several digits survive, the most recently typed one wins.
pub fn sanitize_entry(raw: &str) -> u8 {
    raw.chars()
        .rev()
        .find(|c| matches!(c, '1'..='9'))
        .map_or(0, |c| c as u8 - b'0')
}

/// Text shown in a cell for a stored entry: the digit, or nothing for blank.
pub const fn display_entry(value: u8) -> &'static str {
    match value {
        1 => "1",
        2 => "2",
        3 => "3",
        4 => "4",
        5 => "5",
        6 => "6",
        7 => "7",
        8 => "8",
        9 => "9",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_digits_pass_through() {
        assert_eq!(sanitize_entry("5"), 5);
        assert_eq!(sanitize_entry("9"), 9);
    }

    #[test]
    fn surrounding_garbage_is_stripped() {
        assert_eq!(sanitize_entry("x3y"), 3);
        assert_eq!(sanitize_entry(" 7 "), 7);
    }

    #[test]
    fn empty_and_digitless_input_clears() {
        assert_eq!(sanitize_entry(""), 0);
        assert_eq!(sanitize_entry("abc"), 0);
        assert_eq!(sanitize_entry("0"), 0);
        assert_eq!(sanitize_entry("."), 0);
    }

    #[test]
    fn the_most_recently_typed_digit_wins() {
        assert_eq!(sanitize_entry("73"), 3);
        assert_eq!(sanitize_entry("1x2"), 2);
    }

    #[test]
    fn display_is_one_digit_or_blank() {
        assert_eq!(display_entry(0), "");
        assert_eq!(display_entry(4), "4");
        assert_eq!(display_entry(9), "9");
        assert_eq!(display_entry(12), "");
    }
}
