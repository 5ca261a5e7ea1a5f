//! Hex digit helpers for `\uHHHH` escapes.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Value of a single hex digit, either case.
pub(crate) fn digit_value(c: char) -> Option<u16> {
    match c {
        '0'..='9' => Some(c as u16 - '0' as u16),
        'a'..='f' => Some(c as u16 - 'a' as u16 + 10),
        'A'..='F' => Some(c as u16 - 'A' as u16 + 10),
        _ => None,
    }
}

/// Append `\u` and four lowercase hex digits for one UTF-16 code unit.
pub(crate) fn push_unicode_escape(out: &mut String, unit: u16) {
    out.push_str("\\u");
    for shift in [12, 8, 4, 0] {
        out.push(HEX[((unit >> shift) & 0x0f) as usize] as char);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_either_case() {
        assert_eq!(digit_value('0'), Some(0));
        assert_eq!(digit_value('9'), Some(9));
        assert_eq!(digit_value('a'), Some(10));
        assert_eq!(digit_value('F'), Some(15));
        assert_eq!(digit_value('g'), None);
        assert_eq!(digit_value('\u{ff10}'), None);
    }

    #[test]
    fn escape_is_zero_padded_lowercase() {
        let mut out = String::new();
        push_unicode_escape(&mut out, 0x0000);
        push_unicode_escape(&mut out, 0x00e9);
        push_unicode_escape(&mut out, 0xd83d);
        assert_eq!(out, "\\u0000\\u00e9\\ud83d");
    }
}
