#![forbid(unsafe_code)]

//! Literal rendering: strings, numbers, regular expressions.

use crate::options::QuoteStyle;

/// Render `s` as a quoted JavaScript string literal.
///
/// Works on UTF-16 code units, as the language does: printable ASCII and
/// non-ASCII letters/digits pass through, everything else is escaped.
/// Lone and paired surrogates (astral characters) are always escaped.
pub(crate) fn quote_string(s: &str, style: QuoteStyle) -> String {
    let units: Vec<u16> = s.encode_utf16().collect();
    let mut body = String::with_capacity(s.len());
    let mut singles = 0usize;
    let mut doubles = 0usize;

    for (i, &unit) in units.iter().enumerate() {
        match unit {
            0x27 => {
                singles += 1;
                body.push('\'');
            }
            0x22 => {
                doubles += 1;
                body.push('"');
            }
            0x5C => body.push_str("\\\\"),
            0x0A => body.push_str("\\n"),
            0x0D => body.push_str("\\r"),
            0x2028 => body.push_str("\\u2028"),
            0x2029 => body.push_str("\\u2029"),
            0x20..=0x7E => body.push(char::from(unit as u8)),
            _ if is_identifier_part(unit) => {
                if let Some(c) = char::from_u32(u32::from(unit)) {
                    body.push(c);
                }
            }
            _ => escape_unit(&mut body, unit, units.get(i + 1).copied()),
        }
    }

    let single = match style {
        QuoteStyle::Single => true,
        QuoteStyle::Double => false,
        QuoteStyle::Auto => doubles >= singles,
    };
    let (quote, count) = if single { ('\'', singles) } else { ('"', doubles) };

    let mut out = String::with_capacity(body.len() + count + 2);
    out.push(quote);
    if count == 0 {
        out.push_str(&body);
    } else {
        for c in body.chars() {
            if c == quote {
                out.push('\\');
            }
            out.push(c);
        }
    }
    out.push(quote);
    out
}

fn is_identifier_part(unit: u16) -> bool {
    if unit < 0x80 || (0xD800..=0xDFFF).contains(&unit) {
        return false;
    }
    char::from_u32(u32::from(unit)).is_some_and(|c| c.is_alphanumeric())
}

fn escape_unit(out: &mut String, unit: u16, next: Option<u16>) {
    match unit {
        0x08 => out.push_str("\\b"),
        0x0C => out.push_str("\\f"),
        0x09 => out.push_str("\\t"),
        0x00 if !next.is_some_and(|n| (0x30..=0x39).contains(&n)) => out.push_str("\\0"),
        u if u > 0xFF => out.push_str(&format!("\\u{u:04X}")),
        u => out.push_str(&format!("\\x{u:02X}")),
    }
}

/// Render a non-negative finite number the way `Number.prototype.toString` does.
///
/// Returns `None` for negative or non-finite values; such values cannot be a
/// numeric literal on their own.
pub(crate) fn format_number(value: f64) -> Option<String> {
    if !value.is_finite() || value.is_sign_negative() {
        return None;
    }
    if value == 0.0 {
        return Some("0".to_string());
    }

    // `{:e}` yields the shortest round-tripping digits, e.g. "1.2345e3".
    let sci = format!("{value:e}");
    let (mantissa, exp) = sci.split_once('e')?;
    let exp: i32 = exp.parse().ok()?;
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exp + 1;

    let out = if k <= n && n <= 21 {
        let mut s = digits;
        s.extend(std::iter::repeat_n('0', (n - k) as usize));
        s
    } else if 0 < n && n <= 21 {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if -6 < n && n <= 0 {
        let mut s = String::from("0.");
        s.extend(std::iter::repeat_n('0', (-n) as usize));
        s.push_str(&digits);
        s
    } else {
        let (first, rest) = digits.split_at(1);
        let sign = if n - 1 < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{first}e{sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{sign}{}", (n - 1).abs())
        }
    };
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn plain_strings_are_single_quoted() {
        assert_eq!(quote_string("hello", QuoteStyle::Single), "'hello'");
        assert_eq!(quote_string("", QuoteStyle::Single), "''");
    }

    #[test]
    fn quotes_are_escaped_for_the_chosen_style() {
        assert_eq!(quote_string("it's", QuoteStyle::Single), r"'it\'s'");
        assert_eq!(quote_string("it's", QuoteStyle::Double), "\"it's\"");
        assert_eq!(quote_string("it's", QuoteStyle::Auto), "\"it's\"");
        assert_eq!(quote_string(r#"say "hi""#, QuoteStyle::Auto), r#"'say "hi"'"#);
    }

    #[test]
    fn control_and_line_terminators_escape() {
        assert_eq!(quote_string("a\nb\tc\\", QuoteStyle::Single), r"'a\nb\tc\\'");
        assert_eq!(quote_string("\u{0}", QuoteStyle::Single), r"'\0'");
        assert_eq!(quote_string("\u{0}1", QuoteStyle::Single), r"'\x001'");
        assert_eq!(quote_string("\u{7f}", QuoteStyle::Single), r"'\x7F'");
        assert_eq!(quote_string("\u{2028}", QuoteStyle::Single), r"'\u2028'");
    }

    #[test]
    fn letters_pass_through_but_symbols_and_astral_escape() {
        assert_eq!(quote_string("café λ", QuoteStyle::Single), "'café λ'");
        assert_eq!(quote_string("©", QuoteStyle::Single), r"'\xA9'");
        assert_eq!(quote_string("😀", QuoteStyle::Single), r"'\uD83D\uDE00'");
    }

    #[test]
    fn numbers_follow_js_to_string() {
        assert_eq!(format_number(0.0).unwrap(), "0");
        assert_eq!(format_number(42.0).unwrap(), "42");
        assert_eq!(format_number(1.5).unwrap(), "1.5");
        assert_eq!(format_number(0.1).unwrap(), "0.1");
        assert_eq!(format_number(1e21).unwrap(), "1e+21");
        assert_eq!(format_number(123e20).unwrap(), "1.23e+22");
        assert_eq!(format_number(1e20).unwrap(), "100000000000000000000");
        assert_eq!(format_number(0.000001).unwrap(), "0.000001");
        assert_eq!(format_number(1e-7).unwrap(), "1e-7");
        assert_eq!(format_number(1.25e-7).unwrap(), "1.25e-7");
    }

    #[test]
    fn negative_numbers_are_rejected() {
        assert_eq!(format_number(-1.0), None);
        assert_eq!(format_number(f64::INFINITY), None);
    }
}
