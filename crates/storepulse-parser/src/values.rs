//! Fail-soft converters for the textual value encodings found in marketplace
//! exports. A malformed cell degrades to zero; it must never abort a file.

use once_cell::sync::Lazy;
use regex::Regex;

/// Parse a currency string such as `"฿1,234.56"` into a plain float.
///
/// Strips the baht glyph, thousands separators and stray quotes. Returns
/// `0.0` for anything unparseable, including the empty string. Callers must
/// not rely on distinguishing a genuine zero from a malformed cell.
pub fn parse_currency(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '฿' | ',' | '"'))
        .collect();
    cleaned.trim().parse::<f64>().unwrap_or(0.0)
}

/// Parse a percentage string into a 0.0–1.0 fraction.
///
/// `"15.5%"` and `"0.155"` both yield `0.155`: when the stripped magnitude
/// exceeds 1 the value is assumed to be a whole-number percent and divided
/// by 100. The magnitude heuristic can misread a genuinely large fraction;
/// it is kept for compatibility with the upstream exports, which carry no
/// reliable scale signal. Returns `0.0` on failure.
pub fn parse_percentage(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '%' | ','))
        .collect();
    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.abs() > 1.0 => value / 100.0,
        Ok(value) => value,
        Err(_) => 0.0,
    }
}

static HOURS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:ชั่วโมง|h)").expect("hours regex"));
static MINUTES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:นาที|min)").expect("minutes regex"));
static SECONDS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:วินาที|s)(?:$|[^a-z])").expect("seconds regex"));

/// Parse a duration string into total seconds.
///
/// Components are identified by fixed unit markers; both the Thai form
/// (`"4ชั่วโมง9นาที28วินาที"`) and the latin form (`"7h 12min 30s"`) occur
/// in the source exports. Returns `0` when no component matches.
pub fn parse_duration(text: &str) -> i64 {
    let hours = capture_component(&HOURS_RE, text);
    let minutes = capture_component(&MINUTES_RE, text);
    let seconds = capture_component(&SECONDS_RE, text);
    hours * 3600 + minutes * 60 + seconds
}

fn capture_component(re: &Regex, text: &str) -> i64 {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_strips_glyph_and_separators() {
        assert_eq!(parse_currency("฿1,234.56"), 1234.56);
        assert_eq!(parse_currency("1234.56"), 1234.56);
        assert_eq!(parse_currency(" ฿99 "), 99.0);
    }

    #[test]
    fn currency_degrades_to_zero() {
        assert_eq!(parse_currency(""), 0.0);
        assert_eq!(parse_currency("N/A"), 0.0);
        assert_eq!(parse_currency("฿"), 0.0);
    }

    #[test]
    fn percentage_handles_both_scales() {
        assert_eq!(parse_percentage("15.5%"), 0.155);
        assert_eq!(parse_percentage("0.155"), 0.155);
        // idempotent under the magnitude heuristic
        assert_eq!(
            parse_percentage(&parse_percentage("15.5%").to_string()),
            0.155
        );
    }

    #[test]
    fn percentage_degrades_to_zero() {
        assert_eq!(parse_percentage(""), 0.0);
        assert_eq!(parse_percentage("-"), 0.0);
    }

    #[test]
    fn duration_parses_thai_markers() {
        assert_eq!(parse_duration("4ชั่วโมง9นาที28วินาที"), 4 * 3600 + 9 * 60 + 28);
        assert_eq!(parse_duration("59นาที"), 59 * 60);
    }

    #[test]
    fn duration_parses_latin_markers() {
        assert_eq!(parse_duration("7h 12min"), 7 * 3600 + 12 * 60);
        assert_eq!(parse_duration("45min 30s"), 45 * 60 + 30);
        assert_eq!(parse_duration("2h"), 2 * 3600);
    }

    #[test]
    fn duration_without_markers_is_zero() {
        assert_eq!(parse_duration("123"), 0);
        assert_eq!(parse_duration(""), 0);
    }
}
