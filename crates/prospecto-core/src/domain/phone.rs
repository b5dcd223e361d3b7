/// Strips every non-digit character. No length validation and no country-code
/// handling at this stage; the digits come back in their original order.
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|ch| ch.is_ascii_digit()).collect()
}
