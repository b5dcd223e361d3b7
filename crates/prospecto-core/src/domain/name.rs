/// Title-cases a free-text name: lowercase everything, then uppercase the
/// first character of each space-separated token.
///
/// Splits on single spaces, so runs of spaces survive as-is (an empty token
/// rejoins as an extra space). That artifact is pinned by a test below; see
/// DESIGN.md before changing it.
pub fn normalize_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let lowered = raw.to_lowercase();
    let words: Vec<String> = lowered
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let mut out: String = first.to_uppercase().collect();
                    out.push_str(chars.as_str());
                    out
                }
                None => String::new(),
            }
        })
        .collect();

    words.join(" ").trim().to_string()
}
