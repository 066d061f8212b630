//! Text normalization before parsing.

const PERCENT_WORDS: &[&str] = &["percent", "percentage", "Percent", "Percentage"];

/// Detaches trailing `,` `.` `?` from words and pads the text with spaces.
///
/// ```
/// use eqrank_data::preprocess::space_punctuation;
///
/// assert_eq!(space_punctuation("He had 5, then 3."), " He had 5 , then 3 . ");
/// ```
pub fn space_punctuation(text: &str) -> String {
    let words: Vec<String> = text
        .trim()
        .split(' ')
        .map(|word| match word.chars().last() {
            Some(last @ (',' | '.' | '?')) => {
                format!("{} {}", &word[..word.len() - last.len_utf8()], last)
            }
            _ => word.to_string(),
        })
        .collect();
    format!(" {} ", words.join(" "))
}

/// Rewrites `N percent` as `N/100 times`; `%` counts as ` percent`.
///
/// A leading `$` on the number is dropped. Any other word before a percent
/// word is kept, but the percent word still becomes `times`.
///
/// ```
/// use eqrank_data::preprocess::rewrite_percentages;
///
/// assert_eq!(rewrite_percentages(" He gave 25% of them "), " He gave 0.25 times of them ");
/// ```
pub fn rewrite_percentages(text: &str) -> String {
    let replaced = text.replace('%', " percent");
    let mut words: Vec<String> = replaced.trim().split(' ').map(str::to_string).collect();
    for i in 0..words.len().saturating_sub(1) {
        if !PERCENT_WORDS.contains(&words[i + 1].as_str()) {
            continue;
        }
        let word = &words[i];
        let digits = word.strip_prefix('$').unwrap_or(word);
        if digits.starts_with(|c: char| c.is_ascii_digit()) || word.starts_with('$') {
            if let Ok(value) = digits.parse::<f64>() {
                words[i] = float_text(value / 100.0);
            }
        }
        words[i + 1] = "times".to_string();
    }
    format!(" {} ", words.join(" "))
}

// Whole values keep one decimal (`1.0`), as a float is written in the
// parse cache.
fn float_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Full normalization applied to a problem before it is parsed.
///
/// ```
/// use eqrank_data::preprocess::normalize_text;
///
/// assert_eq!(
///     normalize_text("Tom had 70 seashells. He gave 25% of them to Jessica."),
///     " Tom had 70 seashells . He gave 0.25 times of them to Jessica . "
/// );
/// ```
pub fn normalize_text(text: &str) -> String {
    rewrite_percentages(&space_punctuation(text))
}
