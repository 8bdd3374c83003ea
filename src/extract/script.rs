/// First code point of the Malayalam Unicode block.
const MALAYALAM_FIRST: char = '\u{0D00}';
/// Last code point of the Malayalam Unicode block.
const MALAYALAM_LAST: char = '\u{0D7F}';

/// Returns true for characters inside the Malayalam block (U+0D00-U+0D7F).
pub fn is_malayalam(ch: char) -> bool {
    (MALAYALAM_FIRST..=MALAYALAM_LAST).contains(&ch)
}

/// Reduces arbitrary text to its Malayalam content.
///
/// Contiguous runs of Malayalam characters are retained in order and
/// joined with single spaces; everything else, including the whitespace
/// that separated runs in the input, is dropped. Input with no Malayalam
/// characters yields an empty string.
///
/// # Examples
///
/// ```
/// use ezhuthu::extract::malayalam_runs;
///
/// assert_eq!(malayalam_runs("hello ആൽഫ world ബീറ്റ"), "ആൽഫ ബീറ്റ");
/// assert_eq!(malayalam_runs("plain latin"), "");
/// ```
pub fn malayalam_runs(input: &str) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in input.chars() {
        if is_malayalam(ch) {
            current.push(ch);
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }

    if !current.is_empty() {
        runs.push(current);
    }

    runs.join(" ")
}
