use unicode_normalization::UnicodeNormalization as _;

/// The visual tracking inserted wherever the source text had whitespace.
pub const WORD_GAP: &str = "    ";

/// Upper bound on the number of passes performed by `sanitize` before giving up on
/// reaching a fixed point. In practice the second pass is already stable.
const MAXIMUM_PASSES: usize = 8;

/// Transforms arbitrary text into the lettering alphabet: only alphabetic characters and
/// whitespace survive, every whitespace run becomes a single four-space gap and the result
/// is upper-cased.
///
/// The function is pure and total, and `sanitize(sanitize(text)) == sanitize(text)`.
///
/// ```
/// assert_eq!(lettering::sanitizer::sanitize("Hi, 2nd!"), "HI    ND");
/// ```
pub fn sanitize(text: &str) -> String {
    let mut sanitized = sanitize_once(text);
    // Dropping characters can expose new canonical compositions, so repeat until stable
    for _ in 1..MAXIMUM_PASSES {
        let resanitized = sanitize_once(&sanitized);
        if resanitized == sanitized {
            break;
        }
        sanitized = resanitized;
    }

    sanitized
}

fn sanitize_once(text: &str) -> String {
    let mut sanitized = String::with_capacity(text.len());
    let mut in_whitespace = false;

    for character in text.nfc() {
        if character.is_whitespace() {
            if !in_whitespace {
                sanitized.push_str(WORD_GAP);
            }
            in_whitespace = true;
        } else if character.is_alphabetic() {
            // Some upper-case expansions carry combining marks which are not alphabetic
            sanitized.extend(
                character
                    .to_uppercase()
                    .filter(|upper_character| upper_character.is_alphabetic()),
            );
            in_whitespace = false;
        }
        // Digits, punctuation and leftover control characters are dropped without
        // interrupting the current word or whitespace run
    }

    sanitized
}
