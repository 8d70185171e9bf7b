use super::TextMeasure;

/// Breaks `text` into lines no wider than `max_width` at `font_size`.
///
/// Words are separated by any whitespace and rejoined with a single space.
/// Each word is appended to the current line while the joined candidate still
/// fits; otherwise the current line is closed and the word opens the next one.
/// A word that is wider than `max_width` on its own is never split, so it ends
/// up alone on a line that exceeds the budget. Text without words produces a
/// single empty line.
pub fn wrap<M: TextMeasure + ?Sized>(
    text: &str,
    max_width: f32,
    font_size: f32,
    measure: &M,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        let candidate_len = current.len() + 1 + word.len();
        let mut candidate = String::with_capacity(candidate_len);
        candidate.push_str(&current);
        candidate.push(' ');
        candidate.push_str(word);

        if measure.measure_width(&candidate, font_size) > max_width {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::HeuristicMeasure;

    /// Every character is exactly one pixel per pixel of font size.
    struct Mono;

    impl TextMeasure for Mono {
        fn measure_width(&self, text: &str, font_size: f32) -> f32 {
            text.chars().count() as f32 * font_size
        }
    }

    #[test]
    fn empty_and_blank_text_yield_one_empty_line() {
        assert_eq!(wrap("", 100.0, 10.0, &Mono), vec![String::new()]);
        assert_eq!(wrap("  \t ", 100.0, 10.0, &Mono), vec![String::new()]);
    }

    #[test]
    fn fills_lines_greedily() {
        // 10px per char, 100px budget -> at most 10 chars per line.
        let lines = wrap("aaa bbb ccc ddd eee", 100.0, 10.0, &Mono);
        assert_eq!(lines, vec!["aaa bbb", "ccc ddd", "eee"]);
    }

    #[test]
    fn exact_fit_stays_on_one_line() {
        let lines = wrap("aaaa bbbbb", 100.0, 10.0, &Mono);
        assert_eq!(lines, vec!["aaaa bbbbb"]);
    }

    #[test]
    fn collapses_runs_of_whitespace() {
        let lines = wrap("  one \t two\nthree  ", 1000.0, 10.0, &Mono);
        assert_eq!(lines, vec!["one two three"]);
    }

    #[test]
    fn overlong_word_sits_alone() {
        let lines = wrap("hi extraordinarily ok", 50.0, 10.0, &Mono);
        assert_eq!(lines, vec!["hi", "extraordinarily", "ok"]);

        let lines = wrap("extraordinarily", 50.0, 10.0, &Mono);
        assert_eq!(lines, vec!["extraordinarily"]);
    }

    #[test]
    fn non_positive_width_puts_every_word_on_its_own_line() {
        assert_eq!(wrap("a b c", 0.0, 10.0, &Mono), vec!["a", "b", "c"]);
        assert_eq!(wrap("a b c", -5.0, 10.0, &Mono), vec!["a", "b", "c"]);
    }

    #[test]
    fn lines_respect_budget_except_single_words() {
        let text = "the quick brown fox jumps over the lazy dog while \
                    pneumonoultramicroscopicsilicovolcanoconiosis looms";
        let measure = HeuristicMeasure;
        for width in [40.0f32, 120.0, 300.0, 800.0] {
            for size in [12.0f32, 24.0, 48.0] {
                let lines = wrap(text, width, size, &measure);
                for line in &lines {
                    if measure.measure_width(line, size) > width {
                        assert_eq!(line.split_whitespace().count(), 1, "{line:?}");
                    }
                }
                let rejoined = lines.join(" ");
                assert_eq!(rejoined, text.split_whitespace().collect::<Vec<_>>().join(" "));
            }
        }
    }

    #[test]
    fn is_deterministic() {
        let a = wrap("alpha beta gamma delta", 90.0, 13.0, &HeuristicMeasure);
        let b = wrap("alpha beta gamma delta", 90.0, 13.0, &HeuristicMeasure);
        assert_eq!(a, b);
    }
}
