pub const DEFAULT_WORDS_PER_PARAGRAPH: usize = 50;

/// Reflows `text` into paragraphs of `words_per_paragraph` words, separated by a blank line.
///
/// Whitespace inside a paragraph collapses to single spaces. The last paragraph
/// holds the remainder and may be shorter. A width of zero is treated as one.
pub fn split_into_paragraphs(text: &str, words_per_paragraph: usize) -> String {
    let width = words_per_paragraph.max(1);
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(width)
        .map(|chunk| chunk.join(" "))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("w{}", i)).collect()
    }

    #[test]
    fn paragraph_count_is_ceiling_of_words_over_width() {
        for (n, width, expected) in [(0, 50, 0), (1, 50, 1), (50, 50, 1), (51, 50, 2), (120, 50, 3), (7, 3, 3)] {
            let text = words(n).join(" ");
            let out = split_into_paragraphs(&text, width);
            let paragraphs: Vec<&str> = if out.is_empty() {
                Vec::new()
            } else {
                out.split("\n\n").collect()
            };
            assert_eq!(paragraphs.len(), expected, "n={} width={}", n, width);
        }
    }

    #[test]
    fn every_paragraph_but_the_last_is_full_width() {
        let text = words(123).join(" ");
        let out = split_into_paragraphs(&text, 50);
        let paragraphs: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(paragraphs[0].split(' ').count(), 50);
        assert_eq!(paragraphs[1].split(' ').count(), 50);
        assert_eq!(paragraphs[2].split(' ').count(), 23);
    }

    #[test]
    fn word_sequence_is_preserved() {
        let original = words(77);
        let text = original.join("  \n\t ");
        let out = split_into_paragraphs(&text, 10);
        let rejoined: Vec<&str> = out.split_whitespace().collect();
        assert_eq!(rejoined, original.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn already_chunked_input_is_stable() {
        let text = words(30).join(" ");
        let once = split_into_paragraphs(&text, 10);
        assert_eq!(split_into_paragraphs(&once, 10), once);
    }

    #[test]
    fn zero_width_means_one_word_per_paragraph() {
        assert_eq!(split_into_paragraphs("a b", 0), "a\n\nb");
    }
}
