use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Greedy word wrap by display width. Explicit newlines are kept and words
/// wider than `width` are split.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = usize::from(width);
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut line = String::new();
        let mut line_width = 0;
        for word in paragraph.split_whitespace() {
            let word_width = word.width();
            let gap = usize::from(line_width > 0);
            if line_width + gap + word_width <= width {
                if gap == 1 {
                    line.push(' ');
                }
                line.push_str(word);
                line_width += gap + word_width;
                continue;
            }

            if line_width > 0 {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            if word_width <= width {
                line.push_str(word);
                line_width = word_width;
                continue;
            }

            for ch in word.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && line_width > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }
        lines.push(line);
    }
    lines
}

/// Keeps the first `height` lines, marking the cut with an ellipsis.
pub fn clip_lines(mut lines: Vec<String>, height: u16, width: u16) -> Vec<String> {
    let height = usize::from(height);
    if lines.len() <= height {
        return lines;
    }
    lines.truncate(height);
    if let Some(last) = lines.last_mut() {
        while !last.is_empty() && last.width() + 1 > usize::from(width) {
            last.pop();
        }
        last.push(ELLIPSIS);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{clip_lines, wrap_text};

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn keeps_explicit_breaks_and_splits_long_words() {
        assert_eq!(wrap_text("ab\n\ncd", 5), vec!["ab", "", "cd"]);
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wide_glyphs_count_double() {
        assert_eq!(wrap_text("你好 世界", 4), vec!["你好", "世界"]);
    }

    #[test]
    fn clipping_marks_the_cut() {
        let lines = wrap_text("one two three four", 5);
        assert_eq!(clip_lines(lines.clone(), 10, 5), lines);
        assert_eq!(clip_lines(lines, 2, 5), vec!["one", "two…"]);
    }
}
