//! Tokenizer for duet program text.

/// Split a single line into whitespace-separated tokens.
///
/// Returns an empty Vec for blank lines and comment-only lines.
/// Comments start with `;` and extend to end of line.
pub(crate) fn tokenize_line(line: &str) -> Vec<&str> {
    let line = match line.find(';') {
        Some(pos) => &line[..pos],
        None => line,
    };
    line.split_whitespace().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_line() {
        assert!(tokenize_line("").is_empty());
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize_line("   \t  ").is_empty());
    }

    #[test]
    fn comment_only() {
        assert!(tokenize_line("; loop back").is_empty());
    }

    #[test]
    fn unary_instruction() {
        assert_eq!(tokenize_line("snd a"), vec!["snd", "a"]);
    }

    #[test]
    fn negative_literal_kept_whole() {
        assert_eq!(tokenize_line("jgz a -1"), vec!["jgz", "a", "-1"]);
    }

    #[test]
    fn trailing_comment_stripped() {
        assert_eq!(tokenize_line("set p 0 ; id"), vec!["set", "p", "0"]);
    }

    #[test]
    fn tabs_and_runs_of_spaces() {
        assert_eq!(tokenize_line("\tadd  a\t2 "), vec!["add", "a", "2"]);
    }
}
