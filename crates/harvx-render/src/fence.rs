//! Escape-safe Markdown code fences: a fence must be longer than any
//! run of backticks that appears inside the content it wraps, or the
//! fence closes early.

/// Picks a fence of backticks one character longer than the longest
/// backtick run found in `content`, with a floor of three.
#[must_use]
pub fn fence_for(content: &str) -> String {
    let mut longest_run = 0usize;
    let mut current_run = 0usize;
    for ch in content.chars() {
        if ch == '`' {
            current_run += 1;
            longest_run = longest_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    "`".repeat((longest_run + 1).max(3))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_content_gets_three_backticks() {
        assert_eq!(fence_for("fn main() {}"), "```");
    }

    #[test]
    fn content_with_a_fenced_block_gets_a_longer_fence() {
        let content = "some text\n```\ncode\n```\n";
        assert_eq!(fence_for(content), "````");
    }

    #[test]
    fn content_with_four_backticks_gets_five() {
        assert_eq!(fence_for("````"), "`````");
    }
}
