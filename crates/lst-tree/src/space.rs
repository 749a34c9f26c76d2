//! Whitespace and comments attached to a tree position.

use serde::{Deserialize, Serialize};

/// A single source comment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Comment {
    pub multiline: bool,
    pub text: String,
    /// Whitespace that follows the comment up to the next comment or node.
    pub suffix: String,
}

impl Comment {
    pub fn line(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            multiline: false,
            text: text.into(),
            suffix: suffix.into(),
        }
    }

    pub fn block(text: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            multiline: true,
            text: text.into(),
            suffix: suffix.into(),
        }
    }

    /// Prints the comment the way it appeared in source.
    pub fn print(&self) -> String {
        if self.multiline {
            format!("/*{}*/{}", self.text, self.suffix)
        } else {
            format!("//{}{}", self.text, self.suffix)
        }
    }
}

/// Whitespace and comments immediately preceding (or following) a node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Space {
    pub whitespace: String,
    pub comments: Vec<Comment>,
}

impl Space {
    pub fn empty() -> Self {
        Self::default()
    }

    /// A space made only of whitespace.
    pub fn format(whitespace: impl Into<String>) -> Self {
        Self {
            whitespace: whitespace.into(),
            comments: Vec::new(),
        }
    }

    pub fn with_comments(mut self, comments: Vec<Comment>) -> Self {
        self.comments = comments;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.whitespace.is_empty() && self.comments.is_empty()
    }

    /// The last line of indentation, i.e. whitespace after the final newline.
    pub fn indent(&self) -> &str {
        let ws = match self.comments.last() {
            Some(c) => c.suffix.as_str(),
            None => self.whitespace.as_str(),
        };
        match ws.rfind('\n') {
            Some(i) => &ws[i + 1..],
            None => ws,
        }
    }

    /// Reconstructs the exact source text of this space.
    pub fn print(&self) -> String {
        let mut out = self.whitespace.clone();
        for comment in &self.comments {
            out.push_str(&comment.print());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_is_lossless() {
        let space = Space::format("\n  ").with_comments(vec![
            Comment::line(" hello", "\n  "),
            Comment::block(" doc ", " "),
        ]);
        assert_eq!(space.print(), "\n  // hello\n  /* doc */ ");
    }

    #[test]
    fn indent_follows_last_comment() {
        let space = Space::format("\n").with_comments(vec![Comment::line("x", "\n\t\t")]);
        assert_eq!(space.indent(), "\t\t");
        assert_eq!(Space::format("  ").indent(), "  ");
    }

    #[test]
    fn empty_space() {
        assert!(Space::empty().is_empty());
        assert!(!Space::format(" ").is_empty());
    }
}
