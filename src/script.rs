use std::fmt;

/// One statement split out of a multi-statement script
///
/// `line` and `position` are 1-based and point at the first character of `text`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStatement {
    text: String,
    line: u32,
    position: u32,
}

impl ScriptStatement {
    pub fn new(text: impl Into<String>, line: u32, position: u32) -> Self {
        Self {
            text: text.into(),
            line,
            position,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn position(&self) -> u32 {
        self.position
    }
}

impl fmt::Display for ScriptStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.position, self.text)
    }
}
