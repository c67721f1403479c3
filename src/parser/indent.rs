//! Indentation tracking for block structure
//!
//! Blocks are delimited by indentation the way Python source is: a block
//! opens when a line starts to the right of the enclosing level and closes
//! when a line returns to (or past) an enclosing level. The stack is owned by
//! one parser instance, so files parsed concurrently never share state.

use crate::base::constants::ROOT_COLUMN;

/// Why an indentation check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentError {
    /// The line does not start to the right of the current level
    NotASubentry { column: usize, current: usize },
    /// The line dedents to a column that is not an enclosing level
    NotAnUndent { column: usize, current: usize },
}

impl std::fmt::Display for IndentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotASubentry { column, current } => write!(
                f,
                "not a subentry: column {} is not indented past column {}",
                column, current
            ),
            Self::NotAnUndent { column, current } => write!(
                f,
                "not an unindent: column {} does not close the block at column {}",
                column, current
            ),
        }
    }
}

/// Stack of enclosing block columns (1-based), rooted at [`ROOT_COLUMN`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentStack {
    levels: Vec<usize>,
}

impl Default for IndentStack {
    fn default() -> Self {
        Self::new()
    }
}

impl IndentStack {
    pub fn new() -> Self {
        Self {
            levels: vec![ROOT_COLUMN],
        }
    }

    /// Column of the innermost open block
    pub fn top(&self) -> usize {
        self.levels.last().copied().unwrap_or(ROOT_COLUMN)
    }

    /// Number of open blocks, the root included
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Open a block whose first line starts at `column`.
    pub fn enter(&mut self, column: usize) -> Result<(), IndentError> {
        let current = self.top();
        if column > current {
            self.levels.push(column);
            Ok(())
        } else {
            Err(IndentError::NotASubentry { column, current })
        }
    }

    /// Close the innermost block because the next line starts at `column`.
    ///
    /// `None` means end of input, which closes any block. Otherwise the column
    /// must be left of the current level and not right of the enclosing one;
    /// a single dedent may therefore close several nested blocks in turn.
    pub fn leave(&mut self, column: Option<usize>) -> Result<(), IndentError> {
        let current = self.top();
        if self.levels.len() < 2 {
            return Err(IndentError::NotAnUndent {
                column: column.unwrap_or(ROOT_COLUMN),
                current,
            });
        }
        let Some(column) = column else {
            self.levels.pop();
            return Ok(());
        };
        let enclosing = self.levels[self.levels.len() - 2];
        if column < current && column <= enclosing {
            self.levels.pop();
            Ok(())
        } else {
            Err(IndentError::NotAnUndent { column, current })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_requires_deeper_column() {
        let mut stack = IndentStack::new();
        assert!(stack.enter(5).is_ok());
        assert_eq!(stack.top(), 5);
        assert_eq!(
            stack.enter(5),
            Err(IndentError::NotASubentry {
                column: 5,
                current: 5
            })
        );
        assert_eq!(stack.depth(), 2);
    }

    #[test]
    fn test_leave_to_enclosing_level() {
        let mut stack = IndentStack::new();
        stack.enter(3).unwrap();
        stack.enter(7).unwrap();
        assert!(stack.leave(Some(3)).is_ok());
        assert_eq!(stack.top(), 3);
    }

    #[test]
    fn test_leave_between_levels_fails() {
        let mut stack = IndentStack::new();
        stack.enter(3).unwrap();
        stack.enter(7).unwrap();
        assert!(matches!(
            stack.leave(Some(5)),
            Err(IndentError::NotAnUndent { column: 5, .. })
        ));
        assert_eq!(stack.top(), 7);
    }

    #[test]
    fn test_one_dedent_closes_nested_blocks() {
        let mut stack = IndentStack::new();
        stack.enter(5).unwrap();
        stack.enter(9).unwrap();
        assert!(stack.leave(Some(1)).is_ok());
        assert!(stack.leave(Some(1)).is_ok());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn test_end_of_input_is_an_undent() {
        let mut stack = IndentStack::new();
        stack.enter(5).unwrap();
        assert!(stack.leave(None).is_ok());
        assert_eq!(stack.top(), ROOT_COLUMN);
    }

    #[test]
    fn test_root_cannot_be_left() {
        let mut stack = IndentStack::new();
        assert!(stack.leave(None).is_err());
    }
}
