//! Offset to line/column conversion.

use std::cell::Cell;

use kiln_ir::Bits;

/// Columns a tab advances to the next multiple of.
pub const TAB_WIDTH: u32 = 8;

/// Sorted line-start index over one source text.
///
/// `\n`, `\r` and `\r\n` each end a line. Built in one pass; line lookups
/// are a binary search with a one-entry cache, since diagnostics tend to
/// ask about the same position several times in a row.
#[derive(Debug, Clone)]
pub struct LineMap {
    starts: Vec<u32>,
    /// Character offsets holding a tab, when tab expansion is on.
    tabs: Option<Bits>,
    /// Last `(pos, line)` lookup.
    last: Cell<Option<(u32, u32)>>,
}

impl LineMap {
    /// Build the index for `text`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "source offsets are u32 throughout the compiler"
    )]
    pub fn new(text: &[char], expand_tabs: bool) -> Self {
        let len = text.len();
        let mut starts = vec![0u32];
        let mut tabs = expand_tabs.then(Bits::new);
        let mut i = 0;
        while i < len {
            match text[i] {
                '\r' if text.get(i + 1) == Some(&'\n') => {
                    i += 2;
                    starts.push(i as u32);
                }
                '\r' | '\n' => {
                    i += 1;
                    starts.push(i as u32);
                }
                '\t' => {
                    if let Some(tabs) = tabs.as_mut() {
                        tabs.include(i);
                    }
                    i += 1;
                }
                _ => i += 1,
            }
        }
        LineMap {
            starts,
            tabs,
            last: Cell::new(None),
        }
    }

    /// Build the index for a string.
    pub fn for_text(text: &str, expand_tabs: bool) -> Self {
        let chars: Vec<char> = text.chars().collect();
        Self::new(&chars, expand_tabs)
    }

    /// Number of lines, counting an empty line after a trailing terminator.
    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// 1-based line containing `pos`.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "line count is bounded by the u32 offset space"
    )]
    pub fn line_number(&self, pos: u32) -> u32 {
        if let Some((last_pos, line)) = self.last.get() {
            if last_pos == pos {
                return line;
            }
        }
        let line = self.starts.partition_point(|&start| start <= pos) as u32;
        self.last.set(Some((pos, line)));
        line
    }

    /// 1-based column of `pos`. With tab expansion, a tab advances to the
    /// next multiple of [`TAB_WIDTH`].
    pub fn column_number(&self, pos: u32) -> u32 {
        let line_start = self.starts[self.line_number(pos) as usize - 1];
        match &self.tabs {
            None => pos - line_start + 1,
            Some(tabs) => {
                let mut column = 0;
                for bp in line_start..pos {
                    column = advance(column, tabs.is_member(bp as usize));
                }
                column + 1
            }
        }
    }

    /// Offset of the first character of `line`.
    pub fn start_position(&self, line: u32) -> Option<u32> {
        let index = usize::try_from(line).ok()?.checked_sub(1)?;
        self.starts.get(index).copied()
    }

    /// Offset of the character at 1-based `(line, column)`. With tab
    /// expansion, a column inside a tab's span maps to the tab itself.
    pub fn position(&self, line: u32, column: u32) -> Option<u32> {
        let start = self.start_position(line)?;
        let target = column.checked_sub(1)?;
        match &self.tabs {
            None => start.checked_add(target),
            Some(tabs) => {
                let mut pos = start;
                let mut col = 0;
                loop {
                    let next = advance(col, tabs.is_member(pos as usize));
                    if next > target {
                        return Some(pos);
                    }
                    col = next;
                    pos = pos.checked_add(1)?;
                }
            }
        }
    }
}

fn advance(column: u32, tab: bool) -> u32 {
    if tab {
        column / TAB_WIDTH * TAB_WIDTH + TAB_WIDTH
    } else {
        column + 1
    }
}
