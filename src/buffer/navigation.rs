//! カーソル・行位置の補助
//!
//! いずれも文書先頭からの線形走査。範囲外の位置は末尾に丸める

use super::TextBuffer;

impl TextBuffer {
    /// `current + offset` を `[0, len]` に収めた位置
    pub fn move_cursor(&self, current: usize, offset: isize) -> usize {
        let target = if offset >= 0 {
            current.saturating_add(offset as usize)
        } else {
            current.saturating_sub(offset.unsigned_abs())
        };
        target.min(self.len())
    }

    /// `position` を含む行の先頭位置
    pub fn line_start(&self, position: usize) -> usize {
        let position = position.min(self.len());
        let mut start = 0;
        for (idx, ch) in self.chars().take(position).enumerate() {
            if ch == '\n' {
                start = idx + 1;
            }
        }
        start
    }

    /// `position` 以降で最初の改行位置（なければ文書末尾）
    pub fn line_end(&self, position: usize) -> usize {
        let position = position.min(self.len());
        self.chars()
            .skip(position)
            .position(|ch| ch == '\n')
            .map_or(self.len(), |offset| position + offset)
    }

    /// 1始まりの行番号
    pub fn line_number(&self, position: usize) -> usize {
        let position = position.min(self.len());
        1 + self.chars().take(position).filter(|&ch| ch == '\n').count()
    }

    /// 0始まりの列番号
    pub fn column_number(&self, position: usize) -> usize {
        let position = position.min(self.len());
        position - self.line_start(position)
    }

    fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.chunks().flat_map(str::chars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TextBuffer {
        // "Line 1\nLine 2\nLine 3"
        let mut buffer = TextBuffer::new();
        buffer.insert(0, "Line 1\n");
        buffer.insert(7, "Line 2\n");
        buffer.insert(14, "Line 3");
        buffer
    }

    #[test]
    fn test_line_operations() {
        let buffer = sample();
        assert_eq!(buffer.line_start(8), 7);
        assert_eq!(buffer.line_end(8), 13);
        assert_eq!(buffer.line_number(8), 2);
        assert_eq!(buffer.column_number(8), 1);
    }

    #[test]
    fn test_first_and_last_line() {
        let buffer = sample();
        assert_eq!(buffer.line_start(0), 0);
        assert_eq!(buffer.line_number(0), 1);
        assert_eq!(buffer.line_start(16), 14);
        assert_eq!(buffer.line_end(16), 20);
        assert_eq!(buffer.line_number(20), 3);
    }

    #[test]
    fn test_position_on_newline_belongs_to_its_line() {
        let buffer = sample();
        assert_eq!(buffer.line_start(6), 0);
        assert_eq!(buffer.line_end(6), 6);
        assert_eq!(buffer.line_number(6), 1);
        assert_eq!(buffer.column_number(6), 6);
    }

    #[test]
    fn test_positions_past_end_are_clamped() {
        let buffer = sample();
        assert_eq!(buffer.line_number(1000), 3);
        assert_eq!(buffer.line_end(1000), 20);
        assert_eq!(buffer.column_number(1000), 6);
    }

    #[test]
    fn test_move_cursor_clamps() {
        let buffer = TextBuffer::from_text("Hello");
        assert_eq!(buffer.move_cursor(0, 3), 3);
        assert_eq!(buffer.move_cursor(3, 10), 5);
        assert_eq!(buffer.move_cursor(3, -10), 0);
        assert_eq!(buffer.move_cursor(4, -1), 3);
    }

    #[test]
    fn test_empty_buffer_lines() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_start(0), 0);
        assert_eq!(buffer.line_end(0), 0);
        assert_eq!(buffer.line_number(0), 1);
        assert_eq!(buffer.column_number(0), 0);
    }
}
