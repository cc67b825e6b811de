use std::cmp::Ordering;

use crate::buffer::{Buffer, LineId, TOP};

pub const DEFAULT_TAB_WIDTH: usize = 8;

// `text[..text_x]` を描画したときの 1-based の列
pub fn screen_x_for(text: &[u8], text_x: usize, tab_width: usize) -> usize {
    let end = text_x.min(text.len());
    text[..end]
        .iter()
        .map(|&b| if b == b'\t' { tab_width } else { 1 })
        .fold(1, usize::saturating_add)
}

fn is_blank(b: u8) -> bool {
    b.is_ascii_whitespace()
}

// top_of_screen は画面 1 行目の 1 つ前の行。先頭が見えているときは TOP
#[derive(Debug, Clone)]
pub struct Cursor {
    line: LineId,
    top_of_screen: LineId,
    // 行内のバイトオフセット (0-based)
    text_x: usize,
    // 文書先頭からの行番号 (0-based)
    lineno: usize,
    // 端末上の列 (1-based)
    screen_x: usize,
    screen_y: usize,
    // テキストを表示できる行数
    rows: usize,
    tab_width: usize,
}

impl Cursor {
    pub fn new(buffer: &Buffer, rows: usize, tab_width: usize) -> Self {
        Self {
            line: buffer.first().unwrap_or(TOP),
            top_of_screen: TOP,
            text_x: 0,
            lineno: 0,
            screen_x: 1,
            screen_y: 1,
            rows: rows.max(1),
            tab_width: tab_width.max(1),
        }
    }

    pub fn line(&self) -> LineId {
        self.line
    }

    pub fn top_of_screen(&self) -> LineId {
        self.top_of_screen
    }

    pub fn text_x(&self) -> usize {
        self.text_x
    }

    pub fn lineno(&self) -> usize {
        self.lineno
    }

    pub fn screen_x(&self) -> usize {
        self.screen_x
    }

    pub fn screen_y(&self) -> usize {
        self.screen_y
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    // 画面上の位置を変えずに現在行だけ差し替える (行削除用)
    pub fn replace_line(&mut self, buffer: &Buffer, line: LineId) {
        self.line = line;
        self.clamp(buffer);
    }

    // 行内オフセットを設定する。挿入位置として行末まで許す
    pub fn set_text_x(&mut self, buffer: &Buffer, text_x: usize) {
        self.text_x = text_x.min(buffer.line_len(self.line));
        self.recompute_screen_x(buffer);
    }

    // ノーマルモードの範囲 `[0, len-1]` に収める
    pub fn clamp(&mut self, buffer: &Buffer) {
        let len = buffer.line_len(self.line);
        self.text_x = self.text_x.min(len.saturating_sub(1));
        self.recompute_screen_x(buffer);
    }

    pub fn recompute_screen_x(&mut self, buffer: &Buffer) {
        self.screen_x = screen_x_for(buffer.text(self.line), self.text_x, self.tab_width);
    }

    pub fn move_left(&mut self, buffer: &Buffer) {
        if self.text_x > 0 {
            self.text_x -= 1;
            self.recompute_screen_x(buffer);
        }
    }

    pub fn move_right(&mut self, buffer: &Buffer) {
        if self.text_x + 1 < buffer.line_len(self.line) {
            self.text_x += 1;
            self.recompute_screen_x(buffer);
        }
    }

    // 挿入モードを抜けたときに 1 つ戻る
    pub fn walk_back(&mut self, buffer: &Buffer) {
        self.text_x = self.text_x.saturating_sub(1);
        self.clamp(buffer);
    }

    // 1 行上へ。画面の最上段にいるときはスクロールする
    pub fn move_up(&mut self, buffer: &Buffer) -> bool {
        let Some(prev) = buffer.prev_line(self.line) else {
            return false;
        };

        let mut scrolled = false;
        if self.screen_y > 1 {
            self.screen_y -= 1;
        } else if let Some(top) = buffer.prev(self.top_of_screen) {
            self.top_of_screen = top;
            scrolled = true;
        } else {
            return false;
        }
        self.line = prev;
        self.lineno -= 1;
        self.clamp(buffer);
        scrolled
    }

    // 1 行下へ。画面の最下段にいるときはスクロールする
    pub fn move_down(&mut self, buffer: &Buffer) -> bool {
        let Some(next) = buffer.next(self.line) else {
            return false;
        };

        let mut scrolled = false;
        if self.screen_y < self.rows {
            self.screen_y += 1;
        } else if let Some(top) = buffer.next(self.top_of_screen) {
            self.top_of_screen = top;
            scrolled = true;
        } else {
            return false;
        }
        self.line = next;
        self.lineno += 1;
        self.clamp(buffer);
        scrolled
    }

    pub fn start_of_line(&mut self, buffer: &Buffer) {
        self.text_x = 0;
        self.recompute_screen_x(buffer);
    }

    // `$` / `E`: 行の最後の文字へ
    pub fn end_of_line(&mut self, buffer: &Buffer) {
        self.text_x = buffer.line_len(self.line).saturating_sub(1);
        self.recompute_screen_x(buffer);
    }

    // `A`: 行末の 1 つ後ろ (追記位置) へ
    pub fn append_position(&mut self, buffer: &Buffer) {
        self.set_text_x(buffer, buffer.line_len(self.line));
    }

    // 1-based の行番号へ移動する
    pub fn go_to_line(&mut self, buffer: &Buffer, target: usize) {
        let current = self.lineno.saturating_add(1);
        match target.cmp(&current) {
            Ordering::Greater => {
                for _ in 0..target - current {
                    let before = self.lineno;
                    self.move_down(buffer);
                    if self.lineno == before {
                        break;
                    }
                }
            }
            Ordering::Less => {
                for _ in 0..current - target {
                    let before = self.lineno;
                    self.move_up(buffer);
                    if self.lineno == before {
                        break;
                    }
                }
            }
            Ordering::Equal => {}
        }
        self.clamp(buffer);
    }

    pub fn go_to_top(&mut self, buffer: &Buffer) {
        self.line = buffer.first().unwrap_or(TOP);
        self.top_of_screen = TOP;
        self.text_x = 0;
        self.lineno = 0;
        self.screen_x = 1;
        self.screen_y = 1;
    }

    pub fn go_to_bottom(&mut self, buffer: &Buffer) {
        while buffer.next(self.line).is_some() {
            self.move_down(buffer);
        }
    }

    // `w`: 空白から始めた場合は改行と空行も空白として扱い、行をまたいで進む
    pub fn word_forward(&mut self, buffer: &Buffer) {
        let text = buffer.text(self.line);
        let start_blank = text.get(self.text_x).is_none_or(|&b| is_blank(b));

        loop {
            let len = buffer.line_len(self.line);
            if self.text_x + 1 < len {
                self.text_x += 1;
                let b = buffer.text(self.line)[self.text_x];
                if is_blank(b) != start_blank {
                    break;
                }
                continue;
            }

            // 行末を越える
            if buffer.next(self.line).is_none() {
                break;
            }
            self.move_down(buffer);
            self.text_x = 0;
            if !start_blank {
                break;
            }
            match buffer.text(self.line).first() {
                Some(&b) if !is_blank(b) => break,
                _ => {}
            }
        }
        self.recompute_screen_x(buffer);
    }
}
