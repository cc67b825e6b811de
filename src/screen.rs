use std::io::{self, Write};

use crate::buffer::Buffer;
use crate::cursor::Cursor;
use crate::editor::Editor;
use crate::mode::Mode;

// タブを空白に展開し、`cols` 列で切り詰める
pub fn expand_line(text: &[u8], tab_width: usize, cols: usize) -> String {
    let mut out = Vec::with_capacity(text.len());
    for &b in text {
        if out.len() >= cols {
            break;
        }
        if b == b'\t' {
            // 画面幅を越える分は作らない
            let width = tab_width.min(cols - out.len());
            out.extend(std::iter::repeat_n(b' ', width));
        } else {
            out.push(b);
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

pub struct Screen;

impl Screen {
    pub fn clear(stdout: &mut impl Write) -> io::Result<()> {
        write!(
            stdout,
            "{}{}",
            termion::clear::All,
            termion::cursor::Goto(1, 1)
        )?;
        stdout.flush()
    }

    // テキスト領域を描画する
    pub fn draw_rows(
        stdout: &mut impl Write,
        buffer: &Buffer,
        cursor: &Cursor,
        cols: u16,
    ) -> io::Result<()> {
        let mut line = buffer.next(cursor.top_of_screen());
        for row in 1..=cursor.rows() {
            write!(stdout, "{}", termion::cursor::Goto(1, row as u16))?;
            match line {
                Some(id) => {
                    let text = expand_line(buffer.text(id), cursor.tab_width(), cols.into());
                    write!(stdout, "{text}")?;
                    line = buffer.next(id);
                }
                None => write!(stdout, "~")?,
            }
            // 行末までクリア
            write!(stdout, "{}", termion::clear::UntilNewline)?;
        }
        Ok(())
    }

    // 最下行: 左にメッセージ、`ruler_column` に `列 - 行`
    pub fn draw_status_line(stdout: &mut impl Write, editor: &Editor) -> io::Result<()> {
        let (cols, rows) = editor.size();
        write!(stdout, "{}", termion::cursor::Goto(1, rows))?;
        // 古いメッセージが残らないよう先に消す
        write!(stdout, "{}", termion::clear::CurrentLine)?;

        let banner = match editor.mode() {
            Mode::Command | Mode::Search => String::from_utf8_lossy(editor.prompt()).into_owned(),
            Mode::Normal | Mode::Insert => editor.status().to_string(),
        };
        let ruler_column = editor.config().ruler_column;
        let banner_width = usize::from(ruler_column.saturating_sub(1).min(cols));
        let banner: String = banner.chars().take(banner_width).collect();
        write!(stdout, "{banner}")?;

        if ruler_column <= cols {
            let cursor = editor.cursor();
            write!(
                stdout,
                "{}{} - {}",
                termion::cursor::Goto(ruler_column, rows),
                cursor.text_x() + 1,
                cursor.lineno() + 1
            )?;
        }
        Ok(())
    }

    pub fn refresh(stdout: &mut impl Write, editor: &Editor) -> io::Result<()> {
        let (cols, rows) = editor.size();
        let cursor = editor.cursor();

        // カーソルを隠す
        write!(stdout, "{}", termion::cursor::Hide)?;

        Self::draw_rows(stdout, editor.buffer(), cursor, cols)?;
        Self::draw_status_line(stdout, editor)?;

        // カーソル位置に移動
        match editor.mode() {
            Mode::Command | Mode::Search => {
                // プロンプトの末尾にカーソル
                let x = (editor.prompt().len() + 1).min(usize::from(cols.max(1)));
                write!(stdout, "{}", termion::cursor::Goto(x as u16, rows))?;
            }
            Mode::Normal | Mode::Insert => {
                let x = cursor.screen_x().min(usize::from(cols.max(1)));
                let y = cursor.screen_y();
                write!(stdout, "{}", termion::cursor::Goto(x as u16, y as u16))?;
            }
        }

        // カーソルスタイルを設定
        match editor.mode() {
            Mode::Insert => {
                // Insert モードでは縦棒カーソル
                write!(stdout, "{}", termion::cursor::SteadyBar)?;
            }
            Mode::Normal | Mode::Command | Mode::Search => {
                write!(stdout, "{}", termion::cursor::SteadyBlock)?;
            }
        }

        write!(stdout, "{}", termion::cursor::Show)?;
        stdout.flush()?;
        Ok(())
    }
}
