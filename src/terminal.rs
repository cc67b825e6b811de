use std::io::{self, Stdout, Write};

use termion::raw::{IntoRawMode, RawTerminal};

use crate::error::{EditorError, Result};

// raw mode の端末
pub struct Terminal {
    stdout: RawTerminal<Stdout>,
    size: (u16, u16),
}

impl Terminal {
    pub fn new() -> Result<Self> {
        // raw mode に入る前にサイズを確認する
        let size = termion::terminal_size()
            .map_err(|e| EditorError::Terminal(format!("failed to get terminal size: {e}")))?;
        let stdout = io::stdout()
            .into_raw_mode()
            .map_err(|e| EditorError::Terminal(format!("failed to enable raw mode: {e}")))?;
        Ok(Self { stdout, size })
    }

    pub fn stdout(&mut self) -> &mut RawTerminal<Stdout> {
        &mut self.stdout
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn clear_screen(&mut self) -> io::Result<()> {
        write!(
            self.stdout,
            "{}{}{}",
            termion::clear::All,
            termion::cursor::Goto(1, 1),
            termion::cursor::Show
        )?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        // 終了時の画面クリア。raw mode は RawTerminal の drop で戻る
        let _ = self.clear_screen();
    }
}
