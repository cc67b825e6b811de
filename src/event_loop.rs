use std::io::{self, Read, Write};

use tracing::debug;

use crate::editor::Editor;
use crate::screen::Screen;

// 入力を 1 バイトずつ読み、処理して再描画する
pub fn run<R: Read, W: Write>(editor: &mut Editor, input: R, stdout: &mut W) -> io::Result<()> {
    Screen::clear(stdout)?;
    Screen::refresh(stdout, editor)?;

    for byte in input.bytes() {
        editor.handle_byte(byte?);
        if editor.should_quit() {
            break;
        }
        Screen::refresh(stdout, editor)?;
    }
    debug!(dirty = editor.is_dirty(), "event loop finished");
    Ok(())
}
