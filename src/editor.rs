use arboard::Clipboard;
use tracing::{debug, info, warn};

use crate::{
    buffer::Buffer,
    command::{Action, Command, CommandParser},
    config::Config,
    cursor::Cursor,
    error::{EditorError, Result},
    file_io::FileIO,
    mode::{Mode, ModeManager},
    search,
};

/// 直前にヤンク・削除した行を 1 つだけ保持する
#[derive(Debug, Default)]
struct YankManager {
    buffer: Option<Vec<u8>>,
}

impl YankManager {
    fn new() -> Self {
        Self::default()
    }

    fn store(&mut self, text: Vec<u8>) {
        self.buffer = Some(text);
    }

    fn content(&self) -> Option<&[u8]> {
        self.buffer.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Reverse,
}

pub struct Editor {
    buffer: Buffer,
    cursor: Cursor,
    filename: Option<String>,
    /// 未保存の変更があるか
    dirty: bool,
    yank_manager: YankManager,
    /// システムクリップボード連携 (設定で有効な場合のみ)
    clipboard: Option<Clipboard>,
    pub(crate) modes: ModeManager,
    status: String,
    last_search: Option<Vec<u8>>,
    quit: bool,
    config: Config,
    /// 端末サイズ (列, 行)
    size: (u16, u16),
}

impl Editor {
    /// 空行 1 行だけの編集セッション
    pub fn new(size: (u16, u16), config: Config) -> Self {
        Self::from_buffer(Buffer::new(), None, size, config)
    }

    pub fn from_buffer(
        buffer: Buffer,
        filename: Option<String>,
        size: (u16, u16),
        config: Config,
    ) -> Self {
        // 最下行はステータス行
        let rows = usize::from(size.1.saturating_sub(crate::STATUS_BAR_HEIGHT));
        let cursor = Cursor::new(&buffer, rows, config.tab_width);
        let clipboard = if config.sync_system_clipboard {
            Clipboard::new()
                .inspect_err(|e| warn!(error = %e, "system clipboard unavailable"))
                .ok()
        } else {
            None
        };
        Self {
            buffer,
            cursor,
            filename,
            dirty: false,
            yank_manager: YankManager::new(),
            clipboard,
            modes: ModeManager::new(),
            status: String::new(),
            last_search: None,
            quit: false,
            config,
            size,
        }
    }

    /// ファイルを開く。存在しなければ空のバッファで始める
    pub fn open(filename: String, size: (u16, u16), config: Config) -> Result<Self> {
        let buffer = match FileIO::open(&filename)? {
            Some(buffer) => {
                info!(file = %filename, lines = buffer.len(), "file loaded");
                buffer
            }
            None => {
                info!(file = %filename, "new file");
                Buffer::new()
            }
        };
        Ok(Self::from_buffer(buffer, Some(filename), size, config))
    }

    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn mode(&self) -> Mode {
        self.modes.current()
    }

    /// コマンド / 検索モードの入力 (先頭の `:` / `/` を含む)
    pub fn prompt(&self) -> &[u8] {
        self.modes.prompt()
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    pub fn clear_status(&mut self) {
        self.status.clear();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn size(&self) -> (u16, u16) {
        self.size
    }

    pub fn clipboard_content(&self) -> Option<&[u8]> {
        self.yank_manager.content()
    }

    pub fn last_search(&self) -> Option<&[u8]> {
        self.last_search.as_deref()
    }

    /// 現在行の内容
    pub fn current_text(&self) -> &[u8] {
        self.buffer.text(self.cursor.line())
    }

    fn yank(&mut self, text: Vec<u8>) {
        if let Some(clipboard) = &mut self.clipboard {
            // set_text に失敗しても編集は続ける
            if let Err(e) = clipboard.set_text(String::from_utf8_lossy(&text).into_owned()) {
                debug!(error = %e, "clipboard sync failed");
            }
        }
        self.yank_manager.store(text);
    }

    fn yank_current(&mut self) {
        let text = self.current_text().to_vec();
        self.yank(text);
    }

    // --- カーソル移動 ---

    pub fn move_left(&mut self) {
        self.cursor.move_left(&self.buffer);
    }

    pub fn move_right(&mut self) {
        self.cursor.move_right(&self.buffer);
    }

    pub fn move_up(&mut self) {
        self.cursor.move_up(&self.buffer);
    }

    pub fn move_down(&mut self) {
        self.cursor.move_down(&self.buffer);
    }

    pub fn start_of_line(&mut self) {
        self.cursor.start_of_line(&self.buffer);
    }

    pub fn end_of_line(&mut self) {
        self.cursor.end_of_line(&self.buffer);
    }

    pub fn go_to_line(&mut self, target: usize) {
        self.cursor.go_to_line(&self.buffer, target);
    }

    pub fn go_to_top(&mut self) {
        self.cursor.go_to_top(&self.buffer);
    }

    pub fn go_to_bottom(&mut self) {
        self.cursor.go_to_bottom(&self.buffer);
    }

    pub fn word_forward(&mut self) {
        self.cursor.word_forward(&self.buffer);
    }

    // --- 挿入モード ---

    /// `i`
    pub fn begin_insert(&mut self) {
        self.modes.enter_insert();
        self.set_status(format!("-- {} --", Mode::Insert));
    }

    /// `A`: 行末に追記する
    pub fn begin_append(&mut self) {
        self.cursor.append_position(&self.buffer);
        self.begin_insert();
    }

    /// `o`: 下に空行を作って挿入モードへ
    pub fn open_line_below(&mut self) {
        if self.buffer.insert_after(self.cursor.line(), Vec::new()).is_some() {
            self.dirty = true;
            self.cursor.move_down(&self.buffer);
            self.cursor.start_of_line(&self.buffer);
        }
        self.begin_insert();
    }

    /// Esc で挿入モードを抜ける
    pub fn end_insert(&mut self) {
        self.modes.enter_normal();
        self.clear_status();
        self.cursor.walk_back(&self.buffer);
    }

    /// カーソル位置に 1 バイト挿入する
    pub fn insert_byte(&mut self, b: u8) {
        let line = self.cursor.line();
        let text_x = self.cursor.text_x();
        let Some(text) = self.buffer.text_mut(line) else {
            return;
        };
        let at = text_x.min(text.len());
        text.insert(at, b);
        self.dirty = true;
        self.cursor.set_text_x(&self.buffer, at + 1);
    }

    /// カーソル位置で行を分割し、後半の行の先頭へ移る
    pub fn insert_newline(&mut self) {
        let line = self.cursor.line();
        let text_x = self.cursor.text_x();
        let Some(text) = self.buffer.text_mut(line) else {
            return;
        };
        let rest = text.split_off(text_x.min(text.len()));
        if self.buffer.insert_after(line, rest).is_some() {
            self.dirty = true;
            self.cursor.move_down(&self.buffer);
            self.cursor.start_of_line(&self.buffer);
        }
    }

    /// 挿入モードの Backspace
    ///
    /// 空行なら行ごと消して上の行末へ、行頭なら上の行と結合する。
    pub fn backspace(&mut self) {
        let line = self.cursor.line();
        let text_x = self.cursor.text_x();

        if text_x > 0 && !self.buffer.text(line).is_empty() {
            if let Some(text) = self.buffer.text_mut(line) {
                let at = text_x.min(text.len());
                text.remove(at - 1);
                self.dirty = true;
                self.cursor.set_text_x(&self.buffer, at - 1);
            }
            return;
        }

        if self.buffer.prev_line(line).is_none() {
            return;
        }
        // 行を外す前にカーソルを上の行へ移す
        self.cursor.move_up(&self.buffer);
        let prev = self.cursor.line();
        let joint = self.buffer.line_len(prev);
        if let Some(tail) = self.buffer.remove(line) {
            if let Some(text) = self.buffer.text_mut(prev) {
                text.extend_from_slice(&tail);
            }
            self.dirty = true;
        }
        self.cursor.set_text_x(&self.buffer, joint);
    }

    // --- ノーマルモードの編集 ---

    /// `x`: カーソル位置の 1 バイトを消す
    pub fn delete_char(&mut self) {
        let line = self.cursor.line();
        let text_x = self.cursor.text_x();
        if text_x >= self.buffer.line_len(line) {
            return;
        }
        self.yank_current();
        if let Some(text) = self.buffer.text_mut(line) {
            text.remove(text_x);
            self.dirty = true;
        }
        self.cursor.clamp(&self.buffer);
    }

    /// `D`: カーソル位置から行末まで消す
    pub fn delete_to_end(&mut self) {
        let line = self.cursor.line();
        let text_x = self.cursor.text_x();
        self.yank_current();
        if let Some(text) = self.buffer.text_mut(line)
            && text_x < text.len()
        {
            text.truncate(text_x);
            self.dirty = true;
        }
        self.cursor.clamp(&self.buffer);
    }

    /// `r<c>`: カーソル位置の 1 バイトを置き換える
    pub fn replace_char(&mut self, b: u8) {
        let line = self.cursor.line();
        let text_x = self.cursor.text_x();
        if text_x >= self.buffer.line_len(line) {
            return;
        }
        self.yank_current();
        if let Some(text) = self.buffer.text_mut(line) {
            text[text_x] = b;
            self.dirty = true;
        }
        self.cursor.recompute_screen_x(&self.buffer);
    }

    /// `dd`: 現在行を消して上の行へ移る
    ///
    /// 最後の 1 行だけは消さずに中身を空にする。
    pub fn delete_line(&mut self) {
        let line = self.cursor.line();
        self.yank_current();
        self.dirty = true;

        if let Some(prev) = self.buffer.prev_line(line) {
            self.cursor.move_up(&self.buffer);
            debug_assert_eq!(self.cursor.line(), prev);
            self.buffer.remove(line);
        } else if let Some(next) = self.buffer.next(line) {
            self.buffer.remove(line);
            self.cursor.replace_line(&self.buffer, next);
        } else {
            self.buffer.set_text(line, Vec::new());
        }
        self.cursor.clamp(&self.buffer);
    }

    /// `yy`
    pub fn yank_line(&mut self) {
        self.yank_current();
    }

    /// `p`: クリップボードの内容を下の行に入れる。カーソルは動かさない
    pub fn paste(&mut self) {
        let Some(content) = self.yank_manager.content().map(<[u8]>::to_vec) else {
            self.set_status("clipboard is empty");
            return;
        };
        if self.buffer.insert_after(self.cursor.line(), content).is_some() {
            self.dirty = true;
        }
    }

    /// `u`: 現在行をクリップボードの内容で置き換える
    pub fn restore_line(&mut self) {
        let Some(content) = self.yank_manager.content().map(<[u8]>::to_vec) else {
            self.set_status("clipboard is empty");
            return;
        };
        self.buffer.set_text(self.cursor.line(), content);
        self.dirty = true;
        self.cursor.clamp(&self.buffer);
    }

    // --- コマンド ---

    pub fn execute_command(&mut self, input: &[u8]) {
        match CommandParser::parse(input) {
            Command::GoToLine(line) => self.go_to_line(line),
            Command::Run { actions, error } => {
                for action in actions {
                    match action {
                        Action::Write => self.write_file(),
                        Action::Quit => {
                            info!("quit");
                            self.quit = true;
                        }
                    }
                }
                if let Some(error) = error {
                    debug!(%error, "command rejected");
                    self.set_status(format!(": {error}"));
                }
            }
        }
    }

    /// ファイルに保存
    pub fn save(&mut self) -> Result<()> {
        let filename = self.filename.as_deref().ok_or(EditorError::NoFileName)?;
        FileIO::save(filename, &self.buffer)?;
        self.dirty = false;
        Ok(())
    }

    /// `:w`。結果はステータス行に出す
    pub fn write_file(&mut self) {
        match self.save() {
            Ok(()) => {
                let name = self.filename().unwrap_or_default().to_string();
                info!(file = %name, "file written");
                self.set_status(format!("wrote file: \"{name}\""));
            }
            Err(EditorError::NoFileName) => {
                self.set_status(EditorError::NoFileName.to_string());
            }
            Err(e) => {
                let name = self.filename().unwrap_or_default().to_string();
                warn!(file = %name, error = %e, "write failed");
                self.set_status(format!("failed to write: \"{name}\": {e}"));
            }
        }
    }

    // --- 検索 ---

    pub fn search(&mut self, term: &[u8], direction: SearchDirection) {
        let term = if term.is_empty() {
            match self.last_search.clone() {
                Some(last) => last,
                None => {
                    self.set_status("no previous search");
                    return;
                }
            }
        } else {
            term.to_vec()
        };

        let line = self.cursor.line();
        let lineno = self.cursor.lineno();
        let found = match direction {
            SearchDirection::Forward => search::find_forward(&self.buffer, line, lineno, &term),
            SearchDirection::Reverse => search::find_reverse(&self.buffer, line, lineno, &term),
        };

        match found {
            Some(index) => {
                self.go_to_line(index + 1);
                self.clear_status();
            }
            None => {
                let term_text = String::from_utf8_lossy(&term).into_owned();
                debug!(term = %term_text, ?direction, "search miss");
                self.set_status(format!("not found: {term_text}"));
            }
        }
        self.last_search = Some(term);
    }

    pub fn search_forward(&mut self, term: &[u8]) {
        self.search(term, SearchDirection::Forward);
    }

    pub fn search_reverse(&mut self, term: &[u8]) {
        self.search(term, SearchDirection::Reverse);
    }

    /// `n` / `N`
    pub fn repeat_search(&mut self, direction: SearchDirection) {
        match self.last_search.clone() {
            Some(term) => self.search(&term, direction),
            None => self.set_status("no previous search"),
        }
    }
}
