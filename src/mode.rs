use std::fmt;

pub const TAB: u8 = 9;
pub const LINE_FEED: u8 = 10;
pub const ENTER: u8 = 13;
pub const ESC: u8 = 27;
pub const BACKSPACE: u8 = 127;
pub const CTRL_H: u8 = 8;

pub fn is_enter(b: u8) -> bool {
    b == ENTER || b == LINE_FEED
}

pub fn is_backspace(b: u8) -> bool {
    b == BACKSPACE || b == CTRL_H
}

// 挿入モードでそのまま文字として扱うバイト
pub fn is_literal(b: u8) -> bool {
    b == TAB || (b >= 0x20 && b != BACKSPACE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Insert,
    Command,
    Search,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mode::Normal => "NORMAL",
            Mode::Insert => "INSERT",
            Mode::Command => "COMMAND",
            Mode::Search => "SEARCH",
        };
        write!(f, "{name}")
    }
}

// 2 打鍵目を待っているコマンド (`gg`, `dd`, `yy`, `r<c>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pending {
    AwaitingSecond(u8),
}

pub struct ModeManager {
    current: Mode,
    pending: Option<Pending>,
    // コマンド / 検索モードの入力。先頭は `:` または `/`
    prompt: Vec<u8>,
}

impl Default for ModeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeManager {
    pub fn new() -> Self {
        Self {
            current: Mode::Normal,
            pending: None,
            prompt: Vec::new(),
        }
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn enter_normal(&mut self) {
        self.current = Mode::Normal;
        self.pending = None;
        self.prompt.clear();
    }

    pub fn enter_insert(&mut self) {
        self.current = Mode::Insert;
        self.pending = None;
    }

    pub fn enter_command(&mut self) {
        self.enter_prompt(Mode::Command, b':');
    }

    pub fn enter_search(&mut self) {
        self.enter_prompt(Mode::Search, b'/');
    }

    fn enter_prompt(&mut self, mode: Mode, sentinel: u8) {
        self.current = mode;
        self.pending = None;
        self.prompt.clear();
        self.prompt.push(sentinel);
    }

    pub fn is_normal(&self) -> bool {
        self.current == Mode::Normal
    }

    pub fn is_search(&self) -> bool {
        self.current == Mode::Search
    }

    pub fn pending(&self) -> Option<Pending> {
        self.pending
    }

    pub fn set_pending(&mut self, key: u8) {
        self.pending = Some(Pending::AwaitingSecond(key));
    }

    pub fn take_pending(&mut self) -> Option<Pending> {
        self.pending.take()
    }

    pub fn prompt(&self) -> &[u8] {
        &self.prompt
    }

    pub fn push_prompt(&mut self, b: u8) {
        self.prompt.push(b);
    }

    // 末尾を 1 文字削る。センチネルだけになったら false を返す
    pub fn pop_prompt(&mut self) -> bool {
        self.prompt.pop();
        self.prompt.len() > 1
    }

    // センチネルを除いた入力を取り出してノーマルモードに戻る
    pub fn finish_prompt(&mut self) -> Vec<u8> {
        let body = self.prompt.get(1..).unwrap_or_default().to_vec();
        self.enter_normal();
        body
    }
}
