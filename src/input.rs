use tracing::debug;

use crate::editor::{Editor, SearchDirection};
use crate::mode::{ESC, Mode, Pending, is_backspace, is_enter, is_literal};

// ステータス行に出すためのキー表記
fn key_name(b: u8) -> String {
    if b.is_ascii_graphic() || b == b' ' {
        (b as char).to_string()
    } else {
        format!("\\x{b:02x}")
    }
}

impl Editor {
    pub fn handle_byte(&mut self, b: u8) {
        match self.mode() {
            Mode::Normal => self.handle_normal(b),
            Mode::Insert => self.handle_insert(b),
            Mode::Command | Mode::Search => self.handle_prompt(b),
        }
    }

    // 複数バイトをまとめて処理する (テスト・スクリプト用)
    pub fn handle_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if self.should_quit() {
                break;
            }
            self.handle_byte(b);
        }
    }

    fn handle_normal(&mut self, b: u8) {
        if let Some(Pending::AwaitingSecond(first)) = self.modes.take_pending() {
            self.handle_second(first, b);
            return;
        }

        match b {
            b'h' => self.move_left(),
            b'l' => self.move_right(),
            b'j' => self.move_down(),
            b'k' => self.move_up(),
            b'0' => self.start_of_line(),
            b'$' | b'E' => self.end_of_line(),
            b'G' => self.go_to_bottom(),
            b'w' => self.word_forward(),
            b'x' => self.delete_char(),
            b'D' => self.delete_to_end(),
            b'p' => self.paste(),
            b'u' => self.restore_line(),
            b'n' => self.repeat_search(SearchDirection::Forward),
            b'N' => self.repeat_search(SearchDirection::Reverse),
            b'i' => self.begin_insert(),
            b'A' => self.begin_append(),
            b'o' => self.open_line_below(),
            b':' => {
                self.clear_status();
                self.modes.enter_command();
            }
            b'/' => {
                self.clear_status();
                self.modes.enter_search();
            }
            b'g' | b'd' | b'y' | b'r' => self.modes.set_pending(b),
            ESC => {}
            other => {
                debug!(key = other, "unknown key");
                self.set_status(format!("unknown command: '{}'", key_name(other)));
            }
        }
    }

    // `gg` / `dd` / `yy` / `r<c>` の 2 打鍵目
    fn handle_second(&mut self, first: u8, b: u8) {
        if b == ESC {
            return;
        }
        match (first, b) {
            (b'g', b'g') => self.go_to_top(),
            (b'd', b'd') => self.delete_line(),
            (b'y', b'y') => self.yank_line(),
            (b'r', c) if is_literal(c) => self.replace_char(c),
            (first, second) => {
                debug!(first, second, "unknown key sequence");
                self.set_status(format!(
                    "unknown command '{}{}'",
                    key_name(first),
                    key_name(second)
                ));
            }
        }
    }

    fn handle_insert(&mut self, b: u8) {
        match b {
            ESC => self.end_insert(),
            b if is_enter(b) => self.insert_newline(),
            b if is_backspace(b) => self.backspace(),
            b if is_literal(b) => self.insert_byte(b),
            _ => {}
        }
    }

    fn handle_prompt(&mut self, b: u8) {
        match b {
            ESC => {
                self.modes.enter_normal();
                self.clear_status();
            }
            b if is_enter(b) => {
                let searching = self.modes.is_search();
                let input = self.modes.finish_prompt();
                if searching {
                    self.search_forward(&input);
                } else {
                    self.execute_command(&input);
                }
            }
            b if is_backspace(b) => {
                // プロンプトを消し切ったら取り消し
                if !self.modes.pop_prompt() {
                    self.modes.enter_normal();
                }
            }
            b if is_literal(b) => self.modes.push_prompt(b),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::config::Config;
    use crate::mode::{BACKSPACE, ENTER};

    fn editor(lines: &[&str]) -> Editor {
        Editor::from_buffer(
            Buffer::load(lines.iter().copied()),
            None,
            (80, 24),
            Config::default(),
        )
    }

    fn lines(editor: &Editor) -> Vec<String> {
        editor
            .buffer()
            .serialize()
            .into_iter()
            .map(|t| String::from_utf8(t).unwrap())
            .collect()
    }

    #[test]
    fn test_insert_mode_transitions() {
        let mut e = editor(&["abc"]);
        e.handle_byte(b'i');
        assert_eq!(e.mode(), Mode::Insert);
        assert_eq!(e.status(), "-- INSERT --");

        e.handle_byte(ESC);
        assert_eq!(e.mode(), Mode::Normal);
        assert_eq!(e.status(), "");
    }

    #[test]
    fn test_insert_text() {
        let mut e = editor(&["world"]);
        e.handle_bytes(b"ihello ");
        e.handle_byte(ESC);
        assert_eq!(lines(&e), vec!["hello world"]);
        // Esc で最後に入力した文字の上に戻る
        assert_eq!(e.cursor().text_x(), 5);
    }

    #[test]
    fn test_append_on_empty_line() {
        let mut e = editor(&[""]);
        e.handle_bytes(b"Aok");
        e.handle_byte(ESC);
        assert_eq!(lines(&e), vec!["ok"]);
        assert_eq!(e.cursor().text_x(), 1);
    }

    #[test]
    fn test_insert_tab_moves_screen_x() {
        let mut e = editor(&[""]);
        e.handle_bytes(b"i\t");
        assert_eq!(e.cursor().text_x(), 1);
        assert_eq!(e.cursor().screen_x(), 9);
    }

    #[test]
    fn test_enter_splits_line() {
        let mut e = editor(&["headtail"]);
        e.handle_bytes(b"llll");
        e.handle_byte(b'i');
        e.handle_byte(ENTER);

        assert_eq!(lines(&e), vec!["head", "tail"]);
        assert_eq!(e.cursor().lineno(), 1);
        assert_eq!(e.cursor().text_x(), 0);
        assert_eq!(e.current_text(), b"tail");
        assert!(e.buffer().is_consistent());
    }

    #[test]
    fn test_insert_then_backspace_round_trip() {
        let mut e = editor(&["abcd"]);
        e.handle_bytes(b"ll");
        e.handle_bytes(b"iZ");
        assert_eq!(lines(&e), vec!["abZcd"]);
        e.handle_byte(BACKSPACE);
        assert_eq!(lines(&e), vec!["abcd"]);
        assert_eq!(e.cursor().text_x(), 2);
    }

    #[test]
    fn test_backspace_at_line_start_joins() {
        let mut e = editor(&["foo", "bar"]);
        e.handle_byte(b'j');
        e.handle_byte(b'i');
        e.handle_byte(BACKSPACE);

        assert_eq!(lines(&e), vec!["foobar"]);
        assert_eq!(e.cursor().lineno(), 0);
        assert_eq!(e.cursor().text_x(), 3);
        assert!(e.buffer().is_consistent());
    }

    #[test]
    fn test_backspace_on_empty_line_removes_it() {
        let mut e = editor(&["foo", ""]);
        e.handle_byte(b'j');
        e.handle_byte(b'i');
        e.handle_byte(BACKSPACE);

        assert_eq!(lines(&e), vec!["foo"]);
        assert_eq!(e.cursor().text_x(), 3);
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let mut e = editor(&["foo"]);
        e.handle_byte(b'i');
        e.handle_byte(BACKSPACE);
        assert_eq!(lines(&e), vec!["foo"]);
    }

    #[test]
    fn test_open_line_below() {
        let mut e = editor(&["one", "three"]);
        e.handle_bytes(b"otwo");
        e.handle_byte(ESC);
        assert_eq!(lines(&e), vec!["one", "two", "three"]);
        assert_eq!(e.cursor().lineno(), 1);
    }

    #[test]
    fn test_delete_char_and_restore() {
        let mut e = editor(&["one", "two", "three"]);
        e.handle_bytes(b"jj");
        assert_eq!(e.cursor().lineno(), 2);
        assert_eq!(e.current_text(), b"three");

        e.handle_byte(b'x');
        assert_eq!(e.current_text(), b"hree");

        e.handle_byte(b'u');
        assert_eq!(e.current_text(), b"three");
    }

    #[test]
    fn test_delete_char_at_line_end_clamps() {
        let mut e = editor(&["ab"]);
        e.handle_bytes(b"$x");
        assert_eq!(lines(&e), vec!["a"]);
        assert_eq!(e.cursor().text_x(), 0);
    }

    #[test]
    fn test_delete_char_on_empty_line_keeps_clipboard() {
        let mut e = editor(&["keep", ""]);
        e.handle_bytes(b"yyj");
        e.handle_byte(b'x');
        assert_eq!(e.clipboard_content(), Some(&b"keep"[..]));
    }

    #[test]
    fn test_delete_line() {
        let mut e = editor(&["a", "b", "c"]);
        e.handle_bytes(b"jdd");
        assert_eq!(lines(&e), vec!["a", "c"]);
        assert_eq!(e.current_text(), b"a");
        assert_eq!(e.clipboard_content(), Some(&b"b"[..]));
        assert!(e.buffer().is_consistent());
    }

    #[test]
    fn test_delete_first_line_moves_to_next() {
        let mut e = editor(&["a", "b"]);
        e.handle_bytes(b"dd");
        assert_eq!(lines(&e), vec!["b"]);
        assert_eq!(e.current_text(), b"b");
        assert_eq!(e.cursor().lineno(), 0);
    }

    #[test]
    fn test_delete_only_line_clears_it() {
        let mut e = editor(&["only"]);
        e.handle_bytes(b"dd");
        assert_eq!(lines(&e), vec![""]);
        assert_eq!(e.clipboard_content(), Some(&b"only"[..]));
    }

    #[test]
    fn test_yank_and_paste() {
        let mut e = editor(&["a", "b"]);
        e.handle_bytes(b"yy");
        assert_eq!(lines(&e), vec!["a", "b"]);

        e.handle_bytes(b"jp");
        assert_eq!(lines(&e), vec!["a", "b", "a"]);
        // 貼り付けてもカーソルは動かない
        assert_eq!(e.cursor().lineno(), 1);
    }

    #[test]
    fn test_paste_empty_clipboard() {
        let mut e = editor(&["a"]);
        e.handle_byte(b'p');
        assert_eq!(lines(&e), vec!["a"]);
        assert_eq!(e.status(), "clipboard is empty");
    }

    #[test]
    fn test_replace_char() {
        let mut e = editor(&["cat"]);
        e.handle_bytes(b"rb");
        assert_eq!(lines(&e), vec!["bat"]);
        assert_eq!(e.clipboard_content(), Some(&b"cat"[..]));
    }

    #[test]
    fn test_replace_cancelled_by_escape() {
        let mut e = editor(&["cat"]);
        e.handle_byte(b'r');
        e.handle_byte(ESC);
        e.handle_byte(b'x');
        assert_eq!(lines(&e), vec!["at"]);
    }

    #[test]
    fn test_delete_to_end() {
        let mut e = editor(&["hello world"]);
        e.handle_bytes(b"lllllD");
        assert_eq!(lines(&e), vec!["hello"]);
        assert_eq!(e.cursor().text_x(), 4);
        assert_eq!(e.clipboard_content(), Some(&b"hello world"[..]));
    }

    #[test]
    fn test_unknown_second_key() {
        let mut e = editor(&["a", "b"]);
        e.handle_bytes(b"dj");
        assert_eq!(lines(&e), vec!["a", "b"]);
        assert_eq!(e.status(), "unknown command 'dj'");
        // 取り消し後は通常通り
        assert_eq!(e.cursor().lineno(), 0);
    }

    #[test]
    fn test_unknown_key() {
        let mut e = editor(&["a"]);
        e.handle_byte(b'Q');
        assert_eq!(e.status(), "unknown command: 'Q'");
        assert_eq!(e.mode(), Mode::Normal);
    }

    #[test]
    fn test_gg_and_g() {
        let mut e = editor(&["1", "2", "3", "4"]);
        e.handle_byte(b'G');
        assert_eq!(e.cursor().lineno(), 3);
        e.handle_bytes(b"gg");
        assert_eq!(e.cursor().lineno(), 0);
    }

    #[test]
    fn test_command_go_to_line() {
        let lines: Vec<String> = (1..=10).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut e = editor(&refs);
        e.handle_bytes(b":5");
        e.handle_byte(ENTER);
        assert_eq!(e.cursor().lineno(), 4);
        assert_eq!(e.mode(), Mode::Normal);
    }

    #[test]
    fn test_command_go_to_line_past_usize_range() {
        let lines: Vec<String> = (1..=10).map(|i| i.to_string()).collect();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let mut e = editor(&refs);
        e.handle_bytes(b":3");
        e.handle_byte(ENTER);
        e.handle_bytes(b":18446744073709551615");
        e.handle_byte(ENTER);
        assert_eq!(e.cursor().lineno(), 9);
    }

    #[test]
    fn test_normal_motion_keys() {
        let mut e = editor(&["abcdef", "xyz"]);
        e.handle_bytes(b"ll");
        assert_eq!(e.cursor().text_x(), 2);
        e.handle_byte(b'h');
        assert_eq!(e.cursor().text_x(), 1);

        e.handle_byte(b'j');
        assert_eq!(e.cursor().lineno(), 1);
        e.handle_byte(b'k');
        assert_eq!(e.cursor().lineno(), 0);

        e.handle_byte(b'$');
        assert_eq!(e.cursor().text_x(), 5);
        e.handle_byte(b'0');
        assert_eq!(e.cursor().text_x(), 0);

        e.handle_byte(b'E');
        assert_eq!(e.cursor().text_x(), 5);
        assert_eq!(e.cursor().screen_x(), 6);
    }

    #[test]
    fn test_command_unknown() {
        let mut e = editor(&["a"]);
        e.handle_bytes(b":z");
        e.handle_byte(ENTER);
        assert_eq!(e.status(), ": unknown command: 'z'");
        assert!(!e.should_quit());
    }

    #[test]
    fn test_command_quit() {
        let mut e = editor(&["a"]);
        e.handle_bytes(b":q");
        e.handle_byte(ENTER);
        assert!(e.should_quit());
    }

    #[test]
    fn test_write_without_filename() {
        let mut e = editor(&["a"]);
        e.handle_bytes(b":w");
        e.handle_byte(ENTER);
        assert_eq!(e.status(), "no file name");
    }

    #[test]
    fn test_prompt_backspace_cancels() {
        let mut e = editor(&["a"]);
        e.handle_bytes(b":q");
        e.handle_byte(BACKSPACE);
        assert_eq!(e.mode(), Mode::Normal);

        e.handle_bytes(b"/ab");
        e.handle_byte(BACKSPACE);
        assert_eq!(e.mode(), Mode::Search);
        assert_eq!(e.prompt(), b"/a");
    }

    #[test]
    fn test_prompt_escape() {
        let mut e = editor(&["a"]);
        e.handle_bytes(b":wq");
        e.handle_byte(ESC);
        assert_eq!(e.mode(), Mode::Normal);
        assert!(!e.should_quit());
    }

    #[test]
    fn test_search_and_repeat() {
        let mut e = editor(&["alpha", "beta", "gamma", "beta 2"]);
        e.handle_bytes(b"/beta");
        e.handle_byte(ENTER);
        assert_eq!(e.cursor().lineno(), 1);

        e.handle_byte(b'n');
        assert_eq!(e.cursor().lineno(), 3);

        e.handle_byte(b'N');
        assert_eq!(e.cursor().lineno(), 1);
    }

    #[test]
    fn test_search_miss() {
        let mut e = editor(&["alpha", "beta", "gamma"]);
        e.handle_bytes(b"/zzz");
        e.handle_byte(ENTER);
        assert_eq!(e.cursor().lineno(), 0);
        assert_eq!(e.status(), "not found: zzz");
    }

    #[test]
    fn test_repeat_without_search() {
        let mut e = editor(&["a"]);
        e.handle_byte(b'n');
        assert_eq!(e.status(), "no previous search");
    }

    #[test]
    fn test_empty_search_repeats_last() {
        let mut e = editor(&["x", "a", "x", "a"]);
        e.handle_bytes(b"/a");
        e.handle_byte(ENTER);
        assert_eq!(e.cursor().lineno(), 1);

        e.handle_byte(b'/');
        e.handle_byte(ENTER);
        assert_eq!(e.cursor().lineno(), 3);
    }

    #[test]
    fn test_word_motion_key() {
        let mut e = editor(&["foo bar"]);
        e.handle_bytes(b"ww");
        assert_eq!(e.cursor().text_x(), 4);
    }

    #[test]
    fn test_dirty_flag() {
        let mut e = editor(&["a"]);
        e.handle_bytes(b"yy");
        assert!(!e.is_dirty());
        e.handle_byte(b'x');
        assert!(e.is_dirty());
    }
}
