use crate::error::CommandError;

// 1 文字コマンド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // `w`
    Write,
    // `q`
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    // 入力全体が数値なら 1-based の行番号
    GoToLine(usize),
    // 認識できない文字があればそこで打ち切り、それより前は実行する
    Run {
        actions: Vec<Action>,
        error: Option<CommandError>,
    },
}

pub struct CommandParser;

impl CommandParser {
    // 先頭の `:` を除いたコマンド入力を解釈する
    pub fn parse(input: &[u8]) -> Command {
        if let Ok(text) = std::str::from_utf8(input)
            && !text.is_empty()
            && text.bytes().all(|b| b.is_ascii_digit())
            && let Ok(line) = text.parse::<usize>()
        {
            return Command::GoToLine(line);
        }

        let mut actions = Vec::new();
        for &b in input {
            match b {
                b'w' => actions.push(Action::Write),
                b'q' => actions.push(Action::Quit),
                other => {
                    return Command::Run {
                        actions,
                        error: Some(CommandError::UnknownCommand(other as char)),
                    };
                }
            }
        }
        Command::Run {
            actions,
            error: None,
        }
    }
}
