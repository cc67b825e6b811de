pub mod buffer;
pub mod command;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod error;
pub mod event_loop;
pub mod file_io;
pub mod input;
pub mod logger;
pub mod mode;
pub mod screen;
pub mod search;
pub mod terminal;

// 画面レイアウト定数
pub const STATUS_BAR_HEIGHT: u16 = 1;
