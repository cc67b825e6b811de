use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::buffer::Buffer;

pub struct FileIO;

impl FileIO {
    // ファイルを読み込んでバッファを作る
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Option<Buffer>> {
        Ok(Self::read_lines(path)?.map(Buffer::load))
    }

    pub fn read_lines<P: AsRef<Path>>(path: P) -> io::Result<Option<Vec<Vec<u8>>>> {
        match std::fs::read(path) {
            Ok(content) => Ok(Some(Self::split_lines(&content))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    // `\n` で分割する。末尾の改行は空行を作らず、各行末の `\r` は取り除く
    pub fn split_lines(content: &[u8]) -> Vec<Vec<u8>> {
        if content.is_empty() {
            return Vec::new();
        }
        let body = content.strip_suffix(b"\n").unwrap_or(content);
        body.split(|&b| b == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line).to_vec())
            .collect()
    }

    // 全行をそれぞれ改行付きで書き出す
    pub fn save<P: AsRef<Path>>(path: P, buffer: &Buffer) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        for (_, text) in buffer.iter() {
            file.write_all(text)?;
            file.write_all(b"\n")?;
        }
        file.flush()?;
        Ok(())
    }
}
