// 削除された行のスロットは再利用される
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LineId(usize);

// 先頭の番兵行。常に存在し、描画も保存もされない
pub const TOP: LineId = LineId(0);

#[derive(Debug, Clone, Default)]
pub struct Line {
    text: Vec<u8>,
    prev: Option<LineId>,
    next: Option<LineId>,
}

impl Line {
    fn new(text: Vec<u8>) -> Self {
        Self {
            text,
            prev: None,
            next: None,
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

// 双方向リンクの行リスト
pub struct Buffer {
    slots: Vec<Option<Line>>,
    free: Vec<LineId>,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    // 空行を 1 行だけ持つバッファ
    pub fn new() -> Self {
        Self::load(Vec::<Vec<u8>>::new())
    }

    // 行のリストからバッファを組み立てる
    pub fn load<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        let mut buffer = Self {
            slots: vec![Some(Line::default())],
            free: Vec::new(),
        };

        let mut last = TOP;
        for text in lines {
            // 番兵からつなげていくだけなので失敗しない
            if let Some(id) = buffer.insert_after(last, text.into()) {
                last = id;
            }
        }
        if buffer.is_empty() {
            buffer.insert_after(TOP, Vec::new());
        }
        buffer
    }

    // 番兵を除いた全行の内容 (保存用)
    pub fn serialize(&self) -> Vec<Vec<u8>> {
        self.iter().map(|(_, text)| text.to_vec()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LineId, &[u8])> + '_ {
        std::iter::successors(self.first(), |&id| self.next(id)).map(|id| (id, self.text(id)))
    }

    pub fn first(&self) -> Option<LineId> {
        self.next(TOP)
    }

    pub fn get(&self, id: LineId) -> Option<&Line> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn get_mut(&mut self, id: LineId) -> Option<&mut Line> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn contains(&self, id: LineId) -> bool {
        self.get(id).is_some()
    }

    // 行の内容。削除済みの ID には空を返す
    pub fn text(&self, id: LineId) -> &[u8] {
        self.get(id).map(Line::text).unwrap_or(&[])
    }

    pub fn line_len(&self, id: LineId) -> usize {
        self.get(id).map(Line::len).unwrap_or(0)
    }

    pub fn set_text(&mut self, id: LineId, text: Vec<u8>) {
        if id == TOP {
            return;
        }
        if let Some(line) = self.get_mut(id) {
            line.text = text;
        }
    }

    pub fn text_mut(&mut self, id: LineId) -> Option<&mut Vec<u8>> {
        if id == TOP {
            return None;
        }
        self.get_mut(id).map(|line| &mut line.text)
    }

    pub fn next(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(|line| line.next)
    }

    // 直前の行。最初の実行に対しては番兵 `TOP` を返す
    pub fn prev(&self, id: LineId) -> Option<LineId> {
        self.get(id).and_then(|line| line.prev)
    }

    // 直前の実行。番兵は含めない
    pub fn prev_line(&self, id: LineId) -> Option<LineId> {
        self.prev(id).filter(|&prev| prev != TOP)
    }

    // `anchor` の直後に新しい行をつなぐ
    pub fn insert_after(&mut self, anchor: LineId, text: Vec<u8>) -> Option<LineId> {
        let next = self.get(anchor)?.next;

        let mut line = Line::new(text);
        line.prev = Some(anchor);
        line.next = next;

        let id = match self.free.pop() {
            Some(id) => {
                self.slots[id.0] = Some(line);
                id
            }
            None => {
                self.slots.push(Some(line));
                LineId(self.slots.len() - 1)
            }
        };

        if let Some(anchor_line) = self.get_mut(anchor) {
            anchor_line.next = Some(id);
        }
        if let Some(next) = next
            && let Some(next_line) = self.get_mut(next)
        {
            next_line.prev = Some(id);
        }
        Some(id)
    }

    // 行を切り離して内容を返す
    pub fn remove(&mut self, target: LineId) -> Option<Vec<u8>> {
        if target == TOP {
            return None;
        }
        let line = self.slots.get_mut(target.0)?.take()?;

        if let Some(prev) = line.prev
            && let Some(prev_line) = self.get_mut(prev)
        {
            prev_line.next = line.next;
        }
        if let Some(next) = line.next
            && let Some(next_line) = self.get_mut(next)
        {
            next_line.prev = line.prev;
        }
        self.free.push(target);
        Some(line.text)
    }

    pub fn nth(&self, n: usize) -> Option<LineId> {
        self.iter().nth(n).map(|(id, _)| id)
    }

    // 行数。キャッシュしていないので先頭からたどる
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }

    // 全ての next / prev が対応しているか
    pub fn is_consistent(&self) -> bool {
        let mut prev = TOP;
        let mut current = self.next(TOP);
        let mut steps = 0;
        while let Some(id) = current {
            if self.prev(id) != Some(prev) {
                return false;
            }
            steps += 1;
            // 循環していれば生存スロット数を超える
            if steps > self.slots.len() {
                return false;
            }
            prev = id;
            current = self.next(id);
        }
        true
    }
}
