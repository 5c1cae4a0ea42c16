/// Snapshot of the whole working expression `left = right`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: u64,
    pub plain_text: String,
    pub markup_text: String,
}

/// Append-only list of intermediate expressions for one round.
#[derive(Clone, Debug, Default)]
pub struct History {
    entries: Vec<HistoryEntry>,
    next_id: u64,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the history with a single starting entry.
    pub fn seed(&mut self, plain_text: String, markup_text: String) {
        self.entries.clear();
        self.push(plain_text, markup_text);
    }

    /// Append unless the markup equals the previous entry's.
    pub fn record_if_changed(&mut self, plain_text: String, markup_text: String) -> bool {
        if self
            .entries
            .last()
            .is_some_and(|last| last.markup_text == markup_text)
        {
            return false;
        }
        self.push(plain_text, markup_text);
        true
    }

    fn push(&mut self, plain_text: String, markup_text: String) {
        self.next_id += 1;
        self.entries.push(HistoryEntry {
            id: self.next_id,
            plain_text,
            markup_text,
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
