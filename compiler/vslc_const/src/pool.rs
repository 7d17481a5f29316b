// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use itertools::Itertools;

/// Pool index is used to index items in the string pool.
pub type PoolIdx = usize;

/// Label prefix under which pooled strings are emitted in the data section.
pub const STRING_LABEL_PREFIX: &str = ".STRING";

/// Label of the format string used to print integers.
pub const INTEGER_FORMAT_LABEL: &str = ".INTEGER";

/// Append-only store of the string literals of a program.
///
/// Every literal gets its own entry, even when the same text occurs more
/// than once.
#[derive(Debug, Default, Clone)]
pub struct StringPool {
    entries: Vec<String>,
}

impl StringPool {
    pub fn insert(&mut self, value: String) -> PoolIdx {
        let idx = self.entries.len();
        self.entries.push(value);
        idx
    }

    pub fn get(&self, index: PoolIdx) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter_enumerated(&self) -> impl Iterator<Item = (PoolIdx, &str)> {
        self.entries.iter().map(String::as_str).enumerate()
    }

    /// Assembler label of the entry at `index`.
    pub fn label(index: PoolIdx) -> String {
        format!("{STRING_LABEL_PREFIX}{index}")
    }

    /// Renders the data section: the integer format descriptor, one
    /// `.string` directive per entry in insertion order, and the export of
    /// the program entry point.
    pub fn data_section(&self) -> String {
        let mut lines = vec![
            String::from(".data"),
            format!("{INTEGER_FORMAT_LABEL}: .string \"%d \""),
        ];
        lines.extend(
            self.iter_enumerated()
                .map(|(idx, text)| format!("{}: .string {text}", Self::label(idx))),
        );
        lines.push(String::from(".globl main"));
        lines.iter().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_deduplication() {
        let mut pool = StringPool::default();

        let a1 = pool.insert("\"a\"".into());
        let b = pool.insert("\"b\"".into());
        let a2 = pool.insert("\"a\"".into());

        assert_eq!((a1, b, a2), (0, 1, 2));
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(2), Some("\"a\""));
    }

    #[test]
    fn test_data_section_lists_entries_in_order() {
        let mut pool = StringPool::default();
        pool.insert("\"a\"".into());
        pool.insert("\"b\"".into());
        pool.insert("\"a\"".into());

        let data = pool.data_section();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(
            lines,
            vec![
                ".data",
                ".INTEGER: .string \"%d \"",
                ".STRING0: .string \"a\"",
                ".STRING1: .string \"b\"",
                ".STRING2: .string \"a\"",
                ".globl main",
            ]
        );
    }

    #[test]
    fn test_empty_pool_still_has_integer_format() {
        let pool = StringPool::default();
        assert!(pool.is_empty());
        assert!(pool.data_section().contains(".INTEGER: .string \"%d \""));
        assert_eq!(pool.get(0), None);
    }
}
