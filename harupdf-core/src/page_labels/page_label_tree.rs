//! The `/PageLabels` number tree

use std::collections::BTreeMap;

use crate::objects::{Dictionary, Object};
use crate::page_labels::PageLabel;

/// Label ranges keyed by the index of their first page.
#[derive(Debug, Clone, Default)]
pub struct PageLabelTree {
    ranges: BTreeMap<usize, PageLabel>,
}

impl PageLabelTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any range starting at the same page.
    pub fn add_range(&mut self, page_index: usize, label: PageLabel) {
        self.ranges.insert(page_index, label);
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Displayed label of a page, if a range covers it.
    pub fn label(&self, page_index: usize) -> Option<String> {
        self.ranges
            .range(..=page_index)
            .next_back()
            .map(|(&start, label)| label.format_label((page_index - start) as u32))
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut nums = Vec::with_capacity(self.ranges.len() * 2);
        for (&start, label) in &self.ranges {
            nums.push(Object::from(start));
            nums.push(Object::from(label.to_dict()));
        }
        let mut dict = Dictionary::new();
        dict.set("Nums", Object::Array(nums));
        dict
    }
}
