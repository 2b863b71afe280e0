use crate::error::{Error, Result};
use log::debug;

/// number of distinct tags a 32 bit mask can tell apart
pub const FILTER_CAPACITY: usize = 32;

/// Maps symbolic tags to bits of the category and filter masks.
///
/// Bits are handed out in registration order starting at bit 0. The registry
/// is meant to live as long as the application and to be shared by reference
/// with whatever builds bodies.
#[derive(Clone, Debug, Default)]
pub struct FilterRegistry {
    tags: Vec<String>,
}

impl FilterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the mask bit of `tag`, registering it first if it is new.
    pub fn register(&mut self, tag: &str) -> Result<u32> {
        if let Some(bit) = self.bit(tag) {
            return Ok(bit);
        }
        if self.tags.len() >= FILTER_CAPACITY {
            return Err(Error::FilterCapacity {
                tag: tag.to_string(),
                capacity: FILTER_CAPACITY,
            });
        }
        self.tags.push(tag.to_string());
        let bit = 1u32 << (self.tags.len() - 1);
        debug!("registered filter tag {:?} as bit {:#x}", tag, bit);
        Ok(bit)
    }

    /// mask of an already registered tag
    pub fn bit(&self, tag: &str) -> Option<u32> {
        self.tags
            .iter()
            .position(|t| t == tag)
            .map(|index| 1u32 << index)
    }

    /// Combined mask of `tags`, registering the ones not seen before.
    pub fn mask<'a, I>(&mut self, tags: I) -> Result<u32>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut mask = 0u32;
        for tag in tags {
            mask |= self.register(tag)?;
        }
        Ok(mask)
    }

    /// tag registered at bit position `index` (0..32)
    pub fn tag(&self, index: u32) -> Option<&str> {
        self.tags.get(index as usize).map(String::as_str)
    }

    /// all tags whose bit is set in `mask`, lowest bit first
    pub fn tags_of(&self, mask: u32) -> Vec<&str> {
        self.tags
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1u32 << index) != 0)
            .map(|(_, t)| t.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
