//! Offset-based cursors for flat, array-like collections.
//!
//! Offsets are unambiguous, so no tie-breaking applies and the token is a
//! single integer. Two variants exist: [`OffsetCursor`] indexes into a
//! registry whose sorted id list is held in memory, and [`CountedCursor`]
//! wraps a store that reports the total match count and returns one slice at
//! a time (the graph database scheme).

use crate::error::{Error, Result};
use crate::paging::token;
use crate::stores::Registry;

/// Decodes an arity-1 offset token; absent token means the first page.
pub fn offset_from_token(page_token: Option<&str>) -> Result<u64> {
    match page_token {
        None => Ok(0),
        Some(page_token) => Ok(token::decode(page_token, 1)?[0]),
    }
}

/// Cursor over a startup-built registry of entities.
///
/// A resume index past the end of the list yields an empty final page rather
/// than an error: the token was valid when issued and the collection is
/// allowed to be shorter than it on a later snapshot.
pub struct OffsetCursor<'a, T> {
    registry: &'a Registry<T>,
    index: usize,
}

impl<'a, T> OffsetCursor<'a, T> {
    pub fn resume(registry: &'a Registry<T>, page_token: Option<&str>) -> Result<Self> {
        let index = offset_from_token(page_token)? as usize;
        Ok(Self { registry, index })
    }

    pub fn next_pair(&mut self) -> Result<Option<(&'a T, Option<String>)>> {
        let Some(id) = self.registry.ids().get(self.index) else {
            return Ok(None);
        };
        let item = self
            .registry
            .get(id)
            .ok_or_else(|| Error::Internal(format!("registry entry missing for id {id:?}")))?;
        self.index += 1;
        let next_token = (self.index < self.registry.len())
            .then(|| token::encode(&[self.index as u64]));
        Ok(Some((item, next_token)))
    }
}

/// Cursor over one pre-fetched slice of a count-reporting store.
///
/// The store answered `(total, items)` for the slice starting at `offset`;
/// tokens name the offset of the next item and stop once it reaches the
/// total.
pub struct CountedCursor<T> {
    items: std::vec::IntoIter<T>,
    offset: u64,
    total: u64,
}

impl<T> CountedCursor<T> {
    pub fn new(offset: u64, total: u64, items: Vec<T>) -> Self {
        Self {
            items: items.into_iter(),
            offset,
            total,
        }
    }

    pub fn next_pair(&mut self) -> Option<(T, Option<String>)> {
        let item = self.items.next()?;
        self.offset += 1;
        let next_token = (self.offset < self.total).then(|| token::encode(&[self.offset]));
        Some((item, next_token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn registry() -> Registry<u32> {
        let mut map = HashMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("c".to_string(), 3);
        Registry::new(map)
    }

    #[test]
    fn test_offset_cursor_walks_sorted_ids() {
        let registry = registry();
        let mut cursor = OffsetCursor::resume(&registry, None).unwrap();
        assert_eq!(cursor.next_pair().unwrap(), Some((&1, Some("1".to_string()))));
        assert_eq!(cursor.next_pair().unwrap(), Some((&2, Some("2".to_string()))));
        assert_eq!(cursor.next_pair().unwrap(), Some((&3, None)));
        assert_eq!(cursor.next_pair().unwrap(), None);
    }

    #[test]
    fn test_offset_cursor_resume() {
        let registry = registry();
        let mut cursor = OffsetCursor::resume(&registry, Some("2")).unwrap();
        assert_eq!(cursor.next_pair().unwrap(), Some((&3, None)));
    }

    #[test]
    fn test_offset_cursor_past_end_is_empty() {
        let registry = registry();
        let mut cursor = OffsetCursor::resume(&registry, Some("9")).unwrap();
        assert_eq!(cursor.next_pair().unwrap(), None);
    }

    #[test]
    fn test_offset_cursor_bad_token() {
        let registry = registry();
        assert!(matches!(
            OffsetCursor::resume(&registry, Some("1:2")),
            Err(Error::BadPageToken(_))
        ));
        assert!(matches!(
            OffsetCursor::resume(&registry, Some("x")),
            Err(Error::BadPageToken(_))
        ));
    }

    #[test]
    fn test_counted_cursor_tokens_stop_at_total() {
        let mut cursor = CountedCursor::new(3, 5, vec!["d", "e"]);
        assert_eq!(cursor.next_pair(), Some(("d", Some("4".to_string()))));
        assert_eq!(cursor.next_pair(), Some(("e", None)));
        assert_eq!(cursor.next_pair(), None);
    }

    #[test]
    fn test_counted_cursor_mid_collection_slice() {
        let mut cursor = CountedCursor::new(0, 10, vec!["a", "b"]);
        assert_eq!(cursor.next_pair(), Some(("a", Some("1".to_string()))));
        assert_eq!(cursor.next_pair(), Some(("b", Some("2".to_string()))));
        assert_eq!(cursor.next_pair(), None);
    }
}
