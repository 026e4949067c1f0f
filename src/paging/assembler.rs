//! Bounded page assembly.
//!
//! A page is full either at the requested item count or once the accumulated
//! approximate serialized size reaches the configured byte budget; the count
//! alone cannot bound a response whose records carry variable-length payloads
//! (embedded base sequences). The response token is whatever token the cursor
//! attached to the last consumed item, so resumption picks up exactly where
//! assembly stopped.

use serde::Serialize;

use crate::error::{Error, Result};

pub struct PageAssembler<T> {
    items: Vec<T>,
    next_page_token: Option<String>,
    page_size: usize,
    max_bytes: usize,
    approx_bytes: usize,
}

impl<T: Serialize> PageAssembler<T> {
    /// Fails with `BadPageSize` before any iteration begins.
    pub fn new(page_size: i32, max_bytes: usize) -> Result<Self> {
        if page_size <= 0 {
            return Err(Error::BadPageSize(page_size));
        }
        Ok(Self {
            items: Vec::new(),
            next_page_token: None,
            page_size: page_size as usize,
            max_bytes,
            approx_bytes: 0,
        })
    }

    /// Adds a record and remembers its resumption token.
    pub fn push(&mut self, item: T, next_page_token: Option<String>) -> Result<()> {
        let size = serde_json::to_string(&item)
            .map_err(|e| Error::Internal(format!("failed to serialize record: {e}")))?
            .len();
        if self.items.is_empty() && size > self.max_bytes {
            // A single record can exceed the whole budget; it still ships on
            // its own page, otherwise the iteration could never pass it.
            tracing::warn!(
                record_bytes = size,
                budget_bytes = self.max_bytes,
                "single record exceeds the response size budget"
            );
        }
        self.approx_bytes += size;
        self.items.push(item);
        self.next_page_token = next_page_token;
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.page_size || self.approx_bytes >= self.max_bytes
    }

    pub fn into_page(self) -> (Vec<T>, Option<String>) {
        (self.items, self.next_page_token)
    }
}
