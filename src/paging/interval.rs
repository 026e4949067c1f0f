//! The resumable interval iterator.
//!
//! Pages of an interval search are served by independent, re-executed range
//! queries, so the iterator cannot rely on an in-memory offset. Instead it
//! re-derives its position from an `anchor:skip` token: re-open the source at
//! `[anchor, query.end)` and discard the `skip` leading records that share the
//! anchor coordinate. The skip counter is what disambiguates runs of records
//! at the same coordinate (e.g. several calls at one locus).

use crate::error::{Error, Result};
use crate::paging::{Positioned, token};

/// The coordinate bounds of a search, plus the token of the previous page if
/// this request resumes one.
#[derive(Debug, Clone)]
pub struct IntervalQuery {
    pub start: u64,
    pub end: u64,
    pub page_token: Option<String>,
}

/// Iterator over `(record, next_page_token)` pairs for one page request.
///
/// `next_pair` keeps a one-record lookahead: the token emitted with a record
/// names the position of the record that follows it, so resuming from that
/// token yields exactly the continuation of the uninterrupted sequence.
#[derive(Debug)]
pub struct IntervalCursor<R, I> {
    iter: I,
    current: Option<R>,
    anchor: u64,
    skip: u64,
}

impl<R, I> IntervalCursor<R, I>
where
    R: Positioned,
    I: Iterator<Item = Result<R>>,
{
    /// Positions a cursor for `query`, re-synchronizing from its page token
    /// if one is present.
    ///
    /// `open` re-runs the underlying range query over `[start, end)`; it is
    /// called with the original bounds for a first page, and with
    /// `[anchor, end)` on resumption so already-delivered data is not
    /// re-scanned.
    pub fn resume<F>(query: &IntervalQuery, open: F) -> Result<Self>
    where
        F: FnOnce(u64, u64) -> Result<I>,
    {
        match query.page_token.as_deref() {
            None => {
                let mut iter = open(query.start, query.end)?;
                let current = iter.next().transpose()?;
                // Sources report records overlapping the range, so the first
                // record may start before the query does; the anchor is
                // clamped to the query start and the initial run is resumed
                // by blind skip count (see below).
                let anchor = match &current {
                    Some(record) => query.start.max(record.start_position()),
                    None => query.start,
                };
                Ok(Self {
                    iter,
                    current,
                    anchor,
                    skip: 0,
                })
            }
            Some(page_token) => {
                let fields = token::decode(page_token, 2)?;
                let (anchor, skip) = (fields[0], fields[1]);
                let mut iter = open(anchor, query.end)?;
                let mut current = iter.next().transpose()?;

                if anchor == query.start {
                    // Still inside the run encountered at the very start of
                    // the query: the skipped records were delivered by
                    // earlier pages and carry no usable key ordering against
                    // the anchor, so no coordinate check applies.
                    for _ in 0..skip {
                        if current.is_none() {
                            return Err(Self::stale_token());
                        }
                        current = iter.next().transpose()?;
                    }
                } else {
                    // The re-run query may hand back records that start
                    // before the anchor (overlapping intervals); those were
                    // delivered on earlier pages.
                    while current
                        .as_ref()
                        .is_some_and(|r| r.start_position() < anchor)
                    {
                        current = iter.next().transpose()?;
                    }
                    for _ in 0..skip {
                        match &current {
                            Some(record) if record.start_position() == anchor => {
                                current = iter.next().transpose()?;
                            }
                            _ => return Err(Self::stale_token()),
                        }
                    }
                }

                // The token was only ever issued because a following record
                // existed; if it is gone the view has changed under us.
                if current.is_none() {
                    return Err(Self::stale_token());
                }

                Ok(Self {
                    iter,
                    current,
                    anchor,
                    skip,
                })
            }
        }
    }

    fn stale_token() -> Error {
        Error::BadPageToken("token is inconsistent with the current data".to_string())
    }

    /// Emits the next record together with the page token that resumes the
    /// iteration immediately after it, or `None` once exhausted.
    pub fn next_pair(&mut self) -> Result<Option<(R, Option<String>)>> {
        let Some(record) = self.current.take() else {
            return Ok(None);
        };
        let lookahead = self.iter.next().transpose()?;
        let next_token = match &lookahead {
            None => None,
            Some(next) => {
                let key = next.start_position();
                if key > self.anchor {
                    self.anchor = key;
                    self.skip = 0;
                } else {
                    self.skip += 1;
                }
                Some(token::encode(&[self.anchor, self.skip]))
            }
        };
        self.current = lookahead;
        Ok(Some((record, next_token)))
    }
}
