//! Operation log replay
//!
//! Applies logged operations, in order, onto a record list.
//!
//! An insert or update is a marker line followed by an item line and its
//! brand lines. The payload is only complete once the next marker (or the
//! end of the log) is reached, so replay buffers it as the pending
//! operation and commits on that transition:
//!
//! ```text
//!            [insert]            ITEM| / BRAND|
//!   Idle ─────────────▶ Insert ◀───────────────┐
//!    ▲  [update]             │ next marker     │
//!    ├──────────────▶ Update ┼─────────────────┘
//!    │  [delete]<code>       │ or end of log: commit
//!    └───────────────────────┘
//! ```
//!
//! Deletes carry no payload and apply immediately.

use crate::error::{Result, StoreError};
use crate::record::codec::{self, BRAND_PREFIX, ITEM_PREFIX};
use crate::record::Item;

use super::entry::Marker;

/// Result of a replay
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Number of operations replayed (markers seen)
    pub operations_replayed: usize,

    /// Items appended by inserts
    pub inserted: usize,

    /// Items replaced (or added) by updates
    pub updated: usize,

    /// Items removed by deletes
    pub deleted: usize,
}

/// Replay `lines` onto `items`
///
/// Any line that does not fit the grammar above is `LogCorruption`; the log
/// is only ever written by this crate, so nothing is partially recovered.
pub fn replay<I, S>(items: &mut Vec<Item>, lines: I) -> Result<ReplayResult>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut replayer = Replayer {
        items,
        pending: Pending::Idle,
        result: ReplayResult::default(),
    };

    for line in lines {
        replayer.feed(line.as_ref())?;
    }

    replayer.finish()
}

/// Operation awaiting its commit
enum Pending {
    Idle,
    Insert(Option<Item>),
    Update(Option<Item>),
}

struct Replayer<'a> {
    items: &'a mut Vec<Item>,
    pending: Pending,
    result: ReplayResult,
}

impl Replayer<'_> {
    fn feed(&mut self, line: &str) -> Result<()> {
        if line.trim().is_empty() {
            return Ok(());
        }

        if let Some(marker) = Marker::parse(line)? {
            self.commit()?;
            self.result.operations_replayed += 1;
            match marker {
                Marker::Insert => self.pending = Pending::Insert(None),
                Marker::Update => self.pending = Pending::Update(None),
                Marker::Delete { code } => self.delete(code),
            }
            return Ok(());
        }

        if line.starts_with(ITEM_PREFIX) {
            let item = codec::decode_item_line(line).map_err(corrupt)?;
            let slot = self.payload_slot(line)?;
            if slot.is_some() {
                return Err(StoreError::LogCorruption(format!(
                    "second item line in one operation: {:?}",
                    line
                )));
            }
            *slot = Some(item);
            return Ok(());
        }

        if line.starts_with(BRAND_PREFIX) {
            let brand = codec::decode_brand_line(line).map_err(corrupt)?;
            match self.payload_slot(line)? {
                Some(item) => item.brands.push(brand),
                None => {
                    return Err(StoreError::LogCorruption(format!(
                        "brand line before item line: {:?}",
                        line
                    )))
                }
            }
            return Ok(());
        }

        Err(StoreError::LogCorruption(format!("unrecognised line: {:?}", line)))
    }

    /// The pending operation's item buffer
    fn payload_slot(&mut self, line: &str) -> Result<&mut Option<Item>> {
        match &mut self.pending {
            Pending::Insert(slot) | Pending::Update(slot) => Ok(slot),
            Pending::Idle => Err(StoreError::LogCorruption(format!(
                "record line outside an insert or update: {:?}",
                line
            ))),
        }
    }

    /// Apply the pending operation, returning to Idle
    fn commit(&mut self) -> Result<()> {
        match std::mem::replace(&mut self.pending, Pending::Idle) {
            Pending::Idle => {}
            Pending::Insert(Some(item)) => {
                self.items.push(item);
                self.result.inserted += 1;
            }
            Pending::Update(Some(item)) => {
                self.upsert(item);
                self.result.updated += 1;
            }
            Pending::Insert(None) | Pending::Update(None) => {
                return Err(StoreError::LogCorruption(
                    "operation marker without a record".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Replace every item sharing `item.code`, or append it if none does
    ///
    /// An update of an absent code adds the item rather than dropping it,
    /// matching `Engine::update`, which keeps the item in memory either way.
    fn upsert(&mut self, item: Item) {
        let mut replaced = false;
        for existing in self.items.iter_mut().filter(|i| i.code == item.code) {
            *existing = item.clone();
            replaced = true;
        }
        if !replaced {
            self.items.push(item);
        }
    }

    fn delete(&mut self, code: i64) {
        let before = self.items.len();
        self.items.retain(|item| item.code != code);
        self.result.deleted += before - self.items.len();
    }

    fn finish(mut self) -> Result<ReplayResult> {
        self.commit()?;
        Ok(self.result)
    }
}

fn corrupt(err: StoreError) -> StoreError {
    StoreError::LogCorruption(err.to_string())
}
