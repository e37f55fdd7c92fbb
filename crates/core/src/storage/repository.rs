use std::collections::HashSet;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::trade::Trade;

use super::store::KeyValueStore;

/// Key the trade collection is stored under.
pub const STORAGE_KEY: &str = "tradelogic_trades_v1";

/// Buffered change notifications per subscriber before it starts lagging.
const EVENT_CAPACITY: usize = 64;

/// Published after every successful write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEvent {
    /// The collection was rewritten; `count` trades are now stored.
    Saved { count: usize },
    /// An import replaced the collection.
    Imported { count: usize },
    /// All trades were deleted.
    Cleared,
}

/// Whole-collection persistence for trades.
///
/// The collection is one JSON array under `STORAGE_KEY`. Every write reads
/// the whole array, changes it in memory and writes the whole array back;
/// there is no per-record storage. Independent writers on the same store
/// race and the last one wins.
///
/// Clones share the notification channel, so views holding a clone can
/// `subscribe()` instead of polling.
#[derive(Debug, Clone)]
pub struct TradeRepository<S: KeyValueStore> {
    store: S,
    events: broadcast::Sender<JournalEvent>,
}

impl<S: KeyValueStore> TradeRepository<S> {
    pub fn new(store: S) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self { store, events }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Read the full collection, newest first.
    ///
    /// A missing or malformed blob reads as an empty collection.
    pub fn load(&self) -> Result<Vec<Trade>, CoreError> {
        let raw = match self.store.get(STORAGE_KEY)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };
        match serde_json::from_str::<Vec<Trade>>(&raw) {
            Ok(trades) => Ok(trades),
            Err(e) => {
                warn!(error = %e, bytes = raw.len(), "stored trades are malformed, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    /// Replace the stored collection and publish `Saved`.
    ///
    /// The store is only ever mutated by `write` (save, import) and by the
    /// `remove` in `clear`.
    pub fn save(&self, trades: &[Trade]) -> Result<(), CoreError> {
        self.write(trades)?;
        self.publish(JournalEvent::Saved { count: trades.len() });
        Ok(())
    }

    /// Read-modify-write: load, apply `f`, and save only if `f` succeeds.
    pub fn update<T, F>(&self, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(&mut Vec<Trade>) -> Result<T, CoreError>,
    {
        let mut trades = self.load()?;
        let out = f(&mut trades)?;
        self.save(&trades)?;
        Ok(out)
    }

    /// Delete every stored trade.
    pub fn clear(&self) -> Result<(), CoreError> {
        self.store.remove(STORAGE_KEY)?;
        debug!("cleared all trades");
        self.publish(JournalEvent::Cleared);
        Ok(())
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// The stored collection as a pretty-printed JSON array.
    pub fn export_json(&self) -> Result<String, CoreError> {
        let trades = self.load()?;
        serde_json::to_string_pretty(&trades)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trades to JSON: {e}")))
    }

    /// Parse and validate an import file without writing anything.
    /// Returns the trades it would store.
    pub fn preview_import(&self, json: &str) -> Result<Vec<Trade>, CoreError> {
        parse_import(json)
    }

    /// Replace the whole collection with the contents of an import file.
    ///
    /// Destructive: nothing is merged. If the file is rejected the stored
    /// collection is untouched. Returns the number of trades imported.
    pub fn import_json(&self, json: &str) -> Result<usize, CoreError> {
        let trades = parse_import(json).inspect_err(|e| warn!(error = %e, "import rejected"))?;
        self.write(&trades)?;
        let count = trades.len();
        debug!(count, "imported trades");
        self.publish(JournalEvent::Imported { count });
        Ok(count)
    }

    // ── Notifications ───────────────────────────────────────────────

    /// Receive a `JournalEvent` after each write made through this
    /// repository or any of its clones.
    pub fn subscribe(&self) -> broadcast::Receiver<JournalEvent> {
        self.events.subscribe()
    }

    // ── Internal ────────────────────────────────────────────────────

    fn write(&self, trades: &[Trade]) -> Result<(), CoreError> {
        let json = serde_json::to_string(trades)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trades: {e}")))?;
        self.store.set(STORAGE_KEY, &json)?;
        debug!(count = trades.len(), "saved trades");
        Ok(())
    }

    fn publish(&self, event: JournalEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}

fn parse_import(json: &str) -> Result<Vec<Trade>, CoreError> {
    let value: serde_json::Value = serde_json::from_str(json)
        .map_err(|e| CoreError::InvalidImport(format!("not valid JSON: {e}")))?;
    if !value.is_array() {
        return Err(CoreError::InvalidImport("expected a list of trade records".into()));
    }
    let trades: Vec<Trade> = serde_json::from_value(value)
        .map_err(|e| CoreError::InvalidImport(format!("invalid trade record: {e}")))?;

    let mut seen = HashSet::new();
    if let Some(dup) = trades.iter().find(|t| !seen.insert(t.id.as_str())) {
        return Err(CoreError::InvalidImport(format!("duplicate trade id '{}'", dup.id)));
    }
    Ok(trades)
}
