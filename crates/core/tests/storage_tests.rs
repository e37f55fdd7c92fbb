// ═══════════════════════════════════════════════════════════════════
// Storage Tests — stores, TradeRepository, import/export, events
// ═══════════════════════════════════════════════════════════════════

use tradelogic_core::errors::CoreError;
use tradelogic_core::models::review::TradeReview;
use tradelogic_core::models::trade::{Trade, TradeDirection, TradeStatus};
use tradelogic_core::storage::repository::{JournalEvent, TradeRepository, STORAGE_KEY};
use tradelogic_core::storage::store::{FileStore, KeyValueStore, MemoryStore};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn sample_trade(asset: &str) -> Trade {
    let mut t = Trade::new(asset, TradeDirection::Long, 3600.0, 3580.0, 10.0);
    t.risk_amount = 200.0;
    t.position_size = 1;
    t.status = TradeStatus::Open;
    t
}

fn closed_reviewed(asset: &str) -> Trade {
    let mut t = sample_trade(asset);
    t.status = TradeStatus::Closed;
    t.pnl = Some(-360.0);
    t.exit_price = Some(3580.0);
    t.notes = Some("stopped out".into());
    let mut review = TradeReview::new(7, "Calm");
    review.add_tag("Stop too tight");
    review.chart_url = Some("https://example.com/chart".into());
    review.is_reviewed = true;
    t.review = Some(review);
    t
}

// ═══════════════════════════════════════════════════════════════════
// MemoryStore
// ═══════════════════════════════════════════════════════════════════

mod memory_store {
    use super::*;

    #[test]
    fn get_missing_is_none() {
        assert_eq!(MemoryStore::new().get("nope").unwrap(), None);
    }

    #[test]
    fn set_then_get() {
        let store = MemoryStore::new();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn clones_share_data() {
        let a = MemoryStore::new();
        let b = a.clone();
        a.set("k", "v").unwrap();
        assert_eq!(b.get("k").unwrap().as_deref(), Some("v"));
        b.remove("k").unwrap();
        assert_eq!(a.get("k").unwrap(), None);
    }

    #[test]
    fn remove_missing_is_ok() {
        assert!(MemoryStore::new().remove("nope").is_ok());
    }
}

// ═══════════════════════════════════════════════════════════════════
// FileStore
// ═══════════════════════════════════════════════════════════════════

mod file_store {
    use super::*;

    #[test]
    fn round_trip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get(STORAGE_KEY).unwrap(), None);
        store.set(STORAGE_KEY, "[]").unwrap();
        assert_eq!(store.get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join(format!("{STORAGE_KEY}.json")).exists());
    }

    #[test]
    fn overwrite_replaces_whole_value() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "a much longer first value").unwrap();
        store.set("k", "short").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("short"));
        assert!(!dir.path().join("k.json.tmp").exists());
    }

    #[test]
    fn remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
        store.remove("k").unwrap();
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileStore::open(&nested).unwrap();
        store.set("k", "v").unwrap();
        assert!(nested.join("k.json").exists());
    }

    #[test]
    fn rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", ".hidden"] {
            let err = store.set(key, "v").unwrap_err();
            assert!(matches!(err, CoreError::Storage(_)), "key {key:?}");
        }
    }

    #[test]
    fn repository_over_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = TradeRepository::new(FileStore::open(dir.path()).unwrap());
        let trades = vec![sample_trade("rb2601")];
        repo.save(&trades).unwrap();

        let reopened = TradeRepository::new(FileStore::open(dir.path()).unwrap());
        assert_eq!(reopened.load().unwrap(), trades);
    }
}

// ═══════════════════════════════════════════════════════════════════
// TradeRepository load/save
// ═══════════════════════════════════════════════════════════════════

mod repository {
    use super::*;

    #[test]
    fn absent_blob_is_empty() {
        let repo = TradeRepository::new(MemoryStore::new());
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn malformed_blob_is_empty() {
        init_tracing();
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{not json").unwrap();
        let repo = TradeRepository::new(store);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn wrong_shape_blob_is_empty() {
        let store = MemoryStore::new();
        store.set(STORAGE_KEY, r#"{"trades": []}"#).unwrap();
        assert!(TradeRepository::new(store).load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load() {
        let repo = TradeRepository::new(MemoryStore::new());
        let trades = vec![sample_trade("rb2601"), closed_reviewed("ma2601")];
        repo.save(&trades).unwrap();
        assert_eq!(repo.load().unwrap(), trades);
    }

    #[test]
    fn stored_as_single_json_array() {
        let store = MemoryStore::new();
        let repo = TradeRepository::new(store.clone());
        repo.save(&[sample_trade("rb2601")]).unwrap();
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["asset"], "rb2601");
        assert_eq!(value[0]["status"], "OPEN");
        assert_eq!(value[0]["entryPrice"], 3600.0);
    }

    #[test]
    fn update_commits_on_success() {
        let repo = TradeRepository::new(MemoryStore::new());
        let n = repo
            .update(|trades| {
                trades.push(sample_trade("rb2601"));
                Ok(trades.len())
            })
            .unwrap();
        assert_eq!(n, 1);
        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[test]
    fn update_discards_on_error() {
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("rb2601")]).unwrap();
        let result: Result<(), CoreError> = repo.update(|trades| {
            trades.clear();
            Err(CoreError::ValidationError("nope".into()))
        });
        assert!(result.is_err());
        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[test]
    fn last_writer_wins_across_handles() {
        let store = MemoryStore::new();
        let tab_a = TradeRepository::new(store.clone());
        let tab_b = TradeRepository::new(store);

        let mut seen_by_a = tab_a.load().unwrap();
        tab_b.save(&[sample_trade("from_b")]).unwrap();
        seen_by_a.push(sample_trade("from_a"));
        tab_a.save(&seen_by_a).unwrap();

        let stored = tab_b.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].asset, "from_a");
    }

    #[test]
    fn clear_removes_everything() {
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("rb2601")]).unwrap();
        repo.clear().unwrap();
        assert!(repo.load().unwrap().is_empty());
        assert_eq!(repo.store().get(STORAGE_KEY).unwrap(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Import / Export
// ═══════════════════════════════════════════════════════════════════

mod import_export {
    use super::*;

    #[test]
    fn export_then_import_is_identity() {
        let source = TradeRepository::new(MemoryStore::new());
        let trades = vec![
            sample_trade("rb2601"),
            closed_reviewed("ma2601"),
            sample_trade("ta2601"),
        ];
        source.save(&trades).unwrap();
        let json = source.export_json().unwrap();

        let target = TradeRepository::new(MemoryStore::new());
        assert_eq!(target.import_json(&json).unwrap(), 3);
        assert_eq!(target.load().unwrap(), trades);
    }

    #[test]
    fn full_precision_floats_survive_export_and_import() {
        let trades: Vec<Trade> = (1..=400)
            .map(|i| {
                let v = f64::from(i);
                let mut t = sample_trade(&format!("rb{i}"));
                t.entry_price = 3600.0 + v * 0.123456789;
                t.stop_loss_price = t.entry_price - v * 0.0987654321;
                t.risk_amount = v * 1.23456789012345;
                t.status = TradeStatus::Closed;
                t.pnl = Some(v * 0.123456789 * 36.4159265358979 - 100.0 / 3.0);
                t
            })
            .collect();

        let source = TradeRepository::new(MemoryStore::new());
        source.save(&trades).unwrap();
        let loaded = source.load().unwrap();
        for (a, b) in trades.iter().zip(&loaded) {
            assert_eq!(a.entry_price.to_bits(), b.entry_price.to_bits());
            assert_eq!(a.risk_amount.to_bits(), b.risk_amount.to_bits());
        }
        assert_eq!(loaded, trades);

        let target = TradeRepository::new(MemoryStore::new());
        target.import_json(&source.export_json().unwrap()).unwrap();
        let imported = target.load().unwrap();
        for (a, b) in trades.iter().zip(&imported) {
            assert_eq!(a.pnl.map(f64::to_bits), b.pnl.map(f64::to_bits), "{}", a.asset);
            assert_eq!(a.stop_loss_price.to_bits(), b.stop_loss_price.to_bits());
        }
        assert_eq!(imported, trades);
    }

    #[test]
    fn export_empty_is_empty_array() {
        let repo = TradeRepository::new(MemoryStore::new());
        let json = repo.export_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value, serde_json::json!([]));
    }

    #[test]
    fn import_replaces_wholesale() {
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("old1"), sample_trade("old2")]).unwrap();

        let incoming = vec![sample_trade("new")];
        repo.import_json(&serde_json::to_string(&incoming).unwrap())
            .unwrap();

        let stored = repo.load().unwrap();
        assert_eq!(stored, incoming);
    }

    #[test]
    fn import_rejects_non_array() {
        init_tracing();
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("keep")]).unwrap();
        let err = repo.import_json(r#"{"id": "1"}"#).unwrap_err();
        assert!(matches!(err, CoreError::InvalidImport(_)));
        assert_eq!(repo.load().unwrap()[0].asset, "keep");
    }

    #[test]
    fn import_rejects_invalid_json() {
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("keep")]).unwrap();
        assert!(matches!(
            repo.import_json("not json at all"),
            Err(CoreError::InvalidImport(_))
        ));
        assert_eq!(repo.load().unwrap().len(), 1);
    }

    #[test]
    fn import_rejects_bad_record_without_partial_write() {
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("keep")]).unwrap();
        let good = serde_json::to_value(sample_trade("good")).unwrap();
        let json = serde_json::json!([good, {"id": "x", "asset": "broken"}]).to_string();
        assert!(matches!(repo.import_json(&json), Err(CoreError::InvalidImport(_))));
        let stored = repo.load().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].asset, "keep");
    }

    #[test]
    fn import_rejects_duplicate_ids() {
        let repo = TradeRepository::new(MemoryStore::new());
        let t = sample_trade("dup");
        let json = serde_json::to_string(&vec![t.clone(), t]).unwrap();
        let err = repo.import_json(&json).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn preview_does_not_write() {
        let repo = TradeRepository::new(MemoryStore::new());
        let json = serde_json::to_string(&vec![sample_trade("a"), sample_trade("b")]).unwrap();
        assert_eq!(repo.preview_import(&json).unwrap().len(), 2);
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn imports_browser_backup_format() {
        let json = r#"[
          {
            "id": "1733900000000",
            "date": "2025-01-15T02:30:00.000Z",
            "asset": "rb2601",
            "direction": "LONG",
            "d1ConditionsMet": true,
            "h1ZoneType": ["level", "ma"],
            "entrySignal": "Pinbar",
            "triggerType": "Box Breakout",
            "entryPrice": 3600,
            "stopLossPrice": 3580,
            "takeProfitPrice": 0,
            "riskAmount": 200,
            "contractMultiplier": 10,
            "positionSize": 1,
            "status": "CLOSED",
            "pnl": 720,
            "exitPrice": 0,
            "review": {
              "rating": 9,
              "mood": "Calm",
              "tags": ["Perfect execution"],
              "chartUrl": "",
              "mistakes": "",
              "improvements": "",
              "isReviewed": true
            }
          }
        ]"#;
        let repo = TradeRepository::new(MemoryStore::new());
        assert_eq!(repo.import_json(json).unwrap(), 1);
        let t = &repo.load().unwrap()[0];
        assert_eq!(t.id, "1733900000000");
        assert_eq!(t.status, TradeStatus::Closed);
        assert_eq!(t.pnl, Some(720.0));
        assert_eq!(t.position_size, 1);
        assert_eq!(t.review.as_ref().unwrap().rating, 9);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Change notifications
// ═══════════════════════════════════════════════════════════════════

mod events {
    use super::*;

    #[test]
    fn save_publishes() {
        let repo = TradeRepository::new(MemoryStore::new());
        let mut rx = repo.subscribe();
        repo.save(&[sample_trade("a")]).unwrap();
        assert_eq!(rx.try_recv().unwrap(), JournalEvent::Saved { count: 1 });
    }

    #[test]
    fn clones_share_the_channel() {
        let repo = TradeRepository::new(MemoryStore::new());
        let view = repo.clone();
        let mut rx = view.subscribe();
        repo.import_json("[]").unwrap();
        repo.clear().unwrap();
        assert_eq!(rx.try_recv().unwrap(), JournalEvent::Imported { count: 0 });
        assert_eq!(rx.try_recv().unwrap(), JournalEvent::Cleared);
    }

    #[test]
    fn clear_publishes_cleared_only() {
        let repo = TradeRepository::new(MemoryStore::new());
        repo.save(&[sample_trade("a")]).unwrap();
        let mut rx = repo.subscribe();
        repo.clear().unwrap();
        assert_eq!(rx.try_recv().unwrap(), JournalEvent::Cleared);
        assert!(rx.try_recv().is_err());
        assert_eq!(repo.store().get(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn failed_write_publishes_nothing() {
        let repo = TradeRepository::new(MemoryStore::new());
        let mut rx = repo.subscribe();
        let _ = repo.import_json("{}");
        let _: Result<(), CoreError> =
            repo.update(|_| Err(CoreError::TradeNotFound("x".into())));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn no_subscribers_is_fine() {
        let repo = TradeRepository::new(MemoryStore::new());
        assert!(repo.save(&[]).is_ok());
    }
}
