//! Testes de integração para os wrappers de memoização.

use std::cell::Cell;
use std::fmt;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use serde_json::Value;
use tempfile::TempDir;

use ttlmemo::cache::Loaded;
use ttlmemo::types::config::CacheConfig;
use ttlmemo::{CallArgs, ErrorReporter, ForceRefresh, Memo, NoopReporter, TtlFileCache, TtlMemo};

/// Guarda as falhas reportadas.
#[derive(Default)]
struct RecordingReporter {
    captured: Mutex<Vec<(String, String)>>,
}

impl ErrorReporter for RecordingReporter {
    fn capture(&self, operation: &str, error: &dyn fmt::Display) {
        self.captured
            .lock()
            .unwrap()
            .push((operation.to_string(), error.to_string()));
    }
}

fn config_for(dir: &TempDir) -> CacheConfig {
    CacheConfig {
        storage_folder: Some(dir.path().to_path_buf()),
        ttl_secs: 300,
        ..CacheConfig::default()
    }
}

/// Cliente fictício cujo método é memoizado.
struct TideClient {
    endpoint: String,
    calls: Cell<u32>,
    fail: Cell<bool>,
    memo: TtlMemo,
}

impl TideClient {
    fn new(endpoint: &str, memo: TtlMemo) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            calls: Cell::new(0),
            fail: Cell::new(false),
            memo,
        }
    }

    fn heights(&self, station: &str) -> anyhow::Result<Vec<f64>> {
        let args = CallArgs::new().arg(&self.endpoint)?.arg(station)?;
        self.memo.call(&args, || {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                Err(anyhow!("{} indisponível", self.endpoint))
            } else {
                Ok(vec![1.2, 3.4, 2.8])
            }
        })
    }
}

mod ttl_memo_tests {
    use super::*;

    #[test]
    fn test_called_once_within_ttl() {
        let dir = TempDir::new().unwrap();
        let memo = TtlMemo::from_config(&config_for(&dir), "heights").unwrap().method();
        let client = TideClient::new("https://tides.example", memo);

        let first = client.heights("point-atkinson").unwrap();
        let second = client.heights("point-atkinson").unwrap();

        assert_eq!(first, second);
        assert_eq!(client.calls.get(), 1);
    }

    #[test]
    fn test_receiver_is_not_part_of_key() {
        let dir = TempDir::new().unwrap();
        let config = config_for(&dir);
        let a = TideClient::new("https://a.example", TtlMemo::from_config(&config, "heights").unwrap().method());
        let b = TideClient::new("https://b.example", TtlMemo::from_config(&config, "heights").unwrap().method());

        a.heights("point-atkinson").unwrap();
        b.heights("point-atkinson").unwrap();

        assert_eq!(a.calls.get(), 1);
        assert_eq!(b.calls.get(), 0);
    }

    #[test]
    fn test_failure_serves_stale_and_reports() {
        let dir = TempDir::new().unwrap();
        let reporter = Arc::new(RecordingReporter::default());
        let memo = TtlMemo::from_config(&config_for(&dir), "heights")
            .unwrap()
            .method()
            .with_reporter(reporter.clone());
        let client = TideClient::new("https://tides.example", memo);

        let fresh = client.heights("point-atkinson").unwrap();

        // Expira a entrada para forçar a recomputação
        assert_eq!(client.memo.cache().unwrap().expire_all(), 1);
        std::thread::sleep(std::time::Duration::from_millis(5));
        client.fail.set(true);

        let stale = client.heights("point-atkinson").unwrap();
        assert_eq!(stale, fresh);
        assert_eq!(client.calls.get(), 2);

        let captured = reporter.captured.lock().unwrap();
        assert_eq!(captured.len(), 1);
        assert_eq!(captured[0].0, "heights");
        assert!(captured[0].1.contains("indisponível"));
    }

    #[test]
    fn test_failure_without_stale_data_propagates() {
        let dir = TempDir::new().unwrap();
        let memo = TtlMemo::from_config(&config_for(&dir), "heights")
            .unwrap()
            .with_reporter(Arc::new(NoopReporter));
        let client = TideClient::new("https://tides.example", memo);
        client.fail.set(true);

        let err = client.heights("point-atkinson").unwrap_err();
        assert!(err.to_string().contains("indisponível"));
    }

    #[test]
    fn test_empty_result_deletes_entry() {
        let dir = TempDir::new().unwrap();
        let memo = TtlMemo::from_config(&config_for(&dir), "search")
            .unwrap()
            .with_force_refresh(true);
        let args = CallArgs::new().arg("english bay").unwrap();
        let key = memo.key_for(&args);

        let first: anyhow::Result<Vec<String>> = memo.call(&args, || Ok(vec!["hit".to_string()]));
        assert_eq!(first.unwrap(), vec!["hit".to_string()]);
        assert!(memo.cache().unwrap().load::<Value>(&key).data.is_some());

        let second: anyhow::Result<Vec<String>> = memo.call(&args, || Ok(Vec::new()));
        assert!(second.unwrap().is_empty());

        let loaded: Loaded<Value> = memo.cache().unwrap().load(&key);
        assert!(loaded.data.is_none());
        assert!(loaded.is_expired);
    }

    #[test]
    fn test_disabled_by_config() {
        let memo = TtlMemo::from_config(&CacheConfig::default(), "heights").unwrap();
        let client = TideClient::new("https://tides.example", memo);

        client.heights("point-atkinson").unwrap();
        client.heights("point-atkinson").unwrap();
        assert_eq!(client.calls.get(), 2);
    }

    #[test]
    fn test_dynamic_force_refresh_from_flag() {
        let dir = TempDir::new().unwrap();
        let refresh = Arc::new(Mutex::new(false));
        let source = refresh.clone();
        let cache = TtlFileCache::new(dir.path(), Some("counter"), Some(300)).unwrap();
        let memo = TtlMemo::new("counter", Some(cache))
            .with_force_refresh(ForceRefresh::dynamic(move || *source.lock().unwrap()));
        let args = CallArgs::new();
        let counter = Cell::new(0);
        let next = || -> anyhow::Result<i32> {
            counter.set(counter.get() + 1);
            Ok(counter.get())
        };

        assert_eq!(memo.call(&args, next).unwrap(), 1);
        assert_eq!(memo.call(&args, next).unwrap(), 1);
        *refresh.lock().unwrap() = true;
        assert_eq!(memo.call(&args, next).unwrap(), 2);
    }
}

mod memo_tests {
    use super::*;

    #[test]
    fn test_memo_bounded_by_capacity() {
        let mut memo: Memo<String> = Memo::from_config(&CacheConfig {
            memory_capacity: 2,
            ..CacheConfig::default()
        });

        for i in 0..5 {
            let args = CallArgs::new().arg(&i).unwrap();
            let value: anyhow::Result<String> = memo.call(&args, || Ok(format!("v{}", i)));
            assert_eq!(value.unwrap(), format!("v{}", i));
        }

        let stats = memo.cache().stats();
        assert_eq!(stats.len, 2);
        assert_eq!(stats.capacity, 2);
    }

    #[test]
    fn test_memo_method_mode() {
        let mut memo: Memo<i32> = Memo::new(10).method();
        let a = CallArgs::new().arg("self-a").unwrap().arg(&1).unwrap();
        let b = CallArgs::new().arg("self-b").unwrap().arg(&1).unwrap();

        let first: anyhow::Result<i32> = memo.call(&a, || Ok(10));
        let second: anyhow::Result<i32> = memo.call(&b, || Ok(20));
        assert_eq!(first.unwrap(), 10);
        assert_eq!(second.unwrap(), 10);
    }
}
