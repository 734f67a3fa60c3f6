use std::sync::{Arc, Mutex};

use speculate2::speculate;
use techtrack::models::*;
use techtrack::store::{KeyValueStore, LocalStorage, MemoryStore, SqliteStore};
use techtrack::{StorageError, TechnologyRepository};

fn migrated_memory_store() -> SqliteStore {
    let store = SqliteStore::open_memory().expect("Failed to open in-memory database");
    store.migrate().expect("Failed to run migrations");
    store
}

speculate! {
    describe "sqlite store" {
        before {
            let store = migrated_memory_store();
        }

        it "returns None for a missing key" {
            assert_eq!(store.get("technologies").expect("Query failed"), None);
        }

        it "overwrites the whole value on set" {
            store.set("technologies", "[1,2,3]").expect("Write failed");
            store.set("technologies", "[4]").expect("Write failed");
            assert_eq!(store.get("technologies").expect("Query failed"), Some("[4]".to_string()));
            assert_eq!(store.keys().expect("Query failed"), vec!["technologies"]);
        }

        it "removes a key" {
            store.set("theme", "\"dark\"").expect("Write failed");
            store.remove("theme").expect("Delete failed");
            assert_eq!(store.get("theme").expect("Query failed"), None);
        }

        it "keeps data across reopening the file" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("techtrack.db");

            {
                let store = SqliteStore::open(&path).expect("Failed to open");
                store.migrate().expect("Failed to migrate");
                let mut repo = TechnologyRepository::open(LocalStorage::new(store));
                repo.update_status(&TechnologyId::Numeric(2), Status::Completed);
                repo.add_technology(NewTechnology::new("Rust", "Ownership and lifetimes"))
                    .expect("Failed to add");
            }

            let store = SqliteStore::open(&path).expect("Failed to reopen");
            store.migrate().expect("Failed to migrate");
            let repo = TechnologyRepository::open(LocalStorage::new(store));

            assert_eq!(repo.technologies().len(), 9);
            assert_eq!(repo.get(&TechnologyId::Numeric(2)).unwrap().status, Status::Completed);
            assert_eq!(repo.technologies()[8].title, "Rust");
        }

        it "reports a missing table through the error hook instead of failing" {
            let unmigrated = SqliteStore::open_memory().expect("Failed to open");
            let errors = Arc::new(Mutex::new(Vec::new()));
            let sink = errors.clone();
            let storage = LocalStorage::new(unmigrated)
                .on_error(move |e| sink.lock().unwrap().push(matches!(e, StorageError::Backend(_))));

            let loaded: Vec<u32> = storage.load("numbers", vec![1]);
            let saved = storage.save("numbers", &vec![2]);

            assert_eq!(loaded, vec![1]);
            assert!(!saved);
            assert_eq!(*errors.lock().unwrap(), vec![true, true]);
        }
    }

    describe "local storage adapter" {
        before {
            let store = MemoryStore::new();
            let storage = LocalStorage::new(store.clone());
        }

        it "round-trips a saved list" {
            let list = default_technologies();
            assert!(storage.save("technologies", &list));
            let loaded: Vec<Technology> = storage.load("technologies", Vec::new());
            assert_eq!(loaded, list);
        }

        it "writes plain JSON with the stable status strings" {
            let list = default_technologies();
            storage.save("technologies", &list);

            let raw = store.get("technologies").unwrap().unwrap();
            assert!(raw.starts_with("[{\"id\":1,"));
            assert!(raw.contains("\"status\":\"not-started\""));
            assert!(raw.contains("\"status\":\"in-progress\""));
            assert!(raw.contains("\"status\":\"completed\""));
            assert!(raw.contains("\"createdAt\":"));
        }

        it "returns the default for a missing key" {
            let loaded: Vec<String> = storage.load("nothing-here", vec!["fallback".to_string()]);
            assert_eq!(loaded, vec!["fallback"]);
        }

        it "returns the default for a value of the wrong shape" {
            store.set("technologies", "{\"not\":\"a list\"}").unwrap();
            let errors = Arc::new(Mutex::new(Vec::new()));
            let sink = errors.clone();
            let storage = LocalStorage::new(store.clone())
                .on_error(move |e| sink.lock().unwrap().push(matches!(e, StorageError::Corrupt { .. })));

            let loaded: Vec<Technology> = storage.load("technologies", Vec::new());

            assert!(loaded.is_empty());
            assert_eq!(*errors.lock().unwrap(), vec![true]);
        }

        it "clears a key" {
            storage.save("theme", "dark");
            assert!(storage.clear("theme"));
            assert_eq!(store.get("theme").unwrap(), None);
        }

        it "reports a quota failure and keeps the previous value" {
            let small = MemoryStore::with_quota(32);
            let errors = Arc::new(Mutex::new(0));
            let sink = errors.clone();
            let storage = LocalStorage::new(small.clone()).on_error(move |_| *sink.lock().unwrap() += 1);

            assert!(storage.save("k", &[1, 2, 3]));
            assert!(!storage.save("k", &vec![0u8; 64]));

            let loaded: Vec<u8> = storage.load("k", Vec::new());
            assert_eq!(loaded, vec![1, 2, 3]);
            assert_eq!(*errors.lock().unwrap(), 1);
        }
    }
}
