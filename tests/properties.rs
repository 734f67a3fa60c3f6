use chrono::Utc;
use proptest::prelude::*;
use techtrack::models::*;
use techtrack::store::{KeyValueStore, LocalStorage, MemoryStore};
use techtrack::views::*;
use techtrack::TechnologyRepository;

fn arb_status() -> impl Strategy<Value = Status> {
    prop_oneof![
        Just(Status::NotStarted),
        Just(Status::InProgress),
        Just(Status::Completed),
    ]
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

fn arb_list() -> impl Strategy<Value = Vec<Technology>> {
    prop::collection::vec(
        (
            arb_status(),
            arb_category(),
            "[A-Za-z ]{2,16}",
            "[A-Za-z ]{10,40}",
            "[a-z ]{0,20}",
            prop::option::of(0u8..=100),
        ),
        0..24,
    )
    .prop_map(|rows| {
        let now = Utc::now();
        rows.into_iter()
            .enumerate()
            .map(|(i, (status, category, title, description, notes, progress))| Technology {
                id: TechnologyId::Numeric(i as u64 + 1),
                title,
                description,
                status,
                notes,
                category,
                priority: Priority::Medium,
                difficulty: Difficulty::Medium,
                deadline: None,
                estimated_hours: None,
                created_at: now,
                updated_at: now,
                progress,
                extra: serde_json::Map::new(),
            })
            .collect()
    })
}

fn arb_status_filter() -> impl Strategy<Value = StatusFilter> {
    prop_oneof![Just(StatusFilter::All), arb_status().prop_map(StatusFilter::Only)]
}

#[derive(Debug, Clone)]
enum Op {
    Add(String, String),
    SetStatus(u64, Status),
    Advance(u64),
    Bulk(Vec<u64>, Status),
    Notes(u64, String),
    Delete(u64),
    CompleteAll,
    Reset,
    ClearNotes,
    Random,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        ("[A-Za-z]{0,6}", "[a-z ]{0,16}").prop_map(|(t, d)| Op::Add(t, d)),
        (1u64..12, arb_status()).prop_map(|(id, s)| Op::SetStatus(id, s)),
        (1u64..12).prop_map(Op::Advance),
        (prop::collection::vec(1u64..12, 0..4), arb_status()).prop_map(|(ids, s)| Op::Bulk(ids, s)),
        (1u64..12, "[a-z]{0,8}").prop_map(|(id, n)| Op::Notes(id, n)),
        (1u64..12).prop_map(Op::Delete),
        Just(Op::CompleteAll),
        Just(Op::Reset),
        Just(Op::ClearNotes),
        Just(Op::Random),
    ]
}

fn apply(repo: &mut TechnologyRepository<MemoryStore>, op: Op) {
    let id = |n: u64| TechnologyId::Numeric(n);
    match op {
        Op::Add(title, description) => {
            let _ = repo.add_technology(NewTechnology::new(title, description));
        }
        Op::SetStatus(n, status) => repo.update_status(&id(n), status),
        Op::Advance(n) => {
            repo.advance_status(&id(n));
        }
        Op::Bulk(ids, status) => {
            let ids: Vec<_> = ids.into_iter().map(id).collect();
            let _ = repo.bulk_update_status(&ids, status);
        }
        Op::Notes(n, text) => repo.update_notes(&id(n), text),
        Op::Delete(n) => {
            repo.delete_technology(&id(n));
        }
        Op::CompleteAll => repo.mark_all_completed(),
        Op::Reset => repo.reset_all(),
        Op::ClearNotes => repo.clear_all_notes(),
        Op::Random => {
            repo.pick_random_not_started();
        }
    }
}

proptest! {
    #[test]
    fn saved_list_loads_back_unchanged(list in arb_list()) {
        let storage = LocalStorage::new(MemoryStore::new());
        prop_assert!(storage.save("technologies", &list));
        let loaded: Vec<Technology> = storage.load("technologies", Vec::new());
        prop_assert_eq!(loaded, list);
    }

    #[test]
    fn advancing_three_times_is_identity(status in arb_status()) {
        prop_assert_eq!(status.advance().advance().advance(), status);
        prop_assert_ne!(status.advance(), status);
    }

    #[test]
    fn status_counts_sum_to_total(list in arb_list()) {
        let stats = statistics(&list);
        prop_assert_eq!(
            stats.completed_count + stats.in_progress_count + stats.not_started_count,
            stats.total
        );
        prop_assert_eq!(stats.total, list.len());
    }

    #[test]
    fn percentages_stay_in_bounds(list in arb_list()) {
        let stats = statistics(&list);
        prop_assert!(stats.percent_complete <= 100);
        prop_assert!(stats.average_progress <= 100);
        if list.is_empty() {
            prop_assert_eq!(stats.percent_complete, 0);
        }
        let categories = category_statistics(&list);
        prop_assert_eq!(categories.values().map(|c| c.total).sum::<usize>(), list.len());
        prop_assert!(categories.values().all(|c| c.completed <= c.total));
    }

    #[test]
    fn combined_filter_is_idempotent(
        list in arb_list(),
        status in arb_status_filter(),
        query in "[a-zA-Z ]{0,3}",
    ) {
        let once = combined_filter(&list, status, &query);
        let twice = combined_filter(&once, status, &query);
        prop_assert_eq!(&twice, &once);

        let separately = filter_by_search(&filter_by_status(&list, status), &query);
        prop_assert_eq!(separately, once);
    }

    #[test]
    fn most_common_status_has_the_highest_count(list in arb_list()) {
        let stats = statistics(&list);
        let winner = most_common_status(&list);
        prop_assert!(Status::ALL.iter().all(|s| stats.count(*s) <= stats.count(winner)));
    }

    #[test]
    fn ids_stay_unique_and_store_matches_memory(ops in prop::collection::vec(arb_op(), 0..40)) {
        let store = MemoryStore::new();
        let mut repo = TechnologyRepository::open(LocalStorage::new(store.clone()));

        for op in ops {
            apply(&mut repo, op);

            let mut ids: Vec<String> = repo.technologies().iter().map(|t| t.id.to_string()).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), repo.technologies().len());

            if let Some(raw) = store.get("technologies").unwrap() {
                let stored: Vec<Technology> = serde_json::from_str(&raw).unwrap();
                prop_assert_eq!(stored.as_slice(), repo.technologies());
                let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
                for record in value.as_array().unwrap() {
                    let status = record["status"].as_str().unwrap();
                    prop_assert!(["not-started", "in-progress", "completed"].contains(&status));
                }
            }
        }
    }
}
