//! Shared helpers for benchmark tests

use std::sync::Arc;

use sortindex::{SortIndex, SortIndexConfig, Value, store::database::InMemory};

pub const TABLE: &str = "items";
pub const GROUPS: i64 = 4;

/// An `items` table with `rows_per_group` rows in each of [`GROUPS`] groups,
/// spaced by the default gap. Ids are `group * rows_per_group + n + 1`.
pub async fn setup_index(rows_per_group: usize) -> (Arc<InMemory>, SortIndex) {
    let store = Arc::new(InMemory::new());
    store.create_table(TABLE).await;
    for group in 0..GROUPS {
        for n in 0..rows_per_group as i64 {
            let id = group * rows_per_group as i64 + n + 1;
            store
                .insert(
                    TABLE,
                    [
                        ("id", Value::Int(id)),
                        ("grp", Value::Int(group)),
                        ("sort", Value::Int((n + 1) * 1000)),
                        ("hidden", Value::Bool(n % 10 == 9)),
                    ],
                )
                .await;
        }
    }

    let config = SortIndexConfig::new(TABLE)
        .with_group_column("grp")
        .with_exclusion("hidden", true);
    let index = SortIndex::new(store.clone(), config).expect("Failed to build index");
    (store, index)
}

/// Inserts a row into group 0 with the given sort value.
pub async fn insert_row(store: &InMemory, id: i64, sort: i64) {
    store
        .insert(
            TABLE,
            [
                ("id", Value::Int(id)),
                ("grp", Value::Int(0)),
                ("sort", Value::Int(sort)),
                ("hidden", Value::Bool(false)),
            ],
        )
        .await;
}
