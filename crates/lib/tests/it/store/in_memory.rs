use std::sync::Arc;

use tempfile::TempDir;

use sortindex::{
    Position, SortIndex, Value,
    store::{RowStore, database::InMemory},
};

use crate::helpers::*;

async fn seeded_store() -> Arc<InMemory> {
    let store = Arc::new(InMemory::new());
    store.create_table(TABLE).await;
    for (idx, row) in seed_rows().into_iter().enumerate() {
        let mut columns = vec![
            ("id", Value::Int(idx as i64 + 1)),
            ("title", Value::from(row.title)),
            ("category_id", Value::Int(row.category)),
            ("sort_local", Value::Int(row.sort_local)),
            ("sort_general", Value::Int(row.sort_general)),
        ];
        if let Some(archived) = row.archived {
            columns.push(("archived", Value::Bool(archived)));
        }
        if let Some(color) = row.color {
            columns.push(("color", Value::Bool(color)));
        }
        store.insert(TABLE, columns).await;
    }
    store
}

#[tokio::test]
async fn test_in_memory_save_and_load() {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("cartoons.json");

    {
        let store = seeded_store().await;
        let index = SortIndex::new(store.clone(), local_config()).unwrap();
        index.rebuild_tail_from(5, false, group(15)).await.unwrap();
        store.save_to_file(&file_path).await.unwrap();
    }

    assert!(file_path.exists());

    let loaded = Arc::new(InMemory::load_from_file(&file_path).await.unwrap());
    assert_eq!(loaded.table_names().await, vec![TABLE.to_string()]);

    let rows = loaded.rows(TABLE).await.unwrap();
    assert_eq!(rows.len(), 10);
    // Row 6 was shifted before saving.
    assert_eq!(rows[5]["sort_local"], Value::Int(3000));

    let index = SortIndex::new(loaded, local_config()).unwrap();
    let value = index
        .sort_value(5, Position::After, group(15))
        .await
        .unwrap();
    assert_eq!(value, 2000);
}

#[tokio::test]
async fn test_load_non_existent_file() {
    let temp_dir = TempDir::new().unwrap();
    let store = InMemory::load_from_file(temp_dir.path().join("missing.json"))
        .await
        .unwrap();
    assert!(store.table_names().await.is_empty());
}

#[tokio::test]
async fn test_load_invalid_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("invalid.json");
    std::fs::write(&path, "{invalid json").unwrap();

    let err = InMemory::load_from_file(&path).await.unwrap_err();
    assert!(err.is_io_error());
}

#[tokio::test]
async fn test_downcast_row_store() {
    let store: Arc<dyn RowStore> = seeded_store().await;
    let in_memory = store
        .as_any()
        .downcast_ref::<InMemory>()
        .expect("store is InMemory");
    assert_eq!(in_memory.rows(TABLE).await.unwrap().len(), 10);
}

#[tokio::test]
async fn test_text_primary_keys() {
    let store = Arc::new(InMemory::new());
    for (slug, sort) in [("intro", 1000), ("body", 2000), ("outro", 3000)] {
        store
            .insert(
                "chapters",
                [("slug", Value::from(slug)), ("position", Value::Int(sort))],
            )
            .await;
    }
    let config = sortindex::SortIndexConfig::new("chapters")
        .with_pk_column("slug")
        .with_sort_column("position");
    let index = SortIndex::new(store, config).unwrap();

    assert_eq!(
        index
            .sort_value("body", Position::Before, None)
            .await
            .unwrap(),
        1500
    );
    assert_eq!(
        index
            .neighbor_id("body", Position::After, None)
            .await
            .unwrap(),
        Some(Value::from("outro"))
    );
}
