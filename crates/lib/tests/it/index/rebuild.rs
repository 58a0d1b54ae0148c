use std::{
    any::Any,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use sortindex::{
    Position, Result, SortIndex, SortIndexConfig, Value,
    store::{Column, RowStore, ScopeQuery, SortedRow, TableSpec, database::InMemory},
};

use crate::helpers::*;

/// Wraps an [`InMemory`] store and counts `update_where` calls.
struct CountingStore {
    inner: InMemory,
    updates: AtomicU64,
}

impl CountingStore {
    fn updates(&self) -> u64 {
        self.updates.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RowStore for CountingStore {
    async fn find_many(&self, table: &TableSpec, query: &ScopeQuery) -> Result<Vec<SortedRow>> {
        self.inner.find_many(table, query).await
    }

    async fn scalar(
        &self,
        table: &TableSpec,
        query: &ScopeQuery,
        column: Column,
    ) -> Result<Option<Value>> {
        self.inner.scalar(table, query, column).await
    }

    async fn update_where(&self, table: &TableSpec, shift: i64, query: &ScopeQuery) -> Result<u64> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        self.inner.update_where(table, shift, query).await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Every visible key of the category 15 scope and of the whole table is
/// unique after repeated inserts.
async fn assert_visible_keys_unique(cartoons: &Cartoons) {
    let hidden = [1, 2, 3, 8, 9];
    let sorts = cartoons.sorts().await;
    let visible: Vec<_> = sorts
        .iter()
        .filter(|(id, _, _)| !hidden.contains(id))
        .collect();

    let mut general: Vec<i64> = visible.iter().map(|(_, _, g)| *g).collect();
    general.sort_unstable();
    general.dedup();
    assert_eq!(general.len(), visible.len());

    // Category 15 rows are 4, 5, 6 and everything inserted by the test.
    let mut local: Vec<i64> = visible
        .iter()
        .filter(|(id, _, _)| (4..=6).contains(id) || *id > 10)
        .map(|(_, l, _)| *l)
        .collect();
    let count = local.len();
    local.sort_unstable();
    local.dedup();
    assert_eq!(local.len(), count);
}

#[tokio::test]
async fn test_sort_rebuild_on_after() {
    let mut cartoons = Cartoons::seeded().await;
    let target_local = 5;
    let target_general = 4;

    let (first, last) = cartoons
        .insert_repeatedly(100, Position::After, target_local, target_general)
        .await;

    // sort in category
    assert_eq!(
        cartoons
            .local
            .neighbor_id(first, Position::After, group(15))
            .await
            .unwrap(),
        Some(Value::Int(6))
    );
    assert_eq!(
        cartoons
            .local
            .neighbor_id(last, Position::Before, group(15))
            .await
            .unwrap(),
        Some(Value::Int(target_local))
    );

    // general sort
    assert_eq!(
        cartoons
            .general
            .neighbor_id(first, Position::After, None)
            .await
            .unwrap(),
        Some(Value::Int(7))
    );
    assert_eq!(
        cartoons
            .general
            .neighbor_id(last, Position::Before, None)
            .await
            .unwrap(),
        Some(Value::Int(target_general))
    );

    assert_visible_keys_unique(&cartoons).await;
}

#[tokio::test]
async fn test_sort_rebuild_on_before() {
    let mut cartoons = Cartoons::seeded().await;
    let target_local = 6;
    let target_general = 4;

    let (first, last) = cartoons
        .insert_repeatedly(100, Position::Before, target_local, target_general)
        .await;

    // sort in terms of one category
    assert_eq!(
        cartoons
            .local
            .neighbor_id(first, Position::Before, group(15))
            .await
            .unwrap(),
        Some(Value::Int(5))
    );
    assert_eq!(
        cartoons
            .local
            .neighbor_id(last, Position::After, group(15))
            .await
            .unwrap(),
        Some(Value::Int(target_local))
    );

    // sort over the entire table
    assert_eq!(
        cartoons
            .general
            .neighbor_id(first, Position::Before, None)
            .await
            .unwrap(),
        Some(Value::Int(5))
    );
    assert_eq!(
        cartoons
            .general
            .neighbor_id(last, Position::After, None)
            .await
            .unwrap(),
        Some(Value::Int(target_general))
    );

    assert_visible_keys_unique(&cartoons).await;
}

#[tokio::test]
async fn test_rebuild_keeps_other_scopes() {
    let mut cartoons = Cartoons::seeded().await;
    let before = cartoons.sorts().await;

    cartoons
        .insert_repeatedly(20, Position::After, 5, 4)
        .await;

    // Category 0 and 14 local keys are untouched by renumbering category 15.
    let after = cartoons.sorts().await;
    for id in [1, 2, 3, 7, 8, 9, 10] {
        let idx = id as usize - 1;
        assert_eq!(after[idx].1, before[idx].1, "row {id}");
    }
}

#[tokio::test]
async fn test_rebuild_tail_from() {
    let cartoons = Cartoons::seeded().await;

    // Rows after 5 in category 15: 6 and 4.
    let rows = cartoons
        .local
        .rebuild_tail_from(5, false, group(15))
        .await
        .unwrap();
    assert_eq!(rows, 2);

    // Including the anchor, resolving the scope from the anchor.
    let rows = cartoons
        .local
        .rebuild_tail_from(5, true, None)
        .await
        .unwrap();
    assert_eq!(rows, 3);

    let sorts = cartoons.sorts().await;
    assert_eq!(sorts[3].1, 5000);
    assert_eq!(sorts[4].1, 2000);
    assert_eq!(sorts[5].1, 4000);
    // Other categories are untouched.
    assert_eq!(sorts[9].1, 1000);
}

#[tokio::test]
async fn test_rebuild_shifts_hidden_rows() {
    let cartoons = Cartoons::seeded().await;
    // General scope after row 4 (3000): 7, 8, 9, 1, 2, 3 and 10.
    let rows = cartoons
        .general
        .rebuild_tail_from(4, false, None)
        .await
        .unwrap();
    assert_eq!(rows, 7);

    let sorts = cartoons.sorts().await;
    assert_eq!(sorts[0].2, 8000);
    assert_eq!(sorts[9].2, 11000);
}

#[tokio::test]
async fn test_one_renumber_per_exhausted_gap() {
    let inner = InMemory::new();
    for (id, sort) in [(1, 1000), (2, 2000)] {
        inner
            .insert("items", [("id", Value::Int(id)), ("sort", Value::Int(sort))])
            .await;
    }
    let store = Arc::new(CountingStore {
        inner,
        updates: AtomicU64::new(0),
    });
    let index = SortIndex::new(store.clone(), SortIndexConfig::new("items")).unwrap();

    let mut renumbers = Vec::new();
    for n in 0..100 {
        let before = store.updates();
        let sort = index.sort_value(1, Position::After, None).await.unwrap();
        store
            .inner
            .insert("items", [("id", Value::Int(n + 3)), ("sort", Value::Int(sort))])
            .await;
        let passes = store.updates() - before;
        if passes > 0 {
            renumbers.push((n, passes));
        }
    }

    // Halving a 1000 gap leaves room for ten inserts; each eleventh renumbers.
    let expected: Vec<(i64, u64)> = (1..=9).map(|n| (n * 10, 1)).collect();
    assert_eq!(renumbers, expected);
}
