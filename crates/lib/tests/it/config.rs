use std::sync::Arc;

use sortindex::{
    Error, Position, SortIndex, SortIndexConfig, Value, config::ConfigError,
    store::database::InMemory,
};

#[test]
fn test_config_from_json_matches_builder() {
    let json = r#"{
        "table": "cartoons",
        "group_column": "category_id",
        "sort_column": "sort_local",
        "exclude": { "archived": true, "color": false }
    }"#;
    let config = SortIndexConfig::from_json(json).unwrap();
    assert_eq!(config, crate::helpers::local_config());
    assert_eq!(config.pk_column, "id");
    assert_eq!(config.sort_gap, 1000);
}

#[test]
fn test_config_exclusion_lists() {
    let json = r#"{
        "table": "tasks",
        "exclude": { "status": ["deleted", "hidden"], "flag": 3 }
    }"#;
    let config = SortIndexConfig::from_json(json).unwrap();
    let table = config.table_spec();
    assert_eq!(table.exclusions.len(), 2);

    let status = table
        .exclusions
        .iter()
        .find(|e| e.column == "status")
        .unwrap();
    assert_eq!(
        status.values,
        vec![Value::from("deleted"), Value::from("hidden")]
    );
}

#[test]
fn test_config_rejections() {
    let err = SortIndexConfig::from_json(r#"{"table": "t", "sort_gap": 0}"#).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidSortGap { gap: 0 })
    ));

    let err = SortIndexConfig::from_json(r#"{"table": "t; DROP TABLE t"}"#).unwrap_err();
    assert!(err.is_validation_error());

    let err = SortIndexConfig::from_json("not json").unwrap_err();
    match err {
        Error::Config(config_err) => assert!(config_err.is_parse_error()),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_custom_gap() {
    let store = Arc::new(InMemory::new());
    store
        .insert("items", [("id", Value::Int(1)), ("sort", Value::Int(10))])
        .await;
    store
        .insert("items", [("id", Value::Int(2)), ("sort", Value::Int(11))])
        .await;

    let config = SortIndexConfig::from_json(r#"{"table": "items", "sort_gap": 10}"#).unwrap();
    let index = SortIndex::new(store.clone(), config).unwrap();
    assert_eq!(index.ini_sort_value(), 10);

    // No room between 10 and 11: the tail moves by the configured gap.
    let value = index.sort_value(1, Position::After, None).await.unwrap();
    assert_eq!(value, 16);
    let rows = store.rows("items").await.unwrap();
    assert_eq!(rows[1]["sort"], Value::Int(21));
}
