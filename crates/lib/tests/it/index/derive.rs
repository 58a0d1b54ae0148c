use sortindex::Position;

use crate::helpers::*;

#[tokio::test]
async fn test_ini_sort_value() {
    let cartoons = Cartoons::empty().await;
    assert_eq!(cartoons.local.ini_sort_value(), 1000);
    assert_eq!(cartoons.general.ini_sort_value(), 1000);
}

#[tokio::test]
async fn test_derive_sort_after() {
    let cartoons = Cartoons::seeded().await;

    let value = cartoons
        .local
        .sort_value(5, Position::After, group(15))
        .await
        .unwrap();
    assert!(value > 1000 && value < 2000);

    // The scope is taken from the target when no group is given.
    let value = cartoons
        .local
        .sort_value(5, Position::After, None)
        .await
        .unwrap();
    assert!(value > 1000 && value < 2000);

    // Rows 8 and 9 follow 10 in category 0 but are hidden.
    let value = cartoons
        .local
        .sort_value(10, Position::After, group(0))
        .await
        .unwrap();
    assert_eq!(value, 2000);
}

#[tokio::test]
async fn test_derive_sort_after_general() {
    let cartoons = Cartoons::seeded().await;
    let value = cartoons
        .general
        .sort_value(5, Position::After, None)
        .await
        .unwrap();
    assert!(value > 2000 && value < 3000);
}

#[tokio::test]
async fn test_derive_sort_before() {
    let cartoons = Cartoons::seeded().await;

    let value = cartoons
        .local
        .sort_value(5, Position::Before, group(15))
        .await
        .unwrap();
    assert!(value < 1000);

    let value = cartoons
        .local
        .sort_value(5, Position::Before, None)
        .await
        .unwrap();
    assert!(value < 1000);

    let value = cartoons
        .local
        .sort_value(10, Position::Before, group(0))
        .await
        .unwrap();
    assert!(value < 1000);
}

#[tokio::test]
async fn test_derive_sort_before_general() {
    let cartoons = Cartoons::seeded().await;
    let value = cartoons
        .general
        .sort_value(5, Position::Before, None)
        .await
        .unwrap();
    assert!(value > 1000 && value < 2000);
}

#[tokio::test]
async fn test_derive_is_read_only() {
    let cartoons = Cartoons::seeded().await;
    let before = cartoons.sorts().await;

    let value = cartoons
        .local
        .derive_sort_value(6, Position::After, group(15))
        .await
        .unwrap();
    assert_eq!(value, Some(2500));
    assert_eq!(cartoons.sorts().await, before);
}

#[tokio::test]
async fn test_position_literals() {
    let cartoons = Cartoons::seeded().await;
    let position: Position = "after".parse().unwrap();
    let value = cartoons
        .local
        .sort_value(4, position, group(15))
        .await
        .unwrap();
    assert_eq!(value, 4000);

    let position: Position = "before".parse().unwrap();
    let value = cartoons
        .local
        .sort_value(4, position, group(15))
        .await
        .unwrap();
    assert_eq!(value, 2500);
}

#[tokio::test]
async fn test_null_marker_does_not_hide_row() {
    let mut cartoons = Cartoons::empty().await;
    cartoons
        .insert(Cartoon::new("Mighty Mouse", 3, 1000, 1000).archived(None))
        .await;
    cartoons
        .insert(Cartoon::new("Casper", 3, 2000, 2000).color(None))
        .await;

    let value = cartoons
        .local
        .sort_value(1, Position::After, group(3))
        .await
        .unwrap();
    assert_eq!(value, 1500);
}
