// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::create_test_context;
use helpdeskrs::domain::models::ticket::DomainError;
use helpdeskrs::domain::services::ServiceError;
use uuid::Uuid;

#[tokio::test]
async fn test_tag_names_are_unique() {
    let ctx = create_test_context().await;
    let taxonomy = &ctx.services.taxonomy;

    let tag = taxonomy.create_tag("hardware").await.unwrap();
    assert!((1..=11).contains(&tag.color));

    let err = taxonomy.create_tag("hardware").await.unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::Validation(_))));
    assert!(err.to_string().contains("already exists"));

    taxonomy.create_tag("network").await.unwrap();
    assert_eq!(taxonomy.list_tags().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_category_tree_sequences_and_scoping() {
    let ctx = create_test_context().await;
    let taxonomy = &ctx.services.taxonomy;

    let hardware = taxonomy.create_category("Hardware", Some(4)).await.unwrap();
    let software = taxonomy.create_category("Software", None).await.unwrap();
    assert_eq!(hardware.sequence, 1);
    assert_eq!(software.sequence, 2);
    assert_eq!(hardware.color, 4);
    assert!(taxonomy.create_category("Hardware", None).await.is_err());

    // same sub-category name is fine under another category
    let printers = taxonomy
        .create_sub_category("Printers", hardware.id)
        .await
        .unwrap();
    taxonomy
        .create_sub_category("Printers", software.id)
        .await
        .unwrap();
    assert!(taxonomy
        .create_sub_category("Printers", hardware.id)
        .await
        .is_err());

    let jam = taxonomy.create_problem("Paper jam", printers.id).await.unwrap();
    assert_eq!(jam.parent_sub_category_id, printers.id);
    assert!(taxonomy.create_problem("Paper jam", printers.id).await.is_err());

    assert_eq!(taxonomy.sub_categories(hardware.id).await.unwrap().len(), 1);
    assert_eq!(taxonomy.problems(printers.id).await.unwrap(), vec![jam]);
}

#[tokio::test]
async fn test_child_requires_existing_parent() {
    let ctx = create_test_context().await;
    let taxonomy = &ctx.services.taxonomy;

    assert!(matches!(
        taxonomy.create_sub_category("Orphan", Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(matches!(
        taxonomy.create_problem("Orphan", Uuid::new_v4()).await,
        Err(ServiceError::NotFound(_))
    ));
    assert!(taxonomy.create_ticket_type("  ", 10).await.is_err());
}
