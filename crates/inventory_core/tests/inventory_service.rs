use inventory_core::db::open_db_in_memory;
use inventory_core::{
    InventoryProvider, InventoryService, ObserverRegistry, Product, ProductValidationError,
    ResourceLocator, ServiceError, SqliteStorageEngine,
};
use rusqlite::Connection;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn service(
    conn: &Connection,
    registry: Arc<ObserverRegistry>,
) -> InventoryService<SqliteStorageEngine<'_>, Arc<ObserverRegistry>> {
    InventoryService::new(InventoryProvider::with_default_config(
        SqliteStorageEngine::new(conn),
        registry,
    ))
}

#[test]
fn add_get_and_list_products() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));

    let bolt = service
        .add_product(&Product::new("Bolt", 2, 100).with_supplier("Acme", "555-0100"))
        .unwrap();
    let anvil = service.add_product(&Product::new("Anvil", 90, 1)).unwrap();

    let loaded = service.get_product(bolt).unwrap().unwrap();
    assert_eq!(loaded.id, Some(bolt));
    assert_eq!(loaded.supplier_phone.as_deref(), Some("555-0100"));

    let by_id = service.list_products(None).unwrap();
    assert_eq!(
        by_id.iter().map(|product| product.id).collect::<Vec<_>>(),
        [Some(bolt), Some(anvil)]
    );

    let by_name = service.list_products(Some("name ASC")).unwrap();
    assert_eq!(by_name[0].name, "Anvil");

    assert!(service.get_product(999).unwrap().is_none());
}

#[test]
fn add_product_validates_before_touching_storage() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));

    let err = service
        .add_product(&Product::new("Widget", -5, 1))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ProductValidationError::NegativePrice(-5))
    ));
    assert!(service.list_products(None).unwrap().is_empty());
}

#[test]
fn update_product_requires_existing_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));

    let unsaved = Product::new("Widget", 5, 10);
    assert!(matches!(
        service.update_product(&unsaved).unwrap_err(),
        ServiceError::MissingId
    ));

    let mut ghost = unsaved.clone();
    ghost.id = Some(12);
    assert!(matches!(
        service.update_product(&ghost).unwrap_err(),
        ServiceError::NotFound(12)
    ));

    let id = service.add_product(&unsaved).unwrap();
    let mut renamed = service.get_product(id).unwrap().unwrap();
    renamed.name = "Sprocket".to_string();
    service.update_product(&renamed).unwrap();
    assert_eq!(service.get_product(id).unwrap().unwrap().name, "Sprocket");
}

#[test]
fn stock_movements_keep_quantity_non_negative() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));
    let id = service.add_product(&Product::new("Widget", 5, 2)).unwrap();

    assert_eq!(service.record_sale(id, 2).unwrap().quantity, 0);
    match service.record_sale(id, 1).unwrap_err() {
        ServiceError::InsufficientStock {
            available,
            requested,
            ..
        } => {
            assert_eq!(available, 0);
            assert_eq!(requested, 1);
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(service.receive_stock(id, 5).unwrap().quantity, 5);
    assert_eq!(service.get_product(id).unwrap().unwrap().quantity, 5);

    assert!(matches!(
        service.receive_stock(id, 0).unwrap_err(),
        ServiceError::InvalidAmount(0)
    ));
    assert!(matches!(
        service.record_sale(404, 1).unwrap_err(),
        ServiceError::NotFound(404)
    ));
}

#[test]
fn negative_ids_address_no_product() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));
    service.add_product(&Product::new("Widget", 5, 2)).unwrap();

    assert_eq!(service.get_product(-1).unwrap(), None);
    assert!(matches!(
        service.record_sale(-1, 1).unwrap_err(),
        ServiceError::NotFound(-1)
    ));
    assert!(matches!(
        service.receive_stock(-1, 1).unwrap_err(),
        ServiceError::NotFound(-1)
    ));
    let mut ghost = Product::new("Ghost", 1, 1);
    ghost.id = Some(-1);
    assert!(matches!(
        service.update_product(&ghost).unwrap_err(),
        ServiceError::NotFound(-1)
    ));
    assert!(matches!(
        service.delete_product(-1).unwrap_err(),
        ServiceError::NotFound(-1)
    ));
}

#[test]
fn delete_product_and_delete_all() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));
    let first = service.add_product(&Product::new("A", 1, 1)).unwrap();
    service.add_product(&Product::new("B", 1, 1)).unwrap();
    service.add_product(&Product::new("C", 1, 1)).unwrap();

    service.delete_product(first).unwrap();
    assert!(matches!(
        service.delete_product(first).unwrap_err(),
        ServiceError::NotFound(_)
    ));
    assert_eq!(service.delete_all().unwrap(), 2);
    assert!(service.list_products(None).unwrap().is_empty());
}

#[test]
fn service_mutations_reach_item_observers() {
    let conn = open_db_in_memory().unwrap();
    let registry = Arc::new(ObserverRegistry::new());
    let service = service(&conn, Arc::clone(&registry));
    let id = service.add_product(&Product::new("Widget", 5, 3)).unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let sink = Arc::clone(&hits);
    let item = service.provider().config().item_locator(id);
    registry.register(
        item,
        false,
        Arc::new(move |_: &ResourceLocator| {
            sink.fetch_add(1, Ordering::SeqCst);
        }),
    );

    service.record_sale(id, 1).unwrap();
    service.receive_stock(id, 1).unwrap();
    service.delete_all().unwrap();

    assert_eq!(hits.load(Ordering::SeqCst), 3);
}

#[test]
fn corrupt_rows_surface_as_validation_errors() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn, Arc::new(ObserverRegistry::new()));
    conn.execute(
        "INSERT INTO products (name, price, quantity) VALUES ('Broken', -1, 0);",
        [],
    )
    .unwrap();

    let err = service.list_products(None).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ProductValidationError::NegativePrice(-1))
    ));
}
