use chrono::NaiveDate;
use component_inventory::{
    Criterion, InventoryItem, InventoryService, ItemPatch, StoreConfig, WriteOutcome,
    LOW_STOCK_THRESHOLD,
};
use tempfile::TempDir;

// Test fixtures

fn service_in(dir: &TempDir) -> InventoryService {
    let config = StoreConfig::new(dir.path().join("inventory.db"));
    let service = InventoryService::new(&config);
    assert!(service.is_ready());
    service
}

fn item(name: &str, category: &str, quantity: i64, location: &str) -> InventoryItem {
    InventoryItem::new(
        name,
        category,
        quantity,
        location,
        NaiveDate::from_ymd_opt(2024, 5, 20),
    )
}

fn sorted_names(items: &[InventoryItem]) -> Vec<String> {
    let mut names: Vec<String> = items.iter().map(|i| i.name.clone()).collect();
    names.sort();
    names
}

#[test]
fn test_low_stock_scenario() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    for (name, qty) in [("Two", 2), ("Five", 5), ("Six", 6)] {
        assert!(service.add_item(&item(name, "Test", qty, "Bin")));
    }

    let alerts = service.low_stock_items();
    assert_eq!(alerts.len(), 2);
    assert_eq!(sorted_names(&alerts), vec!["Five", "Two"]);
    assert!(alerts.iter().all(|i| i.quantity <= LOW_STOCK_THRESHOLD));
}

#[test]
fn test_custom_threshold_from_config() {
    let dir = TempDir::new().unwrap();
    let config = StoreConfig::new(dir.path().join("inventory.db")).with_threshold(0);
    let service = InventoryService::new(&config);
    service.add_item(&item("Empty", "", 0, ""));
    service.add_item(&item("One", "", 1, ""));

    assert_eq!(sorted_names(&service.low_stock_items()), vec!["Empty"]);
}

#[test]
fn test_find_by_name_matches_case_insensitive_substring() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    let names = ["Resistor 220R", "resistor network", "Capacitor", "RESET button"];
    for name in names {
        service.add_item(&item(name, "Parts", 1, "A"));
    }

    let hits = service.find_by("resist", Criterion::Name);
    let mut expected: Vec<String> = names
        .iter()
        .filter(|n| n.to_lowercase().contains("resist"))
        .map(|n| n.to_string())
        .collect();
    expected.sort();
    assert_eq!(sorted_names(&hits), expected);

    assert_eq!(service.find_by("", Criterion::Name).len(), names.len());
}

#[test]
fn test_find_by_category_and_location() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.add_item(&item("NE555", "Timer IC", 12, "Drawer 4"));
    service.add_item(&item("LM358", "Op-amp IC", 3, "Drawer 5"));
    service.add_item(&item("2N2222", "Transistor", 40, "Bag"));

    assert_eq!(service.find_by("ic", Criterion::Category).len(), 2);
    assert_eq!(sorted_names(&service.find_by("DRAWER 5", Criterion::Location)), vec!["LM358"]);
}

#[test]
fn test_find_by_label_accepts_legacy_names() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.add_item(&item("NE555", "Timer IC", 12, "Drawer 4"));

    assert_eq!(service.find_by_label("12", "Cantidad").unwrap().len(), 1);
    assert_eq!(service.find_by_label("2024-05-20", "Fecha").unwrap().len(), 1);
    assert!(service.find_by_label("12", "price").is_err());
}

#[test]
fn test_service_search_spans_three_fields() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.add_item(&item("Header pins", "Connector", 100, "Box A"));
    service.add_item(&item("JST cable", "Cable", 8, "Box Conn"));
    service.add_item(&item("Heatsink", "Thermal", 4, "Shelf"));

    assert_eq!(
        sorted_names(&service.search("conn")),
        vec!["Header pins", "JST cable"]
    );
}

#[test]
fn test_update_and_remove_through_service() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.add_item(&item("Crystal 16MHz", "Oscillator", 6, "A3"));
    let id = service.list_all()[0].id.unwrap();

    let updated = item("Crystal 16MHz", "Oscillator", 4, "A4");
    assert_eq!(service.update_item(id, &updated), WriteOutcome::Applied);
    assert_eq!(service.get_item(id), Some(updated.with_id(id)));
    assert_eq!(service.low_stock_items().len(), 1);

    assert_eq!(service.remove_item(id), WriteOutcome::Applied);
    assert!(service.list_all().is_empty());
    assert_eq!(service.remove_item(id), WriteOutcome::NotFound);
}

#[test]
fn test_partial_update_keeps_other_fields() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.add_item(&item("Relay 5V", "Electromech", 7, "Drawer 2"));
    let id = service.list_all()[0].id.unwrap();

    let restock = ItemPatch {
        quantity: Some(30),
        ..Default::default()
    };
    assert_eq!(service.patch_item(id, &restock), WriteOutcome::Applied);
    assert_eq!(
        service.get_item(id),
        Some(item("Relay 5V", "Electromech", 30, "Drawer 2").with_id(id))
    );

    let missing = id + 100;
    assert_eq!(service.patch_item(missing, &restock), WriteOutcome::NotFound);
    assert_eq!(service.list_all().len(), 1);
}

#[test]
fn test_reads_reflect_external_writes() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    service.add_item(&item("A", "", 1, ""));

    // A second writer on the same file; the service holds no cache
    let other = service_in(&dir);
    other.add_item(&item("B", "", 1, ""));

    assert_eq!(sorted_names(&service.list_all()), vec!["A", "B"]);
}

#[test]
fn test_unopenable_store_returns_empty_results() {
    let dir = TempDir::new().unwrap();
    let service = InventoryService::new(&StoreConfig::new(dir.path()));

    assert!(!service.is_ready());
    assert!(!service.add_item(&item("A", "", 1, "")));
    assert!(service.list_all().is_empty());
    assert!(service.find_by("A", Criterion::Name).is_empty());
    assert_eq!(service.remove_item(1), WriteOutcome::Failed);
}
