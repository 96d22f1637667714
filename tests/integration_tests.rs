use tempviews::datafusion::{create_temp_tables, DataFusionContext};
use tempviews::storage::table::{DataType, Value};

fn load_test_context() -> DataFusionContext {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(true)
        .try_init();

    let mut ctx = DataFusionContext::new().expect("Failed to create context");
    create_temp_tables(&mut ctx).expect("Failed to create temp tables");
    ctx
}

#[test]
fn test_registers_exactly_two_views() {
    let ctx = load_test_context();
    assert_eq!(ctx.list_tables(), vec!["merchants", "products"]);
}

#[test]
fn test_row_counts_exclude_header() {
    let ctx = load_test_context();
    assert_eq!(ctx.row_count("merchants").unwrap(), 5);
    assert_eq!(ctx.row_count("products").unwrap(), 7);
}

#[test]
fn test_columns_follow_header_order() {
    let ctx = load_test_context();

    let merchants = ctx.get_table_schema("merchants").unwrap();
    assert_eq!(merchants.column_names(), vec!["id", "name", "city", "joined"]);

    let products = ctx.get_table_schema("products").unwrap();
    assert_eq!(
        products.column_names(),
        vec!["sku", "merchant_id", "name", "price", "in_stock"]
    );
}

#[test]
fn test_inferred_types() {
    let ctx = load_test_context();

    let products = ctx.get_table_schema("products").unwrap();
    let types: Vec<DataType> = products.columns.iter().map(|c| c.data_type).collect();
    assert_eq!(
        types,
        vec![
            DataType::String,
            DataType::Integer,
            DataType::String,
            DataType::Float,
            DataType::Boolean,
        ]
    );

    let merchants = ctx.get_table_schema("merchants").unwrap();
    assert_eq!(merchants.columns[0].data_type, DataType::Integer);
}

#[test]
fn test_reload_is_idempotent() {
    let mut ctx = load_test_context();
    create_temp_tables(&mut ctx).unwrap();

    assert_eq!(ctx.table_count(), 2);
    assert_eq!(ctx.row_count("merchants").unwrap(), 5);
    assert_eq!(ctx.row_count("products").unwrap(), 7);
}

#[test]
fn test_where_clause() {
    let ctx = load_test_context();
    let result = ctx
        .execute_sql("SELECT sku FROM products WHERE in_stock AND price < 20")
        .unwrap();

    // P1 (9.99), P4 (4.75), P7 (15.25)
    assert_eq!(result.row_count(), 3);
}

#[test]
fn test_join_across_views() {
    let ctx = load_test_context();
    let result = ctx
        .execute_sql(
            "SELECT m.name, COUNT(*) AS product_count \
             FROM products p JOIN merchants m ON p.merchant_id = m.id \
             GROUP BY m.name ORDER BY m.name",
        )
        .unwrap();

    assert_eq!(result.row_count(), 5);
    assert_eq!(result.rows[0].values[0], Value::String("Acme".to_string()));
    assert_eq!(result.rows[0].values[1], Value::Integer(2));
    assert_eq!(result.rows[1].values[0], Value::String("Globex".to_string()));
    assert_eq!(result.rows[1].values[1], Value::Integer(2));
}

#[test]
fn test_view_contents() {
    let ctx = load_test_context();
    let merchants = ctx.view("merchants").unwrap();

    assert_eq!(merchants.name, "merchants");
    let ids: Vec<i64> = merchants
        .column_values("id")
        .iter()
        .filter_map(|v| v.as_integer())
        .collect();
    let mut sorted = ids.clone();
    sorted.sort();
    assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_dates_come_back_as_text() {
    let ctx = load_test_context();
    let result = ctx
        .execute_sql("SELECT joined FROM merchants WHERE id = 1")
        .unwrap();

    assert_eq!(
        result.rows[0].values[0],
        Value::String("2019-03-14".to_string())
    );
}
