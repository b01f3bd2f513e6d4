//! Basic runsheet workflow example

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use runsheet_core::utils::MemoryStorage;
use runsheet_core::{Dispatcher, Order, OrderItem, OrderStatus, PaymentMethod, PaymentMode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🚚 Runsheet Core - Basic Runsheet Example\n");

    // Create a new dispatcher with in-memory storage
    let storage = MemoryStorage::new();
    let mut dispatcher = Dispatcher::new(storage);

    // 1. Register the morning's orders
    println!("📦 Registering Orders...");

    let mut cod_order = Order::new(
        "ORD001".to_string(),
        "ORD-20250110-0001".to_string(),
        "Priya Sharma".to_string(),
        "+91 98765 43211".to_string(),
        "456, DLF Phase 2, Gurugram".to_string(),
        "Zone A".to_string(),
        PaymentMode::Cod,
        "11:00 AM - 1:00 PM".to_string(),
    );
    cod_order.add_item(OrderItem::new(
        "OI001".to_string(),
        "P002".to_string(),
        "Fresh Potatoes".to_string(),
        BigDecimal::from(5),
        BigDecimal::from(30),
    ));
    cod_order.add_item(OrderItem::new(
        "OI002".to_string(),
        "P003".to_string(),
        "Red Onions".to_string(),
        BigDecimal::from(3),
        BigDecimal::from(35),
    ));

    let mut prepaid_order = Order::new(
        "ORD002".to_string(),
        "ORD-20250110-0002".to_string(),
        "Rajesh Kumar".to_string(),
        "+91 98765 43210".to_string(),
        "123, MG Road, Sector 15, Gurugram".to_string(),
        "Zone A".to_string(),
        PaymentMode::Online,
        "11:00 AM - 1:00 PM".to_string(),
    );
    prepaid_order.add_item(OrderItem::new(
        "OI003".to_string(),
        "P004".to_string(),
        "Shimla Apples".to_string(),
        BigDecimal::from(2),
        BigDecimal::from(120),
    ));

    for order in [cod_order, prepaid_order] {
        let order = dispatcher.create_order(order).await?;
        println!(
            "  ✓ {} - {} (₹{}, {:?})",
            order.order_number, order.customer_name, order.total_amount, order.payment_mode
        );
    }
    println!();

    // 2. Pack the orders and build a runsheet
    println!("🗂️  Building Runsheet...");
    for order_id in ["ORD001", "ORD002"] {
        dispatcher
            .update_order_status(order_id, OrderStatus::Accepted)
            .await?;
        dispatcher
            .update_order_status(order_id, OrderStatus::Packed)
            .await?;
    }

    let runsheet = dispatcher
        .create_runsheet(
            "RS-2025-001".to_string(),
            "R001".to_string(),
            "Suresh Kumar".to_string(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            "Zone A".to_string(),
        )
        .await?;
    println!("  ✓ Created runsheet {} for {}", runsheet.id, runsheet.rider_name);

    dispatcher.assign_order("RS-2025-001", "ORD001").await?;
    dispatcher.assign_order("RS-2025-001", "ORD002").await?;
    let runsheet = dispatcher.dispatch_runsheet("RS-2025-001").await?;
    println!(
        "  ✓ Dispatched with {} stops ({:?})\n",
        runsheet.total_stops(),
        runsheet.status
    );

    // 3. The rider delivers
    println!("🏠 Delivering...");
    dispatcher.mark_delivered("ORD001").await?;
    dispatcher.mark_delivered("ORD002").await?;

    let delivery = dispatcher.delivery_summary("RS-2025-001").await?;
    println!(
        "  ✓ {}/{} delivered ({}% complete)\n",
        delivery.delivered_orders, delivery.total_orders, delivery.completion_percent
    );

    // 4. Evening cash desk: reconcile and close
    println!("💰 Cash Collection...");
    let summary = dispatcher.collection_summary("RS-2025-001").await?;
    println!("  Expected COD:  ₹{}", summary.expected_cod);
    println!("  Prepaid Total: ₹{}", summary.prepaid_total);
    println!("  Grand Total:   ₹{}", summary.grand_total);

    let attempt = dispatcher
        .record_collection(
            "RS-2025-001",
            summary.expected_cod.clone(),
            PaymentMethod::Cash,
            Some("Receipt #4417".to_string()),
        )
        .await?;
    println!(
        "  ✓ Recorded attempt {} ({:?})",
        attempt.id, attempt.result.outcome
    );

    let attempt = dispatcher.verify_collection(&attempt.id, None).await?;
    println!("  ✓ Verified ({:?})", attempt.status);

    let report = dispatcher.close_report("RS-2025-001").await?;
    println!("  Can close: {} (issues: {:?})", report.can_close, report.issues);

    let closed = dispatcher.close_runsheet("RS-2025-001").await?;
    println!("\n✅ Runsheet {} closed at {:?}", closed.id, closed.closed_at.unwrap());

    Ok(())
}
