//! COD reconciliation examples

use bigdecimal::BigDecimal;
use runsheet_core::{ReconciliationResult, Reconciler};
use std::str::FromStr;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("💵 Runsheet Core - COD Reconciliation Examples\n");

    // 1. Clean hand-in: collected matches expected
    println!("✅ Exact Match:");
    let result =
        ReconciliationResult::evaluate(BigDecimal::from(32400), BigDecimal::from(32400))?;
    println!("  Expected:   ₹{}", result.expected);
    println!("  Collected:  ₹{}", result.collected);
    println!("  Difference: ₹{}", result.difference);
    println!("  Outcome:    {:?}\n", result.outcome);

    // 2. Shortfall: rider handed in less than expected
    println!("⚠️  Shortfall:");
    let result =
        ReconciliationResult::evaluate(BigDecimal::from(32400), BigDecimal::from(31000))?;
    println!("  Expected:    ₹{}", result.expected);
    println!("  Collected:   ₹{}", result.collected);
    println!("  Difference:  ₹{}", result.difference);
    println!("  Discrepancy: ₹{}", result.discrepancy());
    println!("  Outcome:     {:?}\n", result.outcome);

    // 3. Excess: customer had no change, rider over-collected
    println!("📈 Excess:");
    let result = ReconciliationResult::evaluate(BigDecimal::from(1000), BigDecimal::from(1100))?;
    println!("  Expected:   ₹{}", result.expected);
    println!("  Collected:  ₹{}", result.collected);
    println!("  Difference: ₹{}", result.difference);
    println!("  Outcome:    {:?}\n", result.outcome);

    // 4. Tolerance band for digital-payment rounding
    println!("🎯 Tolerance Band (±0.01):");
    let reconciler = Reconciler::new(BigDecimal::from_str("0.01")?)?;
    let result = reconciler.evaluate(
        BigDecimal::from_str("100")?,
        BigDecimal::from_str("100.005")?,
    )?;
    println!("  Expected:   ₹{}", result.expected);
    println!("  Collected:  ₹{}", result.collected);
    println!("  Difference: ₹{}", result.difference);
    println!("  Outcome:    {:?} (within the band)\n", result.outcome);

    // 5. Negative input is an error, not an outcome
    println!("🚫 Negative Input:");
    match ReconciliationResult::evaluate(BigDecimal::from(100), BigDecimal::from(-50)) {
        Ok(_) => unreachable!(),
        Err(e) => println!("  Rejected: {}\n", e),
    }

    // 6. The wire shape every consumer agrees on
    println!("🔌 Serialized Contract:");
    let result = ReconciliationResult::evaluate(BigDecimal::from(100), BigDecimal::from(90))?;
    println!("  {}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
