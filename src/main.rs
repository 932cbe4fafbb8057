use fks_map::{FksMap, FksMapBuilder};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("FKS Perfect Hash Map Demo");
    println!("=========================");

    let mut map = FksMap::new(vec![
        (1u64, "a".to_string()),
        (3, "b".to_string()),
        (9, "c".to_string()),
    ])?;
    println!("Built map with {} keys over {} slots\n", map.len(), map.capacity());

    println!("Checked lookups:");
    for key in [1u64, 3, 9, 5] {
        match map.get(&key) {
            Ok(value) => println!("  {}: {}", key, value),
            Err(e) => println!("  {}: {}", key, e),
        }
    }

    *map.get_mut(&3)? = "teste".to_string();
    println!("\nAfter overwriting key 3: {}", map.get(&3)?);

    // SAFETY: 9 was part of the construction input.
    let fast = unsafe { map.get_unchecked(&9) };
    println!("Unchecked lookup of 9: {}", fast);

    println!("\nBuilder pattern:");
    let prices: FksMap<u32, f64> = FksMapBuilder::new()
        .insert(1001, 1.50)
        .insert(1002, 0.75)
        .insert(1003, 2.00)
        .build()?;
    for (sku, price) in prices.iter() {
        println!("  sku {}: ${:.2}", sku, price);
    }

    Ok(())
}
