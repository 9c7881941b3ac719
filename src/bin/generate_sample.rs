use anyhow::{Context, Result};
use serde_json::{json, Map, Value};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u32, hi: u32) -> u32 {
        lo + (self.next_f64() * f64::from(hi - lo + 1)) as u32 % (hi - lo + 1)
    }
}

const LICENSES: &[(&str, u32)] = &[
    ("Pirate License", 1_000),
    ("Navy License", 50_000),
    ("Merchant License", 5_000),
    ("Remnant License", 120_000),
];

const SIZES: &[(&str, u32)] = &[("Tiny", 1), ("Small", 2), ("Medium", 4), ("Large", 7), ("Huge", 11)];

const FAMILIES: &[&str] = &["Ion", "Plasma", "Fusion", "Ramscoop", "Greyhound"];

fn engine(rng: &mut SimpleRng, family: &str, size: &str, scale: u32) -> Value {
    let capacity = 10 * scale + rng.range(0, 5);
    let mut record = Map::new();
    record.insert("name".into(), json!(format!("{family} {size} Thruster")));
    record.insert("category".into(), json!("Engines"));
    record.insert("cost".into(), json!(scale * 4_000 + rng.range(0, 999)));
    record.insert("mass".into(), json!(capacity));
    record.insert("outfit space".into(), json!(capacity));
    record.insert("engine capacity".into(), json!(capacity));
    record.insert("thrust".into(), json!(f64::from(scale * 4 + rng.range(0, 4)) * 0.5));
    record.insert("thrusting energy".into(), json!(f64::from(scale) * 0.4));
    record.insert("thrusting heat".into(), json!(f64::from(scale) * 0.6));
    record.insert("thumbnail".into(), json!(format!("outfit/{family} thruster")));
    record.insert("flare sprite".into(), json!(format!("effect/{family} flare")));
    record.insert("description".into(), json!("Generated sample engine."));
    if rng.range(0, 3) > 0 {
        let (license, _) = LICENSES[rng.range(0, LICENSES.len() as u32 - 1) as usize];
        record.insert("licenses".into(), json!([license.trim_end_matches(" License")]));
    }
    Value::Object(record)
}

fn steering(rng: &mut SimpleRng, family: &str, size: &str, scale: u32) -> Value {
    let capacity = 8 * scale + rng.range(0, 4);
    json!({
        "name": format!("{family} {size} Steering"),
        "cost": scale * 3_000 + rng.range(0, 999),
        "Engine Capacity": capacity,
        "Outfit Space": capacity,
        "turn": f64::from(scale * 90 + rng.range(0, 60)),
        "turning energy": f64::from(scale) * 0.3,
        "turning heat": f64::from(scale) * 0.5,
        "steering flare sprite": format!("effect/{family} flare"),
    })
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let mut licenses: Vec<Value> = LICENSES
        .iter()
        .map(|(name, cost)| json!({ "name": name, "cost": cost }))
        .collect();
    // Same name once the suffix is stripped; the viewer keeps the first.
    licenses.push(json!({ "name": "Pirate", "cost": 1 }));

    let mut engines = Vec::new();
    for family in FAMILIES {
        for &(size, scale) in SIZES {
            engines.push(engine(&mut rng, family, size, scale));
            engines.push(steering(&mut rng, family, size, scale));
        }
    }

    let guns: Vec<Value> = (1..=5)
        .map(|i| json!({ "name": format!("Blaster Mk {i}"), "outfit space": 10 * i, "weapon capacity": 10 * i }))
        .collect();

    let document = json!({
        "Licenses": licenses,
        "Engines": engines,
        "Guns": guns,
    });

    let output_path = "sample_outfits.json";
    let text = serde_json::to_string_pretty(&document).context("serializing sample document")?;
    std::fs::write(output_path, text).with_context(|| format!("writing {output_path}"))?;

    println!(
        "Wrote {} engines and {} licenses to {output_path}",
        engines_len(&document),
        LICENSES.len()
    );
    Ok(())
}

fn engines_len(document: &Value) -> usize {
    document["Engines"].as_array().map_or(0, Vec::len)
}
