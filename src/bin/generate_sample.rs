use anyhow::{Context, Result};
use serde::Serialize;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n.max(1)
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One row in the layout of the public fast-food locations dataset.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SourceRow {
    address: String,
    city: String,
    country: &'static str,
    keys: String,
    latitude: String,
    longitude: String,
    name: String,
    postal_code: String,
    province: String,
    websites: String,
}

/// (city, province, latitude, longitude, spread in degrees)
const CITIES: &[(&str, &str, f64, f64, f64)] = &[
    ("San Francisco", "CA", 37.77, -122.42, 0.03),
    ("Los Angeles", "CA", 34.05, -118.24, 0.12),
    ("San Diego", "CA", 32.72, -117.16, 0.06),
    ("Austin", "TX", 30.27, -97.74, 0.06),
    ("Houston", "TX", 29.76, -95.37, 0.10),
    ("Dallas", "TX", 32.78, -96.80, 0.08),
    ("New York", "NY", 40.71, -74.01, 0.05),
    ("Buffalo", "NY", 42.89, -78.88, 0.04),
    ("Chicago", "IL", 41.88, -87.63, 0.08),
    ("Atlanta", "GA", 33.75, -84.39, 0.06),
    ("Augusta", "GA", 33.47, -82.01, 0.04),
    ("Orlando", "FL", 28.54, -81.38, 0.06),
    ("Miami", "FL", 25.76, -80.19, 0.05),
    ("Seattle", "WA", 47.61, -122.33, 0.05),
    ("Denver", "CO", 39.74, -104.99, 0.06),
    ("Thibodaux", "LA", 29.80, -90.82, 0.02),
];

/// (brand as written in the source, relative weight)
const CHAINS: &[(&str, u32)] = &[
    ("McDonald's", 30),
    ("Burger King", 14),
    ("Taco Bell", 13),
    ("Wendy's", 11),
    ("Subway", 9),
    ("Arby's", 7),
    ("KFC", 7),
    ("Domino's Pizza", 6),
    ("Sonic Drive-In", 5),
    ("Jack in the Box", 4),
    ("Chick-fil-A", 4),
    ("Dairy Queen", 3),
    ("A&W / Long John Silver's", 2),
    ("Carl's Jr.", 2),
    ("Joe's Café!", 1),
];

const STREETS: &[&str] = &[
    "Main St", "Broadway", "Oak Ave", "Market St", "Elm St", "Highway 9",
    "Park Blvd", "Mission St", "Lake Rd", "Canal Blvd",
];

fn pick_chain(rng: &mut SimpleRng) -> &'static str {
    let total: u32 = CHAINS.iter().map(|(_, w)| w).sum();
    let mut ticket = rng.below(total as usize) as u32;
    for &(name, weight) in CHAINS {
        if ticket < weight {
            return name;
        }
        ticket -= weight;
    }
    CHAINS[0].0
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_rows = 8000;
    let output_path = "Fast_Food_Restaurants_8000_sample.csv";

    let mut writer = csv::Writer::from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;

    for id in 0..n_rows {
        let (city, province, lat, lon, spread) = CITIES[rng.below(CITIES.len())];
        let name = pick_chain(&mut rng);
        let street = STREETS[rng.below(STREETS.len())];

        let mut row = SourceRow {
            address: format!("{} {street}", 100 + rng.below(9900)),
            city: city.to_string(),
            country: "US",
            keys: format!("us/{}/{}", province.to_lowercase(), id),
            latitude: format!("{:.6}", rng.gauss(lat, spread)),
            longitude: format!("{:.6}", rng.gauss(lon, spread)),
            name: name.to_string(),
            postal_code: format!("{:05}", rng.below(99_999)),
            province: province.to_string(),
            websites: String::new(),
        };

        // About one row in a hundred is missing a required field.
        if rng.below(100) == 0 {
            match rng.below(3) {
                0 => row.city.clear(),
                1 => row.latitude.clear(),
                _ => row.address.clear(),
            }
        }

        writer
            .serialize(&row)
            .with_context(|| format!("writing row {id}"))?;
    }
    writer.flush().context("flushing CSV writer")?;

    println!("Wrote {n_rows} restaurants to {output_path}");
    Ok(())
}
