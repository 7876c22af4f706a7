use chrono::{Datelike, Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const OUTPUT_PATH: &str = "house_prices_1000_extended.csv";
const ROWS: usize = 1000;

#[derive(Debug, Serialize)]
struct SaleRow {
    id: usize,
    location: &'static str,
    house_type: &'static str,
    bedrooms: u32,
    area_sqft: u32,
    price: u64,
    date: String,
}

/// Normal sample by the Marsaglia polar method.
fn normal(rng: &mut impl Rng, mean: f64, std_dev: f64) -> f64 {
    loop {
        let u: f64 = rng.random_range(-1.0..1.0);
        let v: f64 = rng.random_range(-1.0..1.0);
        let s = u * u + v * v;
        if s > 0.0 && s < 1.0 {
            return mean + std_dev * u * (-2.0 * s.ln() / s).sqrt();
        }
    }
}

fn main() {
    // Fixed seed so the sample file is reproducible.
    let mut rng = StdRng::seed_from_u64(42);

    // (location, base price per sq ft in ₹)
    let locations = [
        ("Mumbai", 18_000.0),
        ("Bangalore", 9_500.0),
        ("Pune", 8_000.0),
        ("Delhi", 12_000.0),
        ("Hyderabad", 7_500.0),
        ("Chennai", 8_500.0),
    ];
    // (house type, price multiplier)
    let house_types = [
        ("Apartment", 1.0),
        ("Independent House", 1.25),
        ("Villa", 1.6),
        ("Penthouse", 2.1),
    ];

    let first_day = NaiveDate::from_ymd_opt(2019, 1, 1).expect("valid start date");
    let last_day = NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid end date");
    let span_days = (last_day - first_day).num_days() + 1;

    let mut writer = csv::Writer::from_path(OUTPUT_PATH).expect("Failed to create output file");

    for id in 0..ROWS {
        let (location, per_sqft) = locations[rng.random_range(0..locations.len())];
        let (house_type, multiplier) = house_types[rng.random_range(0..house_types.len())];
        let bedrooms = rng.random_range(1..=5u32);
        let area_sqft = (450.0 * bedrooms as f64 + normal(&mut rng, 0.0, 120.0)).max(300.0) as u32;
        let date = first_day + Duration::days(rng.random_range(0..span_days));

        // ~6% appreciation per year with per-sale noise.
        let years = (date.year() - first_day.year()) as f64 + date.ordinal0() as f64 / 365.0;
        let trend = 1.06f64.powf(years);
        let noise = normal(&mut rng, 1.0, 0.08).max(0.6);
        let price = (area_sqft as f64 * per_sqft * multiplier * trend * noise).round() as u64;

        writer
            .serialize(SaleRow {
                id,
                location,
                house_type,
                bedrooms,
                area_sqft,
                price,
                date: date.format("%Y-%m-%d").to_string(),
            })
            .expect("Failed to write row");
    }

    writer.flush().expect("Failed to flush CSV");

    println!("Wrote {ROWS} house sale records to {OUTPUT_PATH}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal_samples_centre_on_the_mean() {
        let mut rng = StdRng::seed_from_u64(7);
        let n = 20_000;
        let mean = (0..n).map(|_| normal(&mut rng, 1.0, 0.08)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.01, "{mean}");
    }

    #[test]
    fn same_seed_gives_same_samples() {
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(normal(&mut a, 0.0, 120.0), normal(&mut b, 0.0, 120.0));
        }
    }
}
