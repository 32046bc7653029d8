use baswap::{Aggregation, Baswap, Resolution};
use chrono::Duration;

const COMBINED_FILE_ID: &str = "1q38mQxBrIqTTzLmjuBwrxZ4S712T8D6H";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Baswap::default();

    let dataset = client.latest().file(COMBINED_FILE_ID).call().await?;

    let (_, newest) = dataset.time_bounds()?;
    let newest = newest.expect("dataset is never empty");
    let week = dataset.get_range((newest - Duration::days(6)).date(), newest.date());

    let daily = week.resample(Resolution::Daily, Aggregation::Mean);
    println!("daily means, last 7 days:");
    println!("{}", daily.frame.collect()?);
    Ok(())
}
