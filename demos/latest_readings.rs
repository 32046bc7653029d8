use baswap::Baswap;

const COMBINED_FILE_ID: &str = "1q38mQxBrIqTTzLmjuBwrxZ4S712T8D6H";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Baswap::default();

    let dataset = client.latest().file(COMBINED_FILE_ID).call().await?;
    let readings = dataset.collect_readings()?;

    println!("{} readings up to now", readings.len());
    for reading in readings.iter().rev().take(5) {
        println!(
            "{}  temp={:.1}°C  pH={:.2}  salinity={:.2} ppt  EC={:.3} mS/cm",
            reading.timestamp,
            reading.temperature,
            reading.ph,
            reading.salinity,
            reading.conductivity,
        );
    }
    Ok(())
}
