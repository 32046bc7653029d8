use baswap::Baswap;

// Storage file id of the combined historical CSV. Replace with your own
// export if you maintain a separate archive.
const COMBINED_FILE_ID: &str = "1q38mQxBrIqTTzLmjuBwrxZ4S712T8D6H";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Baswap::default();

    let history = client.historical().file(COMBINED_FILE_ID).call().await?;
    let df = history.frame.collect()?;

    println!("historical rows: {}", df.height());
    println!("{}", df.head(Some(10)));
    Ok(())
}
