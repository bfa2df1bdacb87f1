use std::collections::HashSet;

use logcast_client::LogcastClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("logcast stream verifier");
    println!("=======================\n");

    let url = "ws://127.0.0.1:8080/ws";
    let mut client = LogcastClient::connect(url).await?;
    println!("Connected to {}\n", url);

    let mut seen = HashSet::new();
    let mut last_number = None;
    let mut received = 0u64;

    while let Some(record) = client.next_record().await? {
        received += 1;
        let fields = match record.fields() {
            Ok(fields) => fields,
            Err(e) => {
                println!("#{received}: unparsable record {:?}: {}", record.as_str(), e);
                continue;
            }
        };

        if !seen.insert(fields.hash.to_string()) {
            println!("#{received}: duplicate hash {}", fields.hash);
        }
        if let Some(previous) = last_number {
            if fields.number < previous {
                println!("#{received}: out of order ({} after {})", fields.number, previous);
            }
        }
        last_number = Some(fields.number);

        println!("#{received}: {}", record);
    }

    println!("\nServer closed the stream after {} records", received);
    Ok(())
}
