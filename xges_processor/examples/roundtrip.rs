use std::env;
use std::fs;

use timeline_core::{XgesGenerationOptions, XgesParsingOptions};
use tracing_subscriber::EnvFilter;
use xges_processor::{XgesDecoder, generate_xges};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let input_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "xges_processor/tests/test_data/simple.xges".to_string());
    let output_path = "roundtrip_output.xges";

    let input = fs::File::open(&input_path)?;
    let mut decoder = XgesDecoder::with_options(input, XgesParsingOptions::default());
    let timeline = decoder.decode()?;
    println!(
        "解析 {input_path}: {} 条轨道, 帧率 {}",
        timeline.tracks.len(),
        decoder.rate()
    );

    for track in &timeline.tracks {
        println!(
            "  {} 轨道: {} 个子项, {} 个片段",
            track.kind,
            track.children.len(),
            track.clips().count()
        );
    }

    let generated = generate_xges(&timeline, &XgesGenerationOptions::default())?;
    fs::write(output_path, &generated)?;
    println!("{generated}");

    Ok(())
}
