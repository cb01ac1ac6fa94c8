use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// One sample tutorial: title, channel, duration (minutes), category,
/// dominant color hex, transcript snippet.
type SampleRow = (&'static str, &'static str, f64, &'static str, &'static str, &'static str);

/// Hand-picked rows covering every category, every difficulty keyword
/// tier (plus unclassified titles), every duration bucket, and a spread
/// of dominant colors including malformed cells.
const SAMPLES: &[SampleRow] = &[
    (
        "Easy Granny Square for Absolute Beginners",
        "Stitch Lab",
        10.0,
        "grannysquare",
        "#ff0000",
        "a simple square anyone can make",
    ),
    (
        "No-Sew Plushie Bee",
        "Yarn Den",
        15.0,
        "plushie",
        "#ffd700",
        "basic shapes joined without sewing",
    ),
    (
        "Intermediate Rose Bouquet",
        "Petal Co",
        25.0,
        "flowers",
        "#ff9aa2",
        "a weekend project with layered petals",
    ),
    (
        "Tapestry Practice Swatch",
        "Loop Lane",
        45.0,
        "tapestry",
        "#b5ead7",
        "practice carrying two colours",
    ),
    (
        "Advanced Tapestry Landscape",
        "Loop Lane",
        95.0,
        "tapestry",
        "#0000ff",
        "intricate colourwork across sixty rows",
    ),
    (
        "Expert Lace Cardigan",
        "Hook Club",
        120.0,
        "wearable",
        "#c7ceea",
        "complex shaping for a fitted wearable",
    ),
    (
        "Spiral Scrubby",
        "Hook Club",
        8.0,
        "unique",
        "rgb(226, 240, 203)",
        "",
    ),
    (
        "Mystery Yarn Coaster",
        "Yarn Den",
        12.0,
        "unique",
        "not-a-color",
        "",
    ),
];

fn main() {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_catalog.parquet".to_string());

    if output_path.ends_with(".csv") {
        write_csv(&output_path);
    } else {
        write_parquet(&output_path);
    }

    println!("Wrote {} videos to {output_path}", SAMPLES.len());
}

fn write_csv(path: &str) {
    let mut writer = csv::Writer::from_path(path).expect("Failed to create output file");
    writer
        .write_record([
            "title",
            "thumbnail_url",
            "url",
            "channel",
            "duration",
            "category",
            "dominant_color_hex",
            "transcript",
        ])
        .expect("Failed to write header");
    for (i, (title, channel, duration, category, hex, transcript)) in SAMPLES.iter().enumerate() {
        let thumbnail = thumbnail_url(i);
        let url = video_url(i);
        let minutes = duration.to_string();
        writer
            .write_record([
                *title,
                thumbnail.as_str(),
                url.as_str(),
                *channel,
                minutes.as_str(),
                *category,
                *hex,
                *transcript,
            ])
            .expect("Failed to write row");
    }
    writer.flush().expect("Failed to flush CSV");
}

fn write_parquet(path: &str) {
    let n = SAMPLES.len();
    let titles = StringArray::from_iter_values(SAMPLES.iter().map(|r| r.0));
    let thumbnails = StringArray::from_iter_values((0..n).map(thumbnail_url));
    let urls = StringArray::from_iter_values((0..n).map(video_url));
    let channels = StringArray::from_iter_values(SAMPLES.iter().map(|r| r.1));
    let durations = Float64Array::from_iter_values(SAMPLES.iter().map(|r| r.2));
    let categories = StringArray::from_iter_values(SAMPLES.iter().map(|r| r.3));
    let colors = StringArray::from_iter_values(SAMPLES.iter().map(|r| r.4));
    let transcripts = StringArray::from_iter_values(SAMPLES.iter().map(|r| r.5));

    let schema = Arc::new(Schema::new(vec![
        Field::new("title", DataType::Utf8, false),
        Field::new("thumbnail_url", DataType::Utf8, false),
        Field::new("url", DataType::Utf8, false),
        Field::new("channel", DataType::Utf8, false),
        Field::new("duration", DataType::Float64, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("dominant_color_hex", DataType::Utf8, false),
        Field::new("transcript", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(titles),
            Arc::new(thumbnails),
            Arc::new(urls),
            Arc::new(channels),
            Arc::new(durations),
            Arc::new(categories),
            Arc::new(colors),
            Arc::new(transcripts),
        ],
    )
    .expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn thumbnail_url(i: usize) -> String {
    format!("https://img.example.com/thumbs/{i:03}.jpg")
}

fn video_url(i: usize) -> String {
    format!("https://videos.example.com/watch/{i:03}")
}
