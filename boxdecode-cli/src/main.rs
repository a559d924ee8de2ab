use boxdecode::{
    CoordSpace, DecodeConfig, Decoder, Detection, LabelTable, ScoreMode, ScoreRule,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const SCHEMA_JSON: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.schema.json"));
const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "BoxDecode CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print the JSON schema and exit.
    #[arg(long)]
    print_schema: bool,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for decode diagnostics.
    #[arg(long)]
    trace: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum ScoreModeConfig {
    Auto,
    ClassOnly,
    ObjTimesClass,
}

impl From<ScoreModeConfig> for ScoreMode {
    fn from(value: ScoreModeConfig) -> Self {
        match value {
            ScoreModeConfig::Auto => ScoreMode::Auto,
            ScoreModeConfig::ClassOnly => ScoreMode::ClassOnly,
            ScoreModeConfig::ObjTimesClass => ScoreMode::ObjTimesClass,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct DecodeConfigJson {
    conf_threshold: f32,
    iou_threshold: f32,
    input_size: u32,
    score_mode: ScoreModeConfig,
    max_detections: usize,
}

impl Default for DecodeConfigJson {
    fn default() -> Self {
        let cfg = DecodeConfig::default();
        Self {
            conf_threshold: cfg.conf_threshold,
            iou_threshold: cfg.iou_threshold,
            input_size: cfg.input_size,
            score_mode: ScoreModeConfig::Auto,
            max_detections: cfg.max_detections,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    tensor_path: String,
    shape: Vec<usize>,
    labels_path: Option<String>,
    output_path: Option<String>,
    decode: DecodeConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tensor_path: String::new(),
            shape: Vec::new(),
            labels_path: None,
            output_path: None,
            decode: DecodeConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct DetectionRecord {
    label: String,
    class_index: usize,
    score: f32,
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl From<Detection> for DetectionRecord {
    fn from(value: Detection) -> Self {
        Self {
            label: value.label,
            class_index: value.class_index,
            score: value.score,
            left: value.rect.left,
            top: value.rect.top,
            right: value.rect.right,
            bottom: value.rect.bottom,
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    score_rule: Option<&'static str>,
    coord_space: Option<&'static str>,
    anchors: usize,
    candidates: usize,
    kept: usize,
    detections: Vec<DetectionRecord>,
}

fn score_rule_name(rule: Option<ScoreRule>) -> Option<&'static str> {
    rule.map(|rule| match rule {
        ScoreRule::ClassOnly => "class_only",
        ScoreRule::ObjTimesClass => "obj_times_class",
    })
}

fn coord_space_name(space: Option<CoordSpace>) -> Option<&'static str> {
    space.map(|space| match space {
        CoordSpace::Normalized => "normalized",
        CoordSpace::Pixel => "pixel",
    })
}

/// Reads a flat little-endian f32 tensor dump.
fn read_tensor(path: &str) -> Result<Vec<f32>, Box<dyn std::error::Error>> {
    let bytes = fs::read(path)?;
    if bytes.len() % 4 != 0 {
        return Err(format!("tensor file length {} is not a multiple of 4", bytes.len()).into());
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

fn read_labels(path: &str) -> Result<LabelTable, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let names: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();
    Ok(LabelTable::new(names)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive("boxdecode=info".parse()?),
            )
            .with_target(false)
            .init();
    }

    if cli.print_schema {
        println!("{SCHEMA_JSON}");
        return Ok(());
    }
    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.tensor_path.is_empty() {
        return Err("tensor_path must be set in the config".into());
    }
    if config.shape.is_empty() {
        return Err("shape must be set in the config".into());
    }

    let data = read_tensor(&config.tensor_path)?;
    let labels = match config.labels_path {
        Some(ref path) => read_labels(path)?,
        None => LabelTable::coco80(),
    };

    let decoder = Decoder::new(
        DecodeConfig {
            conf_threshold: config.decode.conf_threshold,
            iou_threshold: config.decode.iou_threshold,
            input_size: config.decode.input_size,
            score_mode: config.decode.score_mode.into(),
            max_detections: config.decode.max_detections,
        },
        labels,
    )?;

    let outcome = decoder.decode(&config.shape, &data);
    tracing::info!(
        detections = outcome.detections.len(),
        candidates = outcome.diagnostics.candidates,
        "decode finished"
    );

    let output = Output {
        score_rule: score_rule_name(outcome.diagnostics.score_rule),
        coord_space: coord_space_name(outcome.diagnostics.coord_space),
        anchors: outcome.diagnostics.anchors,
        candidates: outcome.diagnostics.candidates,
        kept: outcome.diagnostics.kept,
        detections: outcome
            .detections
            .into_iter()
            .map(DetectionRecord::from)
            .collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
