//! Demo runner: one diagnosis pass against the simulated collaborators.
//!
//! Wires the pipeline exactly as the embedding service would, runs a single
//! request (plus optional failure prediction) and prints the JSON responses.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use plantpilot::{
    DiagnosisPipeline, DiagnosisRequest, PredictionAgent, SensorSnapshot,
};

#[derive(Parser, Debug)]
#[command(name = "diagnose", about = "Run one manufacturing copilot diagnosis")]
struct Args {
    /// Plant identifier, e.g. PUNE-IN
    #[arg(long, default_value = "PUNE-IN")]
    plant_id: String,

    /// Equipment tag, e.g. CNC-A-102
    #[arg(long, default_value = "CNC-A-102")]
    equipment_id: String,

    /// Technician's description of the issue
    #[arg(long, default_value = "Machine overheating")]
    problem: String,

    /// Optional image reference for visual inspection
    #[arg(long)]
    image_ref: Option<String>,

    /// Also run the failure prediction stage with a degraded sensor snapshot
    #[arg(long)]
    predict: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let request = DiagnosisRequest {
        plant_id: args.plant_id,
        equipment_id: args.equipment_id,
        problem_description: args.problem,
        image_ref: args.image_ref,
    };

    let pipeline = DiagnosisPipeline::simulated();
    let response = pipeline.diagnose(&request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if args.predict {
        let agent = PredictionAgent::rule_based();
        let snapshot = SensorSnapshot {
            temperature_avg: 78.5,
            vibration_avg: 3.8,
            pressure_avg: 38.0,
            hours_since_maintenance: 400.0,
            ..SensorSnapshot::default()
        };
        let prediction = agent.predict(&request.equipment_id, &snapshot).await;
        println!("{}", serde_json::to_string_pretty(&prediction)?);
    }

    Ok(())
}
