use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Subcommand;
use focuswrap_core::{normalize, Config, PlanGenerator, StudyPlan};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Ask the plan generator for a plan and print it as JSON
    Generate {
        /// What to study
        #[arg(required = true, num_args = 1..)]
        prompt: Vec<String>,
    },
    /// Normalize a raw generator payload and print the plan
    Check {
        /// Payload file, or "-" for stdin
        file: PathBuf,
    },
}

pub async fn run(action: PlanAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let plan = match action {
        PlanAction::Generate { prompt } => generate(&prompt.join(" "), config).await?,
        PlanAction::Check { file } => normalize(&read_input(&file)?)?,
    };
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}

pub async fn generate(
    prompt: &str,
    config: &Config,
) -> Result<StudyPlan, Box<dyn std::error::Error>> {
    let generator = PlanGenerator::new(
        config.planner.endpoint.clone(),
        Duration::from_millis(config.planner.request_timeout_ms),
    );
    Ok(generator.generate(prompt).await?)
}

/// Read a file, or stdin when the path is `-`.
pub fn read_input(path: &Path) -> Result<String, Box<dyn std::error::Error>> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(path)?)
    }
}
