/*!
 * CPU Scheduler Simulator - Main Entry Point
 *
 * Loads a process file and runs every scheduling policy over it in parallel:
 * - One blocking task per policy, each with its own engine and workers
 * - Timeline and metadata CSV files per policy
 * - A comparison table of the runs on stdout
 */

use cpu_scheduler_sim::{
    comparison_table, init_tracing, load_processes, CsvMetadataWriter, CsvTimelineWriter,
    PerformanceSummary, ProcessSpec, SchedResult, SchedulerEngine, SchedulingPolicy,
    SimulationConfig, TimelineSample, TimelineSink,
};
use futures::future::join_all;
use miette::IntoDiagnostic;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

const DEFAULT_INPUT: &str = "processes.csv";

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    let config = SimulationConfig::from_env()?;
    let input = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_INPUT.to_string());
    let output_dir = PathBuf::from(
        std::env::var("SCHED_SIM_OUTPUT_DIR").unwrap_or_else(|_| ".".to_string()),
    );
    std::fs::create_dir_all(&output_dir).into_diagnostic()?;

    info!(
        input = %input,
        output_dir = %output_dir.display(),
        clock = ?config.clock,
        "CPU scheduler simulator starting"
    );

    let loaded = load_processes(&input)?;
    if !loaded.is_clean() {
        warn!(rejected = loaded.issues.len(), "some input rows were skipped");
    }
    if loaded.processes.is_empty() {
        warn!("no processes to schedule");
    }

    let specs: Arc<[ProcessSpec]> = loaded.processes.into();
    let output_dir: Arc<Path> = output_dir.into();

    let tasks = SchedulingPolicy::ALL.iter().map(|&policy| {
        let specs = Arc::clone(&specs);
        let output_dir = Arc::clone(&output_dir);
        let config = config.clone();
        tokio::task::spawn_blocking(move || run_policy(policy, config, &specs, &output_dir))
    });

    let mut rows = Vec::with_capacity(SchedulingPolicy::ALL.len());
    for result in join_all(tasks).await {
        rows.push(result.into_diagnostic()??);
    }

    println!("{}", comparison_table(&rows));
    info!("all policies complete");
    Ok(())
}

/// Run one policy and write `<policy>_gantt_data.csv` and `<policy>_meta_data.csv`
fn run_policy(
    policy: SchedulingPolicy,
    config: SimulationConfig,
    specs: &[ProcessSpec],
    output_dir: &Path,
) -> SchedResult<(SchedulingPolicy, PerformanceSummary)> {
    let mut engine = SchedulerEngine::new(policy, config)?;
    engine.add_processes(specs.iter().copied())?;

    let mut timeline: Vec<TimelineSample> = Vec::new();
    let summary = engine.run(true, &mut timeline)?;

    let gantt_path = output_dir.join(format!("{}_gantt_data.csv", policy.short_name()));
    let mut gantt = CsvTimelineWriter::new(BufWriter::new(File::create(&gantt_path)?));
    for sample in &timeline {
        gantt.record(*sample)?;
    }
    gantt.flush()?;

    let meta_path = output_dir.join(format!("{}_meta_data.csv", policy.short_name()));
    let mut meta = CsvMetadataWriter::new(BufWriter::new(File::create(&meta_path)?));
    meta.write_header()?;
    engine.export_metadata(&mut meta)?;
    meta.flush()?;

    info!(
        policy = %policy,
        run_id = %summary.run_id,
        makespan_ms = summary.makespan_ms,
        gantt = %gantt_path.display(),
        metadata = %meta_path.display(),
        "results written"
    );

    let reports = engine.reports()?;
    Ok((policy, PerformanceSummary::evaluate(&reports, &timeline)))
}
