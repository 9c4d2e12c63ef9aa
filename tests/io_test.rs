/*!
 * Input and Output Tests
 * Loading process files and exporting run results through the CSV writers
 */

use cpu_scheduler_sim::io::{ParseIssueKind, METADATA_HEADER};
use cpu_scheduler_sim::{
    load_processes, CsvMetadataWriter, CsvTimelineWriter, ProcessSpec, SchedulerEngine,
    SchedulerError, SchedulingPolicy, SimulationConfig, TimelineSample, TimelineSink,
    VirtualClock,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::io::BufWriter;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_load_file_with_header_and_bad_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("processes.csv");
    fs::write(
        &path,
        "id,arrival_time,burst_time,priority\n1,0,5,1\n\n2,2,3\n3,x,1,2\n4,6,7,5\n",
    )
    .unwrap();

    let loaded = load_processes(&path).unwrap();

    assert_eq!(
        loaded.processes,
        vec![ProcessSpec::new(1, 0, 5, 1), ProcessSpec::new(4, 6, 7, 5)]
    );
    assert_eq!(loaded.issues.len(), 2);
    assert_eq!(loaded.issues[0].line, 4);
    assert_eq!(loaded.issues[0].kind, ParseIssueKind::FieldCount { found: 3 });
    assert_eq!(loaded.issues[1].line, 5);
    assert!(matches!(
        &loaded.issues[1].kind,
        ParseIssueKind::InvalidNumber { field, .. } if field == "arrival_time"
    ));
    assert!(!loaded.is_clean());
}

#[test]
fn test_missing_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_processes(temp_dir.path().join("absent.csv"));
    assert!(matches!(result, Err(SchedulerError::Sink(_))));
}

#[test]
fn test_export_run_to_files() {
    let temp_dir = TempDir::new().unwrap();
    let gantt_path = temp_dir.path().join("fcfs_gantt_data.csv");
    let meta_path = temp_dir.path().join("fcfs_meta_data.csv");

    let mut engine = SchedulerEngine::with_clock(
        SchedulingPolicy::Fcfs,
        SimulationConfig::unit_step(),
        Arc::new(VirtualClock::new()),
    )
    .unwrap();
    engine
        .add_processes(vec![
            ProcessSpec::new(1, 1, 2, 0),
            ProcessSpec::new(2, 1, 1, 4),
        ])
        .unwrap();

    let mut gantt = CsvTimelineWriter::new(BufWriter::new(fs::File::create(&gantt_path).unwrap()));
    engine.run(true, &mut gantt).unwrap();
    gantt.flush().unwrap();
    drop(gantt);

    let mut meta = CsvMetadataWriter::new(BufWriter::new(fs::File::create(&meta_path).unwrap()));
    engine.export_metadata(&mut meta).unwrap();
    meta.flush().unwrap();
    drop(meta);

    assert_eq!(
        fs::read_to_string(&gantt_path).unwrap(),
        "0,-1\n1,1\n2,1\n3,2\n"
    );
    assert_eq!(
        fs::read_to_string(&meta_path).unwrap(),
        format!("{}\n1,1,2,0,3,2,0\n2,1,1,4,4,3,2\n", METADATA_HEADER)
    );
}

#[test]
fn test_timeline_writer_in_memory() {
    let mut writer = CsvTimelineWriter::new(Vec::new());
    writer.record(TimelineSample::running(0, 3)).unwrap();
    writer.record(TimelineSample::idle(5)).unwrap();
    let text = String::from_utf8(writer.into_inner()).unwrap();
    assert_eq!(text, "0,3\n5,-1\n");
}
