#![cfg(test)]
use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::thread;
use std::time::{Duration, Instant};

use icmpgen_common::emission::{EmissionRequest, ProbeKind, ProgressEvent, SourceMode};
use icmpgen_core::emitter::EmissionWorker;

use crate::utils::{counts, fixed_local, RecordingSink, ScriptedTransmitter, LOCAL_ADDR};

fn scenario_request(count: u32) -> EmissionRequest {
    EmissionRequest::new("10.0.0.5", count)
        .unwrap()
        .with_source_mode(SourceMode::Local)
        .with_probe_kind(ProbeKind::EchoRequest)
}

/// All transmissions succeed: (1,1) (2,2) (3,3) then final (3,3).
#[test]
fn scenario_all_successful() {
    let transmitter = ScriptedTransmitter::default();
    let sink = RecordingSink::default();

    let handle = EmissionWorker::new(scenario_request(3), transmitter.clone(), fixed_local)
        .spawn(sink.clone())
        .unwrap();
    let summary: ProgressEvent = handle.join().unwrap();

    let events: Vec<ProgressEvent> = sink.events();
    assert_eq!(counts(&events), vec![(1, 1), (2, 2), (3, 3), (3, 3)]);
    assert_eq!(events.iter().filter(|e| e.is_final).count(), 1);
    assert!(events.last().unwrap().is_final);
    assert_eq!(summary, *events.last().unwrap());
    assert_eq!(transmitter.probes().len(), 3);
}

/// The second transmission fails: (1,1) (2,1) (3,2) then final (3,2).
#[test]
fn scenario_second_transmission_fails() {
    let transmitter = ScriptedTransmitter::failing_on(&[2]);
    let sink = RecordingSink::default();

    let summary = EmissionWorker::new(scenario_request(3), transmitter, fixed_local)
        .spawn(sink.clone())
        .unwrap()
        .join()
        .unwrap();

    assert_eq!(counts(&sink.events()), vec![(1, 1), (2, 1), (3, 2), (3, 2)]);
    assert!(summary.is_final);
    assert!(!summary.was_cancelled());
}

#[test]
fn emits_count_progress_events_plus_one_final() {
    for count in [1u32, 2, 7, 25] {
        let transmitter = ScriptedTransmitter::failing_on(&[1, 4, 5]);
        let events: Vec<ProgressEvent> =
            EmissionWorker::new(scenario_request(count), transmitter, fixed_local)
                .run()
                .collect();

        let non_final = events.iter().filter(|e| !e.is_final).count();
        assert_eq!(non_final, count as usize);
        assert_eq!(events.len(), count as usize + 1);

        let last = events.last().unwrap();
        assert!(last.is_final);
        assert_eq!(last.attempted, count);
        assert!(events.iter().all(|e| e.succeeded <= e.attempted));
        assert!(events.iter().all(|e| e.total == count));
    }
}

#[test]
fn stop_before_start_reports_nothing_attempted() {
    let transmitter = ScriptedTransmitter::default();
    let sink = RecordingSink::default();

    let worker = EmissionWorker::new(scenario_request(5), transmitter.clone(), fixed_local);
    let stop = worker.stop_handle();
    stop.stop();
    stop.stop();

    let summary = worker.spawn(sink.clone()).unwrap().join().unwrap();

    assert_eq!(counts(&sink.events()), vec![(0, 0)]);
    assert!(summary.is_final);
    assert!(transmitter.probes().is_empty());
}

#[test]
fn stop_after_k_attempts_ends_the_run() {
    let transmitter = ScriptedTransmitter::default();
    let worker = EmissionWorker::new(scenario_request(10), transmitter.clone(), fixed_local);
    let stop = worker.stop_handle();
    let mut emission = worker.run();

    for k in 1..=4 {
        assert_eq!(emission.next().unwrap().attempted, k);
    }
    stop.stop();

    let last = emission.next().unwrap();
    assert!(last.is_final);
    assert_eq!(last.attempted, 4);
    assert_eq!(last.succeeded, 4);
    assert!(emission.next().is_none());
    assert_eq!(transmitter.probes().len(), 4);
}

#[test]
fn stop_interrupts_interval_wait() {
    let request = scenario_request(3).with_interval_secs(3600).unwrap();
    let sink = RecordingSink::default();
    let handle = EmissionWorker::new(request, ScriptedTransmitter::default(), fixed_local)
        .spawn(sink.clone())
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while sink.events().is_empty() && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!handle.is_finished());

    let stopped_at = Instant::now();
    handle.stop();
    let summary = handle.join().unwrap();

    assert!(stopped_at.elapsed() < Duration::from_secs(5));
    assert_eq!((summary.attempted, summary.succeeded), (1, 1));
    assert!(summary.was_cancelled());
    assert_eq!(counts(&sink.events()), vec![(1, 1), (1, 1)]);
}

#[test]
fn zero_interval_does_not_block() {
    let start = Instant::now();
    let events: Vec<ProgressEvent> =
        EmissionWorker::new(scenario_request(500), ScriptedTransmitter::default(), fixed_local)
            .run()
            .collect();

    assert_eq!(events.len(), 501);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[test]
fn local_source_is_identical_across_run() {
    let transmitter = ScriptedTransmitter::default();
    EmissionWorker::new(scenario_request(20), transmitter.clone(), fixed_local)
        .run()
        .for_each(drop);

    let probes = transmitter.probes();
    assert_eq!(probes.len(), 20);
    assert!(probes.iter().all(|p| p.source == LOCAL_ADDR));
}

#[test]
fn randomized_source_octets_stay_in_range() {
    let transmitter = ScriptedTransmitter::default();
    let request = scenario_request(500).with_source_mode(SourceMode::Randomized);
    EmissionWorker::new(request, transmitter.clone(), fixed_local)
        .run()
        .for_each(drop);

    let probes = transmitter.probes();
    assert_eq!(probes.len(), 500);
    for probe in probes {
        assert!(
            probe.source.octets().iter().all(|o| (1..=254).contains(o)),
            "{} out of range",
            probe.source
        );
        assert_eq!(probe.destination, Ipv4Addr::new(10, 0, 0, 5));
    }
}

#[test]
fn seeded_runs_repeat_their_sources() {
    let run = |seed: u64| -> Vec<Ipv4Addr> {
        let transmitter = ScriptedTransmitter::default();
        let request = scenario_request(10).with_source_mode(SourceMode::Randomized);
        EmissionWorker::new(request, transmitter.clone(), fixed_local)
            .with_seed(seed)
            .run()
            .for_each(drop);
        transmitter.probes().into_iter().map(|p| p.source).collect()
    };

    assert_eq!(run(9), run(9));
}

#[test]
fn randomized_source_changes_between_attempts() {
    let transmitter = ScriptedTransmitter::default();
    let request = scenario_request(32).with_source_mode(SourceMode::Randomized);
    EmissionWorker::new(request, transmitter.clone(), fixed_local)
        .with_seed(3)
        .run()
        .for_each(drop);

    let sources: HashSet<Ipv4Addr> = transmitter.probes().into_iter().map(|p| p.source).collect();
    assert!(sources.len() > 1, "every attempt used {sources:?}");
    assert!(!sources.contains(&LOCAL_ADDR));
}
