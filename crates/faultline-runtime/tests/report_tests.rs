//! Fault report collection, logging and rendering tests

mod common;

use common::*;
use faultline_config::{Config, FaultlineConfig};
use faultline_runtime::error_codes::{ERROR_DIVIDE_BY_ZERO, ERROR_NATIVE};
use faultline_runtime::logging::{FaultEvent, FaultLogger, MemoryFaultLogger};
use faultline_runtime::report::{ReportFrame, ReportNative};
use faultline_runtime::{
    ColorMode, FaultReport, FaultReporter, NativeTable, ReportFormatter, ReportOptions, Runtime,
};
use pretty_assertions::assert_eq;
use std::path::Path;
use std::sync::Arc;

fn debug_runtime() -> Runtime {
    bare_runtime(five_deep()).with_debug_info(full_debug_info())
}

fn memory_reporter(max_frames: Option<usize>) -> (FaultReporter, MemoryFaultLogger) {
    let logger = MemoryFaultLogger::new();
    let reporter = FaultReporter::new(ReportOptions {
        max_frames,
        ..Default::default()
    })
    .with_logger(Arc::new(logger.clone()));
    (reporter, logger)
}

// ============================================================================
// Collection
// ============================================================================

#[test]
fn test_collect_copies_everything() {
    let runtime = debug_runtime();
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, Some("ratio of 0 kills"), 3);

    let report = FaultReport::collect(&mut walker, None);

    assert_eq!(report.script.as_deref(), Some("fixture.smx"));
    assert_eq!(report.error_code, ERROR_DIVIDE_BY_ZERO);
    assert_eq!(report.error_string, "Divide by zero");
    assert_eq!(report.custom_message.as_deref(), Some("ratio of 0 kills"));
    assert_eq!(report.native, None);
    assert!(report.debug_info_available);
    assert_eq!(report.total_frames, 3);
    assert!(!report.truncated());
    assert_eq!(
        report.frames[1],
        ReportFrame {
            level: 1,
            address: A4,
            filename: Some("fixture.sp".to_string()),
            function: Some("OnFrame".to_string()),
            line: Some(5),
        }
    );
}

#[test]
fn test_collect_rewinds_walker_first() {
    let runtime = debug_runtime();
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 0);
    walker.skip_frame();
    walker.skip_frame();

    let report = FaultReport::collect(&mut walker, None);
    assert_eq!(report.frames.len(), 6);
    assert_eq!(report.frames[0].address, CIP);
}

#[test]
fn test_collect_respects_frame_limit() {
    let runtime = debug_runtime();
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 0);

    let report = FaultReport::collect(&mut walker, Some(2));
    assert_eq!(report.frames.len(), 2);
    assert_eq!(report.total_frames, 6);
    assert!(report.truncated());
}

#[test]
fn test_collect_native_fault() {
    let natives = NativeTable::from_names(["CreateTimer"]).unwrap();
    let runtime = Runtime::new("timers.smx", natives)
        .with_context(five_deep().with_native_fault(0, ERROR_NATIVE));
    let mut walker = runtime.trace(ERROR_NATIVE, Some("Invalid timer interval"), 4);

    let report = FaultReport::collect(&mut walker, None);
    assert_eq!(
        report.native,
        Some(ReportNative {
            index: 0,
            name: Some("CreateTimer".to_string()),
            error: ERROR_NATIVE,
        })
    );
    assert_eq!(
        report.headline(),
        "Native \"CreateTimer\" reported: Invalid timer interval"
    );
}

// ============================================================================
// Reporter + logging
// ============================================================================

#[test]
fn test_reporter_logs_fault() {
    let runtime = debug_runtime();
    let (reporter, logger) = memory_reporter(None);
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 2);

    reporter.report(&mut walker);

    let events: Vec<FaultEvent> = logger.entries().into_iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![FaultEvent::FaultRaised {
            script: Some("fixture.smx".to_string()),
            code: ERROR_DIVIDE_BY_ZERO,
            message: "Exception reported: Divide by zero".to_string(),
        }]
    );
}

#[test]
fn test_reporter_logs_native_missing_debug_and_truncation() {
    let runtime = bare_runtime(five_deep().with_native_fault(9, ERROR_NATIVE));
    let (reporter, logger) = memory_reporter(Some(1));
    let mut walker = runtime.trace(ERROR_NATIVE, None, 0);

    let report = reporter.report(&mut walker);
    assert_eq!(report.frames.len(), 1);

    let events: Vec<FaultEvent> = logger.entries().into_iter().map(|e| e.event).collect();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[1],
        FaultEvent::NativeFault {
            index: 9,
            name: None,
            error: ERROR_NATIVE,
        }
    );
    assert_eq!(
        events[2],
        FaultEvent::DebugInfoMissing {
            script: Some("fixture.smx".to_string()),
        }
    );
    assert_eq!(events[3], FaultEvent::TraceTruncated { shown: 1, total: 6 });
}

#[test]
fn test_reporter_from_default_config() {
    let reporter = FaultReporter::from_config(&Config::default());
    assert_eq!(reporter.options(), &ReportOptions::default());
    // Stderr backend keeps nothing in memory
    assert!(reporter.logger().entries().is_empty());
}

#[test]
fn test_reporter_follows_loaded_config() {
    let settings = FaultlineConfig::parse(
        "[report]\nmax_frames = 3\nshow_addresses = true\ncolor = \"never\"\n\n\
         [logging]\nbackend = \"memory\"\n",
        Path::new("faultline.toml"),
    )
    .unwrap();
    let config = Config {
        settings,
        project_root: None,
    };

    let expected = ReportOptions {
        max_frames: Some(3),
        show_addresses: true,
        color: ColorMode::Never,
    };
    assert_eq!(ReportOptions::from_config(&config), expected);

    let reporter = FaultReporter::from_config(&config);
    assert_eq!(reporter.options(), &expected);

    let runtime = debug_runtime();
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 0);
    let report = reporter.report(&mut walker);
    assert_eq!(report.frames.len(), 3);

    // Memory backend keeps the fault and the truncation
    let events: Vec<FaultEvent> = reporter
        .logger()
        .entries()
        .into_iter()
        .map(|e| e.event)
        .collect();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], FaultEvent::TraceTruncated { shown: 3, total: 6 });

    let text = reporter.formatter().format_to_string(&report);
    assert!(text.contains("  [1] Line 5, fixture.sp::OnFrame @ 0x000000a4\n"));
    assert!(text.ends_with("  ... 3 more frames\n"));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_resolved_trace() {
    let runtime = debug_runtime();
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 2);
    let report = FaultReport::collect(&mut walker, None);

    let text = ReportFormatter::plain().format_to_string(&report);
    assert_eq!(
        text,
        "error[14]: Divide by zero\n\
         \x20 --> fixture.smx\n\
         stack trace:\n\
         \x20 [0] Line 99, fixture.sp::Divide\n\
         \x20 [1] Line 5, fixture.sp::OnFrame\n\
         \x20 [2] Line 4, fixture.sp::Notify\n\
         \x20 [3] Line 3, fixture.sp::HandleEvent\n"
    );
}

#[test]
fn test_render_without_debug_info() {
    let runtime = bare_runtime(five_deep());
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 4);
    let report = FaultReport::collect(&mut walker, None);

    let text = ReportFormatter::plain().format_to_string(&report);
    assert_eq!(
        text,
        "error[14]: Divide by zero\n\
         \x20 --> fixture.smx\n\
         \x20  = note: debug info not available; showing raw addresses\n\
         stack trace:\n\
         \x20 [0] 0x000000f0\n\
         \x20 [1] 0x000000a4\n"
    );
}

#[test]
fn test_report_json() {
    let runtime = debug_runtime();
    let mut walker = runtime.trace(ERROR_DIVIDE_BY_ZERO, None, 5);
    let report = FaultReport::collect(&mut walker, None);

    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["error_code"], 14);
    assert_eq!(json["total_frames"], 1);
    assert_eq!(json["frames"][0]["function"], "Divide");
    assert_eq!(json["frames"][0]["line"], 99);
    assert_eq!(json["native"], serde_json::Value::Null);
}
