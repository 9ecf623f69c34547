use super::*;
use crate::io::{LoadedSheet, MemorySheetSource};
use crate::roster::StaticRoster;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

fn sample_sheet() -> RawSheet {
    RawSheet::from_strings([
        vec!["", "ИСИП-118 (ауд)", "", "ТН-101 (ауд)", ""],
        vec!["1 пара", "Math, Ivanov", "101", "Art", "7"],
        vec!["2 пара", "", "", "Physics, Petrov", "8"],
        vec!["Вторник", "", "", "", ""],
        vec!["1 пара", "History", "201", "", ""],
    ])
}

fn service_with(source: Arc<dyn SheetSource>, reload: ReloadPolicy) -> TimetableService {
    TimetableService::new(
        source,
        Arc::new(StaticRoster::new(["ИСИП-118", "ТН-101", "ЮР-146"])),
        SheetLayout::default(),
        reload,
    )
}

/// Counts loads so reload behaviour can be observed.
struct CountingSource {
    loads: AtomicUsize,
}

#[async_trait]
impl SheetSource for CountingSource {
    async fn load(&self) -> TimetableResult<LoadedSheet> {
        let n = self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(LoadedSheet {
            sheet: sample_sheet(),
            checksum: format!("load-{}", n),
            source: "counting".to_string(),
        })
    }

    fn describe(&self) -> String {
        "counting".to_string()
    }
}

struct FailingSource;

#[async_trait]
impl SheetSource for FailingSource {
    async fn load(&self) -> TimetableResult<LoadedSheet> {
        Err(TimetableError::load("sheet unavailable"))
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

#[tokio::test]
async fn test_query_single_group() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::PerRequest,
    );

    let result = service.query(GroupSelector::group("ИСИП-118")).await.unwrap();

    let days = result.days();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].sessions.len(), 1);
    assert_eq!(days[0].sessions[0].teacher, "Ivanov");
    assert_eq!(days[1].sessions[0].subject, "History");
}

#[tokio::test]
async fn test_query_unknown_group_is_not_an_error() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::PerRequest,
    );

    let result = service.query(GroupSelector::group("ПН-101")).await.unwrap();

    assert!(result.is_not_found());
}

#[tokio::test]
async fn test_query_all_groups() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::PerRequest,
    );

    let result = service.query(GroupSelector::All).await.unwrap();

    match result {
        ScheduleQueryResult::All(all) => {
            assert_eq!(
                all.group_names().collect::<Vec<_>>(),
                vec!["ИСИП-118", "ТН-101", "ЮР-146"]
            );
            assert_eq!(all.get("ТН-101").map(|d| d[0].sessions.len()), Some(2));
            assert_eq!(all.get("ЮР-146").map(|d| d.len()), Some(0));
        }
        other => panic!("expected fan-out, got {:?}", other),
    }
}

#[tokio::test]
async fn test_per_request_policy_reloads_every_query() {
    let source = Arc::new(CountingSource {
        loads: AtomicUsize::new(0),
    });
    let service = service_with(source.clone(), ReloadPolicy::PerRequest);

    service.query(GroupSelector::group("ТН-101")).await.unwrap();
    service.query(GroupSelector::group("ТН-101")).await.unwrap();

    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_cached_policy_reuses_snapshot_until_refresh() {
    let source = Arc::new(CountingSource {
        loads: AtomicUsize::new(0),
    });
    let service = service_with(source.clone(), ReloadPolicy::Cached);

    assert!(service.current_snapshot().is_none());
    service.query(GroupSelector::group("ТН-101")).await.unwrap();
    service.query(GroupSelector::All).await.unwrap();
    assert_eq!(source.loads.load(Ordering::SeqCst), 1);
    assert_eq!(service.current_snapshot().unwrap().checksum, "load-0");

    service.refresh().await.unwrap();
    assert_eq!(source.loads.load(Ordering::SeqCst), 2);
    assert_eq!(service.current_snapshot().unwrap().checksum, "load-1");
}

#[tokio::test]
async fn test_load_failure_propagates() {
    let service = service_with(Arc::new(FailingSource), ReloadPolicy::PerRequest);

    let err = service.query(GroupSelector::group("ТН-101")).await.unwrap_err();

    assert!(matches!(err, TimetableError::LoadFailure { .. }));
    assert!(service.current_snapshot().is_none());
}

#[tokio::test]
async fn test_snapshot_info() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::Cached,
    );

    let snapshot = service.refresh().await.unwrap();
    let info = SnapshotInfo::from(snapshot.as_ref());

    assert_eq!(info.source, "memory");
    assert_eq!(info.rows, 5);
    assert_eq!(info.columns, 5);
    assert_eq!(info.checksum.len(), 64);
}

#[tokio::test]
async fn test_import_grid_rejects_non_excel_upload() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::PerRequest,
    );

    let err = service
        .import_grid(b"a,b".to_vec(), "week.csv")
        .await
        .unwrap_err();

    assert!(matches!(err, TimetableError::UnsupportedFormat { .. }));
    assert!(err.to_string().contains("Please upload an Excel file"));
}

#[tokio::test]
async fn test_import_grid_reports_corrupt_workbook() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::PerRequest,
    );

    let err = service
        .import_grid(b"not a workbook".to_vec(), "week.xlsx")
        .await
        .unwrap_err();

    assert!(matches!(err, TimetableError::LoadFailure { .. }));
}

#[test]
fn test_from_config_uses_configured_source() {
    let mut config = AppConfig::default();
    config.sheet.path = "week.csv".into();
    config.sheet.reload = ReloadPolicy::Cached;

    let service = TimetableService::from_config(&config);

    assert_eq!(service.source_name(), "week.csv");
    assert_eq!(service.reload_policy(), ReloadPolicy::Cached);
    assert_eq!(service.groups().len(), 23);
}

/// Minimal weekly grid: one group, six days, one lesson on Monday.
fn grid_workbook_bytes() -> Vec<u8> {
    use rust_xlsxwriter::Workbook;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(3, 1, "ИСИП-118").unwrap();
    worksheet.write_string(3, 2, "305").unwrap();
    for day in 0..6u16 {
        worksheet
            .write_string(4, 1 + 2 * day, format!("{} апреля День", 14 + day))
            .unwrap();
    }
    worksheet.write_string(5, 0, "08:00").unwrap();
    worksheet.write_string(5, 1, "Математика, Иванов").unwrap();
    workbook.save_to_buffer().unwrap()
}

#[tokio::test]
async fn test_import_grid_parses_workbook() {
    let service = service_with(
        Arc::new(MemorySheetSource::new("memory", sample_sheet())),
        ReloadPolicy::PerRequest,
    );
    let bytes = grid_workbook_bytes();

    let import = service.import_grid(bytes.clone(), "week.XLSX").await.unwrap();

    assert_eq!(import.source, "week.XLSX");
    assert_eq!(import.checksum, crate::io::calculate_checksum(&bytes));
    assert_eq!(import.lessons.len(), 1);
    let lesson = &import.lessons[0];
    assert_eq!(lesson.group, "ИСИП-118");
    assert_eq!(lesson.room, "305");
    assert_eq!(lesson.day, "14 апреля День");
    assert_eq!(lesson.course, "Математика");
    assert_eq!(lesson.teacher, "Иванов");
    assert_eq!(lesson.full_time, "14 апреля 08:00");
}
