// 通过进程内映射服务驱动的盘符表场景（需要 `testing` feature）
use std::sync::Arc;

use subst_core::drive_service::memory::{DefineCall, MemoryDriveService};
use subst_core::drive_service::{DefineMode, DosDeviceService};
use subst_core::{DriveField, DriveName, DriveRegistry, DriveStatus, NO_ASSIGNMENT};

fn name(s: &str) -> DriveName {
    DriveName::parse(s).expect("drive name")
}

fn host() -> Arc<MemoryDriveService> {
    let svc = Arc::new(MemoryDriveService::new());
    svc.add_fixed_disk(name("C:"));
    svc.add_fixed_disk(name("D:"));
    svc.add_optical(name("F:"));
    svc
}

#[test]
fn registry_lists_a_to_z_in_order() {
    let registry = DriveRegistry::new(host());
    let names: Vec<String> = registry.iter().map(|d| d.name().to_string()).collect();
    let expected: Vec<String> = ('A'..='Z').map(|c| format!("{c}:")).collect();
    assert_eq!(registry.len(), 26);
    assert_eq!(names, expected);
}

#[test]
fn registry_classifies_host_volumes() {
    let svc = host();
    svc.set_mapping(name("S:"), Some(r"C:\src"));
    let registry = DriveRegistry::new(svc);

    for drive in &registry {
        let expected = match drive.name().as_str() {
            "C:" | "D:" | "F:" => DriveStatus::Disable,
            "S:" => DriveStatus::Busy,
            _ => DriveStatus::Enable,
        };
        assert_eq!(drive.status(), expected, "{}", drive.name());
    }
    assert_eq!(
        registry.get(&name("S:")).map(|d| d.description()),
        Some(r"C:\src")
    );
    assert_eq!(
        registry.get(&name("E:")).map(|d| d.description()),
        Some(NO_ASSIGNMENT)
    );
}

#[test]
fn building_the_registry_issues_no_define_calls() {
    let svc = host();
    let _registry = DriveRegistry::new(svc.clone());
    assert!(svc.calls().is_empty());
}

#[test]
fn assign_on_selected_drive_round_trips() {
    let data = tempfile::tempdir().expect("tempdir");
    let svc = host();
    let mut registry = DriveRegistry::new(svc.clone());

    let e = name("E:");
    let drive = registry.get_mut(&e).expect("E:");
    assert_eq!(drive.status(), DriveStatus::Enable);
    assert_eq!(drive.description(), NO_ASSIGNMENT);

    let mut events = drive.subscribe();
    drive.assign(data.path());

    assert_eq!(
        svc.calls(),
        vec![DefineCall {
            mode: DefineMode::Assign,
            drive: e,
            target: Some(data.path().to_path_buf()),
        }]
    );
    assert_eq!(drive.status(), DriveStatus::Busy);
    assert_eq!(drive.description(), data.path().to_string_lossy());
    assert_eq!(
        svc.query_dos_device(&e).expect("query").as_deref(),
        Some(drive.description())
    );

    let fields: Vec<DriveField> = std::iter::from_fn(|| events.try_recv().ok())
        .map(|ev| ev.field)
        .collect();
    assert_eq!(fields, vec![DriveField::Description, DriveField::Status]);

    // 其他盘符不受影响
    assert_eq!(
        registry.get(&name("G:")).map(|d| d.status()),
        Some(DriveStatus::Enable)
    );
}

#[test]
fn system_disk_is_never_assigned() {
    let data = tempfile::tempdir().expect("tempdir");
    let svc = host();
    let mut registry = DriveRegistry::new(svc.clone());

    let d = registry.get_mut(&name("D:")).expect("D:");
    d.assign(data.path());

    assert!(svc.calls().iter().all(|c| c.mode == DefineMode::Unassign));
    assert_eq!(d.status(), DriveStatus::Disable);
    assert_eq!(d.description(), NO_ASSIGNMENT);
}

#[test]
fn external_change_is_picked_up_on_next_assign() {
    let data = tempfile::tempdir().expect("tempdir");
    let svc = host();
    let mut registry = DriveRegistry::new(svc.clone());

    // 外部（例如命令行 subst）在探测之后建立了映射
    svc.set_mapping(name("K:"), Some(r"C:\elsewhere"));
    let k = registry.get_mut(&name("K:")).expect("K:");
    assert_eq!(k.status(), DriveStatus::Enable);

    k.assign(data.path());
    assert_eq!(k.status(), DriveStatus::Busy);
    let expected = data.path().to_string_lossy().into_owned();
    assert_eq!(svc.mapping(&name("K:")), Some(expected));
}

#[test]
fn snapshot_matches_drives() {
    let registry = DriveRegistry::new(host());
    let snapshot = registry.snapshot();
    assert_eq!(snapshot.len(), 26);
    for (snap, drive) in snapshot.iter().zip(registry.drives()) {
        assert_eq!(snap.name, *drive.name());
        assert_eq!(snap.status, drive.status());
        assert_eq!(snap.description, drive.description());
    }
}
