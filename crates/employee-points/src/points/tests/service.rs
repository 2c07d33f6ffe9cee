use std::sync::Arc;

use super::common::*;
use crate::config::LedgerConfig;
use crate::points::domain::{NewApplication, NewEmployee, NewPeriod};
use crate::points::evaluation::UniformTieBreaker;
use crate::points::service::{ErrorKind, LedgerError, PointsLedgerService};
use crate::points::store::{Collection, StoreError};
use crate::points::views::{period_view, point_view};

#[test]
fn duplicate_employee_names_are_rejected() {
    let (service, _store, _) = build_service(Vec::new());
    add_employees(&service, &["Alice"]);

    let err = service
        .add_employee(NewEmployee {
            name: "Alice".to_string(),
            active: false,
        })
        .expect_err("duplicate rejected");
    assert!(matches!(
        err,
        LedgerError::Store(StoreError::DuplicateKey {
            collection: Collection::Employees,
            ..
        })
    ));
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
    assert_eq!(service.employees().expect("employees").len(), 1);
}

#[test]
fn duplicate_application_names_are_rejected() {
    let (service, _store, _) = build_service(Vec::new());
    add_application(&service);

    let err = service
        .add_application(NewApplication {
            name: APPLICATION.to_string(),
        })
        .expect_err("duplicate rejected");
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
}

#[test]
fn add_point_requires_known_employee_and_application() {
    let (service, _) = seeded_service(Vec::new());

    match service.add_point(new_point("Mallory", "2024-03-04")) {
        Err(LedgerError::NotFound { entity, name }) => {
            assert_eq!(entity, "employee");
            assert_eq!(name, "Mallory");
        }
        other => panic!("expected missing employee, got {other:?}"),
    }

    let mut point = new_point("Alice", "2024-03-04");
    point.application_name = "Payroll".to_string();
    match service.add_point(point) {
        Err(LedgerError::NotFound { entity, .. }) => assert_eq!(entity, "application"),
        other => panic!("expected missing application, got {other:?}"),
    }
}

#[test]
fn add_point_stamps_date_added_and_keeps_fields() {
    let (service, _) = seeded_service(Vec::new());
    let mut request = new_point("Alice", "2024-03-04T10:15:00");
    request.prod_env = true;

    let before = chrono::Utc::now().naive_utc();
    let point = service.add_point(request).expect("point added");
    assert!(point.date_added >= before - chrono::Duration::seconds(1));
    assert_eq!(point.date_earned, ts("2024-03-04T10:15:00"));
    assert!(point.prod_env);

    let names = service.directory().expect("directory");
    let view = point_view(&point, &names);
    assert_eq!(view.employee_name.as_deref(), Some("Alice"));
    assert_eq!(view.application_name.as_deref(), Some(APPLICATION));
}

#[test]
fn totals_cover_every_employee_in_store_order() {
    let (service, _) = seeded_service(Vec::new());
    add_employees(&service, &["Carol"]);
    award(&service, "Bob", &["2024-03-02", "2024-03-03"]);
    award(&service, "Carol", &["2024-01-02"]);

    let totals = service
        .all_totals(Some(ts("2024-03-01")), Some(ts("2024-03-31")))
        .expect("totals");
    let pairs: Vec<_> = totals
        .totals
        .iter()
        .map(|t| (t.employee.name.as_str(), t.count))
        .collect();
    assert_eq!(pairs, [("Alice", 0), ("Bob", 2), ("Carol", 0)]);

    let all_time = service.all_totals(None, None).expect("totals");
    assert_eq!(all_time.range.from, ts("1900-01-01"));
    assert_eq!(all_time.totals[2].count, 1);
}

#[test]
fn employee_total_respects_range_and_reports_missing_employee() {
    let (service, _) = seeded_service(Vec::new());
    award(&service, "Alice", &["2024-03-02", "2024-03-20", "2024-04-02"]);

    let march = service
        .employee_total("Alice", Some(ts("2024-03-01")), Some(ts("2024-03-31")))
        .expect("total");
    assert_eq!(march.total, 2);

    let open_start = service
        .employee_total("Alice", None, Some(ts("2024-03-02")))
        .expect("total");
    assert_eq!(open_start.total, 1);

    let err = service
        .employee_total("Nobody", None, None)
        .expect_err("missing employee");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn points_listing_filters_by_earned_date() {
    let (service, _) = seeded_service(Vec::new());
    award(&service, "Alice", &["2024-02-10", "2024-03-10"]);
    award(&service, "Bob", &["2024-03-20"]);

    let march = service
        .points(Some(ts("2024-03-01")), Some(ts("2024-03-31")))
        .expect("points");
    assert_eq!(march.len(), 2);
    assert_eq!(service.points(None, None).expect("points").len(), 3);
}

#[test]
fn referenced_application_cannot_be_removed() {
    let (service, _) = seeded_service(Vec::new());
    award(&service, "Alice", &["2024-03-02"]);

    let err = service
        .remove_application(APPLICATION)
        .expect_err("application in use");
    assert!(matches!(
        err,
        LedgerError::Referenced { references: 1, .. }
    ));
    assert_eq!(err.kind(), ErrorKind::Conflict);

    service
        .add_application(NewApplication {
            name: "Payroll".to_string(),
        })
        .expect("second application");
    let removed = service.remove_application("Payroll").expect("unused app removed");
    assert_eq!(removed.name, "Payroll");
    assert_eq!(service.applications().expect("apps").len(), 1);

    let missing = service
        .remove_application("Payroll")
        .expect_err("already gone");
    assert_eq!(missing.kind(), ErrorKind::NotFound);
}

#[test]
fn periods_must_start_before_they_end() {
    let (service, _store, _) = build_service(Vec::new());

    for (start, end) in [("2024-03-31", "2024-03-01"), ("2024-03-01", "2024-03-01")] {
        let err = service
            .add_period(NewPeriod {
                periodname: "Backwards".to_string(),
                startdate: ts(start),
                enddate: ts(end),
            })
            .expect_err("invalid range");
        assert!(matches!(err, LedgerError::InvalidPeriod { .. }));
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }
}

#[test]
fn new_periods_start_unevaluated_without_winner() {
    let (service, _store, _) = build_service(Vec::new());
    let period = service.add_period(march()).expect("period");
    assert!(!period.evaluated);
    assert_eq!(period.winner, None);

    let view = period_view(&period, &service.directory().expect("directory"));
    assert_eq!(view.winner, None);

    let err = service.add_period(march()).expect_err("duplicate name");
    assert_eq!(err.kind(), ErrorKind::DuplicateKey);
}

#[test]
fn set_employee_active_round_trips() {
    let (service, _) = seeded_service(Vec::new());
    let updated = service.set_employee_active("Alice", false).expect("updated");
    assert!(!updated.active);

    let employees = service.employees().expect("employees");
    assert!(!employees[0].active);
    assert!(employees[1].active);
}

#[test]
fn store_outages_surface_as_unavailable() {
    let service = PointsLedgerService::new(Arc::new(UnavailableStore), UniformTieBreaker);

    let err = service.evaluate_period("March").expect_err("store offline");
    assert_eq!(err.kind(), ErrorKind::Unavailable);

    let err = service
        .add_point(new_point("Alice", "2024-03-02"))
        .expect_err("store offline");
    assert_eq!(err.kind(), ErrorKind::Unavailable);
}

#[test]
fn seeded_config_replays_tie_breaks() {
    let winners = |seed| {
        let store = Arc::new(crate::points::memory::InMemoryEntityStore::new());
        let service = PointsLedgerService::from_config(
            store,
            &LedgerConfig {
                tie_break_seed: Some(seed),
            },
        );
        add_employees(&service, &["Alice", "Bob", "Carol", "Dave"]);
        add_application(&service);
        (1..=6)
            .map(|month| {
                let name = format!("2024-{month:02}");
                service
                    .add_period(NewPeriod {
                        periodname: name.clone(),
                        startdate: ts(&format!("2024-{month:02}-01")),
                        enddate: ts(&format!("2024-{month:02}-28")),
                    })
                    .expect("period");
                service.evaluate_period(&name).expect("evaluates").winner.name
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(winners(99), winners(99));
}

#[test]
fn blank_names_are_invalid_input() {
    let (service, _store, _) = build_service(Vec::new());

    let err = service
        .add_employee(NewEmployee {
            name: String::new(),
            active: true,
        })
        .expect_err("empty employee name");
    assert!(matches!(err, LedgerError::BlankName { entity: "employee" }));
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    let err = service
        .add_application(NewApplication {
            name: "   ".to_string(),
        })
        .expect_err("blank application name");
    assert!(matches!(err, LedgerError::BlankName { entity: "application" }));

    let mut period = march();
    period.periodname = "\t".to_string();
    let err = service.add_period(period).expect_err("blank period name");
    assert_eq!(err.kind(), ErrorKind::InvalidInput);

    assert!(service.employees().expect("employees").is_empty());
    assert!(service.applications().expect("apps").is_empty());
    assert!(service.periods().expect("periods").is_empty());
}

#[test]
fn unknown_period_names_leave_no_lock_behind() {
    let (service, _) = seeded_service(Vec::new());

    for i in 0..200 {
        let err = service
            .evaluate_period(&format!("nope-{i}"))
            .expect_err("unknown period");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        let err = service
            .unevaluate_period(&format!("gone-{i}"))
            .expect_err("unknown period");
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
    assert_eq!(service.locked_period_count(), 0);

    service.evaluate_period("March").expect("evaluates");
    service.unevaluate_period("March").expect("unevaluates");
    assert_eq!(service.locked_period_count(), 1);
}
