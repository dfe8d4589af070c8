use chrono::{DateTime, Duration, Local, TimeZone};
use recurdo::dates::{add_days, days_between, normalize_to_day_boundary};
use recurdo::models::{IntervalUnit, Task};
use recurdo::progress::evaluate;
use recurdo::renewal::{renew, Renewal};
use recurdo::urgency::{compute_urgency, Urgency};

fn local(y: i32, m: u32, d: u32, h: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, m, d, h, 0, 0).earliest().unwrap()
}

#[test]
fn test_lifecycle_of_ten_day_task() {
    let created = Local::now();
    let task = Task::recurring("t".into(), "Water plants".into(), 10, IntervalUnit::Days, None, &created);
    assert_eq!(task.due_date, normalize_to_day_boundary(&add_days(&created, 10).unwrap()));

    // At creation: nothing elapsed beyond the part of today already gone.
    let fresh = evaluate(&task, &created);
    assert!(fresh.fraction >= 0.0 && fresh.fraction < 0.1, "fraction = {}", fresh.fraction);
    assert!(fresh.days_remaining == 10 || fresh.days_remaining == 11);
    assert_eq!(compute_urgency(&task, &created), Urgency::Normal);

    // During the due day.
    let due_day = task.due_date + Duration::hours(12);
    assert_eq!(evaluate(&task, &due_day).days_remaining, 0);
    assert_eq!(compute_urgency(&task, &due_day), Urgency::DueToday);

    // The day after.
    let late = task.due_date + Duration::days(1) + Duration::hours(12);
    assert!(evaluate(&task, &late).days_remaining < 0);
    assert_eq!(compute_urgency(&task, &late), Urgency::Overdue);
}

#[test]
fn test_warning_window() {
    let due = local(2022, 4, 10, 0);
    let task = Task::recurring("t".into(), "Gym".into(), 7, IntervalUnit::Days, Some(due), &local(2022, 4, 3, 0));
    assert_eq!(compute_urgency(&task, &local(2022, 4, 7, 9)), Urgency::Normal);
    assert_eq!(compute_urgency(&task, &local(2022, 4, 8, 9)), Urgency::Warning);
    assert_eq!(compute_urgency(&task, &local(2022, 4, 9, 9)), Urgency::Warning);
    assert_eq!(compute_urgency(&task, &local(2022, 4, 10, 9)), Urgency::DueToday);
}

#[test]
fn test_renewal_examples() {
    let now = local(2022, 4, 1, 11);
    let daily = Task::recurring("a".into(), "a".into(), 5, IntervalUnit::Days, Some(now), &now);
    assert_eq!(renew(&daily, &now), Renewal::Update { next_due_date: local(2022, 4, 6, 0) });

    let jan31 = local(2022, 1, 31, 18);
    let monthly = Task::recurring("b".into(), "b".into(), 1, IntervalUnit::Months, Some(jan31), &jan31);
    assert_eq!(renew(&monthly, &jan31), Renewal::Update { next_due_date: local(2022, 2, 28, 0) });

    let once = Task::one_shot("c".into(), "c".into(), local(2022, 4, 8, 0), &now);
    assert_eq!(renew(&once, &now), Renewal::Delete);
}

#[test]
fn test_renewed_task_restarts_progress() {
    let now = local(2022, 4, 12, 8);
    let task = Task::recurring("a".into(), "a".into(), 1, IntervalUnit::Weeks, Some(local(2022, 4, 10, 0)), &now);
    assert_eq!(compute_urgency(&task, &now), Urgency::Overdue);

    let Renewal::Update { next_due_date } = renew(&task, &now) else {
        panic!("weekly task should renew");
    };
    let renewed = Task { due_date: next_due_date, ..task };
    let start_of_day = normalize_to_day_boundary(&now);
    assert_eq!(evaluate(&renewed, &start_of_day).fraction, 0.0);
    assert_eq!(compute_urgency(&renewed, &now), Urgency::Normal);
}

#[test]
fn test_days_between_symmetry() {
    let a = local(2022, 3, 1, 7);
    let b = local(2022, 11, 20, 19);
    assert_eq!(days_between(&a, &a), 0.0);
    assert_eq!(days_between(&a, &b), -days_between(&b, &a));
}
