//! Property-based tests for the task view and wire format.
//!
//! Uses proptest to verify:
//! 1. `visible_tasks` keeps exactly the tasks matching the filter.
//! 2. Dated tasks come first, ascending; undated tasks keep input order.
//! 3. Filter counts agree with the filtered views.
//! 4. Any task survives `to_wire` -> JSON -> `from_wire`.
//! 5. Blank titles never validate; non-blank titles come back trimmed.

#![allow(clippy::unwrap_used)]

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use taskboard_proto::schema::{TaskDraft, ValidationError, validate_draft};
use taskboard_proto::task::{Priority, Task, TaskId, TaskStatus};
use taskboard_proto::view::{Filter, FilterCounts, visible_tasks};
use taskboard_proto::wire::{WireTask, from_wire, to_wire};
use uuid::Uuid;

// --- Strategies ---

/// Millisecond timestamps between 1970 and 2100.
fn arb_timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_102_444_800_000).prop_map(|ms| {
        DateTime::from_timestamp_millis(ms).unwrap_or(DateTime::UNIX_EPOCH)
    })
}

fn arb_status() -> impl Strategy<Value = TaskStatus> {
    prop::sample::select(TaskStatus::ALL.to_vec())
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(Priority::ALL.to_vec())
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop::sample::select(Filter::ALL.to_vec())
}

/// Due dates are drawn from a small pool so ties are common.
fn arb_due_date() -> impl Strategy<Value = Option<DateTime<Utc>>> {
    prop::option::of((0i64..5).prop_map(|d| {
        DateTime::from_timestamp_millis(1_900_000_000_000 + d * 86_400_000)
            .unwrap_or(DateTime::UNIX_EPOCH)
    }))
}

fn arb_task() -> impl Strategy<Value = Task> {
    (
        any::<u128>(),
        "[A-Za-z][A-Za-z0-9 ]{0,30}[A-Za-z0-9]",
        "[ -~]{0,60}",
        arb_status(),
        arb_priority(),
        arb_due_date(),
        arb_timestamp(),
    )
        .prop_map(
            |(id, title, description, status, priority, due_date, created_at)| Task {
                id: TaskId::from_uuid(Uuid::from_u128(id)),
                title,
                description,
                status,
                priority,
                due_date,
                created_at,
            },
        )
}

proptest! {
    #[test]
    fn view_keeps_exactly_matching_tasks(
        tasks in prop::collection::vec(arb_task(), 0..40),
        filter in arb_filter(),
    ) {
        let view = visible_tasks(&tasks, filter);
        prop_assert!(view.iter().all(|t| filter.matches(t)));
        let expected = tasks.iter().filter(|t| filter.matches(t)).count();
        prop_assert_eq!(view.len(), expected);
        if filter == Filter::All {
            prop_assert_eq!(view.len(), tasks.len());
        }
    }

    #[test]
    fn view_orders_dated_first_ascending_and_stable(
        tasks in prop::collection::vec(arb_task(), 0..40),
        filter in arb_filter(),
    ) {
        let view = visible_tasks(&tasks, filter);
        let first_undated = view.iter().position(|t| t.due_date.is_none()).unwrap_or(view.len());
        prop_assert!(view[first_undated..].iter().all(|t| t.due_date.is_none()));

        for pair in view.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].due_date, pair[1].due_date) {
                prop_assert!(a <= b);
            }
        }

        // Equal keys keep their input order.
        let input_pos = |t: &Task| tasks.iter().position(|x| std::ptr::eq(x, t)).unwrap_or(usize::MAX);
        for pair in view.windows(2) {
            if pair[0].due_date == pair[1].due_date {
                prop_assert!(input_pos(pair[0]) < input_pos(pair[1]));
            }
        }
    }

    #[test]
    fn counts_match_views(tasks in prop::collection::vec(arb_task(), 0..40)) {
        let counts = FilterCounts::of(&tasks);
        for filter in Filter::ALL {
            prop_assert_eq!(counts.get(filter), visible_tasks(&tasks, filter).len());
        }
        prop_assert_eq!(counts.pending + counts.in_progress + counts.completed, counts.all);
    }

    #[test]
    fn wire_round_trip(task in arb_task()) {
        let json = serde_json::to_string(&to_wire(&task)).unwrap();
        let wire: WireTask = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(from_wire(wire).unwrap(), task);
    }

    #[test]
    fn blank_titles_never_validate(title in "[ \t\n]{0,10}") {
        let draft = TaskDraft { title: Some(title), ..Default::default() };
        prop_assert_eq!(validate_draft(&draft), Err(ValidationError::TitleRequired));
    }

    #[test]
    fn titles_are_trimmed(core in "[A-Za-z0-9][A-Za-z0-9 ]{0,20}[A-Za-z0-9]", pad in "[ \t]{0,4}") {
        let draft = TaskDraft { title: Some(format!("{pad}{core}{pad}")), ..Default::default() };
        let new = validate_draft(&draft).unwrap();
        prop_assert_eq!(new.title, core);
        prop_assert_eq!(new.status, TaskStatus::Pending);
        prop_assert_eq!(new.priority, Priority::Medium);
    }
}
